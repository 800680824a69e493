use std::path::{Path, PathBuf};

use super::types::EntityKind;

/// Slot size of an identifier field (student id, faculty id, instructor id, ref id)
pub const ID_SLOT: usize = 16;

/// Slot size of a person's name
pub const NAME_SLOT: usize = 64;

/// Slot size of a department code (EEE, CSE, ...)
pub const DEPT_SLOT: usize = 32;

/// Slot size of an email address
pub const EMAIL_SLOT: usize = 64;

/// Slot size of a course code
pub const CODE_SLOT: usize = 16;

/// Slot size of a course title
pub const TITLE_SLOT: usize = 64;

/// Slot size of a term label (e.g. "Fall-2025")
pub const TERM_SLOT: usize = 16;

/// Slot size of a login name
pub const USERNAME_SLOT: usize = 32;

/// Size of the obfuscated password block
pub const PASSWORD_LEN: usize = 32;

/// Slot size of a grade symbol, terminator included
pub const GRADE_SLOT: usize = 3;

/// Grade symbol stored for enrollments that have not been graded yet
pub const UNGRADED_SYMBOL: &str = "NA";

pub const STUDENT_FILE: &str = "students.dat";
pub const FACULTY_FILE: &str = "faculty.dat";
pub const COURSE_FILE: &str = "courses.dat";
pub const ENROLLMENT_FILE: &str = "enrollments.dat";
pub const USER_FILE: &str = "users.dat";

/// Location of the store files on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    data_dir: PathBuf,
}

impl StoreConfig {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path of the file backing the given entity's store.
    pub fn file_path(&self, entity: EntityKind) -> PathBuf {
        let name = match entity {
            EntityKind::Student => STUDENT_FILE,
            EntityKind::Faculty => FACULTY_FILE,
            EntityKind::Course => COURSE_FILE,
            EntityKind::Enrollment => ENROLLMENT_FILE,
            EntityKind::User => USER_FILE,
        };
        self.data_dir.join(name)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_paths_are_per_entity() {
        let config = StoreConfig::new("/var/lib/registrar");
        assert_eq!(
            config.file_path(EntityKind::Student),
            PathBuf::from("/var/lib/registrar/students.dat")
        );
        assert_eq!(
            config.file_path(EntityKind::Enrollment),
            PathBuf::from("/var/lib/registrar/enrollments.dat")
        );
        assert_ne!(
            config.file_path(EntityKind::Faculty),
            config.file_path(EntityKind::User)
        );
    }
}
