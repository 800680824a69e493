use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use parking_lot::Mutex;
use tracing::info;

use crate::common::{
    EntityKind, RecordIndex, RegistrarError, Result, StoreConfig, CODE_SLOT, ID_SLOT,
    TERM_SLOT, USERNAME_SLOT,
};
use crate::record::{
    fit_to_slot, Course, Enrollment, EnrollmentKey, Faculty, FixedRecord, Student, User,
};
use crate::storage::RecordFile;

/// A typed store of records with a unique key.
///
/// Uniqueness is enforced by `add`, which scans for the key before appending.
/// The key projection is fixed at construction, so each repository knows exactly
/// one notion of record identity. Lookup keys are fitted to the key's slot before
/// comparing, so they match the stored (possibly truncated) form.
pub struct Repository<R, K: ?Sized + ToOwned> {
    file: RecordFile<R>,
    /// Projects a record onto its unique key
    key_of: for<'a> fn(&'a R) -> &'a K,
    /// Truncates a lookup key the way the codec truncates the stored key
    fit_key: for<'a> fn(&'a K) -> Cow<'a, K>,
    /// Serializes check-then-write sequences (add, update)
    mutation_lock: Mutex<()>,
}

impl<R, K> Repository<R, K>
where
    R: FixedRecord,
    K: ?Sized + ToOwned + PartialEq + fmt::Display,
{
    pub fn new<P: AsRef<Path>>(
        path: P,
        key_of: for<'a> fn(&'a R) -> &'a K,
        fit_key: for<'a> fn(&'a K) -> Cow<'a, K>,
    ) -> Self {
        Self {
            file: RecordFile::new(path),
            key_of,
            fit_key,
            mutation_lock: Mutex::new(()),
        }
    }

    pub fn entity(&self) -> EntityKind {
        R::ENTITY
    }

    /// Returns the key of a record.
    pub fn key_of<'a>(&self, record: &'a R) -> &'a K {
        (self.key_of)(record)
    }

    /// Appends a record after verifying no record with the same key exists.
    ///
    /// The key is checked in its stored form, so a value that only differs past
    /// its slot capacity counts as a duplicate.
    pub fn add(&self, record: &R) -> Result<RecordIndex> {
        let stored = record.normalized()?;
        let _guard = self.mutation_lock.lock();

        let key = self.key_of(&stored);
        if self.find(key)?.is_some() {
            return Err(RegistrarError::duplicate(R::ENTITY, key));
        }

        let index = self.file.append(&stored)?;
        info!(entity = %R::ENTITY, key = %key, index, "added record");
        Ok(index)
    }

    /// Returns the first record with the given key, with its index.
    pub fn find(&self, key: &K) -> Result<Option<(RecordIndex, R)>> {
        let key = (self.fit_key)(key);
        self.file.find_first(|record| (self.key_of)(record) == &*key)
    }

    /// Returns the record with the given key.
    pub fn get(&self, key: &K) -> Result<R> {
        self.find(key)?
            .map(|(_, record)| record)
            .ok_or_else(|| RegistrarError::not_found(R::ENTITY, key))
    }

    pub fn contains(&self, key: &K) -> Result<bool> {
        Ok(self.find(key)?.is_some())
    }

    /// Finds the record by key, applies `mutate` and writes it back in place.
    /// Returns the record as stored.
    ///
    /// A mutation that changes the key is rejected with `InvalidInput`.
    pub fn update<F>(&self, key: &K, mutate: F) -> Result<R>
    where
        F: FnOnce(&mut R),
    {
        let _guard = self.mutation_lock.lock();

        let (index, mut record) = self
            .find(key)?
            .ok_or_else(|| RegistrarError::not_found(R::ENTITY, key))?;
        mutate(&mut record);

        let stored = record.normalized()?;
        if self.key_of(&stored) != &*(self.fit_key)(key) {
            return Err(RegistrarError::InvalidInput(format!(
                "{} key '{}' cannot be changed",
                R::ENTITY,
                key
            )));
        }

        self.file.write_at(index, &stored)?;
        info!(entity = %R::ENTITY, key = %key, index, "updated record");
        Ok(stored)
    }

    /// Iterates every record in store order. Each call starts a fresh scan.
    pub fn list_all(&self) -> Result<impl Iterator<Item = Result<R>> + '_> {
        Ok(self.file.scan()?.map(|entry| entry.map(|(_, record)| record)))
    }

    pub fn count(&self) -> Result<u64> {
        self.file.count()
    }

    pub fn file(&self) -> &RecordFile<R> {
        &self.file
    }
}

fn student_id(student: &Student) -> &str {
    &student.id
}

fn faculty_id(faculty: &Faculty) -> &str {
    &faculty.id
}

fn course_code(course: &Course) -> &str {
    &course.code
}

fn enrollment_key(enrollment: &Enrollment) -> &EnrollmentKey {
    &enrollment.key
}

fn username(user: &User) -> &str {
    &user.username
}

fn fit_id(key: &str) -> Cow<'_, str> {
    Cow::Borrowed(fit_to_slot(key, ID_SLOT))
}

fn fit_code(key: &str) -> Cow<'_, str> {
    Cow::Borrowed(fit_to_slot(key, CODE_SLOT))
}

fn fit_username(key: &str) -> Cow<'_, str> {
    Cow::Borrowed(fit_to_slot(key, USERNAME_SLOT))
}

fn fit_enrollment_key(key: &EnrollmentKey) -> Cow<'_, EnrollmentKey> {
    key.fit_to_slots()
}

pub type StudentRepo = Repository<Student, str>;
pub type FacultyRepo = Repository<Faculty, str>;
pub type CourseRepo = Repository<Course, str>;
pub type EnrollmentRepo = Repository<Enrollment, EnrollmentKey>;
pub type UserRepo = Repository<User, str>;

impl Repository<Student, str> {
    pub fn students(config: &StoreConfig) -> Self {
        Self::new(config.file_path(EntityKind::Student), student_id, fit_id)
    }
}

impl Repository<Faculty, str> {
    pub fn faculty(config: &StoreConfig) -> Self {
        Self::new(config.file_path(EntityKind::Faculty), faculty_id, fit_id)
    }
}

impl Repository<Course, str> {
    pub fn courses(config: &StoreConfig) -> Self {
        Self::new(config.file_path(EntityKind::Course), course_code, fit_code)
    }
}

impl Repository<User, str> {
    pub fn users(config: &StoreConfig) -> Self {
        Self::new(config.file_path(EntityKind::User), username, fit_username)
    }
}

impl Repository<Enrollment, EnrollmentKey> {
    pub fn enrollments(config: &StoreConfig) -> Self {
        Self::new(
            config.file_path(EntityKind::Enrollment),
            enrollment_key,
            fit_enrollment_key,
        )
    }

    /// Enrollments of one student, in store order.
    pub fn for_student<'a>(
        &'a self,
        student_id: &'a str,
    ) -> Result<impl Iterator<Item = Result<Enrollment>> + 'a> {
        let student_id = fit_to_slot(student_id, ID_SLOT);
        Ok(self
            .list_all()?
            .filter(move |entry| matches_or_err(entry, |e| e.student_id() == student_id)))
    }

    /// Enrollments of one course offering, in store order.
    pub fn for_offering<'a>(
        &'a self,
        course_code: &'a str,
        term: &'a str,
    ) -> Result<impl Iterator<Item = Result<Enrollment>> + 'a> {
        let course_code = fit_to_slot(course_code, CODE_SLOT);
        let term = fit_to_slot(term, TERM_SLOT);
        Ok(self.list_all()?.filter(move |entry| {
            matches_or_err(entry, |e| e.course_code() == course_code && e.term() == term)
        }))
    }

    /// Enrollments in one term, in store order.
    pub fn for_term<'a>(
        &'a self,
        term: &'a str,
    ) -> Result<impl Iterator<Item = Result<Enrollment>> + 'a> {
        let term = fit_to_slot(term, TERM_SLOT);
        Ok(self
            .list_all()?
            .filter(move |entry| matches_or_err(entry, |e| e.term() == term)))
    }
}

/// Keeps errors in a filtered scan so they still reach the caller.
fn matches_or_err<F>(entry: &Result<Enrollment>, predicate: F) -> bool
where
    F: FnOnce(&Enrollment) -> bool,
{
    match entry {
        Ok(enrollment) => predicate(enrollment),
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn student_repo() -> (StudentRepo, TempDir) {
        let dir = TempDir::new().unwrap();
        let repo = StudentRepo::students(&StoreConfig::new(dir.path()));
        (repo, dir)
    }

    #[test]
    fn test_add_and_get() {
        let (repo, _dir) = student_repo();
        let student = Student::new("S1", "Alice", "CSE", 241, "alice@example.com");

        assert_eq!(repo.add(&student).unwrap(), 0);
        assert_eq!(repo.get("S1").unwrap(), student);
        assert!(repo.contains("S1").unwrap());
        assert!(!repo.contains("S2").unwrap());
    }

    #[test]
    fn test_get_missing_is_not_found() {
        let (repo, _dir) = student_repo();
        let err = repo.get("nobody").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Student 'nobody' not found");
    }

    #[test]
    fn test_update_rejects_key_change() {
        let (repo, _dir) = student_repo();
        repo.add(&Student::new("S1", "Alice", "CSE", 241, "")).unwrap();

        let result = repo.update("S1", |s| s.id = "S9".to_string());
        assert!(matches!(result, Err(RegistrarError::InvalidInput(_))));
        assert_eq!(repo.get("S1").unwrap().name, "Alice");
        assert!(!repo.contains("S9").unwrap());
    }

    #[test]
    fn test_overlong_key_finds_stored_record() {
        let (repo, _dir) = student_repo();
        let long_id = "0123456789ABCDEFG";
        repo.add(&Student::new(long_id, "Alice", "CSE", 241, "")).unwrap();

        let stored = repo.get(long_id).unwrap();
        assert_eq!(stored.id, "0123456789ABCDE");
        assert!(repo.contains(long_id).unwrap());

        let updated = repo.update(long_id, |s| s.name = "Alicia".to_string()).unwrap();
        assert_eq!(updated.name, "Alicia");
        assert_eq!(repo.get("0123456789ABCDE").unwrap().name, "Alicia");
    }

    #[test]
    fn test_truncated_key_counts_as_duplicate() {
        let (repo, _dir) = student_repo();
        // ID slot holds 15 bytes of content
        repo.add(&Student::new("0123456789ABCDE", "A", "CSE", 1, "")).unwrap();

        let result = repo.add(&Student::new("0123456789ABCDEF", "B", "CSE", 1, ""));
        assert!(matches!(result, Err(RegistrarError::DuplicateKey { .. })));
        assert_eq!(repo.count().unwrap(), 1);
    }
}
