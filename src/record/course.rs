use bytes::BytesMut;

use super::codec::{fit_to_slot, get_f32, get_str, put_f32, put_str, FixedRecord};
use crate::common::{EntityKind, Result, CODE_SLOT, DEPT_SLOT, ID_SLOT, TITLE_SLOT};

/// A course offering.
///
/// ```text
/// +----------+-----------+-------------+----------+-------------------+
/// | code(16) | title(64) | credit(f32) | dept(32) | instructor_id(16) |
/// +----------+-----------+-------------+----------+-------------------+
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    pub code: String,
    pub title: String,
    pub credit: f32,
    pub department: String,
    /// Faculty id of the instructor; empty when unassigned
    pub instructor_id: String,
}

impl Course {
    pub fn new(
        code: impl Into<String>,
        title: impl Into<String>,
        credit: f32,
        department: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            credit,
            department: department.into(),
            instructor_id: String::new(),
        }
    }

    pub fn with_instructor(mut self, faculty_id: impl Into<String>) -> Self {
        self.instructor_id = faculty_id.into();
        self
    }

    /// Returns the instructor's faculty id, if one is assigned.
    pub fn instructor(&self) -> Option<&str> {
        if self.instructor_id.is_empty() {
            None
        } else {
            Some(&self.instructor_id)
        }
    }

    /// Compares against the faculty id as it would be stored.
    pub fn is_taught_by(&self, faculty_id: &str) -> bool {
        self.instructor() == Some(fit_to_slot(faculty_id, ID_SLOT))
    }
}

impl FixedRecord for Course {
    const ENTITY: EntityKind = EntityKind::Course;
    const ENCODED_LEN: usize = CODE_SLOT + TITLE_SLOT + 4 + DEPT_SLOT + ID_SLOT;

    fn encode_into(&self, buf: &mut BytesMut) {
        put_str(buf, &self.code, CODE_SLOT);
        put_str(buf, &self.title, TITLE_SLOT);
        put_f32(buf, self.credit);
        put_str(buf, &self.department, DEPT_SLOT);
        put_str(buf, &self.instructor_id, ID_SLOT);
    }

    fn decode_from(buf: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            code: get_str(buf, CODE_SLOT),
            title: get_str(buf, TITLE_SLOT),
            credit: get_f32(buf),
            department: get_str(buf, DEPT_SLOT),
            instructor_id: get_str(buf, ID_SLOT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_course_instructor_is_optional() {
        let course = Course::new("EEE-2101", "Circuits I", 3.0, "EEE");
        assert_eq!(course.instructor(), None);
        assert!(!course.is_taught_by(""));

        let course = course.with_instructor("FAC-EEE-001");
        assert_eq!(course.instructor(), Some("FAC-EEE-001"));
        assert!(course.is_taught_by("FAC-EEE-001"));
    }

    #[test]
    fn test_course_layout() {
        assert_eq!(Course::ENCODED_LEN, 132);
        let course = Course::new("CSE-1101", "Intro to Programming", 3.0, "CSE")
            .with_instructor("FAC-CSE-002");
        let bytes = course.encode();
        assert_eq!(&bytes[80..84], &3.0f32.to_le_bytes());
        assert_eq!(Course::decode(&bytes).unwrap(), course);
    }
}
