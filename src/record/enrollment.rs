use std::borrow::Cow;
use std::fmt;

use bytes::BytesMut;

use super::codec::{corrupt, fit_to_slot, get_str, put_str, FixedRecord};
use crate::common::{
    EntityKind, Result, CODE_SLOT, GRADE_SLOT, ID_SLOT, TERM_SLOT, UNGRADED_SYMBOL,
};
use crate::grading::{grade_symbol, Grade};

/// Composite key of an enrollment: one student in one course for one term.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnrollmentKey {
    pub student_id: String,
    pub course_code: String,
    pub term: String,
}

impl EnrollmentKey {
    pub fn new(
        student_id: impl Into<String>,
        course_code: impl Into<String>,
        term: impl Into<String>,
    ) -> Self {
        Self {
            student_id: student_id.into(),
            course_code: course_code.into(),
            term: term.into(),
        }
    }
}

impl EnrollmentKey {
    /// Returns the key as it is stored, each field cut to its slot.
    pub fn fit_to_slots(&self) -> Cow<'_, EnrollmentKey> {
        let student_id = fit_to_slot(&self.student_id, ID_SLOT);
        let course_code = fit_to_slot(&self.course_code, CODE_SLOT);
        let term = fit_to_slot(&self.term, TERM_SLOT);

        if student_id.len() == self.student_id.len()
            && course_code.len() == self.course_code.len()
            && term.len() == self.term.len()
        {
            Cow::Borrowed(self)
        } else {
            Cow::Owned(EnrollmentKey::new(student_id, course_code, term))
        }
    }
}

impl fmt::Display for EnrollmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.student_id, self.course_code, self.term)
    }
}

/// An enrollment record: student_id(16) | course_code(16) | term(16) | grade(3)
///
/// The grade slot holds a grade symbol, or `NA` while the enrollment is ungraded.
/// Grade points are never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub key: EnrollmentKey,
    pub grade: Option<Grade>,
}

impl Enrollment {
    /// Creates an ungraded enrollment.
    pub fn new(key: EnrollmentKey) -> Self {
        Self { key, grade: None }
    }

    pub fn with_grade(mut self, grade: Grade) -> Self {
        self.grade = Some(grade);
        self
    }

    pub fn student_id(&self) -> &str {
        &self.key.student_id
    }

    pub fn course_code(&self) -> &str {
        &self.key.course_code
    }

    pub fn term(&self) -> &str {
        &self.key.term
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

impl FixedRecord for Enrollment {
    const ENTITY: EntityKind = EntityKind::Enrollment;
    const ENCODED_LEN: usize = ID_SLOT + CODE_SLOT + TERM_SLOT + GRADE_SLOT;

    fn encode_into(&self, buf: &mut BytesMut) {
        put_str(buf, &self.key.student_id, ID_SLOT);
        put_str(buf, &self.key.course_code, CODE_SLOT);
        put_str(buf, &self.key.term, TERM_SLOT);
        put_str(buf, grade_symbol(self.grade), GRADE_SLOT);
    }

    fn decode_from(buf: &mut &[u8]) -> Result<Self> {
        let key = EnrollmentKey {
            student_id: get_str(buf, ID_SLOT),
            course_code: get_str(buf, CODE_SLOT),
            term: get_str(buf, TERM_SLOT),
        };
        let symbol = get_str(buf, GRADE_SLOT);
        let grade = if symbol == UNGRADED_SYMBOL || symbol.is_empty() {
            None
        } else {
            let grade = symbol.parse::<Grade>().map_err(|_| {
                corrupt(
                    EntityKind::Enrollment,
                    format!("unknown grade symbol {symbol:?} for {key}"),
                )
            })?;
            Some(grade)
        };
        Ok(Self { key, grade })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RegistrarError;

    #[test]
    fn test_enrollment_layout() {
        assert_eq!(Enrollment::ENCODED_LEN, 51);

        let enrollment = Enrollment::new(EnrollmentKey::new("S1", "C1", "Fall-2025"));
        let bytes = enrollment.encode();
        assert_eq!(&bytes[48..], b"NA\0");
        assert_eq!(Enrollment::decode(&bytes).unwrap(), enrollment);

        let graded = enrollment.with_grade(Grade::BPlus);
        let bytes = graded.encode();
        assert_eq!(&bytes[48..], b"B+\0");
        assert_eq!(Enrollment::decode(&bytes).unwrap().grade, Some(Grade::BPlus));
    }

    #[test]
    fn test_unknown_grade_on_disk_is_corrupt() {
        let mut bytes = Enrollment::new(EnrollmentKey::new("S1", "C1", "T1"))
            .encode()
            .to_vec();
        bytes[48..].copy_from_slice(b"Z?\0");
        assert!(matches!(
            Enrollment::decode(&bytes),
            Err(RegistrarError::CorruptRecord {
                entity: EntityKind::Enrollment,
                ..
            })
        ));
    }

    #[test]
    fn test_fit_to_slots() {
        let key = EnrollmentKey::new("S1", "C1", "Fall-2025");
        assert!(matches!(key.fit_to_slots(), Cow::Borrowed(_)));

        let long = EnrollmentKey::new("0123456789ABCDEFG", "C1", "Spring-Semester-2025");
        let fitted = long.fit_to_slots();
        assert_eq!(fitted.student_id, "0123456789ABCDE");
        assert_eq!(fitted.course_code, "C1");
        assert_eq!(fitted.term, "Spring-Semester");
        assert_eq!(
            *fitted,
            Enrollment::decode(&Enrollment::new(long.clone()).encode())
                .unwrap()
                .key
        );
    }

    #[test]
    fn test_key_display() {
        let key = EnrollmentKey::new("S1", "C1", "T1");
        assert_eq!(key.to_string(), "S1/C1/T1");
    }
}
