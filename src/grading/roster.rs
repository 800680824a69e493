use tracing::warn;

use super::Grade;
use crate::record::Student;
use crate::repository::{EnrollmentRepo, StudentRepo};
use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterEntry {
    pub student: Student,
    pub grade: Option<Grade>,
}

/// Lists the students enrolled in a course for a term, in enrollment order.
///
/// Enrollments that reference a student missing from the student store are
/// skipped; a dangling reference never fails the report.
pub fn roster(
    enrollments: &EnrollmentRepo,
    students: &StudentRepo,
    course_code: &str,
    term: &str,
) -> Result<Vec<RosterEntry>> {
    let mut entries = Vec::new();

    for enrollment in enrollments.for_offering(course_code, term)? {
        let enrollment = enrollment?;
        match students.find(enrollment.student_id())? {
            Some((_, student)) => entries.push(RosterEntry {
                student,
                grade: enrollment.grade,
            }),
            None => {
                warn!(key = %enrollment.key, "roster skips enrollment with unknown student");
            }
        }
    }

    Ok(entries)
}
