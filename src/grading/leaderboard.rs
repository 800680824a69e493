use tracing::warn;

use super::transcript::GpaAccumulator;
use crate::record::Student;
use crate::repository::{CourseRepo, EnrollmentRepo, StudentRepo};
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    /// 1-based position
    pub rank: usize,
    pub student_id: String,
    /// `None` when the student record no longer resolves
    pub student: Option<Student>,
    pub gpa: f64,
    pub credits: f64,
}

/// Ranks students by GPA over their graded enrollments in one term, best first.
///
/// Only graded enrollments whose course resolves and carries credit contribute, so
/// students with no graded credits in the term do not appear. Ties keep the order in which the
/// students first appear in the enrollment store.
pub fn leaderboard(
    enrollments: &EnrollmentRepo,
    courses: &CourseRepo,
    students: &StudentRepo,
    term: &str,
) -> Result<Vec<LeaderboardEntry>> {
    // Insertion order is first-seen order
    let mut totals: Vec<(String, GpaAccumulator)> = Vec::new();

    for enrollment in enrollments.for_term(term)? {
        let enrollment = enrollment?;
        let Some(grade) = enrollment.grade else {
            continue;
        };
        let Some((_, course)) = courses.find(enrollment.course_code())? else {
            warn!(key = %enrollment.key, "leaderboard skips enrollment with unknown course");
            continue;
        };
        if course.credit <= 0.0 {
            continue;
        }

        let position = totals
            .iter()
            .position(|(id, _)| id == enrollment.student_id());
        let slot = match position {
            Some(i) => i,
            None => {
                totals.push((enrollment.key.student_id, GpaAccumulator::default()));
                totals.len() - 1
            }
        };
        totals[slot].1.add(grade, course.credit);
    }

    let mut ranked: Vec<(String, f64, f64)> = totals
        .into_iter()
        .map(|(id, acc)| (id, acc.gpa().unwrap_or(0.0), acc.credits))
        .collect();
    // sort_by is stable, so equal GPAs keep first-seen order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked
        .into_iter()
        .enumerate()
        .map(|(i, (student_id, gpa, credits))| {
            let student = students.find(&student_id)?.map(|(_, s)| s);
            Ok(LeaderboardEntry {
                rank: i + 1,
                student_id,
                student,
                gpa,
                credits,
            })
        })
        .collect()
}
