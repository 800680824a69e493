use tracing::warn;

use super::Grade;
use crate::record::Course;
use crate::repository::{CourseRepo, EnrollmentRepo};
use crate::Result;

/// One course on a student's transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub course: Course,
    pub term: String,
    /// `None` while ungraded
    pub grade: Option<Grade>,
}

impl TranscriptEntry {
    /// Grade points, or `None` for an ungraded entry.
    pub fn points(&self) -> Option<f64> {
        self.grade.map(|g| g.points())
    }
}

/// Cumulative standing derived from the graded entries of a transcript.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Standing {
    Graded {
        /// Credit-weighted grade point average
        cgpa: f64,
        /// Sum of credits over graded entries
        credits: f64,
    },
    /// No entry carries a grade yet (distinct from a 0.00 CGPA)
    NoGradedCredits,
}

impl Standing {
    pub fn cgpa(&self) -> Option<f64> {
        match self {
            Standing::Graded { cgpa, .. } => Some(*cgpa),
            Standing::NoGradedCredits => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub student_id: String,
    /// Entries in enrollment store order
    pub entries: Vec<TranscriptEntry>,
    pub standing: Standing,
}

/// Running `sum(points * credit)` and `sum(credit)` over graded enrollments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct GpaAccumulator {
    pub points: f64,
    pub credits: f64,
}

impl GpaAccumulator {
    pub fn add(&mut self, grade: Grade, credit: f32) {
        let credit = f64::from(credit);
        self.points += grade.points() * credit;
        self.credits += credit;
    }

    pub fn gpa(&self) -> Option<f64> {
        if self.credits > 0.0 {
            Some(self.points / self.credits)
        } else {
            None
        }
    }
}

/// Builds the transcript of a student from their enrollments.
///
/// Courses are looked up fresh for every enrollment; enrollments whose course no
/// longer resolves are left off the transcript.
pub fn transcript(
    enrollments: &EnrollmentRepo,
    courses: &CourseRepo,
    student_id: &str,
) -> Result<Transcript> {
    let mut entries = Vec::new();
    let mut totals = GpaAccumulator::default();

    for enrollment in enrollments.for_student(student_id)? {
        let enrollment = enrollment?;
        let Some((_, course)) = courses.find(enrollment.course_code())? else {
            warn!(key = %enrollment.key, "transcript skips enrollment with unknown course");
            continue;
        };

        if let Some(grade) = enrollment.grade {
            totals.add(grade, course.credit);
        }
        entries.push(TranscriptEntry {
            course,
            term: enrollment.key.term,
            grade: enrollment.grade,
        });
    }

    let standing = match totals.gpa() {
        Some(cgpa) => Standing::Graded {
            cgpa,
            credits: totals.credits,
        },
        None => Standing::NoGradedCredits,
    };

    Ok(Transcript {
        student_id: student_id.to_string(),
        entries,
        standing,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulator_weights_by_credit() {
        let mut acc = GpaAccumulator::default();
        assert_eq!(acc.gpa(), None);

        acc.add(Grade::A, 3.0);
        acc.add(Grade::C, 1.0);
        assert_eq!(acc.credits, 4.0);
        assert!((acc.gpa().unwrap() - 3.5).abs() < 1e-9);
    }

    #[test]
    fn test_zero_credit_course_keeps_no_gpa() {
        let mut acc = GpaAccumulator::default();
        acc.add(Grade::A, 0.0);
        assert_eq!(acc.gpa(), None);
    }
}
