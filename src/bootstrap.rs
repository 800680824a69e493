//! First-run seeding of the demo dataset.

use tracing::{debug, info};

use crate::common::{RecordIndex, RegistrarError, Role};
use crate::grading::Grade;
use crate::record::{Course, Enrollment, EnrollmentKey, Faculty, Student, User};
use crate::repository::Registry;
use crate::Result;

/// Term used by the demo enrollments
pub const DEMO_TERM: &str = "Fall-2025";

/// Seeds the demo dataset when the user store is empty.
///
/// Returns `true` if data was written. Call once at startup, before any session;
/// an error here means the stores are unusable.
pub fn initialize_if_empty(registry: &Registry) -> Result<bool> {
    if registry.users().count()? > 0 {
        return Ok(false);
    }

    let students = [
        Student::new("02124100034", "Sabbir Ahmed", "EEE", 241, "allexsabbir117@gmail.com"),
        Student::new("02124100001", "Afsana Mim", "CSE", 231, "mim@example.com"),
    ];
    let faculty = [
        Faculty::new("FAC-EEE-001", "Dr. Rezwan Khan", "EEE", "rezwan.khan@uiu.ac.bd"),
        Faculty::new("FAC-CSE-002", "Dr. John Doe", "CSE", "john.doe@uiu.ac.bd"),
    ];
    let courses = [
        Course::new("EEE-2101", "Circuits I", 3.0, "EEE").with_instructor("FAC-EEE-001"),
        Course::new("CSE-1101", "Intro to Programming", 3.0, "CSE").with_instructor("FAC-CSE-002"),
    ];
    let enrollments = [
        Enrollment::new(EnrollmentKey::new("02124100034", "EEE-2101", DEMO_TERM))
            .with_grade(Grade::A),
        Enrollment::new(EnrollmentKey::new("02124100034", "CSE-1101", DEMO_TERM))
            .with_grade(Grade::BPlus),
        Enrollment::new(EnrollmentKey::new("02124100001", "CSE-1101", DEMO_TERM))
            .with_grade(Grade::AMinus),
    ];
    let users = [
        User::new("admin", Role::Admin, "", "admin123"),
        User::new("rezwan", Role::Faculty, "FAC-EEE-001", "teacher123"),
        User::new("john", Role::Faculty, "FAC-CSE-002", "teacher123"),
        User::new("sabbir", Role::Student, "02124100034", "student123"),
        User::new("mim", Role::Student, "02124100001", "student123"),
    ];

    // Records left behind by an interrupted seed are kept as they are
    for student in &students {
        seed(registry.add_student(student))?;
    }
    for member in &faculty {
        seed(registry.add_faculty(member))?;
    }
    for course in &courses {
        seed(registry.add_course(course))?;
    }
    for enrollment in &enrollments {
        seed(registry.enrollments().add(enrollment))?;
    }
    for user in &users {
        seed(registry.add_user(user))?;
    }

    info!(
        data_dir = %registry.config().data_dir().display(),
        "initialized stores with demo data"
    );
    Ok(true)
}

/// Accepts a seed record that already exists.
fn seed(added: Result<RecordIndex>) -> Result<()> {
    match added {
        Ok(_) => Ok(()),
        Err(RegistrarError::DuplicateKey { entity, key }) => {
            debug!(%entity, key = %key, "seed record already present");
            Ok(())
        }
        Err(e) => Err(e),
    }
}
