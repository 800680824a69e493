use tracing::info;

use super::{CourseRepo, EnrollmentRepo, FacultyRepo, StudentRepo, UserRepo};
use crate::common::{EntityKind, RecordIndex, RegistrarError, Result, StoreConfig};
use crate::grading::{self, parse_grade_input, LeaderboardEntry, RosterEntry, Transcript};
use crate::record::{Course, Enrollment, EnrollmentKey, Faculty, Student, User};

/// Field changes for [`Registry::edit_student`]. `None` or blank text keeps the
/// existing value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub batch: Option<i32>,
}

impl StudentPatch {
    fn apply(self, student: &mut Student) {
        if let Some(name) = non_blank(self.name) {
            student.name = name;
        }
        if let Some(department) = non_blank(self.department) {
            student.department = department;
        }
        if let Some(email) = non_blank(self.email) {
            student.email = email;
        }
        if let Some(batch) = self.batch {
            student.batch = batch;
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The registrar's stores, one per entity type, plus the operations that
/// validate input against them before touching disk.
///
/// Cross-entity references are plain keys that are looked up again on every use.
pub struct Registry {
    config: StoreConfig,
    students: StudentRepo,
    faculty: FacultyRepo,
    courses: CourseRepo,
    enrollments: EnrollmentRepo,
    users: UserRepo,
}

impl Registry {
    /// Opens the stores under the configured data directory, creating the directory if needed.
    pub fn open(config: StoreConfig) -> Result<Self> {
        std::fs::create_dir_all(config.data_dir())?;
        Ok(Self {
            students: StudentRepo::students(&config),
            faculty: FacultyRepo::faculty(&config),
            courses: CourseRepo::courses(&config),
            enrollments: EnrollmentRepo::enrollments(&config),
            users: UserRepo::users(&config),
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn students(&self) -> &StudentRepo {
        &self.students
    }

    pub fn faculty(&self) -> &FacultyRepo {
        &self.faculty
    }

    pub fn courses(&self) -> &CourseRepo {
        &self.courses
    }

    pub fn enrollments(&self) -> &EnrollmentRepo {
        &self.enrollments
    }

    pub fn users(&self) -> &UserRepo {
        &self.users
    }

    // ---- Administration ----

    pub fn add_student(&self, student: &Student) -> Result<RecordIndex> {
        require_key(EntityKind::Student, &student.id)?;
        self.students.add(student)
    }

    /// Applies the patch to an existing student in place.
    pub fn edit_student(&self, id: &str, patch: StudentPatch) -> Result<Student> {
        self.students.update(id, |student| patch.apply(student))
    }

    pub fn add_faculty(&self, faculty: &Faculty) -> Result<RecordIndex> {
        require_key(EntityKind::Faculty, &faculty.id)?;
        self.faculty.add(faculty)
    }

    /// Adds a course. The credit must be positive and a non-empty instructor
    /// id must name an existing faculty member.
    pub fn add_course(&self, course: &Course) -> Result<RecordIndex> {
        require_key(EntityKind::Course, &course.code)?;
        validate_credit(course.credit)?;
        if let Some(instructor) = course.instructor() {
            self.faculty.get(instructor)?;
        }
        self.courses.add(course)
    }

    /// Makes a faculty member the instructor of a course.
    pub fn assign_instructor(&self, course_code: &str, faculty_id: &str) -> Result<Course> {
        if !self.courses.contains(course_code)? {
            return Err(RegistrarError::not_found(EntityKind::Course, course_code));
        }
        self.faculty.get(faculty_id)?;
        let course = self.courses.update(course_code, |course| {
            course.instructor_id = faculty_id.to_string();
        })?;
        info!(course = course_code, faculty = faculty_id, "assigned instructor");
        Ok(course)
    }

    /// Enrolls a student in a course for a term. The enrollment starts ungraded.
    pub fn enroll(&self, student_id: &str, course_code: &str, term: &str) -> Result<RecordIndex> {
        require_key(EntityKind::Enrollment, term)?;
        self.students.get(student_id)?;
        self.courses.get(course_code)?;
        let key = EnrollmentKey::new(student_id, course_code, term);
        self.enrollments.add(&Enrollment::new(key))
    }

    /// Sets the grade of an enrollment from user input. `NA` resets it to ungraded.
    pub fn set_grade(&self, key: &EnrollmentKey, symbol: &str) -> Result<Enrollment> {
        if !self.enrollments.contains(key)? {
            return Err(RegistrarError::not_found(EntityKind::Enrollment, key));
        }
        let grade = parse_grade_input(symbol)?;
        self.enrollments.update(key, |enrollment| enrollment.grade = grade)
    }

    /// Adds a login account.
    pub fn add_user(&self, user: &User) -> Result<RecordIndex> {
        require_key(EntityKind::User, &user.username)?;
        self.users.add(user)
    }

    // ---- Faculty ----

    /// Courses whose instructor is the given faculty member, in store order.
    pub fn courses_taught_by(&self, faculty_id: &str) -> Result<Vec<Course>> {
        let mut taught = Vec::new();
        for course in self.courses.list_all()? {
            let course = course?;
            if course.is_taught_by(faculty_id) {
                taught.push(course);
            }
        }
        Ok(taught)
    }

    /// Roster of a course offering, restricted to the course's instructor.
    pub fn instructor_roster(
        &self,
        faculty_id: &str,
        course_code: &str,
        term: &str,
    ) -> Result<Vec<RosterEntry>> {
        self.require_instructor(faculty_id, course_code)?;
        self.roster(course_code, term)
    }

    /// Sets a grade, restricted to the course's instructor.
    pub fn instructor_set_grade(
        &self,
        faculty_id: &str,
        key: &EnrollmentKey,
        symbol: &str,
    ) -> Result<Enrollment> {
        self.require_instructor(faculty_id, &key.course_code)?;
        self.set_grade(key, symbol)
    }

    fn require_instructor(&self, faculty_id: &str, course_code: &str) -> Result<()> {
        match self.courses.find(course_code)? {
            Some((_, course)) if course.is_taught_by(faculty_id) => Ok(()),
            _ => Err(RegistrarError::AccessDenied(format!(
                "'{faculty_id}' is not the instructor of '{course_code}'"
            ))),
        }
    }

    // ---- Students ----

    pub fn student_profile(&self, student_id: &str) -> Result<Student> {
        self.students.get(student_id)
    }

    // ---- Reports ----

    pub fn transcript(&self, student_id: &str) -> Result<Transcript> {
        grading::transcript(&self.enrollments, &self.courses, student_id)
    }

    pub fn roster(&self, course_code: &str, term: &str) -> Result<Vec<RosterEntry>> {
        grading::roster(&self.enrollments, &self.students, course_code, term)
    }

    pub fn leaderboard(&self, term: &str) -> Result<Vec<LeaderboardEntry>> {
        grading::leaderboard(&self.enrollments, &self.courses, &self.students, term)
    }
}

fn require_key(entity: EntityKind, key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(RegistrarError::InvalidInput(format!(
            "{entity} key must not be empty"
        )));
    }
    Ok(())
}

fn validate_credit(credit: f32) -> Result<()> {
    if credit.is_finite() && credit > 0.0 {
        Ok(())
    } else {
        Err(RegistrarError::InvalidInput(format!(
            "credit must be a positive number, got {credit}"
        )))
    }
}

/// Parses a batch code such as `241`.
pub fn parse_batch(input: &str) -> Result<i32> {
    input
        .trim()
        .parse()
        .map_err(|_| RegistrarError::InvalidInput(format!("not a batch number: {input:?}")))
}

/// Parses a course credit such as `3` or `1.5`. The credit must be positive.
pub fn parse_credit(input: &str) -> Result<f32> {
    let credit: f32 = input
        .trim()
        .parse()
        .map_err(|_| RegistrarError::InvalidInput(format!("not a credit value: {input:?}")))?;
    validate_credit(credit)?;
    Ok(credit)
}
