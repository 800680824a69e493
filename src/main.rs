use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use registrar::auth::Session;
use registrar::bootstrap::initialize_if_empty;
use registrar::common::StoreConfig;
use registrar::grading::{grade_symbol, Standing};
use registrar::record::{Course, EnrollmentKey, Faculty, Student};
use registrar::repository::{parse_batch, parse_credit, Registry, StudentPatch};
use registrar::Result;

/// Academic records manager.
#[derive(Parser)]
#[command(name = "registrar")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the store files
    #[arg(global = true, short, long, default_value = ".")]
    data_dir: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the stores and seed demo data if they are empty
    Init,

    /// Check a username and password
    Login { username: String, password: String },

    /// List all students
    Students,

    /// List all faculty members
    Faculty,

    /// List courses
    Courses {
        /// Only courses taught by this faculty id
        #[arg(long)]
        instructor: Option<String>,
    },

    /// Add a student
    AddStudent {
        id: String,
        name: String,
        department: String,
        batch: String,
        #[arg(default_value = "")]
        email: String,
    },

    /// Edit a student; omitted fields keep their value
    EditStudent {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        batch: Option<String>,
    },

    /// Add a faculty member
    AddFaculty {
        id: String,
        name: String,
        department: String,
        #[arg(default_value = "")]
        email: String,
    },

    /// Add a course
    AddCourse {
        code: String,
        title: String,
        credit: String,
        department: String,
        /// Faculty id of the instructor
        #[arg(long)]
        instructor: Option<String>,
    },

    /// Assign an instructor to a course
    Assign { course_code: String, faculty_id: String },

    /// Enroll a student in a course for a term
    Enroll {
        student_id: String,
        course_code: String,
        term: String,
    },

    /// Set or reset (NA) a grade
    Grade {
        student_id: String,
        course_code: String,
        term: String,
        grade: String,
    },

    /// Print a student's transcript and CGPA
    Transcript { student_id: String },

    /// Print the students enrolled in a course for a term
    Roster { course_code: String, term: String },

    /// Rank students by GPA for a term
    Leaderboard { term: String },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let registry = match open_registry(&cli.data_dir) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("Cannot initialize stores in {}: {e}", cli.data_dir.display());
            return ExitCode::FAILURE;
        }
    };

    match run(&registry, cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn open_registry(data_dir: &Path) -> Result<Registry> {
    let registry = Registry::open(StoreConfig::new(data_dir))?;
    if initialize_if_empty(&registry)? {
        println!("Initialized with demo data.");
        println!("Default logins -> admin/admin123, rezwan/teacher123, sabbir/student123\n");
    }
    Ok(registry)
}

fn run(registry: &Registry, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            println!("Stores ready in {}", registry.config().data_dir().display());
        }
        Commands::Login { username, password } => {
            let Some(session) = Session::login(registry.users(), &username, &password)? else {
                println!("Invalid credentials.");
                return Ok(());
            };
            print!("Logged in as {} ({}", session.username(), session.role());
            if let Some(ref_id) = session.ref_id() {
                print!(", {ref_id}");
            }
            println!(")");
        }
        Commands::Students => {
            println!("-- Students --");
            for student in registry.students().list_all()? {
                print_student(&student?);
            }
        }
        Commands::Faculty => {
            println!("-- Faculty --");
            for member in registry.faculty().list_all()? {
                print_faculty(&member?);
            }
        }
        Commands::Courses { instructor } => {
            println!("-- Courses --");
            match instructor {
                Some(faculty_id) => {
                    let courses = registry.courses_taught_by(&faculty_id)?;
                    if courses.is_empty() {
                        println!("No assigned courses.");
                    }
                    courses.iter().for_each(print_course);
                }
                None => {
                    for course in registry.courses().list_all()? {
                        print_course(&course?);
                    }
                }
            }
        }
        Commands::AddStudent {
            id,
            name,
            department,
            batch,
            email,
        } => {
            let student = Student::new(id, name, department, parse_batch(&batch)?, email);
            registry.add_student(&student)?;
            println!("Student added.");
        }
        Commands::EditStudent {
            id,
            name,
            department,
            email,
            batch,
        } => {
            let batch = batch.as_deref().map(parse_batch).transpose()?;
            let patch = StudentPatch {
                name,
                department,
                email,
                batch,
            };
            print_student(&registry.edit_student(&id, patch)?);
        }
        Commands::AddFaculty {
            id,
            name,
            department,
            email,
        } => {
            registry.add_faculty(&Faculty::new(id, name, department, email))?;
            println!("Faculty added.");
        }
        Commands::AddCourse {
            code,
            title,
            credit,
            department,
            instructor,
        } => {
            let mut course = Course::new(code, title, parse_credit(&credit)?, department);
            if let Some(faculty_id) = instructor {
                course = course.with_instructor(faculty_id);
            }
            registry.add_course(&course)?;
            println!("Course added.");
        }
        Commands::Assign {
            course_code,
            faculty_id,
        } => {
            registry.assign_instructor(&course_code, &faculty_id)?;
            println!("Instructor assigned.");
        }
        Commands::Enroll {
            student_id,
            course_code,
            term,
        } => {
            registry.enroll(&student_id, &course_code, &term)?;
            println!("Enrollment added.");
        }
        Commands::Grade {
            student_id,
            course_code,
            term,
            grade,
        } => {
            let key = EnrollmentKey::new(student_id, course_code, term);
            registry.set_grade(&key, &grade)?;
            println!("Grade updated.");
        }
        Commands::Transcript { student_id } => {
            let transcript = registry.transcript(&student_id)?;
            println!("-- Transcript for {} --", transcript.student_id);
            for entry in &transcript.entries {
                print!(
                    "{:<8} | {:<10} | {:4.1} cr | Grade: {:<2}",
                    entry.course.code,
                    entry.term,
                    entry.course.credit,
                    grade_symbol(entry.grade)
                );
                if let Some(points) = entry.points() {
                    print!(" | GP: {points:.2}");
                }
                println!();
            }
            match transcript.standing {
                Standing::Graded { cgpa, credits } => {
                    println!("CGPA: {cgpa:.2} ({credits:.1} total credits)")
                }
                Standing::NoGradedCredits => println!("No graded credits yet."),
            }
        }
        Commands::Roster { course_code, term } => {
            let roster = registry.roster(&course_code, &term)?;
            println!("-- Roster {course_code} ({term}) --");
            if roster.is_empty() {
                println!("No students enrolled.");
            }
            for entry in &roster {
                println!(
                    "{:<12}  {:<24}  Grade: {:<2}",
                    entry.student.id,
                    entry.student.name,
                    grade_symbol(entry.grade)
                );
            }
        }
        Commands::Leaderboard { term } => {
            println!("-- Term GPA Leaderboard: {term} --");
            for entry in registry.leaderboard(&term)? {
                let name = entry.student.as_ref().map_or("", |s| s.name.as_str());
                println!(
                    "{:2}) {:<12} {:<24} GPA: {:.2} ({:.1} cr)",
                    entry.rank, entry.student_id, name, entry.gpa, entry.credits
                );
            }
        }
    }
    Ok(())
}

fn print_student(s: &Student) {
    println!(
        "ID: {} | Name: {} | Dept: {} | Batch: {} | Email: {}",
        s.id, s.name, s.department, s.batch, s.email
    );
}

fn print_faculty(f: &Faculty) {
    println!(
        "ID: {} | Name: {} | Dept: {} | Email: {}",
        f.id, f.name, f.department, f.email
    );
}

fn print_course(c: &Course) {
    println!(
        "Code: {} | Title: {} | Credit: {:.1} | Dept: {} | Instructor: {}",
        c.code, c.title, c.credit, c.department, c.instructor_id
    );
}
