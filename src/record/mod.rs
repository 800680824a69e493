//! Fixed-width record types and their binary codec.

mod codec;
mod course;
mod enrollment;
mod faculty;
mod student;
mod user;

pub use codec::{fit_to_slot, get_f32, get_i32, get_str, put_f32, put_i32, put_str, FixedRecord};
pub use course::Course;
pub use enrollment::{Enrollment, EnrollmentKey};
pub use faculty::Faculty;
pub use student::Student;
pub use user::User;
