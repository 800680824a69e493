//! Grade points and the reports derived from enrollment data.

mod grade;
mod leaderboard;
mod roster;
mod transcript;

pub use grade::{grade_symbol, grade_to_points, parse_grade_input, Grade};
pub use leaderboard::{leaderboard, LeaderboardEntry};
pub use roster::{roster, RosterEntry};
pub use transcript::{transcript, Standing, Transcript, TranscriptEntry};
