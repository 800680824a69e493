//! Registrar - an academic records manager on fixed-size binary record files
//!
//! Every entity type lives in its own flat file of fixed-width records with no
//! header. Records are appended and overwritten in place, never removed, so a
//! record's index is stable and "find by key, then write at index" is safe.
//!
//! # Architecture
//!
//! The crate is organized in layers, leaves first:
//!
//! - **Records** (`record`): fixed-width binary codec per entity type
//!   - `FixedRecord`: encode/decode contract with a constant width
//!   - `Student`, `Faculty`, `Course`, `Enrollment`, `User`
//!
//! - **Storage** (`storage`): `RecordFile`, a file-backed array of records with
//!   count, read/write by index, append and first-match search
//!
//! - **Repositories** (`repository`): keyed, typed stores with duplicate checks,
//!   and the `Registry` that validates cross-entity references
//!
//! - **Grading** (`grading`): grade points, transcripts with CGPA, course rosters
//!   and term GPA leaderboards
//!
//! - **Auth** (`auth`): password obfuscation and login
//!
//! # Example
//!
//! ```rust,no_run
//! use registrar::bootstrap::initialize_if_empty;
//! use registrar::common::StoreConfig;
//! use registrar::repository::Registry;
//!
//! let registry = Registry::open(StoreConfig::new("data")).unwrap();
//! initialize_if_empty(&registry).unwrap();
//!
//! let transcript = registry.transcript("02124100034").unwrap();
//! for entry in &transcript.entries {
//!     println!("{} {} {:?}", entry.course.code, entry.term, entry.grade);
//! }
//! println!("CGPA: {:?}", transcript.standing.cgpa());
//! ```

pub mod auth;
pub mod bootstrap;
pub mod common;
pub mod grading;
pub mod record;
pub mod repository;
pub mod storage;

// Re-export commonly used types at the crate root
pub use common::{EntityKind, RecordIndex, RegistrarError, Result, Role};
