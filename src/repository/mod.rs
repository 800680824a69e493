//! Typed repositories over the record files and the registry that ties them together.

mod registry;
mod repository;

pub use registry::{parse_batch, parse_credit, Registry, StudentPatch};
pub use repository::*;
