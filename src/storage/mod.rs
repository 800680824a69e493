mod record_file;

pub use record_file::*;
