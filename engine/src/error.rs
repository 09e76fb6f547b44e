//! FILENAME: engine/src/error.rs

use thiserror::Error;

/// Usage errors reported by `map_to_grid`. Everything else (unknown
/// schemas, shape mismatches, typo'd order entries) degrades gracefully
/// and is only observable through logs.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("root object is absent")]
    AbsentRoot,

    #[error("root object is not a record")]
    RootNotRecord,

    #[error("type '{0}' is not registered as a mappable root")]
    UnregisteredRoot(String),
}
