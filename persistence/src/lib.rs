//! FILENAME: persistence/src/lib.rs
//! Rowbook Persistence Module
//!
//! Writes the engine's flattened sheet grids to XLSX workbooks.

mod error;
mod format_cache;
mod xlsx_writer;

pub use error::PersistenceError;
pub use format_cache::FormatCache;
pub use xlsx_writer::{save_xlsx, write_xlsx};
