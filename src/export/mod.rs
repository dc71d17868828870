pub mod json;

pub use json::{ExportError, ProgressSnapshot};
