//! Library interface for the zonelint CLI

pub mod validate;

pub use validate::{load_inputs, run_report, run_validation, InputPaths, ReportOptions};

/// Exit status when inputs cannot be loaded.
pub const EXIT_LOAD_ERROR: i32 = 2;

/// Exit status for failures that have no check category.
pub const EXIT_FAILURE: i32 = 1;
