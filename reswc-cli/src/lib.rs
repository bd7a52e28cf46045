//! CLI library for testing purposes

pub mod config;
pub mod output;
pub mod path_glob;
pub mod validation;

pub use config::{CompileSettings, ResolvedCompile};
pub use path_glob::{discover_sources, expand_resw_inputs};

/// Exit status when the run completed without errors.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit status when errors were reported and nothing was written.
pub const EXIT_FAILURE: i32 = 1;
/// Exit status for invalid arguments or configuration.
pub const EXIT_CONFIG: i32 = 2;
