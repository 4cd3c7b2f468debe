// epsplit-cli/src/lib.rs
//
// Library portion of the epsplit CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, DetectionArgs, InspectArgs, SplitArgs, parse_cli};
pub use commands::inspect::run_inspect;
pub use commands::split::run_split;
