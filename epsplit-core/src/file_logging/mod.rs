//! Log file output for unattended runs.

pub mod setup;

pub use setup::setup_file_logging;
