//! CLI command handlers. Each command is in its own file.

mod once;
mod run;
mod status;

pub use once::run_once;
pub use run::run_daemon;
pub use status::run_status;
