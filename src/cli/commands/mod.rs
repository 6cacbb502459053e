//! One module per subcommand; each exposes an `execute` function.

pub mod completions;
pub mod get;
pub mod init;
pub mod remove;
pub mod set;
pub mod verify;
