//! Child-process spawning and line-oriented interaction, with an optional
//! pty + [`vtty_core::Vtty`] mirror for interactive programs.

pub mod config;
pub mod errors;
pub mod process;

pub use config::{ProcessConfig, SpawnMode};
pub use errors::ProcessError;
pub use process::Process;
