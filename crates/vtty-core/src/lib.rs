//! Byte-stream terminal emulator and virtual framebuffer.
//!
//! This crate has no knowledge of processes, sockets, or test frameworks;
//! it only interprets bytes into a grid of [`Cell`]s. `vtty-process` feeds
//! it bytes read from a child process; `vtty-protocol` and `vtty-harness`
//! build on top of its [`Vtty`] facade.

pub mod attribute;
pub mod byte_source;
pub mod cell;
pub mod debug;
pub mod dump;
pub mod emulator;
pub mod errors;
pub mod framebuffer;
pub mod vtty;

pub use attribute::{Attribute, ModeFlags};
pub use byte_source::ByteSource;
pub use cell::Cell;
pub use dump::{render, render_styled};
pub use emulator::{EmulationKind, Emulator};
pub use errors::UnsupportedEmulation;
pub use framebuffer::{CellMismatch, Framebuffer, FramebufferMismatch};
pub use vtty::Vtty;
