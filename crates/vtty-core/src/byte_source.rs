//! The adapter trait process/protocol collaborators feed raw bytes
//! through (spec §5 "ByteSource").
//!
//! [`crate::Vtty`] is the only implementor in this crate, but the trait
//! exists so `vtty-process`'s pipe readers can depend on an interface
//! rather than the concrete emulator facade.

/// Something that accepts a raw byte stream one chunk at a time.
pub trait ByteSource {
    /// Feed `bytes` through the interpreter in order.
    fn append(&mut self, bytes: &[u8]);
}
