//! The public facade test code is expected to construct (spec §5).

use crate::byte_source::ByteSource;
use crate::cell::Cell;
use crate::emulator::{EmulationKind, Emulator};
use crate::errors::UnsupportedEmulation;
use crate::framebuffer::{Framebuffer, FramebufferMismatch};

/// A named terminal emulator plus its framebuffer, constructed by name.
///
/// `"dumb"`, `"vt05"`, `"vt100"`, and `"typical"` are the only recognized
/// names; the original implementation also accepted a bare boolean where
/// `true` meant `"vt100"` and `false` meant `"dumb"` — [`Vtty::from_legacy_flag`]
/// preserves that shorthand for callers migrating fixtures.
pub struct Vtty {
    emulator: Emulator,
}

impl Vtty {
    pub fn new(emulation: &str) -> Result<Self, UnsupportedEmulation> {
        let kind = match emulation {
            "dumb" => EmulationKind::Dumb,
            "vt05" => EmulationKind::Vt05,
            "vt100" => EmulationKind::Vt100,
            "typical" => EmulationKind::Typical,
            other => {
                return Err(UnsupportedEmulation {
                    name: other.to_string(),
                })
            }
        };
        Ok(Self {
            emulator: Emulator::new(kind),
        })
    }

    pub fn from_legacy_flag(vt100: bool) -> Self {
        let kind = if vt100 { EmulationKind::Vt100 } else { EmulationKind::Dumb };
        Self {
            emulator: Emulator::new(kind),
        }
    }

    pub fn kind(&self) -> EmulationKind {
        self.emulator.kind()
    }

    pub fn rows(&self) -> usize {
        self.emulator.rows()
    }

    pub fn cols(&self) -> usize {
        self.emulator.cols()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.emulator.cell(row, col)
    }

    pub fn string(&self, row: usize, col: usize, size: usize) -> String {
        self.emulator.string(row, col, size)
    }

    pub fn cursor_position(&self) -> (usize, usize) {
        (self.emulator.row(), self.emulator.col())
    }

    pub fn snapshot_screen(&self) -> Framebuffer {
        self.emulator.snapshot()
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        self.emulator.framebuffer()
    }

    /// Compare against a previously captured [`snapshot_screen`](Self::snapshot_screen).
    pub fn assert_screen(&self, expected: &Framebuffer, loose: bool) -> Result<(), FramebufferMismatch> {
        self.emulator.framebuffer().compare(expected, loose)
    }

    /// Plain-text screen dump with no SGR escapes, suitable for assertion
    /// failure messages and anywhere else the output needs to compare
    /// byte-for-byte across runs.
    pub fn dump(&self) -> String {
        crate::dump::render(&self.emulator)
    }

    /// Write a screen dump to `sink`, style-wrapped with SGR escapes when
    /// the caller has confirmed `sink` is an actual terminal (spec §6) and
    /// this profile supports attributes; otherwise identical to
    /// [`Self::dump`]. Callers typically pass
    /// `std::io::stdout().is_terminal()` for `is_terminal`.
    pub fn dump_to<W: std::io::Write>(&self, sink: &mut W, is_terminal: bool) -> std::io::Result<()> {
        let text = if is_terminal {
            crate::dump::render_styled(&self.emulator)
        } else {
            crate::dump::render(&self.emulator)
        };
        sink.write_all(text.as_bytes())
    }
}

impl ByteSource for Vtty {
    fn append(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.emulator.interpret(byte);
        }
    }
}
