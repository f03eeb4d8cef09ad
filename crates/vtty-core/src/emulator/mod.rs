//! The byte-at-a-time terminal interpreter (spec §4.2–§4.6).
//!
//! [`Emulator`] owns one [`EmulatorState`] and an [`EmulationKind`] tag.
//! Capability layering (Dumb ⊂ VT05/VT100 ⊂ Typical) is composition of
//! plain functions, not a class hierarchy: each profile module exposes a
//! `handle_*` function that claims the bytes it overrides and returns
//! control to the caller for anything else, which falls through to
//! [`dumb::handle_normal`] — the same override-precedence the spec
//! describes for a tabulated (state, byte) handler table.

mod dumb;
mod state;
mod typical;
mod vt05;
mod vt100;

use crate::attribute::{Attribute, ModeFlags};
use crate::cell::Cell;
use crate::framebuffer::Framebuffer;

pub use state::{Defaults, ParserState, SavedCursor};

use state::EmulatorState;

/// Which profile an [`Emulator`] was constructed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmulationKind {
    Dumb,
    Vt05,
    Vt100,
    Typical,
}

impl EmulationKind {
    fn defaults(self) -> Defaults {
        match self {
            EmulationKind::Dumb => Defaults {
                rows: 24,
                cols: 80,
                tabstop: 8,
                mode: ModeFlags::AUTOWRAP | ModeFlags::AUTOSCROLL,
            },
            EmulationKind::Vt05 => Defaults {
                rows: 20,
                cols: 72,
                tabstop: 8,
                mode: ModeFlags::AUTOSCROLL,
            },
            EmulationKind::Vt100 | EmulationKind::Typical => Defaults {
                rows: 24,
                cols: 80,
                tabstop: 8,
                mode: ModeFlags::AUTOSCROLL,
            },
        }
    }
}

/// The interpreter. `interpret` is the sole ingestion operation (spec
/// §4.2); it produces no output bytes, only mutates state.
pub struct Emulator {
    kind: EmulationKind,
    state: EmulatorState,
}

impl Emulator {
    pub fn new(kind: EmulationKind) -> Self {
        Self {
            kind,
            state: EmulatorState::new(kind.defaults()),
        }
    }

    pub fn kind(&self) -> EmulationKind {
        self.kind
    }

    /// Interpret one byte, mutating emulator state, then apply the
    /// post-step cursor/scroll reconciliation (spec §4.3).
    pub fn interpret(&mut self, byte: u8) {
        match self.state.parser {
            ParserState::Normal => self.interpret_normal(byte),
            ParserState::Escape => self.interpret_escape(byte),
            ParserState::Csi => self.interpret_csi(byte),
            ParserState::Private => self.interpret_private(byte),
            ParserState::Osc => self.interpret_osc(byte),
            ParserState::CursorAddressArg1 => vt05::interpret_cad(self, byte, true),
            ParserState::CursorAddressArg2 => vt05::interpret_cad(self, byte, false),
        }
        self.post_step();
    }

    fn interpret_normal(&mut self, byte: u8) {
        match self.kind {
            EmulationKind::Vt05 => {
                if vt05::handle_normal(self, byte) {
                    return;
                }
            }
            EmulationKind::Vt100 | EmulationKind::Typical => {
                if vt100::handle_normal(self, byte) {
                    return;
                }
            }
            EmulationKind::Dumb => {}
        }
        dumb::handle_normal(self, byte);
    }

    fn interpret_escape(&mut self, byte: u8) {
        if self.kind == EmulationKind::Typical && byte == b']' {
            self.state.csi_params.clear();
            self.state.parser = ParserState::Osc;
            return;
        }
        vt100::handle_escape(self, byte);
    }

    fn interpret_csi(&mut self, byte: u8) {
        vt100::handle_csi(self, byte);
    }

    fn interpret_private(&mut self, byte: u8) {
        vt100::handle_private(self, byte);
    }

    fn interpret_osc(&mut self, byte: u8) {
        typical::handle_osc(self, byte);
    }

    /// Cursor/scroll reconciliation applied after every ingested byte
    /// (spec §4.3 "Post-step rule").
    fn post_step(&mut self) {
        let cols = self.state.cols();
        if self.state.col == cols {
            if self.state.mode.contains(ModeFlags::AUTOWRAP) {
                self.state.col = 0;
                self.state.row += 1;
            } else {
                self.state.col = cols - 1;
            }
        }

        if self.state.row == self.state.margin_bottom + 1 {
            if self.state.mode.contains(ModeFlags::AUTOSCROLL) {
                self.state
                    .framebuffer
                    .scroll_region(self.state.margin_top, self.state.margin_bottom, true);
            }
            self.state.row -= 1;
        }
    }

    // --- Observability (spec §4.2) ---

    pub fn row(&self) -> usize {
        self.state.row
    }

    pub fn col(&self) -> usize {
        self.state.col
    }

    pub fn rows(&self) -> usize {
        self.state.rows()
    }

    pub fn cols(&self) -> usize {
        self.state.cols()
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.state.framebuffer.cell(row, col)
    }

    pub fn string(&self, row: usize, col: usize, size: usize) -> String {
        self.state.framebuffer.string(row, col, size)
    }

    pub fn margins(&self) -> (usize, usize) {
        (self.state.margin_top, self.state.margin_bottom)
    }

    pub fn mode(&self) -> ModeFlags {
        self.state.mode
    }

    pub fn attributes(&self) -> Attribute {
        self.state.attrs
    }

    pub fn tab_stops(&self) -> &[usize] {
        &self.state.tab_stops
    }

    pub fn saved_cursor(&self) -> Option<SavedCursor> {
        self.state.saved_cursor
    }

    /// Typical-only OSC window title; empty for other profiles.
    pub fn window_title(&self) -> &str {
        &self.state.window_title
    }

    /// Typical-only OSC icon name; empty for other profiles.
    pub fn icon_name(&self) -> &str {
        &self.state.icon_name
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.state.framebuffer
    }

    pub fn snapshot(&self) -> Framebuffer {
        self.state.framebuffer.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(emu: &mut Emulator, bytes: &[u8]) {
        for &b in bytes {
            emu.interpret(b);
        }
    }

    /// Route `tracing` output through the test harness so `cargo test --
    /// --nocapture` shows the `core.emulator.*` debug events emitted by
    /// the unknown-escape/CSI/OSC branches.
    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    // --- Scenario 1: Dumb, 24x80, "ab\r\nc" ---
    #[test]
    fn scenario_dumb_basic() {
        let mut emu = Emulator::new(EmulationKind::Dumb);
        feed(&mut emu, b"ab\r\nc");
        assert_eq!(emu.cell(0, 0).unwrap().char(), Some('a'));
        assert_eq!(emu.cell(0, 1).unwrap().char(), Some('b'));
        assert_eq!(emu.cell(1, 0).unwrap().char(), Some('c'));
        assert_eq!((emu.row(), emu.col()), (1, 1));
    }

    // --- Scenario 2: Dumb, 80x'x' then 'y' ---
    #[test]
    fn scenario_dumb_wrap() {
        let mut emu = Emulator::new(EmulationKind::Dumb);
        for _ in 0..80 {
            emu.interpret(b'x');
        }
        emu.interpret(b'y');
        for col in 0..80 {
            assert_eq!(emu.cell(0, col).unwrap().char(), Some('x'));
        }
        assert_eq!(emu.cell(1, 0).unwrap().char(), Some('y'));
        assert_eq!((emu.row(), emu.col()), (1, 1));
    }

    // --- Scenario 3: VT05, "a" + 0x18 + "b" ---
    #[test]
    fn scenario_vt05_cursor_right() {
        let mut emu = Emulator::new(EmulationKind::Vt05);
        emu.interpret(b'a');
        emu.interpret(0x18);
        emu.interpret(b'b');
        assert_eq!(emu.cell(0, 0).unwrap().char(), Some('a'));
        assert_eq!(emu.cell(0, 2).unwrap().char(), Some('b'));
        assert_eq!((emu.row(), emu.col()), (0, 3));
    }

    // --- Scenario 4: VT100, ESC [ 5;3H X ---
    #[test]
    fn scenario_vt100_place_cursor() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[5;3HX");
        assert_eq!(emu.cell(4, 2).unwrap().char(), Some('X'));
        assert_eq!((emu.row(), emu.col()), (4, 3));
    }

    // --- Scenario 5: VT100 SGR ---
    #[test]
    fn scenario_vt100_sgr() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[1mA\x1b[0mB");
        assert_eq!(emu.cell(0, 0).unwrap().char(), Some('A'));
        assert_eq!(emu.cell(0, 0).unwrap().attributes(), Attribute::BOLD);
        assert_eq!(emu.cell(0, 1).unwrap().char(), Some('B'));
        assert_eq!(emu.cell(0, 1).unwrap().attributes(), Attribute::empty());
    }

    // --- Scenario 6: VT100 scroll region ---
    #[test]
    fn scenario_vt100_scroll_region() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        for _ in 0..24 {
            emu.interpret(b'R');
            emu.interpret(b'\n');
            emu.interpret(b'\r');
        }
        feed(&mut emu, b"\x1b[10;12r");
        feed(&mut emu, b"\x1b[10;2H");
        for _ in 0..10 {
            for _ in 0..80 {
                emu.interpret(b'S');
            }
            emu.interpret(b'\n');
            emu.interpret(b'\r');
        }
        for row in 0..9 {
            assert_eq!(emu.cell(row, 0).unwrap().char(), Some('R'), "row {row}");
        }
        for row in 9..11 {
            for col in 0..80 {
                assert_eq!(emu.cell(row, col).unwrap().char(), Some('S'), "row {row} col {col}");
            }
        }
        assert_eq!(emu.cell(11, 0).unwrap().char(), None);
        for row in 12..24 {
            assert_eq!(emu.cell(row, 0).unwrap().char(), Some('R'), "row {row}");
        }
        assert_eq!(emu.row(), 11);
    }

    // --- Scenario 7: Typical OSC ---
    #[test]
    fn scenario_typical_osc_title() {
        let mut emu = Emulator::new(EmulationKind::Typical);
        feed(&mut emu, b"\x1b]0;hello\x07");
        assert_eq!(emu.window_title(), "hello");
        assert_eq!(emu.icon_name(), "hello");
    }

    #[test]
    fn dumb_geometry_defaults() {
        let emu = Emulator::new(EmulationKind::Dumb);
        assert_eq!((emu.rows(), emu.cols()), (24, 80));
        assert!(emu.mode().contains(ModeFlags::AUTOWRAP));
        assert!(emu.mode().contains(ModeFlags::AUTOSCROLL));
    }

    #[test]
    fn vt05_geometry_defaults() {
        let emu = Emulator::new(EmulationKind::Vt05);
        assert_eq!((emu.rows(), emu.cols()), (20, 72));
        assert!(!emu.mode().contains(ModeFlags::AUTOWRAP));
    }

    #[test]
    fn vt100_geometry_defaults() {
        let emu = Emulator::new(EmulationKind::Vt100);
        assert_eq!((emu.rows(), emu.cols()), (24, 80));
        assert!(!emu.mode().contains(ModeFlags::AUTOWRAP));
        assert!(!emu.mode().contains(ModeFlags::LINEFEED));
        assert!(!emu.mode().contains(ModeFlags::ORIGIN_RELATIVE));
        assert_eq!(emu.tab_stops(), &[0, 8, 16, 24, 32, 40, 48, 56, 64, 72]);
    }

    #[test]
    fn vt100_no_autowrap_pins_cursor_at_right_edge() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        for _ in 0..80 {
            emu.interpret(b'a');
        }
        assert_eq!((emu.row(), emu.col()), (0, 79));
        emu.interpret(b'b');
        assert_eq!(emu.cell(0, 79).unwrap().char(), Some('b'));
        assert_eq!((emu.row(), emu.col()), (0, 79));
    }

    #[test]
    fn tab_at_last_column_is_a_cell_noop() {
        let mut emu = Emulator::new(EmulationKind::Dumb);
        emu.state.col = 79;
        emu.interpret(0x09);
        assert_eq!(emu.cell(0, 79).unwrap().char(), None);
        assert_eq!(emu.col(), 79);
    }

    #[test]
    fn reverse_index_at_margin_top_scrolls_down_and_pins() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"top\r\n");
        assert_eq!((emu.row(), emu.col()), (1, 0));
        feed(&mut emu, b"\x1bM"); // reverse index while not at margin_top: just moves up
        assert_eq!(emu.row(), 0);
        feed(&mut emu, b"\x1bM"); // now at margin_top: scroll down, pin
        assert_eq!(emu.row(), 0);
        assert_eq!(emu.cell(0, 0).unwrap().char(), None);
        assert_eq!(emu.cell(1, 0).unwrap().char(), Some('t'));
    }

    #[test]
    fn origin_relative_mode_places_cursor_at_margin_top() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[10;20r");
        feed(&mut emu, b"\x1b[6h");
        feed(&mut emu, b"\x1b[1;1H");
        assert_eq!((emu.row(), emu.col()), (9, 0));
    }

    #[test]
    fn reset_is_idempotent() {
        let mut emu1 = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu1, b"hello\x1b[1m\x1bc");

        let mut emu2 = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu2, b"hello\x1b[1m\x1bc\x1bc");

        assert_eq!((emu1.row(), emu1.col()), (emu2.row(), emu2.col()));
        assert_eq!(emu1.attributes(), emu2.attributes());
        assert!(emu1.framebuffer().compare(emu2.framebuffer(), false).is_ok());
    }

    #[test]
    fn malformed_csi_is_absorbed_without_panic() {
        init_logging();
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[?!");
        emu.interpret(b'x');
        assert_eq!(emu.cell(0, 0).unwrap().char(), Some('x'));
    }

    #[test]
    fn empty_csi_params_use_documented_defaults() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[A"); // cursor up, default 1, already at 0
        assert_eq!(emu.row(), 0);
        feed(&mut emu, b"\x1b[H"); // place at origin
        assert_eq!((emu.row(), emu.col()), (0, 0));
    }
}
