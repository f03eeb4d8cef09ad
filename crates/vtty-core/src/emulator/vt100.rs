//! VT100 overlay handlers (spec §4.5): ESC/CSI/Private command dispatch,
//! SGR attributes, scroll-region margins, tab stops, and full reset.

use super::dumb;
use super::state::{ParserState, SavedCursor};
use super::Emulator;
use crate::attribute::{Attribute, ModeFlags};

/// Try to handle `byte` with a VT100-specific Normal-state rule. Returns
/// `true` if handled; `false` falls back to [`dumb::handle_normal`].
pub fn handle_normal(emu: &mut Emulator, byte: u8) -> bool {
    match byte {
        0x1b => {
            emu.state.parser = ParserState::Escape;
            true
        }
        0x09 => {
            tab(emu);
            true
        }
        0x20..=0x7e => {
            let (row, col, attrs) = (emu.state.row, emu.state.col, emu.state.attrs);
            if let Some(cell) = emu.state.framebuffer.cell_mut(row, col) {
                cell.write_with_attrs(byte as char, attrs);
            }
            emu.state.col += 1;
            true
        }
        _ => false,
    }
}

fn next_tab_stop(emu: &Emulator) -> usize {
    let last = emu.state.cols() - 1;
    emu.state
        .tab_stops
        .iter()
        .copied()
        .find(|&stop| stop > emu.state.col)
        .unwrap_or(last)
        .min(last)
}

fn tab(emu: &mut Emulator) {
    let stop = next_tab_stop(emu);
    dumb::fill_spaces(emu, emu.state.col, stop);
    emu.state.col = stop;
}

pub fn handle_escape(emu: &mut Emulator, byte: u8) {
    match byte {
        b'[' => {
            emu.state.csi_params.clear();
            emu.state.parser = ParserState::Csi;
            return;
        }
        b'#' => {
            emu.state.parser = ParserState::Private;
            return;
        }
        b'c' => full_reset(emu),
        b'7' => save_cursor(emu),
        b'8' => restore_cursor(emu),
        b'D' => index(emu),
        b'E' => {
            index(emu);
            emu.state.col = 0;
        }
        b'M' => reverse_index(emu),
        b'H' => set_tab_stop(emu),
        _ => {
            if crate::debug::is_enabled() {
                tracing::debug!(event = "core.emulator.unknown_escape", byte, "ignoring unrecognized escape byte");
            }
        }
    }
    emu.state.parser = ParserState::Normal;
}

fn full_reset(emu: &mut Emulator) {
    let defaults = emu.kind.defaults();
    emu.state = super::state::EmulatorState::new(defaults);
}

fn save_cursor(emu: &mut Emulator) {
    emu.state.saved_cursor = Some(SavedCursor {
        attributes: emu.state.attrs,
        row: emu.state.row,
        col: emu.state.col,
    });
}

fn restore_cursor(emu: &mut Emulator) {
    if let Some(saved) = emu.state.saved_cursor {
        emu.state.row = saved.row;
        emu.state.col = saved.col;
        emu.state.attrs = saved.attributes;
    }
}

/// `ESC D`: move down one row, deferring to the post-step rule for
/// scroll-on-overflow at `margin_bottom`.
fn index(emu: &mut Emulator) {
    emu.state.row += 1;
}

/// `ESC M`: move up one row, or scroll the region down and stay pinned at
/// `margin_top` if already there.
fn reverse_index(emu: &mut Emulator) {
    if emu.state.row == emu.state.margin_top {
        emu.state
            .framebuffer
            .scroll_region(emu.state.margin_top, emu.state.margin_bottom, false);
    } else {
        emu.state.row -= 1;
    }
}

fn set_tab_stop(emu: &mut Emulator) {
    let col = emu.state.col;
    if let Err(pos) = emu.state.tab_stops.binary_search(&col) {
        emu.state.tab_stops.insert(pos, col);
    }
}

pub fn handle_csi(emu: &mut Emulator, byte: u8) {
    match byte {
        b'0'..=b'9' | b';' | b'?' => {
            emu.state.csi_params.push(byte as char);
        }
        _ => {
            dispatch_csi(emu, byte);
            emu.state.csi_params.clear();
            emu.state.parser = ParserState::Normal;
        }
    }
}

fn parse_params(raw: &str) -> Vec<Option<usize>> {
    let raw = raw.strip_prefix('?').unwrap_or(raw);
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(';').map(|p| p.parse::<usize>().ok()).collect()
}

fn param(params: &[Option<usize>], index: usize, default: usize) -> usize {
    params.get(index).copied().flatten().unwrap_or(default)
}

/// Like [`param`], but an explicit `0` is also treated as the default —
/// used by the cursor-movement commands, where `CSI 0 A` means the same
/// thing as a bare `CSI A`.
fn param_nonzero(params: &[Option<usize>], index: usize, default: usize) -> usize {
    match params.get(index).copied().flatten() {
        Some(0) | None => default,
        Some(n) => n,
    }
}

fn dispatch_csi(emu: &mut Emulator, byte: u8) {
    let params = parse_params(&emu.state.csi_params);
    match byte {
        b'A' => {
            let n = param_nonzero(&params, 0, 1);
            emu.state.row = emu.state.row.saturating_sub(n).max(emu.state.margin_top);
        }
        b'B' => {
            let n = param_nonzero(&params, 0, 1);
            emu.state.row = (emu.state.row + n).min(emu.state.margin_bottom);
        }
        b'C' => {
            let n = param_nonzero(&params, 0, 1);
            emu.state.col = (emu.state.col + n).min(emu.state.cols() - 1);
        }
        b'D' => {
            let n = param_nonzero(&params, 0, 1);
            emu.state.col = emu.state.col.saturating_sub(n);
        }
        b'H' | b'f' => place_cursor(emu, &params),
        b'J' => erase_screen(emu, param(&params, 0, 0)),
        b'K' => erase_line(emu, param(&params, 0, 0)),
        b'g' => clear_tab_stops(emu, param(&params, 0, 0)),
        b'h' => set_modes(emu, &params, true),
        b'l' => set_modes(emu, &params, false),
        b'm' => apply_sgr(emu, &params),
        b'r' => set_margins(emu, &params),
        _ => {
            if crate::debug::is_enabled() {
                tracing::debug!(event = "core.emulator.unknown_csi", byte, "ignoring unrecognized CSI final byte");
            }
        }
    }
}

fn place_cursor(emu: &mut Emulator, params: &[Option<usize>]) {
    let arg_row = param(params, 0, 1);
    let arg_col = param(params, 1, 1);
    let row = if emu.state.mode.contains(ModeFlags::ORIGIN_RELATIVE) {
        (emu.state.margin_top + arg_row.saturating_sub(1)).min(emu.state.margin_bottom)
    } else {
        arg_row.saturating_sub(1).min(emu.state.rows() - 1)
    };
    emu.state.row = row;
    emu.state.col = arg_col.saturating_sub(1).min(emu.state.cols() - 1);
}

fn erase_screen(emu: &mut Emulator, mode: usize) {
    let (row, col, rows, cols) = (emu.state.row, emu.state.col, emu.state.rows(), emu.state.cols());
    match mode {
        0 => {
            clear_range(emu, row, col, row, cols);
            for r in row + 1..rows {
                clear_range(emu, r, 0, r, cols);
            }
        }
        1 => {
            for r in 0..row {
                clear_range(emu, r, 0, r, cols);
            }
            clear_range(emu, row, 0, row, col + 1);
        }
        2 => {
            for r in 0..rows {
                clear_range(emu, r, 0, r, cols);
            }
        }
        _ => {}
    }
}

fn erase_line(emu: &mut Emulator, mode: usize) {
    let (row, col, cols) = (emu.state.row, emu.state.col, emu.state.cols());
    match mode {
        0 => clear_range(emu, row, col, row, cols),
        1 => clear_range(emu, row, 0, row, col + 1),
        2 => clear_range(emu, row, 0, row, cols),
        _ => {}
    }
}

fn clear_range(emu: &mut Emulator, row: usize, from: usize, to_row: usize, to: usize) {
    let _ = to_row;
    for col in from..to {
        if let Some(cell) = emu.state.framebuffer.cell_mut(row, col) {
            cell.clear();
        }
    }
}

fn clear_tab_stops(emu: &mut Emulator, mode: usize) {
    match mode {
        0 => emu.state.tab_stops.retain(|&stop| stop != emu.state.col),
        3 => emu.state.tab_stops.clear(),
        _ => {}
    }
}

fn set_modes(emu: &mut Emulator, params: &[Option<usize>], enable: bool) {
    for code in params.iter().filter_map(|p| *p) {
        let flag = match code {
            6 => Some(ModeFlags::ORIGIN_RELATIVE),
            7 => Some(ModeFlags::AUTOWRAP),
            20 => Some(ModeFlags::LINEFEED),
            _ => None,
        };
        match flag {
            Some(flag) => emu.state.mode.set(flag, enable),
            None => {
                if crate::debug::is_enabled() {
                    tracing::debug!(event = "core.emulator.unknown_mode", code, enable, "ignoring unrecognized mode code");
                }
            }
        }
    }
}

fn apply_sgr(emu: &mut Emulator, params: &[Option<usize>]) {
    if params.is_empty() {
        emu.state.attrs = Attribute::empty();
        return;
    }
    for code in params.iter().map(|p| p.unwrap_or(0)) {
        match code {
            0 => emu.state.attrs = Attribute::empty(),
            1 => emu.state.attrs.insert(Attribute::BOLD),
            4 => emu.state.attrs.insert(Attribute::UNDERSCORE),
            5 => emu.state.attrs.insert(Attribute::BLINK),
            7 => emu.state.attrs.insert(Attribute::REVERSE),
            22 => emu.state.attrs.remove(Attribute::BOLD),
            24 => emu.state.attrs.remove(Attribute::UNDERSCORE),
            25 => emu.state.attrs.remove(Attribute::BLINK),
            27 => emu.state.attrs.remove(Attribute::REVERSE),
            _ => {}
        }
    }
}

fn set_margins(emu: &mut Emulator, params: &[Option<usize>]) {
    let rows = emu.state.rows();
    let top = param(params, 0, 1).saturating_sub(1);
    let bottom = param(params, 1, rows).saturating_sub(1).min(rows - 1);
    if top >= bottom {
        return;
    }
    emu.state.margin_top = top;
    emu.state.margin_bottom = bottom;
    emu.state.row = if emu.state.mode.contains(ModeFlags::ORIGIN_RELATIVE) {
        top
    } else {
        0
    };
    emu.state.col = 0;
}

/// The single Private-state command this profile understands: fill the
/// screen with `E` glyphs (DECALN-style alignment pattern) and home the
/// cursor.
pub fn handle_private(emu: &mut Emulator, byte: u8) {
    if byte == b'8' {
        let (rows, cols) = (emu.state.rows(), emu.state.cols());
        for row in 0..rows {
            for col in 0..cols {
                if let Some(cell) = emu.state.framebuffer.cell_mut(row, col) {
                    cell.write('E');
                }
            }
        }
        emu.state.row = 0;
        emu.state.col = 0;
    }
    emu.state.parser = ParserState::Normal;
}

#[cfg(test)]
mod tests {
    use super::super::{EmulationKind, Emulator};
    use super::*;

    fn feed(emu: &mut Emulator, bytes: &[u8]) {
        for &b in bytes {
            emu.interpret(b);
        }
    }

    #[test]
    fn tab_lands_on_next_stop_and_fills_spaces() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        emu.interpret(b'a');
        emu.interpret(0x09);
        assert_eq!(emu.col(), 8);
        assert_eq!(emu.cell(0, 1).unwrap().char(), Some(' '));
    }

    #[test]
    fn erase_line_mode_2_clears_whole_row_but_keeps_cursor() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"hello");
        feed(&mut emu, b"\x1b[2K");
        assert_eq!(emu.cell(0, 0).unwrap().char(), None);
        assert_eq!(emu.col(), 5);
    }

    #[test]
    fn set_and_clear_tab_stop() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[5C\x1bH");
        assert!(emu.tab_stops().contains(&5));
        feed(&mut emu, b"\x1b[0g");
        assert!(!emu.tab_stops().contains(&5));
    }

    #[test]
    fn sgr_accumulates_then_resets_on_code_zero() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[1;4m");
        assert_eq!(emu.attributes(), Attribute::BOLD | Attribute::UNDERSCORE);
        feed(&mut emu, b"\x1b[m");
        assert_eq!(emu.attributes(), Attribute::empty());
    }

    #[test]
    fn decaln_fills_screen_with_e() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b#8");
        assert_eq!(emu.cell(0, 0).unwrap().char(), Some('E'));
        assert_eq!(emu.cell(23, 79).unwrap().char(), Some('E'));
        assert_eq!((emu.row(), emu.col()), (0, 0));
    }

    #[test]
    fn explicit_zero_cursor_moves_behave_like_the_default_of_one() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[5;5H");
        feed(&mut emu, b"\x1b[0B");
        assert_eq!(emu.row(), 5);
        feed(&mut emu, b"\x1b[0C");
        assert_eq!(emu.col(), 5);
        feed(&mut emu, b"\x1b[0A");
        assert_eq!(emu.row(), 4);
        feed(&mut emu, b"\x1b[0D");
        assert_eq!(emu.col(), 4);
    }

    #[test]
    fn save_and_restore_cursor_roundtrip() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        feed(&mut emu, b"\x1b[5;5H\x1b[1m\x1b7");
        feed(&mut emu, b"\x1b[1;1H\x1b[0m");
        feed(&mut emu, b"\x1b8");
        assert_eq!((emu.row(), emu.col()), (4, 4));
        assert_eq!(emu.attributes(), Attribute::BOLD);
    }
}
