//! VT05 overlay handlers (spec §4.4).

use super::dumb;
use super::state::ParserState;
use super::Emulator;

/// Try to handle `byte` with a VT05-specific Normal-state rule.
///
/// Returns `true` if handled; `false` means the caller should fall back
/// to [`dumb::handle_normal`].
pub fn handle_normal(emu: &mut Emulator, byte: u8) -> bool {
    match byte {
        0x18 => {
            let cols = emu.state.cols();
            if emu.state.col < cols - 1 {
                emu.state.col += 1;
            }
            true
        }
        0x0b => {
            let rows = emu.state.rows();
            if emu.state.row < rows - 1 {
                emu.state.row += 1;
            }
            true
        }
        0x1a => {
            if emu.state.row > 0 {
                emu.state.row -= 1;
            }
            true
        }
        0x1d => {
            emu.state.row = 0;
            emu.state.col = 0;
            true
        }
        0x1e => {
            erase_to_end_of_line(emu);
            true
        }
        0x1f => {
            erase_to_end_of_line(emu);
            erase_below(emu);
            true
        }
        0x0e => {
            emu.state.cad_y = None;
            emu.state.parser = ParserState::CursorAddressArg1;
            true
        }
        0x09 => {
            tab(emu);
            true
        }
        _ => false,
    }
}

fn erase_to_end_of_line(emu: &mut Emulator) {
    let (row, cols) = (emu.state.row, emu.state.cols());
    for col in emu.state.col..cols {
        if let Some(cell) = emu.state.framebuffer.cell_mut(row, col) {
            cell.clear();
        }
    }
}

fn erase_below(emu: &mut Emulator) {
    let (rows, cols) = (emu.state.rows(), emu.state.cols());
    for row in emu.state.row + 1..rows {
        for col in 0..cols {
            if let Some(cell) = emu.state.framebuffer.cell_mut(row, col) {
                cell.clear();
            }
        }
    }
}

/// Fixed {0,8,...,64} stop table, then single-step advance up to col 71.
/// Writes `'\t'` into the current cell unless that would overwrite the
/// last column (spec §4.4).
fn tab(emu: &mut Emulator) {
    const STOPS: [usize; 9] = [0, 8, 16, 24, 32, 40, 48, 56, 64];
    let cols = emu.state.cols();
    let (row, col) = (emu.state.row, emu.state.col);

    if col < cols - 1 {
        dumb::write_tab_glyph(emu, row, col);
    }

    if col < 64 {
        if let Some(&stop) = STOPS.iter().find(|&&s| col < s) {
            emu.state.col = stop;
        }
    } else if col == cols - 1 {
        // no-op, already at the last column
    } else {
        emu.state.col += 1;
    }
}

/// Consume a byte of a cursor-address sequence (spec §4.4).
///
/// `first` selects whether this byte is the Y (row) or X (col) coordinate.
/// An out-of-range byte is discarded and the caller's parser state is left
/// unchanged, so the next byte retries the same coordinate.
pub fn interpret_cad(emu: &mut Emulator, byte: u8, first: bool) {
    let value = (byte as i32) - 0x20;
    if first {
        let rows = emu.state.rows() as i32;
        if value < 0 || value >= rows {
            return;
        }
        emu.state.cad_y = Some(value as usize);
        emu.state.parser = ParserState::CursorAddressArg2;
    } else {
        let cols = emu.state.cols() as i32;
        if value < 0 || value >= cols {
            return;
        }
        if let Some(y) = emu.state.cad_y.take() {
            emu.state.row = y;
            emu.state.col = value as usize;
        }
        emu.state.parser = ParserState::Normal;
    }
}
