//! Text-mode framebuffer dump used by debug diagnostics and test failure
//! messages (spec §6).
//!
//! Renders a column ruler (tens digits over ones digits), a bordered grid
//! of [`Cell::dump_char`] output, and a repeated ruler as a footer so a
//! wide terminal doesn't need to scroll back up to read column numbers.
//! On VT100/Typical profiles, [`render_styled`] additionally wraps each
//! non-default cell in SGR escapes reflecting its attributes, for callers
//! that have confirmed their sink is an actual terminal.

use super::emulator::{EmulationKind, Emulator};
use crate::attribute::Attribute;

pub fn render(emu: &Emulator) -> String {
    render_grid(emu, false)
}

/// Like [`render`], but wraps each cell carrying [`Attribute`]s in SGR
/// escapes if `emu`'s profile is VT100 or Typical (spec §6). Dumb and VT05
/// have no attribute concept, so this is identical to [`render`] for them.
pub fn render_styled(emu: &Emulator) -> String {
    render_grid(emu, matches!(emu.kind(), EmulationKind::Vt100 | EmulationKind::Typical))
}

fn render_grid(emu: &Emulator, styled: bool) -> String {
    let rows = emu.rows();
    let cols = emu.cols();
    let label_width = rows.saturating_sub(1).to_string().len().max(1);

    let mut out = String::new();
    let ruler = column_ruler(cols, label_width);
    out.push_str(&ruler);

    out.push_str(&" ".repeat(label_width));
    out.push('+');
    out.push_str(&"-".repeat(cols));
    out.push_str("+\n");

    for row in 0..rows {
        out.push_str(&format!("{row:label_width$}|"));
        for col in 0..cols {
            let cell = emu.cell(row, col);
            let ch = cell.map(|c| c.dump_char()).unwrap_or(' ');
            let attrs = cell.map(|c| c.attributes()).unwrap_or(Attribute::empty());
            if styled && !attrs.is_empty() {
                out.push_str(&sgr_escape(attrs));
                out.push(ch);
                out.push_str("\x1b[0m");
            } else {
                out.push(ch);
            }
        }
        out.push_str("|\n");
    }

    out.push_str(&" ".repeat(label_width));
    out.push('+');
    out.push_str(&"-".repeat(cols));
    out.push_str("+\n");
    out.push_str(&ruler);

    out
}

/// `CSI <codes> m` for the given attribute set (spec §6): 1=bold,
/// 4=underscore, 5=blink, 7=reverse, matching the codes `apply_sgr`
/// understands on input.
fn sgr_escape(attrs: Attribute) -> String {
    let mut codes = Vec::new();
    if attrs.contains(Attribute::BOLD) {
        codes.push("1");
    }
    if attrs.contains(Attribute::UNDERSCORE) {
        codes.push("4");
    }
    if attrs.contains(Attribute::BLINK) {
        codes.push("5");
    }
    if attrs.contains(Attribute::REVERSE) {
        codes.push("7");
    }
    format!("\x1b[{}m", codes.join(";"))
}

fn column_ruler(cols: usize, label_width: usize) -> String {
    let mut tens = " ".repeat(label_width + 1);
    let mut ones = " ".repeat(label_width + 1);
    for col in 0..cols {
        tens.push_str(&((col / 10) % 10).to_string());
        ones.push_str(&(col % 10).to_string());
    }
    tens.push('\n');
    ones.push('\n');
    tens + &ones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_includes_a_ruler_and_bordered_rows_for_every_row() {
        let emu = Emulator::new(EmulationKind::Vt05);
        let dump = render(&emu);
        assert_eq!(dump.lines().count(), 2 + 1 + emu.rows() + 1 + 2);
        assert!(dump.contains('+'));
        assert!(dump.contains('|'));
    }

    #[test]
    fn printed_glyphs_appear_inside_their_row() {
        let mut emu = Emulator::new(EmulationKind::Dumb);
        emu.interpret(b'Q');
        let dump = render(&emu);
        let body_row = dump.lines().nth(3).expect("first body row");
        assert!(body_row.trim_start().starts_with("0|Q"));
    }

    #[test]
    fn render_never_emits_sgr_escapes_regardless_of_attributes() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        for &b in b"\x1b[1mQ" {
            emu.interpret(b);
        }
        assert!(!render(&emu).contains('\x1b'));
    }

    #[test]
    fn render_styled_wraps_attributed_cells_on_vt100() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        for &b in b"\x1b[1mQ" {
            emu.interpret(b);
        }
        let dump = render_styled(&emu);
        assert!(dump.contains("\x1b[1mQ\x1b[0m"));
    }

    #[test]
    fn render_styled_leaves_plain_cells_unwrapped() {
        let mut emu = Emulator::new(EmulationKind::Vt100);
        emu.interpret(b'Q');
        let dump = render_styled(&emu);
        assert!(!dump.contains('\x1b'));
        assert!(dump.contains('Q'));
    }

    #[test]
    fn render_styled_is_plain_on_profiles_with_no_attribute_concept() {
        let mut emu = Emulator::new(EmulationKind::Dumb);
        emu.interpret(b'Q');
        assert_eq!(render_styled(&emu), render(&emu));
    }
}
