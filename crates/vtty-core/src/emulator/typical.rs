//! Typical overlay (spec §4.6): OSC window-title/icon-name reporting.
//!
//! Entered from [`super::Emulator::interpret_escape`] only when the
//! emulator's kind is [`super::EmulationKind::Typical`] — VT100 proper has
//! no OSC support, so the `]` escape byte falls through to
//! [`super::vt100::handle_escape`]'s unknown-byte branch for that profile.

use super::state::ParserState;
use super::Emulator;

/// Accumulate OSC bytes until the BEL terminator, then dispatch.
pub fn handle_osc(emu: &mut Emulator, byte: u8) {
    if byte == 0x07 {
        dispatch_osc(emu);
        emu.state.csi_params.clear();
        emu.state.parser = ParserState::Normal;
        return;
    }
    emu.state.csi_params.push(byte as char);
}

fn dispatch_osc(emu: &mut Emulator) {
    let raw = emu.state.csi_params.clone();
    let Some((code, text)) = raw.split_once(';') else {
        return;
    };
    let Ok(code) = code.parse::<u32>() else {
        return;
    };
    match code {
        0 => {
            emu.state.window_title = text.to_string();
            emu.state.icon_name = text.to_string();
        }
        1 => emu.state.icon_name = text.to_string(),
        2 => emu.state.window_title = text.to_string(),
        _ => {
            if crate::debug::is_enabled() {
                tracing::debug!(event = "core.emulator.unknown_osc", code, "ignoring unrecognized OSC command");
            }
        }
    }
}
