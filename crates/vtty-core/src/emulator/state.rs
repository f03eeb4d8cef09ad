use crate::attribute::{Attribute, ModeFlags};
use crate::framebuffer::Framebuffer;

/// Parser state (spec §3 "Parser state").
///
/// `CursorAddressArg1`/`CursorAddressArg2` are only ever entered by the
/// VT05 profile; `Escape`/`Csi`/`Private`/`Osc` only by VT100 and Typical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Normal,
    Escape,
    Csi,
    Private,
    Osc,
    CursorAddressArg1,
    CursorAddressArg2,
}

/// Snapshot captured by `ESC 7`, consumed by `ESC 8`. A single slot, not a
/// stack (spec §3, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SavedCursor {
    pub attributes: Attribute,
    pub row: usize,
    pub col: usize,
}

/// The geometry and default mode settings a profile is constructed with
/// (spec §4.2 "overriding `initialSettings()`").
#[derive(Debug, Clone, Copy)]
pub struct Defaults {
    pub rows: usize,
    pub cols: usize,
    pub tabstop: usize,
    pub mode: ModeFlags,
}

/// All mutable emulator state shared by every profile (spec §3).
///
/// Fields that only one profile uses (`cad_y`, `window_title`/`icon_name`)
/// are harmless no-ops for the others rather than justifying a second
/// state type — keeping one struct is what lets the dispatch tables in
/// [`super::Emulator`] stay a flat match instead of a trait-object zoo.
pub struct EmulatorState {
    pub framebuffer: Framebuffer,
    pub row: usize,
    pub col: usize,
    pub margin_top: usize,
    pub margin_bottom: usize,
    pub tabstop: usize,
    pub tab_stops: Vec<usize>,
    pub mode: ModeFlags,
    pub attrs: Attribute,
    pub saved_cursor: Option<SavedCursor>,
    pub parser: ParserState,
    pub csi_params: String,
    pub window_title: String,
    pub icon_name: String,
    /// First byte captured by a VT05 cursor-address sequence (`0x0E`),
    /// pending the second byte.
    pub cad_y: Option<usize>,
}

impl EmulatorState {
    pub fn new(defaults: Defaults) -> Self {
        let tab_stops = std::iter::once(0)
            .chain((defaults.tabstop..defaults.cols).step_by(defaults.tabstop))
            .collect();
        Self {
            framebuffer: Framebuffer::new(defaults.rows, defaults.cols),
            row: 0,
            col: 0,
            margin_top: 0,
            margin_bottom: defaults.rows - 1,
            tabstop: defaults.tabstop,
            tab_stops,
            mode: defaults.mode,
            attrs: Attribute::empty(),
            saved_cursor: None,
            parser: ParserState::Normal,
            csi_params: String::new(),
            window_title: String::new(),
            icon_name: String::new(),
            cad_y: None,
        }
    }

    pub fn rows(&self) -> usize {
        self.framebuffer.rows()
    }

    pub fn cols(&self) -> usize {
        self.framebuffer.cols()
    }
}
