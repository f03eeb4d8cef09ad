use bitflags::bitflags;

bitflags! {
    /// Monochrome character-cell attributes (spec §3 Attribute).
    ///
    /// Applied left-to-right by SGR; later writes inherit whatever is
    /// currently set (spec §4.5 `m`).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Attribute: u8 {
        const BOLD       = 0b0001;
        const UNDERSCORE = 0b0010;
        const BLINK      = 0b0100;
        const REVERSE    = 0b1000;
    }
}

bitflags! {
    /// Emulator-wide mode flags (spec §3 Mode flags), excluding
    /// character-attribute flags which live in [`Attribute`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct ModeFlags: u8 {
        /// Wrap to the next line on overflow instead of pinning at `cols - 1`.
        const AUTOWRAP        = 0b0001;
        /// Scroll the region instead of pinning at `margin_bottom`.
        const AUTOSCROLL      = 0b0010;
        /// LF also returns the cursor to column 0.
        const LINEFEED        = 0b0100;
        /// Cursor placement and margins are relative to `margin_top`.
        const ORIGIN_RELATIVE = 0b1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attribute_default_is_empty() {
        assert_eq!(Attribute::default(), Attribute::empty());
    }

    #[test]
    fn attribute_union_is_cumulative() {
        let a = Attribute::BOLD | Attribute::UNDERSCORE;
        assert!(a.contains(Attribute::BOLD));
        assert!(a.contains(Attribute::UNDERSCORE));
        assert!(!a.contains(Attribute::BLINK));
    }

    #[test]
    fn mode_flags_are_independent_bits() {
        let m = ModeFlags::AUTOWRAP | ModeFlags::LINEFEED;
        assert!(m.contains(ModeFlags::AUTOWRAP));
        assert!(!m.contains(ModeFlags::AUTOSCROLL));
    }
}
