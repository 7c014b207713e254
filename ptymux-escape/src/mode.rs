use bitflags::bitflags;

/// Wrapper for the ANSI modes set and reset through SM/RM.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    Named(NamedMode),
    Unknown(u16),
}

impl Mode {
    pub(crate) fn from_raw(mode: u16) -> Self {
        match mode {
            4 => Self::Named(NamedMode::Insert),
            20 => Self::Named(NamedMode::LineFeedNewLine),
            _ => Self::Unknown(mode),
        }
    }

    /// Raw value of the mode.
    #[must_use]
    pub fn raw(self) -> u16 {
        match self {
            Self::Named(named) => named as u16,
            Self::Unknown(mode) => mode,
        }
    }
}

impl From<NamedMode> for Mode {
    fn from(value: NamedMode) -> Self {
        Self::Named(value)
    }
}

/// ANSI modes.
#[repr(u16)]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NamedMode {
    /// IRM insert mode.
    Insert = 4,
    /// LNM: linefeed implies carriage return.
    LineFeedNewLine = 20,
}

/// Wrapper for the private DEC modes set and reset through DECSET/DECRST.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum PrivateMode {
    Named(NamedPrivateMode),
    Unknown(u16),
}

impl PrivateMode {
    pub(crate) fn from_raw(mode: u16) -> Self {
        match mode {
            1 => Self::Named(NamedPrivateMode::CursorKeys),
            3 => Self::Named(NamedPrivateMode::ColumnMode),
            6 => Self::Named(NamedPrivateMode::Origin),
            7 => Self::Named(NamedPrivateMode::LineWrap),
            12 => Self::Named(NamedPrivateMode::BlinkingCursor),
            25 => Self::Named(NamedPrivateMode::ShowCursor),
            47 => Self::Named(NamedPrivateMode::AlternateScreen),
            66 => Self::Named(NamedPrivateMode::KeypadApplication),
            69 => Self::Named(NamedPrivateMode::LeftRightMargins),
            1000 => Self::Named(NamedPrivateMode::ReportMouseClicks),
            1002 => Self::Named(NamedPrivateMode::ReportCellMouseMotion),
            1003 => Self::Named(NamedPrivateMode::ReportAllMouseMotion),
            1004 => Self::Named(NamedPrivateMode::ReportFocusInOut),
            1005 => Self::Named(NamedPrivateMode::Utf8Mouse),
            1006 => Self::Named(NamedPrivateMode::SgrMouse),
            1047 => Self::Named(NamedPrivateMode::AlternateScreenClear),
            1049 => Self::Named(NamedPrivateMode::SwapScreenAndSetRestoreCursor),
            2004 => Self::Named(NamedPrivateMode::BracketedPaste),
            2031 => Self::Named(NamedPrivateMode::ThemeUpdates),
            _ => Self::Unknown(mode),
        }
    }

    /// Raw value of the mode.
    #[must_use]
    pub fn raw(self) -> u16 {
        match self {
            Self::Named(named) => named as u16,
            Self::Unknown(mode) => mode,
        }
    }
}

impl From<NamedPrivateMode> for PrivateMode {
    fn from(value: NamedPrivateMode) -> Self {
        Self::Named(value)
    }
}

/// Private DEC modes.
#[repr(u16)]
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum NamedPrivateMode {
    CursorKeys = 1,
    /// DECCOLM. The column switch itself is not performed; setting or
    /// resetting still clears the screen and homes the cursor.
    ColumnMode = 3,
    Origin = 6,
    LineWrap = 7,
    BlinkingCursor = 12,
    ShowCursor = 25,
    AlternateScreen = 47,
    KeypadApplication = 66,
    LeftRightMargins = 69,
    ReportMouseClicks = 1000,
    ReportCellMouseMotion = 1002,
    ReportAllMouseMotion = 1003,
    ReportFocusInOut = 1004,
    Utf8Mouse = 1005,
    SgrMouse = 1006,
    AlternateScreenClear = 1047,
    SwapScreenAndSetRestoreCursor = 1049,
    BracketedPaste = 2004,
    ThemeUpdates = 2031,
}

bitflags! {
    /// Snapshot of the screen's mode flags, read back from the screen for
    /// replies (DECRQM, DSR) and for behaviour that depends on a mode being
    /// in effect (LNM, origin, left/right margins).
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TermModes: u32 {
        const INSERT            = 1 << 0;
        const LINEFEED_NEWLINE  = 1 << 1;
        const CURSOR_KEYS       = 1 << 2;
        const ORIGIN            = 1 << 3;
        const WRAP              = 1 << 4;
        const CURSOR_BLINKING   = 1 << 5;
        const CURSOR_VISIBLE    = 1 << 6;
        const ALTERNATE         = 1 << 7;
        const KEYPAD_APP        = 1 << 8;
        const LR_MARGINS        = 1 << 9;
        const MOUSE_STANDARD    = 1 << 10;
        const MOUSE_BUTTON      = 1 << 11;
        const MOUSE_ALL         = 1 << 12;
        const FOCUS_REPORTING   = 1 << 13;
        const MOUSE_UTF8        = 1 << 14;
        const MOUSE_SGR         = 1 << 15;
        const BRACKETED_PASTE   = 1 << 16;
        const THEME_UPDATES     = 1 << 17;
    }
}

/// Mode for clearing tab stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabClearMode {
    Current,
    All,
}

/// XTMODKEYS modifyOtherKeys state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifyOtherKeys {
    Reset,
    EnableExceptWellDefined,
    EnableAll,
}

/// Reported colour scheme of the attached client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Dark,
    Light,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        for raw in [1u16, 6, 25, 1000, 1049, 2031] {
            assert_eq!(PrivateMode::from_raw(raw).raw(), raw);
        }
        assert!(matches!(PrivateMode::from_raw(4242), PrivateMode::Unknown(4242)));
        assert_eq!(Mode::from_raw(4).raw(), 4);
    }
}
