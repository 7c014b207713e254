use crate::level::TermLevel;

/// Extended key reporting (XTMODKEYS) policy.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExtendedKeys {
    #[default]
    Off,
    /// Programs may toggle extended keys on and off.
    On,
    /// Extended keys stay on; reset requests are ignored.
    Always,
}

/// Policy for the `tmux;` DCS passthrough escape.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Passthrough {
    #[default]
    Off,
    On,
    /// Pass through with line wrapping left enabled.
    OnAllowWrap,
}

/// OSC 52 clipboard behaviour.
///
/// `External` is the only policy that answers clipboard queries; `Internal`
/// stores writes without exposing them to the outer terminal.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SetClipboard {
    Off,
    #[default]
    Internal,
    External,
}

/// Configuration consumed by the dispatch layer, resolved once per
/// attachment from the option store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Highest conformance level the attachment may negotiate.
    pub emulation_level: TermLevel,
    pub extended_keys: ExtendedKeys,
    pub allow_passthrough: Passthrough,
    pub allow_set_title: bool,
    pub allow_rename: bool,
    pub automatic_rename: bool,
    /// DECSCUSR fallback style (0..=6) when no explicit style is set.
    pub cursor_style: u8,
    pub set_clipboard: SetClipboard,
    /// Hard cap on string-state payloads.
    pub string_buffer_limit: usize,
    /// Whether sixel payloads are framed and forwarded to the screen.
    pub sixel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            emulation_level: TermLevel::default(),
            extended_keys: ExtendedKeys::default(),
            allow_passthrough: Passthrough::default(),
            allow_set_title: true,
            allow_rename: true,
            automatic_rename: true,
            cursor_style: 0,
            set_clipboard: SetClipboard::default(),
            string_buffer_limit: ptymux_vte::STRING_BUF_LIMIT,
            sixel: false,
        }
    }
}
