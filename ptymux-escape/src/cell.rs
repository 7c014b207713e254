use bitflags::bitflags;

use crate::color::Color;

bitflags! {
    /// Graphic rendition flags carried by the current cell.
    #[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CellAttrs: u16 {
        const BOLD          = 0b0000_0000_0001;
        const DIM           = 0b0000_0000_0010;
        const ITALIC        = 0b0000_0000_0100;
        const UNDERLINE     = 0b0000_0000_1000;
        const BLINK         = 0b0000_0001_0000;
        const REVERSE       = 0b0000_0010_0000;
        const HIDDEN        = 0b0000_0100_0000;
        const STRIKETHROUGH = 0b0000_1000_0000;
        /// DECSCA guarded character, exempt from selective erase.
        const PROTECTED     = 0b0001_0000_0000;
    }
}

/// Shape of the underline attribute, settable through `SGR 4:n`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum UnderlineStyle {
    #[default]
    None,
    Single,
    Double,
    Curly,
    Dotted,
    Dashed,
}

impl UnderlineStyle {
    /// The `4:n` subparameter selecting this style.
    #[must_use]
    pub(crate) fn from_subparam(n: i32) -> Option<Self> {
        match n {
            0 => Some(Self::None),
            1 => Some(Self::Single),
            2 => Some(Self::Double),
            3 => Some(Self::Curly),
            4 => Some(Self::Dotted),
            5 => Some(Self::Dashed),
            _ => None,
        }
    }

    #[must_use]
    pub(crate) fn subparam(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Single => 1,
            Self::Double => 2,
            Self::Curly => 3,
            Self::Dotted => 4,
            Self::Dashed => 5,
        }
    }
}

/// Hyperlink attached to printed cells through OSC 8. Interning into the
/// shared hyperlink table is left to the screen; the style carries the link
/// by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hyperlink {
    /// Optional `id=` grouping parameter.
    pub id: Option<String>,
    /// Target URI.
    pub uri: String,
}

/// The style applied to printed characters: the default grid cell plus the
/// GL selector and the two line-drawing designations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CellStyle {
    pub attrs: CellAttrs,
    pub fg: Color,
    pub bg: Color,
    pub underline_color: Color,
    pub underline_style: UnderlineStyle,
    pub link: Option<Hyperlink>,
    /// Which half of the character set GL currently selects (0 or 1).
    pub set: u8,
    pub g0_is_acs: bool,
    pub g1_is_acs: bool,
}

impl CellStyle {
    /// Reset the graphic rendition to defaults. The hyperlink and charset
    /// state survive `SGR 0`.
    pub fn reset_rendition(&mut self) {
        self.attrs = CellAttrs::default();
        self.fg = Color::Default;
        self.bg = Color::Default;
        self.underline_color = Color::Default;
        self.underline_style = UnderlineStyle::None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendition_reset_keeps_link_and_charsets() {
        let mut cell = CellStyle {
            attrs: CellAttrs::BOLD | CellAttrs::REVERSE,
            fg: Color::Indexed(4),
            link: Some(Hyperlink {
                id: None,
                uri: "https://example.org".into(),
            }),
            g1_is_acs: true,
            ..Default::default()
        };

        cell.reset_rendition();
        assert_eq!(cell.attrs, CellAttrs::default());
        assert_eq!(cell.fg, Color::Default);
        assert!(cell.link.is_some());
        assert!(cell.g1_is_acs);
    }
}
