//! Settings queries (`DCS $ q … ST`) and their DECRPSS replies.
//!
//! The query payload is parsed with the CSI collector rules by the state
//! machine; this module identifies the requested setting from the final
//! byte and intermediates and reconstructs its current value. Unknown
//! settings answer with the failure envelope.

use std::fmt::Write;

use log::debug;
use ptymux_vte::Params;

use crate::actor::ScreenActor;
use crate::cell::{CellAttrs, CellStyle, UnderlineStyle};
use crate::color::Color;
use crate::options::Options;
use crate::parser::Context;
use crate::reply;

pub(crate) fn perform<S: ScreenActor>(
    ctx: &mut Context,
    options: &Options,
    screen: &mut S,
    _params: &Params,
    intermediates: &[u8],
    byte: u8,
) {
    let payload = match (intermediates, byte) {
        // DECSCA
        (b"\"", b'q') => {
            let protected = ctx.cell.attrs.contains(CellAttrs::PROTECTED);
            Some(format!("0;{}\"q", if protected { 1 } else { 2 }))
        },
        // DECSCL
        (b"\"", b'p') => {
            let level = if ctx.level.is_vt220() { 62 } else { 61 };
            Some(format!("{level}\"p"))
        },
        // DECSCUSR, falling back to the configured style when none is set.
        (b" ", b'q') => {
            let style = ctx
                .cursor_style
                .unwrap_or_else(|| options.cursor_style.min(6));
            Some(format!("{style} q"))
        },
        // DECSLRM
        (b"", b's') => {
            let (_, _, left, right) = screen.margins();
            Some(format!("{};{}s", left + 1, right + 1))
        },
        // DECSTBM
        (b"", b'r') => {
            let (top, bottom, _, _) = screen.margins();
            Some(format!("{};{}r", top + 1, bottom + 1))
        },
        // SGR
        (b"", b'm') => Some(sgr_payload(&ctx.cell)),
        _ => {
            debug!(
                "[decrqss] unknown setting: {:?} {:?}",
                intermediates, byte as char
            );
            None
        },
    };

    match payload {
        Some(payload) => ctx.reply(reply::decrpss_ok(&payload)),
        None => ctx.reply(reply::decrpss_unknown()),
    }
}

/// Rebuild the current graphic rendition as an SGR sequence body. Colours
/// use the colon-subparameter forms so the reply survives a round trip
/// through the CSI parser unchanged.
fn sgr_payload(cell: &CellStyle) -> String {
    let mut codes = String::from("0");

    if cell.attrs.contains(CellAttrs::BOLD) {
        codes.push_str(";1");
    }
    if cell.attrs.contains(CellAttrs::DIM) {
        codes.push_str(";2");
    }
    if cell.attrs.contains(CellAttrs::ITALIC) {
        codes.push_str(";3");
    }
    match cell.underline_style {
        UnderlineStyle::None => {},
        UnderlineStyle::Single => codes.push_str(";4"),
        style => {
            let _ = write!(codes, ";4:{}", style.subparam());
        },
    }
    if cell.attrs.contains(CellAttrs::BLINK) {
        codes.push_str(";5");
    }
    if cell.attrs.contains(CellAttrs::REVERSE) {
        codes.push_str(";7");
    }
    if cell.attrs.contains(CellAttrs::HIDDEN) {
        codes.push_str(";8");
    }
    if cell.attrs.contains(CellAttrs::STRIKETHROUGH) {
        codes.push_str(";9");
    }

    push_color(&mut codes, cell.fg, 30, 38);
    push_color(&mut codes, cell.bg, 40, 48);
    if cell.underline_color != Color::Default {
        push_color(&mut codes, cell.underline_color, 0, 58);
    }

    codes.push('m');
    codes
}

/// Append one colour: basic and bright codes for the first sixteen palette
/// entries (when a basic base exists), colon forms otherwise.
fn push_color(codes: &mut String, color: Color, basic_base: u16, extended: u16) {
    match color {
        Color::Default => {},
        Color::Indexed(i @ 0..=7) if basic_base != 0 => {
            let _ = write!(codes, ";{}", basic_base + u16::from(i));
        },
        Color::Indexed(i @ 8..=15) if basic_base != 0 => {
            let _ = write!(codes, ";{}", basic_base + 60 + u16::from(i - 8));
        },
        Color::Indexed(i) => {
            let _ = write!(codes, ";{extended}:5:{i}");
        },
        Color::Rgb(rgb) => {
            let _ = write!(codes, ";{extended}:2:0:{}:{}:{}", rgb.r, rgb.g, rgb.b);
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;

    #[test]
    fn default_cell_is_plain_reset() {
        assert_eq!(sgr_payload(&CellStyle::default()), "0m");
    }

    #[test]
    fn bright_rgb_cell_uses_colon_forms() {
        let mut cell = CellStyle::default();
        cell.attrs.insert(CellAttrs::BOLD);
        cell.fg = Color::Rgb(Rgb::new(1, 2, 3));

        let payload = sgr_payload(&cell);
        assert_eq!(payload, "0;1;38:2:0:1:2:3m");
    }

    #[test]
    fn basic_colours_use_basic_codes() {
        let mut cell = CellStyle::default();
        cell.fg = Color::Indexed(1);
        cell.bg = Color::Indexed(12);
        assert_eq!(sgr_payload(&cell), "0;31;104m");
    }

    #[test]
    fn underline_styles_and_colour() {
        let mut cell = CellStyle::default();
        cell.attrs.insert(CellAttrs::UNDERLINE);
        cell.underline_style = UnderlineStyle::Curly;
        cell.underline_color = Color::Indexed(196);
        assert_eq!(sgr_payload(&cell), "0;4:3;58:5:196m");
    }
}
