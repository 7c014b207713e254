//! Serialization of replies sent back to the attached program.
//!
//! Every encoder here produces the exact ASCII byte sequence for one reply
//! form; queueing on the outbound sink is the caller's business. OSC colour
//! replies duplicate each component (`rgb:RRRR/GGGG/BBBB`) for the nominal
//! 16-bit width and are closed with the same terminator the query used.

use crate::color::Rgb;
use crate::mode::Theme;
use ptymux_vte::StringTerminator;

pub(crate) fn terminator_str(terminator: StringTerminator) -> &'static str {
    match terminator {
        StringTerminator::St => "\x1b\\",
        StringTerminator::Bel => "\x07",
    }
}

/// Secondary device attributes (DA2).
pub(crate) fn secondary_da() -> &'static str {
    "\x1b[>84;0;0c"
}

/// Extended device attributes (XDA), the product name and version.
pub(crate) fn extended_da() -> String {
    format!("\x1bP>|ptymux {}\x1b\\", env!("CARGO_PKG_VERSION"))
}

/// DSR 5 operating-status report.
pub(crate) fn operating_status() -> &'static str {
    "\x1b[0n"
}

/// DSR 6 cursor-position report; coordinates are 1-based.
pub(crate) fn cursor_report(x: usize, y: usize) -> String {
    format!("\x1b[{y};{x}R")
}

/// DSR ?996 theme report.
pub(crate) fn theme_report(theme: Theme) -> String {
    let value = match theme {
        Theme::Dark => 1,
        Theme::Light => 2,
    };
    format!("\x1b[?997;{value}n")
}

/// DECRPM mode report. `value` is 0 (unknown), 2 (set), 3 (permanently
/// set) or 4 (reset).
pub(crate) fn decrpm(private: bool, mode: u16, value: u8) -> String {
    let prefix = if private { "?" } else { "" };
    format!("\x1b[{prefix}{mode};{value}$y")
}

/// DECRPSS carrying a recognized setting.
pub(crate) fn decrpss_ok(payload: &str) -> String {
    format!("\x1bP1$r{payload}\x1b\\")
}

/// DECRPSS for an unrecognized request.
pub(crate) fn decrpss_unknown() -> &'static str {
    "\x1bP0$r\x1b\\"
}

/// Presentation state report envelope (`DCS Ps $ u`), answering DECRQPSR.
pub(crate) fn presentation_report(ps: u8, payload: &str) -> String {
    format!("\x1bP{ps}$u{payload}\x1b\\")
}

/// Terminal state report envelope (`DCS Ps $ s`), answering DECRQTSR.
pub(crate) fn terminal_state_report(ps: u8, payload: &str) -> String {
    format!("\x1bP{ps}$s{payload}\x1b\\")
}

/// Window operation report (`CSI code ; a ; b t`).
pub(crate) fn window_report(code: u8, a: usize, b: usize) -> String {
    format!("\x1b[{code};{a};{b}t")
}

/// An X11 colour specification with 16-bit nominal component width.
pub(crate) fn rgb_spec(rgb: Rgb) -> String {
    format!(
        "rgb:{r:02x}{r:02x}/{g:02x}{g:02x}/{b:02x}{b:02x}",
        r = rgb.r,
        g = rgb.g,
        b = rgb.b
    )
}

/// OSC 4 palette query reply.
pub(crate) fn palette_reply(index: usize, rgb: Rgb, terminator: StringTerminator) -> String {
    format!(
        "\x1b]4;{index};{}{}",
        rgb_spec(rgb),
        terminator_str(terminator)
    )
}

/// OSC 10/11/12 colour query reply.
pub(crate) fn special_color_reply(ps: u8, rgb: Rgb, terminator: StringTerminator) -> String {
    format!("\x1b]{ps};{}{}", rgb_spec(rgb), terminator_str(terminator))
}

/// OSC 52 clipboard query reply with base64 payload.
pub(crate) fn clipboard_reply(cfg: &str, base64: &str, terminator: StringTerminator) -> String {
    format!("\x1b]52;{cfg};{base64}{}", terminator_str(terminator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn colour_components_are_duplicated() {
        assert_eq!(rgb_spec(Rgb::new(0xff, 0x80, 0x00)), "rgb:ffff/8080/0000");
    }

    #[test]
    fn palette_reply_matches_terminator() {
        assert_eq!(
            palette_reply(1, Rgb::new(0xaa, 0xbb, 0xcc), StringTerminator::Bel),
            "\x1b]4;1;rgb:aaaa/bbbb/cccc\x07"
        );
        assert_eq!(
            palette_reply(1, Rgb::new(0xaa, 0xbb, 0xcc), StringTerminator::St),
            "\x1b]4;1;rgb:aaaa/bbbb/cccc\x1b\\"
        );
    }

    #[test]
    fn mode_reports() {
        assert_eq!(decrpm(false, 4, 2), "\x1b[4;2$y");
        assert_eq!(decrpm(true, 25, 4), "\x1b[?25;4$y");
    }

    #[test]
    fn cursor_and_status() {
        assert_eq!(cursor_report(10, 5), "\x1b[5;10R");
        assert_eq!(operating_status(), "\x1b[0n");
        assert_eq!(theme_report(Theme::Dark), "\x1b[?997;1n");
        assert_eq!(theme_report(Theme::Light), "\x1b[?997;2n");
    }

    #[test]
    fn settings_report_envelopes() {
        assert_eq!(decrpss_ok("64;1\"p"), "\x1bP1$r64;1\"p\x1b\\");
        assert_eq!(decrpss_unknown(), "\x1bP0$r\x1b\\");
        assert_eq!(presentation_report(2, "9/17"), "\x1bP2$u9/17\x1b\\");
        assert_eq!(terminal_state_report(1, ""), "\x1bP1$s\x1b\\");
    }
}
