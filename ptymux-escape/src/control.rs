use std::fmt;

use log::debug;

use crate::actor::ScreenActor;
use crate::mode::TermModes;
use crate::parser::Context;

/// C0 control codes acted on outside of escape sequences. Everything else
/// in the C0 range, NUL included, is ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ControlCode {
    /// (BEL, ^G) Bell.
    Bell,
    /// (BS, ^H) Backspace.
    Backspace,
    /// (HT, ^I) Horizontal tabulation, bounded by the right margin.
    HorizontalTab,
    /// (LF, ^J) Linefeed; adds a carriage return when LNM is set.
    LineFeed,
    /// (VT, ^K) Vertical tabulation, treated as linefeed.
    VerticalTab,
    /// (FF, ^L) Form feed, treated as linefeed.
    FormFeed,
    /// (CR, ^M) Carriage return.
    CarriageReturn,
    /// (SO, ^N) Shift out, GL selects G1.
    ShiftOut,
    /// (SI, ^O) Shift in, GL selects G0.
    ShiftIn,
    /// Any other control byte.
    Unhandled(u8),
}

impl From<u8> for ControlCode {
    fn from(byte: u8) -> Self {
        use ControlCode::*;
        match byte {
            0x07 => Bell,
            0x08 => Backspace,
            0x09 => HorizontalTab,
            0x0a => LineFeed,
            0x0b => VerticalTab,
            0x0c => FormFeed,
            0x0d => CarriageReturn,
            0x0e => ShiftOut,
            0x0f => ShiftIn,
            other => Unhandled(other),
        }
    }
}

impl fmt::Display for ControlCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ControlCode::*;
        let code = match self {
            Bell => "BEL",
            Backspace => "BS",
            HorizontalTab => "HT",
            LineFeed => "LF",
            VerticalTab => "VT",
            FormFeed => "FF",
            CarriageReturn => "CR",
            ShiftOut => "SO",
            ShiftIn => "SI",
            Unhandled(_) => "UNHANDLED",
        };

        match self {
            Unhandled(b) => write!(f, "{code}: 0x{b:02x}"),
            _ => write!(f, "{code}"),
        }
    }
}

pub(crate) fn perform<S: ScreenActor>(byte: u8, ctx: &mut Context, screen: &mut S) {
    let code = ControlCode::from(byte);
    match code {
        ControlCode::Bell => screen.bell(),
        ControlCode::Backspace => screen.backspace(),
        ControlCode::HorizontalTab => screen.next_tab(1),
        ControlCode::LineFeed | ControlCode::VerticalTab | ControlCode::FormFeed => {
            screen.linefeed(ctx.cell.bg);
            if screen.mode_flags().contains(TermModes::LINEFEED_NEWLINE) {
                screen.carriage_return();
            }
        },
        ControlCode::CarriageReturn => screen.carriage_return(),
        ControlCode::ShiftOut => ctx.cell.set = 1,
        ControlCode::ShiftIn => ctx.cell.set = 0,
        ControlCode::Unhandled(_) => {
            debug!("[control] ignoring {code}");
            // Unhandled controls leave the repeat state alone.
            return;
        },
    }

    ctx.last_char = None;
}
