use log::debug;

use crate::actor::ScreenActor;
use crate::mode::{NamedPrivateMode, TermModes};
use crate::parser::{Context, SavedCursor};

/// Simple escape commands, keyed by final byte and intermediates.
#[derive(Debug, Clone, PartialEq, Eq)]
enum EscSequence {
    /// IND - move the cursor down one line, scrolling if necessary.
    Index,
    /// NEL - linefeed plus carriage return.
    NextLine,
    /// HTS - set a horizontal tab stop at the cursor column.
    HorizontalTabSet,
    /// RI - move the cursor up one line, scrolling if necessary.
    ReverseIndex,
    /// ST - string terminator; the state change already consumed it.
    StringTerminator,
    /// RIS - full reset.
    FullReset,
    /// DECSC - save cursor position, cell and origin mode.
    SaveCursor,
    /// DECRC - restore the saved cursor state.
    RestoreCursor,
    /// DECKPAM - application keypad.
    KeypadApplicationMode,
    /// DECKPNM - numeric keypad.
    KeypadNumericMode,
    /// DECBI - back index (VT220 and up).
    BackIndex,
    /// DECFI - forward index (VT220 and up).
    ForwardIndex,
    /// DECALN - screen alignment test pattern.
    AlignmentTest,
    /// Designate line drawing or ASCII on G0/G1.
    Designate { g1: bool, acs: bool },
    Unknown,
}

impl EscSequence {
    fn from_parts(intermediates: &[u8], byte: u8) -> Self {
        match (intermediates, byte) {
            (b"", b'D') => Self::Index,
            (b"", b'E') => Self::NextLine,
            (b"", b'H') => Self::HorizontalTabSet,
            (b"", b'M') => Self::ReverseIndex,
            (b"", b'\\') => Self::StringTerminator,
            (b"", b'c') => Self::FullReset,
            (b"", b'7') => Self::SaveCursor,
            (b"", b'8') => Self::RestoreCursor,
            (b"", b'=') => Self::KeypadApplicationMode,
            (b"", b'>') => Self::KeypadNumericMode,
            (b"", b'6') => Self::BackIndex,
            (b"", b'9') => Self::ForwardIndex,
            (b"#", b'8') => Self::AlignmentTest,
            (b"(", b'0') => Self::Designate { g1: false, acs: true },
            (b"(", b'B') => Self::Designate { g1: false, acs: false },
            (b")", b'0') => Self::Designate { g1: true, acs: true },
            (b")", b'B') => Self::Designate { g1: true, acs: false },
            _ => Self::Unknown,
        }
    }
}

pub(crate) fn perform<S: ScreenActor>(
    ctx: &mut Context,
    screen: &mut S,
    intermediates: &[u8],
    byte: u8,
) {
    match EscSequence::from_parts(intermediates, byte) {
        EscSequence::Index => screen.linefeed(ctx.cell.bg),
        EscSequence::NextLine => {
            screen.linefeed(ctx.cell.bg);
            screen.carriage_return();
        },
        EscSequence::HorizontalTabSet => screen.set_tab(),
        EscSequence::ReverseIndex => screen.reverse_index(ctx.cell.bg),
        EscSequence::StringTerminator => return,
        EscSequence::FullReset => {
            ctx.cell = Default::default();
            ctx.saved = SavedCursor::default();
            ctx.cursor_style = None;
            ctx.level = ctx.max_level;
            screen.palette_reset_all();
            screen.reset();
            screen.full_redraw();
        },
        EscSequence::SaveCursor => save_cursor(ctx, screen),
        EscSequence::RestoreCursor => restore_cursor(ctx, screen),
        EscSequence::KeypadApplicationMode => {
            screen.set_private_mode(NamedPrivateMode::KeypadApplication.into());
        },
        EscSequence::KeypadNumericMode => {
            screen.clear_private_mode(NamedPrivateMode::KeypadApplication.into());
        },
        EscSequence::BackIndex => {
            if ctx.level.is_vt220() {
                screen.back_index(ctx.cell.bg);
            }
        },
        EscSequence::ForwardIndex => {
            if ctx.level.is_vt220() {
                screen.forward_index(ctx.cell.bg);
            }
        },
        EscSequence::AlignmentTest => screen.alignment_test(),
        EscSequence::Designate { g1: false, acs } => ctx.cell.g0_is_acs = acs,
        EscSequence::Designate { g1: true, acs } => ctx.cell.g1_is_acs = acs,
        EscSequence::Unknown => {
            debug!(
                "[esc] unknown sequence: {:?} {:?}",
                intermediates, byte as char
            );
            return;
        },
    }

    ctx.last_char = None;
}

pub(crate) fn save_cursor<S: ScreenActor>(ctx: &mut Context, screen: &mut S) {
    let (cx, cy) = screen.cursor();
    ctx.saved = SavedCursor {
        cell: ctx.cell.clone(),
        cx,
        cy,
        origin: screen.mode_flags().contains(TermModes::ORIGIN),
    };
}

pub(crate) fn restore_cursor<S: ScreenActor>(ctx: &mut Context, screen: &mut S) {
    let saved = ctx.saved.clone();
    ctx.cell = saved.cell;

    if saved.origin {
        screen.set_private_mode(NamedPrivateMode::Origin.into());
    } else {
        screen.clear_private_mode(NamedPrivateMode::Origin.into());
    }
    screen.cursor_move(Some(saved.cx), Some(saved.cy), false);
}
