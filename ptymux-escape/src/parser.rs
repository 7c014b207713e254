use std::collections::VecDeque;

use ptymux_vte::{
    Actor as VtActor, Params, Parser as VtParser, StdWatchdog, StringTerminator, Timeout,
};

use crate::actor::ScreenActor;
use crate::cell::CellStyle;
use crate::charset::Charset;
use crate::level::TermLevel;
use crate::options::Options;
use crate::{control, csi, dcs, decrqss, esc, osc};

/// Cursor state saved by DECSC and restored by DECRC.
#[derive(Debug, Default, Clone)]
pub(crate) struct SavedCursor {
    pub(crate) cell: CellStyle,
    pub(crate) cx: usize,
    pub(crate) cy: usize,
    pub(crate) origin: bool,
}

/// Mutable dispatch state owned by one attachment: the negotiated level,
/// the current and saved cell, the repeat state and the reply queue.
pub(crate) struct Context {
    pub(crate) level: TermLevel,
    pub(crate) max_level: TermLevel,
    pub(crate) cell: CellStyle,
    pub(crate) saved: SavedCursor,
    pub(crate) last_char: Option<char>,
    pub(crate) cursor_style: Option<u8>,
    replies: VecDeque<u8>,
}

impl Context {
    fn new(level: TermLevel) -> Self {
        Self {
            level,
            max_level: level,
            cell: CellStyle::default(),
            saved: SavedCursor::default(),
            last_char: None,
            cursor_style: None,
            replies: VecDeque::new(),
        }
    }

    /// Queue a reply on the outbound sink.
    pub(crate) fn reply(&mut self, bytes: impl AsRef<[u8]>) {
        self.replies.extend(bytes.as_ref().iter().copied());
    }
}

/// Control-sequence dispatcher for one terminal attachment.
///
/// Wraps the byte-level state machine and turns completed sequences into
/// screen effects and replies. Replies accumulate in an internal queue the
/// owner drains to the pty after each feed.
pub struct Parser<T: Timeout = StdWatchdog> {
    vt: VtParser<T>,
    ctx: Context,
    options: Options,
}

impl Default for Parser<StdWatchdog> {
    fn default() -> Self {
        Self::new(Options::default())
    }
}

impl<T: Timeout> Parser<T> {
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self {
            vt: VtParser::with_string_limit(options.string_buffer_limit),
            ctx: Context::new(options.emulation_level),
            options,
        }
    }

    /// Feed a chunk of bytes from the pty.
    pub fn advance<S: ScreenActor>(&mut self, bytes: &[u8], screen: &mut S) {
        let mut performer = Performer {
            ctx: &mut self.ctx,
            options: &self.options,
            screen,
        };
        self.vt.advance(bytes, &mut performer);
    }

    /// Watchdog expiry callback; abandons a stuck string state.
    pub fn expire_watchdog(&mut self) {
        self.vt.expire_watchdog();
    }

    /// Queued reply bytes, in dispatch order, leaving the queue empty.
    pub fn take_replies(&mut self) -> Vec<u8> {
        self.ctx.replies.drain(..).collect()
    }

    /// Whether the state machine sits in ground state.
    #[must_use]
    pub fn is_ground(&self) -> bool {
        self.vt.is_ground()
    }

    /// Bytes consumed since ground was left, for attaching control clients.
    #[must_use]
    pub fn since_ground(&self) -> &[u8] {
        self.vt.since_ground()
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Reset the attachment to its initial state, dropping any sequence in
    /// flight and queued replies.
    pub fn reset(&mut self) {
        self.vt.reset();
        self.ctx = Context::new(self.options.emulation_level);
    }
}

struct Performer<'a, S: ScreenActor> {
    ctx: &'a mut Context,
    options: &'a Options,
    screen: &'a mut S,
}

impl<S: ScreenActor> Performer<'_, S> {
    fn active_charset(&self) -> Charset {
        let acs = if self.ctx.cell.set == 0 {
            self.ctx.cell.g0_is_acs
        } else {
            self.ctx.cell.g1_is_acs
        };
        if acs { Charset::DecLineDrawing } else { Charset::Ascii }
    }
}

impl<S: ScreenActor> VtActor for Performer<'_, S> {
    fn print(&mut self, c: char) {
        let mapped = self.active_charset().map(c);
        self.screen.collect_add(mapped, &self.ctx.cell);
        self.ctx.last_char = Some(mapped);
    }

    fn execute(&mut self, byte: u8) {
        self.screen.collect_end();
        control::perform(byte, self.ctx, self.screen);
    }

    fn esc_dispatch(&mut self, intermediates: &[u8], byte: u8) {
        self.screen.collect_end();
        esc::perform(self.ctx, self.screen, intermediates, byte);
    }

    fn csi_dispatch(&mut self, params: &Params, intermediates: &[u8], byte: u8) {
        self.screen.collect_end();
        csi::perform(self.ctx, self.options, self.screen, params, intermediates, byte);
    }

    fn dcs_dispatch(&mut self, params: &Params, intermediates: &[u8], payload: &[u8]) {
        self.screen.collect_end();
        dcs::perform(self.ctx, self.options, self.screen, params, intermediates, payload);
        self.ctx.last_char = None;
    }

    fn decrqss_dispatch(&mut self, params: &Params, intermediates: &[u8], byte: u8) {
        self.screen.collect_end();
        decrqss::perform(self.ctx, self.options, self.screen, params, intermediates, byte);
        self.ctx.last_char = None;
    }

    fn osc_dispatch(&mut self, payload: &[u8], terminator: StringTerminator) {
        self.screen.collect_end();
        osc::perform(self.ctx, self.options, self.screen, payload, terminator);
        self.ctx.last_char = None;
    }

    fn apc_dispatch(&mut self, payload: &[u8]) {
        self.screen.collect_end();
        osc::perform_apc(self.screen, payload);
        self.ctx.last_char = None;
    }

    fn rename_dispatch(&mut self, payload: &[u8]) {
        self.screen.collect_end();
        osc::perform_rename(self.options, self.screen, payload);
        self.ctx.last_char = None;
    }
}
