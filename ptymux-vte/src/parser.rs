//! The feed loop: classify each byte against the current state, run the
//! transition action, switch states, and keep the replay log for control
//! clients that attach mid-sequence.

use crate::actor::Actor;
use crate::enums::{Action, State, StringTerminator};
use crate::params::{Intermediates, ParamBuf};
use crate::timeout::{StdWatchdog, Timeout, WATCHDOG_TIMEOUT};
use crate::transitions;
use crate::utf8::Utf8Decoder;
use log::debug;

/// Initial capacity of the string-state buffer; ground entry shrinks the
/// buffer back to this size.
const STRING_BUF_START: usize = 32;

/// Default hard cap for string-state payloads (1 MiB). Bytes past the cap
/// raise the discard flag and the sequence completes without effect.
pub const STRING_BUF_LIMIT: usize = 0x0010_0000;

/// Control-sequence parser for one terminal attachment.
///
/// The parser owns all collection buffers and is driven from a single event
/// loop; a call to [`advance`](Self::advance) runs each byte to completion
/// before the next is considered. No input is ever rejected: unknown
/// sequences are logged by the dispatch layer and dropped.
pub struct Parser<T: Timeout = StdWatchdog> {
    state: State,
    intermediates: Intermediates,
    params: ParamBuf,
    string_buf: Vec<u8>,
    string_limit: usize,
    string_end: StringTerminator,
    since_ground: Vec<u8>,
    utf8: Utf8Decoder,
    discard: bool,
    watchdog: T,
}

impl<T: Timeout> Default for Parser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Timeout> Parser<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_string_limit(STRING_BUF_LIMIT)
    }

    /// Create a parser with a custom string-state payload cap.
    #[must_use]
    pub fn with_string_limit(limit: usize) -> Self {
        Self {
            state: State::default(),
            intermediates: Intermediates::default(),
            params: ParamBuf::default(),
            string_buf: Vec::with_capacity(STRING_BUF_START),
            string_limit: limit,
            string_end: StringTerminator::default(),
            since_ground: Vec::new(),
            utf8: Utf8Decoder::default(),
            discard: false,
            watchdog: T::default(),
        }
    }

    /// Whether the parser is in ground state.
    #[must_use]
    pub fn is_ground(&self) -> bool {
        self.state == State::Ground
    }

    /// Bytes consumed since the parser last left ground state. Replayed to
    /// control clients that attach in the middle of a sequence; empty
    /// whenever the parser is in ground.
    #[must_use]
    pub fn since_ground(&self) -> &[u8] {
        &self.since_ground
    }

    /// The watchdog guarding the string states.
    #[must_use]
    pub fn watchdog(&self) -> &T {
        &self.watchdog
    }

    /// Drop any state back to ground, as if the byte stream had started
    /// fresh. Collected payloads are discarded without dispatch.
    pub fn reset(&mut self) {
        let limit = self.string_limit;
        *self = Self::with_string_limit(limit);
    }

    /// Advance the parser with a chunk of bytes from the pty.
    pub fn advance<A: Actor>(&mut self, bytes: &[u8], actor: &mut A) {
        if self.watchdog.pending_timeout() && self.watchdog.expired() {
            self.abort_string_state();
        }

        for &byte in bytes {
            self.advance_byte(byte, actor);
        }
    }

    /// Watchdog expiry callback for the owning event loop: a string state
    /// that sat for five seconds without terminating is abandoned.
    pub fn expire_watchdog(&mut self) {
        if self.watchdog.pending_timeout() {
            self.abort_string_state();
        }
    }

    fn advance_byte<A: Actor>(&mut self, byte: u8, actor: &mut A) {
        let (mut next, action) = transitions::transit(self.state, byte);

        // Anything but a continuation stops UTF-8 reassembly; the partial
        // code point surfaces as U+FFFD before the byte is processed.
        if self.utf8.in_progress() && action != Action::Utf8 {
            actor.print(char::REPLACEMENT_CHARACTER);
            self.utf8.reset();
        }

        if let Some(redirect) = self.perform(action, byte, actor) {
            next = redirect;
        }

        if next != self.state {
            self.exit_state(self.state, actor);
            self.state = next;
            self.enter_state(next);
        }

        if self.state != State::Ground {
            self.since_ground.push(byte);
        }
    }

    fn perform<A: Actor>(&mut self, action: Action, byte: u8, actor: &mut A) -> Option<State> {
        use Action::*;

        match action {
            None | Ignore | Clear => {},
            Print => actor.print(byte as char),
            Utf8 => {
                if let Some(c) = self.utf8.advance(byte) {
                    actor.print(c);
                }
            },
            Execute => actor.execute(byte),
            Collect => {
                if !self.intermediates.push(byte) {
                    self.discard = true;
                }
            },
            Param => {
                if !self.params.push(byte) {
                    self.discard = true;
                }
            },
            EscDispatch => self.esc_dispatch(byte, actor),
            CsiDispatch => self.csi_dispatch(byte, actor),
            DcsFinal => return self.dcs_final(byte),
            DcsPut => self.string_put(byte),
            DcsDispatch => self.dcs_dispatch(actor),
            DecrqssFinal => self.decrqss_dispatch(byte, actor),
            StringPut => self.string_put(byte),
            StringEndBel => self.string_end = StringTerminator::Bel,
        }

        Option::None
    }

    fn exit_state<A: Actor>(&mut self, state: State, actor: &mut A) {
        if self.discard {
            return;
        }

        match state {
            State::OscString => actor.osc_dispatch(&self.string_buf, self.string_end),
            State::ApcString => actor.apc_dispatch(&self.string_buf),
            State::RenameString => actor.rename_dispatch(&self.string_buf),
            _ => {},
        }
    }

    fn enter_state(&mut self, state: State) {
        if state == State::Ground {
            self.watchdog.clear_timeout();
            self.since_ground.clear();
            self.shrink_string_buf();
            return;
        }

        if transitions::entry_action(state) == Action::Clear {
            self.intermediates.clear();
            self.params.clear();
            self.string_buf.clear();
            self.discard = false;
            self.watchdog.clear_timeout();
        }

        match state {
            State::OscString => {
                self.string_end = StringTerminator::St;
                self.watchdog.set_timeout(WATCHDOG_TIMEOUT);
            },
            State::DcsEnter | State::ApcString | State::RenameString => {
                self.watchdog.set_timeout(WATCHDOG_TIMEOUT);
            },
            _ => {},
        }
    }

    /// The DCS final byte. `DCS $ q` introduces a settings query and is
    /// routed to the query sub-parser; anything else begins payload
    /// collection with the final byte as the payload's first byte.
    fn dcs_final(&mut self, byte: u8) -> Option<State> {
        if self.intermediates.get() == b"$" && byte == b'q' {
            return Some(State::DecrqssEnter);
        }

        self.string_put(byte);
        Option::None
    }

    fn string_put(&mut self, byte: u8) {
        if self.discard {
            return;
        }
        if self.string_buf.len() >= self.string_limit {
            debug!("string payload exceeds {} bytes, discarding", self.string_limit);
            self.discard = true;
            return;
        }
        self.string_buf.push(byte);
    }

    fn esc_dispatch<A: Actor>(&mut self, byte: u8, actor: &mut A) {
        if self.discard {
            return;
        }
        actor.esc_dispatch(self.intermediates.get(), byte);
    }

    fn csi_dispatch<A: Actor>(&mut self, byte: u8, actor: &mut A) {
        if self.discard {
            return;
        }
        match self.params.split() {
            Some(params) => actor.csi_dispatch(&params, self.intermediates.get(), byte),
            Option::None => debug!("dropping malformed control sequence"),
        }
    }

    fn dcs_dispatch<A: Actor>(&mut self, actor: &mut A) {
        if self.discard {
            return;
        }
        match self.params.split() {
            Some(params) => {
                actor.dcs_dispatch(&params, self.intermediates.get(), &self.string_buf);
            },
            Option::None => debug!("dropping malformed device control string"),
        }
    }

    fn decrqss_dispatch<A: Actor>(&mut self, byte: u8, actor: &mut A) {
        if self.discard {
            return;
        }
        match self.params.split() {
            Some(params) => {
                actor.decrqss_dispatch(&params, self.intermediates.get(), byte);
            },
            Option::None => debug!("dropping malformed settings query"),
        }
    }

    fn abort_string_state(&mut self) {
        debug!("string state timed out, dropping back to ground");
        self.state = State::Ground;
        self.discard = false;
        self.intermediates.clear();
        self.params.clear();
        self.watchdog.clear_timeout();
        self.since_ground.clear();
        self.shrink_string_buf();
    }

    fn shrink_string_buf(&mut self) {
        if self.string_buf.capacity() > STRING_BUF_START {
            self.string_buf = Vec::with_capacity(STRING_BUF_START);
        } else {
            self.string_buf.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Param;
    use std::time::Duration;

    #[derive(Debug, PartialEq, Eq)]
    enum Event {
        Print(char),
        Execute(u8),
        Esc { intermediates: Vec<u8>, byte: u8 },
        Csi { params: Vec<Param>, intermediates: Vec<u8>, byte: u8 },
        Dcs { params: Vec<Param>, intermediates: Vec<u8>, payload: Vec<u8> },
        Decrqss { intermediates: Vec<u8>, byte: u8 },
        Osc { payload: Vec<u8>, terminator: StringTerminator },
        Apc(Vec<u8>),
        Rename(Vec<u8>),
    }

    #[derive(Default)]
    struct CollectingActor {
        events: Vec<Event>,
    }

    impl Actor for CollectingActor {
        fn print(&mut self, c: char) {
            self.events.push(Event::Print(c));
        }

        fn execute(&mut self, byte: u8) {
            self.events.push(Event::Execute(byte));
        }

        fn esc_dispatch(&mut self, intermediates: &[u8], byte: u8) {
            self.events.push(Event::Esc {
                intermediates: intermediates.to_vec(),
                byte,
            });
        }

        fn csi_dispatch(&mut self, params: &crate::Params, intermediates: &[u8], byte: u8) {
            self.events.push(Event::Csi {
                params: params.items().to_vec(),
                intermediates: intermediates.to_vec(),
                byte,
            });
        }

        fn dcs_dispatch(&mut self, params: &crate::Params, intermediates: &[u8], payload: &[u8]) {
            self.events.push(Event::Dcs {
                params: params.items().to_vec(),
                intermediates: intermediates.to_vec(),
                payload: payload.to_vec(),
            });
        }

        fn decrqss_dispatch(&mut self, _params: &crate::Params, intermediates: &[u8], byte: u8) {
            self.events.push(Event::Decrqss {
                intermediates: intermediates.to_vec(),
                byte,
            });
        }

        fn osc_dispatch(&mut self, payload: &[u8], terminator: StringTerminator) {
            self.events.push(Event::Osc {
                payload: payload.to_vec(),
                terminator,
            });
        }

        fn apc_dispatch(&mut self, payload: &[u8]) {
            self.events.push(Event::Apc(payload.to_vec()));
        }

        fn rename_dispatch(&mut self, payload: &[u8]) {
            self.events.push(Event::Rename(payload.to_vec()));
        }
    }

    /// Watchdog that can be forced to expire from a test.
    #[derive(Default)]
    struct FakeWatchdog {
        armed: bool,
        expired: bool,
    }

    impl Timeout for FakeWatchdog {
        fn set_timeout(&mut self, _duration: Duration) {
            self.armed = true;
        }

        fn clear_timeout(&mut self) {
            self.armed = false;
            self.expired = false;
        }

        fn pending_timeout(&self) -> bool {
            self.armed
        }

        fn expired(&self) -> bool {
            self.expired
        }
    }

    fn parse(bytes: &[u8]) -> Vec<Event> {
        let mut parser: Parser = Parser::new();
        let mut actor = CollectingActor::default();
        parser.advance(bytes, &mut actor);
        actor.events
    }

    #[test]
    fn printable_and_controls() {
        assert_eq!(
            parse(b"hi\x07"),
            vec![Event::Print('h'), Event::Print('i'), Event::Execute(0x07)]
        );
    }

    #[test]
    fn csi_with_params() {
        assert_eq!(
            parse(b"\x1b[5;10H"),
            vec![Event::Csi {
                params: vec![Param::Number(5), Param::Number(10)],
                intermediates: vec![],
                byte: b'H',
            }]
        );
    }

    #[test]
    fn csi_private_prefix_is_intermediate() {
        assert_eq!(
            parse(b"\x1b[?25h"),
            vec![Event::Csi {
                params: vec![Param::Number(25)],
                intermediates: vec![b'?'],
                byte: b'h',
            }]
        );
    }

    #[test]
    fn csi_colon_field_stays_text() {
        assert_eq!(
            parse(b"\x1b[4:3m"),
            vec![Event::Csi {
                params: vec![Param::Text("4:3".into())],
                intermediates: vec![],
                byte: b'm',
            }]
        );
    }

    #[test]
    fn osc_terminated_by_bel_and_st() {
        assert_eq!(
            parse(b"\x1b]0;hello\x07"),
            vec![Event::Osc {
                payload: b"0;hello".to_vec(),
                terminator: StringTerminator::Bel,
            }]
        );
        assert_eq!(
            parse(b"\x1b]0;hello\x1b\\"),
            vec![
                Event::Osc {
                    payload: b"0;hello".to_vec(),
                    terminator: StringTerminator::St,
                },
                Event::Esc {
                    intermediates: vec![],
                    byte: b'\\',
                },
            ]
        );
    }

    #[test]
    fn dcs_payload_begins_with_final() {
        assert_eq!(
            parse(b"\x1bPtmux;hello\x1b\\"),
            vec![Event::Dcs {
                params: vec![],
                intermediates: vec![],
                payload: b"tmux;hello".to_vec(),
            }]
        );
    }

    #[test]
    fn dcs_payload_undoubles_embedded_escapes() {
        assert_eq!(
            parse(b"\x1bPtmux;\x1b\x1b[31m\x1b\\"),
            vec![Event::Dcs {
                params: vec![],
                intermediates: vec![],
                payload: b"tmux;\x1b[31m".to_vec(),
            }]
        );
    }

    #[test]
    fn settings_query_reaches_sub_parser() {
        assert_eq!(
            parse(b"\x1bP$q q\x1b\\"),
            vec![
                Event::Decrqss {
                    intermediates: vec![b' '],
                    byte: b'q',
                },
                Event::Esc {
                    intermediates: vec![],
                    byte: b'\\',
                },
            ]
        );
    }

    #[test]
    fn rename_and_apc_strings() {
        assert_eq!(
            parse(b"\x1bkwindow\x1b\\"),
            vec![
                Event::Rename(b"window".to_vec()),
                Event::Esc {
                    intermediates: vec![],
                    byte: b'\\',
                },
            ]
        );
        assert_eq!(
            parse(b"\x1b_title\x1b\\"),
            vec![
                Event::Apc(b"title".to_vec()),
                Event::Esc {
                    intermediates: vec![],
                    byte: b'\\',
                },
            ]
        );
    }

    #[test]
    fn utf8_prints_one_scalar() {
        assert_eq!(parse("中".as_bytes()), vec![Event::Print('中')]);
    }

    #[test]
    fn interrupted_utf8_emits_replacement() {
        assert_eq!(
            parse(b"\xe4\x1b[m"),
            vec![
                Event::Print(char::REPLACEMENT_CHARACTER),
                Event::Csi {
                    params: vec![],
                    intermediates: vec![],
                    byte: b'm',
                },
            ]
        );
    }

    #[test]
    fn since_ground_tracks_open_sequences() {
        let mut parser: Parser = Parser::new();
        let mut actor = CollectingActor::default();

        parser.advance(b"\x1b[5", &mut actor);
        assert!(!parser.is_ground());
        assert_eq!(parser.since_ground(), b"\x1b[5");

        parser.advance(b"A", &mut actor);
        assert!(parser.is_ground());
        assert!(parser.since_ground().is_empty());
    }

    #[test]
    fn cancel_executes_and_returns_to_ground() {
        // CAN aborts the escape in flight and is itself executed.
        assert_eq!(
            parse(b"\x1b[12\x18m"),
            vec![Event::Execute(0x18), Event::Print('m')]
        );
    }

    #[test]
    fn intermediate_overflow_discards_sequence() {
        assert_eq!(parse(b"\x1b[ !\"#$m"), vec![]);
    }

    #[test]
    fn oversized_string_payload_is_dropped() {
        let mut parser: Parser = Parser::with_string_limit(8);
        let mut actor = CollectingActor::default();
        parser.advance(b"\x1b]0;123456789\x07", &mut actor);
        assert_eq!(actor.events, vec![]);

        // The parser keeps working afterwards.
        parser.advance(b"\x1b]0;ok\x07", &mut actor);
        assert_eq!(
            actor.events,
            vec![Event::Osc {
                payload: b"0;ok".to_vec(),
                terminator: StringTerminator::Bel,
            }]
        );
    }

    #[test]
    fn watchdog_expiry_discards_pending_string() {
        let mut parser: Parser<FakeWatchdog> = Parser::new();
        let mut actor = CollectingActor::default();

        parser.advance(b"\x1b]0;stuck", &mut actor);
        assert!(!parser.is_ground());
        assert!(parser.watchdog().pending_timeout());

        parser.expire_watchdog();
        assert!(parser.is_ground());
        assert!(parser.since_ground().is_empty());
        assert_eq!(actor.events, vec![]);

        parser.advance(b"A", &mut actor);
        assert_eq!(actor.events, vec![Event::Print('A')]);
    }

    #[test]
    fn lazy_watchdog_check_on_advance() {
        let mut parser: Parser<FakeWatchdog> = Parser::new();
        let mut actor = CollectingActor::default();

        parser.advance(b"\x1bPq12", &mut actor);
        parser.watchdog.expired = true;

        parser.advance(b"ab\x1b\\", &mut actor);
        assert_eq!(
            actor.events,
            vec![
                Event::Print('a'),
                Event::Print('b'),
                Event::Esc {
                    intermediates: vec![],
                    byte: b'\\',
                },
            ]
        );
    }
}
