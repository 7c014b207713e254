//! Callbacks invoked by the control-sequence parser.
//!
//! The [`Parser`](crate::parser::Parser) walks a byte stream and hands each
//! recognized unit to an [`Actor`]: printable characters, C0 controls,
//! completed ESC/CSI sequences, device control strings with their payloads,
//! settings queries, and the OSC/APC/rename string forms. Implementations
//! receive sequences exactly once, in input order, and should not perform
//! further framing of their own.

use crate::enums::StringTerminator;
use crate::params::Params;

/// Consumer-facing interface for the parser's dispatch events.
///
/// All methods default to doing nothing so implementations only override
/// what they handle. `intermediates` carries the collected intermediate
/// bytes, including CSI private prefixes (`?`, `>`, …); `params` is the
/// typed parameter list split from the raw parameter bytes.
pub trait Actor {
    /// A printable Unicode scalar value in ground state.
    fn print(&mut self, _c: char) {}

    /// A single-byte C0 control executed immediately.
    fn execute(&mut self, _byte: u8) {}

    /// A completed escape sequence (`ESC … F`).
    fn esc_dispatch(&mut self, _intermediates: &[u8], _byte: u8) {}

    /// A completed control sequence (`CSI … F`).
    fn csi_dispatch(&mut self, _params: &Params, _intermediates: &[u8], _byte: u8) {}

    /// A completed device control string. The payload starts with the DCS
    /// final byte and runs to the terminator, with embedded escapes kept.
    fn dcs_dispatch(&mut self, _params: &Params, _intermediates: &[u8], _payload: &[u8]) {}

    /// A completed settings query (`DCS $ q … ST`), parsed with the CSI
    /// collector rules; `byte` is the final identifying the setting.
    fn decrqss_dispatch(&mut self, _params: &Params, _intermediates: &[u8], _byte: u8) {}

    /// A completed operating-system-command string.
    fn osc_dispatch(&mut self, _payload: &[u8], _terminator: StringTerminator) {}

    /// A completed application-program-command string.
    fn apc_dispatch(&mut self, _payload: &[u8]) {}

    /// A completed window-rename string (`ESC k … ST`).
    fn rename_dispatch(&mut self, _payload: &[u8]) {}
}
