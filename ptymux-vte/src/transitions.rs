//! Transition tables for the ptymux finite state machine.
//!
//! Each function in this module covers one parser state: given an input byte
//! it returns the next [`State`] and the [`Action`] the parser should
//! perform. The tables follow the DEC ANSI diagram with the extensions this
//! terminal needs: 7-bit operation (no C1 dispatch; bytes with the top bit
//! set are UTF-8 in ground and payload in the string states), OSC terminable
//! by BEL, an APC string state, a rename-window string state entered by
//! `ESC k`, a DCS handler that tolerates embedded ESC bytes, and a settings
//! query sub-parser reached through `DCS $ q`.

use crate::enums::{Action, State};

/// Transitions shared by every state. CAN and SUB abort the sequence in
/// flight and execute as controls; ESC always starts a new escape.
#[inline(always)]
const fn anywhere(state: State, byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x18 | 0x1a => (Ground, Execute),
        0x1b => (EscEnter, None),
        _ => (state, Ignore),
    }
}

/// Ground state handling printable data, C0 controls and UTF-8 leads.
#[inline(always)]
const fn ground(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (Ground, Execute),
        0x20..=0x7e => (Ground, Print),
        0x7f => (Ground, Ignore),
        0x80..=0xff => (Ground, Utf8),
        _ => anywhere(Ground, byte),
    }
}

/// ESC state waiting for the byte that identifies the sequence family.
#[inline(always)]
const fn esc_enter(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (EscEnter, Execute),
        0x20..=0x2f => (EscIntermediate, Collect),
        0x30..=0x4f => (Ground, EscDispatch),
        0x50 => (DcsEnter, None),
        0x51..=0x57 => (Ground, EscDispatch),
        0x58 => (ConsumeSt, None),
        0x59 | 0x5a => (Ground, EscDispatch),
        0x5b => (CsiEnter, None),
        0x5c => (Ground, EscDispatch),
        0x5d => (OscString, None),
        0x5e => (ConsumeSt, None),
        0x5f => (ApcString, None),
        0x60..=0x6a => (Ground, EscDispatch),
        0x6b => (RenameString, None),
        0x6c..=0x7e => (Ground, EscDispatch),
        0x7f => (EscEnter, Ignore),
        _ => anywhere(EscEnter, byte),
    }
}

/// ESC state collecting intermediate bytes before dispatch.
#[inline(always)]
const fn esc_intermediate(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (EscIntermediate, Execute),
        0x20..=0x2f => (EscIntermediate, Collect),
        0x30..=0x7e => (Ground, EscDispatch),
        0x7f => (EscIntermediate, Ignore),
        _ => anywhere(EscIntermediate, byte),
    }
}

/// CSI entry point routing parameter, intermediate and final bytes.
#[inline(always)]
const fn csi_enter(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (CsiEnter, Execute),
        0x20..=0x2f => (CsiIntermediate, Collect),
        0x30..=0x3b => (CsiParameter, Param),
        0x3c..=0x3f => (CsiParameter, Collect),
        0x40..=0x7e => (Ground, CsiDispatch),
        0x7f => (CsiEnter, Ignore),
        _ => anywhere(CsiEnter, byte),
    }
}

/// CSI parameter collection; private prefixes land in the intermediate
/// buffer so the dispatcher can key on them.
#[inline(always)]
const fn csi_parameter(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (CsiParameter, Execute),
        0x20..=0x2f => (CsiIntermediate, Collect),
        0x30..=0x3b => (CsiParameter, Param),
        0x3c..=0x3f => (CsiParameter, Collect),
        0x40..=0x7e => (Ground, CsiDispatch),
        0x7f => (CsiParameter, Ignore),
        _ => anywhere(CsiParameter, byte),
    }
}

/// CSI intermediate state; a parameter byte after an intermediate is
/// malformed and the rest of the sequence is ignored.
#[inline(always)]
const fn csi_intermediate(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (CsiIntermediate, Execute),
        0x20..=0x2f => (CsiIntermediate, Collect),
        0x30..=0x3f => (CsiIgnore, None),
        0x40..=0x7e => (Ground, CsiDispatch),
        0x7f => (CsiIntermediate, Ignore),
        _ => anywhere(CsiIntermediate, byte),
    }
}

/// CSI ignore state consuming the remainder of a malformed sequence.
#[inline(always)]
const fn csi_ignore(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (CsiIgnore, Execute),
        0x20..=0x3f | 0x7f => (CsiIgnore, Ignore),
        0x40..=0x7e => (Ground, None),
        _ => anywhere(CsiIgnore, byte),
    }
}

/// DCS entry point. C0 controls are not executed inside device control
/// strings; the final byte selects the payload handler.
#[inline(always)]
const fn dcs_enter(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (DcsEnter, Ignore),
        0x20..=0x2f => (DcsIntermediate, Collect),
        0x3a => (DcsIgnore, None),
        0x30..=0x39 | 0x3b => (DcsParameter, Param),
        0x3c..=0x3f => (DcsParameter, Collect),
        0x40..=0x7e => (DcsHandler, DcsFinal),
        0x7f => (DcsEnter, Ignore),
        _ => anywhere(DcsEnter, byte),
    }
}

/// DCS parameter collection, the DCS analogue of [`csi_parameter`].
#[inline(always)]
const fn dcs_parameter(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (DcsParameter, Ignore),
        0x20..=0x2f => (DcsIntermediate, Collect),
        0x3a => (DcsIgnore, None),
        0x30..=0x39 | 0x3b => (DcsParameter, Param),
        0x3c..=0x3f => (DcsParameter, Collect),
        0x40..=0x7e => (DcsHandler, DcsFinal),
        0x7f => (DcsParameter, Ignore),
        _ => anywhere(DcsParameter, byte),
    }
}

/// DCS intermediate state prior to the final byte.
#[inline(always)]
const fn dcs_intermediate(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (DcsIntermediate, Ignore),
        0x20..=0x2f => (DcsIntermediate, Collect),
        0x30..=0x3f => (DcsIgnore, None),
        0x40..=0x7e => (DcsHandler, DcsFinal),
        0x7f => (DcsIntermediate, Ignore),
        _ => anywhere(DcsIntermediate, byte),
    }
}

/// DCS payload collection. The payload is a raw byte stream: CAN, SUB and
/// high bytes are data, and ESC switches to [`dcs_escape`] so that escape
/// bytes can be carried inside the payload.
#[inline(always)]
const fn dcs_handler(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x1b => (DcsEscape, None),
        _ => (DcsHandler, DcsPut),
    }
}

/// ESC seen inside a DCS payload. A following backslash is ST and
/// dispatches; any other byte is payload, so a doubled ESC carries one
/// ESC byte through.
#[inline(always)]
const fn dcs_escape(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x5c => (Ground, DcsDispatch),
        _ => (DcsHandler, DcsPut),
    }
}

/// DCS ignore state swallowing a malformed device control string.
#[inline(always)]
const fn dcs_ignore(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x7f | 0x80..=0xff => (DcsIgnore, Ignore),
        _ => anywhere(DcsIgnore, byte),
    }
}

/// Settings query entry state. The DECRQSS payload is parsed with the CSI
/// collector rules; its final byte identifies the requested setting.
#[inline(always)]
const fn decrqss_enter(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (DecrqssEnter, Ignore),
        0x20..=0x2f => (DecrqssIntermediate, Collect),
        0x30..=0x3b => (DecrqssEnter, Param),
        0x3c..=0x3f => (DecrqssEnter, Collect),
        0x40..=0x7e => (ConsumeSt, DecrqssFinal),
        0x7f => (DecrqssEnter, Ignore),
        _ => anywhere(DecrqssEnter, byte),
    }
}

/// Settings query intermediate state.
#[inline(always)]
const fn decrqss_intermediate(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (DecrqssIntermediate, Ignore),
        0x20..=0x2f => (DecrqssIntermediate, Collect),
        0x30..=0x3f => (DecrqssIgnore, None),
        0x40..=0x7e => (ConsumeSt, DecrqssFinal),
        0x7f => (DecrqssIntermediate, Ignore),
        _ => anywhere(DecrqssIntermediate, byte),
    }
}

/// Settings query ignore state for malformed queries.
#[inline(always)]
const fn decrqss_ignore(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x18 | 0x1a | 0x1b => anywhere(DecrqssIgnore, byte),
        0x40..=0x7e => (ConsumeSt, None),
        _ => (DecrqssIgnore, Ignore),
    }
}

/// OSC payload collection until BEL or ST.
#[inline(always)]
const fn osc_string(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x06 | 0x08..=0x17 | 0x19 | 0x1c..=0x1f => (OscString, Ignore),
        0x07 => (Ground, StringEndBel),
        0x20..=0xff => (OscString, StringPut),
        _ => anywhere(OscString, byte),
    }
}

/// APC payload collection until ST.
#[inline(always)]
const fn apc_string(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (ApcString, Ignore),
        0x20..=0xff => (ApcString, StringPut),
        _ => anywhere(ApcString, byte),
    }
}

/// Window-rename payload collection (`ESC k … ST`).
#[inline(always)]
const fn rename_string(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x00..=0x17 | 0x19 | 0x1c..=0x1f => (RenameString, Ignore),
        0x20..=0xff => (RenameString, StringPut),
        _ => anywhere(RenameString, byte),
    }
}

/// Swallow everything until the ST that closes an already-handled string.
#[inline(always)]
const fn consume_st(byte: u8) -> (State, Action) {
    use Action::*;
    use State::*;

    match byte {
        0x18 | 0x1a | 0x1b => anywhere(ConsumeSt, byte),
        _ => (ConsumeSt, Ignore),
    }
}

/// Action to run when entering a state, before the next byte is read.
#[inline(always)]
pub(crate) const fn entry_action(state: State) -> Action {
    use Action::*;
    use State::*;

    match state {
        EscEnter | CsiEnter | DcsEnter | DecrqssEnter | OscString
        | ApcString | RenameString | ConsumeSt => Clear,
        _ => None,
    }
}

/// Core transition table delegating to the per-state helpers.
#[inline(always)]
pub(crate) const fn transit(state: State, byte: u8) -> (State, Action) {
    use State::*;

    match state {
        Ground => ground(byte),
        EscEnter => esc_enter(byte),
        EscIntermediate => esc_intermediate(byte),
        CsiEnter => csi_enter(byte),
        CsiParameter => csi_parameter(byte),
        CsiIntermediate => csi_intermediate(byte),
        CsiIgnore => csi_ignore(byte),
        DcsEnter => dcs_enter(byte),
        DcsParameter => dcs_parameter(byte),
        DcsIntermediate => dcs_intermediate(byte),
        DcsHandler => dcs_handler(byte),
        DcsEscape => dcs_escape(byte),
        DcsIgnore => dcs_ignore(byte),
        DecrqssEnter => decrqss_enter(byte),
        DecrqssIntermediate => decrqss_intermediate(byte),
        DecrqssIgnore => decrqss_ignore(byte),
        OscString => osc_string(byte),
        ApcString => apc_string(byte),
        RenameString => rename_string(byte),
        ConsumeSt => consume_st(byte),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::State;

    const ALL_STATES: [State; 20] = [
        State::Ground,
        State::EscEnter,
        State::EscIntermediate,
        State::CsiEnter,
        State::CsiParameter,
        State::CsiIntermediate,
        State::CsiIgnore,
        State::DcsEnter,
        State::DcsParameter,
        State::DcsIntermediate,
        State::DcsHandler,
        State::DcsEscape,
        State::DcsIgnore,
        State::DecrqssEnter,
        State::DecrqssIntermediate,
        State::DecrqssIgnore,
        State::OscString,
        State::ApcString,
        State::RenameString,
        State::ConsumeSt,
    ];

    #[test]
    fn every_state_covers_every_byte() {
        for state in ALL_STATES {
            for byte in 0..=0xffu8 {
                // A transition must exist and must lead to a defined state;
                // the match arms are total, this pins the reachable pairs.
                let (next, _) = transit(state, byte);
                assert!(ALL_STATES.contains(&next), "{state:?} + {byte:#04x}");
            }
        }
    }

    #[test]
    fn cancel_and_substitute_reset_to_ground() {
        for state in ALL_STATES {
            // CAN and SUB abort everywhere except inside a DCS payload,
            // where they are data.
            if matches!(state, State::DcsHandler | State::DcsEscape) {
                continue;
            }
            for byte in [0x18u8, 0x1a] {
                let (next, action) = transit(state, byte);
                assert_eq!(next, State::Ground);
                assert_eq!(action, Action::Execute);
            }
        }
    }

    #[test]
    fn esc_interrupts_all_but_dcs_payload() {
        for state in ALL_STATES {
            if matches!(state, State::DcsHandler | State::DcsEscape) {
                continue;
            }
            let (next, _) = transit(state, 0x1b);
            assert_eq!(next, State::EscEnter, "{state:?}");
        }
    }

    #[test]
    fn dcs_payload_keeps_esc() {
        assert_eq!(transit(State::DcsHandler, 0x1b), (State::DcsEscape, Action::None));
        assert_eq!(
            transit(State::DcsEscape, b'\\'),
            (State::Ground, Action::DcsDispatch)
        );
        assert_eq!(
            transit(State::DcsEscape, 0x1b),
            (State::DcsHandler, Action::DcsPut)
        );
    }
}
