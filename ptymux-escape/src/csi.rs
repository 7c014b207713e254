use log::debug;
use ptymux_vte::{Param, Params};

use crate::actor::ScreenActor;
use crate::cell::{CellAttrs, UnderlineStyle};
use crate::color::{Color, Rgb};
use crate::esc;
use crate::level::TermLevel;
use crate::mode::{
    Mode, ModifyOtherKeys, NamedMode, NamedPrivateMode, PrivateMode, TabClearMode, TermModes,
};
use crate::options::{ExtendedKeys, Options};
use crate::parser::Context;
use crate::reply;

/// Control sequences, keyed by final byte and intermediates. Private
/// prefixes (`?`, `>`) are collected as intermediates and take part in the
/// lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Csi {
    /// ICH
    InsertCharacters,
    /// SL
    ScrollLeft,
    /// CUU
    CursorUp,
    /// SR
    ScrollRight,
    /// CUD
    CursorDown,
    /// CUF
    CursorRight,
    /// CUB
    CursorLeft,
    /// CNL
    CursorNextLine,
    /// CPL
    CursorPrevLine,
    /// CHA / HPA
    CursorColumn,
    /// CUP / HVP
    CursorPosition,
    /// CHT
    CursorForwardTab,
    /// ED
    EraseScreen,
    /// DECSED
    SelectiveEraseScreen,
    /// EL
    EraseLine,
    /// DECSEL
    SelectiveEraseLine,
    /// IL
    InsertLines,
    /// DL
    DeleteLines,
    /// DCH
    DeleteCharacters,
    /// SU
    ScrollUp,
    /// SD
    ScrollDown,
    /// ECH
    EraseCharacters,
    /// CBT
    CursorBackwardTab,
    /// HPR
    ColumnRelative,
    /// REP
    RepeatLast,
    /// DA
    DeviceAttributes,
    /// DA2
    SecondaryDeviceAttributes,
    /// VPA
    RowAbsolute,
    /// VPR
    RowRelative,
    /// TBC
    TabClear,
    /// SM
    SetMode,
    /// DECSET
    SetModePrivate,
    /// RM
    ResetMode,
    /// DECRST
    ResetModePrivate,
    /// SGR
    Sgr,
    /// XTMODKEYS set
    ModifyKeysSet,
    /// DSR
    DeviceStatus,
    /// XTMODKEYS reset
    ModifyKeysReset,
    /// DSR, DEC private forms
    DeviceStatusPrivate,
    /// DECSTR
    SoftReset,
    /// DECSCL
    ConformanceLevel,
    /// DECRQM
    RequestMode,
    /// DECRQM, private modes
    RequestModePrivate,
    /// DECSCUSR
    CursorStyle,
    /// DECSCA
    ProtectAttribute,
    /// XDA
    ExtendedDeviceAttributes,
    /// DECSTBM
    ScrollRegion,
    /// SCP when left/right margins are off, DECSLRM when on
    SaveCursorOrMargins,
    /// xterm window operations
    WindowOps,
    /// SCORC
    RestoreCursor,
    /// DECRQTSR
    RequestTerminalState,
    /// DECRQPSR
    RequestPresentationState,
    /// DECIC
    InsertColumns,
    /// DECDC
    DeleteColumns,
    Unknown,
}

impl Csi {
    fn from_parts(intermediates: &[u8], byte: u8) -> Self {
        match (intermediates, byte) {
            (b"", b'@') => Self::InsertCharacters,
            (b" ", b'@') => Self::ScrollLeft,
            (b"", b'A') => Self::CursorUp,
            (b" ", b'A') => Self::ScrollRight,
            (b"", b'B') => Self::CursorDown,
            (b"", b'C') => Self::CursorRight,
            (b"", b'D') => Self::CursorLeft,
            (b"", b'E') => Self::CursorNextLine,
            (b"", b'F') => Self::CursorPrevLine,
            (b"", b'G') | (b"", b'`') => Self::CursorColumn,
            (b"", b'H') | (b"", b'f') => Self::CursorPosition,
            (b"", b'I') => Self::CursorForwardTab,
            (b"", b'J') => Self::EraseScreen,
            (b"?", b'J') => Self::SelectiveEraseScreen,
            (b"", b'K') => Self::EraseLine,
            (b"?", b'K') => Self::SelectiveEraseLine,
            (b"", b'L') => Self::InsertLines,
            (b"", b'M') => Self::DeleteLines,
            (b"", b'P') => Self::DeleteCharacters,
            (b"", b'S') => Self::ScrollUp,
            (b"", b'T') => Self::ScrollDown,
            (b"", b'X') => Self::EraseCharacters,
            (b"", b'Z') => Self::CursorBackwardTab,
            (b"", b'a') => Self::ColumnRelative,
            (b"", b'b') => Self::RepeatLast,
            (b"", b'c') => Self::DeviceAttributes,
            (b">", b'c') => Self::SecondaryDeviceAttributes,
            (b"", b'd') => Self::RowAbsolute,
            (b"", b'e') => Self::RowRelative,
            (b"", b'g') => Self::TabClear,
            (b"", b'h') => Self::SetMode,
            (b"?", b'h') => Self::SetModePrivate,
            (b"", b'l') => Self::ResetMode,
            (b"?", b'l') => Self::ResetModePrivate,
            (b"", b'm') => Self::Sgr,
            (b">", b'm') => Self::ModifyKeysSet,
            (b"", b'n') => Self::DeviceStatus,
            (b">", b'n') => Self::ModifyKeysReset,
            (b"?", b'n') => Self::DeviceStatusPrivate,
            (b"!", b'p') => Self::SoftReset,
            (b"\"", b'p') => Self::ConformanceLevel,
            (b"$", b'p') => Self::RequestMode,
            (b"?$", b'p') => Self::RequestModePrivate,
            (b" ", b'q') => Self::CursorStyle,
            (b"\"", b'q') => Self::ProtectAttribute,
            (b">", b'q') => Self::ExtendedDeviceAttributes,
            (b"", b'r') => Self::ScrollRegion,
            (b"", b's') => Self::SaveCursorOrMargins,
            (b"", b't') => Self::WindowOps,
            (b"", b'u') => Self::RestoreCursor,
            (b"$", b'u') => Self::RequestTerminalState,
            (b"$", b'w') => Self::RequestPresentationState,
            (b"'", b'}') => Self::InsertColumns,
            (b"'", b'~') => Self::DeleteColumns,
            _ => Self::Unknown,
        }
    }
}

pub(crate) fn perform<S: ScreenActor>(
    ctx: &mut Context,
    options: &Options,
    screen: &mut S,
    params: &Params,
    intermediates: &[u8],
    byte: u8,
) {
    let printed = dispatch(ctx, options, screen, params, intermediates, byte);
    if !printed {
        ctx.last_char = None;
    }
}

/// Run one control sequence. Returns whether the dispatch printed, which
/// keeps the repeat state alive.
fn dispatch<S: ScreenActor>(
    ctx: &mut Context,
    options: &Options,
    screen: &mut S,
    params: &Params,
    intermediates: &[u8],
    byte: u8,
) -> bool {
    let bg = ctx.cell.bg;

    match Csi::from_parts(intermediates, byte) {
        Csi::InsertCharacters => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.insert_characters(n, bg);
            }
        },
        Csi::ScrollLeft => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.scroll_left(n, bg);
            }
        },
        Csi::CursorUp => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.cursor_up(n, false);
            }
        },
        Csi::ScrollRight => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.scroll_right(n, bg);
            }
        },
        Csi::CursorDown => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.cursor_down(n, false);
            }
        },
        Csi::CursorRight => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.cursor_right(n);
            }
        },
        Csi::CursorLeft => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.cursor_left(n);
            }
        },
        Csi::CursorNextLine => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.cursor_down(n, true);
            }
        },
        Csi::CursorPrevLine => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.cursor_up(n, true);
            }
        },
        Csi::CursorColumn => {
            if let Some(x) = arg(params, 0, 1, 1) {
                screen.cursor_move(Some(x - 1), None, true);
            }
        },
        Csi::CursorPosition => {
            let y = arg(params, 0, 1, 1);
            let x = arg(params, 1, 1, 1);
            if let (Some(x), Some(y)) = (x, y) {
                screen.cursor_move(Some(x - 1), Some(y - 1), true);
            }
        },
        Csi::CursorForwardTab => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.next_tab(n);
            }
        },
        Csi::RowAbsolute => {
            if let Some(y) = arg(params, 0, 1, 1) {
                screen.cursor_move(None, Some(y - 1), true);
            }
        },
        Csi::RowRelative => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.cursor_down(n, false);
            }
        },
        Csi::ColumnRelative => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.cursor_right(n);
            }
        },
        Csi::EraseScreen => erase_screen(ctx, screen, params),
        Csi::SelectiveEraseScreen => {
            if ctx.level.is_vt220() {
                erase_screen(ctx, screen, params);
            }
        },
        Csi::EraseLine => erase_line(ctx, screen, params),
        Csi::SelectiveEraseLine => {
            if ctx.level.is_vt220() {
                erase_line(ctx, screen, params);
            }
        },
        Csi::InsertLines => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.insert_lines(n, bg);
            }
        },
        Csi::DeleteLines => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.delete_lines(n, bg);
            }
        },
        Csi::DeleteCharacters => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.delete_characters(n, bg);
            }
        },
        Csi::EraseCharacters => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.erase_characters(n, bg);
            }
        },
        Csi::InsertColumns => {
            if ctx.level.is_vt220() {
                if let Some(n) = arg(params, 0, 1, 1) {
                    screen.insert_columns(n, bg);
                }
            }
        },
        Csi::DeleteColumns => {
            if ctx.level.is_vt220() {
                if let Some(n) = arg(params, 0, 1, 1) {
                    screen.delete_columns(n, bg);
                }
            }
        },
        Csi::ScrollUp => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.scroll_up(n, bg);
            }
        },
        Csi::ScrollDown => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.scroll_down(n, bg);
            }
        },
        Csi::CursorBackwardTab => {
            if let Some(n) = arg(params, 0, 1, 1) {
                screen.prev_tab(n);
            }
        },
        Csi::TabClear => match params.get(0, 0, 0) {
            0 => screen.clear_tabs(TabClearMode::Current),
            3 => screen.clear_tabs(TabClearMode::All),
            n => debug!("[csi] unknown TBC argument {n}"),
        },
        Csi::RepeatLast => return repeat_last(ctx, screen, params),
        Csi::Sgr => sgr(ctx, params),
        Csi::SetMode => sm_rm(screen, params, true),
        Csi::ResetMode => sm_rm(screen, params, false),
        Csi::SetModePrivate => sm_rm_private(ctx, screen, params, true),
        Csi::ResetModePrivate => sm_rm_private(ctx, screen, params, false),
        Csi::ModifyKeysSet => modify_keys_set(options, screen, params),
        Csi::ModifyKeysReset => {
            if params.get(0, 0, 4) == 4 && options.extended_keys == ExtendedKeys::On {
                screen.set_modify_other_keys(ModifyOtherKeys::Reset);
            }
        },
        Csi::DeviceAttributes => {
            if params.get(0, 0, 0) == 0 {
                let attrs = ctx.max_level.device_attributes().to_string();
                ctx.reply(attrs);
            }
        },
        Csi::SecondaryDeviceAttributes => {
            if params.get(0, 0, 0) == 0 {
                ctx.reply(reply::secondary_da());
            }
        },
        Csi::ExtendedDeviceAttributes => {
            if params.get(0, 0, 0) == 0 {
                ctx.reply(reply::extended_da());
            }
        },
        Csi::DeviceStatus => match params.get(0, 0, 0) {
            5 => ctx.reply(reply::operating_status()),
            6 => {
                let (cx, mut cy) = screen.cursor();
                if screen.mode_flags().contains(TermModes::ORIGIN) {
                    let (top, _, _, _) = screen.margins();
                    cy = cy.saturating_sub(top);
                }
                ctx.reply(reply::cursor_report(cx + 1, cy + 1));
            },
            n => debug!("[csi] unknown DSR argument {n}"),
        },
        Csi::DeviceStatusPrivate => match params.get(0, 0, 0) {
            996 => {
                if let Some(theme) = screen.theme() {
                    ctx.reply(reply::theme_report(theme));
                }
            },
            n => debug!("[csi] unknown private DSR argument {n}"),
        },
        Csi::RequestMode => request_mode(ctx, screen, params),
        Csi::RequestModePrivate => request_mode_private(ctx, options, screen, params),
        Csi::SoftReset => {
            if ctx.level.is_vt220() {
                soft_reset(ctx, screen);
            }
        },
        Csi::ConformanceLevel => conformance_level(ctx, screen, params),
        Csi::CursorStyle => {
            let n = params.get(0, 0, 0);
            if (0..=6).contains(&n) {
                ctx.cursor_style = Some(n as u8);
                screen.set_cursor_style(n as u8);
            } else {
                debug!("[csi] unknown cursor style {n}");
            }
        },
        Csi::ProtectAttribute => match params.get(0, 0, 0) {
            0 | 2 => ctx.cell.attrs.remove(CellAttrs::PROTECTED),
            1 => ctx.cell.attrs.insert(CellAttrs::PROTECTED),
            n => debug!("[csi] unknown DECSCA argument {n}"),
        },
        Csi::ScrollRegion => {
            let (_, rows) = screen.grid_size();
            let top = arg(params, 0, 1, 1);
            let bottom = arg(params, 1, 1, rows as i32);
            if let (Some(top), Some(bottom)) = (top, bottom) {
                if top >= bottom {
                    debug!("[csi] bad scroll region {top};{bottom}");
                } else {
                    screen.set_scroll_region(top - 1, bottom - 1);
                    screen.cursor_move(Some(0), Some(0), true);
                }
            }
        },
        Csi::SaveCursorOrMargins => {
            if screen.mode_flags().contains(TermModes::LR_MARGINS) {
                let (cols, _) = screen.grid_size();
                let left = arg(params, 0, 1, 1);
                let right = arg(params, 1, 1, cols as i32);
                if let (Some(left), Some(right)) = (left, right) {
                    if left >= right {
                        debug!("[csi] bad scroll margin {left};{right}");
                    } else {
                        screen.set_scroll_margin(left - 1, right - 1);
                        screen.cursor_move(Some(0), Some(0), true);
                    }
                }
            } else {
                esc::save_cursor(ctx, screen);
            }
        },
        Csi::RestoreCursor => esc::restore_cursor(ctx, screen),
        Csi::WindowOps => window_ops(ctx, screen, params),
        Csi::RequestPresentationState => match params.get(0, 0, 0) {
            1 => {
                let payload = cursor_information_payload(ctx, screen);
                ctx.reply(reply::presentation_report(1, &payload));
            },
            2 => {
                let payload = tab_stop_payload(screen);
                ctx.reply(reply::presentation_report(2, &payload));
            },
            n => debug!("[csi] unknown DECRQPSR argument {n}"),
        },
        Csi::RequestTerminalState => match params.get(0, 0, 0) {
            1 => ctx.reply(reply::terminal_state_report(1, "")),
            2 => {
                let payload = color_table_payload(screen);
                ctx.reply(reply::terminal_state_report(2, &payload));
            },
            n => debug!("[csi] unknown DECRQTSR argument {n}"),
        },
        Csi::Unknown => {
            debug!(
                "[csi] unknown sequence: {:?} {:?} {:?}",
                params.items(),
                intermediates,
                byte as char
            );
        },
    }

    false
}

/// Project parameter `index` to a usize, skipping the whole action on a
/// string parameter.
fn arg(params: &Params, index: usize, min: i32, default: i32) -> Option<usize> {
    usize::try_from(params.get(index, min, default)).ok()
}

fn erase_screen<S: ScreenActor>(ctx: &mut Context, screen: &mut S, params: &Params) {
    let bg = ctx.cell.bg;
    match params.get(0, 0, 0) {
        0 => screen.clear_end_of_screen(bg),
        1 => screen.clear_start_of_screen(bg),
        2 => screen.clear_screen(bg),
        3 => {
            if params.get(1, 0, 0) == 0 {
                screen.clear_history();
            }
        },
        n => debug!("[csi] unknown ED argument {n}"),
    }
}

fn erase_line<S: ScreenActor>(ctx: &mut Context, screen: &mut S, params: &Params) {
    let bg = ctx.cell.bg;
    match params.get(0, 0, 0) {
        0 => screen.clear_end_of_line(bg),
        1 => screen.clear_start_of_line(bg),
        2 => screen.clear_line(bg),
        n => debug!("[csi] unknown EL argument {n}"),
    }
}

fn repeat_last<S: ScreenActor>(ctx: &mut Context, screen: &mut S, params: &Params) -> bool {
    let Some(c) = ctx.last_char else {
        debug!("[csi] repeat with nothing to repeat");
        return false;
    };
    let Some(n) = arg(params, 0, 1, 1) else {
        return false;
    };

    // Cap the repetition to the columns left inside the margins.
    let (cx, _) = screen.cursor();
    let (_, _, _, right) = screen.margins();
    let n = n.min((right + 1).saturating_sub(cx));

    for _ in 0..n {
        screen.collect_add(c, &ctx.cell);
    }

    true
}

fn sm_rm<S: ScreenActor>(screen: &mut S, params: &Params, set: bool) {
    for index in 0..params.len() {
        let raw = params.get(index, 0, -1);
        if raw < 0 {
            continue;
        }

        match Mode::from_raw(raw as u16) {
            Mode::Named(named) => {
                if set {
                    screen.set_mode(named.into());
                } else {
                    screen.clear_mode(named.into());
                }
            },
            Mode::Unknown(mode) => debug!("[csi] unknown mode {mode}"),
        }
    }
}

fn sm_rm_private<S: ScreenActor>(
    ctx: &mut Context,
    screen: &mut S,
    params: &Params,
    set: bool,
) {
    for index in 0..params.len() {
        let raw = params.get(index, 0, -1);
        if raw < 0 {
            continue;
        }

        let mode = PrivateMode::from_raw(raw as u16);
        let PrivateMode::Named(named) = mode else {
            debug!("[csi] unknown private mode {raw}");
            continue;
        };

        match named {
            NamedPrivateMode::ColumnMode => {
                // The 80/132 column switch itself is not performed, the
                // side effects are.
                let (cols, rows) = screen.grid_size();
                screen.clear_screen(ctx.cell.bg);
                screen.set_scroll_region(0, rows.saturating_sub(1));
                screen.set_scroll_margin(0, cols.saturating_sub(1));
                screen.cursor_move(Some(0), Some(0), false);
            },
            NamedPrivateMode::Origin => {
                if set {
                    screen.set_private_mode(mode);
                } else {
                    screen.clear_private_mode(mode);
                }
                screen.cursor_move(Some(0), Some(0), true);
            },
            NamedPrivateMode::AlternateScreen | NamedPrivateMode::AlternateScreenClear => {
                if set {
                    screen.alternate_on(&ctx.cell, false);
                } else {
                    screen.alternate_off(&ctx.cell, false);
                }
            },
            NamedPrivateMode::SwapScreenAndSetRestoreCursor => {
                if set {
                    screen.alternate_on(&ctx.cell, true);
                } else {
                    screen.alternate_off(&ctx.cell, true);
                }
            },
            NamedPrivateMode::LeftRightMargins => {
                if set {
                    screen.set_private_mode(mode);
                } else {
                    let (cols, _) = screen.grid_size();
                    screen.clear_private_mode(mode);
                    screen.set_scroll_margin(0, cols.saturating_sub(1));
                }
            },
            _ => {
                if set {
                    screen.set_private_mode(mode);
                } else {
                    screen.clear_private_mode(mode);
                }
            },
        }
    }
}

fn modify_keys_set<S: ScreenActor>(options: &Options, screen: &mut S, params: &Params) {
    if params.get(0, 0, 0) != 4 || options.extended_keys == ExtendedKeys::Off {
        return;
    }

    match params.get(1, 0, 0) {
        0 => {
            if options.extended_keys == ExtendedKeys::On {
                screen.set_modify_other_keys(ModifyOtherKeys::Reset);
            }
        },
        1 => screen.set_modify_other_keys(ModifyOtherKeys::EnableExceptWellDefined),
        2 => screen.set_modify_other_keys(ModifyOtherKeys::EnableAll),
        n => debug!("[csi] unknown XTMODKEYS argument {n}"),
    }
}

fn request_mode<S: ScreenActor>(ctx: &mut Context, screen: &mut S, params: &Params) {
    let raw = params.get(0, 0, 0);
    if raw < 0 {
        return;
    }

    let flags = screen.mode_flags();
    let value = match Mode::from_raw(raw as u16) {
        Mode::Named(NamedMode::Insert) => mode_value(flags, TermModes::INSERT),
        Mode::Named(NamedMode::LineFeedNewLine) => {
            mode_value(flags, TermModes::LINEFEED_NEWLINE)
        },
        Mode::Unknown(_) => 0,
    };

    ctx.reply(reply::decrpm(false, raw as u16, value));
}

fn request_mode_private<S: ScreenActor>(
    ctx: &mut Context,
    options: &Options,
    screen: &mut S,
    params: &Params,
) {
    let raw = params.get(0, 0, 0);
    if raw < 0 {
        return;
    }

    let flags = screen.mode_flags();
    let value = match PrivateMode::from_raw(raw as u16) {
        PrivateMode::Named(named) => match named {
            NamedPrivateMode::CursorKeys => mode_value(flags, TermModes::CURSOR_KEYS),
            NamedPrivateMode::ColumnMode => 4,
            NamedPrivateMode::Origin => mode_value(flags, TermModes::ORIGIN),
            NamedPrivateMode::LineWrap => mode_value(flags, TermModes::WRAP),
            NamedPrivateMode::BlinkingCursor => {
                // Blend the mode flag with the effective cursor style: an
                // even DECSCUSR argument selects a steady cursor.
                let style = ctx.cursor_style.unwrap_or(options.cursor_style);
                let blinking_style = style == 0 || style % 2 == 1;
                if flags.contains(TermModes::CURSOR_BLINKING) || blinking_style {
                    2
                } else {
                    4
                }
            },
            NamedPrivateMode::ShowCursor => mode_value(flags, TermModes::CURSOR_VISIBLE),
            NamedPrivateMode::AlternateScreen
            | NamedPrivateMode::AlternateScreenClear
            | NamedPrivateMode::SwapScreenAndSetRestoreCursor => {
                mode_value(flags, TermModes::ALTERNATE)
            },
            NamedPrivateMode::KeypadApplication => mode_value(flags, TermModes::KEYPAD_APP),
            NamedPrivateMode::LeftRightMargins => mode_value(flags, TermModes::LR_MARGINS),
            NamedPrivateMode::ReportMouseClicks => {
                mode_value(flags, TermModes::MOUSE_STANDARD)
            },
            NamedPrivateMode::ReportCellMouseMotion => {
                mode_value(flags, TermModes::MOUSE_BUTTON)
            },
            NamedPrivateMode::ReportAllMouseMotion => mode_value(flags, TermModes::MOUSE_ALL),
            NamedPrivateMode::ReportFocusInOut => {
                mode_value(flags, TermModes::FOCUS_REPORTING)
            },
            NamedPrivateMode::Utf8Mouse => mode_value(flags, TermModes::MOUSE_UTF8),
            NamedPrivateMode::SgrMouse => mode_value(flags, TermModes::MOUSE_SGR),
            NamedPrivateMode::BracketedPaste => {
                mode_value(flags, TermModes::BRACKETED_PASTE)
            },
            NamedPrivateMode::ThemeUpdates => mode_value(flags, TermModes::THEME_UPDATES),
        },
        PrivateMode::Unknown(_) => 0,
    };

    ctx.reply(reply::decrpm(true, raw as u16, value));
}

fn mode_value(flags: TermModes, flag: TermModes) -> u8 {
    if flags.contains(flag) { 2 } else { 4 }
}

fn conformance_level<S: ScreenActor>(ctx: &mut Context, screen: &mut S, params: &Params) {
    let target = match params.get(0, 0, 0) {
        61 => match ctx.max_level {
            TermLevel::Vt125 | TermLevel::Vt241 => TermLevel::Vt125,
            TermLevel::Vt220 => TermLevel::Vt100,
            other => other,
        },
        62 if ctx.max_level.is_vt220() => {
            if ctx.max_level == TermLevel::Vt241 {
                TermLevel::Vt241
            } else {
                TermLevel::Vt220
            }
        },
        n => {
            debug!("[csi] unsupported conformance level {n}");
            return;
        },
    };

    if target != ctx.level {
        ctx.level = target;
        soft_reset(ctx, screen);
    }
}

pub(crate) fn soft_reset<S: ScreenActor>(ctx: &mut Context, screen: &mut S) {
    ctx.cell = Default::default();
    ctx.saved = Default::default();
    ctx.cursor_style = None;
    screen.soft_reset();
}

fn window_ops<S: ScreenActor>(ctx: &mut Context, screen: &mut S, params: &Params) {
    let mut index = 0;
    loop {
        let op = params.get(index, 0, -1);
        if op < 0 {
            break;
        }

        match op {
            // Ops acting on the outer window are accepted and ignored.
            1 | 2 | 5 | 6 | 7 | 11 | 13 => {},
            3 | 4 => index += 2,
            9 | 10 => index += 1,
            8 => {
                let rows = params.get(index + 1, 1, -1);
                let cols = params.get(index + 2, 1, -1);
                if rows > 0 && cols > 0 {
                    screen.resize_request(cols as usize, rows as usize);
                }
                index += 2;
            },
            14 => {
                if let Some((cw, ch)) = screen.cell_size_pixels() {
                    let (cols, rows) = screen.grid_size();
                    ctx.reply(reply::window_report(4, rows * ch, cols * cw));
                }
            },
            15 => {
                if let Some((cw, ch)) = screen.cell_size_pixels() {
                    let (cols, rows) = screen.grid_size();
                    ctx.reply(reply::window_report(5, rows * ch, cols * cw));
                }
            },
            16 => {
                if let Some((cw, ch)) = screen.cell_size_pixels() {
                    ctx.reply(reply::window_report(6, ch, cw));
                }
            },
            18 => {
                let (cols, rows) = screen.grid_size();
                ctx.reply(reply::window_report(8, rows, cols));
            },
            19 => {
                let (cols, rows) = screen.grid_size();
                ctx.reply(reply::window_report(9, rows, cols));
            },
            22 => {
                let what = params.get(index + 1, 0, 0);
                if what == 0 || what == 2 {
                    screen.push_title();
                }
                index += 1;
            },
            23 => {
                let what = params.get(index + 1, 0, 0);
                if what == 0 || what == 2 {
                    screen.pop_title();
                }
                index += 1;
            },
            _ => debug!("[csi] unknown window operation {op}"),
        }

        index += 1;
    }
}

/// Which colour slot an extended SGR introducer addresses.
#[derive(Clone, Copy)]
enum ColorTarget {
    Foreground,
    Background,
    Underline,
}

fn set_color_target(ctx: &mut Context, target: ColorTarget, color: Color) {
    match target {
        ColorTarget::Foreground => ctx.cell.fg = color,
        ColorTarget::Background => ctx.cell.bg = color,
        ColorTarget::Underline => ctx.cell.underline_color = color,
    }
}

fn sgr(ctx: &mut Context, params: &Params) {
    if params.is_empty() {
        ctx.cell.reset_rendition();
        return;
    }

    let items = params.items();
    let mut index = 0;
    while index < items.len() {
        if let Param::Text(text) = &items[index] {
            sgr_colon(ctx, text);
            index += 1;
            continue;
        }

        let n = params.get(index, 0, 0);
        match n {
            0 => ctx.cell.reset_rendition(),
            1 => ctx.cell.attrs.insert(CellAttrs::BOLD),
            2 => ctx.cell.attrs.insert(CellAttrs::DIM),
            3 => ctx.cell.attrs.insert(CellAttrs::ITALIC),
            4 => {
                ctx.cell.attrs.insert(CellAttrs::UNDERLINE);
                ctx.cell.underline_style = UnderlineStyle::Single;
            },
            5 | 6 => ctx.cell.attrs.insert(CellAttrs::BLINK),
            7 => ctx.cell.attrs.insert(CellAttrs::REVERSE),
            8 => ctx.cell.attrs.insert(CellAttrs::HIDDEN),
            9 => ctx.cell.attrs.insert(CellAttrs::STRIKETHROUGH),
            21 => {
                ctx.cell.attrs.insert(CellAttrs::UNDERLINE);
                ctx.cell.underline_style = UnderlineStyle::Double;
            },
            22 => ctx.cell.attrs.remove(CellAttrs::BOLD | CellAttrs::DIM),
            23 => ctx.cell.attrs.remove(CellAttrs::ITALIC),
            24 => {
                ctx.cell.attrs.remove(CellAttrs::UNDERLINE);
                ctx.cell.underline_style = UnderlineStyle::None;
            },
            25 => ctx.cell.attrs.remove(CellAttrs::BLINK),
            27 => ctx.cell.attrs.remove(CellAttrs::REVERSE),
            28 => ctx.cell.attrs.remove(CellAttrs::HIDDEN),
            29 => ctx.cell.attrs.remove(CellAttrs::STRIKETHROUGH),
            30..=37 => ctx.cell.fg = Color::Indexed((n - 30) as u8),
            38 => index = sgr_extended(ctx, params, index, ColorTarget::Foreground),
            39 => ctx.cell.fg = Color::Default,
            40..=47 => ctx.cell.bg = Color::Indexed((n - 40) as u8),
            48 => index = sgr_extended(ctx, params, index, ColorTarget::Background),
            49 => ctx.cell.bg = Color::Default,
            58 => index = sgr_extended(ctx, params, index, ColorTarget::Underline),
            59 => ctx.cell.underline_color = Color::Default,
            90..=97 => ctx.cell.fg = Color::Indexed((n - 90 + 8) as u8),
            100..=107 => ctx.cell.bg = Color::Indexed((n - 100 + 8) as u8),
            _ => debug!("[sgr] unknown attribute {n}"),
        }

        index += 1;
    }
}

/// Semicolon-separated extended colour (`38;2;r;g;b`, `38;5;n`). Returns
/// the index of the last consumed parameter.
fn sgr_extended(
    ctx: &mut Context,
    params: &Params,
    index: usize,
    target: ColorTarget,
) -> usize {
    match params.get(index + 1, 0, 0) {
        2 => {
            let r = params.get(index + 2, 0, -1);
            let g = params.get(index + 3, 0, -1);
            let b = params.get(index + 4, 0, -1);
            if let (Ok(r), Ok(g), Ok(b)) =
                (u8::try_from(r), u8::try_from(g), u8::try_from(b))
            {
                set_color_target(ctx, target, Color::Rgb(Rgb { r, g, b }));
            }
            index + 4
        },
        5 => {
            if let Ok(i) = u8::try_from(params.get(index + 2, 0, -1)) {
                set_color_target(ctx, target, Color::Indexed(i));
            }
            index + 2
        },
        form => {
            debug!("[sgr] unknown extended colour form {form}");
            index + 1
        },
    }
}

/// Colon-subparameter SGR field (`4:3`, `38:2:0:r:g:b`, `38:5:n`).
fn sgr_colon(ctx: &mut Context, text: &str) {
    let mut subs = [0i32; 8];
    let mut count = 0;

    for part in text.split(':') {
        if count == subs.len() {
            debug!("[sgr] too many subparameters");
            return;
        }
        subs[count] = if part.is_empty() {
            -1
        } else {
            match part.parse::<i32>() {
                Ok(value) => value,
                Err(_) => {
                    debug!("[sgr] bad subparameter in {text:?}");
                    return;
                },
            }
        };
        count += 1;
    }
    let subs = &subs[..count];

    match subs[0] {
        4 => {
            let style = if count >= 2 && subs[1] >= 0 { subs[1] } else { 1 };
            match UnderlineStyle::from_subparam(style) {
                Some(UnderlineStyle::None) => {
                    ctx.cell.attrs.remove(CellAttrs::UNDERLINE);
                    ctx.cell.underline_style = UnderlineStyle::None;
                },
                Some(style) => {
                    ctx.cell.attrs.insert(CellAttrs::UNDERLINE);
                    ctx.cell.underline_style = style;
                },
                None => debug!("[sgr] unknown underline style {style}"),
            }
        },
        n @ (38 | 48 | 58) => {
            let target = match n {
                38 => ColorTarget::Foreground,
                48 => ColorTarget::Background,
                _ => ColorTarget::Underline,
            };

            if count < 2 {
                return;
            }
            match subs[1] {
                2 => {
                    // Six fields carry a colourspace identifier before the
                    // channels, five do not.
                    let rgb = match count {
                        5 => (subs[2], subs[3], subs[4]),
                        6.. => (subs[3], subs[4], subs[5]),
                        _ => return,
                    };
                    if let (Ok(r), Ok(g), Ok(b)) = (
                        u8::try_from(rgb.0),
                        u8::try_from(rgb.1),
                        u8::try_from(rgb.2),
                    ) {
                        set_color_target(ctx, target, Color::Rgb(Rgb { r, g, b }));
                    }
                },
                5 => {
                    if count >= 3 {
                        if let Ok(i) = u8::try_from(subs[2]) {
                            set_color_target(ctx, target, Color::Indexed(i));
                        }
                    }
                },
                form => debug!("[sgr] unknown extended colour form {form}"),
            }
        },
        n => debug!("[sgr] unknown colon attribute {n}"),
    }
}

/// DECCIR payload: cursor position, page, rendition, protection and flag
/// bits, GL/GR selectors, charset size and designations.
fn cursor_information_payload<S: ScreenActor>(ctx: &Context, screen: &S) -> String {
    let (cx, cy) = screen.cursor();
    let (top, _, _, _) = screen.margins();
    let origin = screen.mode_flags().contains(TermModes::ORIGIN);
    let row = if origin { cy.saturating_sub(top) } else { cy } + 1;
    let col = cx + 1;

    let attrs = ctx.cell.attrs;
    let mut srend = 0x40u8;
    if attrs.contains(CellAttrs::BOLD) {
        srend |= 0x1;
    }
    if attrs.contains(CellAttrs::UNDERLINE) {
        srend |= 0x2;
    }
    if attrs.contains(CellAttrs::BLINK) {
        srend |= 0x4;
    }
    if attrs.contains(CellAttrs::REVERSE) {
        srend |= 0x8;
    }

    let mut satt = 0x40u8;
    if attrs.contains(CellAttrs::PROTECTED) {
        satt |= 0x1;
    }

    let mut sflag = 0x40u8;
    if origin {
        sflag |= 0x1;
    }

    let g0 = if ctx.cell.g0_is_acs { '0' } else { 'B' };
    let g1 = if ctx.cell.g1_is_acs { '0' } else { 'B' };

    format!(
        "{row};{col};1;{};{};{};{};2;@;{g0}{g1}BB",
        srend as char, satt as char, sflag as char, ctx.cell.set
    )
}

/// DECTABSR payload: 1-based tab stop columns joined with slashes.
fn tab_stop_payload<S: ScreenActor>(screen: &S) -> String {
    screen
        .tab_stops()
        .into_iter()
        .map(|column| (column + 1).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

/// DECCTR payload: palette entries as RGB percentages.
fn color_table_payload<S: ScreenActor>(screen: &S) -> String {
    let percent = |v: u8| (u32::from(v) * 100 + 127) / 255;
    (0..256)
        .filter_map(|index| {
            screen.palette_get(index).map(|rgb| {
                format!(
                    "{index};2;{};{};{}",
                    percent(rgb.r),
                    percent(rgb.g),
                    percent(rgb.b)
                )
            })
        })
        .collect::<Vec<_>>()
        .join("/")
}
