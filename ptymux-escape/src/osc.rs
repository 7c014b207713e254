use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use log::debug;
use memchr::memchr;
use ptymux_vte::StringTerminator;

use crate::actor::{ScreenActor, SpecialColor};
use crate::cell::Hyperlink;
use crate::color::xparse_color;
use crate::options::{Options, SetClipboard};
use crate::parser::Context;
use crate::reply;

/// Operating system commands recognized by their option number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Osc {
    /// OSC 0 / OSC 2.
    SetTitle,
    /// OSC 4, `index;spec` pairs; `?` specs are queries.
    Palette,
    /// OSC 7, working-directory path.
    SetPath,
    /// OSC 8, `params;uri`.
    Hyperlink,
    /// OSC 10.
    ForegroundColor,
    /// OSC 11.
    BackgroundColor,
    /// OSC 12.
    CursorColor,
    /// OSC 52, `cfg;base64-data`.
    Clipboard,
    /// OSC 104, reset palette entries.
    ResetPalette,
    /// OSC 110 / 111 / 112.
    ResetForegroundColor,
    ResetBackgroundColor,
    ResetCursorColor,
    /// OSC 133 shell-integration markers.
    ShellIntegration,
    Unhandled,
}

impl From<&[u8]> for Osc {
    fn from(number: &[u8]) -> Self {
        match number {
            b"0" | b"2" => Self::SetTitle,
            b"4" => Self::Palette,
            b"7" => Self::SetPath,
            b"8" => Self::Hyperlink,
            b"10" => Self::ForegroundColor,
            b"11" => Self::BackgroundColor,
            b"12" => Self::CursorColor,
            b"52" => Self::Clipboard,
            b"104" => Self::ResetPalette,
            b"110" => Self::ResetForegroundColor,
            b"111" => Self::ResetBackgroundColor,
            b"112" => Self::ResetCursorColor,
            b"133" => Self::ShellIntegration,
            _ => Self::Unhandled,
        }
    }
}

pub(crate) fn perform<S: ScreenActor>(
    ctx: &mut Context,
    options: &Options,
    screen: &mut S,
    payload: &[u8],
    terminator: StringTerminator,
) {
    let (number, rest) = match memchr(b';', payload) {
        Some(split) => (&payload[..split], &payload[split + 1..]),
        None => (payload, &payload[..0]),
    };

    match Osc::from(number) {
        Osc::SetTitle => {
            if options.allow_set_title {
                if let Ok(title) = str::from_utf8(rest) {
                    screen.set_title(title);
                }
            }
        },
        Osc::Palette => palette(ctx, screen, rest, terminator),
        Osc::SetPath => {
            if let Ok(path) = str::from_utf8(rest) {
                screen.set_path(path);
            }
        },
        Osc::Hyperlink => hyperlink(ctx, rest),
        Osc::ForegroundColor => {
            special_color(ctx, screen, rest, terminator, 10, SpecialColor::Foreground);
        },
        Osc::BackgroundColor => {
            special_color(ctx, screen, rest, terminator, 11, SpecialColor::Background);
        },
        Osc::CursorColor => {
            special_color(ctx, screen, rest, terminator, 12, SpecialColor::Cursor);
        },
        Osc::Clipboard => clipboard(ctx, options, screen, rest, terminator),
        Osc::ResetPalette => {
            if rest.is_empty() && memchr(b';', payload).is_none() {
                screen.palette_reset_all();
            } else {
                for field in rest.split(|&b| b == b';') {
                    match parse_index(field) {
                        Some(index) => screen.palette_reset(index),
                        None => debug!("[osc] bad palette index"),
                    }
                }
            }
        },
        Osc::ResetForegroundColor => {
            if rest.is_empty() {
                screen.reset_special_color(SpecialColor::Foreground);
                screen.full_redraw();
            }
        },
        Osc::ResetBackgroundColor => {
            if rest.is_empty() {
                screen.reset_special_color(SpecialColor::Background);
                screen.full_redraw();
            }
        },
        Osc::ResetCursorColor => {
            if rest.is_empty() {
                screen.reset_special_color(SpecialColor::Cursor);
            }
        },
        Osc::ShellIntegration => match rest.first().copied() {
            Some(b'A') => screen.prompt_mark(),
            Some(b'C') => screen.output_mark(),
            other => debug!("[osc] unknown shell integration marker {other:?}"),
        },
        Osc::Unhandled => {
            debug!("[osc] unknown option {:?}", String::from_utf8_lossy(number));
        },
    }
}

fn parse_index(field: &[u8]) -> Option<usize> {
    if field.is_empty() || field.len() > 3 {
        return None;
    }
    let mut value = 0usize;
    for &b in field {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + usize::from(b - b'0');
    }
    (value <= 255).then_some(value)
}

fn palette<S: ScreenActor>(
    ctx: &mut Context,
    screen: &mut S,
    rest: &[u8],
    terminator: StringTerminator,
) {
    let mut fields = rest.split(|&b| b == b';');
    while let Some(index_field) = fields.next() {
        let Some(spec) = fields.next() else {
            debug!("[osc] palette entry without colour spec");
            return;
        };
        let Some(index) = parse_index(index_field) else {
            debug!("[osc] bad palette index");
            continue;
        };

        if spec == b"?" {
            if let Some(rgb) = screen.palette_get(index) {
                ctx.reply(reply::palette_reply(index, rgb, terminator));
            }
        } else {
            match xparse_color(spec) {
                Some(rgb) => screen.palette_set(index, rgb),
                None => debug!("[osc] bad colour spec for palette entry {index}"),
            }
        }
    }
}

fn special_color<S: ScreenActor>(
    ctx: &mut Context,
    screen: &mut S,
    rest: &[u8],
    terminator: StringTerminator,
    ps: u8,
    which: SpecialColor,
) {
    if rest == b"?" {
        if let Some(rgb) = screen.special_color(which) {
            ctx.reply(reply::special_color_reply(ps, rgb, terminator));
        }
        return;
    }

    match xparse_color(rest) {
        Some(rgb) => {
            screen.set_special_color(which, rgb);
            if !matches!(which, SpecialColor::Cursor) {
                screen.full_redraw();
            }
        },
        None => debug!("[osc] bad colour spec {:?}", String::from_utf8_lossy(rest)),
    }
}

fn hyperlink(ctx: &mut Context, rest: &[u8]) {
    let Some(split) = memchr(b';', rest) else {
        debug!("[osc] hyperlink without uri");
        return;
    };
    let (params, uri) = (&rest[..split], &rest[split + 1..]);

    if uri.is_empty() {
        ctx.cell.link = None;
        return;
    }

    let Ok(uri) = str::from_utf8(uri) else {
        debug!("[osc] hyperlink uri is not valid UTF-8");
        return;
    };

    // `id=` is the only recognized hyperlink parameter.
    let id = params
        .split(|&b| b == b':')
        .find_map(|param| param.strip_prefix(b"id="))
        .and_then(|id| str::from_utf8(id).ok())
        .map(str::to_string);

    ctx.cell.link = Some(Hyperlink {
        id,
        uri: uri.to_string(),
    });
}

fn clipboard<S: ScreenActor>(
    ctx: &mut Context,
    options: &Options,
    screen: &mut S,
    rest: &[u8],
    terminator: StringTerminator,
) {
    let Some(split) = memchr(b';', rest) else {
        debug!("[osc] clipboard without data");
        return;
    };
    let (cfg, data) = (&rest[..split], &rest[split + 1..]);
    let Ok(cfg) = str::from_utf8(cfg) else {
        debug!("[osc] bad clipboard selection");
        return;
    };

    if data == b"?" {
        if options.set_clipboard == SetClipboard::External {
            if let Some(top) = screen.clipboard_top() {
                let encoded = BASE64.encode(&top);
                ctx.reply(reply::clipboard_reply(cfg, &encoded, terminator));
            }
        }
        return;
    }

    match BASE64.decode(data) {
        Ok(decoded) => match options.set_clipboard {
            SetClipboard::Off => {},
            SetClipboard::Internal => screen.clipboard_store(decoded),
            SetClipboard::External => {
                screen.set_selection(cfg, &decoded);
                screen.clipboard_store(decoded);
            },
        },
        Err(_) => debug!("[osc] clipboard data is not valid base64"),
    }
}

/// APC strings carry a pane title.
pub(crate) fn perform_apc<S: ScreenActor>(screen: &mut S, payload: &[u8]) {
    if let Ok(title) = str::from_utf8(payload) {
        screen.set_title(title);
    }
}

/// `ESC k … ST` renames the window; an empty payload removes the
/// automatic-rename override.
pub(crate) fn perform_rename<S: ScreenActor>(
    options: &Options,
    screen: &mut S,
    payload: &[u8],
) {
    if !options.allow_rename {
        return;
    }

    if payload.is_empty() {
        screen.clear_window_name_override();
        return;
    }

    if let Ok(name) = str::from_utf8(payload) {
        screen.set_window_name(name);
    }
}
