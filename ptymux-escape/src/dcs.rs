use log::{debug, warn};
use ptymux_vte::Params;
use thiserror::Error;

use crate::actor::ScreenActor;
use crate::cell::CellAttrs;
use crate::color::{Rgb, hls_to_rgb};
use crate::mode::NamedPrivateMode;
use crate::options::{Options, Passthrough};
use crate::parser::Context;

/// Prefix a host program uses to tunnel raw bytes to the outer terminal.
const PASSTHROUGH_PREFIX: &[u8] = b"tmux;";

#[derive(Debug, Error, PartialEq, Eq)]
enum StateRestoreError {
    #[error("payload is not valid UTF-8")]
    NotUtf8,

    #[error("payload is missing fields")]
    MissingFields,

    #[error("bad numeric field")]
    BadNumber,

    #[error("bad flag field")]
    BadFlags,

    #[error("bad colour entry")]
    BadColor,
}

/// Dispatch a completed device control string. The payload begins with the
/// DCS final byte; embedded escapes are still present.
pub(crate) fn perform<S: ScreenActor>(
    ctx: &mut Context,
    options: &Options,
    screen: &mut S,
    params: &Params,
    intermediates: &[u8],
    payload: &[u8],
) {
    let Some(&final_byte) = payload.first() else {
        return;
    };

    match (intermediates, final_byte) {
        // DECRSPS: restore a presentation state report.
        (b"$", b't') => match params.get(0, 0, 0) {
            1 => {
                if let Err(err) = restore_cursor_information(ctx, screen, &payload[1..]) {
                    warn!("[dcs] dropping cursor state restore: {err}");
                }
            },
            2 => {
                if let Err(err) = restore_tab_stops(screen, &payload[1..]) {
                    warn!("[dcs] dropping tab stop restore: {err}");
                }
            },
            n => debug!("[dcs] unknown presentation state {n}"),
        },
        // DECRSTS: restore a terminal state report.
        (b"$", b'p') => match params.get(0, 0, 0) {
            2 => {
                if let Err(err) = restore_color_table(screen, &payload[1..]) {
                    warn!("[dcs] dropping colour table restore: {err}");
                }
            },
            n => debug!("[dcs] unknown terminal state {n}"),
        },
        (b"", _) if payload.starts_with(PASSTHROUGH_PREFIX) => {
            if options.allow_passthrough == Passthrough::Off {
                return;
            }
            let allow_wrap = options.allow_passthrough == Passthrough::OnAllowWrap;
            screen.raw_string(&payload[PASSTHROUGH_PREFIX.len()..], allow_wrap);
        },
        (b"", b'q') => {
            if options.sixel && ctx.level.has_sixel() {
                let p1 = params.get(0, 0, 0).max(0) as u32;
                screen.sixel_image(&payload[1..], p1);
            } else {
                debug!("[dcs] sixel payload ignored");
            }
        },
        _ => {
            debug!(
                "[dcs] unknown device control string: {:?} {:?}",
                intermediates, final_byte as char
            );
        },
    }
}

fn parse_number(field: &str) -> Result<usize, StateRestoreError> {
    if field.is_empty() {
        return Err(StateRestoreError::BadNumber);
    }
    field
        .parse::<usize>()
        .map_err(|_| StateRestoreError::BadNumber)
}

fn flag_byte(field: &str) -> Result<u8, StateRestoreError> {
    let mut bytes = field.bytes();
    match (bytes.next(), bytes.next()) {
        (Some(b @ 0x40..=0x4f), None) => Ok(b),
        _ => Err(StateRestoreError::BadFlags),
    }
}

/// Parse and apply a DECCIR payload: cursor position, rendition and
/// protection bits, origin and last-column flags, GL selector and charset
/// designations.
fn restore_cursor_information<S: ScreenActor>(
    ctx: &mut Context,
    screen: &mut S,
    data: &[u8],
) -> Result<(), StateRestoreError> {
    let text = str::from_utf8(data).map_err(|_| StateRestoreError::NotUtf8)?;
    let fields: Vec<&str> = text.split(';').collect();
    if fields.len() < 10 {
        return Err(StateRestoreError::MissingFields);
    }

    let row = parse_number(fields[0])?;
    let col = parse_number(fields[1])?;
    let _page = parse_number(fields[2])?;
    let srend = flag_byte(fields[3])?;
    let satt = flag_byte(fields[4])?;
    let sflag = flag_byte(fields[5])?;
    let pgl = parse_number(fields[6])?;
    let _pgr = parse_number(fields[7])?;
    if row == 0 || col == 0 || pgl > 3 {
        return Err(StateRestoreError::BadNumber);
    }

    let designations = fields[9].as_bytes();
    let acs = |index: usize| -> Result<bool, StateRestoreError> {
        match designations.get(index) {
            Some(b'0') => Ok(true),
            Some(b'B') | None => Ok(false),
            _ => Err(StateRestoreError::BadFlags),
        }
    };
    let g0_is_acs = acs(0)?;
    let g1_is_acs = acs(1)?;

    ctx.cell.attrs.remove(
        CellAttrs::BOLD | CellAttrs::UNDERLINE | CellAttrs::BLINK | CellAttrs::REVERSE,
    );
    if srend & 0x1 != 0 {
        ctx.cell.attrs.insert(CellAttrs::BOLD);
    }
    if srend & 0x2 != 0 {
        ctx.cell.attrs.insert(CellAttrs::UNDERLINE);
    }
    if srend & 0x4 != 0 {
        ctx.cell.attrs.insert(CellAttrs::BLINK);
    }
    if srend & 0x8 != 0 {
        ctx.cell.attrs.insert(CellAttrs::REVERSE);
    }

    if satt & 0x1 != 0 {
        ctx.cell.attrs.insert(CellAttrs::PROTECTED);
    } else {
        ctx.cell.attrs.remove(CellAttrs::PROTECTED);
    }

    let origin = sflag & 0x1 != 0;
    if origin {
        screen.set_private_mode(NamedPrivateMode::Origin.into());
    } else {
        screen.clear_private_mode(NamedPrivateMode::Origin.into());
    }

    ctx.cell.set = u8::from(pgl != 0);
    ctx.cell.g0_is_acs = g0_is_acs;
    ctx.cell.g1_is_acs = g1_is_acs;

    // The last-column flag leaves the cursor past the right margin with
    // the next print wrapping.
    let x = if sflag & 0x8 != 0 {
        let (_, _, _, right) = screen.margins();
        right + 1
    } else {
        col - 1
    };
    screen.cursor_move(Some(x), Some(row - 1), origin);

    Ok(())
}

/// Parse and apply a DECTABSR payload: slash-separated 1-based tab stops.
fn restore_tab_stops<S: ScreenActor>(
    screen: &mut S,
    data: &[u8],
) -> Result<(), StateRestoreError> {
    let text = str::from_utf8(data).map_err(|_| StateRestoreError::NotUtf8)?;

    let mut columns = Vec::new();
    if !text.is_empty() {
        for field in text.split('/') {
            let stop = parse_number(field)?;
            if stop == 0 {
                return Err(StateRestoreError::BadNumber);
            }
            columns.push(stop - 1);
        }
    }

    screen.replace_tab_stops(&columns);
    Ok(())
}

/// Parse and apply a DECCTR payload: slash-separated `index;cs;x;y;z`
/// colour entries in HLS (cs=1) or RGB percent (cs=2) form. Any parse
/// error preserves the existing palette.
fn restore_color_table<S: ScreenActor>(
    screen: &mut S,
    data: &[u8],
) -> Result<(), StateRestoreError> {
    let text = str::from_utf8(data).map_err(|_| StateRestoreError::NotUtf8)?;

    let mut entries = Vec::new();
    for entry in text.split('/') {
        if entry.is_empty() {
            continue;
        }

        let fields: Vec<&str> = entry.split(';').collect();
        if fields.len() != 5 {
            return Err(StateRestoreError::MissingFields);
        }

        let index = parse_number(fields[0])?;
        if index > 255 {
            return Err(StateRestoreError::BadColor);
        }

        let x = parse_number(fields[2])?;
        let y = parse_number(fields[3])?;
        let z = parse_number(fields[4])?;

        let rgb = match fields[1] {
            "1" => hls_to_rgb(
                u16::try_from(x).map_err(|_| StateRestoreError::BadColor)?,
                u16::try_from(y).map_err(|_| StateRestoreError::BadColor)?,
                u16::try_from(z).map_err(|_| StateRestoreError::BadColor)?,
            )
            .ok_or(StateRestoreError::BadColor)?,
            "2" => {
                if x > 100 || y > 100 || z > 100 {
                    return Err(StateRestoreError::BadColor);
                }
                let scale = |percent: usize| ((percent * 255 + 50) / 100) as u8;
                Rgb::new(scale(x), scale(y), scale(z))
            },
            _ => return Err(StateRestoreError::BadColor),
        };

        entries.push((index, rgb));
    }

    for (index, rgb) in entries {
        screen.palette_set(index, rgb);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_bytes_are_single_characters_in_range() {
        assert_eq!(flag_byte("@"), Ok(0x40));
        assert_eq!(flag_byte("O"), Ok(0x4f));
        assert_eq!(flag_byte("AB"), Err(StateRestoreError::BadFlags));
        assert_eq!(flag_byte(""), Err(StateRestoreError::BadFlags));
        assert_eq!(flag_byte("5"), Err(StateRestoreError::BadFlags));
    }

    #[test]
    fn numbers_reject_junk() {
        assert_eq!(parse_number("42"), Ok(42));
        assert_eq!(parse_number(""), Err(StateRestoreError::BadNumber));
        assert_eq!(parse_number("4a"), Err(StateRestoreError::BadNumber));
    }
}
