use std::collections::HashMap;
use std::time::Duration;

use ptymux_escape::{
    CellStyle, Color, ExtendedKeys, ModifyOtherKeys, Options, Parser, Passthrough, PrivateMode,
    Rgb, ScreenActor, SetClipboard, SpecialColor, TabClearMode, TermLevel, TermModes, Timeout,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Effect {
    Print(char, CellStyle),
    CursorMove(Option<usize>, Option<usize>, bool),
    SetPrivateMode(u16),
    ClearPrivateMode(u16),
    SetMode(u16),
    ClearMode(u16),
    ClearScreen,
    ClearEndOfScreen,
    ClearHistory,
    ClearTabs(TabClearMode),
    ReplaceTabStops(Vec<usize>),
    ScrollRegion(usize, usize),
    ScrollMargin(usize, usize),
    AlternateOn(bool),
    AlternateOff(bool),
    SetTitle(String),
    SetWindowName(String),
    ClearWindowNameOverride,
    SetCursorStyle(u8),
    SetModifyOtherKeys(ModifyOtherKeys),
    PaletteSet(usize, Rgb),
    PaletteReset(usize),
    PaletteResetAll,
    SetSpecialColor(SpecialColor, Rgb),
    ResetSpecialColor(SpecialColor),
    ClipboardStore(Vec<u8>),
    SetSelection(String, Vec<u8>),
    RawString(Vec<u8>, bool),
    SixelImage(Vec<u8>, u32),
    PromptMark,
    OutputMark,
    Reset,
    SoftReset,
    FullRedraw,
}

/// Screen double: records effects and answers state queries from plain
/// fields the test presets.
#[derive(Default)]
struct RecordingScreen {
    effects: Vec<Effect>,
    cursor: (usize, usize),
    size: (usize, usize),
    margins: Option<(usize, usize, usize, usize)>,
    flags: TermModes,
    tabs: Vec<usize>,
    palette: HashMap<usize, Rgb>,
    clipboard: Option<Vec<u8>>,
}

impl RecordingScreen {
    fn new() -> Self {
        Self {
            size: (80, 24),
            ..Default::default()
        }
    }
}

impl ScreenActor for RecordingScreen {
    fn collect_add(&mut self, c: char, style: &CellStyle) {
        self.effects.push(Effect::Print(c, style.clone()));
    }

    fn cursor_move(&mut self, x: Option<usize>, y: Option<usize>, origin: bool) {
        self.effects.push(Effect::CursorMove(x, y, origin));
    }

    fn set_private_mode(&mut self, mode: PrivateMode) {
        self.effects.push(Effect::SetPrivateMode(mode.raw()));
    }

    fn clear_private_mode(&mut self, mode: PrivateMode) {
        self.effects.push(Effect::ClearPrivateMode(mode.raw()));
    }

    fn set_mode(&mut self, mode: ptymux_escape::Mode) {
        self.effects.push(Effect::SetMode(mode.raw()));
    }

    fn clear_mode(&mut self, mode: ptymux_escape::Mode) {
        self.effects.push(Effect::ClearMode(mode.raw()));
    }

    fn clear_screen(&mut self, _bg: Color) {
        self.effects.push(Effect::ClearScreen);
    }

    fn clear_end_of_screen(&mut self, _bg: Color) {
        self.effects.push(Effect::ClearEndOfScreen);
    }

    fn clear_history(&mut self) {
        self.effects.push(Effect::ClearHistory);
    }

    fn clear_tabs(&mut self, mode: TabClearMode) {
        self.effects.push(Effect::ClearTabs(mode));
    }

    fn tab_stops(&self) -> Vec<usize> {
        self.tabs.clone()
    }

    fn replace_tab_stops(&mut self, columns: &[usize]) {
        self.effects.push(Effect::ReplaceTabStops(columns.to_vec()));
    }

    fn set_scroll_region(&mut self, top: usize, bottom: usize) {
        self.effects.push(Effect::ScrollRegion(top, bottom));
    }

    fn set_scroll_margin(&mut self, left: usize, right: usize) {
        self.effects.push(Effect::ScrollMargin(left, right));
    }

    fn alternate_on(&mut self, _style: &CellStyle, save_cursor: bool) {
        self.effects.push(Effect::AlternateOn(save_cursor));
    }

    fn alternate_off(&mut self, _style: &CellStyle, restore_cursor: bool) {
        self.effects.push(Effect::AlternateOff(restore_cursor));
    }

    fn set_title(&mut self, title: &str) {
        self.effects.push(Effect::SetTitle(title.to_string()));
    }

    fn set_window_name(&mut self, name: &str) {
        self.effects.push(Effect::SetWindowName(name.to_string()));
    }

    fn clear_window_name_override(&mut self) {
        self.effects.push(Effect::ClearWindowNameOverride);
    }

    fn set_cursor_style(&mut self, style: u8) {
        self.effects.push(Effect::SetCursorStyle(style));
    }

    fn set_modify_other_keys(&mut self, state: ModifyOtherKeys) {
        self.effects.push(Effect::SetModifyOtherKeys(state));
    }

    fn palette_set(&mut self, index: usize, rgb: Rgb) {
        self.effects.push(Effect::PaletteSet(index, rgb));
    }

    fn palette_get(&self, index: usize) -> Option<Rgb> {
        self.palette.get(&index).copied()
    }

    fn palette_reset(&mut self, index: usize) {
        self.effects.push(Effect::PaletteReset(index));
    }

    fn palette_reset_all(&mut self) {
        self.effects.push(Effect::PaletteResetAll);
    }

    fn set_special_color(&mut self, which: SpecialColor, rgb: Rgb) {
        self.effects.push(Effect::SetSpecialColor(which, rgb));
    }

    fn reset_special_color(&mut self, which: SpecialColor) {
        self.effects.push(Effect::ResetSpecialColor(which));
    }

    fn clipboard_store(&mut self, data: Vec<u8>) {
        self.effects.push(Effect::ClipboardStore(data));
    }

    fn clipboard_top(&self) -> Option<Vec<u8>> {
        self.clipboard.clone()
    }

    fn set_selection(&mut self, flags: &str, data: &[u8]) {
        self.effects
            .push(Effect::SetSelection(flags.to_string(), data.to_vec()));
    }

    fn raw_string(&mut self, data: &[u8], allow_wrap: bool) {
        self.effects.push(Effect::RawString(data.to_vec(), allow_wrap));
    }

    fn sixel_image(&mut self, data: &[u8], p1: u32) {
        self.effects.push(Effect::SixelImage(data.to_vec(), p1));
    }

    fn prompt_mark(&mut self) {
        self.effects.push(Effect::PromptMark);
    }

    fn output_mark(&mut self) {
        self.effects.push(Effect::OutputMark);
    }

    fn reset(&mut self) {
        self.effects.push(Effect::Reset);
    }

    fn soft_reset(&mut self) {
        self.effects.push(Effect::SoftReset);
    }

    fn full_redraw(&mut self) {
        self.effects.push(Effect::FullRedraw);
    }

    fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    fn grid_size(&self) -> (usize, usize) {
        self.size
    }

    fn margins(&self) -> (usize, usize, usize, usize) {
        self.margins
            .unwrap_or((0, self.size.1 - 1, 0, self.size.0 - 1))
    }

    fn mode_flags(&self) -> TermModes {
        self.flags
    }
}

fn feed(bytes: &[u8]) -> (Parser, RecordingScreen) {
    feed_with(Options::default(), bytes)
}

fn feed_with(options: Options, bytes: &[u8]) -> (Parser, RecordingScreen) {
    let mut parser = Parser::new(options);
    let mut screen = RecordingScreen::new();
    parser.advance(bytes, &mut screen);
    (parser, screen)
}

fn prints(screen: &RecordingScreen) -> Vec<(char, CellStyle)> {
    screen
        .effects
        .iter()
        .filter_map(|e| match e {
            Effect::Print(c, style) => Some((*c, style.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn cursor_position_is_origin_relative() {
    let (_, screen) = feed(b"\x1b[5;10H");
    assert_eq!(
        screen.effects,
        vec![Effect::CursorMove(Some(9), Some(4), true)]
    );
}

#[test]
fn show_cursor_mode_set_and_cleared() {
    let (_, screen) = feed(b"\x1b[?25h\x1b[?25l");
    assert_eq!(
        screen.effects,
        vec![Effect::SetPrivateMode(25), Effect::ClearPrivateMode(25)]
    );
}

#[test]
fn sgr_rgb_then_reset_preserves_hyperlink() {
    let (_, screen) = feed(
        b"\x1b]8;;https://example.org\x1b\\\x1b[38;2;255;128;0mA\x1b[0mB",
    );

    let prints = prints(&screen);
    assert_eq!(prints.len(), 2);

    let (c, style) = &prints[0];
    assert_eq!(*c, 'A');
    assert_eq!(style.fg, Color::Rgb(Rgb::new(255, 128, 0)));
    assert_eq!(style.link.as_ref().unwrap().uri, "https://example.org");

    let (c, style) = &prints[1];
    assert_eq!(*c, 'B');
    assert_eq!(style.fg, Color::Default);
    assert_eq!(
        style.link.as_ref().map(|l| l.uri.as_str()),
        Some("https://example.org")
    );
}

#[test]
fn device_attributes_reply_reflects_maximum_level() {
    let (mut parser, _) = feed(b"\x1b[0c");
    assert_eq!(parser.take_replies(), b"\x1b[?62;1;2;6;16;17;21;22c");

    let options = Options {
        emulation_level: TermLevel::Vt241,
        ..Default::default()
    };
    let (mut parser, _) = feed_with(options, b"\x1b[0c");
    assert_eq!(parser.take_replies(), b"\x1b[?62;1;2;3;4;6;16;17;21;22c");
}

#[test]
fn secondary_and_extended_device_attributes() {
    let (mut parser, _) = feed(b"\x1b[>c");
    assert_eq!(parser.take_replies(), b"\x1b[>84;0;0c");

    let (mut parser, _) = feed(b"\x1b[>q");
    let reply = parser.take_replies();
    assert!(reply.starts_with(b"\x1bP>|ptymux "));
    assert!(reply.ends_with(b"\x1b\\"));
}

#[test]
fn hyperlink_id_and_clear() {
    let (_, screen) = feed(b"\x1b]8;id=x;https://example.org\x1b\\A\x1b]8;;\x1b\\B");

    let prints = prints(&screen);
    let link = prints[0].1.link.as_ref().unwrap();
    assert_eq!(link.uri, "https://example.org");
    assert_eq!(link.id.as_deref(), Some("x"));
    assert!(prints[1].1.link.is_none());
}

#[test]
fn utf8_print_and_repeat() {
    let (_, screen) = feed("中\x1b[3b".as_bytes());
    let prints = prints(&screen);
    assert_eq!(prints.len(), 4);
    assert!(prints.iter().all(|(c, _)| *c == '中'));
}

#[test]
fn repeat_without_preceding_print_does_nothing() {
    let (_, screen) = feed(b"\x07\x1b[3b");
    assert!(prints(&screen).is_empty());
}

#[test]
fn repeat_is_capped_by_right_margin() {
    let mut screen = RecordingScreen::new();
    screen.cursor = (78, 0);
    let mut parser = Parser::default();
    parser.advance("x\x1b[10b".as_bytes(), &mut screen);
    // One initial print plus at most the two columns left of the margin.
    assert_eq!(prints(&screen).len(), 3);
}

#[test]
fn decrqss_sgr_reconstructs_cell() {
    let (mut parser, _) = feed(b"\x1b[1m\x1b[38;2;1;2;3m\x1bP$qm\x1b\\");
    assert_eq!(parser.take_replies(), b"\x1bP1$r0;1;38:2:0:1:2:3m\x1b\\");
}

#[test]
fn decrqss_unknown_setting_replies_failure() {
    let (mut parser, _) = feed(b"\x1bP$qz\x1b\\");
    assert_eq!(parser.take_replies(), b"\x1bP0$r\x1b\\");
}

#[test]
fn decrqss_cursor_style_falls_back_to_option() {
    let options = Options {
        cursor_style: 3,
        ..Default::default()
    };
    let (mut parser, _) = feed_with(options, b"\x1bP$q q\x1b\\");
    assert_eq!(parser.take_replies(), b"\x1bP1$r3 q\x1b\\");

    let (mut parser, _) = feed(b"\x1b[4 q\x1bP$q q\x1b\\");
    assert_eq!(parser.take_replies(), b"\x1bP1$r4 q\x1b\\");
}

#[test]
fn sgr_round_trips_through_settings_query() {
    let input = b"\x1b[4:3m\x1b[38;2;10;20;30m\x1b[48;5;100m\x1b[58:2::1:2:3m";

    let mut query = b"\x1bP$qm\x1b\\".to_vec();
    let mut bytes = input.to_vec();
    bytes.extend_from_slice(&query);
    let (mut parser, _) = feed(&bytes);
    let reply = parser.take_replies();

    // Re-apply the reply payload as a CSI sequence on a fresh parser.
    let payload = reply
        .strip_prefix(b"\x1bP1$r".as_slice())
        .and_then(|r| r.strip_suffix(b"\x1b\\".as_slice()))
        .unwrap();
    let mut bytes = b"\x1b[".to_vec();
    bytes.extend_from_slice(payload);
    bytes.append(&mut query);

    let (mut parser, _) = feed(&bytes);
    assert_eq!(parser.take_replies(), reply);
}

#[test]
fn tab_stops_round_trip_through_presentation_report() {
    let mut screen = RecordingScreen::new();
    screen.tabs = vec![0, 8, 33];
    let mut parser = Parser::default();
    parser.advance(b"\x1b[2$w", &mut screen);

    let reply = parser.take_replies();
    assert_eq!(reply, b"\x1bP2$u1/9/34\x1b\\");

    // Feed the report back as a restore.
    let mut bytes = b"\x1bP2$t".to_vec();
    bytes.extend_from_slice(&reply[b"\x1bP2$u".len()..reply.len() - 2]);
    bytes.extend_from_slice(b"\x1b\\");

    let (_, screen) = feed(&bytes);
    assert_eq!(
        screen.effects,
        vec![Effect::ReplaceTabStops(vec![0, 8, 33])]
    );
}

#[test]
fn cursor_information_round_trip() {
    let mut screen = RecordingScreen::new();
    screen.cursor = (5, 3);
    let mut parser = Parser::default();
    parser.advance(b"\x1b[1$w", &mut screen);

    let reply = parser.take_replies();
    assert_eq!(reply, b"\x1bP1$u4;6;1;@;@;@;0;2;@;BBBB\x1b\\");

    let mut bytes = b"\x1bP1$t".to_vec();
    bytes.extend_from_slice(&reply[b"\x1bP1$u".len()..reply.len() - 2]);
    bytes.extend_from_slice(b"\x1b\\");

    let (_, screen) = feed(&bytes);
    assert_eq!(
        screen.effects,
        vec![
            Effect::ClearPrivateMode(6),
            Effect::CursorMove(Some(5), Some(3), false),
        ]
    );
}

#[test]
fn color_table_restore_sets_palette() {
    let (_, screen) = feed(b"\x1bP2$p0;2;100;0;0/12;2;0;100;0\x1b\\");
    assert_eq!(
        screen.effects,
        vec![
            Effect::PaletteSet(0, Rgb::new(255, 0, 0)),
            Effect::PaletteSet(12, Rgb::new(0, 255, 0)),
        ]
    );
}

#[test]
fn color_table_restore_drops_all_entries_on_error() {
    let (_, screen) = feed(b"\x1bP2$p0;2;100;0;0/12;9;0;0;0\x1b\\");
    assert!(screen.effects.is_empty());
}

#[test]
fn full_reset_is_idempotent() {
    let (mut parser, mut screen) = feed(b"\x1b[1;31m\x1bc");
    assert_eq!(
        screen.effects,
        vec![Effect::PaletteResetAll, Effect::Reset, Effect::FullRedraw]
    );

    parser.advance(b"\x1bP$qm\x1b\\", &mut screen);
    assert_eq!(parser.take_replies(), b"\x1bP1$r0m\x1b\\");

    parser.advance(b"\x1bc\x1bP$qm\x1b\\", &mut screen);
    assert_eq!(parser.take_replies(), b"\x1bP1$r0m\x1b\\");
}

#[test]
fn conformance_switch_soft_resets_and_gates() {
    let (mut parser, screen) = feed(b"\x1b[61\"p\x1bP$q\"p\x1b\\");
    assert_eq!(screen.effects, vec![Effect::SoftReset]);
    assert_eq!(parser.take_replies(), b"\x1bP1$r61\"p\x1b\\");

    // DECIC is a no-op below VT220.
    let (_, screen) = feed(b"\x1b[61\"p\x1b[3'}");
    assert_eq!(screen.effects, vec![Effect::SoftReset]);
}

#[test]
fn passthrough_honours_option() {
    let (_, screen) = feed(b"\x1bPtmux;\x1b\x1b[31m\x1b\\");
    assert!(screen.effects.is_empty());

    let options = Options {
        allow_passthrough: Passthrough::On,
        ..Default::default()
    };
    let (_, screen) = feed_with(options, b"\x1bPtmux;\x1b\x1b[31m\x1b\\");
    assert_eq!(
        screen.effects,
        vec![Effect::RawString(b"\x1b[31m".to_vec(), false)]
    );

    let options = Options {
        allow_passthrough: Passthrough::OnAllowWrap,
        ..Default::default()
    };
    let (_, screen) = feed_with(options, b"\x1bPtmux;raw\x1b\\");
    assert_eq!(screen.effects, vec![Effect::RawString(b"raw".to_vec(), true)]);
}

#[test]
fn sixel_requires_option_and_level() {
    let (_, screen) = feed(b"\x1bP2qdata\x1b\\");
    assert!(screen.effects.is_empty());

    let options = Options {
        emulation_level: TermLevel::Vt241,
        sixel: true,
        ..Default::default()
    };
    let (_, screen) = feed_with(options, b"\x1bP2qdata\x1b\\");
    assert_eq!(
        screen.effects,
        vec![Effect::SixelImage(b"data".to_vec(), 2)]
    );
}

#[test]
fn clipboard_store_and_query() {
    let (_, screen) = feed(b"\x1b]52;c;aGVsbG8=\x07");
    assert_eq!(
        screen.effects,
        vec![Effect::ClipboardStore(b"hello".to_vec())]
    );

    // Queries answer only with the external clipboard policy.
    let mut screen = RecordingScreen::new();
    screen.clipboard = Some(b"hello".to_vec());
    let mut parser = Parser::default();
    parser.advance(b"\x1b]52;c;?\x07", &mut screen);
    assert!(parser.take_replies().is_empty());

    let options = Options {
        set_clipboard: SetClipboard::External,
        ..Default::default()
    };
    let mut parser: Parser = Parser::new(options);
    parser.advance(b"\x1b]52;c;?\x07", &mut screen);
    assert_eq!(parser.take_replies(), b"\x1b]52;c;aGVsbG8=\x07");
}

#[test]
fn palette_query_uses_matching_terminator() {
    let mut screen = RecordingScreen::new();
    screen.palette.insert(1, Rgb::new(0xaa, 0xbb, 0xcc));

    let mut parser = Parser::default();
    parser.advance(b"\x1b]4;1;?\x07", &mut screen);
    assert_eq!(parser.take_replies(), b"\x1b]4;1;rgb:aaaa/bbbb/cccc\x07");

    parser.advance(b"\x1b]4;1;?\x1b\\", &mut screen);
    assert_eq!(parser.take_replies(), b"\x1b]4;1;rgb:aaaa/bbbb/cccc\x1b\\");
}

#[test]
fn palette_set_and_reset() {
    let (_, screen) = feed(b"\x1b]4;1;rgb:ff/80/00\x07\x1b]104;1;2\x07\x1b]104\x07");
    assert_eq!(
        screen.effects,
        vec![
            Effect::PaletteSet(1, Rgb::new(0xff, 0x80, 0x00)),
            Effect::PaletteReset(1),
            Effect::PaletteReset(2),
            Effect::PaletteResetAll,
        ]
    );
}

#[test]
fn cursor_report_is_origin_adjusted() {
    let mut screen = RecordingScreen::new();
    screen.cursor = (3, 5);
    screen.margins = Some((2, 23, 0, 79));
    screen.flags = TermModes::ORIGIN;

    let mut parser = Parser::default();
    parser.advance(b"\x1b[6n", &mut screen);
    assert_eq!(parser.take_replies(), b"\x1b[4;4R");
}

#[test]
fn mode_requests_reply_with_state() {
    let mut screen = RecordingScreen::new();
    screen.flags = TermModes::CURSOR_VISIBLE;

    let mut parser = Parser::default();
    parser.advance(b"\x1b[?25$p\x1b[?7$p\x1b[?4242$p\x1b[4$p", &mut screen);
    assert_eq!(
        parser.take_replies(),
        b"\x1b[?25;2$y\x1b[?7;4$y\x1b[?4242;0$y\x1b[4;4$y"
    );
}

#[test]
fn titles_respect_options() {
    let (_, screen) = feed(b"\x1b]0;shell\x07");
    assert_eq!(screen.effects, vec![Effect::SetTitle("shell".into())]);

    let options = Options {
        allow_set_title: false,
        ..Default::default()
    };
    let (_, screen) = feed_with(options, b"\x1b]0;shell\x07");
    assert!(screen.effects.is_empty());
}

#[test]
fn apc_sets_title_and_rename_sets_window_name() {
    let (_, screen) = feed(b"\x1b_status\x1b\\\x1bkwork\x1b\\\x1bk\x1b\\");
    assert_eq!(
        screen.effects,
        vec![
            Effect::SetTitle("status".into()),
            Effect::SetWindowName("work".into()),
            Effect::ClearWindowNameOverride,
        ]
    );

    let options = Options {
        allow_rename: false,
        ..Default::default()
    };
    let (_, screen) = feed_with(options, b"\x1bkwork\x1b\\");
    assert!(screen.effects.is_empty());
}

#[test]
fn shell_integration_markers() {
    let (_, screen) = feed(b"\x1b]133;A\x07\x1b]133;C\x07");
    assert_eq!(screen.effects, vec![Effect::PromptMark, Effect::OutputMark]);
}

#[test]
fn extended_keys_require_option() {
    let (_, screen) = feed(b"\x1b[>4;1m");
    assert!(screen.effects.is_empty());

    let options = Options {
        extended_keys: ExtendedKeys::On,
        ..Default::default()
    };
    let (_, screen) = feed_with(options.clone(), b"\x1b[>4;2m\x1b[>4n");
    assert_eq!(
        screen.effects,
        vec![
            Effect::SetModifyOtherKeys(ModifyOtherKeys::EnableAll),
            Effect::SetModifyOtherKeys(ModifyOtherKeys::Reset),
        ]
    );

    // The always policy refuses to reset.
    let options = Options {
        extended_keys: ExtendedKeys::Always,
        ..options
    };
    let (_, screen) = feed_with(options, b"\x1b[>4;1m\x1b[>4n");
    assert_eq!(
        screen.effects,
        vec![Effect::SetModifyOtherKeys(
            ModifyOtherKeys::EnableExceptWellDefined
        )]
    );
}

#[test]
fn alternate_screen_variants() {
    let (_, screen) = feed(b"\x1b[?1049h\x1b[?1049l\x1b[?47h\x1b[?47l");
    assert_eq!(
        screen.effects,
        vec![
            Effect::AlternateOn(true),
            Effect::AlternateOff(true),
            Effect::AlternateOn(false),
            Effect::AlternateOff(false),
        ]
    );
}

#[test]
fn margins_resolve_scp_ambiguity() {
    // Without the left/right margin mode, `s` saves the cursor.
    let (_, screen) = feed(b"\x1b[2;10s");
    assert!(screen.effects.is_empty());

    let mut screen = RecordingScreen::new();
    screen.flags = TermModes::LR_MARGINS;
    let mut parser = Parser::default();
    parser.advance(b"\x1b[2;10s", &mut screen);
    assert_eq!(
        screen.effects,
        vec![
            Effect::ScrollMargin(1, 9),
            Effect::CursorMove(Some(0), Some(0), true),
        ]
    );
}

#[test]
fn scroll_region_homes_cursor() {
    let (_, screen) = feed(b"\x1b[2;10r");
    assert_eq!(
        screen.effects,
        vec![
            Effect::ScrollRegion(1, 9),
            Effect::CursorMove(Some(0), Some(0), true),
        ]
    );

    // An inverted region is rejected.
    let (_, screen) = feed(b"\x1b[10;2r");
    assert!(screen.effects.is_empty());
}

/// Watchdog that a test can expire by hand.
#[derive(Default)]
struct ManualWatchdog {
    armed: bool,
}

impl Timeout for ManualWatchdog {
    fn set_timeout(&mut self, _duration: Duration) {
        self.armed = true;
    }

    fn clear_timeout(&mut self) {
        self.armed = false;
    }

    fn pending_timeout(&self) -> bool {
        self.armed
    }

    fn expired(&self) -> bool {
        false
    }
}

#[test]
fn stuck_string_state_is_abandoned_without_side_effects() {
    let mut parser: Parser<ManualWatchdog> = Parser::new(Options::default());
    let mut screen = RecordingScreen::new();

    parser.advance(b"\x1b]0;stuck", &mut screen);
    assert!(!parser.is_ground());

    parser.expire_watchdog();
    assert!(parser.is_ground());
    assert!(parser.since_ground().is_empty());
    assert!(screen.effects.is_empty());

    parser.advance(b"\x1b]0;ok\x07", &mut screen);
    assert_eq!(screen.effects, vec![Effect::SetTitle("ok".into())]);
}

#[test]
fn window_ops_reply_and_skip_unknown_arguments() {
    let mut screen = RecordingScreen::new();
    let mut parser = Parser::default();
    parser.advance(b"\x1b[18t\x1b[19t", &mut screen);
    assert_eq!(parser.take_replies(), b"\x1b[8;24;80t\x1b[9;24;80t");

    // Unknown ops and argument-consuming ops walk the list correctly.
    parser.advance(b"\x1b[3;100;200;18t", &mut screen);
    assert_eq!(parser.take_replies(), b"\x1b[8;24;80t");
}

#[test]
fn erase_screen_modes() {
    let (_, screen) = feed(b"\x1b[J\x1b[3J");
    assert_eq!(
        screen.effects,
        vec![Effect::ClearEndOfScreen, Effect::ClearHistory]
    );
}

#[test]
fn line_drawing_designation_maps_prints() {
    let (_, screen) = feed(b"\x1b(0q\x1b(Bq");
    let prints = prints(&screen);
    assert_eq!(prints[0].0, '─');
    assert_eq!(prints[1].0, 'q');
}

#[test]
fn insert_mode_and_linefeed_mode_are_ansi_modes() {
    let (_, screen) = feed(b"\x1b[4h\x1b[20h\x1b[4l");
    assert_eq!(
        screen.effects,
        vec![Effect::SetMode(4), Effect::SetMode(20), Effect::ClearMode(4)]
    );
}
