//! Abstraction over the screen writer driven by the dispatch layer.
//!
//! The [`ScreenActor`] trait names the high-level effects the parser can
//! request from the rest of the system: printing collected characters,
//! cursor motion, erasing, scrolling, mode changes, palette and clipboard
//! access, titles and notifications. The grid itself lives elsewhere; the
//! parser only calls through this interface and never reads cells back.

use crate::cell::CellStyle;
use crate::color::{Color, Rgb};
use crate::mode::{Mode, ModifyOtherKeys, PrivateMode, TabClearMode, Theme};

/// Consumer of screen effects.
///
/// Every method has a default empty implementation so embedders (and test
/// doubles) override only what they need. Methods that fill cleared cells
/// take the background colour of the current cell, matching how the writer
/// applies erase fills.
///
/// The query methods at the end report screen state the reply encoder
/// needs (cursor position, margins, sizes, mode flags); their defaults
/// describe an empty 80x24 screen.
pub trait ScreenActor {
    /// Add one printed character with the current style to the collection
    /// run in progress.
    fn collect_add(&mut self, _c: char, _style: &CellStyle) {}

    /// Flush the collection run before a non-print effect.
    fn collect_end(&mut self) {}

    /// Ring the bell.
    fn bell(&mut self) {}

    /// Move the cursor one cell left, stopping at the margin.
    fn backspace(&mut self) {}

    /// Move the cursor down one line, scrolling within the region.
    fn linefeed(&mut self, _bg: Color) {}

    /// Move the cursor to the first column of the current line.
    fn carriage_return(&mut self) {}

    /// Move the cursor up, optionally with carriage return.
    fn cursor_up(&mut self, _n: usize, _carriage_return: bool) {}

    /// Move the cursor down, optionally with carriage return.
    fn cursor_down(&mut self, _n: usize, _carriage_return: bool) {}

    fn cursor_left(&mut self, _n: usize) {}

    fn cursor_right(&mut self, _n: usize) {}

    /// Place the cursor. `None` keeps the current coordinate; `origin`
    /// makes the move relative to the scroll region when origin mode is on.
    fn cursor_move(&mut self, _x: Option<usize>, _y: Option<usize>, _origin: bool) {}

    /// Reverse index: scroll down at the top margin, else move up.
    fn reverse_index(&mut self, _bg: Color) {}

    /// Move back one column, scrolling the region right at the margin.
    fn back_index(&mut self, _bg: Color) {}

    /// Move forward one column, scrolling the region left at the margin.
    fn forward_index(&mut self, _bg: Color) {}

    /// Fill the screen with `E` (DECALN).
    fn alignment_test(&mut self) {}

    fn clear_end_of_screen(&mut self, _bg: Color) {}

    fn clear_start_of_screen(&mut self, _bg: Color) {}

    fn clear_screen(&mut self, _bg: Color) {}

    fn clear_end_of_line(&mut self, _bg: Color) {}

    fn clear_start_of_line(&mut self, _bg: Color) {}

    fn clear_line(&mut self, _bg: Color) {}

    /// Drop the scrollback history.
    fn clear_history(&mut self) {}

    fn insert_characters(&mut self, _n: usize, _bg: Color) {}

    fn delete_characters(&mut self, _n: usize, _bg: Color) {}

    /// Erase cells in place without shifting the rest of the line.
    fn erase_characters(&mut self, _n: usize, _bg: Color) {}

    fn insert_lines(&mut self, _n: usize, _bg: Color) {}

    fn delete_lines(&mut self, _n: usize, _bg: Color) {}

    fn insert_columns(&mut self, _n: usize, _bg: Color) {}

    fn delete_columns(&mut self, _n: usize, _bg: Color) {}

    fn scroll_up(&mut self, _n: usize, _bg: Color) {}

    fn scroll_down(&mut self, _n: usize, _bg: Color) {}

    fn scroll_left(&mut self, _n: usize, _bg: Color) {}

    fn scroll_right(&mut self, _n: usize, _bg: Color) {}

    /// Restrict vertical scrolling to `top..=bottom` (0-based, inclusive).
    fn set_scroll_region(&mut self, _top: usize, _bottom: usize) {}

    /// Restrict horizontal scrolling to `left..=right` (0-based, inclusive).
    fn set_scroll_margin(&mut self, _left: usize, _right: usize) {}

    /// Enable an ANSI mode.
    fn set_mode(&mut self, _mode: Mode) {}

    /// Disable an ANSI mode.
    fn clear_mode(&mut self, _mode: Mode) {}

    /// Enable a private DEC mode.
    fn set_private_mode(&mut self, _mode: PrivateMode) {}

    /// Disable a private DEC mode.
    fn clear_private_mode(&mut self, _mode: PrivateMode) {}

    /// Switch to the alternate screen, optionally saving the cursor.
    fn alternate_on(&mut self, _style: &CellStyle, _save_cursor: bool) {}

    /// Leave the alternate screen, optionally restoring the cursor.
    fn alternate_off(&mut self, _style: &CellStyle, _restore_cursor: bool) {}

    /// Apply a cursor style (DECSCUSR 0..=6).
    fn set_cursor_style(&mut self, _style: u8) {}

    /// Configure extended key reporting.
    fn set_modify_other_keys(&mut self, _state: ModifyOtherKeys) {}

    /// Set a horizontal tab stop at the cursor column.
    fn set_tab(&mut self) {}

    /// Clear tab stops at the cursor or everywhere.
    fn clear_tabs(&mut self, _mode: TabClearMode) {}

    /// Advance the cursor by `n` tab stops, bounded by the right margin.
    fn next_tab(&mut self, _n: usize) {}

    /// Move the cursor back by `n` tab stops, bounded by the left margin.
    fn prev_tab(&mut self, _n: usize) {}

    /// Columns (0-based) currently carrying a tab stop.
    fn tab_stops(&self) -> Vec<usize> {
        Vec::new()
    }

    /// Replace the whole tab-stop bitmap.
    fn replace_tab_stops(&mut self, _columns: &[usize]) {}

    /// Set the pane title.
    fn set_title(&mut self, _title: &str) {}

    /// Push the current title onto the title stack.
    fn push_title(&mut self) {}

    /// Pop and apply the last pushed title.
    fn pop_title(&mut self) {}

    /// Set the working-directory path reported for the screen.
    fn set_path(&mut self, _path: &str) {}

    /// Rename the window, overriding automatic naming.
    fn set_window_name(&mut self, _name: &str) {}

    /// Remove the automatic-rename override.
    fn clear_window_name_override(&mut self) {}

    /// Host window resize request (xterm window op 8).
    fn resize_request(&mut self, _cols: usize, _rows: usize) {}

    /// Set a palette entry.
    fn palette_set(&mut self, _index: usize, _rgb: Rgb) {}

    /// Read a palette entry for a colour query.
    fn palette_get(&self, _index: usize) -> Option<Rgb> {
        None
    }

    /// Reset one palette entry to its default.
    fn palette_reset(&mut self, _index: usize) {}

    /// Reset the whole palette.
    fn palette_reset_all(&mut self) {}

    /// Set the default foreground, background or cursor colour.
    fn set_special_color(&mut self, _which: SpecialColor, _rgb: Rgb) {}

    /// Read a default colour for a query reply.
    fn special_color(&self, _which: SpecialColor) -> Option<Rgb> {
        None
    }

    /// Reset a default colour.
    fn reset_special_color(&mut self, _which: SpecialColor) {}

    /// Store base64-decoded clipboard data in the paste store.
    fn clipboard_store(&mut self, _data: Vec<u8>) {}

    /// The newest paste-store entry, for clipboard queries.
    fn clipboard_top(&self) -> Option<Vec<u8>> {
        None
    }

    /// Forward an OSC 52 write to the outer terminal's selection.
    fn set_selection(&mut self, _flags: &str, _data: &[u8]) {}

    /// Mark the current line as a prompt start (shell integration).
    fn prompt_mark(&mut self) {}

    /// Mark the current line as a command output start (shell integration).
    fn output_mark(&mut self) {}

    /// Draw a framed sixel payload; `p1` is the first DCS parameter.
    fn sixel_image(&mut self, _data: &[u8], _p1: u32) {}

    /// Write raw bytes to the outer terminal (passthrough).
    fn raw_string(&mut self, _data: &[u8], _allow_wrap: bool) {}

    /// Full terminal reset (RIS).
    fn reset(&mut self) {}

    /// Soft terminal reset (DECSTR).
    fn soft_reset(&mut self) {}

    /// Force a complete redraw of the pane.
    fn full_redraw(&mut self) {}

    /// Cursor position as (column, row), 0-based.
    fn cursor(&self) -> (usize, usize) {
        (0, 0)
    }

    /// Screen size as (columns, rows).
    fn grid_size(&self) -> (usize, usize) {
        (80, 24)
    }

    /// Scroll region and margins as (top, bottom, left, right), 0-based
    /// inclusive.
    fn margins(&self) -> (usize, usize, usize, usize) {
        let (cols, rows) = self.grid_size();
        (0, rows.saturating_sub(1), 0, cols.saturating_sub(1))
    }

    /// Current mode flags, for replies and mode-dependent dispatch.
    fn mode_flags(&self) -> crate::mode::TermModes {
        crate::mode::TermModes::empty()
    }

    /// Size of one character cell in pixels, when known.
    fn cell_size_pixels(&self) -> Option<(usize, usize)> {
        None
    }

    /// The client's colour scheme, when known.
    fn theme(&self) -> Option<Theme> {
        None
    }
}

/// The three assignable default colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecialColor {
    Foreground,
    Background,
    Cursor,
}
