//! Terminal control sequences and cell widths

use alloc::{format, string::String};

use unicode_width::UnicodeWidthChar;

pub(crate) const CARRIAGE_RETURN: &str = "\r";
pub(crate) const ERASE_LINE: &str = "\x1b[K";
pub(crate) const CURSOR_UP: &str = "\x1b[A";
pub(crate) const BACKSPACE: char = '\x08';
pub(crate) const BELL: &str = "\x07";

/// Move cursor `n` cells to the right
pub(crate) fn cursor_forward(n: usize) -> String {
    format!("\x1b[{}C", n)
}

/// Monospace cells occupied by `c`. Control characters take none.
pub(crate) fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

pub(crate) fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Cells the cursor advances when `s` is written, counting backspaces
/// as one cell to the left.
pub(crate) fn output_width(s: &str) -> usize {
    let backspaces = s.chars().filter(|&c| c == BACKSPACE).count();

    str_width(s).saturating_sub(backspaces)
}
