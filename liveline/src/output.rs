//! Placement of application output above the prompt.
//!
//! The prompt always occupies the bottom row. Output is written over
//! it and the prompt is drawn again below. Output that does not end
//! in a newline leaves an incomplete row above the prompt, which the
//! next write continues instead of starting a new row.

use alloc::string::String;

use crate::editor::LineEditor;
use crate::terminal::{cursor_forward, output_width, CARRIAGE_RETURN, CURSOR_UP, ERASE_LINE};

#[derive(Debug, Default)]
pub(crate) struct OutputState {
    incomplete_line: String,
}

impl OutputState {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn incomplete_line(&self) -> &str {
        &self.incomplete_line
    }

    /// The prompt moved to a fresh row, nothing is left to continue
    pub(crate) fn reset(&mut self) {
        self.incomplete_line.clear();
    }

    /// Bytes that print `data` above the prompt of `editor`, as one
    /// write. Empty data composes to nothing.
    pub(crate) fn compose(&mut self, data: &str, editor: &LineEditor) -> String {
        let mut out = String::new();

        if data.is_empty() {
            return out;
        }

        let last_newline = data.rfind('\n');
        let restore_prompt;

        if self.incomplete_line.is_empty() {
            out.push_str(CARRIAGE_RETURN);
            out.push_str(ERASE_LINE);
            restore_prompt = true;
        } else {
            // Data with a newline overwrites the prompt row
            restore_prompt = last_newline.is_some();

            if restore_prompt {
                out.push_str(CARRIAGE_RETURN);
                out.push_str(ERASE_LINE);
            }

            out.push_str(CURSOR_UP);
            out.push_str(CARRIAGE_RETURN);
            out.push_str(&cursor_forward(output_width(&self.incomplete_line)));
        }

        out.push_str(data);

        if data.ends_with('\n') {
            self.incomplete_line.clear();
        } else {
            out.push('\n');

            match last_newline {
                Some(pos) => {
                    self.incomplete_line.clear();
                    self.incomplete_line.push_str(&data[pos + 1..]);
                }
                None => self.incomplete_line.push_str(data),
            }
        }

        if restore_prompt {
            out.push_str(&editor.draw_string());
        } else {
            let column = output_width(editor.prompt()) + editor.cursor_cell();

            if column > 0 {
                out.push_str(&cursor_forward(column));
            }
        }

        out
    }
}
