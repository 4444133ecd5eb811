//! IO-free line editor state machine.
//!
//! Every operation returns an [`OutputAction`] describing what the
//! terminal needs to see. The editor never writes anything itself, the
//! caller (see [`crate::console::Console`]) turns actions into bytes.

use alloc::{boxed::Box, string::String};

use crate::complete::{self, Completer, Completion, DEFAULT_MAX_SUGGESTIONS};
use crate::history::{History, HistoryMove};
use crate::input::Key;
use crate::line_buffer::LineBuffer;
use crate::terminal::{char_width, str_width, BACKSPACE};

/// How typed input is rendered
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum EchoMode {
    #[default]
    Visible,
    Hidden,
    /// Draw every code point as this character, e.g. for passwords
    Replacement(char),
}

#[cfg_attr(test, derive(Debug))]
#[derive(PartialEq, Eq)]
pub(crate) enum OutputAction {
    Nothing,
    Redraw,
    RingBell,
    /// Print the text below the prompt, then redraw
    PrintCandidates(String),
    /// Line is done. `echo` tells if the newline and the fresh prompt
    /// should be drawn.
    Submit { line: String, echo: bool },
    EndOfInput,
}

use OutputAction::*;

pub(crate) struct LineEditor {
    prompt: String,
    buffer: LineBuffer,
    cursor: usize,
    echo: EchoMode,
    move_enabled: bool,
    bell_enabled: bool,
    pub(crate) history: History,
    completer: Option<Box<dyn Completer>>,
    max_suggestions: usize,
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new(History::default())
    }
}

impl LineEditor {
    pub(crate) fn new(history: History) -> Self {
        Self {
            prompt: String::new(),
            buffer: LineBuffer::new(),
            cursor: 0,
            echo: EchoMode::Visible,
            move_enabled: true,
            bell_enabled: true,
            history,
            completer: None,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
        }
    }

    fn redraw_if(condition: bool) -> OutputAction {
        if condition {
            Redraw
        } else {
            Nothing
        }
    }

    fn bell(&self) -> OutputAction {
        if self.bell_enabled {
            RingBell
        } else {
            Nothing
        }
    }

    fn len(&self) -> usize {
        self.buffer.char_count()
    }

    fn is_eol(&self) -> bool {
        self.cursor == self.len()
    }

    pub(crate) fn prompt(&self) -> &str {
        &self.prompt
    }

    pub(crate) fn set_prompt(&mut self, prompt: &str) -> OutputAction {
        if self.prompt == prompt {
            return Nothing;
        }

        self.prompt.clear();
        self.prompt.push_str(prompt);

        Redraw
    }

    pub(crate) fn echo(&self) -> EchoMode {
        self.echo
    }

    pub(crate) fn set_echo(&mut self, echo: EchoMode) -> OutputAction {
        if self.echo == echo {
            return Nothing;
        }

        let old = self.cursor_cell();
        self.echo = echo;

        Self::redraw_if(!self.buffer.is_empty() || self.cursor_cell() != old)
    }

    /// Enable or disable cursor movement. The cursor goes to the end
    /// of the line either way.
    pub(crate) fn set_move(&mut self, enabled: bool) -> OutputAction {
        self.move_enabled = enabled;
        self.cursor = self.len();

        Redraw
    }

    pub(crate) fn set_bell(&mut self, enabled: bool) {
        self.bell_enabled = enabled;
    }

    pub(crate) fn set_max_suggestions(&mut self, max: usize) {
        self.max_suggestions = max;
    }

    pub(crate) fn set_completer(&mut self, completer: Option<Box<dyn Completer>>) {
        self.completer = completer;
    }

    pub(crate) fn input(&self) -> &str {
        self.buffer.as_str()
    }

    pub(crate) fn set_input(&mut self, input: &str) -> OutputAction {
        if self.buffer.as_str() == input {
            return Nothing;
        }

        let old_len = self.len();

        self.buffer.set(input);
        self.cursor = self.len();

        match self.echo {
            EchoMode::Visible => Redraw,
            EchoMode::Hidden => Nothing,
            EchoMode::Replacement(_) => Self::redraw_if(self.cursor != old_len),
        }
    }

    pub(crate) fn add_input(&mut self, input: &str) -> OutputAction {
        if input.is_empty() {
            return Nothing;
        }

        self.buffer.insert_str(self.cursor, input);
        self.cursor += input.chars().count();

        Self::redraw_if(self.echo != EchoMode::Hidden)
    }

    /// Cursor position in code points
    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    /// Cursor position in terminal cells, relative to the end of the
    /// prompt
    pub(crate) fn cursor_cell(&self) -> usize {
        match self.echo {
            EchoMode::Hidden => 0,
            EchoMode::Replacement(c) => char_width(c) * self.cursor,
            EchoMode::Visible => str_width(self.buffer.split_at_char(self.cursor).0),
        }
    }

    /// Move cursor to `position`, ignoring positions outside the line
    pub(crate) fn move_cursor_to(&mut self, position: usize) -> OutputAction {
        if position == self.cursor || position > self.len() {
            return Nothing;
        }

        let old = self.cursor_cell();
        self.cursor = position;

        Self::redraw_if(self.cursor_cell() != old)
    }

    pub(crate) fn move_cursor_by(&mut self, n: isize) -> OutputAction {
        match self.cursor.checked_add_signed(n) {
            Some(position) => self.move_cursor_to(position),
            None => Nothing,
        }
    }

    /// Delete the code point at `n`
    pub(crate) fn delete_char(&mut self, n: usize) -> OutputAction {
        if self.buffer.delete(n).is_none() {
            return self.bell();
        }

        if n < self.cursor {
            self.cursor -= 1;
        }

        Redraw
    }

    /// The full prompt line, with backspaces moving the cursor back
    /// from the end of the line to where it belongs
    pub(crate) fn draw_string(&self) -> String {
        let mut out = self.prompt.clone();

        let echoed = match self.echo {
            EchoMode::Hidden => return out,
            EchoMode::Visible => String::from(self.buffer.as_str()),
            EchoMode::Replacement(c) => core::iter::repeat(c).take(self.len()).collect(),
        };

        let reverse = str_width(&echoed).saturating_sub(self.cursor_cell());

        out.push_str(&echoed);
        out.extend(core::iter::repeat(BACKSPACE).take(reverse));

        out
    }

    /// Clear prompt and line, returning whether anything was visible
    pub(crate) fn clear(&mut self) -> bool {
        let visible =
            !self.prompt.is_empty() || (self.echo != EchoMode::Hidden && !self.buffer.is_empty());

        self.prompt.clear();
        self.buffer.truncate();
        self.cursor = 0;

        visible
    }

    /// Finish the current line. Newline and prompt are echoed only if
    /// input is visible at all.
    pub(crate) fn submit(&mut self) -> OutputAction {
        Submit {
            line: self.take_line(),
            echo: self.echo != EchoMode::Hidden,
        }
    }

    /// Empty the buffer, ending any history cycle
    pub(crate) fn take_line(&mut self) -> String {
        self.history.reset();

        let line = String::from(self.buffer.as_str());

        self.buffer.truncate();
        self.cursor = 0;

        line
    }

    pub(crate) fn add_history(&mut self, line: &str) -> OutputAction {
        match self.history.add_entry(line) {
            Some(unsaved) => self.set_input(&unsaved),
            None => Nothing,
        }
    }

    pub(crate) fn limit_history(&mut self, limit: Option<usize>) -> OutputAction {
        match self.history.set_limit(limit) {
            Some(unsaved) => self.set_input(&unsaved),
            None => Nothing,
        }
    }

    pub(crate) fn clear_history(&mut self) -> OutputAction {
        match self.history.clear() {
            Some(unsaved) => self.set_input(&unsaved),
            None => Nothing,
        }
    }

    fn history_move_up(&mut self) -> OutputAction {
        match self.history.move_up(self.buffer.as_str()) {
            Ok(entry) => self.set_input(&entry),
            Err(()) => self.bell(),
        }
    }

    fn history_move_down(&mut self) -> OutputAction {
        match self.history.move_down() {
            Ok(HistoryMove::Entry(entry)) | Ok(HistoryMove::Restore(entry)) => {
                self.set_input(&entry)
            }
            Err(()) => self.bell(),
        }
    }

    fn complete(&mut self) -> OutputAction {
        let Some(completer) = self.completer.as_deref_mut() else {
            return self.bell();
        };

        match complete::complete(completer, &self.buffer, self.cursor, self.max_suggestions) {
            Completion::Ignore => Nothing,
            Completion::NoMatch => self.bell(),
            Completion::Replace { input, cursor } => {
                self.buffer.set(&input);
                self.cursor = cursor.min(self.len());

                Self::redraw_if(self.echo != EchoMode::Hidden)
            }
            Completion::List(list) => PrintCandidates(list),
        }
    }

    pub(crate) fn handle_key(&mut self, key: Key) -> OutputAction {
        match key {
            Key::Enter => self.submit(),
            Key::Backspace => {
                if self.cursor == 0 {
                    self.bell()
                } else {
                    self.delete_char(self.cursor - 1)
                }
            }
            Key::Delete => {
                if self.is_eol() {
                    self.bell()
                } else {
                    self.delete_char(self.cursor)
                }
            }
            Key::EndOfInput => {
                if self.buffer.is_empty() {
                    EndOfInput
                } else if self.is_eol() {
                    self.bell()
                } else {
                    self.delete_char(self.cursor)
                }
            }
            Key::Home => {
                if self.move_enabled && self.cursor != 0 {
                    self.move_cursor_to(0)
                } else {
                    self.bell()
                }
            }
            Key::End => {
                if self.move_enabled && !self.is_eol() {
                    self.move_cursor_to(self.len())
                } else {
                    self.bell()
                }
            }
            Key::Left => {
                if self.move_enabled && self.cursor != 0 {
                    self.move_cursor_by(-1)
                } else {
                    self.bell()
                }
            }
            Key::Right => {
                if self.move_enabled && !self.is_eol() {
                    self.move_cursor_by(1)
                } else {
                    self.bell()
                }
            }
            Key::Up => self.history_move_up(),
            Key::Down => self.history_move_down(),
            Key::Tab => self.complete(),
            Key::Insert => Nothing,
        }
    }
}
