//! Terminal console combining the line editor with application output

use alloc::{boxed::Box, format, string::String};

use embedded_io::Error as _;

use crate::complete::Completer;
use crate::editor::{EchoMode, LineEditor, OutputAction};
use crate::error::Error;
use crate::output::OutputState;
use crate::terminal::{BELL, CARRIAGE_RETURN, ERASE_LINE};

/// What the session has to do after an action was applied
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
pub(crate) enum Outcome {
    Continue,
    Line(String),
    EndOfInput,
}

/// Handle to the prompt and the output stream.
///
/// Everything written through the console shows up above the prompt,
/// which stays on the bottom row with the line being edited. A
/// [`crate::session::Session`] owns the console and hands it to
/// listeners and key bindings.
pub struct Console<W: embedded_io::Write> {
    editor: LineEditor,
    output: OutputState,
    sink: W,
    ending: bool,
    closed: bool,
    failure: Option<Error>,
}

impl<W: embedded_io::Write> Console<W> {
    pub(crate) fn new(editor: LineEditor, sink: W) -> Self {
        Self {
            editor,
            output: OutputState::new(),
            sink,
            ending: false,
            closed: false,
            failure: None,
        }
    }

    fn send(&mut self, data: &str) -> Result<(), Error> {
        if self.closed {
            return Err(Error::Closed);
        }

        if data.is_empty() {
            return Ok(());
        }

        self.sink.write_all(data.as_bytes()).map_err(|err| {
            let err = Error::Write(err.kind());

            tracing::warn!(error = %err, "failed to write to terminal");

            if self.failure.is_none() {
                self.failure = Some(err.clone());
            }

            err
        })
    }

    /// Apply an editor action, ignoring what it means for the session
    fn run(&mut self, action: OutputAction) {
        match self.apply(action) {
            Outcome::Continue => (),
            Outcome::Line(line) => tracing::debug!(%line, "line outside of session dropped"),
            Outcome::EndOfInput => tracing::debug!("end of input outside of session ignored"),
        }
    }

    pub(crate) fn apply(&mut self, action: OutputAction) -> Outcome {
        match action {
            OutputAction::Nothing => (),
            OutputAction::Redraw => self.redraw(),
            OutputAction::RingBell => {
                let _ = self.send(BELL);
            }
            OutputAction::PrintCandidates(list) => {
                let _ = self.send(&list);
                // Candidates pushed any incomplete row out of reach
                self.output.reset();
                self.redraw();
            }
            OutputAction::Submit { line, echo } => {
                if echo {
                    let _ = self.send("\n");
                    self.redraw();
                }

                self.output.reset();

                return Outcome::Line(line);
            }
            OutputAction::EndOfInput => return Outcome::EndOfInput,
        }

        Outcome::Continue
    }

    /// Hand out the pending line when input ends. No newline is
    /// echoed, the prompt is drawn empty on the same row.
    pub(crate) fn take_line(&mut self) -> String {
        let line = self.editor.take_line();

        if self.editor.echo() != EchoMode::Hidden {
            self.redraw();
        }

        line
    }

    pub(crate) fn editor_mut(&mut self) -> &mut LineEditor {
        &mut self.editor
    }

    /// Take the first output failure since the last call
    pub(crate) fn take_failure(&mut self) -> Option<Error> {
        self.failure.take()
    }

    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Draw prompt and line again, as one write
    pub fn redraw(&mut self) {
        let out = format!("{}{}{}", CARRIAGE_RETURN, ERASE_LINE, self.editor.draw_string());

        let _ = self.send(&out);
    }

    /// The prompt line as drawn, with backspaces placing the cursor
    pub fn draw_string(&self) -> String {
        self.editor.draw_string()
    }

    pub fn prompt(&self) -> &str {
        self.editor.prompt()
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        let action = self.editor.set_prompt(prompt);
        self.run(action);
    }

    pub fn echo(&self) -> EchoMode {
        self.editor.echo()
    }

    pub fn set_echo(&mut self, echo: EchoMode) {
        let action = self.editor.set_echo(echo);
        self.run(action);
    }

    /// Enable or disable cursor movement keys
    pub fn set_move(&mut self, enabled: bool) {
        let action = self.editor.set_move(enabled);
        self.run(action);
    }

    pub fn set_bell(&mut self, enabled: bool) {
        self.editor.set_bell(enabled);
    }

    pub fn input(&self) -> &str {
        self.editor.input()
    }

    pub fn set_input(&mut self, input: &str) {
        let action = self.editor.set_input(input);
        self.run(action);
    }

    /// Insert text at the cursor
    pub fn add_input(&mut self, input: &str) {
        let action = self.editor.add_input(input);
        self.run(action);
    }

    /// Cursor position in code points
    pub fn cursor_position(&self) -> usize {
        self.editor.cursor()
    }

    /// Cursor position in cells after the prompt
    pub fn cursor_cell(&self) -> usize {
        self.editor.cursor_cell()
    }

    pub fn move_cursor_to(&mut self, position: usize) {
        let action = self.editor.move_cursor_to(position);
        self.run(action);
    }

    pub fn move_cursor_by(&mut self, n: isize) {
        let action = self.editor.move_cursor_by(n);
        self.run(action);
    }

    pub fn add_history(&mut self, line: &str) {
        let action = self.editor.add_history(line);
        self.run(action);
    }

    /// History entries, oldest first
    pub fn list_history(&self) -> impl Iterator<Item = &str> {
        self.editor.history.entries()
    }

    pub fn clear_history(&mut self) {
        let action = self.editor.clear_history();
        self.run(action);
    }

    /// Keep at most `limit` history entries, `None` for no limit
    pub fn limit_history(&mut self, limit: Option<usize>) {
        let action = self.editor.limit_history(limit);
        self.run(action);
    }

    pub fn set_autocomplete(&mut self, completer: impl Completer + 'static) {
        self.editor.set_completer(Some(Box::new(completer)));
    }

    pub fn remove_autocomplete(&mut self) {
        self.editor.set_completer(None);
    }

    /// Print `data` above the prompt.
    ///
    /// Fails with [`Error::Closed`] once the console has ended.
    pub fn write(&mut self, data: &str) -> Result<(), Error> {
        if self.ending {
            return Err(Error::Closed);
        }

        let out = self.output.compose(data, &self.editor);

        self.send(&out)
    }

    pub fn write_line(&mut self, data: &str) -> Result<(), Error> {
        self.write(&format!("{}\n", data))
    }

    fn clear_prompt(&mut self) {
        if self.editor.clear() {
            let _ = self.send(&format!("{}{}", CARRIAGE_RETURN, ERASE_LINE));
        }
    }

    /// Write optional final output, then remove the prompt and stop
    /// accepting input. The owning session closes once it sees this.
    pub fn end(&mut self, data: Option<&str>) {
        if self.ending {
            return;
        }

        if let Some(data) = data {
            let _ = self.write(data);
        }

        self.ending = true;
        self.clear_prompt();

        if !self.closed {
            if let Err(err) = self.sink.flush() {
                tracing::warn!(error = ?err.kind(), "failed to flush terminal");
            }
        }
    }

    /// Remove the prompt and stop all output immediately
    pub fn close(&mut self) {
        if self.closed {
            return;
        }

        self.ending = true;
        self.clear_prompt();

        if let Err(err) = self.sink.flush() {
            tracing::warn!(error = ?err.kind(), "failed to flush terminal");
        }

        self.closed = true;
    }

    pub fn is_ending(&self) -> bool {
        self.ending
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testlib::MockSink;
    use pretty_assertions::assert_eq;
    use std::string::ToString;
    use std::vec;

    fn console(prompt: &str) -> (Console<MockSink>, crate::testlib::SinkOutput) {
        let (sink, output) = MockSink::new();
        let mut console = Console::new(LineEditor::default(), sink);

        console.set_prompt(prompt);
        output.take();

        (console, output)
    }

    #[test]
    fn write_overwrites_prompt() {
        let (mut console, output) = console("> ");

        console.set_input("input");
        output.take();

        console.write("test").unwrap();

        assert_eq!(output.writes(), vec!["\r\x1b[Ktest\n> input".to_string()]);

        console.write("world").unwrap();

        assert_eq!(output.writes(), vec!["\x1b[A\r\x1b[4Cworld\n\x1b[7C".to_string()]);
    }

    #[test]
    fn empty_write() {
        let (mut console, output) = console("> ");

        assert_eq!(console.write(""), Ok(()));
        assert!(output.writes().is_empty());

        console.end(None);

        assert_eq!(console.write(""), Err(Error::Closed));
        assert_eq!(console.write("x"), Err(Error::Closed));
    }

    #[test]
    fn write_line() {
        let (mut console, output) = console("");

        console.write_line("hello").unwrap();

        assert_eq!(output.take(), "\r\x1b[Khello\n");
    }

    #[test]
    fn redraw_is_one_write() {
        let (mut console, output) = console("> ");

        console.set_input("abc");
        console.move_cursor_by(-1);

        assert_eq!(
            output.writes(),
            vec!["\r\x1b[K> abc".to_string(), "\r\x1b[K> abc\x08".to_string()]
        );
    }

    #[test]
    fn bell() {
        let (mut console, output) = console("");

        let outcome = console.apply(OutputAction::RingBell);

        assert_eq!(outcome, Outcome::Continue);
        assert_eq!(output.take(), "\x07");
    }

    #[test]
    fn submit() {
        let (mut console, output) = console("> ");

        console.write("partial").unwrap();
        console.set_input("line");
        output.take();

        let action = console.editor_mut().submit();

        assert_eq!(console.apply(action), Outcome::Line("line".to_string()));
        assert_eq!(output.take(), "\n\r\x1b[K> ");

        console.write("next").unwrap();

        assert_eq!(output.take(), "\r\x1b[Knext\n> ");
    }

    #[test]
    fn candidates() {
        let (mut console, output) = console("> ");

        console.apply(OutputAction::PrintCandidates("\na  b\n".to_string()));

        assert_eq!(output.take(), "\na  b\n\r\x1b[K> ");
    }

    #[test]
    fn end_clears_prompt() {
        let (mut console, output) = console("> ");

        console.end(Some("bye\n"));

        assert_eq!(output.take(), "\r\x1b[Kbye\n> \r\x1b[K");
        assert_eq!(console.prompt(), "");
        assert!(console.is_ending());
        assert!(!console.is_closed());

        console.close();
        console.close();

        assert!(console.is_closed());
        assert!(output.writes().is_empty());
    }

    #[test]
    fn write_failure() {
        let mut console = Console::new(LineEditor::default(), MockSink::failing());

        assert_eq!(
            console.write("x"),
            Err(Error::Write(embedded_io::ErrorKind::BrokenPipe))
        );
        assert_eq!(
            console.take_failure(),
            Some(Error::Write(embedded_io::ErrorKind::BrokenPipe))
        );
        assert_eq!(console.take_failure(), None);
    }

    #[test]
    fn history_listing() {
        let (mut console, _output) = console("");

        console.add_history("a");
        console.add_history("b");
        console.limit_history(Some(1));

        assert_eq!(console.list_history().collect::<std::vec::Vec<_>>(), ["b"]);

        console.clear_history();

        assert_eq!(console.list_history().count(), 0);
    }
}
