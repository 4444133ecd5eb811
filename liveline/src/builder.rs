//! Builder for sessions

use alloc::{boxed::Box, string::String};

use crate::complete::{Completer, DEFAULT_MAX_SUGGESTIONS};
use crate::console::Console;
use crate::editor::{EchoMode, LineEditor};
use crate::error::Error;
use crate::history::{History, DEFAULT_LIMIT};
use crate::session::{InputSource, Listener, Session};

/// Builder for [`Session`].
///
/// # Example
/// ```no_run
/// # use embedded_io::ErrorType;
/// # use core::convert::Infallible;
/// # struct MyTerminal {}
/// # impl ErrorType for MyTerminal {
/// #     type Error = Infallible;
/// # }
/// # impl embedded_io::Write for MyTerminal {
/// #     fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> { unimplemented!() }
/// #     fn flush(&mut self) -> Result<(), Self::Error> { unimplemented!() }
/// # }
/// use liveline::builder::SessionBuilder;
/// use liveline::complete::WordCompleter;
///
/// let mut session = SessionBuilder::new()
///     .with_prompt("> ")
///     .with_history_limit(Some(100))
///     .with_autocomplete(WordCompleter::new(["help", "quit"]))
///     .build(MyTerminal {}, (), ())
///     .unwrap();
///
/// session.handle_data(b"he\t\r");
/// ```
pub struct SessionBuilder {
    prompt: String,
    echo: EchoMode,
    move_enabled: bool,
    bell_enabled: bool,
    history_limit: Option<usize>,
    max_suggestions: usize,
    completer: Option<Box<dyn Completer>>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self {
            prompt: String::new(),
            echo: EchoMode::Visible,
            move_enabled: true,
            bell_enabled: true,
            history_limit: Some(DEFAULT_LIMIT),
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            completer: None,
        }
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prompt(mut self, prompt: &str) -> Self {
        self.prompt = String::from(prompt);
        self
    }

    pub fn with_echo(mut self, echo: EchoMode) -> Self {
        self.echo = echo;
        self
    }

    /// Enable or disable cursor movement keys
    pub fn with_move(mut self, enabled: bool) -> Self {
        self.move_enabled = enabled;
        self
    }

    pub fn with_bell(mut self, enabled: bool) -> Self {
        self.bell_enabled = enabled;
        self
    }

    /// Keep at most `limit` history entries, `None` for no limit
    pub fn with_history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }

    /// Number of completion candidates listed at once, including the
    /// line counting the rest
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    pub fn with_autocomplete(mut self, completer: impl Completer + 'static) -> Self {
        self.completer = Some(Box::new(completer));
        self
    }

    /// Build the session and draw the prompt
    pub fn build<W, I, L>(self, sink: W, input: I, listener: L) -> Result<Session<W, I, L>, Error>
    where
        W: embedded_io::Write,
        I: InputSource,
        L: Listener<W>,
    {
        if self.max_suggestions == 0 {
            return Err(Error::InvalidConfig("max_suggestions must be at least 1"));
        }

        let mut editor = LineEditor::new(History::new(self.history_limit));

        editor.set_echo(self.echo);
        editor.set_bell(self.bell_enabled);
        editor.set_max_suggestions(self.max_suggestions);
        editor.set_completer(self.completer);

        if !self.move_enabled {
            editor.set_move(false);
        }

        let mut console = Console::new(editor, sink);

        console.set_prompt(&self.prompt);

        tracing::debug!(prompt = %self.prompt, "session started");

        Ok(Session::new(console, input, listener))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testlib::{MockInput, MockSink, Recorder};
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let (sink, output) = MockSink::new();
        let session = SessionBuilder::new()
            .build(sink, MockInput::default(), Recorder::default())
            .unwrap();

        assert_eq!(session.console().prompt(), "");
        assert_eq!(session.console().echo(), EchoMode::Visible);
        assert!(output.writes().is_empty());
        assert!(!session.is_closed());
    }

    #[test]
    fn options() {
        let (sink, output) = MockSink::new();
        let mut session = SessionBuilder::new()
            .with_prompt("$ ")
            .with_echo(EchoMode::Replacement('*'))
            .with_move(false)
            .with_bell(false)
            .with_history_limit(Some(1))
            .build(sink, MockInput::default(), Recorder::default())
            .unwrap();

        assert_eq!(output.take(), "\r\x1b[K$ ");

        session.handle_data(b"ab\x1b[D\x1b[D");

        assert_eq!(session.console().cursor_position(), 2);
        assert_eq!(output.take(), "\r\x1b[K$ *\r\x1b[K$ **");

        session.console_mut().add_history("one");
        session.console_mut().add_history("two");

        assert_eq!(session.console().list_history().count(), 1);
    }

    #[test]
    fn autocomplete() {
        let (sink, _output) = MockSink::new();
        let mut session = SessionBuilder::new()
            .with_autocomplete(crate::complete::WordCompleter::new(["quit"]))
            .build(sink, (), ())
            .unwrap();

        session.handle_data(b"q\t");

        assert_eq!(session.console().input(), "quit ");
    }

    #[test]
    fn zero_suggestions() {
        let (sink, _output) = MockSink::new();
        let result = SessionBuilder::new()
            .with_max_suggestions(0)
            .build(sink, (), ());

        assert_eq!(
            result.err(),
            Some(Error::InvalidConfig("max_suggestions must be at least 1"))
        );
    }
}
