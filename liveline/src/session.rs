//! Interactive session driving a [`Console`] from terminal input.
//!
//! The session is purely reactive: the embedding event loop feeds it
//! input with [`Session::handle_data`], [`Session::handle_end`] and
//! [`Session::handle_error`], and the session answers through the
//! console and its [`Listener`].

use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};

use crate::console::{Console, Outcome};
use crate::error::Error;
use crate::input::{Input, KeyDecoder};

/// Source of terminal input that can be paused and closed
pub trait InputSource {
    fn pause(&mut self) {}
    fn resume(&mut self) {}
    fn close(&mut self) {}
}

/// Input sources that need no flow control
impl InputSource for () {}

/// Receives the events of a session
pub trait Listener<W: embedded_io::Write> {
    /// A line was entered, without the line ending
    fn on_line(&mut self, _console: &mut Console<W>, _line: &str) {}

    /// Input ended, the session closes next
    fn on_end(&mut self, _console: &mut Console<W>) {}

    /// Input or output failed, the session closes next
    fn on_error(&mut self, _console: &mut Console<W>, _error: &Error) {}

    /// Called exactly once when the session closes
    fn on_close(&mut self) {}
}

impl<W: embedded_io::Write> Listener<W> for () {}

type Binding<W> = Box<dyn FnMut(&mut Console<W>)>;

/// Line editing session.
///
/// It is recommended to use [`crate::builder::SessionBuilder`] to
/// build a session.
pub struct Session<W: embedded_io::Write, I: InputSource, L: Listener<W>> {
    console: Console<W>,
    input: I,
    listener: L,
    decoder: KeyDecoder,
    bindings: BTreeMap<Vec<u8>, Binding<W>>,
    closed: bool,
}

impl<W, I, L> Session<W, I, L>
where
    W: embedded_io::Write,
    I: InputSource,
    L: Listener<W>,
{
    pub(crate) fn new(console: Console<W>, input: I, listener: L) -> Self {
        Self {
            console,
            input,
            listener,
            decoder: KeyDecoder::new(),
            bindings: BTreeMap::new(),
            closed: false,
        }
    }

    pub fn console(&self) -> &Console<W> {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut Console<W> {
        &mut self.console
    }

    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    /// Run `handler` instead of the default behaviour whenever `seq`
    /// is typed. Binding `"\n"` also catches `"\r"`.
    pub fn bind(
        &mut self,
        seq: impl AsRef<[u8]>,
        handler: impl FnMut(&mut Console<W>) + 'static,
    ) -> Result<(), Error> {
        let seq = seq.as_ref();

        self.decoder.bind(seq)?;
        self.bindings.insert(seq.to_vec(), Box::new(handler));

        Ok(())
    }

    /// Remove a binding, returning false if there was none
    pub fn unbind(&mut self, seq: impl AsRef<[u8]>) -> bool {
        let seq = seq.as_ref();

        self.bindings.remove(seq);
        self.decoder.unbind(seq)
    }

    /// Process bytes read from the terminal
    pub fn handle_data(&mut self, bytes: &[u8]) {
        if self.check() {
            return;
        }

        let mut inputs = Vec::new();

        for &byte in bytes {
            if self.closed {
                return;
            }

            self.decoder.advance(byte, &mut inputs);

            for input in inputs.drain(..) {
                self.dispatch(input);

                if self.check() {
                    return;
                }
            }
        }
    }

    fn dispatch(&mut self, input: Input) {
        tracing::trace!(?input, "dispatch");

        match input {
            Input::Text(text) => self.console.add_input(&text),
            Input::Key(key) => {
                let action = self.console.editor_mut().handle_key(key);

                match self.console.apply(action) {
                    Outcome::Continue => (),
                    Outcome::Line(line) => self.listener.on_line(&mut self.console, &line),
                    Outcome::EndOfInput => self.handle_end(),
                }
            }
            Input::Binding(seq) => match self.bindings.get_mut(&seq) {
                Some(handler) => handler(&mut self.console),
                None => tracing::debug!(?seq, "no handler for binding"),
            },
        }
    }

    /// Surface output failures and a requested end, returns whether
    /// the session is closed
    fn check(&mut self) -> bool {
        if let Some(err) = self.console.take_failure() {
            self.handle_error(err);
        }

        if self.console.is_ending() {
            self.close();
        }

        self.closed
    }

    /// Input reached end of stream. A pending line is submitted first.
    pub fn handle_end(&mut self) {
        if self.check() {
            return;
        }

        if !self.console.input().is_empty() {
            let line = self.console.take_line();

            self.listener.on_line(&mut self.console, &line);
        }

        if self.closed {
            return;
        }

        tracing::debug!("end of input");
        self.listener.on_end(&mut self.console);
        self.close();
    }

    pub fn handle_error(&mut self, error: Error) {
        if self.closed {
            return;
        }

        tracing::debug!(%error, "session failed");
        self.listener.on_error(&mut self.console, &error);
        self.close();
    }

    pub fn pause(&mut self) {
        if !self.closed {
            self.input.pause();
        }
    }

    pub fn resume(&mut self) {
        if !self.closed {
            self.input.resume();
        }
    }

    /// End the console with optional final output, then close
    pub fn end(&mut self, data: Option<&str>) {
        self.console.end(data);
        self.close();
    }

    pub fn close(&mut self) {
        if self.closed {
            return;
        }

        self.closed = true;
        self.decoder.reset();
        self.console.close();
        self.input.close();

        tracing::debug!("session closed");
        self.listener.on_close();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
