use std::string::String;
use std::vec::Vec;

use crossbeam::channel::{unbounded, Receiver, Sender};

use crate::console::Console;
use crate::error::Error;
use crate::input::ControlCharacter;
use crate::session::{InputSource, Listener};

pub mod csi {
    pub const UP: &str = "\x1b[A";
    pub const DOWN: &str = "\x1b[B";
    pub const RIGHT: &str = "\x1b[C";
    pub const LEFT: &str = "\x1b[D";
    pub const HOME: &str = "\x1b[1~";
    pub const INSERT: &str = "\x1b[2~";
    pub const DELETE: &str = "\x1b[3~";
    pub const END: &str = "\x1b[4~";
}

/// Terminal output sink recording every write as a separate chunk
pub struct MockSink {
    tx: Option<Sender<Vec<u8>>>,
}

/// Receiving end of a [`MockSink`]
pub struct SinkOutput {
    rx: Receiver<Vec<u8>>,
}

impl MockSink {
    pub fn new() -> (Self, SinkOutput) {
        let (tx, rx) = unbounded();

        (Self { tx: Some(tx) }, SinkOutput { rx })
    }

    /// Sink where every write fails
    pub fn failing() -> Self {
        Self { tx: None }
    }
}

impl embedded_io::ErrorType for MockSink {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Write for MockSink {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        let tx = self.tx.as_ref().ok_or(embedded_io::ErrorKind::BrokenPipe)?;

        tx.send(buf.to_vec())
            .map_err(|_| embedded_io::ErrorKind::BrokenPipe)?;

        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl SinkOutput {
    /// Writes since the last call, one string per write
    pub fn writes(&self) -> Vec<String> {
        self.rx
            .try_iter()
            .map(|chunk| String::from_utf8(chunk).unwrap())
            .collect()
    }

    /// Everything written since the last call
    pub fn take(&self) -> String {
        self.writes().concat()
    }
}

#[derive(Debug, Default)]
pub struct MockInput {
    pub paused: bool,
    pub closed: bool,
}

impl InputSource for MockInput {
    fn pause(&mut self) {
        self.paused = true;
    }

    fn resume(&mut self) {
        self.paused = false;
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Line(String),
    End,
    Error(Error),
    Close,
}

/// Listener remembering every event
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
}

impl<W: embedded_io::Write> Listener<W> for Recorder {
    fn on_line(&mut self, _console: &mut Console<W>, line: &str) {
        self.events.push(Event::Line(String::from(line)));
    }

    fn on_end(&mut self, _console: &mut Console<W>) {
        self.events.push(Event::End);
    }

    fn on_error(&mut self, _console: &mut Console<W>, error: &Error) {
        self.events.push(Event::Error(error.clone()));
    }

    fn on_close(&mut self) {
        self.events.push(Event::Close);
    }
}

enum State {
    Normal,
    Escape,
    Csi(String),
}

/// Minimal screen emulator understanding what the console writes.
/// A newline also returns to the first column, like a terminal with
/// output post-processing enabled.
pub struct MockTerminal {
    state: State,
    rows: Vec<Vec<char>>,
    row: usize,
    column: usize,
    pub bell: bool,
}

impl MockTerminal {
    pub fn new() -> Self {
        Self {
            state: State::Normal,
            rows: Vec::new(),
            row: 0,
            column: 0,
            bell: false,
        }
    }

    fn current_row(&mut self) -> &mut Vec<char> {
        while self.rows.len() <= self.row {
            self.rows.push(Vec::new());
        }

        &mut self.rows[self.row]
    }

    fn print(&mut self, c: char) {
        let column = self.column;
        let row = self.current_row();

        while row.len() <= column {
            row.push(' ');
        }

        row[column] = c;
        self.column += 1;
    }

    fn control_sequence(&mut self, params: &str, function: char) {
        let n = params.parse::<usize>().unwrap_or(1);

        match function {
            'A' => self.row = self.row.saturating_sub(n),
            'B' => self.row += n,
            'C' => self.column += n,
            'D' => self.column = self.column.saturating_sub(n),
            'K' => {
                let column = self.column;
                self.current_row().truncate(column);
            }
            _ => panic!("unexpected control sequence {:?}{}", params, function),
        }
    }

    pub fn feed(&mut self, output: &str) {
        for c in output.chars() {
            match core::mem::replace(&mut self.state, State::Normal) {
                State::Normal => match c {
                    '\r' => self.column = 0,
                    '\n' => {
                        self.row += 1;
                        self.column = 0;
                    }
                    '\x07' => self.bell = true,
                    '\x08' => self.column = self.column.saturating_sub(1),
                    '\x1b' => self.state = State::Escape,
                    c => self.print(c),
                },
                State::Escape => {
                    if c == '[' {
                        self.state = State::Csi(String::new());
                    }
                }
                State::Csi(mut params) => {
                    if c.is_ascii_digit() || c == ';' {
                        params.push(c);
                        self.state = State::Csi(params);
                    } else {
                        self.control_sequence(&params, c);
                    }
                }
            }
        }
    }

    pub fn screen(&self) -> Vec<String> {
        self.rows.iter().map(|row| row.iter().collect()).collect()
    }

    /// Cursor as row and column
    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.column)
    }
}

pub trait AsByteVec {
    fn as_byte_vec(self) -> Vec<u8>;
}

impl AsByteVec for &str {
    fn as_byte_vec(self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}

impl AsByteVec for ControlCharacter {
    fn as_byte_vec(self) -> Vec<u8> {
        std::vec![self.into()]
    }
}

impl<const N: usize> AsByteVec for [ControlCharacter; N] {
    fn as_byte_vec(self) -> Vec<u8> {
        self.into_iter().map(u8::from).collect()
    }
}

impl<const N: usize> AsByteVec for [&str; N] {
    fn as_byte_vec(self) -> Vec<u8> {
        self.concat().into_bytes()
    }
}

#[test]
fn mock_terminal() {
    let mut term = MockTerminal::new();

    term.feed("hello\n> ab\x08\x08\x1b[1Cx\x1b[K");

    assert_eq!(term.screen(), ["hello", "> ax"]);
    assert_eq!(term.cursor(), (1, 4));

    term.feed("\x1b[A\r\x1b[5C!\x07");

    assert_eq!(term.screen(), ["hello!", "> ax"]);
    assert!(term.bell);
}
