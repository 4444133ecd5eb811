//! Decoding of raw terminal input into keys and text

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::ops::Bound;

use num_enum::{IntoPrimitive, TryFromPrimitive};

use crate::error::Error;
use crate::utf8::CodePointAssembler;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Eq, PartialEq, Copy, Clone, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ControlCharacter {
    NUL = 0x0,
    CtrlA = 0x1,
    CtrlB = 0x2,
    CtrlC = 0x3,
    CtrlD = 0x4,
    CtrlE = 0x5,
    CtrlF = 0x6,
    CtrlG = 0x7,
    CtrlH = 0x8,
    Tab = 0x9,
    LineFeed = 0xA,
    CtrlK = 0xB,
    CtrlL = 0xC,
    CarriageReturn = 0xD,
    CtrlN = 0xE,
    CtrlO = 0xF,
    CtrlP = 0x10,
    CtrlQ = 0x11,
    CtrlR = 0x12,
    CtrlS = 0x13,
    CtrlT = 0x14,
    CtrlU = 0x15,
    CtrlV = 0x16,
    CtrlW = 0x17,
    CtrlX = 0x18,
    CtrlY = 0x19,
    CtrlZ = 0x1A,
    Escape = 0x1B,
    FS = 0x1C,
    GS = 0x1D,
    RS = 0x1E,
    US = 0x1F,
    Backspace = 0x7F,
}

impl ControlCharacter {
    pub fn is_control(byte: u8) -> bool {
        Self::try_from(byte).is_ok()
    }
}

/// Keys with a default meaning in the editor
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Key {
    Enter,
    Backspace,
    Tab,
    /// Ctrl-D
    EndOfInput,
    Up,
    Down,
    Right,
    Left,
    Home,
    End,
    Delete,
    Insert,
}

const ESC: u8 = ControlCharacter::Escape as u8;

static KEY_SEQUENCES: [(&[u8], Key); 21] = [
    (b"\n", Key::Enter),
    (b"\r", Key::Enter),
    (b"\x7f", Key::Backspace),
    (b"\t", Key::Tab),
    (b"\x04", Key::EndOfInput),
    (b"\x1b[A", Key::Up),
    (b"\x1b[B", Key::Down),
    (b"\x1b[C", Key::Right),
    (b"\x1b[D", Key::Left),
    (b"\x1b[1~", Key::Home),
    (b"\x1b[2~", Key::Insert),
    (b"\x1b[3~", Key::Delete),
    (b"\x1b[4~", Key::End),
    (b"\x1b[H", Key::Home),
    (b"\x1b[F", Key::End),
    (b"\x1bOH", Key::Home),
    (b"\x1bOF", Key::End),
    (b"\x1bOA", Key::Up),
    (b"\x1bOB", Key::Down),
    (b"\x1bOC", Key::Right),
    (b"\x1bOD", Key::Left),
];

impl Key {
    /// Default key for an exact byte sequence
    pub fn from_sequence(seq: &[u8]) -> Option<Self> {
        KEY_SEQUENCES
            .iter()
            .find(|(s, _)| *s == seq)
            .map(|&(_, key)| key)
    }
}

#[cfg_attr(test, derive(Debug))]
#[derive(Eq, PartialEq)]
pub(crate) enum Dispatch<T> {
    /// An exact match and the bytes that matched
    Sequence { token: T, bytes: Vec<u8> },
    /// A fallback prefix matched, with the bytes following the prefix
    Fallback { token: T, remainder: Vec<u8> },
}

/// Matches a byte stream against a table of fixed sequences.
///
/// Bytes are buffered as long as they could still grow into a known
/// sequence. Anything that can not goes to the fallback registered
/// for its longest prefix, where the empty prefix always has one.
pub(crate) struct Sequencer<T> {
    sequences: BTreeMap<Vec<u8>, T>,
    fallbacks: BTreeMap<Vec<u8>, T>,
    default: T,
    buffer: Vec<u8>,
}

impl<T: Clone> Sequencer<T> {
    pub(crate) fn new(default: T) -> Self {
        Self {
            sequences: BTreeMap::new(),
            fallbacks: BTreeMap::new(),
            default,
            buffer: Vec::new(),
        }
    }

    pub(crate) fn add_sequence(&mut self, seq: &[u8], token: T) -> Result<(), Error> {
        if seq.is_empty() {
            return Err(Error::EmptySequence);
        }

        if self.sequences.contains_key(seq) {
            return Err(Error::DuplicateSequence(seq.to_vec()));
        }

        self.sequences.insert(seq.to_vec(), token);
        Ok(())
    }

    pub(crate) fn replace_sequence(&mut self, seq: &[u8], token: T) -> Option<T> {
        self.sequences.insert(seq.to_vec(), token)
    }

    pub(crate) fn remove_sequence(&mut self, seq: &[u8]) -> Option<T> {
        self.sequences.remove(seq)
    }

    pub(crate) fn token(&self, seq: &[u8]) -> Option<&T> {
        self.sequences.get(seq)
    }

    pub(crate) fn add_fallback(&mut self, prefix: &[u8], token: T) {
        if prefix.is_empty() {
            self.default = token;
        } else {
            self.fallbacks.insert(prefix.to_vec(), token);
        }
    }

    pub(crate) fn push(&mut self, byte: u8, out: &mut Vec<Dispatch<T>>) {
        self.buffer.push(byte);
        self.process(out);
    }

    pub(crate) fn reset(&mut self) {
        self.buffer.clear();
    }

    fn process(&mut self, out: &mut Vec<Dispatch<T>>) {
        'retry: loop {
            for len in 1..=self.buffer.len() {
                let candidate = &self.buffer[..len];

                if let Some(token) = self.sequences.get(candidate) {
                    out.push(Dispatch::Sequence {
                        token: token.clone(),
                        bytes: candidate.to_vec(),
                    });
                } else if self.is_pending(candidate) {
                    continue;
                } else {
                    out.push(self.fallback(candidate));
                }

                self.buffer.drain(..len);
                continue 'retry;
            }

            break;
        }
    }

    fn is_pending(&self, candidate: &[u8]) -> bool {
        // Sequences sharing a prefix sort right after it
        let longer = self
            .sequences
            .range::<[u8], _>((Bound::Excluded(candidate), Bound::Unbounded))
            .next()
            .is_some_and(|(seq, _)| seq.starts_with(candidate));

        longer || is_unterminated_csi(candidate)
    }

    fn fallback(&self, candidate: &[u8]) -> Dispatch<T> {
        (1..=candidate.len())
            .rev()
            .find_map(|len| {
                self.fallbacks
                    .get(&candidate[..len])
                    .map(|token| Dispatch::Fallback {
                        token: token.clone(),
                        remainder: candidate[len..].to_vec(),
                    })
            })
            .unwrap_or_else(|| Dispatch::Fallback {
                token: self.default.clone(),
                remainder: candidate.to_vec(),
            })
    }
}

/// `ESC [` followed only by parameter and intermediate bytes
fn is_unterminated_csi(candidate: &[u8]) -> bool {
    match candidate {
        [ESC, b'[', rest @ ..] => rest.iter().all(|b| (0x20..=0x3f).contains(b)),
        _ => false,
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
enum Token {
    Key(Key),
    Binding(Vec<u8>),
    Literal,
    UnknownCsi,
    UnknownEscape,
}

/// Decoded unit of input
#[derive(Debug, Eq, PartialEq, Clone)]
pub(crate) enum Input {
    Key(Key),
    /// A bound sequence, always reported as it was bound
    Binding(Vec<u8>),
    Text(String),
}

/// Turns raw bytes into keys, bindings and text
pub(crate) struct KeyDecoder {
    sequencer: Sequencer<Token>,
    assembler: CodePointAssembler,
}

impl KeyDecoder {
    pub(crate) fn new() -> Self {
        let mut sequencer = Sequencer::new(Token::Literal);

        for &(seq, key) in KEY_SEQUENCES.iter() {
            sequencer.replace_sequence(seq, Token::Key(key));
        }

        sequencer.add_fallback(b"\x1b[", Token::UnknownCsi);
        sequencer.add_fallback(b"\x1b", Token::UnknownEscape);

        Self {
            sequencer,
            assembler: CodePointAssembler::new(),
        }
    }

    /// Bind `seq`, overriding any default key on it. Binding a newline
    /// also catches carriage returns.
    pub(crate) fn bind(&mut self, seq: &[u8]) -> Result<(), Error> {
        if seq.is_empty() {
            return Err(Error::EmptySequence);
        }

        let token = Token::Binding(seq.to_vec());

        match self.sequencer.token(seq).cloned() {
            Some(Token::Binding(bound)) if bound == seq => {
                return Err(Error::DuplicateSequence(seq.to_vec()));
            }
            Some(_) => {
                self.sequencer.replace_sequence(seq, token.clone());
            }
            None => self.sequencer.add_sequence(seq, token.clone())?,
        }

        if seq == b"\n" && !matches!(self.sequencer.token(b"\r"), Some(Token::Binding(_))) {
            self.sequencer.replace_sequence(b"\r", token);
        }

        Ok(())
    }

    /// Remove a binding, restoring the default key if there is one.
    /// Returns false if `seq` was not bound.
    pub(crate) fn unbind(&mut self, seq: &[u8]) -> bool {
        match self.sequencer.token(seq) {
            Some(Token::Binding(bound)) if bound == seq => (),
            _ => return false,
        }

        self.restore(seq);

        if seq == b"\n" {
            if let Some(Token::Binding(bound)) = self.sequencer.token(b"\r") {
                if bound == b"\n" {
                    self.restore(b"\r");
                }
            }
        }

        true
    }

    fn restore(&mut self, seq: &[u8]) {
        match Key::from_sequence(seq) {
            Some(key) => {
                self.sequencer.replace_sequence(seq, Token::Key(key));
            }
            None => {
                self.sequencer.remove_sequence(seq);
            }
        }
    }

    pub(crate) fn advance(&mut self, byte: u8, out: &mut Vec<Input>) {
        let mut dispatched = Vec::new();
        self.sequencer.push(byte, &mut dispatched);

        for dispatch in dispatched {
            match dispatch {
                Dispatch::Sequence { token, bytes } => self.sequence(token, bytes, out),
                Dispatch::Fallback { token, remainder } => self.fallback(token, remainder, out),
            }
        }
    }

    fn sequence(&mut self, token: Token, bytes: Vec<u8>, out: &mut Vec<Input>) {
        tracing::trace!(?token, ?bytes, "sequence");

        if self.assembler.is_pending() {
            tracing::debug!("dropping incomplete code point");
            self.assembler.reset();
        }

        match token {
            Token::Key(key) => out.push(Input::Key(key)),
            Token::Binding(seq) => out.push(Input::Binding(seq)),
            Token::Literal | Token::UnknownCsi | Token::UnknownEscape => {
                self.fallback(token, bytes, out)
            }
        }
    }

    fn fallback(&mut self, token: Token, remainder: Vec<u8>, out: &mut Vec<Input>) {
        match token {
            Token::Literal => {
                let mut text = String::new();

                for b in remainder {
                    if ControlCharacter::is_control(b) {
                        tracing::trace!(byte = b, "ignoring control character");
                        continue;
                    }

                    self.assembler.advance(b, &mut text);
                }

                if text.is_empty() {
                    return;
                }

                if let Some(Input::Text(prev)) = out.last_mut() {
                    prev.push_str(&text);
                } else {
                    out.push(Input::Text(text));
                }
            }
            Token::UnknownCsi => {
                tracing::debug!(sequence = ?remainder, "ignoring unknown control sequence");
            }
            Token::UnknownEscape => {
                tracing::debug!(sequence = ?remainder, "ignoring unknown escape sequence");
            }
            Token::Key(key) => out.push(Input::Key(key)),
            Token::Binding(seq) => out.push(Input::Binding(seq)),
        }
    }

    pub(crate) fn reset(&mut self) {
        self.sequencer.reset();
        self.assembler.reset();
    }
}
