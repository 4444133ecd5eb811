//! Reassembly of UTF-8 code points from single bytes

use alloc::string::String;

enum Utf8ByteType {
    SingleByte,
    StartTwoByte,
    StartThreeByte,
    StartFourByte,
    Continuation,
    Invalid,
}

trait Utf8Byte {
    fn utf8_byte_type(&self) -> Utf8ByteType;
    fn utf8_is_continuation(&self) -> bool;
}

impl Utf8Byte for u8 {
    fn utf8_byte_type(&self) -> Utf8ByteType {
        let byte = *self;

        if byte & 0b10000000 == 0 {
            Utf8ByteType::SingleByte
        } else if byte & 0b11000000 == 0b10000000 {
            Utf8ByteType::Continuation
        } else if byte & 0b11100000 == 0b11000000 {
            Utf8ByteType::StartTwoByte
        } else if byte & 0b11110000 == 0b11100000 {
            Utf8ByteType::StartThreeByte
        } else if byte & 0b11111000 == 0b11110000 {
            Utf8ByteType::StartFourByte
        } else {
            Utf8ByteType::Invalid
        }
    }

    fn utf8_is_continuation(&self) -> bool {
        matches!(self.utf8_byte_type(), Utf8ByteType::Continuation)
    }
}

/// Collects the bytes of one code point at a time.
///
/// A partial sequence is held until its last byte arrives, so callers
/// can feed bytes as they come in without ever seeing half a
/// character. Broken sequences come out as a single U+FFFD.
#[derive(Debug, Default)]
pub(crate) struct CodePointAssembler {
    buf: [u8; 4],
    pos: usize,
    len: usize,
}

impl CodePointAssembler {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Feed one byte, pushing any completed code point onto `out`.
    pub(crate) fn advance(&mut self, byte: u8, out: &mut String) {
        if self.is_pending() {
            if byte.utf8_is_continuation() {
                self.buf[self.pos] = byte;
                self.pos += 1;

                if self.pos == self.len {
                    self.finish(out);
                }

                return;
            }

            // Sequence cut short, start over with this byte
            self.reset();
            out.push(char::REPLACEMENT_CHARACTER);
        }

        let len = match byte.utf8_byte_type() {
            Utf8ByteType::SingleByte => {
                out.push(byte as char);
                return;
            }
            Utf8ByteType::StartTwoByte => 2,
            Utf8ByteType::StartThreeByte => 3,
            Utf8ByteType::StartFourByte => 4,
            Utf8ByteType::Continuation | Utf8ByteType::Invalid => {
                out.push(char::REPLACEMENT_CHARACTER);
                return;
            }
        };

        self.buf[0] = byte;
        self.pos = 1;
        self.len = len;
    }

    fn finish(&mut self, out: &mut String) {
        // Overlong encodings and surrogates pass the length check but not this
        match core::str::from_utf8(&self.buf[..self.pos]) {
            Ok(s) => out.push_str(s),
            Err(_) => out.push(char::REPLACEMENT_CHARACTER),
        }

        self.reset();
    }

    pub(crate) fn is_pending(&self) -> bool {
        self.pos > 0
    }

    pub(crate) fn reset(&mut self) {
        self.pos = 0;
        self.len = 0;
    }
}
