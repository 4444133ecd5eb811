//! Buffer holding the line being edited
//!
//! All positions are code point indices, never byte offsets.

use alloc::string::String;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineBuffer {
    buf: String,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of code points
    pub fn char_count(&self) -> usize {
        self.buf.chars().count()
    }

    fn get_byte_position(&self, char_index: usize) -> usize {
        let s = self.as_str();

        s.char_indices()
            .nth(char_index)
            .map(|(pos, _)| pos)
            .unwrap_or(s.len())
    }

    /// Text before and after `char_index`
    pub fn split_at_char(&self, char_index: usize) -> (&str, &str) {
        self.buf.split_at(self.get_byte_position(char_index))
    }

    pub fn insert_str(&mut self, char_index: usize, s: &str) {
        let pos = self.get_byte_position(char_index);

        self.buf.insert_str(pos, s);
    }

    /// Remove the code point at `char_index`, if there is one
    pub fn delete(&mut self, char_index: usize) -> Option<char> {
        let (pos, _) = self.buf.char_indices().nth(char_index)?;

        Some(self.buf.remove(pos))
    }

    pub fn set(&mut self, s: &str) {
        self.buf.clear();
        self.buf.push_str(s);
    }

    pub fn truncate(&mut self) {
        self.buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_buffer() {
        let mut buf = LineBuffer::new();

        buf.insert_str(0, "Hello, World!");

        assert_eq!(buf.as_str(), "Hello, World!");

        assert_eq!(buf.delete(12), Some('!'));

        assert_eq!(buf.as_str(), "Hello, World");

        assert_eq!(buf.delete(12), None);

        assert_eq!(buf.as_str(), "Hello, World");

        buf.delete(0);
        buf.insert_str(0, "h");

        assert_eq!(buf.as_str(), "hello, World");

        buf.delete(2);
        buf.insert_str(2, "L");

        assert_eq!(buf.as_str(), "heLlo, World");

        buf.delete(5);

        assert_eq!(buf.as_str(), "heLlo World");

        for _ in 0..6 {
            buf.delete(5);
        }

        assert_eq!(buf.as_str(), "heLlo");

        buf.insert_str(5, " æå");

        assert_eq!(buf.as_str(), "heLlo æå");
        assert_eq!(buf.char_count(), 8);

        buf.insert_str(7, "ø");

        assert_eq!(buf.as_str(), "heLlo æøå");

        assert_eq!(buf.delete(8), Some('å'));

        assert_eq!(buf.as_str(), "heLlo æø");
        assert_eq!(buf.split_at_char(7), ("heLlo æ", "ø"));
        assert_eq!(buf.split_at_char(20), ("heLlo æø", ""));

        buf.insert_str(100, "!");

        assert_eq!(buf.as_str(), "heLlo æø!");

        buf.set("abc");

        assert_eq!(buf.as_str(), "abc");

        buf.truncate();

        assert!(buf.is_empty());
        assert_eq!(buf.char_count(), 0);
    }
}
