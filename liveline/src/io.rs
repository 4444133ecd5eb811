//! Terminal sinks for [`std::io::Write`]

use std::io::Write;

/// Wrapper turning any [`std::io::Write`] into a terminal sink
pub struct StdWriter<T: Write>(T);

impl<T: Write> StdWriter<T> {
    pub fn new(writer: T) -> Self {
        Self(writer)
    }

    pub fn get_ref(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl Default for StdWriter<std::io::Stdout> {
    fn default() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<T: Write> embedded_io::ErrorType for StdWriter<T> {
    type Error = embedded_io::ErrorKind;
}

impl<T: Write> embedded_io::Write for StdWriter<T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.0.write(buf).map_err(|e| e.kind().into())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.0.flush().map_err(|e| e.kind().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::SessionBuilder;
    use std::vec::Vec;

    #[test]
    fn session_output() {
        let mut session = SessionBuilder::new()
            .with_prompt("> ")
            .build(StdWriter::new(Vec::new()), (), ())
            .unwrap();

        session.handle_data(b"hi");
        session.console_mut().write_line("out").unwrap();

        assert_eq!(
            session.console().sink().get_ref().as_slice(),
            b"\r\x1b[K> \r\x1b[K> h\r\x1b[K> hi\r\x1b[Kout\n> hi"
        );
    }
}
