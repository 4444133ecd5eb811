//! Drivers feeding sessions from async readers

#[cfg(any(test, feature = "tokio"))]
pub mod tokio {
    //! Driver for tokio

    use crate::{
        error::Error,
        session::{InputSource, Listener, Session},
    };

    use tokio::io::{AsyncRead, AsyncReadExt};

    const READ_CHUNK: usize = 256;

    /// Read from `reader` and feed the bytes into `session` until it
    /// closes. End of stream and read errors are handed to the session,
    /// which closes in response.
    pub async fn run<W, I, L, R>(session: &mut Session<W, I, L>, reader: &mut R)
    where
        W: embedded_io::Write,
        I: InputSource,
        L: Listener<W>,
        R: AsyncRead + Unpin,
    {
        let mut buf = [0; READ_CHUNK];

        while !session.is_closed() {
            match reader.read(&mut buf).await {
                Ok(0) => session.handle_end(),
                Ok(n) => session.handle_data(&buf[..n]),
                Err(err) => session.handle_error(Error::Read(err.kind().into())),
            }
        }
    }

}
