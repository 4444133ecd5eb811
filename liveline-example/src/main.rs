use std::io::{self, Write};
use std::time::Duration;

use liveline::builder::SessionBuilder;
use liveline::complete::WordCompleter;
use liveline::console::Console;
use liveline::editor::EchoMode;
use liveline::error::Error;
use liveline::io::StdWriter;
use liveline::session::Listener;
use termion::raw::{IntoRawMode, RawTerminal};
use tokio::io::AsyncReadExt;

/// Raw mode disables output processing, so newlines need a carriage
/// return
struct CrLf<W: Write>(W);

impl<W: Write> Write for CrLf<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for (i, chunk) in buf.split(|&b| b == b'\n').enumerate() {
            if i > 0 {
                self.0.write_all(b"\r\n")?;
            }
            self.0.write_all(chunk)?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

type Terminal = StdWriter<CrLf<RawTerminal<io::Stdout>>>;

struct Commands {
    lines: usize,
}

impl Listener<Terminal> for Commands {
    fn on_line(&mut self, console: &mut Console<Terminal>, line: &str) {
        self.lines += 1;

        let result = match line.trim() {
            "" => Ok(()),
            "quit" => {
                console.end(Some("bye\n"));
                Ok(())
            }
            "history" => {
                let entries: Vec<String> = console.list_history().map(String::from).collect();

                entries
                    .iter()
                    .try_for_each(|entry| console.write_line(&format!("  {}", entry)))
            }
            "secret" => {
                console.set_echo(EchoMode::Replacement('*'));
                console.set_prompt("secret: ");
                Ok(())
            }
            line => {
                if console.echo() != EchoMode::Visible {
                    console.set_echo(EchoMode::Visible);
                    console.set_prompt("> ");
                    console.write_line(&format!("Secret has {} characters", line.chars().count()))
                } else {
                    console.add_history(line);
                    console.write_line(&format!("Read: '{}'", line))
                }
            }
        };

        if let Err(err) = result {
            tracing::warn!(%err, "failed to answer");
        }
    }

    fn on_end(&mut self, console: &mut Console<Terminal>) {
        let _ = console.write_line(&format!("{} lines read", self.lines));
    }

    fn on_close(&mut self) {
        tracing::info!("session closed");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let stdout = io::stdout().into_raw_mode()?;

    let mut session = SessionBuilder::new()
        .with_prompt("> ")
        .with_autocomplete(WordCompleter::new(["history", "quit", "secret"]))
        .build(StdWriter::new(CrLf(stdout)), (), Commands { lines: 0 })
        .map_err(io::Error::other)?;

    session
        .bind([0x3u8], |console| console.end(Some("^C\n")))
        .map_err(io::Error::other)?;

    let mut stdin = tokio::io::stdin();
    let mut ticker = tokio::time::interval_at(
        tokio::time::Instant::now() + Duration::from_secs(5),
        Duration::from_secs(5),
    );
    let mut ticks = 0;
    let mut buf = [0; 256];

    while !session.is_closed() {
        tokio::select! {
            read = stdin.read(&mut buf) => match read {
                Ok(0) => session.handle_end(),
                Ok(n) => session.handle_data(&buf[..n]),
                Err(err) => session.handle_error(Error::Read(err.kind().into())),
            },
            _ = ticker.tick() => {
                ticks += 1;
                let _ = session.console_mut().write(&format!("tick {}\n", ticks));
            }
        }
    }

    Ok(())
}
