//! Liveline is an IO-free `#[no_std]` line editor that keeps an
//! editable prompt on the bottom row of the terminal while the
//! application keeps printing output above it.
//!
//! Features:
//! - IO-free. Bytes go in, the terminal output comes out through any
//!   [`embedded_io::Write`]
//! - UTF-8 support with wide characters
//! - Line history with a configurable limit
//! - Tab completion
//! - Hidden and replaced echo for passwords
//! - Custom key bindings
//! - Asynchronous output that never tears the prompt
//!
//! The core consists of a state machine turning key presses into
//! actions, and a [`console::Console`] turning actions and output into
//! terminal writes. A [`session::Session`] ties both to an input
//! stream, which the application feeds from whatever event loop it
//! runs. For tokio, [`no_sync::tokio::run`] does the feeding.
//!
//! Sessions are built using [`builder::SessionBuilder`].
//!
//! # Example
//! ```no_run
//! use liveline::{builder::SessionBuilder, console::Console, io::StdWriter, session::Listener};
//! use std::io::{self, Read};
//! use termion::raw::IntoRawMode;
//!
//! struct Echo;
//!
//! impl<W: embedded_io::Write> Listener<W> for Echo {
//!     fn on_line(&mut self, console: &mut Console<W>, line: &str) {
//!         console.add_history(line);
//!         console.write(&format!("Read: '{}'\r\n", line)).unwrap();
//!     }
//! }
//!
//! fn main() {
//!     let stdout = io::stdout().into_raw_mode().unwrap();
//!
//!     let mut session = SessionBuilder::new()
//!         .with_prompt("> ")
//!         .build(StdWriter::new(stdout), (), Echo)
//!         .unwrap();
//!
//!     for byte in io::stdin().bytes() {
//!         match byte {
//!             Ok(byte) => session.handle_data(&[byte]),
//!             Err(_) => break,
//!         }
//!
//!         if session.is_closed() {
//!             break;
//!         }
//!     }
//! }
//! ```

#![no_std]

extern crate alloc;

#[cfg(any(test, doc, feature = "std"))]
#[macro_use]
extern crate std;

pub mod builder;
pub mod complete;
pub mod console;
pub mod editor;
pub mod error;
pub mod history;
mod input;
#[cfg(feature = "std")]
pub mod io;
mod line_buffer;
pub mod no_sync;
mod output;
pub mod session;
pub(crate) mod terminal;
mod utf8;

#[cfg(test)]
pub(crate) mod testlib;
