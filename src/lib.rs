// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! This crate provides buffered readers and writers which expose their internal
//! buffers, for parsing and serializing without intermediate copies. [`BufReader`]
//! reads from a buffer filled from a source, [`BufWriter`] writes into a buffer
//! flushed to a sink.
//!
//! Both are built on a handful of primitives: getting the buffer, filling or
//! growing it, consuming bytes from its front, and closing. Reading, writing,
//! skipping, and splitting lines are all derived from these. Implementations are
//! provided for streams ([`StreamReader`], [`StreamWriter`]) and memory
//! ([`CursorReader`], [`VecWriter`]), but it's easy to write your own:
//!
//! ```
//! # use buffer_streams::{BufReader, Fill, Result, Error};
//! struct Countdown {
//!     buffer: Vec<u8>,
//!     start: usize,
//!     next: u8,
//! }
//!
//! impl BufReader for Countdown {
//!     fn get_buffer(&self) -> &[u8] {
//!         &self.buffer[self.start..]
//!     }
//!
//!     fn fill_buffer(&mut self) -> Result<Fill> {
//!         if self.next == 0 {
//!             return Ok(Fill::Bytes(0))
//!         }
//!
//!         self.buffer.push(self.next);
//!         self.next -= 1;
//!         Ok(Fill::Bytes(1))
//!     }
//!
//!     fn consume(&mut self, count: usize) -> Result {
//!         if count > self.get_buffer().len() {
//!             return Err(Error::consume_buffer())
//!         }
//!         self.start += count;
//!         Ok(())
//!     }
//! }
//!
//! let mut countdown = Countdown { buffer: Vec::new(), start: 0, next: 3 };
//! assert_eq!(countdown.read_all()?, [3, 2, 1]);
//! # Ok::<_, Error>(())
//! ```
//!
//! Slices of a buffer borrow their reader or writer, so they can't outlive the
//! next call that may move or overwrite buffered bytes. Splitting lines works the
//! same way with [`LineViews`]:
//!
//! ```
//! # use buffer_streams::{BufReader, CursorReader};
//! let mut reader = CursorReader::new("unix\nmac\rdos\r\nend");
//! let mut lines = reader.line_views(true);
//! while let Some(line) = lines.next_line() {
//!     println!("{}", String::from_utf8_lossy(line?));
//! }
//! # Ok::<_, buffer_streams::Error>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#![deny(clippy::pedantic)]
#![allow(
	clippy::cast_sign_loss, // I know
	clippy::cast_possible_truncation, // Yes, and?
	clippy::module_name_repetitions,
	clippy::must_use_candidate,
)]

#[cfg(feature = "alloc")]
extern crate alloc;

mod error;
mod grow;
mod source;
mod sink;
mod stream;
mod std_io;
mod wrappers;

pub use error::{Error, ErrorKind};
#[cfg(feature = "utf8")]
pub use error::{SimdUtf8Error, Utf8Error};
pub use grow::overallocation;
pub use sink::BufWriter;
#[cfg(feature = "alloc")]
pub use sink::{StreamWriter, VecWriter};
pub use source::{line_views, BufReader, BufSeek, CursorReader, Fill, LineViews, SliceLines, Until};
#[cfg(feature = "alloc")]
pub use source::{Lines, StreamReader, StreamReaderBuilder};
pub use stream::{RawSink, RawSource, Seekable};
#[cfg(feature = "std")]
pub use std_io::IoStream;

pub type Result<T = (), E = Error> = core::result::Result<T, E>;
