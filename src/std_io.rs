// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#![cfg(feature = "std")]

use std::io::{ErrorKind, Read, Seek, SeekFrom, Write};
use crate::{RawSink, RawSource, Result, Seekable};

/// Adapts a [`std::io`] reader, writer, or seekable stream into a [`RawSource`],
/// [`RawSink`], and [`Seekable`] stream.
#[derive(Clone, Debug, Default)]
pub struct IoStream<T>(pub T);

impl<T> IoStream<T> {
	/// Wraps `inner`.
	pub const fn new(inner: T) -> Self { Self(inner) }
	/// Returns a reference to the wrapped stream.
	pub const fn get_ref(&self) -> &T { &self.0 }
	/// Returns a mutable reference to the wrapped stream.
	pub fn get_mut(&mut self) -> &mut T { &mut self.0 }
	/// Unwraps the stream.
	pub fn into_inner(self) -> T { self.0 }
}

impl<R: Read> RawSource for IoStream<R> {
	fn read_raw(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
		loop {
			match self.0.read(buf) {
				Ok(0) if !buf.is_empty() => break Ok(None),
				Ok(count) => break Ok(Some(count)),
				Err(err) if err.kind() == ErrorKind::Interrupted => { }
				Err(err) => break Err(err.into())
			}
		}
	}
}

impl<W: Write> RawSink for IoStream<W> {
	#[inline(always)]
	fn write_raw(&mut self, buf: &[u8]) -> Result {
		self.0.write_all(buf)?;
		Ok(())
	}

	fn flush(&mut self) -> Result {
		self.0.flush()?;
		Ok(())
	}
}

impl<S: Seek> Seekable for IoStream<S> {
	fn seek(&mut self, offset: u64) -> Result {
		self.0.seek(SeekFrom::Start(offset))?;
		Ok(())
	}

	fn position(&mut self) -> Result<u64> {
		Ok(self.0.stream_position()?)
	}

	fn filesize(&mut self) -> Result<u64> {
		let position = self.0.stream_position()?;
		let len = self.0.seek(SeekFrom::End(0))?;
		if position != len {
			self.0.seek(SeekFrom::Start(position))?;
		}
		Ok(len)
	}
}
