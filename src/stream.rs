// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

//! Interfaces of the unbuffered streams wrapped by [`StreamReader`] and
//! [`StreamWriter`].
//!
//! [`StreamReader`]: crate::StreamReader
//! [`StreamWriter`]: crate::StreamWriter

use crate::Result;

/// An unbuffered byte source.
pub trait RawSource {
	/// Reads up to `buf.len()` bytes into `buf`, returning the number of bytes
	/// read, or `None` if the source has ended. `Some(0)` may be returned for a
	/// non-empty `buf` without the source having ended; callers retry these.
	fn read_raw(&mut self, buf: &mut [u8]) -> Result<Option<usize>>;
	/// Returns `true` if the source is known to have ended without reading from
	/// it. Sources which can't tell return `false`.
	fn is_end(&mut self) -> Result<bool> { Ok(false) }
	/// Closes the source.
	fn close(&mut self) -> Result { Ok(()) }
}

/// An unbuffered byte sink.
pub trait RawSink {
	/// Writes all bytes from `buf`.
	fn write_raw(&mut self, buf: &[u8]) -> Result;
	/// Flushes the sink to its durable destination.
	fn flush(&mut self) -> Result { Ok(()) }
	/// Flushes then closes the sink.
	fn close(&mut self) -> Result { self.flush() }
}

/// A stream with a seekable position. Positions are zero-based byte offsets.
pub trait Seekable {
	/// Moves the stream to `offset`.
	fn seek(&mut self, offset: u64) -> Result;
	/// Returns the current stream position.
	fn position(&mut self) -> Result<u64>;
	/// Returns the total size of the stream.
	fn filesize(&mut self) -> Result<u64>;
}

impl<S: RawSource + ?Sized> RawSource for &mut S {
	fn read_raw(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
		(**self).read_raw(buf)
	}

	fn is_end(&mut self) -> Result<bool> { (**self).is_end() }

	fn close(&mut self) -> Result { (**self).close() }
}

impl<S: RawSink + ?Sized> RawSink for &mut S {
	fn write_raw(&mut self, buf: &[u8]) -> Result {
		(**self).write_raw(buf)
	}

	fn flush(&mut self) -> Result { (**self).flush() }

	fn close(&mut self) -> Result { (**self).close() }
}

impl<S: Seekable + ?Sized> Seekable for &mut S {
	fn seek(&mut self, offset: u64) -> Result { (**self).seek(offset) }

	fn position(&mut self) -> Result<u64> { (**self).position() }

	fn filesize(&mut self) -> Result<u64> { (**self).filesize() }
}

/// Sources over byte slices end when the slice is exhausted.
impl RawSource for &[u8] {
	fn read_raw(&mut self, buf: &mut [u8]) -> Result<Option<usize>> {
		if self.is_empty() {
			return Ok(None)
		}

		let len = self.len().min(buf.len());
		buf[..len].copy_from_slice(&self[..len]);
		*self = &self[len..];
		Ok(Some(len))
	}

	fn is_end(&mut self) -> Result<bool> { Ok(self.is_empty()) }
}

#[cfg(feature = "alloc")]
impl RawSink for alloc::vec::Vec<u8> {
	fn write_raw(&mut self, buf: &[u8]) -> Result {
		self.try_reserve(buf.len())?;
		self.extend_from_slice(buf);
		Ok(())
	}
}
