// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
use crate::{BufSeek, Error, RawSink, Result, Seekable};
use crate::grow::overallocation;
use crate::source::check_seek;
use super::BufWriter;

/// The default buffer capacity, 8KiB.
pub const DEFAULT_CAPACITY: usize = 8 * 1024;

/// A buffered writer over a [`RawSink`]. Making space flushes buffered bytes to
/// the sink first, growing the buffer only when it's already empty.
///
/// Dropping the writer does not flush it; call [`close`] or [`flush`] first.
///
/// [`close`]: BufWriter::close
/// [`flush`]: BufWriter::flush
pub struct StreamWriter<S> {
	sink: S,
	buf: Vec<u8>,
	/// The number of bytes written to the buffer but not yet to the sink.
	consumed: usize,
	closed: bool,
}

impl<S: RawSink> StreamWriter<S> {
	/// Creates a writer with the default capacity.
	pub fn new(sink: S) -> Self {
		Self::from_parts(sink, DEFAULT_CAPACITY)
	}

	/// Creates a writer with an initial buffer capacity.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidArgument`] if `capacity` is zero.
	pub fn with_capacity(capacity: usize, sink: S) -> Result<Self> {
		if capacity == 0 {
			return Err(Error::invalid_argument("buffer capacity must be at least 1"))
		}

		Ok(Self::from_parts(sink, capacity))
	}

	fn from_parts(sink: S, capacity: usize) -> Self {
		Self {
			sink,
			buf: alloc::vec![0; capacity],
			consumed: 0,
			closed: false,
		}
	}

	/// Writes buffered bytes to the sink without flushing the sink itself,
	/// returning the number of bytes written.
	pub fn shallow_flush(&mut self) -> Result<usize> {
		if self.closed {
			return Err(Error::closed())
		}

		let count = self.consumed;
		if count > 0 {
			self.sink.write_raw(&self.buf[..count])?;
			self.consumed = 0;
		}
		Ok(count)
	}

	/// Unwraps the sink. Buffered bytes are flushed first.
	///
	/// # Errors
	///
	/// Returns the writer with the error if the flush fails.
	pub fn into_inner(mut self) -> Result<S, (Self, Error)> {
		match self.shallow_flush() {
			Ok(_) => Ok(self.sink),
			Err(error) => Err((self, error))
		}
	}
}

impl<S> StreamWriter<S> {
	/// Returns the buffer capacity.
	pub fn capacity(&self) -> usize { self.buf.len() }
	/// Returns `true` if the writer has been closed.
	pub fn is_closed(&self) -> bool { self.closed }
	/// Returns a reference to the sink.
	pub fn get_ref(&self) -> &S { &self.sink }

	/// Returns the bytes written to the buffer but not yet flushed. These may be
	/// modified in-place before they're flushed.
	pub fn get_unflushed(&mut self) -> &mut [u8] {
		&mut self.buf[..self.consumed]
	}

	/// Resizes the buffer to `capacity` bytes, keeping unflushed bytes.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidArgument`] if `capacity` is zero or less than the
	/// number of unflushed bytes.
	pub fn resize_buffer(&mut self, capacity: usize) -> Result {
		if capacity == 0 {
			return Err(Error::invalid_argument("buffer capacity must be at least 1"))
		}
		if capacity < self.consumed {
			return Err(Error::invalid_argument("buffer capacity is less than the unflushed length"))
		}

		self.buf.truncate(capacity);
		self.buf.resize(capacity, 0);
		Ok(())
	}
}

impl<S: RawSink> BufWriter for StreamWriter<S> {
	/// Returns the free space of the buffer, which is empty once closed.
	#[inline]
	fn get_buffer(&mut self) -> &mut [u8] {
		if self.closed {
			return &mut []
		}

		&mut self.buf[self.consumed..]
	}

	fn grow_buffer(&mut self) -> Result<usize> {
		let flushed = self.shallow_flush()?;
		if flushed > 0 {
			return Ok(flushed)
		}

		let capacity = self.buf.len();
		let new_capacity = overallocation(capacity);
		log::trace!("growing write buffer from {capacity} to {new_capacity} bytes");
		self.buf.try_reserve_exact(new_capacity - capacity)?;
		self.buf.resize(new_capacity, 0);
		Ok(new_capacity - capacity)
	}

	#[inline]
	fn consume(&mut self, count: usize) -> Result {
		if count > self.get_buffer().len() {
			return Err(Error::consume_buffer())
		}

		self.consumed += count;
		Ok(())
	}

	fn flush(&mut self) -> Result {
		if self.closed {
			return Ok(())
		}

		self.shallow_flush()?;
		self.sink.flush()
	}

	fn close(&mut self) -> Result {
		if self.closed {
			return Ok(())
		}

		log::debug!("closing stream writer with {} unflushed bytes", self.consumed);
		self.shallow_flush()?;
		self.closed = true;
		self.sink.close()
	}

	/// Writes bytes from `buf`. Once the buffer is full, bytes which can't fit in
	/// the emptied buffer are written straight to the sink.
	fn write_bytes(&mut self, buf: &[u8]) -> Result<usize> {
		if self.closed {
			return Err(Error::closed())
		}

		let free = self.get_buffer();
		if buf.len() <= free.len() {
			free[..buf.len()].copy_from_slice(buf);
			self.consumed += buf.len();
			return Ok(buf.len())
		}

		self.shallow_flush()?;
		if buf.len() <= self.buf.len() {
			self.buf[..buf.len()].copy_from_slice(buf);
			self.consumed = buf.len();
		} else {
			self.sink.write_raw(buf)?;
		}
		Ok(buf.len())
	}
}

impl<S: RawSink + Seekable> BufSeek for StreamWriter<S> {
	/// Flushes the writer, then moves the sink to `offset`.
	fn seek(&mut self, offset: u64) -> Result {
		self.flush()?;
		let filesize = self.sink.filesize()?;
		check_seek(offset, filesize)?;
		log::debug!("seeking stream writer to {offset}");
		self.sink.seek(offset)
	}

	/// Returns the sink position plus the number of unflushed bytes. This may be
	/// greater than [`filesize`](Self::filesize).
	fn position(&mut self) -> Result<u64> {
		Ok(self.sink.position()? + self.consumed as u64)
	}

	/// Returns the size of the sink, excluding unflushed bytes.
	fn filesize(&mut self) -> Result<u64> {
		self.sink.filesize()
	}

	fn seek_end(&mut self) -> Result {
		self.flush()?;
		let size = self.sink.filesize()?;
		self.seek(size)
	}
}

#[cfg(test)]
mod tests {
	use crate::ErrorKind;
	use super::*;

	/// Records each write to the sink.
	#[derive(Default)]
	struct Recorder {
		writes: Vec<Vec<u8>>,
		flushes: usize,
		closes: usize,
	}

	impl RawSink for Recorder {
		fn write_raw(&mut self, buf: &[u8]) -> Result {
			self.writes.push(buf.to_vec());
			Ok(())
		}

		fn flush(&mut self) -> Result {
			self.flushes += 1;
			Ok(())
		}

		fn close(&mut self) -> Result {
			self.closes += 1;
			Ok(())
		}
	}

	#[test]
	fn zero_capacity() {
		assert!(matches!(
			StreamWriter::with_capacity(0, Vec::new()),
			Err(Error::InvalidArgument(_))
		));
	}

	#[test]
	fn grow_flushes_then_reallocates() -> Result {
		let mut writer = StreamWriter::with_capacity(4, Recorder::default())?;
		writer.write_all(b"abc")?;
		assert_eq!(writer.grow_buffer()?, 3);
		assert_eq!(writer.get_ref().writes, [b"abc".to_vec()]);
		assert_eq!(writer.get_buffer().len(), 4);
		assert_eq!(writer.grow_buffer()?, 4);
		assert_eq!(writer.capacity(), 8);
		Ok(())
	}

	#[test]
	fn large_writes_bypass_buffer() -> Result {
		let mut writer = StreamWriter::with_capacity(4, Recorder::default())?;
		writer.write_all(b"ab")?;
		writer.write_all(b"cdefghij")?;
		assert_eq!(writer.get_ref().writes, [b"ab".to_vec(), b"cdefghij".to_vec()]);
		writer.write_all(b"kl")?;
		writer.write_all(b"mno")?;
		assert_eq!(writer.get_unflushed(), b"mno");
		writer.flush()?;
		assert_eq!(writer.get_ref().writes.concat(), b"abcdefghijklmno");
		assert_eq!(writer.get_ref().flushes, 1);
		Ok(())
	}

	#[test]
	fn patch_unflushed() -> Result {
		let mut writer = StreamWriter::with_capacity(16, Vec::new())?;
		writer.write_all(b"len=?")?;
		writer.get_unflushed()[4] = b'5';
		writer.flush()?;
		assert_eq!(writer.get_ref(), b"len=5");
		Ok(())
	}

	#[test]
	fn resize_buffer() -> Result {
		let mut writer = StreamWriter::with_capacity(8, Vec::new())?;
		writer.write_all(b"abcd")?;
		assert!(matches!(writer.resize_buffer(3), Err(Error::InvalidArgument(_))));
		assert!(matches!(writer.resize_buffer(0), Err(Error::InvalidArgument(_))));
		writer.resize_buffer(4)?;
		assert!(writer.get_buffer().is_empty());
		assert_eq!(writer.get_unflushed(), b"abcd");
		Ok(())
	}

	#[test]
	fn close_is_idempotent() -> Result {
		let mut writer = StreamWriter::with_capacity(8, Recorder::default())?;
		writer.write_all(b"abc")?;
		writer.close()?;
		writer.close()?;
		writer.flush()?;
		assert_eq!(writer.get_ref().writes, [b"abc".to_vec()]);
		assert_eq!(writer.get_ref().closes, 1);
		assert_eq!(writer.grow_buffer().unwrap_err().kind(), Some(ErrorKind::Closed));
		Ok(())
	}

	#[test]
	fn writes_after_close_fail() -> Result {
		let mut writer = StreamWriter::with_capacity(8, Vec::new())?;
		writer.write_u8(1)?;
		writer.close()?;
		assert!(writer.get_buffer().is_empty());
		assert_eq!(writer.write_u8(2).unwrap_err().kind(), Some(ErrorKind::Closed));
		assert_eq!(writer.write_repeated(0, 3).unwrap_err().kind(), Some(ErrorKind::Closed));
		assert_eq!(writer.write_int_le(7u32).unwrap_err().kind(), Some(ErrorKind::Closed));
		assert_eq!(writer.write_all(b"x").unwrap_err().kind(), Some(ErrorKind::Closed));
		assert_eq!(writer.consume(1).unwrap_err().kind(), Some(ErrorKind::ConsumeBuffer));
		assert_eq!(writer.get_ref(), &[1]);
		Ok(())
	}

	#[test]
	fn consume_bounds() -> Result {
		let mut writer = StreamWriter::with_capacity(4, Vec::new())?;
		writer.consume(3)?;
		assert_eq!(writer.consume(2).unwrap_err().kind(), Some(ErrorKind::ConsumeBuffer));
		assert_eq!(writer.get_buffer().len(), 1);
		Ok(())
	}
}
