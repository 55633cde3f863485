// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "utf8")]
use alloc::string::String;
use bytemuck::{bytes_of_mut, Pod};
use num_traits::PrimInt;
use crate::{BufWriter, Error, Result};

mod cursor;
mod lines;
#[cfg(feature = "alloc")]
mod stream;

pub use cursor::CursorReader;
pub use lines::{line_views, LineViews, SliceLines};
#[cfg(feature = "alloc")]
pub use lines::Lines;
#[cfg(feature = "alloc")]
pub use stream::{StreamReader, StreamReaderBuilder};

/// The outcome of [`BufReader::fill_buffer`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Fill {
	/// This many bytes were appended to the buffer. Zero means the underlying
	/// source has ended, or there is no underlying source.
	Bytes(usize),
	/// The buffer is non-empty and cannot grow to hold more bytes.
	Full,
}

impl Fill {
	/// Returns `true` if no bytes were added because the source ended.
	pub const fn is_end(self) -> bool {
		matches!(self, Self::Bytes(0))
	}
}

/// The outcome of [`BufReader::buffer_until`].
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Until {
	/// The delimiter is at this index in the buffer.
	Found(usize),
	/// The source ended before the delimiter was found. The buffer holds every
	/// remaining byte.
	End,
	/// The buffer filled up and cannot grow before the delimiter was found.
	Full,
}

/// A buffered source of bytes exposing its buffer.
///
/// Implementors supply four primitives: [`get_buffer`], [`fill_buffer`],
/// [`consume`], and [`close`]. Everything else is derived from them.
///
/// Slices returned from the buffer borrow the reader, so the borrow checker
/// invalidates them on the next mutating call.
///
/// [`get_buffer`]: Self::get_buffer
/// [`fill_buffer`]: Self::fill_buffer
/// [`consume`]: Self::consume
/// [`close`]: Self::close
pub trait BufReader {
	/// Returns the buffered, unread bytes. Never performs IO.
	fn get_buffer(&self) -> &[u8];
	/// Appends at least one byte to the buffer from the underlying source, if
	/// possible. Returns [`Fill::Bytes(0)`](Fill::Bytes) if the source has ended,
	/// or [`Fill::Full`] if the buffer is non-empty and cannot grow. `Full` is
	/// never returned for an empty buffer.
	///
	/// Bytes already in the buffer are kept, in order, at its front.
	fn fill_buffer(&mut self) -> Result<Fill>;
	/// Removes `count` bytes from the front of the buffer.
	///
	/// # Errors
	///
	/// Returns [`ErrorKind::ConsumeBuffer`](crate::ErrorKind::ConsumeBuffer) if
	/// `count` exceeds the buffer length, leaving the buffer unchanged.
	fn consume(&mut self, count: usize) -> Result;
	/// Closes the reader and any wrapped source. Closing twice has no effect.
	fn close(&mut self) -> Result { Ok(()) }

	/// Returns the buffer if not empty, otherwise fills it once and returns it.
	/// Returns `None` only if the source has ended.
	fn get_nonempty_buffer(&mut self) -> Result<Option<&[u8]>> {
		if self.get_buffer().is_empty() {
			self.fill_buffer()?;
		}

		let buf = Self::get_buffer(self);
		Ok((!buf.is_empty()).then_some(buf))
	}

	/// Reads bytes into a slice until it's full or the source ends, returning the
	/// bytes read.
	fn read_bytes<'a>(&mut self, buf: &'a mut [u8]) -> Result<&'a [u8]> {
		let mut filled = 0;
		while filled < buf.len() {
			let Some(chunk) = self.get_nonempty_buffer()? else { break };
			let count = chunk.len().min(buf.len() - filled);
			buf[filled..filled + count].copy_from_slice(&chunk[..count]);
			self.consume(count)?;
			filled += count;
		}
		Ok(&buf[..filled])
	}
	/// Reads the exact length of bytes into a slice.
	///
	/// # Errors
	///
	/// Returns an end-of-stream error if the source ends first. Bytes read before
	/// the end are consumed.
	fn read_exact_bytes<'a>(&mut self, buf: &'a mut [u8]) -> Result<&'a [u8]> {
		let len = buf.len();
		let bytes = self.read_bytes(buf)?;
		if bytes.len() < len {
			Err(Error::end())
		} else {
			Ok(bytes)
		}
	}
	/// Reads up to `count` bytes into a new vector.
	#[cfg(feature = "alloc")]
	fn read_count(&mut self, count: usize) -> Result<Vec<u8>> {
		let mut vec = Vec::new();
		let mut remaining = count;
		while remaining > 0 {
			let Some(chunk) = self.get_nonempty_buffer()? else { break };
			let len = chunk.len().min(remaining);
			vec.try_reserve(len)?;
			vec.extend_from_slice(&chunk[..len]);
			self.consume(len)?;
			remaining -= len;
		}
		Ok(vec)
	}
	/// Reads all bytes until the source ends into a new vector.
	#[cfg(feature = "alloc")]
	fn read_all(&mut self) -> Result<Vec<u8>> {
		let mut vec = Vec::new();
		self.read_to_end(&mut vec)?;
		Ok(vec)
	}
	/// Appends all bytes until the source ends to `buf`, returning the number of
	/// bytes read.
	#[cfg(feature = "alloc")]
	fn read_to_end(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
		let start = buf.len();
		while let Some(chunk) = self.get_nonempty_buffer()? {
			let len = chunk.len();
			buf.try_reserve(len)?;
			buf.extend_from_slice(chunk);
			self.consume(len)?;
		}
		Ok(buf.len() - start)
	}
	/// Reads up to `len` bytes to `ptr`, returning the number of bytes read.
	///
	/// # Safety
	///
	/// `ptr` must be valid for writes of `len` bytes, and the region must not be
	/// accessed through any other pointer for the duration of the call.
	unsafe fn read_raw(&mut self, ptr: *mut u8, len: usize) -> Result<usize> {
		let buf = core::slice::from_raw_parts_mut(ptr, len);
		self.read_bytes(buf).map(<[u8]>::len)
	}

	/// Returns the next byte without consuming it.
	///
	/// # Errors
	///
	/// Returns an end-of-stream error if no bytes remain.
	fn peek(&mut self) -> Result<u8> {
		match self.get_nonempty_buffer()? {
			Some(&[byte, ..]) => Ok(byte),
			_ => Err(Error::end())
		}
	}
	/// Reads one byte.
	fn read_u8(&mut self) -> Result<u8> {
		let byte = self.peek()?;
		self.consume(1)?;
		Ok(byte)
	}
	/// Reads a byte as a boolean, any non-zero value being `true`.
	fn read_bool(&mut self) -> Result<bool> {
		self.read_u8().map(|b| b != 0)
	}
	/// Reads a value of generic type `T` supporting an arbitrary bit pattern, in
	/// native byte order. See [`Pod`].
	fn read_data<T: Pod>(&mut self) -> Result<T> where Self: Sized {
		let mut value = T::zeroed();
		let bytes = bytes_of_mut(&mut value);
		let size = bytes.len();
		match self.get_nonempty_buffer()? {
			Some(buf) if buf.len() >= size => {
				bytes.copy_from_slice(&buf[..size]);
				self.consume(size)?;
			}
			_ => { self.read_exact_bytes(bytes)?; }
		}
		Ok(value)
	}
	/// Reads a little-endian integer.
	fn read_int_le<T: PrimInt + Pod>(&mut self) -> Result<T> where Self: Sized {
		self.read_data().map(T::from_le)
	}
	/// Reads a big-endian integer.
	fn read_int_be<T: PrimInt + Pod>(&mut self) -> Result<T> where Self: Sized {
		self.read_data().map(T::from_be)
	}

	/// Consumes up to `count` bytes, returning the number of bytes skipped. Fewer
	/// bytes are skipped only if the source ends.
	fn skip(&mut self, count: usize) -> Result<usize> {
		let mut remaining = count;
		while remaining > 0 {
			let Some(chunk) = self.get_nonempty_buffer()? else { break };
			let len = chunk.len().min(remaining);
			self.consume(len)?;
			remaining -= len;
		}
		Ok(count - remaining)
	}
	/// Consumes exactly `count` bytes.
	///
	/// # Errors
	///
	/// Returns an end-of-stream error if the source ends first.
	fn skip_exact(&mut self, count: usize) -> Result {
		if self.skip(count)? < count {
			Err(Error::end())
		} else {
			Ok(())
		}
	}

	/// Fills the buffer until it contains `delimiter`. Bytes are scanned once; a
	/// fill only scans the newly added bytes.
	fn buffer_until(&mut self, delimiter: u8) -> Result<Until> {
		let mut scanned = 0;
		loop {
			let buf = self.get_buffer();
			if let Some(index) = find(delimiter, &buf[scanned..]) {
				return Ok(Until::Found(scanned + index))
			}
			scanned = buf.len();

			match self.fill_buffer()? {
				Fill::Full => return Ok(Until::Full),
				Fill::Bytes(0) => return Ok(Until::End),
				Fill::Bytes(_) => { }
			}
		}
	}
	/// Copies bytes to `sink` up to the next `delimiter`, consuming through the
	/// delimiter. The delimiter is copied if `keep` is `true`. Returns the number
	/// of bytes copied. If the source ends first, every remaining byte is copied.
	fn copy_until<W: BufWriter + ?Sized>(&mut self, sink: &mut W, delimiter: u8, keep: bool) -> Result<usize>
	where Self: Sized {
		let mut copied = 0;
		while let Some(buf) = self.get_nonempty_buffer()? {
			if let Some(index) = find(delimiter, buf) {
				let len = if keep { index + 1 } else { index };
				sink.write_all(&buf[..len])?;
				self.consume(index + 1)?;
				return Ok(copied + len)
			}

			let len = buf.len();
			sink.write_all(buf)?;
			self.consume(len)?;
			copied += len;
		}
		Ok(copied)
	}
	/// Copies one line to `sink`, consuming through its `\n`. If `keep` is `false`
	/// the line ending, `\n` or `\r\n`, is not copied. Returns the number of bytes
	/// copied.
	///
	/// # Errors
	///
	/// Returns [`ErrorKind::BufferTooShort`](crate::ErrorKind::BufferTooShort) if
	/// `keep` is `false` and the buffer holds only a `\r` and cannot grow to see
	/// whether a `\n` follows it, before the source has ended.
	fn copy_line<W: BufWriter + ?Sized>(&mut self, sink: &mut W, keep: bool) -> Result<usize>
	where Self: Sized {
		if keep {
			return self.copy_until(sink, b'\n', true)
		}

		let mut copied = 0;
		while let Some(buf) = self.get_nonempty_buffer()? {
			if let Some(index) = find(b'\n', buf) {
				let len = if index > 0 && buf[index - 1] == b'\r' { index - 1 } else { index };
				sink.write_all(&buf[..len])?;
				self.consume(index + 1)?;
				return Ok(copied + len)
			}

			// Hold back a trailing \r, it may start a \r\n split across fills.
			let held = usize::from(buf.last() == Some(&b'\r'));
			let len = buf.len() - held;
			sink.write_all(&buf[..len])?;
			self.consume(len)?;
			copied += len;

			if held > 0 {
				match self.fill_buffer()? {
					Fill::Full => return Err(Error::buffer_too_short()),
					Fill::Bytes(0) => {
						sink.write_all(b"\r")?;
						self.consume(1)?;
						return Ok(copied + 1)
					}
					Fill::Bytes(_) => { }
				}
			}
		}
		Ok(copied)
	}
	/// Reads one line into a new vector. See [`copy_line`](Self::copy_line).
	#[cfg(feature = "alloc")]
	fn read_line(&mut self, keep: bool) -> Result<Vec<u8>> where Self: Sized {
		let mut sink = crate::VecWriter::new();
		self.copy_line(&mut sink, keep)?;
		Ok(sink.into_vec())
	}
	/// Reads one line of UTF-8, appending it to `buf` and returning the string
	/// read. If invalid bytes are encountered, an error is returned and `buf` is
	/// unchanged; the line is consumed regardless.
	#[cfg(feature = "utf8")]
	fn read_line_utf8<'a>(&mut self, buf: &'a mut String, keep: bool) -> Result<&'a str> where Self: Sized {
		let line = self.read_line(keep)?;
		let str = simdutf8::compat::from_utf8(&line)?;
		let start = buf.len();
		buf.try_reserve(str.len())?;
		buf.push_str(str);
		Ok(&buf[start..])
	}

	/// Returns a lending iterator over lines as slices of the buffer. See
	/// [`LineViews`].
	fn line_views(&mut self, chomp: bool) -> LineViews<'_, Self> where Self: Sized {
		LineViews::new(self, chomp)
	}
	/// Returns an iterator over chomped lines, copied into vectors.
	#[cfg(feature = "alloc")]
	fn lines(self) -> Lines<Self> where Self: Sized {
		Lines::new(self)
	}
}

/// Returns the index of the first `byte` in `bytes`.
#[inline]
pub(crate) fn find(byte: u8, bytes: &[u8]) -> Option<usize> {
	bytes.iter().position(|&b| b == byte)
}

/// Accesses a reader's position within a seekable source.
pub trait BufSeek {
	/// Moves to the zero-based `offset`, discarding the buffer.
	///
	/// # Errors
	///
	/// Returns [`ErrorKind::BadSeek`](crate::ErrorKind::BadSeek) if `offset` is
	/// greater than [`filesize`](Self::filesize).
	fn seek(&mut self, offset: u64) -> Result;
	/// Returns the logical position, the number of bytes before the next byte to
	/// be read or written.
	fn position(&mut self) -> Result<u64>;
	/// Returns the total size of the underlying data.
	fn filesize(&mut self) -> Result<u64>;

	/// Moves to the start.
	fn seek_start(&mut self) -> Result { self.seek(0) }
	/// Moves to the end.
	fn seek_end(&mut self) -> Result {
		let size = self.filesize()?;
		self.seek(size)
	}
}

pub(crate) fn check_seek(offset: u64, filesize: u64) -> Result {
	if offset > filesize {
		Err(Error::bad_seek())
	} else {
		Ok(())
	}
}
