// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use bytemuck::{bytes_of, Pod};
use num_traits::PrimInt;
use crate::{Error, Result};

#[cfg(feature = "alloc")]
mod stream;
#[cfg(feature = "alloc")]
mod vec;

#[cfg(feature = "alloc")]
pub use stream::StreamWriter;
#[cfg(feature = "alloc")]
pub use vec::VecWriter;

/// A buffered sink of bytes exposing its buffer.
///
/// Implementors supply [`get_buffer`], [`grow_buffer`], [`consume`], and
/// optionally [`flush`] and [`close`]. Bytes are written by filling the front of
/// the buffer, then consuming them.
///
/// [`get_buffer`]: Self::get_buffer
/// [`grow_buffer`]: Self::grow_buffer
/// [`consume`]: Self::consume
/// [`flush`]: Self::flush
/// [`close`]: Self::close
pub trait BufWriter {
	/// Returns the free space of the buffer. Never performs IO.
	fn get_buffer(&mut self) -> &mut [u8];
	/// Makes more free space in the buffer, by flushing buffered bytes and/or
	/// growing the buffer, returning the number of bytes freed. Returns zero only
	/// if no more space can be made.
	fn grow_buffer(&mut self) -> Result<usize>;
	/// Marks the first `count` bytes of the buffer as written.
	///
	/// # Errors
	///
	/// Returns [`ErrorKind::ConsumeBuffer`](crate::ErrorKind::ConsumeBuffer) if
	/// `count` exceeds the buffer length, leaving the buffer unchanged.
	fn consume(&mut self, count: usize) -> Result;
	/// Writes all buffered bytes through to the final destination.
	fn flush(&mut self) -> Result { Ok(()) }
	/// Flushes and closes the writer and any wrapped sink. Closing twice has no
	/// effect.
	fn close(&mut self) -> Result { self.flush() }

	/// Returns a buffer with at least `min_size` bytes of free space, growing it
	/// as needed, or `None` if the writer can't make that much space.
	fn get_nonempty_buffer(&mut self, min_size: usize) -> Result<Option<&mut [u8]>> {
		let min_size = min_size.max(1);
		while self.get_buffer().len() < min_size {
			if self.grow_buffer()? == 0 {
				return Ok(None)
			}
		}
		Ok(Some(self.get_buffer()))
	}

	/// Writes bytes from `buf` until all are written or no more space can be made,
	/// returning the number of bytes written.
	fn write_bytes(&mut self, buf: &[u8]) -> Result<usize> {
		let mut written = 0;
		while written < buf.len() {
			let Some(free) = self.get_nonempty_buffer(1)? else { break };
			let count = free.len().min(buf.len() - written);
			free[..count].copy_from_slice(&buf[written..written + count]);
			self.consume(count)?;
			written += count;
		}
		Ok(written)
	}
	/// Writes all bytes from `buf`.
	///
	/// # Errors
	///
	/// Returns [`ErrorKind::BufferTooShort`](crate::ErrorKind::BufferTooShort) if
	/// the writer can't make space for every byte.
	fn write_all(&mut self, buf: &[u8]) -> Result {
		if self.write_bytes(buf)? < buf.len() {
			Err(Error::buffer_too_short())
		} else {
			Ok(())
		}
	}
	/// Writes up to `len` bytes from `ptr`, returning the number of bytes written.
	///
	/// # Safety
	///
	/// `ptr` must be valid for reads of `len` bytes, and the region must not be
	/// mutated for the duration of the call.
	unsafe fn write_raw(&mut self, ptr: *const u8, len: usize) -> Result<usize> {
		let buf = core::slice::from_raw_parts(ptr, len);
		self.write_bytes(buf)
	}
	/// Writes `byte` `count` times, returning the number of bytes written. Fewer
	/// are written only if no more space can be made.
	fn write_repeated(&mut self, byte: u8, count: usize) -> Result<usize> {
		let mut remaining = count;
		while remaining > 0 {
			let Some(free) = self.get_nonempty_buffer(1)? else { break };
			let len = free.len().min(remaining);
			free[..len].fill(byte);
			self.consume(len)?;
			remaining -= len;
		}
		Ok(count - remaining)
	}

	/// Writes a [`u8`].
	fn write_u8(&mut self, value: u8) -> Result {
		let Some(free) = self.get_nonempty_buffer(1)? else {
			return Err(Error::buffer_too_short())
		};
		free[0] = value;
		self.consume(1)
	}
	/// Writes a boolean as a byte, `1` or `0`.
	fn write_bool(&mut self, value: bool) -> Result {
		self.write_u8(value.into())
	}
	/// Writes a value of an arbitrary bit pattern in native byte order. See
	/// [`Pod`].
	///
	/// The value is copied into the buffer in one go if it can make enough space,
	/// otherwise it's written byte by byte.
	fn write_data<T: Pod>(&mut self, value: T) -> Result where Self: Sized {
		let bytes = bytes_of(&value);
		if let Some(free) = self.get_nonempty_buffer(bytes.len())? {
			free[..bytes.len()].copy_from_slice(bytes);
			return self.consume(bytes.len())
		}

		bytes.iter().try_for_each(|&byte| self.write_u8(byte))
	}
	/// Writes a little-endian integer.
	fn write_int_le<T: PrimInt + Pod>(&mut self, value: T) -> Result where Self: Sized {
		self.write_data(value.to_le())
	}
	/// Writes a big-endian integer.
	fn write_int_be<T: PrimInt + Pod>(&mut self, value: T) -> Result where Self: Sized {
		self.write_data(value.to_be())
	}
	/// Writes a UTF-8 string.
	fn write_utf8(&mut self, value: &str) -> Result {
		self.write_all(value.as_bytes())
	}
}
