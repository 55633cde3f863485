// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use crate::{Error, Result};
use super::{check_seek, BufReader, BufSeek, Fill};

/// A reader over in-memory bytes, either owned (`Vec<u8>`, `Box<[u8]>`) or
/// borrowed (`&[u8]`). The whole input is always buffered; filling never adds
/// bytes, and seeking is constant-time.
#[derive(Clone, Debug, Default)]
pub struct CursorReader<T> {
	data: T,
	offset: usize,
}

impl<T: AsRef<[u8]>> CursorReader<T> {
	/// Creates a reader at the start of `data`.
	pub const fn new(data: T) -> Self {
		Self { data, offset: 0 }
	}

	/// Returns the zero-based offset of the next byte to read.
	pub const fn offset(&self) -> usize { self.offset }
	/// Returns the total length of the data.
	pub fn len(&self) -> usize { self.data.as_ref().len() }
	/// Returns `true` if the data is empty.
	pub fn is_empty(&self) -> bool { self.len() == 0 }
	/// Returns a reference to the data, including consumed bytes.
	pub const fn get_ref(&self) -> &T { &self.data }
	/// Unwraps the data.
	pub fn into_inner(self) -> T { self.data }

	/// Moves the offset by `delta` bytes, forward or backward.
	///
	/// # Errors
	///
	/// Returns [`ErrorKind::BadSeek`](crate::ErrorKind::BadSeek) if the target is
	/// before the start or past the end of the data.
	pub fn relative_seek(&mut self, delta: i64) -> Result {
		let target = i64::try_from(self.offset)
			.ok()
			.and_then(|offset| offset.checked_add(delta))
			.and_then(|target| u64::try_from(target).ok())
			.ok_or(Error::bad_seek())?;
		self.seek(target)
	}
}

impl<T: AsRef<[u8]>> BufReader for CursorReader<T> {
	#[inline]
	fn get_buffer(&self) -> &[u8] {
		&self.data.as_ref()[self.offset..]
	}

	#[inline]
	fn fill_buffer(&mut self) -> Result<Fill> {
		Ok(Fill::Bytes(0))
	}

	#[inline]
	fn consume(&mut self, count: usize) -> Result {
		if count > self.len() - self.offset {
			return Err(Error::consume_buffer())
		}

		self.offset += count;
		Ok(())
	}
}

impl<T: AsRef<[u8]>> BufSeek for CursorReader<T> {
	fn seek(&mut self, offset: u64) -> Result {
		check_seek(offset, self.len() as u64)?;
		// Bounded by the length above, which fits in usize.
		self.offset = offset as usize;
		Ok(())
	}

	fn position(&mut self) -> Result<u64> {
		Ok(self.offset as u64)
	}

	fn filesize(&mut self) -> Result<u64> {
		Ok(self.len() as u64)
	}
}

#[cfg(test)]
mod tests {
	use crate::ErrorKind;
	use super::*;

	#[test]
	fn consume_bounds() -> Result {
		let mut reader = CursorReader::new(&b"hello"[..]);
		reader.consume(2)?;
		assert_eq!(reader.get_buffer(), b"llo");
		assert_eq!(reader.consume(4).unwrap_err().kind(), Some(ErrorKind::ConsumeBuffer));
		assert_eq!(reader.get_buffer(), b"llo");
		reader.consume(3)?;
		assert!(reader.get_buffer().is_empty());
		assert_eq!(reader.fill_buffer()?, Fill::Bytes(0));
		Ok(())
	}

	#[test]
	fn seek() -> Result {
		let mut reader = CursorReader::new(b"hello".to_vec());
		reader.seek(5)?;
		assert!(reader.get_buffer().is_empty());
		reader.seek_start()?;
		assert_eq!(reader.get_buffer(), b"hello");
		assert_eq!(reader.seek(6).unwrap_err().kind(), Some(ErrorKind::BadSeek));
		assert_eq!(reader.position()?, 0);
		reader.seek_end()?;
		assert_eq!(reader.position()?, 5);
		Ok(())
	}

	#[test]
	fn relative_seek() -> Result {
		let mut reader = CursorReader::new(b"hello");
		reader.relative_seek(3)?;
		assert_eq!(reader.get_buffer(), b"lo");
		reader.relative_seek(-2)?;
		assert_eq!(reader.get_buffer(), b"ello");
		assert_eq!(reader.relative_seek(-2).unwrap_err().kind(), Some(ErrorKind::BadSeek));
		assert_eq!(reader.relative_seek(5).unwrap_err().kind(), Some(ErrorKind::BadSeek));
		assert_eq!(reader.offset(), 1);
		Ok(())
	}
}
