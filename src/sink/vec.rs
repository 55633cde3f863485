// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
#[cfg(feature = "utf8")]
use alloc::string::String;
use crate::{Error, Result};
use crate::grow::overallocation;
use super::BufWriter;

/// The default capacity of a new [`VecWriter`].
pub const DEFAULT_CAPACITY: usize = 32;

/// A writer into a vector it owns. The buffer is the space past the written
/// bytes; it grows without bound, and flushing does nothing.
#[derive(Clone, Debug)]
pub struct VecWriter {
	/// Zero-initialized storage; only the first `len` bytes are written.
	vec: Vec<u8>,
	len: usize,
}

impl VecWriter {
	/// Creates a writer with the default capacity.
	pub fn new() -> Self {
		Self {
			vec: alloc::vec![0; DEFAULT_CAPACITY],
			len: 0,
		}
	}

	/// Creates a writer with an initial capacity.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidArgument`] if `capacity` is zero.
	pub fn with_capacity(capacity: usize) -> Result<Self> {
		if capacity == 0 {
			return Err(Error::invalid_argument("buffer capacity must be at least 1"))
		}

		Ok(Self {
			vec: alloc::vec![0; capacity],
			len: 0,
		})
	}

	/// Creates a writer appending to `vec`.
	pub fn from_vec(vec: Vec<u8>) -> Self {
		let len = vec.len();
		Self { vec, len }
	}

	/// Returns the bytes written.
	pub fn written(&self) -> &[u8] { &self.vec[..self.len] }
	/// Returns the number of bytes written.
	pub fn len(&self) -> usize { self.len }
	/// Returns `true` if no bytes have been written.
	pub fn is_empty(&self) -> bool { self.len == 0 }
	/// Returns the capacity, written bytes included.
	pub fn capacity(&self) -> usize { self.vec.len() }

	/// Takes the written bytes, leaving the writer empty.
	pub fn take(&mut self) -> Vec<u8> {
		self.vec.truncate(self.len);
		self.len = 0;
		core::mem::take(&mut self.vec)
	}

	/// Takes the written bytes as a UTF-8 string, leaving the writer empty. If the
	/// bytes are invalid, an error is returned and the writer is unchanged.
	#[cfg(feature = "utf8")]
	pub fn take_string(&mut self) -> Result<String> {
		simdutf8::compat::from_utf8(self.written())?;
		let bytes = self.take();
		Ok(unsafe {
			// Safety: the bytes were validated above.
			String::from_utf8_unchecked(bytes)
		})
	}

	/// Unwraps the written bytes.
	pub fn into_vec(mut self) -> Vec<u8> {
		self.vec.truncate(self.len);
		self.vec
	}
}

impl Default for VecWriter {
	fn default() -> Self { Self::new() }
}

impl From<Vec<u8>> for VecWriter {
	fn from(value: Vec<u8>) -> Self {
		Self::from_vec(value)
	}
}

impl From<VecWriter> for Vec<u8> {
	fn from(value: VecWriter) -> Self {
		value.into_vec()
	}
}

impl BufWriter for VecWriter {
	#[inline]
	fn get_buffer(&mut self) -> &mut [u8] {
		&mut self.vec[self.len..]
	}

	fn grow_buffer(&mut self) -> Result<usize> {
		let capacity = self.vec.len();
		let new_capacity = overallocation(capacity);
		log::trace!("growing vector from {capacity} to {new_capacity} bytes");
		self.vec.try_reserve_exact(new_capacity - capacity)?;
		self.vec.resize(new_capacity, 0);
		Ok(new_capacity - capacity)
	}

	#[inline]
	fn consume(&mut self, count: usize) -> Result {
		if count > self.vec.len() - self.len {
			return Err(Error::consume_buffer())
		}

		self.len += count;
		Ok(())
	}

	fn write_bytes(&mut self, buf: &[u8]) -> Result<usize> {
		let end = self.len + buf.len();
		if end > self.vec.len() {
			let new_capacity = overallocation(self.vec.len()).max(end);
			self.vec.try_reserve_exact(new_capacity - self.vec.len())?;
			self.vec.resize(new_capacity, 0);
		}

		self.vec[self.len..end].copy_from_slice(buf);
		self.len = end;
		Ok(buf.len())
	}
}
