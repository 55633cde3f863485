// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

use alloc::vec::Vec;
use crate::{Error, RawSource, Result, Seekable};
use crate::grow::grown_capacity;
use super::{check_seek, BufReader, BufSeek, Fill};

/// The default buffer capacity, 8KiB.
pub const DEFAULT_CAPACITY: usize = 8 * 1024;
/// The number of consecutive empty reads tolerated before a fill gives up.
const MAX_EMPTY_READS: usize = 64;

/// A buffered reader over a [`RawSource`]. The buffer grows as needed, up to an
/// optional maximum capacity.
pub struct StreamReader<S> {
	source: S,
	buf: Vec<u8>,
	/// The index of the first unread byte.
	start: usize,
	/// The index past the last unread byte.
	stop: usize,
	max_capacity: usize,
	end: bool,
	closed: bool,
}

impl<S: RawSource> StreamReader<S> {
	/// Creates a reader with the default capacity and no maximum.
	pub fn new(source: S) -> Self {
		Self::from_parts(source, DEFAULT_CAPACITY, usize::MAX)
	}

	/// Creates a reader with an initial buffer capacity and no maximum.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidArgument`] if `capacity` is zero.
	pub fn with_capacity(capacity: usize, source: S) -> Result<Self> {
		Self::builder(source).capacity(capacity).build()
	}

	/// Returns a [`StreamReaderBuilder`] for configuring a new reader.
	pub fn builder(source: S) -> StreamReaderBuilder<S> {
		StreamReaderBuilder {
			source,
			capacity: DEFAULT_CAPACITY,
			max_capacity: None,
		}
	}

	fn from_parts(source: S, capacity: usize, max_capacity: usize) -> Self {
		Self {
			source,
			buf: alloc::vec![0; capacity],
			start: 0,
			stop: 0,
			max_capacity,
			end: false,
			closed: false,
		}
	}
}

impl<S> StreamReader<S> {
	/// Returns the buffer capacity.
	pub fn capacity(&self) -> usize { self.buf.len() }
	/// Returns the maximum buffer capacity.
	pub fn max_capacity(&self) -> usize { self.max_capacity }
	/// Returns `true` if the reader has been closed.
	pub fn is_closed(&self) -> bool { self.closed }
	/// Returns a reference to the source.
	pub fn get_ref(&self) -> &S { &self.source }
	/// Unwraps the source. Buffered bytes are lost.
	pub fn into_inner(self) -> S { self.source }

	/// Resizes the buffer to `capacity` bytes, keeping buffered bytes.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidArgument`] if `capacity` is zero or less than the
	/// number of buffered bytes.
	pub fn resize_buffer(&mut self, capacity: usize) -> Result {
		if capacity == 0 {
			return Err(Error::invalid_argument("buffer capacity must be at least 1"))
		}
		if capacity < self.stop - self.start {
			return Err(Error::invalid_argument("buffer capacity is less than the buffered length"))
		}

		self.compact();
		self.buf.truncate(capacity);
		self.buf.resize(capacity, 0);
		self.max_capacity = self.max_capacity.max(capacity);
		Ok(())
	}

	/// Moves buffered bytes to the front of the buffer.
	fn compact(&mut self) {
		if self.start > 0 {
			log::trace!("compacting {} buffered bytes from offset {}", self.stop - self.start, self.start);
			self.buf.copy_within(self.start..self.stop, 0);
			self.stop -= self.start;
			self.start = 0;
		}
	}

	/// Grows the buffer, returning `false` if it's already at the maximum capacity.
	fn grow(&mut self) -> Result<bool> {
		let capacity = self.buf.len();
		if capacity >= self.max_capacity {
			return Ok(false)
		}

		let new_capacity = grown_capacity(capacity, capacity + 1, self.max_capacity);
		log::trace!("growing read buffer from {capacity} to {new_capacity} bytes");
		self.buf.try_reserve_exact(new_capacity - capacity)?;
		self.buf.resize(new_capacity, 0);
		Ok(true)
	}
}

impl<S: RawSource> BufReader for StreamReader<S> {
	#[inline]
	fn get_buffer(&self) -> &[u8] {
		&self.buf[self.start..self.stop]
	}

	fn fill_buffer(&mut self) -> Result<Fill> {
		if self.closed {
			return Err(Error::closed())
		}
		if self.end {
			return Ok(Fill::Bytes(0))
		}

		if self.start == self.stop {
			self.start = 0;
			self.stop = 0;
		}

		if self.stop == self.buf.len() {
			if self.start > 0 {
				self.compact();
			} else if !self.grow()? {
				if self.source.is_end()? {
					self.end = true;
					return Ok(Fill::Bytes(0))
				}
				return Ok(Fill::Full)
			}
		}

		for _ in 0..MAX_EMPTY_READS {
			match self.source.read_raw(&mut self.buf[self.stop..])? {
				None => {
					self.end = true;
					return Ok(Fill::Bytes(0))
				}
				Some(0) => { }
				Some(count) => {
					self.stop += count;
					return Ok(Fill::Bytes(count))
				}
			}
		}

		log::trace!("source returned {MAX_EMPTY_READS} empty reads, giving up on fill");
		Ok(Fill::Bytes(0))
	}

	#[inline]
	fn consume(&mut self, count: usize) -> Result {
		if count > self.stop - self.start {
			return Err(Error::consume_buffer())
		}

		self.start += count;
		Ok(())
	}

	fn close(&mut self) -> Result {
		if self.closed {
			return Ok(())
		}

		log::debug!("closing stream reader with {} unread bytes", self.stop - self.start);
		self.closed = true;
		self.start = 0;
		self.stop = 0;
		self.source.close()
	}
}

impl<S: RawSource + Seekable> BufSeek for StreamReader<S> {
	fn seek(&mut self, offset: u64) -> Result {
		if self.closed {
			return Err(Error::closed())
		}

		let filesize = self.source.filesize()?;
		check_seek(offset, filesize)?;
		log::debug!("seeking stream reader to {offset}");
		self.source.seek(offset)?;
		self.start = 0;
		self.stop = 0;
		self.end = false;
		Ok(())
	}

	fn position(&mut self) -> Result<u64> {
		let buffered = (self.stop - self.start) as u64;
		Ok(self.source.position()? - buffered)
	}

	fn filesize(&mut self) -> Result<u64> {
		self.source.filesize()
	}
}

/// A builder for a [`StreamReader`] with custom capacity settings.
#[must_use]
pub struct StreamReaderBuilder<S> {
	source: S,
	capacity: usize,
	max_capacity: Option<usize>,
}

impl<S: RawSource> StreamReaderBuilder<S> {
	/// Sets the initial buffer capacity. Defaults to 8KiB.
	pub fn capacity(mut self, capacity: usize) -> Self {
		self.capacity = capacity;
		self
	}

	/// Sets the maximum buffer capacity. The buffer never grows past this size;
	/// lines longer than it can't be split. Defaults to no maximum.
	pub fn max_capacity(mut self, max_capacity: usize) -> Self {
		self.max_capacity = Some(max_capacity);
		self
	}

	/// Builds the [`StreamReader`].
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidArgument`] if the capacity is zero or greater than
	/// the maximum capacity.
	pub fn build(self) -> Result<StreamReader<S>> {
		let Self { source, capacity, max_capacity } = self;
		if capacity == 0 {
			return Err(Error::invalid_argument("buffer capacity must be at least 1"))
		}

		let max_capacity = max_capacity.unwrap_or(usize::MAX);
		if capacity > max_capacity {
			return Err(Error::invalid_argument("buffer capacity exceeds the maximum capacity"))
		}

		Ok(StreamReader::from_parts(source, capacity, max_capacity))
	}
}
