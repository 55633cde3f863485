// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use core::iter::FusedIterator;
use crate::{Error, Result};
use super::{find, BufReader, Until};

/// A lending iterator over the lines of a reader, yielding slices of the
/// reader's buffer without copying.
///
/// Each call to [`next_line`] consumes the previous line, then buffers up to the
/// next `\n`. The returned slice borrows the iterator, so it's invalid after the
/// next call. A final line without a `\n` is yielded at the end of the source.
///
/// A line which can't fit in the reader's buffer, such as a line longer than a
/// bounded [`StreamReader`], produces a [`ErrorKind::BufferTooShort`] error
/// rather than being truncated.
///
/// [`next_line`]: Self::next_line
/// [`StreamReader`]: crate::StreamReader
/// [`ErrorKind::BufferTooShort`]: crate::ErrorKind::BufferTooShort
pub struct LineViews<'r, R: BufReader + ?Sized> {
	reader: &'r mut R,
	chomp: bool,
	/// The length of the last line yielded, not yet consumed.
	pending: usize,
}

impl<'r, R: BufReader + ?Sized> LineViews<'r, R> {
	/// Creates a line iterator over `reader`. With `chomp`, line endings are
	/// stripped from yielded lines.
	pub fn new(reader: &'r mut R, chomp: bool) -> Self {
		Self { reader, chomp, pending: 0 }
	}

	/// Returns the next line, or `None` if the source has ended.
	pub fn next_line(&mut self) -> Option<Result<&[u8]>> {
		let pending = core::mem::take(&mut self.pending);
		if let Err(error) = self.reader.consume(pending) {
			return Some(Err(error))
		}

		let len = match self.reader.buffer_until(b'\n') {
			Ok(Until::Found(index)) => index + 1,
			Ok(Until::End) => match self.reader.get_buffer().len() {
				0 => return None,
				len => len
			},
			Ok(Until::Full) => return Some(Err(Error::buffer_too_short())),
			Err(error) => return Some(Err(error))
		};

		self.pending = len;
		let line = &self.reader.get_buffer()[..len];
		Some(Ok(if self.chomp { chomp(line) } else { line }))
	}

	/// Consumes the last line yielded, returning the reader.
	///
	/// # Errors
	///
	/// Propagates errors from consuming the last line.
	pub fn finish(mut self) -> Result<&'r mut R> {
		let pending = core::mem::take(&mut self.pending);
		self.reader.consume(pending)?;
		Ok(self.reader)
	}
}

/// An iterator over chomped lines of a reader, copied into vectors.
#[cfg(feature = "alloc")]
pub struct Lines<R: BufReader> {
	reader: R,
	done: bool,
}

#[cfg(feature = "alloc")]
impl<R: BufReader> Lines<R> {
	pub(super) fn new(reader: R) -> Self {
		Self { reader, done: false }
	}

	/// Returns the reader.
	pub fn into_inner(self) -> R { self.reader }
}

#[cfg(feature = "alloc")]
impl<R: BufReader> Iterator for Lines<R> {
	type Item = Result<Vec<u8>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None
		}

		match self.reader.get_nonempty_buffer() {
			Ok(Some(_)) => { }
			Ok(None) => {
				self.done = true;
				return None
			}
			Err(error) => {
				self.done = true;
				return Some(Err(error))
			}
		}

		let line = self.reader.read_line(false);
		self.done = line.is_err();
		Some(line)
	}
}

#[cfg(feature = "alloc")]
impl<R: BufReader> FusedIterator for Lines<R> { }

/// Returns an iterator over the lines of `bytes`, split at `\n`. The same lines
/// are produced as [`LineViews`] would from a reader over `bytes`.
pub fn line_views(bytes: &[u8], chomp: bool) -> SliceLines<'_> {
	SliceLines { bytes, chomp }
}

/// An iterator over the lines of a byte slice. See [`line_views`].
#[derive(Copy, Clone, Debug)]
pub struct SliceLines<'a> {
	bytes: &'a [u8],
	chomp: bool,
}

impl<'a> SliceLines<'a> {
	/// Returns the bytes not yet split into lines.
	pub fn remainder(&self) -> &'a [u8] { self.bytes }
}

impl<'a> Iterator for SliceLines<'a> {
	type Item = &'a [u8];

	fn next(&mut self) -> Option<&'a [u8]> {
		if self.bytes.is_empty() {
			return None
		}

		let len = find(b'\n', self.bytes).map_or(self.bytes.len(), |index| index + 1);
		let (line, rest) = self.bytes.split_at(len);
		self.bytes = rest;
		Some(if self.chomp { chomp(line) } else { line })
	}
}

impl FusedIterator for SliceLines<'_> { }

/// Strips a trailing `\n` or `\r\n`.
fn chomp(line: &[u8]) -> &[u8] {
	match line {
		[rest @ .., b'\r', b'\n'] |
		[rest @ .., b'\n'] => rest,
		_ => line
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn chomp_endings() {
		assert_eq!(chomp(b"a\r\n"), b"a");
		assert_eq!(chomp(b"a\n"), b"a");
		assert_eq!(chomp(b"a\r"), b"a\r");
		assert_eq!(chomp(b"\n"), b"");
		assert_eq!(chomp(b""), b"");
	}

	#[test]
	fn slice_lines() {
		let lines: Vec<_> = line_views(b"a\n\nb\n\nc", true).collect();
		assert_eq!(lines, [&b"a"[..], b"", b"b", b"", b"c"]);
		assert_eq!(line_views(b"", true).count(), 0);
		assert_eq!(line_views(b"\n", true).collect::<Vec<_>>(), [&b""[..]]);
	}

	#[test]
	fn slice_lines_mixed_endings() {
		let lines: Vec<_> = line_views(b"unix\nmac\rdos\r\nend", true).collect();
		assert_eq!(lines, [&b"unix"[..], b"mac\rdos", b"end"]);
		let lines: Vec<_> = line_views(b"unix\nmac\rdos\r\nend", false).collect();
		assert_eq!(lines, [&b"unix\n"[..], b"mac\rdos\r\n", b"end"]);
	}

	#[test]
	fn slice_lines_repeatable() {
		let lines = line_views(b"x\ny\n", false);
		assert_eq!(lines.count(), 2);
		assert_eq!(lines.count(), 2);
	}
}
