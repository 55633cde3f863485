// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#[cfg(feature = "alloc")]
use alloc::collections::TryReserveError;
#[cfg(feature = "utf8")]
pub use simdutf8::compat::Utf8Error as SimdUtf8Error;
use core::fmt::{Display, Formatter, Result as FmtResult};

/// A buffered stream error.
#[derive(Debug)]
#[non_exhaustive]
pub enum Error {
	/// A runtime IO condition.
	Io(ErrorKind),
	/// An IO error from the standard library with no matching [`ErrorKind`].
	#[cfg(feature = "std")]
	Std(std::io::Error),
	/// The caller passed an invalid argument, such as a zero buffer capacity. This
	/// signals a programming error rather than an IO condition.
	InvalidArgument(&'static str),
	/// Invalid UTF-8 bytes were encountered.
	#[cfg(feature = "utf8")]
	Utf8(Utf8Error),
	/// Error while attempting to reserve capacity.
	#[cfg(feature = "alloc")]
	Allocation(TryReserveError),
}

/// The closed set of runtime IO error kinds.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
	/// More bytes were consumed than the buffer holds.
	ConsumeBuffer,
	/// A seek target is outside `0..=filesize`.
	BadSeek,
	/// Premature end-of-stream.
	End,
	/// The buffer cannot grow enough to satisfy the operation.
	BufferTooShort,
	PermissionDenied,
	NotFound,
	BrokenPipe,
	AlreadyExists,
	NotADirectory,
	IsADirectory,
	DirectoryNotEmpty,
	InvalidFileName,
	/// The stream was used after closing.
	Closed,
}

impl Error {
	/// Creates a consume error.
	#[inline]
	pub const fn consume_buffer() -> Self { Self::Io(ErrorKind::ConsumeBuffer) }
	/// Creates a bad seek error.
	#[inline]
	pub const fn bad_seek() -> Self { Self::Io(ErrorKind::BadSeek) }
	/// Creates an end-of-stream error.
	#[inline]
	pub const fn end() -> Self { Self::Io(ErrorKind::End) }
	/// Creates a buffer-too-short error.
	#[inline]
	pub const fn buffer_too_short() -> Self { Self::Io(ErrorKind::BufferTooShort) }
	/// Creates a closed stream error.
	#[inline]
	pub const fn closed() -> Self { Self::Io(ErrorKind::Closed) }
	/// Creates an invalid argument error.
	#[inline]
	pub const fn invalid_argument(message: &'static str) -> Self {
		Self::InvalidArgument(message)
	}

	/// Returns the IO error kind, if this is an IO error of a known kind.
	pub const fn kind(&self) -> Option<ErrorKind> {
		match self {
			Self::Io(kind) => Some(*kind),
			_ => None
		}
	}

	/// Returns `true` if this is an end-of-stream error.
	pub const fn is_end(&self) -> bool {
		matches!(self, Self::Io(ErrorKind::End))
	}
}

impl ErrorKind {
	const fn description(self) -> &'static str {
		match self {
			Self::ConsumeBuffer => "consumed more bytes than are buffered",
			Self::BadSeek => "seek out of bounds",
			Self::End => "premature end-of-stream",
			Self::BufferTooShort => "buffer is too short and cannot grow",
			Self::PermissionDenied => "permission denied",
			Self::NotFound => "not found",
			Self::BrokenPipe => "broken pipe",
			Self::AlreadyExists => "already exists",
			Self::NotADirectory => "not a directory",
			Self::IsADirectory => "is a directory",
			Self::DirectoryNotEmpty => "directory not empty",
			Self::InvalidFileName => "invalid file name",
			Self::Closed => "stream is closed",
		}
	}
}

impl Display for ErrorKind {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		f.write_str(self.description())
	}
}

#[cfg(feature = "std")]
impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::Std(error) => Some(error),
			#[cfg(feature = "utf8")]
			Self::Utf8(error) => Some(error),
			#[cfg(feature = "alloc")]
			Self::Allocation(error) => Some(error),
			Self::Io(_) |
			Self::InvalidArgument(_) => None,
		}
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		match self {
			Self::Io(kind) => Display::fmt(kind, f),
			#[cfg(feature = "std")]
			Self::Std(error) => Display::fmt(error, f),
			Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
			#[cfg(feature = "utf8")]
			Self::Utf8(error) => Display::fmt(error, f),
			#[cfg(feature = "alloc")]
			Self::Allocation(error) => Display::fmt(error, f),
		}
	}
}

impl From<ErrorKind> for Error {
	#[inline]
	fn from(value: ErrorKind) -> Self {
		Self::Io(value)
	}
}

#[cfg(feature = "std")]
impl From<std::io::Error> for Error {
	fn from(value: std::io::Error) -> Self {
		use std::io::ErrorKind as Std;
		let kind = match value.kind() {
			Std::PermissionDenied => ErrorKind::PermissionDenied,
			Std::NotFound => ErrorKind::NotFound,
			Std::BrokenPipe => ErrorKind::BrokenPipe,
			Std::AlreadyExists => ErrorKind::AlreadyExists,
			Std::NotADirectory => ErrorKind::NotADirectory,
			Std::IsADirectory => ErrorKind::IsADirectory,
			Std::DirectoryNotEmpty => ErrorKind::DirectoryNotEmpty,
			Std::UnexpectedEof => ErrorKind::End,
			_ => return Self::Std(value)
		};
		Self::Io(kind)
	}
}

#[cfg(feature = "utf8")]
impl From<SimdUtf8Error> for Error {
	#[inline]
	fn from(value: SimdUtf8Error) -> Self {
		Self::Utf8(value.into())
	}
}

#[cfg(feature = "utf8")]
impl From<Utf8Error> for Error {
	#[inline]
	fn from(value: Utf8Error) -> Self {
		Self::Utf8(value)
	}
}

#[cfg(feature = "alloc")]
impl From<TryReserveError> for Error {
	#[inline]
	fn from(value: TryReserveError) -> Self {
		Self::Allocation(value)
	}
}

/// Invalid UTF-8 found while extracting a string.
#[cfg(feature = "utf8")]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Utf8Error {
	inner: SimdUtf8Error,
}

#[cfg(feature = "utf8")]
impl Utf8Error {
	/// Returns the index in the input to which valid UTF-8 was verified.
	#[inline]
	#[must_use]
	pub fn valid_up_to(&self) -> usize {
		self.inner.valid_up_to()
	}
	/// Returns the length, in range `1..=3`, of the invalid byte sequence, if any.
	/// If `None` is returned, the input ended in an incomplete character.
	#[inline]
	#[must_use]
	pub fn error_len(&self) -> Option<usize> {
		self.inner.error_len()
	}
}

#[cfg(all(feature = "std", feature = "utf8"))]
impl std::error::Error for Utf8Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		Some(&self.inner)
	}
}

#[cfg(feature = "utf8")]
impl Display for Utf8Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
		let valid_up_to = self.valid_up_to();
		match self.error_len() {
			Some(len) => write!(f, "invalid UTF-8 sequence of {len} bytes from index {valid_up_to}"),
			None => write!(f, "incomplete UTF-8 byte sequence from index {valid_up_to}")
		}
	}
}

#[cfg(feature = "utf8")]
impl From<SimdUtf8Error> for Utf8Error {
	#[inline]
	fn from(inner: SimdUtf8Error) -> Self {
		Self { inner }
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn kind_of_io_error() {
		assert_eq!(Error::bad_seek().kind(), Some(ErrorKind::BadSeek));
		assert_eq!(Error::invalid_argument("capacity").kind(), None);
		assert!(Error::end().is_end());
	}

	#[cfg(feature = "std")]
	#[test]
	fn std_error_mapping() {
		use std::io::{Error as IoError, ErrorKind as Std};

		assert_eq!(Error::from(IoError::from(Std::BrokenPipe)).kind(), Some(ErrorKind::BrokenPipe));
		assert_eq!(Error::from(IoError::from(Std::UnexpectedEof)).kind(), Some(ErrorKind::End));
		assert!(matches!(Error::from(IoError::from(Std::TimedOut)), Error::Std(_)));
	}

	#[cfg(feature = "std")]
	#[test]
	fn display() {
		use std::string::ToString;

		assert_eq!(Error::buffer_too_short().to_string(), "buffer is too short and cannot grow");
		assert_eq!(Error::invalid_argument("zero capacity").to_string(), "invalid argument: zero capacity");
	}
}
