// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#[cfg(feature = "alloc")]
use alloc::boxed::Box;
#[cfg(feature = "alloc")]
use alloc::vec::Vec;
use crate::{BufReader, BufSeek, BufWriter, Fill, Result, Until};

// Forwards overridable methods too, so specialized implementations (such as a
// StreamWriter bypassing its buffer) are kept behind a reference or box.
macro_rules! delegate_impl {
    (with $reduced:expr;
	$(
	fn $name:ident($($params:tt)+)$( -> $ret:ty)?;
	)+) => {
		$(fn $name($($params)+)$( -> $ret)? {
			delegate_impl!(@$reduced;$name($($params)+))
		})+
	};
	(@$reduced:expr;$name:ident(&$(mut)? self$(, $param:ident: $param_ty:ty)*)) => {
		$reduced.$name($($param),*)
	};
}

macro_rules! impl_reader {
    ($($(#[$attr:meta])? impl<$gen:ident> for $ty:ty;)+) => {
		$(
		$(#[$attr])?
		impl<$gen: BufReader + ?Sized> BufReader for $ty {
			delegate_impl! {
				with **self;
				fn get_buffer(&self) -> &[u8];
				fn fill_buffer(&mut self) -> Result<Fill>;
				fn consume(&mut self, count: usize) -> Result;
				fn close(&mut self) -> Result;
				fn get_nonempty_buffer(&mut self) -> Result<Option<&[u8]>>;
				fn peek(&mut self) -> Result<u8>;
				fn read_u8(&mut self) -> Result<u8>;
				fn read_bool(&mut self) -> Result<bool>;
				fn skip(&mut self, count: usize) -> Result<usize>;
				fn skip_exact(&mut self, count: usize) -> Result;
				fn buffer_until(&mut self, delimiter: u8) -> Result<Until>;
			}

			fn read_bytes<'a>(&mut self, buf: &'a mut [u8]) -> Result<&'a [u8]> {
				(**self).read_bytes(buf)
			}

			fn read_exact_bytes<'a>(&mut self, buf: &'a mut [u8]) -> Result<&'a [u8]> {
				(**self).read_exact_bytes(buf)
			}

			#[cfg(feature = "alloc")]
			fn read_count(&mut self, count: usize) -> Result<Vec<u8>> {
				(**self).read_count(count)
			}

			#[cfg(feature = "alloc")]
			fn read_all(&mut self) -> Result<Vec<u8>> {
				(**self).read_all()
			}

			#[cfg(feature = "alloc")]
			fn read_to_end(&mut self, buf: &mut Vec<u8>) -> Result<usize> {
				(**self).read_to_end(buf)
			}
		})+
	};
}

impl_reader! {
	impl<R> for &mut R;
	#[cfg(feature = "alloc")]
	impl<R> for Box<R>;
}

macro_rules! impl_writer {
    ($($(#[$attr:meta])? impl<$gen:ident> for $ty:ty;)+) => {
		$(
		$(#[$attr])?
		impl<$gen: BufWriter + ?Sized> BufWriter for $ty {
			delegate_impl! {
				with **self;
				fn get_buffer(&mut self) -> &mut [u8];
				fn grow_buffer(&mut self) -> Result<usize>;
				fn consume(&mut self, count: usize) -> Result;
				fn flush(&mut self) -> Result;
				fn close(&mut self) -> Result;
				fn get_nonempty_buffer(&mut self, min_size: usize) -> Result<Option<&mut [u8]>>;
				fn write_bytes(&mut self, buf: &[u8]) -> Result<usize>;
				fn write_all(&mut self, buf: &[u8]) -> Result;
				fn write_repeated(&mut self, byte: u8, count: usize) -> Result<usize>;
				fn write_u8(&mut self, value: u8) -> Result;
				fn write_bool(&mut self, value: bool) -> Result;
				fn write_utf8(&mut self, value: &str) -> Result;
			}
		})+
	};
}

impl_writer! {
	impl<W> for &mut W;
	#[cfg(feature = "alloc")]
	impl<W> for Box<W>;
}

macro_rules! impl_seek {
    ($($(#[$attr:meta])? impl<$gen:ident> for $ty:ty;)+) => {
		$(
		$(#[$attr])?
		impl<$gen: BufSeek + ?Sized> BufSeek for $ty {
			delegate_impl! {
				with **self;
				fn seek(&mut self, offset: u64) -> Result;
				fn position(&mut self) -> Result<u64>;
				fn filesize(&mut self) -> Result<u64>;
				fn seek_start(&mut self) -> Result;
				fn seek_end(&mut self) -> Result;
			}
		})+
	};
}

impl_seek! {
	impl<S> for &mut S;
	#[cfg(feature = "alloc")]
	impl<S> for Box<S>;
}

#[cfg(test)]
mod tests {
	use crate::{CursorReader, VecWriter};
	use super::*;

	fn copy_first_line(mut reader: impl BufReader, mut sink: impl BufWriter) -> Result<usize> {
		reader.copy_line(&mut sink, true)
	}

	#[test]
	fn forwards_through_references() -> Result {
		let mut reader = CursorReader::new(&b"ab\ncd"[..]);
		let mut writer = VecWriter::new();
		assert_eq!(copy_first_line(&mut reader, Box::new(&mut writer))?, 3);
		assert_eq!(reader.get_buffer(), b"cd");
		assert_eq!(writer.written(), b"ab\n");
		Ok(())
	}
}
