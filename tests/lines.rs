// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

#![cfg(feature = "alloc")]

use proptest::prelude::*;
use rstest::rstest;
use buffer_streams::{line_views, BufReader, CursorReader, ErrorKind, Result, StreamReader};

fn bounded(data: &[u8], capacity: usize) -> StreamReader<&[u8]> {
	StreamReader::builder(data)
		.capacity(capacity)
		.max_capacity(capacity)
		.build()
		.unwrap()
}

fn collect_views(mut reader: impl BufReader, chomp: bool) -> Result<Vec<Vec<u8>>> {
	let mut views = reader.line_views(chomp);
	let mut lines = Vec::new();
	while let Some(line) = views.next_line() {
		lines.push(line?.to_vec());
	}
	Ok(lines)
}

#[rstest]
#[case(b"a\n\nb\n\nc", &["a", "", "b", "", "c"])]
#[case(b"", &[])]
#[case(b"\n", &[""])]
#[case(b"one\n", &["one"])]
#[case(b"unix\nmac\rdos\r\nend", &["unix", "mac\rdos", "end"])]
#[case(b"\r\n\r\n", &["", ""])]
fn chomped_lines(#[case] input: &[u8], #[case] expected: &[&str]) -> Result {
	let expected: Vec<Vec<u8>> = expected.iter().map(|line| line.as_bytes().to_vec()).collect();
	assert_eq!(collect_views(CursorReader::new(input), true)?, expected);
	assert_eq!(line_views(input, true).map(<[u8]>::to_vec).collect::<Vec<_>>(), expected);
	for capacity in [1, 2, 3, 64] {
		let reader = StreamReader::with_capacity(capacity, input)?;
		assert_eq!(collect_views(reader, true)?, expected);
		let reader = StreamReader::with_capacity(capacity, input)?;
		assert_eq!(reader.lines().collect::<Result<Vec<_>>>()?, expected);
	}
	Ok(())
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(5)]
fn unchomped_lines_keep_endings(#[case] capacity: usize) -> Result {
	let reader = StreamReader::with_capacity(capacity, &b"a\r\nbc\nd"[..])?;
	assert_eq!(collect_views(reader, false)?, [b"a\r\n".to_vec(), b"bc\n".to_vec(), b"d".to_vec()]);
	Ok(())
}

#[rstest]
#[case(4, b"abc\nde\n")]
#[case(3, b"ab\ncd\ne")]
#[case(1, b"\n\n\n")]
#[case(3, b"ab\n")]
#[case(3, b"ab\ncde")]
#[case(1, b"a")]
#[case(5, b"abc\r\nwxyz")]
fn bounded_lines_fit(#[case] capacity: usize, #[case] input: &[u8]) -> Result {
	let expected: Vec<_> = line_views(input, false).map(<[u8]>::to_vec).collect();
	assert_eq!(collect_views(bounded(input, capacity), false)?, expected);
	Ok(())
}

#[rstest]
#[case(3, b"abc\n")]
#[case(4, b"ab\ncdefg\n")]
#[case(1, b"a\n")]
fn bounded_line_too_long(#[case] capacity: usize, #[case] input: &[u8]) {
	let mut reader = bounded(input, capacity);
	let mut views = reader.line_views(true);
	let error = loop {
		match views.next_line() {
			Some(Ok(_)) => { }
			Some(Err(error)) => break error,
			None => panic!("line longer than the buffer was not rejected")
		}
	};
	assert_eq!(error.kind(), Some(ErrorKind::BufferTooShort));
}

#[test]
fn finish_consumes_last_line() -> Result {
	let mut reader = CursorReader::new(b"first\r\nsecond\n".to_vec());
	let mut views = reader.line_views(true);
	assert_eq!(views.next_line().unwrap()?, b"first");
	let reader = views.finish()?;
	assert_eq!(reader.get_buffer(), b"second\n");
	assert_eq!(reader.offset(), 7);
	Ok(())
}

#[test]
fn lines_into_inner() -> Result {
	let mut lines = CursorReader::new(b"a\nb\nc").lines();
	assert_eq!(lines.next().transpose()?, Some(b"a".to_vec()));
	let reader = lines.into_inner();
	assert_eq!(reader.get_buffer(), b"b\nc");
	Ok(())
}

proptest! {
	#[test]
	fn reader_lines_match_slice_lines(
		input in prop::collection::vec(prop::sample::select(vec![b'a', b'b', b'\r', b'\n']), 0..200),
		capacity in 1usize..16,
		chomp in any::<bool>(),
	) {
		let expected: Vec<_> = line_views(&input, chomp).map(<[u8]>::to_vec).collect();
		let reader = StreamReader::with_capacity(capacity, input.as_slice()).unwrap();
		prop_assert_eq!(collect_views(reader, chomp).unwrap(), expected);
	}

	#[test]
	fn copy_line_matches_slice_lines(
		input in prop::collection::vec(prop::sample::select(vec![b'x', b'\r', b'\n']), 0..200),
		capacity in 2usize..16,
	) {
		// Line endings split across fills are still stripped.
		let expected: Vec<_> = line_views(&input, true).map(<[u8]>::to_vec).collect();
		let mut reader = bounded(&input, capacity);
		let mut lines = Vec::new();
		while reader.get_nonempty_buffer().unwrap().is_some() {
			lines.push(reader.read_line(false).unwrap());
		}
		prop_assert_eq!(lines, expected);
	}
}
