// Copyright 2024 - Strixpyrr
// SPDX-License-Identifier: Apache-2.0

/// The smallest capacity a growing buffer is reallocated to.
const MIN_ALLOCATION: usize = 8;

/// Returns the capacity to reallocate a buffer of `size` bytes to. Small buffers
/// grow faster than linearly (by `4 * size^(7/8)`), large buffers by about one
/// eighth of their size. The result is always larger than `size`, unless `size`
/// is already at the limit of `usize`.
pub fn overallocation(size: usize) -> usize {
	if size < MIN_ALLOCATION {
		return MIN_ALLOCATION
	}

	let bits = usize::BITS - size.leading_zeros();
	let superlinear = 1usize.checked_shl(bits * 7 / 8)
							.map_or(usize::MAX, |n| n.saturating_mul(4));
	size.saturating_add(superlinear)
		.saturating_add(size / 8)
}

/// Returns the new capacity for a buffer of `size` bytes which must hold at least
/// `required` bytes, limited to `limit`.
pub(crate) fn grown_capacity(size: usize, required: usize, limit: usize) -> usize {
	overallocation(size).max(required).min(limit)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn small_sizes_round_up() {
		assert_eq!(overallocation(0), 8);
		assert_eq!(overallocation(1), 8);
		assert_eq!(overallocation(7), 8);
	}

	#[test]
	fn always_grows() {
		let mut size = 1;
		for _ in 0..64 {
			let next = overallocation(size);
			assert!(next > size, "{next} <= {size}");
			size = next;
			if size > usize::MAX / 2 { break }
		}
	}

	#[cfg(target_pointer_width = "64")]
	#[test]
	fn large_sizes_grow_linearly() {
		let size = 1 << 60;
		let next = overallocation(size);
		// At most ~12.5% plus the shrinking superlinear term.
		assert!(next - size >= size / 8);
		assert!(next - size < size / 4);
	}

	#[test]
	fn saturates() {
		assert_eq!(overallocation(usize::MAX), usize::MAX);
	}

	#[test]
	fn grown_capacity_limits() {
		assert_eq!(grown_capacity(16, 1000, usize::MAX), 1000);
		assert_eq!(grown_capacity(16, 17, 20), 20);
	}
}
