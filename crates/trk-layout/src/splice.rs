//! Copy-on-write splicing of point buffers.
//!
//! Every helper leaves its input untouched and returns a new `Vec`.
//! Out-of-range positions are tolerated rather than reported.

/// Copy of `items` with `value` at `index`, clamped into `0..=len`.
pub fn insert<T: Clone>(items: &[T], index: isize, value: T) -> Vec<T> {
    let index = index.clamp(0, items.len() as isize) as usize;
    let mut result = Vec::with_capacity(items.len() + 1);
    result.extend_from_slice(&items[..index]);
    result.push(value);
    result.extend_from_slice(&items[index..]);
    result
}

/// Copy of `items` without the element at `index`; an unchanged copy when
/// `index` is out of range.
pub fn remove_at<T: Clone>(items: &[T], index: isize) -> Vec<T> {
    let mut result = items.to_vec();
    if index >= 0 && (index as usize) < items.len() {
        result.remove(index as usize);
    }
    result
}

/// Copy of `items` truncated or padded with `T::default()` to `new_len`.
/// A non-positive length yields an empty buffer.
pub fn resize<T: Clone + Default>(items: &[T], new_len: isize) -> Vec<T> {
    if new_len <= 0 {
        return Vec::new();
    }
    let mut result = items.to_vec();
    result.resize(new_len as usize, T::default());
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_clamps_position() {
        assert_eq!(insert(&[1, 2, 3], 1, 9), vec![1, 9, 2, 3]);
        assert_eq!(insert(&[1, 2, 3], -4, 9), vec![9, 1, 2, 3]);
        assert_eq!(insert(&[1, 2, 3], 3, 9), vec![1, 2, 3, 9]);
        assert_eq!(insert(&[1, 2, 3], 17, 9), vec![1, 2, 3, 9]);
        assert_eq!(insert(&[], 5, 9), vec![9]);
    }

    #[test]
    fn test_remove_at_out_of_range_is_copy() {
        assert_eq!(remove_at(&[1, 2, 3], 0), vec![2, 3]);
        assert_eq!(remove_at(&[1, 2, 3], 2), vec![1, 2]);
        assert_eq!(remove_at(&[1, 2, 3], 3), vec![1, 2, 3]);
        assert_eq!(remove_at(&[1, 2, 3], -1), vec![1, 2, 3]);
        assert!(remove_at::<i32>(&[], 0).is_empty());
    }

    #[test]
    fn test_resize() {
        assert_eq!(resize(&[1, 2, 3], 2), vec![1, 2]);
        assert_eq!(resize(&[1, 2], 4), vec![1, 2, 0, 0]);
        assert_eq!(resize(&[1, 2], 2), vec![1, 2]);
        assert!(resize(&[1, 2], 0).is_empty());
        assert!(resize(&[1, 2], -3).is_empty());
        assert_eq!(resize::<u8>(&[], 2), vec![0, 0]);
    }
}
