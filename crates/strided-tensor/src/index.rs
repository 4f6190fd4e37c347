//! Conversions between linear offsets and n-dimensional coordinates.
//!
//! Every tensor representation in this crate addresses its elements by a single
//! linear offset. The functions in this module translate between that offset and a
//! coordinate set, given a stride vector and the layout flag the strides were built
//! with. They hold no state and are shared by all storage variants.

use crate::tensor::TensorError;

/// Computes the total number of elements described by `dimensions`.
///
/// # Errors
///
/// Fails if `dimensions` is empty, if any dimension is zero, or if the product
/// overflows `usize`.
///
/// # Example
///
/// ```
/// use strided_tensor::index::element_count;
///
/// assert_eq!(element_count(&[2, 3, 4]).unwrap(), 24);
/// assert!(element_count(&[2, 0]).is_err());
/// assert!(element_count(&[]).is_err());
/// ```
pub fn element_count(dimensions: &[usize]) -> Result<usize, TensorError> {
    if dimensions.is_empty() {
        return Err(TensorError::EmptyShape);
    }
    let mut product: usize = 1;
    for (axis, &size) in dimensions.iter().enumerate() {
        if size == 0 {
            return Err(TensorError::NonPositiveDimension { axis, size });
        }
        product = product
            .checked_mul(size)
            .ok_or_else(|| TensorError::ElementCountOverflow(dimensions.to_vec()))?;
    }
    Ok(product)
}

/// Computes the strides for the given dimensions.
///
/// With `reverse_stride = false` (row-major) the last axis has stride 1 and strides
/// grow toward the first axis. With `reverse_stride = true` (column-major) the first
/// axis has stride 1 and strides grow toward the last axis.
///
/// The dimensions are expected to be validated already, see [`element_count`].
///
/// # Example
///
/// ```
/// use strided_tensor::index::compute_strides;
///
/// assert_eq!(compute_strides(&[2, 3, 4], false), vec![12, 4, 1]);
/// assert_eq!(compute_strides(&[2, 3, 4], true), vec![1, 2, 6]);
/// ```
pub fn compute_strides(dimensions: &[usize], reverse_stride: bool) -> Vec<usize> {
    let mut strides = vec![0; dimensions.len()];
    let mut stride = 1;
    if reverse_stride {
        for (s, &dim) in strides.iter_mut().zip(dimensions) {
            *s = stride;
            stride *= dim;
        }
    } else {
        for (s, &dim) in strides.iter_mut().zip(dimensions).rev() {
            *s = stride;
            stride *= dim;
        }
    }
    strides
}

/// Computes the linear offset of a coordinate set: the dot product of `indices`
/// and `strides`.
///
/// No bounds are checked here; see [`crate::shape::TensorShape::index_of`].
#[inline]
pub fn linear_index(strides: &[usize], indices: &[usize]) -> usize {
    strides
        .iter()
        .zip(indices)
        .fold(0, |acc, (&s, &i)| acc + s * i)
}

/// Axis visiting order for successive division: largest stride first.
#[inline]
fn axis_order(rank: usize, reverse_stride: bool) -> impl Iterator<Item = usize> {
    (0..rank).map(move |i| if reverse_stride { rank - 1 - i } else { i })
}

/// Recovers the coordinates of `index` into `out`.
///
/// `out` must have the same length as `strides`.
pub fn coordinates_into(strides: &[usize], reverse_stride: bool, index: usize, out: &mut [usize]) {
    let mut remainder = index;
    for axis in axis_order(strides.len(), reverse_stride) {
        let stride = strides[axis];
        out[axis] = remainder / stride;
        remainder %= stride;
    }
}

/// Recovers the coordinates of a linear offset.
///
/// This is the inverse of [`linear_index`] for strides produced by
/// [`compute_strides`] with the same `reverse_stride` flag.
///
/// # Example
///
/// ```
/// use strided_tensor::index::{compute_strides, coordinates, linear_index};
///
/// let strides = compute_strides(&[2, 3, 4], true);
/// let offset = linear_index(&strides, &[1, 2, 3]);
/// assert_eq!(coordinates(&strides, true, offset), vec![1, 2, 3]);
/// ```
pub fn coordinates(strides: &[usize], reverse_stride: bool, index: usize) -> Vec<usize> {
    let mut out = vec![0; strides.len()];
    coordinates_into(strides, reverse_stride, index, &mut out);
    out
}

/// Re-expresses a linear offset computed under `source_strides` in terms of
/// `target_strides`, without materializing the coordinate vector.
///
/// Used to walk two tensors of the same dimensions but different layout flags in
/// lockstep.
///
/// # Example
///
/// ```
/// use strided_tensor::index::{compute_strides, transform_index};
///
/// let row_major = compute_strides(&[2, 3], false);
/// let column_major = compute_strides(&[2, 3], true);
/// // coordinate (1, 2): row-major offset 5, column-major offset 5
/// // coordinate (0, 1): row-major offset 1, column-major offset 2
/// assert_eq!(transform_index(1, &row_major, false, &column_major), 2);
/// ```
pub fn transform_index(
    index: usize,
    source_strides: &[usize],
    source_reverse_stride: bool,
    target_strides: &[usize],
) -> usize {
    let mut transformed = 0;
    let mut remainder = index;
    for axis in axis_order(source_strides.len(), source_reverse_stride) {
        let stride = source_strides[axis];
        transformed += target_strides[axis] * (remainder / stride);
        remainder %= stride;
    }
    transformed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides_row_major() {
        assert_eq!(compute_strides(&[5], false), vec![1]);
        assert_eq!(compute_strides(&[2, 3], false), vec![3, 1]);
        assert_eq!(compute_strides(&[2, 1, 3], false), vec![3, 3, 1]);
    }

    #[test]
    fn test_strides_column_major() {
        assert_eq!(compute_strides(&[5], true), vec![1]);
        assert_eq!(compute_strides(&[2, 3], true), vec![1, 2]);
        assert_eq!(compute_strides(&[2, 1, 3], true), vec![1, 2, 2]);
    }

    #[test]
    fn test_element_count_errors() {
        assert_eq!(element_count(&[]), Err(TensorError::EmptyShape));
        assert_eq!(
            element_count(&[3, 0, 2]),
            Err(TensorError::NonPositiveDimension { axis: 1, size: 0 })
        );
        assert!(matches!(
            element_count(&[usize::MAX, 2]),
            Err(TensorError::ElementCountOverflow(_))
        ));
    }

    #[test]
    fn test_coordinates_with_unit_axes() {
        // unit axes produce repeated strides; the visiting order must still recover them
        let strides = compute_strides(&[3, 1], false);
        assert_eq!(strides, vec![1, 1]);
        assert_eq!(coordinates(&strides, false, 2), vec![2, 0]);

        let strides = compute_strides(&[1, 3], true);
        assert_eq!(strides, vec![1, 1]);
        assert_eq!(coordinates(&strides, true, 2), vec![0, 2]);
    }

    #[test]
    fn test_round_trip_all_offsets() -> Result<(), TensorError> {
        for dims in [vec![4], vec![2, 3], vec![3, 1, 2], vec![2, 2, 2, 3]] {
            let length = element_count(&dims)?;
            for reverse in [false, true] {
                let strides = compute_strides(&dims, reverse);
                for offset in 0..length {
                    let coords = coordinates(&strides, reverse, offset);
                    assert_eq!(linear_index(&strides, &coords), offset);
                    for (c, d) in coords.iter().zip(&dims) {
                        assert!(c < d);
                    }
                }
            }
        }
        Ok(())
    }

    #[test]
    fn test_transform_matches_coordinates() {
        let dims = [2, 3, 4];
        let row = compute_strides(&dims, false);
        let col = compute_strides(&dims, true);
        for offset in 0..24 {
            let coords = coordinates(&row, false, offset);
            assert_eq!(
                transform_index(offset, &row, false, &col),
                linear_index(&col, &coords)
            );
            // and back again
            let moved = transform_index(offset, &row, false, &col);
            assert_eq!(transform_index(moved, &col, true, &row), offset);
        }
    }
}
