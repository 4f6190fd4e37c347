use crate::index::{compute_strides, coordinates, element_count, linear_index};
use crate::tensor::TensorError;

/// The immutable shape of a tensor: dimensions, strides, layout flag and length.
///
/// A shape is validated once at construction and never changes afterwards.
/// Reshaping produces a new `TensorShape`.
///
/// # Example
///
/// ```
/// use strided_tensor::shape::TensorShape;
///
/// let shape = TensorShape::new(&[2, 3], false).unwrap();
/// assert_eq!(shape.strides(), &[3, 1]);
/// assert_eq!(shape.len(), 6);
/// assert_eq!(shape.index_of(&[1, 2]).unwrap(), 5);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TensorShape {
    dimensions: Vec<usize>,
    strides: Vec<usize>,
    reverse_stride: bool,
    length: usize,
}

impl TensorShape {
    /// Creates a new shape.
    ///
    /// # Arguments
    ///
    /// * `dimensions` - The size of every axis, at least one axis.
    /// * `reverse_stride` - `false` for row-major, `true` for column-major layout.
    ///
    /// # Errors
    ///
    /// Fails if the dimensions are empty, contain a zero, or overflow the element count.
    pub fn new(dimensions: &[usize], reverse_stride: bool) -> Result<Self, TensorError> {
        let length = element_count(dimensions)?;
        Ok(Self {
            dimensions: dimensions.to_vec(),
            strides: compute_strides(dimensions, reverse_stride),
            reverse_stride,
            length,
        })
    }

    /// Returns the size of every axis.
    #[inline]
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Returns the linear offset delta of every axis.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns true for column-major layout.
    #[inline]
    pub fn is_reversed_stride(&self) -> bool {
        self.reverse_stride
    }

    /// Returns the number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }

    /// Returns the total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// Always false: a valid shape has at least one element.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// The axis bucketed by compressed-sparse storage: axis 0 for row-major,
    /// the last axis for column-major.
    #[inline]
    pub fn compressed_dimension(&self) -> usize {
        if self.reverse_stride {
            self.rank() - 1
        } else {
            0
        }
    }

    /// Checks that a linear index lies in `[0, len)`.
    #[inline]
    pub fn check_index(&self, index: usize) -> Result<(), TensorError> {
        if index >= self.length {
            return Err(TensorError::index_out_of_bounds(index, self.length));
        }
        Ok(())
    }

    /// Converts a coordinate set into a linear index.
    ///
    /// # Errors
    ///
    /// Fails if the number of coordinates differs from the rank, or if any
    /// coordinate is outside its axis.
    pub fn index_of(&self, indices: &[usize]) -> Result<usize, TensorError> {
        if indices.len() != self.rank() {
            return Err(TensorError::RankMismatch {
                expected: self.rank(),
                actual: indices.len(),
            });
        }
        for (axis, (&index, &size)) in indices.iter().zip(&self.dimensions).enumerate() {
            if index >= size {
                return Err(TensorError::AxisOutOfBounds { axis, index, size });
            }
        }
        Ok(linear_index(&self.strides, indices))
    }

    /// Recovers the coordinates of a linear index.
    ///
    /// # Errors
    ///
    /// Fails if the index is out of range.
    pub fn coordinates(&self, index: usize) -> Result<Vec<usize>, TensorError> {
        self.check_index(index)?;
        Ok(coordinates(&self.strides, self.reverse_stride, index))
    }

    /// Builds a shape with new dimensions, the same element count and the same
    /// layout flag.
    ///
    /// # Errors
    ///
    /// Fails if the new dimensions are invalid or describe a different element count.
    pub fn reshaped(&self, dimensions: &[usize]) -> Result<Self, TensorError> {
        let shape = Self::new(dimensions, self.reverse_stride)?;
        if shape.length != self.length {
            return Err(TensorError::ReshapeSizeMismatch {
                current: self.length,
                requested: shape.length,
            });
        }
        Ok(shape)
    }

    /// Checks that `dimensions` matches this shape, axis by axis.
    ///
    /// # Errors
    ///
    /// [`TensorError::RankMismatch`] if the ranks differ, otherwise
    /// [`TensorError::DimensionMismatch`] naming the first differing axis.
    pub fn ensure_same_dimensions(&self, dimensions: &[usize]) -> Result<(), TensorError> {
        if dimensions.len() != self.rank() {
            return Err(TensorError::RankMismatch {
                expected: self.rank(),
                actual: dimensions.len(),
            });
        }
        if let Some(axis) = (0..self.rank()).find(|&a| self.dimensions[a] != dimensions[a]) {
            return Err(TensorError::dimension_mismatch(
                format!("dimension {axis} differs"),
                &self.dimensions,
                dimensions,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_properties() -> Result<(), TensorError> {
        let shape = TensorShape::new(&[2, 3, 4], true)?;
        assert_eq!(shape.rank(), 3);
        assert_eq!(shape.len(), 24);
        assert!(!shape.is_empty());
        assert!(shape.is_reversed_stride());
        assert_eq!(shape.strides(), &[1, 2, 6]);
        assert_eq!(shape.compressed_dimension(), 2);
        assert_eq!(TensorShape::new(&[2, 3], false)?.compressed_dimension(), 0);
        Ok(())
    }

    #[test]
    fn test_index_of_checks_rank_and_axes() -> Result<(), TensorError> {
        let shape = TensorShape::new(&[2, 3], false)?;
        assert_eq!(shape.index_of(&[1, 1])?, 4);
        assert_eq!(
            shape.index_of(&[1]),
            Err(TensorError::RankMismatch {
                expected: 2,
                actual: 1
            })
        );
        assert_eq!(
            shape.index_of(&[0, 3]),
            Err(TensorError::AxisOutOfBounds {
                axis: 1,
                index: 3,
                size: 3
            })
        );
        Ok(())
    }

    #[test]
    fn test_reshaped_requires_same_length() -> Result<(), TensorError> {
        let shape = TensorShape::new(&[2, 3], true)?;
        let reshaped = shape.reshaped(&[3, 2])?;
        assert!(reshaped.is_reversed_stride());
        assert_eq!(reshaped.strides(), &[1, 3]);
        assert_eq!(
            shape.reshaped(&[4, 2]),
            Err(TensorError::ReshapeSizeMismatch {
                current: 6,
                requested: 8
            })
        );
        Ok(())
    }

    #[test]
    fn test_same_dimensions() -> Result<(), TensorError> {
        let shape = TensorShape::new(&[2, 3], false)?;
        assert!(shape.ensure_same_dimensions(&[2, 3]).is_ok());
        assert!(matches!(
            shape.ensure_same_dimensions(&[2, 3, 1]),
            Err(TensorError::RankMismatch { .. })
        ));
        assert!(matches!(
            shape.ensure_same_dimensions(&[2, 4]),
            Err(TensorError::DimensionMismatch { .. })
        ));
        Ok(())
    }
}
