use num_traits::NumCast;
use strided_tensor::{index::coordinates_into, DenseTensor, Element, HasOne, Tensor};

use crate::error::TensorOpsError;

/// Creates a row-major `size x size` identity tensor.
///
/// # Arguments
///
/// * `size` - The size of both axes.
///
/// # Errors
///
/// Fails if `size` is zero.
///
/// # Example
///
/// ```
/// use strided_tensor::Tensor;
/// use strided_tensor_ops::create_identity;
///
/// let eye = create_identity::<f32>(3).unwrap();
/// assert_eq!(eye.get(&[1, 1]).unwrap(), 1.0);
/// assert_eq!(eye.non_zero_count(), 3);
/// ```
pub fn create_identity<T: HasOne>(size: usize) -> Result<DenseTensor<T>, TensorOpsError> {
    create_identity_with(size, false, T::one())
}

/// Creates a `size x size` identity tensor with an explicit layout and one value.
///
/// # Arguments
///
/// * `size` - The size of both axes.
/// * `column_major` - The layout flag of the result.
/// * `one` - The value placed on the main diagonal.
///
/// # Errors
///
/// Fails if `size` is zero.
pub fn create_identity_with<T: Element>(
    size: usize,
    column_major: bool,
    one: T,
) -> Result<DenseTensor<T>, TensorOpsError> {
    let mut identity = DenseTensor::new(&[size, size], column_major)?;
    // the main diagonal sits at stride size + 1 under either layout
    for i in 0..size {
        identity.set_value(i * (size + 1), one.clone())?;
    }
    Ok(identity)
}

/// Creates a tensor whose diagonal at `offset` is `diagonal`.
///
/// The first axis of `diagonal` runs along the new diagonal. The result has one more
/// axis than `diagonal`: two square leading axes of size `len + |offset|`,
/// followed by the remaining axes of `diagonal`. The result has the representation
/// and layout flag of `diagonal`.
///
/// # Errors
///
/// Fails if the square side overflows.
///
/// # Example
///
/// ```
/// use strided_tensor::{SparseTensor, Tensor};
/// use strided_tensor_ops::create_from_diagonal;
///
/// let mut d = SparseTensor::<i32>::new(&[2], false).unwrap();
/// d.set(&[0], 4).unwrap();
/// d.set(&[1], 5).unwrap();
///
/// let t = create_from_diagonal(&d, 1).unwrap();
/// assert_eq!(t.dimensions(), &[3, 3]);
/// assert_eq!(t.to_vec(), vec![0, 4, 0, 0, 0, 5, 0, 0, 0]);
/// assert_eq!(t.get_diagonal(1).unwrap().to_vec(), d.to_vec());
/// ```
pub fn create_from_diagonal<T, X>(
    diagonal: &X,
    offset: isize,
) -> Result<X::Like<T>, TensorOpsError>
where
    T: Element,
    X: Tensor<T>,
{
    let dims = diagonal.dimensions();
    let length = dims[0];
    let side = length
        .checked_add(offset.unsigned_abs())
        .ok_or(TensorOpsError::OffsetOverflow { length, offset })?;

    let mut out_dims = Vec::with_capacity(dims.len() + 1);
    out_dims.extend_from_slice(&[side, side]);
    out_dims.extend_from_slice(&dims[1..]);
    let mut result = diagonal.clone_empty_with(&out_dims)?;

    let row_shift = offset.min(0).unsigned_abs();
    let column_shift = offset.max(0).unsigned_abs();
    let mut coords = vec![0; dims.len()];
    let mut target = vec![0; out_dims.len()];
    for index in 0..diagonal.len() {
        let value = diagonal.get_value(index)?;
        if value.is_zero() {
            continue;
        }
        coordinates_into(
            diagonal.strides(),
            diagonal.is_reversed_stride(),
            index,
            &mut coords,
        );
        target[0] = coords[0] + row_shift;
        target[1] = coords[0] + column_shift;
        target[2..].copy_from_slice(&coords[1..]);
        result.set(&target, value)?;
    }
    log::trace!(
        "built {:?} tensor from diagonal {:?} at offset {offset}",
        out_dims,
        dims
    );
    Ok(result)
}

/// Applies `f` to every element, producing a tensor of the same representation,
/// shape and layout flag.
///
/// # Example
///
/// ```
/// use strided_tensor::{CompressedSparseTensor, Tensor};
/// use strided_tensor_ops::map;
///
/// let mut t = CompressedSparseTensor::<u8>::new(&[2, 2], false).unwrap();
/// t.set(&[1, 0], 3).unwrap();
/// let m = map(&t, |v: u8| f64::from(v) * 0.5).unwrap();
/// assert_eq!(m.to_vec(), vec![0.0, 0.0, 1.5, 0.0]);
/// assert_eq!(m.non_zero_count(), 1);
/// ```
pub fn map<T, U, X, F>(tensor: &X, mut f: F) -> Result<X::Like<U>, TensorOpsError>
where
    T: Element,
    U: Element,
    X: Tensor<T>,
    F: FnMut(T) -> U,
{
    let mut mapped = tensor.clone_empty_as::<U>(tensor.dimensions())?;
    for (index, value) in tensor.iter().enumerate() {
        let value = f(value);
        if !value.is_zero() {
            mapped.set_value(index, value)?;
        }
    }
    Ok(mapped)
}

/// Converts every element to another numeric type.
///
/// # Errors
///
/// Fails with [`TensorOpsError::CastFailed`] at the first element the target type
/// cannot represent.
pub fn cast<T, U, X>(tensor: &X) -> Result<X::Like<U>, TensorOpsError>
where
    T: Element + NumCast,
    U: Element + NumCast,
    X: Tensor<T>,
{
    let mut cast = tensor.clone_empty_as::<U>(tensor.dimensions())?;
    for (index, value) in tensor.iter().enumerate() {
        if value.is_zero() {
            continue;
        }
        let value = <U as NumCast>::from(value).ok_or(TensorOpsError::CastFailed(index))?;
        cast.set_value(index, value)?;
    }
    Ok(cast)
}
