//! Nested-brace rendering of tensor contents.
//!
//! ```
//! use strided_tensor::{DenseTensor, DisplayOptions, Tensor};
//!
//! let t = DenseTensor::from_shape_vec(&[2, 2], vec![1, 2, 3, 4], false).unwrap();
//! assert_eq!(t.to_string(), "{\n    {1,2},\n    {3,4}\n}");
//! assert_eq!(t.to_array_string(&DisplayOptions::compact()), "{{1,2},{3,4}}");
//! ```

use std::fmt::{self, Display};

use crate::{
    any::AnyTensor, compressed::CompressedSparseTensor, dense::DenseTensor, element::Element,
    index::linear_index, sparse::SparseTensor, tensor::Tensor,
};

/// Formatting options for [`Tensor::to_array_string`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Put every outer sibling on its own indented line.
    pub include_whitespace: bool,
    /// Indentation width per nesting level.
    pub spaces_per_indent: usize,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            include_whitespace: true,
            spaces_per_indent: 4,
        }
    }
}

impl DisplayOptions {
    /// Options producing a single line without any whitespace.
    pub fn compact() -> Self {
        Self {
            include_whitespace: false,
            ..Self::default()
        }
    }

    /// Sets whether whitespace is emitted.
    pub fn with_whitespace(mut self, include_whitespace: bool) -> Self {
        self.include_whitespace = include_whitespace;
        self
    }

    /// Sets the indentation width per nesting level.
    pub fn with_spaces_per_indent(mut self, spaces_per_indent: usize) -> Self {
        self.spaces_per_indent = spaces_per_indent;
        self
    }
}

pub(crate) fn array_string<T, X>(tensor: &X, options: &DisplayOptions) -> String
where
    T: Element + Display,
    X: Tensor<T>,
{
    let mut out = String::new();
    let values = tensor.to_vec();
    let mut coords = vec![0; tensor.rank()];
    write_axis(tensor, &values, options, 0, &mut coords, &mut out);
    out
}

fn write_axis<T, X>(
    tensor: &X,
    values: &[T],
    options: &DisplayOptions,
    axis: usize,
    coords: &mut [usize],
    out: &mut String,
) where
    T: Element + Display,
    X: Tensor<T>,
{
    let size = tensor.dimensions()[axis];
    let innermost = axis + 1 == coords.len();
    let indent = if options.include_whitespace {
        " ".repeat(options.spaces_per_indent * axis)
    } else {
        String::new()
    };

    out.push_str(&indent);
    out.push('{');
    if innermost {
        for i in 0..size {
            if i > 0 {
                out.push(',');
            }
            coords[axis] = i;
            // coordinates stay inside their axes, so the offset is within `values`
            out.push_str(&values[linear_index(tensor.strides(), coords)].to_string());
        }
    } else {
        if options.include_whitespace {
            out.push('\n');
        }
        for i in 0..size {
            coords[axis] = i;
            write_axis(tensor, values, options, axis + 1, coords, out);
            if i + 1 < size {
                out.push(',');
            }
            if options.include_whitespace {
                out.push('\n');
            }
        }
        out.push_str(&indent);
    }
    out.push('}');
}

impl<T: Element + Display> Display for DenseTensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_array_string(&DisplayOptions::default()))
    }
}

impl<T: Element + Display> Display for SparseTensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_array_string(&DisplayOptions::default()))
    }
}

impl<T: Element + Display> Display for CompressedSparseTensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_array_string(&DisplayOptions::default()))
    }
}

impl<T: Element + Display> Display for AnyTensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_array_string(&DisplayOptions::default()))
    }
}
