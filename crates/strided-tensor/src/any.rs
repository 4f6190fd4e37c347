use crate::{
    compressed::CompressedSparseTensor,
    dense::DenseTensor,
    element::Element,
    shape::TensorShape,
    sparse::SparseTensor,
    tensor::{Tensor, TensorError},
};

/// Selects one of the tensor representations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TensorKind {
    /// [`DenseTensor`]
    Dense,
    /// [`SparseTensor`]
    Sparse,
    /// [`CompressedSparseTensor`]
    CompressedSparse,
}

impl std::fmt::Display for TensorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Dense => write!(f, "dense"),
            Self::Sparse => write!(f, "sparse"),
            Self::CompressedSparse => write!(f, "compressed-sparse"),
        }
    }
}

impl std::str::FromStr for TensorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dense" => Ok(Self::Dense),
            "sparse" => Ok(Self::Sparse),
            "compressed" | "compressed-sparse" => Ok(Self::CompressedSparse),
            other => Err(format!(
                "unknown tensor kind '{other}', expected dense, sparse or compressed"
            )),
        }
    }
}

/// A tensor of any representation, chosen at runtime.
///
/// # Example
///
/// ```
/// use strided_tensor::{AnyTensor, Tensor, TensorKind};
///
/// let mut t = AnyTensor::<i32>::new(TensorKind::Sparse, &[2, 2], false).unwrap();
/// t.set(&[0, 1], 3).unwrap();
/// let t = t.convert(TensorKind::CompressedSparse);
/// assert_eq!(t.kind(), TensorKind::CompressedSparse);
/// assert_eq!(t.to_vec(), vec![0, 3, 0, 0]);
/// ```
#[derive(Clone, Debug)]
pub enum AnyTensor<T> {
    /// Contiguous storage.
    Dense(DenseTensor<T>),
    /// Index to value map.
    Sparse(SparseTensor<T>),
    /// Compressed buckets.
    CompressedSparse(CompressedSparseTensor<T>),
}

macro_rules! dispatch {
    ($self:expr, $t:ident => $body:expr) => {
        match $self {
            AnyTensor::Dense($t) => $body,
            AnyTensor::Sparse($t) => $body,
            AnyTensor::CompressedSparse($t) => $body,
        }
    };
}

impl<T: Element> AnyTensor<T> {
    /// Creates an all-zero tensor of the given kind.
    pub fn new(
        kind: TensorKind,
        dimensions: &[usize],
        reverse_stride: bool,
    ) -> Result<Self, TensorError> {
        Ok(match kind {
            TensorKind::Dense => Self::Dense(DenseTensor::new(dimensions, reverse_stride)?),
            TensorKind::Sparse => Self::Sparse(SparseTensor::new(dimensions, reverse_stride)?),
            TensorKind::CompressedSparse => {
                Self::CompressedSparse(CompressedSparseTensor::new(dimensions, reverse_stride)?)
            }
        })
    }

    /// Returns the representation of the tensor.
    pub fn kind(&self) -> TensorKind {
        match self {
            Self::Dense(_) => TensorKind::Dense,
            Self::Sparse(_) => TensorKind::Sparse,
            Self::CompressedSparse(_) => TensorKind::CompressedSparse,
        }
    }

    /// Converts into the given representation, returning `self` if it already is one.
    pub fn convert(self, kind: TensorKind) -> Self {
        if self.kind() == kind {
            return self;
        }
        match kind {
            TensorKind::Dense => Self::Dense(self.to_dense()),
            TensorKind::Sparse => Self::Sparse(self.to_sparse()),
            TensorKind::CompressedSparse => Self::CompressedSparse(self.to_compressed_sparse()),
        }
    }
}

impl<T: Element> Tensor<T> for AnyTensor<T> {
    type Like<U: Element> = AnyTensor<U>;

    fn shape(&self) -> &TensorShape {
        dispatch!(self, t => t.shape())
    }

    fn get_value(&self, index: usize) -> Result<T, TensorError> {
        dispatch!(self, t => t.get_value(index))
    }

    fn set_value(&mut self, index: usize, value: T) -> Result<(), TensorError> {
        dispatch!(self, t => t.set_value(index, value))
    }

    fn fill(&mut self, value: T) {
        dispatch!(self, t => t.fill(value))
    }

    fn clone_empty_as<U: Element>(&self, dimensions: &[usize]) -> Result<AnyTensor<U>, TensorError> {
        Ok(match self {
            Self::Dense(t) => AnyTensor::Dense(t.clone_empty_as(dimensions)?),
            Self::Sparse(t) => AnyTensor::Sparse(t.clone_empty_as(dimensions)?),
            Self::CompressedSparse(t) => AnyTensor::CompressedSparse(t.clone_empty_as(dimensions)?),
        })
    }

    fn reshape(&self, dimensions: &[usize]) -> Result<Self, TensorError> {
        Ok(match self {
            Self::Dense(t) => Self::Dense(t.reshape(dimensions)?),
            Self::Sparse(t) => Self::Sparse(t.reshape(dimensions)?),
            Self::CompressedSparse(t) => Self::CompressedSparse(t.reshape(dimensions)?),
        })
    }

    fn non_zero_count(&self) -> usize {
        dispatch!(self, t => t.non_zero_count())
    }

    fn to_vec(&self) -> Vec<T> {
        dispatch!(self, t => t.to_vec())
    }

    fn to_dense(&self) -> DenseTensor<T> {
        dispatch!(self, t => t.to_dense())
    }

    fn to_sparse(&self) -> SparseTensor<T> {
        dispatch!(self, t => t.to_sparse())
    }

    fn to_compressed_sparse(&self) -> CompressedSparseTensor<T> {
        dispatch!(self, t => t.to_compressed_sparse())
    }
}

impl<T> From<DenseTensor<T>> for AnyTensor<T> {
    fn from(tensor: DenseTensor<T>) -> Self {
        Self::Dense(tensor)
    }
}

impl<T> From<SparseTensor<T>> for AnyTensor<T> {
    fn from(tensor: SparseTensor<T>) -> Self {
        Self::Sparse(tensor)
    }
}

impl<T> From<CompressedSparseTensor<T>> for AnyTensor<T> {
    fn from(tensor: CompressedSparseTensor<T>) -> Self {
        Self::CompressedSparse(tensor)
    }
}
