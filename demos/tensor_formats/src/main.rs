use argh::FromArgs;
use strided_tensor::{AnyTensor, DenseTensor, DisplayOptions, Tensor, TensorKind};
use strided_tensor_ops::create_from_diagonal;

/// Builds a tensor, converts it between storage formats and prints its diagonal
/// and triangles
#[derive(Debug, FromArgs)]
struct Args {
    /// comma separated dimensions, at least two axes
    #[argh(option, short = 'd', default = "Dims(vec![4, 4])")]
    dims: Dims,

    /// storage format: dense, sparse or compressed
    #[argh(option, short = 'f', default = "TensorKind::CompressedSparse")]
    format: TensorKind,

    /// use column-major layout
    #[argh(switch, short = 'c')]
    column_major: bool,

    /// print without whitespace
    #[argh(switch)]
    compact: bool,

    /// diagonal offset
    #[argh(option, short = 'o', default = "0")]
    offset: isize,
}

/// A comma separated dimension list such as `3,4`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Dims(Vec<usize>);

impl std::str::FromStr for Dims {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .split(',')
            .map(|d| {
                d.trim()
                    .parse::<usize>()
                    .map_err(|e| format!("invalid dimension '{d}': {e}"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Args = argh::from_env();

    let options = DisplayOptions::default().with_whitespace(!args.compact);

    // every third element is zero so the sparse formats have something to elide
    let dense = DenseTensor::from_shape_fn(&args.dims.0, args.column_major, |c| {
        let flat = c.iter().fold(0, |acc, &i| acc * 10 + i as i64);
        if flat % 3 == 0 {
            0
        } else {
            flat
        }
    })?;
    let tensor = AnyTensor::from(dense).convert(args.format);
    log::info!(
        "built {} tensor {:?} with {} of {} elements stored",
        tensor.kind(),
        tensor.dimensions(),
        tensor.non_zero_count(),
        tensor.len()
    );

    println!("tensor:\n{}", tensor.to_array_string(&options));

    let diagonal = tensor.get_diagonal(args.offset)?;
    println!(
        "diagonal at offset {}:\n{}",
        args.offset,
        diagonal.to_array_string(&options)
    );
    println!(
        "lower triangle:\n{}",
        tensor.get_lower_triangle(args.offset)?.to_array_string(&options)
    );
    println!(
        "upper triangle:\n{}",
        tensor.get_upper_triangle(args.offset)?.to_array_string(&options)
    );

    let rebuilt = create_from_diagonal(&diagonal, args.offset)?;
    println!(
        "rebuilt from diagonal:\n{}",
        rebuilt.to_array_string(&options)
    );

    for kind in [
        TensorKind::Dense,
        TensorKind::Sparse,
        TensorKind::CompressedSparse,
    ] {
        let converted = tensor.clone().convert(kind);
        println!(
            "{kind}: {} non-zero, equal: {}",
            converted.non_zero_count(),
            converted.structural_eq(&tensor)?
        );
    }

    Ok(())
}
