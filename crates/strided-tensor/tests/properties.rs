use approx::assert_relative_eq;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use strided_tensor::{
    index::{compute_strides, coordinates, element_count, linear_index, transform_index},
    AnyTensor, CompressedSparseTensor, DenseTensor, SparseTensor, Tensor, TensorError, TensorKind,
};

const KINDS: [TensorKind; 3] = [
    TensorKind::Dense,
    TensorKind::Sparse,
    TensorKind::CompressedSparse,
];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn random_dims(rng: &mut StdRng) -> Vec<usize> {
    let rank = rng.random_range(1..=4);
    (0..rank).map(|_| rng.random_range(1..=5)).collect()
}

/// Builds a tensor of the given kind with roughly a third of its elements non-zero.
fn random_tensor(
    rng: &mut StdRng,
    kind: TensorKind,
    dims: &[usize],
    reverse_stride: bool,
) -> Result<AnyTensor<i32>, TensorError> {
    let mut t = AnyTensor::new(kind, dims, reverse_stride)?;
    for i in 0..t.len() {
        if rng.random_range(0..3) == 0 {
            t.set_value(i, rng.random_range(-50..=50))?;
        }
    }
    Ok(t)
}

#[test]
fn index_round_trip() -> Result<(), TensorError> {
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..50 {
        let dims = random_dims(&mut rng);
        let length = element_count(&dims)?;
        for reverse in [false, true] {
            let strides = compute_strides(&dims, reverse);
            let other = compute_strides(&dims, !reverse);
            for index in 0..length {
                let coords = coordinates(&strides, reverse, index);
                assert_eq!(linear_index(&strides, &coords), index);
                assert_eq!(
                    transform_index(index, &strides, reverse, &other),
                    linear_index(&other, &coords)
                );
            }
        }
    }
    Ok(())
}

#[test]
fn conversion_round_trip() -> Result<(), TensorError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(2);
    for _ in 0..20 {
        let dims = random_dims(&mut rng);
        for kind in KINDS {
            for reverse in [false, true] {
                let t = random_tensor(&mut rng, kind, &dims, reverse)?;
                let expected = t.to_dense();
                for target in KINDS {
                    let converted = t.clone().convert(target);
                    assert_eq!(converted.kind(), target);
                    assert_eq!(converted.is_reversed_stride(), reverse);
                    assert_eq!(converted.non_zero_count(), t.non_zero_count());
                    assert!(converted.to_dense().structural_eq(&expected)?);
                    assert_eq!(converted.to_dense().as_slice(), expected.as_slice());
                }
            }
        }
    }
    Ok(())
}

#[test]
fn zero_elision() -> Result<(), TensorError> {
    let mut rng = StdRng::seed_from_u64(3);
    for reverse in [false, true] {
        let mut sparse = SparseTensor::<i64>::new(&[6, 7], reverse)?;
        let mut compressed = CompressedSparseTensor::<i64>::new(&[6, 7], reverse)?;
        // same linear writes under the other layout address other coordinates
        let mut flipped = CompressedSparseTensor::<i64>::new(&[6, 7], !reverse)?;
        for _ in 0..200 {
            let index = rng.random_range(0..42);
            let value = if rng.random_bool(0.4) {
                0
            } else {
                rng.random_range(1..100)
            };
            sparse.set_value(index, value)?;
            compressed.set_value(index, value)?;
            flipped.set_value(index, value)?;
            if value == 0 {
                assert_eq!(sparse.get_value(index)?, 0);
                assert_eq!(compressed.get_value(index)?, 0);
            }
            assert!(sparse.entries().iter().all(|(_, v)| **v != 0));
            assert!(compressed.entries().all(|(_, v)| *v != 0));
            assert_eq!(sparse.non_zero_count(), compressed.non_zero_count());
        }
        assert!(sparse.structural_eq(&compressed)?);
        assert_eq!(flipped.to_vec(), sparse.to_vec());
        assert_eq!(flipped.non_zero_count(), sparse.non_zero_count());
    }
    Ok(())
}

#[test]
fn main_diagonal_of_three_by_three() -> Result<(), TensorError> {
    let dense = DenseTensor::from_shape_vec(&[3, 3], (1..=9).collect(), false)?;
    for kind in KINDS {
        let t = AnyTensor::from(dense.clone()).convert(kind);
        let diagonal = t.get_diagonal(0)?;
        assert_eq!(diagonal.kind(), kind);
        assert_eq!(diagonal.to_vec(), vec![1, 5, 9]);
    }
    Ok(())
}

#[test]
fn reshape_preserves_linear_content() -> Result<(), TensorError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(4);
    for kind in KINDS {
        for reverse in [false, true] {
            let t = random_tensor(&mut rng, kind, &[4, 3, 2], reverse)?;
            for dims in [vec![24], vec![2, 12], vec![6, 2, 2], vec![1, 24, 1]] {
                let r = t.reshape(&dims)?;
                assert_eq!(r.dimensions(), dims.as_slice());
                assert_eq!(r.kind(), kind);
                for i in 0..t.len() {
                    assert_eq!(r.get_value(i)?, t.get_value(i)?);
                }
            }
            assert!(matches!(
                t.reshape(&[5, 5]),
                Err(TensorError::ReshapeSizeMismatch { .. })
            ));
        }
    }
    Ok(())
}

#[test]
fn compressed_insertion_order_independence() -> Result<(), TensorError> {
    let mut rng = StdRng::seed_from_u64(5);
    for reverse in [false, true] {
        let mut entries: Vec<(usize, i32)> = Vec::new();
        for i in 0..60 {
            if rng.random_bool(0.5) {
                entries.push((i, rng.random_range(1..1000)));
            }
        }
        let mut reference = CompressedSparseTensor::new(&[3, 4, 5], reverse)?;
        for &(i, v) in &entries {
            reference.set_value(i, v)?;
        }

        for _ in 0..5 {
            entries.shuffle(&mut rng);
            let mut t = CompressedSparseTensor::new(&[3, 4, 5], reverse)?;
            for &(i, v) in &entries {
                // a transient value that is overwritten and removed again
                t.set_value(i, v + 1)?;
                t.set_value(i, 0)?;
                t.set_value(i, v)?;
            }
            assert_eq!(t.non_zero_count(), reference.non_zero_count());
            assert_eq!(t.compressed_counts(), reference.compressed_counts());
            assert_eq!(
                &t.indices()[..t.non_zero_count()],
                &reference.indices()[..reference.non_zero_count()]
            );
            for bucket in t.compressed_counts().windows(2) {
                let indices = &t.indices()[bucket[0]..bucket[1]];
                assert!(indices.windows(2).all(|w| w[0] < w[1]));
            }
            assert!(t.structural_eq(&reference)?);
        }
    }
    Ok(())
}

#[test]
fn capacity_growth_keeps_entries() -> Result<(), TensorError> {
    init_logger();
    let mut rng = StdRng::seed_from_u64(6);
    let mut indices: Vec<usize> = (0..400).collect();
    indices.shuffle(&mut rng);

    let mut t = CompressedSparseTensor::<u16>::with_capacity(&[20, 20], 1, false)?;
    let mut expected = SparseTensor::<u16>::new(&[20, 20], false)?;
    let mut capacity = t.capacity();
    for (n, &i) in indices.iter().enumerate() {
        let value = i as u16 + 1;
        t.set_value(i, value)?;
        expected.set_value(i, value)?;
        if t.capacity() != capacity {
            assert!(t.capacity() > capacity);
            assert!(t.capacity() <= 400);
            capacity = t.capacity();
            // the buffers just grew, every stored entry must still be in place
            assert!(t.structural_eq(&expected)?);
        }
        assert_eq!(t.non_zero_count(), n + 1);
    }
    assert_eq!(t.capacity(), 400);
    assert!(t.structural_eq(&expected)?);
    Ok(())
}

#[test]
fn float_round_trip_through_ndarray() -> Result<(), TensorError> {
    let mut rng = StdRng::seed_from_u64(8);
    let dense = DenseTensor::from_shape_fn(&[3, 4], true, |_| {
        if rng.random_bool(0.5) {
            rng.random_range(-1.0..1.0)
        } else {
            0.0
        }
    })?;
    let array = dense.to_ndarray()?;
    for kind in KINDS {
        let t = AnyTensor::from(dense.clone()).convert(kind);
        assert!(t.structural_eq_array(&array)?);
        let back = t.to_ndarray()?;
        for (a, b) in back.iter().zip(array.iter()) {
            assert_relative_eq!(*a, *b);
        }
    }
    let sum: f64 = dense.iter().sum();
    assert_relative_eq!(sum, array.sum(), epsilon = 1e-12);
    Ok(())
}
