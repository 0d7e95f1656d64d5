use std::sync::OnceLock;

use super::{Discrete8x8CosineTransformer, NUMBER_OF_VALUES, SQUARE_SIZE};

/// Computes `A * X * A^T` where `A` is the orthonormal DCT-II basis.
pub struct SeparatedDiscrete8x8CosineTransformer;

/// Row `i` holds basis function `i` sampled at the 8 positions.
fn basis_matrix() -> &'static [f32; NUMBER_OF_VALUES] {
    static BASIS: OnceLock<[f32; NUMBER_OF_VALUES]> = OnceLock::new();
    BASIS.get_or_init(|| {
        let mut basis = [0_f32; NUMBER_OF_VALUES];
        for (index, value) in basis.iter_mut().enumerate() {
            let frequency = index / SQUARE_SIZE;
            let position = index % SQUARE_SIZE;
            let scale = if frequency == 0 {
                (1.0 / SQUARE_SIZE as f64).sqrt()
            } else {
                (2.0 / SQUARE_SIZE as f64).sqrt()
            };
            let argument = ((2 * position + 1) * frequency) as f64 * std::f64::consts::PI
                / (2 * SQUARE_SIZE) as f64;
            *value = (scale * argument.cos()) as f32;
        }
        basis
    })
}

impl Discrete8x8CosineTransformer for SeparatedDiscrete8x8CosineTransformer {
    fn transform(&self, values: &[f32; NUMBER_OF_VALUES]) -> [f32; NUMBER_OF_VALUES] {
        let a = basis_matrix();
        let mut intermediate = [0_f32; NUMBER_OF_VALUES];
        for i in 0..SQUARE_SIZE {
            for j in 0..SQUARE_SIZE {
                intermediate[i * SQUARE_SIZE + j] = (0..SQUARE_SIZE)
                    .map(|k| a[i * SQUARE_SIZE + k] * values[k * SQUARE_SIZE + j])
                    .sum();
            }
        }
        let mut frequencies = [0_f32; NUMBER_OF_VALUES];
        for i in 0..SQUARE_SIZE {
            for j in 0..SQUARE_SIZE {
                frequencies[i * SQUARE_SIZE + j] = (0..SQUARE_SIZE)
                    .map(|k| intermediate[i * SQUARE_SIZE + k] * a[j * SQUARE_SIZE + k])
                    .sum();
            }
        }
        frequencies
    }
}
