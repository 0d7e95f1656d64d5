use core::f32;

use super::{Discrete8x8CosineTransformer, NUMBER_OF_VALUES, SQUARE_SIZE};

fn calculate_cosine_argument(a: usize, b: usize) -> f32 {
    ((2 * a + 1) as f32 * b as f32 * f32::consts::PI) / (2 * SQUARE_SIZE) as f32
}

fn calculate_factor_c(value: usize) -> f32 {
    if value == 0 {
        return f32::consts::FRAC_1_SQRT_2;
    }
    1_f32
}

pub struct SimpleDiscrete8x8CosineTransformer;

impl SimpleDiscrete8x8CosineTransformer {
    fn calculate_normalization_factor(i: usize, j: usize) -> f32 {
        2_f32 / SQUARE_SIZE as f32 * calculate_factor_c(i) * calculate_factor_c(j)
    }

    fn calculate_value(i: usize, j: usize, input_values: &[f32; NUMBER_OF_VALUES]) -> f32 {
        Self::calculate_normalization_factor(i, j) * Self::sum_up_cosines(i, j, input_values)
    }

    fn sum_up_cosines(i: usize, j: usize, input_values: &[f32; NUMBER_OF_VALUES]) -> f32 {
        input_values
            .iter()
            .enumerate()
            .map(|(index, &input_value)| {
                let x = index % SQUARE_SIZE;
                let y = index / SQUARE_SIZE;
                input_value
                    * calculate_cosine_argument(x, i).cos()
                    * calculate_cosine_argument(y, j).cos()
            })
            .sum()
    }
}

impl Discrete8x8CosineTransformer for SimpleDiscrete8x8CosineTransformer {
    fn transform(&self, values: &[f32; NUMBER_OF_VALUES]) -> [f32; NUMBER_OF_VALUES] {
        let mut frequencies = [0_f32; NUMBER_OF_VALUES];
        for (index, frequency) in frequencies.iter_mut().enumerate() {
            let i = index % SQUARE_SIZE;
            let j = index / SQUARE_SIZE;
            *frequency = Self::calculate_value(i, j, values);
        }
        frequencies
    }
}

/// Inverse of [`SimpleDiscrete8x8CosineTransformer`], used to verify the
/// forward transforms.
#[cfg(test)]
pub struct InverseSimpleDiscrete8x8CosineTransformer;

#[cfg(test)]
impl InverseSimpleDiscrete8x8CosineTransformer {
    fn sum_up_inner_product(x: usize, y: usize, values: &[f32; NUMBER_OF_VALUES]) -> f32 {
        values
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                let i = index % SQUARE_SIZE;
                let j = index / SQUARE_SIZE;
                value
                    * calculate_factor_c(i)
                    * calculate_factor_c(j)
                    * calculate_cosine_argument(x, i).cos()
                    * calculate_cosine_argument(y, j).cos()
            })
            .sum()
    }
}

#[cfg(test)]
impl Discrete8x8CosineTransformer for InverseSimpleDiscrete8x8CosineTransformer {
    fn transform(&self, values: &[f32; NUMBER_OF_VALUES]) -> [f32; NUMBER_OF_VALUES] {
        let mut samples = [0_f32; NUMBER_OF_VALUES];
        for (index, sample) in samples.iter_mut().enumerate() {
            let x = index % SQUARE_SIZE;
            let y = index / SQUARE_SIZE;
            *sample = (2_f32 / SQUARE_SIZE as f32) * Self::sum_up_inner_product(x, y, values);
        }
        samples
    }
}

#[cfg(test)]
mod test {
    use super::super::test_support::{assert_eq_with_deviation, TEST_BLOCK};
    use super::super::Discrete8x8CosineTransformer;
    use super::{InverseSimpleDiscrete8x8CosineTransformer, SimpleDiscrete8x8CosineTransformer};

    #[test]
    fn test_transform_to_frequency_domain_and_back() {
        let frequencies = SimpleDiscrete8x8CosineTransformer.transform(&TEST_BLOCK);
        let colors = InverseSimpleDiscrete8x8CosineTransformer.transform(&frequencies);
        for (index, (actual, expected)) in colors.into_iter().zip(TEST_BLOCK).enumerate() {
            assert_eq_with_deviation(actual, expected, 1e-5, index);
        }
    }

    #[test]
    fn horizontal_ramp_has_no_vertical_frequencies() {
        let mut block = [0_f32; 64];
        for (index, value) in block.iter_mut().enumerate() {
            *value = (index % 8) as f32 * 10.0;
        }
        let frequencies = SimpleDiscrete8x8CosineTransformer.transform(&block);
        assert!(frequencies[1].abs() > 1.0, "first horizontal frequency expected");
        for (index, &value) in frequencies.iter().enumerate().skip(8) {
            assert_eq_with_deviation(value, 0.0, 1e-3, index);
        }
    }
}
