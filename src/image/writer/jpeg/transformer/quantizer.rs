use super::frequency_block::FrequencyBlock;
use crate::image::writer::jpeg::quantization_tables::QuantizationTable;

/// Divides each coefficient by its table entry, rounding half away from
/// zero.
pub fn quantize(coefficients: &[f32; 64], table: &QuantizationTable) -> FrequencyBlock<i16> {
    let mut quantized = [0_i16; 64];
    for ((value, &coefficient), &divisor) in quantized
        .iter_mut()
        .zip(coefficients)
        .zip(table.values())
    {
        *value = (coefficient / divisor as f32).round() as i16;
    }
    FrequencyBlock::new(quantized)
}

#[cfg(test)]
mod test {
    use super::quantize;
    use crate::image::writer::jpeg::quantization_tables::{
        Quality, QuantizationTable, LUMINANCE_BASE_TABLE,
    };

    #[test]
    fn round_half_away_from_zero() {
        let table = QuantizationTable::scaled(&[2; 64], Quality::try_from(50).unwrap());
        let mut coefficients = [0_f32; 64];
        coefficients[0] = 3.0;
        coefficients[1] = -3.0;
        coefficients[2] = 2.9;
        coefficients[3] = -0.9;
        coefficients[4] = 0.9;
        let quantized = quantize(&coefficients, &table);
        assert_eq!(&quantized.data()[..6], &[2, -2, 1, 0, 0, 0]);
    }

    #[test]
    fn divide_by_matching_table_entry() {
        let table = QuantizationTable::scaled(&LUMINANCE_BASE_TABLE, Quality::try_from(50).unwrap());
        let mut coefficients = [0_f32; 64];
        coefficients[0] = -415.4;
        coefficients[1] = -30.2;
        coefficients[8] = 4.5;
        coefficients[63] = 150.0;
        let quantized = quantize(&coefficients, &table);
        assert_eq!(quantized.data()[0], -26);
        assert_eq!(quantized.data()[1], -3);
        assert_eq!(quantized.data()[8], 0);
        assert_eq!(quantized.data()[63], 2);
    }
}
