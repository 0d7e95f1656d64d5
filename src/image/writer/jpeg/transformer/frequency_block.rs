pub const ZIG_ZAG_ORDERED_BLOCK_INDEXES: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// An 8x8 block in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyBlock<T> {
    data: [T; 64],
}

impl<T> FrequencyBlock<T> {
    pub fn new(data: [T; 64]) -> Self {
        Self { data }
    }

    #[cfg(test)]
    pub fn data(&self) -> &[T; 64] {
        &self.data
    }
}

impl<T: Copy> FrequencyBlock<T> {
    pub fn to_zig_zag(&self) -> [T; 64] {
        ZIG_ZAG_ORDERED_BLOCK_INDEXES.map(|block_index| self.data[block_index])
    }

    /// Inverse of [`FrequencyBlock::to_zig_zag`].
    #[cfg(test)]
    pub fn from_zig_zag(sequence: &[T; 64]) -> Self {
        let mut data = *sequence;
        for (position, &block_index) in ZIG_ZAG_ORDERED_BLOCK_INDEXES.iter().enumerate() {
            data[block_index] = sequence[position];
        }
        Self { data }
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::{FrequencyBlock, ZIG_ZAG_ORDERED_BLOCK_INDEXES};

    #[rustfmt::skip]
    const TEST_BLOCK_DATA_1: [usize; 64] = [
         0,  1,  5,  6, 14, 15, 27, 28,
         2,  4,  7, 13, 16, 26, 29, 42,
         3,  8, 12, 17, 25, 30, 41, 43,
         9, 11, 18, 24, 31, 40, 44, 53,
        10, 19, 23, 32, 39, 45, 52, 54,
        20, 22, 33, 38, 46, 51, 55, 60,
        21, 34, 37, 47, 50, 56, 59, 61,
        35, 36, 48, 49, 57, 58, 62, 63,
    ];

    #[test]
    fn to_zig_zag_orders_by_frequency() {
        let block = FrequencyBlock::new(TEST_BLOCK_DATA_1);
        let expected: Vec<usize> = (0..64).collect();
        assert_eq!(block.to_zig_zag().to_vec(), expected);
    }

    #[test]
    fn zig_zag_indexes_are_a_permutation() {
        let mut sorted = ZIG_ZAG_ORDERED_BLOCK_INDEXES;
        sorted.sort_unstable();
        for (index, &value) in sorted.iter().enumerate() {
            assert_eq!(index, value, "Index {} missing in zig zag order", index);
        }
    }

    proptest! {
        #[test]
        fn from_zig_zag_restores_block(values in proptest::collection::vec(any::<i16>(), 64)) {
            let mut data = [0_i16; 64];
            data.copy_from_slice(&values);
            let block = FrequencyBlock::new(data);
            prop_assert_eq!(FrequencyBlock::from_zig_zag(&block.to_zig_zag()), block);
        }
    }
}
