use crate::binary_stream::BitPattern;
use crate::error::Error;
use crate::huffman::Symbol;

/// Largest magnitude category that fits the four bits of a combined
/// run/size symbol.
const MAX_CATEGORY: u8 = 15;
const MAX_ZERO_RUN: u8 = 15;

/// A value split into its magnitude category and the category-many low
/// bits identifying it within the category. Negative values are stored as
/// `value - 1` truncated to the category width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategoryEncodedInteger {
    category: u8,
    pattern: u16,
}

impl CategoryEncodedInteger {
    pub const ZERO: CategoryEncodedInteger = CategoryEncodedInteger {
        category: 0,
        pattern: 0,
    };

    pub fn category(&self) -> u8 {
        self.category
    }

    pub fn pattern(&self) -> u16 {
        self.pattern
    }

    fn get_category_of(value: i32) -> u8 {
        (u32::BITS - value.unsigned_abs().leading_zeros()) as u8
    }

    fn calculate_pattern_of(value: i32, category: u8) -> u16 {
        let mask = (1_i32 << category) - 1;
        let pattern = if value < 0 { value - 1 } else { value };
        (pattern & mask) as u16
    }
}

impl TryFrom<i32> for CategoryEncodedInteger {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        let category = Self::get_category_of(value);
        if category > MAX_CATEGORY {
            return Err(Error::MagnitudeOutOfRange(value));
        }
        Ok(CategoryEncodedInteger {
            category,
            pattern: Self::calculate_pattern_of(value, category),
        })
    }
}

impl BitPattern for CategoryEncodedInteger {
    fn bit_pattern(&self) -> u32 {
        self.pattern as u32
    }

    fn bit_length(&self) -> u8 {
        self.category
    }
}

/// One AC token: the number of zero coefficients preceding `value`. The
/// pair `(0, 0)` marks the end of the block, `(15, 0)` a run of sixteen
/// zeros.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunLengthSymbol {
    pub run_length: u8,
    pub value: i16,
}

impl RunLengthSymbol {
    pub const END_OF_BLOCK: RunLengthSymbol = RunLengthSymbol::new(0, 0);
    pub const ZERO_RUN: RunLengthSymbol = RunLengthSymbol::new(MAX_ZERO_RUN, 0);

    pub const fn new(run_length: u8, value: i16) -> Self {
        Self { run_length, value }
    }

    /// Splits the token into its huffman symbol, `run << 4 | category`,
    /// and the magnitude bits following the code word.
    pub fn categorize(&self) -> Result<(Symbol, CategoryEncodedInteger), Error> {
        let magnitude = CategoryEncodedInteger::try_from(self.value as i32)?;
        Ok(((self.run_length << 4) | magnitude.category(), magnitude))
    }
}

/// A quantized block in the form handed to the entropy coder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SerializedBlock {
    pub dc: i16,
    pub ac: Vec<RunLengthSymbol>,
}

/// Run-length encodes the 63 AC coefficients of a zig-zag ordered block.
/// Trailing zeros collapse into an end of block token, so the token is
/// omitted when the last coefficient is non-zero.
pub fn run_length_encode(zig_zag: &[i16; 64]) -> SerializedBlock {
    let mut ac: Vec<RunLengthSymbol> = Vec::new();
    let mut zeros_encountered: u8 = 0;
    for &value in &zig_zag[1..] {
        if value == 0 {
            zeros_encountered += 1;
            continue;
        }
        while zeros_encountered > MAX_ZERO_RUN {
            ac.push(RunLengthSymbol::ZERO_RUN);
            zeros_encountered -= MAX_ZERO_RUN + 1;
        }
        ac.push(RunLengthSymbol::new(zeros_encountered, value));
        zeros_encountered = 0;
    }
    if zeros_encountered != 0 {
        ac.push(RunLengthSymbol::END_OF_BLOCK);
    }
    SerializedBlock { dc: zig_zag[0], ac }
}

/// Inverse of [`run_length_encode`].
pub fn expand(block: &SerializedBlock) -> [i16; 64] {
    let mut sequence = [0_i16; 64];
    sequence[0] = block.dc;
    let mut position = 1;
    for symbol in block.ac.iter() {
        if *symbol == RunLengthSymbol::END_OF_BLOCK {
            break;
        }
        if *symbol == RunLengthSymbol::ZERO_RUN {
            position += MAX_ZERO_RUN as usize + 1;
            continue;
        }
        position += symbol.run_length as usize;
        if let Some(slot) = sequence.get_mut(position) {
            *slot = symbol.value;
        }
        position += 1;
    }
    sequence
}
