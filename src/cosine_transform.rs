use clap::{builder::PossibleValue, ValueEnum};

use self::{
    separated::SeparatedDiscrete8x8CosineTransformer, simple::SimpleDiscrete8x8CosineTransformer,
};

pub mod separated;
pub mod simple;

pub const SQUARE_SIZE: usize = 8;
pub const NUMBER_OF_VALUES: usize = SQUARE_SIZE * SQUARE_SIZE;

/// Two dimensional DCT-II of a row-major 8x8 block. The output holds the
/// horizontal frequency in the column and the vertical frequency in the
/// row, so index 0 is the DC coefficient.
pub trait Discrete8x8CosineTransformer {
    fn transform(&self, values: &[f32; NUMBER_OF_VALUES]) -> [f32; NUMBER_OF_VALUES];
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DctAlgorithm {
    /// direct evaluation of the double sum
    Simple,
    /// row and column passes with a precomputed basis matrix
    #[default]
    Separated,
}

impl ValueEnum for DctAlgorithm {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Separated, Self::Simple]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Simple => Some(PossibleValue::new("Simple")),
            Self::Separated => Some(PossibleValue::new("Separated")),
        }
    }
}

impl Discrete8x8CosineTransformer for DctAlgorithm {
    fn transform(&self, values: &[f32; NUMBER_OF_VALUES]) -> [f32; NUMBER_OF_VALUES] {
        match self {
            Self::Simple => SimpleDiscrete8x8CosineTransformer.transform(values),
            Self::Separated => SeparatedDiscrete8x8CosineTransformer.transform(values),
        }
    }
}
