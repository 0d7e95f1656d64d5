use std::iter;

use super::length_limited::LengthLimitedHuffmanCodeGenerator;
use super::{HuffmanCodeGenerator, Symbol, SymbolCodeLength, SymbolFrequency};
use crate::binary_stream::BitPattern;
use crate::error::Error;
use crate::Result;

pub const MAX_CODE_LENGTH: usize = 16;
pub const NUMBER_OF_SYMBOLS: usize = Symbol::MAX as usize + 1;

/// Frequency-derived codes are limited to one bit less than the maximum,
/// the spare bit moves the least frequent symbol away from the all ones
/// code word.
const GENERATED_CODE_LENGTH_LIMIT: usize = MAX_CODE_LENGTH - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeWord {
    bit_pattern: u16,
    length: u8,
}

impl CodeWord {
    pub fn new(bit_pattern: u16, length: u8) -> Self {
        Self {
            bit_pattern,
            length,
        }
    }
}

impl BitPattern for CodeWord {
    fn bit_pattern(&self) -> u32 {
        self.bit_pattern as u32
    }

    fn bit_length(&self) -> u8 {
        self.length
    }
}

/// A canonical huffman table together with its lookup from symbol to code
/// word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTable {
    code_length_counts: [u8; MAX_CODE_LENGTH],
    symbols: Vec<Symbol>,
    code_words: [Option<CodeWord>; NUMBER_OF_SYMBOLS],
}

impl HuffmanTable {
    /// Builds the canonical code for the given counts of code words per
    /// length (BITS) and the symbols ordered by code length (HUFFVAL).
    pub fn from_bits_and_values(bits: &[u8; MAX_CODE_LENGTH], values: &[Symbol]) -> Result<Self> {
        let number_of_codes: usize = bits.iter().map(|&count| count as usize).sum();
        if number_of_codes != values.len() {
            return Err(Error::InvalidHuffmanTable(
                "number of symbols does not match the code length counts",
            ));
        }
        if number_of_codes == 0 {
            return Err(Error::InvalidHuffmanTable("table contains no symbols"));
        }
        let lengths = bits
            .iter()
            .enumerate()
            .flat_map(|(index, &count)| iter::repeat(index as u8 + 1).take(count as usize));
        let mut code_words = [None; NUMBER_OF_SYMBOLS];
        let mut code: u32 = 0;
        let mut current_length = 1;
        for (length, &symbol) in lengths.zip(values) {
            code <<= length - current_length;
            current_length = length;
            if code >= 1_u32 << length {
                return Err(Error::InvalidHuffmanTable("code space exhausted"));
            }
            let entry = &mut code_words[symbol as usize];
            if entry.is_some() {
                return Err(Error::InvalidHuffmanTable("symbol occurs twice"));
            }
            *entry = Some(CodeWord::new(code as u16, length));
            code += 1;
        }
        Ok(Self {
            code_length_counts: *bits,
            symbols: values.to_vec(),
            code_words,
        })
    }

    /// Builds the canonical code for arbitrary code lengths. Symbols of
    /// equal length are ordered by value.
    pub fn from_code_lengths(code_lengths: &[SymbolCodeLength]) -> Result<Self> {
        let mut sorted = code_lengths.to_vec();
        sorted.sort_by_key(|code_length| (code_length.length, code_length.symbol));
        let mut bits = [0_u8; MAX_CODE_LENGTH];
        for code_length in sorted.iter() {
            if code_length.length == 0 || code_length.length > MAX_CODE_LENGTH {
                return Err(Error::InvalidHuffmanTable(
                    "code length must be within 1..=16",
                ));
            }
            bits[code_length.length - 1] += 1;
        }
        let values: Vec<Symbol> = sorted.iter().map(|code_length| code_length.symbol).collect();
        Self::from_bits_and_values(&bits, &values)
    }

    /// Derives a table from observed symbol frequencies. Symbols which were
    /// never observed get no code word.
    pub fn from_frequencies(frequencies: &[usize; NUMBER_OF_SYMBOLS]) -> Result<Self> {
        let mut sorted_frequencies: Vec<SymbolFrequency> = frequencies
            .iter()
            .enumerate()
            .filter(|(_, frequency)| **frequency > 0)
            .map(|(symbol, &frequency)| SymbolFrequency::from((symbol as Symbol, frequency)))
            .collect();
        if sorted_frequencies.is_empty() {
            return Err(Error::InvalidHuffmanTable("no symbol frequencies recorded"));
        }
        sorted_frequencies.sort_by_key(|sf| (sf.frequency, sf.symbol));
        let mut generator = LengthLimitedHuffmanCodeGenerator::new(GENERATED_CODE_LENGTH_LIMIT);
        let mut code_lengths = generator.generate_with_symbols(&sorted_frequencies);
        code_lengths[0].length += 1;
        Self::from_code_lengths(&code_lengths)
    }

    pub fn code_word(&self, symbol: Symbol) -> Option<CodeWord> {
        self.code_words[symbol as usize]
    }

    pub fn code_length_counts(&self) -> &[u8; MAX_CODE_LENGTH] {
        &self.code_length_counts
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}
