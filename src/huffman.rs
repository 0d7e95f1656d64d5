pub mod length_limited;
pub mod standard_tables;
pub mod table;

pub type Symbol = u8;

/// Code word lengths, one per entry of the frequencies handed to the
/// generator and in the same order.
pub type HuffmanCode = Vec<usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolFrequency {
    pub symbol: Symbol,
    pub frequency: usize,
}

impl From<(Symbol, usize)> for SymbolFrequency {
    fn from(value: (Symbol, usize)) -> Self {
        Self {
            symbol: value.0,
            frequency: value.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolCodeLength {
    pub symbol: Symbol,
    pub length: usize,
}

impl From<(Symbol, usize)> for SymbolCodeLength {
    fn from(value: (Symbol, usize)) -> Self {
        Self {
            symbol: value.0,
            length: value.1,
        }
    }
}

pub trait HuffmanCodeGenerator {
    /// Expects frequencies in ascending order.
    fn generate(&mut self, sorted_frequencies: &[usize]) -> HuffmanCode;

    fn generate_with_symbols(
        &mut self,
        sorted_frequencies: &[SymbolFrequency],
    ) -> Vec<SymbolCodeLength> {
        let frequencies: Vec<usize> = sorted_frequencies.iter().map(|f| f.frequency).collect();
        let code = self.generate(&frequencies);
        code.into_iter()
            .zip(sorted_frequencies)
            .map(|(length, sf)| SymbolCodeLength {
                symbol: sf.symbol,
                length,
            })
            .collect()
    }
}
