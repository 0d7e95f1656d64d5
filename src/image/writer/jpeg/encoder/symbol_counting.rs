use super::entropy_coder::SymbolSink;
use crate::huffman::table::NUMBER_OF_SYMBOLS;
use crate::huffman::Symbol;
use crate::image::writer::jpeg::transformer::categorize::CategoryEncodedInteger;
use crate::image::writer::jpeg::TableKind;
use crate::Result;

/// Symbol frequencies per huffman table, gathered by running the entropy
/// coder without writing any bits.
pub struct SymbolCounter {
    symbol_frequencies: [[usize; NUMBER_OF_SYMBOLS]; 4],
}

impl SymbolCounter {
    pub fn new() -> Self {
        Self {
            symbol_frequencies: [[0; NUMBER_OF_SYMBOLS]; 4],
        }
    }

    pub fn frequencies(&self) -> &[[usize; NUMBER_OF_SYMBOLS]; 4] {
        &self.symbol_frequencies
    }
}

impl Default for SymbolCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolSink for SymbolCounter {
    fn put(&mut self, table: TableKind, symbol: Symbol, _: &CategoryEncodedInteger) -> Result<()> {
        self.symbol_frequencies[table.index()][symbol as usize] += 1;
        Ok(())
    }
}
