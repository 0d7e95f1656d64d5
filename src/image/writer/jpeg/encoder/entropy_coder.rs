use std::io::Write;

use super::symbol_counting::SymbolCounter;
use crate::binary_stream::BitWriter;
use crate::error::Error;
use crate::huffman::standard_tables::{
    CHROMINANCE_AC_BITS, CHROMINANCE_AC_VALUES, CHROMINANCE_DC_BITS, CHROMINANCE_DC_VALUES,
    LUMINANCE_AC_BITS, LUMINANCE_AC_VALUES, LUMINANCE_DC_BITS, LUMINANCE_DC_VALUES,
};
use crate::huffman::table::HuffmanTable;
use crate::huffman::Symbol;
use crate::image::writer::jpeg::transformer::categorize::CategoryEncodedInteger;
use crate::image::writer::jpeg::transformer::EncodedBlock;
use crate::image::writer::jpeg::{Component, TableKind};
use crate::Result;

/// Receiver of the symbols produced by the entropy coder, together with
/// the magnitude bits that follow each code word.
pub trait SymbolSink {
    fn put(&mut self, table: TableKind, symbol: Symbol, magnitude: &CategoryEncodedInteger)
        -> Result<()>;
}

/// The four huffman tables of a scan, indexed by [`TableKind::index`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffmanTableSet {
    tables: [HuffmanTable; 4],
}

impl HuffmanTableSet {
    pub fn standard() -> Result<Self> {
        Ok(Self {
            tables: [
                HuffmanTable::from_bits_and_values(&LUMINANCE_DC_BITS, &LUMINANCE_DC_VALUES)?,
                HuffmanTable::from_bits_and_values(&LUMINANCE_AC_BITS, &LUMINANCE_AC_VALUES)?,
                HuffmanTable::from_bits_and_values(&CHROMINANCE_DC_BITS, &CHROMINANCE_DC_VALUES)?,
                HuffmanTable::from_bits_and_values(&CHROMINANCE_AC_BITS, &CHROMINANCE_AC_VALUES)?,
            ],
        })
    }

    /// Tables fitted to the symbols the blocks produce. The blocks are
    /// coded with fresh DC predictors, as they will be in the scan.
    pub fn from_blocks(blocks: &[EncodedBlock]) -> Result<Self> {
        let mut counter = SymbolCounter::new();
        let mut entropy_coder = EntropyCoder::new();
        for block in blocks {
            entropy_coder.encode_block(block, &mut counter)?;
        }
        let frequencies = counter.frequencies();
        Ok(Self {
            tables: [
                HuffmanTable::from_frequencies(&frequencies[TableKind::LumaDC.index()])?,
                HuffmanTable::from_frequencies(&frequencies[TableKind::LumaAC.index()])?,
                HuffmanTable::from_frequencies(&frequencies[TableKind::ChromaDC.index()])?,
                HuffmanTable::from_frequencies(&frequencies[TableKind::ChromaAC.index()])?,
            ],
        })
    }

    pub fn table(&self, kind: TableKind) -> &HuffmanTable {
        &self.tables[kind.index()]
    }
}

/// Differential DC coding and symbol generation for the blocks of a scan.
/// Each component keeps its own DC predictor.
#[derive(Debug, Default)]
pub struct EntropyCoder {
    predictors: [i16; 3],
}

impl EntropyCoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.predictors = [0; 3];
    }

    #[cfg(test)]
    pub fn predictor(&self, component: Component) -> i16 {
        self.predictors[component.index()]
    }

    pub fn encode_block(&mut self, block: &EncodedBlock, sink: &mut impl SymbolSink) -> Result<()> {
        let component = block.component;
        let predictor = &mut self.predictors[component.index()];
        let difference = block.block.dc as i32 - *predictor as i32;
        *predictor = block.block.dc;
        let magnitude = CategoryEncodedInteger::try_from(difference)?;
        sink.put(component.dc_table(), magnitude.category(), &magnitude)?;
        for run_length_symbol in block.block.ac.iter() {
            let (symbol, magnitude) = run_length_symbol.categorize()?;
            sink.put(component.ac_table(), symbol, &magnitude)?;
        }
        Ok(())
    }
}

/// Writes the code word of each symbol followed by its magnitude bits.
pub struct HuffmanWriter<'a, 'b, W: Write> {
    bit_writer: &'a mut BitWriter<'b, W>,
    tables: &'a HuffmanTableSet,
}

impl<'a, 'b, W: Write> HuffmanWriter<'a, 'b, W> {
    pub fn new(bit_writer: &'a mut BitWriter<'b, W>, tables: &'a HuffmanTableSet) -> Self {
        Self { bit_writer, tables }
    }
}

impl<W: Write> SymbolSink for HuffmanWriter<'_, '_, W> {
    fn put(
        &mut self,
        table: TableKind,
        symbol: Symbol,
        magnitude: &CategoryEncodedInteger,
    ) -> Result<()> {
        let code_word =
            self.tables
                .table(table)
                .code_word(symbol)
                .ok_or(Error::HuffmanSymbolNotPresent {
                    symbol,
                    table: table.name(),
                })?;
        self.bit_writer
            .write_bit_pattern(&code_word)
            .and_then(|_| self.bit_writer.write_bit_pattern(magnitude))
            .map_err(|e| Error::from_buffer_error(e, Error::FailedToWriteImageData))
    }
}
