use std::io::Write;

use clap::{builder::PossibleValue, ValueEnum};

mod encoder;
pub mod quantization_tables;
mod segment_marker_injector;
mod session;
pub mod transformer;

pub use encoder::entropy_coder::HuffmanTableSet;
pub use quantization_tables::{Quality, QuantizationTable, QuantizationTablePair};
pub use session::{EncodeSummary, EncoderSession};

use crate::binary_stream::Padding;
use crate::cosine_transform::DctAlgorithm;
use crate::image::{Image, ImageWriter};
use crate::{Arguments, Result};

/// Color components of the frame in scan order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Luma,
    ChromaBlue,
    ChromaRed,
}

impl Component {
    pub const ALL: [Component; 3] = [Self::Luma, Self::ChromaBlue, Self::ChromaRed];

    /// Component id used in the frame and scan headers.
    pub fn identifier(&self) -> u8 {
        self.index() as u8 + 1
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Luma => 0,
            Self::ChromaBlue => 1,
            Self::ChromaRed => 2,
        }
    }

    pub fn quantization_table_id(&self) -> u8 {
        match self {
            Self::Luma => 0,
            Self::ChromaBlue | Self::ChromaRed => 1,
        }
    }

    pub fn dc_table(&self) -> TableKind {
        match self {
            Self::Luma => TableKind::LumaDC,
            Self::ChromaBlue | Self::ChromaRed => TableKind::ChromaDC,
        }
    }

    pub fn ac_table(&self) -> TableKind {
        match self {
            Self::Luma => TableKind::LumaAC,
            Self::ChromaBlue | Self::ChromaRed => TableKind::ChromaAC,
        }
    }
}

/// Huffman table slots. The value is the class and destination byte of
/// the DHT segment, class in the high nibble.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableKind {
    LumaDC = 0x00,
    LumaAC = 0x10,
    ChromaDC = 0x01,
    ChromaAC = 0x11,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        Self::LumaDC,
        Self::LumaAC,
        Self::ChromaDC,
        Self::ChromaAC,
    ];

    pub fn value(&self) -> u8 {
        *self as u8
    }

    pub fn index(&self) -> usize {
        match self {
            Self::LumaDC => 0,
            Self::LumaAC => 1,
            Self::ChromaDC => 2,
            Self::ChromaAC => 3,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::LumaDC => "luma dc",
            Self::LumaAC => "luma ac",
            Self::ChromaDC => "chroma dc",
            Self::ChromaAC => "chroma ac",
        }
    }
}

/// Source of the huffman tables written to the file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EntropyCoding {
    /// the typical tables of JPEG Annex K
    #[default]
    Fixed,
    /// tables derived from the symbol frequencies of the image
    Adaptive,
}

impl ValueEnum for EntropyCoding {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Fixed, Self::Adaptive]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Fixed => Some(PossibleValue::new("Fixed").alias("Standard")),
            Self::Adaptive => Some(PossibleValue::new("Adaptive").alias("Optimized")),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncoderOptions {
    pub quality: Quality,
    pub entropy_coding: EntropyCoding,
    pub dct_algorithm: DctAlgorithm,
    pub padding: Padding,
    pub number_of_threads: usize,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            quality: Quality::DEFAULT,
            entropy_coding: EntropyCoding::default(),
            dct_algorithm: DctAlgorithm::default(),
            padding: Padding::default(),
            number_of_threads: 1,
        }
    }
}

impl From<&Arguments> for EncoderOptions {
    fn from(value: &Arguments) -> Self {
        Self {
            quality: Quality::or_default(value.quality),
            entropy_coding: value.entropy_coding,
            dct_algorithm: value.dct_algorithm,
            padding: value.padding,
            number_of_threads: value.number_of_threads,
        }
    }
}

pub struct JpegImageWriter<'a, T: Write> {
    writer: T,
    image: &'a Image,
    options: &'a EncoderOptions,
}

impl<'a, T: Write> JpegImageWriter<'a, T> {
    pub fn new(writer: T, image: &'a Image, options: &'a EncoderOptions) -> Self {
        Self {
            writer,
            image,
            options,
        }
    }
}

impl<T: Write> ImageWriter for JpegImageWriter<'_, T> {
    fn write_image(&mut self) -> Result<usize> {
        let mut session = EncoderSession::open_with_options(
            self.image.width() as u32,
            self.image.height() as u32,
            *self.options,
        )?;
        let bytes_written = session.compress(self.image, &mut self.writer)?;
        session.close();
        Ok(bytes_written)
    }
}
