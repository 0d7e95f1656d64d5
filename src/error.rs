use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid image dimensions {width}x{height}, both sides must be within 1..=65535")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Quality {0} is out of range, it must be within 1..=100")]
    InvalidQuality(u8),
    #[error("Unable to allocate memory for the {0}")]
    AllocationFailure(&'static str),
    #[error("Pixel buffer holds {actual} pixels, but the image requires {expected}")]
    PixelBufferSizeMismatch { expected: usize, actual: usize },
    #[error("Unable to open input file '{0}' for reading: {1}")]
    UnableToOpenInputFileForReading(String, #[source] io::Error),
    #[error("Unable to open output file '{0}' for writing: {1}")]
    UnableToOpenOutputFileForWriting(String, #[source] io::Error),
    #[error("Decoding of input image failed: {0}")]
    DecodingFailed(#[source] ::image::ImageError),
    #[error("Failed to write {0} segment: {1}")]
    FailedToWriteSegment(&'static str, #[source] io::Error),
    #[error("Content of {0} segment exceeds the maximum segment length")]
    SegmentTooLong(&'static str),
    #[error("Failed to write image data: {0}")]
    FailedToWriteImageData(#[source] io::Error),
    #[error("Failed to write encoded image to its destination: {0}")]
    FailedToWriteOutput(#[source] io::Error),
    #[error("Huffman symbol '{symbol:#04X}' not present in {table} table")]
    HuffmanSymbolNotPresent { symbol: u8, table: &'static str },
    #[error("Value {0} exceeds the largest encodable magnitude category")]
    MagnitudeOutOfRange(i32),
    #[error("Invalid huffman table: {0}")]
    InvalidHuffmanTable(&'static str),
    #[error("Block transformation aborted, {0} MCU rows were not delivered")]
    BlockTransformAborted(usize),
}

impl Error {
    /// Maps an io error raised while appending to the in-memory output
    /// buffer. Growth failures surface as allocation failures.
    pub(crate) fn from_buffer_error(error: io::Error, otherwise: impl FnOnce(io::Error) -> Self) -> Self {
        if error.kind() == io::ErrorKind::OutOfMemory {
            Self::AllocationFailure("output buffer")
        } else {
            otherwise(error)
        }
    }
}
