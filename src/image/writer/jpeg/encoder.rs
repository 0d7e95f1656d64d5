use std::fmt::Display;
use std::io::Write;

use entropy_coder::{EntropyCoder, HuffmanTableSet, HuffmanWriter};

use super::quantization_tables::QuantizationTablePair;
use super::segment_marker_injector::SegmentMarkerInjector;
use super::transformer::EncodedBlock;
use super::{Component, TableKind};
use crate::binary_stream::{BitWriter, Padding};
use crate::error::Error;
use crate::logger;
use crate::Result;

pub mod entropy_coder;
mod symbol_counting;

const START_OF_FILE_MARKER: [u8; 2] = [0xFF, 0xD8];
const END_OF_FILE_MARKER: [u8; 2] = [0xFF, 0xD9];
const HUFFMAN_TABLE_MARKER: [u8; 2] = [0xFF, 0xC4];
const QUANTIZATION_TABLE_MARKER: [u8; 2] = [0xFF, 0xDB];
const START_OF_FRAME_MARKER: [u8; 2] = [0xFF, 0xC0];
const START_OF_SCAN_MARKER: [u8; 2] = [0xFF, 0xDA];
const JFIF_APPLICATION_MARKER: [u8; 2] = [0xFF, 0xE0];

const SAMPLE_PRECISION: u8 = 8;

enum ControlMarker {
    StartOfFile,
    EndOfFile,
}

#[derive(Clone, Copy)]
enum SegmentMarker {
    HuffmanTable,
    QuantizationTable,
    JfifApplication,
    StartOfFrame,
    StartOfScan,
}

trait AsBinaryRef {
    fn as_binary_ref(&self) -> &'static [u8];
}

impl AsBinaryRef for ControlMarker {
    fn as_binary_ref(&self) -> &'static [u8] {
        match self {
            Self::StartOfFile => &START_OF_FILE_MARKER,
            Self::EndOfFile => &END_OF_FILE_MARKER,
        }
    }
}

impl AsBinaryRef for SegmentMarker {
    fn as_binary_ref(&self) -> &'static [u8] {
        match self {
            Self::HuffmanTable => &HUFFMAN_TABLE_MARKER,
            Self::QuantizationTable => &QUANTIZATION_TABLE_MARKER,
            Self::JfifApplication => &JFIF_APPLICATION_MARKER,
            Self::StartOfFrame => &START_OF_FRAME_MARKER,
            Self::StartOfScan => &START_OF_SCAN_MARKER,
        }
    }
}

impl ControlMarker {
    fn name(&self) -> &'static str {
        match self {
            Self::StartOfFile => "start of image",
            Self::EndOfFile => "end of image",
        }
    }
}

impl SegmentMarker {
    fn name(&self) -> &'static str {
        match self {
            Self::HuffmanTable => "huffman table",
            Self::QuantizationTable => "quantization table",
            Self::JfifApplication => "jfif application",
            Self::StartOfFrame => "start of frame",
            Self::StartOfScan => "start of scan",
        }
    }
}

impl Display for SegmentMarker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Size and chroma subsampling of the frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHeader {
    pub width: u16,
    pub height: u16,
    pub subsampling_factor: u16,
}

impl FrameHeader {
    /// Horizontal factor in the high nibble, vertical in the low one.
    fn sampling_factors(&self, component: Component) -> u8 {
        match component {
            Component::Luma => {
                let factor = self.subsampling_factor as u8 & 0x0F;
                (factor << 4) | factor
            }
            Component::ChromaBlue | Component::ChromaRed => 0x11,
        }
    }
}

/// Everything written into one baseline JPEG file.
pub struct EncodedImage<'a> {
    pub frame: FrameHeader,
    pub quantization_tables: &'a QuantizationTablePair,
    pub huffman_tables: &'a HuffmanTableSet,
    pub blocks: &'a [EncodedBlock],
    pub padding: Padding,
}

pub struct Encoder<'a, T> {
    writer: &'a mut T,
}

impl<'a, T: Write> Encoder<'a, T> {
    pub fn new(writer: &'a mut T) -> Encoder<'a, T> {
        Encoder { writer }
    }

    pub fn encode(&mut self, image: &EncodedImage, entropy_coder: &mut EntropyCoder) -> Result<()> {
        self.write_start_of_image()?;
        self.write_jfif_application_header()?;
        self.write_quantization_tables(image.quantization_tables)?;
        self.write_start_of_frame(&image.frame)?;
        self.write_huffman_tables(image.huffman_tables)?;
        self.write_start_of_scan()?;
        self.write_scan(
            image.blocks,
            image.huffman_tables,
            entropy_coder,
            image.padding,
        )?;
        self.write_end_of_image()?;
        Ok(())
    }

    fn write_segment(&mut self, marker: SegmentMarker, content: &[u8]) -> Result<()> {
        log::debug!("Writing {}", marker);
        let segment_len = content.len() + 2;
        if segment_len > u16::MAX as usize {
            return Err(Error::SegmentTooLong(marker.name()));
        }
        let marker_binary_ref = marker.as_binary_ref();
        let segment_length = (segment_len as u16).to_be_bytes();
        logger::log_segment(marker_binary_ref, &segment_length, content);
        self.writer
            .write_all(marker_binary_ref)
            .and_then(|_| self.writer.write_all(&segment_length))
            .and_then(|_| self.writer.write_all(content))
            .map_err(|e| {
                Error::from_buffer_error(e, |e| Error::FailedToWriteSegment(marker.name(), e))
            })
    }

    fn write_control_marker(&mut self, marker: ControlMarker) -> Result<()> {
        self.writer
            .write_all(marker.as_binary_ref())
            .map_err(|e| {
                Error::from_buffer_error(e, |e| Error::FailedToWriteSegment(marker.name(), e))
            })
    }

    pub fn write_start_of_image(&mut self) -> Result<()> {
        self.write_control_marker(ControlMarker::StartOfFile)
    }

    pub fn write_end_of_image(&mut self) -> Result<()> {
        self.write_control_marker(ControlMarker::EndOfFile)
    }

    pub fn write_jfif_application_header(&mut self) -> Result<()> {
        #[rustfmt::skip]
        let content = &[
            b'J', b'F', b'I', b'F', b'\0', // Identifier
            0x01, 0x02,                    // Version
            0x00,                          // Density unit, aspect ratio only
            0x00, 0x01, 0x00, 0x01,        // Density
            0,                             // X Thumbnail
            0,                             // Y Thumbnail
        ];
        self.write_segment(SegmentMarker::JfifApplication, content)
    }

    /// Both tables share one segment, luminance as table 0 and chrominance
    /// as table 1, each with 8 bit precision.
    pub fn write_quantization_tables(&mut self, tables: &QuantizationTablePair) -> Result<()> {
        let mut content: Vec<u8> = Vec::with_capacity(2 * 65);
        for (id, table) in [(0_u8, &tables.luminance), (1, &tables.chrominance)] {
            content.push(id);
            content.extend(table.zig_zag_values());
        }
        self.write_segment(SegmentMarker::QuantizationTable, &content)
    }

    pub fn write_start_of_frame(&mut self, frame: &FrameHeader) -> Result<()> {
        let width_bytes = frame.width.to_be_bytes();
        let height_bytes = frame.height.to_be_bytes();
        let mut content = vec![
            SAMPLE_PRECISION,
            height_bytes[0],
            height_bytes[1],
            width_bytes[0],
            width_bytes[1],
            Component::ALL.len() as u8,
        ];
        for component in Component::ALL {
            content.push(component.identifier());
            content.push(frame.sampling_factors(component));
            content.push(component.quantization_table_id());
        }
        self.write_segment(SegmentMarker::StartOfFrame, &content)
    }

    /// All four tables in one segment: luma DC, luma AC, chroma DC and
    /// chroma AC.
    pub fn write_huffman_tables(&mut self, tables: &HuffmanTableSet) -> Result<()> {
        let mut content: Vec<u8> = Vec::new();
        for kind in TableKind::ALL {
            let table = tables.table(kind);
            content.push(kind.value());
            content.extend(table.code_length_counts());
            content.extend(table.symbols());
        }
        self.write_segment(SegmentMarker::HuffmanTable, &content)
    }

    pub fn write_start_of_scan(&mut self) -> Result<()> {
        let mut content = vec![Component::ALL.len() as u8];
        for component in Component::ALL {
            content.push(component.identifier());
            // DC table in the high nibble, AC table in the low one
            content.push((component.dc_table().value() << 4) | (component.ac_table().value() & 0x0F));
        }
        // spectral selection 0..=63, no successive approximation
        content.extend([0x00, 0x3F, 0x00]);
        self.write_segment(SegmentMarker::StartOfScan, &content)
    }

    pub fn write_scan(
        &mut self,
        blocks: &[EncodedBlock],
        tables: &HuffmanTableSet,
        entropy_coder: &mut EntropyCoder,
        padding: Padding,
    ) -> Result<()> {
        log::debug!("Writing {} blocks of entropy-coded data", blocks.len());
        let mut segment_marker_injector = SegmentMarkerInjector::new(&mut *self.writer);
        let mut bit_writer = BitWriter::new(&mut segment_marker_injector, padding);
        let mut huffman_writer = HuffmanWriter::new(&mut bit_writer, tables);
        for block in blocks {
            entropy_coder.encode_block(block, &mut huffman_writer)?;
        }
        bit_writer
            .flush()
            .map_err(|e| Error::from_buffer_error(e, Error::FailedToWriteImageData))
    }
}
