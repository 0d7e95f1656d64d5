use std::io::Write;
use std::sync::Arc;

use threadpool::ThreadPool;

use super::encoder::entropy_coder::{EntropyCoder, HuffmanTableSet};
use super::encoder::{EncodedImage, Encoder, FrameHeader};
use super::quantization_tables::{Quality, QuantizationTablePair};
use super::transformer::{BlockTransform, McuGrid, Transformer};
use super::{EncoderOptions, EntropyCoding};
use crate::binary_stream::OutputBuffer;
use crate::error::Error;
use crate::image::subsampling::{Subsampler, CHROMA_SUBSAMPLING_FACTOR};
use crate::image::{validate_dimensions, Image, PlaneBuffer};
use crate::Result;

/// Space reserved up front for the encoded file, relative to the number of
/// pixels. The buffer grows on demand.
const OUTPUT_BYTES_PER_PIXEL_DIVISOR: usize = 4;
const OUTPUT_HEADER_RESERVE: usize = 1024;

/// Statistics of the most recent compression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodeSummary {
    pub mcus: usize,
    pub luma_blocks: usize,
    pub chroma_blocks: usize,
    pub bytes_written: usize,
}

/// An encoder bound to one image size. All buffers are allocated when the
/// session is opened and reused by every call to
/// [`EncoderSession::compress`].
pub struct EncoderSession {
    width: u16,
    height: u16,
    options: EncoderOptions,
    quantization_tables: QuantizationTablePair,
    standard_tables: HuffmanTableSet,
    grid: McuGrid,
    subsampler: Subsampler,
    plane_buffer: Arc<PlaneBuffer>,
    output: OutputBuffer,
    entropy_coder: EntropyCoder,
    threadpool: Option<ThreadPool>,
    last_summary: Option<EncodeSummary>,
}

impl EncoderSession {
    pub fn open(width: u32, height: u32, quality: u8) -> Result<Self> {
        let options = EncoderOptions {
            quality: Quality::try_from(quality)?,
            ..EncoderOptions::default()
        };
        Self::open_with_options(width, height, options)
    }

    pub fn open_with_options(width: u32, height: u32, options: EncoderOptions) -> Result<Self> {
        let (width, height) = validate_dimensions(width, height)?;
        let pixel_count = width as usize * height as usize;
        let output = OutputBuffer::with_capacity(
            pixel_count / OUTPUT_BYTES_PER_PIXEL_DIVISOR + OUTPUT_HEADER_RESERVE,
        )
        .map_err(|_| Error::AllocationFailure("output buffer"))?;
        let threadpool = match options.number_of_threads {
            0 | 1 => None,
            number_of_threads => Some(ThreadPool::new(number_of_threads)),
        };
        log::info!(
            "Opened encoder session for {}x{} at quality {} using {} thread(s)",
            width,
            height,
            options.quality.value(),
            options.number_of_threads.max(1)
        );
        Ok(Self {
            width,
            height,
            options,
            quantization_tables: QuantizationTablePair::for_quality(options.quality),
            standard_tables: HuffmanTableSet::standard()?,
            grid: McuGrid::new(width, height, CHROMA_SUBSAMPLING_FACTOR),
            subsampler: Subsampler::new(CHROMA_SUBSAMPLING_FACTOR),
            plane_buffer: Arc::new(PlaneBuffer::allocate(width, height)?),
            output,
            entropy_coder: EntropyCoder::new(),
            threadpool,
            last_summary: None,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Encodes `image` into a complete JPEG file and writes it to `sink`.
    /// Returns the number of bytes written. Nothing reaches the sink when
    /// encoding fails.
    pub fn compress(&mut self, image: &Image, sink: &mut impl Write) -> Result<usize> {
        if image.width() != self.width || image.height() != self.height {
            return Err(Error::PixelBufferSizeMismatch {
                expected: self.width as usize * self.height as usize,
                actual: image.dots().len(),
            });
        }
        self.last_summary = None;
        self.entropy_coder.reset();
        self.output.clear();

        let planes = Arc::make_mut(&mut self.plane_buffer);
        planes.convert_from(image)?;
        self.subsampler.subsample_chroma(planes);

        let block_transform = BlockTransform::new(self.options.dct_algorithm, self.quantization_tables);
        let transformer = Transformer::new(self.grid, block_transform, self.threadpool.as_ref());
        let blocks = transformer.transform(&self.plane_buffer)?;
        log::debug!("Transformed {} blocks", blocks.len());

        let adaptive_tables;
        let huffman_tables = match self.options.entropy_coding {
            EntropyCoding::Fixed => &self.standard_tables,
            EntropyCoding::Adaptive => {
                adaptive_tables = HuffmanTableSet::from_blocks(&blocks)?;
                &adaptive_tables
            }
        };
        let encoded_image = EncodedImage {
            frame: FrameHeader {
                width: self.width,
                height: self.height,
                subsampling_factor: self.subsampler.factor(),
            },
            quantization_tables: &self.quantization_tables,
            huffman_tables,
            blocks: &blocks,
            padding: self.options.padding,
        };
        Encoder::new(&mut self.output).encode(&encoded_image, &mut self.entropy_coder)?;

        sink.write_all(self.output.as_slice())
            .and_then(|_| sink.flush())
            .map_err(Error::FailedToWriteOutput)?;

        let bytes_written = self.output.len();
        let luma_blocks = self.grid.number_of_mcus() * self.grid.luma_blocks_per_mcu();
        let summary = EncodeSummary {
            mcus: self.grid.number_of_mcus(),
            luma_blocks,
            chroma_blocks: blocks.len() - luma_blocks,
            bytes_written,
        };
        log::info!(
            "Encoded {} MCUs into {} bytes",
            summary.mcus,
            summary.bytes_written
        );
        self.last_summary = Some(summary);
        Ok(bytes_written)
    }

    pub fn last_summary(&self) -> Option<EncodeSummary> {
        self.last_summary
    }

    /// Releases the buffers and worker threads of the session.
    pub fn close(self) {
        if let Some(threadpool) = &self.threadpool {
            threadpool.join();
        }
        log::debug!("Closed encoder session for {}x{}", self.width, self.height);
    }
}

#[cfg(test)]
mod test {
    use super::{EncodeSummary, EncoderSession};
    use crate::color::RGBColorFormat;
    use crate::error::Error;
    use crate::image::writer::jpeg::{EncoderOptions, EntropyCoding};
    use crate::image::Image;

    fn scan_data(file: &[u8]) -> &[u8] {
        let start_of_scan = file
            .windows(2)
            .position(|pair| pair == [0xFF, 0xDA])
            .unwrap();
        let length = u16::from_be_bytes([file[start_of_scan + 2], file[start_of_scan + 3]]) as usize;
        &file[start_of_scan + 2 + length..file.len() - 2]
    }

    #[test]
    fn gray_image_scan_data() {
        let image = Image::filled(8, 8, RGBColorFormat::gray(128)).unwrap();
        let mut session = EncoderSession::open(8, 8, 75).unwrap();
        let mut output: Vec<u8> = Vec::new();
        let bytes_written = session.compress(&image, &mut output).unwrap();
        assert_eq!(bytes_written, output.len());
        assert_eq!(scan_data(&output), &[0x28, 0xA2, 0x8A, 0x00]);
        assert_eq!(&output[output.len() - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn file_layout_for_standard_tables() {
        let image = Image::filled(8, 8, RGBColorFormat::gray(128)).unwrap();
        let mut session = EncoderSession::open(8, 8, 75).unwrap();
        let mut output: Vec<u8> = Vec::new();
        session.compress(&image, &mut output).unwrap();
        // SOI, APP0, DQT, SOF0, DHT, SOS, 4 bytes of scan data, EOI
        assert_eq!(output.len(), 2 + 18 + 134 + 19 + 420 + 14 + 4 + 2);
        let markers: Vec<u8> = [0, 2, 20, 154, 173, 593]
            .iter()
            .map(|&offset| output[offset + 1])
            .collect();
        assert_eq!(markers, vec![0xD8, 0xE0, 0xDB, 0xC0, 0xC4, 0xDA]);
    }

    #[test]
    fn summary_of_partial_mcu() {
        let image = Image::filled(10, 10, RGBColorFormat::new(12, 34, 56)).unwrap();
        let mut session = EncoderSession::open(10, 10, 50).unwrap();
        assert_eq!(session.last_summary(), None);
        let mut output: Vec<u8> = Vec::new();
        let bytes_written = session.compress(&image, &mut output).unwrap();
        assert_eq!(
            session.last_summary(),
            Some(EncodeSummary {
                mcus: 1,
                luma_blocks: 4,
                chroma_blocks: 2,
                bytes_written,
            })
        );
    }

    #[test]
    fn session_is_reusable() {
        let mut session = EncoderSession::open(24, 17, 80).unwrap();
        let first = Image::filled(24, 17, RGBColorFormat::new(200, 10, 90)).unwrap();
        let second = Image::filled(24, 17, RGBColorFormat::new(0, 255, 0)).unwrap();
        let mut first_output: Vec<u8> = Vec::new();
        let mut second_output: Vec<u8> = Vec::new();
        let mut repeated_output: Vec<u8> = Vec::new();
        session.compress(&first, &mut first_output).unwrap();
        session.compress(&second, &mut second_output).unwrap();
        session.compress(&first, &mut repeated_output).unwrap();
        assert_ne!(first_output, second_output);
        assert_eq!(first_output, repeated_output);
        session.close();
    }

    #[test]
    fn threads_do_not_change_the_output() {
        let width = 70;
        let height = 45;
        let dots = (0..width * height)
            .map(|index| {
                let column = index % width;
                let row = index / width;
                RGBColorFormat::new((column * 3) as u8, (row * 5) as u8, (column ^ row) as u8)
            })
            .collect();
        let image = Image::new(width, height, dots).unwrap();
        let mut outputs = Vec::new();
        for number_of_threads in [1, 4] {
            let options = EncoderOptions {
                number_of_threads,
                entropy_coding: EntropyCoding::Adaptive,
                ..EncoderOptions::default()
            };
            let mut session = EncoderSession::open_with_options(width, height, options).unwrap();
            let mut output: Vec<u8> = Vec::new();
            session.compress(&image, &mut output).unwrap();
            session.close();
            outputs.push(output);
        }
        assert_eq!(outputs[0], outputs[1]);
    }

    #[test]
    fn reject_invalid_parameters() {
        assert!(matches!(
            EncoderSession::open(0, 8, 75),
            Err(Error::InvalidDimensions { width: 0, height: 8 })
        ));
        assert!(matches!(
            EncoderSession::open(70000, 8, 75),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            EncoderSession::open(8, 8, 0),
            Err(Error::InvalidQuality(0))
        ));
        assert!(matches!(
            EncoderSession::open(8, 8, 101),
            Err(Error::InvalidQuality(101))
        ));
    }

    #[test]
    fn reject_image_of_other_size() {
        let mut session = EncoderSession::open(8, 8, 75).unwrap();
        let image = Image::filled(9, 8, RGBColorFormat::gray(0)).unwrap();
        let mut output: Vec<u8> = Vec::new();
        assert!(matches!(
            session.compress(&image, &mut output),
            Err(Error::PixelBufferSizeMismatch {
                expected: 64,
                actual: 72
            })
        ));
        assert!(output.is_empty());
        assert_eq!(session.last_summary(), None);
    }
}
