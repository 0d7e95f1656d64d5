use std::{
    fs::{File, OpenOptions},
    io::BufWriter,
    path::{Path, PathBuf},
};

pub use crate::image::reader::read_image;
pub use crate::image::writer::jpeg::{
    EncodeSummary, EncoderOptions, EncoderSession, EntropyCoding, JpegImageWriter, Quality,
};
pub use crate::image::{Image, ImageWriter};
pub use binary_stream::Padding;
pub use cli::CLIParser;
pub use color::RGBColorFormat;
pub use cosine_transform::DctAlgorithm;
pub use error::Error;

pub mod binary_stream;
mod cli;
pub mod color;
pub mod cosine_transform;
mod error;
pub mod huffman;
pub mod image;
pub mod logger;

pub type Result<T> = std::result::Result<T, error::Error>;

pub struct Arguments {
    pub input_file: PathBuf,
    pub output_file: PathBuf,
    pub quality: u8,
    pub number_of_threads: usize,
    pub entropy_coding: EntropyCoding,
    pub dct_algorithm: DctAlgorithm,
    pub padding: Padding,
}

fn open_output_file(file_path: &Path) -> Result<File> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(file_path)
        .map_err(|e| {
            Error::UnableToOpenOutputFileForWriting(file_path.to_string_lossy().into_owned(), e)
        })
}

/// Reads the input image, encodes it and writes the JPEG file. Returns the
/// size of the written file.
pub fn compress_file(arguments: &Arguments) -> Result<usize> {
    let image = read_image(&arguments.input_file)?;
    let options = EncoderOptions::from(arguments);
    let output_file = open_output_file(&arguments.output_file)?;
    let mut output_file_writer = BufWriter::new(&output_file);
    let mut writer = JpegImageWriter::new(&mut output_file_writer, &image, &options);
    writer.write_image()
}
