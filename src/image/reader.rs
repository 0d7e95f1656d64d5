use std::path::Path;

use ::image::ImageReader;

use super::Image;
use crate::error::Error;
use crate::Result;

/// Decodes an image file into an RGB raster. The format is guessed from the
/// file content, so the extension does not matter.
pub fn read_image(file_path: &Path) -> Result<Image> {
    let path_name = || file_path.to_string_lossy().into_owned();
    let reader = ImageReader::open(file_path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| Error::UnableToOpenInputFileForReading(path_name(), e))?;
    let decoded = reader.decode().map_err(Error::DecodingFailed)?.to_rgb8();
    let (width, height) = decoded.dimensions();
    log::info!(
        "Read image '{}' with {}x{} pixels",
        file_path.display(),
        width,
        height
    );
    Image::from_rgb_bytes(width, height, decoded.as_raw())
}
