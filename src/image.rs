use std::cmp;

use crate::color::{RGBColorFormat, YCbCrColorFormat};
use crate::error::Error;
use crate::Result;

pub mod reader;
pub mod subsampling;
pub mod writer;

pub use writer::ImageWriter;

/// Checks that both sides are non-zero and fit the 16 bit size fields of
/// the frame header.
pub fn validate_dimensions(width: u32, height: u32) -> Result<(u16, u16)> {
    let invalid = || Error::InvalidDimensions { width, height };
    let narrow_width = u16::try_from(width).map_err(|_| invalid())?;
    let narrow_height = u16::try_from(height).map_err(|_| invalid())?;
    if narrow_width == 0 || narrow_height == 0 {
        return Err(invalid());
    }
    Ok((narrow_width, narrow_height))
}

/// An interleaved RGB raster in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u16,
    height: u16,
    dots: Vec<RGBColorFormat>,
}

impl Image {
    pub fn new(width: u32, height: u32, dots: Vec<RGBColorFormat>) -> Result<Self> {
        let (width, height) = validate_dimensions(width, height)?;
        let expected = width as usize * height as usize;
        if dots.len() != expected {
            return Err(Error::PixelBufferSizeMismatch {
                expected,
                actual: dots.len(),
            });
        }
        Ok(Self {
            width,
            height,
            dots,
        })
    }

    /// Creates an image from tightly packed `R, G, B` byte triples.
    pub fn from_rgb_bytes(width: u32, height: u32, bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 3 != 0 {
            return Err(Error::PixelBufferSizeMismatch {
                expected: width as usize * height as usize,
                actual: bytes.len() / 3,
            });
        }
        let dots = bytes
            .chunks_exact(3)
            .map(|rgb| RGBColorFormat::new(rgb[0], rgb[1], rgb[2]))
            .collect();
        Self::new(width, height, dots)
    }

    pub fn filled(width: u32, height: u32, color: RGBColorFormat) -> Result<Self> {
        let (narrow_width, narrow_height) = validate_dimensions(width, height)?;
        let dots = vec![color; narrow_width as usize * narrow_height as usize];
        Self::new(width, height, dots)
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn dots(&self) -> &[RGBColorFormat] {
        &self.dots
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ColorChannel<T> {
    dots: Vec<T>,
    width: u16,
    height: u16,
}

impl<T: Copy> ColorChannel<T> {
    pub fn new(width: u16, height: u16, dots: Vec<T>) -> Self {
        debug_assert_eq!(dots.len(), width as usize * height as usize);
        Self {
            dots,
            width,
            height,
        }
    }

    fn with_capacity(width: u16, height: u16) -> Result<Self> {
        let mut dots = Vec::new();
        dots.try_reserve_exact(width as usize * height as usize)
            .map_err(|_| Error::AllocationFailure("plane buffer"))?;
        Ok(Self {
            dots,
            width,
            height,
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn dots(&self) -> &[T] {
        &self.dots
    }

    pub fn dot(&self, column_index: usize, row_index: usize) -> T {
        self.dots[column_index + row_index * self.width as usize]
    }

    /// Reads a dot, replicating the last column and row for coordinates
    /// beyond the channel bounds.
    pub fn dot_clamped(&self, column_index: usize, row_index: usize) -> T {
        let column_index = cmp::min(column_index, self.width as usize - 1);
        let row_index = cmp::min(row_index, self.height as usize - 1);
        self.dot(column_index, row_index)
    }

    fn set_dot(&mut self, column_index: usize, row_index: usize, value: T) {
        let index = column_index + row_index * self.width as usize;
        self.dots[index] = value;
    }
}

/// The three full resolution component planes of an image. Chroma planes
/// are subsampled in place, so after subsampling each dot of a block holds
/// the block average.
#[derive(Clone, Debug, PartialEq)]
pub struct PlaneBuffer {
    width: u16,
    height: u16,
    luma: ColorChannel<u8>,
    chroma_blue: ColorChannel<u8>,
    chroma_red: ColorChannel<u8>,
}

impl PlaneBuffer {
    /// Reserves the planes for an image of the given size. Nothing is
    /// written until [`PlaneBuffer::convert_from`] is called.
    pub fn allocate(width: u16, height: u16) -> Result<Self> {
        Ok(Self {
            width,
            height,
            luma: ColorChannel::with_capacity(width, height)?,
            chroma_blue: ColorChannel::with_capacity(width, height)?,
            chroma_red: ColorChannel::with_capacity(width, height)?,
        })
    }

    pub fn from_image(image: &Image) -> Result<Self> {
        let mut planes = Self::allocate(image.width, image.height)?;
        planes.convert_from(image)?;
        Ok(planes)
    }

    /// Fills the planes with the YCbCr conversion of `image`.
    pub fn convert_from(&mut self, image: &Image) -> Result<()> {
        if image.width != self.width || image.height != self.height {
            return Err(Error::PixelBufferSizeMismatch {
                expected: self.width as usize * self.height as usize,
                actual: image.dots.len(),
            });
        }
        self.luma.dots.clear();
        self.chroma_blue.dots.clear();
        self.chroma_red.dots.clear();
        for dot in image.dots.iter() {
            let converted = YCbCrColorFormat::from(dot);
            self.luma.dots.push(converted.luma);
            self.chroma_blue.dots.push(converted.chroma_blue);
            self.chroma_red.dots.push(converted.chroma_red);
        }
        Ok(())
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn luma_channel(&self) -> &ColorChannel<u8> {
        &self.luma
    }

    pub fn chroma_blue_channel(&self) -> &ColorChannel<u8> {
        &self.chroma_blue
    }

    pub fn chroma_red_channel(&self) -> &ColorChannel<u8> {
        &self.chroma_red
    }

    pub(crate) fn chroma_channels_mut(&mut self) -> [&mut ColorChannel<u8>; 2] {
        [&mut self.chroma_blue, &mut self.chroma_red]
    }
}

#[cfg(test)]
mod test {
    use super::{validate_dimensions, ColorChannel, Image, PlaneBuffer};
    use crate::color::RGBColorFormat;
    use crate::error::Error;

    #[test]
    fn reject_zero_and_oversized_dimensions() {
        assert!(matches!(
            validate_dimensions(0, 10),
            Err(Error::InvalidDimensions { width: 0, height: 10 })
        ));
        assert!(matches!(
            validate_dimensions(10, 0),
            Err(Error::InvalidDimensions { .. })
        ));
        assert!(matches!(
            validate_dimensions(65536, 1),
            Err(Error::InvalidDimensions { .. })
        ));
        assert_eq!(validate_dimensions(65535, 1).unwrap(), (65535, 1));
    }

    #[test]
    fn reject_pixel_buffer_of_wrong_size() {
        let result = Image::new(2, 2, vec![RGBColorFormat::default(); 3]);
        assert!(matches!(
            result,
            Err(Error::PixelBufferSizeMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn create_image_from_rgb_bytes() {
        let image = Image::from_rgb_bytes(2, 1, &[1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(image.dots()[0], RGBColorFormat::new(1, 2, 3));
        assert_eq!(image.dots()[1], RGBColorFormat::new(4, 5, 6));
    }

    #[test]
    fn read_clamped_dots_beyond_channel_bounds() {
        #[rustfmt::skip]
        let channel = ColorChannel::new(3, 2, vec![
            1, 2, 3,
            4, 5, 6,
        ]);
        assert_eq!(channel.dot_clamped(1, 1), 5);
        assert_eq!(channel.dot_clamped(7, 0), 3);
        assert_eq!(channel.dot_clamped(0, 9), 4);
        assert_eq!(channel.dot_clamped(100, 100), 6);
    }

    #[test]
    fn convert_image_into_planes() {
        let image = Image::filled(3, 2, RGBColorFormat::gray(128)).unwrap();
        let planes = PlaneBuffer::from_image(&image).unwrap();
        assert_eq!(planes.luma_channel().dots(), &[128; 6]);
        assert_eq!(planes.chroma_blue_channel().dots(), &[128; 6]);
        assert_eq!(planes.chroma_red_channel().dots(), &[128; 6]);
    }

    #[test]
    fn reject_image_of_different_size_than_planes() {
        let mut planes = PlaneBuffer::allocate(4, 4).unwrap();
        let image = Image::filled(3, 4, RGBColorFormat::gray(0)).unwrap();
        assert!(matches!(
            planes.convert_from(&image),
            Err(Error::PixelBufferSizeMismatch { .. })
        ));
    }
}
