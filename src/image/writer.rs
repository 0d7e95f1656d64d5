use crate::Result;

pub mod jpeg;

pub trait ImageWriter {
    /// Encodes the image and returns the number of bytes written.
    fn write_image(&mut self) -> Result<usize>;
}
