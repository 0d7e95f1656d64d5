use std::io;
use std::io::Write;

use clap::{builder::PossibleValue, ValueEnum};

/// A right-aligned run of bits, written most significant bit first.
pub trait BitPattern {
    fn bit_pattern(&self) -> u32;
    fn bit_length(&self) -> u8;
}

/// Fill for the unused low bits of the final byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Padding {
    #[default]
    Ones,
    Zeros,
}

impl ValueEnum for Padding {
    fn value_variants<'a>() -> &'a [Self] {
        &[Self::Ones, Self::Zeros]
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        match self {
            Self::Ones => Some(PossibleValue::new("Ones")),
            Self::Zeros => Some(PossibleValue::new("Zeros")),
        }
    }
}

/// State for writing individual bits to a Writer
pub struct BitWriter<'a, T: Write> {
    /// the underlying output stream
    writer: &'a mut T,
    /// buffer of individual bits not yet written
    buffer: u8,
    /// how many bits are waiting to be written
    buffer_space_used: u8,
    padding: Padding,
}

impl<'a, T: Write> BitWriter<'a, T> {
    pub fn new(writer: &'a mut T, padding: Padding) -> BitWriter<'a, T> {
        BitWriter {
            writer,
            buffer: 0,
            buffer_space_used: 0,
            padding,
        }
    }

    /// write the lowest `count` bits of `value`, most significant first
    ///
    /// count must be within 1..=32. Completed bytes are passed on to the
    /// underlying writer immediately, remaining bits wait for the next
    /// call or for flush.
    pub fn write_bits(&mut self, value: u32, count: u8) -> io::Result<()> {
        if count == 0 || count > 32 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("bit count {} is out of range 1..=32", count),
            ));
        }
        for bit_index in (0..count).rev() {
            let bit = ((value >> bit_index) & 1) as u8;
            self.buffer = (self.buffer << 1) | bit;
            self.buffer_space_used += 1;
            if self.buffer_space_used == 8 {
                self.writer.write_all(&[self.buffer])?;
                self.buffer_space_used = 0;
                self.buffer = 0;
            }
        }
        Ok(())
    }

    /// Patterns of length zero write nothing.
    pub fn write_bit_pattern(&mut self, pattern: &impl BitPattern) -> io::Result<()> {
        match pattern.bit_length() {
            0 => Ok(()),
            length => self.write_bits(pattern.bit_pattern(), length),
        }
    }

    pub fn pending_bits(&self) -> u8 {
        self.buffer_space_used
    }
}

impl<T: Write> Write for BitWriter<'_, T> {
    /// Writing of byte arrays into the bit writer
    ///
    /// Warning: bytes are not necessarily aligned with the output bytes,
    ///          so parts of the input may wait in the buffer until the
    ///          next flush
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for byte in buf {
            self.write_bits(*byte as u32, 8)?;
        }
        Ok(buf.len())
    }

    /// Flush all bits and the underlying writer
    ///
    /// Bits still waiting in the buffer are completed to a full byte with
    /// the configured padding.
    fn flush(&mut self) -> io::Result<()> {
        if self.buffer_space_used != 0 {
            let free_bits = 8 - self.buffer_space_used;
            let fill = match self.padding {
                Padding::Ones => (1_u8 << free_bits) - 1,
                Padding::Zeros => 0,
            };
            self.writer.write_all(&[(self.buffer << free_bits) | fill])?;
            self.buffer = 0;
            self.buffer_space_used = 0;
        }
        self.writer.flush()
    }
}

/// A growable in-memory sink. Capacity doubles when exhausted; a failed
/// reservation is reported as [`io::ErrorKind::OutOfMemory`] instead of
/// aborting the process.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    bytes: Vec<u8>,
}

impl OutputBuffer {
    pub fn with_capacity(capacity: usize) -> io::Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(capacity)
            .map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))?;
        Ok(Self { bytes })
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    fn ensure_free_space(&mut self, additional: usize) -> io::Result<()> {
        let required = self
            .bytes
            .len()
            .checked_add(additional)
            .ok_or(io::ErrorKind::OutOfMemory)?;
        if required <= self.bytes.capacity() {
            return Ok(());
        }
        let mut new_capacity = self.bytes.capacity().max(64);
        while new_capacity < required {
            new_capacity = new_capacity
                .checked_mul(2)
                .ok_or(io::ErrorKind::OutOfMemory)?;
        }
        self.bytes
            .try_reserve_exact(new_capacity - self.bytes.len())
            .map_err(|_| io::Error::from(io::ErrorKind::OutOfMemory))
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.ensure_free_space(buf.len())?;
        self.bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
