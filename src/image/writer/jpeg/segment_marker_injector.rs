use std::io;
use std::io::Write;

/// Inserts a zero byte after every 0xFF of the entropy-coded data, so
/// decoders do not mistake it for the start of a marker.
pub struct SegmentMarkerInjector<'a, T: Write> {
    writer: &'a mut T,
}

impl<'a, T: Write> SegmentMarkerInjector<'a, T> {
    pub fn new(writer: &'a mut T) -> Self {
        Self { writer }
    }
}

impl<T: Write> Write for SegmentMarkerInjector<'_, T> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes_written = 0;
        for &byte in buf {
            let n = self.writer.write(&[byte])?;
            if n == 0 {
                return Ok(bytes_written);
            }
            bytes_written += 1;
            if byte == 0xFF {
                self.writer.write_all(&[0x00]).map_err(|e| {
                    io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!("unable to stuff zero byte after 0xFF: {}", e),
                    )
                })?;
            }
        }
        Ok(bytes_written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use proptest::prelude::*;

    use super::SegmentMarkerInjector;
    use crate::binary_stream::{BitWriter, Padding};

    fn write_bits_stuffed(writes: &[(u32, u8)]) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut injector = SegmentMarkerInjector::new(&mut output);
        let mut bit_writer = BitWriter::new(&mut injector, Padding::Ones);
        for &(value, count) in writes {
            bit_writer.write_bits(value, count).unwrap();
        }
        bit_writer.flush().unwrap();
        output
    }

    #[test]
    fn injector_test() {
        let test_sequence: Vec<u8> = vec![0x01, 0x02, 0xFF, 0x00, 0x03];
        let expect_sequence: Vec<u8> = vec![0x01, 0x02, 0xFF, 0x00, 0x00, 0x03];

        let mut output_sequence: Vec<u8> = Vec::new();

        let mut writer = SegmentMarkerInjector::new(&mut output_sequence);
        writer.write_all(&test_sequence).expect("writing failed");

        assert_eq!(expect_sequence, output_sequence);
    }

    #[test]
    fn consecutive_marker_bytes() {
        let mut output_sequence: Vec<u8> = Vec::new();
        let mut writer = SegmentMarkerInjector::new(&mut output_sequence);
        writer.write_all(&[0xFF, 0xFF]).expect("writing failed");
        assert_eq!(output_sequence, vec![0xFF, 0x00, 0xFF, 0x00]);
    }

    #[test]
    fn full_sink_is_reported() {
        let mut storage = [0_u8; 1];
        let mut sink: &mut [u8] = &mut storage;
        let mut writer = SegmentMarkerInjector::new(&mut sink);
        assert!(writer.write_all(&[0xFF]).is_err());
    }

    #[test]
    fn padded_final_byte_is_stuffed() {
        let output = write_bits_stuffed(&[(0b1010_1010, 8), (0b111_1111, 7)]);
        assert_eq!(output, vec![0xAA, 0xFF, 0x00]);
    }

    proptest! {
        #[test]
        fn bit_stream_is_stuffed_end_to_end(
            writes in proptest::collection::vec((any::<u32>(), 1_u8..=32), 0..64)
        ) {
            let mut bits: Vec<bool> = writes
                .iter()
                .flat_map(|&(value, count)| (0..count).rev().map(move |index| (value >> index) & 1 == 1))
                .collect();
            while bits.len() % 8 != 0 {
                bits.push(true);
            }
            let mut expected: Vec<u8> = Vec::new();
            for chunk in bits.chunks(8) {
                let byte = chunk.iter().fold(0_u8, |byte, &bit| (byte << 1) | bit as u8);
                expected.push(byte);
                if byte == 0xFF {
                    expected.push(0x00);
                }
            }
            let output = write_bits_stuffed(&writes);
            prop_assert_eq!(&output, &expected);
            for pair in output.windows(2) {
                prop_assert!(pair[0] != 0xFF || pair[1] == 0x00);
            }
            prop_assert!(output.last() != Some(&0xFF));
        }

        #[test]
        fn stuffed_stream_has_no_markers(input in proptest::collection::vec(any::<u8>(), 0..256)) {
            let mut output: Vec<u8> = Vec::new();
            SegmentMarkerInjector::new(&mut output).write_all(&input).unwrap();
            let marker_bytes = input.iter().filter(|&&byte| byte == 0xFF).count();
            prop_assert_eq!(output.len(), input.len() + marker_bytes);
            for pair in output.windows(2) {
                prop_assert!(pair[0] != 0xFF || pair[1] == 0x00);
            }
            let unstuffed: Vec<u8> = output
                .iter()
                .enumerate()
                .filter(|&(index, &byte)| !(byte == 0x00 && index > 0 && output[index - 1] == 0xFF))
                .map(|(_, &byte)| byte)
                .collect();
            prop_assert_eq!(unstuffed, input);
        }
    }
}
