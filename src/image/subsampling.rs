use std::cmp;

use super::{ColorChannel, PlaneBuffer};

/// Chroma subsampling rate used by the encoder (4:2:0).
pub const CHROMA_SUBSAMPLING_FACTOR: u16 = 2;

/// Averages square blocks of a channel in place. Every dot of a block is
/// replaced by the floor of the block mean. Blocks at the right and bottom
/// edge are clipped to the channel and averaged over the dots they contain.
pub struct Subsampler {
    factor: u16,
}

impl Subsampler {
    pub fn new(factor: u16) -> Self {
        Self {
            factor: cmp::max(factor, 1),
        }
    }

    pub fn factor(&self) -> u16 {
        self.factor
    }

    pub fn subsample_chroma(&self, planes: &mut PlaneBuffer) {
        for channel in planes.chroma_channels_mut() {
            self.subsample_in_place(channel);
        }
    }

    pub fn subsample_in_place(&self, channel: &mut ColorChannel<u8>) {
        if self.factor == 1 {
            return;
        }
        let factor = self.factor as usize;
        let width = channel.width as usize;
        let height = channel.height as usize;
        for row_index in (0..height).step_by(factor) {
            let row_end = cmp::min(row_index + factor, height);
            for column_index in (0..width).step_by(factor) {
                let column_end = cmp::min(column_index + factor, width);
                let value = average(channel, column_index..column_end, row_index..row_end);
                for y in row_index..row_end {
                    for x in column_index..column_end {
                        channel.set_dot(x, y, value);
                    }
                }
            }
        }
    }
}

impl Default for Subsampler {
    fn default() -> Self {
        Self::new(CHROMA_SUBSAMPLING_FACTOR)
    }
}

fn average(
    channel: &ColorChannel<u8>,
    columns: std::ops::Range<usize>,
    rows: std::ops::Range<usize>,
) -> u8 {
    let count = columns.len() * rows.len();
    let sum: u32 = rows
        .flat_map(|y| columns.clone().map(move |x| (x, y)))
        .map(|(x, y)| channel.dot(x, y) as u32)
        .sum();
    (sum / count as u32) as u8
}
