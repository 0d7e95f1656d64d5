use std::sync::{mpsc, Arc};

use threadpool::ThreadPool;

use super::quantization_tables::QuantizationTablePair;
use super::Component;
use crate::cosine_transform::{DctAlgorithm, Discrete8x8CosineTransformer, SQUARE_SIZE};
use crate::error::Error;
use crate::image::{ColorChannel, PlaneBuffer};
use crate::Result;
use categorize::{run_length_encode, SerializedBlock};
use quantizer::quantize;

pub mod categorize;
pub mod frequency_block;
pub mod quantizer;

const LEVEL_SHIFT: f32 = 128.0;

/// Partition of the image into minimum coded units. An MCU covers
/// `factor * factor` luma blocks and one block of each chroma component.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct McuGrid {
    horizontal: usize,
    vertical: usize,
    factor: usize,
}

impl McuGrid {
    pub fn new(width: u16, height: u16, factor: u16) -> Self {
        let factor = factor.max(1) as usize;
        let mcu_size = SQUARE_SIZE * factor;
        Self {
            horizontal: (width as usize).div_ceil(mcu_size),
            vertical: (height as usize).div_ceil(mcu_size),
            factor,
        }
    }

    pub fn horizontal(&self) -> usize {
        self.horizontal
    }

    pub fn vertical(&self) -> usize {
        self.vertical
    }

    pub fn number_of_mcus(&self) -> usize {
        self.horizontal * self.vertical
    }

    pub fn luma_blocks_per_mcu(&self) -> usize {
        self.factor * self.factor
    }

    pub fn blocks_per_mcu(&self) -> usize {
        self.luma_blocks_per_mcu() + 2
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedBlock {
    pub component: Component,
    pub block: SerializedBlock,
}

/// Level shift, DCT, quantization and run-length coding of single blocks.
#[derive(Clone, Copy, Debug)]
pub struct BlockTransform {
    dct: DctAlgorithm,
    quantization_tables: QuantizationTablePair,
}

impl BlockTransform {
    pub fn new(dct: DctAlgorithm, quantization_tables: QuantizationTablePair) -> Self {
        Self {
            dct,
            quantization_tables,
        }
    }

    /// Reads the block whose top left sample is at (`column`, `row`) in a
    /// grid where one sample spans `step` dots of the channel. Positions
    /// beyond the image repeat the last row or column.
    fn read_block(channel: &ColorChannel<u8>, column: usize, row: usize, step: usize) -> [f32; 64] {
        let mut samples = [0_f32; 64];
        for (index, sample) in samples.iter_mut().enumerate() {
            let block_row = index / SQUARE_SIZE;
            let block_column = index % SQUARE_SIZE;
            let dot = channel.dot_clamped((column + block_column) * step, (row + block_row) * step);
            *sample = dot as f32 - LEVEL_SHIFT;
        }
        samples
    }

    pub fn encode_block(
        &self,
        component: Component,
        channel: &ColorChannel<u8>,
        column: usize,
        row: usize,
        step: usize,
    ) -> EncodedBlock {
        let samples = Self::read_block(channel, column, row, step);
        let coefficients = self.dct.transform(&samples);
        let quantized = quantize(
            &coefficients,
            self.quantization_tables.for_component(component),
        );
        EncodedBlock {
            component,
            block: run_length_encode(&quantized.to_zig_zag()),
        }
    }
}

/// Encodes one row of MCUs. Within an MCU the luma blocks come row by row,
/// followed by the blue and red chroma block.
fn transform_mcu_row(
    planes: &PlaneBuffer,
    grid: &McuGrid,
    block_transform: &BlockTransform,
    mcu_row: usize,
) -> Vec<EncodedBlock> {
    let factor = grid.factor;
    let mut blocks = Vec::with_capacity(grid.horizontal * grid.blocks_per_mcu());
    for mcu_column in 0..grid.horizontal {
        for block_row in 0..factor {
            for block_column in 0..factor {
                blocks.push(block_transform.encode_block(
                    Component::Luma,
                    planes.luma_channel(),
                    (mcu_column * factor + block_column) * SQUARE_SIZE,
                    (mcu_row * factor + block_row) * SQUARE_SIZE,
                    1,
                ));
            }
        }
        for (component, channel) in [
            (Component::ChromaBlue, planes.chroma_blue_channel()),
            (Component::ChromaRed, planes.chroma_red_channel()),
        ] {
            blocks.push(block_transform.encode_block(
                component,
                channel,
                mcu_column * SQUARE_SIZE,
                mcu_row * SQUARE_SIZE,
                factor,
            ));
        }
    }
    blocks
}

pub struct Transformer<'a> {
    grid: McuGrid,
    block_transform: BlockTransform,
    threadpool: Option<&'a ThreadPool>,
}

impl<'a> Transformer<'a> {
    pub fn new(
        grid: McuGrid,
        block_transform: BlockTransform,
        threadpool: Option<&'a ThreadPool>,
    ) -> Self {
        Transformer {
            grid,
            block_transform,
            threadpool,
        }
    }

    /// Transforms all blocks of the subsampled planes in scan order. With a
    /// thread pool every MCU row becomes a job of its own, the rows are
    /// reassembled in order afterwards.
    pub fn transform(&self, planes: &Arc<PlaneBuffer>) -> Result<Vec<EncodedBlock>> {
        let Some(threadpool) = self.threadpool else {
            return Ok((0..self.grid.vertical)
                .flat_map(|mcu_row| {
                    transform_mcu_row(planes, &self.grid, &self.block_transform, mcu_row)
                })
                .collect());
        };
        let (sender, receiver) = mpsc::channel();
        for mcu_row in 0..self.grid.vertical {
            let sender = sender.clone();
            let planes = Arc::clone(planes);
            let grid = self.grid;
            let block_transform = self.block_transform;
            threadpool.execute(move || {
                let blocks = transform_mcu_row(&planes, &grid, &block_transform, mcu_row);
                // release the planes before the caller can observe the row
                drop(planes);
                let _ = sender.send((mcu_row, blocks));
            });
        }
        drop(sender);
        let mut rows: Vec<Option<Vec<EncodedBlock>>> = vec![None; self.grid.vertical];
        for (mcu_row, blocks) in receiver.iter() {
            rows[mcu_row] = Some(blocks);
        }
        let missing_rows = rows.iter().filter(|row| row.is_none()).count();
        if missing_rows > 0 {
            log::error!("{} MCU rows were not transformed", missing_rows);
            return Err(Error::BlockTransformAborted(missing_rows));
        }
        let mut blocks = Vec::with_capacity(self.grid.number_of_mcus() * self.grid.blocks_per_mcu());
        blocks.extend(rows.into_iter().flatten().flatten());
        Ok(blocks)
    }
}
