/// Weights of the BT.601 conversion with three decimal places, scaled by
/// `WEIGHT_SCALE` so the conversion stays in integer arithmetic and truncates
/// exactly like the real valued formula.
const WEIGHT_SCALE: i32 = 10_000;
const CHROMA_OFFSET: i32 = 128 * WEIGHT_SCALE;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RGBColorFormat {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct YCbCrColorFormat {
    pub luma: u8,
    pub chroma_blue: u8,
    pub chroma_red: u8,
}

impl RGBColorFormat {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    pub const fn gray(value: u8) -> Self {
        Self::new(value, value, value)
    }
}

fn weighted_sum(color: &RGBColorFormat, weights: [i32; 3], offset: i32) -> u8 {
    let sum = weights[0] * color.red as i32
        + weights[1] * color.green as i32
        + weights[2] * color.blue as i32
        + offset;
    (sum / WEIGHT_SCALE).clamp(0, 255) as u8
}

impl From<&RGBColorFormat> for YCbCrColorFormat {
    fn from(value: &RGBColorFormat) -> Self {
        YCbCrColorFormat {
            luma: weighted_sum(value, [2990, 5870, 1140], 0),
            chroma_blue: weighted_sum(value, [-1690, -3310, 5000], CHROMA_OFFSET),
            chroma_red: weighted_sum(value, [5000, -4190, -810], CHROMA_OFFSET),
        }
    }
}

impl From<RGBColorFormat> for YCbCrColorFormat {
    fn from(value: RGBColorFormat) -> Self {
        YCbCrColorFormat::from(&value)
    }
}
