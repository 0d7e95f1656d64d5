use super::transformer::frequency_block::FrequencyBlock;
use super::Component;
use crate::error::Error;
use crate::Result;

// Tables from JPEG Annex K, row-major with the vertical frequency in the row
#[rustfmt::skip]
pub const LUMINANCE_BASE_TABLE: [u8; 64] = [
    16,  11,  10,  16,  24,  40,  51,  61,
    12,  12,  14,  19,  26,  58,  60,  55,
    14,  13,  16,  24,  40,  57,  69,  56,
    14,  17,  22,  29,  51,  87,  80,  62,
    18,  22,  37,  56,  68, 109, 103,  77,
    24,  35,  55,  64,  81, 104, 113,  92,
    49,  64,  78,  87, 103, 121, 120, 101,
    72,  92,  95,  98, 112, 100, 103,  99,
];

#[rustfmt::skip]
pub const CHROMINANCE_BASE_TABLE: [u8; 64] = [
    17,  18,  24,  47,  99,  99,  99,  99,
    18,  21,  26,  66,  99,  99,  99,  99,
    24,  26,  56,  99,  99,  99,  99,  99,
    47,  66,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
    99,  99,  99,  99,  99,  99,  99,  99,
];

/// Compression quality within `1..=100`, higher values keep more detail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quality(u8);

impl Quality {
    pub const MIN: Quality = Quality(1);
    pub const MAX: Quality = Quality(100);
    pub const DEFAULT: Quality = Quality(75);

    /// Falls back to [`Quality::DEFAULT`] for out of range values.
    pub fn or_default(value: u8) -> Self {
        Self::try_from(value).unwrap_or_else(|e| {
            log::warn!("{}, using quality {} instead", e, Self::DEFAULT.0);
            Self::DEFAULT
        })
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    fn scale_factor(&self) -> f64 {
        let quality = self.0 as f64;
        if self.0 < 50 {
            50.0 / quality
        } else {
            2.0 - quality / 50.0
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u8> for Quality {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(Error::InvalidQuality(value))
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantizationTable {
    values: [u8; 64],
}

impl QuantizationTable {
    /// Scales every entry of `base` by the quality factor, truncating and
    /// clamping to `1..=255`.
    pub fn scaled(base: &[u8; 64], quality: Quality) -> Self {
        let scale = quality.scale_factor();
        let values = base.map(|entry| ((entry as f64 * scale) as i64).clamp(1, 255) as u8);
        Self { values }
    }

    pub fn values(&self) -> &[u8; 64] {
        &self.values
    }

    /// Entries in the order they are stored in a DQT segment.
    pub fn zig_zag_values(&self) -> [u8; 64] {
        FrequencyBlock::new(self.values).to_zig_zag()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QuantizationTablePair {
    pub luminance: QuantizationTable,
    pub chrominance: QuantizationTable,
}

impl QuantizationTablePair {
    pub fn for_quality(quality: Quality) -> Self {
        Self {
            luminance: QuantizationTable::scaled(&LUMINANCE_BASE_TABLE, quality),
            chrominance: QuantizationTable::scaled(&CHROMINANCE_BASE_TABLE, quality),
        }
    }

    pub fn for_component(&self, component: Component) -> &QuantizationTable {
        match component {
            Component::Luma => &self.luminance,
            Component::ChromaBlue | Component::ChromaRed => &self.chrominance,
        }
    }
}
