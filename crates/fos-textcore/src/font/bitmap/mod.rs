//! Glyph bitmaps
//!
//! Bitmaps are row-major, packed MSB-first at the font's bit depth with no
//! row padding. Compressed glyphs are run-length coded and optionally
//! XOR-prefiltered against the row above; [`decompress`] unpacks them into a
//! caller-provided buffer.

mod bits;
mod rle;

pub use bits::{BitReader, BitWriter};
pub use rle::RleDecoder;

#[cfg(test)]
pub(crate) use rle::encode;

use thiserror::Error;

/// Bits per pixel of a font's bitmaps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bpp {
    One,
    Two,
    /// Stored with 3 bits, unpacked to 4
    Three,
    Four,
    Eight,
}

impl Bpp {
    /// Source bit depth
    #[inline]
    pub const fn bits(self) -> u8 {
        match self {
            Bpp::One => 1,
            Bpp::Two => 2,
            Bpp::Three => 3,
            Bpp::Four => 4,
            Bpp::Eight => 8,
        }
    }

    /// Bit depth of decompressed output
    #[inline]
    pub const fn output_bits(self) -> u8 {
        match self {
            Bpp::Three => 4,
            other => other.bits(),
        }
    }

    /// Bytes needed for a decompressed `width` x `height` bitmap
    pub const fn buffer_size(self, width: usize, height: usize) -> usize {
        (width * height * self.output_bits() as usize).div_ceil(8)
    }
}

impl TryFrom<u8> for Bpp {
    type Error = DecodeError;

    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            1 => Ok(Bpp::One),
            2 => Ok(Bpp::Two),
            3 => Ok(Bpp::Three),
            4 => Ok(Bpp::Four),
            8 => Ok(Bpp::Eight),
            other => Err(DecodeError::UnsupportedBpp(other)),
        }
    }
}

/// How a font's glyph bitmaps are stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitmapFormat {
    #[default]
    Plain,
    /// Run-length coded, rows XOR-prefiltered
    Compressed,
    /// Run-length coded only
    CompressedNoPrefilter,
}

impl BitmapFormat {
    pub const fn is_compressed(self) -> bool {
        !matches!(self, BitmapFormat::Plain)
    }

    pub const fn is_prefiltered(self) -> bool {
        matches!(self, BitmapFormat::Compressed)
    }
}

/// Bitmap decoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("output buffer too small: need {needed} bytes, got {actual}")]
    OutputTooSmall { needed: usize, actual: usize },

    #[error("unsupported bit depth: {0}")]
    UnsupportedBpp(u8),
}

/// 3-bit values spread over the 4-bit range
const WIDEN_3BPP: [u8; 8] = [0, 2, 4, 6, 9, 11, 13, 15];

#[inline]
fn widen(bpp: Bpp, value: u8) -> u8 {
    match bpp {
        Bpp::Three => WIDEN_3BPP[(value & 7) as usize],
        _ => value,
    }
}

#[inline]
fn narrow(bpp: Bpp, value: u8) -> u8 {
    match bpp {
        Bpp::Three => WIDEN_3BPP
            .iter()
            .position(|&w| w == value)
            .map_or(0, |i| i as u8),
        _ => value,
    }
}

/// Decompress a run-length coded glyph of `width` x `height` pixels.
///
/// `out` receives the pixels packed at [`Bpp::output_bits`]; it must hold at
/// least [`Bpp::buffer_size`] bytes. With `prefilter` each row after the
/// first is XORed with the row above, which is read back from `out`.
pub fn decompress(
    input: &[u8],
    out: &mut [u8],
    width: usize,
    height: usize,
    bpp: Bpp,
    prefilter: bool,
) -> Result<(), DecodeError> {
    let needed = bpp.buffer_size(width, height);
    if out.len() < needed {
        return Err(DecodeError::OutputTooSmall {
            needed,
            actual: out.len(),
        });
    }

    let out_bits = bpp.output_bits();
    let row_bits = width * out_bits as usize;
    let mut decoder = RleDecoder::new(input, bpp);
    let mut writer = BitWriter::new(out);

    for y in 0..height {
        for _ in 0..width {
            let mut value = decoder.next_value();
            if prefilter && y > 0 {
                let above = writer.peek(writer.position() - row_bits, out_bits);
                value ^= narrow(bpp, above);
            }
            writer.write(out_bits, widen(bpp, value));
        }
    }
    Ok(())
}
