//! Compact bitmap fonts
//!
//! Fonts are plain tables, usually `static`, generated offline: codepoint
//! ranges, glyph descriptors, a bitmap blob and optional kerning.

pub mod bitmap;
mod cmap;
mod fixed_point;
mod fmt_txt;
mod kern;
mod locator;

pub use bitmap::{decompress, BitmapFormat, Bpp, DecodeError};
pub use cmap::{lookup, CharacterMap, CmapRange};
pub use fixed_point::Fixed4;
pub use fmt_txt::FmtTxtFont;
pub use kern::{KernClasses, KernPairs, KerningTable, PairIds};
pub use locator::GlyphLocator;

/// Index into a font's glyph descriptors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GlyphId(pub u32);

impl GlyphId {
    /// Never a real glyph; descriptor 0 is reserved
    pub const NOT_FOUND: GlyphId = GlyphId(0);

    #[inline]
    pub const fn is_found(self) -> bool {
        self.0 != 0
    }
}

/// Scale applied to kerning values, 1.0 leaves them as stored
pub type KernScale = Fixed4;

/// Stored per-glyph data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphDescriptor {
    /// Byte offset of the glyph's bitmap in the font's bitmap blob
    pub bitmap_index: u32,
    /// Advance width in 1/16 pixels
    pub adv_w: Fixed4,
    pub box_w: u8,
    pub box_h: u8,
    pub ofs_x: i8,
    pub ofs_y: i8,
}

impl GlyphDescriptor {
    /// Descriptor with an advance of `adv_w` whole pixels
    pub const fn new(bitmap_index: u32, adv_w: i32, box_w: u8, box_h: u8, ofs_x: i8, ofs_y: i8) -> Self {
        Self {
            bitmap_index,
            adv_w: Fixed4::from_i32(adv_w),
            box_w,
            box_h,
            ofs_x,
            ofs_y,
        }
    }
}

/// Glyph placement as handed to layout and drawing code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlyphMetrics {
    /// Advance in whole pixels, kerning included
    pub adv_w: u16,
    pub box_w: u16,
    pub box_h: u16,
    pub ofs_x: i16,
    pub ofs_y: i16,
    /// Bit depth of the bitmap the glyph renders from
    pub bpp: u8,
}

/// Anything layout code can pull glyphs from
pub trait GlyphSource {
    /// Metrics for `cp` followed by `next` (0 when there is none)
    fn glyph_metrics(&self, cp: u32, next: u32) -> Option<GlyphMetrics>;

    /// Pixels for `cp`, possibly decoded into `scratch`
    fn glyph_bitmap<'s>(&'s self, cp: u32, scratch: &'s mut [u8]) -> Option<&'s [u8]>;

    /// Distance between baselines
    fn line_height(&self) -> i16;

    /// Distance from the bottom of the line to the baseline
    fn base_line(&self) -> i16;
}
