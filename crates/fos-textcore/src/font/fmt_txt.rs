//! Table-driven bitmap font
//!
//! Assembles glyph metrics from a font's descriptor table, cmap ranges and
//! kerning, and hands out glyph bitmaps, decompressing them when needed.

use super::bitmap::{decompress, BitmapFormat, Bpp};
use super::cmap::CmapRange;
use super::{
    Fixed4, GlyphDescriptor, GlyphId, GlyphLocator, GlyphMetrics, GlyphSource, KernScale,
    KerningTable,
};
use crate::{Result, TextError};

/// A bitmap font built from static tables
#[derive(Debug, Clone)]
pub struct FmtTxtFont<'a> {
    glyph_bitmap: &'a [u8],
    glyph_dsc: &'a [GlyphDescriptor],
    cmaps: &'a [CmapRange<'a>],
    kern: Option<KerningTable<'a>>,
    kern_scale: KernScale,
    bpp: Bpp,
    bitmap_format: BitmapFormat,
    line_height: i16,
    base_line: i16,
    locator: GlyphLocator,
}

impl<'a> FmtTxtFont<'a> {
    /// Create a font with plain bitmaps and no kerning.
    ///
    /// `glyph_dsc[0]` is never looked up; real glyphs start at index 1.
    pub fn new(
        glyph_bitmap: &'a [u8],
        glyph_dsc: &'a [GlyphDescriptor],
        cmaps: &'a [CmapRange<'a>],
        bpp: Bpp,
    ) -> Self {
        tracing::debug!(
            "Font with {} cmap ranges, {} glyphs, {:?}",
            cmaps.len(),
            glyph_dsc.len().saturating_sub(1),
            bpp
        );

        Self {
            glyph_bitmap,
            glyph_dsc,
            cmaps,
            kern: None,
            kern_scale: Fixed4::ONE,
            bpp,
            bitmap_format: BitmapFormat::Plain,
            line_height: 0,
            base_line: 0,
            locator: GlyphLocator::new(),
        }
    }

    /// Set kerning table and scale
    pub fn kerning(mut self, table: KerningTable<'a>, scale: KernScale) -> Self {
        self.kern = Some(table);
        self.kern_scale = scale;
        self
    }

    /// Set bitmap storage format
    pub fn bitmap_format(mut self, format: BitmapFormat) -> Self {
        self.bitmap_format = format;
        self
    }

    /// Set line height and baseline
    pub fn line_metrics(mut self, line_height: i16, base_line: i16) -> Self {
        self.line_height = line_height;
        self.base_line = base_line;
        self
    }

    pub fn bpp(&self) -> Bpp {
        self.bpp
    }

    pub fn format(&self) -> BitmapFormat {
        self.bitmap_format
    }

    pub fn line_height(&self) -> i16 {
        self.line_height
    }

    pub fn base_line(&self) -> i16 {
        self.base_line
    }

    /// Glyph id for a codepoint
    pub fn glyph_id(&self, cp: u32) -> GlyphId {
        self.locator.glyph_id(self.cmaps, cp)
    }

    fn descriptor(&self, id: GlyphId) -> Option<&'a GlyphDescriptor> {
        if !id.is_found() {
            return None;
        }
        self.glyph_dsc.get(id.0 as usize)
    }

    /// Assemble metrics for `cp`, kerned against `next` (0 for none)
    pub fn glyph_dsc(&self, cp: u32, next: u32) -> Option<GlyphMetrics> {
        let id = self.glyph_id(cp);
        let dsc = self.descriptor(id)?;

        let kern_value = match &self.kern {
            Some(table) => {
                let next_id = self.glyph_id(next);
                if next_id.is_found() {
                    table.value(id, next_id)
                } else {
                    0
                }
            }
            None => 0,
        };

        let kern = Fixed4::from_bits(kern_value as i32) * self.kern_scale;
        let adv_w = (dsc.adv_w + kern).round().clamp(0, u16::MAX as i32) as u16;

        Some(GlyphMetrics {
            adv_w,
            box_w: dsc.box_w as u16,
            box_h: dsc.box_h as u16,
            ofs_x: dsc.ofs_x as i16,
            ofs_y: dsc.ofs_y as i16,
            bpp: self.bpp.bits(),
        })
    }

    /// Advance of `cp` in pixels, 0 when the font lacks it
    pub fn glyph_width(&self, cp: u32, next: u32) -> u16 {
        self.glyph_dsc(cp, next).map_or(0, |metrics| metrics.adv_w)
    }

    /// Scratch bytes [`Self::glyph_bitmap`] needs for `cp`; 0 for plain fonts
    pub fn scratch_size(&self, cp: u32) -> usize {
        if !self.bitmap_format.is_compressed() {
            return 0;
        }
        let id = self.glyph_id(cp);
        self.descriptor(id)
            .map_or(0, |dsc| self.bpp.buffer_size(dsc.box_w as usize, dsc.box_h as usize))
    }

    /// Largest scratch size over all glyphs of the font
    pub fn max_scratch_size(&self) -> usize {
        if !self.bitmap_format.is_compressed() {
            return 0;
        }
        self.glyph_dsc
            .iter()
            .skip(1)
            .map(|dsc| self.bpp.buffer_size(dsc.box_w as usize, dsc.box_h as usize))
            .max()
            .unwrap_or(0)
    }

    /// Bitmap of `cp`, or `None` if the glyph is missing or has no pixels.
    ///
    /// Plain fonts return a slice of the font data. Compressed fonts decode
    /// into `scratch`, which must hold [`Self::scratch_size`] bytes.
    pub fn glyph_bitmap<'s>(&'s self, cp: u32, scratch: &'s mut [u8]) -> Option<&'s [u8]> {
        match self.try_glyph_bitmap(cp, scratch) {
            Ok(bitmap) if !bitmap.is_empty() => Some(bitmap),
            Ok(_) | Err(TextError::GlyphNotFound(_)) => None,
            Err(err) => {
                tracing::warn!("No bitmap for U+{:04X}: {}", cp, err);
                None
            }
        }
    }

    /// Bitmap of `cp`, reporting why it is unavailable
    pub fn try_glyph_bitmap<'s>(&'s self, cp: u32, scratch: &'s mut [u8]) -> Result<&'s [u8]> {
        let id = self.glyph_id(cp);
        let dsc = self.descriptor(id).ok_or(TextError::GlyphNotFound(cp))?;
        let (width, height) = (dsc.box_w as usize, dsc.box_h as usize);
        let start = dsc.bitmap_index as usize;

        if !self.bitmap_format.is_compressed() {
            let len = (width * height * self.bpp.bits() as usize).div_ceil(8);
            return self
                .glyph_bitmap
                .get(start..start + len)
                .ok_or(TextError::TruncatedBitmap(cp));
        }

        let needed = self.bpp.buffer_size(width, height);
        if needed == 0 {
            return Ok(&[]);
        }
        if scratch.len() < needed {
            return Err(TextError::BufferTooSmall {
                needed,
                actual: scratch.len(),
            });
        }

        let input = self
            .glyph_bitmap
            .get(start..)
            .ok_or(TextError::TruncatedBitmap(cp))?;
        decompress(
            input,
            &mut scratch[..needed],
            width,
            height,
            self.bpp,
            self.bitmap_format.is_prefiltered(),
        )?;
        tracing::trace!("Decompressed U+{:04X} ({}x{}, {} bytes)", cp, width, height, needed);

        let scratch: &'s [u8] = scratch;
        Ok(&scratch[..needed])
    }
}

impl GlyphSource for FmtTxtFont<'_> {
    fn glyph_metrics(&self, cp: u32, next: u32) -> Option<GlyphMetrics> {
        self.glyph_dsc(cp, next)
    }

    fn glyph_bitmap<'s>(&'s self, cp: u32, scratch: &'s mut [u8]) -> Option<&'s [u8]> {
        FmtTxtFont::glyph_bitmap(self, cp, scratch)
    }

    fn line_height(&self) -> i16 {
        self.line_height
    }

    fn base_line(&self) -> i16 {
        self.base_line
    }
}
