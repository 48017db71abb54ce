//! Character to glyph mapping
//!
//! A font carries an ordered list of codepoint ranges, each encoded in one of
//! four compact forms.

use super::GlyphId;

/// How the codepoints of one range map to glyph ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterMap<'a> {
    /// Every codepoint of the range has a glyph, in order
    ContiguousTiny,
    /// Every codepoint of the range has a glyph, offset through a table
    ContiguousFull { glyph_id_ofs: &'a [u8] },
    /// Sorted codepoint offsets, glyphs in the same order
    SparseTiny { unicode_list: &'a [u16] },
    /// Sorted codepoint offsets with a parallel glyph offset table
    SparseFull {
        unicode_list: &'a [u16],
        glyph_id_ofs: &'a [u8],
    },
}

/// One codepoint range of a font
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CmapRange<'a> {
    /// First codepoint of the range
    pub range_start: u32,
    /// Largest offset from `range_start` the range covers
    pub range_length: u16,
    /// Glyph id of the first glyph in the range
    pub glyph_id_start: u16,
    pub map: CharacterMap<'a>,
}

impl<'a> CmapRange<'a> {
    /// Offset of `cp` into the range, or `None` when outside.
    ///
    /// Codepoints below `range_start` wrap around to huge offsets and fall
    /// outside as well.
    pub fn offset_of(&self, cp: u32) -> Option<u32> {
        let rcp = cp.wrapping_sub(self.range_start);
        (rcp <= self.range_length as u32).then_some(rcp)
    }

    /// Glyph for the codepoint at offset `rcp` into this range.
    ///
    /// Returns [`GlyphId::NOT_FOUND`] when a sparse range has no entry.
    pub fn glyph_at(&self, rcp: u32) -> GlyphId {
        let start = self.glyph_id_start as u32;
        match self.map {
            CharacterMap::ContiguousTiny => GlyphId(start + rcp),
            CharacterMap::ContiguousFull { glyph_id_ofs } => match glyph_id_ofs.get(rcp as usize) {
                Some(&ofs) => GlyphId(start + ofs as u32),
                None => GlyphId::NOT_FOUND,
            },
            CharacterMap::SparseTiny { unicode_list } => match search(unicode_list, rcp) {
                Some(index) => GlyphId(start + index as u32),
                None => GlyphId::NOT_FOUND,
            },
            CharacterMap::SparseFull {
                unicode_list,
                glyph_id_ofs,
            } => match search(unicode_list, rcp).and_then(|index| glyph_id_ofs.get(index)) {
                Some(&ofs) => GlyphId(start + ofs as u32),
                None => GlyphId::NOT_FOUND,
            },
        }
    }
}

fn search(unicode_list: &[u16], rcp: u32) -> Option<usize> {
    let rcp = u16::try_from(rcp).ok()?;
    unicode_list.binary_search(&rcp).ok()
}

/// Look up `cp` in an ordered range list.
///
/// The first range containing the codepoint decides: a sparse range without
/// an entry for it yields [`GlyphId::NOT_FOUND`] without trying later ranges.
pub fn lookup(cmaps: &[CmapRange<'_>], cp: u32) -> GlyphId {
    cmaps
        .iter()
        .find_map(|range| range.offset_of(cp).map(|rcp| range.glyph_at(rcp)))
        .unwrap_or(GlyphId::NOT_FOUND)
}
