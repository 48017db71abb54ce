//! Kerning
//!
//! Two table layouts: a sorted list of glyph pairs, or a matrix indexed by
//! left and right glyph classes. Both yield a signed 8-bit adjustment that
//! the font scales before adding it to the advance width.

use std::cmp::Ordering;

use super::GlyphId;

/// Sorted kerning pair keys, `[left, right]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairIds<'a> {
    /// Fonts with fewer than 256 glyphs
    Narrow(&'a [[u8; 2]]),
    Wide(&'a [[u16; 2]]),
}

/// Kerning by glyph pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernPairs<'a> {
    pub glyph_ids: PairIds<'a>,
    /// One value per key
    pub values: &'a [i8],
}

impl<'a> KernPairs<'a> {
    pub fn value(&self, left: GlyphId, right: GlyphId) -> i8 {
        let index = match self.glyph_ids {
            PairIds::Narrow(ids) => find_pair(ids, left, right),
            PairIds::Wide(ids) => find_pair(ids, left, right),
        };
        index
            .and_then(|i| self.values.get(i).copied())
            .unwrap_or(0)
    }
}

fn find_pair<T>(ids: &[[T; 2]], left: GlyphId, right: GlyphId) -> Option<usize>
where
    T: Copy + Ord + TryFrom<u32>,
{
    let left = T::try_from(left.0).ok()?;
    let right = T::try_from(right.0).ok()?;
    ids.binary_search_by(|pair| match pair[0].cmp(&left) {
        Ordering::Equal => pair[1].cmp(&right),
        other => other,
    })
    .ok()
}

/// Kerning by glyph class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernClasses<'a> {
    /// Class of each glyph on the left side, indexed by glyph id; 0 is none
    pub left_class_mapping: &'a [u8],
    pub right_class_mapping: &'a [u8],
    pub left_class_cnt: u8,
    pub right_class_cnt: u8,
    /// `left_class_cnt * right_class_cnt` values, row per left class
    pub class_pair_values: &'a [i8],
}

impl<'a> KernClasses<'a> {
    pub fn value(&self, left: GlyphId, right: GlyphId) -> i8 {
        let class_of = |mapping: &[u8], id: GlyphId| mapping.get(id.0 as usize).copied().unwrap_or(0);

        let left_class = class_of(self.left_class_mapping, left) as usize;
        let right_class = class_of(self.right_class_mapping, right) as usize;
        if left_class == 0 || right_class == 0 {
            return 0;
        }

        let index = (left_class - 1) * self.right_class_cnt as usize + (right_class - 1);
        self.class_pair_values.get(index).copied().unwrap_or(0)
    }
}

/// A font's kerning data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KerningTable<'a> {
    PairList(KernPairs<'a>),
    ClassMatrix(KernClasses<'a>),
}

impl<'a> KerningTable<'a> {
    /// Adjustment between two glyphs, 0 when the pair is not kerned
    pub fn value(&self, left: GlyphId, right: GlyphId) -> i8 {
        match self {
            KerningTable::PairList(pairs) => pairs.value(left, right),
            KerningTable::ClassMatrix(classes) => classes.value(left, right),
        }
    }
}
