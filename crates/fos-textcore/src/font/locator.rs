//! Codepoint to glyph id lookup with a one-entry cache

use std::cell::Cell;

use super::cmap::{self, CmapRange};
use super::GlyphId;

/// Resolves codepoints through a font's range list
///
/// Text is usually drawn as runs of the same few characters, so the last
/// lookup is remembered. The cache lives in a [`Cell`], which keeps lookups
/// callable through `&self` but makes the locator `!Sync`.
#[derive(Debug, Default)]
pub struct GlyphLocator {
    last: Cell<Option<(u32, GlyphId)>>,
}

impl GlyphLocator {
    pub const fn new() -> Self {
        Self {
            last: Cell::new(None),
        }
    }

    /// Glyph for `cp`, or [`GlyphId::NOT_FOUND`]
    pub fn glyph_id(&self, cmaps: &[CmapRange<'_>], cp: u32) -> GlyphId {
        if cp == 0 {
            return GlyphId::NOT_FOUND;
        }

        if let Some((cached_cp, id)) = self.last.get() {
            if cached_cp == cp {
                return id;
            }
        }

        let id = cmap::lookup(cmaps, cp);
        self.last.set(Some((cp, id)));
        id
    }

    /// Forget the cached lookup
    pub fn reset(&self) {
        self.last.set(None);
    }
}

impl Clone for GlyphLocator {
    fn clone(&self) -> Self {
        Self {
            last: Cell::new(self.last.get()),
        }
    }
}
