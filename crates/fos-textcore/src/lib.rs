//! fOS Textcore - Text Primitives for Small Displays
//!
//! This crate provides the allocation-free text core of fOS embedded targets:
//! - Simplified bidirectional reordering with bracket pairing
//! - Logical/visual cursor position maps
//! - Compact bitmap fonts (cmap ranges, kerning, RLE-compressed glyphs)
//!
//! All output buffers are provided by the caller.

pub mod text;
#[cfg(feature = "bidi")]
pub mod bidi;
pub mod font;

pub use text::{Ascii, TextEncoding, Utf8};
#[cfg(feature = "bidi")]
pub use bidi::{BaseDirection, BidiConfig, BidiResolver, BidiRun, BracketStack, Direction, PositionEntry, TextAlign};
pub use font::{
    BitmapFormat, Bpp, CharacterMap, CmapRange, DecodeError, FmtTxtFont, GlyphDescriptor, GlyphId,
    GlyphMetrics, GlyphSource, KerningTable,
};

/// Text core error types
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Bitmap decoding failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("Glyph not found: U+{0:04X}")]
    GlyphNotFound(u32),

    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("Bitmap data truncated: U+{0:04X}")]
    TruncatedBitmap(u32),
}

pub type Result<T> = std::result::Result<T, TextError>;
