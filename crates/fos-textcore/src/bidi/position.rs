//! Logical/visual position map entries

/// One slot of a position map
///
/// The low 15 bits hold a codepoint index in the other ordering, the top
/// bit is set when the codepoint was placed by a right-to-left run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct PositionEntry(u16);

impl PositionEntry {
    const RTL_FLAG: u16 = 0x8000;

    /// Largest position an entry can hold
    pub const MAX_POS: u16 = 0x7FFF;

    /// Create an entry. Positions above [`Self::MAX_POS`] are truncated.
    #[inline]
    pub const fn new(pos: usize, rtl: bool) -> Self {
        let pos = (pos as u16) & Self::MAX_POS;
        Self(if rtl { pos | Self::RTL_FLAG } else { pos })
    }

    /// Create from the raw 16-bit word
    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Raw 16-bit word
    #[inline]
    pub const fn to_bits(self) -> u16 {
        self.0
    }

    /// Position in the other ordering
    #[inline]
    pub const fn pos(self) -> u16 {
        self.0 & Self::MAX_POS
    }

    /// Check if the codepoint belongs to a right-to-left run
    #[inline]
    pub const fn is_rtl(self) -> bool {
        self.0 & Self::RTL_FLAG != 0
    }
}
