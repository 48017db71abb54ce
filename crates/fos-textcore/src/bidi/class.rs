//! Direction classes
//!
//! A four-way simplification of the Unicode bidi classes. Only Hebrew letters
//! and the right-to-left override are treated as RTL.

/// Direction class of a codepoint, or the resolved direction of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Left-to-right (strong)
    Ltr,
    /// Right-to-left (strong)
    Rtl,
    /// Spaces and punctuation, take the direction of their surroundings
    Neutral,
    /// ASCII digits, follow the run they appear in
    Weak,
}

impl Direction {
    /// Check if this is a strong direction
    pub fn is_strong(self) -> bool {
        matches!(self, Direction::Ltr | Direction::Rtl)
    }

    /// The other strong direction. Neutral and weak map to themselves.
    pub fn opposite(self) -> Self {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
            other => other,
        }
    }
}

/// Base direction requested for a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BaseDirection {
    Ltr,
    Rtl,
    /// Detect from the first strong codepoint
    #[default]
    Auto,
}

impl From<Direction> for BaseDirection {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Rtl => BaseDirection::Rtl,
            Direction::Ltr => BaseDirection::Ltr,
            Direction::Neutral | Direction::Weak => BaseDirection::Auto,
        }
    }
}

/// Right-to-left override control character
pub const RLO: u32 = 0x202E;

const HEBREW_LETTERS: std::ops::RangeInclusive<u32> = 0x05D0..=0x05EA;

const NEUTRALS: &[u8] = b" \t\n\r.,:;'\"`!?%/\\-=()[]{}<>@#&$|";

/// Classify a codepoint
pub fn classify(cp: u32) -> Direction {
    if is_rtl(cp) {
        Direction::Rtl
    } else if is_neutral(cp) {
        Direction::Neutral
    } else if is_weak(cp) {
        Direction::Weak
    } else {
        Direction::Ltr
    }
}

pub(crate) fn is_rtl(cp: u32) -> bool {
    HEBREW_LETTERS.contains(&cp) || cp == RLO
}

pub(crate) fn is_neutral(cp: u32) -> bool {
    cp < 0x80 && NEUTRALS.contains(&(cp as u8))
}

pub(crate) fn is_weak(cp: u32) -> bool {
    (b'0' as u32..=b'9' as u32).contains(&cp)
}

/// Characters kept in logical order together with digits when a run is reversed
pub(crate) fn is_number_part(cp: u32) -> bool {
    is_weak(cp) || matches!(cp, 0x2E | 0x2C | 0x24 | 0x25) // . , $ %
}
