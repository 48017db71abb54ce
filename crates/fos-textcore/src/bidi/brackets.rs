//! Bracket pairs
//!
//! Opening brackets look ahead for their partner and take the direction of
//! what they enclose, so a bracketed phrase reverses as one unit.

use super::class::{classify, Direction};
use crate::text::TextEncoding;

/// Maximum nesting depth of tracked bracket pairs
pub const BRACKET_DEPTH: usize = 4;

const OPENING: &[u8; 4] = b"<({[";
const CLOSING: &[u8; 4] = b">)}]";

/// Swap a bracket with its partner. Everything else is returned unchanged.
pub fn mirror(cp: u32) -> u32 {
    if let Some(i) = OPENING.iter().position(|&b| b as u32 == cp) {
        CLOSING[i] as u32
    } else if let Some(i) = CLOSING.iter().position(|&b| b as u32 == cp) {
        OPENING[i] as u32
    } else {
        cp
    }
}

fn closing_of(cp: u32) -> Option<u32> {
    OPENING
        .iter()
        .position(|&b| b as u32 == cp)
        .map(|i| CLOSING[i] as u32)
}

fn is_closing(cp: u32) -> bool {
    CLOSING.iter().any(|&b| b as u32 == cp)
}

#[derive(Debug, Clone, Copy)]
struct BracketEntry {
    /// Byte offset just past the opening bracket
    open_end: usize,
    close: u32,
    dir: Direction,
}

/// Open bracket pairs of the paragraph being resolved
///
/// Owned by the caller and valid for one resolve call. Holds at most
/// [`BRACKET_DEPTH`] pairs; deeper opening brackets are treated as plain
/// neutral characters.
#[derive(Debug, Clone)]
pub struct BracketStack {
    entries: [Option<BracketEntry>; BRACKET_DEPTH],
    len: usize,
    /// Opening brackets dropped because the stack was full
    overflow: usize,
    /// End of the furthest bracket already counted in `overflow`
    seen_to: usize,
    /// Last closing bracket consumed, so a rescan resolves it the same way
    last_closed: Option<(usize, Direction)>,
}

impl BracketStack {
    /// Create an empty stack
    pub const fn new() -> Self {
        Self {
            entries: [None; BRACKET_DEPTH],
            len: 0,
            overflow: 0,
            seen_to: 0,
            last_closed: None,
        }
    }

    /// Forget every open pair
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Number of open pairs
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if no pair is open
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if further opening brackets would be ignored
    pub fn is_full(&self) -> bool {
        self.len == BRACKET_DEPTH
    }

    fn top(&self) -> Option<BracketEntry> {
        self.len.checked_sub(1).and_then(|i| self.entries[i])
    }

    fn push(&mut self, entry: BracketEntry) {
        debug_assert!(!self.is_full());
        self.entries[self.len] = Some(entry);
        self.len += 1;
    }

    fn pop(&mut self) -> Option<BracketEntry> {
        let top = self.top()?;
        self.len -= 1;
        self.entries[self.len] = None;
        Some(top)
    }

    /// Resolve the direction of the neutral `cp` that ends at `next_pos`.
    ///
    /// Opening brackets take the base direction if the enclosed text holds a
    /// base-direction letter, the opposite direction if it only holds
    /// opposite letters, and otherwise the nearest strong letter before the
    /// bracket (or the base direction when there is none). Closing brackets
    /// repeat the direction of their opening partner. Anything else, and
    /// brackets without a partner, stay neutral.
    pub(crate) fn resolve<E: TextEncoding>(
        &mut self,
        encoding: &E,
        text: &[u8],
        next_pos: usize,
        cp: u32,
        base: Direction,
    ) -> Direction {
        if let Some(close) = closing_of(cp) {
            return self.open(encoding, text, next_pos, cp, close, base);
        }

        if !is_closing(cp) {
            return Direction::Neutral;
        }

        if let Some((pos, dir)) = self.last_closed {
            if pos == next_pos {
                return dir;
            }
        }

        // Already paired with a dropped opener on an earlier pass
        if next_pos <= self.seen_to {
            return Direction::Neutral;
        }

        if self.overflow > 0 {
            self.overflow -= 1;
            self.seen_to = next_pos;
            return Direction::Neutral;
        }

        match self.top() {
            Some(top) if top.close == cp => {
                self.pop();
                self.last_closed = Some((next_pos, top.dir));
                top.dir
            }
            _ => Direction::Neutral,
        }
    }

    fn open<E: TextEncoding>(
        &mut self,
        encoding: &E,
        text: &[u8],
        next_pos: usize,
        open: u32,
        close: u32,
        base: Direction,
    ) -> Direction {
        // The same bracket is seen again when a run ends on it
        if let Some(top) = self.top() {
            if top.open_end == next_pos {
                return top.dir;
            }
        }

        if self.is_full() {
            if next_pos > self.seen_to {
                self.overflow += 1;
                self.seen_to = next_pos;
            }
            return Direction::Neutral;
        }

        let mut i = next_pos;
        let mut depth = 0usize;
        let mut matched = false;
        let mut has_base = false;
        let mut has_opposite = false;
        while i < text.len() {
            let c = encoding.advance(text, &mut i);
            if c == open {
                depth += 1;
            } else if c == close {
                if depth == 0 {
                    matched = true;
                    break;
                }
                depth -= 1;
            } else {
                let dir = classify(c);
                if dir == base {
                    has_base = true;
                } else if dir.is_strong() {
                    has_opposite = true;
                }
            }
        }

        if !matched {
            return Direction::Neutral;
        }

        let dir = if has_base {
            base
        } else if has_opposite {
            base.opposite()
        } else {
            let mut start = next_pos;
            encoding.step_back(text, &mut start);
            strong_before(encoding, text, start).unwrap_or(base)
        };

        self.push(BracketEntry {
            open_end: next_pos,
            close,
            dir,
        });
        dir
    }
}

impl Default for BracketStack {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction of the nearest strong codepoint before `pos`
fn strong_before<E: TextEncoding>(encoding: &E, text: &[u8], mut pos: usize) -> Option<Direction> {
    while pos > 0 {
        let dir = classify(encoding.step_back(text, &mut pos));
        if dir.is_strong() {
            return Some(dir);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Utf8;

    fn resolve_at(stack: &mut BracketStack, text: &str, index: usize, base: Direction) -> Direction {
        let bytes = text.as_bytes();
        let cp = bytes[index] as u32;
        stack.resolve(&Utf8, bytes, index + 1, cp, base)
    }

    #[test]
    fn test_mirror() {
        assert_eq!(mirror('(' as u32), ')' as u32);
        assert_eq!(mirror(']' as u32), '[' as u32);
        assert_eq!(mirror('<' as u32), '>' as u32);
        assert_eq!(mirror('a' as u32), 'a' as u32);
    }

    #[test]
    fn test_bracket_takes_base_direction_of_content() {
        let mut stack = BracketStack::new();
        assert_eq!(resolve_at(&mut stack, "x(ab)", 1, Direction::Ltr), Direction::Ltr);
        assert_eq!(stack.len(), 1);
        assert_eq!(resolve_at(&mut stack, "x(ab)", 4, Direction::Ltr), Direction::Ltr);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_bracket_takes_opposite_content() {
        let mut stack = BracketStack::new();
        let text = "a(\u{05D0})";
        let close_at = text.len() - 1;
        assert_eq!(resolve_at(&mut stack, text, 1, Direction::Ltr), Direction::Rtl);
        assert_eq!(resolve_at(&mut stack, text, close_at, Direction::Ltr), Direction::Rtl);
    }

    #[test]
    fn test_bracket_without_strong_content_looks_back() {
        let mut stack = BracketStack::new();
        let text = "\u{05D0} (12)";
        let open_at = text.find('(').unwrap();
        assert_eq!(resolve_at(&mut stack, text, open_at, Direction::Ltr), Direction::Rtl);

        let mut stack = BracketStack::new();
        assert_eq!(resolve_at(&mut stack, "(1)", 0, Direction::Rtl), Direction::Rtl);
    }

    #[test]
    fn test_unmatched_bracket_is_neutral() {
        let mut stack = BracketStack::new();
        assert_eq!(resolve_at(&mut stack, "a(bc", 1, Direction::Ltr), Direction::Neutral);
        assert!(stack.is_empty());
        assert_eq!(resolve_at(&mut stack, "ab)", 2, Direction::Ltr), Direction::Neutral);
    }

    #[test]
    fn test_rescan_returns_cached_direction() {
        let mut stack = BracketStack::new();
        let text = "(a)";
        assert_eq!(resolve_at(&mut stack, text, 0, Direction::Ltr), Direction::Ltr);
        assert_eq!(resolve_at(&mut stack, text, 0, Direction::Ltr), Direction::Ltr);
        assert_eq!(stack.len(), 1);
        assert_eq!(resolve_at(&mut stack, text, 2, Direction::Ltr), Direction::Ltr);
        assert_eq!(resolve_at(&mut stack, text, 2, Direction::Ltr), Direction::Ltr);
        assert!(stack.is_empty());
    }

    #[test]
    fn test_overflow_degrades_to_neutral() {
        let text = "(((((a)))))";
        let mut stack = BracketStack::new();
        for i in 0..BRACKET_DEPTH {
            assert_eq!(resolve_at(&mut stack, text, i, Direction::Ltr), Direction::Ltr);
        }
        assert!(stack.is_full());
        assert_eq!(resolve_at(&mut stack, text, 4, Direction::Ltr), Direction::Neutral);
        // The innermost closing bracket pairs with the ignored opener
        assert_eq!(resolve_at(&mut stack, text, 6, Direction::Ltr), Direction::Neutral);
        assert_eq!(resolve_at(&mut stack, text, 7, Direction::Ltr), Direction::Ltr);
        assert_eq!(stack.len(), BRACKET_DEPTH - 1);
    }

    #[test]
    fn test_overflow_counted_once_on_rescan() {
        let text = "(((((a)))))";
        let mut stack = BracketStack::new();
        for i in 0..BRACKET_DEPTH {
            resolve_at(&mut stack, text, i, Direction::Ltr);
        }
        assert_eq!(resolve_at(&mut stack, text, 4, Direction::Ltr), Direction::Neutral);
        assert_eq!(resolve_at(&mut stack, text, 4, Direction::Ltr), Direction::Neutral);
        assert_eq!(resolve_at(&mut stack, text, 6, Direction::Ltr), Direction::Neutral);
        assert_eq!(resolve_at(&mut stack, text, 6, Direction::Ltr), Direction::Neutral);
        assert_eq!(stack.len(), BRACKET_DEPTH);
        assert_eq!(resolve_at(&mut stack, text, 7, Direction::Ltr), Direction::Ltr);
        assert_eq!(stack.len(), BRACKET_DEPTH - 1);
    }

    #[test]
    fn test_nested_brackets_match_their_own_partner() {
        let text = "((\u{05D0}) b)";
        let mut stack = BracketStack::new();
        // Outer pair contains the LTR 'b', inner pair only the Hebrew letter
        assert_eq!(resolve_at(&mut stack, text, 0, Direction::Ltr), Direction::Ltr);
        assert_eq!(resolve_at(&mut stack, text, 1, Direction::Ltr), Direction::Rtl);
    }
}
