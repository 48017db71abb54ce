//! Text encoding layer
//!
//! The bidi resolver never decodes multi-byte sequences on its own. It walks
//! text through a [`TextEncoding`], which owns the byte-level details.

/// Codepoint decoding over a byte buffer.
///
/// Cursors are byte offsets. Implementations must keep `advance` and
/// `step_back` symmetric: stepping back from the cursor `advance` produced
/// returns the same codepoint and the same starting offset.
pub trait TextEncoding {
    /// Decode the codepoint starting at `cursor` and move past it.
    ///
    /// Returns 0 (and leaves the cursor alone) at or after the end of `text`.
    fn advance(&self, text: &[u8], cursor: &mut usize) -> u32;

    /// Move `cursor` to the start of the previous codepoint and return it.
    ///
    /// Returns 0 when `cursor` is already at the start.
    fn step_back(&self, text: &[u8], cursor: &mut usize) -> u32;

    /// Byte length of the codepoint that starts at `bytes[0]`.
    fn encoded_size(&self, bytes: &[u8]) -> usize;

    /// Number of codepoints in `text`.
    fn codepoint_count(&self, text: &[u8]) -> usize {
        let mut cursor = 0;
        let mut count = 0;
        while cursor < text.len() {
            self.advance(text, &mut cursor);
            count += 1;
        }
        count
    }
}

/// UTF-8 text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8;

impl Utf8 {
    fn is_continuation(byte: u8) -> bool {
        byte & 0xC0 == 0x80
    }

    fn lead_len(byte: u8) -> usize {
        match byte {
            0x00..=0x7F => 1,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        }
    }

    /// Decode one sequence at the start of `bytes`.
    ///
    /// Malformed input decodes as a single byte so cursors always progress.
    fn decode(bytes: &[u8]) -> (u32, usize) {
        let lead = bytes[0];
        let len = Self::lead_len(lead);
        if len == 1 || bytes.len() < len || !bytes[1..len].iter().all(|&b| Self::is_continuation(b)) {
            return (lead as u32, 1);
        }

        let mut cp = match len {
            2 => (lead & 0x1F) as u32,
            3 => (lead & 0x0F) as u32,
            _ => (lead & 0x07) as u32,
        };
        for &b in &bytes[1..len] {
            cp = (cp << 6) | (b & 0x3F) as u32;
        }
        (cp, len)
    }
}

impl TextEncoding for Utf8 {
    fn advance(&self, text: &[u8], cursor: &mut usize) -> u32 {
        if *cursor >= text.len() {
            return 0;
        }
        let (cp, len) = Self::decode(&text[*cursor..]);
        *cursor += len;
        cp
    }

    fn step_back(&self, text: &[u8], cursor: &mut usize) -> u32 {
        if *cursor == 0 {
            return 0;
        }
        let end = (*cursor).min(text.len());

        // A sequence is at most 4 bytes: the lead plus 3 continuations
        let mut start = end - 1;
        while start > 0 && end - start < 4 && Self::is_continuation(text[start]) {
            start -= 1;
        }

        let (cp, len) = Self::decode(&text[start..end]);
        if start + len == end {
            *cursor = start;
            cp
        } else {
            *cursor = end - 1;
            text[end - 1] as u32
        }
    }

    fn encoded_size(&self, bytes: &[u8]) -> usize {
        match bytes.first() {
            None => 0,
            Some(_) => Self::decode(bytes).1,
        }
    }
}

/// Single-byte text, one codepoint per byte
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascii;

impl TextEncoding for Ascii {
    fn advance(&self, text: &[u8], cursor: &mut usize) -> u32 {
        match text.get(*cursor) {
            Some(&b) => {
                *cursor += 1;
                b as u32
            }
            None => 0,
        }
    }

    fn step_back(&self, text: &[u8], cursor: &mut usize) -> u32 {
        if *cursor == 0 {
            return 0;
        }
        *cursor -= 1;
        text.get(*cursor).map_or(0, |&b| b as u32)
    }

    fn encoded_size(&self, bytes: &[u8]) -> usize {
        usize::from(!bytes.is_empty())
    }

    fn codepoint_count(&self, text: &[u8]) -> usize {
        text.len()
    }
}
