//! Paragraph resolver
//!
//! Splits a paragraph into runs of one direction and writes them in visual
//! order. Nothing here allocates: output text, position maps and the bracket
//! stack all belong to the caller.

use std::ops::Range;

use tracing::trace;

use super::brackets::{mirror, BracketStack};
use super::class::{classify, is_number_part, is_weak, BaseDirection, Direction};
use super::position::PositionEntry;
use crate::text::{TextEncoding, Utf8};

/// Horizontal alignment of a block of text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlign {
    /// Left for LTR text, right for RTL text
    #[default]
    Auto,
    Left,
    Center,
    Right,
}

/// Bidi resolver configuration
#[derive(Debug, Clone, Default)]
pub struct BidiConfig {
    /// Direction used when a paragraph has no strong codepoint.
    /// `Auto` falls back to left-to-right.
    pub default_direction: BaseDirection,
}

impl BidiConfig {
    /// Set the fallback direction
    pub fn default_direction(mut self, direction: BaseDirection) -> Self {
        self.default_direction = direction;
        self
    }
}

/// A maximal span of one resolved direction within a paragraph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidiRun {
    /// Byte range in the paragraph
    pub bytes: Range<usize>,
    /// Codepoint range in the paragraph
    pub chars: Range<usize>,
    /// Resolved direction. `Neutral` only for a paragraph without any
    /// strong or weak codepoint, which is never reordered.
    pub direction: Direction,
    /// The run took the neutrals that trail it. Only runs in the base
    /// direction do.
    pub absorbed_neutrals: bool,
}

impl BidiRun {
    /// Check if the run is written reversed
    pub fn is_rtl(&self) -> bool {
        self.direction == Direction::Rtl
    }
}

/// Simplified bidi resolver
///
/// Generic over the text encoding so the same rules apply to UTF-8 and
/// single-byte text.
#[derive(Debug, Clone, Default)]
pub struct BidiResolver<E = Utf8> {
    encoding: E,
    config: BidiConfig,
}

impl BidiResolver<Utf8> {
    /// Create a resolver for UTF-8 text
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: TextEncoding> BidiResolver<E> {
    /// Create a resolver for another text encoding
    pub fn with_encoding(encoding: E) -> Self {
        Self {
            encoding,
            config: BidiConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: BidiConfig) -> Self {
        self.config = config;
        self
    }

    /// Current configuration
    pub fn config(&self) -> &BidiConfig {
        &self.config
    }

    /// The text encoding in use
    pub fn encoding(&self) -> &E {
        &self.encoding
    }

    /// Direction of the first strong codepoint, or the configured default
    pub fn detect_base_direction(&self, text: &[u8]) -> Direction {
        let mut cursor = 0;
        while cursor < text.len() {
            let dir = classify(self.encoding.advance(text, &mut cursor));
            if dir.is_strong() {
                return dir;
            }
        }

        match self.config.default_direction {
            BaseDirection::Rtl => Direction::Rtl,
            BaseDirection::Ltr | BaseDirection::Auto => Direction::Ltr,
        }
    }

    fn resolve_base(&self, text: &[u8], base: BaseDirection) -> Direction {
        match base {
            BaseDirection::Ltr => Direction::Ltr,
            BaseDirection::Rtl => Direction::Rtl,
            BaseDirection::Auto => self.detect_base_direction(text),
        }
    }

    /// Resolve `align` and `base` for a block of text.
    ///
    /// `Auto` direction is detected from the text; `Auto` alignment becomes
    /// `Right` for RTL text and `Left` otherwise.
    pub fn calculate_align(&self, align: TextAlign, base: BaseDirection, text: &[u8]) -> (TextAlign, Direction) {
        let dir = self.resolve_base(text, base);
        let align = match align {
            TextAlign::Auto if dir == Direction::Rtl => TextAlign::Right,
            TextAlign::Auto => TextAlign::Left,
            other => other,
        };
        (align, dir)
    }

    /// Iterate over the runs of one paragraph in logical order
    pub fn runs<'a, 's>(
        &'a self,
        text: &'a [u8],
        base: BaseDirection,
        stack: &'s mut BracketStack,
    ) -> Runs<'a, 's, E> {
        stack.clear();
        Runs {
            encoding: &self.encoding,
            text,
            base: self.resolve_base(text, base),
            stack,
            pos: 0,
            char_pos: 0,
            started: false,
        }
    }

    /// Reorder one paragraph from logical into visual order.
    ///
    /// `out` receives the reordered text and must be at least `text.len()`
    /// bytes. `position_map` receives, for each visual codepoint index, the
    /// logical index it came from and whether it was written right-to-left;
    /// it must hold one entry per codepoint. Either output may be skipped.
    ///
    /// Returns the number of runs.
    pub fn resolve_paragraph(
        &self,
        text: &[u8],
        base: BaseDirection,
        out: Option<&mut [u8]>,
        position_map: Option<&mut [PositionEntry]>,
        stack: &mut BracketStack,
    ) -> usize {
        let char_count = if position_map.is_some() {
            self.encoding.codepoint_count(text)
        } else {
            0
        };
        debug_assert!(out.as_ref().map_or(true, |o| o.len() >= text.len()));
        debug_assert!(position_map.as_ref().map_or(true, |m| m.len() >= char_count));
        debug_assert!(char_count <= PositionEntry::MAX_POS as usize + 1);

        let runs = self.runs(text, base, stack);
        let rtl_base = runs.base == Direction::Rtl;
        let mut writer = RunWriter {
            encoding: &self.encoding,
            out,
            map: position_map,
            rtl_base,
            wr: if rtl_base { text.len() } else { 0 },
            map_wr: if rtl_base { char_count } else { 0 },
        };

        let mut count = 0;
        for run in runs {
            writer.place(text, &run);
            count += 1;
        }

        trace!("Resolved bidi paragraph: {} bytes, {} runs, rtl base {}", text.len(), count, rtl_base);
        count
    }

    /// Reorder multi-paragraph text.
    ///
    /// Paragraphs end at `\n` or `\r`; the breaks are copied in place. Each
    /// paragraph is resolved on its own, so `Auto` is detected per paragraph.
    /// Returns the number of paragraphs.
    pub fn process(&self, text: &[u8], out: &mut [u8], base: BaseDirection) -> usize {
        debug_assert!(out.len() >= text.len());

        let mut stack = BracketStack::new();
        let mut paragraphs = 0;
        let mut pos = 0;
        while pos < text.len() {
            let mut next = pos;
            let cp = self.encoding.advance(text, &mut next);
            if is_paragraph_break(cp) {
                out[pos..next].copy_from_slice(&text[pos..next]);
                pos = next;
                continue;
            }

            let start = pos;
            let mut end = next;
            while end < text.len() {
                let mut peek = end;
                if is_paragraph_break(self.encoding.advance(text, &mut peek)) {
                    break;
                }
                end = peek;
            }

            self.resolve_paragraph(&text[start..end], base, Some(&mut out[start..end]), None, &mut stack);
            paragraphs += 1;
            pos = end;
        }
        paragraphs
    }

    /// Logical codepoint index shown at `visual_pos`, and whether it sits in
    /// a right-to-left run. `map` is scratch space, one entry per codepoint;
    /// `None` if it is too short or `visual_pos` is out of range.
    pub fn logical_pos(
        &self,
        text: &[u8],
        base: BaseDirection,
        visual_pos: usize,
        map: &mut [PositionEntry],
    ) -> Option<(usize, bool)> {
        let map = self.fill_map(text, base, map)?;
        map.get(visual_pos).map(|e| (e.pos() as usize, e.is_rtl()))
    }

    /// Visual codepoint index of the logical `logical_pos`, and whether it
    /// sits in a right-to-left run. `map` is scratch space, one entry per
    /// codepoint.
    pub fn visual_pos(
        &self,
        text: &[u8],
        base: BaseDirection,
        logical_pos: usize,
        map: &mut [PositionEntry],
    ) -> Option<(usize, bool)> {
        let map = self.fill_map(text, base, map)?;
        map.iter()
            .position(|e| e.pos() as usize == logical_pos)
            .map(|i| (i, map[i].is_rtl()))
    }

    fn fill_map<'m>(
        &self,
        text: &[u8],
        base: BaseDirection,
        map: &'m mut [PositionEntry],
    ) -> Option<&'m [PositionEntry]> {
        let count = self.encoding.codepoint_count(text);
        let map = map.get_mut(..count)?;
        let mut stack = BracketStack::new();
        self.resolve_paragraph(text, base, None, Some(&mut *map), &mut stack);
        let map: &'m [PositionEntry] = map;
        Some(map)
    }
}

fn is_paragraph_break(cp: u32) -> bool {
    cp == '\n' as u32 || cp == '\r' as u32
}

/// Iterator over the runs of a paragraph, see [`BidiResolver::runs`]
pub struct Runs<'a, 's, E> {
    encoding: &'a E,
    text: &'a [u8],
    base: Direction,
    stack: &'s mut BracketStack,
    pos: usize,
    char_pos: usize,
    started: bool,
}

impl<E: TextEncoding> Runs<'_, '_, E> {
    /// Resolved base direction of the paragraph
    pub fn base_direction(&self) -> Direction {
        self.base
    }

    fn direction_at(&mut self, cp: u32, next_pos: usize) -> Direction {
        match classify(cp) {
            Direction::Neutral => self.stack.resolve(self.encoding, self.text, next_pos, cp, self.base),
            dir => dir,
        }
    }

    fn all_neutral(&self) -> bool {
        let mut cursor = 0;
        while cursor < self.text.len() {
            if classify(self.encoding.advance(self.text, &mut cursor)) != Direction::Neutral {
                return false;
            }
        }
        true
    }

    /// Neutral and weak codepoints before the first strong one
    fn prefix(&mut self) -> (usize, usize) {
        let mut i = 0;
        let mut chars = 0;
        while i < self.text.len() {
            let mut next = i;
            let cp = self.encoding.advance(self.text, &mut next);
            if self.direction_at(cp, next).is_strong() {
                break;
            }
            i = next;
            chars += 1;
        }
        (i, chars)
    }

    /// Direction, byte length and codepoint count of the run at `self.pos`
    fn next_run(&mut self) -> (Direction, usize, usize) {
        let start = self.pos;
        let len = self.text.len();
        let mut i = start;
        let mut chars = 0;

        let run_dir = loop {
            if i >= len {
                return (self.base, i - start, chars);
            }
            let cp = self.encoding.advance(self.text, &mut i);
            chars += 1;
            let dir = self.direction_at(cp, i);
            if dir.is_strong() {
                break dir;
            }
        };

        let (mut prev, mut prev_chars) = (i, chars);
        let (mut last_strong, mut last_strong_chars) = (i, chars);
        while i < len {
            let cp = self.encoding.advance(self.text, &mut i);
            chars += 1;
            let dir = match self.direction_at(cp, i) {
                Direction::Weak => run_dir,
                dir => dir,
            };

            if dir.is_strong() && dir != run_dir {
                break;
            }
            if dir != Direction::Neutral {
                last_strong = i;
                last_strong_chars = chars;
            }
            prev = i;
            prev_chars = chars;
        }

        // Trailing neutrals stay with a base-direction run, otherwise they
        // open the next run
        if run_dir == self.base {
            (run_dir, prev - start, prev_chars)
        } else {
            (run_dir, last_strong - start, last_strong_chars)
        }
    }

    fn take(&mut self, len: usize, chars: usize, direction: Direction) -> BidiRun {
        let run = BidiRun {
            bytes: self.pos..self.pos + len,
            chars: self.char_pos..self.char_pos + chars,
            direction,
            absorbed_neutrals: direction == self.base,
        };
        self.pos += len;
        self.char_pos += chars;
        run
    }
}

impl<E: TextEncoding> Iterator for Runs<'_, '_, E> {
    type Item = BidiRun;

    fn next(&mut self) -> Option<BidiRun> {
        if !self.started {
            self.started = true;
            if self.text.is_empty() {
                return None;
            }
            if self.all_neutral() {
                let chars = self.encoding.codepoint_count(self.text);
                return Some(self.take(self.text.len(), chars, Direction::Neutral));
            }
            let (len, chars) = self.prefix();
            if len > 0 {
                let base = self.base;
                return Some(self.take(len, chars, base));
            }
        }

        if self.pos >= self.text.len() {
            return None;
        }
        let (dir, len, chars) = self.next_run();
        Some(self.take(len, chars, dir))
    }
}

/// Places runs into the output buffers. With an RTL base the buffers fill
/// from the end.
struct RunWriter<'e, 'o, 'm, E> {
    encoding: &'e E,
    out: Option<&'o mut [u8]>,
    map: Option<&'m mut [PositionEntry]>,
    rtl_base: bool,
    wr: usize,
    map_wr: usize,
}

impl<E: TextEncoding> RunWriter<'_, '_, '_, E> {
    fn place(&mut self, text: &[u8], run: &BidiRun) {
        let len = run.bytes.len();
        let chars = run.chars.len();
        // The map cursor starts at 0 when there is no map to fill
        let map_step = if self.map.is_some() { chars } else { 0 };
        let (wr, map_wr) = if self.rtl_base {
            self.wr -= len;
            self.map_wr -= map_step;
            (self.wr, self.map_wr)
        } else {
            let at = (self.wr, self.map_wr);
            self.wr += len;
            self.map_wr += map_step;
            at
        };

        let src = &text[run.bytes.clone()];
        let dest = self.out.as_deref_mut().map(|o| &mut o[wr..wr + len]);
        let map = self.map.as_deref_mut().map(|m| &mut m[map_wr..map_wr + chars]);

        if run.is_rtl() {
            reverse_run(self.encoding, src, dest, map, run.chars.start, chars);
        } else {
            if let Some(dest) = dest {
                dest.copy_from_slice(src);
            }
            if let Some(map) = map {
                fill_forward(map, run.chars.start);
            }
        }
    }
}

fn fill_forward(map: &mut [PositionEntry], first: usize) {
    for (i, slot) in map.iter_mut().enumerate() {
        *slot = PositionEntry::new(first + i, false);
    }
}

/// Write `src` reversed. Digit groups (with their `.,$%`) keep logical order
/// and single-byte brackets are mirrored.
fn reverse_run<E: TextEncoding>(
    encoding: &E,
    src: &[u8],
    mut dest: Option<&mut [u8]>,
    mut map: Option<&mut [PositionEntry]>,
    first_char: usize,
    char_count: usize,
) {
    let mut i = src.len();
    let mut ci = char_count;
    let mut wr = 0;
    let mut map_wr = 0;

    while i > 0 {
        let end = i;
        let cp = encoding.step_back(src, &mut i);
        ci -= 1;

        if is_weak(cp) {
            let last_ci = ci;
            while i > 0 {
                let mut j = i;
                if !is_number_part(encoding.step_back(src, &mut j)) {
                    break;
                }
                i = j;
                ci -= 1;
            }

            let n = end - i;
            let count = last_ci - ci + 1;
            if let Some(dest) = dest.as_deref_mut() {
                dest[wr..wr + n].copy_from_slice(&src[i..end]);
            }
            if let Some(map) = map.as_deref_mut() {
                fill_forward(&mut map[map_wr..map_wr + count], first_char + ci);
            }
            wr += n;
            map_wr += count;
        } else {
            let size = encoding.encoded_size(&src[i..end]);
            if let Some(dest) = dest.as_deref_mut() {
                if size == 1 {
                    dest[wr] = mirror(cp) as u8;
                } else {
                    dest[wr..wr + size].copy_from_slice(&src[i..i + size]);
                }
            }
            if let Some(map) = map.as_deref_mut() {
                map[map_wr] = PositionEntry::new(first_char + ci, true);
            }
            wr += size;
            map_wr += 1;
        }
    }
}
