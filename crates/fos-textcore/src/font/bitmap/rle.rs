//! Run-length decoding of glyph pixels
//!
//! Stream layout, all fields MSB-first and `bpp` bits wide unless noted:
//!
//! - a pixel value is emitted as read;
//! - the same value read twice in a row starts a repeat: from then on each
//!   `1` flag bit emits another copy, a `0` flag ends the run and is followed
//!   by the next value;
//! - after 11 `1` flags a 6-bit count follows. A non-zero count emits
//!   `count - 1` further copies before the next value is read, a zero count
//!   means the next value follows at once.

use super::bits::BitReader;
use super::Bpp;

/// Number of `1` flags after which a run switches to an explicit count
const MAX_FLAGS: u8 = 11;
const COUNT_BITS: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RleState {
    Single,
    Repeat,
    Counter,
}

/// Pulls one pixel value at a time out of a compressed glyph
#[derive(Debug, Clone)]
pub struct RleDecoder<'a> {
    reader: BitReader<'a>,
    bpp: u8,
    state: RleState,
    prev: u8,
    count: u8,
}

impl<'a> RleDecoder<'a> {
    pub fn new(input: &'a [u8], bpp: Bpp) -> Self {
        Self {
            reader: BitReader::new(input),
            bpp: bpp.bits(),
            state: RleState::Single,
            prev: 0,
            count: 0,
        }
    }

    /// Next pixel value, in source bit depth
    ///
    /// Never fails: once the input is exhausted zero bits are decoded.
    pub fn next_value(&mut self) -> u8 {
        match self.state {
            RleState::Single => {
                let at_start = self.reader.position() == 0;
                let value = self.reader.read(self.bpp);
                if !at_start && value == self.prev {
                    self.count = 0;
                    self.state = RleState::Repeat;
                }
                self.prev = value;
                value
            }
            RleState::Repeat => {
                let flag = self.reader.read(1);
                self.count += 1;
                if flag == 0 {
                    return self.fresh();
                }

                if self.count == MAX_FLAGS {
                    self.count = self.reader.read(COUNT_BITS);
                    if self.count == 0 {
                        return self.fresh();
                    }
                    self.state = RleState::Counter;
                }
                self.prev
            }
            RleState::Counter => {
                self.count -= 1;
                if self.count == 0 {
                    return self.fresh();
                }
                self.prev
            }
        }
    }

    /// Bits consumed so far
    pub fn position(&self) -> usize {
        self.reader.position()
    }

    fn fresh(&mut self) -> u8 {
        self.prev = self.reader.read(self.bpp);
        self.state = RleState::Single;
        self.prev
    }
}

/// Test-only encoder producing streams [`RleDecoder`] reads back.
#[cfg(test)]
pub(crate) mod encode {
    /// Longest run a single repeat can describe
    const MAX_RUN: usize = 12 + 63;

    struct BitSink {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl BitSink {
        fn put(&mut self, len: u8, value: u8) {
            for i in (0..len).rev() {
                if self.pos % 8 == 0 {
                    self.bytes.push(0);
                }
                if (value >> i) & 1 == 1 {
                    let last = self.bytes.len() - 1;
                    self.bytes[last] |= 0x80 >> (self.pos % 8);
                }
                self.pos += 1;
            }
        }
    }

    /// Compress row-major pixel values of `bits` depth.
    ///
    /// With `prefilter` every row after the first is XORed with the row
    /// above before run-length coding.
    pub(crate) fn compress(pixels: &[u8], width: usize, bits: u8, prefilter: bool) -> Vec<u8> {
        let values: Vec<u8> = if prefilter {
            pixels
                .iter()
                .enumerate()
                .map(|(i, &v)| if i >= width { v ^ pixels[i - width] } else { v })
                .collect()
        } else {
            pixels.to_vec()
        };

        let mut runs: Vec<(u8, usize)> = Vec::new();
        for &v in &values {
            match runs.last_mut() {
                Some((prev, len)) if *prev == v && *len < MAX_RUN => *len += 1,
                _ => runs.push((v, 1)),
            }
        }

        let mut sink = BitSink {
            bytes: Vec::new(),
            pos: 0,
        };
        for (index, &(value, len)) in runs.iter().enumerate() {
            let last = index + 1 == runs.len();
            sink.put(bits, value);
            if len == 1 {
                continue;
            }
            sink.put(bits, value);

            let rest = len - 2;
            if rest <= 10 {
                for _ in 0..rest {
                    sink.put(1, 1);
                }
                if !last {
                    sink.put(1, 0);
                }
            } else {
                for _ in 0..11 {
                    sink.put(1, 1);
                }
                sink.put(6, (len - 12) as u8);
            }
        }
        sink.bytes
    }
}
