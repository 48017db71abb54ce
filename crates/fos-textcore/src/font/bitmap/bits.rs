//! MSB-first bit cursors

/// Reads values of up to 8 bits from a byte slice, most significant bit first
///
/// A read may straddle two bytes. Bits past the end of the slice read as zero.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Read `len` bits (1..=8) and advance
    #[inline]
    pub fn read(&mut self, len: u8) -> u8 {
        let value = read_bits(self.data, self.pos, len);
        self.pos += len as usize;
        value
    }

    /// Current bit position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

/// Writes values of up to 8 bits into a byte slice, most significant bit first
///
/// A single write never crosses a byte boundary; callers keep every write
/// aligned to its own width. Writes past the end of the slice are dropped.
#[derive(Debug)]
pub struct BitWriter<'a> {
    data: &'a mut [u8],
    pos: usize,
}

impl<'a> BitWriter<'a> {
    pub fn new(data: &'a mut [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Write the low `len` bits of `value` and advance
    #[inline]
    pub fn write(&mut self, len: u8, value: u8) {
        let byte_pos = self.pos >> 3;
        let end = (self.pos & 7) as u32 + len as u32;

        if let (Some(shift), Some(byte)) = (8u32.checked_sub(end), self.data.get_mut(byte_pos)) {
            let mask = (((1u16 << len) - 1) << shift) as u8;
            *byte = (*byte & !mask) | (((value as u16) << shift) as u8 & mask);
        }
        self.pos += len as usize;
    }

    /// Read back `len` bits already written at `bit_pos`
    #[inline]
    pub fn peek(&self, bit_pos: usize, len: u8) -> u8 {
        read_bits(self.data, bit_pos, len)
    }

    /// Current bit position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }
}

#[inline]
fn read_bits(data: &[u8], bit_pos: usize, len: u8) -> u8 {
    let len = len.min(8);
    let byte_pos = bit_pos >> 3;
    let hi = data.get(byte_pos).copied().unwrap_or(0) as u16;
    let lo = data.get(byte_pos + 1).copied().unwrap_or(0) as u16;
    let word = (hi << 8) | lo;

    let shift = 16 - (bit_pos & 7) as u32 - len as u32;
    let mask = (1u16 << len) - 1;
    ((word >> shift) & mask) as u8
}
