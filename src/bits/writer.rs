/// Bit-level writer for codec output
///
/// Bits are packed MSB-first: the first bit written lands in bit 7 of the
/// first byte.
pub struct BitWriter {
    /// Accumulated output bytes
    output: Vec<u8>,
    /// Current byte being built
    current_byte: u8,
    /// Bits written to current byte (0-7)
    bits_in_byte: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self { output: Vec::new(), current_byte: 0, bits_in_byte: 0 }
    }

    /// Append a single bit
    #[inline]
    pub fn write_bit(&mut self, bit: bool) {
        self.current_byte |= (bit as u8) << (7 - self.bits_in_byte);
        self.bits_in_byte += 1;
        if self.bits_in_byte == 8 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    /// Write the low `n` bits (0-64) of `value`, most significant first
    pub fn write_bits(&mut self, value: u64, n: u8) {
        debug_assert!(n <= 64);

        if self.bits_in_byte == 0 && n % 8 == 0 {
            // Aligned fast path
            for i in (0..n / 8).rev() {
                self.output.push((value >> (i * 8)) as u8);
            }
            return;
        }

        for i in (0..n).rev() {
            self.write_bit((value >> i) & 1 == 1);
        }
    }

    /// Write a full byte (need not be aligned)
    #[inline]
    pub fn write_byte(&mut self, byte: u8) {
        self.write_bits(byte as u64, 8);
    }

    /// Pad to byte boundary with zero bits
    pub fn align_to_byte(&mut self) {
        if self.bits_in_byte > 0 {
            self.output.push(self.current_byte);
            self.current_byte = 0;
            self.bits_in_byte = 0;
        }
    }

    /// Take the completed bytes, leaving any partial byte in place
    ///
    /// Lets a codec flush output to a sink while it keeps writing bits.
    pub fn drain_complete(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Finish and return the output bytes
    pub fn finish(mut self) -> Vec<u8> {
        self.align_to_byte();
        self.output
    }

    /// Get current output length in bytes (including partial byte)
    pub fn len(&self) -> usize {
        self.output.len() + if self.bits_in_byte > 0 { 1 } else { 0 }
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.output.is_empty() && self.bits_in_byte == 0
    }

    /// Total bits written so far
    pub fn bit_len(&self) -> u64 {
        self.output.len() as u64 * 8 + self.bits_in_byte as u64
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
