//! One's-complement record checksum
//!
//! Both directions of the codec share this accumulator. The S-record
//! checksum is the one's complement of the low 8 bits of the sum of every
//! record byte after the type field: count, the two address bytes, then
//! the payload. Verification requires the sum including the transmitted
//! checksum byte to equal 0xFF modulo 256.

/// Running checksum accumulator
#[derive(Debug, Clone, Copy, Default)]
pub struct Checksum {
    sum: u32,
}

impl Checksum {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self { sum: 0 }
    }

    /// Accumulate one byte
    pub fn add(&mut self, byte: u8) {
        self.sum = self.sum.wrapping_add(u32::from(byte));
    }

    /// Accumulate a 16-bit word, high byte then low byte
    pub fn add_word(&mut self, word: u16) {
        self.add((word >> 8) as u8);
        self.add(word as u8);
    }

    /// One's complement of the low 8 bits of the sum. Used on encode.
    pub fn finish(&self) -> u8 {
        !(self.sum as u8)
    }

    /// Check a transmitted checksum byte against the accumulated sum.
    /// Used on decode.
    pub fn verify(&self, received: u8) -> bool {
        self.sum.wrapping_add(u32::from(received)) & 0xFF == 0xFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_known_values() {
        // Empty sum
        assert_eq!(Checksum::new().finish(), 0xFF);

        // Null transfer address record: count 3, address 0000 -> FC
        let mut ck = Checksum::new();
        ck.add(0x03);
        ck.add_word(0x0000);
        assert_eq!(ck.finish(), 0xFC);

        // S1 record: count 06, address 1000, payload AA BB CC
        let mut ck = Checksum::new();
        ck.add(0x06);
        ck.add_word(0x1000);
        for b in [0xAA, 0xBB, 0xCC] {
            ck.add(b);
        }
        assert_eq!(ck.finish(), 0xB8);
    }

    #[test]
    fn test_verify_accepts_own_checksum() {
        let mut ck = Checksum::new();
        for b in [0x06, 0x10, 0x00, 0xAA, 0xBB, 0xCC] {
            ck.add(b);
        }
        let transmitted = ck.finish();
        assert!(ck.verify(transmitted));
    }

    #[test]
    fn test_verify_rejects_mutation() {
        let bytes = [0x06u8, 0x10, 0x00, 0xAA, 0xBB, 0xCC];
        let mut ck = Checksum::new();
        for b in bytes {
            ck.add(b);
        }
        let transmitted = ck.finish();

        // Flip each accumulated byte in turn; the old checksum must fail
        for i in 0..bytes.len() {
            let mut mutated = bytes;
            mutated[i] ^= 0x01;
            let mut ck = Checksum::new();
            for b in mutated {
                ck.add(b);
            }
            assert!(!ck.verify(transmitted), "mutation at index {} went undetected", i);
        }
    }

    #[test]
    fn test_only_low_byte_matters() {
        let mut a = Checksum::new();
        a.add(0x01);
        let mut b = Checksum::new();
        for _ in 0..257 {
            b.add(0x01);
        }
        // Sums differ by 0x100, low bytes agree
        assert_eq!(a.finish(), b.finish());
    }
}
