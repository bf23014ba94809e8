use bitvec::prelude::*;

/// Number of register stages
pub const STAGES: usize = 16;
/// The stages XOR'ed into the feedback bit
pub const TAPS: [usize; 2] = [7, 11];
/// The stage holding the next expected bit
pub const OUTPUT: usize = STAGES - 1;
/// Period of the generated sequence (PN9, x^9 + x^5 + 1)
pub const PERIOD: usize = 511;

type Register = BitArr!(for STAGES, in u16, Lsb0);

/// PN sequence generator
///
/// The register shifts towards stage 0 and the feedback enters at the output stage,
/// so `expected_bit()` after an `advance()` is the feedback just computed.
#[derive(Clone, PartialEq)]
pub struct PnGenerator {
    register: Register,
}

impl PnGenerator {
    /// Create a generator seeded with all ones
    pub fn new() -> Self {
        Self {
            register: BitArray::new([u16::MAX]),
        }
    }

    /// Reseed the register with all ones
    pub fn reset(&mut self) {
        self.register.fill(true);
    }

    /// The bit the transmitter is expected to send in the current bit period
    pub fn expected_bit(&self) -> bool {
        self.register[OUTPUT]
    }

    /// Invert the expected bit in place
    pub fn invert_expected(&mut self) {
        let bit = self.register[OUTPUT];
        self.register.set(OUTPUT, !bit);
    }

    /// Clock the register once
    pub fn advance(&mut self) {
        let feedback = self.register[TAPS[0]] ^ self.register[TAPS[1]];
        self.register.shift_left(1);
        self.register.set(OUTPUT, feedback);
    }

    /// The raw register contents, stage `n` in bit `n`
    pub fn state(&self) -> u16 {
        self.register.load_le()
    }
}

impl Default for PnGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for PnGenerator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PnGenerator({:#06x})", self.state())
    }
}

impl Iterator for PnGenerator {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.expected_bit();
        self.advance();
        Some(bit)
    }
}

#[cfg(test)]
mod tests {
    use assert_hex::assert_eq_hex;

    use super::*;

    const REFERENCE: &str = "1000001111011111000101110011001000001001010011101101000111100111";

    #[test]
    fn seeded_with_all_ones() {
        let generator = PnGenerator::new();
        assert_eq_hex!(0xFFFF, generator.state());
        assert!(generator.expected_bit());
    }

    #[test]
    fn advance_shifts_towards_stage_zero() {
        let mut generator = PnGenerator::new();
        generator.advance();
        // Stage 7 and 11 are both set, so the feedback is zero
        assert_eq_hex!(0x7FFF, generator.state());
        assert!(!generator.expected_bit());
    }

    #[test]
    fn matches_reference_sequence() {
        let expected: Vec<bool> = REFERENCE.chars().map(|c| c == '1').collect();
        let actual: Vec<bool> = PnGenerator::new().take(expected.len()).collect();
        assert_eq!(expected, actual);
    }

    #[test]
    fn is_deterministic() {
        let first: Vec<bool> = PnGenerator::new().take(2000).collect();
        let second: Vec<bool> = PnGenerator::new().take(2000).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn reset_restarts_sequence() {
        let mut generator = PnGenerator::new();
        for _ in 0..100 {
            generator.advance();
        }
        generator.reset();
        assert_eq!(PnGenerator::new(), generator);
    }

    #[test]
    fn is_pn9() {
        let bits: Vec<bool> = PnGenerator::new().take(3 * PERIOD).collect();

        // x^9 + x^5 + 1
        for n in 9..bits.len() {
            assert_eq!(bits[n - 9] ^ bits[n - 5], bits[n], "bit {}", n);
        }

        let period = &bits[PERIOD..2 * PERIOD];
        assert_eq!(period, &bits[2 * PERIOD..]);
        assert_eq!(256, period.iter().filter(|bit| **bit).count());
    }

    #[test]
    fn invert_expected_only_touches_output_stage() {
        let mut generator = PnGenerator::new();
        generator.advance();
        generator.invert_expected();
        assert!(generator.expected_bit());
        assert_eq_hex!(0xFFFF, generator.state());
    }

    #[test]
    fn inverted_bit_reaches_the_taps() {
        let mut nudged = PnGenerator::new();
        nudged.invert_expected();

        let reference: Vec<bool> = PnGenerator::new().skip(1).take(16).collect();
        let nudged: Vec<bool> = nudged.skip(1).take(16).collect();
        assert_ne!(reference, nudged);
    }
}
