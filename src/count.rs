use core::num::NonZeroU32;

use crate::lfsr::PnGenerator;
use crate::sampler::{Sampler, SignalLines};

/// The outcome of a measurement
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MeasurementResult {
    pub bits_counted: u32,
    pub bit_errors: u32,
}

impl MeasurementResult {
    /// The bit error rate, or zero if no bits were counted
    pub fn ber(&self) -> f32 {
        if self.bits_counted == 0 {
            return 0.0;
        }
        self.bit_errors as f32 / self.bits_counted as f32
    }
}

/// Error counting over a fixed number of bit periods
pub struct CountEngine {
    length: NonZeroU32,
    result: MeasurementResult,
}

impl CountEngine {
    pub const fn new(length: NonZeroU32) -> Self {
        Self {
            length,
            result: MeasurementResult {
                bits_counted: 0,
                bit_errors: 0,
            },
        }
    }

    pub fn is_complete(&self) -> bool {
        self.result.bits_counted >= self.length.get()
    }

    pub fn result(&self) -> MeasurementResult {
        self.result
    }

    /// Count one sampled bit. The generator is not advanced.
    pub fn observe(&mut self, generator: &PnGenerator, sampled: bool) {
        if generator.expected_bit() != sampled {
            self.result.bit_errors += 1;
        }
        self.result.bits_counted += 1;
    }

    /// Count bit periods until the measurement length is reached.
    pub fn run<Lines: SignalLines>(
        &mut self,
        generator: &mut PnGenerator,
        sampler: &mut Sampler<Lines>,
    ) -> MeasurementResult {
        while !self.is_complete() {
            sampler.wait_for_active_edge();
            self.observe(generator, sampler.read_data());
            sampler.wait_for_inactive_edge();
            generator.advance();
        }

        self.result
    }
}
