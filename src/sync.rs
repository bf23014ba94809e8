use core::num::NonZeroU8;

use crate::lfsr::PnGenerator;
use crate::sampler::{Sampler, SignalLines};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SyncState {
    /// Counting consecutive matches
    Searching { consecutive: u8 },
    /// The threshold was reached
    Locked,
}

/// Lock acquisition
///
/// A mismatch resets the consecutive match counter and inverts the expected bit.
/// The inverted stage is shifted on into the taps, so a run of mismatches loads the
/// received bits into the register and the generator ends up following the stream.
/// There is no explicit correlation or phase search.
pub struct SyncEngine {
    threshold: NonZeroU8,
    consecutive: u8,
}

impl SyncEngine {
    pub const fn new(threshold: NonZeroU8) -> Self {
        Self {
            threshold,
            consecutive: 0,
        }
    }

    pub fn state(&self) -> SyncState {
        if self.consecutive >= self.threshold.get() {
            SyncState::Locked
        } else {
            SyncState::Searching {
                consecutive: self.consecutive,
            }
        }
    }

    /// Compare one sampled bit against the generator.
    /// The generator is not advanced.
    pub fn observe(&mut self, generator: &mut PnGenerator, sampled: bool) -> SyncState {
        if generator.expected_bit() == sampled {
            self.consecutive = self.consecutive.saturating_add(1);
        } else {
            trace!("sync mismatch after {} matches", self.consecutive);
            self.consecutive = 0;
            generator.invert_expected();
        }

        self.state()
    }

    /// Run bit periods until locked.
    /// Never returns if the stream does not align.
    pub fn run<Lines: SignalLines>(
        &mut self,
        generator: &mut PnGenerator,
        sampler: &mut Sampler<Lines>,
    ) {
        loop {
            sampler.wait_for_active_edge();
            let state = self.observe(generator, sampler.read_data());
            sampler.wait_for_inactive_edge();
            generator.advance();

            if state == SyncState::Locked {
                return;
            }
        }
    }
}
