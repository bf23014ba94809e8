#[cfg(test)]
use mockall::automock;

use crate::{
    count::{CountEngine, MeasurementResult},
    lfsr::PnGenerator,
    sampler::{Sampler, SignalLines},
    settings::Config,
    sync::SyncEngine,
};

/// Status output that reports whether the receiver is locked, e.g. a LED
#[cfg_attr(test, automock)]
pub trait LockIndicator {
    fn set_locked(&mut self, locked: bool);
}

impl LockIndicator for () {
    fn set_locked(&mut self, _locked: bool) {}
}

/// A bit error rate measurement over a pair of signal lines
pub struct Session<Lines: SignalLines> {
    sampler: Sampler<Lines>,
    generator: PnGenerator,
    config: Config,
}

impl<Lines: SignalLines> Session<Lines> {
    pub fn new(lines: Lines, config: Config) -> Self {
        Self {
            sampler: Sampler::new(lines, config.polarity),
            generator: PnGenerator::new(),
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run a measurement.
    /// The indicator is cleared at start and set once lock is acquired.
    /// Blocks for as long as the clock is stopped or the stream does not align.
    pub fn run(&mut self, indicator: &mut impl LockIndicator) -> MeasurementResult {
        self.generator.reset();
        indicator.set_locked(false);

        SyncEngine::new(self.config.lock_threshold).run(&mut self.generator, &mut self.sampler);
        debug!("locked after {} matches", self.config.lock_threshold.get());
        indicator.set_locked(true);

        let result = CountEngine::new(self.config.measurement_length)
            .run(&mut self.generator, &mut self.sampler);
        info!(
            "counted {} bits with {} errors",
            result.bits_counted,
            result.bit_errors
        );

        result
    }

    /// Release the signal lines
    pub fn release(self) -> Lines {
        self.sampler.release()
    }
}

/// Run a single measurement over `lines`.
pub fn run_measurement<Lines: SignalLines>(
    lines: Lines,
    config: &Config,
    indicator: &mut impl LockIndicator,
) -> MeasurementResult {
    Session::new(lines, *config).run(indicator)
}

#[cfg(test)]
mod tests {
    use core::num::{NonZeroU32, NonZeroU8};

    use mockall::{predicate::eq, Sequence};

    use super::*;
    use crate::{
        sampler::{stubs::ScriptedLines, Polarity},
        settings::LENGTHS,
    };

    fn config(polarity: Polarity, lock_threshold: u8, measurement_length: u32) -> Config {
        Config {
            polarity,
            lock_threshold: NonZeroU8::new(lock_threshold).unwrap(),
            measurement_length: NonZeroU32::new(measurement_length).unwrap(),
        }
    }

    fn reference(len: usize) -> Vec<bool> {
        PnGenerator::new().take(len).collect()
    }

    #[test]
    fn indicator_is_cleared_then_set_once() {
        let mut indicator = MockLockIndicator::new();
        let mut seq = Sequence::new();
        indicator
            .expect_set_locked()
            .with(eq(false))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        indicator
            .expect_set_locked()
            .with(eq(true))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let lines = ScriptedLines::new(reference(100));
        run_measurement(lines, &config(Polarity::default(), 3, 50), &mut indicator);
    }

    #[test]
    fn loopback_locks_after_threshold_without_errors() {
        for length in [1, 17, 1000] {
            let mut session = Session::new(
                ScriptedLines::new(reference(1100)),
                config(Polarity::default(), 3, length),
            );
            let result = session.run(&mut ());

            assert_eq!(
                MeasurementResult {
                    bits_counted: length,
                    bit_errors: 0
                },
                result
            );
            assert_eq!(3 + length as usize, session.release().periods());
        }
    }

    #[test]
    fn single_corrupted_bit_after_lock() {
        let mut stream = reference(1100);
        stream[3 + 500] = !stream[3 + 500];

        let result = run_measurement(
            ScriptedLines::new(stream),
            &config(Polarity::default(), 3, 1000),
            &mut (),
        );

        assert_eq!(
            MeasurementResult {
                bits_counted: 1000,
                bit_errors: 1
            },
            result
        );
    }

    #[test]
    fn accepts_every_candidate_length() {
        let stream = reference(65535 + 20);
        for length in LENGTHS {
            let result = run_measurement(
                ScriptedLines::new(stream.iter().copied()),
                &config(Polarity::default(), 10, length.get()),
                &mut (),
            );
            assert_eq!(length.get(), result.bits_counted);
            assert_eq!(0, result.bit_errors);
        }
    }

    #[test]
    fn locks_on_inverted_clock_and_data() {
        let polarity = Polarity {
            clock_invert: true,
            data_invert: true,
        };
        let mut session = Session::new(
            ScriptedLines::new(reference(1100)).inverted(true, true),
            config(polarity, 3, 1000),
        );

        let result = session.run(&mut ());
        assert_eq!(0, result.bit_errors);
        assert_eq!(1003, session.release().periods());
    }

    #[test]
    fn data_inversion_is_symmetric() {
        let mut stream = reference(3000);
        for index in (40..3000).step_by(37) {
            stream[index] = !stream[index];
        }

        let plain = run_measurement(
            ScriptedLines::new(stream.iter().copied()),
            &config(Polarity::default(), 10, 2000),
            &mut (),
        );
        let inverted = run_measurement(
            ScriptedLines::new(stream.iter().copied()).inverted(false, true),
            &config(
                Polarity {
                    clock_invert: false,
                    data_invert: true,
                },
                10,
                2000,
            ),
            &mut (),
        );

        assert_eq!(plain, inverted);
        assert!(plain.bit_errors > 0);
        assert!(plain.bit_errors <= plain.bits_counted);
    }

    #[test]
    fn session_can_be_rerun() {
        let stream: Vec<bool> = reference(100).into_iter().chain(reference(100)).collect();
        let mut session = Session::new(
            ScriptedLines::new(stream),
            config(Polarity::default(), 3, 97),
        );

        let first = session.run(&mut ());
        let second = session.run(&mut ());
        assert_eq!(first, second);
        assert_eq!(200, session.release().periods());
    }
}
