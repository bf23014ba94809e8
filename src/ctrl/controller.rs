use embassy_time::{with_timeout, Duration};

use super::{traits::EdgeSource, Error};
use crate::{
    count::{CountEngine, MeasurementResult},
    lfsr::PnGenerator,
    session::LockIndicator,
    settings::Config,
    sync::{SyncEngine, SyncState},
};

/// Async bit error rate measurement controller
pub struct Controller<Source: EdgeSource> {
    source: Source,
    generator: PnGenerator,
    config: Config,
    edge_timeout: Duration,
}

impl<Source: EdgeSource> Controller<Source> {
    /// Create a new controller.
    /// `edge_timeout` bounds every wait for a clock level, so it must exceed half a bit period.
    pub fn new(source: Source, config: Config, edge_timeout: Duration) -> Self {
        Self {
            source,
            generator: PnGenerator::new(),
            config,
            edge_timeout,
        }
    }

    /// Lock onto the stream and count errors.
    /// The indicator is cleared at start and set once lock is acquired.
    pub async fn measure(
        &mut self,
        indicator: &mut impl LockIndicator,
    ) -> Result<MeasurementResult, Error> {
        self.generator.reset();
        indicator.set_locked(false);

        let mut sync = SyncEngine::new(self.config.lock_threshold);
        loop {
            let sampled = self.sample().await?;
            let state = sync.observe(&mut self.generator, sampled);
            self.finish_period().await?;

            if state == SyncState::Locked {
                break;
            }
        }

        debug!("locked after {} matches", self.config.lock_threshold.get());
        indicator.set_locked(true);

        let mut count = CountEngine::new(self.config.measurement_length);
        while !count.is_complete() {
            let sampled = self.sample().await?;
            count.observe(&self.generator, sampled);
            self.finish_period().await?;
        }

        let result = count.result();
        info!(
            "counted {} bits with {} errors",
            result.bits_counted,
            result.bit_errors
        );
        Ok(result)
    }

    /// Release the edge source
    pub fn release(self) -> Source {
        self.source
    }

    /// Wait for the active clock level and read the corrected data bit
    async fn sample(&mut self) -> Result<bool, Error> {
        let active = !self.config.polarity.clock_invert;
        self.wait_for_clock(active).await?;
        Ok(self.source.data() ^ self.config.polarity.data_invert)
    }

    /// Wait for the inactive clock level and clock the generator
    async fn finish_period(&mut self) -> Result<(), Error> {
        let inactive = self.config.polarity.clock_invert;
        self.wait_for_clock(inactive).await?;
        self.generator.advance();
        Ok(())
    }

    async fn wait_for_clock(&mut self, level: bool) -> Result<(), Error> {
        with_timeout(self.edge_timeout, self.source.wait_for_clock(level))
            .await
            .map_err(|_| Error::Timeout)
    }
}
