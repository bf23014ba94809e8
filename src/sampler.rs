#[cfg(test)]
use mockall::automock;

/// Raw access to the CLOCK and DATA input lines
#[cfg_attr(test, automock)]
pub trait SignalLines {
    /// Read the current electrical level of the clock line.
    fn clock(&mut self) -> bool;

    /// Read the current electrical level of the data line.
    fn data(&mut self) -> bool;
}

impl<T: SignalLines + ?Sized> SignalLines for &mut T {
    fn clock(&mut self) -> bool {
        (**self).clock()
    }

    fn data(&mut self) -> bool {
        (**self).data()
    }
}

/// Line polarity correction, applied as XOR masks when sampling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Polarity {
    pub clock_invert: bool,
    pub data_invert: bool,
}

/// Clock synchronous sampler
///
/// The clock is sampled on its logical high level. Data is valid from
/// `wait_for_active_edge()` until the following `wait_for_inactive_edge()`.
/// Neither wait has a timeout; a stopped clock blocks forever.
pub struct Sampler<Lines: SignalLines> {
    lines: Lines,
    polarity: Polarity,
}

impl<Lines: SignalLines> Sampler<Lines> {
    pub const fn new(lines: Lines, polarity: Polarity) -> Self {
        Self { lines, polarity }
    }

    /// Busy-wait until the corrected clock is high.
    pub fn wait_for_active_edge(&mut self) {
        while !self.clock() {
            core::hint::spin_loop();
        }
    }

    /// Busy-wait until the corrected clock is low.
    pub fn wait_for_inactive_edge(&mut self) {
        while self.clock() {
            core::hint::spin_loop();
        }
    }

    /// Read the corrected data level.
    pub fn read_data(&mut self) -> bool {
        self.lines.data() ^ self.polarity.data_invert
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    /// Release the signal lines
    pub fn release(self) -> Lines {
        self.lines
    }

    fn clock(&mut self) -> bool {
        self.lines.clock() ^ self.polarity.clock_invert
    }
}
