/// Edge-triggered access to the CLOCK and DATA input lines
pub trait EdgeSource {
    /// Wait until the clock line is at the given electrical level.
    /// Completes immediately if it already is.
    async fn wait_for_clock(&mut self, level: bool);

    /// Read the current electrical level of the data line.
    fn data(&mut self) -> bool;
}
