/// What the two front panel keys request
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Action {
    /// Run a measurement and show the result
    Measure,
    /// Select the next measurement length
    CycleLength,
    /// Persist the current settings
    Save,
}

impl Action {
    /// Decode the debounced key levels
    pub const fn from_keys(select: bool, trigger: bool) -> Option<Self> {
        match (select, trigger) {
            (true, false) => Some(Action::Measure),
            (false, true) => Some(Action::CycleLength),
            (true, true) => Some(Action::Save),
            (false, false) => None,
        }
    }
}
