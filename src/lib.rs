#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate num_derive;

#[macro_use]
mod fmt;

pub mod count;
pub mod lfsr;
pub mod panel;
pub mod report;
pub mod sampler;
pub mod session;
pub mod settings;
pub mod sync;
#[cfg(feature = "ctrl")]
pub mod ctrl;

pub use count::MeasurementResult;
pub use lfsr::PnGenerator;
pub use sampler::{Polarity, Sampler, SignalLines};
pub use session::{run_measurement, LockIndicator, Session};
pub use settings::{Config, Settings};
