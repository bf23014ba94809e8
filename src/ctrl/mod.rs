//! Async measurement with bounded edge waits.
//!
//! The blocking [`crate::Session`] waits forever for a stopped clock. The
//! [`Controller`] runs the same lock and count engines but gives up with
//! [`Error::Timeout`] when an edge does not arrive in time, and a measurement is
//! cancelled by dropping its future.

pub mod traits;
mod controller;

pub use controller::Controller;

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The clock did not reach the awaited level in time
    Timeout,
}
