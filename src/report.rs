//! Text for a 2x16 character display.

use core::fmt::{self, Write};

use heapless::String;

use crate::{count::MeasurementResult, settings::Settings};

/// Display width in characters
pub const COLUMNS: usize = 16;

pub type Line = String<COLUMNS>;

/// The two display lines
#[derive(Debug, PartialEq)]
pub struct Lines {
    pub top: Line,
    pub bottom: Line,
}

/// `BER=<percent>%` above the raw error and bit counts.
/// Fails if the counts do not fit the display.
pub fn result_lines(result: &MeasurementResult) -> Result<Lines, fmt::Error> {
    let mut top = Line::new();
    write!(top, "BER={:.6}%", result.ber() * 100.0)?;

    let mut bottom = Line::new();
    write!(
        bottom,
        "E={:5} C={:5}",
        result.bit_errors, result.bits_counted
    )?;

    Ok(Lines { top, bottom })
}

/// The idle screen with polarity, measurement length and lock threshold.
pub fn status_lines(settings: &Settings) -> Result<Lines, fmt::Error> {
    let mut top = Line::new();
    write!(
        top,
        "BERT PN9 D{}-C{}",
        settings.polarity.data_invert as u8, settings.polarity.clock_invert as u8
    )?;

    let mut bottom = Line::new();
    write!(
        bottom,
        "T:{} S:{}",
        settings.length.bits(),
        settings.lock_threshold
    )?;

    Ok(Lines { top, bottom })
}
