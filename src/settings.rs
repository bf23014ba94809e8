use core::fmt::Debug;
use core::num::{NonZeroU32, NonZeroU8};

#[cfg(test)]
use mockall::automock;
use num_traits::FromPrimitive;

use crate::sampler::Polarity;

/// Store addresses of the persisted settings
pub const CLOCK_INVERT_ADDRESS: u8 = 0;
pub const DATA_INVERT_ADDRESS: u8 = 1;
pub const LENGTH_INDEX_ADDRESS: u8 = 2;
pub const LOCK_THRESHOLD_ADDRESS: u8 = 3;

/// Factory contents of the settings store
pub const DEFAULT_IMAGE: [u8; 4] = [0, 0, 2, 10];

const fn nonzero(value: u32) -> NonZeroU32 {
    match NonZeroU32::new(value) {
        Some(value) => value,
        None => panic!("measurement length must be positive"),
    }
}

/// The selectable measurement lengths in bits
pub const LENGTHS: [NonZeroU32; 6] = [
    nonzero(1000),
    nonzero(5000),
    nonzero(10000),
    nonzero(30000),
    nonzero(50000),
    nonzero(65535),
];

/// Index into [`LENGTHS`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LengthIndex {
    Bits1000 = 0,
    Bits5000 = 1,
    Bits10000 = 2,
    Bits30000 = 3,
    Bits50000 = 4,
    Bits65535 = 5,
}

impl LengthIndex {
    pub const fn bits(self) -> NonZeroU32 {
        LENGTHS[self as usize]
    }

    /// The next longer length, wrapping to the shortest
    pub const fn next(self) -> Self {
        match self {
            LengthIndex::Bits1000 => LengthIndex::Bits5000,
            LengthIndex::Bits5000 => LengthIndex::Bits10000,
            LengthIndex::Bits10000 => LengthIndex::Bits30000,
            LengthIndex::Bits30000 => LengthIndex::Bits50000,
            LengthIndex::Bits50000 => LengthIndex::Bits65535,
            LengthIndex::Bits65535 => LengthIndex::Bits1000,
        }
    }
}

/// Resolved input of a measurement session
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    pub polarity: Polarity,
    /// Consecutive matches required to declare lock
    pub lock_threshold: NonZeroU8,
    /// Bits to count once locked
    pub measurement_length: NonZeroU32,
}

impl Default for Config {
    fn default() -> Self {
        Settings::default().config()
    }
}

/// Persisted settings
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub polarity: Polarity,
    pub length: LengthIndex,
    pub lock_threshold: NonZeroU8,
}

#[derive(Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The stored length index is not in the table
    LengthIndex(u8),
    /// The stored lock threshold is zero
    LockThreshold,
    /// The settings store failed
    Store(E),
}

/// Byte addressable non-volatile storage, e.g. a data EEPROM
#[cfg_attr(test, automock(type Error = ();))]
pub trait SettingsStore {
    type Error: Debug;

    fn read(&mut self, address: u8) -> Result<u8, Self::Error>;
    fn write(&mut self, address: u8, value: u8) -> Result<(), Self::Error>;
}

impl Default for Settings {
    fn default() -> Self {
        match Self::from_bytes::<()>(DEFAULT_IMAGE) {
            Ok(settings) => settings,
            Err(_) => unreachable!(),
        }
    }
}

impl Settings {
    /// Decode the settings image
    pub fn from_bytes<E>(image: [u8; 4]) -> Result<Self, Error<E>> {
        let [clock_invert, data_invert, length, lock_threshold] = image;
        Ok(Self {
            polarity: Polarity {
                clock_invert: clock_invert != 0,
                data_invert: data_invert != 0,
            },
            length: LengthIndex::from_u8(length).ok_or(Error::LengthIndex(length))?,
            lock_threshold: NonZeroU8::new(lock_threshold).ok_or(Error::LockThreshold)?,
        })
    }

    /// Encode the settings image
    pub fn to_bytes(&self) -> [u8; 4] {
        [
            self.polarity.clock_invert as u8,
            self.polarity.data_invert as u8,
            self.length as u8,
            self.lock_threshold.get(),
        ]
    }

    pub fn load<S: SettingsStore>(store: &mut S) -> Result<Self, Error<S::Error>> {
        let mut image = [0; 4];
        for (address, byte) in (CLOCK_INVERT_ADDRESS..).zip(image.iter_mut()) {
            *byte = store.read(address).map_err(Error::Store)?;
        }
        debug!("loaded settings {:x}", image);
        Self::from_bytes(image)
    }

    pub fn save<S: SettingsStore>(&self, store: &mut S) -> Result<(), Error<S::Error>> {
        let image = self.to_bytes();
        for (address, byte) in (CLOCK_INVERT_ADDRESS..).zip(image) {
            store.write(address, byte).map_err(Error::Store)?;
        }
        Ok(())
    }

    /// Select the next measurement length
    pub fn cycle_length(&mut self) -> NonZeroU32 {
        self.length = self.length.next();
        self.length.bits()
    }

    /// Invert polarities for keys held at power on.
    /// Trigger flips the data polarity and select flips the clock polarity.
    pub fn apply_power_on_keys(&mut self, select: bool, trigger: bool) {
        if trigger {
            self.polarity.data_invert = !self.polarity.data_invert;
        }
        if select {
            self.polarity.clock_invert = !self.polarity.clock_invert;
        }
    }

    /// Resolve the session configuration
    pub fn config(&self) -> Config {
        Config {
            polarity: self.polarity,
            lock_threshold: self.lock_threshold,
            measurement_length: self.length.bits(),
        }
    }
}
