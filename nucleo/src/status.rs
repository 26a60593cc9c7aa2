//! Outcome and logic level types shared by all drivers.

use core::convert::TryFrom;
use core::fmt;
use core::ops::Not;

use crate::clock::ClockSource;

/// Logic level of a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinState {
    Reset = 0,
    Set = 1,
}

impl From<bool> for PinState {
    #[inline]
    fn from(value: bool) -> Self {
        if value {
            PinState::Set
        } else {
            PinState::Reset
        }
    }
}

impl From<PinState> for bool {
    #[inline]
    fn from(state: PinState) -> bool {
        state == PinState::Set
    }
}

impl Not for PinState {
    type Output = PinState;

    #[inline]
    fn not(self) -> PinState {
        match self {
            PinState::Reset => PinState::Set,
            PinState::Set => PinState::Reset,
        }
    }
}

impl TryFrom<u32> for PinState {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(PinState::Reset),
            1 => Ok(PinState::Set),
            _ => Err(Error::InvalidArgument),
        }
    }
}

/// Driver error.
///
/// Every error is detected before the register it concerns is modified, except
/// [`LockActivationFailed`][Error::LockActivationFailed], which is only known after the
/// lock sequence has run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// A raw value is outside the range of its enumeration.
    InvalidArgument,
    /// A raw port index or address does not name one of the GPIO ports.
    InvalidPort,
    /// The port lock is already active; only a reset releases it.
    AlreadyLocked,
    /// The lock sequence ran, but the lock key did not read back as set.
    LockActivationFailed,
    /// The pin configuration is frozen by an active port lock.
    PinLocked,
    /// The prescaler would push a bus clock above its ceiling.
    FrequencyLimitExceeded,
    /// HCLK tracking is not available for this system clock source.
    UnsupportedClockSource(ClockSource),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("argument out of range"),
            Error::InvalidPort => f.write_str("no such GPIO port"),
            Error::AlreadyLocked => f.write_str("port lock already active"),
            Error::LockActivationFailed => f.write_str("port lock sequence failed"),
            Error::PinLocked => f.write_str("pin configuration is locked"),
            Error::FrequencyLimitExceeded => f.write_str("bus clock ceiling exceeded"),
            Error::UnsupportedClockSource(source) => {
                write!(f, "clock source {:?} is not supported", source)
            }
        }
    }
}

/// Result type of the fallible driver operations.
pub type Result<T> = core::result::Result<T, Error>;
