use core::convert::TryFrom;

use crate::status::{Error, PinState, Result};

/// GPIO pin mode.
///
/// The alternate function selector and the initial output level only exist for the
/// modes they apply to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Input,
    /// Output, driven to the given level once configured.
    Output(PinState),
    AlternateFunction(AlternateFunction),
    Analog,
}

/// GPIO output driver type.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputType {
    PushPull = 0,
    OpenDrain = 1,
}

/// GPIO switching speed.
///
/// Lower speeds can reduce ringing.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speed {
    Low = 0,
    Medium = 1,
    Fast = 2,
    High = 3,
}

/// GPIO pull resistor.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pull {
    None = 0,
    Up = 1,
    Down = 2,
}

/// Alternate function selector.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlternateFunction {
    AF0  = 0,
    AF1  = 1,
    AF2  = 2,
    AF3  = 3,
    AF4  = 4,
    AF5  = 5,
    AF6  = 6,
    AF7  = 7,
    AF8  = 8,
    AF9  = 9,
    AF10 = 10,
    AF11 = 11,
    AF12 = 12,
    AF13 = 13,
    AF14 = 14,
    AF15 = 15,
}

/// Complete configuration of a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub mode: Mode,
    pub output_type: OutputType,
    pub speed: Speed,
    pub pull: Pull,
}

impl Mode {
    /// MODER field value.
    #[inline]
    pub(crate) fn bits(self) -> u32 {
        match self {
            Mode::Input => 0b00,
            Mode::Output(_) => 0b01,
            Mode::AlternateFunction(_) => 0b10,
            Mode::Analog => 0b11,
        }
    }
}

impl TryFrom<u32> for OutputType {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(OutputType::PushPull),
            1 => Ok(OutputType::OpenDrain),
            _ => Err(Error::InvalidArgument),
        }
    }
}

impl TryFrom<u32> for Speed {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Speed::Low),
            1 => Ok(Speed::Medium),
            2 => Ok(Speed::Fast),
            3 => Ok(Speed::High),
            _ => Err(Error::InvalidArgument),
        }
    }
}

impl TryFrom<u32> for Pull {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Pull::None),
            1 => Ok(Pull::Up),
            2 => Ok(Pull::Down),
            _ => Err(Error::InvalidArgument),
        }
    }
}

impl AlternateFunction {
    #[rustfmt::skip]
    const ALL: [AlternateFunction; 16] = [
        AlternateFunction::AF0,  AlternateFunction::AF1,  AlternateFunction::AF2,
        AlternateFunction::AF3,  AlternateFunction::AF4,  AlternateFunction::AF5,
        AlternateFunction::AF6,  AlternateFunction::AF7,  AlternateFunction::AF8,
        AlternateFunction::AF9,  AlternateFunction::AF10, AlternateFunction::AF11,
        AlternateFunction::AF12, AlternateFunction::AF13, AlternateFunction::AF14,
        AlternateFunction::AF15,
    ];
}

impl TryFrom<u32> for AlternateFunction {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        AlternateFunction::ALL
            .get(value as usize)
            .copied()
            .ok_or(Error::InvalidArgument)
    }
}

impl Config {
    /// Floating input, low speed.
    #[inline]
    pub const fn input() -> Self {
        Config {
            mode: Mode::Input,
            output_type: OutputType::PushPull,
            speed: Speed::Low,
            pull: Pull::None,
        }
    }

    /// Push-pull output starting at `initial`, low speed, no pull.
    #[inline]
    pub const fn output(initial: PinState) -> Self {
        Config {
            mode: Mode::Output(initial),
            ..Config::input()
        }
    }

    /// Push-pull alternate function, low speed, no pull.
    #[inline]
    pub const fn alternate(af: AlternateFunction) -> Self {
        Config {
            mode: Mode::AlternateFunction(af),
            ..Config::input()
        }
    }

    #[inline]
    pub const fn analog() -> Self {
        Config {
            mode: Mode::Analog,
            ..Config::input()
        }
    }

    #[inline]
    pub const fn output_type(mut self, output_type: OutputType) -> Self {
        self.output_type = output_type;
        self
    }

    #[inline]
    pub const fn speed(mut self, speed: Speed) -> Self {
        self.speed = speed;
        self
    }

    #[inline]
    pub const fn pull(mut self, pull: Pull) -> Self {
        self.pull = pull;
        self
    }

    /// Build a configuration from raw register encodings.
    ///
    /// `af` is only checked when `mode` selects the alternate function, and `initial`
    /// only when `mode` selects output. Every field is validated before the
    /// configuration exists, so a rejected value can never reach a register.
    pub fn from_bits(
        mode: u32,
        output_type: u32,
        speed: u32,
        pull: u32,
        af: u32,
        initial: u32,
    ) -> Result<Self> {
        let mode = match mode {
            0b00 => Mode::Input,
            0b01 => Mode::Output(PinState::try_from(initial)?),
            0b10 => Mode::AlternateFunction(AlternateFunction::try_from(af)?),
            0b11 => Mode::Analog,
            _ => return Err(Error::InvalidArgument),
        };
        Ok(Config {
            mode,
            output_type: OutputType::try_from(output_type)?,
            speed: Speed::try_from(speed)?,
            pull: Pull::try_from(pull)?,
        })
    }
}

impl Default for Config {
    #[inline]
    fn default() -> Self {
        Config::input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bits_accepts_defined_values() {
        let config = Config::from_bits(0b10, 1, 3, 2, 7, 0).unwrap();
        assert_eq!(config.mode, Mode::AlternateFunction(AlternateFunction::AF7));
        assert_eq!(config.output_type, OutputType::OpenDrain);
        assert_eq!(config.speed, Speed::High);
        assert_eq!(config.pull, Pull::Down);

        let config = Config::from_bits(0b01, 0, 0, 0, 0, 1).unwrap();
        assert_eq!(config, Config::output(PinState::Set));
    }

    #[test]
    fn from_bits_rejects_out_of_range_fields() {
        assert_eq!(Config::from_bits(4, 0, 0, 0, 0, 0), Err(Error::InvalidArgument));
        assert_eq!(Config::from_bits(0, 2, 0, 0, 0, 0), Err(Error::InvalidArgument));
        assert_eq!(Config::from_bits(0, 0, 4, 0, 0, 0), Err(Error::InvalidArgument));
        assert_eq!(Config::from_bits(0, 0, 0, 3, 0, 0), Err(Error::InvalidArgument));
        assert_eq!(Config::from_bits(0b10, 0, 0, 0, 16, 0), Err(Error::InvalidArgument));
        assert_eq!(Config::from_bits(0b01, 0, 0, 0, 0, 2), Err(Error::InvalidArgument));
    }

    #[test]
    fn selector_and_level_only_checked_where_they_apply() {
        assert_eq!(Config::from_bits(0b00, 0, 0, 0, 99, 99), Ok(Config::input()));
        assert_eq!(Config::from_bits(0b11, 0, 0, 0, 99, 99), Ok(Config::analog()));
    }

    #[test]
    fn builder() {
        let config = Config::output(PinState::Reset)
            .output_type(OutputType::OpenDrain)
            .speed(Speed::Fast)
            .pull(Pull::Up);
        assert_eq!(config.mode.bits(), 0b01);
        assert_eq!(config.output_type, OutputType::OpenDrain);
        assert_eq!(config.speed, Speed::Fast);
        assert_eq!(config.pull, Pull::Up);
    }
}
