//! Embedded-hal pin traits.

use core::convert::Infallible;

use embedded_hal::digital::v2::{InputPin, OutputPin, StatefulOutputPin, ToggleableOutputPin};

use super::{Gpio, Ports};
use crate::mmio::Bus;
use crate::status::PinState;

/// A single pin, borrowed from [`Ports`].
///
/// Only level changes are available, so any number of lines can be out at once.
#[derive(Debug)]
pub struct Line<'a, B: Bus> {
    ports: &'a Ports<B>,
    pin: Gpio,
}

impl<'a, B: Bus> Line<'a, B> {
    #[inline]
    pub(crate) fn new(ports: &'a Ports<B>, pin: Gpio) -> Self {
        Line { ports, pin }
    }

    #[inline]
    pub fn pin(&self) -> Gpio {
        self.pin
    }
}

impl<'a, B: Bus> OutputPin for Line<'a, B> {
    type Error = Infallible;

    #[inline]
    fn set_low(&mut self) -> Result<(), Infallible> {
        self.ports.write(self.pin, PinState::Reset);
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Infallible> {
        self.ports.write(self.pin, PinState::Set);
        Ok(())
    }
}

impl<'a, B: Bus> StatefulOutputPin for Line<'a, B> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Infallible> {
        Ok(self.ports.read_output(self.pin) == PinState::Set)
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Infallible> {
        Ok(self.ports.read_output(self.pin) == PinState::Reset)
    }
}

impl<'a, B: Bus> ToggleableOutputPin for Line<'a, B> {
    type Error = Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Infallible> {
        self.ports.toggle(self.pin);
        Ok(())
    }
}

impl<'a, B: Bus> InputPin for Line<'a, B> {
    type Error = Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.ports.read(self.pin) == PinState::Set)
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(self.ports.read(self.pin) == PinState::Reset)
    }
}
