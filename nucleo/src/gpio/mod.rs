//! GPIO peripheral.
//!
//! Example usage:
//!
//! ```no_run
//! use nucleo::gpio::{self, Config, Ports};
//! use nucleo::PinState;
//!
//! let mut ports = Ports::take().unwrap();
//! ports.enable(gpio::Port::A);
//!
//! ports.configure(gpio::PA5, &Config::output(PinState::Reset)).unwrap();
//! ports.write(gpio::PA5, PinState::Set);
//! let level: PinState = ports.read(gpio::PA0);
//! ```

mod line;
mod mode;
pub(crate) mod pac;
mod pinout;

pub use line::Line;
pub use mode::*;
pub use pac::{Pin, Port};
pub use pinout::*;

use core::sync::atomic::{AtomicBool, Ordering};

use crate::mmio::{Bus, Mmio};
use crate::status::{PinState, Result};

/// GPIO pin tuple struct.
///
/// Can be used to [configure][Ports::configure()], [read][Ports::read()] from or
/// [write][Ports::write()] to a pin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Gpio(pub Port, pub Pin);

/// Owner of the GPIO port registers and their clock gates.
///
/// Level changes go through the set/reset register, which is safe to share with
/// interrupt handlers, and only need `&self`. Clock gating, configuration and locking
/// read-modify-write shared registers and need `&mut self`.
#[derive(Debug)]
pub struct Ports<B: Bus = Mmio> {
    bus: B,
}

static TAKEN: AtomicBool = AtomicBool::new(false);

impl Ports<Mmio> {
    /// Take the GPIO ports, once.
    #[inline]
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(unsafe { Self::steal() })
        }
    }

    /// Access the GPIO ports, whether or not they were taken.
    ///
    /// # Safety
    ///
    /// The configuration calls of the returned handle may race with the ones of any
    /// other handle.
    #[inline]
    pub unsafe fn steal() -> Self {
        Ports { bus: Mmio::steal() }
    }
}

impl<B: Bus> Ports<B> {
    /// Drive the GPIO ports through `bus`.
    #[inline]
    pub fn new(bus: B) -> Self {
        Ports { bus }
    }

    /// Release the bus.
    #[inline]
    pub fn free(self) -> B {
        self.bus
    }

    /// Enable the clock of the port.
    ///
    /// Every other operation on the port assumes this was done; a missed enable is not
    /// detected.
    #[inline]
    pub fn enable(&mut self, port: Port) {
        pac::enable(&self.bus, port);
    }

    /// Configure the pin.
    ///
    /// Fails with [`PinLocked`][crate::Error::PinLocked] if the port lock freezes the
    /// pin, in which case nothing is written.
    #[inline]
    pub fn configure(&mut self, pin: Gpio, config: &Config) -> Result<()> {
        pac::configure(&self.bus, pin.0, pin.1, config)
    }

    /// Set the pin level.
    ///
    /// Assumes pin was [configured][Ports::configure] as [output][Mode::Output] before
    /// calling this.
    #[inline]
    pub fn write(&self, pin: Gpio, state: PinState) {
        pac::write(&self.bus, pin.0, pin.1, state)
    }

    /// Set the levels of all pins of the port at once; bit `n` of `value` drives pin `n`.
    #[inline]
    pub fn write_port(&self, port: Port, value: u16) {
        pac::write_port(&self.bus, port, value)
    }

    /// Invert the pin level.
    #[inline]
    pub fn toggle(&self, pin: Gpio) {
        pac::toggle(&self.bus, pin.0, pin.1)
    }

    /// Read the pin input level.
    #[inline]
    pub fn read(&self, pin: Gpio) -> PinState {
        pac::read(&self.bus, pin.0, pin.1)
    }

    /// Read the level the pin is driven to.
    #[inline]
    pub fn read_output(&self, pin: Gpio) -> PinState {
        pac::read_output(&self.bus, pin.0, pin.1)
    }

    /// Read the input levels of all pins of the port.
    #[inline]
    pub fn read_port(&self, port: Port) -> u16 {
        pac::read_port(&self.bus, port)
    }

    /// Freeze the configuration of the pins in `mask` until the next reset.
    ///
    /// A port can only be locked once; later calls fail with
    /// [`AlreadyLocked`][crate::Error::AlreadyLocked].
    #[inline]
    pub fn lock(&mut self, port: Port, mask: u16) -> Result<()> {
        pac::lock(&self.bus, port, mask)
    }

    /// Whether the port lock is active.
    #[inline]
    pub fn is_locked(&self, port: Port) -> bool {
        pac::is_locked(&self.bus, port)
    }

    /// Pins whose configuration is frozen.
    #[inline]
    pub fn locked_pins(&self, port: Port) -> u16 {
        pac::locked_pins(&self.bus, port)
    }

    /// Embedded-hal view of a single pin.
    #[inline]
    pub fn line(&self, pin: Gpio) -> Line<'_, B> {
        Line::new(self, pin)
    }
}
