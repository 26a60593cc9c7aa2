use core::convert::TryFrom;

use log::{debug, trace, warn};

use super::{Config, Mode};
use crate::clock::pac::AHB1ENR;
use crate::mmio::Bus;
use crate::status::{Error, PinState, Result};

/// Base address of GPIO port A.
pub(crate) const GPIO_BASE: usize = 0x4002_0000;
/// Address distance between two ports.
pub(crate) const PORT_STRIDE: usize = 0x400;

pub(crate) const MODER: usize = 0x00;
pub(crate) const OTYPER: usize = 0x04;
pub(crate) const OSPEEDR: usize = 0x08;
pub(crate) const PUPDR: usize = 0x0C;
pub(crate) const IDR: usize = 0x10;
pub(crate) const ODR: usize = 0x14;
pub(crate) const BSRR: usize = 0x18;
pub(crate) const LCKR: usize = 0x1C;
pub(crate) const AFRL: usize = 0x20;
pub(crate) const AFRH: usize = 0x24;

/// Lock key bit of LCKR.
pub(crate) const LCKK: u32 = 1 << 16;

/// Available GPIO ports.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

/// Available GPIO pins.
#[repr(u8)]
#[rustfmt::skip]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pin {
    P0  = 0,
    P1  = 1,
    P2  = 2,
    P3  = 3,
    P4  = 4,
    P5  = 5,
    P6  = 6,
    P7  = 7,
    P8  = 8,
    P9  = 9,
    P10 = 10,
    P11 = 11,
    P12 = 12,
    P13 = 13,
    P14 = 14,
    P15 = 15,
}

impl Port {
    pub const ALL: [Port; 8] = [
        Port::A,
        Port::B,
        Port::C,
        Port::D,
        Port::E,
        Port::F,
        Port::G,
        Port::H,
    ];

    /// Index of the port, which is also its clock gate bit in AHB1ENR.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Base address of the port's register block.
    #[inline]
    pub fn address(self) -> usize {
        GPIO_BASE + self.index() as usize * PORT_STRIDE
    }

    /// Port whose register block starts at `addr`.
    ///
    /// Only the eight port base addresses are accepted.
    pub fn from_address(addr: usize) -> Result<Port> {
        let offset = addr.checked_sub(GPIO_BASE).ok_or(Error::InvalidPort)?;
        if offset % PORT_STRIDE != 0 {
            return Err(Error::InvalidPort);
        }
        let index = offset / PORT_STRIDE;
        Port::ALL.get(index).copied().ok_or(Error::InvalidPort)
    }

    #[inline]
    pub(crate) fn register(self, offset: usize) -> usize {
        self.address() + offset
    }
}

impl TryFrom<u8> for Port {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        Port::ALL.get(index as usize).copied().ok_or(Error::InvalidPort)
    }
}

impl Pin {
    #[rustfmt::skip]
    pub const ALL: [Pin; 16] = [
        Pin::P0,  Pin::P1,  Pin::P2,  Pin::P3,
        Pin::P4,  Pin::P5,  Pin::P6,  Pin::P7,
        Pin::P8,  Pin::P9,  Pin::P10, Pin::P11,
        Pin::P12, Pin::P13, Pin::P14, Pin::P15,
    ];

    /// Bit of this pin in the 16 bit port registers.
    #[inline]
    pub fn mask(self) -> u16 {
        1 << self as u8
    }
}

impl TryFrom<u8> for Pin {
    type Error = Error;

    fn try_from(index: u8) -> Result<Self> {
        Pin::ALL.get(index as usize).copied().ok_or(Error::InvalidArgument)
    }
}

/// Clear the `mask` wide field at `shift` and write `value` into it.
#[inline]
fn update_field<B: Bus>(bus: &B, addr: usize, shift: usize, mask: u32, value: u32) {
    bus.modify(addr, |r| (r & !(mask << shift)) | ((value & mask) << shift));
}

/// Open the clock gate of the port.
#[inline]
pub(crate) fn enable<B: Bus>(bus: &B, port: Port) {
    bus.modify(AHB1ENR, |r| r | 1 << port.index());
    debug!("gpio{:?}: clock enabled", port);
}

/// Configure the pin.
///
/// The mode, output type, speed and pull fields are updated one after the other, each
/// with a read-modify-write that only touches the slice of this pin. Output pins get
/// their initial level last, once the mode is committed.
pub(crate) fn configure<B: Bus>(bus: &B, port: Port, pin: Pin, config: &Config) -> Result<()> {
    if locked_pins(bus, port) & pin.mask() != 0 {
        warn!("gpio{:?}{}: configuration is locked", port, pin as u8);
        return Err(Error::PinLocked);
    }

    let pin_nr = pin as usize;
    update_field(bus, port.register(MODER), pin_nr * 2, 0b11, config.mode.bits());
    update_field(bus, port.register(OTYPER), pin_nr, 0b1, config.output_type as u32);
    update_field(bus, port.register(OSPEEDR), pin_nr * 2, 0b11, config.speed as u32);
    update_field(bus, port.register(PUPDR), pin_nr * 2, 0b11, config.pull as u32);

    match config.mode {
        Mode::AlternateFunction(af) => {
            if pin_nr < 8 {
                update_field(bus, port.register(AFRL), pin_nr * 4, 0xF, af as u32);
            } else {
                update_field(bus, port.register(AFRH), (pin_nr - 8) * 4, 0xF, af as u32);
            }
        }
        Mode::Output(state) => write(bus, port, pin, state),
        Mode::Input | Mode::Analog => (),
    }

    debug!("gpio{:?}{}: configured {:?}", port, pin_nr, config);
    Ok(())
}

/// Sets the pin level through BSRR.
///
/// A single write that only requests the change of this pin, so there is no window in
/// which an interrupt could lose its own update of ODR.
#[inline]
pub(crate) fn write<B: Bus>(bus: &B, port: Port, pin: Pin, state: PinState) {
    let request = match state {
        PinState::Set => 1 << pin as u8,
        PinState::Reset => 1 << (pin as u8 + 16),
    };
    trace!("gpio{:?}: bsrr <- {:#010x}", port, request);
    bus.write(port.register(BSRR), request);
}

/// Sets all 16 pins of the port in one BSRR write.
#[inline]
pub(crate) fn write_port<B: Bus>(bus: &B, port: Port, value: u16) {
    let set = value as u32;
    let reset = !value as u32;
    trace!("gpio{:?}: bsrr <- {:#010x}", port, reset << 16 | set);
    bus.write(port.register(BSRR), reset << 16 | set);
}

/// Inverts the pin level, as seen on IDR, through BSRR.
#[inline]
pub(crate) fn toggle<B: Bus>(bus: &B, port: Port, pin: Pin) {
    let state = read(bus, port, pin);
    write(bus, port, pin, !state);
}

/// Read the pin input level.
#[inline]
pub(crate) fn read<B: Bus>(bus: &B, port: Port, pin: Pin) -> PinState {
    let value = bus.read(port.register(IDR));
    PinState::from(value & pin.mask() as u32 != 0)
}

/// Read the level the pin is driven to.
#[inline]
pub(crate) fn read_output<B: Bus>(bus: &B, port: Port, pin: Pin) -> PinState {
    let value = bus.read(port.register(ODR));
    PinState::from(value & pin.mask() as u32 != 0)
}

/// Read the input levels of all pins.
#[inline]
pub(crate) fn read_port<B: Bus>(bus: &B, port: Port) -> u16 {
    (bus.read(port.register(IDR)) & 0xFFFF) as u16
}

/// Whether the lock key of the port has latched.
#[inline]
pub(crate) fn is_locked<B: Bus>(bus: &B, port: Port) -> bool {
    bus.read(port.register(LCKR)) & LCKK != 0
}

/// Pins frozen by an active port lock, or none if the lock is not active.
#[inline]
pub(crate) fn locked_pins<B: Bus>(bus: &B, port: Port) -> u16 {
    let value = bus.read(port.register(LCKR));
    if value & LCKK != 0 {
        (value & 0xFFFF) as u16
    } else {
        0
    }
}

/// Freeze the configuration of the pins in `mask` until the next reset.
///
/// Runs the lock key sequence: write LCKK=1, LCKK=0, LCKK=1 (each together with the
/// mask), then read LCKR back. The sequence must not be interrupted by another LCKR
/// access, and it is not retried.
pub(crate) fn lock<B: Bus>(bus: &B, port: Port, mask: u16) -> Result<()> {
    let lckr = port.register(LCKR);
    if bus.read(lckr) & LCKK != 0 {
        warn!("gpio{:?}: lock already active", port);
        return Err(Error::AlreadyLocked);
    }

    let mask = mask as u32;
    bus.write(lckr, mask);
    bus.write(lckr, LCKK | mask);
    bus.write(lckr, mask);
    bus.write(lckr, LCKK | mask);

    if bus.read(lckr) & LCKK != 0 {
        debug!("gpio{:?}: locked pins {:#06x}", port, mask);
        Ok(())
    } else {
        warn!("gpio{:?}: lock key did not latch", port);
        Err(Error::LockActivationFailed)
    }
}
