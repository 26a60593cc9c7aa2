//! Minimal HAL crate for the STM32F446 microcontroller.
//!
//! Gives symbolic access to the GPIO ports and the bus clock prescalers, without direct
//! interaction with registers. Register blocks are owned by two driver handles:
//!
//! * [`gpio::Ports`] for the eight GPIO ports and their clock gates.
//! * [`clock::Rcc`] for the AHB/APB prescalers and the tracked HCLK frequency.
//!
//! Both are generic over a [`Bus`], so the register logic can run against something
//! other than the memory mapped peripherals.

#![cfg_attr(not(test), no_std)]

pub mod clock;
pub mod delay;
pub mod gpio;
pub mod mmio;

mod status;

pub use mmio::{Bus, Mmio};
pub use status::{Error, PinState, Result};
