//! Register access.
//!
//! The drivers never dereference peripheral addresses themselves; every access goes
//! through a [`Bus`].

use core::ptr::{read_volatile, write_volatile};

/// Word access to the peripheral address space.
pub trait Bus {
    /// Read the 32 bit register at `addr`.
    fn read(&self, addr: usize) -> u32;

    /// Write the 32 bit register at `addr`.
    fn write(&self, addr: usize, value: u32);

    /// Read-modify-write of the register at `addr`.
    ///
    /// Not atomic: an interrupt between the read and the write that touches the same
    /// register has its change overwritten.
    #[inline]
    fn modify<F>(&self, addr: usize, f: F)
    where
        F: FnOnce(u32) -> u32,
    {
        let value = self.read(addr);
        self.write(addr, f(value));
    }
}

/// The memory mapped peripherals.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// Access the memory mapped peripherals.
    ///
    /// # Safety
    ///
    /// Only valid on the STM32F446, and the caller must make sure that no other owner
    /// writes the same registers concurrently.
    #[inline]
    pub unsafe fn steal() -> Self {
        Mmio { _private: () }
    }
}

impl Bus for Mmio {
    #[inline]
    fn read(&self, addr: usize) -> u32 {
        unsafe { read_volatile(addr as *const u32) }
    }

    #[inline]
    fn write(&self, addr: usize, value: u32) {
        unsafe { write_volatile(addr as *mut u32, value) }
    }
}

impl<B: Bus> Bus for &B {
    #[inline]
    fn read(&self, addr: usize) -> u32 {
        (**self).read(addr)
    }

    #[inline]
    fn write(&self, addr: usize, value: u32) {
        (**self).write(addr, value)
    }
}
