//! Block program for certain period of time.

use embedded_hal::blocking::delay::{DelayMs, DelayUs};

use crate::clock::Rcc;
use crate::mmio::Bus;

/// Busy-wait delay, timed by the core clock.
///
/// The cycle counts are fixed at construction; create a new `Delay` after changing
/// the AHB prescaler.
#[derive(Clone, Copy, Debug)]
pub struct Delay {
    hclk: u32,
}

/// Spin for at least `cycles` core cycles.
#[cfg(target_os = "none")]
#[inline]
fn spin(cycles: u32) {
    cortex_m::asm::delay(cycles);
}

/// Off target there is no core clock to count.
#[cfg(not(target_os = "none"))]
#[inline]
fn spin(_cycles: u32) {}

impl Delay {
    #[inline]
    pub fn new<B: Bus>(rcc: &Rcc<B>) -> Self {
        Delay { hclk: rcc.hclk() }
    }

    /// Core cycles in `micros` microseconds, rounded up.
    #[inline]
    fn cycles(&self, micros: u32) -> u64 {
        (self.hclk as u64 * micros as u64 + 999_999) / 1_000_000
    }

    /// Blocks program for *atleast* `count` milliseconds.
    #[inline]
    pub fn millis(&mut self, count: u32) {
        let per_milli = self.cycles(1_000) as u32;
        for _ in 0..count {
            spin(per_milli);
        }
    }

    /// Blocks program for *atleast* `count` microseconds.
    #[inline]
    pub fn micros(&mut self, count: u32) {
        let mut cycles = self.cycles(count);
        while cycles > 0 {
            let chunk = cycles.min(u32::MAX as u64);
            spin(chunk as u32);
            cycles -= chunk;
        }
    }
}

impl DelayMs<u32> for Delay {
    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        self.millis(ms);
    }
}

impl DelayMs<u16> for Delay {
    #[inline]
    fn delay_ms(&mut self, ms: u16) {
        self.millis(ms as u32);
    }
}

impl DelayMs<u8> for Delay {
    #[inline]
    fn delay_ms(&mut self, ms: u8) {
        self.millis(ms as u32);
    }
}

impl DelayUs<u32> for Delay {
    #[inline]
    fn delay_us(&mut self, us: u32) {
        self.micros(us);
    }
}

impl DelayUs<u16> for Delay {
    #[inline]
    fn delay_us(&mut self, us: u16) {
        self.micros(us as u32);
    }
}
