use crate::mmio::Bus;

/// Base address of the reset and clock control block.
pub(crate) const RCC_BASE: usize = 0x4002_3800;
/// Clock configuration register.
pub(crate) const CFGR: usize = RCC_BASE + 0x08;
/// AHB1 peripheral clock enable register, bit `n` gates GPIO port `n`.
pub(crate) const AHB1ENR: usize = RCC_BASE + 0x30;

pub(crate) const SWS_SHIFT: u32 = 2;
pub(crate) const HPRE_SHIFT: u32 = 4;
pub(crate) const PPRE1_SHIFT: u32 = 10;
pub(crate) const PPRE2_SHIFT: u32 = 13;

pub(crate) const HPRE_MASK: u32 = 0b1111;
pub(crate) const PPRE_MASK: u32 = 0b111;

/// System clock source, as reported by CFGR.SWS.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClockSource {
    /// 16MHz internal RC oscillator.
    Hsi,
    /// External crystal or clock.
    Hse,
    PllP,
    PllR,
}

impl ClockSource {
    #[inline]
    fn from_bits(bits: u32) -> Self {
        match bits & 0b11 {
            0b00 => ClockSource::Hsi,
            0b01 => ClockSource::Hse,
            0b10 => ClockSource::PllP,
            _ => ClockSource::PllR,
        }
    }
}

#[inline]
pub(crate) fn read_field<B: Bus>(bus: &B, shift: u32, mask: u32) -> u32 {
    (bus.read(CFGR) >> shift) & mask
}

#[inline]
pub(crate) fn write_field<B: Bus>(bus: &B, shift: u32, mask: u32, value: u32) {
    bus.modify(CFGR, |r| (r & !(mask << shift)) | ((value & mask) << shift));
}

#[inline]
pub(crate) fn clock_source<B: Bus>(bus: &B) -> ClockSource {
    ClockSource::from_bits(read_field(bus, SWS_SHIFT, 0b11))
}
