//! System clock tree.
//!
//! [`Rcc`] owns the prescaler fields of RCC_CFGR and tracks the resulting HCLK
//! frequency, which the APB prescaler checks and [`Delay`][crate::delay::Delay] depend
//! on. Only the 16MHz internal oscillator is supported as system clock source.

pub(crate) mod pac;
mod prescaler;

pub use pac::ClockSource;
pub use prescaler::{AhbPrescaler, ApbPrescaler};

use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::mmio::{Bus, Mmio};
use crate::status::{Error, Result};
use pac::{HPRE_MASK, HPRE_SHIFT, PPRE1_SHIFT, PPRE2_SHIFT, PPRE_MASK};
use prescaler::{ahb_divisor, apb_divisor};

/// HSI oscillator speed in Hertz.
pub const HSI_FREQUENCY: u32 = 16_000_000;

/// Ceiling of the APB1 (low speed) bus clock in Hertz.
pub const APB1_MAX: u32 = 45_000_000;

/// Ceiling of the APB2 (high speed) bus clock in Hertz.
pub const APB2_MAX: u32 = 90_000_000;

/// Owner of the clock configuration and the tracked HCLK frequency.
#[derive(Debug)]
pub struct Rcc<B: Bus = Mmio> {
    bus: B,
    hclk: u32,
}

static TAKEN: AtomicBool = AtomicBool::new(false);

impl Rcc<Mmio> {
    /// Take the clock configuration, once.
    #[inline]
    pub fn take() -> Option<Self> {
        if TAKEN.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(unsafe { Self::steal() })
        }
    }

    /// Access the clock configuration, whether or not it was taken.
    ///
    /// # Safety
    ///
    /// Every handle tracks HCLK on its own; a prescaler change through one handle is not
    /// seen by the others.
    #[inline]
    pub unsafe fn steal() -> Self {
        Rcc::new(Mmio::steal())
    }
}

impl<B: Bus> Rcc<B> {
    /// Drive the clock configuration through `bus`.
    ///
    /// HCLK starts out as the reset default, HSI undivided; call
    /// [`update_hclk`][Rcc::update_hclk] if the configuration may have changed since.
    #[inline]
    pub fn new(bus: B) -> Self {
        Rcc {
            bus,
            hclk: HSI_FREQUENCY,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_hclk(bus: B, hclk: u32) -> Self {
        Rcc { bus, hclk }
    }

    /// Release the bus.
    #[inline]
    pub fn free(self) -> B {
        self.bus
    }

    /// Tracked AHB clock speed in Hertz.
    #[inline]
    pub fn hclk(&self) -> u32 {
        self.hclk
    }

    /// Clock speed for peripherals connected to APB1.
    #[inline]
    pub fn pclk1(&self) -> u32 {
        self.hclk / apb_divisor(pac::read_field(&self.bus, PPRE1_SHIFT, PPRE_MASK))
    }

    /// Clock speed for peripherals connected to APB2.
    #[inline]
    pub fn pclk2(&self) -> u32 {
        self.hclk / apb_divisor(pac::read_field(&self.bus, PPRE2_SHIFT, PPRE_MASK))
    }

    /// Current system clock source.
    #[inline]
    pub fn clock_source(&self) -> ClockSource {
        pac::clock_source(&self.bus)
    }

    #[inline]
    pub fn ahb_prescaler(&self) -> AhbPrescaler {
        AhbPrescaler::from_field(pac::read_field(&self.bus, HPRE_SHIFT, HPRE_MASK))
    }

    #[inline]
    pub fn apb1_prescaler(&self) -> ApbPrescaler {
        ApbPrescaler::from_field(pac::read_field(&self.bus, PPRE1_SHIFT, PPRE_MASK))
    }

    #[inline]
    pub fn apb2_prescaler(&self) -> ApbPrescaler {
        ApbPrescaler::from_field(pac::read_field(&self.bus, PPRE2_SHIFT, PPRE_MASK))
    }

    /// Set the HCLK prescaler and update the tracked HCLK frequency.
    ///
    /// The new divisor takes effect 1 to 16 AHB cycles after the write.
    #[inline]
    pub fn set_ahb_prescaler(&mut self, div: AhbPrescaler) -> Result<()> {
        self.set_ahb_prescaler_bits(div.bits())
    }

    /// Set the raw HPRE field.
    ///
    /// Any value up to `0b1111` is accepted; values below `0b1000` divide by 1.
    /// Nothing is written unless HCLK can be tracked for the current clock source.
    pub fn set_ahb_prescaler_bits(&mut self, bits: u32) -> Result<()> {
        if bits > HPRE_MASK {
            return Err(Error::InvalidArgument);
        }
        self.check_source()?;
        pac::write_field(&self.bus, HPRE_SHIFT, HPRE_MASK, bits);
        self.update_hclk().map(|_| ())
    }

    /// Set the APB1 prescaler, keeping PCLK1 at or below [`APB1_MAX`].
    #[inline]
    pub fn set_apb1_prescaler(&mut self, div: ApbPrescaler) -> Result<()> {
        self.set_apb_prescaler(PPRE1_SHIFT, APB1_MAX, div.bits())
    }

    /// Set the raw PPRE1 field, keeping PCLK1 at or below [`APB1_MAX`].
    #[inline]
    pub fn set_apb1_prescaler_bits(&mut self, bits: u32) -> Result<()> {
        self.set_apb_prescaler(PPRE1_SHIFT, APB1_MAX, bits)
    }

    /// Set the APB2 prescaler, keeping PCLK2 at or below [`APB2_MAX`].
    #[inline]
    pub fn set_apb2_prescaler(&mut self, div: ApbPrescaler) -> Result<()> {
        self.set_apb_prescaler(PPRE2_SHIFT, APB2_MAX, div.bits())
    }

    /// Set the raw PPRE2 field, keeping PCLK2 at or below [`APB2_MAX`].
    #[inline]
    pub fn set_apb2_prescaler_bits(&mut self, bits: u32) -> Result<()> {
        self.set_apb_prescaler(PPRE2_SHIFT, APB2_MAX, bits)
    }

    fn set_apb_prescaler(&mut self, shift: u32, limit: u32, bits: u32) -> Result<()> {
        if bits > PPRE_MASK {
            return Err(Error::InvalidArgument);
        }
        self.check_source()?;
        let frequency = self.hclk / apb_divisor(bits);
        if frequency > limit {
            warn!("rcc: {}Hz on the APB bus exceeds {}Hz", frequency, limit);
            return Err(Error::FrequencyLimitExceeded);
        }
        pac::write_field(&self.bus, shift, PPRE_MASK, bits);
        debug!("rcc: APB prescaler {:#05b} at bit {}, {}Hz", bits, shift, frequency);
        Ok(())
    }

    /// Fails unless HCLK is tracked for the current clock source.
    fn check_source(&self) -> Result<()> {
        match self.clock_source() {
            ClockSource::Hsi => Ok(()),
            source => {
                warn!("rcc: cannot track HCLK for {:?}", source);
                Err(Error::UnsupportedClockSource(source))
            }
        }
    }

    /// Recompute the tracked HCLK frequency from the clock source and HPRE field.
    ///
    /// Needs to be called whenever SYSCLK or the AHB prescaler changed behind this
    /// handle's back. Fails for every clock source but HSI, leaving the tracked
    /// frequency as it was.
    pub fn update_hclk(&mut self) -> Result<u32> {
        self.check_source()?;
        let div = ahb_divisor(pac::read_field(&self.bus, HPRE_SHIFT, HPRE_MASK));
        self.hclk = HSI_FREQUENCY / div;
        debug!("rcc: HCLK {}Hz", self.hclk);
        Ok(self.hclk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::pac::CFGR;
    use crate::mmio::mock::FakeBus;

    #[test]
    fn ahb_prescaler_updates_hclk() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::new(&bus);
        assert_eq!(rcc.hclk(), 16_000_000);

        rcc.set_ahb_prescaler(AhbPrescaler::Div4).unwrap();
        assert_eq!(rcc.hclk(), 4_000_000);
        assert_eq!(bus.peek(CFGR), 0b1001 << 4);

        for div in AhbPrescaler::ALL.iter().copied() {
            rcc.set_ahb_prescaler(div).unwrap();
            assert_eq!(rcc.hclk(), HSI_FREQUENCY / div.divisor());
            assert_eq!(rcc.ahb_prescaler(), div);
        }
    }

    #[test]
    fn ahb_prescaler_keeps_other_fields() {
        let bus = FakeBus::new();
        bus.poke(CFGR, 0xFFFF_FF00);
        let mut rcc = Rcc::new(&bus);

        rcc.set_ahb_prescaler(AhbPrescaler::Div2).unwrap();
        assert_eq!(bus.peek(CFGR), 0xFFFF_FF80);
    }

    #[test]
    fn quirk_codes_divide_by_one() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::new(&bus);
        rcc.set_ahb_prescaler(AhbPrescaler::Div8).unwrap();

        rcc.set_ahb_prescaler_bits(0b0111).unwrap();
        assert_eq!(rcc.hclk(), HSI_FREQUENCY);
        assert_eq!(rcc.ahb_prescaler(), AhbPrescaler::Div1);
        assert_eq!(bus.peek(CFGR) >> 4 & 0xF, 0b0111);

        assert_eq!(rcc.set_ahb_prescaler_bits(16), Err(Error::InvalidArgument));
        assert_eq!(bus.peek(CFGR) >> 4 & 0xF, 0b0111);
    }

    #[test]
    fn update_hclk_is_idempotent() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::new(&bus);
        bus.poke(CFGR, 0b1100 << 4);

        assert_eq!(rcc.update_hclk(), Ok(250_000));
        assert_eq!(rcc.update_hclk(), Ok(250_000));
        assert_eq!(rcc.hclk(), 250_000);
    }

    #[test]
    fn other_clock_sources_are_not_tracked() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::new(&bus);
        rcc.set_ahb_prescaler(AhbPrescaler::Div2).unwrap();

        bus.poke(CFGR, 0b1001 << 4 | 0b01 << 2 | 0b01);
        assert_eq!(rcc.clock_source(), ClockSource::Hse);
        assert_eq!(
            rcc.update_hclk(),
            Err(Error::UnsupportedClockSource(ClockSource::Hse))
        );
        assert_eq!(rcc.hclk(), 8_000_000);

        bus.poke(CFGR, 0b10 << 2 | 0b10);
        assert_eq!(
            rcc.set_ahb_prescaler(AhbPrescaler::Div1),
            Err(Error::UnsupportedClockSource(ClockSource::PllP))
        );
        assert_eq!(rcc.hclk(), 8_000_000);
    }

    #[test]
    fn prescalers_are_not_written_for_untracked_sources() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::new(&bus);
        let hse = 0b01 << 2 | 0b01;
        bus.poke(CFGR, hse);

        assert_eq!(
            rcc.set_ahb_prescaler(AhbPrescaler::Div4),
            Err(Error::UnsupportedClockSource(ClockSource::Hse))
        );
        assert_eq!(
            rcc.set_apb1_prescaler(ApbPrescaler::Div1),
            Err(Error::UnsupportedClockSource(ClockSource::Hse))
        );
        assert_eq!(
            rcc.set_apb2_prescaler(ApbPrescaler::Div2),
            Err(Error::UnsupportedClockSource(ClockSource::Hse))
        );

        assert!(bus.writes_to(CFGR).is_empty());
        assert_eq!(bus.peek(CFGR), hse);
        assert_eq!(rcc.ahb_prescaler(), AhbPrescaler::Div1);
        assert_eq!(rcc.hclk(), HSI_FREQUENCY);
    }

    #[test]
    fn apb1_ceiling_boundary() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::with_hclk(&bus, 90_000_000);

        assert_eq!(
            rcc.set_apb1_prescaler(ApbPrescaler::Div1),
            Err(Error::FrequencyLimitExceeded)
        );
        assert!(bus.writes_to(CFGR).is_empty());

        rcc.set_apb1_prescaler(ApbPrescaler::Div2).unwrap();
        assert_eq!(rcc.pclk1(), 45_000_000);
        assert_eq!(rcc.apb1_prescaler(), ApbPrescaler::Div2);
        assert_eq!(bus.peek(CFGR), 0b100 << 10);
    }

    #[test]
    fn apb1_ceiling_leaves_register_unchanged() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::with_hclk(&bus, 180_000_000);
        bus.poke(CFGR, 0b101 << 10);

        assert_eq!(
            rcc.set_apb1_prescaler(ApbPrescaler::Div2),
            Err(Error::FrequencyLimitExceeded)
        );
        assert_eq!(bus.peek(CFGR), 0b101 << 10);
        assert_eq!(rcc.pclk1(), 45_000_000);
    }

    #[test]
    fn apb2_ceiling_boundary() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::with_hclk(&bus, 180_000_000);
        bus.poke(CFGR, 0b111 << 13);

        assert_eq!(
            rcc.set_apb2_prescaler(ApbPrescaler::Div1),
            Err(Error::FrequencyLimitExceeded)
        );
        assert!(bus.writes_to(CFGR).is_empty());
        assert_eq!(rcc.apb2_prescaler(), ApbPrescaler::Div16);

        rcc.set_apb2_prescaler(ApbPrescaler::Div2).unwrap();
        assert_eq!(rcc.pclk2(), 90_000_000);
        assert_eq!(rcc.apb2_prescaler(), ApbPrescaler::Div2);
        assert_eq!(bus.peek(CFGR), 0b100 << 13);
    }

    #[test]
    fn apb_fields_are_independent() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::new(&bus);

        rcc.set_apb1_prescaler(ApbPrescaler::Div16).unwrap();
        rcc.set_apb2_prescaler(ApbPrescaler::Div4).unwrap();
        rcc.set_apb1_prescaler(ApbPrescaler::Div8).unwrap();

        assert_eq!(rcc.apb1_prescaler(), ApbPrescaler::Div8);
        assert_eq!(rcc.apb2_prescaler(), ApbPrescaler::Div4);
        assert_eq!(rcc.pclk1(), 2_000_000);
        assert_eq!(rcc.pclk2(), 4_000_000);
        assert_eq!(rcc.ahb_prescaler(), AhbPrescaler::Div1);
    }

    #[test]
    fn raw_apb_codes_are_validated() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::new(&bus);

        assert_eq!(rcc.set_apb1_prescaler_bits(8), Err(Error::InvalidArgument));
        assert_eq!(rcc.set_apb2_prescaler_bits(8), Err(Error::InvalidArgument));
        assert!(bus.writes_to(CFGR).is_empty());

        rcc.set_apb2_prescaler_bits(0b011).unwrap();
        assert_eq!(rcc.pclk2(), HSI_FREQUENCY);
    }

    #[test]
    fn slowed_hclk_admits_undivided_apb1() {
        let bus = FakeBus::new();
        let mut rcc = Rcc::new(&bus);

        rcc.set_ahb_prescaler(AhbPrescaler::Div4).unwrap();
        assert_eq!(rcc.hclk(), 4_000_000);
        rcc.set_apb1_prescaler(ApbPrescaler::Div1).unwrap();
        assert_eq!(rcc.pclk1(), 4_000_000);

        let mut fast = Rcc::with_hclk(&bus, 200_000_000);
        assert_eq!(
            fast.set_apb1_prescaler(ApbPrescaler::Div1),
            Err(Error::FrequencyLimitExceeded)
        );
    }

    #[test]
    fn registers_match_the_device_map() {
        let rcc = stm32f4::stm32f446::RCC::ptr() as usize;
        assert_eq!(super::pac::RCC_BASE, rcc);
        assert_eq!(CFGR, rcc + 0x08);
        assert_eq!(super::pac::AHB1ENR, rcc + 0x30);
    }

    #[test]
    fn take_hands_out_one_handle() {
        assert!(Rcc::take().is_some());
        assert!(Rcc::take().is_none());
    }
}
