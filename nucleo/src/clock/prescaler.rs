//! AHB and APB prescaler encodings.
//!
//! The divisor is not `1 << code`: the AHB field skips divide by 32, so decoding takes a
//! branch on bit 2 in addition to the enable bit.

use core::convert::TryFrom;

use crate::status::{Error, Result};

/// HPRE field codes.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AhbPrescaler {
    Div1 = 0b0000,
    Div2 = 0b1000,
    Div4 = 0b1001,
    Div8 = 0b1010,
    Div16 = 0b1011,
    Div64 = 0b1100,
    Div128 = 0b1101,
    Div256 = 0b1110,
    Div512 = 0b1111,
}

/// PPRE1/PPRE2 field codes.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApbPrescaler {
    Div1 = 0b000,
    Div2 = 0b100,
    Div4 = 0b101,
    Div8 = 0b110,
    Div16 = 0b111,
}

/// Divisor selected by a raw HPRE field.
///
/// Any code with bit 3 clear divides by 1.
#[inline]
pub(crate) fn ahb_divisor(field: u32) -> u32 {
    if field & 0b1000 == 0 {
        1
    } else if field & 0b0100 != 0 {
        64 << (field & 0b11)
    } else {
        2 << (field & 0b11)
    }
}

/// Divisor selected by a raw PPRE field.
///
/// Any code with bit 2 clear divides by 1.
#[inline]
pub(crate) fn apb_divisor(field: u32) -> u32 {
    if field & 0b100 == 0 {
        1
    } else {
        2 << (field & 0b11)
    }
}

impl AhbPrescaler {
    pub const ALL: [AhbPrescaler; 9] = [
        AhbPrescaler::Div1,
        AhbPrescaler::Div2,
        AhbPrescaler::Div4,
        AhbPrescaler::Div8,
        AhbPrescaler::Div16,
        AhbPrescaler::Div64,
        AhbPrescaler::Div128,
        AhbPrescaler::Div256,
        AhbPrescaler::Div512,
    ];

    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn divisor(self) -> u32 {
        ahb_divisor(self.bits())
    }

    /// Prescaler selected by a raw HPRE field; codes below `0b1000` read as `Div1`.
    #[inline]
    pub fn from_field(field: u32) -> Self {
        let field = field & 0b1111;
        if field & 0b1000 == 0 {
            AhbPrescaler::Div1
        } else {
            AhbPrescaler::ALL[(field & 0b0111) as usize + 1]
        }
    }
}

impl TryFrom<u32> for AhbPrescaler {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        AhbPrescaler::ALL
            .iter()
            .copied()
            .find(|div| div.bits() == bits)
            .ok_or(Error::InvalidArgument)
    }
}

impl ApbPrescaler {
    pub const ALL: [ApbPrescaler; 5] = [
        ApbPrescaler::Div1,
        ApbPrescaler::Div2,
        ApbPrescaler::Div4,
        ApbPrescaler::Div8,
        ApbPrescaler::Div16,
    ];

    #[inline]
    pub fn bits(self) -> u32 {
        self as u32
    }

    #[inline]
    pub fn divisor(self) -> u32 {
        apb_divisor(self.bits())
    }

    /// Prescaler selected by a raw PPRE field; codes below `0b100` read as `Div1`.
    #[inline]
    pub fn from_field(field: u32) -> Self {
        let field = field & 0b111;
        if field & 0b100 == 0 {
            ApbPrescaler::Div1
        } else {
            ApbPrescaler::ALL[(field & 0b011) as usize + 1]
        }
    }
}

impl TryFrom<u32> for ApbPrescaler {
    type Error = Error;

    fn try_from(bits: u32) -> Result<Self> {
        ApbPrescaler::ALL
            .iter()
            .copied()
            .find(|div| div.bits() == bits)
            .ok_or(Error::InvalidArgument)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ahb_codes_decode_to_documented_divisors() {
        let divisors: Vec<u32> = AhbPrescaler::ALL.iter().map(|div| div.divisor()).collect();
        assert_eq!(divisors, [1, 2, 4, 8, 16, 64, 128, 256, 512]);
    }

    #[test]
    fn apb_codes_decode_to_documented_divisors() {
        let divisors: Vec<u32> = ApbPrescaler::ALL.iter().map(|div| div.divisor()).collect();
        assert_eq!(divisors, [1, 2, 4, 8, 16]);
    }

    #[test]
    fn codes_without_enable_bit_divide_by_one() {
        for field in 0..0b1000 {
            assert_eq!(ahb_divisor(field), 1);
            assert_eq!(AhbPrescaler::from_field(field), AhbPrescaler::Div1);
        }
        for field in 0..0b100 {
            assert_eq!(apb_divisor(field), 1);
            assert_eq!(ApbPrescaler::from_field(field), ApbPrescaler::Div1);
        }
    }

    #[test]
    fn field_decoding_matches_the_codes() {
        for div in AhbPrescaler::ALL.iter().copied() {
            assert_eq!(AhbPrescaler::from_field(div.bits()), div);
            assert_eq!(AhbPrescaler::try_from(div.bits()), Ok(div));
        }
        for div in ApbPrescaler::ALL.iter().copied() {
            assert_eq!(ApbPrescaler::from_field(div.bits()), div);
            assert_eq!(ApbPrescaler::try_from(div.bits()), Ok(div));
        }
    }

    #[test]
    fn undefined_codes_are_rejected() {
        assert_eq!(AhbPrescaler::try_from(0b0011), Err(Error::InvalidArgument));
        assert_eq!(AhbPrescaler::try_from(16), Err(Error::InvalidArgument));
        assert_eq!(ApbPrescaler::try_from(0b010), Err(Error::InvalidArgument));
        assert_eq!(ApbPrescaler::try_from(8), Err(Error::InvalidArgument));
    }
}
