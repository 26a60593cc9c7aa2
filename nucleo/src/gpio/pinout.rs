//! Named pins of every port.
//!
//! [`PA5`] drives the user LED (LD2) of the Nucleo-64 board.

use super::{Gpio, Pin, Port};

pub const PA0: Gpio = Gpio(Port::A, Pin::P0);
pub const PA1: Gpio = Gpio(Port::A, Pin::P1);
pub const PA2: Gpio = Gpio(Port::A, Pin::P2);
pub const PA3: Gpio = Gpio(Port::A, Pin::P3);
pub const PA4: Gpio = Gpio(Port::A, Pin::P4);
pub const PA5: Gpio = Gpio(Port::A, Pin::P5);
pub const PA6: Gpio = Gpio(Port::A, Pin::P6);
pub const PA7: Gpio = Gpio(Port::A, Pin::P7);
pub const PA8: Gpio = Gpio(Port::A, Pin::P8);
pub const PA9: Gpio = Gpio(Port::A, Pin::P9);
pub const PA10: Gpio = Gpio(Port::A, Pin::P10);
pub const PA11: Gpio = Gpio(Port::A, Pin::P11);
pub const PA12: Gpio = Gpio(Port::A, Pin::P12);
pub const PA13: Gpio = Gpio(Port::A, Pin::P13);
pub const PA14: Gpio = Gpio(Port::A, Pin::P14);
pub const PA15: Gpio = Gpio(Port::A, Pin::P15);

pub const PB0: Gpio = Gpio(Port::B, Pin::P0);
pub const PB1: Gpio = Gpio(Port::B, Pin::P1);
pub const PB2: Gpio = Gpio(Port::B, Pin::P2);
pub const PB3: Gpio = Gpio(Port::B, Pin::P3);
pub const PB4: Gpio = Gpio(Port::B, Pin::P4);
pub const PB5: Gpio = Gpio(Port::B, Pin::P5);
pub const PB6: Gpio = Gpio(Port::B, Pin::P6);
pub const PB7: Gpio = Gpio(Port::B, Pin::P7);
pub const PB8: Gpio = Gpio(Port::B, Pin::P8);
pub const PB9: Gpio = Gpio(Port::B, Pin::P9);
pub const PB10: Gpio = Gpio(Port::B, Pin::P10);
pub const PB11: Gpio = Gpio(Port::B, Pin::P11);
pub const PB12: Gpio = Gpio(Port::B, Pin::P12);
pub const PB13: Gpio = Gpio(Port::B, Pin::P13);
pub const PB14: Gpio = Gpio(Port::B, Pin::P14);
pub const PB15: Gpio = Gpio(Port::B, Pin::P15);

pub const PC0: Gpio = Gpio(Port::C, Pin::P0);
pub const PC1: Gpio = Gpio(Port::C, Pin::P1);
pub const PC2: Gpio = Gpio(Port::C, Pin::P2);
pub const PC3: Gpio = Gpio(Port::C, Pin::P3);
pub const PC4: Gpio = Gpio(Port::C, Pin::P4);
pub const PC5: Gpio = Gpio(Port::C, Pin::P5);
pub const PC6: Gpio = Gpio(Port::C, Pin::P6);
pub const PC7: Gpio = Gpio(Port::C, Pin::P7);
pub const PC8: Gpio = Gpio(Port::C, Pin::P8);
pub const PC9: Gpio = Gpio(Port::C, Pin::P9);
pub const PC10: Gpio = Gpio(Port::C, Pin::P10);
pub const PC11: Gpio = Gpio(Port::C, Pin::P11);
pub const PC12: Gpio = Gpio(Port::C, Pin::P12);
pub const PC13: Gpio = Gpio(Port::C, Pin::P13);
pub const PC14: Gpio = Gpio(Port::C, Pin::P14);
pub const PC15: Gpio = Gpio(Port::C, Pin::P15);

pub const PD0: Gpio = Gpio(Port::D, Pin::P0);
pub const PD1: Gpio = Gpio(Port::D, Pin::P1);
pub const PD2: Gpio = Gpio(Port::D, Pin::P2);
pub const PD3: Gpio = Gpio(Port::D, Pin::P3);
pub const PD4: Gpio = Gpio(Port::D, Pin::P4);
pub const PD5: Gpio = Gpio(Port::D, Pin::P5);
pub const PD6: Gpio = Gpio(Port::D, Pin::P6);
pub const PD7: Gpio = Gpio(Port::D, Pin::P7);
pub const PD8: Gpio = Gpio(Port::D, Pin::P8);
pub const PD9: Gpio = Gpio(Port::D, Pin::P9);
pub const PD10: Gpio = Gpio(Port::D, Pin::P10);
pub const PD11: Gpio = Gpio(Port::D, Pin::P11);
pub const PD12: Gpio = Gpio(Port::D, Pin::P12);
pub const PD13: Gpio = Gpio(Port::D, Pin::P13);
pub const PD14: Gpio = Gpio(Port::D, Pin::P14);
pub const PD15: Gpio = Gpio(Port::D, Pin::P15);

pub const PE0: Gpio = Gpio(Port::E, Pin::P0);
pub const PE1: Gpio = Gpio(Port::E, Pin::P1);
pub const PE2: Gpio = Gpio(Port::E, Pin::P2);
pub const PE3: Gpio = Gpio(Port::E, Pin::P3);
pub const PE4: Gpio = Gpio(Port::E, Pin::P4);
pub const PE5: Gpio = Gpio(Port::E, Pin::P5);
pub const PE6: Gpio = Gpio(Port::E, Pin::P6);
pub const PE7: Gpio = Gpio(Port::E, Pin::P7);
pub const PE8: Gpio = Gpio(Port::E, Pin::P8);
pub const PE9: Gpio = Gpio(Port::E, Pin::P9);
pub const PE10: Gpio = Gpio(Port::E, Pin::P10);
pub const PE11: Gpio = Gpio(Port::E, Pin::P11);
pub const PE12: Gpio = Gpio(Port::E, Pin::P12);
pub const PE13: Gpio = Gpio(Port::E, Pin::P13);
pub const PE14: Gpio = Gpio(Port::E, Pin::P14);
pub const PE15: Gpio = Gpio(Port::E, Pin::P15);

pub const PF0: Gpio = Gpio(Port::F, Pin::P0);
pub const PF1: Gpio = Gpio(Port::F, Pin::P1);
pub const PF2: Gpio = Gpio(Port::F, Pin::P2);
pub const PF3: Gpio = Gpio(Port::F, Pin::P3);
pub const PF4: Gpio = Gpio(Port::F, Pin::P4);
pub const PF5: Gpio = Gpio(Port::F, Pin::P5);
pub const PF6: Gpio = Gpio(Port::F, Pin::P6);
pub const PF7: Gpio = Gpio(Port::F, Pin::P7);
pub const PF8: Gpio = Gpio(Port::F, Pin::P8);
pub const PF9: Gpio = Gpio(Port::F, Pin::P9);
pub const PF10: Gpio = Gpio(Port::F, Pin::P10);
pub const PF11: Gpio = Gpio(Port::F, Pin::P11);
pub const PF12: Gpio = Gpio(Port::F, Pin::P12);
pub const PF13: Gpio = Gpio(Port::F, Pin::P13);
pub const PF14: Gpio = Gpio(Port::F, Pin::P14);
pub const PF15: Gpio = Gpio(Port::F, Pin::P15);

pub const PG0: Gpio = Gpio(Port::G, Pin::P0);
pub const PG1: Gpio = Gpio(Port::G, Pin::P1);
pub const PG2: Gpio = Gpio(Port::G, Pin::P2);
pub const PG3: Gpio = Gpio(Port::G, Pin::P3);
pub const PG4: Gpio = Gpio(Port::G, Pin::P4);
pub const PG5: Gpio = Gpio(Port::G, Pin::P5);
pub const PG6: Gpio = Gpio(Port::G, Pin::P6);
pub const PG7: Gpio = Gpio(Port::G, Pin::P7);
pub const PG8: Gpio = Gpio(Port::G, Pin::P8);
pub const PG9: Gpio = Gpio(Port::G, Pin::P9);
pub const PG10: Gpio = Gpio(Port::G, Pin::P10);
pub const PG11: Gpio = Gpio(Port::G, Pin::P11);
pub const PG12: Gpio = Gpio(Port::G, Pin::P12);
pub const PG13: Gpio = Gpio(Port::G, Pin::P13);
pub const PG14: Gpio = Gpio(Port::G, Pin::P14);
pub const PG15: Gpio = Gpio(Port::G, Pin::P15);

pub const PH0: Gpio = Gpio(Port::H, Pin::P0);
pub const PH1: Gpio = Gpio(Port::H, Pin::P1);
pub const PH2: Gpio = Gpio(Port::H, Pin::P2);
pub const PH3: Gpio = Gpio(Port::H, Pin::P3);
pub const PH4: Gpio = Gpio(Port::H, Pin::P4);
pub const PH5: Gpio = Gpio(Port::H, Pin::P5);
pub const PH6: Gpio = Gpio(Port::H, Pin::P6);
pub const PH7: Gpio = Gpio(Port::H, Pin::P7);
pub const PH8: Gpio = Gpio(Port::H, Pin::P8);
pub const PH9: Gpio = Gpio(Port::H, Pin::P9);
pub const PH10: Gpio = Gpio(Port::H, Pin::P10);
pub const PH11: Gpio = Gpio(Port::H, Pin::P11);
pub const PH12: Gpio = Gpio(Port::H, Pin::P12);
pub const PH13: Gpio = Gpio(Port::H, Pin::P13);
pub const PH14: Gpio = Gpio(Port::H, Pin::P14);
pub const PH15: Gpio = Gpio(Port::H, Pin::P15);
