#![no_main]
#![no_std]

extern crate panic_halt;

use cortex_m_rt::entry;
use cortex_m_semihosting::hprintln;

use nucleo::clock::Rcc;
use nucleo::delay::Delay;
use nucleo::gpio::{self, Config, Ports};
use nucleo::PinState;

// User LED (LD2) on PA5.
const LED_PIN: gpio::Gpio = gpio::PA5;

#[entry]
fn main() -> ! {
    if cfg!(debug_assertions) {
        hprintln!("Hello! This is the Blink example.");
    }

    // System setup.
    let rcc = Rcc::take().unwrap();
    let mut ports = Ports::take().unwrap();
    let mut delay = Delay::new(&rcc);

    ports.enable(gpio::Port::A);
    ports
        .configure(LED_PIN, &Config::output(PinState::Reset))
        .unwrap();

    loop {
        // Blink led.
        delay.millis(500);
        ports.toggle(LED_PIN);
    }
}
