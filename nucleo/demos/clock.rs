#![no_main]
#![no_std]

extern crate panic_halt;

use cortex_m_rt::entry;
use cortex_m_semihosting::hprintln;

use nucleo::clock::{AhbPrescaler, ApbPrescaler, Rcc};
use nucleo::delay::Delay;
use nucleo::gpio::{self, Config, Ports, Speed};
use nucleo::PinState;

const LED_PIN: gpio::Gpio = gpio::PA5;

#[entry]
fn main() -> ! {
    hprintln!("Hello! This is the Clock example.");

    let mut rcc = Rcc::take().unwrap();

    // HCLK: 16MHz / 4.
    rcc.set_ahb_prescaler(AhbPrescaler::Div4).unwrap();
    rcc.set_apb1_prescaler(ApbPrescaler::Div2).unwrap();
    rcc.set_apb2_prescaler(ApbPrescaler::Div1).unwrap();

    hprintln!(
        "HCLK {}Hz, PCLK1 {}Hz, PCLK2 {}Hz",
        rcc.hclk(),
        rcc.pclk1(),
        rcc.pclk2()
    );

    let mut ports = Ports::take().unwrap();
    ports.enable(gpio::Port::A);
    ports
        .configure(LED_PIN, &Config::output(PinState::Reset).speed(Speed::Low))
        .unwrap();

    // Same 500ms period as the Blink example, at a quarter of the clock.
    let mut delay = Delay::new(&rcc);
    loop {
        delay.millis(500);
        ports.toggle(LED_PIN);
    }
}
