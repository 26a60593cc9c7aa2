#![no_main]
#![no_std]

extern crate panic_halt;

use cortex_m_rt::entry;
use cortex_m_semihosting::hprintln;

use embedded_hal::digital::v2::{InputPin, OutputPin};
use nucleo::gpio::{self, AlternateFunction, Config, Ports, Pull};
use nucleo::{Error, PinState};

// LED on PA5, user button (B1) on PC13.
const LED_PIN: gpio::Gpio = gpio::PA5;
const BUTTON_PIN: gpio::Gpio = gpio::PC13;

#[entry]
fn main() -> ! {
    hprintln!("Hello! This is the Lock example.");

    let mut ports = Ports::take().unwrap();
    ports.enable(gpio::Port::A);
    ports.enable(gpio::Port::C);

    ports
        .configure(LED_PIN, &Config::output(PinState::Reset))
        .unwrap();
    ports
        .configure(BUTTON_PIN, &Config::input().pull(Pull::None))
        .unwrap();
    // USART2 TX/RX.
    ports
        .configure(gpio::PA2, &Config::alternate(AlternateFunction::AF7))
        .unwrap();
    ports
        .configure(gpio::PA3, &Config::alternate(AlternateFunction::AF7))
        .unwrap();

    let mask = LED_PIN.1.mask() | gpio::PA2.1.mask() | gpio::PA3.1.mask();
    match ports.lock(gpio::Port::A, mask) {
        Ok(()) => hprintln!("Port A locked: {:#06x}", ports.locked_pins(gpio::Port::A)),
        Err(e) => hprintln!("Lock failed: {}", e),
    }

    // The configuration is frozen now.
    let again = ports.configure(LED_PIN, &Config::input());
    assert_eq!(again, Err(Error::PinLocked));
    assert_eq!(ports.lock(gpio::Port::A, mask), Err(Error::AlreadyLocked));

    let button = ports.line(BUTTON_PIN);
    let mut led = ports.line(LED_PIN);
    loop {
        // The button pulls PC13 low when pressed.
        if button.is_low().unwrap() {
            led.set_high().unwrap();
        } else {
            led.set_low().unwrap();
        }
    }
}
