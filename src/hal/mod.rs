//! ATmega328P board support: button inputs, Timer1 PWM, watchdog tick,
//! sleep and the debug UART.

pub mod gpio;
pub mod power;
pub mod pwm;
pub mod uart;
pub mod watchdog;

pub use gpio::{Input, Output, Pin, PinChange};
pub use power::Power;
pub use pwm::{Timer1Channel, Timer1Pwm};
pub use uart::Usart0;
pub use watchdog::{Watchdog, WatchdogTimeout};
