//! Watchdog in interrupt-then-reset mode.
//!
//! Each arm gives one `WDT` interrupt after the timeout. Hardware clears WDIE
//! when that interrupt fires; if nobody arms again before the next timeout,
//! the watchdog resets the MCU.

use avr_device::atmega328p::WDT;
use embedded_hal::watchdog;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum WatchdogTimeout {
    Ms16 = 0x00,
    Ms32 = 0x01,
    Ms64 = 0x02,
    Ms125 = 0x03,
    Ms250 = 0x04,
    Ms500 = 0x05,
    Ms1000 = 0x06,
    Ms2000 = 0x07,
    Ms4000 = 0x20,
    Ms8000 = 0x21,
}

impl WatchdogTimeout {
    /// Longest timeout not above `ms`, at least 16 ms.
    pub const fn from_millis(ms: u16) -> Self {
        match ms {
            0..=31 => Self::Ms16,
            32..=63 => Self::Ms32,
            64..=124 => Self::Ms64,
            125..=249 => Self::Ms125,
            250..=499 => Self::Ms250,
            500..=999 => Self::Ms500,
            1000..=1999 => Self::Ms1000,
            2000..=3999 => Self::Ms2000,
            4000..=7999 => Self::Ms4000,
            _ => Self::Ms8000,
        }
    }
}

const WDIE: u8 = 1 << 6;
const WDCE: u8 = 1 << 4;
const WDE: u8 = 1 << 3;

pub struct Watchdog {
    _private: (),
}

impl Watchdog {
    #[inline]
    pub fn new(_wdt: WDT) -> Self {
        Self { _private: () }
    }
}

impl watchdog::WatchdogEnable for Watchdog {
    type Time = WatchdogTimeout;

    fn start<T>(&mut self, period: T)
    where
        T: Into<WatchdogTimeout>,
    {
        let timeout = period.into() as u8;
        // timed sequence: the second write has to land within four cycles
        avr_device::interrupt::free(|_| unsafe {
            avr_device::asm::wdr();
            let p = WDT::ptr();
            (*p).wdtcsr.write(|w| w.bits(WDCE | WDE));
            (*p).wdtcsr.write(|w| w.bits(WDIE | WDE | timeout));
        });
    }
}

impl watchdog::Watchdog for Watchdog {
    #[inline]
    fn feed(&mut self) {
        avr_device::asm::wdr();
    }
}

impl watchdog::WatchdogDisable for Watchdog {
    fn disable(&mut self) {
        avr_device::interrupt::free(|_| unsafe {
            avr_device::asm::wdr();
            let p = WDT::ptr();
            (*p).wdtcsr.write(|w| w.bits(WDCE | WDE));
            (*p).wdtcsr.write(|w| w.bits(0x00));
        });
    }
}
