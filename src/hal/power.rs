use avr_device::atmega328p::CPU;

use crate::deadline::ResetCause;

/// PRR bits
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Module {
    Adc = 0,
    Usart0 = 1,
    Spi = 2,
    Timer0 = 5,
    Timer2 = 6,
    Twi = 7,
}

const SE: u8 = 1 << 0;
const SM_MASK: u8 = 0x0e;

pub struct Power {
    _private: (),
}

impl Power {
    pub fn new(_cpu: CPU) -> Self {
        Self { _private: () }
    }

    /// Why we came out of reset. Clears the flags, which also has to happen
    /// before a watchdog reset can be switched off.
    pub fn take_reset_cause(&mut self) -> ResetCause {
        unsafe {
            let p = CPU::ptr();
            let flags = (*p).mcusr.read().bits();
            (*p).mcusr.write(|w| w.bits(0));
            ResetCause::from_flags(flags)
        }
    }

    /// Idle: CPU stops, timers and pin change keep running.
    #[inline]
    fn select_idle(&mut self) {
        unsafe {
            (*CPU::ptr()).smcr.modify(|r, w| w.bits(r.bits() & !SM_MASK));
        }
    }

    #[inline]
    fn enable_sleep(&mut self) {
        unsafe {
            (*CPU::ptr()).smcr.modify(|r, w| w.bits(r.bits() | SE));
        }
    }

    #[inline]
    fn disable_sleep(&mut self) {
        unsafe {
            (*CPU::ptr()).smcr.modify(|r, w| w.bits(r.bits() & !SE));
        }
    }

    /// Sleep until the next interrupt. Timer1 keeps running in idle, so the
    /// outputs stay lit.
    pub fn enter_idle_mode(&mut self) {
        self.select_idle();
        self.enable_sleep();
        avr_device::asm::sleep();
        self.disable_sleep();
    }

    // Module clock control
    pub fn disable_module_clock(&mut self, module: Module) {
        unsafe {
            (*CPU::ptr())
                .prr
                .modify(|r, w| w.bits(r.bits() | (1 << module as u8)));
        }
    }
}
