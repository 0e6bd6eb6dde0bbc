use avr_device::atmega328p::{EXINT, PORTB, PORTD};
use core::convert::Infallible;
use core::marker::PhantomData;
use embedded_hal::digital::v2::InputPin;

pub trait PinMode {}
pub struct Unconfigured;
pub struct Input;
pub struct Output;
impl PinMode for Unconfigured {}
impl PinMode for Input {}
impl PinMode for Output {}

/// One bit of a GPIO port. The bit is a runtime value so pins of one port
/// share a type and fit in an array.
#[derive(Debug)]
pub struct Pin<PORT, MODE> {
    bit: u8,
    _port: PhantomData<PORT>,
    _mode: PhantomData<MODE>,
}

impl<PORT> Pin<PORT, Unconfigured> {
    pub const fn new(bit: u8) -> Self {
        Self {
            bit: bit & 0x07,
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

impl<PORT, MODE> Pin<PORT, MODE> {
    #[inline]
    pub fn mask(&self) -> u8 {
        1 << self.bit
    }

    fn retype<NEW>(self) -> Pin<PORT, NEW> {
        Pin {
            bit: self.bit,
            _port: PhantomData,
            _mode: PhantomData,
        }
    }
}

macro_rules! impl_port {
    ($PORT:ident, $pin:ident, $ddr:ident, $port:ident) => {
        impl<MODE: PinMode> Pin<$PORT, MODE> {
            pub fn into_output(self) -> Pin<$PORT, Output> {
                let mask = self.mask();
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | mask));
                }
                self.retype()
            }

            /// Input with the internal pull-up on; buttons pull the line low.
            pub fn into_pull_up_input(self) -> Pin<$PORT, Input> {
                let mask = self.mask();
                unsafe {
                    (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !mask));
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | mask));
                }
                self.retype()
            }
        }

        impl Pin<$PORT, Output> {
            #[inline]
            pub fn set_low(&mut self) {
                let mask = self.mask();
                unsafe {
                    (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !mask));
                }
            }
        }

        impl InputPin for Pin<$PORT, Input> {
            type Error = Infallible;

            #[inline]
            fn is_high(&self) -> Result<bool, Infallible> {
                let bits = unsafe { (*$PORT::ptr()).$pin.read().bits() };
                Ok(bits & self.mask() != 0)
            }

            #[inline]
            fn is_low(&self) -> Result<bool, Infallible> {
                self.is_high().map(|high| !high)
            }
        }
    };
}

impl_port!(PORTB, pinb, ddrb, portb);
impl_port!(PORTD, pind, ddrd, portd);

/// Pin-change interrupt for the button port.
pub struct PinChange {
    _private: (),
}

impl PinChange {
    const PCIE2: u8 = 1 << 2;

    pub fn new(_exint: EXINT) -> Self {
        Self { _private: () }
    }

    /// Fire `PCINT2` on any edge of the PORTD bits in `mask`.
    pub fn enable_port_d(&mut self, mask: u8) {
        unsafe {
            let p = EXINT::ptr();
            (*p).pcmsk2.write(|w| w.bits(mask));
            (*p).pcifr.write(|w| w.bits(Self::PCIE2));
            (*p).pcicr.modify(|r, w| w.bits(r.bits() | Self::PCIE2));
        }
    }
}

// Board wiring
pub mod board {
    use super::*;

    /// Buttons on PD2..PD7, lines 0..5.
    pub type Button = Pin<PORTD, Input>;
    pub const BUTTON_BITS: [u8; 6] = [2, 3, 4, 5, 6, 7];
    pub const BUTTON_MASK: u8 = 0xfc;

    /// OC1A / OC1B
    pub type PwmOut = Pin<PORTB, Output>;
    pub const PWM_BITS: [u8; 2] = [1, 2];

    pub fn buttons() -> [Button; 6] {
        BUTTON_BITS.map(|bit| Pin::<PORTD, Unconfigured>::new(bit).into_pull_up_input())
    }

    pub fn pwm_outputs() -> [PwmOut; 2] {
        PWM_BITS.map(|bit| {
            let mut pin = Pin::<PORTB, Unconfigured>::new(bit).into_output();
            pin.set_low();
            pin
        })
    }
}
