//! Timer1 PWM
//!
//! Fast PWM with ICR1 as TOP (mode 14), so the resolution is whatever the
//! firmware asks for rather than a fixed 8/9/10 bits. Outputs on OC1A (PB1)
//! and OC1B (PB2), non-inverting.
//!
//! `OCR1x = 0` still gives a one-clock pulse per period. A disabled channel
//! disconnects its compare output and the pin falls back to its PORTB level,
//! which the board drives low.

use avr_device::atmega328p::TC1;
use embedded_hal::PwmPin;

/// Clock select for TCCR1B
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Prescaler {
    Stop = 0,
    Direct = 1,
    Div8 = 2,
    Div64 = 3,
    Div256 = 4,
    Div1024 = 5,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    A,
    B,
}

const WGM11: u8 = 1 << 1;
const WGM12: u8 = 1 << 3;
const WGM13: u8 = 1 << 4;
const COM1A1: u8 = 1 << 7;
const COM1B1: u8 = 1 << 5;
const CS_MASK: u8 = 0x07;

pub struct Timer1Pwm {
    top: u16,
}

impl Timer1Pwm {
    /// Takes the timer stopped, outputs disconnected.
    pub fn new(_tc1: TC1) -> Self {
        unsafe {
            let p = TC1::ptr();
            (*p).timsk1.write(|w| w.bits(0));
            (*p).tccr1b.write(|w| w.bits(0));
            (*p).tccr1a.write(|w| w.bits(WGM11));
            (*p).ocr1a.write(|w| w.bits(0));
            (*p).ocr1b.write(|w| w.bits(0));
            (*p).tcnt1.write(|w| w.bits(0));
        }
        Self { top: 0 }
    }

    /// Set TOP, i.e. the maximum duty.
    pub fn set_resolution(&mut self, top: u16) {
        self.top = top;
        unsafe {
            (*TC1::ptr()).icr1.write(|w| w.bits(top));
        }
    }

    pub fn start(&mut self, prescaler: Prescaler) {
        unsafe {
            (*TC1::ptr())
                .tccr1b
                .write(|w| w.bits(WGM13 | WGM12 | (prescaler as u8 & CS_MASK)));
        }
    }

    pub fn stop(&mut self) {
        unsafe {
            (*TC1::ptr())
                .tccr1b
                .modify(|r, w| w.bits(r.bits() & !CS_MASK));
        }
    }

    pub fn split(&self) -> [Timer1Channel; 2] {
        [
            Timer1Channel { channel: Channel::A, top: self.top },
            Timer1Channel { channel: Channel::B, top: self.top },
        ]
    }
}

/// One compare output of Timer1.
pub struct Timer1Channel {
    channel: Channel,
    top: u16,
}

impl Timer1Channel {
    fn com_bit(&self) -> u8 {
        match self.channel {
            Channel::A => COM1A1,
            Channel::B => COM1B1,
        }
    }
}

impl PwmPin for Timer1Channel {
    type Duty = u16;

    fn disable(&mut self) {
        let com = self.com_bit();
        unsafe {
            (*TC1::ptr()).tccr1a.modify(|r, w| w.bits(r.bits() & !com));
        }
    }

    fn enable(&mut self) {
        let com = self.com_bit();
        unsafe {
            (*TC1::ptr()).tccr1a.modify(|r, w| w.bits(r.bits() | com));
        }
    }

    fn get_duty(&self) -> u16 {
        unsafe {
            let p = TC1::ptr();
            match self.channel {
                Channel::A => (*p).ocr1a.read().bits(),
                Channel::B => (*p).ocr1b.read().bits(),
            }
        }
    }

    fn get_max_duty(&self) -> u16 {
        self.top
    }

    fn set_duty(&mut self, duty: u16) {
        let duty = duty.min(self.top);
        unsafe {
            let p = TC1::ptr();
            match self.channel {
                Channel::A => (*p).ocr1a.write(|w| w.bits(duty)),
                Channel::B => (*p).ocr1b.write(|w| w.bits(duty)),
            }
        }
    }
}
