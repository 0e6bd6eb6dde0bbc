#![allow(dead_code)]

use dimmer_firmware::drivers::{Buttons, PwmBank, PwmOutput};
use dimmer_firmware::gesture::Binding;
use dimmer_firmware::{Config, Dimmer, StepPolicy};
use embedded_hal::PwmPin;

pub const MAX: u16 = 1023;

pub fn config(step: StepPolicy) -> Config<2> {
    Config {
        duty_max: MAX,
        step,
        bindings: [Binding::new(&[0, 1, 2]), Binding::new(&[3, 4, 5])],
        gestures: &dimmer_firmware::config::THREE_BUTTON_GESTURES,
    }
}

pub fn dimmer(step: StepPolicy) -> Dimmer<2> {
    Dimmer::new(&config(step))
}

/// Records what the controller wrote.
#[derive(Debug, Default)]
pub struct FakePin {
    pub duty: u16,
    pub enabled: bool,
}

impl PwmPin for FakePin {
    type Duty = u16;

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn get_duty(&self) -> u16 {
        self.duty
    }

    fn get_max_duty(&self) -> u16 {
        MAX
    }

    fn set_duty(&mut self, duty: u16) {
        assert!(duty <= MAX, "duty {duty} above resolution");
        self.duty = duty;
    }
}

pub fn pwm() -> PwmBank<FakePin, 2> {
    let mut bank = PwmBank::new([FakePin::default(), FakePin::default()]);
    bank.start();
    bank
}

/// Counts duty writes on their way to `inner`.
pub struct Counting<P> {
    pub inner: P,
    pub writes: usize,
}

impl<P: PwmOutput> Counting<P> {
    pub fn new(inner: P) -> Self {
        Self { inner, writes: 0 }
    }
}

impl<P: PwmOutput> PwmOutput for Counting<P> {
    fn get_duty(&self, channel: usize) -> u16 {
        self.inner.get_duty(channel)
    }

    fn set_duty(&mut self, channel: usize, duty: u16) {
        self.writes += 1;
        self.inner.set_duty(channel, duty);
    }
}

/// Lines held, as a bitmask.
#[derive(Clone, Copy, Debug)]
pub struct Held(pub u32);

impl Held {
    pub fn keys(lines: &[usize]) -> Self {
        Held(lines.iter().fold(0, |acc, &line| acc | 1 << line))
    }

    pub fn none() -> Self {
        Held(0)
    }
}

impl Buttons for Held {
    fn lines(&self) -> usize {
        6
    }

    fn read_pressed(&self, line: usize) -> bool {
        self.0 & (1 << line) != 0
    }
}

/// xorshift32, enough to shuffle gesture sequences.
pub struct Rng(u32);

impl Rng {
    pub fn new(seed: u32) -> Self {
        Rng(seed.max(1))
    }

    pub fn next(&mut self) -> u32 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.0 = x;
        x
    }

    pub fn below(&mut self, n: u32) -> u32 {
        self.next() % n
    }
}
