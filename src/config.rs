//! Build-time configuration for the dimmer firmware

use crate::channel::FadeMode;
use crate::fade::StepPolicy;
use crate::gesture::{Action, Binding, Pattern, Rule};

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate (debug console)
pub const UART_BAUD: u32 = 9600;

/// PWM resolution; Timer1 counts 0..=DUTY_MAX
pub const DUTY_MAX: u16 = 0x3ff;

/// Number of PWM light channels
pub const CHANNELS: usize = 2;

/// Number of monitored button lines
pub const INPUT_LINES: usize = 6;

/// Watchdog tick period in milliseconds
pub const TICK_MS: u16 = 16;

#[cfg(not(feature = "proportional-step"))]
pub const STEP_POLICY: StepPolicy = StepPolicy::UNIT;
#[cfg(feature = "proportional-step")]
pub const STEP_POLICY: StepPolicy = StepPolicy::EIGHTHS;

/// Everything the controller is built from.
#[derive(Clone, Copy, Debug)]
pub struct Config<const N: usize> {
    pub duty_max: u16,
    pub step: StepPolicy,
    pub bindings: [Binding; N],
    /// Tried in order, first match wins.
    pub gestures: &'static [Rule],
}

/// Groups of three: A, B, C.
pub const THREE_BUTTON_GESTURES: [Rule; 6] = [
    Rule::new(Pattern::Pair(0, 1), Action::Fade(FadeMode::FadeOut)),
    Rule::new(Pattern::Pair(0, 2), Action::FadeInFromDark),
    Rule::new(Pattern::Pair(1, 2), Action::Fade(FadeMode::FadeInOutContinuous)),
    Rule::new(Pattern::Single(0), Action::Toggle),
    Rule::new(Pattern::Single(1), Action::Halve),
    Rule::new(Pattern::Single(2), Action::Double),
];

/// Groups of four: off, on, dim-down, dim-up.
pub const FOUR_BUTTON_GESTURES: [Rule; 7] = [
    Rule::new(Pattern::Pair(0, 1), Action::Fade(FadeMode::FadeInOutContinuous)),
    Rule::new(Pattern::Pair(0, 2), Action::Fade(FadeMode::FadeOut)),
    Rule::new(Pattern::Pair(1, 3), Action::Fade(FadeMode::FadeIn)),
    Rule::new(Pattern::Single(0), Action::Off),
    Rule::new(Pattern::Single(1), Action::On),
    Rule::new(Pattern::Single(2), Action::Halve),
    Rule::new(Pattern::Single(3), Action::Double),
];

// Line n is PD(n + 2).
#[cfg(not(feature = "four-button"))]
pub const BOARD: Config<CHANNELS> = Config {
    duty_max: DUTY_MAX,
    step: STEP_POLICY,
    bindings: [Binding::new(&[0, 1, 2]), Binding::new(&[3, 4, 5])],
    gestures: &THREE_BUTTON_GESTURES,
};

// Six lines don't make two groups of four; the second light gets the off/on
// pair only.
#[cfg(feature = "four-button")]
pub const BOARD: Config<CHANNELS> = Config {
    duty_max: DUTY_MAX,
    step: STEP_POLICY,
    bindings: [Binding::new(&[0, 1, 2, 3]), Binding::new(&[4, 5])],
    gestures: &FOUR_BUTTON_GESTURES,
};
