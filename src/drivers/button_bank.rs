//! Monitored input lines.

use embedded_hal::digital::v2::InputPin;

/// Level read of a fixed set of input lines.
pub trait Buttons {
    fn lines(&self) -> usize;

    /// Whether `line` is held. Lines out of range read as released.
    fn read_pressed(&self, line: usize) -> bool;
}

/// Buttons wired to ground with pull-ups: pressed reads low.
pub struct ActiveLow<P, const N: usize> {
    pins: [P; N],
}

impl<P: InputPin, const N: usize> ActiveLow<P, N> {
    pub fn new(pins: [P; N]) -> Self {
        Self { pins }
    }

    pub fn free(self) -> [P; N] {
        self.pins
    }
}

impl<P: InputPin, const N: usize> Buttons for ActiveLow<P, N> {
    #[inline]
    fn lines(&self) -> usize {
        N
    }

    // A pin that fails to read counts as released.
    fn read_pressed(&self, line: usize) -> bool {
        self.pins
            .get(line)
            .map_or(false, |pin| pin.is_low().unwrap_or(false))
    }
}
