//! PWM outputs, one per light channel.

use embedded_hal::PwmPin;

/// Channel-indexed duty access. Callers clamp duties to the resolution.
pub trait PwmOutput {
    fn get_duty(&self, channel: usize) -> u16;
    fn set_duty(&mut self, channel: usize, duty: u16);
}

/// A fixed set of PWM pins addressed by channel index.
///
/// A pin at duty 0 is kept disabled: fast PWM still emits one timer clock of
/// high per period at a zero compare value, so "off" has to disconnect the
/// output rather than just write 0.
pub struct PwmBank<P, const N: usize> {
    pins: [P; N],
    running: bool,
}

impl<P, const N: usize> PwmBank<P, N>
where
    P: PwmPin<Duty = u16>,
{
    pub fn new(pins: [P; N]) -> Self {
        Self {
            pins,
            running: false,
        }
    }

    /// Connect every pin that has something to show.
    pub fn start(&mut self) {
        self.running = true;
        for pin in self.pins.iter_mut() {
            if pin.get_duty() > 0 {
                pin.enable();
            }
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        for pin in self.pins.iter_mut() {
            pin.disable();
        }
    }
}

impl<P, const N: usize> PwmOutput for PwmBank<P, N>
where
    P: PwmPin<Duty = u16>,
{
    fn get_duty(&self, channel: usize) -> u16 {
        self.pins.get(channel).map_or(0, |pin| pin.get_duty())
    }

    fn set_duty(&mut self, channel: usize, duty: u16) {
        let Some(pin) = self.pins.get_mut(channel) else {
            return;
        };
        pin.set_duty(duty);
        if duty == 0 {
            pin.disable();
        } else if self.running {
            pin.enable();
        }
    }
}
