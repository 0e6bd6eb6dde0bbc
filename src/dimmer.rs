//! The dimmer controller: channel table plus its two handlers.
//!
//! A `Dimmer` owns all mutable state. The board keeps it behind an interrupt
//! mutex and lends it by `&mut` to whichever handler is running, so no
//! reference to the table outlives a single handler run.

use embedded_hal::watchdog::WatchdogEnable;

use crate::channel::{Channel, ChannelTable};
use crate::config::Config;
use crate::deadline::Lease;
use crate::drivers::{Buttons, PwmOutput};
use crate::fade::{FadeEngine, TickReport};
use crate::gesture::{GestureDecoder, GestureReport};

pub struct Dimmer<const N: usize> {
    table: ChannelTable<N>,
    decoder: GestureDecoder<N>,
    engine: FadeEngine,
}

impl<const N: usize> Dimmer<N> {
    /// All channels off, remembering full brightness.
    pub const fn new(config: &Config<N>) -> Self {
        Self {
            table: ChannelTable::new(config.duty_max),
            decoder: GestureDecoder::new(config.bindings, config.gestures),
            engine: FadeEngine::new(config.step),
        }
    }

    /// Push the current duties out to the PWM driver, e.g. right after boot.
    pub fn sync<P: PwmOutput>(&self, pwm: &mut P) {
        for (idx, channel) in self.table.as_slice().iter().enumerate() {
            pwm.set_duty(idx, channel.duty());
        }
    }

    /// Pin-change handler.
    pub fn on_input_change<B, P>(&mut self, buttons: &B, pwm: &mut P) -> GestureReport<N>
    where
        B: Buttons + ?Sized,
        P: PwmOutput,
    {
        self.decoder.decode(&mut self.table, buttons, pwm)
    }

    /// Tick handler. Consumes the lease and renews it before returning.
    pub fn on_tick<P, W>(&mut self, pwm: &mut P, lease: Lease<'_, W>) -> TickReport
    where
        P: PwmOutput,
        W: WatchdogEnable,
        W::Time: Copy,
    {
        self.engine.tick(&mut self.table, pwm, lease)
    }

    pub fn channel(&self, idx: usize) -> Option<&Channel> {
        self.table.get(idx)
    }

    pub fn channels(&self) -> &[Channel] {
        self.table.as_slice()
    }

    pub fn duty_max(&self) -> u16 {
        self.table.duty_max()
    }

    pub fn keys_down(&self) -> u8 {
        self.decoder.keys_down()
    }

    /// Overwrite one channel and write its duty through. Out-of-range
    /// indices are ignored.
    pub fn load<P: PwmOutput>(&mut self, idx: usize, channel: Channel, pwm: &mut P) {
        if let Some(duty) = self.table.replace(idx, channel) {
            pwm.set_duty(idx, duty);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::FadeMode;
    use crate::config::THREE_BUTTON_GESTURES;
    use crate::deadline::{Countdown, Deadline};
    use crate::fade::StepPolicy;
    use crate::gesture::Binding;

    const CONFIG: Config<1> = Config {
        duty_max: 255,
        step: StepPolicy::Fixed(5),
        bindings: [Binding::new(&[0, 1, 2])],
        gestures: &THREE_BUTTON_GESTURES,
    };

    struct Shadow([u16; 1]);

    impl PwmOutput for Shadow {
        fn get_duty(&self, channel: usize) -> u16 {
            self.0[channel]
        }

        fn set_duty(&mut self, channel: usize, duty: u16) {
            self.0[channel] = duty;
        }
    }

    struct Held(u32);

    impl Buttons for Held {
        fn lines(&self) -> usize {
            3
        }

        fn read_pressed(&self, line: usize) -> bool {
            self.0 & (1 << line) != 0
        }
    }

    #[test]
    fn starts_dark() {
        let dimmer = Dimmer::new(&CONFIG);
        let mut pwm = Shadow([99]);
        dimmer.sync(&mut pwm);
        assert_eq!(pwm.0, [0]);
        assert_eq!(dimmer.channel(0), Some(&Channel::new(255)));
        assert!(dimmer.channel(1).is_none());
    }

    #[test]
    fn gesture_then_ticks() {
        let mut dimmer = Dimmer::new(&CONFIG);
        let mut pwm = Shadow([0]);
        let mut deadline = Deadline::new(Countdown::new(), 1);

        // A + C: fade in from dark
        dimmer.on_input_change(&Held(0b101), &mut pwm);
        assert_eq!(dimmer.keys_down(), 2);

        for _ in 0..51 {
            dimmer.on_tick(&mut pwm, deadline.lease());
        }
        let ch = dimmer.channel(0).copied().unwrap();
        assert_eq!((ch.duty(), ch.fade_mode()), (255, FadeMode::None));
        assert_eq!(pwm.0, [255]);
        assert_eq!(deadline.watchdog().arms(), 51);
    }

    #[test]
    fn load_clamps_and_writes_through() {
        let mut dimmer = Dimmer::new(&CONFIG);
        let mut pwm = Shadow([0]);
        dimmer.load(0, Channel::from_parts(4000, 0, FadeMode::None, u16::MAX), &mut pwm);
        assert_eq!(pwm.0, [255]);
        assert_eq!(dimmer.duty_max(), 255);
    }
}
