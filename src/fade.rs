//! Periodic fade engine.
//!
//! Runs once per tick, moves every fading channel one step and re-arms the
//! tick source on the way out.

use embedded_hal::watchdog::WatchdogEnable;

use crate::channel::ChannelTable;
use crate::deadline::Lease;
use crate::drivers::PwmOutput;

/// How far one tick moves a fading channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepPolicy {
    /// Constant step, ramp length proportional to the resolution.
    Fixed(u16),
    /// `max(duty >> shift, min)`: each step is a fixed fraction of the current
    /// level, which looks linear to the eye.
    Proportional { shift: u8, min: u16 },
}

impl StepPolicy {
    pub const UNIT: Self = StepPolicy::Fixed(1);
    pub const EIGHTHS: Self = StepPolicy::Proportional { shift: 3, min: 8 };

    /// Step for a channel currently at `duty`. Never zero.
    pub fn step(self, duty: u16) -> u16 {
        match self {
            StepPolicy::Fixed(step) => step.max(1),
            StepPolicy::Proportional { shift, min } => duty
                .checked_shr(u32::from(shift))
                .unwrap_or(0)
                .max(min)
                .max(1),
        }
    }
}

impl Default for StepPolicy {
    fn default() -> Self {
        Self::UNIT
    }
}

/// What one tick did, as channel bitmasks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    written: u32,
    settled: u32,
}

impl TickReport {
    /// Channel got a new duty this tick.
    pub fn written(&self, idx: usize) -> bool {
        idx < 32 && self.written & (1 << idx) != 0
    }

    /// Channel finished a one-shot fade this tick.
    pub fn settled(&self, idx: usize) -> bool {
        idx < 32 && self.settled & (1 << idx) != 0
    }

    pub fn any_written(&self) -> bool {
        self.written != 0
    }
}

pub struct FadeEngine {
    step: StepPolicy,
}

impl FadeEngine {
    pub const fn new(step: StepPolicy) -> Self {
        Self { step }
    }

    #[inline]
    pub const fn step_policy(&self) -> StepPolicy {
        self.step
    }

    pub fn tick<const N: usize, P, W>(
        &self,
        table: &mut ChannelTable<N>,
        pwm: &mut P,
        lease: Lease<'_, W>,
    ) -> TickReport
    where
        P: PwmOutput,
        W: WatchdogEnable,
        W::Time: Copy,
    {
        let duty_max = table.duty_max();
        let mut report = TickReport::default();

        for (idx, channel) in table.iter_mut() {
            let step = self.step.step(channel.duty());
            if let Some(duty) = channel.advance(step, duty_max) {
                pwm.set_duty(idx, duty);
                if idx < 32 {
                    report.written |= 1 << idx;
                    if !channel.fade_mode().is_active() {
                        report.settled |= 1 << idx;
                    }
                }
            }
        }

        lease.renew();
        report
    }
}

impl Default for FadeEngine {
    fn default() -> Self {
        Self::new(StepPolicy::default())
    }
}
