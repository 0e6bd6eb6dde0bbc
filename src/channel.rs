//! Per-channel dimmer state shared by the gesture decoder and the fade engine.

use crate::duty;
use ufmt::derive::uDebug;

/// Ramp currently driving a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum FadeMode {
    None,
    FadeIn,
    FadeOut,
    /// Up towards max, then [`FadeMode::FadeOutInContinuous`].
    FadeInOutContinuous,
    /// Down towards zero, then [`FadeMode::FadeInOutContinuous`].
    FadeOutInContinuous,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl FadeMode {
    #[inline]
    pub const fn is_active(self) -> bool {
        !matches!(self, FadeMode::None)
    }

    pub const fn direction(self) -> Option<Direction> {
        match self {
            FadeMode::FadeIn | FadeMode::FadeInOutContinuous => Some(Direction::Up),
            FadeMode::FadeOut | FadeMode::FadeOutInContinuous => Some(Direction::Down),
            FadeMode::None => None,
        }
    }
}

/// Mode after one ramp step. One-shot fades stop at the boundary, continuous
/// ones turn around.
pub const fn next_mode(mode: FadeMode, boundary_hit: bool) -> FadeMode {
    if !boundary_hit {
        return mode;
    }
    match mode {
        FadeMode::FadeIn | FadeMode::FadeOut | FadeMode::None => FadeMode::None,
        FadeMode::FadeInOutContinuous => FadeMode::FadeOutInContinuous,
        FadeMode::FadeOutInContinuous => FadeMode::FadeInOutContinuous,
    }
}

/// One PWM output.
///
/// While idle (`fade_mode == None`) exactly one of `duty` and `saved_duty` is
/// zero: either the light is on with nothing saved, or it is off and
/// remembers the brightness to come back to. A lit channel never has a
/// saved level, ramping or not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Channel {
    duty: u16,
    saved_duty: u16,
    fade_mode: FadeMode,
    // where a running fade-out started; becomes `saved_duty` if it reaches 0
    fade_origin: u16,
}

impl Channel {
    /// Off, remembering full brightness.
    pub const fn new(duty_max: u16) -> Self {
        Self {
            duty: 0,
            saved_duty: duty_max,
            fade_mode: FadeMode::None,
            fade_origin: 0,
        }
    }

    /// Build a channel in an arbitrary state. Both levels are clamped.
    pub const fn from_parts(duty: u16, saved_duty: u16, fade_mode: FadeMode, duty_max: u16) -> Self {
        Self {
            duty: duty::clamp(duty, duty_max),
            saved_duty: duty::clamp(saved_duty, duty_max),
            fade_mode,
            fade_origin: 0,
        }
    }

    #[inline]
    pub const fn duty(&self) -> u16 {
        self.duty
    }

    #[inline]
    pub const fn saved_duty(&self) -> u16 {
        self.saved_duty
    }

    #[inline]
    pub const fn fade_mode(&self) -> FadeMode {
        self.fade_mode
    }

    #[inline]
    pub const fn is_on(&self) -> bool {
        self.duty > 0
    }

    /// `duty == 0` xor `saved_duty == 0`.
    pub const fn toggle_invariant_holds(&self) -> bool {
        (self.duty == 0) != (self.saved_duty == 0)
    }

    /// Hand the channel over to the fade engine.
    pub(crate) fn begin_fade(&mut self, mode: FadeMode, duty_max: u16) {
        // a held fade-out gesture keeps the level it first started from
        if mode != FadeMode::FadeOut {
            self.fade_origin = 0;
        } else if self.fade_mode != FadeMode::FadeOut {
            self.fade_origin = self.duty;
        }
        self.fade_mode = mode;
        if !mode.is_active() {
            self.settle(duty_max);
        }
    }

    pub(crate) fn begin_fade_from_dark(&mut self) {
        self.duty = 0;
        self.fade_mode = FadeMode::FadeIn;
        self.fade_origin = 0;
    }

    /// Instant on/off.
    pub(crate) fn toggle(&mut self, duty_max: u16) {
        if self.saved_duty > 0 {
            self.restore();
        } else {
            self.save_and_blank(duty_max);
        }
    }

    pub(crate) fn turn_on(&mut self, duty_max: u16) {
        if self.saved_duty > 0 {
            self.restore();
        } else {
            self.fade_mode = FadeMode::None;
            self.fade_origin = 0;
            if self.duty == 0 {
                self.duty = duty_max;
            }
        }
    }

    pub(crate) fn turn_off(&mut self, duty_max: u16) {
        if self.duty > 0 || self.saved_duty == 0 {
            self.save_and_blank(duty_max);
        } else {
            self.fade_mode = FadeMode::None;
            self.fade_origin = 0;
        }
    }

    pub(crate) fn halve(&mut self, duty_max: u16) {
        self.set_lit(duty::halve(self.duty, duty_max));
    }

    pub(crate) fn double(&mut self, duty_max: u16) {
        self.set_lit(duty::double(self.duty, duty_max));
    }

    /// Advance the running ramp by `step`. Returns the new duty, or `None`
    /// when the channel is idle and nothing has to be written.
    pub(crate) fn advance(&mut self, step: u16, duty_max: u16) -> Option<u16> {
        let (duty, hit) = match self.fade_mode.direction()? {
            Direction::Up => duty::step_up(self.duty, step, duty_max),
            Direction::Down => duty::step_down(self.duty, step),
        };

        self.duty = duty;
        if self.fade_mode.direction() == Some(Direction::Up) && duty > 0 {
            self.saved_duty = 0;
        }
        self.fade_mode = next_mode(self.fade_mode, hit);

        if !self.fade_mode.is_active() {
            self.settle(duty_max);
        }
        Some(duty)
    }

    fn restore(&mut self) {
        self.fade_mode = FadeMode::None;
        self.fade_origin = 0;
        self.duty = self.saved_duty;
        self.saved_duty = 0;
    }

    fn save_and_blank(&mut self, duty_max: u16) {
        self.fade_mode = FadeMode::None;
        self.fade_origin = 0;
        self.saved_duty = if self.duty > 0 { self.duty } else { duty_max };
        self.duty = 0;
    }

    fn set_lit(&mut self, duty: u16) {
        self.fade_mode = FadeMode::None;
        self.fade_origin = 0;
        self.duty = duty;
        self.saved_duty = 0;
    }

    // Re-establish the toggle invariant once a ramp stops.
    fn settle(&mut self, duty_max: u16) {
        let origin = core::mem::take(&mut self.fade_origin);
        if self.duty > 0 {
            self.saved_duty = 0;
        } else if origin > 0 {
            self.saved_duty = origin;
        } else if self.saved_duty == 0 {
            self.saved_duty = duty_max;
        }
    }
}

/// Fixed table of channels. Only the two handlers get `&mut` access.
#[derive(Clone, Debug)]
pub struct ChannelTable<const N: usize> {
    channels: [Channel; N],
    duty_max: u16,
}

impl<const N: usize> ChannelTable<N> {
    pub const fn new(duty_max: u16) -> Self {
        Self {
            channels: [Channel::new(duty_max); N],
            duty_max,
        }
    }

    #[inline]
    pub const fn duty_max(&self) -> u16 {
        self.duty_max
    }

    pub fn get(&self, idx: usize) -> Option<&Channel> {
        self.channels.get(idx)
    }

    pub fn as_slice(&self) -> &[Channel] {
        &self.channels
    }

    pub(crate) fn get_mut(&mut self, idx: usize) -> Option<&mut Channel> {
        self.channels.get_mut(idx)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut Channel)> {
        self.channels.iter_mut().enumerate()
    }

    /// Replace a channel, clamping its levels to this table's resolution.
    pub(crate) fn replace(&mut self, idx: usize, channel: Channel) -> Option<u16> {
        let max = self.duty_max;
        let slot = self.channels.get_mut(idx)?;
        *slot = Channel::from_parts(channel.duty, channel.saved_duty, channel.fade_mode, max);
        Some(slot.duty)
    }
}
