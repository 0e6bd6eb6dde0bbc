//! Pin-change gesture decoder.
//!
//! Every level change on a monitored line runs [`GestureDecoder::decode`].
//! The decoder latches all lines once, ignores pure releases, then walks each
//! channel's button group through the configured rules. The first matching
//! rule wins for that channel; channels are independent of each other.

use ufmt::derive::uDebug;

use crate::channel::{ChannelTable, FadeMode};
use crate::drivers::{Buttons, PwmOutput};

/// Most lines a snapshot can hold.
pub const MAX_LINES: usize = 32;

/// Pressed state of every monitored line, read once per invocation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    pressed: u32,
}

impl Snapshot {
    pub fn read<B: Buttons + ?Sized>(buttons: &B) -> Self {
        let lines = buttons.lines().min(MAX_LINES);
        let pressed = (0..lines)
            .filter(|&line| buttons.read_pressed(line))
            .fold(0u32, |acc, line| acc | 1 << line);
        Self { pressed }
    }

    pub const fn from_bits(pressed: u32) -> Self {
        Self { pressed }
    }

    #[inline]
    pub fn is_pressed(&self, line: usize) -> bool {
        line < MAX_LINES && self.pressed & (1 << line) != 0
    }

    #[inline]
    pub fn count(&self) -> u8 {
        self.pressed.count_ones() as u8
    }
}

/// The group of input lines that controls one channel. A line's position in
/// the group is its role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Binding {
    lines: &'static [usize],
}

impl Binding {
    pub const fn new(lines: &'static [usize]) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &'static [usize] {
        self.lines
    }

    /// Roles outside the group are never pressed.
    fn role_pressed(&self, snapshot: &Snapshot, role: usize) -> bool {
        self.lines
            .get(role)
            .map_or(false, |&line| snapshot.is_pressed(line))
    }

    fn pressed_roles(&self, snapshot: &Snapshot) -> usize {
        self.lines
            .iter()
            .filter(|&&line| snapshot.is_pressed(line))
            .count()
    }
}

/// Button combination within one group, by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pattern {
    /// Both roles held, whatever the rest of the group does.
    Pair(usize, usize),
    /// This role held and nothing else in the group.
    Single(usize),
}

impl Pattern {
    fn matches(self, binding: &Binding, snapshot: &Snapshot) -> bool {
        match self {
            Pattern::Pair(a, b) => {
                binding.role_pressed(snapshot, a) && binding.role_pressed(snapshot, b)
            }
            Pattern::Single(a) => {
                binding.role_pressed(snapshot, a) && binding.pressed_roles(snapshot) == 1
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum Action {
    /// Hand the channel to the fade engine in this mode.
    Fade(FadeMode),
    /// Blank the channel, then fade in.
    FadeInFromDark,
    Toggle,
    On,
    Off,
    Halve,
    Double,
}

impl Action {
    /// Takes effect on the next tick rather than right now.
    pub const fn is_ramped(self) -> bool {
        matches!(self, Action::Fade(_) | Action::FadeInFromDark)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule {
    pub pattern: Pattern,
    pub action: Action,
}

impl Rule {
    pub const fn new(pattern: Pattern, action: Action) -> Self {
        Self { pattern, action }
    }
}

/// Outcome of one decoder invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureReport<const N: usize> {
    /// Fewer keys held than last time; nothing was touched.
    Released { keys_down: u8 },
    /// Press or hold. Per channel, the action applied, if any.
    Applied {
        keys_down: u8,
        actions: [Option<Action>; N],
    },
}

pub struct GestureDecoder<const N: usize> {
    bindings: [Binding; N],
    rules: &'static [Rule],
    keys_down: u8,
}

impl<const N: usize> GestureDecoder<N> {
    pub const fn new(bindings: [Binding; N], rules: &'static [Rule]) -> Self {
        Self {
            bindings,
            rules,
            keys_down: 0,
        }
    }

    /// Keys held at the last invocation.
    #[inline]
    pub fn keys_down(&self) -> u8 {
        self.keys_down
    }

    pub fn decode<B, P>(
        &mut self,
        table: &mut ChannelTable<N>,
        buttons: &B,
        pwm: &mut P,
    ) -> GestureReport<N>
    where
        B: Buttons + ?Sized,
        P: PwmOutput,
    {
        let snapshot = Snapshot::read(buttons);
        let keys_down = snapshot.count();

        // only presses and holds act, never a release
        let released = keys_down < self.keys_down;
        self.keys_down = keys_down;
        if released {
            return GestureReport::Released { keys_down };
        }

        let duty_max = table.duty_max();
        let mut actions = [None; N];

        for (idx, binding) in self.bindings.iter().enumerate() {
            let Some(action) = self.classify(binding, &snapshot) else {
                continue;
            };
            let Some(channel) = table.get_mut(idx) else {
                continue;
            };

            match action {
                Action::Fade(mode) => channel.begin_fade(mode, duty_max),
                Action::FadeInFromDark => channel.begin_fade_from_dark(),
                Action::Toggle => channel.toggle(duty_max),
                Action::On => channel.turn_on(duty_max),
                Action::Off => channel.turn_off(duty_max),
                Action::Halve => channel.halve(duty_max),
                Action::Double => channel.double(duty_max),
            }

            // ramps write from the engine, except the blanking that starts one
            if !matches!(action, Action::Fade(_)) {
                pwm.set_duty(idx, channel.duty());
            }
            actions[idx] = Some(action);
        }

        GestureReport::Applied { keys_down, actions }
    }

    fn classify(&self, binding: &Binding, snapshot: &Snapshot) -> Option<Action> {
        self.rules
            .iter()
            .find(|rule| rule.pattern.matches(binding, snapshot))
            .map(|rule| rule.action)
    }
}
