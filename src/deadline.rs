//! Re-arm-or-die tick deadline.
//!
//! The watchdog is both the fade tick and the fail-safe. Every firing has to
//! be answered by re-arming it; if the fade handler hangs or forgets, the
//! next expiry resets the whole device and the controller restarts from its
//! power-on defaults.

use embedded_hal::watchdog::WatchdogEnable;
use ufmt::derive::uDebug;

/// An armed watchdog plus the timeout it is re-armed with.
pub struct Deadline<W>
where
    W: WatchdogEnable,
    W::Time: Copy,
{
    watchdog: W,
    timeout: W::Time,
}

impl<W> Deadline<W>
where
    W: WatchdogEnable,
    W::Time: Copy,
{
    pub fn new(watchdog: W, timeout: W::Time) -> Self {
        Self { watchdog, timeout }
    }

    /// Start the countdown. Called once at boot, then only through a [`Lease`].
    pub fn arm(&mut self) {
        self.watchdog.start(self.timeout);
    }

    /// Borrow the deadline for the duration of one tick handler.
    pub fn lease(&mut self) -> Lease<'_, W> {
        Lease { deadline: self }
    }

    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }

    pub fn watchdog_mut(&mut self) -> &mut W {
        &mut self.watchdog
    }
}

/// Permission to keep running past the current tick. Dropping it without
/// calling [`Lease::renew`] leaves the watchdog to reset the device.
#[must_use = "dropping a lease without renewing it lets the watchdog reset the device"]
pub struct Lease<'a, W>
where
    W: WatchdogEnable,
    W::Time: Copy,
{
    deadline: &'a mut Deadline<W>,
}

impl<W> Lease<'_, W>
where
    W: WatchdogEnable,
    W::Time: Copy,
{
    pub fn renew(self) {
        self.deadline.arm();
    }
}

/// Result of letting time pass on a [`Countdown`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Expiry {
    /// Still counting, or not armed.
    Pending,
    /// First expiry since the last arm: run the tick handler.
    Tick,
    /// Expired again without being re-armed.
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Disarmed,
    Armed(u32),
    Fired(u32),
}

/// Hosted stand-in for a watchdog running in interrupt-then-reset mode.
/// Time is counted in abstract units.
#[derive(Debug)]
pub struct Countdown {
    period: u32,
    state: State,
    arms: u32,
    resets: u32,
}

impl Countdown {
    pub const fn new() -> Self {
        Self {
            period: 0,
            state: State::Disarmed,
            arms: 0,
            resets: 0,
        }
    }

    pub fn is_armed(&self) -> bool {
        matches!(self.state, State::Armed(_))
    }

    pub fn arms(&self) -> u32 {
        self.arms
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn elapse(&mut self, units: u32) -> Expiry {
        match self.state {
            State::Disarmed => Expiry::Pending,
            State::Armed(left) if units < left => {
                self.state = State::Armed(left - units);
                Expiry::Pending
            }
            State::Armed(_) => {
                self.state = State::Fired(self.period);
                Expiry::Tick
            }
            State::Fired(left) if units < left => {
                self.state = State::Fired(left - units);
                Expiry::Pending
            }
            State::Fired(_) => {
                self.state = State::Disarmed;
                self.resets += 1;
                Expiry::Reset
            }
        }
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}

impl WatchdogEnable for Countdown {
    type Time = u32;

    fn start<T>(&mut self, period: T)
    where
        T: Into<u32>,
    {
        self.period = period.into().max(1);
        self.state = State::Armed(self.period);
        self.arms += 1;
    }
}

/// Why the MCU last came out of reset, decoded from the AVR `MCUSR` flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum ResetCause {
    PowerOn,
    External,
    BrownOut,
    Watchdog,
    Unknown,
}

impl ResetCause {
    const PORF: u8 = 1 << 0;
    const EXTRF: u8 = 1 << 1;
    const BORF: u8 = 1 << 2;
    const WDRF: u8 = 1 << 3;

    /// Watchdog wins over the others since that is the fail-safe path.
    pub const fn from_flags(flags: u8) -> Self {
        if flags & Self::WDRF != 0 {
            ResetCause::Watchdog
        } else if flags & Self::PORF != 0 {
            ResetCause::PowerOn
        } else if flags & Self::BORF != 0 {
            ResetCause::BrownOut
        } else if flags & Self::EXTRF != 0 {
            ResetCause::External
        } else {
            ResetCause::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_fires_once_then_resets() {
        let mut wd = Countdown::new();
        assert_eq!(wd.elapse(100), Expiry::Pending);

        wd.start(3u32);
        assert_eq!(wd.elapse(2), Expiry::Pending);
        assert_eq!(wd.elapse(1), Expiry::Tick);
        assert_eq!(wd.elapse(2), Expiry::Pending);
        assert_eq!(wd.elapse(1), Expiry::Reset);
        assert_eq!(wd.resets(), 1);
        assert_eq!(wd.elapse(10), Expiry::Pending);
    }

    #[test]
    fn renewed_lease_rearms() {
        let mut deadline = Deadline::new(Countdown::new(), 5);
        deadline.arm();
        assert_eq!(deadline.watchdog_mut().elapse(5), Expiry::Tick);

        deadline.lease().renew();
        assert!(deadline.watchdog().is_armed());
        assert_eq!(deadline.watchdog_mut().elapse(5), Expiry::Tick);
        assert_eq!(deadline.watchdog().arms(), 2);
        assert_eq!(deadline.watchdog().resets(), 0);
    }

    #[test]
    fn dropped_lease_leads_to_reset() {
        let mut deadline = Deadline::new(Countdown::new(), 5);
        deadline.arm();
        assert_eq!(deadline.watchdog_mut().elapse(5), Expiry::Tick);

        let _ = deadline.lease();
        assert_eq!(deadline.watchdog_mut().elapse(5), Expiry::Reset);
    }

    #[test]
    fn reset_cause_prefers_watchdog() {
        assert_eq!(ResetCause::from_flags(0b1001), ResetCause::Watchdog);
        assert_eq!(ResetCause::from_flags(0b0001), ResetCause::PowerOn);
        assert_eq!(ResetCause::from_flags(0b0100), ResetCause::BrownOut);
        assert_eq!(ResetCause::from_flags(0b0010), ResetCause::External);
        assert_eq!(ResetCause::from_flags(0), ResetCause::Unknown);
    }
}
