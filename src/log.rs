//! Human-readable event lines for the debug console.
//!
//! The handlers only return reports; turning them into text happens here so
//! release builds never pay for it.

use ufmt::{uWrite, uwrite};

use crate::channel::Channel;
use crate::deadline::ResetCause;
use crate::fade::TickReport;
use crate::gesture::GestureReport;

pub fn banner<W>(w: &mut W, cause: ResetCause) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    uwrite!(w, "dimmer {} reset={:?}\r\n", env!("CARGO_PKG_VERSION"), cause)
}

/// One line per channel that got an action. Releases print nothing.
pub fn gesture<W, const N: usize>(w: &mut W, report: &GestureReport<N>) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    if let GestureReport::Applied { keys_down, actions } = report {
        for (idx, action) in actions.iter().enumerate() {
            if let Some(action) = action {
                uwrite!(w, "ch{} keys={} {:?}\r\n", idx, keys_down, action)?;
            }
        }
    }
    Ok(())
}

/// One line per channel whose fade finished this tick.
pub fn tick<W>(w: &mut W, channels: &[Channel], report: &TickReport) -> Result<(), W::Error>
where
    W: uWrite + ?Sized,
{
    for (idx, channel) in channels.iter().enumerate() {
        if report.settled(idx) {
            uwrite!(w, "ch{} settled duty={}\r\n", idx, channel.duty())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::FadeMode;
    use crate::gesture::Action;
    use core::convert::Infallible;

    #[derive(Default)]
    struct Sink(String);

    impl uWrite for Sink {
        type Error = Infallible;

        fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
            self.0.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn banner_names_the_reset_cause() {
        let mut sink = Sink::default();
        banner(&mut sink, ResetCause::Watchdog).unwrap();
        assert!(sink.0.starts_with("dimmer "));
        assert!(sink.0.ends_with("reset=Watchdog\r\n"));
    }

    #[test]
    fn gesture_lists_applied_actions() {
        let mut sink = Sink::default();
        let report = GestureReport::Applied {
            keys_down: 2,
            actions: [None, Some(Action::Fade(FadeMode::FadeOut)), Some(Action::Toggle)],
        };
        gesture(&mut sink, &report).unwrap();
        assert_eq!(sink.0, "ch1 keys=2 Fade(FadeOut)\r\nch2 keys=2 Toggle\r\n");
    }

    #[test]
    fn release_is_silent() {
        let mut sink = Sink::default();
        gesture::<_, 2>(&mut sink, &GestureReport::Released { keys_down: 0 }).unwrap();
        assert!(sink.0.is_empty());
    }
}
