//! Button-operated PWM fade dimmer.
//!
//! Two interrupt handlers share one [`Dimmer`]: the pin-change handler decodes
//! button gestures into per-channel actions, the watchdog tick advances fades
//! and re-arms the watchdog. Everything outside the `hal` module is target independent
//! and tested on the host.

#![cfg_attr(not(test), no_std)]

pub mod channel;
pub mod config;
pub mod deadline;
pub mod dimmer;
pub mod drivers;
pub mod duty;
pub mod fade;
pub mod gesture;
pub mod log;

#[cfg(target_arch = "avr")]
pub mod hal;

pub use channel::{Channel, ChannelTable, FadeMode};
pub use config::Config;
pub use deadline::{Countdown, Deadline, Expiry, Lease, ResetCause};
pub use dimmer::Dimmer;
pub use fade::{StepPolicy, TickReport};
pub use gesture::{Action, Binding, GestureReport, Pattern, Rule};
