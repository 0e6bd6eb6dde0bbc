//! Saturating duty-cycle arithmetic.
//!
//! Every helper takes the resolution `max` explicitly and clamps into
//! `0..=max`. Nothing here wraps.

/// Clamp `duty` into `0..=max`.
#[inline]
pub const fn clamp(duty: u16, max: u16) -> u16 {
    if duty > max {
        max
    } else {
        duty
    }
}

/// Raise `duty` by `step`.
///
/// Returns the new duty and whether the top was reached. Landing exactly on
/// `max` counts as reaching it.
#[inline]
pub fn step_up(duty: u16, step: u16, max: u16) -> (u16, bool) {
    let next = duty.saturating_add(step);
    if next >= max {
        (max, true)
    } else {
        (next, false)
    }
}

/// Lower `duty` by `step`, returning the new duty and whether zero was reached.
#[inline]
pub fn step_down(duty: u16, step: u16) -> (u16, bool) {
    match duty.checked_sub(step) {
        Some(next) if next > 0 => (next, false),
        _ => (0, true),
    }
}

/// Halve `duty`. Never reaches zero: a dimmed light stays lit at 1.
#[inline]
pub fn halve(duty: u16, max: u16) -> u16 {
    match duty >> 1 {
        0 => 1,
        half => clamp(half, max),
    }
}

/// Double `duty`, lifting zero to 1 and clamping at `max`.
#[inline]
pub fn double(duty: u16, max: u16) -> u16 {
    match duty.saturating_mul(2) {
        0 => 1,
        doubled => clamp(doubled, max),
    }
}
