pub mod button_bank;
pub mod pwm_bank;
pub mod serial_console;

pub use button_bank::{ActiveLow, Buttons};
pub use pwm_bank::{PwmBank, PwmOutput};
pub use serial_console::SerialConsole;
