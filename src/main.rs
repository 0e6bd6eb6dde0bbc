#![cfg_attr(target_arch = "avr", no_std)]
#![cfg_attr(target_arch = "avr", no_main)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

#[cfg(not(target_arch = "avr"))]
fn main() {
    eprintln!("dimmer_firmware runs on AVR only; use `cargo test` for the controller logic on the host.");
}

#[cfg(target_arch = "avr")]
mod firmware {
    use core::cell::RefCell;

    use avr_device::atmega328p::Peripherals;
    use avr_device::interrupt::{self, Mutex};
    use panic_halt as _;

    use dimmer_firmware::config::{BOARD, CHANNELS, DUTY_MAX, INPUT_LINES, TICK_MS};
    use dimmer_firmware::deadline::Deadline;
    use dimmer_firmware::drivers::{ActiveLow, PwmBank};
    use dimmer_firmware::hal::gpio::board::{self, Button, BUTTON_MASK};
    use dimmer_firmware::hal::power::Module;
    use dimmer_firmware::hal::pwm::Prescaler;
    use dimmer_firmware::hal::{PinChange, Power, Timer1Channel, Timer1Pwm, Watchdog, WatchdogTimeout};
    use dimmer_firmware::Dimmer;

    #[cfg(feature = "debug")]
    use dimmer_firmware::{config::UART_BAUD, drivers::SerialConsole, hal::Usart0, log};

    struct Board {
        dimmer: Dimmer<CHANNELS>,
        buttons: ActiveLow<Button, INPUT_LINES>,
        pwm: PwmBank<Timer1Channel, CHANNELS>,
        deadline: Deadline<Watchdog>,
        #[cfg(feature = "debug")]
        console: SerialConsole<Usart0>,
    }

    // Only touched from the two handlers, both of which run with interrupts off.
    static BOARD_STATE: Mutex<RefCell<Option<Board>>> = Mutex::new(RefCell::new(None));

    #[avr_device::entry]
    fn main() -> ! {
        let dp = Peripherals::take().unwrap();

        let mut power = Power::new(dp.CPU);
        #[allow(unused_variables)]
        let cause = power.take_reset_cause();

        // Stop the watchdog left running by a watchdog reset before setup.
        let mut watchdog = Watchdog::new(dp.WDT);
        embedded_hal::watchdog::WatchdogDisable::disable(&mut watchdog);

        power.disable_module_clock(Module::Adc);
        power.disable_module_clock(Module::Spi);
        power.disable_module_clock(Module::Twi);
        power.disable_module_clock(Module::Timer0);
        power.disable_module_clock(Module::Timer2);
        #[cfg(not(feature = "debug"))]
        power.disable_module_clock(Module::Usart0);

        let buttons = ActiveLow::new(board::buttons());
        let _outputs = board::pwm_outputs();

        // 16 MHz / 8 / 1024 ~ 1.95 kHz
        let mut timer = Timer1Pwm::new(dp.TC1);
        timer.set_resolution(DUTY_MAX);
        let mut pwm = PwmBank::new(timer.split());
        let dimmer = Dimmer::new(&BOARD);
        dimmer.sync(&mut pwm);
        pwm.start();
        timer.start(Prescaler::Div8);

        let mut pin_change = PinChange::new(dp.EXINT);
        pin_change.enable_port_d(BUTTON_MASK);

        #[cfg(feature = "debug")]
        let console = {
            let mut console = SerialConsole::new(Usart0::new(dp.USART0, UART_BAUD));
            log::banner(&mut console, cause).ok();
            console
        };

        let mut deadline = Deadline::new(watchdog, WatchdogTimeout::from_millis(TICK_MS));

        interrupt::free(|cs| {
            deadline.arm();
            BOARD_STATE.borrow(cs).replace(Some(Board {
                dimmer,
                buttons,
                pwm,
                deadline,
                #[cfg(feature = "debug")]
                console,
            }));
        });

        unsafe { avr_device::interrupt::enable() };

        loop {
            power.enter_idle_mode();
        }
    }

    #[avr_device::interrupt(atmega328p)]
    fn WDT() {
        interrupt::free(|cs| {
            // Nothing to re-arm without a board: the next expiry resets us.
            if let Some(board) = BOARD_STATE.borrow(cs).borrow_mut().as_mut() {
                let lease = board.deadline.lease();
                #[allow(unused_variables)]
                let report = board.dimmer.on_tick(&mut board.pwm, lease);

                #[cfg(feature = "debug")]
                log::tick(&mut board.console, board.dimmer.channels(), &report).ok();
            }
        });
    }

    #[avr_device::interrupt(atmega328p)]
    fn PCINT2() {
        interrupt::free(|cs| {
            if let Some(board) = BOARD_STATE.borrow(cs).borrow_mut().as_mut() {
                #[allow(unused_variables)]
                let report = board.dimmer.on_input_change(&board.buttons, &mut board.pwm);

                #[cfg(feature = "debug")]
                log::gesture(&mut board.console, &report).ok();
            }
        });
    }
}
