// src/modem/power.rs

use super::transaction::only_io;
use super::{ModemHandler, Sim7000};
use crate::common::{
    error::ModemError,
    hal_traits::{ModemClock, ModemPins, ModemSerial},
    timing,
    types::SleepState,
};
use core::time::Duration;

impl<IF, H> Sim7000<IF, H>
where
    IF: ModemSerial + ModemPins + ModemClock,
    H: ModemHandler,
{
    /// Powers the modem up.
    ///
    /// If the link is already up (the modem survived a host reset) the
    /// levels are checked straight away. Otherwise the power key is pulsed
    /// and the boot handshake runs from [`poll`](Sim7000::poll).
    pub fn wake_up(&mut self) -> Result<(), ModemError<IF::Error>> {
        self.rx.clear();
        self.abandon_command();
        if self.interface.link_ready() {
            self.sleep_state = SleepState::Running;
            return only_io("Check levels", self.check_levels());
        }
        self.interface.set_power_key(true);
        self.start_pin_pulse(timing::WAKE_PULSE);
        self.sleep_state = SleepState::WakingUp;
        log::debug!("Waking modem");
        Ok(())
    }

    /// Pulses the reset line, then boots as for [`wake_up`](Sim7000::wake_up).
    pub fn reset(&mut self) {
        self.rx.clear();
        self.abandon_command();
        self.interface.set_reset(true);
        self.start_pin_pulse(timing::RESET_PULSE);
        self.sleep_state = SleepState::WakingUp;
        log::debug!("Resetting modem");
    }

    /// Pulses the power key to shut the modem down.
    ///
    /// Does nothing and returns `false` if the modem is not powered. The
    /// automatic levels check stops and the levels read as zero.
    pub fn sleep(&mut self) -> bool {
        if !self.interface.link_ready() {
            return false;
        }
        self.rx.clear();
        self.interface.set_power_key(true);
        self.start_pin_pulse(timing::SLEEP_PULSE);
        self.sleep_state = SleepState::GoingToSleep;
        self.check_levels_period.disable();
        self.bars = 0;
        self.battery_level = 0;
        log::debug!("Modem going to sleep");
        true
    }

    fn start_pin_pulse(&mut self, width: Duration) {
        let now = self.now();
        self.pin_period.set(width);
        self.pin_period.start(now);
    }

    /// Releases the control pins when the pulse has elapsed and arms the
    /// boot window after a wake or reset.
    pub(super) fn service_pin_timer(&mut self) {
        let now = self.now();
        if !self.pin_period.passed(now) {
            return;
        }
        self.pin_period.disable();
        self.interface.set_power_key(false);
        self.interface.set_reset(false);
        if self.sleep_state == SleepState::WakingUp {
            // Expect RDY ... SMS Ready, or silence if autobauding.
            self.command_timeout.set(timing::BOOT_TIMEOUT);
            self.command_timeout.start(now);
        }
    }
}
