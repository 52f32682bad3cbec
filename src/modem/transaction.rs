// src/modem/transaction.rs

use super::{ModemHandler, PendingCommand, Sim7000};
use crate::common::{
    command::AtCommand,
    error::ModemError,
    hal_traits::{ModemClock, ModemPins, ModemSerial},
    hash::CommandHash,
    types::{CommandState, SleepState, SmsStatus},
};

/// Keeps transport failures, logs and drops the rest.
///
/// Follow-up commands issued from inside the dispatcher have no caller to
/// report a refusal to.
pub(super) fn only_io<E: core::fmt::Debug>(
    context: &str,
    result: Result<(), ModemError<E>>,
) -> Result<(), ModemError<E>> {
    match result {
        Err(e @ (ModemError::Io(_) | ModemError::Timeout)) => Err(e),
        Err(e) => {
            log::debug!("{} skipped: {}", context, e);
            Ok(())
        }
        Ok(()) => Ok(()),
    }
}

impl<IF, H> Sim7000<IF, H>
where
    IF: ModemSerial + ModemPins + ModemClock,
    H: ModemHandler,
{
    /// Writes `line` and makes it the in-flight command.
    ///
    /// Only requires that nothing is in flight and the link is up, so the
    /// bring-up chain can run from `Timeout`. Callers apply any stricter
    /// precondition.
    pub(super) fn dispatch(
        &mut self,
        line: &[u8],
        hash: CommandHash,
        timeout_ms: u32,
        command: Option<AtCommand>,
    ) -> Result<(), ModemError<IF::Error>> {
        if self.command_state == CommandState::Busy {
            return Err(ModemError::NotReady(self.command_state));
        }
        if !self.interface.link_ready() {
            return Err(ModemError::NotClearToSend);
        }
        self.rx.clear();
        self.write_line(line)?;

        self.pending = Some(PendingCommand { hash, command });
        self.command_state = CommandState::Busy;
        let now = self.now();
        self.command_timeout.set_ms(timeout_ms);
        self.command_timeout.start(now);
        Ok(())
    }

    /// Formats and dispatches one of the driver's own commands.
    pub(super) fn issue(&mut self, command: AtCommand) -> Result<(), ModemError<IF::Error>> {
        let line = command.format_into()?;
        let timeout_ms = crate::common::timing::as_ticks(command.timeout());
        self.dispatch(line.as_bytes(), command.expected_hash(), timeout_ms, Some(command))
    }

    /// `ATE0` with a fresh retry budget.
    pub(super) fn start_echo_off(&mut self, retries: u8) -> Result<(), ModemError<IF::Error>> {
        self.echo_retries = retries;
        self.echo_retried = false;
        only_io("Echo off", self.issue(AtCommand::EchoOff))
    }

    /// `OK` or `SMS Ready`.
    pub(super) fn command_completed(&mut self) -> Result<(), ModemError<IF::Error>> {
        if self.sleep_state == SleepState::WakingUp {
            log::debug!("Modem answered during boot");
            self.abandon_command();
            self.sleep_state = SleepState::Running;
            return self.start_echo_off(0);
        }

        let Some(pending) = self.pending.take() else {
            log::warn!("Terminal response with no command in flight");
            return Ok(());
        };
        self.command_timeout.disable();
        self.command_state = CommandState::Ready;

        match pending.command {
            Some(AtCommand::ReadMessage(index)) => {
                self.reading = None;
                if self.config.delete_after_read {
                    self.deleting = Some(index);
                }
            }
            Some(AtCommand::DeleteMessage(_)) => self.deleting = None,
            _ => {}
        }

        match pending.hash {
            CommandHash::ATE0 if self.echo_retried => {
                let baud = self.config.baud_rate;
                only_io("Set baud rate", self.issue(AtCommand::SetBaudRate(baud)))?;
            }
            CommandHash::ATE0 | CommandHash::IPR => {
                only_io("Configure link", self.issue(AtCommand::ConfigureLink))?;
            }
            CommandHash::IFC => only_io("Check levels", self.check_levels())?,
            _ => {}
        }

        self.offer_queued_reply()
    }

    /// `ERROR`, `+CME ERROR` or `+CMS ERROR`.
    pub(super) fn command_failed(&mut self) {
        let Some(pending) = self.pending.take() else {
            log::warn!("Error response with no command in flight");
            return;
        };
        log::debug!("Command {} failed", pending.hash);
        self.command_timeout.disable();
        self.command_state = CommandState::Error;
        self.release_message_slots(pending.command);
        self.fail_sms();
    }

    /// The command or boot deadline passed.
    pub(super) fn command_timed_out(&mut self) -> Result<(), ModemError<IF::Error>> {
        self.command_timeout.disable();

        if self.sleep_state == SleepState::WakingUp {
            if self.interface.link_ready() {
                // Autobaud: the modem is up but silent until it sees `AT`.
                self.abandon_command();
                self.sleep_state = SleepState::Running;
                let retries = self.config.autobaud_echo_retries;
                return self.start_echo_off(retries);
            }
            self.pending = None;
            self.command_state = CommandState::Error;
            log::error!("Wakeup/reset failed: no link after boot window");
            return Ok(());
        }

        let pending = self.pending.take();
        let hash = pending.map_or(CommandHash::NONE, |p| p.hash);
        if hash == CommandHash::ATE0 && self.echo_retries > 0 {
            self.echo_retries -= 1;
            self.echo_retried = true;
            self.command_state = CommandState::Timeout;
            log::debug!("Echo off unanswered, {} retries left", self.echo_retries);
            return only_io("Echo off retry", self.issue(AtCommand::EchoOff));
        }

        log::debug!("Command {} timed out", hash);
        self.command_state = CommandState::Timeout;
        self.release_message_slots(pending.and_then(|p| p.command));
        self.fail_sms();
        Ok(())
    }

    /// Forgets whatever was in flight, as on wake or reset.
    pub(super) fn abandon_command(&mut self) {
        if let Some(pending) = self.pending.take() {
            self.release_message_slots(pending.command);
        }
        self.command_timeout.disable();
        self.command_state = CommandState::Ready;
        self.awaiting_pdu = false;
    }

    fn release_message_slots(&mut self, command: Option<AtCommand>) {
        match command {
            Some(AtCommand::ReadMessage(index)) => {
                log::warn!("Read of message {} abandoned", index);
                self.reading = None;
            }
            Some(AtCommand::DeleteMessage(index)) => {
                log::warn!("Delete of message {} abandoned", index);
                self.deleting = None;
            }
            _ => {}
        }
    }

    fn fail_sms(&mut self) {
        if matches!(self.sms_status, SmsStatus::Sending | SmsStatus::Waiting) {
            log::debug!("SMS failed");
            self.sms_status = SmsStatus::Failed;
        }
    }

    /// Requests signal quality and battery level.
    ///
    /// Skipped while an SMS result is awaited. Restarts the automatic
    /// period when one is set.
    pub fn check_levels(&mut self) -> Result<(), ModemError<IF::Error>> {
        let result = if self.sms_status == SmsStatus::Waiting {
            Ok(())
        } else {
            match self.ensure_clear_to_send() {
                Ok(()) => self.issue(AtCommand::CheckLevels),
                Err(e) => Err(e),
            }
        };
        if self.check_levels_period.is_enabled() {
            let now = self.now();
            self.check_levels_period.start(now);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_io_keeps_transport_errors() {
        let io: Result<(), ModemError<u8>> = Err(ModemError::Io(7));
        assert!(matches!(only_io("t", io), Err(ModemError::Io(7))));
        let busy: Result<(), ModemError<u8>> = Err(ModemError::NotReady(CommandState::Busy));
        assert!(only_io("t", busy).is_ok());
        let link: Result<(), ModemError<u8>> = Err(ModemError::NotClearToSend);
        assert!(only_io("t", link).is_ok());
    }
}
