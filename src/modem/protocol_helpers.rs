// src/modem/protocol_helpers.rs

use super::{ModemHandler, Sim7000};
use crate::common::{
    error::ModemError,
    frame::FrameEvent,
    hal_traits::{ModemClock, ModemPins, ModemSerial},
    hash::CommandHash,
    response::{self, DataLine, LineKind},
    timestamp::parse_modem_time,
    types::{SleepState, SmsStatus},
};
use crate::pdu::parse_deliver_line;

/// Shown in place of a mnemonic that is not UTF-8.
const BINARY: &str = "<binary>";

impl<IF, H> Sim7000<IF, H>
where
    IF: ModemSerial + ModemPins + ModemClock,
    H: ModemHandler,
{
    /// Reads every byte the UART has buffered.
    pub(super) fn drain_rx(&mut self) -> Result<(), ModemError<IF::Error>> {
        loop {
            let byte = match self.interface.read_byte() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => return Ok(()),
                Err(nb::Error::Other(e)) => return Err(ModemError::Io(e)),
            };

            // The SMS prompt is `> ` with no line ending.
            if byte == b'>' && self.sms_status == SmsStatus::Sending {
                self.submit_sms_payload()?;
                continue;
            }

            match self.rx.push(byte) {
                FrameEvent::Complete => {
                    let line = self.rx.take();
                    self.handle_line(&line)?;
                }
                FrameEvent::Overflow => {
                    log::warn!("Receive buffer overrun, dispatching partial line");
                    let line = self.rx.take();
                    self.handle_line(&line)?;
                }
                FrameEvent::Stored | FrameEvent::Ignored => {}
            }
        }
    }

    /// Processes one complete line with the modem's output paused.
    pub(super) fn handle_line(&mut self, line: &[u8]) -> Result<(), ModemError<IF::Error>> {
        self.pause_rx()?;
        log::trace!("<{}", core::str::from_utf8(line).unwrap_or(BINARY));
        let now = self.now();
        self.command_timeout.start(now);

        let result = if self.awaiting_pdu {
            self.awaiting_pdu = false;
            self.deliver_message(line);
            Ok(())
        } else {
            self.classify_and_handle(line)
        };

        self.rx.clear();
        self.resume_rx()?;
        result
    }

    fn classify_and_handle(&mut self, line: &[u8]) -> Result<(), ModemError<IF::Error>> {
        match response::classify_line(line) {
            LineKind::TimeBroadcast(text) => {
                if let Some(time) = parse_modem_time(text, true) {
                    self.update_time(time);
                }
            }
            LineKind::Data(data) => self.handle_data_line(data),
            LineKind::Echo | LineKind::Ignored => {}
            LineKind::Error => self.command_failed(),
            LineKind::PowerDown => {
                log::debug!("Modem powered down");
                self.sleep_state = SleepState::Sleeping;
            }
            LineKind::Ok | LineKind::SmsReady => return self.command_completed(),
            LineKind::Other(text) => {
                // Leftover of the `> ` prompt.
                if !text.iter().all(|c| *c == b' ') {
                    self.handler.unhandled_line(text);
                }
            }
        }
        Ok(())
    }

    /// Acts on a `+MNEMONIC: payload` line.
    pub(super) fn handle_data_line(&mut self, data: DataLine<'_>) {
        let payload = data.payload;
        if matches!(data.hash, CommandHash::CME_ERROR | CommandHash::CMS_ERROR) {
            self.command_failed();
            return;
        }
        if payload.is_empty() {
            return;
        }
        match data.hash {
            CommandHash::CSQ => self.bars = response::parse_signal_bars(payload),
            CommandHash::CBC => match response::parse_battery(payload) {
                Ok(level) => self.battery_level = level,
                Err(e) => log::debug!("Bad +CBC: {}", e),
            },
            CommandHash::CCLK => {
                if let Some(time) = payload
                    .strip_prefix(b"\"")
                    .and_then(|text| parse_modem_time(text, false))
                {
                    self.update_time(time);
                }
            }
            CommandHash::CREG => match response::parse_registration(payload) {
                Ok(status) => {
                    log::debug!("Registration: {}", status);
                    self.registration = status;
                }
                Err(e) => log::debug!("Bad +CREG: {}", e),
            },
            CommandHash::CMTI => match response::parse_new_message_index(payload) {
                Ok(index) => {
                    if !self.messages.push(index) {
                        log::warn!("Pending message ring full, dropping index {}", index);
                    }
                }
                Err(e) => log::debug!("Bad +CMTI: {}", e),
            },
            CommandHash::CMGR | CommandHash::CMGL => {
                // Text-mode replies are not decoded.
                self.awaiting_pdu = !response::is_text_mode_read(payload);
            }
            CommandHash::CMGS => {
                if self.sms_status == SmsStatus::Waiting {
                    log::debug!("SMS accepted by service centre");
                    self.sms_status = SmsStatus::Sent;
                }
            }
            CommandHash::CPIN => {
                if response::sim_not_inserted(payload) {
                    log::warn!("No SIM card");
                    self.handler.no_sim_card_found();
                }
            }
            _ => log::trace!(
                "No handler for +{}",
                core::str::from_utf8(data.mnemonic).unwrap_or(BINARY)
            ),
        }
    }

    /// Decodes the PDU line that follows a `+CMGR`/`+CMGL` header.
    fn deliver_message(&mut self, line: &[u8]) {
        match parse_deliver_line(line) {
            Ok((smsc, message)) => {
                log::debug!("Message from {}", message.sender);
                self.handler
                    .message_read(&message.text, message.text.len(), &message.sender, &smsc);
            }
            Err(e) => log::warn!("Undecodable SMS-DELIVER: {}", e),
        }
    }

    fn update_time(&mut self, time: u32) {
        self.time = Some(time);
        self.handler.time_updated(time);
    }
}
