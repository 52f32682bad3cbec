// src/modem/sms.rs

use super::transaction::only_io;
use super::{ModemHandler, Sim7000};
use crate::common::{
    address::TpAddress,
    command::AtCommand,
    error::ModemError,
    hal_traits::{ModemClock, ModemPins, ModemSerial},
    types::SmsStatus,
};
use crate::pdu::{encode_sms_submit, MAX_SMS_CHARS};

/// Ends the PDU after the `> ` prompt.
const CTRL_Z: u8 = 0x1A;

impl<IF, H> Sim7000<IF, H>
where
    IF: ModemSerial + ModemPins + ModemClock,
    H: ModemHandler,
{
    /// Longest text [`send_sms`](Sim7000::send_sms) accepts.
    pub const fn max_sms_chars() -> usize {
        MAX_SMS_CHARS
    }

    /// Starts sending `text` to `to` as a single 7-bit SMS.
    ///
    /// Nothing is written unless every precondition holds. Progress is
    /// reported through [`sms_status`](Sim7000::sms_status); once it reaches
    /// `Sent` or `Failed`, call
    /// [`acknowledge_sms_status`](Sim7000::acknowledge_sms_status).
    pub fn send_sms(&mut self, to: &TpAddress, text: &str) -> Result<(), ModemError<IF::Error>> {
        if self.sms_status != SmsStatus::Idle {
            return Err(ModemError::SmsNotIdle(self.sms_status));
        }
        if !self.registration.is_connected() {
            return Err(ModemError::NotRegistered(self.registration));
        }
        self.ensure_clear_to_send()?;

        let len = text.chars().count();
        if len > MAX_SMS_CHARS {
            return Err(ModemError::MessageTooLong {
                len,
                max: MAX_SMS_CHARS,
            });
        }

        let octets = encode_sms_submit(to, text, &mut self.tx)?;
        self.issue(AtCommand::SubmitPdu(octets))?;
        self.sms_status = SmsStatus::Sending;
        log::debug!("Sending SMS to {} ({} octets)", to, octets);
        Ok(())
    }

    /// Writes the encoded PDU once the modem shows its prompt.
    pub(super) fn submit_sms_payload(&mut self) -> Result<(), ModemError<IF::Error>> {
        self.sms_status = SmsStatus::Waiting;
        self.rx.clear();
        let payload = self.tx.clone();
        self.write_bytes(payload.as_bytes())?;
        self.write_bytes(&[CTRL_Z])?;
        self.flush_tx()
    }

    /// Returns `Sent`/`Failed` to `Idle` and reports which it was.
    /// Any other status is left untouched.
    pub fn acknowledge_sms_status(&mut self) -> SmsStatus {
        let status = self.sms_status;
        if status.is_finished() {
            self.sms_status = SmsStatus::Idle;
        }
        status
    }

    /// Issues the next read or delete of a stored message, if any is due.
    ///
    /// A delete takes priority and waits until an SMS could be sent; a read
    /// only needs an idle command slot.
    pub(super) fn service_messages(&mut self) -> Result<(), ModemError<IF::Error>> {
        if let Some(index) = self.deleting {
            if self.clear_to_send_sms() {
                only_io("Delete message", self.issue(AtCommand::DeleteMessage(index)))?;
            }
            return Ok(());
        }

        if self.reading.is_some() || !self.clear_to_send() {
            return Ok(());
        }
        if let Some(index) = self.messages.peek() {
            self.issue(AtCommand::ReadMessage(index))?;
            self.messages.pop();
            self.reading = Some(index);
        }
        Ok(())
    }

    /// Gives the handler a chance to send its queued reply.
    pub(super) fn offer_queued_reply(&mut self) -> Result<(), ModemError<IF::Error>> {
        if !self.clear_to_send_sms() {
            return Ok(());
        }
        let Some(reply) = self.handler.queued_sms_reply() else {
            return Ok(());
        };
        let result = self.send_sms(&reply.to, &reply.text);
        self.handler.queued_sms_reply_result(result.is_ok());
        only_io("Queued reply", result)
    }
}
