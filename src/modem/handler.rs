// src/modem/handler.rs

use crate::common::address::TpAddress;
use crate::pdu::MAX_SMS_CHARS;

/// Text of an outgoing SMS.
pub type SmsText = heapless::String<MAX_SMS_CHARS>;

/// An SMS waiting to be handed to the modem.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutgoingSms {
    pub to: TpAddress,
    pub text: SmsText,
}

impl OutgoingSms {
    pub fn new(to: TpAddress, text: SmsText) -> Self {
        OutgoingSms { to, text }
    }
}

/// Application callbacks invoked from [`Sim7000::poll`](super::Sim7000::poll).
///
/// Every method has an empty default, so an implementation only overrides
/// what it cares about. `()` ignores everything.
pub trait ModemHandler {
    /// A stored message was read and decoded. `len` is the septet count.
    fn message_read(&mut self, text: &str, len: usize, sender: &TpAddress, smsc: &TpAddress) {
        let _ = (text, len, sender, smsc);
    }

    /// `+CPIN: NOT INSERTED`
    fn no_sim_card_found(&mut self) {}

    /// Called after each completed command while an SMS could be sent.
    /// Return the reply to send, if one is queued.
    fn queued_sms_reply(&mut self) -> Option<OutgoingSms> {
        None
    }

    /// Outcome of submitting the reply returned by
    /// [`queued_sms_reply`](ModemHandler::queued_sms_reply). On `false`
    /// the reply should stay queued.
    fn queued_sms_reply_result(&mut self, accepted: bool) {
        let _ = accepted;
    }

    /// The modem clock was read or broadcast; seconds since 1970, local time.
    fn time_updated(&mut self, unix_time: u32) {
        let _ = unix_time;
    }

    /// A line no classifier rule matched.
    fn unhandled_line(&mut self, line: &[u8]) {
        let _ = line;
    }
}

impl ModemHandler for () {}
