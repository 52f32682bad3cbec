// src/common/error.rs

use super::types::{CommandState, RegistrationStatus, SmsStatus};
use crate::pdu::PduError;

/// Errors returned by the modem driver.
///
/// `E` is the transport error of the serial interface.
#[derive(Debug, thiserror::Error)]
pub enum ModemError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the serial interface.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A blocking write did not complete in time.
    #[error("Operation timed out")]
    Timeout,

    /// Another command is in flight, or the last one ended in Timeout/Error.
    #[error("Command slot not ready: {0}")]
    NotReady(CommandState),

    /// The link-ready signal from the modem is low.
    #[error("Modem link not ready")]
    NotClearToSend,

    /// Public commands are refused while the bring-up handshake runs.
    #[error("Modem is waking up")]
    WakingUp,

    #[error("Not registered on network: {0}")]
    NotRegistered(RegistrationStatus),

    /// A previous SMS has not been acknowledged yet.
    #[error("SMS pipeline busy: {0}")]
    SmsNotIdle(SmsStatus),

    #[error("Message too long: {len} characters, max {max}")]
    MessageTooLong { len: usize, max: usize },

    #[error("PDU error: {0}")]
    Pdu(#[from] PduError),

    /// The command line did not fit its formatting buffer.
    #[error("Command formatting failed")]
    CommandFormat,

    /// The single reply slot already holds a message.
    #[error("A reply is already pending")]
    ReplyPending,
}

impl<E: core::fmt::Debug> From<core::fmt::Error> for ModemError<E> {
    fn from(_: core::fmt::Error) -> Self {
        ModemError::CommandFormat
    }
}
