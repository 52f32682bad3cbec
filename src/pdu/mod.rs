// src/pdu/mod.rs

//! SMS TPDU codec for PDU mode (`AT+CMGF=0`).
//!
//! All PDUs travel as ASCII hex. Only SMS-SUBMIT (outgoing) and
//! SMS-DELIVER (incoming) with the GSM 7-bit default alphabet are handled;
//! concatenated messages and escape-table characters are not.

pub mod semi_octet;
pub mod septet;
pub mod tpdu;

pub use semi_octet::{decode_semi_octets, encode_semi_octets};
pub use septet::{pack_septets, unpack_septets};
pub use tpdu::{
    encode_sms_submit, extract_address, parse_deliver_line, parse_sms_deliver, AddressKind,
    SmsDeliver,
};

/// Capacity of the transmit PDU buffer in hex characters.
pub const TX_BUFFER_SIZE: usize = 300;

/// Hex characters an SMS-SUBMIT spends before the packed user data when the
/// destination has the maximum 15 digits: SMSC length, first octet, message
/// reference, address length, address type, 16 semi-octet characters,
/// PID, DCS, validity period and UDL.
pub const PDU_SUBMIT_PREAMBLE: usize = 34;

/// Longest message that still fits the transmit buffer.
pub const MAX_SMS_CHARS: usize = ((TX_BUFFER_SIZE - PDU_SUBMIT_PREAMBLE) / 2) * 8 / 7;

/// Longest user data a single 7-bit SMS can carry.
pub const MAX_SEPTETS: usize = 160;

/// Hex-encoded PDU ready for the wire.
pub type PduBuffer = heapless::String<TX_BUFFER_SIZE>;

/// Decoded message text.
pub type MessageText = heapless::String<MAX_SEPTETS>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PduError {
    #[error("Invalid hex digit in PDU")]
    InvalidHex,

    #[error("PDU truncated: needed {needed} hex characters, got {got}")]
    Truncated { needed: usize, got: usize },

    #[error("PDU buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("Address is empty")]
    EmptyAddress,

    #[error("Address has {0} digits, max 15")]
    AddressTooLong(usize),

    #[error("Invalid address digit: '{0}'")]
    InvalidDigit(char),

    #[error("Character not in the GSM 7-bit subset: '{0}'")]
    UnsupportedCharacter(char),

    #[error("User data length {0} exceeds 160 septets")]
    UserDataTooLong(usize),

    #[error("Unsupported TPDU message type {0}")]
    UnsupportedMessageType(u8),

    #[error("Unsupported data coding scheme {0:#04x}")]
    UnsupportedEncoding(u8),
}

/// Pushes `n` as two hex digits.
pub(crate) fn push_hex<const N: usize>(
    out: &mut heapless::String<N>,
    n: u8,
) -> Result<(), PduError> {
    let [hi, lo] = crate::common::text::u8_to_hex(n);
    out.push(char::from(hi))
        .and_then(|_| out.push(char::from(lo)))
        .map_err(|_| PduError::BufferTooSmall {
            needed: out.len() + 2,
            got: N,
        })
}

/// Reads the hex octet at `pos`.
pub(crate) fn hex_at(hex: &[u8], pos: usize) -> Result<u8, PduError> {
    let pair = hex.get(pos..pos + 2).ok_or(PduError::Truncated {
        needed: pos + 2,
        got: hex.len(),
    })?;
    crate::common::text::hex_to_u8(pair).ok_or(PduError::InvalidHex)
}
