// src/pdu/tpdu.rs

use super::semi_octet::{decode_semi_octets, encode_semi_octets, semi_octet_len};
use super::septet::{pack_septets, unpack_septets};
use super::{hex_at, push_hex, MessageText, PduError};
use crate::common::address::{TpAddress, TYPE_INTERNATIONAL};

/// First octet of an outgoing message: SMS-SUBMIT with a relative validity period.
const FIRST_OCTET_SUBMIT: u8 = 0x11;
/// Let the modem assign the message reference.
const MESSAGE_REFERENCE: u8 = 0x00;
const PROTOCOL_ID: u8 = 0x00;
/// GSM 7-bit default alphabet, no message class.
const DCS_GSM7: u8 = 0x00;
/// Relative validity period of one day.
const VALIDITY_ONE_DAY: u8 = 0xA7;

const MESSAGE_TYPE_MASK: u8 = 0x03;
const MESSAGE_TYPE_DELIVER: u8 = 0x00;

/// Protocol identifier, coding scheme and service centre timestamp, in hex characters.
const DELIVER_SKIP: usize = 2 + 2 + 14;
const DCS_OFFSET_IN_SKIP: usize = 2;

/// Selects how an address record's length octet is interpreted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AddressKind {
    /// Service centre: length counts octets, type-of-address included.
    Smsc,
    /// Originating/destination address: length counts digits.
    Tpdu,
}

/// A decoded SMS-DELIVER.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SmsDeliver {
    pub sender: TpAddress,
    pub text: MessageText,
}

/// Writes a complete SMS-SUBMIT PDU (with an empty SMSC field) into `out`.
///
/// Returns the TPDU octet count, which excludes the SMSC field and is the
/// value `AT+CMGS=` expects.
pub fn encode_sms_submit<const N: usize>(
    to: &TpAddress,
    text: &str,
    out: &mut heapless::String<N>,
) -> Result<u8, PduError> {
    if to.is_empty() {
        return Err(PduError::EmptyAddress);
    }
    out.clear();
    push_hex(out, 0x00)?; // use the SMSC stored on the SIM
    push_hex(out, FIRST_OCTET_SUBMIT)?;
    push_hex(out, MESSAGE_REFERENCE)?;
    push_hex(out, to.len() as u8)?;
    push_hex(out, to.type_of_address())?;
    encode_semi_octets(to.digits(), out)?;
    push_hex(out, PROTOCOL_ID)?;
    push_hex(out, DCS_GSM7)?;
    push_hex(out, VALIDITY_ONE_DAY)?;
    pack_septets(text, out)?;
    Ok(((out.len() - 2) / 2) as u8)
}

/// Reads an address record at the start of `hex`.
///
/// Returns the address and the number of hex characters the record spans:
/// `len * 2 + 2` for an SMSC record, `len` rounded up to even `+ 4` for a
/// TPDU address.
pub fn extract_address(hex: &[u8], kind: AddressKind) -> Result<(TpAddress, usize), PduError> {
    let len = usize::from(hex_at(hex, 0)?);
    let (record_len, digit_chars) = match kind {
        AddressKind::Smsc if len == 0 => return Ok((TpAddress::EMPTY, 2)),
        AddressKind::Smsc => (len * 2 + 2, len * 2 - 2),
        AddressKind::Tpdu => (semi_octet_len(len) + 4, semi_octet_len(len)),
    };
    if hex.len() < record_len {
        return Err(PduError::Truncated {
            needed: record_len,
            got: hex.len(),
        });
    }
    let type_of_address = hex_at(hex, 2)?;
    let international = type_of_address & 0x70 == TYPE_INTERNATIONAL & 0x70;
    let address = decode_semi_octets(&hex[4..4 + digit_chars], international)?;
    Ok((address, record_len))
}

/// Decodes an SMS-DELIVER TPDU starting at its first octet.
/// Returns the message and the hex characters consumed.
pub fn parse_sms_deliver(hex: &[u8]) -> Result<(SmsDeliver, usize), PduError> {
    let first_octet = hex_at(hex, 0)?;
    let message_type = first_octet & MESSAGE_TYPE_MASK;
    if message_type != MESSAGE_TYPE_DELIVER {
        return Err(PduError::UnsupportedMessageType(message_type));
    }
    let mut pos = 2;
    let (sender, address_len) = extract_address(&hex[pos..], AddressKind::Tpdu)?;
    pos += address_len;

    let dcs = hex_at(hex, pos + DCS_OFFSET_IN_SKIP)?;
    // General data coding group: bits 2-3 select the alphabet.
    if dcs & 0xC0 == 0 && dcs & 0x0C != 0 {
        return Err(PduError::UnsupportedEncoding(dcs));
    }
    pos += DELIVER_SKIP;
    if hex.len() < pos {
        return Err(PduError::Truncated {
            needed: pos,
            got: hex.len(),
        });
    }

    let mut text = MessageText::new();
    let (_, consumed) = unpack_septets(&hex[pos..], &mut text)?;
    Ok((SmsDeliver { sender, text }, pos + consumed))
}

/// Decodes a full `+CMGR`/`+CMGL` PDU line: SMSC record followed by the TPDU.
pub fn parse_deliver_line(hex: &[u8]) -> Result<(TpAddress, SmsDeliver), PduError> {
    let (smsc, smsc_len) = extract_address(hex, AddressKind::Smsc)?;
    let (message, _) = parse_sms_deliver(&hex[smsc_len..])?;
    Ok((smsc, message))
}
