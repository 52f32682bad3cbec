// src/common/response/parse.rs

use super::error::ResponseParseError;
use super::{DataLine, LineKind};

use crate::common::hash::CommandHash;
use crate::common::text::Scanner;
use crate::common::types::RegistrationStatus;

/// Bars value reported when `+CSQ` could not be parsed.
pub const BARS_UNKNOWN: u8 = 99;

/// Length of `*PSUTTZ: `; the timestamp follows.
const PSU_TIME_OFFSET: usize = 9;

/// Largest RSSI code that maps to a dBm value.
const RSSI_MAX: u16 = 31;
const RSSI_NOT_DETECTABLE: u16 = 99;

// --- Line Classification ---

/// Decides what a complete line means. The checks run in priority order.
pub fn classify_line(line: &[u8]) -> LineKind<'_> {
    let Some(&first) = line.first() else {
        return LineKind::Ignored;
    };
    match first {
        b'*' if line.starts_with(b"*PSU") => {
            LineKind::TimeBroadcast(line.get(PSU_TIME_OFFSET..).unwrap_or(&[]))
        }
        b'+' => match parse_data_line(line) {
            Ok(data) => LineKind::Data(data),
            Err(_) => LineKind::Other(line),
        },
        b'A' if matches!(line.get(1), Some(b'T' | b't')) => LineKind::Echo,
        _ if line.starts_with(b"ERROR") => LineKind::Error,
        _ if line.starts_with(b"DST:") => LineKind::Ignored,
        _ if line.starts_with(b"NORMAL POWER DOWN") => LineKind::PowerDown,
        _ if line.starts_with(b"OK") => LineKind::Ok,
        _ if line.starts_with(b"RDY") => LineKind::Ignored,
        _ if line.starts_with(b"SMS Ready") => LineKind::SmsReady,
        _ => LineKind::Other(line),
    }
}

/// Splits `+MNEMONIC: payload`, hashing the mnemonic on the way.
pub fn parse_data_line(line: &[u8]) -> Result<DataLine<'_>, ResponseParseError> {
    let body = line.strip_prefix(b"+").ok_or(ResponseParseError::EmptyInput)?;
    let colon = body
        .iter()
        .position(|&c| c == b':')
        .ok_or(ResponseParseError::MissingColon)?;
    let mnemonic = &body[..colon];
    let mut payload = Scanner::new(&body[colon + 1..]);
    payload.skip_whitespace_on_line();
    Ok(DataLine {
        hash: CommandHash::of(mnemonic),
        mnemonic,
        payload: payload.rest(),
    })
}

// --- Field Parsers ---

/// Maps an RSSI code (0..=31, 99) to tenths of a bar, 0..=49.
pub fn rssi_to_bars(rssi: u16) -> u8 {
    let bars = match rssi {
        RSSI_NOT_DETECTABLE | 0..=1 => 0, // -111 dBm or worse
        2..=9 => 10 + (rssi - 2) * 10 / 8,  // -109 to -95 dBm
        10..=14 => 20 + (rssi - 10) * 10 / 5, // -93 to -85 dBm
        15..=19 => 30 + (rssi - 15) * 10 / 5, // -83 to -75 dBm
        _ => 40 + (rssi.min(RSSI_MAX) - 20) * 10 / 12, // -73 dBm and better
    };
    bars as u8
}

/// `+CSQ: <rssi>,<ber>` to bars; [`BARS_UNKNOWN`] if malformed.
pub fn parse_signal_bars(payload: &[u8]) -> u8 {
    let mut s = Scanner::new(payload);
    match s.parse_u16() {
        (rssi, Some(b',')) if s.pos() > 0 => rssi_to_bars(rssi),
        _ => BARS_UNKNOWN,
    }
}

/// `+CBC: <charging>,<percent>,<millivolts>` to percent.
/// A percentage above 100 is reported as 0.
pub fn parse_battery(payload: &[u8]) -> Result<u8, ResponseParseError> {
    let mut s = Scanner::new(payload);
    let (_, terminator) = s.parse_u16();
    if terminator != Some(b',') || s.pos() == 0 {
        return Err(ResponseParseError::NumericError);
    }
    s.advance(1);
    let start = s.pos();
    let (level, _) = s.parse_u16();
    if s.pos() == start {
        return Err(ResponseParseError::NumericError);
    }
    Ok(if level <= 100 { level as u8 } else { 0 })
}

/// `+CREG: <stat>` (unsolicited) or `+CREG: <n>,<stat>` (solicited).
pub fn parse_registration(payload: &[u8]) -> Result<RegistrationStatus, ResponseParseError> {
    let digit = if payload.get(1) == Some(&b',') {
        payload.get(2)
    } else {
        payload.first()
    };
    match digit {
        Some(d) if d.is_ascii_digit() => Ok(RegistrationStatus::from_digit(*d)),
        Some(_) => Err(ResponseParseError::NumericError),
        None => Err(ResponseParseError::EmptyInput),
    }
}

/// `+CMTI: "SM",3` to the storage index `3`.
pub fn parse_new_message_index(payload: &[u8]) -> Result<u8, ResponseParseError> {
    let mut s = Scanner::new(payload);
    if !s.skip_till(b',', true) {
        return Err(ResponseParseError::NumericError);
    }
    let start = s.pos();
    let (index, _) = s.parse_u16();
    if s.pos() == start {
        return Err(ResponseParseError::NumericError);
    }
    u8::try_from(index).map_err(|_| ResponseParseError::OutOfRange)
}

/// True for a text-mode `+CMGR`/`+CMGL` header, whose body is not a PDU.
///
/// `+CMGR: "REC READ",...` quotes the first field; `+CMGL: 3,"REC READ"`
/// quotes the second, after a one or two digit index.
pub fn is_text_mode_read(payload: &[u8]) -> bool {
    payload.first() == Some(&b'"') || payload.get(2) == Some(&b'"') || payload.get(3) == Some(&b'"')
}

/// `+CPIN: NOT INSERTED`
pub fn sim_not_inserted(payload: &[u8]) -> bool {
    payload.starts_with(b"NOT INSERTED")
}
