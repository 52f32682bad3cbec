// src/common/response/mod.rs

mod error;
pub mod parse;

pub use error::ResponseParseError;
pub use parse::{
    classify_line, parse_battery, parse_data_line, parse_new_message_index,
    parse_registration, parse_signal_bars, rssi_to_bars, sim_not_inserted, is_text_mode_read,
    BARS_UNKNOWN,
};

use crate::common::hash::CommandHash;

/// A `+MNEMONIC: payload` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataLine<'a> {
    pub hash: CommandHash,
    /// Text between `+` and `:`.
    pub mnemonic: &'a [u8],
    /// Everything after `:` with leading blanks removed. May be empty.
    pub payload: &'a [u8],
}

/// What a received line means, decided by its leading characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// `*PSU...` network time broadcast; carries the text from the date on.
    TimeBroadcast(&'a [u8]),
    Data(DataLine<'a>),
    /// Our own command echoed back (`AT...`), seen while echo is still on.
    Echo,
    /// `ERROR`
    Error,
    /// `NORMAL POWER DOWN`
    PowerDown,
    /// `OK`
    Ok,
    /// `SMS Ready`, the last line of the boot banner.
    SmsReady,
    /// Recognised but uninteresting: `RDY`, `DST: n`.
    Ignored,
    /// Anything else.
    Other(&'a [u8]),
}
