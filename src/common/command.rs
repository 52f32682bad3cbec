// src/common/command.rs

//! AT commands issued by the driver itself.

use core::fmt::{self, Write};
use core::time::Duration;

use arrayvec::ArrayString;

use super::hash::CommandHash;
use super::timing;

/// Longest command line the driver formats, terminator excluded.
pub const MAX_COMMAND_LEN: usize = 48;

pub type CommandBuffer = ArrayString<MAX_COMMAND_LEN>;

/// Commands the driver sends on its own initiative.
///
/// `Display` renders the command line without its CR LF terminator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AtCommand {
    /// `ATE0`: first command after boot, doubles as the autobaud probe.
    EchoOff,
    /// `AT+IPR=<baud>`: pin the baud rate once autobaud has locked on.
    SetBaudRate(u32),
    /// `AT+IFC=1;+CLTS=1;+CREG=1`: XON/XOFF towards the host, network time
    /// and registration reports.
    ConfigureLink,
    /// `AT+CSQ;+CBC`: signal quality and battery.
    CheckLevels,
    /// `AT+CMGR=<index>`
    ReadMessage(u8),
    /// `AT+CMGD=<index>`
    DeleteMessage(u8),
    /// `AT+CMGF=0;+CMGS=<octets>`: PDU mode, then open the SMS prompt.
    SubmitPdu(u8),
}

impl fmt::Display for AtCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtCommand::EchoOff => f.write_str("ATE0"),
            AtCommand::SetBaudRate(baud) => write!(f, "AT+IPR={}", baud),
            AtCommand::ConfigureLink => f.write_str("AT+IFC=1;+CLTS=1;+CREG=1"),
            AtCommand::CheckLevels => f.write_str("AT+CSQ;+CBC"),
            AtCommand::ReadMessage(index) => write!(f, "AT+CMGR={}", index),
            AtCommand::DeleteMessage(index) => write!(f, "AT+CMGD={}", index),
            AtCommand::SubmitPdu(octets) => write!(f, "AT+CMGF=0;+CMGS={}", octets),
        }
    }
}

impl AtCommand {
    /// Hash recorded as the pending command; it selects the follow-up action
    /// when the command completes.
    pub const fn expected_hash(&self) -> CommandHash {
        match self {
            AtCommand::EchoOff => CommandHash::ATE0,
            AtCommand::SetBaudRate(_) => CommandHash::IPR,
            AtCommand::ConfigureLink => CommandHash::IFC,
            AtCommand::SubmitPdu(_) => CommandHash::CMGS,
            AtCommand::CheckLevels | AtCommand::ReadMessage(_) | AtCommand::DeleteMessage(_) => {
                CommandHash::NONE
            }
        }
    }

    pub const fn timeout(&self) -> Duration {
        match self {
            AtCommand::EchoOff | AtCommand::SetBaudRate(_) | AtCommand::ConfigureLink => {
                timing::DEFAULT_COMMAND_TIMEOUT
            }
            AtCommand::CheckLevels => timing::CHECK_LEVELS_TIMEOUT,
            AtCommand::ReadMessage(_) | AtCommand::DeleteMessage(_) => timing::MESSAGE_RW_TIMEOUT,
            AtCommand::SubmitPdu(_) => timing::SMS_SUBMIT_TIMEOUT,
        }
    }

    /// Formats the command line into a fixed buffer.
    pub fn format_into(&self) -> Result<CommandBuffer, fmt::Error> {
        let mut buffer = CommandBuffer::new();
        write!(buffer, "{}", self)?;
        Ok(buffer)
    }
}
