// src/common/types.rs

use core::fmt;

/// State of the single in-flight AT command slot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandState {
    /// No command outstanding; a new one may be sent.
    #[default]
    Ready,
    /// A command was written and its terminal response is awaited.
    Busy,
    /// The pending command (or the boot window) elapsed without a terminal response.
    Timeout,
    /// The modem answered with `ERROR`, `+CME ERROR` or `+CMS ERROR`,
    /// or bring-up failed.
    Error,
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandState::Ready => "Ready",
            CommandState::Busy => "Busy",
            CommandState::Timeout => "Timeout",
            CommandState::Error => "Error",
        };
        f.write_str(name)
    }
}

/// Power phase of the modem as driven by the pin sequencer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SleepState {
    #[default]
    Running,
    WakingUp,
    GoingToSleep,
    Sleeping,
}

impl fmt::Display for SleepState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SleepState::Running => "Running",
            SleepState::WakingUp => "Waking up",
            SleepState::GoingToSleep => "Going to sleep",
            SleepState::Sleeping => "Sleeping",
        };
        f.write_str(name)
    }
}

/// Progress of the outgoing SMS handshake.
///
/// `Sent` and `Failed` are sticky until acknowledged with
/// [`Sim7000::acknowledge_sms_status`](crate::modem::Sim7000::acknowledge_sms_status).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmsStatus {
    #[default]
    Idle,
    /// `AT+CMGS` issued, waiting for the `>` prompt.
    Sending,
    /// Payload and Ctrl-Z written, waiting for `+CMGS:`.
    Waiting,
    Sent,
    Failed,
}

impl SmsStatus {
    /// True once the handshake has reached a result the caller must acknowledge.
    pub const fn is_finished(&self) -> bool {
        matches!(self, SmsStatus::Sent | SmsStatus::Failed)
    }
}

impl fmt::Display for SmsStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SmsStatus::Idle => "Idle",
            SmsStatus::Sending => "Sending",
            SmsStatus::Waiting => "Waiting",
            SmsStatus::Sent => "Sent",
            SmsStatus::Failed => "Failed",
        };
        f.write_str(name)
    }
}

/// Network registration status as reported by `+CREG`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationStatus {
    #[default]
    NotRegistered,
    Registered,
    Searching,
    Denied,
    Unknown,
    Roaming,
}

impl RegistrationStatus {
    /// Decodes the single status digit of a `+CREG` report.
    /// Anything outside `0..=5` maps to `Unknown`.
    pub const fn from_digit(digit: u8) -> Self {
        match digit {
            b'0' => RegistrationStatus::NotRegistered,
            b'1' => RegistrationStatus::Registered,
            b'2' => RegistrationStatus::Searching,
            b'3' => RegistrationStatus::Denied,
            b'5' => RegistrationStatus::Roaming,
            _ => RegistrationStatus::Unknown,
        }
    }

    /// Registered on the home network or roaming.
    #[inline]
    pub const fn is_connected(&self) -> bool {
        matches!(self, RegistrationStatus::Registered | RegistrationStatus::Roaming)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RegistrationStatus::NotRegistered => "Not registered",
            RegistrationStatus::Registered => "Registered",
            RegistrationStatus::Searching => "Searching",
            RegistrationStatus::Denied => "Denied",
            RegistrationStatus::Unknown => "Unknown",
            RegistrationStatus::Roaming => "Roaming",
        };
        f.write_str(name)
    }
}
