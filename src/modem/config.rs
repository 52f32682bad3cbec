// src/modem/config.rs

/// Runtime settings for [`Sim7000`](super::Sim7000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ModemConfig {
    /// Rate pinned with `AT+IPR` once autobaud has locked on.
    pub baud_rate: u32,
    /// How many times `ATE0` is re-sent after the boot window before giving up.
    pub autobaud_echo_retries: u8,
    /// Issue `AT+CMGD` after each message has been read.
    pub delete_after_read: bool,
    /// Automatic `AT+CSQ;+CBC` interval in milliseconds; 0 disables it.
    pub check_levels_period_ms: u32,
}

impl ModemConfig {
    pub const DEFAULT_BAUD_RATE: u32 = 9600;
    pub const DEFAULT_AUTOBAUD_ECHO_RETRIES: u8 = 10;

    pub const fn new() -> Self {
        ModemConfig {
            baud_rate: Self::DEFAULT_BAUD_RATE,
            autobaud_echo_retries: Self::DEFAULT_AUTOBAUD_ECHO_RETRIES,
            delete_after_read: true,
            check_levels_period_ms: 0,
        }
    }

    pub const fn with_delete_after_read(mut self, delete: bool) -> Self {
        self.delete_after_read = delete;
        self
    }

    pub const fn with_check_levels_period_ms(mut self, period_ms: u32) -> Self {
        self.check_levels_period_ms = period_ms;
        self
    }
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self::new()
    }
}
