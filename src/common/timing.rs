// src/common/timing.rs

use core::time::Duration;

// === Pin Sequencing ===

/// Power key held low to switch the modem on.
pub const WAKE_PULSE: Duration = Duration::from_millis(1000);
/// Power key held low to request a normal power down.
pub const SLEEP_PULSE: Duration = Duration::from_millis(1200);
/// Reset line held low for a hardware reset.
pub const RESET_PULSE: Duration = Duration::from_millis(250);
/// Window after wake/reset in which the modem must announce itself.
/// Every received line restarts it.
pub const BOOT_TIMEOUT: Duration = Duration::from_millis(7000);

// === Command Timeouts ===

/// Default deadline for configuration commands.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_millis(1000);
/// `AT+CMGR` / `AT+CMGD`.
pub const MESSAGE_RW_TIMEOUT: Duration = Duration::from_millis(5000);
/// `AT+CSQ;+CBC`.
pub const CHECK_LEVELS_TIMEOUT: Duration = Duration::from_millis(2000);
/// `AT+CMGS` through to `+CMGS:`; the network round trip can be slow.
pub const SMS_SUBMIT_TIMEOUT: Duration = Duration::from_millis(60_000);

// === Blocking Writes ===

/// Upper bound for a single byte to be accepted by the UART.
pub const BYTE_WRITE_TIMEOUT: Duration = Duration::from_millis(20);
/// Upper bound for the UART to drain after a command line.
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(50);

/// Converts to the millisecond ticks used by [`ModemClock`](super::hal_traits::ModemClock).
#[inline]
pub const fn as_ticks(duration: Duration) -> u32 {
    let ms = duration.as_millis();
    if ms > u32::MAX as u128 {
        u32::MAX
    } else {
        ms as u32
    }
}
