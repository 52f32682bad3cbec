// src/modem/io_helpers.rs

use super::{ModemHandler, Sim7000};
use crate::common::{
    error::ModemError,
    hal_traits::{ModemClock, ModemPins, ModemSerial},
    timing,
};
use core::time::Duration;
use nb::Result as NbResult;

/// Software flow control towards the modem.
const XOFF: u8 = 0x13;
const XON: u8 = 0x11;

// Implementation block for I/O related helpers
impl<IF, H> Sim7000<IF, H>
where
    IF: ModemSerial + ModemPins + ModemClock,
    H: ModemHandler,
{
    #[inline]
    pub(super) fn now(&mut self) -> u32 {
        self.interface.now_ms()
    }

    /// Executes a non-blocking I/O operation (`f`) repeatedly until it
    /// stops returning `WouldBlock`, returning the final result or a timeout error.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        mut f: FN,
    ) -> Result<T, ModemError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let limit = timing::as_ticks(timeout);
        let start = self.interface.now_ms();

        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(result),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now_ms().wrapping_sub(start) >= limit {
                        return Err(ModemError::Timeout);
                    }
                }
                Err(nb::Error::Other(e)) => return Err(ModemError::Io(e)),
            }
        }
    }

    pub(super) fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), ModemError<IF::Error>> {
        for byte in bytes {
            self.execute_blocking_io_with_timeout(timing::BYTE_WRITE_TIMEOUT, |iface| {
                iface.write_byte(*byte)
            })?;
        }
        Ok(())
    }

    pub(super) fn flush_tx(&mut self) -> Result<(), ModemError<IF::Error>> {
        self.execute_blocking_io_with_timeout(timing::FLUSH_TIMEOUT, |iface| iface.flush())
    }

    /// Writes a command line followed by CR LF.
    pub(super) fn write_line(&mut self, line: &[u8]) -> Result<(), ModemError<IF::Error>> {
        log::trace!(">{}", core::str::from_utf8(line).unwrap_or("<binary>"));
        self.write_bytes(line)?;
        self.write_bytes(b"\r\n")?;
        self.flush_tx()
    }

    /// Asks the modem to hold its output while a line is processed.
    pub(super) fn pause_rx(&mut self) -> Result<(), ModemError<IF::Error>> {
        if !self.rx_paused {
            self.rx_paused = true;
            self.write_bytes(&[XOFF])?;
        }
        Ok(())
    }

    pub(super) fn resume_rx(&mut self) -> Result<(), ModemError<IF::Error>> {
        if self.rx_paused {
            self.rx_paused = false;
            self.write_bytes(&[XON])?;
        }
        Ok(())
    }
}
