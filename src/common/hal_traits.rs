// src/common/hal_traits.rs

use core::fmt::Debug;

/// Non-blocking byte transport to the modem UART.
pub trait ModemSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` when nothing has arrived yet.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to queue a single byte for transmission.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` if the transmit buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;
}

/// Control lines of the modem.
///
/// "Active" means the line is driven low; inactive releases it so the
/// modem's internal pull-up takes over.
pub trait ModemPins {
    fn set_power_key(&mut self, active: bool);

    fn set_reset(&mut self, active: bool);

    /// State of the modem's status/ready output. High once the modem
    /// is powered and its UART is usable.
    fn link_ready(&mut self) -> bool;
}

/// Free-running millisecond clock. Wrapping at `u32::MAX` is expected.
pub trait ModemClock {
    fn now_ms(&mut self) -> u32;
}

/// Bundles embedded-hal 1.0 peripherals into one modem interface.
///
/// The UART comes from `embedded-hal-nb`, the control lines from
/// `embedded_hal::digital` and the clock is anything implementing
/// [`ModemClock`].
#[cfg(feature = "impl-native")]
pub struct HalInterface<UART, PWR, RST, STATUS, CLK> {
    uart: UART,
    power_key: PWR,
    reset: RST,
    status: STATUS,
    clock: CLK,
}

#[cfg(feature = "impl-native")]
impl<UART, PWR, RST, STATUS, CLK> HalInterface<UART, PWR, RST, STATUS, CLK>
where
    UART: embedded_hal_nb::serial::Read<u8> + embedded_hal_nb::serial::Write<u8>,
    PWR: embedded_hal::digital::OutputPin,
    RST: embedded_hal::digital::OutputPin,
    STATUS: embedded_hal::digital::InputPin,
    CLK: ModemClock,
{
    pub fn new(uart: UART, power_key: PWR, reset: RST, status: STATUS, clock: CLK) -> Self {
        HalInterface {
            uart,
            power_key,
            reset,
            status,
            clock,
        }
    }

    pub fn release(self) -> (UART, PWR, RST, STATUS, CLK) {
        (self.uart, self.power_key, self.reset, self.status, self.clock)
    }
}

#[cfg(feature = "impl-native")]
fn drive<P: embedded_hal::digital::OutputPin>(pin: &mut P, active: bool) {
    let result = if active { pin.set_low() } else { pin.set_high() };
    if let Err(e) = result {
        log::warn!("Modem control pin error: {:?}", e);
    }
}

#[cfg(feature = "impl-native")]
impl<UART, PWR, RST, STATUS, CLK> ModemSerial for HalInterface<UART, PWR, RST, STATUS, CLK>
where
    UART: embedded_hal_nb::serial::Read<u8> + embedded_hal_nb::serial::Write<u8>,
{
    type Error = UART::Error;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        self.uart.read()
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.uart.write(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.uart.flush()
    }
}

#[cfg(feature = "impl-native")]
impl<UART, PWR, RST, STATUS, CLK> ModemPins for HalInterface<UART, PWR, RST, STATUS, CLK>
where
    PWR: embedded_hal::digital::OutputPin,
    RST: embedded_hal::digital::OutputPin,
    STATUS: embedded_hal::digital::InputPin,
{
    fn set_power_key(&mut self, active: bool) {
        drive(&mut self.power_key, active);
    }

    fn set_reset(&mut self, active: bool) {
        drive(&mut self.reset, active);
    }

    fn link_ready(&mut self) -> bool {
        match self.status.is_high() {
            Ok(high) => high,
            Err(e) => {
                log::warn!("Modem status pin error: {:?}", e);
                false
            }
        }
    }
}

#[cfg(feature = "impl-native")]
impl<UART, PWR, RST, STATUS, CLK: ModemClock> ModemClock for HalInterface<UART, PWR, RST, STATUS, CLK> {
    fn now_ms(&mut self) -> u32 {
        self.clock.now_ms()
    }
}
