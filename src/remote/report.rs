// src/remote/report.rs

//! The status text sent in reply to `?`, `on`, `off` and `setup`.
//!
//! ```text
//! Alarm is ON, High 32.2C, Low 4.4C
//! Sensors: (* = alarm)
//!  0: 32.5C *
//!  1: 26.8C
//! Signal: 3.8 (5 = best)
//! Battery: 84%
//! ```
//!
//! Only characters of the GSM 7-bit default alphabet are emitted, so the
//! text packs one character per septet.

use super::parser::c_to_f;
use crate::common::text::Fixed16;
use core::fmt::{self, Write};

/// Sensors listed in a report.
pub const MAX_REPORTED_SENSORS: usize = 5;

/// Highest signal value shown, 5.0 bars.
const MAX_BARS: u8 = 50;

/// One thermometer reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorReading {
    /// 1/16 °C.
    pub temperature: i16,
    pub in_alarm: bool,
}

/// A temperature held in 1/16 °C, shown in the chosen unit with a suffix.
#[derive(Debug, Clone, Copy)]
struct Temperature {
    celsius: i16,
    show_celsius: bool,
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.show_celsius {
            write!(f, "{}C", Fixed16(self.celsius))
        } else {
            write!(f, "{}F", Fixed16(c_to_f(self.celsius)))
        }
    }
}

/// Everything a status report shows.
#[derive(Debug, Clone, Copy)]
pub struct QueryReport<'a> {
    pub prepend_ok: bool,
    pub alarm_on: bool,
    /// 1/16 °C.
    pub alarm_high: i16,
    /// 1/16 °C.
    pub alarm_low: i16,
    pub show_celsius: bool,
    /// Only the first [`MAX_REPORTED_SENSORS`] are listed.
    pub sensors: &'a [SensorReading],
    /// Tenths of a bar, 0 to 50.
    pub bars: u8,
    /// Percent.
    pub battery: u8,
}

impl QueryReport<'_> {
    fn temperature(&self, celsius: i16) -> Temperature {
        Temperature {
            celsius,
            show_celsius: self.show_celsius,
        }
    }

    /// Formats the report into `out`, replacing its contents.
    pub fn write_into<const N: usize>(&self, out: &mut heapless::String<N>) -> fmt::Result {
        out.clear();
        write!(out, "{}", self)
    }
}

impl fmt::Display for QueryReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prepend_ok {
            f.write_str("OK\n")?;
        }
        write!(
            f,
            "Alarm is {}, High {}, Low {}\nSensors: (* = alarm)",
            if self.alarm_on { "ON" } else { "OFF" },
            self.temperature(self.alarm_high),
            self.temperature(self.alarm_low),
        )?;
        for (i, sensor) in self.sensors.iter().take(MAX_REPORTED_SENSORS).enumerate() {
            // ':' rather than brackets, which are escaped (two septets) in 7-bit.
            write!(f, "\n {}: {}", i, self.temperature(sensor.temperature))?;
            if sensor.in_alarm {
                f.write_str(" *")?;
            }
        }
        let bars = self.bars.min(MAX_BARS);
        write!(
            f,
            "\nSignal: {}.{} (5 = best)\nBattery: {}%",
            bars / 10,
            bars % 10,
            self.battery
        )
    }
}
