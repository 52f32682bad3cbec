// src/remote/mod.rs

//! SMS remote control of the thermometer.
//!
//! A user claims the device by texting `setup <PIN>`; after that only the
//! claiming number may switch alarm reporting `on`/`off` or ask for a status
//! report with `?`. Each accepted command queues a single reply which the
//! modem sends once it is clear to do so.

pub mod parser;
pub mod report;

pub use parser::{c_to_f, f_to_c, RemoteCommand};
pub use report::{QueryReport, SensorReading, MAX_REPORTED_SENSORS};

use crate::common::{address::TpAddress, error::ModemError};
use crate::modem::{ModemHandler, OutgoingSms, SmsText};

/// Holds at most one outgoing reply.
///
/// A second reply is refused until the first is sent, so at most one SMS
/// originates from the application at a time.
#[derive(Debug, Clone, Default)]
pub struct ReplySlot<T> {
    slot: Option<T>,
}

impl<T: Clone> ReplySlot<T> {
    pub const fn new() -> Self {
        ReplySlot { slot: None }
    }

    pub fn queue(&mut self, reply: T) -> Result<(), ModemError> {
        if self.slot.is_some() {
            return Err(ModemError::ReplyPending);
        }
        self.slot = Some(reply);
        Ok(())
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.slot.is_some()
    }

    pub fn peek(&self) -> Option<&T> {
        self.slot.as_ref()
    }

    /// A copy of the pending reply; the slot keeps it until
    /// [`result`](ReplySlot::result) reports it accepted.
    pub fn offer(&self) -> Option<T> {
        self.slot.clone()
    }

    pub fn result(&mut self, accepted: bool) {
        if accepted {
            self.slot = None;
        }
    }
}

/// Which report a queued reply carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReplyKind {
    Query,
    /// Acknowledges `setup`, `on` or `off`.
    QueryWithOk,
}

/// Applies SMS commands to the alarm settings and answers with reports.
///
/// Plug into [`Sim7000`](crate::modem::Sim7000) as its handler. Sensor
/// readings and modem levels are pushed in by the application so the report
/// reflects the latest values.
#[derive(Debug)]
pub struct RemoteControl {
    pin: u16,
    celsius: bool,
    enabled: bool,
    target: TpAddress,
    alarm_on: bool,
    turning_alarm_off: bool,
    alarm_high: i16,
    alarm_low: i16,
    sensors: heapless::Vec<SensorReading, MAX_REPORTED_SENSORS>,
    bars: u8,
    battery: u8,
    reply: ReplySlot<ReplyKind>,
}

impl RemoteControl {
    /// `pin` must accompany `setup`. `celsius` picks the report unit and the
    /// unit of thresholds sent without a suffix.
    pub fn new(pin: u16, celsius: bool) -> Self {
        RemoteControl {
            pin,
            celsius,
            enabled: true,
            target: TpAddress::EMPTY,
            alarm_on: false,
            turning_alarm_off: false,
            alarm_high: 0,
            alarm_low: 0,
            sensors: heapless::Vec::new(),
            bars: 0,
            battery: 0,
            reply: ReplySlot::new(),
        }
    }

    /// Restores a previously claimed target, e.g. from non-volatile storage.
    pub fn with_target(mut self, target: TpAddress) -> Self {
        self.target = target;
        self
    }

    pub fn with_alarm_limits(mut self, high: i16, low: i16) -> Self {
        self.alarm_high = high;
        self.alarm_low = low;
        self
    }

    /// While disabled, received messages are ignored.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn set_alarm(&mut self, on: bool) {
        self.alarm_on = on;
        self.turning_alarm_off = false;
    }

    /// Queues an alarm report to the target. Reporting is switched off once
    /// the report is accepted, so the user must send `on` to re-arm it.
    ///
    /// Returns `false` if reporting is off, no target is set, or a reply is
    /// already queued.
    pub fn raise_alarm(&mut self) -> bool {
        if !self.alarm_on || self.turning_alarm_off || self.target.is_empty() {
            return false;
        }
        self.turning_alarm_off = self.reply.queue(ReplyKind::Query).is_ok();
        self.turning_alarm_off
    }

    /// Latest readings; only the first [`MAX_REPORTED_SENSORS`] are kept.
    pub fn update_sensors(&mut self, readings: &[SensorReading]) {
        self.sensors.clear();
        for reading in readings.iter().take(MAX_REPORTED_SENSORS) {
            // Capacity is MAX_REPORTED_SENSORS.
            let _ = self.sensors.push(*reading);
        }
    }

    /// Tenths of a bar and battery percent as reported by the modem.
    pub fn update_levels(&mut self, bars: u8, battery: u8) {
        self.bars = bars;
        self.battery = battery;
    }

    #[inline]
    pub fn target(&self) -> &TpAddress {
        &self.target
    }

    #[inline]
    pub fn alarm_on(&self) -> bool {
        self.alarm_on
    }

    /// High and low limits, 1/16 °C.
    pub fn alarm_limits(&self) -> (i16, i16) {
        (self.alarm_high, self.alarm_low)
    }

    pub fn pending_reply(&self) -> Option<ReplyKind> {
        self.reply.peek().copied()
    }

    /// The report for `kind` as it would be sent now.
    pub fn report(&self, kind: ReplyKind) -> QueryReport<'_> {
        QueryReport {
            prepend_ok: kind == ReplyKind::QueryWithOk,
            alarm_on: self.alarm_on && !self.turning_alarm_off,
            alarm_high: self.alarm_high,
            alarm_low: self.alarm_low,
            show_celsius: self.celsius,
            sensors: &self.sensors,
            bars: self.bars,
            battery: self.battery,
        }
    }

    fn apply(&mut self, command: RemoteCommand, sender: &TpAddress) {
        match command {
            RemoteCommand::Setup { pin, high, low } => {
                if pin != self.pin {
                    log::debug!("Setup from {} with wrong PIN", sender);
                    return;
                }
                self.target = with_trunk_prefix(sender);
                if let Some(high) = high {
                    self.alarm_high = high;
                }
                if let Some(low) = low {
                    self.alarm_low = low;
                }
                log::debug!("Target set to {}", self.target);
                self.switch_alarm(true);
            }
            _ if self.target.is_empty() || !self.target.same_as(sender) => {
                log::debug!("Ignoring command from {}", sender);
            }
            RemoteCommand::On => self.switch_alarm(true),
            RemoteCommand::Off => self.switch_alarm(false),
            RemoteCommand::Query => self.queue_reply(ReplyKind::Query),
        }
    }

    fn switch_alarm(&mut self, on: bool) {
        self.set_alarm(on);
        self.queue_reply(ReplyKind::QueryWithOk);
    }

    fn queue_reply(&mut self, kind: ReplyKind) {
        if let Err(e) = self.reply.queue(kind) {
            log::warn!("Reply dropped: {}", e);
        }
    }
}

/// North American numbers are stored with their leading `1`.
fn with_trunk_prefix(address: &TpAddress) -> TpAddress {
    let digits = address.digits();
    if digits.first() == Some(&b'1') {
        return *address;
    }
    let mut prefixed: heapless::Vec<u8, 16> = heapless::Vec::new();
    if prefixed.push(b'1').is_err() || prefixed.extend_from_slice(digits).is_err() {
        return *address;
    }
    TpAddress::from_digits(&prefixed, address.is_international()).unwrap_or(*address)
}

impl ModemHandler for RemoteControl {
    fn message_read(&mut self, text: &str, _len: usize, sender: &TpAddress, _smsc: &TpAddress) {
        if !self.enabled {
            return;
        }
        match RemoteCommand::parse(text, self.celsius) {
            Some(command) => self.apply(command, sender),
            None => log::debug!("No command in message from {}", sender),
        }
    }

    fn queued_sms_reply(&mut self) -> Option<OutgoingSms> {
        let kind = self.reply.offer()?;
        let mut text = SmsText::new();
        if self.report(kind).write_into(&mut text).is_err() {
            log::warn!("Report truncated to {} characters", text.len());
        }
        Some(OutgoingSms::new(self.target, text))
    }

    fn queued_sms_reply_result(&mut self, accepted: bool) {
        self.reply.result(accepted);
        if accepted && self.turning_alarm_off {
            self.set_alarm(false);
        }
    }
}
