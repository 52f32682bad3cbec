// src/modem/mod.rs

//! Non-blocking SIM7000 driver.
//!
//! [`Sim7000`] owns the serial link, the power/reset lines and a millisecond
//! clock. The application calls [`Sim7000::poll`] from its main loop; every
//! state change happens there. Exactly one command is in flight at a time.

mod config;
mod handler;
mod io_helpers;
mod power;
mod protocol_helpers;
mod sms;
mod transaction;

pub use config::ModemConfig;
pub use handler::{ModemHandler, OutgoingSms, SmsText};

use crate::common::{
    command::AtCommand,
    error::ModemError,
    frame::LineBuffer,
    hal_traits::{ModemClock, ModemPins, ModemSerial},
    hash::CommandHash,
    period::MsPeriod,
    ring::MessageRing,
    types::{CommandState, RegistrationStatus, SleepState, SmsStatus},
};
use crate::pdu::PduBuffer;

/// The command currently awaiting its terminal response.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct PendingCommand {
    /// Selects the follow-up once the command completes.
    hash: CommandHash,
    /// Set for commands the driver issued itself.
    command: Option<AtCommand>,
}

/// Driver for a SIM7000-class modem.
#[derive(Debug)]
pub struct Sim7000<IF, H = ()>
where
    IF: ModemSerial + ModemPins + ModemClock,
    H: ModemHandler,
{
    interface: IF,
    handler: H,
    config: ModemConfig,

    rx: LineBuffer,
    rx_paused: bool,
    tx: PduBuffer,

    command_state: CommandState,
    sleep_state: SleepState,
    sms_status: SmsStatus,
    registration: RegistrationStatus,

    pending: Option<PendingCommand>,
    /// `ATE0` re-sends left, and whether any were used.
    echo_retries: u8,
    echo_retried: bool,
    /// A `+CMGR`/`+CMGL` PDU header was seen; the next line is the PDU.
    awaiting_pdu: bool,

    /// Command deadline, or the boot window while waking.
    command_timeout: MsPeriod,
    pin_period: MsPeriod,
    check_levels_period: MsPeriod,

    messages: MessageRing,
    reading: Option<u8>,
    deleting: Option<u8>,

    bars: u8,
    battery_level: u8,
    time: Option<u32>,
}

impl<IF, H> Sim7000<IF, H>
where
    IF: ModemSerial + ModemPins + ModemClock,
    H: ModemHandler,
{
    pub fn new(interface: IF, handler: H, config: ModemConfig) -> Self {
        Sim7000 {
            interface,
            handler,
            config,
            rx: LineBuffer::new(),
            rx_paused: false,
            tx: PduBuffer::new(),
            command_state: CommandState::Ready,
            sleep_state: SleepState::Running,
            sms_status: SmsStatus::Idle,
            registration: RegistrationStatus::NotRegistered,
            pending: None,
            echo_retries: 0,
            echo_retried: false,
            awaiting_pdu: false,
            command_timeout: MsPeriod::new(),
            pin_period: MsPeriod::new(),
            check_levels_period: MsPeriod::new(),
            messages: MessageRing::new(),
            reading: None,
            deleting: None,
            bars: 0,
            battery_level: 0,
            time: None,
        }
    }

    /// Releases the control lines and powers the modem up.
    pub fn begin(&mut self) -> Result<(), ModemError<IF::Error>> {
        self.interface.set_power_key(false);
        self.interface.set_reset(false);
        self.sms_status = SmsStatus::Idle;
        self.check_levels_period
            .set_ms(self.config.check_levels_period_ms);
        self.wake_up()
    }

    /// Runs timers, schedules stored-message reads and processes input.
    ///
    /// Call this from the main loop as often as possible; it never waits
    /// for the modem.
    pub fn poll(&mut self) -> Result<(), ModemError<IF::Error>> {
        self.service_pin_timer();
        self.service_messages()?;
        self.drain_rx()?;

        let now = self.now();
        if self.command_timeout.passed(now) {
            self.command_timed_out()?;
        }
        if self.check_levels_period.passed(now) && self.sleep_state == SleepState::Running {
            transaction::only_io("Periodic check levels", self.check_levels())?;
        }
        Ok(())
    }

    /// Sends an arbitrary command line (without CR LF).
    ///
    /// `expected` is recorded as the pending command; pass
    /// [`CommandHash::NONE`] when the reply completes on `OK` alone.
    /// A `timeout_ms` of 0 waits indefinitely.
    pub fn send_command(
        &mut self,
        command: &str,
        expected: CommandHash,
        timeout_ms: u32,
    ) -> Result<(), ModemError<IF::Error>> {
        self.ensure_clear_to_send()?;
        self.dispatch(command.as_bytes(), expected, timeout_ms, None)
    }

    /// Returns the command slot to `Ready`.
    ///
    /// A command still in flight is abandoned; its reply, if it ever comes,
    /// is treated as stray.
    pub fn clear_error(&mut self) {
        self.abandon_command();
        self.rx.clear();
    }

    fn ensure_clear_to_send(&mut self) -> Result<(), ModemError<IF::Error>> {
        if self.command_state != CommandState::Ready {
            return Err(ModemError::NotReady(self.command_state));
        }
        if self.sleep_state == SleepState::WakingUp {
            return Err(ModemError::WakingUp);
        }
        if !self.interface.link_ready() {
            return Err(ModemError::NotClearToSend);
        }
        Ok(())
    }

    /// A command could be sent now.
    pub fn clear_to_send(&mut self) -> bool {
        self.ensure_clear_to_send().is_ok()
    }

    pub fn connected_and_clear_to_send(&mut self) -> bool {
        self.registration.is_connected() && self.clear_to_send()
    }

    /// An SMS could be sent now.
    pub fn clear_to_send_sms(&mut self) -> bool {
        self.sms_status == SmsStatus::Idle && self.connected_and_clear_to_send()
    }

    /// Sets the automatic levels check interval; 0 disables it.
    pub fn set_check_levels_period(&mut self, period_ms: u32) {
        let now = self.now();
        self.check_levels_period.set_ms(period_ms);
        self.check_levels_period.start(now);
    }

    pub fn set_delete_after_read(&mut self, delete: bool) {
        self.config.delete_after_read = delete;
    }

    // --- Accessors ---

    pub fn command_state(&self) -> CommandState {
        self.command_state
    }

    pub fn sleep_state(&self) -> SleepState {
        self.sleep_state
    }

    pub fn sms_status(&self) -> SmsStatus {
        self.sms_status
    }

    pub fn registration(&self) -> RegistrationStatus {
        self.registration
    }

    /// Signal strength in tenths of a bar (0..=50), or 99 if unknown.
    pub fn bars(&self) -> u8 {
        self.bars
    }

    /// Battery charge in percent.
    pub fn battery_level(&self) -> u8 {
        self.battery_level
    }

    /// Last clock reading from the modem, in local Unix seconds.
    pub fn time(&self) -> Option<u32> {
        self.time
    }

    pub fn time_is_valid(&self) -> bool {
        self.time.is_some()
    }

    /// Marks the clock stale, e.g. after the host slept for a long time.
    pub fn invalidate_time(&mut self) {
        self.time = None;
    }

    /// Stored messages announced but not yet read.
    pub fn pending_messages(&self) -> usize {
        self.messages.len()
    }

    pub fn config(&self) -> &ModemConfig {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    pub fn release(self) -> (IF, H) {
        (self.interface, self.handler)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::address::TpAddress;
    use crate::pdu::PduError;
    use std::collections::VecDeque;
    use std::string::String;
    use std::vec::Vec;

    // --- Mock Comm Error ---
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    struct MockCommError;

    // --- Mock Interface ---
    #[derive(Debug, Default)]
    struct MockInterface {
        now_ms: u32,
        read_queue: VecDeque<u8>,
        write_log: Vec<u8>,
        link: bool,
        power_key_active: bool,
        reset_active: bool,
        block_writes: bool,
        fail_writes: bool,
    }

    impl MockInterface {
        fn new(link: bool) -> Self {
            MockInterface {
                link,
                ..Default::default()
            }
        }

        fn stage_read_data(&mut self, data: &[u8]) {
            self.read_queue.extend(data.iter().copied());
        }

        fn advance_time(&mut self, ms: u32) {
            self.now_ms = self.now_ms.wrapping_add(ms);
        }

        /// Written bytes without XON/XOFF.
        fn written(&self) -> String {
            let bytes: Vec<u8> = self
                .write_log
                .iter()
                .copied()
                .filter(|b| *b != 0x11 && *b != 0x13)
                .collect();
            String::from_utf8_lossy(&bytes).into_owned()
        }

        fn clear_written(&mut self) {
            self.write_log.clear();
        }
    }

    impl ModemSerial for MockInterface {
        type Error = MockCommError;

        fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
            self.read_queue.pop_front().ok_or(nb::Error::WouldBlock)
        }

        fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
            if self.fail_writes {
                return Err(nb::Error::Other(MockCommError));
            }
            if self.block_writes {
                self.advance_time(5);
                return Err(nb::Error::WouldBlock);
            }
            self.write_log.push(byte);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            Ok(())
        }
    }

    impl ModemPins for MockInterface {
        fn set_power_key(&mut self, active: bool) {
            self.power_key_active = active;
        }

        fn set_reset(&mut self, active: bool) {
            self.reset_active = active;
        }

        fn link_ready(&mut self) -> bool {
            self.link
        }
    }

    impl ModemClock for MockInterface {
        fn now_ms(&mut self) -> u32 {
            self.now_ms
        }
    }

    // --- Recording Handler ---
    #[derive(Debug, Default)]
    struct RecordingHandler {
        messages: Vec<(String, usize, String, String)>,
        no_sim: bool,
        times: Vec<u32>,
        unhandled: Vec<Vec<u8>>,
        reply: Option<OutgoingSms>,
        reply_results: Vec<bool>,
    }

    impl ModemHandler for RecordingHandler {
        fn message_read(&mut self, text: &str, len: usize, sender: &TpAddress, smsc: &TpAddress) {
            self.messages.push((
                text.into(),
                len,
                sender.as_str().into(),
                smsc.as_str().into(),
            ));
        }

        fn no_sim_card_found(&mut self) {
            self.no_sim = true;
        }

        fn queued_sms_reply(&mut self) -> Option<OutgoingSms> {
            self.reply.clone()
        }

        fn queued_sms_reply_result(&mut self, accepted: bool) {
            self.reply_results.push(accepted);
            if accepted {
                self.reply = None;
            }
        }

        fn time_updated(&mut self, unix_time: u32) {
            self.times.push(unix_time);
        }

        fn unhandled_line(&mut self, line: &[u8]) {
            self.unhandled.push(line.to_vec());
        }
    }

    type TestModem = Sim7000<MockInterface, RecordingHandler>;

    fn modem(link: bool, config: ModemConfig) -> TestModem {
        Sim7000::new(MockInterface::new(link), RecordingHandler::default(), config)
    }

    fn feed(m: &mut TestModem, data: &[u8]) {
        m.interface.stage_read_data(data);
        m.poll().unwrap();
    }

    fn tick(m: &mut TestModem, ms: u32) {
        m.interface.advance_time(ms);
        m.poll().unwrap();
    }

    /// Powered, idle modem with the initial levels check answered.
    fn running_modem(config: ModemConfig) -> TestModem {
        let mut m = modem(true, config);
        m.begin().unwrap();
        feed(&mut m, b"OK\r\n");
        m.interface.clear_written();
        m
    }

    fn registered_modem(config: ModemConfig) -> TestModem {
        let mut m = running_modem(config);
        feed(&mut m, b"+CREG: 1\r\n");
        assert_eq!(m.registration(), RegistrationStatus::Registered);
        m.interface.clear_written();
        m
    }

    #[test]
    fn test_begin_with_link_up_checks_levels() {
        let mut m = modem(true, ModemConfig::default());
        m.begin().unwrap();
        assert_eq!(m.sleep_state(), SleepState::Running);
        assert_eq!(m.command_state(), CommandState::Busy);
        assert_eq!(m.interface.written(), "AT+CSQ;+CBC\r\n");

        feed(&mut m, b"+CSQ: 23,99\r\n+CBC: 0,95,4246\r\nOK\r\n");
        assert_eq!(m.bars(), 42);
        assert_eq!(m.battery_level(), 95);
        assert_eq!(m.command_state(), CommandState::Ready);
    }

    #[test]
    fn test_each_line_is_bracketed_by_flow_control() {
        let mut m = running_modem(ModemConfig::default());
        feed(&mut m, b"RDY\r\nDST: 1\r\n");
        assert_eq!(m.interface.write_log, [0x13, 0x11, 0x13, 0x11]);
    }

    #[test]
    fn test_boot_handshake_after_sms_ready() {
        let mut m = modem(false, ModemConfig::default());
        m.begin().unwrap();
        assert_eq!(m.sleep_state(), SleepState::WakingUp);
        assert!(m.interface.power_key_active);

        tick(&mut m, 999);
        assert!(m.interface.power_key_active);
        tick(&mut m, 1);
        assert!(!m.interface.power_key_active);

        m.interface.link = true;
        assert!(matches!(
            m.send_command("AT", CommandHash::NONE, 1000),
            Err(ModemError::WakingUp)
        ));

        feed(&mut m, b"RDY\r\n+CFUN: 1\r\n+CPIN: READY\r\nSMS Ready\r\n");
        assert_eq!(m.sleep_state(), SleepState::Running);
        assert_eq!(m.command_state(), CommandState::Busy);
        assert_eq!(m.interface.written(), "ATE0\r\n");

        m.interface.clear_written();
        feed(&mut m, b"OK\r\n");
        assert_eq!(m.interface.written(), "AT+IFC=1;+CLTS=1;+CREG=1\r\n");

        m.interface.clear_written();
        feed(&mut m, b"OK\r\n");
        assert_eq!(m.interface.written(), "AT+CSQ;+CBC\r\n");
    }

    #[test]
    fn test_silent_boot_autobauds_then_pins_baud_rate() {
        let mut m = modem(false, ModemConfig::default());
        m.begin().unwrap();
        tick(&mut m, 1000);
        m.interface.link = true;

        tick(&mut m, 6999);
        assert_eq!(m.sleep_state(), SleepState::WakingUp);
        assert!(m.interface.written().is_empty());

        tick(&mut m, 1);
        assert_eq!(m.sleep_state(), SleepState::Running);
        assert_eq!(m.interface.written(), "ATE0\r\n");

        tick(&mut m, 1000);
        assert_eq!(m.interface.written(), "ATE0\r\nATE0\r\n");
        assert_eq!(m.command_state(), CommandState::Busy);

        m.interface.clear_written();
        feed(&mut m, b"OK\r\n");
        assert_eq!(m.interface.written(), "AT+IPR=9600\r\n");

        m.interface.clear_written();
        feed(&mut m, b"OK\r\n");
        assert_eq!(m.interface.written(), "AT+IFC=1;+CLTS=1;+CREG=1\r\n");
    }

    #[test]
    fn test_echo_retries_are_bounded() {
        let config = ModemConfig {
            autobaud_echo_retries: 2,
            ..ModemConfig::default()
        };
        let mut m = modem(false, config);
        m.begin().unwrap();
        tick(&mut m, 1000);
        m.interface.link = true;
        tick(&mut m, 7000);
        tick(&mut m, 1000);
        tick(&mut m, 1000);
        assert_eq!(m.command_state(), CommandState::Busy);
        tick(&mut m, 1000);

        assert_eq!(m.command_state(), CommandState::Timeout);
        assert_eq!(m.interface.written().matches("ATE0").count(), 3);
        m.clear_error();
        assert_eq!(m.command_state(), CommandState::Ready);
    }

    #[test]
    fn test_boot_fails_without_link() {
        let mut m = modem(false, ModemConfig::default());
        m.begin().unwrap();
        tick(&mut m, 1000);
        tick(&mut m, 7000);

        assert_eq!(m.command_state(), CommandState::Error);
        assert_eq!(m.sleep_state(), SleepState::WakingUp);
        assert!(m.interface.written().is_empty());

        tick(&mut m, 60_000);
        assert!(m.interface.written().is_empty());
    }

    #[test]
    fn test_reset_pulse_arms_boot_window() {
        let mut m = running_modem(ModemConfig::default());
        m.reset();
        assert!(m.interface.reset_active);
        assert_eq!(m.sleep_state(), SleepState::WakingUp);
        tick(&mut m, 249);
        assert!(m.interface.reset_active);
        tick(&mut m, 1);
        assert!(!m.interface.reset_active);

        tick(&mut m, 7000);
        assert_eq!(m.sleep_state(), SleepState::Running);
        assert_eq!(m.interface.written(), "ATE0\r\n");
    }

    #[test]
    fn test_command_times_out_at_deadline() {
        let mut m = running_modem(ModemConfig::default());
        m.send_command("AT+CGMR", CommandHash::NONE, 100).unwrap();
        assert_eq!(m.interface.written(), "AT+CGMR\r\n");

        tick(&mut m, 99);
        assert_eq!(m.command_state(), CommandState::Busy);
        tick(&mut m, 1);
        assert_eq!(m.command_state(), CommandState::Timeout);

        assert!(matches!(
            m.send_command("AT", CommandHash::NONE, 100),
            Err(ModemError::NotReady(CommandState::Timeout))
        ));
        m.clear_error();
        assert!(m.send_command("AT", CommandHash::NONE, 100).is_ok());
    }

    #[test]
    fn test_zero_timeout_waits_forever() {
        let mut m = running_modem(ModemConfig::default());
        m.send_command("AT+COPS=?", CommandHash::NONE, 0).unwrap();
        tick(&mut m, 600_000);
        assert_eq!(m.command_state(), CommandState::Busy);
    }

    #[test]
    fn test_clear_error_abandons_busy_command() {
        let mut m = running_modem(ModemConfig::default());
        m.send_command("AT+COPS=?", CommandHash::NONE, 0).unwrap();
        assert_eq!(m.command_state(), CommandState::Busy);

        m.clear_error();
        assert_eq!(m.command_state(), CommandState::Ready);

        // The late reply finds nothing in flight.
        feed(&mut m, b"OK\r\n");
        assert_eq!(m.command_state(), CommandState::Ready);
        m.interface.clear_written();
        assert!(m.send_command("AT", CommandHash::NONE, 100).is_ok());
        assert_eq!(m.interface.written(), "AT\r\n");
        feed(&mut m, b"OK\r\n");
        assert_eq!(m.command_state(), CommandState::Ready);
    }

    #[test]
    fn test_send_command_refusals() {
        let mut m = running_modem(ModemConfig::default());
        m.send_command("AT", CommandHash::NONE, 1000).unwrap();
        assert!(matches!(
            m.send_command("AT", CommandHash::NONE, 1000),
            Err(ModemError::NotReady(CommandState::Busy))
        ));

        feed(&mut m, b"OK\r\n");
        m.interface.link = false;
        assert!(matches!(
            m.send_command("AT", CommandHash::NONE, 1000),
            Err(ModemError::NotClearToSend)
        ));
    }

    #[test]
    fn test_write_failures_leave_slot_ready() {
        let mut m = running_modem(ModemConfig::default());
        m.interface.block_writes = true;
        assert!(matches!(
            m.send_command("AT", CommandHash::NONE, 1000),
            Err(ModemError::Timeout)
        ));
        assert_eq!(m.command_state(), CommandState::Ready);

        m.interface.block_writes = false;
        m.interface.fail_writes = true;
        assert!(matches!(
            m.send_command("AT", CommandHash::NONE, 1000),
            Err(ModemError::Io(MockCommError))
        ));
        assert_eq!(m.command_state(), CommandState::Ready);
    }

    #[test]
    fn test_error_terminals() {
        let mut m = running_modem(ModemConfig::default());
        m.send_command("AT+CPIN?", CommandHash::NONE, 1000).unwrap();
        feed(&mut m, b"ERROR\r\n");
        assert_eq!(m.command_state(), CommandState::Error);

        m.clear_error();
        m.send_command("AT+CMEE=2;+CPIN?", CommandHash::NONE, 1000).unwrap();
        feed(&mut m, b"+CME ERROR: SIM not inserted\r\n");
        assert_eq!(m.command_state(), CommandState::Error);
        tick(&mut m, 5000);
        assert_eq!(m.command_state(), CommandState::Error);
    }

    #[test]
    fn test_stray_terminal_is_ignored() {
        let mut m = running_modem(ModemConfig::default());
        feed(&mut m, b"OK\r\nERROR\r\n");
        assert_eq!(m.command_state(), CommandState::Ready);
        assert!(m.interface.written().is_empty());
    }

    #[test]
    fn test_sms_send_handshake() {
        let mut m = registered_modem(ModemConfig::default());
        let to = TpAddress::new("5551234567").unwrap();
        m.send_sms(&to, "hello").unwrap();
        assert_eq!(m.interface.written(), "AT+CMGF=0;+CMGS=18\r\n");
        assert_eq!(m.sms_status(), SmsStatus::Sending);

        m.interface.clear_written();
        feed(&mut m, b"> ");
        assert_eq!(
            m.interface.written(),
            "0011000A8155153254760000A705E8329BFD06\u{1a}"
        );
        assert_eq!(m.sms_status(), SmsStatus::Waiting);

        feed(&mut m, b"\r\n+CMGS: 5\r\n\r\nOK\r\n");
        assert_eq!(m.sms_status(), SmsStatus::Sent);
        assert_eq!(m.command_state(), CommandState::Ready);
        assert!(m.handler().unhandled.is_empty());

        assert_eq!(m.acknowledge_sms_status(), SmsStatus::Sent);
        assert_eq!(m.sms_status(), SmsStatus::Idle);
    }

    #[test]
    fn test_send_sms_preconditions_transmit_nothing() {
        let to = TpAddress::new("5551234567").unwrap();

        let mut m = running_modem(ModemConfig::default());
        assert!(matches!(
            m.send_sms(&to, "hi"),
            Err(ModemError::NotRegistered(RegistrationStatus::NotRegistered))
        ));

        let mut m = registered_modem(ModemConfig::default());
        let long = "a".repeat(Sim7000::<MockInterface, RecordingHandler>::max_sms_chars() + 1);
        assert!(matches!(
            m.send_sms(&to, &long),
            Err(ModemError::MessageTooLong { len: 153, max: 152 })
        ));
        assert!(matches!(
            m.send_sms(&to, "h\u{e9}llo"),
            Err(ModemError::Pdu(PduError::UnsupportedCharacter('\u{e9}')))
        ));
        assert!(m.interface.written().is_empty());

        m.send_sms(&to, "hello").unwrap();
        m.interface.clear_written();
        assert!(matches!(
            m.send_sms(&to, "again"),
            Err(ModemError::SmsNotIdle(SmsStatus::Sending))
        ));
        assert!(m.interface.written().is_empty());
    }

    #[test]
    fn test_sms_failures() {
        let to = TpAddress::new("5551234567").unwrap();

        let mut m = registered_modem(ModemConfig::default());
        m.send_sms(&to, "hello").unwrap();
        feed(&mut m, b"> \r\n+CMS ERROR: 500\r\n");
        assert_eq!(m.sms_status(), SmsStatus::Failed);
        assert_eq!(m.command_state(), CommandState::Error);
        assert_eq!(m.acknowledge_sms_status(), SmsStatus::Failed);

        let mut m = registered_modem(ModemConfig::default());
        m.send_sms(&to, "hello").unwrap();
        tick(&mut m, 60_000);
        assert_eq!(m.command_state(), CommandState::Timeout);
        assert_eq!(m.sms_status(), SmsStatus::Failed);
    }

    const CMGR_REPLY: &[u8] = b"+CMGR: 1,,22\r\n\
        07919130364886F2040B915108173313F700001280718122346903E1F11A\r\n\
        OK\r\n";

    #[test]
    fn test_message_read_then_deleted() {
        let mut m = registered_modem(ModemConfig::default());
        feed(&mut m, b"+CMTI: \"SM\",3\r\n");
        assert_eq!(m.pending_messages(), 1);
        assert!(m.interface.written().is_empty());

        m.poll().unwrap();
        assert_eq!(m.interface.written(), "AT+CMGR=3\r\n");
        assert_eq!(m.pending_messages(), 0);

        m.interface.clear_written();
        feed(&mut m, CMGR_REPLY);
        assert_eq!(
            m.handler().messages,
            [(
                String::from("ack"),
                3,
                String::from("15807133317"),
                String::from("19036384682")
            )]
        );

        m.poll().unwrap();
        assert_eq!(m.interface.written(), "AT+CMGD=3\r\n");

        m.interface.clear_written();
        feed(&mut m, b"OK\r\n");
        m.poll().unwrap();
        assert!(m.interface.written().is_empty());
    }

    #[test]
    fn test_message_kept_when_delete_disabled() {
        let mut m = registered_modem(ModemConfig::default().with_delete_after_read(false));
        feed(&mut m, b"+CMTI: \"SM\",7\r\n");
        m.poll().unwrap();
        m.interface.clear_written();
        feed(&mut m, CMGR_REPLY);
        m.poll().unwrap();
        assert!(m.interface.written().is_empty());
        assert_eq!(m.handler().messages.len(), 1);
    }

    #[test]
    fn test_read_timeout_releases_slot() {
        let mut m = registered_modem(ModemConfig::default());
        feed(&mut m, b"+CMTI: \"SM\",3\r\n+CMTI: \"SM\",4\r\n");
        m.poll().unwrap();
        assert_eq!(m.interface.written(), "AT+CMGR=3\r\n");

        tick(&mut m, 5000);
        assert_eq!(m.command_state(), CommandState::Timeout);
        m.interface.clear_written();
        m.poll().unwrap();
        assert!(m.interface.written().is_empty());

        m.clear_error();
        m.poll().unwrap();
        assert_eq!(m.interface.written(), "AT+CMGR=4\r\n");
    }

    #[test]
    fn test_text_mode_read_is_not_decoded() {
        let mut m = registered_modem(ModemConfig::default());
        feed(
            &mut m,
            b"+CMGR: \"REC READ\",\"+15118333317\",,\"21/08/17,18:22:43-16\"\r\nack\r\n",
        );
        assert!(m.handler().messages.is_empty());
        assert_eq!(m.handler().unhandled, [b"ack".to_vec()]);
    }

    #[test]
    fn test_unsolicited_reports() {
        let mut m = running_modem(ModemConfig::default());
        feed(&mut m, b"+CPIN: NOT INSERTED\r\n");
        assert!(m.handler().no_sim);

        feed(&mut m, b"+CCLK: \"21/08/17,18:22:43-16\"\r\n");
        assert_eq!(m.time(), Some(1_629_224_563));
        feed(&mut m, b"*PSUTTZ: 21/08/03,19:33:27\",\"-16\",1\r\n");
        assert_eq!(m.time(), Some(1_628_004_807));
        assert_eq!(m.handler().times, [1_629_224_563, 1_628_004_807]);

        feed(&mut m, b"+CREG: 0,5\r\n");
        assert_eq!(m.registration(), RegistrationStatus::Roaming);
        feed(&mut m, b"+CSQ: 99\r\n");
        assert_eq!(m.bars(), crate::common::response::BARS_UNKNOWN);

        feed(&mut m, b"NORMAL POWER DOWN\r\n");
        assert_eq!(m.sleep_state(), SleepState::Sleeping);
    }

    #[test]
    fn test_overflow_dispatches_partial_line() {
        let mut m = running_modem(ModemConfig::default());
        feed(&mut m, &[b'x'; 600]);
        assert_eq!(m.handler().unhandled.len(), 1);
        assert_eq!(m.handler().unhandled[0].len(), LineBuffer::CAPACITY);

        feed(&mut m, b"\r\n");
        assert_eq!(m.handler().unhandled.len(), 2);
        assert_eq!(m.handler().unhandled[1].len(), 600 - LineBuffer::CAPACITY - 1);
    }

    #[test]
    fn test_queued_reply_offered_on_completion() {
        let mut m = registered_modem(ModemConfig::default());
        let mut text = SmsText::new();
        text.push_str("ok").unwrap();
        m.handler_mut().reply = Some(OutgoingSms::new(TpAddress::new("5551234567").unwrap(), text));

        m.send_command("AT", CommandHash::NONE, 1000).unwrap();
        m.interface.clear_written();
        feed(&mut m, b"OK\r\n");

        assert!(m.interface.written().starts_with("AT+CMGF=0;+CMGS="));
        assert_eq!(m.sms_status(), SmsStatus::Sending);
        assert_eq!(m.handler().reply_results, [true]);
        assert!(m.handler().reply.is_none());
    }

    #[test]
    fn test_sleep_pulses_power_key() {
        let mut m = running_modem(ModemConfig::default().with_check_levels_period_ms(10_000));
        feed(&mut m, b"+CSQ: 20,0\r\n");
        assert!(m.sleep());
        assert_eq!(m.sleep_state(), SleepState::GoingToSleep);
        assert!(m.interface.power_key_active);
        assert_eq!(m.bars(), 0);

        tick(&mut m, 1200);
        assert!(!m.interface.power_key_active);
        feed(&mut m, b"NORMAL POWER DOWN\r\n");
        assert_eq!(m.sleep_state(), SleepState::Sleeping);

        tick(&mut m, 20_000);
        assert!(m.interface.written().is_empty());

        m.interface.link = false;
        assert!(!m.sleep());
    }

    #[test]
    fn test_periodic_levels_check() {
        let mut m = running_modem(ModemConfig::default().with_check_levels_period_ms(10_000));
        tick(&mut m, 9_999);
        assert!(m.interface.written().is_empty());
        tick(&mut m, 1);
        assert_eq!(m.interface.written(), "AT+CSQ;+CBC\r\n");
    }
}
