// src/remote/parser.rs

use crate::common::text::{find_token, get_token, Scanner};

/// Longest command word recognised.
const MAX_TOKEN_LEN: usize = 8;

/// Command words, matched case-insensitively.
pub const COMMAND_WORDS: &[&str] = &["setup", "on", "off", "?"];

/// 32 °F in 1/16 fixed point.
const FREEZING_F: i32 = 32 << 4;

/// Alarm thresholds are integers; anything beyond this many degrees would
/// overflow the 1/16 fixed-point representation.
const MAX_WHOLE_DEGREES: i16 = i16::MAX >> 4;

/// Celsius to Fahrenheit, both in 1/16 fixed point. Saturates above
/// about 2047 °F.
pub fn c_to_f(celsius: i16) -> i16 {
    let fahrenheit = (i32::from(celsius) * 9) / 5 + FREEZING_F;
    fahrenheit.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}

/// Fahrenheit to Celsius, both in 1/16 fixed point.
pub fn f_to_c(fahrenheit: i16) -> i16 {
    (((i32::from(fahrenheit) - FREEZING_F) * 5) / 9) as i16
}

/// A command received by SMS.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RemoteCommand {
    /// `setup <PIN> [H<t>[C|F]] [L<t>[C|F]]`: claim the device and
    /// optionally set the alarm thresholds (1/16 °C).
    Setup {
        pin: u16,
        high: Option<i16>,
        low: Option<i16>,
    },
    /// `on`: report alarm events.
    On,
    /// `off`: stop reporting alarm events.
    Off,
    /// `?`: request a status report.
    Query,
}

impl RemoteCommand {
    /// Parses an SMS body.
    ///
    /// `celsius_default` decides the unit of a threshold written without a
    /// `C`/`F` suffix. Returns `None` for an unknown first word or a
    /// `setup` without a PIN.
    pub fn parse(text: &str, celsius_default: bool) -> Option<Self> {
        let bytes = text.as_bytes();
        let mut s = Scanner::new(bytes);
        s.skip_whitespace_on_line();
        let (word, len) = get_token::<MAX_TOKEN_LEN>(s.rest());
        s.advance(len);
        match find_token(&word, COMMAND_WORDS)? {
            0 => parse_setup(s, celsius_default),
            1 => Some(RemoteCommand::On),
            2 => Some(RemoteCommand::Off),
            _ => Some(RemoteCommand::Query),
        }
    }
}

fn parse_setup(mut s: Scanner<'_>, celsius_default: bool) -> Option<RemoteCommand> {
    s.skip_whitespace_on_line();
    let start = s.pos();
    let (pin, _) = s.parse_u16();
    if s.pos() == start {
        return None;
    }

    let mut high = None;
    let mut low = None;
    while s.skip_whitespace_on_line().is_some() {
        let (token, len) = get_token::<MAX_TOKEN_LEN>(s.rest());
        s.advance(len.max(1));
        let bytes = token.as_bytes();
        let slot = match bytes.first() {
            Some(b'h') => &mut high,
            Some(b'l') => &mut low,
            _ => continue,
        };
        if let Some(value) = parse_threshold(&bytes[1..], celsius_default) {
            *slot = Some(value);
        }
    }
    Some(RemoteCommand::Setup { pin, high, low })
}

/// `90f`, `-5c` or `30` to 1/16 °C.
fn parse_threshold(text: &[u8], celsius_default: bool) -> Option<i16> {
    let mut t = Scanner::new(text);
    let (degrees, unit) = t.parse_i16();
    if !text.iter().any(u8::is_ascii_digit) {
        return None;
    }
    let fixed = degrees.clamp(-MAX_WHOLE_DEGREES, MAX_WHOLE_DEGREES) << 4;
    let fahrenheit = unit == Some(b'f') || (unit != Some(b'c') && !celsius_default);
    Some(if fahrenheit { f_to_c(fixed) } else { fixed })
}
