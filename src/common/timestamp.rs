// src/common/timestamp.rs

//! Modem clock strings to Unix seconds.
//!
//! Both `+CCLK: "21/08/17,18:22:43-16"` and
//! `*PSUTTZ: 21/08/03,19:33:27","-16",1` carry `yy/MM/dd,hh:mm:ss` followed
//! by a zone offset in quarter hours. `+CCLK` reports local time already;
//! the network broadcast reports UTC, which is shifted by the zone so every
//! result is local time.

use super::text::Scanner;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_QUARTER_HOUR: i64 = 900;

/// Days since 1970-01-01 for a proleptic Gregorian date.
fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

fn field(s: &mut Scanner<'_>, sep: Option<u8>, max: u16) -> Option<i64> {
    let start = s.pos();
    let (value, terminator) = s.parse_u16();
    if s.pos() == start || value > max || terminator != sep {
        return None;
    }
    if sep.is_some() {
        s.advance(1);
    }
    Some(i64::from(value))
}

/// Parses `yy/MM/dd,hh:mm:ss[±zz]`.
///
/// `is_utc` selects whether the zone offset is applied. Returns `None` for
/// malformed or out-of-range fields.
pub fn parse_modem_time(text: &[u8], is_utc: bool) -> Option<u32> {
    let mut s = Scanner::new(text);
    let year = field(&mut s, Some(b'/'), 99)?;
    let month = field(&mut s, Some(b'/'), 12)?;
    let day = field(&mut s, Some(b','), 31)?;
    let hour = field(&mut s, Some(b':'), 23)?;
    let minute = field(&mut s, Some(b':'), 59)?;
    let start = s.pos();
    let (second, _) = s.parse_u16();
    if s.pos() == start || second > 59 || month == 0 || day == 0 {
        return None;
    }

    let mut seconds = days_from_civil(2000 + year, month, day) * SECONDS_PER_DAY
        + hour * 3600
        + minute * 60
        + i64::from(second);

    if is_utc {
        // The zone follows either directly or after `","`.
        while matches!(s.peek(), Some(b'"') | Some(b',')) {
            s.advance(1);
        }
        if matches!(s.peek(), Some(b'+') | Some(b'-')) {
            let negative = s.peek() == Some(b'-');
            s.advance(1);
            let (quarters, _) = s.parse_u16();
            let offset = i64::from(quarters) * SECONDS_PER_QUARTER_HOUR;
            seconds += if negative { -offset } else { offset };
        }
    }
    u32::try_from(seconds).ok()
}
