// src/common/text.rs

//! Byte-level scanning and formatting helpers shared by the response
//! parser, the PDU codec and the remote command parser.

use arrayvec::ArrayString;
use core::fmt;

const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";

/// Whitespace that does not end a line.
#[inline]
const fn is_line_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | 0x0B | 0x0C)
}

/// A forward-only cursor over a byte slice.
///
/// Every method that consumes input advances `pos`; the number of bytes
/// consumed is always recoverable via [`Scanner::pos`].
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub const fn new(buf: &'a [u8]) -> Self {
        Scanner { buf, pos: 0 }
    }

    #[inline]
    pub const fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos >= self.buf.len()
    }

    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.buf.get(self.pos).copied()
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.buf.len());
    }

    /// Skips spaces and tabs (but not `\n`), returning the first other byte.
    pub fn skip_whitespace_on_line(&mut self) -> Option<u8> {
        while let Some(c) = self.peek() {
            if c != b'\n' && is_line_space(c) {
                self.pos += 1;
            } else {
                return Some(c);
            }
        }
        None
    }

    /// Advances to `ch`, and past it when `skip_char_too` is set.
    /// Returns `false` if the end of input was reached first.
    pub fn skip_till(&mut self, ch: u8, skip_char_too: bool) -> bool {
        while let Some(c) = self.peek() {
            if c == ch {
                if skip_char_too {
                    self.pos += 1;
                }
                return true;
            }
            self.pos += 1;
        }
        false
    }

    /// Parses leading decimal digits. Returns the value and the first
    /// non-digit byte, which is left unconsumed.
    ///
    /// No digits yields `0`; values beyond `u16::MAX` saturate.
    pub fn parse_u16(&mut self) -> (u16, Option<u8>) {
        let mut value: u32 = 0;
        while let Some(c @ b'0'..=b'9') = self.peek() {
            value = (value * 10 + u32::from(c - b'0')).min(u32::from(u16::MAX));
            self.pos += 1;
        }
        (value as u16, self.peek())
    }

    /// Signed variant of [`parse_u16`](Scanner::parse_u16) accepting a leading `-`.
    pub fn parse_i16(&mut self) -> (i16, Option<u8>) {
        let negative = self.peek() == Some(b'-');
        if negative {
            self.pos += 1;
        }
        let mut value: i32 = 0;
        while let Some(c @ b'0'..=b'9') = self.peek() {
            value = (value * 10 + i32::from(c - b'0')).min(i32::from(i16::MAX));
            self.pos += 1;
        }
        let value = if negative { -value } else { value };
        (value as i16, self.peek())
    }

}

/// Two upper-case hex digits for `n`, leading zero included.
#[inline]
pub const fn u8_to_hex(n: u8) -> [u8; 2] {
    [HEX_CHARS[(n >> 4) as usize], HEX_CHARS[(n & 0xF) as usize]]
}

#[inline]
const fn hex_nibble(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'A'..=b'F' => Some(c - b'A' + 10),
        b'a'..=b'f' => Some(c - b'a' + 10),
        _ => None,
    }
}

/// Decodes the first two bytes of `pair` as a hex octet.
pub fn hex_to_u8(pair: &[u8]) -> Option<u8> {
    match pair {
        [hi, lo, ..] => Some((hex_nibble(*hi)? << 4) | hex_nibble(*lo)?),
        _ => None,
    }
}

/// Displays a 1/16 fixed-point value with one decimal place.
///
/// The tenths digit is rounded from the magnitude, so `-0x18` prints
/// as `-1.5`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fixed16(pub i16);

impl fmt::Display for Fixed16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = i32::from(self.0).unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        let tenths = ((magnitude & 0xF) * 625 + 500) / 1000;
        write!(f, "{}.{}", magnitude >> 4, tenths)
    }
}

/// Reads a whitespace-terminated token of at most `N` bytes, lower-cased.
///
/// Returns the token and the number of input bytes it covers.
pub fn get_token<const N: usize>(input: &[u8]) -> (ArrayString<N>, usize) {
    let mut token = ArrayString::new();
    let mut len = 0;
    for &c in input {
        if c == 0 || c.is_ascii_whitespace() || len >= N {
            break;
        }
        // Non-ASCII bytes end the token; SMS text here is 7-bit.
        if !c.is_ascii() || token.try_push(char::from(c.to_ascii_lowercase())).is_err() {
            break;
        }
        len += 1;
    }
    (token, len)
}

/// Linear search of `table` for `token`.
pub fn find_token(token: &str, table: &[&str]) -> Option<usize> {
    table.iter().position(|entry| *entry == token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skip_whitespace_stops_at_newline() {
        let mut s = Scanner::new(b" \t \nX");
        assert_eq!(s.skip_whitespace_on_line(), Some(b'\n'));
        assert_eq!(s.pos(), 3);

        let mut s = Scanner::new(b"   ");
        assert_eq!(s.skip_whitespace_on_line(), None);
    }

    #[test]
    fn test_skip_till() {
        let mut s = Scanner::new(b"\"SM\",3");
        assert!(s.skip_till(b',', true));
        assert_eq!(s.rest(), b"3");

        let mut s = Scanner::new(b"abc");
        assert!(!s.skip_till(b',', true));
        assert!(s.is_empty());
    }

    #[test]
    fn test_parse_numbers() {
        let mut s = Scanner::new(b"23,99");
        assert_eq!(s.parse_u16(), (23, Some(b',')));
        s.advance(1);
        assert_eq!(s.parse_u16(), (99, None));

        let mut s = Scanner::new(b"-40f");
        assert_eq!(s.parse_i16(), (-40, Some(b'f')));

        let mut s = Scanner::new(b"999999");
        assert_eq!(s.parse_u16().0, u16::MAX);
    }

    #[test]
    fn test_hex() {
        assert_eq!(u8_to_hex(0x01), *b"01");
        assert_eq!(u8_to_hex(0xA7), *b"A7");
        assert_eq!(hex_to_u8(b"E8"), Some(0xE8));
        assert_eq!(hex_to_u8(b"e8"), Some(0xE8));
        assert_eq!(hex_to_u8(b"G0"), None);
        assert_eq!(hex_to_u8(b"7"), None);
    }

    #[test]
    fn test_fixed16_display() {
        assert_eq!(format!("{}", Fixed16(0x5A8)), "90.5");
        assert_eq!(format!("{}", Fixed16(0)), "0.0");
        assert_eq!(format!("{}", Fixed16(-0x18)), "-1.5");
        // 1/16 rounds up to .1
        assert_eq!(format!("{}", Fixed16(1)), "0.1");
    }

    #[test]
    fn test_tokens() {
        let (token, len) = get_token::<8>(b"SeTuP 1234");
        assert_eq!(token.as_str(), "setup");
        assert_eq!(len, 5);

        let (token, len) = get_token::<8>(b"abcdefghijk");
        assert_eq!(token.as_str(), "abcdefgh");
        assert_eq!(len, 8);

        let table = ["setup", "on", "off", "?"];
        assert_eq!(find_token("off", &table), Some(2));
        assert_eq!(find_token("nope", &table), None);
    }
}
