// src/pdu/septet.rs

//! GSM 7-bit default alphabet packing.
//!
//! Septets are packed LSB first: bit 0 of the first septet is bit 0 of the
//! first octet, and its eighth bit comes from the low bit of the next septet.
//! A user data length (UDL) octet giving the septet count precedes the data.

use super::{hex_at, push_hex, PduError, MAX_SEPTETS};

/// Octets needed to carry `septets` 7-bit characters.
#[inline]
pub const fn packed_len(septets: usize) -> usize {
    (septets * 7).div_ceil(8)
}

/// Maps a character to its GSM default alphabet code.
///
/// Codes that coincide with ASCII pass through; `@`, `$` and `_` are
/// relocated. Characters that would need the escape table (`[ \ ] ^ { | } ~`),
/// the backtick, and everything outside ASCII are rejected.
pub fn char_to_septet(c: char) -> Result<u8, PduError> {
    match c {
        '@' => Ok(0x00),
        '$' => Ok(0x02),
        '_' => Ok(0x11),
        '\n' | '\r' | ' '..='#' | '%'..='?' | 'A'..='Z' | 'a'..='z' => Ok(c as u8),
        _ => Err(PduError::UnsupportedCharacter(c)),
    }
}

/// Inverse of [`char_to_septet`]; unmapped codes decode as `?`.
pub fn septet_to_char(septet: u8) -> char {
    match septet & 0x7F {
        0x00 => '@',
        0x02 => '$',
        0x11 => '_',
        s @ (0x0A | 0x0D | 0x20..=0x23 | 0x25..=0x3F | 0x41..=0x5A | 0x61..=0x7A) => char::from(s),
        _ => '?',
    }
}

/// Appends UDL and the packed user data of `text` as hex.
/// Returns the number of hex characters written.
pub fn pack_septets<const N: usize>(
    text: &str,
    out: &mut heapless::String<N>,
) -> Result<usize, PduError> {
    let septets = text.chars().count();
    if septets > MAX_SEPTETS {
        return Err(PduError::UserDataTooLong(septets));
    }
    let written = 2 + packed_len(septets) * 2;
    let needed = out.len() + written;
    if needed > N {
        return Err(PduError::BufferTooSmall { needed, got: N });
    }

    push_hex(out, septets as u8)?;
    let mut acc: u32 = 0;
    let mut bits = 0;
    for c in text.chars() {
        acc |= u32::from(char_to_septet(c)?) << bits;
        bits += 7;
        while bits >= 8 {
            push_hex(out, acc as u8)?;
            acc >>= 8;
            bits -= 8;
        }
    }
    if bits > 0 {
        push_hex(out, acc as u8)?;
    }
    Ok(written)
}

/// Reads a UDL octet and that many packed septets from `hex`, appending the
/// decoded text to `out`. Returns the septet count and hex characters consumed.
pub fn unpack_septets<const N: usize>(
    hex: &[u8],
    out: &mut heapless::String<N>,
) -> Result<(usize, usize), PduError> {
    let septets = usize::from(hex_at(hex, 0)?);
    if septets > MAX_SEPTETS {
        return Err(PduError::UserDataTooLong(septets));
    }
    let octet_count = packed_len(septets);
    let consumed = 2 + octet_count * 2;
    if hex.len() < consumed {
        return Err(PduError::Truncated {
            needed: consumed,
            got: hex.len(),
        });
    }
    if out.len() + septets > N {
        return Err(PduError::BufferTooSmall {
            needed: out.len() + septets,
            got: N,
        });
    }

    let mut octets = [0u8; packed_len(MAX_SEPTETS)];
    for (i, octet) in octets[..octet_count].iter_mut().enumerate() {
        *octet = hex_at(hex, 2 + i * 2)?;
    }
    for i in 0..septets {
        let bit = i * 7;
        let lo = u16::from(octets[bit / 8]);
        let hi = u16::from(octets.get(bit / 8 + 1).copied().unwrap_or(0));
        let septet = (((hi << 8) | lo) >> (bit % 8)) as u8 & 0x7F;
        // Capacity was checked above.
        let _ = out.push(septet_to_char(septet));
    }
    Ok((septets, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[test]
    fn test_pack_hello() {
        let mut out: String<32> = String::new();
        assert_eq!(pack_septets("hello", &mut out), Ok(12));
        assert_eq!(out.as_str(), "05E8329BFD06");
        // 'h' sits in the low seven bits of the first octet.
        assert_eq!(0xE8 & 0x7F, b'h');
    }

    #[test]
    fn test_pack_eight_septets_fill_seven_octets() {
        let mut out: String<32> = String::new();
        pack_septets("hellohel", &mut out).unwrap();
        assert_eq!(out.len(), 2 + 7 * 2);
    }

    #[test]
    fn test_unpack_ack() {
        let mut out: String<16> = String::new();
        assert_eq!(unpack_septets(b"03E1F11A", &mut out), Ok((3, 8)));
        assert_eq!(out.as_str(), "ack");
    }

    #[test]
    fn test_unpack_hellohello() {
        let mut out: String<16> = String::new();
        assert_eq!(unpack_septets(b"0AE8329BFD4697D9EC37", &mut out), Ok((10, 20)));
        assert_eq!(out.as_str(), "hellohello");
    }

    #[test]
    fn test_round_trip_up_to_budget() {
        let text = "Alarm is ON, High 30.0C, Low 0.0C\nSensors: (* = alarm)\n 0: 21.5C *\nSignal: 3.8 (5 = best)\nBattery: 84% @home $5 a_b!";
        for len in [1, 7, 8, 9, 15, 16, 100, text.len()] {
            let slice = &text[..len];
            let mut hex: String<320> = String::new();
            pack_septets(slice, &mut hex).unwrap();
            let mut back: String<160> = String::new();
            let (septets, consumed) = unpack_septets(hex.as_bytes(), &mut back).unwrap();
            assert_eq!(septets, len);
            assert_eq!(consumed, hex.len());
            assert_eq!(back.as_str(), slice);
        }
    }

    #[test]
    fn test_alphabet_subset() {
        assert_eq!(char_to_septet('@'), Ok(0x00));
        assert_eq!(char_to_septet('_'), Ok(0x11));
        assert_eq!(char_to_septet('['), Err(PduError::UnsupportedCharacter('[')));
        assert_eq!(char_to_septet('~'), Err(PduError::UnsupportedCharacter('~')));
        assert_eq!(char_to_septet('é'), Err(PduError::UnsupportedCharacter('é')));
        assert_eq!(septet_to_char(0x1B), '?');
        assert_eq!(septet_to_char(0x40), '?');
    }

    #[test]
    fn test_unpack_errors() {
        let mut out: String<16> = String::new();
        assert!(matches!(
            unpack_septets(b"05E832", &mut out),
            Err(PduError::Truncated { needed: 12, got: 6 })
        ));
        assert_eq!(unpack_septets(b"A1", &mut out), Err(PduError::UserDataTooLong(0xA1)));
        let mut tiny: String<2> = String::new();
        assert!(matches!(
            unpack_septets(b"03E1F11A", &mut tiny),
            Err(PduError::BufferTooSmall { .. })
        ));
    }
}
