// src/pdu/semi_octet.rs

//! Nibble-swapped BCD ("semi-octet") phone numbers.
//!
//! `15189723132` is carried as `5181793231F2`: each pair of digits is
//! swapped and an odd count is padded with `F`.

use super::PduError;
use crate::common::address::{TpAddress, MAX_ADDRESS_DIGITS};

/// Hex characters needed for `digit_count` digits (rounded up to even).
#[inline]
pub const fn semi_octet_len(digit_count: usize) -> usize {
    (digit_count + 1) & !1
}

/// Appends the semi-octet form of `digits`. Returns hex characters written.
pub fn encode_semi_octets<const N: usize>(
    digits: &[u8],
    out: &mut heapless::String<N>,
) -> Result<usize, PduError> {
    let needed = out.len() + semi_octet_len(digits.len());
    if needed > N {
        return Err(PduError::BufferTooSmall { needed, got: N });
    }
    for pair in digits.chunks(2) {
        let (first, second) = match *pair {
            [a, b] => (a, b),
            [a] => (a, b'F'),
            _ => continue,
        };
        for d in [second, first] {
            if d != b'F' && !d.is_ascii_digit() {
                return Err(PduError::InvalidDigit(char::from(d)));
            }
            // Capacity was checked above.
            let _ = out.push(char::from(d));
        }
    }
    Ok(semi_octet_len(digits.len()))
}

/// Decodes semi-octet hex back to digits. A trailing `F` pad is dropped.
pub fn decode_semi_octets(hex: &[u8], international: bool) -> Result<TpAddress, PduError> {
    if hex.len() % 2 != 0 {
        return Err(PduError::Truncated {
            needed: hex.len() + 1,
            got: hex.len(),
        });
    }
    let mut digits = [0u8; MAX_ADDRESS_DIGITS + 1];
    let mut count = 0;
    for pair in hex.chunks_exact(2) {
        for d in [pair[1], pair[0]] {
            if count > MAX_ADDRESS_DIGITS {
                return Err(PduError::AddressTooLong(count));
            }
            digits[count] = d;
            count += 1;
        }
    }
    if count > 0 && matches!(digits[count - 1], b'F' | b'f') {
        count -= 1;
    }
    TpAddress::from_digits(&digits[..count], international)
}
