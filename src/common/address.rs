// src/common/address.rs

use crate::pdu::PduError;
use core::convert::TryFrom;
use core::fmt;

/// Bytes reserved for an address: 15 digits plus one terminating slot.
pub const TP_ADDRESS_SIZE: usize = 16;
pub const MAX_ADDRESS_DIGITS: usize = TP_ADDRESS_SIZE - 1;

/// Fill byte for the unused tail.
const UNUSED: u8 = 0xFF;

/// Type-of-address octet for a national number (unknown numbering plan, ISDN).
pub const TYPE_DOMESTIC: u8 = 0x81;
/// Type-of-address octet for an international number.
pub const TYPE_INTERNATIONAL: u8 = 0x91;

/// A decimal phone number as carried in SMS PDUs.
///
/// Digits are stored as ASCII; every byte after the last digit is `0xFF`.
/// The `+` of an international number is not stored, it is kept as a flag.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TpAddress {
    bytes: [u8; TP_ADDRESS_SIZE],
    international: bool,
}

impl TpAddress {
    pub const EMPTY: TpAddress = TpAddress {
        bytes: [UNUSED; TP_ADDRESS_SIZE],
        international: false,
    };

    /// Parses `number`, which may start with `+`.
    pub fn new(number: &str) -> Result<Self, PduError> {
        let (digits, international) = match number.strip_prefix('+') {
            Some(rest) => (rest, true),
            None => (number, false),
        };
        if digits.is_empty() {
            return Err(PduError::EmptyAddress);
        }
        Self::from_digits(digits.as_bytes(), international)
    }

    /// Builds an address from ASCII digits. An empty slice gives an empty address.
    pub fn from_digits(digits: &[u8], international: bool) -> Result<Self, PduError> {
        if digits.len() > MAX_ADDRESS_DIGITS {
            return Err(PduError::AddressTooLong(digits.len()));
        }
        let mut address = TpAddress {
            international,
            ..Self::EMPTY
        };
        for (slot, &d) in address.bytes.iter_mut().zip(digits) {
            if !d.is_ascii_digit() {
                return Err(PduError::InvalidDigit(char::from(d)));
            }
            *slot = d;
        }
        Ok(address)
    }

    pub fn len(&self) -> usize {
        self.bytes
            .iter()
            .position(|&b| b == UNUSED)
            .unwrap_or(TP_ADDRESS_SIZE)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes[0] == UNUSED
    }

    /// The ASCII digits, without `+`.
    pub fn digits(&self) -> &[u8] {
        &self.bytes[..self.len()]
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored.
        core::str::from_utf8(self.digits()).unwrap_or("")
    }

    /// The raw fixed-size storage, sentinel tail included.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; TP_ADDRESS_SIZE] {
        &self.bytes
    }

    #[inline]
    pub const fn is_international(&self) -> bool {
        self.international
    }

    #[inline]
    pub const fn type_of_address(&self) -> u8 {
        if self.international {
            TYPE_INTERNATIONAL
        } else {
            TYPE_DOMESTIC
        }
    }

    /// Compares digits, ignoring a leading `1` trunk prefix on either side.
    ///
    /// Networks report the same North American number with and without the
    /// prefix depending on the route the message took.
    pub fn same_as(&self, other: &TpAddress) -> bool {
        fn strip(d: &[u8]) -> &[u8] {
            d.strip_prefix(b"1").unwrap_or(d)
        }
        strip(self.digits()) == strip(other.digits())
    }
}

impl Default for TpAddress {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl TryFrom<&str> for TpAddress {
    type Error = PduError;

    fn try_from(number: &str) -> Result<Self, Self::Error> {
        TpAddress::new(number)
    }
}

impl fmt::Display for TpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.international {
            f.write_str("+")?;
        }
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TpAddress(\"{}\")", self)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for TpAddress {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{}{}", if self.international { "+" } else { "" }, self.as_str())
    }
}
