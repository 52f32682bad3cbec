// src/common/response/error.rs

use core::fmt;

/// Error type specific to data-line parsing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResponseParseError {
    /// Input line was empty.
    EmptyInput,
    /// A `+` line without the `:` that ends its mnemonic.
    MissingColon,
    /// Expected a number (or a specific delimiter after it).
    NumericError,
    /// A field parsed but its value is outside the documented range.
    OutOfRange,
}

impl fmt::Display for ResponseParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ResponseParseError::EmptyInput => "empty line",
            ResponseParseError::MissingColon => "data line without ':'",
            ResponseParseError::NumericError => "malformed number",
            ResponseParseError::OutOfRange => "value out of range",
        };
        f.write_str(text)
    }
}

impl core::error::Error for ResponseParseError {}
