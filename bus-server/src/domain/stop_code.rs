//! Bus stop code type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an invalid bus stop code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid bus stop code: {reason}")]
pub struct InvalidBusStopCode {
    reason: &'static str,
}

/// A valid 5-digit bus stop code.
///
/// Bus stop codes are always 5 ASCII digits, and leading zeros are
/// significant. This type guarantees that any `BusStopCode` value is valid
/// by construction.
///
/// # Examples
///
/// ```
/// use bus_server::domain::BusStopCode;
///
/// let code = BusStopCode::parse("01012").unwrap();
/// assert_eq!(code.as_str(), "01012");
///
/// // Wrong length is rejected
/// assert!(BusStopCode::parse("1012").is_err());
///
/// // Letters are rejected
/// assert!(BusStopCode::parse("0101A").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusStopCode([u8; 5]);

impl BusStopCode {
    /// Parse a bus stop code from a string.
    ///
    /// The input must be exactly 5 ASCII digits.
    pub fn parse(s: &str) -> Result<Self, InvalidBusStopCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 5 {
            return Err(InvalidBusStopCode {
                reason: "must be exactly 5 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_digit) {
            return Err(InvalidBusStopCode {
                reason: "must be ASCII digits 0-9",
            });
        }

        let mut code = [0u8; 5];
        code.copy_from_slice(bytes);
        Ok(BusStopCode(code))
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

impl TryFrom<String> for BusStopCode {
    type Error = InvalidBusStopCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BusStopCode> for String {
    fn from(code: BusStopCode) -> Self {
        code.as_str().to_string()
    }
}

impl fmt::Debug for BusStopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BusStopCode({})", self.as_str())
    }
}

impl fmt::Display for BusStopCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
