//! Bus service number and direction types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum length of a service number.
const MAX_SERVICE_NO_LEN: usize = 8;

/// Error returned when parsing an invalid service number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid service number: {reason}")]
pub struct InvalidServiceNo {
    reason: &'static str,
}

/// A bus service number, such as `10`, `10e` or `NR1`.
///
/// Between 1 and 8 ASCII alphanumeric characters. Case is preserved since
/// the data uses lowercase suffixes (`"10e"`) distinct from uppercase ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ServiceNo(String);

impl ServiceNo {
    /// Parse a service number from a string.
    pub fn parse(s: &str) -> Result<Self, InvalidServiceNo> {
        if s.is_empty() {
            return Err(InvalidServiceNo {
                reason: "must not be empty",
            });
        }

        if s.len() > MAX_SERVICE_NO_LEN {
            return Err(InvalidServiceNo {
                reason: "must be at most 8 characters",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidServiceNo {
                reason: "must be ASCII letters or digits",
            });
        }

        Ok(ServiceNo(s.to_string()))
    }

    /// Returns the service number as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ServiceNo {
    type Error = InvalidServiceNo;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ServiceNo> for String {
    fn from(service_no: ServiceNo) -> Self {
        service_no.0
    }
}

impl fmt::Display for ServiceNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned when parsing an invalid direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid direction {0}: must be 1 or 2")]
pub struct InvalidDirection(pub String);

/// Direction of travel of a bus service.
///
/// Every service runs in direction 1; services that are not loops also run
/// in direction 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Direction {
    One,
    Two,
}

impl Direction {
    /// Parse a direction from a path segment such as `"1"`.
    pub fn parse(s: &str) -> Result<Self, InvalidDirection> {
        match s.trim() {
            "1" => Ok(Direction::One),
            "2" => Ok(Direction::Two),
            _ => Err(InvalidDirection(s.to_string())),
        }
    }

    /// Returns the numeric value stored in the database.
    pub fn as_i32(self) -> i32 {
        match self {
            Direction::One => 1,
            Direction::Two => 2,
        }
    }
}

impl TryFrom<i32> for Direction {
    type Error = InvalidDirection;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Direction::One),
            2 => Ok(Direction::Two),
            other => Err(InvalidDirection(other.to_string())),
        }
    }
}

impl From<Direction> for i32 {
    fn from(direction: Direction) -> Self {
        direction.as_i32()
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_service_numbers() {
        assert!(ServiceNo::parse("10").is_ok());
        assert!(ServiceNo::parse("10e").is_ok());
        assert!(ServiceNo::parse("NR1").is_ok());
        assert!(ServiceNo::parse("CT18").is_ok());
    }

    #[test]
    fn service_number_case_preserved() {
        let svc = ServiceNo::parse("10e").unwrap();
        assert_eq!(svc.as_str(), "10e");
        assert_ne!(svc, ServiceNo::parse("10E").unwrap());
    }

    #[test]
    fn reject_bad_service_numbers() {
        assert!(ServiceNo::parse("").is_err());
        assert!(ServiceNo::parse("123456789").is_err());
        assert!(ServiceNo::parse("10 e").is_err());
        assert!(ServiceNo::parse("10/").is_err());
    }

    #[test]
    fn parse_direction() {
        assert_eq!(Direction::parse("1").unwrap(), Direction::One);
        assert_eq!(Direction::parse("2").unwrap(), Direction::Two);
        assert!(Direction::parse("0").is_err());
        assert!(Direction::parse("3").is_err());
        assert!(Direction::parse("one").is_err());
    }

    #[test]
    fn direction_error_message() {
        let err = Direction::parse("3").unwrap_err();
        assert_eq!(err.to_string(), "invalid direction 3: must be 1 or 2");
    }

    #[test]
    fn direction_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Direction::Two).unwrap(), "2");
        let d: Direction = serde_json::from_str("1").unwrap();
        assert_eq!(d, Direction::One);
        assert!(serde_json::from_str::<Direction>("7").is_err());
    }
}
