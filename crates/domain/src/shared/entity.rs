use serde::{de::Visitor, Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub trait Entity {
    fn id(&self) -> ID;
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

/// Identifier of the rows owned by the festival application.
///
/// Ids are positive integers. They travel as JSON numbers, but the main
/// application also sends them as numeric strings (session claims, query
/// params), so both representations are accepted when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ID(i64);

impl ID {
    pub fn new(id: i64) -> Result<Self, InvalidIDError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(InvalidIDError::Malformed(id.to_string()))
        }
    }

    pub fn inner(&self) -> i64 {
        self.0
    }
}

/// Conversion from rows that are already stored, which are trusted to be valid
impl From<i64> for ID {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl Display for ID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidIDError {
    #[error("ID: {0} is malformed")]
    Malformed(String),
}

impl FromStr for ID {
    type Err = InvalidIDError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map_err(|_| InvalidIDError::Malformed(s.to_string()))
            .and_then(|id| Self::new(id).map_err(|_| InvalidIDError::Malformed(s.to_string())))
    }
}

impl Serialize for ID {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_i64(self.0)
    }
}

impl<'de> Deserialize<'de> for ID {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IDVisitor;

        impl<'de> Visitor<'de> for IDVisitor {
            type Value = ID;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("A positive integer id or its string representation")
            }

            fn visit_i64<E>(self, value: i64) -> Result<ID, E>
            where
                E: serde::de::Error,
            {
                ID::new(value).map_err(|_| E::custom(format!("Malformed id: {}", value)))
            }

            fn visit_u64<E>(self, value: u64) -> Result<ID, E>
            where
                E: serde::de::Error,
            {
                i64::try_from(value)
                    .map_err(|_| E::custom(format!("Malformed id: {}", value)))
                    .and_then(|v| self.visit_i64(v))
            }

            fn visit_str<E>(self, value: &str) -> Result<ID, E>
            where
                E: serde::de::Error,
            {
                value
                    .parse::<ID>()
                    .map_err(|_| E::custom(format!("Malformed id: {}", value)))
            }
        }

        deserializer.deserialize_any(IDVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_positive_ids_only() {
        assert_eq!("42".parse::<ID>(), Ok(ID::from(42)));
        assert_eq!(" 7 ".parse::<ID>(), Ok(ID::from(7)));
        assert!("0".parse::<ID>().is_err());
        assert!("-3".parse::<ID>().is_err());
        assert!("abc".parse::<ID>().is_err());
        assert!("".parse::<ID>().is_err());
    }

    #[test]
    fn deserializes_numbers_and_numeric_strings() {
        let id: ID = serde_json::from_str("12").unwrap();
        assert_eq!(id.inner(), 12);
        let id: ID = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(id.inner(), 12);

        assert!(serde_json::from_str::<ID>("0").is_err());
        assert!(serde_json::from_str::<ID>("\"twelve\"").is_err());
        assert!(serde_json::from_str::<ID>("null").is_err());
        assert!(serde_json::from_str::<ID>("1.5").is_err());
    }

    #[test]
    fn serializes_as_number() {
        assert_eq!(serde_json::to_string(&ID::from(5)).unwrap(), "5");
    }
}
