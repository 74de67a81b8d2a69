//! User identifiers
//!
//! Every record is keyed by a random 128-bit identifier (a version 4 UUID,
//! 122 random bits) minted when the record is created.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::{Builder, Uuid};

/// Identifier of a stored user record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Mint a fresh random identifier
    ///
    /// Entropy comes from the thread-local CSPRNG, which panics if the OS
    /// source cannot seed it. That is treated as fatal.
    pub fn generate() -> Self {
        let bytes: [u8; 16] = rand::random();
        Self(Builder::from_random_bytes(bytes).into_uuid())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.hyphenated(), f)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generate_is_v4() {
        let id = UserId::generate();
        assert_eq!(id.0.get_version_num(), 4);
        assert_eq!(id.0.get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn test_generate_unique() {
        let ids: HashSet<UserId> = (0..10_000).map(|_| UserId::generate()).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_display_parse() {
        let id = UserId::generate();
        let text = id.to_string();

        assert_eq!(text.len(), 36);
        assert_eq!(text, text.to_lowercase());
        assert_eq!(text.parse::<UserId>().unwrap(), id);
    }

    #[test]
    fn test_parse_invalid() {
        assert!("not-a-uuid".parse::<UserId>().is_err());
        assert!("".parse::<UserId>().is_err());
        assert!("123e4567-e89b-12d3-a456-42661417400".parse::<UserId>().is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        let id: UserId = "123e4567-e89b-12d3-a456-426614174000".parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"123e4567-e89b-12d3-a456-426614174000\"");
    }
}
