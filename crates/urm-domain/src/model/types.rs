//! Core type definitions for user-resource mappings.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{CodecError, DomainError};

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// An opaque 64-bit identifier.
///
/// Users, organizations and resources share one identifier space. Zero is
/// the invalid (unset) identifier.
///
/// The textual form is exactly 16 lowercase hexadecimal characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Id(u64);

impl Id {
    /// The invalid identifier.
    pub const INVALID: Id = Id(0);

    /// Width of the encoded form in bytes.
    pub const ENCODED_LEN: usize = 16;

    /// Creates an identifier from its raw value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns `true` unless this is the zero identifier.
    pub const fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// Encodes the identifier as 16 lowercase hex bytes.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidId` for the zero identifier.
    pub fn encode(self) -> Result<[u8; Self::ENCODED_LEN], CodecError> {
        if !self.is_valid() {
            return Err(CodecError::InvalidId);
        }
        Ok(self.to_hex())
    }

    /// Decodes an identifier from its 16-byte hex form (either case).
    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() != Self::ENCODED_LEN {
            return Err(CodecError::InvalidLength {
                expected: Self::ENCODED_LEN,
                actual: bytes.len(),
            });
        }
        let mut value = 0u64;
        for &byte in bytes {
            let nibble = match byte {
                b'0'..=b'9' => byte - b'0',
                b'a'..=b'f' => byte - b'a' + 10,
                b'A'..=b'F' => byte - b'A' + 10,
                _ => {
                    return Err(CodecError::InvalidHex {
                        value: String::from_utf8_lossy(bytes).into_owned(),
                    })
                }
            };
            value = (value << 4) | u64::from(nibble);
        }
        if value == 0 {
            return Err(CodecError::InvalidId);
        }
        Ok(Self(value))
    }

    fn to_hex(self) -> [u8; Self::ENCODED_LEN] {
        let mut out = [0u8; Self::ENCODED_LEN];
        for (i, byte) in out.iter_mut().enumerate() {
            let shift = 4 * (Self::ENCODED_LEN - 1 - i);
            *byte = HEX_DIGITS[((self.0 >> shift) & 0xf) as usize];
        }
        out
    }
}

impl From<u64> for Id {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

impl FromStr for Id {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s.as_bytes())
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// The role a user plays with respect to a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Owner,
    Member,
}

impl UserType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "owner" => Ok(Self::Owner),
            "member" => Ok(Self::Member),
            other => Err(DomainError::Validation {
                message: format!("unknown user type: {other}"),
            }),
        }
    }
}

/// The kind of resource a mapping grants access to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Authorizations,
    Buckets,
    Dashboards,
    /// Organizations; the edge kind followed during deep resolution.
    Orgs,
    Sources,
    Tasks,
    Telegrafs,
    Users,
}

impl ResourceType {
    /// Every resource kind, in declaration order.
    pub const ALL: [ResourceType; 8] = [
        Self::Authorizations,
        Self::Buckets,
        Self::Dashboards,
        Self::Orgs,
        Self::Sources,
        Self::Tasks,
        Self::Telegrafs,
        Self::Users,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Authorizations => "authorizations",
            Self::Buckets => "buckets",
            Self::Dashboards => "dashboards",
            Self::Orgs => "orgs",
            Self::Sources => "sources",
            Self::Tasks => "tasks",
            Self::Telegrafs => "telegrafs",
            Self::Users => "users",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| DomainError::Validation {
                message: format!("unknown resource type: {s}"),
            })
    }
}

/// A relationship between a user and a resource.
///
/// At most one mapping exists per `(resource_id, user_id)` pair. Mappings
/// are never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserResourceMapping {
    #[serde(rename = "userID")]
    pub user_id: Id,
    #[serde(rename = "userType")]
    pub user_type: UserType,
    #[serde(rename = "resourceID")]
    pub resource_id: Id,
    #[serde(rename = "resourceType")]
    pub resource_type: ResourceType,
}

impl UserResourceMapping {
    /// Creates a new mapping.
    pub fn new(
        user_id: impl Into<Id>,
        user_type: UserType,
        resource_id: impl Into<Id>,
        resource_type: ResourceType,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            user_type,
            resource_id: resource_id.into(),
            resource_type,
        }
    }

    /// Checks that both identifiers are set.
    ///
    /// A zero identifier cannot be encoded into a key, so this fails with
    /// the same `CodecError::InvalidId` that key encoding reports.
    pub fn validate(&self) -> Result<(), CodecError> {
        if !self.user_id.is_valid() || !self.resource_id.is_valid() {
            return Err(CodecError::InvalidId);
        }
        Ok(())
    }
}
