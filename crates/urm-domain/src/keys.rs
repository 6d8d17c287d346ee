//! Composite key codec.
//!
//! A mapping is stored under the concatenation of two fixed-width,
//! lowercase-hex identifiers:
//!
//! ```text
//! bytes  0..16        16..32
//!        resource_id  user_id
//! ```
//!
//! Fixed width makes the encoding injective, and lowercase hex of a
//! big-endian value sorts like the value, so a cursor visits mappings
//! grouped by resource and then ordered by user.

use crate::error::CodecError;
use crate::model::{Id, UserResourceMapping};

/// Length of an encoded key in bytes.
pub const KEY_LEN: usize = 2 * Id::ENCODED_LEN;

/// Encodes the storage key for a `(resource_id, user_id)` pair.
///
/// # Errors
///
/// Returns `CodecError::InvalidId` if either identifier is zero.
pub fn encode(resource_id: Id, user_id: Id) -> Result<Vec<u8>, CodecError> {
    let resource = resource_id.encode()?;
    let user = user_id.encode()?;

    let mut key = Vec::with_capacity(KEY_LEN);
    key.extend_from_slice(&resource);
    key.extend_from_slice(&user);
    Ok(key)
}

/// Encodes the storage key of a mapping.
pub fn mapping_key(mapping: &UserResourceMapping) -> Result<Vec<u8>, CodecError> {
    encode(mapping.resource_id, mapping.user_id)
}

/// Splits a storage key back into `(resource_id, user_id)`.
pub fn decode(key: &[u8]) -> Result<(Id, Id), CodecError> {
    if key.len() != KEY_LEN {
        return Err(CodecError::InvalidLength {
            expected: KEY_LEN,
            actual: key.len(),
        });
    }
    let (resource, user) = key.split_at(Id::ENCODED_LEN);
    Ok((Id::decode(resource)?, Id::decode(user)?))
}
