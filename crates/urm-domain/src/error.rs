//! Domain error types for mapping operations.

use thiserror::Error;
use urm_storage::StorageError;

use crate::model::Id;

/// Errors raised while encoding or decoding identifiers and keys.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// The zero identifier cannot be encoded.
    #[error("invalid id: zero is not a valid identifier")]
    InvalidId,

    /// Encoded input has the wrong width.
    #[error("invalid encoded length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Encoded input contains non-hexadecimal characters.
    #[error("invalid hex identifier: {value}")]
    InvalidHex { value: String },
}

/// Domain-specific errors for mapping operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A mapping already exists for the (resource, user) pair.
    #[error("mapping {user_id}:{resource_id} already exists")]
    Conflict { resource_id: Id, user_id: Id },

    /// No mapping exists for the (resource, user) pair.
    #[error("user resource mapping not found: {user_id}:{resource_id}")]
    NotFound { resource_id: Id, user_id: Id },

    /// Stored bytes could not be turned back into a valid mapping.
    ///
    /// `resource_id`/`user_id` are recovered from the key when it decodes.
    #[error("corrupt mapping at key {key}: {message}")]
    Corruption {
        key: String,
        resource_id: Option<Id>,
        user_id: Option<Id>,
        message: String,
    },

    /// Identifier or key encoding failed.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// The underlying engine failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input failed validation.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A mapping could not be serialized.
    #[error("serialization error: {message}")]
    Serialization { message: String },

    /// Internal error.
    #[error("internal error: {message}")]
    Internal { message: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_names_the_pair() {
        let err = DomainError::Conflict {
            resource_id: Id::new(0x20),
            user_id: Id::new(0x10),
        };
        assert_eq!(
            err.to_string(),
            "mapping 0000000000000010:0000000000000020 already exists"
        );
    }

    #[test]
    fn test_storage_error_conversion() {
        let err: DomainError = StorageError::NamespaceNotFound {
            namespace: "ns".to_string(),
        }
        .into();
        assert!(matches!(
            err,
            DomainError::Storage(StorageError::NamespaceNotFound { .. })
        ));
    }

    #[test]
    fn test_codec_error_conversion() {
        let err: DomainError = CodecError::InvalidId.into();
        assert!(matches!(err, DomainError::Codec(CodecError::InvalidId)));
    }
}
