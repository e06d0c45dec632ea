//! Error types for the encryption engine.
//!
//! This module defines all error types that can occur while building, encrypting,
//! or verifying a PDF object graph.

use crate::object::ObjectRef;

/// Result type alias for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during PDF encryption.
#[derive(Debug, thiserror::Error)]
#[allow(clippy::enum_variant_names)] // "Invalid" prefix is intentional for clarity
pub enum Error {
    /// Password contains a character that does not fit in a single byte
    #[error("Password contains an invalid character {character:?} at position {position}")]
    InvalidPassword {
        /// Character index within the password
        position: usize,
        /// Offending character
        character: char,
    },

    /// The operating system could not provide secure random bytes
    #[error("Secure random source unavailable: {0}")]
    RandomSource(getrandom::Error),

    /// Cipher key must not be empty
    #[error("Invalid cipher key length: {0}")]
    InvalidKeyLength(usize),

    /// The object graph does not have the shape the traversal expects
    #[error("Invalid structure in object {object}: {reason}")]
    InvalidStructure {
        /// Indirect object containing the problem
        object: ObjectRef,
        /// What is wrong with it
        reason: String,
    },

    /// Recursion depth limit exceeded
    #[error("Recursion depth limit exceeded (max: {0})")]
    RecursionLimitExceeded(u32),

    /// Every object number has been allocated
    #[error("No free object number left in the document")]
    ObjectNumbersExhausted,

    /// Referenced object not found in the document
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// Object has wrong type
    #[error("Invalid object type: expected {expected}, found {found}")]
    InvalidObjectType {
        /// Expected object type
        expected: String,
        /// Actual object type found
        found: String,
    },

    /// Encryption dictionary or file identifier is missing or malformed
    #[error("Invalid encryption dictionary: {0}")]
    InvalidEncryptDict(String),

    /// Unsupported feature
    #[error("Unsupported feature: {0}")]
    Unsupported(String),
}
