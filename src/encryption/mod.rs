//! PDF encryption support.
//!
//! This module implements the Standard Security Handler at revision 2 (V=1, R=2,
//! 40-bit RC4) as described in ISO 32000-1:2008, Section 7.6:
//!
//! - [`rc4`]: the stream cipher used for every encryption operation
//! - [`algorithms`]: password padding, O/U/file-key derivation, per-object keys
//! - [`permissions`]: the signed 32-bit /P value
//! - [`traversal`]: rewriting every string and stream in a document
//! - [`write_handler`]: [`apply_standard_encryption`], the entry point
//! - [`handler`]: read-side password checks and decryption of single objects
//!
//! # Security Considerations
//!
//! - RC4-40 is cryptographically weak; it protects against casual access only
//! - The file identifier comes from the operating system's secure random source, and
//!   encryption fails if none is available
//! - Password checks use constant-time comparison
//!
//! # References
//!
//! - PDF Spec Section 7.6.2: General Encryption Algorithm
//! - PDF Spec Section 7.6.3: Standard Security Handler

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object};

pub mod algorithms;
pub mod handler;
pub mod permissions;
pub mod rc4;
pub mod traversal;
pub mod write_handler;

pub use algorithms::{generate_file_id, KeyMaterial, KEY_LENGTH, PADDING};
pub use handler::EncryptionHandler;
pub use permissions::{Permissions, PrintPermission};
pub use traversal::{encrypt_graph, GraphEncryptor};
pub use write_handler::{
    apply_standard_encryption, apply_standard_encryption_with_file_id, EncryptionWriteHandler,
};

/// Security handler name written to /Filter.
pub const STANDARD_FILTER: &str = "Standard";
/// Algorithm version (V) for 40-bit RC4.
pub const VERSION: i64 = 1;
/// Handler revision (R) for 40-bit RC4.
pub const REVISION: i64 = 2;
/// Key length in bits (Length).
pub const KEY_LENGTH_BITS: i64 = 40;

/// PDF encryption dictionary (/Encrypt entry in trailer).
///
/// PDF Spec: Section 7.6.1, Table 20 and Table 21
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptDict {
    /// Filter name (should be "Standard")
    pub filter: String,
    /// Algorithm version (V)
    pub version: i64,
    /// Revision number (R)
    pub revision: i64,
    /// Key length in bits (Length)
    pub length: i64,
    /// Owner entry (O): 32 bytes
    pub owner_entry: Vec<u8>,
    /// User entry (U): 32 bytes
    pub user_entry: Vec<u8>,
    /// User permissions (P), signed
    pub permissions: i32,
}

impl EncryptDict {
    /// Build the V=1/R=2 dictionary for derived key material.
    pub fn standard(material: &KeyMaterial) -> Self {
        Self {
            filter: STANDARD_FILTER.to_string(),
            version: VERSION,
            revision: REVISION,
            length: KEY_LENGTH_BITS,
            owner_entry: material.owner_entry.to_vec(),
            user_entry: material.user_entry.to_vec(),
            permissions: material.permissions,
        }
    }

    /// Convert to a dictionary object. O and U are written as hex strings.
    pub fn to_object(&self) -> Object {
        let mut dict = Dictionary::new();
        dict.insert("Filter".to_string(), Object::name(self.filter.as_str()));
        dict.insert("V".to_string(), Object::Integer(self.version));
        dict.insert("R".to_string(), Object::Integer(self.revision));
        dict.insert("Length".to_string(), Object::Integer(self.length));
        dict.insert("O".to_string(), Object::HexString(self.owner_entry.clone()));
        dict.insert("U".to_string(), Object::HexString(self.user_entry.clone()));
        dict.insert("P".to_string(), Object::Integer(self.permissions as i64));
        Object::Dictionary(dict)
    }

    /// Parse an encryption dictionary from a PDF object.
    ///
    /// /Length is optional and defaults to 40.
    pub fn from_object(obj: &Object) -> Result<Self> {
        let dict = obj.as_dict().ok_or_else(|| Error::InvalidObjectType {
            expected: "Dictionary".to_string(),
            found: obj.type_name().to_string(),
        })?;

        let filter = dict
            .get("Filter")
            .and_then(|o| o.as_name())
            .ok_or_else(|| Error::InvalidEncryptDict("missing /Filter".to_string()))?
            .to_string();

        let integer = |key: &str| -> Result<i64> {
            dict.get(key)
                .and_then(|o| o.as_integer())
                .ok_or_else(|| Error::InvalidEncryptDict(format!("missing /{}", key)))
        };
        let bytes = |key: &str| -> Result<Vec<u8>> {
            dict.get(key)
                .and_then(|o| o.as_string())
                .map(|s| s.to_vec())
                .ok_or_else(|| Error::InvalidEncryptDict(format!("missing /{}", key)))
        };

        let version = integer("V")?;
        let revision = integer("R")?;
        let length = dict
            .get("Length")
            .and_then(|o| o.as_integer())
            .unwrap_or(KEY_LENGTH_BITS);
        let owner_entry = bytes("O")?;
        let user_entry = bytes("U")?;
        // P may be stored as the unsigned reading of the same 32 bits
        let permissions = integer("P")? as u32 as i32;

        Ok(EncryptDict {
            filter,
            version,
            revision,
            length,
            owner_entry,
            user_entry,
            permissions,
        })
    }

    /// Check that this dictionary describes the handler this crate implements.
    pub fn ensure_supported(&self) -> Result<()> {
        if self.filter != STANDARD_FILTER {
            return Err(Error::Unsupported(format!("security handler /{}", self.filter)));
        }
        if (self.version, self.revision, self.length) != (VERSION, REVISION, KEY_LENGTH_BITS) {
            return Err(Error::Unsupported(format!(
                "encryption V={}, R={}, Length={}",
                self.version, self.revision, self.length
            )));
        }
        Ok(())
    }

    /// Decoded permission policy.
    pub fn permission_policy(&self) -> Permissions {
        Permissions::from_bits(self.permissions)
    }
}
