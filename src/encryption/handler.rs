//! Encryption handler for reading encrypted documents.
//!
//! This module provides password authentication against an installed encryption
//! dictionary and decryption of individual objects. It is what checks that an encrypted
//! document is recoverable; removing encryption from a document is not offered here.

use super::algorithms::{self, pad_password, FileKey};
use super::traversal::GraphEncryptor;
use super::{EncryptDict, Permissions};
use crate::document::Document;
use crate::error::{Error, Result};
use crate::object::{Object, ObjectRef};

/// Read-side state for a document encrypted with the Standard Security Handler.
#[derive(Debug, Clone)]
pub struct EncryptionHandler {
    /// Encryption dictionary
    dict: EncryptDict,
    /// File identifier (first element of /ID array)
    file_id: Vec<u8>,
    /// File key, set after successful authentication
    file_key: Option<FileKey>,
}

impl EncryptionHandler {
    /// Create a handler from the document's /Encrypt dictionary and /ID.
    pub fn new(doc: &Document) -> Result<Self> {
        let trailer = doc.trailer();
        let encrypt_ref = trailer
            .encrypt
            .ok_or_else(|| Error::InvalidEncryptDict("trailer has no /Encrypt".to_string()))?;
        let file_id = trailer
            .file_id()
            .ok_or_else(|| Error::InvalidEncryptDict("trailer has no /ID".to_string()))?
            .to_vec();

        Self::from_parts(doc.lookup(encrypt_ref)?, file_id)
    }

    /// Create a handler from an encryption dictionary object and file identifier.
    pub fn from_parts(encrypt_obj: &Object, file_id: Vec<u8>) -> Result<Self> {
        let dict = EncryptDict::from_object(encrypt_obj)?;
        dict.ensure_supported()?;

        log::info!(
            "Document is encrypted with 40-bit RC4 (V={}, R={})",
            dict.version,
            dict.revision
        );

        Ok(Self {
            dict,
            file_id,
            file_key: None,
        })
    }

    /// Authenticate with the user password.
    ///
    /// Returns `Ok(false)` for a wrong password; errors only for passwords that cannot be
    /// padded.
    pub fn authenticate_user(&mut self, password: &str) -> Result<bool> {
        let padded = pad_password(password)?;
        self.authenticate_padded_user(&padded)
    }

    /// Authenticate with the owner password.
    ///
    /// The owner password decrypts O back into the padded user password, which must then
    /// authenticate as a user password.
    pub fn authenticate_owner(&mut self, password: &str) -> Result<bool> {
        let padded_owner = pad_password(password)?;
        let padded_user = algorithms::recover_user_password(&padded_owner, &self.dict.owner_entry)?;
        self.authenticate_padded_user(&padded_user)
    }

    fn authenticate_padded_user(&mut self, padded: &algorithms::PaddedPassword) -> Result<bool> {
        let key = algorithms::authenticate_user_password(
            padded,
            &self.dict.owner_entry,
            &self.dict.user_entry,
            self.dict.permissions,
            &self.file_id,
        )?;

        match key {
            Some(key) => {
                self.file_key = Some(key);
                log::debug!("Password authentication succeeded");
                Ok(true)
            },
            None => {
                log::warn!("Password authentication failed");
                Ok(false)
            },
        }
    }

    /// Check if the handler has been authenticated.
    pub fn is_authenticated(&self) -> bool {
        self.file_key.is_some()
    }

    /// Get the file key (if authenticated).
    pub fn file_key(&self) -> Option<&FileKey> {
        self.file_key.as_ref()
    }

    /// Get the permissions granted to user-password holders.
    pub fn permissions(&self) -> Permissions {
        self.dict.permission_policy()
    }

    /// Get the parsed encryption dictionary.
    pub fn encrypt_dict(&self) -> &EncryptDict {
        &self.dict
    }

    /// Decrypt every string and stream payload in one indirect object.
    ///
    /// Strings come back as hex strings holding the plaintext bytes.
    pub fn decrypt_object(&self, id: ObjectRef, object: &Object) -> Result<Object> {
        let key = self
            .file_key
            .as_ref()
            .ok_or_else(|| Error::InvalidEncryptDict("Not authenticated".to_string()))?;
        GraphEncryptor::new(key).crypt_object(id, object)
    }
}
