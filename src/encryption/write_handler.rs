//! Encryption handler for writing encrypted PDFs.
//!
//! This module provides the [`EncryptionWriteHandler`], which owns the key material for
//! one encryption operation, and [`apply_standard_encryption`], which encrypts a whole
//! document and wires the encryption dictionary into its trailer.

use super::algorithms::{
    derive_object_key, generate_file_id, pad_password, FileKey, KeyMaterial, ObjectKey,
    FILE_ID_LENGTH,
};
use super::rc4;
use super::traversal::GraphEncryptor;
use super::{EncryptDict, KEY_LENGTH_BITS};
use crate::config::EncryptionOptions;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::object::ObjectRef;

/// Handler for encrypting PDF objects during write operations.
pub struct EncryptionWriteHandler {
    material: KeyMaterial,
}

impl EncryptionWriteHandler {
    /// Derive key material for `options` and the given file identifier.
    pub fn new(options: &EncryptionOptions, file_id: [u8; FILE_ID_LENGTH]) -> Result<Self> {
        Ok(Self::from_key_material(KeyMaterial::derive(options, file_id)?))
    }

    /// Create a handler from already derived key material.
    pub fn from_key_material(material: KeyMaterial) -> Self {
        Self { material }
    }

    /// The key material (O, U, P, file ID and file key).
    pub fn key_material(&self) -> &KeyMaterial {
        &self.material
    }

    /// The 40-bit file encryption key.
    pub fn file_key(&self) -> &FileKey {
        &self.material.file_key
    }

    /// The encryption dictionary describing this handler.
    pub fn encrypt_dict(&self) -> EncryptDict {
        EncryptDict::standard(&self.material)
    }

    /// Derive the object-specific encryption key.
    ///
    /// PDF Spec: Algorithm 1 - Encryption key derivation for individual objects
    pub fn derive_object_key(&self, object: ObjectRef) -> ObjectKey {
        derive_object_key(&self.material.file_key, object)
    }

    /// Encrypt a string belonging to `object`.
    pub fn encrypt_string(&self, data: &[u8], object: ObjectRef) -> Result<Vec<u8>> {
        rc4::rc4_crypt(&self.derive_object_key(object), data)
    }

    /// Encrypt a stream payload belonging to `object`.
    ///
    /// Strings and streams use the same key and cipher at this revision.
    pub fn encrypt_stream(&self, data: &[u8], object: ObjectRef) -> Result<Vec<u8>> {
        self.encrypt_string(data, object)
    }

    /// Graph traversal using this handler's file key.
    pub fn encryptor(&self) -> GraphEncryptor<'_> {
        GraphEncryptor::new(&self.material.file_key)
    }

    /// Encrypt `doc` and install the encryption dictionary.
    ///
    /// Every fallible step runs before the first mutation, so on error the document is
    /// exactly as it was.
    pub fn encrypt_document(&self, doc: &mut Document) -> Result<ObjectRef> {
        if let Some(existing) = doc.trailer().encrypt {
            return Err(Error::Unsupported(format!(
                "document is already encrypted (/Encrypt {})",
                existing
            )));
        }

        // The dictionary is registered after staging, so the traversal never sees it
        let staged = self.encryptor().stage(doc)?;
        let replaced = staged.replacements.len();

        // The trailer is written only once the dictionary has an object number
        let encrypt_ref = doc.register(self.encrypt_dict().to_object())?;
        let file_id = self.material.file_id.to_vec();
        doc.trailer_mut().id = Some([file_id.clone(), file_id]);
        doc.trailer_mut().encrypt = Some(encrypt_ref);
        staged.commit(doc)?;

        log::info!(
            "Encrypted document with {}-bit RC4: {} of {} objects rewritten, /Encrypt {}",
            KEY_LENGTH_BITS,
            replaced,
            doc.len() - 1,
            encrypt_ref
        );
        Ok(encrypt_ref)
    }
}

/// Encrypt a document with the Standard Security Handler (V=1, R=2, 40-bit RC4).
///
/// A fresh 16-byte file identifier is drawn from the operating system and stored twice in
/// the trailer /ID; the new encryption dictionary is registered and referenced from
/// /Encrypt; every other string and stream is encrypted with its object's key.
///
/// # Errors
///
/// - [`Error::InvalidPassword`] if either password has a character above U+00FF
/// - [`Error::RandomSource`] if no secure random bytes are available
/// - [`Error::InvalidStructure`] or [`Error::RecursionLimitExceeded`] for a malformed graph
/// - [`Error::Unsupported`] if the document already has an /Encrypt entry
/// - [`Error::ObjectNumbersExhausted`] if no object number is left for the dictionary
///
/// The document is not modified when an error is returned.
///
/// # Example
///
/// ```
/// use pdf_lock::config::EncryptionOptions;
/// use pdf_lock::document::Document;
/// use pdf_lock::encryption::apply_standard_encryption;
/// use pdf_lock::object::Object;
///
/// let mut doc = Document::new();
/// doc.register(Object::String(b"Invoice #42".to_vec()))?;
///
/// apply_standard_encryption(&mut doc, &EncryptionOptions::new("secret"))?;
/// assert!(doc.trailer().encrypt.is_some());
/// # Ok::<(), pdf_lock::error::Error>(())
/// ```
pub fn apply_standard_encryption(doc: &mut Document, options: &EncryptionOptions) -> Result<()> {
    // Passwords are validated before drawing the file identifier
    let padded_user = pad_password(&options.user_password)?;
    let padded_owner = pad_password(options.effective_owner_password())?;
    let permissions = options.permissions.to_bits();

    let file_id = generate_file_id()?;
    log::debug!("Drew file identifier for encryption");

    let material = KeyMaterial::from_padded(padded_user, padded_owner, permissions, file_id)?;
    EncryptionWriteHandler::from_key_material(material).encrypt_document(doc)?;
    Ok(())
}

/// Same as [`apply_standard_encryption`] with a caller-supplied file identifier.
pub fn apply_standard_encryption_with_file_id(
    doc: &mut Document,
    options: &EncryptionOptions,
    file_id: [u8; FILE_ID_LENGTH],
) -> Result<()> {
    EncryptionWriteHandler::new(options, file_id)?.encrypt_document(doc)?;
    Ok(())
}
