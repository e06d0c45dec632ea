//! PDF encryption algorithms.
//!
//! Key derivation for the Standard Security Handler at revision 2 (40-bit RC4).
//!
//! PDF Spec: Section 7.6.3 - Standard Security Handler
//! - Algorithm 1: per-object keys
//! - Algorithm 2: the file encryption key
//! - Algorithm 3: the owner entry (O)
//! - Algorithm 4: the user entry (U) for R=2
//! - Algorithm 6/7: user and owner password authentication

use md5::{Digest, Md5};

use super::rc4::rc4_crypt;
use crate::config::EncryptionOptions;
use crate::error::{Error, Result};
use crate::object::ObjectRef;

/// Padding string used in PDF encryption (32 bytes).
///
/// PDF Spec: Algorithm 2, step a
pub const PADDING: &[u8; 32] = b"\x28\xBF\x4E\x5E\x4E\x75\x8A\x41\
                                  \x64\x00\x4E\x56\xFF\xFA\x01\x08\
                                  \x2E\x2E\x00\xB6\xD0\x68\x3E\x80\
                                  \x2F\x0C\xA9\xFE\x64\x53\x69\x7A";

/// File encryption key length in bytes (40 bits).
pub const KEY_LENGTH: usize = 5;

/// Per-object key length in bytes.
pub const OBJECT_KEY_LENGTH: usize = 5;

/// Length of the generated file identifier.
pub const FILE_ID_LENGTH: usize = 16;

/// A password padded or truncated to 32 bytes.
pub type PaddedPassword = [u8; 32];

/// The 40-bit file encryption key.
pub type FileKey = [u8; KEY_LENGTH];

/// A per-object RC4 key.
pub type ObjectKey = [u8; OBJECT_KEY_LENGTH];

/// Pad or truncate a password to 32 bytes using the standard padding.
///
/// Every character must fit in one byte (U+0000..=U+00FF); the byte written is the code
/// point itself. Characters past the 32nd are ignored for the key but still validated.
///
/// PDF Spec: Algorithm 2, step a
pub fn pad_password(password: &str) -> Result<PaddedPassword> {
    let mut padded = *PADDING;
    let mut len = 0;

    for (position, character) in password.chars().enumerate() {
        let byte = u8::try_from(u32::from(character))
            .map_err(|_| Error::InvalidPassword { position, character })?;
        if len < padded.len() {
            padded[len] = byte;
            len += 1;
        }
    }

    let rest = PADDING.len() - len;
    padded[len..].copy_from_slice(&PADDING[..rest]);
    Ok(padded)
}

/// Compute the owner entry O (Algorithm 3, R=2).
///
/// The RC4 key is the first five bytes of MD5(padded owner password); O is the padded user
/// password encrypted with it.
pub fn compute_owner_entry(
    padded_owner: &PaddedPassword,
    padded_user: &PaddedPassword,
) -> Result<[u8; 32]> {
    let key = owner_key(padded_owner);
    to_block(&rc4_crypt(&key, padded_user)?)
}

/// Compute the file encryption key (Algorithm 2, R=2).
///
/// MD5 over padded user password, O, P as 4 little-endian bytes, and the file ID,
/// truncated to [`KEY_LENGTH`].
pub fn compute_file_key(
    padded_user: &PaddedPassword,
    owner_entry: &[u8],
    permissions: i32,
    file_id: &[u8],
) -> FileKey {
    let mut hasher = Md5::new();
    hasher.update(padded_user);
    hasher.update(owner_entry);
    hasher.update(permissions.to_le_bytes());
    hasher.update(file_id);
    let hash = hasher.finalize();

    let mut key = [0u8; KEY_LENGTH];
    key.copy_from_slice(&hash[..KEY_LENGTH]);
    key
}

/// Compute the user entry U (Algorithm 4, R=2): the padding string encrypted with the
/// file key.
pub fn compute_user_entry(file_key: &FileKey) -> Result<[u8; 32]> {
    to_block(&rc4_crypt(file_key, PADDING)?)
}

/// Derive the key for one indirect object (Algorithm 1).
///
/// MD5 over the file key, the low 3 bytes of the object number and the low 2 bytes of the
/// generation number (both little-endian), truncated to [`OBJECT_KEY_LENGTH`].
pub fn derive_object_key(file_key: &FileKey, object: ObjectRef) -> ObjectKey {
    let mut buffer = [0u8; KEY_LENGTH + 5];
    buffer[..KEY_LENGTH].copy_from_slice(file_key);
    buffer[KEY_LENGTH..KEY_LENGTH + 3].copy_from_slice(&object.id.to_le_bytes()[..3]);
    buffer[KEY_LENGTH + 3..].copy_from_slice(&object.gen.to_le_bytes());

    let hash = Md5::digest(buffer);
    let mut key = [0u8; OBJECT_KEY_LENGTH];
    key.copy_from_slice(&hash[..OBJECT_KEY_LENGTH]);
    key
}

/// Draw a fresh file identifier from the operating system's secure random source.
pub fn generate_file_id() -> Result<[u8; FILE_ID_LENGTH]> {
    let mut id = [0u8; FILE_ID_LENGTH];
    getrandom::getrandom(&mut id).map_err(Error::RandomSource)?;
    Ok(id)
}

/// Everything derived for one encryption operation.
///
/// Only O, U and P leave this struct (through the encryption dictionary).
#[derive(Clone)]
pub struct KeyMaterial {
    /// Padded user password
    pub padded_user: PaddedPassword,
    /// Padded owner password
    pub padded_owner: PaddedPassword,
    /// Owner entry (O)
    pub owner_entry: [u8; 32],
    /// Permissions (P)
    pub permissions: i32,
    /// First element of the file identifier
    pub file_id: [u8; FILE_ID_LENGTH],
    /// File encryption key
    pub file_key: FileKey,
    /// User entry (U)
    pub user_entry: [u8; 32],
}

impl KeyMaterial {
    /// Derive O, the file key and U for the given policy and file identifier.
    pub fn derive(options: &EncryptionOptions, file_id: [u8; FILE_ID_LENGTH]) -> Result<Self> {
        let padded_user = pad_password(&options.user_password)?;
        let padded_owner = pad_password(options.effective_owner_password())?;
        let permissions = options.permissions.to_bits();
        Self::from_padded(padded_user, padded_owner, permissions, file_id)
    }

    /// Derive from already padded passwords and an encoded P value.
    pub fn from_padded(
        padded_user: PaddedPassword,
        padded_owner: PaddedPassword,
        permissions: i32,
        file_id: [u8; FILE_ID_LENGTH],
    ) -> Result<Self> {
        let owner_entry = compute_owner_entry(&padded_owner, &padded_user)?;
        let file_key = compute_file_key(&padded_user, &owner_entry, permissions, &file_id);
        let user_entry = compute_user_entry(&file_key)?;

        Ok(Self {
            padded_user,
            padded_owner,
            owner_entry,
            permissions,
            file_id,
            file_key,
            user_entry,
        })
    }
}

impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Padded passwords and the file key stay out of logs
        f.debug_struct("KeyMaterial")
            .field("owner_entry", &self.owner_entry)
            .field("user_entry", &self.user_entry)
            .field("permissions", &self.permissions)
            .field("file_id", &self.file_id)
            .finish_non_exhaustive()
    }
}

/// Authenticate a user password against stored O, U and P (Algorithm 6, R=2).
///
/// Returns the file key if the recomputed U matches the stored one.
pub fn authenticate_user_password(
    padded_user: &PaddedPassword,
    owner_entry: &[u8],
    user_entry: &[u8],
    permissions: i32,
    file_id: &[u8],
) -> Result<Option<FileKey>> {
    let key = compute_file_key(padded_user, owner_entry, permissions, file_id);
    let expected = compute_user_entry(&key)?;

    if constant_time_compare(user_entry, &expected) {
        Ok(Some(key))
    } else {
        Ok(None)
    }
}

/// Recover the padded user password from O using the owner password (Algorithm 7, R=2).
///
/// The result still has to pass [`authenticate_user_password`].
pub fn recover_user_password(
    padded_owner: &PaddedPassword,
    owner_entry: &[u8],
) -> Result<PaddedPassword> {
    let key = owner_key(padded_owner);
    to_block(&rc4_crypt(&key, owner_entry)?)
}

fn owner_key(padded_owner: &PaddedPassword) -> FileKey {
    let hash = Md5::digest(padded_owner);
    let mut key = [0u8; KEY_LENGTH];
    key.copy_from_slice(&hash[..KEY_LENGTH]);
    key
}

fn to_block(bytes: &[u8]) -> Result<[u8; 32]> {
    <[u8; 32]>::try_from(bytes).map_err(|_| {
        Error::InvalidEncryptDict(format!("expected a 32-byte entry, got {} bytes", bytes.len()))
    })
}

/// Constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
