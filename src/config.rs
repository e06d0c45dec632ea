//! Configuration for document encryption.

use crate::encryption::Permissions;

/// Password and permission policy for one encryption operation.
///
/// # Example
///
/// ```
/// use pdf_lock::config::EncryptionOptions;
/// use pdf_lock::encryption::{Permissions, PrintPermission};
///
/// let options = EncryptionOptions::new("secret")
///     .with_owner_password("admin")
///     .with_permissions(Permissions::default().with_printing(PrintPermission::HighResolution));
/// assert_eq!(options.effective_owner_password(), "admin");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncryptionOptions {
    /// Password required to open the document (may be empty).
    pub user_password: String,
    /// Password for full access; falls back to the user password when absent.
    pub owner_password: Option<String>,
    /// Permission flags granted to user-password holders.
    pub permissions: Permissions,
}

impl EncryptionOptions {
    /// Create options with the given user password and no permissions granted.
    pub fn new(user_password: impl Into<String>) -> Self {
        Self {
            user_password: user_password.into(),
            ..Default::default()
        }
    }

    /// Set a distinct owner password.
    pub fn with_owner_password(mut self, owner_password: impl Into<String>) -> Self {
        self.owner_password = Some(owner_password.into());
        self
    }

    /// Set the permissions.
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Owner password actually used for key derivation.
    pub fn effective_owner_password(&self) -> &str {
        self.owner_password.as_deref().unwrap_or(&self.user_password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_defaults_to_user() {
        let options = EncryptionOptions::new("secret");
        assert_eq!(options.owner_password, None);
        assert_eq!(options.effective_owner_password(), "secret");
    }

    #[test]
    fn test_explicit_owner() {
        let options = EncryptionOptions::new("user").with_owner_password("owner");
        assert_eq!(options.effective_owner_password(), "owner");
    }

    #[test]
    fn test_default_grants_nothing() {
        let options = EncryptionOptions::new("x");
        assert_eq!(options.permissions, Permissions::default());
        assert!(!options.permissions.can_print());
    }

    #[test]
    fn test_with_permissions() {
        let options = EncryptionOptions::new("x").with_permissions(Permissions::all());
        assert!(options.permissions.copying);
        assert!(options.permissions.document_assembly);
    }
}
