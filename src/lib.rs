// Allow some clippy lints that are too pedantic for this project
#![allow(clippy::too_many_arguments)]
#![allow(clippy::enum_variant_names)]

//! # PDF Lock
//!
//! Password protection for PDF documents using the Standard Security Handler
//! (V=1, R=2, 40-bit RC4, ISO 32000-1:2008 §7.6).
//!
//! ## Features
//!
//! - **Key derivation**: password padding, owner entry (O), user entry (U) and the file
//!   key, plus per-object keys (§7.6.3.3, Algorithms 1-4)
//! - **Permissions**: typed policy ↔ signed 32-bit /P value (Table 22)
//! - **Graph encryption**: every string and stream of an in-memory object graph, with
//!   cycle-safe traversal and all-or-nothing commits
//! - **Verification**: user/owner password authentication and per-object decryption
//!
//! Loading a document into a [`Document`] and serializing it back to bytes are left to the
//! caller.
//!
//! ## Quick Start
//!
//! ```
//! use pdf_lock::{apply_standard_encryption, Document, EncryptionOptions, Object};
//! use pdf_lock::encryption::{EncryptionHandler, Permissions, PrintPermission};
//!
//! # fn main() -> Result<(), pdf_lock::Error> {
//! let mut doc = Document::new();
//! let info = doc.register(Object::String(b"Statement of account".to_vec()))?;
//! doc.trailer_mut().info = Some(info);
//!
//! let options = EncryptionOptions::new("secret").with_permissions(
//!     Permissions::default().with_printing(PrintPermission::HighResolution),
//! );
//! apply_standard_encryption(&mut doc, &options)?;
//!
//! let mut handler = EncryptionHandler::new(&doc)?;
//! assert!(handler.authenticate_user("secret")?);
//! let plain = handler.decrypt_object(info, doc.lookup(info)?)?;
//! assert_eq!(plain.as_string(), Some(&b"Statement of account"[..]));
//! # Ok(())
//! # }
//! ```
//!
//! ## License
//!
//! Licensed under either of Apache License, Version 2.0 or MIT license, at your option.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Error handling
pub mod error;

// Object graph
pub mod document;
pub mod object;

// Configuration
pub mod config;

// Encryption support
pub mod encryption;

// Re-exports
pub use config::EncryptionOptions;
pub use document::{Document, Trailer};
pub use encryption::{apply_standard_encryption, Permissions, PrintPermission};
pub use error::{Error, Result};
pub use object::{Dictionary, Object, ObjectRef, Stream};
