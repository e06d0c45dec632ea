//! Object graph traversal for encryption.
//!
//! Every string and stream payload of every indirect object (except the encryption
//! dictionary) is run through RC4 with that object's own key.
//!
//! References are never followed while an object's value is being rewritten. Each
//! reference found is queued instead, and its target is processed later as a top-level
//! object of its own. A visited set keyed by [`ObjectRef`] makes sure every indirect object
//! is processed exactly once, even when the graph contains cycles or an object is referenced
//! from many places.

use std::collections::{HashSet, VecDeque};

use super::algorithms::{derive_object_key, FileKey, ObjectKey};
use super::rc4::rc4_crypt;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef, Stream};

/// Maximum depth of directly nested arrays and dictionaries.
pub const MAX_TRAVERSAL_DEPTH: u32 = 256;

/// Applies the per-object cipher to strings and streams.
///
/// RC4 is its own inverse, so the same traversal decrypts what it encrypted.
#[derive(Clone)]
pub struct GraphEncryptor<'a> {
    file_key: &'a FileKey,
    skip: Option<ObjectRef>,
}

/// Object replacements computed by a traversal but not yet written to the document.
#[derive(Debug, Default)]
pub(crate) struct StagedGraph {
    pub(crate) replacements: Vec<(ObjectRef, Object)>,
    pub(crate) reachable: usize,
    pub(crate) unreachable: usize,
}

impl StagedGraph {
    /// Write every staged replacement into the document.
    pub(crate) fn commit(self, doc: &mut Document) -> Result<()> {
        for (id, object) in self.replacements {
            doc.assign(id, object)?;
        }
        Ok(())
    }
}

impl<'a> GraphEncryptor<'a> {
    /// Create a traversal that uses `file_key` for every object.
    pub fn new(file_key: &'a FileKey) -> Self {
        Self {
            file_key,
            skip: None,
        }
    }

    /// Leave one object (the encryption dictionary) untouched.
    pub fn skipping(mut self, id: ObjectRef) -> Self {
        self.skip = Some(id);
        self
    }

    /// Encrypt the whole document in place.
    pub fn encrypt_document(&self, doc: &mut Document) -> Result<()> {
        let staged = self.stage(doc)?;
        log::debug!(
            "Encrypting {} objects ({} reachable from trailer, {} unreachable)",
            staged.replacements.len(),
            staged.reachable,
            staged.unreachable
        );
        staged.commit(doc)
    }

    /// Compute the encrypted value of every object without touching the document.
    ///
    /// Objects reachable from /Root and /Info are processed first, in breadth-first order,
    /// followed by any object nothing reaches.
    pub(crate) fn stage(&self, doc: &Document) -> Result<StagedGraph> {
        let mut staged = StagedGraph::default();
        let mut visited: HashSet<ObjectRef> = HashSet::with_capacity(doc.len());
        if let Some(skip) = self.skip {
            visited.insert(skip);
        }

        let trailer = doc.trailer();
        let mut pending: VecDeque<ObjectRef> =
            [trailer.root, trailer.info].into_iter().flatten().collect();

        while let Some(id) = pending.pop_front() {
            if !visited.insert(id) {
                continue;
            }
            let Some(object) = doc.get(id) else {
                log::warn!("Skipping reference to missing object {}", id);
                continue;
            };
            staged.reachable += 1;
            let refs = self.stage_object(id, object, &mut staged)?;
            pending.extend(refs);
        }

        for (id, object) in doc.enumerate_indirect_objects() {
            if !visited.insert(id) {
                continue;
            }
            staged.unreachable += 1;
            // Targets of these references are either visited already or come up later
            // in the enumeration.
            self.stage_object(id, object, &mut staged)?;
        }

        Ok(staged)
    }

    fn stage_object(
        &self,
        id: ObjectRef,
        object: &Object,
        staged: &mut StagedGraph,
    ) -> Result<Vec<ObjectRef>> {
        let mut refs = Vec::new();
        let key = derive_object_key(self.file_key, id);
        let updated = self.crypt_value(object, &key, id, 0, &mut refs)?;
        if updated != *object {
            staged.replacements.push((id, updated));
        }
        Ok(refs)
    }

    /// Encrypt (or decrypt) the value of a single indirect object.
    pub fn crypt_object(&self, id: ObjectRef, object: &Object) -> Result<Object> {
        let key = derive_object_key(self.file_key, id);
        self.crypt_value(object, &key, id, 0, &mut Vec::new())
    }

    fn crypt_value(
        &self,
        value: &Object,
        key: &ObjectKey,
        owner: ObjectRef,
        depth: u32,
        refs: &mut Vec<ObjectRef>,
    ) -> Result<Object> {
        if depth > MAX_TRAVERSAL_DEPTH {
            return Err(Error::RecursionLimitExceeded(MAX_TRAVERSAL_DEPTH));
        }

        match value {
            Object::String(bytes) | Object::HexString(bytes) => {
                Ok(Object::HexString(rc4_crypt(key, bytes)?))
            },
            Object::Stream(stream) => {
                if depth > 0 {
                    return Err(Error::InvalidStructure {
                        object: owner,
                        reason: "stream nested inside another value".to_string(),
                    });
                }
                // Dictionary is kept as is; only its references are queued
                for entry in stream.dict.values() {
                    find_references(entry, refs);
                }
                let data = rc4_crypt(key, &stream.data)?;
                Ok(Object::Stream(Stream::raw(stream.dict.clone(), data)))
            },
            Object::Dictionary(dict) => {
                let mut out = Dictionary::with_capacity(dict.len());
                for (name, entry) in dict {
                    let updated = match entry {
                        Object::Reference(r) => {
                            refs.push(*r);
                            entry.clone()
                        },
                        _ => self.crypt_value(entry, key, owner, depth + 1, refs)?,
                    };
                    out.insert(name.clone(), updated);
                }
                Ok(Object::Dictionary(out))
            },
            Object::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    let updated = match item {
                        Object::Reference(r) => {
                            refs.push(*r);
                            item.clone()
                        },
                        _ => self.crypt_value(item, key, owner, depth + 1, refs)?,
                    };
                    out.push(updated);
                }
                Ok(Object::Array(out))
            },
            Object::Reference(r) => {
                refs.push(*r);
                Ok(value.clone())
            },
            Object::Null
            | Object::Boolean(_)
            | Object::Integer(_)
            | Object::Real(_)
            | Object::Name(_) => Ok(value.clone()),
        }
    }
}

/// Encrypt every indirect object of `doc` except `encrypt_dict` with keys derived from
/// `file_key`.
///
/// On error the document is left unchanged.
pub fn encrypt_graph(
    doc: &mut Document,
    file_key: &FileKey,
    encrypt_dict: ObjectRef,
) -> Result<()> {
    GraphEncryptor::new(file_key)
        .skipping(encrypt_dict)
        .encrypt_document(doc)
}

/// Collect all object references within a value.
fn find_references(obj: &Object, refs: &mut Vec<ObjectRef>) {
    match obj {
        Object::Reference(r) => refs.push(*r),
        Object::Array(arr) => {
            for item in arr {
                find_references(item, refs);
            }
        },
        Object::Dictionary(dict) => {
            for value in dict.values() {
                find_references(value, refs);
            }
        },
        Object::Stream(stream) => {
            for value in stream.dict.values() {
                find_references(value, refs);
            }
        },
        _ => {},
    }
}
