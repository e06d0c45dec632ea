//! In-memory PDF object graph.
//!
//! A [`Document`] is an arena of indirect objects keyed by [`ObjectRef`] plus the
//! [`Trailer`] that ties them together. Parsing bytes into this shape and serializing it
//! back out is done elsewhere; this module only provides the operations the encryption
//! engine needs.

use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::object::{Dictionary, Object, ObjectRef};

/// Trailer entries the encryption engine reads and writes.
///
/// PDF Spec: Section 7.5.5 - File Trailer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Trailer {
    /// File identifier array (/ID): original ID and current ID
    pub id: Option<[Vec<u8>; 2]>,
    /// Active encryption dictionary (/Encrypt)
    pub encrypt: Option<ObjectRef>,
    /// Document catalog (/Root)
    pub root: Option<ObjectRef>,
    /// Document information dictionary (/Info)
    pub info: Option<ObjectRef>,
}

impl Trailer {
    /// First element of the /ID array, the one key derivation consumes.
    pub fn file_id(&self) -> Option<&[u8]> {
        self.id.as_ref().map(|[original, _]| original.as_slice())
    }

    /// Build the trailer dictionary for a document with `size` xref entries.
    pub fn to_object(&self, size: u32) -> Object {
        let mut dict = Dictionary::new();
        dict.insert("Size".to_string(), Object::Integer(size as i64));
        if let Some(root) = self.root {
            dict.insert("Root".to_string(), Object::Reference(root));
        }
        if let Some(info) = self.info {
            dict.insert("Info".to_string(), Object::Reference(info));
        }
        if let Some(encrypt) = self.encrypt {
            dict.insert("Encrypt".to_string(), Object::Reference(encrypt));
        }
        if let Some([original, current]) = &self.id {
            dict.insert(
                "ID".to_string(),
                Object::Array(vec![
                    Object::HexString(original.clone()),
                    Object::HexString(current.clone()),
                ]),
            );
        }
        Object::Dictionary(dict)
    }
}

/// A mutable collection of indirect objects.
#[derive(Debug, Clone)]
pub struct Document {
    objects: BTreeMap<ObjectRef, Object>,
    trailer: Trailer,
    // Wider than an object number so that u32::MAX can be used and then exhausted
    next_id: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document.
    pub fn new() -> Self {
        Self::with_trailer(Trailer::default())
    }

    /// Create an empty document with an existing trailer.
    pub fn with_trailer(trailer: Trailer) -> Self {
        Self {
            objects: BTreeMap::new(),
            trailer,
            // Object 0 is reserved for the head of the free list
            next_id: 1,
        }
    }

    /// Add a new indirect object and return its identity.
    ///
    /// Returns [`Error::ObjectNumbersExhausted`] once the highest object number is taken.
    pub fn register(&mut self, value: impl Into<Object>) -> Result<ObjectRef> {
        let number = u32::try_from(self.next_id).map_err(|_| Error::ObjectNumbersExhausted)?;
        let id = ObjectRef::new(number, 0);
        self.next_id += 1;
        self.objects.insert(id, value.into());
        Ok(id)
    }

    /// Insert an object at a caller-chosen identity, replacing any previous value.
    ///
    /// Used by loaders that already know object numbers. Later [`register`](Self::register)
    /// calls allocate numbers above the highest one inserted.
    pub fn insert(&mut self, id: ObjectRef, value: impl Into<Object>) {
        self.next_id = self.next_id.max(u64::from(id.id) + 1);
        self.objects.insert(id, value.into());
    }

    /// Replace the object stored at `id`.
    pub fn assign(&mut self, id: ObjectRef, value: impl Into<Object>) -> Result<()> {
        match self.objects.get_mut(&id) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            },
            None => Err(Error::ObjectNotFound(id.id, id.gen)),
        }
    }

    /// Resolve a reference to its target value.
    pub fn lookup(&self, id: ObjectRef) -> Result<&Object> {
        self.get(id).ok_or(Error::ObjectNotFound(id.id, id.gen))
    }

    /// Get an object if it exists.
    pub fn get(&self, id: ObjectRef) -> Option<&Object> {
        self.objects.get(&id)
    }

    /// Check whether an indirect object exists at `id`.
    pub fn contains(&self, id: ObjectRef) -> bool {
        self.objects.contains_key(&id)
    }

    /// Iterate all indirect objects in ascending identity order.
    pub fn enumerate_indirect_objects(&self) -> impl Iterator<Item = (ObjectRef, &Object)> + '_ {
        self.objects.iter().map(|(id, obj)| (*id, obj))
    }

    /// Number of indirect objects.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the document holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Object number the next [`register`](Self::register) call will use, if any is left.
    pub fn next_object_id(&self) -> Option<u32> {
        u32::try_from(self.next_id).ok()
    }

    /// Get the trailer.
    pub fn trailer(&self) -> &Trailer {
        &self.trailer
    }

    /// Get the trailer for modification.
    pub fn trailer_mut(&mut self) -> &mut Trailer {
        &mut self.trailer
    }
}
