//! Minimal in-memory object store

use std::collections::BTreeMap;
use log::trace;

use crate::error::{PdfCryptoError, PdfCryptoResult};
use super::{Dictionary, Object, ObjectId, ObjectStore};

/// In-memory PDF object model
///
/// Holds indirect objects keyed by id plus the trailer entries the security
/// handler touches (`/ID` and `/Encrypt`).
#[derive(Debug, Clone, Default)]
pub struct Document {
    objects: BTreeMap<ObjectId, Object>,
    file_id: Option<Vec<u8>>,
    encrypt: Option<ObjectId>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an indirect object
    pub fn insert(&mut self, id: ObjectId, object: Object) -> Option<Object> {
        self.objects.insert(id, object)
    }

    /// Add an object under the next free object number, generation 0
    pub fn add_object(&mut self, object: Object) -> ObjectId {
        let id = (self.max_object_number() + 1, 0);
        self.objects.insert(id, object);
        id
    }

    /// Borrow an object
    pub fn get(&self, id: ObjectId) -> Option<&Object> {
        self.objects.get(&id)
    }

    /// Number of indirect objects
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the document holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Trailer `/ID` first element, if any
    pub fn trailer_id(&self) -> Option<&[u8]> {
        self.file_id.as_deref()
    }

    fn max_object_number(&self) -> u32 {
        self.objects.keys().map(|(number, _)| *number).max().unwrap_or(0)
    }
}

impl ObjectStore for Document {
    type Error = PdfCryptoError;

    fn object_ids(&self) -> PdfCryptoResult<Vec<ObjectId>> {
        Ok(self.objects.keys().copied().collect())
    }

    fn object_mut(&mut self, id: ObjectId) -> PdfCryptoResult<&mut Object> {
        self.objects
            .get_mut(&id)
            .ok_or(PdfCryptoError::ObjectNotFound(id.0, id.1))
    }

    fn file_id(&self) -> Option<Vec<u8>> {
        self.file_id.clone()
    }

    fn set_file_id(&mut self, file_id: Vec<u8>) -> PdfCryptoResult<()> {
        self.file_id = Some(file_id);
        Ok(())
    }

    fn encryption_dict_id(&self) -> Option<ObjectId> {
        self.encrypt
    }

    fn set_encryption_dict(&mut self, dict: Dictionary) -> PdfCryptoResult<ObjectId> {
        let id = match self.encrypt {
            Some(id) => {
                self.objects.insert(id, Object::Dictionary(dict));
                id
            }
            None => self.add_object(Object::Dictionary(dict)),
        };
        trace!("Encryption dictionary stored as {} {} R", id.0, id.1);
        self.encrypt = Some(id);
        Ok(id)
    }
}
