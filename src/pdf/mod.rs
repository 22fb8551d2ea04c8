//! PDF object model boundary
//!
//! Parsing and writing PDF files is left to an external object model. The
//! encryption walk only needs the narrow [`ObjectStore`] surface; [`Document`]
//! is a small in-memory implementation of it.

mod dict;
mod document;
mod object;
mod stream;

pub use dict::Dictionary;
pub use document::Document;
pub use object::Object;
pub use stream::Stream;

/// Object number and generation number of an indirect object
pub type ObjectId = (u32, u16);

/// Access to a document's indirect objects
pub trait ObjectStore {
    /// Error raised by the underlying object model
    type Error: std::error::Error + Send + Sync + 'static;

    /// Enumerate all indirect objects
    fn object_ids(&self) -> Result<Vec<ObjectId>, Self::Error>;

    /// Mutable access to one object, to classify it and replace its bytes
    fn object_mut(&mut self, id: ObjectId) -> Result<&mut Object, Self::Error>;

    /// First element of the trailer `/ID`, if the document has one
    fn file_id(&self) -> Option<Vec<u8>>;

    /// Record a generated file identifier in the trailer
    fn set_file_id(&mut self, file_id: Vec<u8>) -> Result<(), Self::Error>;

    /// Id of the `/Encrypt` dictionary, which is never encrypted itself
    fn encryption_dict_id(&self) -> Option<ObjectId>;

    /// Store the `/Encrypt` dictionary and reference it from the trailer
    fn set_encryption_dict(&mut self, dict: Dictionary) -> Result<ObjectId, Self::Error>;
}
