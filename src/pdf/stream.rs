//! PDF stream object

use super::{Dictionary, Object};

/// PDF stream object
///
/// `content` holds the bytes exactly as stored in the file, after any
/// filters; encryption is applied on top of them.
#[derive(Debug, Clone, PartialEq)]
pub struct Stream {
    /// Stream dictionary
    pub dict: Dictionary,
    /// Raw stream data
    pub content: Vec<u8>,
}

impl Stream {
    /// Create a stream, keeping `/Length` in step with the content
    pub fn new(mut dict: Dictionary, content: Vec<u8>) -> Self {
        dict.set("Length", Object::Integer(content.len() as i64));
        Self { dict, content }
    }
}
