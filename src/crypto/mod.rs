//! PDF cryptographic primitives and engine

pub mod md5;
pub mod rc4;
mod engine;

pub use engine::{object_key, PdfCryptoEngine, SKIPPED_KEYS};
use crate::error::PdfCryptoResult;

/// Trait for PDF object encryption/decryption
pub(crate) trait CryptoProvider: Send + Sync {
    fn process_data(&self, data: &mut [u8], key: &[u8]) -> PdfCryptoResult<()>;
}
