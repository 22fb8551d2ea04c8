//! Error types for PDF crypt library

use std::error::Error as StdError;
use thiserror::Error;

/// Boxed cause carried by [`PdfCryptoError::EncryptionFailed`]
pub type BoxedCause = Box<dyn StdError + Send + Sync + 'static>;

/// Main error type for PDF crypt operations
#[derive(Error, Debug)]
pub enum PdfCryptoError {
    /// Cipher key of an unusable length (RC4 accepts 1 to 256 bytes)
    #[error("Invalid key length: {0}")]
    InvalidKeyLength(usize),

    /// No secure random source and the policy forbids the weak fallback
    #[error("Secure random source unavailable: {0}")]
    SecureRandomUnavailable(String),

    /// Object missing from the document model
    #[error("Object not found: {0} {1} R")]
    ObjectNotFound(u32, u16),

    /// The document model failed while the document was being encrypted
    #[error("Encryption failed: {source}")]
    EncryptionFailed {
        /// Underlying document model error
        #[source]
        source: BoxedCause,
    },
}

/// Result type for PDF crypt operations
pub type PdfCryptoResult<T> = Result<T, PdfCryptoError>;

impl PdfCryptoError {
    /// Wrap a document model failure
    pub fn encryption_failed<E>(err: E) -> Self
    where
        E: Into<BoxedCause>,
    {
        Self::EncryptionFailed { source: err.into() }
    }

    /// Check if error is cryptographic
    pub fn is_crypto_error(&self) -> bool {
        matches!(self,
            Self::InvalidKeyLength(_) |
            Self::SecureRandomUnavailable(_)
        )
    }

    /// Check if error came from the document model
    pub fn is_store_error(&self) -> bool {
        matches!(self,
            Self::EncryptionFailed { .. } |
            Self::ObjectNotFound(..)
        )
    }
}
