//! PDF Standard Security Handler for Rust
//!
//! Derives revision 3 (128-bit RC4) keys and encrypts PDF object payloads.
//! MD5 and RC4 are implemented in [`crypto`]; the document itself is reached
//! through the [`pdf::ObjectStore`] trait so any object model can be plugged in.

use std::fmt;
use std::sync::Arc;

use log::debug;

mod error;
pub mod crypto;
pub mod handlers;
pub mod pdf;
pub mod security;

pub use error::{BoxedCause, PdfCryptoError, PdfCryptoResult};
pub use handlers::StandardSecurityHandler;
pub use security::{EncryptionKey, FileIdPolicy};

use crypto::PdfCryptoEngine;
use pdf::{ObjectId, ObjectStore};

/// Supported encryption algorithms for PDF encryption
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncryptionAlgorithm {
    /// RC4 encryption with 128-bit key (PDF 1.4, V2 R3)
    Rc4_128,
}

impl EncryptionAlgorithm {
    /// `/V` entry of the encryption dictionary
    pub fn version(&self) -> i64 {
        match self {
            EncryptionAlgorithm::Rc4_128 => 2,
        }
    }

    /// `/R` entry of the encryption dictionary
    pub fn revision(&self) -> i64 {
        match self {
            EncryptionAlgorithm::Rc4_128 => 3,
        }
    }

    /// `/Length` entry of the encryption dictionary, in bits
    pub fn key_length_bits(&self) -> i64 {
        match self {
            EncryptionAlgorithm::Rc4_128 => 128,
        }
    }
}

impl fmt::Display for EncryptionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncryptionAlgorithm::Rc4_128 => write!(f, "RC4-128"),
        }
    }
}

/// PDF permissions flags (the `/P` entry)
///
/// Bits 1-2 are always clear; bits 7-8 and 13-32 are reserved and set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permissions(u32);

impl Permissions {
    /// Print the document
    pub const PRINT: u32 = 1 << 2;
    /// Modify the document
    pub const MODIFY: u32 = 1 << 3;
    /// Copy text and graphics
    pub const COPY: u32 = 1 << 4;
    /// Add or modify annotations
    pub const ANNOTATE: u32 = 1 << 5;
    /// Fill form fields
    pub const FILL_FORMS: u32 = 1 << 8;
    /// Extract text and graphics for accessibility
    pub const EXTRACT: u32 = 1 << 9;
    /// Assemble the document
    pub const ASSEMBLE: u32 = 1 << 10;
    /// Print in high quality
    pub const PRINT_HIGH: u32 = 1 << 11;

    const RESERVED: u32 = 0xFFFF_F0C0;

    /// Everything allowed, `0xFFFFFFFC`
    pub const ALL: Permissions = Permissions(0xFFFF_FFFC);

    /// Build from flag constants; reserved bits are fixed up
    pub fn new(flags: u32) -> Self {
        Self((flags | Self::RESERVED) & !0b11)
    }

    /// Take raw bits as found in an existing `/P` entry
    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Get raw permission bits
    pub fn bits(&self) -> u32 {
        self.0
    }

    /// Value written as the `/P` integer
    pub fn as_signed(&self) -> i32 {
        self.0 as i32
    }

    /// Little-endian bytes fed into the file key hash
    pub fn to_le_bytes(&self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Check if specific permission is granted
    pub fn has_permission(&self, permission: u32) -> bool {
        (self.0 & permission) == permission
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::ALL
    }
}

/// Settings for encrypting one document
#[derive(Clone, Default)]
pub struct EncryptionOptions {
    user_password: String,
    owner_password: Option<String>,
    permissions: Permissions,
    file_id: Option<Vec<u8>>,
    file_id_policy: FileIdPolicy,
}

impl EncryptionOptions {
    /// Options for the given user password, everything else defaulted
    pub fn new(user_password: impl Into<String>) -> Self {
        Self {
            user_password: user_password.into(),
            ..Self::default()
        }
    }

    /// Owner password; empty or unset means the user password is reused
    pub fn owner_password(mut self, password: impl Into<String>) -> Self {
        self.owner_password = Some(password.into());
        self
    }

    /// Permission flags
    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Use this file identifier instead of the document's own
    pub fn file_id(mut self, file_id: impl Into<Vec<u8>>) -> Self {
        self.file_id = Some(file_id.into());
        self
    }

    /// How to react when no secure random source is available
    pub fn file_id_policy(mut self, policy: FileIdPolicy) -> Self {
        self.file_id_policy = policy;
        self
    }
}

impl fmt::Debug for EncryptionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionOptions")
            .field("permissions", &self.permissions)
            .field("file_id", &self.file_id.as_ref().map(hex::encode))
            .field("file_id_policy", &self.file_id_policy)
            .finish_non_exhaustive()
    }
}

/// Result of encrypting a document
#[derive(Debug)]
pub struct EncryptionInfo {
    /// The encryption algorithm used
    pub algorithm: EncryptionAlgorithm,
    /// Id of the stored `/Encrypt` dictionary
    pub encrypt_dict: ObjectId,
    /// Number of string and stream payloads encrypted
    pub payloads: usize,
    /// Whether the file identifier was generated here
    pub generated_file_id: bool,
}

/// Main PDF encryption interface
#[derive(Clone)]
pub struct PdfCrypto {
    engine: Arc<PdfCryptoEngine>,
}

impl Default for PdfCrypto {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCrypto {
    /// Create a new PdfCrypto instance
    pub fn new() -> Self {
        Self {
            engine: Arc::new(PdfCryptoEngine::new()),
        }
    }

    /// Build the security handler for `options` and the given file identifier
    pub fn security_handler(
        &self,
        options: &EncryptionOptions,
        file_id: Vec<u8>,
    ) -> PdfCryptoResult<StandardSecurityHandler> {
        StandardSecurityHandler::new(
            options.user_password.as_bytes(),
            options.owner_password.as_deref().map(str::as_bytes),
            options.permissions,
            file_id,
        )
    }

    /// Encrypt every string and stream in `store` and install `/Encrypt`
    ///
    /// The file identifier comes from the options, then the store, and is
    /// generated (and written back to the store) when neither has one. An
    /// empty identifier counts as missing.
    pub fn encrypt_document<S: ObjectStore>(
        &self,
        store: &mut S,
        options: &EncryptionOptions,
    ) -> PdfCryptoResult<EncryptionInfo> {
        let file_id = options
            .file_id
            .clone()
            .filter(|id| !id.is_empty())
            .or_else(|| store.file_id().filter(|id| !id.is_empty()));
        let (file_id, generated_file_id) = match file_id {
            Some(id) => (id, false),
            None => {
                let id = security::generate_file_id(options.file_id_policy)?;
                store
                    .set_file_id(id.clone())
                    .map_err(PdfCryptoError::encryption_failed)?;
                debug!("Generated file ID {}", hex::encode(&id));
                (id, true)
            }
        };

        let handler = self.security_handler(options, file_id)?;
        let payloads = self
            .engine
            .encrypt_objects(store, handler.file_key().as_bytes())?;

        let encrypt_dict = store
            .set_encryption_dict(handler.to_dict())
            .map_err(PdfCryptoError::encryption_failed)?;
        debug!(
            "Installed {} encryption dictionary as {} {} R",
            handler.algorithm(),
            encrypt_dict.0,
            encrypt_dict.1
        );

        Ok(EncryptionInfo {
            algorithm: handler.algorithm(),
            encrypt_dict,
            payloads,
            generated_file_id,
        })
    }

    /// Encrypt one payload of object `object_number generation R`
    pub fn encrypt_payload(
        &self,
        payload: &[u8],
        file_key: &EncryptionKey,
        object_number: u32,
        generation: u16,
    ) -> PdfCryptoResult<Vec<u8>> {
        self.engine
            .encrypt_payload(payload, file_key.as_bytes(), object_number, generation)
    }

    /// Decrypt one payload; the same keystream as encryption
    pub fn decrypt_payload(
        &self,
        payload: &[u8],
        file_key: &EncryptionKey,
        object_number: u32,
        generation: u16,
    ) -> PdfCryptoResult<Vec<u8>> {
        self.engine
            .decrypt_payload(payload, file_key.as_bytes(), object_number, generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::{Dictionary, Document, Object};
    use std::io;
    use test_log::test;

    #[test]
    fn test_permissions() {
        let perms = Permissions::new(Permissions::PRINT | Permissions::COPY);
        assert!(perms.has_permission(Permissions::PRINT));
        assert!(perms.has_permission(Permissions::COPY));
        assert!(!perms.has_permission(Permissions::MODIFY));
        assert_eq!(perms.bits(), 0xFFFF_F0D4);
    }

    #[test]
    fn test_all_permissions() {
        let all = Permissions::new(
            Permissions::PRINT
                | Permissions::MODIFY
                | Permissions::COPY
                | Permissions::ANNOTATE
                | Permissions::FILL_FORMS
                | Permissions::EXTRACT
                | Permissions::ASSEMBLE
                | Permissions::PRINT_HIGH,
        );
        assert_eq!(all, Permissions::ALL);
        assert_eq!(all.as_signed(), -4);
        assert_eq!(all.to_le_bytes(), [0xFC, 0xFF, 0xFF, 0xFF]);
        assert_eq!(Permissions::new(0b11).bits() & 0b11, 0);
    }

    #[test]
    fn test_algorithm_parameters() {
        let algorithm = EncryptionAlgorithm::Rc4_128;
        assert_eq!((algorithm.version(), algorithm.revision()), (2, 3));
        assert_eq!(algorithm.key_length_bits(), 128);
        assert_eq!(algorithm.to_string(), "RC4-128");
    }

    #[test]
    fn test_generates_missing_file_id() {
        let mut doc = Document::new();
        doc.insert((1, 0), Object::String(b"text".to_vec()));

        let info = PdfCrypto::new()
            .encrypt_document(&mut doc, &EncryptionOptions::new("pw"))
            .unwrap();

        assert!(info.generated_file_id);
        assert_eq!(doc.trailer_id().map(<[u8]>::len), Some(16));
        assert_eq!(info.payloads, 1);
    }

    #[test]
    fn test_empty_file_id_is_replaced() {
        let mut doc = Document::new();
        doc.insert((1, 0), Object::String(b"text".to_vec()));
        doc.set_file_id(Vec::new()).unwrap();

        let options = EncryptionOptions::new("pw").file_id(Vec::new());
        let info = PdfCrypto::new().encrypt_document(&mut doc, &options).unwrap();

        assert!(info.generated_file_id);
        assert_eq!(doc.trailer_id().map(<[u8]>::len), Some(16));
    }

    #[test]
    fn test_crypto_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PdfCrypto>();
        assert_send_sync::<PdfCryptoEngine>();
    }

    #[test]
    fn test_parallel_payloads_match_serial() {
        let crypto = PdfCrypto::new();
        let handler = crypto
            .security_handler(&EncryptionOptions::new("pw"), vec![0u8; 16])
            .unwrap();
        let key = handler.file_key();
        let payload = b"shared payload across objects";

        let serial: Vec<Vec<u8>> = (1..64u32)
            .map(|n| crypto.encrypt_payload(payload, key, n, 0).unwrap())
            .collect();

        let parallel: Vec<Vec<u8>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (1..64u32)
                .map(|n| {
                    let crypto = &crypto;
                    scope.spawn(move || crypto.encrypt_payload(payload, key, n, 0).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(parallel, serial);
    }

    #[test]
    fn test_options_debug_hides_passwords() {
        let options = EncryptionOptions::new("user-secret").owner_password("owner-secret");
        let rendered = format!("{:?}", options);
        assert!(!rendered.contains("secret"));
    }

    /// Store whose object model fails on access
    struct FailingStore;

    impl ObjectStore for FailingStore {
        type Error = io::Error;

        fn object_ids(&self) -> Result<Vec<ObjectId>, io::Error> {
            Ok(vec![(1, 0)])
        }

        fn object_mut(&mut self, _id: ObjectId) -> Result<&mut Object, io::Error> {
            Err(io::Error::new(io::ErrorKind::InvalidData, "broken xref entry"))
        }

        fn file_id(&self) -> Option<Vec<u8>> {
            Some(vec![0u8; 16])
        }

        fn set_file_id(&mut self, _file_id: Vec<u8>) -> Result<(), io::Error> {
            Ok(())
        }

        fn encryption_dict_id(&self) -> Option<ObjectId> {
            None
        }

        fn set_encryption_dict(&mut self, _dict: Dictionary) -> Result<ObjectId, io::Error> {
            Ok((2, 0))
        }
    }

    #[test]
    fn test_store_failure_is_wrapped() {
        let err = PdfCrypto::new()
            .encrypt_document(&mut FailingStore, &EncryptionOptions::new("pw"))
            .unwrap_err();

        assert!(err.is_store_error());
        assert_eq!(err.to_string(), "Encryption failed: broken xref entry");
    }
}
