//! Standard Security Handler, revision 3

use std::fmt;
use log::debug;

use crate::error::PdfCryptoResult;
use crate::pdf::{Dictionary, Object};
use crate::security::{
    derive_file_key, derive_owner_value, derive_user_value, EncryptionKey, PASSWORD_LENGTH,
};
use crate::{EncryptionAlgorithm, Permissions};

/// Standard security handler for password-based encryption
///
/// Holds everything the `/Encrypt` dictionary needs plus the file key used
/// to encrypt object payloads. The key is wiped when the handler drops.
#[derive(Clone)]
pub struct StandardSecurityHandler {
    algorithm: EncryptionAlgorithm,
    permissions: Permissions,
    o_value: [u8; PASSWORD_LENGTH],
    u_value: [u8; PASSWORD_LENGTH],
    file_id: Vec<u8>,
    encryption_key: EncryptionKey,
}

impl StandardSecurityHandler {
    /// Derive O, file key and U for one document
    pub fn new(
        user_password: &[u8],
        owner_password: Option<&[u8]>,
        permissions: Permissions,
        file_id: Vec<u8>,
    ) -> PdfCryptoResult<Self> {
        let o_value = derive_owner_value(owner_password, user_password)?;
        let encryption_key = derive_file_key(user_password, &o_value, permissions, &file_id);
        let u_value = derive_user_value(&encryption_key, &file_id)?;

        let algorithm = EncryptionAlgorithm::Rc4_128;
        debug!(
            "Standard security handler ready: V{} R{} {}-bit",
            algorithm.version(),
            algorithm.revision(),
            algorithm.key_length_bits()
        );

        Ok(Self {
            algorithm,
            permissions,
            o_value,
            u_value,
            file_id,
            encryption_key,
        })
    }

    /// Encryption algorithm in use
    pub fn algorithm(&self) -> EncryptionAlgorithm {
        self.algorithm
    }

    /// Permission flags
    pub fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// The O entry
    pub fn o_value(&self) -> &[u8; PASSWORD_LENGTH] {
        &self.o_value
    }

    /// The U entry
    pub fn u_value(&self) -> &[u8; PASSWORD_LENGTH] {
        &self.u_value
    }

    /// File identifier the key was derived from
    pub fn file_id(&self) -> &[u8] {
        &self.file_id
    }

    /// File encryption key; keep it in process
    pub fn file_key(&self) -> &EncryptionKey {
        &self.encryption_key
    }

    /// Build the `/Encrypt` dictionary
    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::new();
        dict.set("Filter", Object::Name("Standard".to_string()));
        dict.set("V", Object::Integer(self.algorithm.version()));
        dict.set("R", Object::Integer(self.algorithm.revision()));
        dict.set("Length", Object::Integer(self.algorithm.key_length_bits()));
        dict.set("O", Object::String(self.o_value.to_vec()));
        dict.set("U", Object::String(self.u_value.to_vec()));
        dict.set("P", Object::Integer(i64::from(self.permissions.as_signed())));
        dict
    }
}

impl fmt::Debug for StandardSecurityHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardSecurityHandler")
            .field("algorithm", &self.algorithm)
            .field("permissions", &self.permissions)
            .field("o_value", &hex::encode(self.o_value))
            .field("u_value", &hex::encode(self.u_value))
            .field("file_id", &hex::encode(&self.file_id))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_log::test;

    fn handler() -> StandardSecurityHandler {
        StandardSecurityHandler::new(b"secret123", None, Permissions::ALL, vec![0u8; 16]).unwrap()
    }

    #[test]
    fn test_handler_values() {
        let handler = handler();
        assert_eq!(
            hex::encode(handler.o_value()),
            "6ac47d9490dc60c775bde5c40479e441286f36409d935e3e0c8cce460e9576a4"
        );
        assert_eq!(
            hex::encode(handler.file_key().as_bytes()),
            "1aed32b81337ef8a682aa234c2dbacf5"
        );
        assert_eq!(
            hex::encode(handler.u_value()),
            "008eb508b815e84dd73ab366d17151dd00000000000000000000000000000000"
        );
    }

    #[test]
    fn test_encryption_dictionary() {
        let handler = handler();
        let dict = handler.to_dict();

        assert_eq!(dict.get_name("Filter"), Some("Standard"));
        assert_eq!(dict.get_integer("V"), Some(2));
        assert_eq!(dict.get_integer("R"), Some(3));
        assert_eq!(dict.get_integer("Length"), Some(128));
        assert_eq!(dict.get_integer("P"), Some(-4));
        assert_eq!(dict.get_string("O"), Some(&handler.o_value()[..]));
        assert_eq!(dict.get_string("U"), Some(&handler.u_value()[..]));
    }

    #[test]
    fn test_debug_hides_key() {
        let rendered = format!("{:?}", handler());
        assert!(rendered.contains("o_value"));
        assert!(!rendered.contains("1aed32b81337ef8a682aa234c2dbacf5"));
    }
}
