//! Password normalization and key material for the Standard Security Handler

mod file_id;
mod key_derivation;

pub use file_id::{generate_file_id, generate_file_id_with, FileIdPolicy, FILE_ID_LENGTH};
pub use key_derivation::{
    derive_file_key, derive_owner_value, derive_user_value, FILE_KEY_LENGTH, HASH_ROUNDS,
    RC4_ROUNDS,
};

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a padded password, and of the O and U entries
pub const PASSWORD_LENGTH: usize = 32;

/// Password padding string defined by ISO 32000
pub const PADDING: [u8; PASSWORD_LENGTH] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41,
    0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80,
    0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Pad or truncate a password to exactly 32 bytes
pub fn pad_password(password: &[u8]) -> [u8; PASSWORD_LENGTH] {
    let len = password.len().min(PASSWORD_LENGTH);
    let mut padded = [0u8; PASSWORD_LENGTH];
    padded[..len].copy_from_slice(&password[..len]);
    padded[len..].copy_from_slice(&PADDING[..PASSWORD_LENGTH - len]);
    padded
}

/// XOR every byte of `base` with `index`; the result keeps `base`'s length
pub fn xor_key(base: &[u8], index: u8) -> Vec<u8> {
    base.iter().map(|byte| byte ^ index).collect()
}

/// File encryption key, wiped on drop
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionKey(Vec<u8>);

impl EncryptionKey {
    /// Wrap raw key bytes
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Raw key bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Key length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for EncryptionKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptionKey(<{} bytes redacted>)", self.0.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_password_padding() {
        let padded = pad_password(b"user");
        assert_eq!(
            hex::encode(padded),
            "7573657228bf4e5e4e758a4164004e56fffa01082e2e00b6d0683e802f0ca9fe"
        );
    }

    #[test]
    fn test_empty_password_is_padding() {
        assert_eq!(pad_password(b""), PADDING);
    }

    #[test]
    fn test_padding_law() {
        for len in 0..=40usize {
            let password: Vec<u8> = (0..len).map(|i| b'a' + (i % 26) as u8).collect();
            let padded = pad_password(&password);

            if len >= PASSWORD_LENGTH {
                assert_eq!(&padded[..], &password[..PASSWORD_LENGTH]);
            } else {
                assert_eq!(&padded[..len], &password[..]);
                assert_eq!(&padded[len..], &PADDING[..PASSWORD_LENGTH - len]);
            }
        }
    }

    #[test]
    fn test_xor_key_keeps_length() {
        let base = [0x01, 0x02, 0x03, 0x04, 0x05];
        assert_eq!(xor_key(&base, 0), base.to_vec());
        assert_eq!(xor_key(&base, 0x13), vec![0x12, 0x11, 0x10, 0x17, 0x16]);
    }

    #[test]
    fn test_key_debug_is_redacted() {
        let key = EncryptionKey::new(vec![0xAB; 16]);
        assert_eq!(format!("{:?}", key), "EncryptionKey(<16 bytes redacted>)");
    }
}
