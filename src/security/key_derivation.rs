//! Revision 3 key derivation (PDF 1.7, algorithms 2, 3 and 5)

use log::trace;
use zeroize::Zeroizing;

use crate::crypto::md5::{self, Md5, DIGEST_LENGTH};
use crate::crypto::rc4::Rc4;
use crate::error::PdfCryptoResult;
use crate::Permissions;
use super::{pad_password, xor_key, EncryptionKey, PADDING, PASSWORD_LENGTH};

/// File encryption key length for 128-bit RC4
pub const FILE_KEY_LENGTH: usize = 16;

/// Extra MD5 passes applied to the key material
pub const HASH_ROUNDS: usize = 50;

/// RC4 passes used to build the O and U entries
pub const RC4_ROUNDS: u8 = 20;

/// Algorithm 2: compute the file encryption key
pub fn derive_file_key(
    user_password: &[u8],
    owner_value: &[u8; PASSWORD_LENGTH],
    permissions: Permissions,
    file_id: &[u8],
) -> EncryptionKey {
    let padded = Zeroizing::new(pad_password(user_password));

    let mut hasher = Md5::new();
    hasher
        .update(&padded[..])
        .update(owner_value)
        .update(&permissions.to_le_bytes())
        .update(file_id);
    let mut key = Zeroizing::new(hasher.finalize());

    for _ in 0..HASH_ROUNDS {
        *key = md5::digest(&key[..FILE_KEY_LENGTH]);
    }

    trace!("Derived {}-byte file key", FILE_KEY_LENGTH);
    EncryptionKey::new(key[..FILE_KEY_LENGTH].to_vec())
}

/// Algorithm 3: compute the O entry
///
/// An absent or empty owner password falls back to the user password.
pub fn derive_owner_value(
    owner_password: Option<&[u8]>,
    user_password: &[u8],
) -> PdfCryptoResult<[u8; PASSWORD_LENGTH]> {
    let effective = match owner_password {
        Some(owner) if !owner.is_empty() => owner,
        _ => user_password,
    };

    let mut rc4_key = Zeroizing::new(md5::digest(&pad_password(effective)));
    for _ in 0..HASH_ROUNDS {
        *rc4_key = md5::digest(&rc4_key[..]);
    }

    let mut o_value = pad_password(user_password);
    rc4_rounds(&rc4_key[..], &mut o_value)?;

    trace!("Derived O value");
    Ok(o_value)
}

/// Algorithm 5: compute the U entry
pub fn derive_user_value(
    file_key: &EncryptionKey,
    file_id: &[u8],
) -> PdfCryptoResult<[u8; PASSWORD_LENGTH]> {
    let mut hasher = Md5::new();
    hasher.update(&PADDING).update(file_id);
    let mut hash = hasher.finalize();

    rc4_rounds(file_key.as_bytes(), &mut hash)?;

    // Last 16 bytes are arbitrary padding; zeros keep output deterministic
    let mut u_value = [0u8; PASSWORD_LENGTH];
    u_value[..DIGEST_LENGTH].copy_from_slice(&hash);

    trace!("Derived U value");
    Ok(u_value)
}

/// RC4 `data` under `base ^ k` for k in 0..20, a fresh cipher per pass
fn rc4_rounds(base: &[u8], data: &mut [u8]) -> PdfCryptoResult<()> {
    (0..RC4_ROUNDS).try_for_each(|round| {
        let key = Zeroizing::new(xor_key(base, round));
        Rc4::new(&key)?.apply_keystream(data);
        Ok(())
    })
}
