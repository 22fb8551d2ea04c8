//! File identifier generation

use std::time::{SystemTime, UNIX_EPOCH};

use log::warn;
use rand::rngs::{OsRng, StdRng};
use rand::{RngCore, SeedableRng};

use crate::error::{PdfCryptoError, PdfCryptoResult};

/// Length of a generated file identifier
pub const FILE_ID_LENGTH: usize = 16;

/// What to do when the operating system's random source fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileIdPolicy {
    /// Fall back to a clock-seeded PRNG and log a warning.
    ///
    /// The resulting identifier is predictable. It only feeds public values
    /// (the file key still depends on the password), but two documents may
    /// end up sharing an identifier.
    #[default]
    AllowWeakFallback,
    /// Fail with [`PdfCryptoError::SecureRandomUnavailable`]
    RequireSecure,
}

/// Generate a 16-byte file identifier from the OS random source
pub fn generate_file_id(policy: FileIdPolicy) -> PdfCryptoResult<Vec<u8>> {
    generate_file_id_with(&mut OsRng, policy)
}

/// Generate a file identifier from `secure`, applying `policy` on failure
pub fn generate_file_id_with<R: RngCore>(
    secure: &mut R,
    policy: FileIdPolicy,
) -> PdfCryptoResult<Vec<u8>> {
    let mut id = vec![0u8; FILE_ID_LENGTH];

    match secure.try_fill_bytes(&mut id) {
        Ok(()) => Ok(id),
        Err(err) => match policy {
            FileIdPolicy::RequireSecure => {
                Err(PdfCryptoError::SecureRandomUnavailable(err.to_string()))
            }
            FileIdPolicy::AllowWeakFallback => {
                warn!("Secure random source failed ({}); file ID falls back to a clock-seeded PRNG", err);
                weak_rng().fill_bytes(&mut id);
                Ok(id)
            }
        },
    }
}

fn weak_rng() -> StdRng {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0);
    StdRng::seed_from_u64(nanos ^ u64::from(std::process::id()).rotate_left(32))
}
