//! Per-object key derivation and document encryption walk

use log::{debug, trace};

use crate::error::{PdfCryptoError, PdfCryptoResult};
use crate::pdf::{Dictionary, Object, ObjectId, ObjectStore};
use super::md5::{Md5, DIGEST_LENGTH};
use super::rc4::Rc4Provider;
use super::CryptoProvider;

/// Dictionary keys whose values are never encrypted
pub const SKIPPED_KEYS: [&str; 3] = ["Length", "Filter", "DecodeParms"];

/// Derive the RC4 key for one indirect object
///
/// MD5 over the file key, the low three bytes of the object number and the
/// two bytes of the generation, all little-endian, cut to
/// `min(file_key.len() + 5, 16)` bytes.
pub fn object_key(file_key: &[u8], object_number: u32, generation: u16) -> Vec<u8> {
    let mut hasher = Md5::new();
    hasher
        .update(file_key)
        .update(&object_number.to_le_bytes()[0..3])
        .update(&generation.to_le_bytes());
    let hash = hasher.finalize();

    let key_len = (file_key.len() + 5).min(DIGEST_LENGTH);
    hash[..key_len].to_vec()
}

/// Core engine for PDF object encryption
///
/// Holds no per-document state, so one engine can serve concurrent callers.
pub struct PdfCryptoEngine {
    provider: Box<dyn CryptoProvider>,
}

impl Default for PdfCryptoEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCryptoEngine {
    /// Create new cryptographic engine instance
    pub fn new() -> Self {
        Self {
            provider: Box::new(Rc4Provider),
        }
    }

    /// Encrypt one string or stream payload belonging to an object
    pub fn encrypt_payload(
        &self,
        payload: &[u8],
        file_key: &[u8],
        object_number: u32,
        generation: u16,
    ) -> PdfCryptoResult<Vec<u8>> {
        let mut data = payload.to_vec();
        self.process_in_place(&mut data, file_key, (object_number, generation))?;
        Ok(data)
    }

    /// Inverse of [`encrypt_payload`](Self::encrypt_payload); RC4 is symmetric
    pub fn decrypt_payload(
        &self,
        payload: &[u8],
        file_key: &[u8],
        object_number: u32,
        generation: u16,
    ) -> PdfCryptoResult<Vec<u8>> {
        self.encrypt_payload(payload, file_key, object_number, generation)
    }

    /// Encrypt every string and stream of every object in `store`
    ///
    /// The store's encryption dictionary is left alone. Failures raised by the
    /// store are wrapped in [`PdfCryptoError::EncryptionFailed`]. Returns the
    /// number of payloads encrypted.
    pub fn encrypt_objects<S: ObjectStore>(
        &self,
        store: &mut S,
        file_key: &[u8],
    ) -> PdfCryptoResult<usize> {
        let encrypt_dict = store.encryption_dict_id();
        let ids = store.object_ids().map_err(PdfCryptoError::encryption_failed)?;

        let mut payloads = 0;
        for id in ids {
            if Some(id) == encrypt_dict {
                trace!("Skipping encryption dictionary {} {} R", id.0, id.1);
                continue;
            }

            let object = store.object_mut(id).map_err(PdfCryptoError::encryption_failed)?;
            let count = self.encrypt_object(object, file_key, id)?;
            trace!("Object {} {} R: {} payloads encrypted", id.0, id.1, count);
            payloads += count;
        }

        debug!("Encrypted {} payloads", payloads);
        Ok(payloads)
    }

    fn encrypt_object(
        &self,
        object: &mut Object,
        file_key: &[u8],
        id: ObjectId,
    ) -> PdfCryptoResult<usize> {
        match object {
            Object::String(bytes) => {
                self.process_in_place(bytes, file_key, id)?;
                Ok(1)
            }
            Object::Stream(stream) => {
                // Readers expect cross-reference streams in clear text
                if stream.dict.has_type("XRef") {
                    return Ok(0);
                }
                let nested = self.encrypt_dictionary(&mut stream.dict, file_key, id)?;
                self.process_in_place(&mut stream.content, file_key, id)?;
                Ok(nested + 1)
            }
            Object::Dictionary(dict) => self.encrypt_dictionary(dict, file_key, id),
            Object::Array(items) => {
                let mut count = 0;
                for item in items.iter_mut() {
                    count += self.encrypt_object(item, file_key, id)?;
                }
                Ok(count)
            }
            _ => Ok(0),
        }
    }

    fn encrypt_dictionary(
        &self,
        dict: &mut Dictionary,
        file_key: &[u8],
        id: ObjectId,
    ) -> PdfCryptoResult<usize> {
        let mut count = 0;
        for (key, value) in dict.iter_mut() {
            if SKIPPED_KEYS.contains(&key.as_str()) {
                continue;
            }
            count += self.encrypt_object(value, file_key, id)?;
        }
        Ok(count)
    }

    fn process_in_place(
        &self,
        data: &mut [u8],
        file_key: &[u8],
        (object_number, generation): ObjectId,
    ) -> PdfCryptoResult<()> {
        let key = zeroize::Zeroizing::new(object_key(file_key, object_number, generation));
        self.provider.process_data(data, &key)
    }
}
