//! RC4 stream cipher and its provider

use log::trace;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{PdfCryptoError, PdfCryptoResult};
use super::CryptoProvider;

/// Largest key the key schedule can consume
pub const MAX_KEY_LENGTH: usize = 256;

/// RC4 cipher state
///
/// Each instance is one keystream. Feeding two unrelated buffers through the
/// same instance continues the keystream, so build a new one per payload.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Rc4 {
    table: [u8; 256],
    i: u8,
    j: u8,
}

impl Rc4 {
    /// Run the key schedule; keys must be 1 to 256 bytes long
    pub fn new(key: &[u8]) -> PdfCryptoResult<Self> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(PdfCryptoError::InvalidKeyLength(key.len()));
        }

        let mut table = [0u8; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = i as u8;
        }

        let mut j = 0u8;
        for i in 0..256 {
            j = j.wrapping_add(table[i]).wrapping_add(key[i % key.len()]);
            table.swap(i, j as usize);
        }

        Ok(Self { table, i: 0, j: 0 })
    }

    fn next_byte(&mut self) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.table[self.i as usize]);
        self.table.swap(self.i as usize, self.j as usize);
        let k = self.table[self.i as usize].wrapping_add(self.table[self.j as usize]);
        self.table[k as usize]
    }

    /// XOR the keystream into `data`
    pub fn apply_keystream(&mut self, data: &mut [u8]) {
        for byte in data.iter_mut() {
            *byte ^= self.next_byte();
        }
    }

    /// Encrypt or decrypt `data` into a new buffer of the same length
    pub fn process(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = data.to_vec();
        self.apply_keystream(&mut out);
        out
    }
}

/// Encrypt or decrypt `data` under a fresh cipher keyed with `key`
pub fn rc4_crypt(key: &[u8], data: &[u8]) -> PdfCryptoResult<Vec<u8>> {
    Ok(Rc4::new(key)?.process(data))
}

/// RC4 encryption provider
#[derive(Debug, Default, Clone, Copy)]
pub struct Rc4Provider;

impl CryptoProvider for Rc4Provider {
    fn process_data(&self, data: &mut [u8], key: &[u8]) -> PdfCryptoResult<()> {
        trace!("RC4 over {} bytes with {}-byte key", data.len(), key.len());
        Rc4::new(key)?.apply_keystream(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(b"Key".as_slice(), b"Plaintext".as_slice(), "bbf316e8d940af0ad3")]
    #[case(b"Wiki".as_slice(), b"pedia".as_slice(), "1021bf0420")]
    #[case(b"Secret".as_slice(), b"Attack at dawn".as_slice(), "45a01f645fc35b383552544b9bf5")]
    fn test_known_vectors(#[case] key: &[u8], #[case] plain: &[u8], #[case] cipher: &str) {
        assert_eq!(hex::encode(rc4_crypt(key, plain).unwrap()), cipher);
    }

    #[test]
    fn test_rc4_known_vector() {
        let provider = Rc4Provider;
        let key = hex::decode("0102030405").unwrap();
        let mut data = hex::decode("00112233445566778899").unwrap();
        let expected = hex::decode("b2284136b468a650445a").unwrap();

        provider.process_data(&mut data, &key).unwrap();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_symmetric_with_fresh_instances() {
        let key = b"pdf object key";
        for len in [0usize, 1, 5, 255, 256, 1024] {
            let data: Vec<u8> = (0..len).map(|i| (i % 256) as u8).collect();
            let encrypted = Rc4::new(key).unwrap().process(&data);
            let decrypted = Rc4::new(key).unwrap().process(&encrypted);
            assert_eq!(decrypted, data);
        }
    }

    #[test]
    fn test_reused_state_continues_keystream() {
        let key = b"continuation";
        let data = b"same payload";

        let mut shared = Rc4::new(key).unwrap();
        let first = shared.process(data);
        let second = shared.process(data);

        assert_eq!(first, Rc4::new(key).unwrap().process(data));
        assert_ne!(first, second);
    }

    #[test]
    fn test_rejects_bad_key_lengths() {
        assert!(matches!(Rc4::new(&[]), Err(PdfCryptoError::InvalidKeyLength(0))));
        assert!(matches!(
            Rc4::new(&[7u8; 257]),
            Err(PdfCryptoError::InvalidKeyLength(257))
        ));
        assert!(Rc4::new(&[7u8; 256]).is_ok());
    }

    #[test]
    fn test_provider_rejects_empty_key() {
        let mut data = b"Test data".to_vec();

        assert!(matches!(
            Rc4Provider.process_data(&mut data, &[]),
            Err(PdfCryptoError::InvalidKeyLength(0))
        ));
        assert_eq!(data, b"Test data");
        assert!(Rc4Provider.process_data(&mut data, &[1, 2, 3]).is_ok());
    }

    #[test]
    fn test_empty_data() {
        let provider = Rc4Provider;
        let mut data = Vec::new();
        assert!(provider.process_data(&mut data, &[1u8; 5]).is_ok());
        assert!(data.is_empty());
    }

    #[test]
    fn test_matches_reference_crate() {
        use ::rc4::consts::U16;
        use ::rc4::{KeyInit, StreamCipher};

        let key = hex::decode("1aed32b81337ef8a682aa234c2dbacf5").unwrap();
        let data: Vec<u8> = (0..300).map(|i| (i * 7 % 256) as u8).collect();

        let mut reference = data.clone();
        let mut cipher = ::rc4::Rc4::<U16>::new_from_slice(&key).unwrap();
        cipher.apply_keystream(&mut reference);

        assert_eq!(rc4_crypt(&key, &data).unwrap(), reference);
    }
}
