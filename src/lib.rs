//! DES in Electronic Codebook mode with PKCS#7 style padding.
//!
//! ```
//! use des_ecb::{Des, ECB, Key};
//!
//! let mode = ECB::new(Des).unwrap();
//! let key = Key::new(vec![0x13, 0x34, 0x57, 0x79, 0x9B, 0xBC, 0xDF, 0xF1]);
//!
//! let ciphertext = des_ecb::encrypt(&mode, b"Hello123Hello123Hello123111", &key).unwrap();
//! assert_eq!(ciphertext.len(), 32);
//!
//! let plaintext = des_ecb::decrypt(&mode, &ciphertext, &key).unwrap();
//! assert_eq!(plaintext, b"Hello123Hello123Hello123111");
//! ```

pub mod ecb;
pub mod error;
pub mod key;
pub mod padding;
pub mod primitive;
pub mod stream;

pub use ecb::ECB;
pub use error::{Error, Result};
pub use key::{FixedKey, Key, KeySource, PassphraseFile, RandomKeySource};
pub use primitive::{Des, XorMask};
pub use stream::Action;

/// A keyed permutation over fixed size blocks.
///
/// The key is expanded once per operation; the block transforms work in
/// place on exactly `block_size()` bytes and cannot fail.
pub trait BlockCipher: Sync {
    type RoundKeys: Sync;

    fn block_size(&self) -> usize;
    fn key_size(&self) -> usize;

    /// Validate `key` and derive whatever the block transforms need.
    fn expand_key(&self, key: &Key) -> Result<Self::RoundKeys>;

    fn encrypt_block(&self, keys: &Self::RoundKeys, block: &mut [u8]);
    fn decrypt_block(&self, keys: &Self::RoundKeys, block: &mut [u8]);
}

/// Pad `plaintext` and encrypt it.
pub fn encrypt<C: BlockCipher>(mode: &ECB<C>, plaintext: &[u8], key: &Key) -> Result<Vec<u8>> {
    let padded = padding::pad(plaintext, mode.block_size());
    mode.encrypt(&padded, key)
}

/// Decrypt `ciphertext` and strip its padding.
pub fn decrypt<C: BlockCipher>(mode: &ECB<C>, ciphertext: &[u8], key: &Key) -> Result<Vec<u8>> {
    let padded = mode.decrypt(ciphertext, key)?;
    padding::unpad(&padded, mode.block_size())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;

    const MESSAGE: &[u8] = b"Hello123Hello123Hello123111";

    #[test]
    fn inv_encrypt_decrypt_random_keys() {
        let mut rng = rand::thread_rng();
        let mode = ECB::new(Des).unwrap();
        for _ in 0..256 {
            let num_bytes = rng.gen_range(0, 256);
            let mut plaintext = vec![0u8; num_bytes];
            rng.fill_bytes(&mut plaintext);

            let key = RandomKeySource.key(mode.key_size()).unwrap();
            let ciphertext = encrypt(&mode, &plaintext, &key).unwrap();
            assert!(ciphertext.len() > plaintext.len());
            assert_eq!(decrypt(&mode, &ciphertext, &key).unwrap(), plaintext);
        }
    }

    #[test]
    fn message_round_trip() {
        let mode = ECB::new(Des).unwrap();
        let key = RandomKeySource.key(8).unwrap();

        let ciphertext = encrypt(&mode, MESSAGE, &key).unwrap();
        assert_eq!(ciphertext.len(), 32);

        let padded = mode.decrypt(&ciphertext, &key).unwrap();
        assert_eq!(&padded[27..], &[5u8; 5]);
        assert_eq!(decrypt(&mode, &ciphertext, &key).unwrap(), MESSAGE);
    }

    #[test]
    fn aligned_message_gains_a_whole_block() {
        let mode = ECB::new(Des).unwrap();
        let key = RandomKeySource.key(8).unwrap();

        let ciphertext = encrypt(&mode, b"AAAAAAAAAAAAAAAA", &key).unwrap();
        assert_eq!(ciphertext.len(), 24);
        assert_eq!(ciphertext[..8], ciphertext[8..16]);

        let padded = mode.decrypt(&ciphertext, &key).unwrap();
        assert_eq!(&padded[16..], &[8u8; 8]);
    }

    #[test]
    fn corrupted_padding_is_detected() {
        let mode = ECB::new(Des).unwrap();
        let key = RandomKeySource.key(8).unwrap();
        let ciphertext = encrypt(&mode, MESSAGE, &key).unwrap();

        for &bad in &[0u8, 9, 0x80, 0xFF] {
            let mut padded = mode.decrypt(&ciphertext, &key).unwrap();
            *padded.last_mut().unwrap() = bad;
            assert!(matches!(
                padding::unpad(&padded, 8),
                Err(Error::InvalidPadding)
            ));
        }
    }

    #[test]
    fn tampered_last_block_fails_to_unpad() {
        let mode = ECB::new(XorMask::new(8, 8)).unwrap();
        let key = Key::new(b"k3y-m4sk".to_vec());
        let mut ciphertext = encrypt(&mode, MESSAGE, &key).unwrap();

        // With the XOR stand-in a flipped ciphertext bit flips the same
        // plaintext bit, so the last padding byte becomes 0x05 ^ 0x10.
        *ciphertext.last_mut().unwrap() ^= 0x10;
        assert!(matches!(
            decrypt(&mode, &ciphertext, &key),
            Err(Error::InvalidPadding)
        ));
    }

    #[test]
    fn distinct_error_kinds_surface() {
        let mode = ECB::new(Des).unwrap();
        let key = FixedKey(Key::new(vec![0; 8])).key(8).unwrap();

        assert!(matches!(
            decrypt(&mode, &[0u8; 7], &key),
            Err(Error::InvalidLength { .. })
        ));
        assert!(matches!(
            encrypt(&mode, MESSAGE, &Key::new(vec![0; 4])),
            Err(Error::InvalidKey { .. })
        ));
    }
}
