//! Block cipher primitives usable with the ECB driver.

use des::cipher::generic_array::GenericArray;
use des::cipher::{BlockDecrypt, BlockEncrypt, KeyInit};

use crate::error::{Error, Result};
use crate::key::Key;
use crate::BlockCipher;

pub const DES_BLOCK_SIZE: usize = 8;
pub const DES_KEY_SIZE: usize = 8;

/// DES (FIPS 46-3). 64 bit blocks, 64 bit keys of which 56 bits are used.
#[derive(Debug, Clone, Copy, Default)]
pub struct Des;

impl BlockCipher for Des {
    type RoundKeys = des::Des;

    fn block_size(&self) -> usize {
        DES_BLOCK_SIZE
    }

    fn key_size(&self) -> usize {
        DES_KEY_SIZE
    }

    fn expand_key(&self, key: &Key) -> Result<des::Des> {
        des::Des::new_from_slice(key.as_bytes()).map_err(|_| Error::InvalidKey {
            expected: DES_KEY_SIZE,
            actual: key.len(),
        })
    }

    fn encrypt_block(&self, keys: &des::Des, block: &mut [u8]) {
        keys.encrypt_block(GenericArray::from_mut_slice(block));
    }

    fn decrypt_block(&self, keys: &des::Des, block: &mut [u8]) {
        keys.decrypt_block(GenericArray::from_mut_slice(block));
    }
}

/// XORs every block with the key repeated to the block length.
///
/// This is **not** a cipher. It is a cheap, obviously invertible stand-in
/// that supports any block size, so the mode and padding logic can be
/// exercised without a real primitive.
#[derive(Debug, Clone, Copy)]
pub struct XorMask {
    block_size: usize,
    key_size: usize,
}

impl XorMask {
    pub fn new(block_size: usize, key_size: usize) -> XorMask {
        XorMask {
            block_size,
            key_size,
        }
    }
}

impl BlockCipher for XorMask {
    type RoundKeys = Vec<u8>;

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn key_size(&self) -> usize {
        self.key_size
    }

    fn expand_key(&self, key: &Key) -> Result<Vec<u8>> {
        if key.len() != self.key_size || key.is_empty() {
            return Err(Error::InvalidKey {
                expected: self.key_size,
                actual: key.len(),
            });
        }
        Ok(key
            .as_bytes()
            .iter()
            .cycle()
            .take(self.block_size)
            .cloned()
            .collect())
    }

    fn encrypt_block(&self, mask: &Vec<u8>, block: &mut [u8]) {
        for (b, m) in block.iter_mut().zip(mask.iter()) {
            *b ^= m;
        }
    }

    fn decrypt_block(&self, mask: &Vec<u8>, block: &mut [u8]) {
        self.encrypt_block(mask, block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn des_known_answer() {
        let key = Key::new(0x133457799BBCDFF1u64.to_be_bytes().to_vec());
        let keys = Des.expand_key(&key).unwrap();

        let mut block = 0x0123456789ABCDEFu64.to_be_bytes();
        Des.encrypt_block(&keys, &mut block);
        assert_eq!(u64::from_be_bytes(block), 0x85E813540F0AB405);

        Des.decrypt_block(&keys, &mut block);
        assert_eq!(u64::from_be_bytes(block), 0x0123456789ABCDEF);
    }

    #[test]
    fn des_rejects_wrong_key_length() {
        for len in &[0usize, 7, 9, 16, 24] {
            let key = Key::new(vec![0x42; *len]);
            assert!(matches!(
                Des.expand_key(&key),
                Err(Error::InvalidKey { expected: 8, actual }) if actual == *len
            ));
        }
    }

    #[test]
    fn xor_mask_is_an_involution() {
        let cipher = XorMask::new(5, 3);
        let mask = cipher.expand_key(&Key::from(&b"abc"[..])).unwrap();
        assert_eq!(mask, b"abcab".to_vec());

        let mut block = *b"hello";
        cipher.encrypt_block(&mask, &mut block);
        assert_ne!(&block, b"hello");
        cipher.decrypt_block(&mask, &mut block);
        assert_eq!(&block, b"hello");
    }

    #[test]
    fn xor_mask_rejects_wrong_key_length() {
        let cipher = XorMask::new(8, 8);
        assert!(matches!(
            cipher.expand_key(&Key::from(&b"short"[..])),
            Err(Error::InvalidKey {
                expected: 8,
                actual: 5
            })
        ));
    }
}
