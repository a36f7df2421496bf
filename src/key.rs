//! Keys and the places they come from.

use std::fmt;
use std::fs;
use std::path::PathBuf;

use log::debug;
use rand::prelude::*;

use crate::error::{Error, Result};

/// Raw key bytes. Immutable once created.
#[derive(Clone, PartialEq, Eq)]
pub struct Key(Vec<u8>);

impl Key {
    pub fn new(bytes: Vec<u8>) -> Key {
        Key(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&[u8]> for Key {
    fn from(bytes: &[u8]) -> Key {
        Key(bytes.to_vec())
    }
}

// Never print key material.
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({} bytes)", self.0.len())
    }
}

/// Something that can hand out a key of a given length.
pub trait KeySource {
    fn key(&self, len: usize) -> Result<Key>;
}

/// Fresh key bytes from the thread local RNG.
pub struct RandomKeySource;

impl KeySource for RandomKeySource {
    fn key(&self, len: usize) -> Result<Key> {
        let mut buffer = vec![0u8; len];
        let mut rng = rand::thread_rng();
        rng.fill_bytes(&mut buffer);
        Ok(Key(buffer))
    }
}

/// Derive the key from the contents of a file by using the trailing
/// bytes of its MD5 digest.
pub struct PassphraseFile {
    path: PathBuf,
}

impl PassphraseFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> PassphraseFile {
        PassphraseFile { path: path.into() }
    }
}

impl KeySource for PassphraseFile {
    fn key(&self, len: usize) -> Result<Key> {
        let passphrase = fs::read(&self.path)?;
        let key = derive_key(&passphrase, len)?;
        debug!("derived {} byte key from {}", len, self.path.display());
        Ok(key)
    }
}

/// A key supplied up front, e.g. from the command line or a test.
pub struct FixedKey(pub Key);

impl KeySource for FixedKey {
    fn key(&self, len: usize) -> Result<Key> {
        if self.0.len() != len {
            return Err(Error::InvalidKey {
                expected: len,
                actual: self.0.len(),
            });
        }
        Ok(self.0.clone())
    }
}

pub(crate) fn derive_key(passphrase: &[u8], len: usize) -> Result<Key> {
    let digest = md5::compute(passphrase);
    if len > digest.0.len() {
        return Err(Error::InvalidKey {
            expected: len,
            actual: digest.0.len(),
        });
    }
    Ok(Key(digest.0[digest.0.len() - len..].to_vec()))
}
