//! Electronic Codebook mode.
//!
//! WARNING: ECB lacks diffusion. Equal plaintext blocks under the same key
//! always yield equal ciphertext blocks, which leaks the structure of the
//! message. It is provided because it is what the data format requires,
//! not because it is a good idea.

use std::thread;

use log::{debug, trace};

use crate::error::{Error, Result};
use crate::key::Key;
use crate::padding;
use crate::BlockCipher;

/// Below this many blocks per worker the input is processed on the
/// calling thread.
pub const MIN_BLOCKS_PER_WORKER: usize = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    Forward,
    Inverse,
}

pub struct ECB<C: BlockCipher> {
    cipher: C,
    workers: usize,
}

impl<C: BlockCipher> ECB<C> {
    pub fn new(cipher: C) -> Result<ECB<C>> {
        padding::check_block_size(cipher.block_size())?;
        Ok(ECB {
            cipher,
            workers: num_cpus::get(),
        })
    }

    /// Limit the number of threads a single call may use.
    pub fn with_workers(mut self, workers: usize) -> ECB<C> {
        self.workers = workers.max(1);
        self
    }

    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    pub fn key_size(&self) -> usize {
        self.cipher.key_size()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Encrypt already padded data block by block.
    pub fn encrypt(&self, padded_plaintext: &[u8], key: &Key) -> Result<Vec<u8>> {
        self.apply(padded_plaintext, key, Direction::Forward)
    }

    /// Decrypt block by block. The result still carries its padding.
    pub fn decrypt(&self, ciphertext: &[u8], key: &Key) -> Result<Vec<u8>> {
        self.apply(ciphertext, key, Direction::Inverse)
    }

    fn apply(&self, input: &[u8], key: &Key, direction: Direction) -> Result<Vec<u8>> {
        let block_size = self.cipher.block_size();
        if input.len() % block_size != 0 {
            return Err(Error::InvalidLength {
                length: input.len(),
                block_size,
            });
        }
        let keys = self.cipher.expand_key(key)?;

        let mut output = input.to_vec();
        let num_blocks = output.len() / block_size;
        let workers = self.workers.min(num_blocks / MIN_BLOCKS_PER_WORKER).max(1);
        debug!(
            "{:?} pass over {} blocks on {} worker(s)",
            direction, num_blocks, workers
        );

        if workers == 1 {
            self.transform(&keys, &mut output, direction);
            return Ok(output);
        }

        // Every worker gets a contiguous run of whole blocks and writes only
        // to its own slice, so block order is preserved without merging.
        let blocks_per_worker = (num_blocks + workers - 1) / workers;
        let keys = &keys;
        thread::scope(|scope| {
            for (i, run) in output.chunks_mut(blocks_per_worker * block_size).enumerate() {
                scope.spawn(move || {
                    trace!("worker {} takes {} bytes", i, run.len());
                    self.transform(keys, run, direction);
                });
            }
        });

        Ok(output)
    }

    fn transform(&self, keys: &C::RoundKeys, data: &mut [u8], direction: Direction) {
        for block in data.chunks_exact_mut(self.cipher.block_size()) {
            match direction {
                Direction::Forward => self.cipher.encrypt_block(keys, block),
                Direction::Inverse => self.cipher.decrypt_block(keys, block),
            }
        }
    }
}
