//! Chunked processing of readers and writers.
//!
//! Only the final chunk is padded (on encryption) or unpadded (on
//! decryption), so inputs of any size can be handled with bounded memory.

use std::ffi::OsString;
use std::fs;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::ecb::ECB;
use crate::error::Result;
use crate::key::Key;
use crate::padding;
use crate::BlockCipher;

/// Default chunk size for file processing, in bytes.
pub const BUFFER_SIZE: usize = 1024 * 64 * 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Encrypt,
    Decrypt,
}

// One piece of the input. We need to know if the current chunk is the last
// one, in case we have to add or remove the padding.
#[derive(Debug)]
pub struct Chunk {
    pub data: Vec<u8>,
    pub is_last: bool,
}

/// Iterator reading its input in chunks of a fixed size.
///
/// One chunk is read ahead, so the last chunk is always flagged even when
/// the input length is an exact multiple of the chunk size. An empty input
/// produces a single empty last chunk.
pub struct ChunkReader<R: Read> {
    reader: R,
    chunk_size: usize,
    pending: Option<Vec<u8>>,
    done: bool,
}

impl<R: Read> ChunkReader<R> {
    pub fn new(reader: R, chunk_size: usize) -> ChunkReader<R> {
        ChunkReader {
            reader,
            chunk_size: chunk_size.max(1),
            pending: None,
            done: false,
        }
    }

    // `read` may return less than asked for, so keep going until the
    // chunk is full or the input is exhausted.
    fn read_chunk(&mut self) -> io::Result<Vec<u8>> {
        let mut buffer = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < buffer.len() {
            match self.reader.read(&mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        buffer.truncate(filled);
        Ok(buffer)
    }

    fn next_chunk(&mut self) -> io::Result<Chunk> {
        let current = match self.pending.take() {
            Some(chunk) => chunk,
            None => self.read_chunk()?,
        };
        // A short chunk can only be the last one.
        let following = if current.len() < self.chunk_size {
            Vec::new()
        } else {
            self.read_chunk()?
        };

        if following.is_empty() {
            self.done = true;
            Ok(Chunk {
                data: current,
                is_last: true,
            })
        } else {
            self.pending = Some(following);
            Ok(Chunk {
                data: current,
                is_last: false,
            })
        }
    }
}

impl<R: Read> Iterator for ChunkReader<R> {
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let chunk = self.next_chunk();
        if chunk.is_err() {
            self.done = true;
        }
        Some(chunk)
    }
}

/// Encrypt or decrypt everything from `reader` into `writer`.
///
/// `chunk_size` is rounded down to a whole number of blocks (at least one).
/// Returns the number of bytes written.
///
/// Chunks are written as soon as they are processed, so when this returns
/// `Err` the writer may already hold part of the output. Use
/// [`process_file`] when that output must not survive a failure.
pub fn process<C, R, W>(
    mode: &ECB<C>,
    action: Action,
    key: &Key,
    reader: R,
    mut writer: W,
    chunk_size: usize,
) -> Result<u64>
where
    C: BlockCipher,
    R: Read,
    W: Write,
{
    let block_size = mode.block_size();
    let chunk_size = (chunk_size / block_size).max(1) * block_size;
    let mut written: u64 = 0;

    for chunk in ChunkReader::new(reader, chunk_size) {
        let chunk = chunk?;
        debug!(
            "{:?}: chunk of {} bytes (last: {})",
            action,
            chunk.data.len(),
            chunk.is_last
        );

        let output = match action {
            Action::Encrypt if chunk.is_last => {
                mode.encrypt(&padding::pad(&chunk.data, block_size), key)?
            }
            Action::Encrypt => mode.encrypt(&chunk.data, key)?,
            Action::Decrypt if chunk.is_last => {
                padding::unpad(&mode.decrypt(&chunk.data, key)?, block_size)?
            }
            Action::Decrypt => mode.decrypt(&chunk.data, key)?,
        };

        writer.write_all(&output)?;
        written += output.len() as u64;
    }

    writer.flush()?;
    Ok(written)
}

// `out.des` becomes `out.des.part`, next to the target so the final rename
// stays on one filesystem.
fn partial_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".part");
    PathBuf::from(name)
}

/// Like [`process`], but from `in_path` into a new file at `out_path`.
///
/// The output is written to a temporary sibling file that is renamed to
/// `out_path` only once everything succeeded. On failure the temporary file
/// is removed and `out_path` does not exist. An existing `out_path` is never
/// overwritten.
pub fn process_file<C, P, Q>(
    mode: &ECB<C>,
    action: Action,
    key: &Key,
    in_path: P,
    out_path: Q,
    chunk_size: usize,
) -> Result<u64>
where
    C: BlockCipher,
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let out_path = out_path.as_ref();
    if out_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("{} already exists", out_path.display()),
        )
        .into());
    }

    let in_file = fs::File::open(in_path)?;
    let tmp_path = partial_path(out_path);
    let tmp_file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)?;

    let result = process(
        mode,
        action,
        key,
        BufReader::new(in_file),
        BufWriter::new(tmp_file),
        chunk_size,
    )
    .and_then(|written| {
        fs::rename(&tmp_path, out_path)?;
        Ok(written)
    });

    if result.is_err() {
        if let Err(e) = fs::remove_file(&tmp_path) {
            warn!("could not remove {}: {}", tmp_path.display(), e);
        }
    }
    result
}
