//! Streaming SHA-256 checksums for bundle files.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use sha2::{Digest, Sha256};

/// Read size used when streaming a file into the hasher.
pub const CHUNK_SIZE: usize = 64 * 1024;

/// Computes the lowercase hex SHA-256 digest of a file, reading it in
/// fixed-size chunks.
pub fn file_checksum(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..read]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Computes the lowercase hex SHA-256 digest of in-memory bytes.
pub fn bytes_checksum(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
