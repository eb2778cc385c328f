//! Content digests for downloaded files.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read size used when streaming a file through the digest.
pub const HASH_CHUNK_SIZE: usize = 4096;

/// MD5 of a file, streamed off disk, as lowercase hex.
pub fn file_md5(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut context = md5::Context::new();
    let mut buffer = [0u8; HASH_CHUNK_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        context.consume(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", context.compute()))
}

/// MD5 of an in-memory buffer as lowercase hex.
pub fn md5_hex(bytes: &[u8]) -> String {
    format!("{:x}", md5::compute(bytes))
}
