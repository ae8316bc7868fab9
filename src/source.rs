use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::MultiGzDecoder;
use tracing::debug;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
    Zstd,
}

pub const GZIP_MAGIC: &[u8; 2] = b"\x1f\x8b";
pub const ZSTD_MAGIC: &[u8; 4] = b"\x28\xb5\x2f\xfd";

/// Detect compression by checking the leading magic bytes.
pub fn detect_compression(header: &[u8]) -> Compression {
    if header.starts_with(GZIP_MAGIC) {
        Compression::Gzip
    } else if header.starts_with(ZSTD_MAGIC) {
        Compression::Zstd
    } else {
        Compression::None
    }
}

/// Read the whole dump into memory, decompressing gzip/zstd input, and
/// decode it as UTF-8.
pub fn read_dump(path: &Path) -> Result<String> {
    let raw = fs::read(path)?;
    let compression = detect_compression(&raw);
    debug!(path = %path.display(), bytes = raw.len(), ?compression, "read dump");

    let bytes = match compression {
        Compression::None => raw,
        Compression::Gzip => {
            let mut out = Vec::new();
            MultiGzDecoder::new(raw.as_slice()).read_to_end(&mut out)?;
            out
        }
        Compression::Zstd => zstd::stream::decode_all(raw.as_slice())?,
    };

    String::from_utf8(bytes).map_err(|e| e.utf8_error().into())
}
