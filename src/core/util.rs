//! Common utilities

use sha1::{Digest, Sha1};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::SystemTime;
use xxhash_rust::xxh3::Xxh3;

use crate::core::model::Meta;

/// Hash algorithm selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    #[default]
    Xxh3,
    Sha1,
}

impl std::str::FromStr for HashAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xxh3" => Ok(HashAlgorithm::Xxh3),
            "sha1" => Ok(HashAlgorithm::Sha1),
            _ => Err(format!("Unknown hash algorithm: {}", s)),
        }
    }
}

/// Compute hash of file content, streaming it in chunks
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> std::io::Result<String> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut buffer = [0u8; 8192];

    match algorithm {
        HashAlgorithm::Xxh3 => {
            let mut hasher = Xxh3::new();
            loop {
                let n = reader.read(&mut buffer)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buffer[..n]);
            }
            Ok(format!("{:016x}", hasher.digest()))
        }
        HashAlgorithm::Sha1 => {
            let mut hasher = Sha1::new();
            loop {
                let n = reader.read(&mut buffer)?;
                if n == 0 {
                    break;
                }
                hasher.update(&buffer[..n]);
            }
            Ok(format!("{:x}", hasher.finalize()))
        }
    }
}

/// Get file modification time in milliseconds since epoch
pub fn get_mtime_ms(path: &Path) -> std::io::Result<i64> {
    let metadata = std::fs::metadata(path)?;
    let mtime = metadata.modified()?;
    let duration = mtime
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default();
    Ok(duration.as_millis() as i64)
}

/// Get file size in bytes
pub fn get_file_size(path: &Path) -> std::io::Result<u64> {
    let metadata = std::fs::metadata(path)?;
    Ok(metadata.len())
}

/// Collect size/mtime (and optionally a hash) for a file; missing pieces stay empty
pub fn file_meta(path: &Path, hash: Option<HashAlgorithm>) -> Meta {
    Meta {
        mtime_ms: get_mtime_ms(path).ok(),
        size: get_file_size(path).ok(),
        hash: hash.and_then(|algorithm| hash_file(path, algorithm).ok()),
    }
}
