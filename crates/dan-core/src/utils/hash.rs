//! Blake3 hashing utilities for exported world files.

use crate::error::{DanError, DanResult};

/// Compute Blake3 hash of data
pub fn blake3_hash(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    hash.to_hex().to_string()
}

/// Compute Blake3 hash of a file
pub fn blake3_hash_file(path: &std::path::Path) -> DanResult<String> {
    let data = std::fs::read(path)
        .map_err(|e| DanError::io(format!("Failed to read file: {}", path.display()), e))?;
    Ok(blake3_hash(&data))
}
