//! Content digests and the copy primitive used by the sync engine

use filetime::FileTime;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use crate::error::SyncError;
use crate::logging::*;

const READ_BUF_SIZE: usize = 64 * 1024;

/// Hash the full content of a file with BLAKE3
pub fn hash_file(path: &Path) -> Result<blake3::Hash, SyncError> {
	let mut file = fs::File::open(path).map_err(|e| SyncError::io(path, e))?;
	let mut hasher = blake3::Hasher::new();
	let mut buf = vec![0u8; READ_BUF_SIZE];
	loop {
		let n = match file.read(&mut buf) {
			Ok(0) => break,
			Ok(n) => n,
			Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
			Err(e) => return Err(SyncError::io(path, e)),
		};
		hasher.update(&buf[..n]);
	}
	Ok(hasher.finalize())
}

pub fn hash_to_hex(hash: &blake3::Hash) -> String {
	hex::encode(hash.as_bytes())
}

/// True when both files have the same content digest
pub fn same_content(a: &Path, b: &Path) -> Result<bool, SyncError> {
	// Different lengths can never hash equal
	let len_a = fs::metadata(a).map_err(|e| SyncError::io(a, e))?.len();
	let len_b = fs::metadata(b).map_err(|e| SyncError::io(b, e))?.len();
	if len_a != len_b {
		return Ok(false);
	}
	let (hash_a, hash_b) = (hash_file(a)?, hash_file(b)?);
	if hash_a != hash_b {
		debug!("{} differs: {} != {}", b.display(), hash_to_hex(&hash_a), hash_to_hex(&hash_b));
		return Ok(false);
	}
	Ok(true)
}

/// Copy file content and modification time from `src` to `dst`
pub fn copy_file(src: &Path, dst: &Path) -> Result<u64, SyncError> {
	let bytes = fs::copy(src, dst).map_err(|e| SyncError::io(dst, e))?;
	let meta = fs::metadata(src).map_err(|e| SyncError::io(src, e))?;
	let mtime = FileTime::from_last_modification_time(&meta);
	filetime::set_file_mtime(dst, mtime).map_err(|e| SyncError::io(dst, e))?;
	Ok(bytes)
}


// vim: ts=4
