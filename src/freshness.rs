use std::{
    fs::{File, metadata},
    io::{self, Read},
    path::Path,
};

use md5::{Digest, Md5};
use time::OffsetDateTime;
use tracing::trace;

use crate::storage::BlobDescriptor;

/// Files larger than this are never hashed; their timestamps decide instead.
pub const LARGE_FILE_THRESHOLD: u64 = 64 * 1024 * 1024;

const HASH_CHUNK_SIZE: usize = 4096;

/// Decides whether a local file is at least as up to date as a blob.
///
/// A size mismatch always means the file is stale. Files above
/// [`LARGE_FILE_THRESHOLD`] (and files compared against a blob without a
/// stored hash) are stale only when the blob was modified later. Otherwise the
/// MD5 of the file content decides, regardless of timestamps.
pub fn is_local_fresher_or_equal(blob: &BlobDescriptor, local_path: &Path) -> io::Result<bool> {
    let metadata = metadata(local_path)?;
    let local_modified = OffsetDateTime::from(metadata.modified()?);
    let blob_newer = blob.last_modified > local_modified;
    let local_size = metadata.len();

    if local_size != blob.content_length {
        trace!(
            path = %local_path.display(),
            local_size,
            remote_size = blob.content_length,
            "size differs"
        );
        return Ok(false);
    }

    let remote_hash = match &blob.content_hash {
        Some(hash) if local_size <= LARGE_FILE_THRESHOLD => hash,
        _ => {
            trace!(path = %local_path.display(), blob_newer, "comparing by timestamp");
            return Ok(!blob_newer);
        }
    };

    let local_hash = md5_file(local_path)?;
    Ok(local_hash == remote_hash.as_slice())
}

/// Computes the MD5 digest of a file, reading it in small chunks.
pub fn md5_file(path: &Path) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut hasher = Md5::new();
    let mut buffer = [0; HASH_CHUNK_SIZE];
    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hasher.finalize().to_vec())
}

#[cfg(test)]
mod tests {
    use std::{
        fs::{self, File},
        time::{Duration, SystemTime},
    };

    use tempfile::TempDir;
    use test_case::test_case;

    use super::*;

    const FIVE_MINUTES: Duration = Duration::from_secs(5 * 60);

    /// Creates a file whose modification time is `now`.
    fn local_file(dir: &TempDir, content: &[u8], now: SystemTime) -> std::path::PathBuf {
        let path = dir.path().join("file.txt");
        fs::write(&path, content).unwrap();
        File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(now)
            .unwrap();
        path
    }

    fn blob(modified: SystemTime, content_length: u64, content: Option<&[u8]>) -> BlobDescriptor {
        BlobDescriptor {
            path: "file.txt".to_string(),
            last_modified: modified.into(),
            content_length,
            content_hash: content.map(|content| Md5::digest(content).to_vec()),
        }
    }

    #[test_case(b"a", true => true; "same content blob newer")]
    #[test_case(b"a", false => true; "same content blob older")]
    #[test_case(b"b", true => false; "different content blob newer")]
    #[test_case(b"b", false => false; "different content blob older")]
    fn small_files_compare_content(local: &[u8], blob_newer: bool) -> bool {
        let dir = TempDir::new().unwrap();
        let now = SystemTime::now();
        let path = local_file(&dir, local, now);
        let modified = if blob_newer {
            now + FIVE_MINUTES
        } else {
            now - FIVE_MINUTES
        };

        is_local_fresher_or_equal(&blob(modified, 1, Some(b"a".as_slice())), &path).unwrap()
    }

    #[test_case(true; "blob newer")]
    #[test_case(false; "blob older")]
    fn size_mismatch_is_stale(blob_newer: bool) {
        let dir = TempDir::new().unwrap();
        let now = SystemTime::now();
        let path = local_file(&dir, b"sth", now);
        let modified = if blob_newer {
            now + FIVE_MINUTES
        } else {
            now - FIVE_MINUTES
        };

        // Even matching content hashes don't rescue a size mismatch
        let blob = blob(modified, 1, Some(b"sth".as_slice()));

        assert!(!is_local_fresher_or_equal(&blob, &path).unwrap());
    }

    #[test_case(true => false; "blob newer")]
    #[test_case(false => true; "blob older")]
    fn missing_hash_compares_timestamps(blob_newer: bool) -> bool {
        let dir = TempDir::new().unwrap();
        let now = SystemTime::now();
        let path = local_file(&dir, b"a", now);
        let modified = if blob_newer {
            now + FIVE_MINUTES
        } else {
            now - FIVE_MINUTES
        };

        is_local_fresher_or_equal(&blob(modified, 1, None), &path).unwrap()
    }

    #[test_case(true => false; "blob newer")]
    #[test_case(false => true; "blob older")]
    fn large_files_compare_timestamps(blob_newer: bool) -> bool {
        let dir = TempDir::new().unwrap();
        let now = SystemTime::now();
        let path = dir.path().join("large.bin");
        let file = File::create(&path).unwrap();
        file.set_len(LARGE_FILE_THRESHOLD + 1).unwrap();
        file.set_modified(now).unwrap();
        drop(file);
        let modified = if blob_newer {
            now + FIVE_MINUTES
        } else {
            now - FIVE_MINUTES
        };

        // The hash never matches, so only the timestamp can decide
        let blob = blob(modified, LARGE_FILE_THRESHOLD + 1, Some(b"not the content".as_slice()));

        is_local_fresher_or_equal(&blob, &path).unwrap()
    }

    #[test]
    fn hashes_in_chunks() {
        let dir = TempDir::new().unwrap();
        let content = vec![7u8; HASH_CHUNK_SIZE * 3 + 17];
        let path = dir.path().join("chunks.bin");
        fs::write(&path, &content).unwrap();

        assert_eq!(md5_file(&path).unwrap(), Md5::digest(&content).to_vec());
    }

    #[test]
    fn missing_local_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let blob = blob(SystemTime::now(), 1, None);

        assert!(is_local_fresher_or_equal(&blob, &dir.path().join("missing")).is_err());
    }
}
