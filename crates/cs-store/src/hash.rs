// hash.rs — SHA-256 hashing for document provenance.
//
// Resolved documents are stamped with a hash of the discovered file
// they were generated from, so a stale resolution is detectable. The
// stamp is the first 16 hex characters of the SHA-256 digest of the
// file exactly as stored on disk.

use sha2::{Digest, Sha256};

/// Number of hex characters kept in the provenance stamp.
pub const SHORT_HASH_LEN: usize = 16;

/// Hash arbitrary bytes, returning the full lowercase hex digest.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

/// The 16-hex-character provenance stamp for a file's raw contents.
pub fn short_hash(data: &[u8]) -> String {
    let mut full = hash_bytes(data);
    full.truncate(SHORT_HASH_LEN);
    full
}
