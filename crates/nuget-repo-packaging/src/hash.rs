//! SHA-512 content hashing for pushed packages.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use sha2::{Digest, Sha512};

/// The SHA-512 digest of a package's raw bytes.
///
/// The digest is persisted as its standard base64 encoding (not hex), per
/// spec; [`Hash::to_base64`] is what gets written to a `.nupkg.sha512` key.
pub struct Hash {
    digest: [u8; 64],
}

impl Hash {
    /// Compute the SHA-512 digest of `bytes`.
    pub fn compute(bytes: &[u8]) -> Hash {
        let mut hasher = Sha512::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut out = [0u8; 64];
        out.copy_from_slice(&digest);
        Hash { digest: out }
    }

    /// The ASCII body written to the hash key: standard-alphabet base64 of
    /// the raw digest bytes, no wrapping.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.digest)
    }
}
