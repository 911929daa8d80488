//! Password fingerprints.

use std::fmt;

use sha2::Digest;

/// Digest algorithms a breach corpus may be keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// 160-bit SHA-1, the legacy format of most public breach lists.
    Sha1,
    Sha256,
}

impl DigestAlgorithm {
    pub const ALL: [DigestAlgorithm; 2] = [DigestAlgorithm::Sha1, DigestAlgorithm::Sha256];

    /// Lowercase hex digest of the password's UTF-8 bytes.
    pub fn fingerprint(self, password: &str) -> String {
        match self {
            DigestAlgorithm::Sha1 => hex::encode(sha1::Sha1::digest(password.as_bytes())),
            DigestAlgorithm::Sha256 => hex::encode(sha2::Sha256::digest(password.as_bytes())),
        }
    }

    /// Length of a fingerprint in hex characters.
    pub const fn hex_len(self) -> usize {
        match self {
            DigestAlgorithm::Sha1 => 40,
            DigestAlgorithm::Sha256 => 64,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            DigestAlgorithm::Sha1 => "sha1",
            DigestAlgorithm::Sha256 => "sha256",
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
