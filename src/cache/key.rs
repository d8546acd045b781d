//! Cache key derivation.

use std::fmt;

use sha2::{Digest, Sha256};

/// Fixed-size identifier for a cached response.
///
/// Derived from the request-target (path and query) only; scheme and host
/// never take part because the proxy fronts a single origin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey([u8; 32]);

impl CacheKey {
    /// Derive the key for a request-target such as `/docs/index.html?lang=en`.
    pub fn derive(uri: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(uri.as_bytes());
        let digest = hasher.finalize();

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CacheKey({})", &self.to_hex()[..12])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        assert_eq!(CacheKey::derive("/index.html"), CacheKey::derive("/index.html"));
    }

    #[test]
    fn test_query_is_significant() {
        assert_ne!(CacheKey::derive("/search?q=a"), CacheKey::derive("/search?q=b"));
        assert_ne!(CacheKey::derive("/search"), CacheKey::derive("/search?"));
    }

    #[test]
    fn test_case_and_trailing_slash_are_significant() {
        assert_ne!(CacheKey::derive("/About"), CacheKey::derive("/about"));
        assert_ne!(CacheKey::derive("/about/"), CacheKey::derive("/about"));
    }

    #[test]
    fn test_empty_input() {
        // SHA-256 of the empty string
        assert_eq!(
            CacheKey::derive("").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_display_is_hex() {
        let key = CacheKey::derive("/");
        let shown = key.to_string();
        assert_eq!(shown.len(), 64);
        assert!(shown.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(hex::decode(&shown).unwrap(), key.as_bytes().to_vec());
    }
}
