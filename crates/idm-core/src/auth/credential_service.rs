//! Credential Service
//!
//! Shared secrets are never stored. A Person keeps the lowercase hex SHA-256
//! of its secret (unsalted), and every authenticated command recomputes and
//! compares that digest.

use serde::Deserialize;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// A caller-supplied shared secret. `Debug` output is redacted.
#[derive(Clone, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(***)")
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

pub struct CredentialService;

impl CredentialService {
    /// Lowercase hex SHA-256 of the secret.
    pub fn digest(secret: &Secret) -> String {
        let mut hasher = Sha256::new();
        hasher.update(secret.expose().as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Compare the secret's digest with a stored digest in constant time.
    pub fn verify(secret: &Secret, stored_digest: &str) -> bool {
        let computed = Self::digest(secret);
        computed.as_bytes().ct_eq(stored_digest.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_is_sha256_hex() {
        assert_eq!(
            CredentialService::digest(&Secret::from("abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            CredentialService::digest(&Secret::from("")),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        assert_eq!(CredentialService::digest(&Secret::from("pw1")).len(), 64);
    }

    #[test]
    fn test_verify() {
        let digest = CredentialService::digest(&Secret::from("pw1"));
        assert!(CredentialService::verify(&Secret::from("pw1"), &digest));
        assert!(!CredentialService::verify(&Secret::from("pw2"), &digest));
        assert!(!CredentialService::verify(&Secret::from("pw1"), &digest.to_uppercase()));
        assert!(!CredentialService::verify(&Secret::from("pw1"), ""));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::from("hunter2");
        assert_eq!(format!("{:?}", secret), "Secret(***)");
    }
}
