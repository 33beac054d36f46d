//! Shared-secret access gate.

use sha2::{Digest, Sha256};

/// Holds the SHA-256 digest of the configured secret. The secret itself is
/// never stored.
///
/// # Examples
///
/// ```
/// use bizdir_server::PasswordGate;
///
/// let gate = PasswordGate::new("hunter2");
/// assert!(gate.verify("hunter2"));
/// assert!(!gate.verify("hunter3"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordGate {
    digest: [u8; 32],
    empty: bool,
}

fn digest(input: &str) -> [u8; 32] {
    Sha256::digest(input.as_bytes()).into()
}

impl PasswordGate {
    /// Hashes `secret` and keeps only the digest.
    pub fn new(secret: &str) -> Self {
        Self {
            digest: digest(secret),
            empty: secret.is_empty(),
        }
    }

    /// Whether `input` hashes to the configured digest.
    pub fn verify(&self, input: &str) -> bool {
        digest(input) == self.digest
    }

    /// Whether the configured secret was empty. An empty secret admits an
    /// empty submission.
    pub fn is_empty_secret(&self) -> bool {
        self.empty
    }
}

impl std::fmt::Debug for PasswordGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordGate")
            .field("digest", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_output_hides_digest() {
        let gate = PasswordGate::new("secret");
        let debug = format!("{:?}", gate);
        assert!(debug.contains("redacted"));
        assert!(!debug.contains("secret\""));
    }

    #[test]
    fn test_empty_secret_admits_empty_input_only() {
        let gate = PasswordGate::new("");
        assert!(gate.is_empty_secret());
        assert!(gate.verify(""));
        assert!(!gate.verify(" "));
    }

    #[test]
    fn test_verify_is_case_sensitive() {
        let gate = PasswordGate::new("Secret");
        assert!(!gate.is_empty_secret());
        assert!(!gate.verify("secret"));
    }
}
