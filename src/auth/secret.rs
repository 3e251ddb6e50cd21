// Secret material wrappers: signing secret and plaintext passwords

use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// Process-wide token signing secret
///
/// Uses `secrecy::Secret` to prevent accidental logging of the key material.
/// Construction rejects empty values so the process cannot start without one.
pub struct SigningSecret(Secret<String>);

impl SigningSecret {
    /// Create a signing secret, rejecting empty or whitespace-only values
    pub fn new(secret: &str) -> Result<Self, String> {
        if secret.trim().is_empty() {
            return Err("signing secret must not be empty".to_string());
        }
        Ok(Self(Secret::new(secret.to_string())))
    }

    /// Expose the raw secret bytes (token signing only)
    pub fn expose_bytes(&self) -> &[u8] {
        self.0.expose_secret().as_bytes()
    }
}

impl Clone for SigningSecret {
    fn clone(&self) -> Self {
        Self(Secret::new(self.0.expose_secret().clone()))
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningSecret")
            .field("secret", &"<REDACTED>")
            .finish()
    }
}

/// Plaintext password with memory protection
pub struct Password(Secret<String>);

impl Password {
    pub fn new(password: &str) -> Self {
        Self(Secret::new(password.to_string()))
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.0.expose_secret().chars().count()
    }

    /// Expose the plaintext (hashing and verification only)
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("value", &"<REDACTED>")
            .finish()
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<REDACTED>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signing_secret_rejects_empty() {
        assert!(SigningSecret::new("").is_err());
        assert!(SigningSecret::new("   ").is_err());
        assert!(SigningSecret::new("s3cr3t").is_ok());
    }

    #[test]
    fn test_signing_secret_redaction() {
        let secret = SigningSecret::new("super_secret_value").unwrap();
        let debug_str = format!("{:?}", secret);
        assert!(!debug_str.contains("super_secret_value"));
        assert!(debug_str.contains("<REDACTED>"));
    }

    #[test]
    fn test_signing_secret_clone_keeps_bytes() {
        let secret = SigningSecret::new("abc").unwrap();
        assert_eq!(secret.clone().expose_bytes(), b"abc");
    }

    #[test]
    fn test_password_redaction() {
        let password = Password::new("password1");
        let debug_str = format!("{:?}", password);
        let display_str = format!("{}", password);

        assert!(!debug_str.contains("password1"), "Debug should not expose password");
        assert!(!display_str.contains("password1"), "Display should not expose password");
    }

    #[test]
    fn test_password_char_len_counts_chars() {
        assert_eq!(Password::new("héllo").char_len(), 5);
    }
}
