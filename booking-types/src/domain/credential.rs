//! Payment signing credential.

use std::fmt;

use crate::error::DomainError;

/// Hex-encoded 32-byte private key used to authorize payments.
///
/// The raw bytes never appear in `Debug` output or logs.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningCredential {
    bytes: [u8; 32],
}

impl SigningCredential {
    /// Parses a hex key, with or without a `0x` prefix.
    pub fn from_hex(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        let decoded = hex::decode(digits)
            .map_err(|e| DomainError::InvalidCredential(format!("not valid hex: {}", e)))?;

        let bytes: [u8; 32] = decoded.try_into().map_err(|v: Vec<u8>| {
            DomainError::InvalidCredential(format!("expected 32 bytes, got {}", v.len()))
        })?;

        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl fmt::Debug for SigningCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningCredential(<redacted>)")
    }
}
