// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Symmetric file encryption: AES-256-GCM via `ring`.
//
// Sealed data is laid out as nonce (12 bytes) || ciphertext || tag (16 bytes).
// The key is random per encryption and is only ever shown to the user as 64
// hex characters. Without it the data cannot be recovered.

use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use tracing::{debug, instrument};
use uft_core::error::{Result, UftError};

/// Length of an AES-256 key in bytes.
pub const KEY_LEN: usize = 32;

/// A 256-bit AES key.
#[derive(Clone, PartialEq, Eq)]
pub struct AesKey([u8; KEY_LEN]);

impl std::fmt::Debug for AesKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AesKey(..)")
    }
}

impl AesKey {
    /// Fresh key from the system CSPRNG.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; KEY_LEN];
        SystemRandom::new()
            .fill(&mut bytes)
            .map_err(|_| UftError::Encryption("system random source unavailable".into()))?;
        Ok(Self(bytes))
    }

    /// Parse a key printed by [`AesKey::to_hex`].
    ///
    /// Anything that is not exactly 64 hex characters cannot be the right
    /// key, so it is reported as a decryption failure.
    pub fn from_hex(text: &str) -> Result<Self> {
        let bytes = hex::decode(text.trim())
            .map_err(|_| UftError::DecryptionFailed("key is not valid hexadecimal".into()))?;
        let bytes: [u8; KEY_LEN] = bytes.try_into().map_err(|_| {
            UftError::DecryptionFailed(format!("key must be {} hex characters", KEY_LEN * 2))
        })?;
        Ok(Self(bytes))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    fn aead_key(&self) -> Result<LessSafeKey> {
        let unbound = UnboundKey::new(&AES_256_GCM, &self.0)
            .map_err(|_| UftError::Encryption("invalid AES-256 key length".into()))?;
        Ok(LessSafeKey::new(unbound))
    }

    /// Encrypt `plaintext` under a fresh random nonce.
    #[instrument(skip_all, fields(plaintext_len = plaintext.len()))]
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        SystemRandom::new()
            .fill(&mut nonce_bytes)
            .map_err(|_| UftError::Encryption("system random source unavailable".into()))?;

        let mut in_out = plaintext.to_vec();
        self.aead_key()?
            .seal_in_place_append_tag(
                Nonce::assume_unique_for_key(nonce_bytes),
                Aad::empty(),
                &mut in_out,
            )
            .map_err(|_| UftError::Encryption("AES-GCM seal failed".into()))?;

        let mut sealed = Vec::with_capacity(NONCE_LEN + in_out.len());
        sealed.extend_from_slice(&nonce_bytes);
        sealed.extend_from_slice(&in_out);
        debug!(sealed_len = sealed.len(), "encryption complete");
        Ok(sealed)
    }

    /// Decrypt data produced by [`AesKey::encrypt`].
    ///
    /// A wrong key and tampered data are indistinguishable: both fail the
    /// GCM tag check.
    #[instrument(skip_all, fields(sealed_len = sealed.len()))]
    pub fn decrypt(&self, sealed: &[u8]) -> Result<Vec<u8>> {
        if sealed.len() < NONCE_LEN + AES_256_GCM.tag_len() {
            return Err(UftError::DecryptionFailed("data is too short".into()));
        }
        let (nonce_bytes, body) = sealed.split_at(NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| UftError::DecryptionFailed("malformed nonce".into()))?;

        let mut in_out = body.to_vec();
        let plaintext = self
            .aead_key()?
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| {
                UftError::DecryptionFailed("wrong key or corrupted data".into())
            })?;
        debug!(plaintext_len = plaintext.len(), "decryption complete");
        Ok(plaintext.to_vec())
    }
}

/// Encrypt under a new key; returns the hex-encoded sealed data and the key.
pub fn seal_hex(plaintext: &[u8]) -> Result<(String, AesKey)> {
    let key = AesKey::generate()?;
    let sealed = key.encrypt(plaintext)?;
    Ok((hex::encode(sealed), key))
}

/// Decrypt hex-encoded sealed data with a hex key.
pub fn open_hex(sealed_hex: &str, key_hex: &str) -> Result<Vec<u8>> {
    let key = AesKey::from_hex(key_hex)?;
    let sealed = hex::decode(sealed_hex.trim())
        .map_err(|_| UftError::DecryptionFailed("file is not hex-encoded ciphertext".into()))?;
    key.decrypt(&sealed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uft_core::error::{ErrorKind, FailureCause};

    #[test]
    fn round_trip_preserves_bytes() {
        let plaintext = b"line one\nline two\n\xff\x00binary tail";
        let (sealed, key) = seal_hex(plaintext).unwrap();
        assert_eq!(key.to_hex().len(), 64);
        assert_eq!(open_hex(&sealed, &key.to_hex()).unwrap(), plaintext);
    }

    #[test]
    fn wrong_key_fails_decryption() {
        let (sealed, _) = seal_hex(b"secret").unwrap();
        let other = AesKey::generate().unwrap();
        let err = open_hex(&sealed, &other.to_hex()).unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::HandlerFailure(FailureCause::DecryptionFailed)
        );
    }

    #[test]
    fn malformed_key_fails_decryption() {
        let (sealed, _) = seal_hex(b"secret").unwrap();
        for key in ["not hex", "abcd", ""] {
            let err = open_hex(&sealed, key).unwrap_err();
            assert!(matches!(err, UftError::DecryptionFailed(_)), "{key}");
        }
    }

    #[test]
    fn nonces_differ_between_encryptions() {
        let key = AesKey::generate().unwrap();
        let a = key.encrypt(b"same").unwrap();
        let b = key.encrypt(b"same").unwrap();
        assert_ne!(a, b);
        assert_eq!(key.decrypt(&a).unwrap(), b"same");
    }

    #[test]
    fn truncated_data_is_rejected() {
        let key = AesKey::generate().unwrap();
        assert!(key.decrypt(&[0u8; 8]).is_err());
    }
}
