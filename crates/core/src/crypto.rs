//! Reversible CPF encryption for authorized redisplay.
//!
//! AES-256-GCM with a per-process key injected at construction time (the
//! key comes from configuration, never a module-level constant, so tests
//! and key rotation can swap it). The stored blob is `nonce ‖ ciphertext`
//! with a fresh random 12-byte nonce per encryption.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::RngCore;

use crate::error::CoreError;

/// AES-GCM nonce length in bytes.
const NONCE_LEN: usize = 12;

/// Symmetric cipher for CPF blobs.
pub struct CpfCipher {
    cipher: Aes256Gcm,
}

impl CpfCipher {
    /// Build a cipher from a raw 32-byte key.
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key)),
        }
    }

    /// Build a cipher from a base64-encoded 32-byte key (the
    /// configuration wire format).
    pub fn from_base64(encoded: &str) -> Result<Self, CoreError> {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| CoreError::Internal(format!("chave de criptografia inválida: {e}")))?;
        let key: [u8; 32] = bytes.try_into().map_err(|_| {
            CoreError::Internal("chave de criptografia deve ter 32 bytes".into())
        })?;
        Ok(Self::new(&key))
    }

    /// Encrypt a normalized CPF into a `nonce ‖ ciphertext` blob.
    pub fn encrypt(&self, normalized: &str) -> Result<Vec<u8>, CoreError> {
        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, normalized.as_bytes())
            .map_err(|_| CoreError::Internal("falha ao criptografar CPF".into()))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypt a stored blob back into the normalized CPF.
    ///
    /// Failure here is fatal only for the single field being rendered:
    /// callers surface `None` instead of failing the whole request, since
    /// anonymized rows legitimately carry no blob.
    pub fn decrypt(&self, blob: &[u8]) -> Result<String, CoreError> {
        if blob.len() <= NONCE_LEN {
            return Err(CoreError::Internal("blob de CPF truncado".into()));
        }
        let (nonce_bytes, ciphertext) = blob.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CoreError::Internal("falha ao descriptografar CPF".into()))?;

        String::from_utf8(plaintext)
            .map_err(|_| CoreError::Internal("blob de CPF corrompido".into()))
    }

    /// Decrypt an optional stored blob, yielding `None` on absence or on
    /// any decryption failure.
    pub fn decrypt_opt(&self, blob: Option<&[u8]>) -> Option<String> {
        blob.and_then(|b| self.decrypt(b).ok())
    }
}
