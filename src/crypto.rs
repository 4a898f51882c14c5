use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};
use chacha20poly1305::{Key, XChaCha20Poly1305, XNonce};
use sha2::{Digest, Sha256};

use crate::error::{CoordinatorError, Result};

const NONCE_LEN: usize = 24;

fn cipher(password: &str) -> XChaCha20Poly1305 {
    let key = Sha256::digest(password.as_bytes());
    XChaCha20Poly1305::new(Key::from_slice(&key))
}

/// Encrypts `plaintext` under SHA-256(`password`). The 24-byte nonce is
/// appended after the ciphertext and the whole blob is hex-encoded.
pub fn encrypt_xchacha20poly1305(plaintext: &[u8], password: &str) -> Result<String> {
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);
    let mut blob = cipher(password)
        .encrypt(&nonce, plaintext)
        .map_err(|_| CoordinatorError::Encrypt)?;
    blob.extend_from_slice(&nonce);
    Ok(hex::encode(blob))
}

/// Every failure mode (bad hex, truncated blob, wrong password) collapses to
/// `Decrypt` so callers cannot distinguish them.
pub fn decrypt_xchacha20poly1305(encrypted: &str, password: &str) -> Result<Vec<u8>> {
    let blob = hex::decode(encrypted.trim()).map_err(|_| CoordinatorError::Decrypt)?;
    if blob.len() < NONCE_LEN {
        return Err(CoordinatorError::Decrypt);
    }
    let (ciphertext, nonce) = blob.split_at(blob.len() - NONCE_LEN);
    cipher(password)
        .decrypt(XNonce::from_slice(nonce), ciphertext)
        .map_err(|_| CoordinatorError::Decrypt)
}
