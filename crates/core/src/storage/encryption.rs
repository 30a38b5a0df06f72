use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::errors::CoreError;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const KEY_LEN: usize = 32;

/// Argon2id parameters for key derivation.
/// Written to the file header so a journal can always be reopened with the
/// parameters it was saved with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Number of passes
    pub time_cost: u32,
    /// Lanes
    pub parallelism: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            memory_cost: 65_536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

/// Output of [`seal`]: everything needed to decrypt besides the password.
#[derive(Debug, Clone)]
pub struct Sealed {
    pub salt: [u8; SALT_LEN],
    pub nonce: [u8; NONCE_LEN],
    /// AES-GCM ciphertext with the 16-byte tag appended
    pub ciphertext: Vec<u8>,
}

/// Derive a 256-bit key from a password with Argon2id.
pub fn derive_key(
    password: &str,
    salt: &[u8; SALT_LEN],
    params: &KdfParams,
) -> Result<[u8; KEY_LEN], CoreError> {
    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| CoreError::Encryption(format!("Invalid Argon2 params: {e}")))?;

    let mut key = [0u8; KEY_LEN];
    Argon2::new(Algorithm::Argon2id, Version::V0x13, argon2_params)
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| CoreError::Encryption(format!("Argon2 key derivation failed: {e}")))?;
    Ok(key)
}

/// Encrypt with AES-256-GCM under an explicit key and nonce.
pub fn encrypt(
    plaintext: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, CoreError> {
    cipher(key)?
        .encrypt(Nonce::from_slice(nonce), plaintext)
        .map_err(|e| CoreError::Encryption(format!("AES-GCM: {e}")))
}

/// Decrypt with AES-256-GCM. A wrong key or tampered data both surface as
/// `CoreError::Decryption`.
pub fn decrypt(
    ciphertext: &[u8],
    key: &[u8; KEY_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>, CoreError> {
    cipher(key)?
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| CoreError::Decryption)
}

/// Password-encrypt `plaintext` with a fresh random salt and nonce.
pub fn seal(plaintext: &[u8], password: &str, params: &KdfParams) -> Result<Sealed, CoreError> {
    let salt: [u8; SALT_LEN] = random_bytes()?;
    let nonce: [u8; NONCE_LEN] = random_bytes()?;
    let key = derive_key(password, &salt, params)?;
    let ciphertext = encrypt(plaintext, &key, &nonce)?;
    Ok(Sealed {
        salt,
        nonce,
        ciphertext,
    })
}

/// Reverse of [`seal`].
pub fn open(sealed: &Sealed, password: &str, params: &KdfParams) -> Result<Vec<u8>, CoreError> {
    let key = derive_key(password, &sealed.salt, params)?;
    decrypt(&sealed.ciphertext, &key, &sealed.nonce)
}

/// Cryptographically secure random bytes from the OS.
pub fn random_bytes<const N: usize>() -> Result<[u8; N], CoreError> {
    let mut buf = [0u8; N];
    getrandom::getrandom(&mut buf)
        .map_err(|e| CoreError::Encryption(format!("Failed to generate random bytes: {e}")))?;
    Ok(buf)
}

fn cipher(key: &[u8; KEY_LEN]) -> Result<Aes256Gcm, CoreError> {
    Aes256Gcm::new_from_slice(key)
        .map_err(|e| CoreError::Encryption(format!("Failed to create cipher: {e}")))
}
