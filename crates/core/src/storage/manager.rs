use tracing::debug;

use crate::errors::CoreError;
use crate::models::journal::Journal;

use super::encryption::{self, KdfParams};
use super::format;

/// Save/load a journal to/from encrypted bytes or files.
pub struct StorageManager;

impl StorageManager {
    /// Journal → bincode → AES-256-GCM(Argon2id(password)) → STKJ bytes
    pub fn save_to_bytes(journal: &Journal, password: &str) -> Result<Vec<u8>, CoreError> {
        Self::save_with_params(journal, password, &KdfParams::default())
    }

    /// Same as [`StorageManager::save_to_bytes`] with explicit KDF parameters
    /// (cheaper parameters keep tests fast).
    pub fn save_with_params(
        journal: &Journal,
        password: &str,
        kdf_params: &KdfParams,
    ) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(journal)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize journal: {e}")))?;
        let sealed = encryption::seal(&plaintext, password, kdf_params)?;
        let bytes = format::encode(kdf_params, &sealed);
        debug!(entries = journal.entries.len(), bytes = bytes.len(), "journal saved");
        Ok(bytes)
    }

    /// STKJ bytes → header → Argon2id(password, salt) → AES-256-GCM → bincode → Journal
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<Journal, CoreError> {
        let file = format::decode(data)?;
        let plaintext = encryption::open(&file.sealed, password, &file.kdf_params)?;
        let journal: Journal = bincode::deserialize(&plaintext)
            .map_err(|e| CoreError::Deserialization(format!("Failed to deserialize journal: {e}")))?;
        debug!(entries = journal.entries.len(), version = file.version, "journal loaded");
        Ok(journal)
    }

    /// Save a journal to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(journal: &Journal, path: &str, password: &str) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(journal, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a journal from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Journal, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
