use thiserror::Error;

/// Unified error type for the entire stock-journal-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Journal file ────────────────────────────────────────────────
    #[error("Invalid journal file: {0}")]
    InvalidFileFormat(String),

    #[error("Unsupported journal file version: {0}")]
    UnsupportedVersion(u16),

    #[error("Journal encryption failed: {0}")]
    Encryption(String),

    #[error("Could not decrypt journal: wrong password or corrupted file")]
    Decryption,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── Disk access (native only) ───────────────────────────────────
    #[error("Journal file I/O error: {0}")]
    FileIO(String),

    // ── Journal & calculator input ──────────────────────────────────
    /// Input rejected before it reaches the charges engine.
    /// `field` names the offending input (e.g. `buy_price`, `sell_quantity`).
    #[error("Validation failed for {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

impl CoreError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The offending field, if this is a validation error.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            CoreError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }
}

// ── Conversions ─────────────────────────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<bincode::Error> for CoreError {
    fn from(e: bincode::Error) -> Self {
        CoreError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<aes_gcm::Error> for CoreError {
    fn from(_: aes_gcm::Error) -> Self {
        CoreError::Decryption
    }
}
