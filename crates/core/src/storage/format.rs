use crate::errors::CoreError;

use super::encryption::{KdfParams, Sealed, NONCE_LEN, SALT_LEN};

/// Magic bytes identifying a stock journal file.
pub const MAGIC: &[u8; 4] = b"STKJ";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Header size in bytes:
/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8) = 54
pub const HEADER_SIZE: usize = 4 + 2 + 12 + SALT_LEN + NONCE_LEN + 8;

/// Parsed journal file: header fields plus the sealed payload.
#[derive(Debug, Clone)]
pub struct JournalFile {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub sealed: Sealed,
}

/// Serialize a sealed journal into the on-disk layout.
///
/// ```text
/// [STKJ: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable]
/// ```
pub fn encode(kdf_params: &KdfParams, sealed: &Sealed) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + sealed.ciphertext.len());
    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&CURRENT_VERSION.to_le_bytes());
    buf.extend_from_slice(&kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(&sealed.salt);
    buf.extend_from_slice(&sealed.nonce);
    buf.extend_from_slice(&(sealed.ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(&sealed.ciphertext);
    buf
}

/// Parse and sanity-check a journal file.
///
/// KDF parameters are bounded so a crafted file cannot make key derivation
/// allocate gigabytes or spin for minutes.
pub fn decode(data: &[u8]) -> Result<JournalFile, CoreError> {
    if data.len() < HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a stock journal".into(),
        ));
    }

    let mut r = Reader { data, pos: 0 };

    if r.take::<4>("magic")? != *MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes: not a stock journal file".into(),
        ));
    }

    let version = u16::from_le_bytes(r.take("version")?);
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let kdf_params = KdfParams {
        memory_cost: u32::from_le_bytes(r.take("memory_cost")?),
        time_cost: u32::from_le_bytes(r.take("time_cost")?),
        parallelism: u32::from_le_bytes(r.take("parallelism")?),
    };
    check_range("memory_cost", kdf_params.memory_cost, 8, 1_048_576)?;
    check_range("time_cost", kdf_params.time_cost, 1, 20)?;
    check_range("parallelism", kdf_params.parallelism, 1, 16)?;

    let salt = r.take::<SALT_LEN>("salt")?;
    let nonce = r.take::<NONCE_LEN>("nonce")?;
    let ciphertext_len = u64::from_le_bytes(r.take("ciphertext length")?);

    let remaining = (data.len() - r.pos) as u64;
    if remaining < ciphertext_len {
        return Err(CoreError::InvalidFileFormat(format!(
            "File truncated: expected {ciphertext_len} bytes of ciphertext, got {remaining}"
        )));
    }
    let ciphertext = data[r.pos..r.pos + ciphertext_len as usize].to_vec();

    Ok(JournalFile {
        version,
        kdf_params,
        sealed: Sealed {
            salt,
            nonce,
            ciphertext,
        },
    })
}

fn check_range(name: &str, value: u32, min: u32, max: u32) -> Result<(), CoreError> {
    if !(min..=max).contains(&value) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF {name} out of safe range: {value} (expected {min}..{max})"
        )));
    }
    Ok(())
}

/// Forward-only cursor over the header bytes.
struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self, what: &str) -> Result<[u8; N], CoreError> {
        let bytes: [u8; N] = self
            .data
            .get(self.pos..self.pos + N)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat(format!("Failed to read {what}")))?;
        self.pos += N;
        Ok(bytes)
    }
}
