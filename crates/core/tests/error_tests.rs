// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use stock_journal_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_file_format() {
        let err = CoreError::InvalidFileFormat("bad header".into());
        assert_eq!(err.to_string(), "Invalid journal file: bad header");
    }

    #[test]
    fn unsupported_version() {
        let err = CoreError::UnsupportedVersion(99);
        assert_eq!(err.to_string(), "Unsupported journal file version: 99");
    }

    #[test]
    fn encryption() {
        let err = CoreError::Encryption("bad params".into());
        assert_eq!(err.to_string(), "Journal encryption failed: bad params");
    }

    #[test]
    fn decryption() {
        assert_eq!(
            CoreError::Decryption.to_string(),
            "Could not decrypt journal: wrong password or corrupted file"
        );
    }

    #[test]
    fn serialization() {
        let err = CoreError::Serialization("oops".into());
        assert_eq!(err.to_string(), "Serialization error: oops");
    }

    #[test]
    fn deserialization() {
        let err = CoreError::Deserialization("eof".into());
        assert_eq!(err.to_string(), "Deserialization error: eof");
    }

    #[test]
    fn file_io() {
        let err = CoreError::FileIO("permission denied".into());
        assert_eq!(err.to_string(), "Journal file I/O error: permission denied");
    }

    #[test]
    fn validation() {
        let err = CoreError::validation("sell_quantity", "cannot sell 11 shares, only 10 bought");
        assert_eq!(
            err.to_string(),
            "Validation failed for sell_quantity: cannot sell 11 shares, only 10 bought"
        );
    }

    #[test]
    fn entry_not_found() {
        let err = CoreError::EntryNotFound("abc-123".into());
        assert_eq!(err.to_string(), "Entry not found: abc-123");
    }
}

// ── Field accessor ──────────────────────────────────────────────────

mod field {
    use super::*;

    #[test]
    fn validation_exposes_field() {
        let err = CoreError::validation("buy_price", "price must be positive, got 0");
        assert_eq!(err.field(), Some("buy_price"));
    }

    #[test]
    fn other_variants_have_no_field() {
        assert_eq!(CoreError::Decryption.field(), None);
        assert_eq!(CoreError::EntryNotFound("x".into()).field(), None);
        assert_eq!(CoreError::UnsupportedVersion(2).field(), None);
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing journal");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref msg) if msg.contains("missing journal")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<Vec<u32>>("[1, 2").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_bincode_error() {
        let bin_err = bincode::deserialize::<String>(&[0xFF]).unwrap_err();
        let err: CoreError = bin_err.into();
        assert!(matches!(err, CoreError::Serialization(_)));
    }

    #[test]
    fn question_mark_propagates_io() {
        fn read_missing() -> Result<Vec<u8>, CoreError> {
            Ok(std::fs::read("/definitely/not/a/real/journal.stkj")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }

    #[test]
    fn is_std_error() {
        fn assert_error<E: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CoreError>();
    }
}
