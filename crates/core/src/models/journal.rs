use serde::{Deserialize, Serialize};

use super::entry::StockEntry;
use super::settings::Settings;

/// The main data container. Everything in here gets serialized,
/// encrypted, and saved to the portable journal file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Journal {
    /// All stock entries, oldest first (insertion order)
    pub entries: Vec<StockEntry>,

    /// User settings (breakeven search parameters)
    pub settings: Settings,

    /// Entries that have been removed but can be restored (undo support).
    #[serde(default)]
    pub trash: Vec<StockEntry>,
}
