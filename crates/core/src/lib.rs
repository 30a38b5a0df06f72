pub mod errors;
pub mod models;
pub mod services;
pub mod storage;

use models::{
    analytics::{JournalSummary, StockAggregate},
    entry::{EntrySortOrder, NewStockEntry, StockEntry},
    fees::{BuyFeeBreakdown, SellFeeBreakdown},
    journal::Journal,
    lot::Lot,
    position::{BreakevenSearch, PositionEvaluation},
    settings::{Settings, DEFAULT_BREAKEVEN_MAX_ITERATIONS, DEFAULT_BREAKEVEN_TICK},
};
use services::{
    analytics_service::AnalyticsService, journal_service::JournalService,
    position_evaluator::PositionEvaluator,
};
use storage::manager::StorageManager;
use tracing::warn;
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the Stock Journal core library.
/// Holds the journal state and the services that operate on it.
#[must_use]
pub struct StockJournal {
    journal: Journal,
    journal_service: JournalService,
    analytics_service: AnalyticsService,
    evaluator: PositionEvaluator,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for StockJournal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StockJournal")
            .field("entries", &self.journal.entries.len())
            .field("trash", &self.journal.trash.len())
            .field("settings", &self.journal.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl StockJournal {
    /// Create a brand new empty journal with default settings.
    pub fn create_new() -> Self {
        Self::build(Journal::default())
    }

    /// Load an existing journal from encrypted bytes (password required).
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let journal = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(journal))
    }

    /// Save the journal to encrypted bytes. Clears the unsaved-changes flag.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.journal, password)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Self, CoreError> {
        let journal = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(journal))
    }

    /// Save to an encrypted file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, password: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.journal, path, password)?;
        self.dirty = false;
        Ok(())
    }

    // ── Charges Calculator ──────────────────────────────────────────

    /// Buy-side charges for a single order.
    #[must_use]
    pub fn compute_buy_fees(&self, lot: &Lot) -> BuyFeeBreakdown {
        self.evaluator
            .calculator()
            .compute_buy_fees(lot.price(), u64::from(lot.quantity()))
    }

    /// Sell-side charges for a single order.
    #[must_use]
    pub fn compute_sell_fees(&self, lot: &Lot) -> SellFeeBreakdown {
        self.evaluator
            .calculator()
            .compute_sell_fees(lot.price(), u64::from(lot.quantity()))
    }

    /// Full breakdown for buy lots against an optional sell.
    pub fn evaluate_position(
        &self,
        buys: &[Lot],
        sell: Option<&Lot>,
    ) -> Result<PositionEvaluation, CoreError> {
        self.evaluator.evaluate_position(buys, sell)
    }

    /// Lowest sell price at which selling `sell_qty` shares (0 = all) breaks even.
    /// Uses the tick size and iteration cap from the journal settings.
    pub fn find_breakeven_price(
        &self,
        buys: &[Lot],
        sell_qty: u64,
    ) -> Result<BreakevenSearch, CoreError> {
        self.evaluator.find_breakeven_price(buys, sell_qty)
    }

    // ── Entry Management ────────────────────────────────────────────

    /// Add an entry; charges, breakeven and P&L are computed now.
    pub fn add_entry(&mut self, input: NewStockEntry) -> Result<Uuid, CoreError> {
        let id = self.journal_service.add_entry(&mut self.journal, input)?;
        self.dirty = true;
        Ok(id)
    }

    /// Replace an entry's inputs and recompute its derived fields.
    pub fn update_entry(&mut self, entry_id: Uuid, input: NewStockEntry) -> Result<(), CoreError> {
        self.journal_service
            .update_entry(&mut self.journal, entry_id, input)?;
        self.dirty = true;
        Ok(())
    }

    /// Remove an entry permanently.
    pub fn remove_entry(&mut self, entry_id: Uuid) -> Result<(), CoreError> {
        self.journal_service
            .remove_entry(&mut self.journal, entry_id)?;
        self.dirty = true;
        Ok(())
    }

    /// Set or clear notes on an existing entry.
    pub fn set_entry_notes(&mut self, entry_id: Uuid, notes: Option<String>) -> Result<(), CoreError> {
        self.journal_service
            .set_notes(&mut self.journal, entry_id, notes)?;
        self.dirty = true;
        Ok(())
    }

    #[must_use]
    pub fn get_entry(&self, entry_id: Uuid) -> Option<&StockEntry> {
        self.journal.entries.iter().find(|e| e.id == entry_id)
    }

    /// All entries, most recently created first.
    #[must_use]
    pub fn get_entries(&self) -> Vec<&StockEntry> {
        self.journal_service.get_entries(&self.journal)
    }

    /// Entries for one stock (case-insensitive), most recently created first.
    #[must_use]
    pub fn get_entries_for_stock(&self, stock_name: &str) -> Vec<&StockEntry> {
        let upper = stock_name.trim().to_uppercase();
        self.get_entries()
            .into_iter()
            .filter(|e| e.stock_name.to_uppercase() == upper)
            .collect()
    }

    /// Search entries by stock name and notes (case-insensitive substring).
    #[must_use]
    pub fn search_entries(&self, query: &str) -> Vec<&StockEntry> {
        let q = query.to_lowercase();
        self.journal
            .entries
            .iter()
            .filter(|e| {
                e.stock_name.to_lowercase().contains(&q)
                    || e.notes.as_deref().unwrap_or("").to_lowercase().contains(&q)
            })
            .collect()
    }

    #[must_use]
    pub fn get_entries_sorted(&self, order: &EntrySortOrder) -> Vec<&StockEntry> {
        let mut entries: Vec<&StockEntry> = self.journal.entries.iter().collect();
        match order {
            EntrySortOrder::CreatedDesc => entries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            EntrySortOrder::PurchaseDateAsc => entries.sort_by(|a, b| a.purchase_date.cmp(&b.purchase_date)),
            EntrySortOrder::PurchaseDateDesc => entries.sort_by(|a, b| b.purchase_date.cmp(&a.purchase_date)),
            EntrySortOrder::PnlDesc => entries.sort_by(|a, b| b.pnl.total_cmp(&a.pnl)),
            EntrySortOrder::PnlAsc => entries.sort_by(|a, b| a.pnl.total_cmp(&b.pnl)),
            EntrySortOrder::NameAsc => entries.sort_by_key(|e| e.stock_name.to_uppercase()),
        }
        entries
    }

    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.journal.entries.len()
    }

    // ── Analytics ───────────────────────────────────────────────────

    /// Per-stock aggregates (entries grouped case-insensitively by name).
    #[must_use]
    pub fn stock_aggregates(&self) -> Vec<StockAggregate> {
        self.analytics_service.stock_aggregates(&self.journal)
    }

    /// Aggregate for one stock, if the journal has any entries for it.
    #[must_use]
    pub fn stock_aggregate(&self, stock_name: &str) -> Option<StockAggregate> {
        let upper = stock_name.trim().to_uppercase();
        let groups = self.analytics_service.group_by_stock(&self.journal.entries);
        groups
            .get(&upper)
            .and_then(|group| self.analytics_service.aggregate_stock(group))
    }

    /// Journal-wide totals with the per-stock breakdown.
    #[must_use]
    pub fn get_summary(&self) -> JournalSummary {
        self.analytics_service.summary(&self.journal)
    }

    // ── Settings ────────────────────────────────────────────────────

    #[must_use]
    pub fn get_settings(&self) -> &Settings {
        &self.journal.settings
    }

    /// Change the breakeven search tick size and iteration cap.
    pub fn set_breakeven_search(&mut self, tick: f64, max_iterations: u32) -> Result<(), CoreError> {
        self.evaluator = PositionEvaluator::with_search(tick, max_iterations)?;
        self.journal.settings.breakeven_tick = tick;
        self.journal.settings.breakeven_max_iterations = max_iterations;
        self.dirty = true;
        Ok(())
    }

    // ── Password & Dirty State ──────────────────────────────────────

    /// Re-encrypt the journal with a new password.
    ///
    /// `last_saved_bytes` must be the most recently saved bytes; the current
    /// password is verified by decrypting them. Fails with `CoreError::Decryption`
    /// if it is wrong.
    pub fn change_password(
        &mut self,
        last_saved_bytes: &[u8],
        current_password: &str,
        new_password: &str,
    ) -> Result<Vec<u8>, CoreError> {
        StorageManager::load_from_bytes(last_saved_bytes, current_password)?;
        let new_bytes = StorageManager::save_to_bytes(&self.journal, new_password)?;
        self.dirty = false;
        Ok(new_bytes)
    }

    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Undo (Trash) ────────────────────────────────────────────────

    /// Remove an entry and keep it in the trash for potential undo.
    pub fn remove_entry_to_trash(&mut self, entry_id: Uuid) -> Result<StockEntry, CoreError> {
        let entry = self
            .journal_service
            .remove_entry(&mut self.journal, entry_id)?;
        self.journal.trash.push(entry.clone());
        self.dirty = true;
        Ok(entry)
    }

    /// Restore the most recently trashed entry. `None` if the trash is empty.
    pub fn undo_last_removal(&mut self) -> Result<Option<StockEntry>, CoreError> {
        let entry = match self.journal.trash.pop() {
            Some(e) => e,
            None => return Ok(None),
        };

        if let Err(e) = self
            .journal_service
            .restore_entry(&mut self.journal, entry.clone())
        {
            self.journal.trash.push(entry);
            return Err(e);
        }
        self.dirty = true;
        Ok(Some(entry))
    }

    #[must_use]
    pub fn get_trash(&self) -> &[StockEntry] {
        &self.journal.trash
    }

    pub fn clear_trash(&mut self) {
        if !self.journal.trash.is_empty() {
            self.journal.trash.clear();
            self.dirty = true;
        }
    }

    // ── Export / Import ─────────────────────────────────────────────

    /// Export all entries as pretty JSON.
    pub fn export_entries_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.journal.entries)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize entries to JSON: {e}")))
    }

    /// Export all entries as CSV, one row per entry.
    #[must_use]
    pub fn export_entries_to_csv(&self) -> String {
        let mut csv = String::from(
            "id,stock_name,buy_price,buy_quantity,buy_charges,breakeven_price,\
             sell_price,sell_quantity,sell_charges,remaining_shares,pnl,purchase_date,notes\n",
        );
        for e in &self.journal.entries {
            csv.push_str(&format!(
                "{},{},{:.2},{},{:.2},{:.2},{:.2},{},{:.2},{},{:.2},{},{}\n",
                e.id,
                csv_escape(&e.stock_name),
                e.buy_price,
                e.buy_quantity,
                e.buy_charges,
                e.breakeven_price,
                e.sell_price,
                e.sell_quantity,
                e.sell_charges,
                e.remaining_shares,
                e.pnl,
                e.purchase_date,
                csv_escape(e.notes.as_deref().unwrap_or("")),
            ));
        }
        csv
    }

    /// Import entries from a JSON array of entries.
    ///
    /// Accepts the output of `export_entries_to_json` as well as bare user
    /// fields (`stock_name`, `buy_price`, `buy_quantity`, `purchase_date`, and
    /// optionally the sell fields and notes). Ids and computed figures in the
    /// input are ignored: every entry gets a fresh id and its charges are
    /// recomputed. All-or-nothing. Returns the number imported.
    pub fn import_entries_from_json(&mut self, json: &str) -> Result<usize, CoreError> {
        let inputs: Vec<NewStockEntry> = serde_json::from_str(json)?;
        let count = inputs.len();

        let mut staged = self.journal.clone();
        for input in inputs {
            self.journal_service.add_entry(&mut staged, input)?;
        }

        self.journal = staged;
        self.dirty = true;
        Ok(count)
    }

    /// Unencrypted JSON snapshot of the whole journal (debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.journal)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize journal: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Wrap a journal in the facade. Invalid breakeven search settings from a
    /// loaded file are reset to the defaults.
    fn build(mut journal: Journal) -> Self {
        let evaluator = match PositionEvaluator::from_settings(&journal.settings) {
            Ok(evaluator) => evaluator,
            Err(e) => {
                warn!(error = %e, "invalid breakeven search settings, using defaults");
                journal.settings.breakeven_tick = DEFAULT_BREAKEVEN_TICK;
                journal.settings.breakeven_max_iterations = DEFAULT_BREAKEVEN_MAX_ITERATIONS;
                PositionEvaluator::new()
            }
        };
        Self {
            journal,
            journal_service: JournalService::new(),
            analytics_service: AnalyticsService::new(),
            evaluator,
            dirty: false,
        }
    }
}

/// Quote a CSV field if it contains a comma, quote or newline.
fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
