use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::entry::{NewStockEntry, StockEntry};
use crate::models::journal::Journal;
use crate::models::lot::validate_price;

use super::fee_calculator::FeeCalculator;

/// Manages journal entries and attaches charges/P&L to them at write time.
///
/// Pure business logic, no I/O.
pub struct JournalService {
    calculator: FeeCalculator,
}

impl JournalService {
    pub fn new() -> Self {
        Self {
            calculator: FeeCalculator::new(),
        }
    }

    /// Validate user input and compute every derived field of a new entry.
    ///
    /// The entry gets a fresh id and `created_at = now`.
    pub fn create_entry(&self, input: NewStockEntry) -> Result<StockEntry, CoreError> {
        self.build_entry(Uuid::new_v4(), Utc::now(), input)
    }

    /// Add a new entry to the journal. Returns its id.
    pub fn add_entry(&self, journal: &mut Journal, input: NewStockEntry) -> Result<Uuid, CoreError> {
        let entry = self.create_entry(input)?;
        let id = entry.id;
        debug!(%id, stock = %entry.stock_name, pnl = entry.pnl, "adding journal entry");
        journal.entries.push(entry);
        Ok(id)
    }

    /// Insert an already-built entry (undo, import). Derived fields are
    /// recomputed from the entry's inputs; id and `created_at` are kept.
    pub fn restore_entry(&self, journal: &mut Journal, entry: StockEntry) -> Result<Uuid, CoreError> {
        if journal.entries.iter().any(|e| e.id == entry.id) {
            return Err(CoreError::validation(
                "id",
                format!("entry {} already exists in the journal", entry.id),
            ));
        }
        let rebuilt = self.build_entry(entry.id, entry.created_at, entry.to_input())?;
        let id = rebuilt.id;
        journal.entries.push(rebuilt);
        Ok(id)
    }

    /// Replace an entry's inputs and recompute its charges and P&L.
    /// Keeps the id and creation time; leaves the journal untouched on error.
    pub fn update_entry(
        &self,
        journal: &mut Journal,
        entry_id: Uuid,
        input: NewStockEntry,
    ) -> Result<(), CoreError> {
        let idx = Self::position_of(journal, entry_id)?;
        let created_at = journal.entries[idx].created_at;
        let updated = self.build_entry(entry_id, created_at, input)?;
        debug!(id = %entry_id, pnl = updated.pnl, "updating journal entry");
        journal.entries[idx] = updated;
        Ok(())
    }

    /// Remove an entry by id and hand it back.
    pub fn remove_entry(&self, journal: &mut Journal, entry_id: Uuid) -> Result<StockEntry, CoreError> {
        let idx = Self::position_of(journal, entry_id)?;
        debug!(id = %entry_id, "removing journal entry");
        Ok(journal.entries.remove(idx))
    }

    /// All entries, most recently created first.
    pub fn get_entries<'a>(&self, journal: &'a Journal) -> Vec<&'a StockEntry> {
        let mut entries: Vec<&StockEntry> = journal.entries.iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        entries
    }

    /// Set or clear the notes on an existing entry.
    pub fn set_notes(
        &self,
        journal: &mut Journal,
        entry_id: Uuid,
        notes: Option<String>,
    ) -> Result<(), CoreError> {
        let idx = Self::position_of(journal, entry_id)?;
        journal.entries[idx].notes = notes;
        Ok(())
    }

    /// Validate a new entry's inputs.
    ///
    /// Rules:
    /// - Stock name must not be blank
    /// - Buy price positive, buy quantity at least 1
    /// - Can't sell more shares than were bought
    /// - A sell needs a positive price
    pub fn validate(&self, input: &NewStockEntry) -> Result<(), CoreError> {
        if input.stock_name.trim().is_empty() {
            return Err(CoreError::validation("stock_name", "stock name must not be empty"));
        }

        validate_price("buy_price", input.buy_price)?;

        if input.buy_quantity == 0 {
            return Err(CoreError::validation("buy_quantity", "quantity must be at least 1 share"));
        }

        if input.sell_quantity > input.buy_quantity {
            return Err(CoreError::validation(
                "sell_quantity",
                format!(
                    "cannot sell {} shares, only {} bought",
                    input.sell_quantity, input.buy_quantity
                ),
            ));
        }

        if input.sell_quantity > 0 {
            validate_price("sell_price", input.sell_price)?;
        } else if !input.sell_price.is_finite() || input.sell_price < 0.0 {
            return Err(CoreError::validation(
                "sell_price",
                format!("price must be zero or positive, got {}", input.sell_price),
            ));
        }

        Ok(())
    }

    // ── Internal ────────────────────────────────────────────────────

    fn build_entry(
        &self,
        id: Uuid,
        created_at: chrono::DateTime<Utc>,
        input: NewStockEntry,
    ) -> Result<StockEntry, CoreError> {
        self.validate(&input)?;

        let calc = &self.calculator;
        let buy_qty = u64::from(input.buy_quantity);
        let sell_qty = u64::from(input.sell_quantity);

        let buy_charges = calc.compute_buy_fees(input.buy_price, buy_qty).total_charges;
        let breakeven_price = calc.breakeven(input.buy_price, buy_qty, buy_charges);
        let sell_charges = if sell_qty > 0 {
            calc.compute_sell_fees(input.sell_price, sell_qty).total_charges
        } else {
            0.0
        };
        let remaining_shares = calc.remaining_shares(input.buy_quantity, input.sell_quantity);
        let pnl = calc.pnl(
            input.buy_price,
            buy_qty,
            buy_charges,
            input.sell_price,
            sell_qty,
            sell_charges,
        );

        Ok(StockEntry {
            id,
            stock_name: input.stock_name.trim().to_string(),
            buy_price: input.buy_price,
            buy_quantity: input.buy_quantity,
            buy_charges,
            breakeven_price,
            sell_price: input.sell_price,
            sell_quantity: input.sell_quantity,
            sell_charges,
            remaining_shares,
            pnl,
            purchase_date: input.purchase_date,
            created_at,
            notes: input.notes,
        })
    }

    fn position_of(journal: &Journal, entry_id: Uuid) -> Result<usize, CoreError> {
        journal
            .entries
            .iter()
            .position(|e| e.id == entry_id)
            .ok_or_else(|| CoreError::EntryNotFound(entry_id.to_string()))
    }
}

impl Default for JournalService {
    fn default() -> Self {
        Self::new()
    }
}
