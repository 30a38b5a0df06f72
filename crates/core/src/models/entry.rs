use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User-entered fields for a journal entry, before charges are computed.
///
/// `sell_price` / `sell_quantity` are zero for a position that is still fully held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStockEntry {
    pub stock_name: String,
    pub buy_price: f64,
    pub buy_quantity: u32,
    #[serde(default)]
    pub sell_price: f64,
    #[serde(default)]
    pub sell_quantity: u32,
    pub purchase_date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewStockEntry {
    /// A buy-only entry.
    pub fn buy(
        stock_name: impl Into<String>,
        buy_price: f64,
        buy_quantity: u32,
        purchase_date: NaiveDate,
    ) -> Self {
        Self {
            stock_name: stock_name.into(),
            buy_price,
            buy_quantity,
            sell_price: 0.0,
            sell_quantity: 0,
            purchase_date,
            notes: None,
        }
    }

    /// Attach a (possibly partial) sell to this entry.
    #[must_use]
    pub fn with_sell(mut self, sell_price: f64, sell_quantity: u32) -> Self {
        self.sell_price = sell_price;
        self.sell_quantity = sell_quantity;
        self
    }

    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// One buy (possibly partially sold) record in the journal.
///
/// `buy_charges`, `breakeven_price`, `sell_charges`, `remaining_shares` and
/// `pnl` are computed by the charges engine when the entry is written and
/// recomputed whenever it is updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockEntry {
    /// Unique identifier
    pub id: Uuid,

    /// Stock name / ticker as entered (grouping is case-insensitive)
    pub stock_name: String,

    pub buy_price: f64,
    pub buy_quantity: u32,

    /// Total buy-side charges for this entry
    pub buy_charges: f64,

    /// (buy turnover + buy charges) / buy quantity
    pub breakeven_price: f64,

    /// Zero when nothing has been sold
    pub sell_price: f64,
    pub sell_quantity: u32,

    /// Total sell-side charges, zero when nothing has been sold
    pub sell_charges: f64,

    pub remaining_shares: u32,

    /// Realized P&L on the sold quantity
    pub pnl: f64,

    pub purchase_date: NaiveDate,

    /// When the entry was first written to the journal
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub notes: Option<String>,
}

impl StockEntry {
    /// Buy turnover plus buy charges.
    #[must_use]
    pub fn total_buy_cost(&self) -> f64 {
        self.buy_price * f64::from(self.buy_quantity) + self.buy_charges
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.remaining_shares == 0
    }

    /// The user-entered fields, e.g. for re-editing or re-importing.
    #[must_use]
    pub fn to_input(&self) -> NewStockEntry {
        NewStockEntry {
            stock_name: self.stock_name.clone(),
            buy_price: self.buy_price,
            buy_quantity: self.buy_quantity,
            sell_price: self.sell_price,
            sell_quantity: self.sell_quantity,
            purchase_date: self.purchase_date,
            notes: self.notes.clone(),
        }
    }
}

/// Sort order for entry listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntrySortOrder {
    /// Most recently created first (default for display)
    CreatedDesc,
    /// Oldest purchase date first
    PurchaseDateAsc,
    /// Newest purchase date first
    PurchaseDateDesc,
    /// Largest P&L first
    PnlDesc,
    /// Largest loss first
    PnlAsc,
    /// Alphabetical by stock name
    NameAsc,
}
