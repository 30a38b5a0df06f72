use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Aggregate of every journal entry for one stock (grouped case-insensitively).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockAggregate {
    /// Stock name as written on the first entry of the group
    pub stock_name: String,

    /// Number of entries in the group
    pub entry_count: usize,

    /// Weighted average buy price across entries (charges excluded)
    pub avg_buy_price: f64,

    pub total_qty_bought: u64,
    pub total_qty_sold: u64,
    pub total_qty_left: u64,

    pub total_buy_charges: f64,

    /// Buy turnover + buy charges
    pub total_cost: f64,

    /// Total cost / total quantity bought
    pub breakeven_price: f64,

    /// Weighted average sell price, zero when nothing has been sold
    pub avg_sell_price: f64,

    pub total_sell_charges: f64,

    /// Sum of realized P&L across entries
    pub total_pnl: f64,

    /// Entry ids in the group, in journal order
    pub entry_ids: Vec<Uuid>,
}

/// Summary of the whole journal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalSummary {
    /// Total number of entries
    pub total_entries: usize,

    /// Number of distinct stocks
    pub total_stocks: usize,

    /// Sum of buy turnover + buy charges across entries
    pub total_invested: f64,

    /// Sum of sell turnover across entries
    pub total_sell_value: f64,

    /// Sum of realized P&L across entries
    pub total_pnl: f64,

    /// total_pnl / total_invested × 100
    pub total_pnl_pct: f64,

    /// Per-stock breakdown, sorted by stock name
    pub stocks: Vec<StockAggregate>,
}
