use std::collections::BTreeMap;

use crate::models::analytics::{JournalSummary, StockAggregate};
use crate::models::entry::StockEntry;
use crate::models::journal::Journal;

/// Groups journal entries by stock and computes per-stock and journal-wide totals.
///
/// Works purely from the charges and P&L already stored on each entry.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    /// Group entries by stock name, case-insensitively.
    /// Keys are uppercased names; groups keep journal order.
    pub fn group_by_stock<'a>(&self, entries: &'a [StockEntry]) -> BTreeMap<String, Vec<&'a StockEntry>> {
        let mut groups: BTreeMap<String, Vec<&StockEntry>> = BTreeMap::new();
        for entry in entries {
            groups
                .entry(entry.stock_name.to_uppercase())
                .or_default()
                .push(entry);
        }
        groups
    }

    /// Aggregate a group of entries for one stock. `None` for an empty group.
    pub fn aggregate_stock(&self, group: &[&StockEntry]) -> Option<StockAggregate> {
        let first = group.first()?;

        let mut total_qty_bought: u64 = 0;
        let mut total_qty_sold: u64 = 0;
        let mut total_spent = 0.0;
        let mut total_buy_charges = 0.0;
        let mut total_sell_value = 0.0;
        let mut total_sell_charges = 0.0;
        let mut total_pnl = 0.0;

        for entry in group {
            let bought = u64::from(entry.buy_quantity);
            let sold = u64::from(entry.sell_quantity);
            total_qty_bought += bought;
            total_qty_sold += sold;
            total_spent += entry.buy_price * bought as f64;
            total_buy_charges += entry.buy_charges;
            total_sell_value += entry.sell_price * sold as f64;
            total_sell_charges += entry.sell_charges;
            total_pnl += entry.pnl;
        }

        let total_cost = total_spent + total_buy_charges;
        let (avg_buy_price, breakeven_price) = if total_qty_bought > 0 {
            let qty = total_qty_bought as f64;
            (total_spent / qty, total_cost / qty)
        } else {
            (0.0, 0.0)
        };
        let avg_sell_price = if total_qty_sold > 0 {
            total_sell_value / total_qty_sold as f64
        } else {
            0.0
        };

        Some(StockAggregate {
            stock_name: first.stock_name.clone(),
            entry_count: group.len(),
            avg_buy_price,
            total_qty_bought,
            total_qty_sold,
            total_qty_left: total_qty_bought.saturating_sub(total_qty_sold),
            total_buy_charges,
            total_cost,
            breakeven_price,
            avg_sell_price,
            total_sell_charges,
            total_pnl,
            entry_ids: group.iter().map(|e| e.id).collect(),
        })
    }

    /// Per-stock aggregates for the whole journal, sorted by stock name.
    pub fn stock_aggregates(&self, journal: &Journal) -> Vec<StockAggregate> {
        self.group_by_stock(&journal.entries)
            .values()
            .filter_map(|group| self.aggregate_stock(group))
            .collect()
    }

    /// Journal-wide totals: invested, realized sell value, P&L and the per-stock breakdown.
    pub fn summary(&self, journal: &Journal) -> JournalSummary {
        let stocks = self.stock_aggregates(journal);

        let total_invested: f64 = journal.entries.iter().map(StockEntry::total_buy_cost).sum();
        let total_sell_value: f64 = journal
            .entries
            .iter()
            .map(|e| e.sell_price * f64::from(e.sell_quantity))
            .sum();
        let total_pnl: f64 = journal.entries.iter().map(|e| e.pnl).sum();
        let total_pnl_pct = if total_invested > 0.0 {
            total_pnl / total_invested * 100.0
        } else {
            0.0
        };

        JournalSummary {
            total_entries: journal.entries.len(),
            total_stocks: stocks.len(),
            total_invested,
            total_sell_value,
            total_pnl,
            total_pnl_pct,
            stocks,
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
