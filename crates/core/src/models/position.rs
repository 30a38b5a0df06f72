use serde::{Deserialize, Serialize};

use super::fees::SellFeeBreakdown;

/// Buy-side charges aggregated across one or more lots.
///
/// Brokerage is clamped per lot (each lot is a separate order), but the
/// fee components are summed raw and rounded once here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateBuy {
    /// Number of lots aggregated
    pub lot_count: usize,
    /// Total shares bought
    pub quantity: u64,
    pub turnover: f64,
    pub brokerage: f64,
    pub exchange_fee: f64,
    pub regulatory_fee: f64,
    pub gst: f64,
    pub stt: f64,
    pub stamp_duty: f64,
    pub total_charges: f64,
    /// Turnover + total charges
    pub total_payable: f64,
    /// Weighted-average buy price (turnover / quantity), charges excluded
    pub avg_buy_price: f64,
    /// Total payable / quantity, charges included
    pub avg_cost_per_share: f64,
}

/// A sell evaluated against the cost basis of the shares it closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SellEvaluation {
    pub quantity: u64,
    pub fees: SellFeeBreakdown,
    /// Share of the total buy payable attributable to the sold quantity
    pub proportional_buy_cost: f64,
    /// Net receivable minus proportional buy cost (unrounded)
    pub net_pnl: f64,
    /// Net P&L as a percentage of the proportional buy cost
    pub pnl_percent: f64,
}

impl SellEvaluation {
    #[must_use]
    pub fn is_profit(&self) -> bool {
        self.net_pnl >= 0.0
    }
}

/// A position: buy lots against zero or one sell lot.
///
/// Never stored; recompute it whenever the underlying lots change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionEvaluation {
    pub buy: AggregateBuy,
    pub sell: Option<SellEvaluation>,
    pub quantity_bought: u64,
    pub quantity_sold: u64,
    pub remaining_shares: u64,
    /// Cost basis per share, rounded to 2 decimals
    pub breakeven_price: f64,
}

impl PositionEvaluation {
    /// Realized P&L, zero when nothing has been sold.
    #[must_use]
    pub fn net_pnl(&self) -> f64 {
        self.sell.map_or(0.0, |s| s.net_pnl)
    }

    #[must_use]
    pub fn pnl_percent(&self) -> f64 {
        self.sell.map_or(0.0, |s| s.pnl_percent)
    }
}

/// Outcome of the iterative breakeven search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BreakevenSearch {
    /// First candidate price at which net P&L is non-negative
    Found(f64),
    /// Iteration cap reached; carries the last candidate, which is NOT a breakeven
    Exhausted(f64),
}

impl BreakevenSearch {
    /// The candidate price, whether or not it is a true breakeven.
    #[must_use]
    pub fn price(&self) -> f64 {
        match self {
            BreakevenSearch::Found(p) | BreakevenSearch::Exhausted(p) => *p,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, BreakevenSearch::Found(_))
    }

    /// The breakeven price, or `None` if the search ran out of iterations.
    #[must_use]
    pub fn found(&self) -> Option<f64> {
        match self {
            BreakevenSearch::Found(p) => Some(*p),
            BreakevenSearch::Exhausted(_) => None,
        }
    }
}
