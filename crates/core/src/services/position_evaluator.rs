use tracing::{debug, warn};

use crate::errors::CoreError;
use crate::models::lot::Lot;
use crate::models::money::round2;
use crate::models::position::{AggregateBuy, BreakevenSearch, PositionEvaluation, SellEvaluation};
use crate::models::settings::{Settings, DEFAULT_BREAKEVEN_MAX_ITERATIONS, DEFAULT_BREAKEVEN_TICK};

use super::fee_calculator::{FeeCalculator, RawTradeCharges};

/// Combines buy lots with a sell to produce cost basis, P&L and breakeven.
///
/// Stateless apart from the breakeven search parameters; every call is a
/// pure projection of its inputs.
#[derive(Debug, Clone)]
pub struct PositionEvaluator {
    calculator: FeeCalculator,
    tick: f64,
    max_iterations: u32,
}

impl PositionEvaluator {
    pub fn new() -> Self {
        Self {
            calculator: FeeCalculator::new(),
            tick: DEFAULT_BREAKEVEN_TICK,
            max_iterations: DEFAULT_BREAKEVEN_MAX_ITERATIONS,
        }
    }

    /// Use a custom breakeven tick size and iteration cap.
    ///
    /// The tick must be finite and positive and the cap at least 1.
    pub fn with_search(tick: f64, max_iterations: u32) -> Result<Self, CoreError> {
        if !tick.is_finite() || tick <= 0.0 {
            return Err(CoreError::validation(
                "breakeven_tick",
                format!("tick must be positive, got {tick}"),
            ));
        }
        if max_iterations == 0 {
            return Err(CoreError::validation("breakeven_max_iterations", "must be at least 1"));
        }
        Ok(Self {
            calculator: FeeCalculator::new(),
            tick,
            max_iterations,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, CoreError> {
        Self::with_search(settings.breakeven_tick, settings.breakeven_max_iterations)
    }

    #[must_use]
    pub fn calculator(&self) -> &FeeCalculator {
        &self.calculator
    }

    /// Aggregate buy charges across lots.
    ///
    /// Brokerage is clamped per lot since every lot is its own order. The raw
    /// components (including STT and stamp duty) are summed first and rounded
    /// once, so rounding error does not compound with the number of lots.
    /// An empty slice yields an all-zero aggregate.
    #[must_use]
    pub fn aggregate_buys(&self, lots: &[Lot]) -> AggregateBuy {
        let mut raw = RawTradeCharges::default();
        let mut turnover = 0.0;
        let mut quantity: u64 = 0;

        for lot in lots {
            let lot_turnover = lot.turnover();
            raw += self.calculator.raw_charges(lot_turnover);
            turnover += lot_turnover;
            quantity += u64::from(lot.quantity());
        }

        if quantity == 0 {
            return AggregateBuy::default();
        }

        let fees = self.calculator.finalize_buy(turnover, &raw);
        let total_payable = fees.total_payable();
        let qty = quantity as f64;

        AggregateBuy {
            lot_count: lots.len(),
            quantity,
            turnover: fees.turnover,
            brokerage: fees.brokerage,
            exchange_fee: fees.exchange_fee,
            regulatory_fee: fees.regulatory_fee,
            gst: fees.gst,
            stt: fees.stt,
            stamp_duty: fees.stamp_duty,
            total_charges: fees.total_charges,
            total_payable,
            avg_buy_price: turnover / qty,
            avg_cost_per_share: total_payable / qty,
        }
    }

    /// Evaluate selling `sell_qty` shares at `sell_price` out of a holding of
    /// `buy_qty` shares that cost `buy_total_payable` in total.
    ///
    /// A full exit uses `buy_total_payable` as-is; a partial one scales it per share.
    #[must_use]
    pub fn evaluate_sell(
        &self,
        sell_price: f64,
        sell_qty: u64,
        buy_qty: u64,
        buy_total_payable: f64,
    ) -> SellEvaluation {
        let fees = self.calculator.compute_sell_fees(sell_price, sell_qty);

        let proportional_buy_cost = if sell_qty == buy_qty || buy_qty == 0 {
            buy_total_payable
        } else {
            (buy_total_payable / buy_qty as f64) * sell_qty as f64
        };

        let net_pnl = fees.net_receivable - proportional_buy_cost;
        let pnl_percent = if proportional_buy_cost > 0.0 {
            net_pnl / proportional_buy_cost * 100.0
        } else {
            0.0
        };

        SellEvaluation {
            quantity: sell_qty,
            fees,
            proportional_buy_cost,
            net_pnl,
            pnl_percent,
        }
    }

    /// Evaluate a full position: buy lots against an optional sell.
    ///
    /// Fails if there are no buy lots or the sell is larger than the holding.
    pub fn evaluate_position(
        &self,
        buys: &[Lot],
        sell: Option<&Lot>,
    ) -> Result<PositionEvaluation, CoreError> {
        let buy = self.aggregate_buys(buys);
        if buy.quantity == 0 {
            return Err(CoreError::validation("buy_lots", "at least one buy lot is required"));
        }

        let sell = match sell {
            Some(lot) => {
                let sell_qty = u64::from(lot.quantity());
                Self::check_sell_quantity(sell_qty, buy.quantity)?;
                Some(self.evaluate_sell(lot.price(), sell_qty, buy.quantity, buy.total_payable))
            }
            None => None,
        };

        let quantity_sold = sell.map_or(0, |s| s.quantity);

        Ok(PositionEvaluation {
            buy,
            sell,
            quantity_bought: buy.quantity,
            quantity_sold,
            remaining_shares: buy.quantity - quantity_sold,
            breakeven_price: round2(buy.avg_cost_per_share),
        })
    }

    /// Find the lowest sell price, on a grid of `tick` steps starting at the
    /// weighted-average buy price, at which selling `sell_qty` shares does not
    /// lose money.
    ///
    /// The brokerage clamp and whole-rupee STT make the fee curve piecewise,
    /// so there is no closed-form inverse; the scan returns the first grid
    /// point with non-negative P&L. A `sell_qty` of 0 means "sell everything".
    /// Returns [`BreakevenSearch::Exhausted`] if the iteration cap is hit.
    pub fn find_breakeven_price(
        &self,
        buys: &[Lot],
        sell_qty: u64,
    ) -> Result<BreakevenSearch, CoreError> {
        let buy = self.aggregate_buys(buys);
        if buy.quantity == 0 {
            return Err(CoreError::validation("buy_lots", "at least one buy lot is required"));
        }

        let sell_qty = if sell_qty == 0 { buy.quantity } else { sell_qty };
        Self::check_sell_quantity(sell_qty, buy.quantity)?;

        let start = buy.avg_buy_price;
        for i in 0..self.max_iterations {
            let candidate = start + f64::from(i) * self.tick;
            let eval = self.evaluate_sell(candidate, sell_qty, buy.quantity, buy.total_payable);
            if eval.net_pnl >= 0.0 {
                debug!(start, candidate, iterations = i, "breakeven found");
                return Ok(BreakevenSearch::Found(candidate));
            }
        }

        let last = start + f64::from(self.max_iterations) * self.tick;
        warn!(
            start,
            last,
            max_iterations = self.max_iterations,
            "breakeven search exhausted without a non-negative P&L"
        );
        Ok(BreakevenSearch::Exhausted(last))
    }

    fn check_sell_quantity(sell_qty: u64, bought: u64) -> Result<(), CoreError> {
        if sell_qty > bought {
            return Err(CoreError::validation(
                "sell_quantity",
                format!("cannot sell {sell_qty} shares, only {bought} bought"),
            ));
        }
        Ok(())
    }
}

impl Default for PositionEvaluator {
    fn default() -> Self {
        Self::new()
    }
}
