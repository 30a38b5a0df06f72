use crate::models::fees::{BuyFeeBreakdown, FeeSchedule, SellFeeBreakdown};
use crate::models::money::{round2, round_to_integer};

/// Unrounded per-order charges for a given turnover.
///
/// Aggregation sums these across lots before rounding, so they are exposed
/// to the position evaluator but not outside the crate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RawTradeCharges {
    pub brokerage: f64,
    pub exchange_fee: f64,
    pub regulatory_fee: f64,
    pub stt: f64,
    pub stamp_duty: f64,
}

impl RawTradeCharges {
    /// Brokerage + exchange + regulatory: the base GST is charged on.
    pub fn gst_base(&self) -> f64 {
        self.brokerage + self.exchange_fee + self.regulatory_fee
    }
}

impl std::ops::AddAssign for RawTradeCharges {
    fn add_assign(&mut self, rhs: Self) {
        self.brokerage += rhs.brokerage;
        self.exchange_fee += rhs.exchange_fee;
        self.regulatory_fee += rhs.regulatory_fee;
        self.stt += rhs.stt;
        self.stamp_duty += rhs.stamp_duty;
    }
}

/// Computes buy-side and sell-side charge breakdowns from the fee schedule.
///
/// Pure and stateless. Callers validate prices and
/// quantities beforehand (see [`crate::models::lot::Lot`]); a zero quantity
/// yields a zero breakdown rather than an error.
#[derive(Debug, Clone, Default)]
pub struct FeeCalculator {
    schedule: FeeSchedule,
}

impl FeeCalculator {
    pub fn new() -> Self {
        Self {
            schedule: FeeSchedule::default(),
        }
    }

    #[must_use]
    pub fn schedule(&self) -> &FeeSchedule {
        &self.schedule
    }

    /// Charges for buying `quantity` shares at `price`.
    ///
    /// Brokerage is 0.1% of turnover clamped to ₹5..₹20. GST is computed on the
    /// unrounded brokerage, exchange and SEBI fees. STT and stamp duty are
    /// rounded to whole rupees; everything else to paise.
    #[must_use]
    pub fn compute_buy_fees(&self, price: f64, quantity: u64) -> BuyFeeBreakdown {
        if quantity == 0 {
            return BuyFeeBreakdown::default();
        }

        let turnover = price * quantity as f64;
        let raw = self.raw_charges(turnover);
        self.finalize_buy(turnover, &raw)
    }

    /// Charges for selling `quantity` shares at `price`.
    ///
    /// Adds the flat depository charge (₹16.50 + ₹3.50) and its own 18% GST,
    /// kept apart from the GST on trade charges. No stamp duty on the sell side.
    #[must_use]
    pub fn compute_sell_fees(&self, price: f64, quantity: u64) -> SellFeeBreakdown {
        if quantity == 0 {
            return SellFeeBreakdown::default();
        }

        let turnover = price * quantity as f64;
        let raw = self.raw_charges(turnover);

        let brokerage = round2(raw.brokerage);
        let exchange_fee = round2(raw.exchange_fee);
        let regulatory_fee = round2(raw.regulatory_fee);
        let gst_on_trade = round2(self.gst_on(raw.gst_base()));
        let stt = round_to_integer(raw.stt);

        let depository_charge = round2(self.schedule.depository_charge());
        let gst_on_depository = round2(self.gst_on(depository_charge));

        let trade_charges = brokerage + exchange_fee + regulatory_fee + gst_on_trade + stt;
        let external_deductions = depository_charge + gst_on_depository;
        let contract_note_total = round2(turnover - trade_charges);

        SellFeeBreakdown {
            turnover: round2(turnover),
            brokerage,
            exchange_fee,
            regulatory_fee,
            stt,
            gst_on_trade,
            contract_note_total,
            depository_charge,
            gst_on_depository,
            external_deductions: round2(external_deductions),
            total_charges: round2(trade_charges + external_deductions),
            net_receivable: round2(contract_note_total - external_deductions),
        }
    }

    /// Cost per share including buy charges, rounded to paise. Zero for zero quantity.
    #[must_use]
    pub fn breakeven(&self, buy_price: f64, buy_quantity: u64, buy_charges: f64) -> f64 {
        if buy_quantity == 0 {
            return 0.0;
        }
        let qty = buy_quantity as f64;
        round2((buy_price * qty + buy_charges) / qty)
    }

    /// Realized P&L for `sell_qty` shares out of a `buy_qty` purchase.
    ///
    /// Buy charges are attributed to the sold shares pro rata. Rounded to paise;
    /// zero when nothing was sold.
    #[must_use]
    pub fn pnl(
        &self,
        buy_price: f64,
        buy_qty: u64,
        buy_charges: f64,
        sell_price: f64,
        sell_qty: u64,
        sell_charges: f64,
    ) -> f64 {
        if sell_qty == 0 || buy_qty == 0 {
            return 0.0;
        }
        let sold = sell_qty as f64;
        let proportional_buy_cost = buy_price * sold + buy_charges * sold / buy_qty as f64;
        let sell_value = sell_price * sold - sell_charges;
        round2(sell_value - proportional_buy_cost)
    }

    /// Shares still held after a sell. Saturates at zero.
    #[must_use]
    pub fn remaining_shares(&self, buy_qty: u32, sell_qty: u32) -> u32 {
        buy_qty.saturating_sub(sell_qty)
    }

    // ── Internal ────────────────────────────────────────────────────

    pub(crate) fn raw_charges(&self, turnover: f64) -> RawTradeCharges {
        let s = &self.schedule;
        RawTradeCharges {
            brokerage: (turnover * s.brokerage_rate).clamp(s.brokerage_min, s.brokerage_max),
            exchange_fee: turnover * s.exchange_rate,
            regulatory_fee: turnover * s.regulatory_rate,
            stt: turnover * s.stt_rate,
            stamp_duty: turnover * s.stamp_duty_rate,
        }
    }

    pub(crate) fn gst_on(&self, amount: f64) -> f64 {
        amount * self.schedule.gst_rate
    }

    /// Round raw buy charges into a breakdown. Shared by the single-lot and
    /// aggregate paths so both follow the same rounding rules.
    pub(crate) fn finalize_buy(&self, turnover: f64, raw: &RawTradeCharges) -> BuyFeeBreakdown {
        let brokerage = round2(raw.brokerage);
        let exchange_fee = round2(raw.exchange_fee);
        let regulatory_fee = round2(raw.regulatory_fee);
        let gst = round2(self.gst_on(raw.gst_base()));
        let stt = round_to_integer(raw.stt);
        let stamp_duty = round_to_integer(raw.stamp_duty);

        BuyFeeBreakdown {
            turnover: round2(turnover),
            brokerage,
            exchange_fee,
            regulatory_fee,
            gst,
            stt,
            stamp_duty,
            total_charges: round2(brokerage + exchange_fee + regulatory_fee + gst + stt + stamp_duty),
        }
    }
}
