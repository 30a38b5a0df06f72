use serde::{Deserialize, Serialize};

/// The brokerage fee schedule for equity delivery trades on NSE/BSE.
///
/// There is exactly one schedule; `FeeSchedule::default()` is the authoritative
/// source for every rate used by the charges engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Brokerage as a fraction of turnover (0.1%)
    pub brokerage_rate: f64,
    /// Minimum brokerage per order (₹5)
    pub brokerage_min: f64,
    /// Maximum brokerage per order (₹20)
    pub brokerage_max: f64,
    /// Exchange transaction charge (0.003%)
    pub exchange_rate: f64,
    /// SEBI turnover fee (0.00001%)
    pub regulatory_rate: f64,
    /// GST on brokerage, exchange and SEBI charges, and on depository charges (18%)
    pub gst_rate: f64,
    /// Securities transaction tax, both sides (0.1%)
    pub stt_rate: f64,
    /// Stamp duty, buy side only (0.015%)
    pub stamp_duty_rate: f64,
    /// Broker's depository fee per sell trade (₹16.50)
    pub broker_dp_charge: f64,
    /// Depository participant (CDSL) fee per sell trade (₹3.50)
    pub depository_dp_charge: f64,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            brokerage_rate: 0.001,
            brokerage_min: 5.0,
            brokerage_max: 20.0,
            exchange_rate: 0.000_03,
            regulatory_rate: 0.000_000_1,
            gst_rate: 0.18,
            stt_rate: 0.001,
            stamp_duty_rate: 0.000_15,
            broker_dp_charge: 16.50,
            depository_dp_charge: 3.50,
        }
    }
}

impl FeeSchedule {
    /// Flat depository charge per sell trade, independent of size.
    #[must_use]
    pub fn depository_charge(&self) -> f64 {
        self.broker_dp_charge + self.depository_dp_charge
    }
}

/// Charges for the buy side of a trade (one lot, or several lots aggregated).
///
/// Every field is rounded to 2 decimals except `stt` and `stamp_duty`,
/// which are whole rupees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BuyFeeBreakdown {
    pub turnover: f64,
    pub brokerage: f64,
    pub exchange_fee: f64,
    pub regulatory_fee: f64,
    /// 18% of brokerage + exchange + regulatory fees (not of STT or stamp duty)
    pub gst: f64,
    pub stt: f64,
    pub stamp_duty: f64,
    /// Sum of the charge fields above
    pub total_charges: f64,
}

impl BuyFeeBreakdown {
    /// Turnover plus all charges: what the buyer actually pays.
    #[must_use]
    pub fn total_payable(&self) -> f64 {
        self.turnover + self.total_charges
    }
}

/// Charges for the sell side of a trade.
///
/// Trade-level charges appear on the broker's contract note; the depository
/// charge and its GST are deducted separately afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SellFeeBreakdown {
    pub turnover: f64,
    pub brokerage: f64,
    pub exchange_fee: f64,
    pub regulatory_fee: f64,
    pub stt: f64,
    /// 18% of brokerage + exchange + regulatory fees
    pub gst_on_trade: f64,
    /// Turnover minus trade-level charges, as reported on the contract note
    pub contract_note_total: f64,
    pub depository_charge: f64,
    pub gst_on_depository: f64,
    /// Depository charge plus its GST
    pub external_deductions: f64,
    pub total_charges: f64,
    /// Contract note total minus external deductions: cash actually received
    pub net_receivable: f64,
}

impl SellFeeBreakdown {
    /// Charges that appear on the contract note (everything except depository).
    #[must_use]
    pub fn trade_charges(&self) -> f64 {
        self.brokerage + self.exchange_fee + self.regulatory_fee + self.gst_on_trade + self.stt
    }
}
