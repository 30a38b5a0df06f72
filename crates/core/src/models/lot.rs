use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Which side of a trade a lot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeSide {
    Buy,
    Sell,
}

impl TradeSide {
    fn field_prefix(self) -> &'static str {
        match self {
            TradeSide::Buy => "buy",
            TradeSide::Sell => "sell",
        }
    }
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "Buy"),
            TradeSide::Sell => write!(f, "Sell"),
        }
    }
}

/// A single buy or sell execution: a price per share and a whole number of shares.
///
/// Lots are immutable once constructed. Use [`Lot::buy`] / [`Lot::sell`] to build
/// a validated lot from user input; the field names in validation errors
/// (`buy_price`, `sell_quantity`, ...) match the journal's entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    price: f64,
    quantity: u32,
}

impl Lot {
    /// Build a buy lot. Price must be positive and finite, quantity non-zero.
    pub fn buy(price: f64, quantity: u32) -> Result<Self, CoreError> {
        Self::new(TradeSide::Buy, price, quantity)
    }

    /// Build a sell lot. Same rules as [`Lot::buy`].
    pub fn sell(price: f64, quantity: u32) -> Result<Self, CoreError> {
        Self::new(TradeSide::Sell, price, quantity)
    }

    pub fn new(side: TradeSide, price: f64, quantity: u32) -> Result<Self, CoreError> {
        let prefix = side.field_prefix();
        validate_price(&format!("{prefix}_price"), price)?;
        if quantity == 0 {
            return Err(CoreError::validation(
                format!("{prefix}_quantity"),
                "quantity must be at least 1 share",
            ));
        }
        Ok(Self { price, quantity })
    }

    #[must_use]
    pub fn price(&self) -> f64 {
        self.price
    }

    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Price × quantity for this lot.
    #[must_use]
    pub fn turnover(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }
}

/// Reject non-finite and non-positive prices, naming `field` in the error.
pub fn validate_price(field: &str, price: f64) -> Result<(), CoreError> {
    if !price.is_finite() {
        return Err(CoreError::validation(field, format!("price must be a finite number, got {price}")));
    }
    if price <= 0.0 {
        return Err(CoreError::validation(field, format!("price must be positive, got {price}")));
    }
    Ok(())
}
