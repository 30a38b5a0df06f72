use serde::{Deserialize, Serialize};

/// Tick size for the breakeven search (₹0.01).
pub const DEFAULT_BREAKEVEN_TICK: f64 = 0.01;

/// Iteration cap for the breakeven search.
pub const DEFAULT_BREAKEVEN_MAX_ITERATIONS: u32 = 5000;

/// User-configurable settings, stored inside the encrypted journal file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Price step used by the breakeven search.
    #[serde(default = "default_tick")]
    pub breakeven_tick: f64,

    /// Maximum number of candidate prices the breakeven search evaluates.
    #[serde(default = "default_max_iterations")]
    pub breakeven_max_iterations: u32,
}

fn default_tick() -> f64 {
    DEFAULT_BREAKEVEN_TICK
}

fn default_max_iterations() -> u32 {
    DEFAULT_BREAKEVEN_MAX_ITERATIONS
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            breakeven_tick: DEFAULT_BREAKEVEN_TICK,
            breakeven_max_iterations: DEFAULT_BREAKEVEN_MAX_ITERATIONS,
        }
    }
}
