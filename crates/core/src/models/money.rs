//! Rounding and display helpers for rupee amounts.
//!
//! Every rounding step in the charges engine goes through these two
//! functions so buy-side, sell-side and aggregate figures agree to the paisa.

/// Round half up to the nearest whole rupee (`0.5 -> 1`, `0.49 -> 0`).
///
/// Used for STT and stamp duty, which are charged in whole rupees.
#[must_use]
pub fn round_to_integer(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Round half up to 2 decimal places (paise).
///
/// The `EPSILON` nudge lifts decimal half-paisa amounts that binary stores
/// just below the half (`1.035` is `1.03499999...`) so they round up.
#[must_use]
pub fn round2(value: f64) -> f64 {
    round_to_integer((value + f64::EPSILON) * 100.0) / 100.0
}

/// Format an amount as Indian-grouped rupees, e.g. `₹1,23,456.78`.
///
/// Negative amounts are rendered as `-₹12.50`.
#[must_use]
pub fn format_inr(value: f64) -> String {
    let paise_total = round_to_integer(value.abs() * 100.0) as u64;
    let rupees = paise_total / 100;
    let paise = paise_total % 100;
    let sign = if value < 0.0 && paise_total > 0 { "-" } else { "" };
    format!("{sign}₹{}.{paise:02}", group_indian(rupees))
}

/// Like [`format_inr`] but with an explicit `+` for non-negative amounts.
/// P&L cells are shown this way.
#[must_use]
pub fn format_signed_inr(value: f64) -> String {
    if value >= 0.0 {
        format!("+{}", format_inr(value))
    } else {
        format_inr(value)
    }
}

/// Indian digit grouping: the last three digits, then pairs (`12,34,567`).
fn group_indian(rupees: u64) -> String {
    let digits = rupees.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
