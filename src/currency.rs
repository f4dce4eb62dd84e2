//! Currency handling for tour pricing
//!
//! Prices are authored in USD; the three display currencies use a fixed
//! conversion table. A tour may also carry an explicitly authored price per
//! currency, which always wins over the converted value.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::WayfarerError;

/// Supported display currencies. USD is the authoring base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Inr,
}

/// Fixed conversion rates from one USD, reviewed manually when they drift.
const USD_TO_EUR: f64 = 0.92;
const USD_TO_GBP: f64 = 0.79;
const USD_TO_INR: f64 = 83.20;

impl Currency {
    /// All supported currencies, base first
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Eur, Currency::Gbp, Currency::Inr];

    /// ISO 4217 code in lowercase, the form used in API query strings
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Inr => "inr",
        }
    }

    /// Display symbol for rendered prices
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Inr => "₹",
        }
    }

    /// How many units of this currency one USD buys
    #[must_use]
    pub fn rate_from_usd(self) -> f64 {
        match self {
            Currency::Usd => 1.0,
            Currency::Eur => USD_TO_EUR,
            Currency::Gbp => USD_TO_GBP,
            Currency::Inr => USD_TO_INR,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = WayfarerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            "gbp" => Ok(Currency::Gbp),
            "inr" => Ok(Currency::Inr),
            other => Err(WayfarerError::validation(format!(
                "Unsupported currency '{other}'. Must be one of: usd, eur, gbp, inr"
            ))),
        }
    }
}

/// Convert an amount between currencies through the fixed USD table,
/// rounded to two decimal places.
#[must_use]
pub fn convert(amount: f64, from: Currency, to: Currency) -> f64 {
    if from == to {
        return round_cents(amount);
    }
    let in_usd = amount / from.rate_from_usd();
    round_cents(in_usd * to.rate_from_usd())
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
