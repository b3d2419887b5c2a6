//! Currency conversion and price formatting.
//!
//! Product prices are authored in INR (the base currency). Display currencies
//! are reached by multiplying with a static rate from [`ExchangeRates`]; there
//! are no live rates. Every converted amount is rounded to two decimals and
//! non-finite values collapse to zero, so nothing in this module can fail.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt, str::FromStr};

/// Currencies the storefront can display prices in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian rupee, the base currency of all product prices
    Inr,
    /// US dollar
    Usd,
    /// Canadian dollar
    Cad,
}

impl Currency {
    /// All supported currencies in picker order.
    pub const ALL: [Self; 3] = [Self::Inr, Self::Usd, Self::Cad];

    /// ISO 4217 code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Cad => "CAD",
        }
    }

    const fn grouping(self) -> Grouping {
        match self {
            Self::Inr => Grouping::Indian,
            Self::Usd | Self::Cad => Grouping::Thousands,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config {
                message: format!("Unsupported currency code: {s}"),
            })
    }
}

#[derive(Clone, Copy)]
enum Grouping {
    /// en_IN style: 12,34,567
    Indian,
    /// 1,234,567
    Thousands,
}

/// Static multipliers from the base currency to each display currency.
#[derive(Debug, Clone, PartialEq)]
pub struct ExchangeRates {
    rates: HashMap<Currency, f64>,
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self {
            rates: HashMap::from([
                (Currency::Inr, 1.0),
                (Currency::Usd, 0.012),
                (Currency::Cad, 0.016),
            ]),
        }
    }
}

impl ExchangeRates {
    /// Returns the rate table with `currency` set to `rate`.
    #[must_use]
    pub fn with_rate(mut self, currency: Currency, rate: f64) -> Self {
        self.rates.insert(currency, rate);
        self
    }

    /// Rate for `currency`; missing or unusable rates fall back to 1.
    #[must_use]
    pub fn rate(&self, currency: Currency) -> f64 {
        self.rates
            .get(&currency)
            .copied()
            .filter(|r| r.is_finite() && *r > 0.0)
            .unwrap_or(1.0)
    }

    /// Converts a base-currency amount into `currency`.
    #[must_use]
    pub fn convert(&self, amount_base: f64, currency: Currency) -> f64 {
        convert(amount_base, self.rate(currency))
    }
}

/// Multiplies `amount_base` by `rate` and rounds to two decimals.
///
/// A rate that is zero, negative or not finite is treated as 1. A non-finite
/// result is clamped to 0.
#[must_use]
pub fn convert(amount_base: f64, rate: f64) -> f64 {
    let rate = if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        1.0
    };
    round_to_cents(amount_base * rate)
}

/// Rounds half-to-even at two decimal places; non-finite input yields 0.
#[must_use]
pub fn round_to_cents(amount: f64) -> f64 {
    let rounded = (amount * 100.0).round_ties_even() / 100.0;
    if rounded.is_finite() { rounded } else { 0.0 }
}

/// Renders `amount` with two fraction digits and the currency prefix.
///
/// INR uses the rupee sign and Indian digit grouping (`₹3,98,200.00`); other
/// currencies are prefixed with their code (`USD 4,778.40`). NaN and infinite
/// amounts render as zero.
#[must_use]
pub fn format(amount: f64, currency: Currency) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is finite and non-negative; `as` saturates above u64::MAX"
    )]
    let cents = (amount.abs() * 100.0).round_ties_even() as u64;
    let whole = group_digits(cents / 100, currency.grouping());
    let fraction = cents % 100;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    match currency {
        Currency::Inr => format!("{sign}₹{whole}.{fraction:02}"),
        Currency::Usd | Currency::Cad => format!("{sign}{} {whole}.{fraction:02}", currency.code()),
    }
}

fn group_digits(whole: u64, grouping: Grouping) -> String {
    let digits = whole.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let size = match grouping {
        Grouping::Indian => 2,
        Grouping::Thousands => 3,
    };

    let mut groups = Vec::new();
    while head.len() > size {
        let (rest, group) = head.split_at(head.len() - size);
        groups.push(group);
        head = rest;
    }
    groups.push(head);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_convert_applies_rate_and_rounds() {
        assert_eq!(convert(69999.0, 1.0), 69999.0);
        assert_eq!(convert(69999.0, 0.012), 839.99);
        assert_eq!(convert(100.0, 0.016), 1.6);
    }

    #[test]
    fn test_convert_invalid_rate_falls_back_to_one() {
        assert_eq!(convert(250.0, 0.0), 250.0);
        assert_eq!(convert(250.0, -3.0), 250.0);
        assert_eq!(convert(250.0, f64::NAN), 250.0);
    }

    #[test]
    fn test_convert_non_finite_clamps_to_zero() {
        assert_eq!(convert(f64::NAN, 1.0), 0.0);
        assert_eq!(convert(f64::INFINITY, 0.012), 0.0);
        assert_eq!(convert(f64::MAX, 10.0), 0.0);
    }

    #[test]
    fn test_round_trip_within_rounding_tolerance() {
        for rate in [0.012, 0.016, 1.0, 83.0] {
            for x in [1.0, 199.99, 24900.0, 69999.0, 299_999.0] {
                let back = convert(convert(x, rate), 1.0 / rate);
                // one half-cent lost per rounding step, the first scaled back up by 1/rate
                let tolerance = 0.005 / rate + 0.005 + 1e-9;
                assert!(
                    (back - x).abs() <= tolerance,
                    "x={x} rate={rate} back={back}"
                );
            }
        }
    }

    #[test]
    fn test_round_to_cents_half_to_even() {
        assert_eq!(round_to_cents(0.125), 0.12);
        assert_eq!(round_to_cents(0.375), 0.38);
        assert_eq!(round_to_cents(2.5), 2.5);
    }

    #[test]
    fn test_format_inr_uses_indian_grouping() {
        assert_eq!(format(398_200.0, Currency::Inr), "₹3,98,200.00");
        assert_eq!(format(69999.0, Currency::Inr), "₹69,999.00");
        assert_eq!(format(12_345_678.9, Currency::Inr), "₹1,23,45,678.90");
        assert_eq!(format(200.0, Currency::Inr), "₹200.00");
    }

    #[test]
    fn test_format_other_currencies_use_code_prefix() {
        assert_eq!(format(4778.4, Currency::Usd), "USD 4,778.40");
        assert_eq!(format(1_234_567.0, Currency::Cad), "CAD 1,234,567.00");
        assert_eq!(format(0.5, Currency::Usd), "USD 0.50");
    }

    #[test]
    fn test_format_non_finite_renders_zero() {
        assert_eq!(format(f64::NAN, Currency::Inr), "₹0.00");
        assert_eq!(format(f64::INFINITY, Currency::Usd), "USD 0.00");
        assert_eq!(format(f64::NEG_INFINITY, Currency::Cad), "CAD 0.00");
    }

    #[test]
    fn test_format_negative_amount() {
        assert_eq!(format(-1500.0, Currency::Inr), "-₹1,500.00");
        assert_eq!(format(-0.0, Currency::Inr), "₹0.00");
    }

    #[test]
    fn test_exchange_rates_lookup() {
        let rates = ExchangeRates::default();
        assert_eq!(rates.rate(Currency::Inr), 1.0);
        assert_eq!(rates.rate(Currency::Usd), 0.012);
        assert_eq!(rates.convert(398_200.0, Currency::Usd), 4778.4);

        let broken = ExchangeRates::default().with_rate(Currency::Cad, -1.0);
        assert_eq!(broken.rate(Currency::Cad), 1.0);
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!("usd".parse::<Currency>().unwrap(), Currency::Usd);
        assert_eq!(" INR ".parse::<Currency>().unwrap(), Currency::Inr);
        assert!(matches!(
            "EUR".parse::<Currency>(),
            Err(Error::Config { message: _ })
        ));
    }
}
