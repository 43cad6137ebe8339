//! Supported currencies and the fixed conversion table used when a user
//! changes their display currency.
//!
//! The rates are a static snapshot, not sourced from any live service.
//! Conversion between two non-USD currencies is routed through USD; when no
//! path exists at all a 1:1 rate is used.

use std::{fmt::Display, str::FromStr};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{Error, user::UserID};

/// A currency supported by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Japanese Yen
    Jpy,
    /// Indian Rupee
    Inr,
    /// Kenyan Shilling
    Kes,
    /// Nigerian Naira
    Ngn,
    /// South African Rand
    Zar,
    /// Ghanaian Cedi
    Ghs,
    /// Egyptian Pound
    Egp,
    /// Moroccan Dirham
    Mad,
    /// Tanzanian Shilling
    Tzs,
    /// Ugandan Shilling
    Ugx,
    /// West African CFA Franc
    Xof,
    /// Central African CFA Franc
    Xaf,
}

/// Every supported currency, in the order they are shown in forms.
pub const ALL_CURRENCIES: [Currency; 15] = [
    Currency::Usd,
    Currency::Eur,
    Currency::Gbp,
    Currency::Jpy,
    Currency::Inr,
    Currency::Kes,
    Currency::Ngn,
    Currency::Zar,
    Currency::Ghs,
    Currency::Egp,
    Currency::Mad,
    Currency::Tzs,
    Currency::Ugx,
    Currency::Xof,
    Currency::Xaf,
];

impl Currency {
    /// The three letter ISO 4217 code, e.g. "USD".
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Inr => "INR",
            Currency::Kes => "KES",
            Currency::Ngn => "NGN",
            Currency::Zar => "ZAR",
            Currency::Ghs => "GHS",
            Currency::Egp => "EGP",
            Currency::Mad => "MAD",
            Currency::Tzs => "TZS",
            Currency::Ugx => "UGX",
            Currency::Xof => "XOF",
            Currency::Xaf => "XAF",
        }
    }

    /// The symbol shown next to amounts, e.g. "KSh" for the Kenyan Shilling.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Inr => "₹",
            Currency::Kes => "KSh",
            Currency::Ngn => "₦",
            Currency::Zar => "R",
            Currency::Ghs => "GH₵",
            Currency::Egp => "E£",
            Currency::Mad => "MAD",
            Currency::Tzs => "TSh",
            Currency::Ugx => "USh",
            Currency::Xof => "CFA",
            Currency::Xaf => "FCFA",
        }
    }

    /// The human readable name shown in the currency dropdown.
    pub fn display_name(&self) -> &'static str {
        match self {
            Currency::Usd => "US Dollar ($)",
            Currency::Eur => "Euro (€)",
            Currency::Gbp => "British Pound (£)",
            Currency::Jpy => "Japanese Yen (¥)",
            Currency::Inr => "Indian Rupee (₹)",
            Currency::Kes => "Kenyan Shilling (KSh)",
            Currency::Ngn => "Nigerian Naira (₦)",
            Currency::Zar => "South African Rand (R)",
            Currency::Ghs => "Ghanaian Cedi (GH₵)",
            Currency::Egp => "Egyptian Pound (E£)",
            Currency::Mad => "Moroccan Dirham (MAD)",
            Currency::Tzs => "Tanzanian Shilling (TSh)",
            Currency::Ugx => "Ugandan Shilling (USh)",
            Currency::Xof => "West African CFA Franc (CFA)",
            Currency::Xaf => "Central African CFA Franc (FCFA)",
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Currency {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_CURRENCIES
            .into_iter()
            .find(|currency| currency.code() == s)
            .ok_or_else(|| Error::InvalidCurrency(s.to_owned()))
    }
}

impl TryFrom<String> for Currency {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Currency> for String {
    fn from(value: Currency) -> Self {
        value.code().to_owned()
    }
}

/// A static snapshot of USD exchange rates.
///
/// These values would come from an API in a production deployment.
fn usd_rate(to: Currency) -> Option<f64> {
    match to {
        Currency::Usd => None,
        Currency::Eur => Some(0.92),
        Currency::Gbp => Some(0.79),
        Currency::Jpy => Some(149.50),
        Currency::Inr => Some(83.12),
        Currency::Kes => Some(129.50),
        Currency::Ngn => Some(1550.00),
        Currency::Zar => Some(18.50),
        Currency::Ghs => Some(12.80),
        Currency::Egp => Some(46.20),
        Currency::Mad => Some(10.05),
        Currency::Tzs => Some(2520.00),
        Currency::Ugx => Some(3750.00),
        Currency::Xof => Some(605.00),
        Currency::Xaf => Some(605.00),
    }
}

/// Get the exchange rate between two currencies.
///
/// Uses the direct USD rate when converting from USD and routes through USD
/// as an intermediate for pairs of non-USD currencies. Any other conversion,
/// including into USD, falls back to a 1:1 rate.
pub fn exchange_rate(from: Currency, to: Currency) -> f64 {
    if from == to {
        return 1.0;
    }

    if from == Currency::Usd
        && let Some(rate) = usd_rate(to)
    {
        return rate;
    }

    if from != Currency::Usd && to != Currency::Usd {
        if let (Some(usd_to_from), Some(usd_to_target)) = (usd_rate(from), usd_rate(to)) {
            return (1.0 / usd_to_from) * usd_to_target;
        }
    }

    1.0
}

/// Convert an amount from one currency to another using [exchange_rate].
pub fn convert_amount(amount: f64, from: Currency, to: Currency) -> f64 {
    if from == to {
        return amount;
    }

    amount * exchange_rate(from, to)
}

/// Rewrite every transaction, budget and expected income amount owned by
/// `user_id` from `old_currency` into `new_currency`.
///
/// Each table is rewritten with an independent UPDATE with no wrapping
/// database transaction, so a crash part way through leaves some rows
/// converted and others not.
pub fn convert_user_amounts(
    user_id: UserID,
    old_currency: Currency,
    new_currency: Currency,
    connection: &Connection,
) -> Result<(), Error> {
    let rate = exchange_rate(old_currency, new_currency);

    let transactions = connection.execute(
        "UPDATE \"transaction\" SET amount = ROUND(amount * ?1, 2) WHERE user_id = ?2",
        (rate, user_id.as_i64()),
    )?;
    let budgets = connection.execute(
        "UPDATE budget SET amount = ROUND(amount * ?1, 2) WHERE user_id = ?2",
        (rate, user_id.as_i64()),
    )?;
    let incomes = connection.execute(
        "UPDATE expected_income SET amount = ROUND(amount * ?1, 2) WHERE user_id = ?2",
        (rate, user_id.as_i64()),
    )?;

    tracing::info!(
        "converted {transactions} transactions, {budgets} budgets and {incomes} incomes \
        for user {user_id} from {old_currency} to {new_currency} at rate {rate}"
    );

    Ok(())
}


#[cfg(test)]
mod exchange_rate_tests {
    use super::{Currency, convert_amount, exchange_rate};

    #[test]
    fn same_currency_is_identity() {
        assert_eq!(exchange_rate(Currency::Kes, Currency::Kes), 1.0);
        assert_eq!(convert_amount(42.0, Currency::Usd, Currency::Usd), 42.0);
    }

    #[test]
    fn direct_rate_from_usd() {
        assert_eq!(exchange_rate(Currency::Usd, Currency::Eur), 0.92);
    }

    #[test]
    fn rate_into_usd_falls_back_to_one_to_one() {
        assert_eq!(exchange_rate(Currency::Eur, Currency::Usd), 1.0);
        assert_eq!(convert_amount(100.0, Currency::Kes, Currency::Usd), 100.0);
    }

    #[test]
    fn cross_rate_routes_through_usd() {
        let rate = exchange_rate(Currency::Eur, Currency::Kes);
        let want = (1.0 / 0.92) * 129.50;

        assert!((rate - want).abs() < 1e-9);
    }

    #[test]
    fn converts_amounts_with_the_rate() {
        let converted = convert_amount(100.0, Currency::Usd, Currency::Kes);

        assert!((converted - 12950.0).abs() < 1e-9);
    }
}
