//! Money Module
//!
//! Currency and amount validation for transfers. Balances and amounts are
//! `rust_decimal::Decimal` everywhere; floats never take part in arithmetic.
//!
//! ## Rules
//! 1. Only one currency is supported: `USD`
//! 2. Amounts must be strictly positive
//! 3. Amounts may not carry more fractional digits than the currency allows
//! 4. Amounts and balances never exceed [`MAX_BALANCE`], the largest value a
//!    `NUMERIC(20,2)` column holds
//!
//! ## Usage
//! ```rust
//! use bank_transfer::money::{Currency, validate_amount};
//! use rust_decimal::Decimal;
//!
//! let usd = Currency::parse("USD").unwrap();
//! let amount = validate_amount(Decimal::new(4050, 2), usd).unwrap();
//! assert_eq!(amount.to_string(), "40.50");
//! ```

use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// 999_999_999_999_999_999.99
pub const MAX_BALANCE: Decimal = Decimal::from_parts(1_661_992_959, 1_808_227_885, 5, false, 2);

// ============================================================================
// Error Types
// ============================================================================

/// Money validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    #[error("Only USD is supported")]
    UnsupportedCurrency(String),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Precision overflow: provided {provided} decimals, max allowed {max}")]
    PrecisionOverflow { provided: u32, max: u32 },

    #[error("Amount exceeds the maximum of {max}")]
    AmountTooLarge { max: Decimal },
}

// ============================================================================
// Currency
// ============================================================================

/// Supported currencies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    Usd,
}

impl Currency {
    /// The single supported currency code
    pub const SUPPORTED: &'static str = "USD";

    /// Parse a currency code. Matching is exact: `"usd"` is rejected.
    pub fn parse(code: &str) -> Result<Self, MoneyError> {
        match code {
            Self::SUPPORTED => Ok(Currency::Usd),
            other => Err(MoneyError::UnsupportedCurrency(other.to_string())),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
        }
    }

    /// Number of fractional digits of the minor unit (cents)
    pub fn minor_units(&self) -> u32 {
        match self {
            Currency::Usd => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// Amount validation
// ============================================================================

/// Check that `amount` is a valid transfer amount in `currency`.
///
/// Trailing zeros do not count against the precision limit, so `40.500`
/// is accepted as `40.50`. The returned value is rescaled to the
/// currency's minor units.
pub fn validate_amount(amount: Decimal, currency: Currency) -> Result<Decimal, MoneyError> {
    if amount <= Decimal::ZERO {
        return Err(MoneyError::InvalidAmount);
    }

    let max = currency.minor_units();
    let provided = amount.normalize().scale();
    if provided > max {
        return Err(MoneyError::PrecisionOverflow { provided, max });
    }

    if amount > MAX_BALANCE {
        return Err(MoneyError::AmountTooLarge { max: MAX_BALANCE });
    }

    let mut scaled = amount;
    scaled.rescale(max);
    Ok(scaled)
}
