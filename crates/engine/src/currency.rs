use serde::{Deserialize, Serialize};

use crate::{EngineError, Money};

/// ISO currency code used by a mess and its money values.
///
/// ## Minor units
///
/// The engine stores monetary values as an `i64` number of **minor units** (see `Money`).
/// `minor_units()` returns how many decimal digits are used when converting between:
/// - major units (human input/output, e.g. `10.50 BDT`)
/// - minor units (stored integers, e.g. `1050`)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Bdt,
    Eur,
}

impl Currency {
    /// Canonical currency code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Currency::Bdt => "BDT",
            Currency::Eur => "EUR",
        }
    }

    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Currency::Bdt => "৳",
            Currency::Eur => "€",
        }
    }

    /// Number of fraction digits used when formatting/parsing amounts.
    #[must_use]
    pub const fn minor_units(self) -> u8 {
        match self {
            Currency::Bdt | Currency::Eur => 2,
        }
    }

    /// Format an amount with the currency symbol, e.g. `1250.00৳`.
    #[must_use]
    pub fn format(self, amount: Money) -> String {
        format!("{amount}{}", self.symbol())
    }
}

impl core::fmt::Display for Currency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for Currency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "BDT" => Ok(Currency::Bdt),
            "EUR" => Ok(Currency::Eur),
            other => Err(EngineError::InvalidArgument(format!(
                "unsupported currency: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Currency::try_from("bdt").unwrap(), Currency::Bdt);
        assert_eq!(Currency::try_from(" EUR ").unwrap(), Currency::Eur);
        assert!(Currency::try_from("usd").is_err());
    }

    #[test]
    fn formats_with_symbol() {
        assert_eq!(Currency::Bdt.format(Money::new(125_000)), "1250.00৳");
    }
}
