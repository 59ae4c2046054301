use rust_decimal::{Decimal, RoundingStrategy};
use serde::Deserialize;

use crate::errors::PriceError;

/// 16% VAT.
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PriceOptions {
    /// Fraction taken off the base price, `0 <= f < 1`.
    pub discount_fraction: Option<Decimal>,
    #[serde(default)]
    pub include_tax: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct PriceCalculator {
    tax_rate: Decimal,
}

impl PriceCalculator {
    pub fn new(tax_rate: Decimal) -> Self {
        Self { tax_rate }
    }

    pub fn total(&self, base_price: Decimal, options: &PriceOptions) -> Result<Decimal, PriceError> {
        if base_price < Decimal::ZERO {
            return Err(PriceError::InvalidInput(format!(
                "base price must not be negative, got {base_price}"
            )));
        }

        let mut total = base_price;

        if let Some(discount) = options.discount_fraction {
            if discount < Decimal::ZERO || discount >= Decimal::ONE {
                return Err(PriceError::InvalidInput(format!(
                    "discount must be in [0, 1), got {discount}"
                )));
            }
            total = checked_mul(total, Decimal::ONE - discount)?;
        }

        if options.include_tax {
            total = checked_mul(total, Decimal::ONE + self.tax_rate)?;
        }

        let mut total = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        total.rescale(2);
        Ok(total)
    }
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_TAX_RATE)
    }
}

fn checked_mul(a: Decimal, b: Decimal) -> Result<Decimal, PriceError> {
    a.checked_mul(b)
        .ok_or_else(|| PriceError::InvalidInput(format!("price overflow computing {a} * {b}")))
}

/// Total with the default tax rate.
pub fn total_price(base_price: Decimal, options: &PriceOptions) -> Result<Decimal, PriceError> {
    PriceCalculator::default().total(base_price, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_default_tax_rate() {
        assert_eq!(DEFAULT_TAX_RATE, dec("0.16"));
    }

    #[test]
    fn test_discount_and_tax() {
        let options = PriceOptions {
            discount_fraction: Some(dec("0.1")),
            include_tax: true,
        };
        let total = total_price(dec("100"), &options).unwrap();
        assert_eq!(total, dec("104.40"));
        assert_eq!(total.to_string(), "104.40");
    }

    #[test]
    fn test_no_options_is_base_rounded() {
        let total = total_price(dec("35"), &PriceOptions::default()).unwrap();
        assert_eq!(total, dec("35.00"));
        assert_eq!(total.to_string(), "35.00");
    }

    #[test]
    fn test_tax_only() {
        let options = PriceOptions {
            discount_fraction: None,
            include_tax: true,
        };
        assert_eq!(total_price(dec("20"), &options).unwrap(), dec("23.20"));
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let options = PriceOptions::default();
        assert_eq!(total_price(dec("1.005"), &options).unwrap(), dec("1.01"));
        assert_eq!(total_price(dec("2.675"), &options).unwrap(), dec("2.68"));
        assert_eq!(total_price(dec("2.674"), &options).unwrap(), dec("2.67"));
    }

    #[test]
    fn test_negative_base_rejected() {
        let err = total_price(dec("-1"), &PriceOptions::default()).unwrap_err();
        assert!(matches!(err, PriceError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_base_allowed() {
        assert_eq!(total_price(Decimal::ZERO, &PriceOptions::default()).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_discount_out_of_range() {
        for bad in ["1", "1.5", "-0.1"] {
            let options = PriceOptions {
                discount_fraction: Some(dec(bad)),
                include_tax: false,
            };
            assert!(total_price(dec("50"), &options).is_err(), "discount {bad}");
        }
    }

    #[test]
    fn test_overflow_is_an_error() {
        let options = PriceOptions {
            discount_fraction: None,
            include_tax: true,
        };
        let err = total_price(Decimal::MAX, &options).unwrap_err();
        assert!(matches!(err, PriceError::InvalidInput(_)));

        // no multiplication, nothing to overflow
        assert!(total_price(Decimal::MAX, &PriceOptions::default()).is_ok());
    }

    #[test]
    fn test_custom_tax_rate() {
        let calc = PriceCalculator::new(dec("0.21"));
        let options = PriceOptions {
            discount_fraction: None,
            include_tax: true,
        };
        assert_eq!(calc.total(dec("100"), &options).unwrap(), dec("121.00"));
    }
}
