use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::PromotionError;

/// Pricing rule applied when a product is bought.
///
/// The set of rules is closed; [`Promotion::apply`] only looks at the unit
/// price and the requested quantity, never at the product's stock.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Promotion {
    /// Charges the full price minus `percent` percent.
    PercentDiscount { name: String, percent: Decimal },
    /// Every second item of a pair costs half.
    SecondHalfPrice { name: String },
    /// Every third item is free.
    ThirdOneFree { name: String },
}

impl Promotion {
    pub fn percent_discount(name: impl Into<String>, percent: Decimal) -> Result<Self, PromotionError> {
        let promotion = Promotion::PercentDiscount {
            name: name.into(),
            percent,
        };
        promotion.validate()?;
        Ok(promotion)
    }

    pub fn second_half_price(name: impl Into<String>) -> Result<Self, PromotionError> {
        let promotion = Promotion::SecondHalfPrice { name: name.into() };
        promotion.validate()?;
        Ok(promotion)
    }

    pub fn third_one_free(name: impl Into<String>) -> Result<Self, PromotionError> {
        let promotion = Promotion::ThirdOneFree { name: name.into() };
        promotion.validate()?;
        Ok(promotion)
    }

    pub fn name(&self) -> &str {
        match self {
            Promotion::PercentDiscount { name, .. }
            | Promotion::SecondHalfPrice { name }
            | Promotion::ThirdOneFree { name } => name,
        }
    }

    /// Checks the configuration of a promotion built without a constructor,
    /// e.g. one deserialized from the catalog file.
    pub fn validate(&self) -> Result<(), PromotionError> {
        if self.name().is_empty() {
            return Err(PromotionError::EmptyName);
        }
        if let Promotion::PercentDiscount { percent, .. } = self {
            if percent.is_sign_negative() || *percent > Decimal::ONE_HUNDRED {
                return Err(PromotionError::InvalidPercent(*percent));
            }
        }
        Ok(())
    }

    /// Amount charged for `quantity` units at `unit_price`, unrounded.
    pub fn apply(&self, unit_price: Decimal, quantity: u32) -> Decimal {
        match self {
            Promotion::PercentDiscount { percent, .. } => {
                let full_price = unit_price * Decimal::from(quantity);
                full_price - full_price * *percent / Decimal::ONE_HUNDRED
            }
            Promotion::SecondHalfPrice { .. } => {
                let pairs = Decimal::from(quantity / 2);
                let remainder = Decimal::from(quantity % 2);
                pairs * (unit_price + unit_price / Decimal::TWO) + remainder * unit_price
            }
            Promotion::ThirdOneFree { .. } => {
                let paid = quantity - quantity / 3;
                Decimal::from(paid) * unit_price
            }
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
