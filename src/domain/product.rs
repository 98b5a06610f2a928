use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use rust_decimal::Decimal;
use tracing::debug;

use super::Promotion;
use crate::error::ProductError;

/// Stock reported by a product or a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Units(u64),
    Unlimited,
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        match (self, rhs) {
            (Quantity::Units(a), Quantity::Units(b)) => Quantity::Units(a.saturating_add(b)),
            _ => Quantity::Unlimited,
        }
    }
}

impl Sum for Quantity {
    fn sum<I: Iterator<Item = Quantity>>(iter: I) -> Quantity {
        iter.fold(Quantity::Units(0), |total, q| total + q)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Units(n) => write!(f, "{}", n),
            Quantity::Unlimited => f.write_str("Unlimited"),
        }
    }
}

/// How a product tracks what is left to sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockPolicy {
    /// Ordinary stocked product.
    Bounded { quantity: u32 },
    /// Non-stocked product, never runs out.
    Unlimited,
    /// Stocked product with a cap on units per order line.
    BoundedWithMax { quantity: u32, max_per_order: u32 },
}

impl StockPolicy {
    fn quantity(&self) -> Option<u32> {
        match self {
            StockPolicy::Bounded { quantity } | StockPolicy::BoundedWithMax { quantity, .. } => {
                Some(*quantity)
            }
            StockPolicy::Unlimited => None,
        }
    }

    fn set_quantity(&mut self, new_quantity: u32) {
        match self {
            StockPolicy::Bounded { quantity } | StockPolicy::BoundedWithMax { quantity, .. } => {
                *quantity = new_quantity;
            }
            StockPolicy::Unlimited => {}
        }
    }
}

/// One catalog line item. Identity is the name, see [`Product::same_product_as`].
#[derive(Debug, Clone)]
pub struct Product {
    name: String,
    price: Decimal,
    stock: StockPolicy,
    active: bool,
    promotion: Option<Promotion>,
}

impl Product {
    /// Creates an ordinary stocked product. Active iff `quantity > 0`.
    pub fn new(name: impl Into<String>, price: Decimal, quantity: u32) -> Result<Self, ProductError> {
        Self::with_stock(name.into(), price, StockPolicy::Bounded { quantity })
    }

    /// Creates a product with unlimited availability. Starts active.
    pub fn non_stocked(name: impl Into<String>, price: Decimal) -> Result<Self, ProductError> {
        Self::with_stock(name.into(), price, StockPolicy::Unlimited)
    }

    /// Creates a stocked product that sells at most `maximum` units per order line.
    pub fn limited(
        name: impl Into<String>,
        price: Decimal,
        quantity: u32,
        maximum: u32,
    ) -> Result<Self, ProductError> {
        if maximum == 0 {
            return Err(ProductError::InvalidAttribute(
                "maximum purchase limit must be greater than zero".to_string(),
            ));
        }
        Self::with_stock(
            name.into(),
            price,
            StockPolicy::BoundedWithMax {
                quantity,
                max_per_order: maximum,
            },
        )
    }

    fn with_stock(name: String, price: Decimal, stock: StockPolicy) -> Result<Self, ProductError> {
        if name.is_empty() {
            return Err(ProductError::InvalidAttribute("name cannot be empty".to_string()));
        }
        validate_price(price)?;
        let active = stock.quantity().map_or(true, |q| q > 0);
        Ok(Self {
            name,
            price,
            stock,
            active,
            promotion: None,
        })
    }

    pub fn with_promotion(mut self, promotion: Promotion) -> Self {
        self.promotion = Some(promotion);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn set_price(&mut self, price: Decimal) -> Result<(), ProductError> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }

    pub fn promotion(&self) -> Option<&Promotion> {
        self.promotion.as_ref()
    }

    pub fn set_promotion(&mut self, promotion: Option<Promotion>) {
        self.promotion = promotion;
    }

    pub fn stock_policy(&self) -> &StockPolicy {
        &self.stock
    }

    pub fn get_quantity(&self) -> Quantity {
        match self.stock.quantity() {
            Some(quantity) => Quantity::Units(u64::from(quantity)),
            None => Quantity::Unlimited,
        }
    }

    /// Replaces the stock level and recomputes the active flag.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), ProductError> {
        if self.stock == StockPolicy::Unlimited {
            return Err(ProductError::InvalidAttribute(format!(
                "{} is not stocked, its quantity cannot be set",
                self.name
            )));
        }
        self.stock.set_quantity(quantity);
        self.active = quantity > 0;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Has no effect while a stocked product is sold out.
    pub fn activate(&mut self) {
        if self.stock.quantity().map_or(true, |q| q > 0) {
            self.active = true;
        }
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Buys `requested` units and returns the amount charged.
    ///
    /// Checks run in order: zero quantity, per-order maximum, stock. Nothing
    /// changes when a check fails. The charge comes from the attached
    /// promotion if there is one.
    pub fn buy(&mut self, requested: u32) -> Result<Decimal, ProductError> {
        if requested == 0 {
            return Err(ProductError::InvalidQuantity(requested));
        }
        if let StockPolicy::BoundedWithMax { max_per_order, .. } = self.stock {
            if requested > max_per_order {
                return Err(ProductError::ExceedsMaxPerOrder {
                    product: self.name.clone(),
                    requested,
                    maximum: max_per_order,
                });
            }
        }
        if let Some(available) = self.stock.quantity() {
            if requested > available {
                return Err(ProductError::InsufficientStock {
                    product: self.name.clone(),
                    requested,
                    available,
                });
            }
            let remaining = available - requested;
            self.stock.set_quantity(remaining);
            if remaining == 0 {
                self.active = false;
            }
        }

        let charge = match &self.promotion {
            Some(promotion) => promotion.apply(self.price, requested),
            None => Decimal::from(requested) * self.price,
        };
        debug!(product = %self.name, requested, charge = %charge, "Product bought");
        Ok(charge)
    }

    pub fn is_more_expensive_than(&self, other: &Product) -> bool {
        self.price > other.price
    }

    /// Name equality, the identity rule used for store membership.
    pub fn same_product_as(&self, other: &Product) -> bool {
        self.name == other.name
    }
}

fn validate_price(price: Decimal) -> Result<(), ProductError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(ProductError::InvalidAttribute(format!(
            "price must be a non-negative number, got {}",
            price
        )));
    }
    Ok(())
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - Price: ${:.2}, Quantity: {}",
            self.name,
            self.price,
            self.get_quantity()
        )?;
        if let StockPolicy::BoundedWithMax { max_per_order, .. } = self.stock {
            write!(f, ", Max per order: {}", max_per_order)?;
        }
        if let Some(promotion) = &self.promotion {
            write!(f, " (Promotion: {})", promotion)?;
        }
        Ok(())
    }
}
