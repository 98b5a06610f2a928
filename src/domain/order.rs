use std::fmt;

use rust_decimal::Decimal;

use super::OrderLine;

/// An item as a customer asks for it: any casing of a product name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
}

impl OrderItem {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

/// One bought line: the store entry, its name at the time of the order, and
/// how many units were taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptLine {
    pub line: OrderLine,
    pub name: String,
}

/// Record of a successfully placed order.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    pub id: String,
    pub lines: Vec<ReceiptLine>,
    pub total: Decimal,
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Order {} placed! Total cost: ${:.2}", self.id, self.total)
    }
}
