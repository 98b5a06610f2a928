use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Invalid product attribute: {0}")]
    InvalidAttribute(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Not enough stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        product: String,
        requested: u32,
        available: u32,
    },
    #[error("Cannot order more than {maximum} of {product} per order: requested {requested}")]
    ExceedsMaxPerOrder {
        product: String,
        requested: u32,
        maximum: u32,
    },
    #[error("Product not found: {0}")]
    NotFound(String),
    #[error("Product is not active: {0}")]
    Inactive(String),
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PromotionError {
    #[error("Promotion name cannot be empty")]
    EmptyName,
    #[error("Discount percent must be between 0 and 100, got {0}")]
    InvalidPercent(Decimal),
}

/// Failure of a shopping list. Lines before `product` stay applied.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    #[error("Failed to order {product}: {source}")]
    LineFailed {
        product: String,
        #[source]
        source: ProductError,
    },
}

impl OrderError {
    pub fn product(&self) -> &str {
        match self {
            OrderError::LineFailed { product, .. } => product,
        }
    }

    pub fn cause(&self) -> &ProductError {
        match self {
            OrderError::LineFailed { source, .. } => source,
        }
    }
}

/// Errors surfaced by the store and order services.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error(transparent)]
    Product(#[from] ProductError),
    #[error(transparent)]
    Order(#[from] OrderError),
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
    #[error("Order validation error: {0}")]
    ValidationError(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
    #[error("Invalid catalog entry: {0}")]
    Product(#[from] ProductError),
    #[error("Invalid promotion: {0}")]
    Promotion(#[from] PromotionError),
}
