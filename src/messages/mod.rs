use rust_decimal::Decimal;
use tokio::sync::oneshot;

use crate::domain::{Listing, OrderItem, OrderLine, Product, ProductId, Promotion, Quantity, Receipt};
use crate::error::StoreError;

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Requests handled by the store service. Each variant carries its
/// parameters and a oneshot channel for the response.
#[derive(Debug)]
pub enum StoreRequest {
    ListProducts {
        respond_to: ServiceResponse<Vec<Listing>, StoreError>,
    },
    ListAllProducts {
        respond_to: ServiceResponse<Vec<Listing>, StoreError>,
    },
    TotalQuantity {
        respond_to: ServiceResponse<Quantity, StoreError>,
    },
    FindProduct {
        name: String,
        respond_to: ServiceResponse<Option<Listing>, StoreError>,
    },
    Contains {
        name: String,
        respond_to: ServiceResponse<bool, StoreError>,
    },
    AddProduct {
        product: Product,
        respond_to: ServiceResponse<ProductId, StoreError>,
    },
    RemoveProduct {
        id: ProductId,
        respond_to: ServiceResponse<Product, StoreError>,
    },
    SetQuantity {
        id: ProductId,
        quantity: u32,
        respond_to: ServiceResponse<Product, StoreError>,
    },
    SetPrice {
        id: ProductId,
        price: Decimal,
        respond_to: ServiceResponse<Product, StoreError>,
    },
    SetPromotion {
        id: ProductId,
        promotion: Option<Promotion>,
        respond_to: ServiceResponse<Product, StoreError>,
    },
    Activate {
        id: ProductId,
        respond_to: ServiceResponse<Product, StoreError>,
    },
    Deactivate {
        id: ProductId,
        respond_to: ServiceResponse<Product, StoreError>,
    },
    ApplyOrder {
        lines: Vec<OrderLine>,
        respond_to: ServiceResponse<Decimal, StoreError>,
    },
    Shutdown,
}

/// Requests handled by the order service.
#[derive(Debug)]
pub enum OrderRequest {
    CreateOrder {
        items: Vec<OrderItem>,
        respond_to: ServiceResponse<Receipt, StoreError>,
    },
    GetOrder {
        id: String,
        respond_to: ServiceResponse<Option<Receipt>, StoreError>,
    },
    ListOrders {
        respond_to: ServiceResponse<Vec<Receipt>, StoreError>,
    },
    Shutdown,
    #[cfg(test)]
    GetOrderCount {
        respond_to: ServiceResponse<usize, StoreError>,
    },
}
