use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::domain::{Listing, OrderLine, Product, ProductId, Promotion, Quantity};
use crate::error::StoreError;
use crate::messages::StoreRequest;

/// Handle to the store service.
#[derive(Clone)]
pub struct StoreClient {
    sender: mpsc::Sender<StoreRequest>,
}

impl StoreClient {
    pub fn new(sender: mpsc::Sender<StoreRequest>) -> Self {
        Self { sender }
    }

    pub async fn shutdown(&self) -> Result<(), String> {
        self.sender
            .send(StoreRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())
    }
}

client_method!(StoreClient => fn list_products() -> Vec<Listing> as StoreRequest::ListProducts);
client_method!(StoreClient => fn list_all_products() -> Vec<Listing> as StoreRequest::ListAllProducts);
client_method!(StoreClient => fn total_quantity() -> Quantity as StoreRequest::TotalQuantity);
client_method!(StoreClient => fn find_product(name: String) -> Option<Listing> as StoreRequest::FindProduct);
client_method!(StoreClient => fn contains(name: String) -> bool as StoreRequest::Contains);
client_method!(StoreClient => fn add_product(product: Product) -> ProductId as StoreRequest::AddProduct);
client_method!(StoreClient => fn remove_product(id: ProductId) -> Product as StoreRequest::RemoveProduct);
client_method!(StoreClient => fn set_quantity(id: ProductId, quantity: u32) -> Product as StoreRequest::SetQuantity);
client_method!(StoreClient => fn set_price(id: ProductId, price: Decimal) -> Product as StoreRequest::SetPrice);
client_method!(StoreClient => fn set_promotion(id: ProductId, promotion: Option<Promotion>) -> Product as StoreRequest::SetPromotion);
client_method!(StoreClient => fn activate(id: ProductId) -> Product as StoreRequest::Activate);
client_method!(StoreClient => fn deactivate(id: ProductId) -> Product as StoreRequest::Deactivate);
client_method!(StoreClient => fn apply_order(lines: Vec<OrderLine>) -> Decimal as StoreRequest::ApplyOrder);
