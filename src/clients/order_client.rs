use tokio::sync::mpsc;

use crate::domain::{OrderItem, Receipt};
use crate::messages::OrderRequest;

/// Handle to the order service, the entry point for placing orders.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<OrderRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<OrderRequest>) -> Self {
        Self { sender }
    }

    pub async fn shutdown(&self) -> Result<(), String> {
        self.sender
            .send(OrderRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())
    }
}

client_method!(OrderClient => fn create_order(items: Vec<OrderItem>) -> Receipt as OrderRequest::CreateOrder);
client_method!(OrderClient => fn get_order(id: String) -> Option<Receipt> as OrderRequest::GetOrder);
client_method!(OrderClient => fn list_orders() -> Vec<Receipt> as OrderRequest::ListOrders);

// Test-only method for internal state inspection
#[cfg(test)]
client_method!(OrderClient => fn get_order_count() -> usize as OrderRequest::GetOrderCount);
