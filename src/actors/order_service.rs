use std::collections::HashMap;

use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};

use crate::clients::{OrderClient, StoreClient};
use crate::domain::{OrderItem, OrderLine, Receipt, ReceiptLine};
use crate::error::StoreError;
use crate::messages::{OrderRequest, ServiceResponse};

/// Macro for clean error response handling
macro_rules! send_error {
    ($respond_to:expr, $error:expr) => {{
        let _ = $respond_to.send(Err($error));
        return;
    }};
}

/// Root actor: turns customer requests into store orders and keeps the
/// receipts of the ones that went through.
pub struct OrderService {
    receiver: mpsc::Receiver<OrderRequest>,
    store_client: StoreClient,
    orders: HashMap<String, Receipt>,
    order_ids: Vec<String>,
    next_id: u64,
}

impl OrderService {
    pub fn new(buffer_size: usize, store_client: StoreClient) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self {
            receiver,
            store_client,
            orders: HashMap::new(),
            order_ids: Vec::new(),
            next_id: 1,
        };
        (service, OrderClient::new(sender))
    }

    #[instrument(name = "order_service", skip(self))]
    pub async fn run(mut self) {
        info!("OrderService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                OrderRequest::CreateOrder { items, respond_to } => {
                    self.handle_create_order(items, respond_to).await;
                }
                OrderRequest::GetOrder { id, respond_to } => {
                    self.handle_get_order(id, respond_to);
                }
                OrderRequest::ListOrders { respond_to } => {
                    let receipts = self
                        .order_ids
                        .iter()
                        .filter_map(|id| self.orders.get(id).cloned())
                        .collect();
                    let _ = respond_to.send(Ok(receipts));
                }
                OrderRequest::Shutdown => {
                    info!("OrderService shutting down");
                    break;
                }
                #[cfg(test)]
                OrderRequest::GetOrderCount { respond_to } => {
                    let _ = respond_to.send(Ok(self.orders.len()));
                }
            }
        }

        info!("OrderService stopped");
    }

    /// Resolves every item before any stock moves, then hands the whole list
    /// to the store in one request.
    #[instrument(fields(items = items.len()), skip(self, items, respond_to))]
    async fn handle_create_order(
        &mut self,
        items: Vec<OrderItem>,
        respond_to: ServiceResponse<Receipt, StoreError>,
    ) {
        info!("Processing create_order request");

        if items.is_empty() {
            error!("Validation failed: no items");
            send_error!(respond_to, StoreError::ValidationError("No items ordered".to_string()));
        }

        // Step 1: Resolve names against the active catalog
        let mut receipt_lines = Vec::with_capacity(items.len());
        for item in items {
            if item.quantity == 0 {
                error!(product = %item.name, "Validation failed: zero quantity");
                send_error!(
                    respond_to,
                    StoreError::ValidationError(format!("Quantity for {} must be positive", item.name))
                );
            }
            match self.store_client.find_product(item.name.clone()).await {
                Ok(Some(listing)) => {
                    debug!(product = %listing.product.name(), id = %listing.id, "Product resolved");
                    receipt_lines.push(ReceiptLine {
                        line: OrderLine::new(listing.id, item.quantity),
                        name: listing.product.name().to_string(),
                    });
                }
                Ok(None) => {
                    error!(product = %item.name, "Product not found");
                    send_error!(respond_to, StoreError::UnknownProduct(item.name));
                }
                Err(e) => {
                    error!(error = %e, "Product lookup failed");
                    send_error!(respond_to, e);
                }
            }
        }

        // Step 2: Buy
        let lines = receipt_lines.iter().map(|r| r.line).collect();
        let total = match self.store_client.apply_order(lines).await {
            Ok(total) => total,
            Err(e) => {
                error!(error = %e, "Order rejected by store");
                send_error!(respond_to, e);
            }
        };

        // Step 3: Record
        let id = format!("order_{}", self.next_id);
        self.next_id += 1;
        let receipt = Receipt {
            id: id.clone(),
            lines: receipt_lines,
            total,
        };
        self.orders.insert(id.clone(), receipt.clone());
        self.order_ids.push(id.clone());

        info!(order_id = %id, total = %total, "Order created successfully");
        let _ = respond_to.send(Ok(receipt));
    }

    #[instrument(fields(order_id = %id), skip(self, id, respond_to))]
    fn handle_get_order(&self, id: String, respond_to: ServiceResponse<Option<Receipt>, StoreError>) {
        debug!("Processing get_order request");
        let receipt = self.orders.get(&id).cloned();
        match &receipt {
            Some(receipt) => info!(total = %receipt.total, "Order found"),
            None => debug!("Order not found"),
        }
        let _ = respond_to.send(Ok(receipt));
    }
}
