use rust_decimal::Decimal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use crate::clients::StoreClient;
use crate::domain::{Listing, OrderLine, Product, ProductId, Quantity, Store};
use crate::error::{ProductError, StoreError};
use crate::messages::{ServiceResponse, StoreRequest};

/// Sub-actor owning the [`Store`].
///
/// Requests are handled one at a time, so two orders never interleave even
/// when many clients submit them concurrently.
pub struct StoreService {
    receiver: mpsc::Receiver<StoreRequest>,
    store: Store,
}

impl StoreService {
    pub fn new(buffer_size: usize, store: Store) -> (Self, StoreClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let service = Self { receiver, store };
        (service, StoreClient::new(sender))
    }

    #[instrument(name = "store_service", skip(self))]
    pub async fn run(mut self) {
        info!(products = self.store.listings().len(), "StoreService starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::ListProducts { respond_to } => {
                    let listings = self.store.active_listings().into_iter().cloned().collect();
                    let _ = respond_to.send(Ok(listings));
                }
                StoreRequest::ListAllProducts { respond_to } => {
                    let _ = respond_to.send(Ok(self.store.listings().to_vec()));
                }
                StoreRequest::TotalQuantity { respond_to } => {
                    self.handle_total_quantity(respond_to);
                }
                StoreRequest::FindProduct { name, respond_to } => {
                    self.handle_find_product(name, respond_to);
                }
                StoreRequest::Contains { name, respond_to } => {
                    let found = self.store.contains_name(&name);
                    let _ = respond_to.send(Ok(found));
                }
                StoreRequest::AddProduct { product, respond_to } => {
                    self.handle_add_product(product, respond_to);
                }
                StoreRequest::RemoveProduct { id, respond_to } => {
                    self.handle_remove_product(id, respond_to);
                }
                StoreRequest::SetQuantity {
                    id,
                    quantity,
                    respond_to,
                } => {
                    self.handle_update(id, respond_to, |p| p.set_quantity(quantity));
                }
                StoreRequest::SetPrice {
                    id,
                    price,
                    respond_to,
                } => {
                    self.handle_update(id, respond_to, |p| p.set_price(price));
                }
                StoreRequest::SetPromotion {
                    id,
                    promotion,
                    respond_to,
                } => {
                    self.handle_update(id, respond_to, |p| {
                        p.set_promotion(promotion);
                        Ok(())
                    });
                }
                StoreRequest::Activate { id, respond_to } => {
                    self.handle_update(id, respond_to, |p| {
                        p.activate();
                        Ok(())
                    });
                }
                StoreRequest::Deactivate { id, respond_to } => {
                    self.handle_update(id, respond_to, |p| {
                        p.deactivate();
                        Ok(())
                    });
                }
                StoreRequest::ApplyOrder { lines, respond_to } => {
                    self.handle_apply_order(lines, respond_to);
                }
                StoreRequest::Shutdown => {
                    info!("StoreService shutting down");
                    break;
                }
            }
        }

        info!("StoreService stopped");
    }

    #[instrument(skip(self, respond_to))]
    fn handle_total_quantity(&self, respond_to: ServiceResponse<Quantity, StoreError>) {
        let total = self.store.get_total_quantity();
        debug!(total = %total, policy = ?self.store.quantity_policy(), "Total quantity computed");
        let _ = respond_to.send(Ok(total));
    }

    #[instrument(fields(product = %name), skip(self, name, respond_to))]
    fn handle_find_product(&self, name: String, respond_to: ServiceResponse<Option<Listing>, StoreError>) {
        let listing = self.store.find_active(&name).cloned();
        match &listing {
            Some(listing) => debug!(id = %listing.id, price = %listing.product.price(), "Product found"),
            None => debug!("Product not found"),
        }
        let _ = respond_to.send(Ok(listing));
    }

    #[instrument(fields(product = %product.name()), skip(self, product, respond_to))]
    fn handle_add_product(&mut self, product: Product, respond_to: ServiceResponse<ProductId, StoreError>) {
        if self.store.contains(&product) {
            warn!("Adding a second product under an existing name");
        }
        let id = self.store.add_product(product);
        info!(id = %id, "Product added");
        let _ = respond_to.send(Ok(id));
    }

    #[instrument(fields(product = %id), skip(self, id, respond_to))]
    fn handle_remove_product(&mut self, id: ProductId, respond_to: ServiceResponse<Product, StoreError>) {
        let result = self
            .store
            .remove_product(id)
            .ok_or_else(|| StoreError::Product(ProductError::NotFound(id.to_string())));
        if result.is_ok() {
            info!("Product removed");
        }
        let _ = respond_to.send(result);
    }

    #[instrument(fields(product = %id), skip(self, id, respond_to, update))]
    fn handle_update<F>(&mut self, id: ProductId, respond_to: ServiceResponse<Product, StoreError>, update: F)
    where
        F: FnOnce(&mut Product) -> Result<(), ProductError>,
    {
        let Some(product) = self.store.get_mut(id) else {
            debug!("Product not found");
            let _ = respond_to.send(Err(ProductError::NotFound(id.to_string()).into()));
            return;
        };

        let result = match update(product) {
            Ok(()) => {
                info!(active = product.is_active(), quantity = %product.get_quantity(), "Product updated");
                Ok(product.clone())
            }
            Err(e) => {
                error!(error = %e, "Product update rejected");
                Err(e.into())
            }
        };
        let _ = respond_to.send(result);
    }

    #[instrument(fields(lines = lines.len()), skip(self, lines, respond_to))]
    fn handle_apply_order(&mut self, lines: Vec<OrderLine>, respond_to: ServiceResponse<Decimal, StoreError>) {
        debug!("Processing apply_order request");

        let result = match self.store.order(&lines) {
            Ok(total) => {
                info!(total = %total, "Order applied");
                Ok(total)
            }
            Err(e) => {
                error!(error = %e, "Order failed");
                Err(e.into())
            }
        };
        let _ = respond_to.send(result);
    }
}
