use tracing::{error, info, instrument};

use crate::actors::{OrderService, StoreService};
use crate::clients::{OrderClient, StoreClient};
use crate::config::ServiceConfig;
use crate::domain::Store;

/// Starts the services, wires them together, and shuts them down.
pub struct StoreSystem {
    pub store_client: StoreClient,
    pub order_client: OrderClient,
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl StoreSystem {
    /// Starts the store service first, then the order service that depends on it.
    #[instrument(name = "store_system", skip(config, store))]
    pub fn new(config: &ServiceConfig, store: Store) -> Self {
        let mut handles = Vec::new();

        info!(buffer_size = config.buffer_size, "Starting store system");

        let (store_service, store_client) = StoreService::new(config.buffer_size, store);
        handles.push(tokio::spawn(store_service.run()));

        let (order_service, order_client) = OrderService::new(config.buffer_size, store_client.clone());
        handles.push(tokio::spawn(order_service.run()));

        info!("Store system started successfully");

        Self {
            store_client,
            order_client,
            handles,
        }
    }

    /// Stops the order service before the store it depends on, then waits
    /// for every task.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down store system");

        let _ = self.order_client.shutdown().await;
        let _ = self.store_client.shutdown().await;

        let mut failed = false;
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = ?e, "Service shutdown error");
                failed = true;
            }
        }

        if failed {
            return Err("One or more services failed during shutdown".to_string());
        }
        info!("Store system shutdown complete");
        Ok(())
    }
}
