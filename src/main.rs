use tracing::{error, info, Instrument};

use best_buy::app_system::{setup_tracing, StoreSystem};
use best_buy::config::AppConfig;
use best_buy::domain::OrderItem;

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::load().map_err(|e| e.to_string())?;
    let store = config.build_store().map_err(|e| e.to_string())?;

    info!("Starting Best Buy store");
    let system = StoreSystem::new(&config.service, store);

    let listings = system
        .store_client
        .list_products()
        .await
        .map_err(|e| e.to_string())?;
    for (position, listing) in listings.iter().enumerate() {
        println!("{}. {}", position + 1, listing.product);
    }

    let total = system
        .store_client
        .total_quantity()
        .await
        .map_err(|e| e.to_string())?;
    println!("Total quantity in store: {}", total);

    let span = tracing::info_span!("order_processing");
    async {
        let items = vec![
            OrderItem::new("macbook air m2", 2),
            OrderItem::new("Bose QuietComfort Earbuds", 3),
            OrderItem::new("windows license", 4),
            OrderItem::new("Shipping", 1),
        ];
        match system.order_client.create_order(items).await {
            Ok(receipt) => println!("{}", receipt),
            Err(e) => error!(error = %e, "Order processing failed"),
        }

        // Exceeds the per-order cap on shipping; the Pixel line before it stays bought
        let items = vec![OrderItem::new("Google Pixel 7", 1), OrderItem::new("Shipping", 2)];
        match system.order_client.create_order(items).await {
            Ok(receipt) => println!("{}", receipt),
            Err(e) => println!("Order failed: {}", e),
        }
    }
    .instrument(span)
    .await;

    let total = system
        .store_client
        .total_quantity()
        .await
        .map_err(|e| e.to_string())?;
    println!("Total quantity in store: {}", total);

    system.shutdown().await?;

    info!("Goodbye from Best Buy!");
    Ok(())
}
