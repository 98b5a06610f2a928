//! # Mock Framework
//!
//! Utilities for testing the order service without a running store.
//!
//! Use [`create_mock_store_client`] to get a client and a receiver, hand the
//! client to the service under test, then script the store's answers with
//! [`expect_find_product`] and [`expect_apply_order`].

use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::clients::StoreClient;
use crate::domain::{Listing, OrderLine};
use crate::error::StoreError;
use crate::messages::{ServiceResponse, StoreRequest};

/// Creates a store client whose requests land on the returned receiver.
pub fn create_mock_store_client(buffer_size: usize) -> (StoreClient, mpsc::Receiver<StoreRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (StoreClient::new(sender), receiver)
}

/// Helper to verify that the next message is a FindProduct request
pub async fn expect_find_product(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(String, ServiceResponse<Option<Listing>, StoreError>)> {
    match receiver.recv().await {
        Some(StoreRequest::FindProduct { name, respond_to }) => Some((name, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an ApplyOrder request
pub async fn expect_apply_order(
    receiver: &mut mpsc::Receiver<StoreRequest>,
) -> Option<(Vec<OrderLine>, ServiceResponse<Decimal, StoreError>)> {
    match receiver.recv().await {
        Some(StoreRequest::ApplyOrder { lines, respond_to }) => Some((lines, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actors::OrderService;
    use crate::domain::{OrderItem, Product, ReceiptLine, Store};
    use crate::error::{OrderError, ProductError};
    use rust_decimal_macros::dec;

    /// Listings as a store would hand them out, ids included.
    fn listings(products: Vec<Product>) -> Vec<Listing> {
        Store::new(products).listings().to_vec()
    }

    #[tokio::test]
    async fn test_order_creation_flow() {
        let (store_client, mut store_rx) = create_mock_store_client(10);
        let (service, order_client) = OrderService::new(10, store_client);
        tokio::spawn(service.run());

        let catalog = listings(vec![
            Product::new("MacBook Air M2", dec!(1450), 100).unwrap(),
            Product::new("Google Pixel 7", dec!(500), 250).unwrap(),
        ]);
        let (mac, pixel) = (catalog[0].clone(), catalog[1].clone());

        let client = order_client.clone();
        let order_task = tokio::spawn(async move {
            client
                .create_order(vec![
                    OrderItem::new("macbook air m2", 2),
                    OrderItem::new("GOOGLE PIXEL 7", 1),
                ])
                .await
        });

        let (name, responder) = expect_find_product(&mut store_rx).await.expect("Expected FindProduct");
        assert_eq!(name, "macbook air m2");
        responder.send(Ok(Some(mac.clone()))).unwrap();

        let (name, responder) = expect_find_product(&mut store_rx).await.expect("Expected FindProduct");
        assert_eq!(name, "GOOGLE PIXEL 7");
        responder.send(Ok(Some(pixel.clone()))).unwrap();

        // Lines point at the resolved entries
        let (lines, responder) = expect_apply_order(&mut store_rx).await.expect("Expected ApplyOrder");
        assert_eq!(lines, vec![OrderLine::new(mac.id, 2), OrderLine::new(pixel.id, 1)]);
        responder.send(Ok(dec!(3400))).unwrap();

        let receipt = order_task.await.unwrap().unwrap();
        assert_eq!(receipt.id, "order_1");
        assert_eq!(receipt.total, dec!(3400));
        assert_eq!(
            receipt.lines,
            vec![
                ReceiptLine {
                    line: OrderLine::new(mac.id, 2),
                    name: "MacBook Air M2".to_string(),
                },
                ReceiptLine {
                    line: OrderLine::new(pixel.id, 1),
                    name: "Google Pixel 7".to_string(),
                },
            ]
        );

        let stored = order_client.get_order("order_1".to_string()).await.unwrap();
        assert_eq!(stored, Some(receipt));
    }

    #[tokio::test]
    async fn test_unknown_product_never_reaches_store() {
        let (store_client, mut store_rx) = create_mock_store_client(10);
        let (service, order_client) = OrderService::new(10, store_client);
        tokio::spawn(service.run());

        let client = order_client.clone();
        let order_task = tokio::spawn(async move {
            client
                .create_order(vec![OrderItem::new("iPhone 15", 1), OrderItem::new("Shipping", 1)])
                .await
        });

        let (_, responder) = expect_find_product(&mut store_rx).await.expect("Expected FindProduct");
        responder.send(Ok(None)).unwrap();

        let result = order_task.await.unwrap();
        assert_eq!(result, Err(StoreError::UnknownProduct("iPhone 15".to_string())));
        assert_eq!(order_client.get_order_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_validation_happens_before_lookup() {
        let (store_client, _store_rx) = create_mock_store_client(10);
        let (service, order_client) = OrderService::new(10, store_client);
        tokio::spawn(service.run());

        let empty = order_client.create_order(vec![]).await;
        assert!(matches!(empty, Err(StoreError::ValidationError(_))));

        let zero = order_client
            .create_order(vec![OrderItem::new("Shipping", 0)])
            .await;
        assert!(matches!(zero, Err(StoreError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_store_failure_is_not_recorded() {
        let (store_client, mut store_rx) = create_mock_store_client(10);
        let (service, order_client) = OrderService::new(10, store_client);
        tokio::spawn(service.run());

        let client = order_client.clone();
        let order_task = tokio::spawn(async move {
            client.create_order(vec![OrderItem::new("Shipping", 2)]).await
        });

        let shipping = listings(vec![Product::limited("Shipping", dec!(10), 250, 1).unwrap()]);
        let (_, responder) = expect_find_product(&mut store_rx).await.expect("Expected FindProduct");
        responder.send(Ok(shipping.into_iter().next())).unwrap();

        let (_, responder) = expect_apply_order(&mut store_rx).await.expect("Expected ApplyOrder");
        let failure = OrderError::LineFailed {
            product: "Shipping".to_string(),
            source: ProductError::ExceedsMaxPerOrder {
                product: "Shipping".to_string(),
                requested: 2,
                maximum: 1,
            },
        };
        responder.send(Err(failure.clone().into())).unwrap();

        let result = order_task.await.unwrap();
        assert_eq!(result, Err(StoreError::Order(failure)));
        assert!(order_client.list_orders().await.unwrap().is_empty());
    }
}
