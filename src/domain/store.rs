use std::fmt;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Product, Quantity};
use crate::error::{OrderError, ProductError};

/// Which products count towards [`Store::get_total_quantity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityPolicy {
    #[default]
    ActiveOnly,
    AllProducts,
}

/// Handle to one entry of a store. Assigned on insertion, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A product together with the id the store knows it by.
#[derive(Debug, Clone)]
pub struct Listing {
    pub id: ProductId,
    pub product: Product,
}

/// One entry of a shopping list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderLine {
    pub product: ProductId,
    pub quantity: u32,
}

impl OrderLine {
    pub fn new(product: ProductId, quantity: u32) -> Self {
        Self { product, quantity }
    }
}

/// Ordered collection of products. Names need not be unique; entries are
/// told apart by their [`ProductId`].
#[derive(Debug, Clone, Default)]
pub struct Store {
    listings: Vec<Listing>,
    next_id: u64,
    quantity_policy: QuantityPolicy,
}

impl Store {
    pub fn new(products: Vec<Product>) -> Self {
        let mut store = Self::default();
        for product in products {
            store.add_product(product);
        }
        store
    }

    pub fn with_quantity_policy(mut self, policy: QuantityPolicy) -> Self {
        self.quantity_policy = policy;
        self
    }

    pub fn quantity_policy(&self) -> QuantityPolicy {
        self.quantity_policy
    }

    pub fn add_product(&mut self, product: Product) -> ProductId {
        self.next_id += 1;
        let id = ProductId(self.next_id);
        self.listings.push(Listing { id, product });
        id
    }

    pub fn remove_product(&mut self, id: ProductId) -> Option<Product> {
        let index = self.listings.iter().position(|l| l.id == id)?;
        Some(self.listings.remove(index).product)
    }

    pub fn get_total_quantity(&self) -> Quantity {
        self.listings
            .iter()
            .map(|l| &l.product)
            .filter(|p| match self.quantity_policy {
                QuantityPolicy::ActiveOnly => p.is_active(),
                QuantityPolicy::AllProducts => true,
            })
            .map(Product::get_quantity)
            .sum()
    }

    /// Active products in insertion order.
    pub fn get_all_products(&self) -> Vec<&Product> {
        self.active_listings().into_iter().map(|l| &l.product).collect()
    }

    pub fn active_listings(&self) -> Vec<&Listing> {
        self.listings.iter().filter(|l| l.product.is_active()).collect()
    }

    /// Every entry, inactive ones included.
    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.listings.iter().find(|l| l.id == id).map(|l| &l.product)
    }

    pub fn get_mut(&mut self, id: ProductId) -> Option<&mut Product> {
        self.listings
            .iter_mut()
            .find(|l| l.id == id)
            .map(|l| &mut l.product)
    }

    /// Case-insensitive lookup among active products, first match wins.
    pub fn find_active(&self, name: &str) -> Option<&Listing> {
        let name = name.trim();
        self.listings
            .iter()
            .find(|l| l.product.is_active() && l.product.name().eq_ignore_ascii_case(name))
    }

    pub fn contains(&self, product: &Product) -> bool {
        self.listings.iter().any(|l| l.product.same_product_as(product))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.listings.iter().any(|l| l.product.name() == name)
    }

    /// Buys every line in sequence and returns the summed charge.
    ///
    /// The first failing line stops processing; lines already bought keep
    /// their effect on stock.
    pub fn order(&mut self, lines: &[OrderLine]) -> Result<Decimal, OrderError> {
        let mut total_cost = Decimal::ZERO;
        for (index, line) in lines.iter().enumerate() {
            match self.buy_line(line) {
                Ok(cost) => total_cost += cost,
                Err((product, source)) => {
                    if index > 0 {
                        warn!(
                            product = %product,
                            applied_lines = index,
                            "Order failed after earlier lines were applied"
                        );
                    }
                    return Err(OrderError::LineFailed { product, source });
                }
            }
        }
        debug!(lines = lines.len(), total_cost = %total_cost, "Order processed");
        Ok(total_cost)
    }

    /// On failure also returns the label the error should carry: the
    /// product name, or the id when nothing is listed under it.
    fn buy_line(&mut self, line: &OrderLine) -> Result<Decimal, (String, ProductError)> {
        let Some(product) = self.get_mut(line.product) else {
            let label = line.product.to_string();
            return Err((label.clone(), ProductError::NotFound(label)));
        };
        if !product.is_active() {
            let name = product.name().to_string();
            return Err((name.clone(), ProductError::Inactive(name)));
        }
        product
            .buy(line.quantity)
            .map_err(|e| (product.name().to_string(), e))
    }

    /// New store holding both collections back to back, without dedup.
    /// Entries get fresh ids; the quantity policy is `first`'s.
    pub fn combine(first: &Store, second: &Store) -> Store {
        let products = first
            .listings
            .iter()
            .chain(second.listings.iter())
            .map(|l| l.product.clone())
            .collect();
        Store::new(products).with_quantity_policy(first.quantity_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Promotion;
    use rust_decimal_macros::dec;

    fn sample_store() -> Store {
        Store::new(vec![
            Product::new("MacBook Air M2", dec!(1450), 100).unwrap(),
            Product::new("Bose QuietComfort Earbuds", dec!(250), 500).unwrap(),
            Product::new("Google Pixel 7", dec!(500), 250).unwrap(),
        ])
    }

    fn id_of(store: &Store, name: &str) -> ProductId {
        store.find_active(name).unwrap().id
    }

    fn quantities(store: &Store) -> Vec<Quantity> {
        store.listings().iter().map(|l| l.product.get_quantity()).collect()
    }

    #[test]
    fn test_order_sums_line_costs() {
        let mut store = sample_store();
        let lines = [
            OrderLine::new(id_of(&store, "MacBook Air M2"), 1),
            OrderLine::new(id_of(&store, "Bose QuietComfort Earbuds"), 2),
        ];
        assert_eq!(store.order(&lines), Ok(dec!(1950)));
        assert_eq!(store.get_total_quantity(), Quantity::Units(847));
    }

    #[test]
    fn test_order_total_is_exact() {
        let mut store = Store::new(vec![
            Product::new("Cable", dec!(0.1), 10).unwrap(),
            Product::new("Adapter", dec!(0.2), 10).unwrap(),
        ]);
        let lines = [
            OrderLine::new(id_of(&store, "Cable"), 1),
            OrderLine::new(id_of(&store, "Adapter"), 1),
        ];
        assert_eq!(store.order(&lines), Ok(dec!(0.3)));
    }

    #[test]
    fn test_empty_order_costs_nothing() {
        let mut store = sample_store();
        assert_eq!(store.order(&[]), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_failed_order_keeps_earlier_lines() {
        let mut store = Store::new(vec![
            Product::new("MacBook Air M2", dec!(1450), 10).unwrap(),
            Product::new("Google Pixel 7", dec!(500), 2).unwrap(),
            Product::new("Bose QuietComfort Earbuds", dec!(250), 5).unwrap(),
        ]);
        let lines = [
            OrderLine::new(id_of(&store, "MacBook Air M2"), 3),
            OrderLine::new(id_of(&store, "Google Pixel 7"), 5),
            OrderLine::new(id_of(&store, "Bose QuietComfort Earbuds"), 1),
        ];

        let err = store.order(&lines).unwrap_err();

        assert_eq!(err.product(), "Google Pixel 7");
        assert!(matches!(err.cause(), ProductError::InsufficientStock { .. }));
        // Last line never attempted
        assert_eq!(
            quantities(&store),
            vec![Quantity::Units(7), Quantity::Units(2), Quantity::Units(5)]
        );
    }

    #[test]
    fn test_order_rejects_unknown_and_inactive_lines() {
        let mut store = sample_store();
        let pixel = id_of(&store, "Google Pixel 7");
        let removed = store.add_product(Product::new("iPhone 15", dec!(999), 1).unwrap());
        store.remove_product(removed).unwrap();

        let err = store.order(&[OrderLine::new(removed, 1)]).unwrap_err();
        assert_eq!(err.product(), "#4");
        assert_eq!(err.cause(), &ProductError::NotFound("#4".to_string()));

        store.get_mut(pixel).unwrap().deactivate();
        let err = store.order(&[OrderLine::new(pixel, 1)]).unwrap_err();
        assert_eq!(err.cause(), &ProductError::Inactive("Google Pixel 7".to_string()));
    }

    #[test]
    fn test_order_wraps_zero_quantity() {
        let mut store = sample_store();
        let mac = id_of(&store, "MacBook Air M2");
        let err = store.order(&[OrderLine::new(mac, 0)]).unwrap_err();
        assert_eq!(
            err,
            OrderError::LineFailed {
                product: "MacBook Air M2".to_string(),
                source: ProductError::InvalidQuantity(0),
            }
        );
        assert_eq!(
            err.to_string(),
            "Failed to order MacBook Air M2: Invalid quantity: 0"
        );
    }

    #[test]
    fn test_sold_out_product_leaves_catalog() {
        let mut store = Store::new(vec![
            Product::new("MacBook Air M2", dec!(1450), 2).unwrap(),
            Product::new("Google Pixel 7", dec!(500), 250).unwrap(),
        ]);
        let mac = id_of(&store, "MacBook Air M2");
        store.order(&[OrderLine::new(mac, 2)]).unwrap();

        let names: Vec<&str> = store.get_all_products().into_iter().map(Product::name).collect();
        assert_eq!(names, vec!["Google Pixel 7"]);
        // Still held, just filtered on read
        assert_eq!(store.listings().len(), 2);
        assert_eq!(store.get(mac).map(Product::get_quantity), Some(Quantity::Units(0)));
    }

    #[test]
    fn test_total_quantity_policies() {
        let mut store = Store::new(vec![
            Product::new("MacBook Air M2", dec!(1450), 100).unwrap(),
            Product::new("Google Pixel 7", dec!(500), 0).unwrap(),
        ]);
        let mac = id_of(&store, "MacBook Air M2");
        store.get_mut(mac).unwrap().deactivate();
        assert_eq!(store.get_total_quantity(), Quantity::Units(0));

        let store = store.with_quantity_policy(QuantityPolicy::AllProducts);
        assert_eq!(store.get_total_quantity(), Quantity::Units(100));
    }

    #[test]
    fn test_total_quantity_with_non_stocked() {
        let mut store = sample_store();
        store.add_product(Product::non_stocked("Windows License", dec!(125)).unwrap());
        assert_eq!(store.get_total_quantity(), Quantity::Unlimited);
    }

    #[test]
    fn test_contains_by_name() {
        let store = sample_store();
        let fresh_mac = Product::new("MacBook Air M2", dec!(1), 1).unwrap();
        let stranger = Product::new("iPhone 15", dec!(999), 1).unwrap();
        assert!(store.contains(&fresh_mac));
        assert!(!store.contains(&stranger));
    }

    #[test]
    fn test_find_active_is_case_insensitive() {
        let mut store = sample_store();
        let pixel = store.find_active("  google pixel 7 ").map(|l| l.id);
        assert_eq!(pixel, Some(id_of(&store, "Google Pixel 7")));

        store.get_mut(id_of(&store, "Google Pixel 7")).unwrap().deactivate();
        assert!(store.find_active("google pixel 7").is_none());
    }

    #[test]
    fn test_combine_concatenates() {
        let first = Store::new(vec![
            Product::new("MacBook Air M2", dec!(1450), 100).unwrap(),
            Product::new("Bose QuietComfort Earbuds", dec!(250), 500).unwrap(),
        ]);
        let second = Store::new(vec![
            Product::new("Google Pixel 7", dec!(500), 250).unwrap(),
            Product::new("MacBook Air M2", dec!(1450), 5).unwrap(),
        ]);

        let combined = Store::combine(&first, &second);
        assert_eq!(combined.get_all_products().len(), 4);
        assert_eq!(first.listings().len(), 2);
        assert_eq!(second.listings().len(), 2);

        let ids: Vec<ProductId> = combined.listings().iter().map(|l| l.id).collect();
        assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_order_targets_one_of_duplicate_names() {
        let first = Store::new(vec![Product::new("MacBook Air M2", dec!(1450), 2).unwrap()]);
        let second = Store::new(vec![Product::new("MacBook Air M2", dec!(1450), 10).unwrap()]);
        let mut combined = Store::combine(&first, &second);

        let larger = combined.listings()[1].id;
        assert_eq!(combined.order(&[OrderLine::new(larger, 5)]), Ok(dec!(7250)));
        assert_eq!(quantities(&combined), vec![Quantity::Units(2), Quantity::Units(5)]);
    }

    #[test]
    fn test_remove_product() {
        let mut store = sample_store();
        let pixel = id_of(&store, "Google Pixel 7");
        let removed = store.remove_product(pixel).unwrap();
        assert_eq!(removed.name(), "Google Pixel 7");
        assert!(store.remove_product(pixel).is_none());
        assert_eq!(store.listings().len(), 2);

        // Ids are not reused
        let again = store.add_product(removed);
        assert_ne!(again, pixel);
    }

    #[test]
    fn test_order_with_promotions() {
        let mut store = Store::new(vec![
            Product::new("MacBook Air M2", dec!(1450), 100)
                .unwrap()
                .with_promotion(Promotion::second_half_price("Second Half Price!").unwrap()),
            Product::non_stocked("Windows License", dec!(125))
                .unwrap()
                .with_promotion(Promotion::percent_discount("30% off!", dec!(30)).unwrap()),
        ]);
        let lines = [
            OrderLine::new(id_of(&store, "MacBook Air M2"), 2),
            OrderLine::new(id_of(&store, "Windows License"), 4),
        ];
        assert_eq!(store.order(&lines), Ok(dec!(2525)));
    }
}
