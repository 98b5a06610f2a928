//! Layered application settings and the catalog they describe.
//!
//! Sources, later ones winning: `config/default`, `config/local` (both
//! optional, any format the `config` crate understands), then environment
//! variables prefixed with `BESTBUY`, e.g. `BESTBUY_SERVICE__BUFFER_SIZE=64`.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::catalog::best_buy_catalog;
use crate::domain::{Product, Promotion, QuantityPolicy, Store};
use crate::error::{ConfigError, ProductError};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub catalog: Vec<ProductSpec>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            buffer_size: default_buffer_size(),
        }
    }
}

fn default_buffer_size() -> usize {
    32
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct StoreSettings {
    #[serde(default)]
    pub quantity_policy: QuantityPolicy,
}

/// Untyped catalog entry. Quantities are signed so that bad input is
/// reported instead of failing to parse.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProductSpec {
    Stocked {
        name: String,
        price: Decimal,
        quantity: i64,
        promotion: Option<Promotion>,
    },
    NonStocked {
        name: String,
        price: Decimal,
        promotion: Option<Promotion>,
    },
    Limited {
        name: String,
        price: Decimal,
        quantity: i64,
        maximum: i64,
        promotion: Option<Promotion>,
    },
}

impl TryFrom<ProductSpec> for Product {
    type Error = ConfigError;

    fn try_from(spec: ProductSpec) -> Result<Self, Self::Error> {
        let (product, promotion) = match spec {
            ProductSpec::Stocked {
                name,
                price,
                quantity,
                promotion,
            } => (Product::new(name, price, to_count("quantity", quantity)?)?, promotion),
            ProductSpec::NonStocked {
                name,
                price,
                promotion,
            } => (Product::non_stocked(name, price)?, promotion),
            ProductSpec::Limited {
                name,
                price,
                quantity,
                maximum,
                promotion,
            } => (
                Product::limited(
                    name,
                    price,
                    to_count("quantity", quantity)?,
                    to_count("maximum", maximum)?,
                )?,
                promotion,
            ),
        };

        match promotion {
            Some(promotion) => {
                promotion.validate()?;
                Ok(product.with_promotion(promotion))
            }
            None => Ok(product),
        }
    }
}

fn to_count(field: &str, value: i64) -> Result<u32, ProductError> {
    u32::try_from(value).map_err(|_| {
        ProductError::InvalidAttribute(format!("{} must be a non-negative count, got {}", field, value))
    })
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("BESTBUY")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_layered(Path::new("config"), environment())
    }

    fn load_layered(dir: &Path, env: config::Environment) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from(dir.join("default")).required(false))
            .add_source(config::File::from(dir.join("local")).required(false))
            .add_source(env)
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Builds the store from the configured catalog, or from the built-in
    /// Best Buy catalog when none is configured.
    pub fn build_store(&self) -> Result<Store, ConfigError> {
        let products = if self.catalog.is_empty() {
            warn!("No catalog configured, using the built-in Best Buy catalog");
            best_buy_catalog()?
        } else {
            self.catalog
                .iter()
                .cloned()
                .map(Product::try_from)
                .collect::<Result<Vec<_>, _>>()?
        };

        info!(products = products.len(), policy = ?self.store.quantity_policy, "Catalog loaded");
        Ok(Store::new(products).with_quantity_policy(self.store.quantity_policy))
    }
}
