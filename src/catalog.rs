use rust_decimal::Decimal;

use crate::domain::{Product, Promotion};
use crate::error::ConfigError;

/// The stock the Best Buy store opens with.
pub fn best_buy_catalog() -> Result<Vec<Product>, ConfigError> {
    let second_half_price = Promotion::second_half_price("Second Half Price!")?;
    let third_one_free = Promotion::third_one_free("Third One Free!")?;
    let thirty_percent = Promotion::percent_discount("30% off!", Decimal::from(30))?;

    Ok(vec![
        Product::new("MacBook Air M2", Decimal::from(1450), 100)?.with_promotion(second_half_price),
        Product::new("Bose QuietComfort Earbuds", Decimal::from(250), 500)?.with_promotion(third_one_free),
        Product::new("Google Pixel 7", Decimal::from(500), 250)?,
        Product::non_stocked("Windows License", Decimal::from(125))?.with_promotion(thirty_percent),
        Product::limited("Shipping", Decimal::from(10), 250, 1)?,
    ])
}
