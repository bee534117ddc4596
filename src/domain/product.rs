use std::ops::RangeInclusive;

use rand::Rng;

pub const DEFAULT_RATING_RANGE: RangeInclusive<f64> = 3.5..=5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub title: String,
    pub price: f64,
    pub rating: f64,
    pub description: String,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PriceError {
    #[error("price is empty")]
    Empty,
    #[error("price {0:?} is not a number")]
    NotANumber(String),
    #[error("price {0:?} is out of range")]
    OutOfRange(String),
}

pub fn parse_price(raw: &str) -> Result<f64, PriceError> {
    let trimmed = raw.trim();
    let amount = trimmed.strip_prefix('$').unwrap_or(trimmed).trim();
    if amount.is_empty() {
        return Err(PriceError::Empty);
    }

    let amount: String = amount.chars().filter(|&c| c != ',').collect();
    let price: f64 = amount
        .parse()
        .map_err(|_| PriceError::NotANumber(raw.to_string()))?;

    match price.is_finite() && price >= 0.0 {
        true => Ok(price),
        false => Err(PriceError::OutOfRange(raw.to_string())),
    }
}

/// Rating drawn uniformly from `range`, rounded to one decimal place.
pub fn random_rating<R: Rng + ?Sized>(rng: &mut R, range: &RangeInclusive<f64>) -> f64 {
    let value = rng.gen_range(range.clone());
    (value * 10.0).round() / 10.0
}

/// Case-insensitive substring match on the title. Whitespace in the query is significant.
pub fn filter_by_title<'a>(products: &'a [Product], query: &str) -> Vec<&'a Product> {
    let query = query.to_lowercase();
    if query.is_empty() {
        return products.iter().collect();
    }

    products
        .iter()
        .filter(|p| p.title.to_lowercase().contains(&query))
        .collect()
}
