//! Quote service.
//!
//! A quote is computed from one batch lookup and never writes anything.

use chrono::Utc;
use tracing::debug;

use rental_core::quote::price_quote;
use rental_core::{Quote, RentalRequest};
use rental_db::Database;

use crate::error::ApiResult;

/// Quote service implementation.
#[derive(Debug, Clone)]
pub struct QuoteService {
    db: Database,
}

impl QuoteService {
    /// Create a new quote service.
    pub fn new(db: Database) -> Self {
        QuoteService { db }
    }

    /// Prices a candidate rental without persisting it.
    pub async fn compute_quote(&self, request: &RentalRequest) -> ApiResult<Quote> {
        // Everything that needs no store access is checked first
        let rental = request.validate_for_quote()?;

        let keys: Vec<&str> = rental.lines.iter().map(|line| line.key.as_str()).collect();
        let catalog = self.db.catalog().get_many_by_keys(&keys).await?;

        let quote = price_quote(&rental.lines, &rental.period, &catalog, Utc::now())?;

        debug!(
            vehicles = quote.metadata.vehicle_count,
            days = quote.days,
            total = %quote.total,
            "Quote computed"
        );

        Ok(quote)
    }
}
