//! # Quote Engine
//!
//! Validation and pricing of a candidate rental, shared by the quote endpoint
//! and the order pipeline.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RentalRequest (raw JSON)                                               │
//! │      │                                                                  │
//! │      ▼  validate_for_quote() / validate_for_order()  ── no store access ──│
//! │  1. at least one line, at most MAX_ORDER_ITEMS                          │
//! │  2. every line has a key and a positive whole qty                       │
//! │     (orders only: a missing qty means 1)                                │
//! │  3. both dates parse                                                    │
//! │  4. start < end                                                         │
//! │  5. days = ceil((end - start) / 24h)                                    │
//! │     (orders only: a client-sent days must match)                        │
//! │      │                                                                  │
//! │      ▼  ValidatedRental { lines, period }                               │
//! │                                                                         │
//! │  caller resolves the keys against the catalog                           │
//! │      │                                                                  │
//! │      ▼  price_quote()                      ── pure ──                   │
//! │  6. any key missing      → ItemsNotFound                                │
//! │  7. any item unavailable → ItemsUnavailable                             │
//! │  8. itemTotal = rate × qty; total = Σ itemTotal × days                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, InvalidLine, UnavailableItem, ValidationError};
use crate::money::Money;
use crate::types::{CatalogItem, OrderLineRequest, PricedLineItem};
use crate::validation::RentalPeriod;
use crate::{CURRENCY, MAX_ITEM_QUANTITY, MAX_ORDER_ITEMS, QUOTE_VALIDITY_MINUTES};

// =============================================================================
// Request
// =============================================================================

/// One order line exactly as the client sent it.
///
/// `qty` stays untyped so that `"2"`, `0` or `1.5` reach validation and are
/// reported per line instead of failing the whole body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RawOrderLine {
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    #[ts(type = "number | undefined")]
    pub qty: Option<Value>,
}

/// Body of both `POST /api/orders` and `POST /api/orders/quote`.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RentalRequest {
    #[serde(default)]
    pub ordered_items: Vec<RawOrderLine>,
    #[serde(default)]
    pub starting_date: Option<String>,
    #[serde(default)]
    pub ending_date: Option<String>,
    /// Optional client-side day count. Orders check it against the dates;
    /// quotes ignore it.
    #[serde(default)]
    pub days: Option<i64>,
}

/// A request that passed every check that needs no store access.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRental {
    pub lines: Vec<OrderLineRequest>,
    pub period: RentalPeriod,
}

/// How a line without a `qty` is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingQuantity {
    /// Quotes: the line is invalid.
    Reject,
    /// Orders: one vehicle.
    DefaultToOne,
}

impl RentalRequest {
    /// Steps 1-5 for a quote. Every line needs a `qty`; `days` is ignored.
    pub fn validate_for_quote(&self) -> CoreResult<ValidatedRental> {
        let lines = validate_lines(&self.ordered_items, MissingQuantity::Reject)?;
        let period = self.period()?;
        Ok(ValidatedRental { lines, period })
    }

    /// Steps 1-5 for an order, plus the day-count check.
    pub fn validate_for_order(&self) -> CoreResult<ValidatedRental> {
        let lines = validate_lines(&self.ordered_items, MissingQuantity::DefaultToOne)?;
        let period = self.period()?;
        period.check_days(self.days)?;
        Ok(ValidatedRental { lines, period })
    }

    fn period(&self) -> CoreResult<RentalPeriod> {
        Ok(RentalPeriod::parse(
            self.starting_date.as_deref(),
            self.ending_date.as_deref(),
        )?)
    }
}

/// Checks line count, then the shape of every line.
///
/// All malformed lines are reported together.
pub fn validate_lines(
    raw: &[RawOrderLine],
    missing: MissingQuantity,
) -> CoreResult<Vec<OrderLineRequest>> {
    if raw.is_empty() {
        return Err(ValidationError::NoItems.into());
    }
    if raw.len() > MAX_ORDER_ITEMS {
        return Err(ValidationError::TooManyItems {
            max: MAX_ORDER_ITEMS,
        }
        .into());
    }

    let mut lines = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();

    for (index, line) in raw.iter().enumerate() {
        let key = line
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        let problem = match (key, parse_quantity(line.qty.as_ref(), missing)) {
            (None, _) => Some("Vehicle key is required".to_string()),
            (Some(_), Err(reason)) => Some(reason),
            (Some(key), Ok(quantity)) => {
                lines.push(OrderLineRequest {
                    key: key.to_string(),
                    quantity,
                });
                None
            }
        };

        if let Some(reason) = problem {
            invalid.push(InvalidLine {
                index,
                key: line.key.clone(),
                qty: line.qty.clone(),
                reason,
            });
        }
    }

    if invalid.is_empty() {
        Ok(lines)
    } else {
        Err(CoreError::InvalidItems(invalid))
    }
}

fn parse_quantity(qty: Option<&Value>, missing: MissingQuantity) -> Result<i64, String> {
    let n = match (qty, missing) {
        (None | Some(Value::Null), MissingQuantity::DefaultToOne) => return Ok(1),
        (None | Some(Value::Null), MissingQuantity::Reject) => {
            return Err("Quantity is required".to_string())
        }
        (Some(Value::Number(n)), _) => n,
        (Some(_), _) => return Err("Quantity must be a number".to_string()),
    };

    let whole = match (n.as_i64(), n.as_f64()) {
        (Some(q), _) => Some(q),
        (None, Some(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    };

    match whole {
        Some(q) if q <= 0 => Err("Quantity must be positive".to_string()),
        Some(q) if q > MAX_ITEM_QUANTITY => Err(format!(
            "Quantity must be at most {}",
            MAX_ITEM_QUANTITY
        )),
        Some(q) => Ok(q),
        None => Err("Quantity must be a whole number".to_string()),
    }
}

// =============================================================================
// Quote
// =============================================================================

/// One priced line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteItem {
    pub key: String,
    pub model: String,
    pub make: String,
    pub year: i32,
    pub image: String,
    pub qty: i64,
    pub daily_rate: Money,
    /// `daily_rate × qty`
    pub item_total: Money,
    /// `item_total × days`
    pub total_for_period: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
pub struct PeriodBounds {
    #[ts(as = "String")]
    pub start: DateTime<Utc>,
    #[ts(as = "String")]
    pub end: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMetadata {
    /// Σ qty over all lines.
    pub vehicle_count: i64,
    pub rental_period: PeriodBounds,
}

/// A priced, non-binding rental offer.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub total: Money,
    /// Cost of all lines for a single day.
    pub daily_rate: Money,
    pub days: i64,
    pub detailed_items: Vec<QuoteItem>,
    pub currency: String,
    #[ts(as = "String")]
    pub valid_until: DateTime<Utc>,
    pub metadata: QuoteMetadata,
}

/// Prices validated lines against already-resolved catalog items.
///
/// `catalog` may be in any order and may contain extra items. Missing keys
/// are reported before unavailable ones, each list deduplicated and in
/// request order.
pub fn price_quote(
    lines: &[OrderLineRequest],
    period: &RentalPeriod,
    catalog: &[CatalogItem],
    now: DateTime<Utc>,
) -> CoreResult<Quote> {
    let by_key: HashMap<&str, &CatalogItem> =
        catalog.iter().map(|item| (item.key.as_str(), item)).collect();

    let mut seen = HashSet::new();
    let missing: Vec<String> = lines
        .iter()
        .filter(|line| !by_key.contains_key(line.key.as_str()))
        .filter(|line| seen.insert(line.key.as_str()))
        .map(|line| line.key.clone())
        .collect();
    if !missing.is_empty() {
        return Err(CoreError::ItemsNotFound { keys: missing });
    }

    let mut seen = HashSet::new();
    let unavailable: Vec<UnavailableItem> = lines
        .iter()
        .filter_map(|line| by_key.get(line.key.as_str()).copied())
        .filter(|item| seen.insert(item.key.as_str()))
        .filter_map(unavailable_item)
        .collect();
    if !unavailable.is_empty() {
        return Err(CoreError::ItemsUnavailable { items: unavailable });
    }

    let mut detailed_items = Vec::with_capacity(lines.len());
    for line in lines {
        let Some(item) = by_key.get(line.key.as_str()) else {
            continue;
        };
        let item_total = item.daily_rate.multiply_quantity(line.quantity);
        detailed_items.push(QuoteItem {
            key: item.key.clone(),
            model: item.model.clone(),
            make: item.make.clone(),
            year: item.year,
            image: item.display_image().to_string(),
            qty: line.quantity,
            daily_rate: item.daily_rate,
            item_total,
            total_for_period: item_total.multiply_days(period.days),
        });
    }

    let one_day: Money = detailed_items.iter().map(|i| i.item_total).sum();

    Ok(Quote {
        total: one_day.multiply_days(period.days),
        daily_rate: one_day,
        days: period.days,
        currency: CURRENCY.to_string(),
        valid_until: now + Duration::minutes(QUOTE_VALIDITY_MINUTES),
        metadata: QuoteMetadata {
            vehicle_count: lines.iter().map(|l| l.quantity).sum(),
            rental_period: PeriodBounds {
                start: period.start,
                end: period.end,
            },
        },
        detailed_items,
    })
}

// =============================================================================
// Order Lines
// =============================================================================

fn unavailable_item(item: &CatalogItem) -> Option<UnavailableItem> {
    item.unavailable_reason().map(|reason| UnavailableItem {
        key: item.key.clone(),
        model: item.model.clone(),
        reason,
    })
}

/// Prices a single order line against its freshly looked-up catalog item.
///
/// Used by the order pipeline, which resolves lines one at a time and stops
/// at the first failure.
pub fn price_order_line(item: &CatalogItem, quantity: i64) -> CoreResult<PricedLineItem> {
    match unavailable_item(item) {
        Some(unavailable) => Err(CoreError::ItemsUnavailable {
            items: vec![unavailable],
        }),
        None => Ok(item.snapshot(quantity)),
    }
}

/// `Σ(unit_price × quantity) × days`
pub fn order_total(lines: &[PricedLineItem], days: i64) -> Money {
    lines
        .iter()
        .map(PricedLineItem::line_total)
        .sum::<Money>()
        .multiply_days(days)
}

// =============================================================================
// Unit Tests
// =============================================================================
