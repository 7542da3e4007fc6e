//! # Validation Module
//!
//! Input validation utilities for the rental backend.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Type validation (deserialization)                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + quote::RentalRequest                           │
//! │  └── Business rule validation, before any store access                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE constraints (key, email, order_id)                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::NewCatalogItem;
use crate::MAX_RENTAL_DAYS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a catalog key.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use rental_core::validation::validate_key;
///
/// assert!(validate_key("TOY-AXIO-01").is_ok());
/// assert!(validate_key("").is_err());
/// assert!(validate_key("has space").is_err());
/// ```
pub fn validate_key(key: &str) -> ValidationResult<()> {
    let key = key.trim();

    if key.is_empty() {
        return Err(ValidationError::Required {
            field: "key".to_string(),
        });
    }

    if key.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "key".to_string(),
            max: 50,
        });
    }

    if !key
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "key".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a required free-text field with a maximum length.
pub fn validate_text(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Normalizes and validates an email address.
///
/// Returns the trimmed, lowercased address. The check is deliberately
/// shallow: one `@`, a non-empty local part, and a dotted domain.
pub fn normalize_email(email: &str) -> ValidationResult<String> {
    let email = email.trim().to_lowercase();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }

    Ok(email)
}

/// Validates a new password.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() < 8 {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: 8,
        });
    }

    if password.len() > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a review rating (1 to 5 stars).
pub fn validate_rating(rating: i64) -> ValidationResult<()> {
    if !(1..=5).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        });
    }
    Ok(())
}

/// Validates a catalog daily rate.
///
/// ## Rules
/// - Must be positive
/// - At most 10,000,000.00 so rate × quantity × days stays well inside i64
pub fn validate_daily_rate(rate: Money) -> ValidationResult<()> {
    const MAX_RATE_CENTS: i64 = 1_000_000_000;

    if !rate.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "dailyRate".to_string(),
        });
    }

    if rate.cents() > MAX_RATE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "dailyRate".to_string(),
            min: 1,
            max: MAX_RATE_CENTS,
        });
    }

    Ok(())
}

/// Validates a vehicle model year.
pub fn validate_year(year: i32) -> ValidationResult<()> {
    if !(1900..=2100).contains(&year) {
        return Err(ValidationError::OutOfRange {
            field: "year".to_string(),
            min: 1900,
            max: 2100,
        });
    }
    Ok(())
}

/// Validates a seat count.
pub fn validate_seats(seats: i32) -> ValidationResult<()> {
    if !(1..=100).contains(&seats) {
        return Err(ValidationError::OutOfRange {
            field: "seats".to_string(),
            min: 1,
            max: 100,
        });
    }
    Ok(())
}

// =============================================================================
// Composite Validators
// =============================================================================

/// Validates an admin's new catalog item, field by field.
pub fn validate_new_catalog_item(item: &NewCatalogItem) -> ValidationResult<()> {
    validate_key(&item.key)?;
    validate_text("model", &item.model, 100)?;
    validate_text("make", &item.make, 100)?;
    validate_year(item.year)?;
    validate_daily_rate(item.daily_rate)?;
    validate_seats(item.seats)?;
    validate_text("transmission", &item.transmission, 50)?;
    validate_text("fuelType", &item.fuel_type, 50)?;
    validate_text("carType", &item.car_type, 50)?;
    Ok(())
}

// =============================================================================
// Rental Period
// =============================================================================

/// Parses a rental date.
///
/// Accepts a calendar date (`2025-03-01`, read as midnight UTC) or a full
/// RFC 3339 timestamp (`2025-03-01T09:30:00+05:30`).
pub fn parse_rental_date(field: &str, value: &str) -> ValidationResult<DateTime<Utc>> {
    let value = value.trim();
    let invalid = || ValidationError::InvalidDate {
        field: field.to_string(),
    };

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(invalid)?;
        return Ok(midnight.and_utc());
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| invalid())
}

/// A validated `[start, end)` rental window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RentalPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Whole days, rounding any partial day up.
    pub days: i64,
}

impl RentalPeriod {
    /// Builds a period from already-parsed bounds.
    ///
    /// ## Rules
    /// - `start` strictly before `end`
    /// - `days = ceil((end - start) / 24h)`, at most `MAX_RENTAL_DAYS`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> ValidationResult<Self> {
        if start >= end {
            return Err(ValidationError::EndBeforeStart);
        }

        let millis = (end - start).num_milliseconds();
        let days = (millis + MS_PER_DAY - 1) / MS_PER_DAY;

        if days <= 0 || days > MAX_RENTAL_DAYS {
            return Err(ValidationError::OutOfRange {
                field: "days".to_string(),
                min: 1,
                max: MAX_RENTAL_DAYS,
            });
        }

        Ok(RentalPeriod { start, end, days })
    }

    /// Parses both bounds, then applies [`RentalPeriod::new`].
    ///
    /// ## Example
    /// ```rust
    /// use rental_core::validation::RentalPeriod;
    ///
    /// let period = RentalPeriod::parse(Some("2025-03-01"), Some("2025-03-04")).unwrap();
    /// assert_eq!(period.days, 3);
    /// assert!(RentalPeriod::parse(Some("2025-03-04"), Some("2025-03-04")).is_err());
    /// ```
    pub fn parse(start: Option<&str>, end: Option<&str>) -> ValidationResult<Self> {
        let start = parse_rental_date("startingDate", start.unwrap_or_default())?;
        let end = parse_rental_date("endingDate", end.unwrap_or_default())?;
        RentalPeriod::new(start, end)
    }

    /// Checks a client-supplied day count against the computed one.
    pub fn check_days(&self, given: Option<i64>) -> ValidationResult<()> {
        match given {
            Some(given) if given != self.days => Err(ValidationError::DaysMismatch {
                given,
                computed: self.days,
            }),
            _ => Ok(()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("TOY-AXIO-01").is_ok());
        assert!(validate_key("van_2").is_ok());

        assert!(validate_key("").is_err());
        assert!(validate_key("   ").is_err());
        assert!(validate_key("has space").is_err());
        assert!(validate_key(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ann@Example.LK ").unwrap(), "ann@example.lk");
        assert!(normalize_email("").is_err());
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.lk").is_err());
        assert!(normalize_email("a@b@c.lk").is_err());
        assert!(normalize_email("a@localhost").is_err());
        assert!(normalize_email("a b@example.lk").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("correct horse").is_ok());
        assert_eq!(
            validate_password("short"),
            Err(ValidationError::TooShort {
                field: "password".to_string(),
                min: 8
            })
        );
        assert!(validate_password("").is_err());
    }

    #[test]
    fn test_numeric_validators() {
        assert!(validate_rating(1).is_ok());
        assert!(validate_rating(5).is_ok());
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());

        assert!(validate_daily_rate(Money::from_cents(5000)).is_ok());
        assert!(validate_daily_rate(Money::zero()).is_err());
        assert!(validate_daily_rate(Money::from_cents(-1)).is_err());

        assert!(validate_year(2020).is_ok());
        assert!(validate_year(1800).is_err());
        assert!(validate_seats(5).is_ok());
        assert!(validate_seats(0).is_err());
    }

    #[test]
    fn test_parse_rental_date_formats() {
        let date = parse_rental_date("startingDate", "2025-03-01").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap());

        let ts = parse_rental_date("startingDate", "2025-03-01T10:00:00+05:30").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2025, 3, 1, 4, 30, 0).unwrap());

        for bad in ["", "tomorrow", "2025-13-01", "2025-02-30", "01/03/2025"] {
            assert_eq!(
                parse_rental_date("startingDate", bad),
                Err(ValidationError::InvalidDate {
                    field: "startingDate".to_string()
                }),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn test_rental_period_days() {
        let period = RentalPeriod::parse(Some("2025-03-01"), Some("2025-03-04")).unwrap();
        assert_eq!(period.days, 3);

        // A partial day counts as a whole day
        let period = RentalPeriod::parse(
            Some("2025-03-01T08:00:00Z"),
            Some("2025-03-02T09:00:00Z"),
        )
        .unwrap();
        assert_eq!(period.days, 2);

        let period = RentalPeriod::parse(
            Some("2025-03-01T08:00:00Z"),
            Some("2025-03-01T09:00:00Z"),
        )
        .unwrap();
        assert_eq!(period.days, 1);
    }

    #[test]
    fn test_rental_period_rejects_reversed_or_empty() {
        assert_eq!(
            RentalPeriod::parse(Some("2025-03-04"), Some("2025-03-01")),
            Err(ValidationError::EndBeforeStart)
        );
        assert_eq!(
            RentalPeriod::parse(Some("2025-03-04"), Some("2025-03-04")),
            Err(ValidationError::EndBeforeStart)
        );
    }

    #[test]
    fn test_rental_period_date_errors_come_first() {
        assert!(matches!(
            RentalPeriod::parse(None, Some("2025-03-04")),
            Err(ValidationError::InvalidDate { ref field }) if field == "startingDate"
        ));
        assert!(matches!(
            RentalPeriod::parse(Some("2025-03-04"), Some("nope")),
            Err(ValidationError::InvalidDate { ref field }) if field == "endingDate"
        ));
    }

    #[test]
    fn test_rental_period_upper_bound() {
        assert!(RentalPeriod::parse(Some("2025-01-01"), Some("2040-01-01")).is_err());
    }

    #[test]
    fn test_validate_new_catalog_item() {
        let mut item = NewCatalogItem {
            key: "TOY-AXIO-01".to_string(),
            model: "Axio".to_string(),
            make: "Toyota".to_string(),
            year: 2019,
            description: None,
            images: vec![],
            daily_rate: Money::from_cents(500000),
            is_available: true,
            transmission: "Auto".to_string(),
            fuel_type: "Petrol".to_string(),
            seats: 5,
            car_type: "Sedan".to_string(),
            location: None,
        };
        assert!(validate_new_catalog_item(&item).is_ok());

        item.daily_rate = Money::zero();
        assert!(matches!(
            validate_new_catalog_item(&item),
            Err(ValidationError::MustBePositive { .. })
        ));

        item.daily_rate = Money::from_cents(500000);
        item.model = "  ".to_string();
        assert!(matches!(
            validate_new_catalog_item(&item),
            Err(ValidationError::Required { ref field }) if field == "model"
        ));
    }

    #[test]
    fn test_check_days() {
        let period = RentalPeriod::parse(Some("2025-03-01"), Some("2025-03-04")).unwrap();
        assert!(period.check_days(None).is_ok());
        assert!(period.check_days(Some(3)).is_ok());
        assert_eq!(
            period.check_days(Some(5)),
            Err(ValidationError::DaysMismatch {
                given: 5,
                computed: 3
            })
        );
    }
}
