//! Request validation
//!
//! Every check here runs before the store is touched. Messages are
//! returned to clients verbatim.

use subtrack_common::models::{CreateSubscriptionRequest, NewSubscription, MAX_PRICE};
use subtrack_common::{Error, Month, Result};
use uuid::Uuid;

/// Parse a month field, reporting `message` on failure
pub(crate) fn parse_month_field(raw: &str, message: &str) -> Result<Month> {
    Month::parse(raw).map_err(|_| Error::validation(message))
}

pub(crate) fn validate_service_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::validation("service_name is required"));
    }
    Ok(())
}

pub(crate) fn validate_price(price: i64) -> Result<()> {
    if price < 0 {
        return Err(Error::validation("price must be greater than or equal to 0"));
    }
    if price > MAX_PRICE {
        return Err(Error::validation(format!(
            "price must be less than or equal to {}",
            MAX_PRICE
        )));
    }
    Ok(())
}

/// Accept any UUID spelling and return the lowercase hyphenated form
pub(crate) fn normalize_user_id(user_id: &str) -> Result<String> {
    Uuid::parse_str(user_id)
        .map(|id| id.hyphenated().to_string())
        .map_err(|_| Error::validation("user_id must be a valid UUID"))
}

pub(crate) fn require_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(Error::validation("id is required"));
    }
    Ok(())
}

/// Validate a create request and produce the record to insert
pub fn validate_create(req: &CreateSubscriptionRequest) -> Result<NewSubscription> {
    let start_date =
        parse_month_field(&req.start_date, "invalid start_date format, expected MM-YYYY")?;

    let end_date = req
        .end_date
        .as_deref()
        .map(|raw| parse_month_field(raw, "invalid end_date format, expected MM-YYYY"))
        .transpose()?;

    if let Some(end) = end_date {
        if !Month::is_end_after_start(start_date, end) {
            return Err(Error::validation(
                "end_date must be after or equal to start_date",
            ));
        }
    }

    validate_service_name(&req.service_name)?;
    validate_price(req.price)?;
    let user_id = normalize_user_id(&req.user_id)?;

    Ok(NewSubscription {
        service_name: req.service_name.clone(),
        price: req.price,
        user_id,
        start_date,
        end_date,
    })
}
