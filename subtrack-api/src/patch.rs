//! Partial update patches
//!
//! A patch has one optional slot per updatable column. The store only ever
//! writes the columns named by [`Column`], never client supplied keys.

use subtrack_common::models::UpdateSubscriptionRequest;
use subtrack_common::{Error, Month, Result};

use crate::validation::{
    normalize_user_id, parse_month_field, validate_price, validate_service_name,
};

/// Updatable columns of the `subscriptions` table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    ServiceName,
    Price,
    UserId,
    StartMonth,
    EndMonth,
}

impl Column {
    pub fn as_str(&self) -> &'static str {
        match self {
            Column::ServiceName => "service_name",
            Column::Price => "price",
            Column::UserId => "user_id",
            Column::StartMonth => "start_month",
            Column::EndMonth => "end_month",
        }
    }
}

/// Value to bind for a column assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchValue {
    Text(String),
    Integer(i64),
    /// `None` writes SQL NULL
    NullableInteger(Option<i64>),
}

/// Sparse set of field changes for one subscription
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub service_name: Option<String>,
    pub price: Option<i64>,
    pub user_id: Option<String>,
    pub start_date: Option<Month>,
    /// `Some(None)` clears the end month
    pub end_date: Option<Option<Month>>,
}

impl SubscriptionPatch {
    /// Build a patch from the fields present in an update request
    ///
    /// Month fields get format validation. When both months are supplied
    /// together they must also be ordered; a lone start or end change is
    /// not checked against the stored counterpart.
    pub fn from_request(req: &UpdateSubscriptionRequest) -> Result<Self> {
        let mut patch = SubscriptionPatch::default();

        if let Some(name) = &req.service_name {
            validate_service_name(name)?;
            patch.service_name = Some(name.clone());
        }
        if let Some(price) = req.price {
            validate_price(price)?;
            patch.price = Some(price);
        }
        if let Some(user_id) = &req.user_id {
            patch.user_id = Some(normalize_user_id(user_id)?);
        }
        if let Some(start) = &req.start_date {
            patch.start_date = Some(parse_month_field(start, "invalid start_date format")?);
        }
        if let Some(end) = &req.end_date {
            patch.end_date = Some(
                end.as_deref()
                    .map(|raw| parse_month_field(raw, "invalid end_date format"))
                    .transpose()?,
            );
        }

        if let (Some(start), Some(Some(end))) = (patch.start_date, patch.end_date) {
            if !Month::is_end_after_start(start, end) {
                return Err(Error::validation(
                    "end_date must be after or equal to start_date",
                ));
            }
        }

        Ok(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().is_empty()
    }

    /// Column assignments in declaration order
    pub fn assignments(&self) -> Vec<(Column, PatchValue)> {
        let mut out = Vec::new();
        if let Some(name) = &self.service_name {
            out.push((Column::ServiceName, PatchValue::Text(name.clone())));
        }
        if let Some(price) = self.price {
            out.push((Column::Price, PatchValue::Integer(price)));
        }
        if let Some(user_id) = &self.user_id {
            out.push((Column::UserId, PatchValue::Text(user_id.clone())));
        }
        if let Some(start) = self.start_date {
            out.push((Column::StartMonth, PatchValue::Integer(start.ordinal())));
        }
        if let Some(end) = self.end_date {
            out.push((
                Column::EndMonth,
                PatchValue::NullableInteger(end.map(|m| m.ordinal())),
            ));
        }
        out
    }

    /// Names of the columns this patch touches
    pub fn columns(&self) -> Vec<&'static str> {
        self.assignments().iter().map(|(c, _)| c.as_str()).collect()
    }
}
