use chrono::NaiveDate;
use common::error::ValidationError;
use db::{dtos::subscription::SubscriptionUpdateRequest, models::subscription::Subscription};

/// A validated partial update. `None` means "leave as is"; for `end_date`,
/// `Some(None)` turns the subscription indefinite.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SubscriptionPatch {
    pub service_name: Option<String>,
    pub price: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<Option<NaiveDate>>,
}

impl SubscriptionPatch {
    pub fn is_empty(&self) -> bool {
        self.service_name.is_none()
            && self.price.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
    }

    /// Applies the supplied fields over `current` and checks the resulting date range.
    pub fn merge(self, current: Subscription) -> Result<SubscriptionUpdateRequest, ValidationError> {
        let start_date = self.start_date.unwrap_or(current.start_date);
        let end_date = self.end_date.unwrap_or(current.end_date);

        check_range(start_date, end_date)?;

        Ok(SubscriptionUpdateRequest {
            service_name: self.service_name.unwrap_or(current.service_name),
            price: self.price.unwrap_or(current.price),
            start_date,
            end_date,
        })
    }
}

pub fn check_range(start: NaiveDate, end: Option<NaiveDate>) -> Result<(), ValidationError> {
    match end {
        Some(end) if end < start => Err(ValidationError::InvalidDateRange { start, end }),
        _ => Ok(()),
    }
}
