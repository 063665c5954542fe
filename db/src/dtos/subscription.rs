use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::subscription::Subscription;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionCreateRequest {
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Full replacement of the mutable columns, produced after merging a partial update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionUpdateRequest {
    pub service_name: String,
    pub price: i32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub user_id: Option<Uuid>,
    pub limit: i64,
    pub offset: i64,
}

/// Selects the subscriptions billed within `[period_start, period_end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TotalCostFilter {
    pub user_id: Option<Uuid>,
    pub service_name: Option<String>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
}

impl TotalCostFilter {
    /// Whether `sub` is billed in the period: the filters match, it started by the end
    /// of the period and it has not ended before the period starts.
    pub fn matches(&self, sub: &Subscription) -> bool {
        let user_matches = self.user_id.is_none_or(|user_id| sub.user_id == user_id);
        let service_matches = self
            .service_name
            .as_deref()
            .is_none_or(|name| name.is_empty() || sub.service_name == name);

        user_matches
            && service_matches
            && sub.start_date <= self.period_end
            && sub.end_date.is_none_or(|end| end >= self.period_start)
    }
}
