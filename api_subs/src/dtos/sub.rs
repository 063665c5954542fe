use chrono::{NaiveDate, NaiveDateTime};
use db::models::subscription::Subscription;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateSubscriptionRequest {
    pub service_name: String,
    pub price: i32,
    pub user_id: String,
    pub start_date: String,
    pub end_date: Option<String>,
}

/// Every field is optional. For `end_date`, an absent key leaves the stored value
/// alone while an explicit `null` clears it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub service_name: Option<String>,
    pub price: Option<i32>,
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub end_date: Option<Option<String>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListSubscriptionsQuery {
    pub user_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TotalCostQuery {
    pub user_id: Option<String>,
    pub service_name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub service_name: String,
    pub price: i32,
    pub user_id: Uuid,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub end_date: Option<NaiveDate>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<Subscription> for SubscriptionResponse {
    fn from(sub: Subscription) -> Self {
        SubscriptionResponse {
            id: sub.id,
            service_name: sub.service_name,
            price: sub.price,
            user_id: sub.user_id,
            start_date: sub.start_date,
            end_date: sub.end_date,
            created_at: sub.created_at,
            updated_at: sub.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TotalCostResponse {
    pub total_cost: i64,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_distinguishes_null_from_absent() {
        let absent: UpdateSubscriptionRequest = serde_json::from_str(r#"{"price": 10}"#).unwrap();
        assert_eq!(absent.end_date, None);
        assert_eq!(absent.price, Some(10));

        let cleared: UpdateSubscriptionRequest =
            serde_json::from_str(r#"{"end_date": null}"#).unwrap();
        assert_eq!(cleared.end_date, Some(None));

        let set: UpdateSubscriptionRequest =
            serde_json::from_str(r#"{"end_date": "05-2025"}"#).unwrap();
        assert_eq!(set.end_date, Some(Some("05-2025".to_string())));
    }

    #[test]
    fn test_create_request_missing_fields_default() {
        let req: CreateSubscriptionRequest =
            serde_json::from_str(r#"{"service_name": "Netflix"}"#).unwrap();
        assert_eq!(req.service_name, "Netflix");
        assert_eq!(req.price, 0);
        assert!(req.user_id.is_empty());
        assert!(req.end_date.is_none());
    }
}
