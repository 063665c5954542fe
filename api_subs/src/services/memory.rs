//! In-memory `SubscriptionRepository` used by the service and route tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use common::error::{AppError, Res};
use db::{
    dtos::subscription::{
        ListFilter, SubscriptionCreateRequest, SubscriptionUpdateRequest, TotalCostFilter,
    },
    models::subscription::Subscription,
    repository::SubscriptionRepository,
};
use uuid::Uuid;

/// Rows are kept in insertion order, which doubles as creation order.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    pub rows: Mutex<Vec<Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("subscription {} not found", id))
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn create(&self, data: SubscriptionCreateRequest) -> Res<Subscription> {
        let now = Utc::now().naive_utc();
        let sub = Subscription {
            id: Uuid::new_v4(),
            service_name: data.service_name,
            price: data.price,
            user_id: data.user_id,
            start_date: data.start_date,
            end_date: data.end_date,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().unwrap().push(sub.clone());
        Ok(sub)
    }

    async fn get(&self, id: Uuid) -> Res<Subscription> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|sub| sub.id == id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn update(&self, id: Uuid, data: SubscriptionUpdateRequest) -> Res<Subscription> {
        let mut rows = self.rows.lock().unwrap();
        let sub = rows
            .iter_mut()
            .find(|sub| sub.id == id)
            .ok_or_else(|| not_found(id))?;

        sub.service_name = data.service_name;
        sub.price = data.price;
        sub.start_date = data.start_date;
        sub.end_date = data.end_date;
        sub.updated_at = Utc::now().naive_utc();
        Ok(sub.clone())
    }

    async fn delete(&self, id: Uuid) -> Res<()> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|sub| sub.id != id);
        if rows.len() == before {
            return Err(not_found(id));
        }
        Ok(())
    }

    async fn list(&self, filter: ListFilter) -> Res<(Vec<Subscription>, i64)> {
        let rows = self.rows.lock().unwrap();
        let matching: Vec<&Subscription> = rows
            .iter()
            .rev()
            .filter(|sub| filter.user_id.is_none_or(|user_id| sub.user_id == user_id))
            .collect();

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(filter.offset as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn total_cost(&self, filter: TotalCostFilter) -> Res<Option<i64>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|sub| filter.matches(sub))
            .map(|sub| i64::from(sub.price))
            .reduce(|acc, price| acc + price))
    }
}
