use std::sync::Arc;

use async_trait::async_trait;
use common::error::Res;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dtos::subscription::{
        ListFilter, SubscriptionCreateRequest, SubscriptionUpdateRequest, TotalCostFilter,
    },
    models::subscription::Subscription,
};

/// Storage capability the subscription service is built on.
///
/// Implementations report a missing row as `AppError::NotFound` and every other
/// storage failure as `AppError::Database`.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn create(&self, data: SubscriptionCreateRequest) -> Res<Subscription>;

    async fn get(&self, id: Uuid) -> Res<Subscription>;

    async fn update(&self, id: Uuid, data: SubscriptionUpdateRequest) -> Res<Subscription>;

    async fn delete(&self, id: Uuid) -> Res<()>;

    /// Returns one page of subscriptions, newest first, with the number of rows
    /// matching the filter before paging.
    async fn list(&self, filter: ListFilter) -> Res<(Vec<Subscription>, i64)>;

    /// Sum of prices over the matching subscriptions, `None` if nothing matched.
    async fn total_cost(&self, filter: TotalCostFilter) -> Res<Option<i64>>;
}

pub struct PgSubscriptionRepository {
    pool: Arc<PgPool>,
}

impl PgSubscriptionRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    async fn create(&self, data: SubscriptionCreateRequest) -> Res<Subscription> {
        crate::subscription::insert_subscription(&*self.pool, data).await
    }

    async fn get(&self, id: Uuid) -> Res<Subscription> {
        crate::subscription::get_subscription_by_id(&*self.pool, id).await
    }

    async fn update(&self, id: Uuid, data: SubscriptionUpdateRequest) -> Res<Subscription> {
        crate::subscription::update_subscription(&*self.pool, id, data).await
    }

    async fn delete(&self, id: Uuid) -> Res<()> {
        crate::subscription::delete_subscription(&*self.pool, id).await
    }

    async fn list(&self, filter: ListFilter) -> Res<(Vec<Subscription>, i64)> {
        let (items, total) = crate::subscription::list_subscriptions(&*self.pool, &filter).await?;
        let total = match total {
            Some(total) => total,
            // past the last row, so only the count is left to report
            None => crate::subscription::count_subscriptions(&*self.pool, filter.user_id).await?,
        };
        Ok((items, total))
    }

    async fn total_cost(&self, filter: TotalCostFilter) -> Res<Option<i64>> {
        crate::subscription::sum_prices(&*self.pool, &filter).await
    }
}
