use std::sync::Arc;

use common::{
    env_config::PaginationConfig,
    error::{AppError, Res},
};
use db::{
    dtos::subscription::{ListFilter, TotalCostFilter},
    models::subscription::Subscription,
    repository::SubscriptionRepository,
};
use uuid::Uuid;

use crate::{
    dtos::sub::{CreateSubscriptionRequest, UpdateSubscriptionRequest},
    misc::{
        page::ListPage,
        period::parse_period,
        validate::{validate_create, validate_list, validate_update},
    },
    models::sub::check_range,
};

/// Subscription lifecycle and billing queries on top of a storage backend.
///
/// Holds no state of its own between calls. Updates are read-modify-write without a
/// version check, so two concurrent updates to one subscription resolve as last write wins.
pub struct SubscriptionService {
    repo: Arc<dyn SubscriptionRepository>,
    pagination: PaginationConfig,
}

impl SubscriptionService {
    pub fn new(repo: Arc<dyn SubscriptionRepository>, pagination: PaginationConfig) -> Self {
        Self { repo, pagination }
    }

    pub async fn create_subscription(&self, req: CreateSubscriptionRequest) -> Res<Subscription> {
        let data = validate_create(req)?;
        let sub = self.repo.create(data).await?;

        log::info!(
            "Created subscription {} ({}) for user {}",
            sub.id,
            sub.service_name,
            sub.user_id
        );
        Ok(sub)
    }

    pub async fn get_subscription(&self, id: Uuid) -> Res<Subscription> {
        log::debug!("Fetching subscription {}", id);
        self.repo.get(id).await
    }

    /// Merges the supplied fields into the stored subscription.
    /// The merged start and end dates must still form a valid range. A request with no
    /// fields returns the stored subscription without writing it.
    pub async fn update_subscription(
        &self,
        id: Uuid,
        req: UpdateSubscriptionRequest,
    ) -> Res<Subscription> {
        let patch = validate_update(req)?;
        let current = self.repo.get(id).await?;
        if patch.is_empty() {
            log::debug!("Update of subscription {} carries no fields", id);
            return Ok(current);
        }
        let data = patch.merge(current)?;
        let sub = self.repo.update(id, data).await?;

        log::info!("Updated subscription {}", sub.id);
        Ok(sub)
    }

    pub async fn delete_subscription(&self, id: Uuid) -> Res<()> {
        self.repo.delete(id).await?;
        log::info!("Deleted subscription {}", id);
        Ok(())
    }

    pub async fn list_subscriptions(
        &self,
        user_id: Option<Uuid>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Res<ListPage<Subscription>> {
        let (limit, offset) = validate_list(limit, offset, &self.pagination)?;

        let (items, total) = self
            .repo
            .list(ListFilter {
                user_id,
                limit,
                offset,
            })
            .await?;

        log::debug!(
            "Listed {} of {} subscriptions (limit={}, offset={})",
            items.len(),
            total,
            limit,
            offset
        );
        Ok(ListPage::new(items, total, limit, offset))
    }

    /// Sums the price of every subscription active at some point in the period.
    ///
    /// Indefinite subscriptions count in full once started, whatever the period length.
    /// Fails with `NoMatchesFound` rather than returning 0 when nothing matches.
    pub async fn calculate_total(
        &self,
        user_id: Option<Uuid>,
        service_name: Option<String>,
        period_start: &str,
        period_end: &str,
    ) -> Res<i64> {
        let start = parse_period("start_date", period_start)?;
        let end = parse_period("end_date", period_end)?;
        check_range(start, Some(end))?;

        let filter = TotalCostFilter {
            user_id,
            service_name: service_name.filter(|name| !name.is_empty()),
            period_start: start,
            period_end: end,
        };

        let total = self.repo.total_cost(filter).await?.ok_or_else(|| {
            AppError::NoMatchesFound(
                "no subscriptions found for the given criteria".to_string(),
            )
        })?;

        log::debug!("Total cost for {}..{} is {}", start, end, total);
        Ok(total)
    }
}
