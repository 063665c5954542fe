use common::error::{AppError, Res};
use sqlx::{Executor, FromRow, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    dtos::subscription::{
        ListFilter, SubscriptionCreateRequest, SubscriptionUpdateRequest, TotalCostFilter,
    },
    models::subscription::Subscription,
};

const SUBSCRIPTION_COLUMNS: &str =
    "id, service_name, price, user_id, start_date, end_date, created_at, updated_at";

#[derive(FromRow)]
struct CountedSubscription {
    #[sqlx(flatten)]
    subscription: Subscription,
    total_count: i64,
}

pub async fn insert_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    data: SubscriptionCreateRequest,
) -> Res<Subscription> {
    sqlx::query_as::<_, Subscription>(&format!(
        r#"
        INSERT INTO subscriptions (service_name, price, user_id, start_date, end_date)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {}
        "#,
        SUBSCRIPTION_COLUMNS
    ))
    .bind(data.service_name)
    .bind(data.price)
    .bind(data.user_id)
    .bind(data.start_date)
    .bind(data.end_date)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_subscription_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
) -> Res<Subscription> {
    sqlx::query_as::<_, Subscription>(&format!(
        "SELECT {} FROM subscriptions WHERE id = $1",
        SUBSCRIPTION_COLUMNS
    ))
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| not_found(id))
}

pub async fn update_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
    data: SubscriptionUpdateRequest,
) -> Res<Subscription> {
    sqlx::query_as::<_, Subscription>(&format!(
        r#"
        UPDATE subscriptions
        SET service_name = $1, price = $2, start_date = $3, end_date = $4, updated_at = NOW()
        WHERE id = $5
        RETURNING {}
        "#,
        SUBSCRIPTION_COLUMNS
    ))
    .bind(data.service_name)
    .bind(data.price)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(id)
    .fetch_optional(executor)
    .await?
    .ok_or_else(|| not_found(id))
}

pub async fn delete_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    id: Uuid,
) -> Res<()> {
    let result = sqlx::query("DELETE FROM subscriptions WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    if result.rows_affected() == 0 {
        return Err(not_found(id));
    }
    Ok(())
}

/// Returns one page, newest first, together with the number of rows matching the
/// filter. Both come from one statement so they describe the same snapshot. The count
/// is `None` when the page is empty, since no row carried it.
pub async fn list_subscriptions<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    filter: &ListFilter,
) -> Res<(Vec<Subscription>, Option<i64>)> {
    let mut qb = list_query(filter);
    let rows = qb
        .build_query_as::<CountedSubscription>()
        .fetch_all(executor)
        .await?;

    let total = rows.first().map(|row| row.total_count);
    let items = rows.into_iter().map(|row| row.subscription).collect();
    Ok((items, total))
}

pub async fn count_subscriptions<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Option<Uuid>,
) -> Res<i64> {
    let mut qb = count_query(user_id);
    qb.build_query_scalar::<i64>()
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

/// Sums `price` over every subscription whose active interval intersects the period.
/// Returns `None` when no row matches.
pub async fn sum_prices<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    filter: &TotalCostFilter,
) -> Res<Option<i64>> {
    let mut qb = total_cost_query(filter);
    qb.build_query_scalar::<Option<i64>>()
        .fetch_one(executor)
        .await
        .map_err(AppError::from)
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("subscription {} not found", id))
}

fn list_query<'a>(filter: &ListFilter) -> QueryBuilder<'a, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
        "SELECT {}, COUNT(*) OVER() AS total_count FROM subscriptions",
        SUBSCRIPTION_COLUMNS
    ));

    if let Some(user_id) = filter.user_id {
        qb.push(" WHERE user_id = ").push_bind(user_id);
    }

    qb.push(" ORDER BY created_at DESC, id");
    qb.push(" LIMIT ").push_bind(filter.limit);
    qb.push(" OFFSET ").push_bind(filter.offset);
    qb
}

fn count_query<'a>(user_id: Option<Uuid>) -> QueryBuilder<'a, Postgres> {
    let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("SELECT COUNT(*) FROM subscriptions");

    if let Some(user_id) = user_id {
        qb.push(" WHERE user_id = ").push_bind(user_id);
    }
    qb
}

fn total_cost_query<'a>(filter: &TotalCostFilter) -> QueryBuilder<'a, Postgres> {
    let mut qb: QueryBuilder<Postgres> =
        QueryBuilder::new("SELECT SUM(price)::BIGINT FROM subscriptions WHERE start_date <= ");
    qb.push_bind(filter.period_end);
    qb.push(" AND (end_date IS NULL OR end_date >= ")
        .push_bind(filter.period_start)
        .push(")");

    if let Some(user_id) = filter.user_id {
        qb.push(" AND user_id = ").push_bind(user_id);
    }

    if let Some(service_name) = &filter.service_name {
        qb.push(" AND service_name = ").push_bind(service_name.clone());
    }
    qb
}
