use actix_web::{Responder, delete, get, post, put, web};
use common::{
    error::{Res, ValidationError},
    http::Success,
};
use uuid::Uuid;

use crate::{
    dtos::sub::{
        CreateSubscriptionRequest, ListSubscriptionsQuery, SubscriptionResponse, TotalCostQuery,
        TotalCostResponse, UpdateSubscriptionRequest,
    },
    misc::validate::parse_id,
    services::sub::SubscriptionService,
};

/// Creates a subscription.
///
/// # Input
/// - `req`: JSON body with `service_name`, `price`, `user_id`, `start_date` ("MM-YYYY")
///   and an optional `end_date` ("MM-YYYY"). Without `end_date` the subscription never expires.
///
/// # Output
/// - Success: 201 with the stored subscription
/// - Error: 400 when a field is missing or invalid
#[post("")]
pub async fn post_subscription(
    service: web::Data<SubscriptionService>,
    req: web::Json<CreateSubscriptionRequest>,
) -> Res<impl Responder> {
    let sub = service.create_subscription(req.into_inner()).await?;
    Success::created(SubscriptionResponse::from(sub))
}

/// Lists subscriptions, newest first.
///
/// # Input
/// - `user_id` (optional): only this user's subscriptions
/// - `limit` (optional, 1..=100, default 20), `offset` (optional, default 0)
///
/// # Output
/// - Success: 200 with `{ items, total, limit, offset, has_more }`
/// - Error: 400 on a malformed `user_id` or out-of-range paging
#[get("")]
pub async fn get_subscriptions(
    service: web::Data<SubscriptionService>,
    query: web::Query<ListSubscriptionsQuery>,
) -> Res<impl Responder> {
    let query = query.into_inner();
    let user_id = optional_id("user_id", query.user_id.as_deref())?;

    let page = service
        .list_subscriptions(user_id, query.limit, query.offset)
        .await?;
    Success::ok(page.map(SubscriptionResponse::from))
}

/// Total cost of the subscriptions active during a period.
///
/// # Input
/// - `start_date`, `end_date` (required, "MM-YYYY")
/// - `user_id`, `service_name` (optional filters)
///
/// # Output
/// - Success: 200 with `{ total_cost }`
/// - Error: 400 on invalid input, 404 when no subscription matches
#[get("/total")]
pub async fn get_total_cost(
    service: web::Data<SubscriptionService>,
    query: web::Query<TotalCostQuery>,
) -> Res<impl Responder> {
    let query = query.into_inner();
    let user_id = optional_id("user_id", query.user_id.as_deref())?;
    let start_date = query
        .start_date
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MissingField("start_date"))?;
    let end_date = query
        .end_date
        .filter(|value| !value.is_empty())
        .ok_or(ValidationError::MissingField("end_date"))?;

    let total_cost = service
        .calculate_total(user_id, query.service_name, &start_date, &end_date)
        .await?;
    Success::ok(TotalCostResponse { total_cost })
}

#[get("/{id}")]
pub async fn get_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<String>,
) -> Res<impl Responder> {
    let id = parse_id("id", &path)?;
    let sub = service.get_subscription(id).await?;
    Success::ok(SubscriptionResponse::from(sub))
}

/// Partially updates a subscription. Only the supplied fields change;
/// `"end_date": null` makes the subscription indefinite.
#[put("/{id}")]
pub async fn put_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<String>,
    req: web::Json<UpdateSubscriptionRequest>,
) -> Res<impl Responder> {
    let id = parse_id("id", &path)?;
    let sub = service.update_subscription(id, req.into_inner()).await?;
    Success::ok(SubscriptionResponse::from(sub))
}

#[delete("/{id}")]
pub async fn delete_subscription(
    service: web::Data<SubscriptionService>,
    path: web::Path<String>,
) -> Res<impl Responder> {
    let id = parse_id("id", &path)?;
    service.delete_subscription(id).await?;
    Success::no_content()
}

fn optional_id(field: &'static str, value: Option<&str>) -> Result<Option<Uuid>, ValidationError> {
    value
        .filter(|value| !value.is_empty())
        .map(|value| parse_id(field, value))
        .transpose()
}
