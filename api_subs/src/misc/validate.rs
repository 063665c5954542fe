use common::{env_config::PaginationConfig, error::ValidationError};
use db::dtos::subscription::SubscriptionCreateRequest;
use uuid::Uuid;

use crate::{
    dtos::sub::{CreateSubscriptionRequest, UpdateSubscriptionRequest},
    misc::period::parse_period,
    models::sub::{SubscriptionPatch, check_range},
};

/// Checks a create request and turns it into the row to insert.
pub fn validate_create(
    req: CreateSubscriptionRequest,
) -> Result<SubscriptionCreateRequest, ValidationError> {
    check_service_name(&req.service_name)?;
    check_price(req.price)?;
    let user_id = parse_user_id(&req.user_id)?;

    let start_date = parse_period("start_date", &req.start_date)?;
    let end_date = req
        .end_date
        .as_deref()
        .map(|value| parse_period("end_date", value))
        .transpose()?;
    check_range(start_date, end_date)?;

    Ok(SubscriptionCreateRequest {
        service_name: req.service_name,
        price: req.price,
        user_id,
        start_date,
        end_date,
    })
}

/// Checks only the supplied fields. A request with no fields is valid.
pub fn validate_update(req: UpdateSubscriptionRequest) -> Result<SubscriptionPatch, ValidationError> {
    if let Some(service_name) = &req.service_name {
        check_service_name(service_name)?;
    }
    if let Some(price) = req.price {
        check_price(price)?;
    }

    let start_date = req
        .start_date
        .as_deref()
        .map(|value| parse_period("start_date", value))
        .transpose()?;

    let end_date = match req.end_date {
        Some(Some(value)) => Some(Some(parse_period("end_date", &value)?)),
        Some(None) => Some(None),
        None => None,
    };

    Ok(SubscriptionPatch {
        service_name: req.service_name,
        price: req.price,
        start_date,
        end_date,
    })
}

/// Applies the default limit, then bounds-checks limit and offset.
pub fn validate_list(
    limit: Option<i64>,
    offset: Option<i64>,
    pagination: &PaginationConfig,
) -> Result<(i64, i64), ValidationError> {
    let limit = limit.unwrap_or(pagination.default_limit);
    let offset = offset.unwrap_or(0);

    if limit <= 0 || limit > pagination.max_limit {
        return Err(ValidationError::InvalidLimit {
            limit,
            max: pagination.max_limit,
        });
    }
    if offset < 0 {
        return Err(ValidationError::InvalidOffset(offset));
    }
    Ok((limit, offset))
}

/// Parses an id coming from a path segment or query string.
pub fn parse_id(field: &'static str, value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| ValidationError::InvalidId {
        field,
        value: value.to_string(),
    })
}

fn check_service_name(service_name: &str) -> Result<(), ValidationError> {
    if service_name.trim().is_empty() {
        return Err(ValidationError::InvalidServiceName);
    }
    Ok(())
}

fn check_price(price: i32) -> Result<(), ValidationError> {
    if price <= 0 {
        return Err(ValidationError::InvalidPrice(price));
    }
    Ok(())
}

fn parse_user_id(value: &str) -> Result<Uuid, ValidationError> {
    match Uuid::parse_str(value) {
        Ok(id) if !id.is_nil() => Ok(id),
        _ => Err(ValidationError::InvalidUserId),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn create_request() -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            service_name: "Yandex Plus".to_string(),
            price: 400,
            user_id: "60601fee-2bf1-4721-ae6f-7636e79a0cba".to_string(),
            start_date: "07-2025".to_string(),
            end_date: None,
        }
    }

    #[test]
    fn test_validate_create_ok() {
        let data = validate_create(create_request()).unwrap();
        assert_eq!(data.service_name, "Yandex Plus");
        assert_eq!(data.price, 400);
        assert_eq!(
            data.user_id.to_string(),
            "60601fee-2bf1-4721-ae6f-7636e79a0cba"
        );
        assert_eq!(data.start_date, NaiveDate::from_ymd_opt(2025, 7, 1).unwrap());
        assert_eq!(data.end_date, None);
    }

    #[test]
    fn test_validate_create_failures() {
        let mut req = create_request();
        req.service_name = "   ".to_string();
        assert_eq!(
            validate_create(req).unwrap_err(),
            ValidationError::InvalidServiceName
        );

        let mut req = create_request();
        req.price = 0;
        assert_eq!(
            validate_create(req).unwrap_err(),
            ValidationError::InvalidPrice(0)
        );

        let mut req = create_request();
        req.price = -5;
        assert_eq!(
            validate_create(req).unwrap_err(),
            ValidationError::InvalidPrice(-5)
        );

        let mut req = create_request();
        req.user_id = Uuid::nil().to_string();
        assert_eq!(
            validate_create(req).unwrap_err(),
            ValidationError::InvalidUserId
        );

        let mut req = create_request();
        req.user_id = String::new();
        assert_eq!(
            validate_create(req).unwrap_err(),
            ValidationError::InvalidUserId
        );

        let mut req = create_request();
        req.start_date = "2025-07".to_string();
        assert!(matches!(
            validate_create(req).unwrap_err(),
            ValidationError::InvalidDate {
                field: "start_date",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_create_rejects_end_before_start() {
        let mut req = create_request();
        req.end_date = Some("06-2025".to_string());
        assert!(matches!(
            validate_create(req).unwrap_err(),
            ValidationError::InvalidDateRange { .. }
        ));

        let mut req = create_request();
        req.end_date = Some("07-2025".to_string());
        assert!(validate_create(req).is_ok());
    }

    #[test]
    fn test_validate_update_only_checks_supplied_fields() {
        let patch = validate_update(UpdateSubscriptionRequest::default()).unwrap();
        assert!(patch.is_empty());

        let patch = validate_update(UpdateSubscriptionRequest {
            price: Some(10),
            end_date: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(patch.price, Some(10));
        assert_eq!(patch.end_date, Some(None));
        assert_eq!(patch.service_name, None);

        assert_eq!(
            validate_update(UpdateSubscriptionRequest {
                service_name: Some(String::new()),
                ..Default::default()
            })
            .unwrap_err(),
            ValidationError::InvalidServiceName
        );

        assert!(matches!(
            validate_update(UpdateSubscriptionRequest {
                end_date: Some(Some("13-2025".to_string())),
                ..Default::default()
            })
            .unwrap_err(),
            ValidationError::InvalidDate {
                field: "end_date",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_list() {
        let pagination = PaginationConfig::default();

        assert_eq!(validate_list(None, None, &pagination), Ok((20, 0)));
        assert_eq!(validate_list(Some(100), Some(40), &pagination), Ok((100, 40)));
        assert_eq!(
            validate_list(Some(0), None, &pagination),
            Err(ValidationError::InvalidLimit { limit: 0, max: 100 })
        );
        assert_eq!(
            validate_list(Some(101), None, &pagination),
            Err(ValidationError::InvalidLimit {
                limit: 101,
                max: 100
            })
        );
        assert_eq!(
            validate_list(None, Some(-1), &pagination),
            Err(ValidationError::InvalidOffset(-1))
        );
    }

    #[test]
    fn test_parse_id() {
        assert!(parse_id("id", "60601fee-2bf1-4721-ae6f-7636e79a0cba").is_ok());
        assert_eq!(
            parse_id("id", "not-a-uuid"),
            Err(ValidationError::InvalidId {
                field: "id",
                value: "not-a-uuid".to_string(),
            })
        );
    }
}
