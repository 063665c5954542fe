use actix_web::web::{self};
use common::error::AppError;

pub mod routes {
    pub mod sub;
}

pub mod services {
    #[cfg(test)]
    pub(crate) mod memory;
    pub mod sub;
}

pub mod dtos {
    pub mod sub;
}

pub mod models {
    pub mod sub;
}

pub mod misc {
    pub mod page;
    pub mod period;
    pub mod validate;
}

pub fn mount_subscriptions() -> actix_web::Scope {
    web::scope("/subscriptions")
        .service(routes::sub::post_subscription)
        .service(routes::sub::get_subscriptions)
        .service(routes::sub::get_total_cost)
        .service(routes::sub::get_subscription)
        .service(routes::sub::put_subscription)
        .service(routes::sub::delete_subscription)
}

/// Reports malformed JSON bodies with the same `{ "error": ... }` shape as other failures.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(format!("invalid request body: {}", err)).into())
}

/// Reports malformed query strings with the same `{ "error": ... }` shape as other failures.
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("invalid query parameters: {}", err)).into()
    })
}
