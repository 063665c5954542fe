use actix_web::body::{self, BoxBody, MessageBody};
use actix_web::{
    Error, HttpResponse,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use colored::Colorize;
use futures::future::{LocalBoxFuture, Ready, ready};
use log::{debug, info};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

/// Logs one line per request: status, method, path, elapsed time and query parameters.
/// Bodies of failed responses are logged at debug level.
pub struct LoggerMiddleware {
    enabled: bool,
}

impl LoggerMiddleware {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl<S, B> Transform<S, ServiceRequest> for LoggerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Transform = LoggerMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(LoggerMiddlewareService {
            service: Arc::new(service),
            enabled: self.enabled,
        }))
    }
}

pub struct LoggerMiddlewareService<S> {
    service: Arc<S>,
    enabled: bool,
}

impl<S, B> Service<ServiceRequest> for LoggerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Arc::clone(&self.service);
        let enabled = self.enabled;

        // Common request info
        let method = req.method().to_string();
        let path = req.path().to_string();
        let query_string = req.query_string().to_string();
        let started = Instant::now();

        Box::pin(async move {
            let res = srv.call(req).await?;
            if !enabled {
                return Ok(res.map_into_boxed_body());
            }

            let status = res.status();
            let status_code = status.as_u16();
            let elapsed_ms = started.elapsed().as_millis();
            let params_json = query_params(&query_string);

            let colored_status = match status_code {
                200..=299 => status_code.to_string().green(),
                300..=399 => status_code.to_string().yellow(),
                400..=499 => status_code.to_string().bright_red(),
                _ => status_code.to_string().red(),
            };

            let colored_method = match method.as_str() {
                "GET" => method.blue(),
                "POST" => method.yellow(),
                "PUT" => method.purple(),
                "DELETE" => method.red(),
                _ => method.normal(),
            };

            info!(
                "[{}] {} {} {} params={}",
                colored_status,
                colored_method,
                path.bright_white(),
                format!("({}ms)", elapsed_ms).bright_black(),
                params_json.to_string().bright_cyan(),
            );

            if status_code < 400 {
                return Ok(res.map_into_boxed_body());
            }

            // Copy response body and reconstruct response
            let (req, res) = res.into_parts();
            let headers = res.headers().clone();
            let response_body_bytes = body::to_bytes(res.into_body()).await.map_err(|err| {
                let err: Box<dyn std::error::Error> = err.into();
                actix_web::error::ErrorInternalServerError(err.to_string())
            })?;

            let response_body =
                serde_json::from_slice::<Value>(&response_body_bytes).unwrap_or(Value::Null);
            debug!(
                "  Response: {}",
                serde_json::to_string(&response_body)
                    .unwrap_or_default()
                    .bright_yellow()
            );

            let mut new_res = HttpResponse::build(status);
            for (key, value) in headers.iter() {
                new_res.append_header((key.clone(), value.clone()));
            }
            let new_res = new_res.body(response_body_bytes);
            Ok(ServiceResponse::new(req, new_res))
        })
    }
}

fn query_params(query_string: &str) -> Value {
    if query_string.is_empty() {
        return json!({});
    }

    let mut params_map = HashMap::new();
    for pair in query_string.split('&') {
        if let Some(pos) = pair.find('=') {
            let key = &pair[0..pos];
            let value = &pair[pos + 1..];
            params_map.insert(key.to_string(), json!(value));
        } else {
            params_map.insert(pair.to_string(), json!(true));
        }
    }
    json!(params_map)
}
