//! Middleware: CORS, security headers and panic recovery.

use std::any::Any;

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue, Method, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_http::{
    catch_panic::ResponseForPanic,
    cors::{Any as AnyOrigin, CorsLayer},
};
use tracing::{error, warn};

use crate::{error::ApiError, handlers::api_not_found};

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     style-src 'self' 'unsafe-inline' https://fonts.googleapis.com; \
     font-src 'self' https://fonts.gstatic.com; \
     img-src 'self' data: https://openweathermap.org; \
     script-src 'self'; \
     connect-src 'self'";

/// Build the CORS layer for the given allow list.
///
/// An empty list allows any origin without credentials; an explicit list
/// allows credentials for exactly those origins.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods([Method::GET])
            .allow_headers(AnyOrigin);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

/// Adds security headers to every response that doesn't already set them.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    let defaults: [(HeaderName, &'static str); 4] = [
        (header::CONTENT_SECURITY_POLICY, CONTENT_SECURITY_POLICY),
        (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        (header::X_FRAME_OPTIONS, "SAMEORIGIN"),
        (header::REFERRER_POLICY, "no-referrer"),
    ];
    for (name, value) in defaults {
        headers
            .entry(name)
            .or_insert_with(|| HeaderValue::from_static(value));
    }

    response
}

/// Answers `/api/` with the API 404.
///
/// `nest("/api", ..)` matches `/api` and `/api/<rest>` but not the bare
/// trailing-slash path, which would otherwise fall through to the frontend.
pub async fn api_root_not_found(request: Request, next: Next) -> Response {
    if request.uri().path() == "/api/" {
        return api_not_found().await.into_response();
    }
    next.run(request).await
}

/// Turns a handler panic into the generic 500 envelope.
#[derive(Debug, Clone, Copy)]
pub struct PanicResponder {
    pub expose_details: bool,
}

impl ResponseForPanic for PanicResponder {
    type ResponseBody = Body;

    fn response_for_panic(&mut self, err: Box<dyn Any + Send + 'static>) -> Response<Body> {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            (*s).to_string()
        } else {
            "unknown panic".to_string()
        };

        error!(panic = %detail, "Unhandled error");
        ApiError::internal(detail, self.expose_details).into_response()
    }
}
