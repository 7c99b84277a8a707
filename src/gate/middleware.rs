//! axum middleware running the route gate

use super::matcher::RouteGate;
use crate::auth::TOKEN_KEY;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::debug;

/// Session token carried by a navigation request.
///
/// The `jwt_token` cookie wins; a bearer `Authorization` header is the fallback.
pub fn extract_token(cookies: &Cookies, headers: &HeaderMap) -> Option<String> {
    cookies
        .get(TOKEN_KEY)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| bearer_token(headers))
}

/// Token from an `Authorization: Bearer …` header
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Run the gate and forward the request unchanged.
///
/// Needs a `CookieManagerLayer` outside it. The decision is attached to the
/// request extensions for downstream handlers that want to see it.
pub async fn route_gate(
    State(gate): State<Arc<RouteGate>>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let token = extract_token(&cookies, request.headers());
    let decision = gate.evaluate(request.uri().path(), token.as_deref());

    debug!(
        path = %request.uri().path(),
        ?decision,
        has_token = token.is_some(),
        "route gate"
    );

    request.extensions_mut().insert(decision);
    next.run(request).await
}
