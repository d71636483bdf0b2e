//! The local IP-info endpoint.
//!
//! # Responsibilities
//! - Answer `GET` on the configured path with the relay's public IP
//! - Map a failed lookup to a fixed JSON error
//!
//! # Design Decisions
//! - Every request triggers a fresh lookup; the cached value is never served
//! - Lookup failure details go to the log, never to the caller
//! - Other methods on the same path are forwarded, not answered here

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::http::server::AppState;

#[derive(Serialize)]
pub struct IpInfo {
    pub ip: String,
}

#[derive(Serialize)]
pub struct IpInfoError {
    pub error: &'static str,
}

pub async fn ip_info(State(state): State<AppState>) -> Response {
    match state.ip_resolver.resolve_public_ip().await {
        Some(ip) => Json(IpInfo { ip }).into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(IpInfoError {
                error: "Failed to resolve public IP",
            }),
        )
            .into_response(),
    }
}
