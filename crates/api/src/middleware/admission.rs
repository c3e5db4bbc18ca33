//! Admission control extractor.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;
use reelpick_core::rate_limit::Admission;

use crate::error::AppError;
use crate::state::AppState;

/// Proof that the calling IP was admitted by the shared rate limiter.
///
/// Place it before any body extractor so a blocked request is rejected
/// without reading or validating its payload:
///
/// ```ignore
/// async fn handler(admitted: Admitted, Json(body): Json<Value>) -> AppResult<()> {
///     tracing::info!(client_ip = %admitted.client_ip, "admitted");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Admitted {
    pub client_ip: IpAddr,
}

impl FromRequestParts<AppState> for Admitted {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let client_ip = client_ip(parts, state.config.trust_forwarded_for);

        match state.rate_limiter.check(client_ip) {
            Admission::Accepted { remaining } => {
                tracing::debug!(%client_ip, remaining, "Request admitted");
                Ok(Admitted { client_ip })
            }
            Admission::Blocked => {
                tracing::warn!(%client_ip, "Request blocked by rate limit");
                Err(AppError::RateLimited)
            }
        }
    }
}

/// Resolve the caller's IP address.
///
/// With `trust_forwarded_for`, the first valid `X-Forwarded-For` entry wins.
/// Otherwise the socket peer from `ConnectInfo` is used. Requests with
/// neither share the unspecified-address bucket.
pub fn client_ip(parts: &Parts, trust_forwarded_for: bool) -> IpAddr {
    if trust_forwarded_for {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .and_then(|first| first.trim().parse::<IpAddr>().ok());
        if let Some(ip) = forwarded {
            return ip;
        }
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}
