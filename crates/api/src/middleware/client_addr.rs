//! Source address extractor.

use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::request::Parts;

/// The caller's address as best we can tell.
///
/// Prefers the first hop in `x-forwarded-for` (the hook usually sits behind
/// a reverse proxy), then the socket peer recorded by
/// `into_make_service_with_connect_info`, then `"unknown"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

impl ClientAddr {
    pub fn from_parts(parts: &Parts) -> Self {
        let forwarded = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        if let Some(addr) = forwarded {
            return ClientAddr(addr.to_string());
        }

        parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| ClientAddr(addr.ip().to_string()))
            .unwrap_or_else(|| ClientAddr("unknown".into()))
    }
}

impl fmt::Display for ClientAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientAddr {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientAddr::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::Request;

    use super::*;

    fn parts(builder: axum::http::request::Builder) -> Parts {
        builder.body(()).expect("request").into_parts().0
    }

    #[test]
    fn forwarded_header_wins() {
        let mut p = parts(Request::builder().header("x-forwarded-for", "203.0.113.7, 10.0.0.1"));
        p.extensions
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 4000))));
        assert_eq!(ClientAddr::from_parts(&p).0, "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let mut p = parts(Request::builder());
        p.extensions
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 20], 4000))));
        assert_eq!(ClientAddr::from_parts(&p).0, "192.168.1.20");
    }

    #[test]
    fn unknown_without_any_source() {
        assert_eq!(ClientAddr::from_parts(&parts(Request::builder())).0, "unknown");
    }
}
