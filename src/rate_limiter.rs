use std::{
    net::SocketAddr,
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::ConnectInfo,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;

/// Fixed-window request limiter keyed by client IP.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<String, Window>>,
    max_requests: u32,
    window_duration: Duration,
}

#[derive(Debug)]
struct Window {
    started: Instant,
    request_count: u32,
}

impl RateLimiter {
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            max_requests: requests_per_second * 60,
            window_duration: Duration::from_secs(60),
        }
    }

    fn get_client_key(&self, addr: &SocketAddr) -> String {
        addr.ip().to_string()
    }

    pub fn check_rate_limit(&self, client_key: &str) -> bool {
        let now = Instant::now();

        let mut entry = self
            .windows
            .entry(client_key.to_string())
            .or_insert(Window {
                started: now,
                request_count: 0,
            });

        if now.duration_since(entry.started) >= self.window_duration {
            entry.started = now;
            entry.request_count = 0;
        }

        if entry.request_count >= self.max_requests {
            return false;
        }

        entry.request_count += 1;
        true
    }
}

pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let rate_limiter = req
        .extensions()
        .get::<RateLimiter>()
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;

    let client_key = rate_limiter.get_client_key(&addr);

    if !rate_limiter.check_rate_limit(&client_key) {
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_within_budget_pass() {
        let limiter = RateLimiter::new(1);
        for _ in 0..60 {
            assert!(limiter.check_rate_limit("10.0.0.1"));
        }
        assert!(!limiter.check_rate_limit("10.0.0.1"));
    }

    #[test]
    fn clients_are_limited_independently() {
        let limiter = RateLimiter::new(1);
        for _ in 0..60 {
            limiter.check_rate_limit("10.0.0.1");
        }
        assert!(!limiter.check_rate_limit("10.0.0.1"));
        assert!(limiter.check_rate_limit("10.0.0.2"));
    }
}
