//! Per-IP request throttling applied in front of every route.
//!
//! The limiter keeps a timestamp log per peer address and allows at most
//! `max_requests` within the trailing `window`. Entries older than the
//! window are pruned on each check, so the cap rolls with time instead of
//! resetting on a fixed boundary.

use std::collections::{HashMap, VecDeque};
use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::configuration::RateLimitSettings;

pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    visitors: Mutex<HashMap<IpAddr, VecDeque<Instant>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            visitors: Mutex::new(HashMap::new()),
        }
    }

    /// Records a request from `addr` at `now` if it fits inside the rolling
    /// window, returning whether the request may proceed.
    pub fn try_acquire(&self, addr: IpAddr, now: Instant) -> bool {
        let mut visitors = self
            .visitors
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        // Sweep every peer, not just the caller: entries for addresses that
        // went quiet would otherwise sit in the map for the life of the
        // process.
        visitors.retain(|_, hits| {
            while hits
                .front()
                .is_some_and(|&hit| now.duration_since(hit) >= self.window)
            {
                hits.pop_front();
            }
            !hits.is_empty()
        });
        let hits = visitors.entry(addr).or_default();
        if hits.len() >= self.max_requests {
            return false;
        }
        hits.push_back(now);
        true
    }
}

/// Middleware factory sharing one [`RateLimiter`] across all workers.
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    pub fn new(settings: &RateLimitSettings) -> Self {
        Self {
            limiter: Arc::new(RateLimiter::new(
                settings.max_requests,
                Duration::from_secs(settings.window_seconds),
            )),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            limiter: self.limiter.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Requests without a peer address (in-process test calls) bypass the
        // limiter; everything arriving over a socket has one.
        let allowed = match req.peer_addr() {
            Some(addr) => self.limiter.try_acquire(addr.ip(), Instant::now()),
            None => true,
        };

        if allowed {
            let fut = self.service.call(req);
            Box::pin(async move { Ok(fut.await?.map_into_left_body()) })
        } else {
            tracing::warn!(peer = ?req.peer_addr(), "Rejecting request over the rate limit");
            let response = HttpResponse::TooManyRequests()
                .json(serde_json::json!({
                    "error": "Too many requests, please try again later."
                }))
                .map_into_right_body();
            Box::pin(ready(Ok(req.into_response(response))))
        }
    }
}
