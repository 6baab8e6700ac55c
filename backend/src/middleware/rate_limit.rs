//! Fixed-window request limiter keyed by client address.
//!
//! Each client IP gets a budget of `max_requests` per window. The window opens
//! on the first request and resets once it has fully elapsed. Rejected
//! requests receive `429 Too Many Requests` with the standard error envelope
//! and a `Retry-After` header counting the seconds until the window resets.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderValue, RETRY_AFTER};
use actix_web::{Error, ResponseError};
use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use mockable::{Clock, DefaultClock};
use thiserror::Error as ThisError;
use tracing::warn;

use crate::domain::Error as ApiError;

/// Number of tracked clients above which expired windows are swept.
const SWEEP_THRESHOLD: usize = 1024;
const UNKNOWN_CLIENT: &str = "unknown";

/// Invalid limiter settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum RateLimitConfigError {
    /// A zero budget would reject every request.
    #[error("rate limit must allow at least one request")]
    ZeroRequests,
    /// Window shorter than a second or longer than a year.
    #[error("rate limit window must be between 1 second and {max} seconds")]
    WindowOutOfRange {
        /// Longest accepted window in seconds.
        max: i64,
    },
}

/// Budget of requests per client per window.
///
/// # Examples
/// ```
/// use backend::RateLimitConfig;
///
/// let config = RateLimitConfig::new(10, 60).expect("valid limits");
/// assert_eq!(config.max_requests(), 10);
/// assert!(RateLimitConfig::new(0, 60).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    max_requests: u32,
    window: TimeDelta,
}

impl RateLimitConfig {
    /// Requests allowed per window when unconfigured.
    pub const DEFAULT_MAX_REQUESTS: u32 = 10;
    /// Window length when unconfigured.
    pub const DEFAULT_WINDOW_SECONDS: u64 = 60;
    /// One year; longer windows are a configuration mistake.
    const MAX_WINDOW_SECONDS: i64 = 365 * 24 * 60 * 60;

    /// Validate a budget of `max_requests` per `window_seconds`.
    ///
    /// # Errors
    /// Returns [`RateLimitConfigError`] for a zero budget or a window outside
    /// one second to one year.
    pub fn new(max_requests: u32, window_seconds: u64) -> Result<Self, RateLimitConfigError> {
        if max_requests == 0 {
            return Err(RateLimitConfigError::ZeroRequests);
        }
        let out_of_range = RateLimitConfigError::WindowOutOfRange {
            max: Self::MAX_WINDOW_SECONDS,
        };
        let seconds = i64::try_from(window_seconds).map_err(|_| out_of_range)?;
        if !(1..=Self::MAX_WINDOW_SECONDS).contains(&seconds) {
            return Err(out_of_range);
        }
        let window = TimeDelta::try_seconds(seconds).ok_or(out_of_range)?;
        Ok(Self {
            max_requests,
            window,
        })
    }

    /// Requests allowed per window.
    #[must_use]
    pub const fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Window length.
    #[must_use]
    pub const fn window(&self) -> TimeDelta {
        self.window
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: Self::DEFAULT_MAX_REQUESTS,
            window: TimeDelta::seconds(60),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: DateTime<Utc>,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Allow,
    Reject { retry_after_seconds: u64 },
}

/// Middleware factory. Clones share one counter table, so build it once and
/// clone it into each worker's `App`.
#[derive(Clone)]
pub struct RateLimit {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    windows: Arc<Mutex<HashMap<String, Window>>>,
}

impl RateLimit {
    /// Limiter driven by the system clock.
    #[must_use]
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(DefaultClock))
    }

    /// Limiter driven by an injected clock.
    #[must_use]
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            windows: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn check(&self, client: &str) -> Decision {
        let now = self.clock.utc();
        let window = self.config.window;
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() >= SWEEP_THRESHOLD {
            windows.retain(|_, w| now - w.started < window);
        }

        let entry = windows.entry(client.to_owned()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now - entry.started >= window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.config.max_requests {
            let remaining_ms =
                u64::try_from((entry.started + window - now).num_milliseconds()).unwrap_or(0);
            return Decision::Reject {
                retry_after_seconds: remaining_ms.div_ceil(1000).max(1),
            };
        }
        entry.count += 1;
        Decision::Allow
    }
}

fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned())
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
            limiter: self.clone(),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: S,
    limiter: RateLimit,
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
        let client = client_key(&req);
        match self.limiter.check(&client) {
            Decision::Allow => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Decision::Reject {
                retry_after_seconds,
            } => Box::pin(async move {
                warn!(client = %client, retry_after_seconds, "rate limit exceeded");
                // Built inside the future so the request trace id is in scope.
                let error = ApiError::too_many_requests("rate limit exceeded");
                let mut response = error.error_response();
                response
                    .headers_mut()
                    .insert(RETRY_AFTER, HeaderValue::from(retry_after_seconds));
                Ok(req.into_response(response).map_into_right_body())
            }),
        }
    }
}
