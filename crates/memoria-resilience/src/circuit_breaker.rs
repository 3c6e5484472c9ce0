// SPDX-FileCopyrightText: 2026 Memoria Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Three-state circuit breaker.
//!
//! ```text
//!  Closed ──(failure_threshold consecutive failures)──> Open
//!  Open ──(open_timeout elapsed, next call)──> HalfOpen
//!  HalfOpen ──(success_threshold successes)──> Closed
//!  HalfOpen ──(any failure)──> Open
//! ```
//!
//! Half-open admits at most `max_half_open_requests` trial calls at once;
//! the rest are rejected like calls against an open circuit.

use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use memoria_config::model::ResilienceConfig;
use memoria_core::MemoriaError;
use strum::{Display, IntoStaticStr};
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Circuit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Thresholds for one breaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub success_threshold: u32,
    pub open_timeout: Duration,
    pub max_half_open_requests: u32,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self::from(&ResilienceConfig::default())
    }
}

impl From<&ResilienceConfig> for CircuitBreakerConfig {
    fn from(config: &ResilienceConfig) -> Self {
        Self {
            failure_threshold: config.failure_threshold.max(1),
            success_threshold: config.success_threshold.max(1),
            open_timeout: Duration::from_secs(config.open_timeout_secs),
            max_half_open_requests: config.max_half_open_requests.max(1),
        }
    }
}

/// Point-in-time view of a breaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerStats {
    pub name: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    pub consecutive_successes: u32,
    pub total_requests: u64,
    pub total_failures: u64,
    pub total_rejections: u64,
}

#[derive(Debug)]
struct Inner {
    state: CircuitState,
    consecutive_failures: u32,
    consecutive_successes: u32,
    half_open_in_flight: u32,
    opened_at: Option<Instant>,
    total_requests: u64,
    total_failures: u64,
    total_rejections: u64,
}

impl Inner {
    fn new() -> Self {
        Self {
            state: CircuitState::Closed,
            consecutive_failures: 0,
            consecutive_successes: 0,
            half_open_in_flight: 0,
            opened_at: None,
            total_requests: 0,
            total_failures: 0,
            total_rejections: 0,
        }
    }
}

/// A named circuit breaker guarding one backend.
#[derive(Debug)]
pub struct CircuitBreaker {
    name: String,
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

/// Admission ticket for one call. Dropping it without an outcome (the call
/// future was cancelled) frees its half-open slot.
struct Admission<'a> {
    breaker: &'a CircuitBreaker,
    trial: bool,
    settled: bool,
}

impl Admission<'_> {
    fn settle(mut self, success: bool) {
        self.settled = true;
        self.breaker.record(self.trial, success);
    }
}

impl Drop for Admission<'_> {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            let mut inner = self.breaker.lock();
            inner.half_open_in_flight = inner.half_open_in_flight.saturating_sub(1);
        }
    }
}

impl CircuitBreaker {
    pub fn new(name: impl Into<String>, config: CircuitBreakerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            inner: Mutex::new(Inner::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Current state. An open circuit whose timeout has elapsed still
    /// reports `Open` until the next call moves it to half-open.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn stats(&self) -> CircuitBreakerStats {
        let inner = self.lock();
        CircuitBreakerStats {
            name: self.name.clone(),
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            consecutive_successes: inner.consecutive_successes,
            total_requests: inner.total_requests,
            total_failures: inner.total_failures,
            total_rejections: inner.total_rejections,
        }
    }

    /// Run `operation` through the breaker.
    ///
    /// Returns [`MemoriaError::CircuitOpen`] without calling `operation` when
    /// the circuit rejects the call. Every error from `operation` counts as
    /// a failure.
    pub async fn call<F, Fut, T>(&self, operation: F) -> Result<T, MemoriaError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, MemoriaError>>,
    {
        let admission = self.admit()?;
        let result = operation().await;
        admission.settle(result.is_ok());
        result
    }

    /// Like [`CircuitBreaker::call`], but any error (rejection or failure)
    /// is replaced by the value `fallback` builds from it.
    pub async fn call_with_fallback<F, Fut, T, FB>(&self, operation: F, fallback: FB) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, MemoriaError>>,
        FB: FnOnce(&MemoriaError) -> T,
    {
        match self.call(operation).await {
            Ok(value) => value,
            Err(e) => {
                warn!(breaker = %self.name, error = %e, "using fallback result");
                fallback(&e)
            }
        }
    }

    /// Force the breaker back to closed with cleared counters.
    pub fn reset(&self) {
        let mut inner = self.lock();
        let from = inner.state;
        *inner = Inner {
            total_requests: inner.total_requests,
            total_failures: inner.total_failures,
            total_rejections: inner.total_rejections,
            ..Inner::new()
        };
        if from != CircuitState::Closed {
            self.log_transition(from, CircuitState::Closed);
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn admit(&self) -> Result<Admission<'_>, MemoriaError> {
        let mut inner = self.lock();

        if inner.state == CircuitState::Open {
            let elapsed = inner
                .opened_at
                .is_some_and(|at| at.elapsed() >= self.config.open_timeout);
            if elapsed {
                self.transition(&mut inner, CircuitState::HalfOpen);
            }
        }

        let state = inner.state;
        let trial = match state {
            CircuitState::Closed => false,
            CircuitState::Open => return Err(self.reject(&mut inner)),
            CircuitState::HalfOpen => {
                if inner.half_open_in_flight >= self.config.max_half_open_requests {
                    return Err(self.reject(&mut inner));
                }
                inner.half_open_in_flight += 1;
                true
            }
        };

        inner.total_requests += 1;
        Ok(Admission {
            breaker: self,
            trial,
            settled: false,
        })
    }

    fn reject(&self, inner: &mut Inner) -> MemoriaError {
        inner.total_rejections += 1;
        debug!(breaker = %self.name, state = %inner.state, "call rejected");
        MemoriaError::CircuitOpen {
            name: self.name.clone(),
        }
    }

    fn record(&self, trial: bool, success: bool) {
        let mut inner = self.lock();
        if trial {
            inner.half_open_in_flight = inner.half_open_in_flight.saturating_sub(1);
        }
        if !success {
            inner.total_failures += 1;
        }

        match (inner.state, success) {
            (CircuitState::Closed, true) => inner.consecutive_failures = 0,
            (CircuitState::Closed, false) => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.config.failure_threshold {
                    self.transition(&mut inner, CircuitState::Open);
                }
            }
            (CircuitState::HalfOpen, true) => {
                inner.consecutive_successes += 1;
                if inner.consecutive_successes >= self.config.success_threshold {
                    self.transition(&mut inner, CircuitState::Closed);
                }
            }
            (CircuitState::HalfOpen, false) => self.transition(&mut inner, CircuitState::Open),
            // A call admitted before the circuit opened; its outcome is stale.
            (CircuitState::Open, _) => {}
        }
    }

    fn transition(&self, inner: &mut Inner, to: CircuitState) {
        let from = inner.state;
        inner.state = to;
        inner.consecutive_failures = 0;
        inner.consecutive_successes = 0;
        match to {
            CircuitState::Open => inner.opened_at = Some(Instant::now()),
            CircuitState::Closed => inner.opened_at = None,
            CircuitState::HalfOpen => {}
        }
        self.log_transition(from, to);
    }

    fn log_transition(&self, from: CircuitState, to: CircuitState) {
        if to == CircuitState::Open {
            warn!(breaker = %self.name, %from, %to, "circuit breaker state changed");
        } else {
            info!(breaker = %self.name, %from, %to, "circuit breaker state changed");
        }
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn breaker() -> CircuitBreaker {
        CircuitBreaker::new(
            "test",
            CircuitBreakerConfig {
                failure_threshold: 3,
                success_threshold: 2,
                open_timeout: Duration::from_secs(30),
                max_half_open_requests: 1,
            },
        )
    }

    async fn fail(cb: &CircuitBreaker) -> Result<(), MemoriaError> {
        cb.call(|| async { Err::<(), _>(MemoriaError::Internal("boom".into())) })
            .await
    }

    async fn succeed(cb: &CircuitBreaker) -> Result<u32, MemoriaError> {
        cb.call(|| async { Ok(7) }).await
    }

    #[tokio::test]
    async fn opens_after_consecutive_failures() {
        let cb = breaker();
        for _ in 0..2 {
            assert!(fail(&cb).await.is_err());
        }
        assert_eq!(cb.state(), CircuitState::Closed);
        assert!(fail(&cb).await.is_err());
        assert_eq!(cb.state(), CircuitState::Open);

        let err = succeed(&cb).await.unwrap_err();
        assert!(matches!(err, MemoriaError::CircuitOpen { ref name } if name == "test"));
        assert_eq!(cb.stats().total_rejections, 1);
    }

    #[tokio::test]
    async fn success_resets_failure_count() {
        let cb = breaker();
        fail(&cb).await.unwrap_err();
        fail(&cb).await.unwrap_err();
        assert_eq!(succeed(&cb).await.unwrap(), 7);
        fail(&cb).await.unwrap_err();
        fail(&cb).await.unwrap_err();
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.stats().consecutive_failures, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_closes_after_successes() {
        let cb = breaker();
        for _ in 0..3 {
            fail(&cb).await.unwrap_err();
        }
        tokio::time::advance(Duration::from_secs(29)).await;
        assert!(matches!(succeed(&cb).await, Err(MemoriaError::CircuitOpen { .. })));

        tokio::time::advance(Duration::from_secs(1)).await;
        succeed(&cb).await.unwrap();
        assert_eq!(cb.state(), CircuitState::HalfOpen);
        succeed(&cb).await.unwrap();
        assert_eq!(cb.state(), CircuitState::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_failure_reopens() {
        let cb = breaker();
        for _ in 0..3 {
            fail(&cb).await.unwrap_err();
        }
        tokio::time::advance(Duration::from_secs(30)).await;
        fail(&cb).await.unwrap_err();
        assert_eq!(cb.state(), CircuitState::Open);

        // The open timeout restarts from the reopening.
        tokio::time::advance(Duration::from_secs(10)).await;
        assert!(matches!(succeed(&cb).await, Err(MemoriaError::CircuitOpen { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn half_open_limits_concurrent_trials() {
        let cb = breaker();
        for _ in 0..3 {
            fail(&cb).await.unwrap_err();
        }
        tokio::time::advance(Duration::from_secs(30)).await;

        let (release, wait) = tokio::sync::oneshot::channel::<()>();
        let slow = cb.call(|| async move {
            let _ = wait.await;
            Ok(1)
        });
        let fast = async {
            tokio::task::yield_now().await;
            let rejected = succeed(&cb).await;
            let _ = release.send(());
            rejected
        };
        let (slow, fast) = tokio::join!(slow, fast);
        assert_eq!(slow.unwrap(), 1);
        assert!(matches!(fast, Err(MemoriaError::CircuitOpen { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_trial_frees_its_slot() {
        let cb = breaker();
        for _ in 0..3 {
            fail(&cb).await.unwrap_err();
        }
        tokio::time::advance(Duration::from_secs(30)).await;

        let pending = cb.call(|| std::future::pending::<Result<(), MemoriaError>>());
        let timed_out = tokio::time::timeout(Duration::from_millis(10), pending).await;
        assert!(timed_out.is_err());

        succeed(&cb).await.unwrap();
        assert_eq!(cb.state(), CircuitState::HalfOpen);
    }

    #[tokio::test]
    async fn fallback_replaces_errors() {
        let cb = breaker();
        let value = cb
            .call_with_fallback(
                || async { Err::<Vec<u8>, _>(MemoriaError::Internal("down".into())) },
                |_| Vec::new(),
            )
            .await;
        assert!(value.is_empty());
        assert_eq!(cb.stats().total_failures, 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn state_changes_are_logged() {
        let cb = breaker();
        for _ in 0..3 {
            fail(&cb).await.unwrap_err();
        }
        assert!(logs_contain("circuit breaker state changed"));
        assert!(logs_contain("open"));

        cb.reset();
        assert_eq!(cb.state(), CircuitState::Closed);
        assert_eq!(cb.stats().total_failures, 3);
    }

    #[test]
    fn config_from_resilience_section() {
        let config = CircuitBreakerConfig::default();
        assert_eq!(config.failure_threshold, 5);
        assert_eq!(config.success_threshold, 2);
        assert_eq!(config.open_timeout, Duration::from_secs(30));
        assert_eq!(config.max_half_open_requests, 3);
        assert_eq!(CircuitState::HalfOpen.to_string(), "half_open");
    }
}
