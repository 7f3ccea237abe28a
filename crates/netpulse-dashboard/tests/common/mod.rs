//! 통합 테스트용 인메모리 `NetworkApi`.
//!
//! 응답 스크립트, 인위적 지연, 수동 게이트, 호출 기록을 지원한다.

#![allow(dead_code)]

use async_trait::async_trait;
use netpulse_core::error::CoreError;
use netpulse_core::models::optimization::OptimizeResponse;
use netpulse_core::models::telemetry::NetworkStatsResponse;
use netpulse_core::ports::api_client::NetworkApi;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// 호출 순서 기록
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchStarted(usize),
    FetchSettled(usize),
    OptimizeStarted,
    OptimizeSettled,
}

#[derive(Default)]
pub struct FakeApi {
    stats_script: Mutex<VecDeque<Result<NetworkStatsResponse, CoreError>>>,
    /// 스크립트가 비었을 때 응답 (None이면 네트워크 에러)
    stats_fallback: Mutex<Option<NetworkStatsResponse>>,
    optimize_result: Mutex<Option<Result<OptimizeResponse, String>>>,
    fetch_delay: Mutex<Duration>,
    fetch_gate: Mutex<Option<Arc<Semaphore>>>,
    optimize_gate: Mutex<Option<Arc<Semaphore>>>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    fetch_count: AtomicUsize,
    optimize_count: AtomicUsize,
}

pub fn stats(download: f64, ping: Option<f64>, status: &str) -> NetworkStatsResponse {
    NetworkStatsResponse {
        download_speed: Some(download),
        upload_speed: Some(download / 4.0),
        ping,
        status: Some(status.to_string()),
        timestamp: None,
    }
}

pub fn optimize_ok() -> OptimizeResponse {
    OptimizeResponse {
        efficiency: Some(92.0),
        stability: Some("Stable".to_string()),
        signal: Some("Strong".to_string()),
        suggestions: Some(vec![
            "Restart your router weekly".to_string(),
            "Prefer the 5GHz band".to_string(),
        ]),
        optimization_log: Some(vec![
            "Backend diagnostics finished".to_string(),
            "✅ Optimization complete.".to_string(),
        ]),
    }
}

impl FakeApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 스크립트가 비면 항상 이 응답
    pub fn with_fallback(self: Arc<Self>, resp: NetworkStatsResponse) -> Arc<Self> {
        *self.stats_fallback.lock() = Some(resp);
        self
    }

    pub fn push_stats(&self, resp: Result<NetworkStatsResponse, CoreError>) {
        self.stats_script.lock().push_back(resp);
    }

    pub fn set_optimize(&self, resp: Result<OptimizeResponse, String>) {
        *self.optimize_result.lock() = Some(resp);
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock() = delay;
    }

    /// 이후 fetch는 `release_fetch` 전까지 대기
    pub fn gate_fetch(&self) {
        *self.fetch_gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_fetch(&self, n: usize) {
        if let Some(gate) = self.fetch_gate.lock().as_ref() {
            gate.add_permits(n);
        }
    }

    pub fn gate_optimize(&self) {
        *self.optimize_gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub fn release_optimize(&self) {
        if let Some(gate) = self.optimize_gate.lock().as_ref() {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    pub fn optimize_count(&self) -> usize {
        self.optimize_count.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn settled_fetches(&self) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|c| matches!(c, Call::FetchSettled(_)))
            .count()
    }

    async fn wait_gate(gate: Option<Arc<Semaphore>>) {
        if let Some(gate) = gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
    }
}

#[async_trait]
impl NetworkApi for FakeApi {
    async fn fetch_network_stats(&self) -> Result<NetworkStatsResponse, CoreError> {
        let n = self.fetch_count.fetch_add(1, Ordering::SeqCst) + 1;
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().push(Call::FetchStarted(n));

        let delay = *self.fetch_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let gate = self.fetch_gate.lock().clone();
        Self::wait_gate(gate).await;

        let result = match self.stats_script.lock().pop_front() {
            Some(resp) => resp,
            None => self
                .stats_fallback
                .lock()
                .clone()
                .ok_or_else(|| CoreError::Network("connection refused".to_string())),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.calls.lock().push(Call::FetchSettled(n));
        result
    }

    async fn optimize_network(&self) -> Result<OptimizeResponse, CoreError> {
        self.optimize_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().push(Call::OptimizeStarted);

        let gate = self.optimize_gate.lock().clone();
        Self::wait_gate(gate).await;

        let result = self
            .optimize_result
            .lock()
            .clone()
            .unwrap_or_else(|| Ok(optimize_ok()));

        self.calls.lock().push(Call::OptimizeSettled);
        result.map_err(|msg| CoreError::Http {
            status: 500,
            message: msg,
        })
    }
}
