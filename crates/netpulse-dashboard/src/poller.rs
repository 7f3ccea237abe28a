//! 텔레메트리 폴링 루프.
//!
//! `fetch → 대기 → fetch` 자기 재예약 루프. 대기는 응답이 끝난 시점부터
//! 잰다. 느린 응답에서는 주기가 늘어날 뿐 요청이 겹치지 않는다.

use chrono::Local;
use netpulse_core::models::telemetry::display_time;
use netpulse_core::ports::api_client::NetworkApi;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::scope::ViewScope;
use crate::view_state::ViewState;

/// 텔레메트리 폴링 스케줄러
pub struct PollingScheduler {
    api: Arc<dyn NetworkApi>,
    view: Arc<ViewState>,
    interval: Duration,
    /// 현재 실행 중인 루프의 스코프. None이면 정지 상태.
    run: Mutex<Option<ViewScope>>,
    /// 요청 하나만 진행되도록 루프 사이에서 공유하는 잠금.
    /// 정지 직후 재시작해도 이전 루프의 요청이 끝나야 다음 요청이 나간다.
    in_flight: tokio::sync::Mutex<()>,
}

impl PollingScheduler {
    /// 새 스케줄러 생성
    pub fn new(api: Arc<dyn NetworkApi>, view: Arc<ViewState>, interval: Duration) -> Self {
        Self {
            api,
            view,
            interval,
            run: Mutex::new(None),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// 폴링 간격
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// 루프가 돌고 있는지
    pub fn is_active(&self) -> bool {
        self.view.is_active() && self.run.lock().as_ref().is_some_and(ViewScope::is_active)
    }

    /// 루프 시작. 즉시 첫 요청을 보낸다.
    ///
    /// 이미 돌고 있거나 뷰가 해제됐으면 아무것도 하지 않고 false.
    pub fn start(self: &Arc<Self>) -> bool {
        let mut run = self.run.lock();
        if run.as_ref().is_some_and(ViewScope::is_active) {
            debug!("폴링 루프 이미 실행 중");
            return false;
        }
        if !self.view.is_active() {
            return false;
        }

        let scope = ViewScope::new();
        *run = Some(scope.clone());

        info!("텔레메트리 폴링 시작: 간격={}ms", self.interval.as_millis());
        let this = Arc::clone(self);
        tokio::spawn(async move { this.run_loop(scope).await });
        true
    }

    /// 루프 정지. 진행 중인 요청은 끝까지 가지만 결과는 반영되지 않는다.
    /// 곧바로 `start`해도 새 루프의 첫 요청은 그 요청이 끝난 뒤에 나간다.
    pub fn stop(&self) {
        if let Some(scope) = self.run.lock().take() {
            self.view.close_scope(&scope);
            info!("텔레메트리 폴링 정지");
        }
    }

    fn still_running(&self, run: &ViewScope) -> bool {
        self.view.is_active() && run.is_active()
    }

    async fn run_loop(&self, run: ViewScope) {
        let mut cycle: u64 = 0;

        loop {
            cycle += 1;
            let outcome = {
                let _in_flight = self.in_flight.lock().await;
                if !self.still_running(&run) {
                    debug!("이전 요청 대기 중 정지 (cycle={cycle})");
                    return;
                }
                self.api.fetch_network_stats().await
            };

            if !self.still_running(&run) {
                debug!("폴링 정지 후 도착한 응답 폐기 (cycle={cycle})");
                return;
            }

            match outcome {
                Ok(stats) => {
                    let timestamp = display_time(Local::now());
                    if self.view.record_telemetry(&run, &stats, &timestamp) {
                        debug!(
                            "텔레메트리 반영 (cycle={cycle}): down={} ping={:?}",
                            stats.download_speed(),
                            stats.ping()
                        );
                    }
                }
                Err(e) if e.is_transient() => {
                    warn!("텔레메트리 조회 실패 (cycle={cycle}): {e}")
                }
                Err(e) => error!("텔레메트리 응답 처리 실패 (cycle={cycle}): {e}"),
            }

            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = run.closed() => {
                    debug!("폴링 대기 중 정지");
                    return;
                }
                _ = self.view.scope().closed() => {
                    debug!("폴링 대기 중 뷰 해제");
                    return;
                }
            }

            if !self.still_running(&run) {
                return;
            }
        }
    }
}
