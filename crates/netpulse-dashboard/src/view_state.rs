//! 뷰 상태.
//!
//! 뷰가 소유하는 버퍼, 텔레메트리 요약, 워크플로우 로그/결과를 보관한다.
//! 모든 변경은 하나의 쓰기 락 안에서 스코프를 확인한 뒤에만 일어나고,
//! 스코프를 닫는 쪽도 같은 락을 잡는다. 따라서 `teardown()`이 반환된
//! 뒤에는 어떤 작업도 상태를 바꾸지 못한다.

use netpulse_core::buffer::TimeSeriesBuffer;
use netpulse_core::models::telemetry::{NetworkStatsResponse, StatSample, TelemetrySnapshot};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::events::{EventBus, ViewEvent};
use crate::scope::ViewScope;
use crate::status_probe::NetworkQuality;
use crate::workflow::WorkflowState;

/// 실시간 텔레메트리 패널
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryPanel {
    /// 다운로드 속도 차트
    pub download: TimeSeriesBuffer,
    /// 핑 차트
    pub ping: TimeSeriesBuffer,
    /// 요약 카드
    pub snapshot: TelemetrySnapshot,
}

impl TelemetryPanel {
    fn new(capacity: usize) -> Self {
        Self {
            download: TimeSeriesBuffer::new(capacity),
            ping: TimeSeriesBuffer::new(capacity),
            snapshot: TelemetrySnapshot::default(),
        }
    }

    /// 응답 하나를 두 버퍼와 요약에 반영 (같은 타임스탬프)
    fn record(&mut self, stats: &NetworkStatsResponse, timestamp: &str) {
        self.download = self
            .download
            .append(StatSample::new(timestamp, stats.download_speed()));
        self.ping = self
            .ping
            .append(StatSample::new(timestamp, stats.ping().unwrap_or(0.0)));
        self.snapshot = self.snapshot.apply(stats);
    }
}

/// 최적화 패널
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerPanel {
    pub workflow: WorkflowState,
    /// 진행 로그 (표시 순서 그대로)
    pub log: Vec<String>,
    /// 사용자에게 보이는 에러
    pub error: Option<String>,
    /// 실시간 상태 카드 (조회 전이면 None)
    pub network_status: Option<(String, NetworkQuality)>,
}

impl Default for OptimizerPanel {
    fn default() -> Self {
        Self {
            workflow: WorkflowState::Idle,
            log: Vec::new(),
            error: None,
            network_status: None,
        }
    }
}

/// 변경 가능한 패널 묶음
#[derive(Debug)]
pub(crate) struct Panels {
    pub(crate) telemetry: TelemetryPanel,
    pub(crate) optimizer: OptimizerPanel,
}

/// 뷰 상태 저장소
pub struct ViewState {
    scope: ViewScope,
    panels: RwLock<Panels>,
    events: EventBus,
}

impl ViewState {
    /// 새 뷰 상태 (마운트)
    pub fn new(buffer_capacity: usize) -> Self {
        Self {
            scope: ViewScope::new(),
            panels: RwLock::new(Panels {
                telemetry: TelemetryPanel::new(buffer_capacity),
                optimizer: OptimizerPanel::default(),
            }),
            events: EventBus::default(),
        }
    }

    /// 뷰 스코프 (작업에 넘겨 대기 취소에 사용)
    pub fn scope(&self) -> &ViewScope {
        &self.scope
    }

    /// 뷰가 살아 있는지
    pub fn is_active(&self) -> bool {
        self.scope.is_active()
    }

    /// 뷰 해제 (언마운트). 반환 후에는 어떤 변경도 반영되지 않는다.
    pub fn teardown(&self) {
        self.close_scope(&self.scope);
        info!("뷰 해제");
    }

    /// 변경과 직렬화된 상태로 스코프를 닫는다
    pub(crate) fn close_scope(&self, scope: &ViewScope) {
        let _guard = self.panels.write();
        scope.close();
    }

    /// 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.events.subscribe()
    }

    /// 텔레메트리 패널 스냅샷
    pub fn telemetry(&self) -> TelemetryPanel {
        self.panels.read().telemetry.clone()
    }

    /// 최적화 패널 스냅샷
    pub fn optimizer(&self) -> OptimizerPanel {
        self.panels.read().optimizer.clone()
    }

    /// 현재 워크플로우 상태
    pub fn workflow_state(&self) -> WorkflowState {
        self.panels.read().optimizer.workflow.clone()
    }

    /// 스코프 확인 후 변경 적용
    ///
    /// 뷰 스코프와 (있다면) 작업 스코프가 모두 열려 있을 때만 `f`를 실행하고
    /// 모은 이벤트를 발행한다. 닫혔으면 None.
    pub(crate) fn mutate<R>(
        &self,
        task_scope: Option<&ViewScope>,
        f: impl FnOnce(&mut Panels, &mut Vec<ViewEvent>) -> R,
    ) -> Option<R> {
        let mut panels = self.panels.write();
        if !self.scope.is_active() || task_scope.is_some_and(|s| !s.is_active()) {
            debug!("스코프 종료 후 도착한 결과 폐기");
            return None;
        }

        let mut events = Vec::new();
        let result = f(&mut panels, &mut events);
        for event in events {
            self.events.publish(event);
        }
        Some(result)
    }

    /// 폴링 결과 반영
    pub(crate) fn record_telemetry(
        &self,
        task_scope: &ViewScope,
        stats: &NetworkStatsResponse,
        timestamp: &str,
    ) -> bool {
        self.mutate(Some(task_scope), |panels, events| {
            panels.telemetry.record(stats, timestamp);
            events.push(ViewEvent::TelemetryUpdated(
                panels.telemetry.snapshot.clone(),
            ));
        })
        .is_some()
    }

    /// 실시간 상태 카드 반영
    pub(crate) fn record_status(&self, label: String, quality: NetworkQuality) -> bool {
        self.mutate(None, |panels, events| {
            panels.optimizer.network_status = Some((label.clone(), quality));
            events.push(ViewEvent::StatusProbed { label, quality });
        })
        .is_some()
    }
}
