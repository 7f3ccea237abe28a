//! 뷰 이벤트 버스.
//!
//! `tokio::broadcast` 기반. 차트/요약 카드/CLI 렌더러가 구독한다.

use netpulse_core::models::telemetry::TelemetrySnapshot;
use tokio::sync::broadcast;
use tracing::trace;

use crate::status_probe::NetworkQuality;
use crate::workflow::WorkflowState;

/// 뷰 상태 변경 알림
#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// 폴링 한 주기가 버퍼에 반영됨
    TelemetryUpdated(TelemetrySnapshot),
    /// 최적화 로그 한 줄 추가
    LogAppended(String),
    /// 워크플로우 상태 전이
    WorkflowChanged(WorkflowState),
    /// 최적화 화면의 실시간 상태 조회 결과
    StatusProbed {
        label: String,
        quality: NetworkQuality,
    },
}

/// 뷰 이벤트 버스
pub struct EventBus {
    tx: broadcast::Sender<ViewEvent>,
}

impl EventBus {
    /// 새 이벤트 버스 생성
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// 이벤트 발행 (구독자가 없으면 버린다)
    pub fn publish(&self, event: ViewEvent) {
        trace!("뷰 이벤트 발행: {:?}", std::mem::discriminant(&event));
        let _ = self.tx.send(event);
    }

    /// 구독자 생성
    pub fn subscribe(&self) -> broadcast::Receiver<ViewEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
