//! # netpulse-dashboard
//!
//! 대시보드 뷰의 시간/상태 동작.
//!
//! - [`poller`]: 겹치지 않는 자기 재예약 텔레메트리 폴링 루프
//! - [`workflow`]: 최적화 진행 단계 상태 기계와 효과 계층
//! - [`view_state`]: 버퍼/로그/결과 보관, 스코프 확인 후에만 변경
//! - [`scope`]: 뷰 단위 협조적 취소
//! - [`status_probe`]: 최적화 화면의 일회성 상태 조회
//! - [`display`]: 차트 축, 색상 등급, 요약 카드 문자열
//!
//! 진행 중인 요청은 전송 계층에서 중단하지 않는다. 뷰가 해제되면 결과만 버린다.

pub mod dashboard;
pub mod display;
pub mod events;
pub mod poller;
pub mod scope;
pub mod status_probe;
pub mod view_state;
pub mod workflow;

pub use dashboard::Dashboard;
pub use events::ViewEvent;
pub use poller::PollingScheduler;
pub use scope::ViewScope;
pub use view_state::ViewState;
pub use workflow::{OptimizationWorkflow, TriggerOutcome, WorkflowState};
