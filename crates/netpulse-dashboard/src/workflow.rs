//! 최적화 워크플로우.
//!
//! 고정된 진행 단계를 하나씩 로그에 올리고 단계마다 일정 시간 유지한 뒤,
//! 백엔드 최적화 호출을 정확히 한 번 수행한다.
//!
//! - [`transition`]: 순수 상태 전이 `(state, event) -> state`
//! - [`OptimizerPanel`]에 대한 로그/결과 반영: 전이 결과에서 파생
//! - [`OptimizationWorkflow`]: 지연과 네트워크 호출을 실행하는 효과 계층

use netpulse_core::models::optimization::OptimizationResult;
use netpulse_core::ports::api_client::NetworkApi;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::events::ViewEvent;
use crate::view_state::{OptimizerPanel, ViewState};

/// 백엔드 실패 시 사용자에게 보이는 메시지
pub const OPTIMIZE_FAILED_MESSAGE: &str = "Failed to optimize the network.";

/// 워크플로우 상태
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum WorkflowState {
    Idle,
    /// `step`번째 진행 메시지를 유지 중
    Running { step: usize },
    AwaitingBackend,
    Completed(OptimizationResult),
    Failed { reason: String },
}

impl WorkflowState {
    /// 실행 중이면 트리거 불가
    pub fn is_busy(&self) -> bool {
        matches!(
            self,
            WorkflowState::Running { .. } | WorkflowState::AwaitingBackend
        )
    }

    /// 완료 결과 (Completed일 때만)
    pub fn result(&self) -> Option<&OptimizationResult> {
        match self {
            WorkflowState::Completed(result) => Some(result),
            _ => None,
        }
    }
}

/// 상태 전이를 일으키는 입력
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowEvent {
    /// 사용자 트리거
    Trigger,
    /// `step`번째 단계의 유지 시간이 끝남
    StepHeld { step: usize },
    /// 백엔드 호출 완료
    BackendSettled(Result<OptimizationResult, String>),
}

/// 순수 상태 전이. None이면 상태 변화 없음 (거부 또는 무관한 입력).
pub fn transition(
    state: &WorkflowState,
    event: &WorkflowEvent,
    step_count: usize,
) -> Option<WorkflowState> {
    let after_step = |step: usize| {
        if step < step_count {
            WorkflowState::Running { step }
        } else {
            WorkflowState::AwaitingBackend
        }
    };

    match (state, event) {
        (s, WorkflowEvent::Trigger) if s.is_busy() => None,
        (_, WorkflowEvent::Trigger) => Some(after_step(0)),
        (WorkflowState::Running { step }, WorkflowEvent::StepHeld { step: held })
            if step == held =>
        {
            Some(after_step(step + 1))
        }
        (WorkflowState::AwaitingBackend, WorkflowEvent::BackendSettled(Ok(result))) => {
            Some(WorkflowState::Completed(result.clone()))
        }
        (WorkflowState::AwaitingBackend, WorkflowEvent::BackendSettled(Err(reason))) => {
            Some(WorkflowState::Failed {
                reason: reason.clone(),
            })
        }
        _ => None,
    }
}

/// 전이를 패널에 적용하고 로그/결과/에러를 갱신한다.
fn reduce(
    panel: &mut OptimizerPanel,
    event: &WorkflowEvent,
    steps: &[String],
    events: &mut Vec<ViewEvent>,
) -> Option<WorkflowState> {
    let next = transition(&panel.workflow, event, steps.len())?;

    if matches!(event, WorkflowEvent::Trigger) {
        panel.log.clear();
        panel.error = None;
    }

    let appended = match &next {
        WorkflowState::Running { step } => steps.get(*step).cloned(),
        WorkflowState::Completed(result) => result.final_log_line.clone(),
        WorkflowState::Failed { .. } => {
            panel.error = Some(OPTIMIZE_FAILED_MESSAGE.to_string());
            None
        }
        WorkflowState::Idle | WorkflowState::AwaitingBackend => None,
    };

    panel.workflow = next.clone();
    events.push(ViewEvent::WorkflowChanged(next.clone()));
    if let Some(line) = appended {
        panel.log.push(line.clone());
        events.push(ViewEvent::LogAppended(line));
    }

    Some(next)
}

/// 트리거 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// 새 실행 시작
    Started,
    /// 이미 실행 중이라 무시
    AlreadyRunning,
    /// 뷰가 해제됨
    ViewClosed,
}

/// 최적화 워크플로우: 효과 계층
pub struct OptimizationWorkflow {
    api: Arc<dyn NetworkApi>,
    view: Arc<ViewState>,
    steps: Arc<[String]>,
    step_delay: Duration,
}

impl OptimizationWorkflow {
    /// 새 워크플로우 생성
    pub fn new(
        api: Arc<dyn NetworkApi>,
        view: Arc<ViewState>,
        steps: Vec<String>,
        step_delay: Duration,
    ) -> Self {
        Self {
            api,
            view,
            steps: steps.into(),
            step_delay,
        }
    }

    /// 진행 단계 목록
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// 트리거 가능 여부 (버튼 활성화)
    pub fn can_trigger(&self) -> bool {
        self.view.is_active() && !self.view.workflow_state().is_busy()
    }

    /// 전이 하나를 스코프 확인 후 적용
    fn dispatch(&self, event: WorkflowEvent) -> Option<Option<WorkflowState>> {
        self.view
            .mutate(None, |panels, events| {
                reduce(&mut panels.optimizer, &event, &self.steps, events)
            })
    }

    /// 트리거 전이만 적용한다. 진행은 호출자가 `drive`로 이어가야 한다.
    fn trigger(&self) -> TriggerOutcome {
        match self.dispatch(WorkflowEvent::Trigger) {
            None => TriggerOutcome::ViewClosed,
            Some(None) => {
                debug!("최적화 이미 실행 중, 트리거 무시");
                TriggerOutcome::AlreadyRunning
            }
            Some(Some(_)) => {
                info!("네트워크 최적화 시작 ({}단계)", self.steps.len());
                TriggerOutcome::Started
            }
        }
    }

    /// 트리거 후 현재 태스크에서 끝까지 실행
    pub async fn run(&self) -> TriggerOutcome {
        let outcome = self.trigger();
        if outcome == TriggerOutcome::Started {
            self.drive().await;
        }
        outcome
    }

    /// 트리거 후 백그라운드 태스크로 실행
    pub fn start(self: &Arc<Self>) -> (TriggerOutcome, Option<JoinHandle<()>>) {
        let outcome = self.trigger();
        if outcome != TriggerOutcome::Started {
            return (outcome, None);
        }
        let this = Arc::clone(self);
        let handle = tokio::spawn(async move { this.drive().await });
        (outcome, Some(handle))
    }

    /// 현재 상태에 맞는 효과를 실행하며 종료 상태까지 진행
    async fn drive(&self) {
        loop {
            match self.view.workflow_state() {
                WorkflowState::Running { step } => {
                    tokio::select! {
                        _ = tokio::time::sleep(self.step_delay) => {}
                        _ = self.view.scope().closed() => {
                            debug!("뷰 해제로 최적화 단계 타이머 정리 (step={step})");
                            return;
                        }
                    }
                    match self.dispatch(WorkflowEvent::StepHeld { step }) {
                        Some(Some(_)) => continue,
                        _ => return,
                    }
                }
                WorkflowState::AwaitingBackend => {
                    // 전송 계층에서 중단하지 않는다. 뷰가 사라졌으면 결과만 버린다.
                    let settled = match self.api.optimize_network().await {
                        Ok(resp) => Ok(OptimizationResult::from(resp)),
                        Err(e) => {
                            warn!("네트워크 최적화 실패: {e}");
                            Err(e.to_string())
                        }
                    };
                    let succeeded = settled.is_ok();
                    if let Some(Some(_)) = self.dispatch(WorkflowEvent::BackendSettled(settled)) {
                        if succeeded {
                            info!("네트워크 최적화 완료");
                        }
                    }
                    return;
                }
                WorkflowState::Idle
                | WorkflowState::Completed(_)
                | WorkflowState::Failed { .. } => return,
            }
        }
    }
}
