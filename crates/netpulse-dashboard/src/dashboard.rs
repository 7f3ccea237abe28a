//! 대시보드 뷰 마운트/해제.
//!
//! 뷰 하나에 필요한 상태와 작업을 묶는다. 마운트마다 새 버퍼와 스코프가
//! 만들어지고, 해제하면 모든 작업의 이후 결과가 버려진다.

use netpulse_core::config::AppConfig;
use netpulse_core::models::optimization::default_steps;
use netpulse_core::ports::api_client::NetworkApi;
use std::sync::Arc;
use tokio::task::JoinHandle;

use crate::poller::PollingScheduler;
use crate::status_probe::StatusProbe;
use crate::view_state::ViewState;
use crate::workflow::OptimizationWorkflow;

/// 마운트된 대시보드 뷰
pub struct Dashboard {
    view: Arc<ViewState>,
    scheduler: Arc<PollingScheduler>,
    workflow: Arc<OptimizationWorkflow>,
    probe: Arc<StatusProbe>,
}

impl Dashboard {
    /// 기본 진행 단계로 마운트
    pub fn mount(api: Arc<dyn NetworkApi>, config: &AppConfig) -> Self {
        Self::mount_with_steps(api, config, default_steps())
    }

    /// 진행 단계를 지정해 마운트
    pub fn mount_with_steps(
        api: Arc<dyn NetworkApi>,
        config: &AppConfig,
        steps: Vec<String>,
    ) -> Self {
        let view = Arc::new(ViewState::new(config.polling.buffer_capacity));
        let scheduler = Arc::new(PollingScheduler::new(
            api.clone(),
            view.clone(),
            config.polling.interval(),
        ));
        let workflow = Arc::new(OptimizationWorkflow::new(
            api.clone(),
            view.clone(),
            steps,
            config.optimizer.step_delay(),
        ));
        let probe = Arc::new(StatusProbe::new(api, view.clone()));

        Self {
            view,
            scheduler,
            workflow,
            probe,
        }
    }

    pub fn view(&self) -> &Arc<ViewState> {
        &self.view
    }

    pub fn scheduler(&self) -> &Arc<PollingScheduler> {
        &self.scheduler
    }

    pub fn workflow(&self) -> &Arc<OptimizationWorkflow> {
        &self.workflow
    }

    pub fn probe(&self) -> &Arc<StatusProbe> {
        &self.probe
    }

    /// 실시간 상태 카드를 백그라운드에서 한 번 조회
    pub fn spawn_status_probe(&self) -> JoinHandle<()> {
        let probe = self.probe.clone();
        tokio::spawn(async move {
            probe.probe().await;
        })
    }

    /// 뷰 해제. 폴링을 멈추고 스코프를 닫는다.
    pub fn unmount(&self) {
        self.scheduler.stop();
        self.view.teardown();
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.unmount();
    }
}
