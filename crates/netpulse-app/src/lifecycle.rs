//! 종료 처리.
//!
//! 명령 하나의 작업을 OS 종료 시그널과 경쟁시키고, 시그널이 먼저 오면
//! 대시보드를 해제한다.

use anyhow::Result;
use netpulse_dashboard::Dashboard;
use std::future::Future;
use tracing::{info, warn};

/// 작업 종료 사유
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// 작업이 스스로 끝남
    Finished,
    /// 종료 시그널로 중단됨 (대시보드 해제 완료)
    Interrupted,
}

/// OS 종료 시그널 대기 (SIGINT, SIGTERM)
pub async fn shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut sigterm = signal(SignalKind::terminate())?;

        tokio::select! {
            _ = sigint.recv() => info!("SIGINT 수신"),
            _ = sigterm.recv() => info!("SIGTERM 수신"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Ctrl+C 수신");
    }

    Ok(())
}

/// `work`가 끝나거나 `signal`이 올 때까지 실행
///
/// 시그널 등록에 실패하면 경고만 남기고 작업이 끝날 때까지 기다린다.
pub async fn run_until_shutdown<W, S>(dashboard: &Dashboard, work: W, signal: S) -> Result<Exit>
where
    W: Future<Output = Result<()>>,
    S: Future<Output = Result<()>>,
{
    tokio::pin!(work);

    tokio::select! {
        finished = &mut work => return finished.map(|()| Exit::Finished),
        received = signal => match received {
            Ok(()) => {
                info!("종료 시그널로 대시보드 해제");
                dashboard.unmount();
                return Ok(Exit::Interrupted);
            }
            Err(e) => warn!("시그널 핸들러 등록 실패, 작업 완료까지 대기: {e}"),
        },
    }

    work.await.map(|()| Exit::Finished)
}
