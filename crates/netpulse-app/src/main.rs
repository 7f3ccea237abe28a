//! # netpulse-app
//!
//! NETPULSE 바이너리 진입점.
//! 설정 로드, HTTP 클라이언트 조립, 대시보드 마운트와 종료 처리.

mod lifecycle;
mod render;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use netpulse_core::config::AppConfig;
use netpulse_core::config_manager::ConfigManager;
use netpulse_core::ports::api_client::NetworkApi;
use netpulse_dashboard::{Dashboard, TriggerOutcome, ViewEvent};
use netpulse_network::http_client::HttpNetworkClient;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::{run_until_shutdown, shutdown_signal, Exit};

/// NETPULSE 네트워크 대시보드
///
/// 백엔드 텔레메트리를 주기적으로 조회하고 최적화 절차를 실행한다.
#[derive(Parser, Debug)]
#[command(name = "netpulse")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 백엔드 URL 지정 (기본: 설정 파일 값)
    #[arg(long, short = 's', global = true)]
    server: Option<String>,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// 폴링 간격 (밀리초, 응답 완료 후 대기 시간)
    #[arg(long, global = true)]
    poll_interval: Option<u64>,

    /// CLI로 지정한 값을 설정 파일에 저장
    #[arg(long, global = true)]
    save: bool,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// 실시간 텔레메트리 모니터링 (기본)
    Watch,
    /// 네트워크 최적화 실행
    Optimize,
    /// 현재 네트워크 상태 한 번 조회
    Status,
}

fn print_banner() {
    println!();
    println!("╔══════════════════════════════════════╗");
    println!("║   NETPULSE  네트워크 대시보드        ║");
    println!("╚══════════════════════════════════════╝");
    println!();
}

fn apply_overrides(args: &Args, config: &mut AppConfig) {
    if let Some(ref server_url) = args.server {
        config.server.base_url = server_url.clone();
    }
    if let Some(interval) = args.poll_interval {
        config.polling.interval_ms = interval;
    }
}

/// 설정 로드 후 CLI 인자로 오버라이드 (`--save`면 파일에도 반영)
fn load_config(args: &Args) -> Result<AppConfig> {
    let manager = match &args.config {
        Some(path) => Some(
            ConfigManager::with_path(path.clone())
                .map_err(|e| anyhow!("설정 파일 로드 실패: {}: {}", path.display(), e))?,
        ),
        None => match ConfigManager::new() {
            Ok(manager) => Some(manager),
            Err(e) => {
                warn!("설정 파일 로드 실패, 기본 설정 사용: {e}");
                None
            }
        },
    };

    let config = match &manager {
        Some(manager) if args.save => {
            let saved = manager
                .update_with(|c| apply_overrides(args, c))
                .map_err(|e| anyhow!("설정 저장 실패: {}", e))?;
            info!("설정 저장: {}", manager.config_path().display());
            saved
        }
        Some(manager) => {
            debug!("설정 파일: {}", manager.config_path().display());
            let mut config = manager.get();
            apply_overrides(args, &mut config);
            config
        }
        None => {
            if args.save {
                warn!("설정 파일을 쓸 수 없어 --save 무시");
            }
            let mut config = AppConfig::default_config();
            apply_overrides(args, &mut config);
            config
        }
    };

    config
        .validate()
        .map_err(|e| anyhow!("설정 검증 실패: {}", e))?;
    Ok(config)
}

/// 텔레메트리 갱신마다 한 블록씩 출력
async fn print_telemetry(
    dashboard: &Dashboard,
    events: &mut broadcast::Receiver<ViewEvent>,
) -> Result<()> {
    loop {
        match events.recv().await {
            Ok(ViewEvent::TelemetryUpdated(_)) => {
                println!("{}", render::telemetry_block(&dashboard.view().telemetry()));
            }
            Ok(_) => {}
            Err(RecvError::Lagged(n)) => debug!("뷰 이벤트 {n}개 건너뜀"),
            Err(RecvError::Closed) => return Ok(()),
        }
    }
}

/// 워크플로우가 끝날 때까지 로그 줄을 흘려 출력
async fn stream_optimizer_log(
    events: &mut broadcast::Receiver<ViewEvent>,
    handle: &mut JoinHandle<()>,
) -> Result<()> {
    loop {
        tokio::select! {
            biased;
            event = events.recv() => match event {
                Ok(ViewEvent::LogAppended(line)) => println!("{line}"),
                Ok(_) => {}
                Err(RecvError::Lagged(n)) => debug!("뷰 이벤트 {n}개 건너뜀"),
                Err(RecvError::Closed) => return Ok(()),
            },
            joined = &mut *handle => {
                joined?;
                return Ok(());
            }
        }
    }
}

/// 폴링을 시작하고 종료 시그널까지 갱신마다 출력
async fn run_watch(dashboard: &Dashboard) -> Result<()> {
    let mut events = dashboard.view().subscribe();

    dashboard.scheduler().start();
    info!(
        "텔레메트리 폴링 시작 (간격 {}ms)",
        dashboard.scheduler().interval().as_millis()
    );

    let work = print_telemetry(dashboard, &mut events);
    if run_until_shutdown(dashboard, work, shutdown_signal()).await? == Exit::Interrupted {
        info!("모니터링 종료");
    }
    Ok(())
}

/// 상태 조회와 최적화 절차를 실행하고 로그를 흘려 출력
async fn run_optimize(dashboard: &Dashboard) -> Result<()> {
    let mut events = dashboard.view().subscribe();

    let probe = dashboard.spawn_status_probe();
    let (outcome, handle) = dashboard.workflow().start();
    let Some(mut handle) = handle else {
        warn!("최적화를 시작할 수 없음: {:?}", outcome);
        return Ok(());
    };
    debug_assert_eq!(outcome, TriggerOutcome::Started);

    let work = stream_optimizer_log(&mut events, &mut handle);
    let exit = run_until_shutdown(dashboard, work, shutdown_signal()).await?;

    while let Ok(event) = events.try_recv() {
        if let ViewEvent::LogAppended(line) = event {
            println!("{line}");
        }
    }

    if exit == Exit::Interrupted {
        info!("최적화 중단");
        return Ok(());
    }

    if let Err(e) = probe.await {
        warn!("상태 조회 태스크 실패: {e}");
    }
    println!();
    println!("{}", render::optimizer_summary(&dashboard.view().optimizer()));
    Ok(())
}

async fn run_status(dashboard: &Dashboard) -> Result<()> {
    let (label, quality) = dashboard.probe().probe().await;
    println!("Network Status: {label} ({quality})");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "netpulse={},netpulse_core={},netpulse_network={},netpulse_dashboard={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .init();

    let command = args.command.unwrap_or(Command::Watch);
    if command != Command::Status {
        print_banner();
    }

    let config = load_config(&args)?;
    info!("서버: {}", config.server.base_url);

    let api: Arc<dyn NetworkApi> = Arc::new(HttpNetworkClient::new(
        &config.server.base_url,
        config.server.request_timeout(),
    )?);

    let dashboard = Dashboard::mount(api, &config);
    let result = match command {
        Command::Watch => run_watch(&dashboard).await,
        Command::Optimize => run_optimize(&dashboard).await,
        Command::Status => run_status(&dashboard).await,
    };

    dashboard.unmount();
    info!("NETPULSE 종료");
    result
}
