//! 애플리케이션 설정 구조체.
//!
//! 백엔드 URL, 폴링 주기, 버퍼 용량, 최적화 단계 지연 등 런타임 설정.
//! [`crate::config_manager::ConfigManager`]가 JSON 파일에서 로드한다.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 백엔드 연결 설정
    pub server: ServerConfig,
    /// 텔레메트리 폴링 설정
    #[serde(default)]
    pub polling: PollingConfig,
    /// 최적화 워크플로우 설정
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

// ============================================================
// 서버 설정
// ============================================================

/// 백엔드 연결 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 백엔드 기본 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// 요청 타임아웃 (밀리초). None이면 전송 계층 기본값을 따른다.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: None,
        }
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

// ============================================================
// 폴링 설정
// ============================================================

/// 텔레메트리 폴링 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// 응답 완료 후 다음 요청까지 대기 (밀리초)
    #[serde(default = "default_poll_interval_ms")]
    pub interval_ms: u64,
    /// 차트 버퍼 용량
    #[serde(default = "default_buffer_capacity")]
    pub buffer_capacity: usize,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_poll_interval_ms(),
            buffer_capacity: default_buffer_capacity(),
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn default_poll_interval_ms() -> u64 {
    3_000
}

fn default_buffer_capacity() -> usize {
    crate::buffer::DEFAULT_CAPACITY
}

// ============================================================
// 최적화 설정
// ============================================================

/// 최적화 워크플로우 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// 진행 단계 하나를 유지하는 시간 (밀리초)
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

impl OptimizerConfig {
    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }
}

fn default_step_delay_ms() -> u64 {
    1_000
}

impl AppConfig {
    /// 기본 설정
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            polling: PollingConfig::default(),
            optimizer: OptimizerConfig::default(),
        }
    }

    /// 설정값 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.server.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "base_url은 http(s) URL이어야 합니다: {url}"
            )));
        }
        if self.polling.interval_ms == 0 {
            return Err(CoreError::Config(
                "polling.interval_ms는 1 이상이어야 합니다".to_string(),
            ));
        }
        if self.polling.buffer_capacity == 0 {
            return Err(CoreError::Config(
                "buffer_capacity는 1 이상이어야 합니다".to_string(),
            ));
        }
        Ok(())
    }
}
