//! 텔레메트리 모델.
//!
//! `GET /api/network-stats/` 응답과 차트/요약 카드가 읽는 스냅샷.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// 시계열 단일 관측값. 생성 후 불변.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatSample {
    /// 표시용 벽시계 시각 (예: "3:04:05 PM")
    pub timestamp: String,
    /// 측정값
    pub value: f64,
}

impl StatSample {
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
        }
    }
}

/// 차트 X축에 쓰는 시각 포맷
pub fn display_time(now: DateTime<Local>) -> String {
    now.format("%-I:%M:%S %p").to_string()
}

/// 누락/0/null 숫자는 0으로 취급
fn or_zero(value: Option<f64>) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// 텔레메트리 응답 (`GET /api/network-stats/`)
///
/// 모든 필드가 선택적이다. 백엔드가 일부 필드를 빼먹어도 폴링은 계속된다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatsResponse {
    #[serde(default)]
    pub download_speed: Option<f64>,
    #[serde(default)]
    pub upload_speed: Option<f64>,
    #[serde(default)]
    pub ping: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    /// 백엔드 측정 시각 (ISO-8601). 표시에는 쓰지 않는다.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl NetworkStatsResponse {
    /// 다운로드 속도 (Mbps), 누락 시 0
    pub fn download_speed(&self) -> f64 {
        or_zero(self.download_speed)
    }

    /// 업로드 속도 (Mbps), 누락 시 0
    pub fn upload_speed(&self) -> f64 {
        or_zero(self.upload_speed)
    }

    /// 핑 (ms). 0은 유효한 값으로 유지, 누락만 None
    pub fn ping(&self) -> Option<f64> {
        self.ping.filter(|v| v.is_finite())
    }

    /// 상태 라벨. 빈 문자열은 None
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref().filter(|s| !s.is_empty())
    }
}

/// 최신 텔레메트리 요약
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub download_speed: f64,
    pub upload_speed: f64,
    pub ping: Option<f64>,
    pub status: Option<String>,
    /// 뷰 수명 동안 단조 비감소
    pub max_download_seen: f64,
}

impl TelemetrySnapshot {
    /// 응답 하나를 반영한 새 스냅샷
    pub fn apply(&self, stats: &NetworkStatsResponse) -> Self {
        let download_speed = stats.download_speed();
        Self {
            download_speed,
            upload_speed: stats.upload_speed(),
            ping: stats.ping(),
            status: stats.status().map(str::to_string),
            max_download_seen: self.max_download_seen.max(download_speed),
        }
    }
}
