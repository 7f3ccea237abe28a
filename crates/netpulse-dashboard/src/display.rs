//! 표시용 파생 값.
//!
//! 차트 축 범위, 속도 색상 등급, 요약 카드 문자열. 렌더러는 이 값만 읽는다.

use netpulse_core::models::optimization::OptimizationResult;
use netpulse_core::models::telemetry::TelemetrySnapshot;

/// 표시할 값이 없을 때
pub const NOT_AVAILABLE: &str = "N/A";

/// 핑 차트 Y축 상한 (ms)
pub const PING_AXIS_MAX_MS: f64 = 2_000.0;

/// 다운로드 차트 Y축 최소 상한 (Mbps)
const DOWNLOAD_AXIS_FLOOR: f64 = 50.0;

/// 최고 속도 위 여유분 (Mbps)
const DOWNLOAD_AXIS_HEADROOM: f64 = 10.0;

/// 현재 다운로드 속도 등급 (차트 선 색상)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedTier {
    /// 20 Mbps 초과
    Fast,
    /// 5 Mbps 초과
    Fair,
    Slow,
}

impl SpeedTier {
    pub fn from_mbps(mbps: f64) -> Self {
        if mbps > 20.0 {
            SpeedTier::Fast
        } else if mbps > 5.0 {
            SpeedTier::Fair
        } else {
            SpeedTier::Slow
        }
    }

    /// 차트 선 색상 (hex)
    pub fn color(&self) -> &'static str {
        match self {
            SpeedTier::Fast => "#22c55e",
            SpeedTier::Fair => "#facc15",
            SpeedTier::Slow => "#ef4444",
        }
    }
}

/// 다운로드 차트 Y축 상한
pub fn download_axis_max(max_download_seen: f64) -> f64 {
    DOWNLOAD_AXIS_FLOOR.max(max_download_seen + DOWNLOAD_AXIS_HEADROOM)
}

/// 요약 카드 한 장
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryCard {
    pub label: &'static str,
    pub value: String,
}

fn card(label: &'static str, value: String) -> SummaryCard {
    SummaryCard { label, value }
}

/// 텔레메트리 요약 카드 다섯 장
pub fn summary_cards(snapshot: &TelemetrySnapshot) -> Vec<SummaryCard> {
    vec![
        card("Download Speed", format!("{} Mbps", snapshot.download_speed)),
        card("Upload Speed", format!("{} Mbps", snapshot.upload_speed)),
        card(
            "Ping",
            snapshot
                .ping
                .map_or_else(|| NOT_AVAILABLE.to_string(), |p| format!("{p} ms")),
        ),
        card(
            "Max Download Speed",
            format!("{} Mbps", snapshot.max_download_seen),
        ),
        card(
            "Status",
            snapshot
                .status
                .clone()
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
    ]
}

/// 최적화 결과 카드 (효율, 핑 안정성, 신호 세기)
pub fn result_cards(result: Option<&OptimizationResult>) -> Vec<SummaryCard> {
    let label_or_na = |value: Option<&String>| {
        value
            .cloned()
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    vec![
        card(
            "System Efficiency",
            result.map_or_else(
                || NOT_AVAILABLE.to_string(),
                |r| format!("{}%", r.efficiency_percent),
            ),
        ),
        card(
            "Ping Stability",
            label_or_na(result.and_then(|r| r.stability_label.as_ref())),
        ),
        card(
            "Signal Strength",
            label_or_na(result.and_then(|r| r.signal_label.as_ref())),
        ),
    ]
}
