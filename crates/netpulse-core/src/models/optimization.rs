//! 최적화 워크플로우 모델.
//!
//! `POST /api/optimize-network/` 응답과 결과 요약, 고정 진행 단계 목록.

use serde::{Deserialize, Serialize};

/// 백엔드 로그에서 완료 줄을 찾는 표식
pub const COMPLETION_MARKER: &str = "✅";

/// 클라이언트 측 진행 로그 (서버와 무관하게 고정)
pub const DEFAULT_OPTIMIZATION_STEPS: [&str; 12] = [
    "⏳ Starting network optimization process...",
    "🤖 Connecting to AI optimization models...",
    "📁 AI models accessed successfully.",
    "🧠 AI diagnostic: Proceed with optimization.",
    "🚀 Running speed test...",
    "📡 Collecting ping sample 1...",
    "📡 Collecting ping sample 2...",
    "📡 Collecting ping sample 3...",
    "🔧 Applying virtual DNS flush...",
    "🔌 Simulating router refresh...",
    "🌐 Reconnecting to optimal network route...",
    "📊 Analyzing connection performance...",
];

/// 기본 진행 단계를 소유 문자열로 반환
pub fn default_steps() -> Vec<String> {
    DEFAULT_OPTIMIZATION_STEPS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// 최적화 응답 (`POST /api/optimize-network/`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptimizeResponse {
    #[serde(default)]
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub stability: Option<String>,
    #[serde(default)]
    pub signal: Option<String>,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub optimization_log: Option<Vec<String>>,
}

/// 최적화 결과 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub efficiency_percent: f64,
    pub stability_label: Option<String>,
    pub signal_label: Option<String>,
    pub suggestions: Vec<String>,
    /// 백엔드 로그 중 완료 표식을 가진 첫 줄
    pub final_log_line: Option<String>,
}

impl From<OptimizeResponse> for OptimizationResult {
    fn from(resp: OptimizeResponse) -> Self {
        let final_log_line = resp
            .optimization_log
            .unwrap_or_default()
            .into_iter()
            .find(|line| line.contains(COMPLETION_MARKER));

        Self {
            efficiency_percent: resp.efficiency.filter(|v| v.is_finite()).unwrap_or(0.0),
            stability_label: resp.stability.filter(|s| !s.is_empty()),
            signal_label: resp.signal.filter(|s| !s.is_empty()),
            suggestions: resp.suggestions.unwrap_or_default(),
            final_log_line,
        }
    }
}
