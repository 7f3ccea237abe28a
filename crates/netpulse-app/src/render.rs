//! 터미널 렌더링.
//!
//! 뷰 이벤트를 받아 한 줄씩 출력한다. 차트 위젯 대신 최근 버퍼 값을
//! 막대 문자로 그린다.

use netpulse_core::buffer::TimeSeriesBuffer;
use netpulse_dashboard::display::{
    download_axis_max, result_cards, summary_cards, SpeedTier, PING_AXIS_MAX_MS,
};
use netpulse_dashboard::view_state::{OptimizerPanel, TelemetryPanel};

const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// 0..=axis_max 범위로 정규화한 막대 그래프
pub fn sparkline(buffer: &TimeSeriesBuffer, axis_max: f64) -> String {
    buffer
        .iter()
        .map(|sample| {
            let ratio = if axis_max > 0.0 {
                (sample.value / axis_max).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let idx = (ratio * (BARS.len() - 1) as f64).round() as usize;
            BARS[idx.min(BARS.len() - 1)]
        })
        .collect()
}

fn tier_label(tier: SpeedTier) -> &'static str {
    match tier {
        SpeedTier::Fast => "빠름",
        SpeedTier::Fair => "보통",
        SpeedTier::Slow => "느림",
    }
}

/// 폴링 한 주기 출력
pub fn telemetry_block(panel: &TelemetryPanel) -> String {
    let snapshot = &panel.snapshot;
    let time = panel
        .download
        .latest()
        .map(|s| s.timestamp.as_str())
        .unwrap_or("-");
    let tier = SpeedTier::from_mbps(snapshot.download_speed);

    let cards = summary_cards(snapshot)
        .into_iter()
        .map(|c| format!("{}: {}", c.label, c.value))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "[{time}] {cards}\n  다운로드 ({} {}) {}\n  핑 {}",
        tier_label(tier),
        tier.color(),
        sparkline(&panel.download, download_axis_max(snapshot.max_download_seen)),
        sparkline(&panel.ping, PING_AXIS_MAX_MS),
    )
}

/// 최적화 결과 요약 출력
pub fn optimizer_summary(panel: &OptimizerPanel) -> String {
    let mut lines = Vec::new();

    if let Some((label, quality)) = &panel.network_status {
        lines.push(format!("Network Status: {label} ({quality})"));
    }
    for card in result_cards(panel.workflow.result()) {
        lines.push(format!("{}: {}", card.label, card.value));
    }
    if let Some(result) = panel.workflow.result() {
        if !result.suggestions.is_empty() {
            lines.push("Suggestions:".to_string());
            lines.extend(result.suggestions.iter().map(|s| format!("  - {s}")));
        }
    }
    if let Some(error) = &panel.error {
        lines.push(format!("❌ {error}"));
    }

    lines.join("\n")
}
