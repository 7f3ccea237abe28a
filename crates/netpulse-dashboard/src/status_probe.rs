//! 실시간 네트워크 상태 카드.
//!
//! 최적화 화면이 열릴 때 텔레메트리를 한 번 조회해 상태 라벨을 보여준다.
//! 조회에 실패하면 "Unknown"으로 표시한다.

use netpulse_core::ports::api_client::NetworkApi;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::view_state::ViewState;

/// 조회 실패 또는 상태 누락 시 라벨
pub const UNKNOWN_STATUS: &str = "Unknown";

/// 백엔드 상태 라벨의 품질 등급
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NetworkQuality {
    Good,
    Moderate,
    Poor,
    Unknown,
}

impl NetworkQuality {
    /// 백엔드 상태 문자열 분류 (정확히 일치해야 함)
    pub fn from_status(status: &str) -> Self {
        match status {
            "Good" => NetworkQuality::Good,
            "Moderate" => NetworkQuality::Moderate,
            "Poor" => NetworkQuality::Poor,
            _ => NetworkQuality::Unknown,
        }
    }
}

impl std::fmt::Display for NetworkQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkQuality::Good => write!(f, "Good"),
            NetworkQuality::Moderate => write!(f, "Moderate"),
            NetworkQuality::Poor => write!(f, "Poor"),
            NetworkQuality::Unknown => write!(f, "Unknown"),
        }
    }
}

/// 일회성 상태 조회기
pub struct StatusProbe {
    api: Arc<dyn NetworkApi>,
    view: Arc<ViewState>,
}

impl StatusProbe {
    pub fn new(api: Arc<dyn NetworkApi>, view: Arc<ViewState>) -> Self {
        Self { api, view }
    }

    /// 한 번 조회하고 뷰에 반영. 뷰가 해제됐으면 결과는 버려진다.
    pub async fn probe(&self) -> (String, NetworkQuality) {
        let (label, quality) = match self.api.fetch_network_stats().await {
            Ok(stats) => match stats.status() {
                Some(status) => (status.to_string(), NetworkQuality::from_status(status)),
                None => (UNKNOWN_STATUS.to_string(), NetworkQuality::Unknown),
            },
            Err(e) => {
                warn!("실시간 상태 조회 실패: {e}");
                (UNKNOWN_STATUS.to_string(), NetworkQuality::Unknown)
            }
        };

        if !self.view.record_status(label.clone(), quality) {
            debug!("뷰 해제 후 상태 조회 결과 폐기");
        }
        (label, quality)
    }
}
