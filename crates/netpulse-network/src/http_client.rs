//! HTTP REST API 클라이언트.
//!
//! `NetworkApi` 포트 구현. 재시도는 하지 않는다. 폴링 루프가 다음 주기에
//! 다시 요청하고, 최적화 요청은 멱등이 아니기 때문이다.

use async_trait::async_trait;
use netpulse_core::error::CoreError;
use netpulse_core::models::optimization::OptimizeResponse;
use netpulse_core::models::telemetry::NetworkStatsResponse;
use netpulse_core::ports::api_client::NetworkApi;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// 텔레메트리 경로
const NETWORK_STATS_PATH: &str = "/api/network-stats/";

/// 최적화 경로
const OPTIMIZE_NETWORK_PATH: &str = "/api/optimize-network/";

/// 백엔드 에러 본문 (`{"error": "..."}`)
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// 에러 본문에서 사람이 읽을 메시지 추출
fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// REST API 클라이언트: `NetworkApi` 포트 구현
pub struct HttpNetworkClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNetworkClient {
    /// 새 HTTP 클라이언트 생성
    ///
    /// `timeout`이 None이면 전송 계층 기본값(무제한)을 그대로 쓴다.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, CoreError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| CoreError::Network(format!("HTTP 클라이언트 빌드 실패: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// 기본 URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 응답 상태 코드 확인 및 에러 매핑
    async fn check_response(
        &self,
        resp: reqwest::Response,
    ) -> Result<reqwest::Response, CoreError> {
        let status = resp.status();

        if status.is_success() {
            return Ok(resp);
        }

        let status_code = status.as_u16();
        let text = resp.text().await.unwrap_or_else(|e| {
            warn!("응답 본문 읽기 실패: {e}");
            String::new()
        });
        let message = error_message(&text);

        match status_code {
            503 => Err(CoreError::ServiceUnavailable(message)),
            _ => Err(CoreError::Http {
                status: status_code,
                message,
            }),
        }
    }

    /// 본문을 JSON으로 디코딩
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, CoreError> {
        let text = resp
            .text()
            .await
            .map_err(|e| CoreError::Network(format!("응답 본문 수신 실패: {e}")))?;
        serde_json::from_str(&text).map_err(|e| CoreError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl NetworkApi for HttpNetworkClient {
    async fn fetch_network_stats(&self) -> Result<NetworkStatsResponse, CoreError> {
        debug!("텔레메트리 요청: {}", NETWORK_STATS_PATH);

        let resp = self
            .client
            .get(self.url(NETWORK_STATS_PATH))
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("텔레메트리 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let stats: NetworkStatsResponse = Self::decode(resp).await?;
        debug!(
            "텔레메트리 수신: down={:?} up={:?} ping={:?} status={:?}",
            stats.download_speed, stats.upload_speed, stats.ping, stats.status
        );
        Ok(stats)
    }

    async fn optimize_network(&self) -> Result<OptimizeResponse, CoreError> {
        debug!("최적화 요청: {}", OPTIMIZE_NETWORK_PATH);

        let resp = self
            .client
            .post(self.url(OPTIMIZE_NETWORK_PATH))
            .send()
            .await
            .map_err(|e| CoreError::Network(format!("최적화 요청 실패: {e}")))?;

        let resp = self.check_response(resp).await?;
        let result: OptimizeResponse = Self::decode(resp).await?;
        debug!(
            "최적화 응답 수신: efficiency={:?}, 로그 {}줄",
            result.efficiency,
            result.optimization_log.as_ref().map_or(0, Vec::len)
        );
        Ok(result)
    }
}
