//! 네트워크 백엔드 API 포트.
//!
//! 구현: `netpulse-network` crate (reqwest)

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::optimization::OptimizeResponse;
use crate::models::telemetry::NetworkStatsResponse;

/// 네트워크 백엔드 클라이언트
///
/// 두 호출 모두 명시적 타임아웃이 없으며, 호출자는 진행 중인 요청을
/// 중단하지 않는다. 결과를 버릴지는 호출자가 결정한다.
#[async_trait]
pub trait NetworkApi: Send + Sync {
    /// 실시간 텔레메트리 조회 (`GET /api/network-stats/`)
    async fn fetch_network_stats(&self) -> Result<NetworkStatsResponse, CoreError>;

    /// 네트워크 최적화 실행 (`POST /api/optimize-network/`)
    async fn optimize_network(&self) -> Result<OptimizeResponse, CoreError>;
}
