//! NETPULSE 핵심 에러 타입.
//!
//! 어댑터 crate는 실패를 `CoreError`로 매핑해서 포트 경계 밖으로 내보낸다.

use thiserror::Error;

/// 코어 레이어 에러.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 네트워크 에러 (연결 실패, 전송 중단)
    #[error("네트워크 에러: {0}")]
    Network(String),

    /// 2xx 이외의 HTTP 응답
    #[error("API 에러 ({status}): {message}")]
    Http {
        /// HTTP 상태 코드
        status: u16,
        /// 서버가 보낸 에러 메시지 (없으면 본문)
        message: String,
    },

    /// 서비스 일시 불가 (503)
    #[error("서비스 일시 불가: {0}")]
    ServiceUnavailable(String),

    /// 응답 본문이 기대한 형태가 아님
    #[error("응답 파싱 실패: {0}")]
    InvalidResponse(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),
}

impl CoreError {
    /// 백엔드 측 일시적 실패인지 (폴링 루프는 어떤 에러든 계속 진행한다)
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoreError::Network(_) | CoreError::ServiceUnavailable(_)
        ) || matches!(self, CoreError::Http { status, .. } if *status >= 500)
    }
}
