//! NETPULSE 도메인 모델.
//!
//! 백엔드 응답(와이어 타입)과 뷰가 소비하는 도메인 값을 정의한다.

pub mod optimization;
pub mod telemetry;
