//! # netpulse-network
//!
//! 네트워크 백엔드 HTTP 어댑터.
//! `netpulse-core`의 `NetworkApi` 포트를 reqwest로 구현한다.
//!
//! ```rust,ignore
//! use netpulse_network::http_client::HttpNetworkClient;
//!
//! let client = HttpNetworkClient::new("http://127.0.0.1:8000", None)?;
//! let stats = client.fetch_network_stats().await?;
//! ```

pub mod http_client;
