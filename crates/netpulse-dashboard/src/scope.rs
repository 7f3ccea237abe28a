//! 뷰 수명 스코프.
//!
//! 뷰 인스턴스마다 하나씩 만들어 모든 비동기 작업에 넘긴다.
//! 닫혀도 진행 중인 요청을 중단하지 않는다. 작업은 상태를 바꾸기 직전에
//! 스코프를 확인하고, 닫혔으면 결과를 조용히 버린다.

use std::sync::Arc;
use tokio::sync::watch;

/// 협조적 취소 스코프 (복제 가능, 모든 복제본이 같은 상태를 공유)
#[derive(Debug, Clone)]
pub struct ViewScope {
    closed_tx: Arc<watch::Sender<bool>>,
    closed_rx: watch::Receiver<bool>,
}

impl ViewScope {
    /// 열린 스코프 생성
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            closed_tx: Arc::new(tx),
            closed_rx: rx,
        }
    }

    /// 아직 열려 있는지
    pub fn is_active(&self) -> bool {
        !*self.closed_rx.borrow()
    }

    /// 스코프 닫기 (멱등)
    pub fn close(&self) {
        self.closed_tx.send_replace(true);
    }

    /// 닫힐 때까지 대기. 이미 닫혔으면 즉시 반환.
    pub async fn closed(&self) {
        let mut rx = self.closed_rx.clone();
        loop {
            let closed = *rx.borrow_and_update();
            if closed || rx.changed().await.is_err() {
                return;
            }
        }
    }
}

impl Default for ViewScope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn new_scope_is_active() {
        let scope = ViewScope::new();
        assert!(scope.is_active());
    }

    #[test]
    fn close_is_shared_by_clones() {
        let scope = ViewScope::new();
        let clone = scope.clone();
        clone.close();
        assert!(!scope.is_active());
        clone.close();
        assert!(!clone.is_active());
    }

    #[tokio::test]
    async fn closed_resolves_after_close() {
        let scope = ViewScope::new();
        let waiter = {
            let scope = scope.clone();
            tokio::spawn(async move { scope.closed().await })
        };

        tokio::task::yield_now().await;
        scope.close();

        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("closed() should resolve")
            .unwrap();
    }

    #[tokio::test]
    async fn closed_returns_immediately_when_already_closed() {
        let scope = ViewScope::new();
        scope.close();
        tokio_test::assert_ready!(tokio_test::task::spawn(scope.closed()).poll());
    }
}
