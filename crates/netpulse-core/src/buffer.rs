//! 차트용 시계열 버퍼.
//!
//! 고정 용량 FIFO. `append`는 새 버퍼를 반환하며 기존 버퍼는 그대로 둔다.
//! 폴링 한 주기마다 표시용 스냅샷이 새로 만들어진다.

use std::collections::VecDeque;

use crate::models::telemetry::StatSample;

/// 기본 버퍼 용량 (차트 포인트 수)
pub const DEFAULT_CAPACITY: usize = 20;

/// 고정 용량 시계열 버퍼 (FIFO, 최대 크기 제한)
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeriesBuffer {
    samples: VecDeque<StatSample>,
    capacity: usize,
}

impl TimeSeriesBuffer {
    /// 새 버퍼 생성. 용량 0은 1로 올린다.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// 샘플을 덧붙인 새 버퍼 반환. 넘치면 가장 오래된 샘플부터 버린다.
    #[must_use]
    pub fn append(&self, sample: StatSample) -> Self {
        let mut next = self.clone();
        if next.samples.len() >= next.capacity {
            next.samples.pop_front();
        }
        next.samples.push_back(sample);
        next
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 도착 순서대로 순회
    pub fn iter(&self) -> impl Iterator<Item = &StatSample> {
        self.samples.iter()
    }

    /// 가장 최근 샘플
    pub fn latest(&self) -> Option<&StatSample> {
        self.samples.back()
    }

    /// 값만 도착 순서대로
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.value).collect()
    }
}

impl Default for TimeSeriesBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
