// 3.0: sample store. append-only series of index samples keyed by timestamp.
// inserts are idempotent (duplicate timestamp = no-op), reads come back time-ascending.

use crate::sample::IndexSample;
use crate::types::Timestamp;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

// One point of a history query: bucketed averages are fractional, so the
// value is a raw Decimal rather than a Price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub timestamp: Timestamp,
    pub value: Decimal,
}

#[derive(Debug, Clone, Default)]
pub struct SampleStore {
    samples: BTreeMap<i64, IndexSample>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self {
            samples: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    // 3.1: the INSERT OR IGNORE. false means a sample already held that timestamp.
    pub fn insert(&mut self, sample: IndexSample) -> bool {
        match self.samples.entry(sample.timestamp.as_millis()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(sample);
                true
            }
        }
    }

    pub fn latest(&self) -> Option<&IndexSample> {
        self.samples.values().next_back()
    }

    pub fn get(&self, timestamp: Timestamp) -> Option<&IndexSample> {
        self.samples.get(&timestamp.as_millis())
    }

    // most recent n samples, returned ascending by time
    pub fn recent(&self, n: usize) -> Vec<IndexSample> {
        let mut points: Vec<IndexSample> = self.samples.values().rev().take(n).copied().collect();
        points.reverse();
        points
    }

    // all samples with from <= timestamp <= to, ascending
    pub fn range(&self, from: Timestamp, to: Timestamp) -> Vec<IndexSample> {
        self.samples
            .range(from.as_millis()..=to.as_millis())
            .map(|(_, s)| *s)
            .collect()
    }

    // 3.2: calendar-hour buckets over [from, to], each the mean of its samples' values.
    // ascending by bucket start. empty hours produce no point.
    pub fn hourly_averages(&self, from: Timestamp, to: Timestamp) -> Vec<HistoryPoint> {
        let mut points: Vec<HistoryPoint> = Vec::new();
        let mut bucket: Option<(Timestamp, Decimal, u32)> = None;

        for (_, sample) in self.samples.range(from.as_millis()..=to.as_millis()) {
            let start = sample.timestamp.hour_bucket();
            match &mut bucket {
                Some((current, sum, count)) if *current == start => {
                    *sum += sample.value.value();
                    *count += 1;
                }
                _ => {
                    if let Some((ts, sum, count)) = bucket.take() {
                        points.push(HistoryPoint {
                            timestamp: ts,
                            value: sum / Decimal::from(count),
                        });
                    }
                    bucket = Some((start, sample.value.value(), 1));
                }
            }
        }

        if let Some((ts, sum, count)) = bucket {
            points.push(HistoryPoint {
                timestamp: ts,
                value: sum / Decimal::from(count),
            });
        }

        points
    }
}
