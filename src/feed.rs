// 5.0: feed manager. owns the store, the source strategy, and the single
// cached "latest sample" snapshot. readers see a complete sample or nothing.

use crate::config::{FeedConfig, FeedMode};
use crate::sample::IndexSample;
use crate::source::{SampleSource, SourceError};
use crate::store::{HistoryPoint, SampleStore};
use crate::types::{Price, Timestamp};
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, thiserror::Error)]
pub enum FeedError {
    #[error("no index sample cached yet")]
    NotReady,

    #[error("source fetch failed: {0}")]
    Source(#[from] SourceError),
}

#[derive(Debug)]
pub struct FeedManager {
    config: FeedConfig,
    store: SampleStore,
    source: SampleSource,
    cache: Arc<ArcSwapOption<IndexSample>>,
}

// Cloneable read handle onto the snapshot cache. Reads never block the
// manager; the swap is atomic so a reader sees old or new, never a mix.
#[derive(Debug, Clone)]
pub struct FeedReader {
    cache: Arc<ArcSwapOption<IndexSample>>,
}

impl FeedReader {
    pub fn latest(&self) -> Option<IndexSample> {
        self.cache.load_full().map(|sample| *sample)
    }
}

impl FeedManager {
    pub fn new(config: FeedConfig, source: SampleSource) -> Self {
        debug_assert!(
            matches!(
                (config.mode, &source),
                (FeedMode::External, SampleSource::External(_))
                    | (FeedMode::Replay, SampleSource::Replay(_))
                    | (FeedMode::Random, SampleSource::Random(_))
            ),
            "feed mode must match the source strategy"
        );
        Self {
            config,
            store: SampleStore::new(),
            source,
            cache: Arc::new(ArcSwapOption::empty()),
        }
    }

    pub fn reader(&self) -> FeedReader {
        FeedReader {
            cache: Arc::clone(&self.cache),
        }
    }

    pub fn store(&self) -> &SampleStore {
        &self.store
    }

    // 5.1: current cached sample, or NotReady before the first success.
    pub fn current_sample(&self) -> Result<IndexSample, FeedError> {
        self.cache
            .load_full()
            .map(|sample| *sample)
            .ok_or(FeedError::NotReady)
    }

    pub fn current_price(&self) -> Result<Price, FeedError> {
        self.current_sample().map(|sample| sample.value)
    }

    // 5.2: one tick. polls the source, persists every new sample through the
    // idempotent insert, then swaps the cache to the newest one inserted. a
    // source failure leaves store and cache untouched; the next tick retries.
    pub fn refresh(&mut self, now: Timestamp) -> Result<usize, FeedError> {
        let samples = self.source.poll(now)?;

        let mut inserted = 0;
        let mut newest: Option<IndexSample> = None;
        for sample in samples {
            if self.store.insert(sample) {
                inserted += 1;
                if newest.map_or(true, |n| sample.timestamp > n.timestamp) {
                    newest = Some(sample);
                }
            }
        }

        if let Some(sample) = newest {
            self.cache.store(Some(Arc::new(sample)));
        }

        debug!(mode = %self.config.mode, inserted, "index refresh complete");
        Ok(inserted)
    }

    // 5.3: cold/warm start. a non-empty store warms the cache from its newest
    // sample; an empty store backfills (replay) or runs an immediate refresh.
    pub fn bootstrap(&mut self, now: Timestamp) -> Result<(), FeedError> {
        if let Some(latest) = self.store.latest().copied() {
            self.cache.store(Some(Arc::new(latest)));
            debug!(timestamp = latest.timestamp.as_millis(), "cache warmed from store");
            return Ok(());
        }

        if let SampleSource::Replay(replay) = &mut self.source {
            let samples = replay.backfill(
                now,
                self.config.poll_interval_ms as i64,
                self.config.backfill_limit,
            );
            let mut newest: Option<IndexSample> = None;
            for sample in samples {
                if self.store.insert(sample) && newest.map_or(true, |n| sample.timestamp > n.timestamp) {
                    newest = Some(sample);
                }
            }
            if let Some(sample) = newest {
                self.cache.store(Some(Arc::new(sample)));
            }
            info!(points = self.store.len(), "replay backfill complete");
            return Ok(());
        }

        self.refresh(now).map(|_| ())
    }

    // 5.4: history. replay data arrives faster than real time, so it comes
    // back as raw points (most recent history_cap); the live modes bucket the
    // last 24 hours into hourly averages. both ascend by time.
    pub fn history(&self, now: Timestamp) -> Vec<HistoryPoint> {
        match self.config.mode {
            FeedMode::Replay => self
                .store
                .recent(self.config.history_cap)
                .into_iter()
                .map(|sample| HistoryPoint {
                    timestamp: sample.timestamp,
                    value: sample.value.value(),
                })
                .collect(),
            FeedMode::External | FeedMode::Random => {
                self.store.hourly_averages(now.add_hours(-24), now)
            }
        }
    }
}
