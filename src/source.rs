// 4.0: sample sources. exactly one strategy feeds the store: an external
// measurement service, a scripted dataset replay, or a synthetic random draw.

use crate::sample::IndexSample;
use crate::types::Timestamp;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// 4.1: the external collaborator. the real implementation talks to the remote
// air-quality service; tests and demos script a mock.
pub trait MeasurementClient: Send {
    fn fetch_readings(&mut self) -> Result<Vec<ExternalReading>, MeasurementError>;
}

// One station reading as the measurement service reports it. Sub-readings may
// be zero/absent; derivation filters those out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReading {
    pub sub_a: Decimal,
    pub sub_b: Decimal,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum MeasurementError {
    #[error("measurement request failed: {0}")]
    Request(String),

    #[error("malformed measurement response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Measurement(#[from] MeasurementError),

    #[error("measurement service returned no readings")]
    EmptyReadingSet,
}

// Scripted mock for tests and demos. Responses play back in push order; a
// drained mock reports a request failure.
#[derive(Debug, Default)]
pub struct MockMeasurementClient {
    responses: std::collections::VecDeque<Result<Vec<ExternalReading>, MeasurementError>>,
}

impl MockMeasurementClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_readings(&mut self, readings: Vec<ExternalReading>) {
        self.responses.push_back(Ok(readings));
    }

    pub fn push_failure(&mut self, error: MeasurementError) {
        self.responses.push_back(Err(error));
    }
}

impl MeasurementClient for MockMeasurementClient {
    fn fetch_readings(&mut self) -> Result<Vec<ExternalReading>, MeasurementError> {
        self.responses
            .pop_front()
            .unwrap_or_else(|| Err(MeasurementError::Request("no scripted response".to_string())))
    }
}

// 4.2: scripted replay. one dataset entry in stored sub-readings; the sample
// value is always re-derived, never trusted from the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEntry {
    pub sub_a: Decimal,
    pub sub_b: Decimal,
}

// Walks the dataset with a per-instance cursor and wraps to entry 0 after the
// last one, so a finite dataset backs an infinite sequence. Entries whose
// derivation is undefined are dropped at load.
#[derive(Debug, Clone)]
pub struct ReplaySource {
    dataset: Vec<ReplayEntry>,
    cursor: usize,
}

impl ReplaySource {
    pub fn new(entries: Vec<ReplayEntry>) -> Self {
        let dataset = entries
            .into_iter()
            .filter(|e| crate::sample::composite_index(e.sub_a, e.sub_b).is_some())
            .collect();
        Self { dataset, cursor: 0 }
    }

    pub fn len(&self) -> usize {
        self.dataset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    // emits the entry at the cursor stamped with `now`, then advances.
    pub fn next_sample(&mut self, now: Timestamp) -> Option<IndexSample> {
        if self.dataset.is_empty() {
            return None;
        }
        let entry = self.dataset[self.cursor];
        self.cursor = (self.cursor + 1) % self.dataset.len();
        IndexSample::derive(entry.sub_a, entry.sub_b, now)
    }

    // 4.3: backfill for a cold start. lays out the first min(limit, len)
    // entries in dataset order, spaced `interval_ms` apart and ending at
    // `now`, so a fresh system has immediate history. the cursor continues
    // where the backfill left off.
    pub fn backfill(&mut self, now: Timestamp, interval_ms: i64, limit: usize) -> Vec<IndexSample> {
        let count = limit.min(self.dataset.len());
        let mut samples = Vec::with_capacity(count);
        for i in 0..count {
            let entry = self.dataset[i];
            let ts = now.add_millis(-((count - 1 - i) as i64) * interval_ms);
            if let Some(sample) = IndexSample::derive(entry.sub_a, entry.sub_b, ts) {
                samples.push(sample);
            }
        }
        self.cursor = if self.dataset.is_empty() {
            0
        } else {
            count % self.dataset.len()
        };
        samples
    }
}

// 4.4: synthetic random draws. sub-A in [10,40), sub-B in [20,70), both at
// one-decimal precision so the Decimal math stays exact.
#[derive(Debug)]
pub struct RandomSource {
    rng: StdRng,
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_sample(&mut self, now: Timestamp) -> Option<IndexSample> {
        let sub_a = Decimal::new(self.rng.gen_range(100..400), 1);
        let sub_b = Decimal::new(self.rng.gen_range(200..700), 1);
        // both readings positive, so the derivation is always defined
        IndexSample::derive(sub_a, sub_b, now)
    }
}

// 4.5: the strategy selector. a feed manager owns exactly one of these.
pub enum SampleSource {
    External(Box<dyn MeasurementClient>),
    Replay(ReplaySource),
    Random(RandomSource),
}

impl std::fmt::Debug for SampleSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleSource::External(_) => write!(f, "SampleSource::External"),
            SampleSource::Replay(r) => write!(f, "SampleSource::Replay(len={})", r.len()),
            SampleSource::Random(_) => write!(f, "SampleSource::Random"),
        }
    }
}

impl SampleSource {
    pub fn external(client: impl MeasurementClient + 'static) -> Self {
        SampleSource::External(Box::new(client))
    }

    pub fn replay(entries: Vec<ReplayEntry>) -> Self {
        SampleSource::Replay(ReplaySource::new(entries))
    }

    pub fn random() -> Self {
        SampleSource::Random(RandomSource::new())
    }

    pub fn seeded_random(seed: u64) -> Self {
        SampleSource::Random(RandomSource::seeded(seed))
    }

    // one tick's worth of new samples. external mode may return many (one per
    // station), replay and random return exactly one. an empty external
    // reading set is an error; readings that fail derivation are skipped.
    pub fn poll(&mut self, now: Timestamp) -> Result<Vec<IndexSample>, SourceError> {
        match self {
            SampleSource::External(client) => {
                let readings = client.fetch_readings()?;
                if readings.is_empty() {
                    return Err(SourceError::EmptyReadingSet);
                }
                Ok(readings
                    .into_iter()
                    .filter_map(|r| IndexSample::derive(r.sub_a, r.sub_b, r.timestamp))
                    .collect())
            }
            SampleSource::Replay(replay) => Ok(replay.next_sample(now).into_iter().collect()),
            SampleSource::Random(random) => Ok(random.next_sample(now).into_iter().collect()),
        }
    }
}
