//! Memoization of aggregation results by input content

use crate::core::aggregate::{aggregate, AnalyticsConfig};
use crate::core::bundle::AggregationBundle;
use crate::core::error::AnalyticsResult;
use crate::core::models::CourseRecord;
use crate::debug;
use std::collections::hash_map::DefaultHasher;
use std::collections::{HashMap, VecDeque};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Mutex, PoisonError};

/// Entries kept unless configured otherwise
pub const DEFAULT_CAPACITY: usize = 32;

/// Content hash of a record snapshot plus the engine options.
///
/// Each record is hashed on its own and the per-record digests are sorted
/// before combining, so any permutation of the same records yields the same
/// key.
#[must_use]
pub fn snapshot_key(records: &[CourseRecord], config: &AnalyticsConfig) -> u64 {
    let mut digests: Vec<u64> = records.iter().map(record_digest).collect();
    digests.sort_unstable();

    let mut hasher = DefaultHasher::new();
    digests.hash(&mut hasher);
    config.degree_credit_requirement.to_bits().hash(&mut hasher);
    config.grade_bucket_granularity.hash(&mut hasher);
    config.min_earning_points.to_bits().hash(&mut hasher);
    config.invalid_grade_policy.hash(&mut hasher);
    hasher.finish()
}

fn record_digest(record: &CourseRecord) -> u64 {
    let mut hasher = DefaultHasher::new();
    record.id.hash(&mut hasher);
    record.course_code.hash(&mut hasher);
    record.course_name.hash(&mut hasher);
    record.department.hash(&mut hasher);
    record.credit_hours.to_bits().hash(&mut hasher);
    record.grade.hash(&mut hasher);
    record.grade_points.map(f64::to_bits).hash(&mut hasher);
    record.semester.hash(&mut hasher);
    record.year.hash(&mut hasher);
    record.status.hash(&mut hasher);
    hasher.finish()
}

struct CacheState {
    entries: HashMap<u64, Arc<AggregationBundle>>,
    order: VecDeque<u64>,
}

/// Thread-safe cache of computed bundles, oldest entry evicted first
pub struct BundleCache {
    capacity: usize,
    state: Mutex<CacheState>,
}

impl Default for BundleCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl BundleCache {
    /// Create a cache holding at most `capacity` bundles (at least one)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            state: Mutex::new(CacheState {
                entries: HashMap::with_capacity(capacity),
                order: VecDeque::with_capacity(capacity),
            }),
        }
    }

    /// Return the cached bundle for this snapshot, computing it on a miss.
    ///
    /// The lock is not held while aggregating; two callers racing on the same
    /// miss both compute and the later insert is discarded.
    ///
    /// # Errors
    /// Propagates aggregation errors; failures are not cached
    pub fn get_or_compute(
        &self,
        records: &[CourseRecord],
        config: &AnalyticsConfig,
    ) -> AnalyticsResult<Arc<AggregationBundle>> {
        let key = snapshot_key(records, config);
        if let Some(hit) = self.lock().entries.get(&key) {
            debug!("bundle cache hit for {key:016x}");
            return Ok(Arc::clone(hit));
        }

        let bundle = Arc::new(aggregate(records, config)?);

        let mut state = self.lock();
        if let Some(existing) = state.entries.get(&key) {
            return Ok(Arc::clone(existing));
        }
        while state.order.len() >= self.capacity {
            if let Some(oldest) = state.order.pop_front() {
                state.entries.remove(&oldest);
            }
        }
        state.order.push_back(key);
        state.entries.insert(key, Arc::clone(&bundle));
        debug!("bundle cache stored {key:016x} ({} entries)", state.entries.len());
        Ok(bundle)
    }

    /// Number of cached bundles
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether the cache is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached bundle
    pub fn clear(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.order.clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
