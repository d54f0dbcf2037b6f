//! Samples handed to the engine.
//!
//! A [`SampleSet`] bundles the primary array with the arrays of shared
//! sources (e.g. several subplots that share one colorbar). Every array is an
//! immutable `Arc<[f64]>` snapshot, so the engine never reaches back into a
//! sibling while it computes.

use chrono::NaiveDateTime;
use std::sync::{Arc, PoisonError, RwLock};

/// Anything that can hand out an immutable snapshot of its current values
pub trait SampleSource: Send + Sync {
    /// Snapshot of the values at the time of the call
    fn snapshot(&self) -> Arc<[f64]>;
}

impl SampleSource for Arc<[f64]> {
    fn snapshot(&self) -> Arc<[f64]> {
        Arc::clone(self)
    }
}

impl SampleSource for Vec<f64> {
    fn snapshot(&self) -> Arc<[f64]> {
        Arc::from(self.as_slice())
    }
}

/// A cached array owned by a sibling computation that may be recomputed
///
/// Recomputation takes the write lock through [`SharedArray::replace`];
/// snapshots hold the read lock only while copying. The guard is released on
/// every exit path, so reading a sibling never leaves it locked.
#[derive(Debug, Clone, Default)]
pub struct SharedArray {
    inner: Arc<RwLock<Vec<f64>>>,
}

impl SharedArray {
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(values)),
        }
    }

    /// Replace the cached values (i.e. the sibling recomputed its array)
    pub fn replace(&self, values: Vec<f64>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = values;
    }
}

impl SampleSource for SharedArray {
    fn snapshot(&self) -> Arc<[f64]> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        Arc::from(guard.as_slice())
    }
}

/// Primary sample plus shared samples for one computation
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    primary: Arc<[f64]>,
    shared: Vec<Arc<[f64]>>,
    dates: Option<Arc<[NaiveDateTime]>>,
    bounds: Option<Arc<[f64]>>,
}

impl SampleSet {
    /// Create a sample set from the primary values
    pub fn new(primary: impl Into<Arc<[f64]>>) -> Self {
        Self {
            primary: primary.into(),
            ..Default::default()
        }
    }

    /// Create a sample set from a snapshot of `source`
    pub fn from_source(source: &dyn SampleSource) -> Self {
        Self::new(source.snapshot())
    }

    /// Add the values of a shared source
    pub fn with_shared(mut self, values: impl Into<Arc<[f64]>>) -> Self {
        self.shared.push(values.into());
        self
    }

    /// Add a snapshot of a shared source
    pub fn with_shared_source(self, source: &dyn SampleSource) -> Self {
        self.with_shared(source.snapshot())
    }

    /// Attach the datetime coordinate used by calendar methods
    pub fn with_dates(mut self, dates: impl Into<Arc<[NaiveDateTime]>>) -> Self {
        self.dates = Some(dates.into());
        self
    }

    /// Attach previously computed colorbar bounds (for `bounds`/`midbounds`)
    pub fn with_bounds(mut self, bounds: impl Into<Arc<[f64]>>) -> Self {
        self.bounds = Some(bounds.into());
        self
    }

    pub fn primary(&self) -> &[f64] {
        &self.primary
    }

    pub fn shared(&self) -> impl Iterator<Item = &[f64]> {
        self.shared.iter().map(|a| a.as_ref())
    }

    pub fn has_shared(&self) -> bool {
        !self.shared.is_empty()
    }

    pub fn dates(&self) -> Option<&[NaiveDateTime]> {
        self.dates.as_deref()
    }

    pub fn bounds(&self) -> Option<&[f64]> {
        self.bounds.as_deref()
    }

    /// The primary array followed by all shared arrays
    pub fn arrays(&self) -> impl Iterator<Item = &[f64]> {
        std::iter::once(self.primary()).chain(self.shared())
    }

    /// Finite values of the primary array
    pub fn finite_primary(&self) -> Vec<f64> {
        self.primary.iter().copied().filter(|v| v.is_finite()).collect()
    }

    /// Finite values of all arrays, concatenated
    pub fn finite_values(&self) -> Vec<f64> {
        self.arrays()
            .flat_map(|a| a.iter().copied())
            .filter(|v| v.is_finite())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_filtering() {
        let samples = SampleSet::new(vec![1.0, f64::NAN, 3.0, f64::INFINITY])
            .with_shared(vec![f64::NEG_INFINITY, -2.0]);
        assert_eq!(samples.finite_primary(), vec![1.0, 3.0]);
        assert_eq!(samples.finite_values(), vec![1.0, 3.0, -2.0]);
        assert_eq!(samples.arrays().count(), 2);
    }

    #[test]
    fn test_shared_array_snapshot_is_independent() {
        let sibling = SharedArray::new(vec![1.0, 2.0]);
        let samples = SampleSet::new(vec![0.0]).with_shared_source(&sibling);

        sibling.replace(vec![100.0]);

        let shared: Vec<&[f64]> = samples.shared().collect();
        assert_eq!(shared, vec![&[1.0, 2.0][..]]);
        assert_eq!(sibling.snapshot().as_ref(), &[100.0]);
    }

    #[test]
    fn test_snapshot_after_poisoned_writer() {
        let sibling = SharedArray::new(vec![4.0]);
        let clone = sibling.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.inner.write().unwrap();
            panic!("recomputation failed");
        })
        .join();
        assert_eq!(sibling.snapshot().as_ref(), &[4.0]);
    }
}
