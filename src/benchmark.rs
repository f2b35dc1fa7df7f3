//! Benchmark Module
//!
//! Measures lookup cost as the number of binary-search comparisons, not
//! wall-clock time.
//!
//! A run samples random existing keys (with replacement), searches each one
//! through the engine and aggregates the comparison counts.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::engine::Engine;
use crate::error::{BinIdxError, Result};

/// Comparison count for one sampled key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchmarkSample {
    pub key: i32,
    pub comparisons: u32,
}

/// Aggregate over a benchmark run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// Mean comparisons per lookup (0 for an empty run)
    pub average: f64,

    /// Sum of comparisons across all samples
    pub total_comparisons: u64,

    /// Per-lookup detail, in sampling order
    pub results: Vec<BenchmarkSample>,
}

/// Run `iterations` random lookups against `engine`
pub fn run<R: Rng>(engine: &Engine, iterations: usize, rng: &mut R) -> Result<BenchmarkReport> {
    let entries = engine.get_all_index();
    if entries.is_empty() {
        return Err(BinIdxError::EmptyStore);
    }

    let mut results = Vec::with_capacity(iterations);
    let mut total_comparisons = 0u64;

    for _ in 0..iterations {
        let key = entries[rng.random_range(0..entries.len())].key;
        let found = engine.search(key)?;
        total_comparisons += u64::from(found.comparisons);
        results.push(BenchmarkSample {
            key,
            comparisons: found.comparisons,
        });
    }

    let average = if iterations == 0 {
        0.0
    } else {
        total_comparisons as f64 / iterations as f64
    };

    tracing::debug!(
        "Benchmark: {} lookups over {} entries, average {:.2} comparisons",
        iterations,
        entries.len(),
        average
    );

    Ok(BenchmarkReport {
        average,
        total_comparisons,
        results,
    })
}
