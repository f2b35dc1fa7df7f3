//! Configuration for BinIdx
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::record::ValuePolicy;

/// Main configuration for a BinIdx instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for all data files
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── index.json      (sorted index entries)
    ///     ├── main.db         (primary region)
    ///     └── overflow.db     (overflow region)
    pub data_dir: PathBuf,

    /// What to do with values longer than a record can hold
    pub value_policy: ValuePolicy,

    // -------------------------------------------------------------------------
    // Operation Defaults
    // -------------------------------------------------------------------------
    /// Number of records generated by a bulk reset when none is given
    pub bulk_reset_count: usize,

    /// Number of random lookups performed by a benchmark when none is given
    pub benchmark_iterations: usize,

    /// Largest record count a bulk reset accepts
    pub max_reset_count: usize,

    /// Largest iteration count a benchmark accepts
    pub max_benchmark_iterations: usize,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Number of worker threads serving connections
    pub worker_threads: usize,

    /// Connection read timeout (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./binidx_data"),
            value_policy: ValuePolicy::Truncate,
            bulk_reset_count: 10_000,
            benchmark_iterations: 25,
            max_reset_count: 100_000,
            max_benchmark_iterations: 10_000,
            listen_addr: "127.0.0.1:3000".to_string(),
            worker_threads: 4,
            read_timeout_ms: 30_000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all storage)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the over-long value policy
    pub fn value_policy(mut self, policy: ValuePolicy) -> Self {
        self.config.value_policy = policy;
        self
    }

    /// Set the default bulk reset record count
    pub fn bulk_reset_count(mut self, count: usize) -> Self {
        self.config.bulk_reset_count = count;
        self
    }

    /// Set the default benchmark iteration count
    pub fn benchmark_iterations(mut self, iterations: usize) -> Self {
        self.config.benchmark_iterations = iterations;
        self
    }

    /// Set the largest accepted bulk reset count
    pub fn max_reset_count(mut self, count: usize) -> Self {
        self.config.max_reset_count = count;
        self
    }

    /// Set the largest accepted benchmark iteration count
    pub fn max_benchmark_iterations(mut self, iterations: usize) -> Self {
        self.config.max_benchmark_iterations = iterations;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the number of connection worker threads
    pub fn worker_threads(mut self, count: usize) -> Self {
        self.config.worker_threads = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
