//! Configuration types for stream operations

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which kind of executor a pool provider should hand out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutorKind {
    /// Run the work inline on the consuming task
    #[default]
    Sequential,
    /// Run each task on the tokio blocking thread pool (CPU-bound work)
    Threads,
    /// Run each task as a regular tokio task
    Tasks,
}

/// Per-call concurrency configuration for map/filter/any/all
///
/// The stream engine never interprets these fields itself; they are handed
/// to the pool provider, which decides whether the call runs sequentially.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyOptions {
    pub executor: ExecutorKind,
    /// Number of workers; `None` lets the provider pick
    pub workers: Option<usize>,
    /// Emit results in input order instead of completion order
    pub ordered: bool,
    /// Per-task time limit
    #[serde(with = "optional_millis")]
    pub timeout: Option<Duration>,
}

impl Default for ConcurrencyOptions {
    fn default() -> Self {
        Self {
            executor: ExecutorKind::Sequential,
            workers: None,
            ordered: false,
            timeout: None,
        }
    }
}

impl ConcurrencyOptions {
    pub fn sequential() -> Self {
        Self::default()
    }

    pub fn threads(workers: usize) -> Self {
        Self {
            executor: ExecutorKind::Threads,
            workers: Some(workers),
            ..Self::default()
        }
    }

    pub fn tasks(workers: usize) -> Self {
        Self {
            executor: ExecutorKind::Tasks,
            workers: Some(workers),
            ..Self::default()
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn ordered(mut self) -> Self {
        self.ordered = true;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load options from a JSON object such as `{"executor": "threads", "workers": 4}`
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// Timeouts are written as whole milliseconds in host configuration files.
mod optional_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(value: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
