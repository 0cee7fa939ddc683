//! `FeedEnvelope`, the canonical normalized payload every feed adapter
//! returns.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedEnvelope {
    pub data: Value,
    pub source_timestamp: DateTime<Utc>,
    pub quality_flags: BTreeSet<String>,
    pub warnings: Vec<String>,
    pub publish_time: DateTime<Utc>,
}

impl FeedEnvelope {
    pub fn new(data: Value, source_timestamp: DateTime<Utc>, publish_time: DateTime<Utc>) -> Self {
        Self {
            data,
            source_timestamp,
            quality_flags: BTreeSet::new(),
            warnings: Vec::new(),
            publish_time,
        }
    }

    pub fn with_flag(mut self, flag: impl Into<String>) -> Self {
        self.quality_flags.insert(flag.into());
        self
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.quality_flags.contains(flag)
    }

    /// A degraded, data-free envelope returned on an as-of miss or an
    /// adapter failure.
    pub fn neutral(at: DateTime<Utc>, flag: &str, warning: impl Into<String>) -> Self {
        Self {
            data: Value::Null,
            source_timestamp: at,
            quality_flags: BTreeSet::from([flag.to_string()]),
            warnings: vec![warning.into()],
            publish_time: at,
        }
    }
}
