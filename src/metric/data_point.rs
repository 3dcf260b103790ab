use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::tag::TagSet;

/// State reported by an availability metric.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Availability {
    Up,
    Down,
    Unknown,
    Admin,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
            Self::Unknown => "UNKNOWN",
            Self::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The typed value carried by a data point.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Double(f64),
    Count(u64),
    Availability(Availability),
    String(String),
}

/// A single timestamped value, with optional point-level tags.
#[derive(Clone, Debug, PartialEq)]
pub struct DataPoint {
    timestamp: u64,
    value: Value,
    tags: TagSet,
}

impl DataPoint {
    pub fn new(timestamp: u64, value: Value, tags: TagSet) -> Self {
        DataPoint {
            timestamp,
            value,
            tags,
        }
    }

    /// Creates a data point stamped with the current wall-clock time.
    pub fn now(value: Value, tags: TagSet) -> Self {
        DataPoint::new(epoch_millis(), value, tags)
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn tags(&self) -> &TagSet {
        &self.tags
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
