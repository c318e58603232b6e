//! Ping latency classification.

use serde::{Deserialize, Serialize};

/// Coarse quality bucket for a round-trip latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PingQuality {
    Good,
    Fair,
    Poor,
    Unknown,
}

impl PingQuality {
    /// Classify a latency in milliseconds.
    #[must_use]
    pub fn classify(ping_ms: Option<f64>) -> Self {
        match ping_ms {
            None => Self::Unknown,
            Some(ms) if ms < 100.0 => Self::Good,
            Some(ms) if ms < 300.0 => Self::Fair,
            Some(_) => Self::Poor,
        }
    }

    /// CSS colour used for the ping cell.
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            Self::Good => "green",
            Self::Fair => "yellow",
            Self::Poor => "red",
            Self::Unknown => "gray",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_classify_latency_buckets() {
        assert_eq!(PingQuality::classify(Some(12.0)), PingQuality::Good);
        assert_eq!(PingQuality::classify(Some(100.0)), PingQuality::Fair);
        assert_eq!(PingQuality::classify(Some(299.9)), PingQuality::Fair);
        assert_eq!(PingQuality::classify(Some(300.0)), PingQuality::Poor);
        assert_eq!(PingQuality::classify(None), PingQuality::Unknown);
    }

    #[test]
    fn should_map_unknown_to_gray() {
        assert_eq!(PingQuality::Unknown.color(), "gray");
    }
}
