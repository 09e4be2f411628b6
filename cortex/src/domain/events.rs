// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Domain events for the pattern memory bounded context

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use super::pattern::PatternId;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CortexEvent {
    /// First successful resolution for a (signature, emotion) key
    PatternDiscovered {
        pattern_id: PatternId,
        signature: String,
        emotion: String,
        categories: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// Another success for an existing key
    PatternReinforced {
        pattern_id: PatternId,
        old_count: u64,
        new_count: u64,
        categories: Vec<String>,
        timestamp: DateTime<Utc>,
    },
}

impl CortexEvent {
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            CortexEvent::PatternDiscovered { timestamp, .. } => *timestamp,
            CortexEvent::PatternReinforced { timestamp, .. } => *timestamp,
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            CortexEvent::PatternDiscovered { .. } => "pattern_discovered",
            CortexEvent::PatternReinforced { .. } => "pattern_reinforced",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_event_serialization() {
        let event = CortexEvent::PatternDiscovered {
            pattern_id: PatternId(Uuid::new_v4()),
            signature: "relax after work".to_string(),
            emotion: "stressed".to_string(),
            categories: vec!["fragrances".to_string()],
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"pattern_discovered\""));
        let deserialized: CortexEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event.event_type(), deserialized.event_type());
    }
}
