use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Raw input records
// ---------------------------------------------------------------------------

/// One item of a raw event batch as written by the CI test harness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEvent {
    pub level: String,
    pub locator: String,
    pub message: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

/// Contents of one `*.json` artifact inside a run directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawEventBatch {
    #[serde(default)]
    pub items: Vec<RawEvent>,
}

impl RawEventBatch {
    pub fn extend(&mut self, other: RawEventBatch) {
        self.items.extend(other.items);
    }
}

// ---------------------------------------------------------------------------
// EventFilter
// ---------------------------------------------------------------------------

/// Selects the raw events that describe an endpoint disruption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFilter {
    #[serde(default = "default_locator_contains")]
    pub locator_contains: String,
    #[serde(default = "default_message_contains")]
    pub message_contains: String,
}

fn default_locator_contains() -> String {
    "disruption".to_string()
}

fn default_message_contains() -> String {
    "stopped responding".to_string()
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            locator_contains: default_locator_contains(),
            message_contains: default_message_contains(),
        }
    }
}

impl EventFilter {
    pub fn matches(&self, event: &RawEvent) -> bool {
        event.locator.contains(&self.locator_contains)
            && event.message.contains(&self.message_contains)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(locator: &str, message: &str) -> RawEvent {
        let t = "2022-07-05T10:00:00Z".parse().unwrap();
        RawEvent {
            level: "Error".to_string(),
            locator: locator.to_string(),
            message: message.to_string(),
            from: t,
            to: t,
        }
    }

    #[test]
    fn default_filter_requires_both_needles() {
        let f = EventFilter::default();
        assert!(f.matches(&raw(
            "disruption/kube-api connection/new",
            "kube-apiserver-new-connection stopped responding to GET requests"
        )));
        assert!(!f.matches(&raw(
            "disruption/kube-api connection/new",
            "kube-apiserver-new-connection started responding"
        )));
        assert!(!f.matches(&raw("ns/openshift-etcd pod/etcd-0", "stopped responding")));
    }

    #[test]
    fn batch_parses_harness_format() {
        let json = r#"{"items": [{
            "level": "Error",
            "locator": "disruption/image-registry route/new",
            "message": "image-registry-new-connection stopped responding to GET requests",
            "from": "2022-07-05T10:00:00Z",
            "to": "2022-07-05T10:00:03.5+00:00"
        }]}"#;
        let batch: RawEventBatch = serde_json::from_str(json).unwrap();
        assert_eq!(batch.items.len(), 1);
        assert_eq!(
            (batch.items[0].to - batch.items[0].from).num_milliseconds(),
            3500
        );
    }

    #[test]
    fn batch_without_items_is_empty() {
        let batch: RawEventBatch = serde_json::from_str("{}").unwrap();
        assert!(batch.items.is_empty());
    }
}
