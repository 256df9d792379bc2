use crate::error::{DisruptionError, Result};
use crate::event::{EventFilter, RawEvent, RawEventBatch};
use crate::merge::{merge_events, seconds_between, Event};
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Run {
    pub id: String,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
    pub duration_sec: f64,
    /// Keyed by locator; sorted so identical inputs serialize identically.
    pub events: BTreeMap<String, Event>,
}

impl Run {
    /// Overlapping raw records merged across all locators of this run.
    pub fn overlap_count(&self) -> usize {
        self.events.values().map(|e| e.overlaps).sum()
    }

    pub fn total_disruption_sec(&self) -> f64 {
        self.events.values().map(|e| e.total_duration_sec).sum()
    }
}

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

/// Build a [`Run`] from one run directory of the raw artifact tree.
///
/// `id` is supplied by the caller; it is the run directory name.
pub fn assemble_run(dir: &Path, id: &str, filter: &EventFilter) -> Result<Run> {
    let started = read_marker(&dir.join(paths::STARTED_MARKER))?;
    let finished = read_marker(&dir.join(paths::FINISHED_MARKER))?;
    if finished < started {
        return Err(DisruptionError::CorruptTiming {
            run: dir.to_path_buf(),
            started,
            finished,
        });
    }

    let batch = read_batches(dir)?;
    let mut events = group_events(&batch.items, filter);
    for event in events.values_mut() {
        event.fill_offsets(started);
        if event.overlaps > 0 {
            tracing::warn!(
                run = id,
                locator = %event.locator,
                overlaps = event.overlaps,
                "overlapping disruption records merged; raw data reports the same outage more than once"
            );
        }
    }

    tracing::debug!(
        run = id,
        raw = batch.items.len(),
        locators = events.len(),
        "assembled run"
    );

    Ok(Run {
        id: id.to_string(),
        started,
        finished,
        duration_sec: seconds_between(started, finished),
        events,
    })
}

/// Filter, partition by locator and merge each partition.
///
/// Partitions keep arrival order; merging sorts internally.
pub fn group_events(items: &[RawEvent], filter: &EventFilter) -> BTreeMap<String, Event> {
    let mut groups: BTreeMap<&str, Vec<&RawEvent>> = BTreeMap::new();
    for item in items.iter().filter(|e| filter.matches(e)) {
        groups.entry(item.locator.as_str()).or_default().push(item);
    }

    groups
        .into_iter()
        .filter_map(|(locator, group)| merge_events(&group).map(|e| (locator.to_string(), e)))
        .collect()
}

fn read_marker(path: &Path) -> Result<DateTime<Utc>> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DisruptionError::MissingMarker {
                path: path.to_path_buf(),
                reason: "file not found".to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };
    let text = std::str::from_utf8(&data).map_err(|e| DisruptionError::MissingMarker {
        path: path.to_path_buf(),
        reason: format!("not UTF-8 text: {e}"),
    })?;
    text.trim()
        .parse::<DateTime<Utc>>()
        .map_err(|e| DisruptionError::MissingMarker {
            path: path.to_path_buf(),
            reason: format!("invalid timestamp {:?}: {e}", text.trim()),
        })
}

/// Concatenate every `*.json` batch in the run directory, in file name order.
fn read_batches(dir: &Path) -> Result<RawEventBatch> {
    let mut all = RawEventBatch::default();
    for name in crate::io::sorted_entries(dir, |t| t.is_file())? {
        if !name.ends_with(paths::BATCH_EXTENSION) {
            continue;
        }
        let path = dir.join(&name);
        let data = std::fs::read(&path)?;
        let batch: RawEventBatch = serde_json::from_slice(&data)
            .map_err(|source| DisruptionError::MalformedArtifact { path, source })?;
        all.extend(batch);
    }
    Ok(all)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
