//! Consolidation of raw disruption records into maximal merged intervals.
//!
//! Raw records for one locator arrive duplicated and fragmented across batch
//! files. They are sorted by start and folded left to right against the last
//! merged interval using Allen's interval relations:
//!
//! - `last.to <  next.from` (precedes): start a new interval
//! - `last.to == next.from` (meets): extend the last interval
//! - `last.to >  next.from` (overlaps): extend the last interval, never
//!   shrinking it, and count the overlap
//!
//! Well-formed harness output only precedes or meets. Overlaps mean the same
//! outage was reported more than once, so they are merged but counted.

use crate::event::RawEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Signed number of seconds from `from` to `to`, with nanosecond precision.
pub fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    let delta = to - from;
    match delta.num_nanoseconds() {
        Some(ns) => ns as f64 / 1e9,
        None => delta.num_milliseconds() as f64 / 1e3,
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A bare `[from, to]` pair fed to the fold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl Span {
    /// An inverted pair collapses to a zero-length span at `from`.
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to: to.max(from),
        }
    }
}

// ---------------------------------------------------------------------------
// Interval
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interval {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Seconds between the run start and `from`. Zero until offsets are filled.
    pub start_offset_sec: f64,
    /// Seconds between the run start and `to`. Zero until offsets are filled.
    pub end_offset_sec: f64,
    pub duration_sec: f64,
}

impl Interval {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from,
            to,
            start_offset_sec: 0.0,
            end_offset_sec: 0.0,
            duration_sec: seconds_between(from, to),
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.from, self.to)
    }

    pub fn fill_offsets(&mut self, run_started: DateTime<Utc>) {
        self.start_offset_sec = seconds_between(run_started, self.from);
        self.end_offset_sec = seconds_between(run_started, self.to);
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// All merged disruption intervals of one locator within one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub level: String,
    pub locator: String,
    pub intervals: Vec<Interval>,
    pub total_duration_sec: f64,
    /// Fold steps that hit the overlap branch. Diagnostic only, not persisted.
    #[serde(skip)]
    pub overlaps: usize,
}

impl Event {
    pub fn fill_offsets(&mut self, run_started: DateTime<Utc>) {
        for interval in &mut self.intervals {
            interval.fill_offsets(run_started);
        }
    }
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub intervals: Vec<Interval>,
    pub overlaps: usize,
}

impl MergeOutcome {
    pub fn total_duration_sec(&self) -> f64 {
        self.intervals.iter().map(|i| i.duration_sec).sum()
    }
}

/// Merge spans in any order into sorted, pairwise disjoint, non-touching
/// intervals covering exactly their union.
pub fn merge_spans<I>(spans: I) -> MergeOutcome
where
    I: IntoIterator<Item = Span>,
{
    let mut sorted: Vec<Span> = spans.into_iter().collect();
    // Stable: ties keep arrival order.
    sorted.sort_by_key(|s| s.from);

    let mut merged: Vec<Span> = Vec::with_capacity(sorted.len());
    let mut overlaps = 0;
    for next in sorted {
        match merged.last_mut() {
            Some(last) if last.to >= next.from => {
                if last.to > next.from {
                    overlaps += 1;
                }
                last.to = last.to.max(next.to);
            }
            _ => merged.push(next),
        }
    }

    MergeOutcome {
        intervals: merged
            .into_iter()
            .map(|s| Interval::new(s.from, s.to))
            .collect(),
        overlaps,
    }
}

/// Build the canonical [`Event`] for a group of raw records sharing a locator.
///
/// `level` and `locator` come from the first record in arrival order.
/// Returns `None` for an empty group; a locator without candidates has no
/// event at all.
pub fn merge_events(group: &[&RawEvent]) -> Option<Event> {
    let first = group.first()?;
    let outcome = merge_spans(group.iter().map(|e| Span::new(e.from, e.to)));
    let total_duration_sec = outcome.total_duration_sec();
    Some(Event {
        level: first.level.clone(),
        locator: first.locator.clone(),
        intervals: outcome.intervals,
        total_duration_sec,
        overlaps: outcome.overlaps,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 7, 5, h, m, 0).unwrap()
    }

    fn base() -> DateTime<Utc> {
        at(10, 0)
    }

    fn span_s(from: i64, to: i64) -> Span {
        Span::new(
            base() + Duration::seconds(from),
            base() + Duration::seconds(to),
        )
    }

    fn raw(level: &str, from: DateTime<Utc>, to: DateTime<Utc>) -> RawEvent {
        RawEvent {
            level: level.to_string(),
            locator: "disruption/kube-api connection/new".to_string(),
            message: "kube-apiserver-new-connection stopped responding".to_string(),
            from,
            to,
        }
    }

    fn bounds(outcome: &MergeOutcome) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
        outcome.intervals.iter().map(|i| (i.from, i.to)).collect()
    }

    fn random_spans(rng: &mut StdRng, count: usize) -> Vec<Span> {
        (0..count)
            .map(|_| {
                let from = rng.gen_range(0..600);
                let len = rng.gen_range(0..40);
                span_s(from, from + len)
            })
            .collect()
    }

    /// Seconds covered by the union of whole-second spans.
    fn union_seconds(spans: &[Span]) -> f64 {
        let mut covered = vec![false; 700];
        for s in spans {
            let from = (s.from - base()).num_seconds() as usize;
            let to = (s.to - base()).num_seconds() as usize;
            for slot in covered.iter_mut().take(to).skip(from) {
                *slot = true;
            }
        }
        covered.iter().filter(|c| **c).count() as f64
    }

    #[test]
    fn precedes_yields_separate_intervals() {
        let outcome = merge_spans([
            Span::new(at(10, 0), at(10, 1)),
            Span::new(at(10, 5), at(10, 6)),
        ]);
        assert_eq!(
            bounds(&outcome),
            vec![(at(10, 0), at(10, 1)), (at(10, 5), at(10, 6))]
        );
        assert_eq!(outcome.total_duration_sec(), 120.0);
        assert_eq!(outcome.overlaps, 0);
    }

    #[test]
    fn meets_merges_without_overlap() {
        let outcome = merge_spans([
            Span::new(at(10, 0), at(10, 2)),
            Span::new(at(10, 2), at(10, 3)),
        ]);
        assert_eq!(bounds(&outcome), vec![(at(10, 0), at(10, 3))]);
        assert_eq!(outcome.intervals[0].duration_sec, 180.0);
        assert_eq!(outcome.overlaps, 0);
    }

    #[test]
    fn contained_overlap_keeps_outer_end() {
        let outcome = merge_spans([
            Span::new(at(10, 0), at(10, 5)),
            Span::new(at(10, 2), at(10, 3)),
        ]);
        assert_eq!(bounds(&outcome), vec![(at(10, 0), at(10, 5))]);
        assert_eq!(outcome.total_duration_sec(), 300.0);
        assert_eq!(outcome.overlaps, 1);
    }

    #[test]
    fn duplicated_batches_are_counted_as_overlaps() {
        let once = [
            Span::new(at(10, 0), at(10, 1)),
            Span::new(at(10, 4), at(10, 6)),
        ];
        let twice: Vec<Span> = once.iter().chain(once.iter()).copied().collect();
        let outcome = merge_spans(twice);
        assert_eq!(bounds(&outcome), bounds(&merge_spans(once)));
        assert_eq!(outcome.overlaps, 2);
    }

    #[test]
    fn unsorted_input_is_sorted_before_folding() {
        let outcome = merge_spans([
            Span::new(at(10, 5), at(10, 6)),
            Span::new(at(10, 0), at(10, 1)),
            Span::new(at(10, 1), at(10, 2)),
        ]);
        assert_eq!(
            bounds(&outcome),
            vec![(at(10, 0), at(10, 2)), (at(10, 5), at(10, 6))]
        );
    }

    #[test]
    fn inverted_span_collapses_to_point() {
        let s = Span::new(at(10, 5), at(10, 1));
        assert_eq!(s.from, s.to);
        let outcome = merge_spans([s]);
        assert_eq!(outcome.intervals[0].duration_sec, 0.0);
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert!(merge_spans(Vec::new()).intervals.is_empty());
        assert!(merge_events(&[]).is_none());
    }

    #[test]
    fn merge_events_takes_level_from_first_arrival() {
        let late = raw("Warning", at(10, 5), at(10, 6));
        let early = raw("Error", at(10, 0), at(10, 1));
        let event = merge_events(&[&late, &early]).unwrap();
        assert_eq!(event.level, "Warning");
        assert_eq!(event.intervals[0].from, at(10, 0));
        assert_eq!(event.total_duration_sec, 120.0);
    }

    #[test]
    fn merge_closure_property() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for round in 0..200 {
            let count = rng.gen_range(1..=25);
            let spans = random_spans(&mut rng, count);
            let outcome = merge_spans(spans.clone());

            for pair in outcome.intervals.windows(2) {
                assert!(pair[0].from < pair[1].from, "round {round}: not sorted");
                assert!(
                    pair[0].to < pair[1].from,
                    "round {round}: intervals touch or overlap"
                );
            }
            for i in &outcome.intervals {
                assert!(i.to >= i.from);
                assert_eq!(i.duration_sec, seconds_between(i.from, i.to));
            }
            assert_eq!(
                outcome.total_duration_sec(),
                union_seconds(&spans),
                "round {round}: total differs from union"
            );
        }
    }

    #[test]
    fn merge_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let count = rng.gen_range(1..=20);
            let first = merge_spans(random_spans(&mut rng, count));
            let again = merge_spans(first.intervals.iter().map(Interval::span));
            assert_eq!(first.intervals, again.intervals);
            assert_eq!(again.overlaps, 0);
        }
    }

    #[test]
    fn merge_is_order_independent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let count = rng.gen_range(1..=20);
            let spans = random_spans(&mut rng, count);
            let mut shuffled = spans.clone();
            shuffled.shuffle(&mut rng);
            assert_eq!(
                merge_spans(spans).intervals,
                merge_spans(shuffled).intervals
            );
        }
    }

    #[test]
    fn offsets_are_relative_to_run_start() {
        let mut interval = Interval::new(at(10, 0), at(10, 2));
        interval.fill_offsets(at(10, 0));
        assert_eq!(interval.start_offset_sec, 0.0);
        assert_eq!(interval.end_offset_sec, 120.0);

        interval.fill_offsets(at(9, 59));
        assert_eq!(interval.start_offset_sec, 60.0);
    }
}
