//! Streaming aggregation over batches of geographic elements.
//!
//! Responsibilities:
//! - Derive per-user first-seen records and per-changeset summaries while a
//!   batch of elements streams past.
//! - Tag every ingested node with its tile code (derived in
//!   `meridian-core` at node construction).
//!
//! Boundaries:
//! - No parsing: the feed front-end hands over well-formed
//!   [`Element`] values; malformed input is its problem.
//! - No persistence: the returned report is plain data for the store
//!   collaborator to write.
//!
//! Invariants:
//! - No global mutable state; the accumulator is a value threaded through
//!   one run and returned.
//! - [`IngestReport::combine`] is associative, so disjoint batches may be
//!   ingested in parallel and reduced afterwards.

#![forbid(unsafe_code)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use geo::{Coord, Rect};
use log::debug;
use meridian_core::{ChangesetId, Element, Node, UserId};

mod accumulator;
#[cfg(test)]
mod tests;

use accumulator::ElementAccumulator;

/// A user record derived from the elements that mention the user.
///
/// Materialized once per unique user id observed during ingestion; never
/// created for anonymous contributions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    /// Registered user id.
    pub id: UserId,
    /// Display name carried by the element that set `first_seen`.
    pub display_name: String,
    /// Earliest element timestamp observed for this user.
    pub first_seen: DateTime<Utc>,
}

/// A changeset summary derived from the elements that reference it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Changeset {
    /// Changeset id.
    pub id: ChangesetId,
    /// Owner, fixed by the first element observed for the changeset and not
    /// re-validated afterwards; `None` when that element was anonymous.
    pub user: Option<UserId>,
    /// Earliest element timestamp in the changeset.
    pub min_timestamp: DateTime<Utc>,
    /// Latest element timestamp in the changeset.
    pub max_timestamp: DateTime<Utc>,
    /// Number of element versions attributed to the changeset.
    pub num_changes: u64,
}

/// Element counts and coordinate bounds for one ingestion run.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IngestSummary {
    /// Number of nodes ingested.
    pub nodes: u64,
    /// Number of ways ingested.
    pub ways: u64,
    /// Number of relations ingested.
    pub relations: u64,
    /// Bounding box covering all node coordinates, if any node carried
    /// in-range coordinates. WGS84 with `x = longitude`, `y = latitude`.
    pub bounds: Option<Rect<f64>>,
}

impl IngestSummary {
    fn combine(mut self, other: Self) -> Self {
        self.nodes += other.nodes;
        self.ways += other.ways;
        self.relations += other.relations;
        self.bounds = Self::merge_bounds(self.bounds, other.bounds);
        self
    }

    fn merge_bounds(lhs: Option<Rect<f64>>, rhs: Option<Rect<f64>>) -> Option<Rect<f64>> {
        match (lhs, rhs) {
            (Some(left), Some(right)) => Some(Rect::new(
                Coord {
                    x: left.min().x.min(right.min().x),
                    y: left.min().y.min(right.min().y),
                },
                Coord {
                    x: left.max().x.max(right.max().x),
                    y: left.max().y.max(right.max().y),
                },
            )),
            (bounds, None) | (None, bounds) => bounds,
        }
    }

    pub(crate) fn record_node(&mut self, lon: f64, lat: f64) {
        self.nodes += 1;
        if let Some(bounds) = Self::coordinate_bounds(lon, lat) {
            self.bounds = Self::merge_bounds(self.bounds, Some(bounds));
        }
    }

    pub(crate) fn record_way(&mut self) {
        self.ways += 1;
    }

    pub(crate) fn record_relation(&mut self) {
        self.relations += 1;
    }

    fn coordinate_bounds(lon: f64, lat: f64) -> Option<Rect<f64>> {
        ((-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)).then(|| {
            let coordinate = Coord { x: lon, y: lat };
            Rect::new(coordinate, coordinate)
        })
    }
}

/// Everything one ingestion run derives from its batch.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IngestReport {
    /// Element counts and coordinate bounds.
    pub summary: IngestSummary,
    /// Per-user first-seen records, keyed by user id.
    pub users: HashMap<UserId, User>,
    /// Per-changeset summaries, keyed by changeset id.
    pub changesets: HashMap<ChangesetId, Changeset>,
    /// Every ingested node in arrival order, tile code attached.
    pub nodes: Vec<Node>,
}

impl IngestReport {
    /// Merge another batch's report into this one.
    ///
    /// The merge is min/max/sum and therefore associative; on exact ties
    /// (equal `first_seen`, or a changeset owner present on both sides) the
    /// receiver wins, which reproduces sequential ingestion when reports are
    /// combined in batch order.
    #[must_use]
    pub fn combine(mut self, other: Self) -> Self {
        self.summary = self.summary.combine(other.summary);
        for (id, user) in other.users {
            self.users
                .entry(id)
                .and_modify(|existing| {
                    if user.first_seen < existing.first_seen {
                        *existing = user.clone();
                    }
                })
                .or_insert(user);
        }
        for (id, changeset) in other.changesets {
            self.changesets
                .entry(id)
                .and_modify(|existing| {
                    existing.min_timestamp = existing.min_timestamp.min(changeset.min_timestamp);
                    existing.max_timestamp = existing.max_timestamp.max(changeset.max_timestamp);
                    existing.num_changes += changeset.num_changes;
                })
                .or_insert(changeset);
        }
        self.nodes.extend(other.nodes);
        self
    }
}

/// Ingest a batch of elements in arrival order.
///
/// For every element the running user and changeset records are updated:
/// users keep their earliest-seen timestamp (and the display name of the
/// element that set it; exact timestamp ties keep the first-encountered
/// record), changesets widen their min/max timestamps and count one change
/// per element. Anonymous elements update no user record. Nodes come back
/// out in arrival order with their tile code attached.
///
/// # Examples
/// ```
/// use meridian_core::test_support::fixtures::node;
/// use meridian_ingest::ingest_elements;
///
/// let report = ingest_elements([node(1, 0.0, 0.0).into()]);
/// assert_eq!(report.summary.nodes, 1);
/// assert_eq!(report.nodes[0].tile, 0xC000_0000);
/// ```
pub fn ingest_elements<I>(elements: I) -> IngestReport
where
    I: IntoIterator<Item = Element>,
{
    let mut accumulator = ElementAccumulator::default();
    for element in elements {
        accumulator.process_element(element);
    }
    let report = accumulator.into_report();
    debug!(
        "ingested {} nodes, {} ways, {} relations across {} changesets by {} users",
        report.summary.nodes,
        report.summary.ways,
        report.summary.relations,
        report.changesets.len(),
        report.users.len(),
    );
    report
}
