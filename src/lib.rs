//! Facade crate for the Meridian geodata engine.
//!
//! This crate re-exports the core domain types, the tile encoder, the
//! bounding-box predicate, and the full-expansion resolver, and exposes the
//! streaming aggregation loader behind the `ingest` feature flag.

#![forbid(unsafe_code)]

pub use meridian_core::{
    BoundingBox, ChangesetId, Coordinate, Element, ElementId, ElementInfo, ElementKind,
    ElementStore, FullExpansion, FullExpansionError, InvalidBoundingBox, Member, Node, Relation,
    Tags, UserId, UserInfo, Way, full_expansion, tile_for_point, tile_range_for_bbox,
    tiles_for_bbox,
};

#[cfg(feature = "test-support")]
pub use meridian_core::MemoryElementStore;

#[cfg(feature = "ingest")]
pub use meridian_ingest::{Changeset, IngestReport, IngestSummary, User, ingest_elements};
