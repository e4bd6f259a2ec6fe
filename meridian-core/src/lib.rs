//! Core algorithms for an OSM-style geodata API.
//!
//! Three pieces of real substance live here: the deterministic Z-order tile
//! encoder backing bounding-box range queries, the read-only element-store
//! contract, and the cycle-safe full expansion of a relation into its
//! constituent elements. Everything around them — transport, serialization,
//! persistence — is a collaborator behind the [`ElementStore`] trait.

#![forbid(unsafe_code)]

pub mod bbox;
pub mod element;
pub mod full;
pub mod store;
pub mod tile;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bbox::{BoundingBox, InvalidBoundingBox};
pub use element::{
    ChangesetId, Coordinate, Element, ElementId, ElementInfo, ElementKind, Member, Node, Relation,
    Tags, UserId, UserInfo, Way,
};
pub use full::{FullExpansion, FullExpansionError, full_expansion};
pub use store::ElementStore;
pub use tile::{tile_for_point, tile_range_for_bbox, tiles_for_bbox};

#[cfg(any(test, feature = "test-support"))]
pub use test_support::MemoryElementStore;
