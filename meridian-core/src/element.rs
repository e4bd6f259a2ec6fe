//! Domain model for OSM-style geographic elements.
//!
//! Elements come in three variants (node, way, relation) sharing the common
//! attributes in [`ElementInfo`]. Identifiers are independent per variant:
//! node 1, way 1, and relation 1 are unrelated objects.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::tile::tile_for_point;

/// Identifier of a node, way, or relation.
///
/// Covers the full signed 64-bit range; fixture ids are observed to exceed
/// 2^31 and approach 2^63 − 1, so no narrowing happens anywhere in the core.
pub type ElementId = i64;

/// Identifier of a changeset.
pub type ChangesetId = i64;

/// Identifier of a registered user.
pub type UserId = u64;

/// Free-form OSM tags. Insertion order carries no meaning.
pub type Tags = HashMap<String, String>;

/// Variant namespace of an element reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ElementKind {
    /// A point with coordinates.
    Node,
    /// An ordered list of node references.
    Way,
    /// An ordered list of typed, role-carrying member references.
    Relation,
}

impl ElementKind {
    /// Lower-case name as it appears in API payloads and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

/// Fixed-point WGS84 coordinate in units of 10^-7 degree.
///
/// This mirrors the storage precision of the upstream database (`latitude`
/// and `longitude` columns hold `degrees * 10^7`); keeping the fixed-point
/// value end to end lets the tile encoder work in pure integer arithmetic,
/// so encoding is bit-identical on every platform and invocation.
///
/// # Examples
/// ```
/// use meridian_core::Coordinate;
///
/// let lat = Coordinate::from_degrees(51.5074);
/// assert_eq!(lat.raw(), 515_074_000);
/// assert_eq!(lat.to_degrees(), 51.5074);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate(i32);

impl Coordinate {
    /// Fixed-point units per degree.
    pub const SCALE: i32 = 10_000_000;

    /// Wrap a raw fixed-point value (10^-7 degree units).
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    /// Convert from decimal degrees, rounding half away from zero to the
    /// seventh fractional digit.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_possible_truncation,
        reason = "single entry point from floating degrees into fixed-point"
    )]
    pub fn from_degrees(degrees: f64) -> Self {
        Self((degrees * f64::from(Self::SCALE)).round() as i32)
    }

    /// Raw fixed-point value in 10^-7 degree units.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// Convert back to decimal degrees.
    #[must_use]
    #[expect(clippy::float_arithmetic, reason = "presentation-side conversion")]
    pub fn to_degrees(self) -> f64 {
        f64::from(self.0) / f64::from(Self::SCALE)
    }
}

/// Identity of the registered user who authored an element version.
///
/// Anonymous contributions carry no `UserInfo` at all; the core never
/// fabricates placeholder ids for them.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UserInfo {
    /// Registered user id.
    pub id: UserId,
    /// Display name at the time the element version was written.
    pub display_name: String,
}

/// Attributes common to every element variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementInfo {
    /// Identifier within the variant namespace.
    pub id: ElementId,
    /// Version, strictly increasing across the element's history.
    pub version: u32,
    /// `false` marks a logically deleted ("gone") version.
    pub visible: bool,
    /// Changeset the version was written in.
    pub changeset: ChangesetId,
    /// Author, or `None` for an anonymous contribution.
    pub user: Option<UserInfo>,
    /// Time the version was written.
    pub timestamp: DateTime<Utc>,
    /// Free-form tags.
    pub tags: Tags,
}

/// A point element with fixed-point coordinates and a derived tile code.
///
/// # Examples
/// ```
/// use chrono::{TimeZone, Utc};
/// use meridian_core::{Coordinate, ElementInfo, Node};
///
/// let info = ElementInfo {
///     id: 1,
///     version: 1,
///     visible: true,
///     changeset: 1,
///     user: None,
///     timestamp: Utc.with_ymd_and_hms(2012, 9, 25, 0, 0, 0).single().unwrap(),
///     tags: Default::default(),
/// };
/// let node = Node::new(info, Coordinate::from_degrees(0.0), Coordinate::from_degrees(0.0));
/// // The tile code is a pure function of the coordinates.
/// assert_eq!(node.tile, 0xC000_0000);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Common attributes.
    pub info: ElementInfo,
    /// Longitude.
    pub lon: Coordinate,
    /// Latitude.
    pub lat: Coordinate,
    /// Z-order spatial index code, derived from (lat, lon).
    pub tile: u32,
}

impl Node {
    /// Build a node, deriving its tile code from the coordinates.
    #[must_use]
    pub fn new(info: ElementInfo, lon: Coordinate, lat: Coordinate) -> Self {
        let tile = tile_for_point(lat, lon);
        Self {
            info,
            lon,
            lat,
            tile,
        }
    }
}

/// An ordered sequence of node references.
///
/// Duplicate references are legal; closed ways repeat their first node last.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Way {
    /// Common attributes.
    pub info: ElementInfo,
    /// Member nodes in drawing order.
    pub node_refs: Vec<ElementId>,
}

/// A single relation member: a typed element reference with a role.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    /// Variant namespace of the referenced element.
    pub member_type: ElementKind,
    /// Referenced element id.
    pub member_id: ElementId,
    /// Free-form role, often empty.
    pub role: String,
}

impl Member {
    /// Convenience constructor used heavily by fixtures.
    #[must_use]
    pub fn new(member_type: ElementKind, member_id: ElementId, role: impl Into<String>) -> Self {
        Self {
            member_type,
            member_id,
            role: role.into(),
        }
    }
}

/// An ordered sequence of typed members.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Relation {
    /// Common attributes.
    pub info: ElementInfo,
    /// Members in document order.
    pub members: Vec<Member>,
}

/// Any element variant.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    /// A node.
    Node(Node),
    /// A way.
    Way(Way),
    /// A relation.
    Relation(Relation),
}

impl Element {
    /// Variant namespace of this element.
    #[must_use]
    pub const fn kind(&self) -> ElementKind {
        match self {
            Self::Node(_) => ElementKind::Node,
            Self::Way(_) => ElementKind::Way,
            Self::Relation(_) => ElementKind::Relation,
        }
    }

    /// Common attributes, whichever the variant.
    #[must_use]
    pub const fn info(&self) -> &ElementInfo {
        match self {
            Self::Node(n) => &n.info,
            Self::Way(w) => &w.info,
            Self::Relation(r) => &r.info,
        }
    }

    /// Identifier within the variant namespace.
    #[must_use]
    pub const fn id(&self) -> ElementId {
        self.info().id
    }

    /// Version of this element.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.info().version
    }

    /// Whether this version is visible (not logically deleted).
    #[must_use]
    pub const fn is_visible(&self) -> bool {
        self.info().visible
    }
}

impl From<Node> for Element {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Way> for Element {
    fn from(way: Way) -> Self {
        Self::Way(way)
    }
}

impl From<Relation> for Element {
    fn from(relation: Relation) -> Self {
        Self::Relation(relation)
    }
}
