//! Read-only access to a versioned element store.
//!
//! The core never persists anything itself; it consumes this contract. A
//! production implementation sits on a database snapshot, while tests use
//! the in-memory store from `test_support`.

use std::ops::RangeInclusive;

use crate::element::{Element, ElementId, ElementKind, Node, Relation, Way};

/// Read-only lookup of nodes, ways, and relations.
///
/// `get` returns the *current* (highest) version of an element whether or
/// not it is visible; callers that care about deletion check
/// [`Element::is_visible`] themselves. `None` means no version was ever
/// recorded, which is a different condition from "deleted" — the
/// full-expansion resolver maps the two onto `NotFound` and `Gone`.
///
/// Implementations are expected to serve a point-in-time consistent read;
/// the resolver does not re-check visibility mid-traversal.
///
/// # Examples
///
/// ```rust
/// use std::ops::RangeInclusive;
/// use meridian_core::{Element, ElementId, ElementKind, ElementStore, Node};
///
/// /// A store over a fixed slice of current elements.
/// struct SliceStore {
///     elements: Vec<Element>,
/// }
///
/// impl ElementStore for SliceStore {
///     fn get(&self, kind: ElementKind, id: ElementId) -> Option<Element> {
///         self.elements
///             .iter()
///             .find(|e| e.kind() == kind && e.id() == id)
///             .cloned()
///     }
///
///     fn history(&self, kind: ElementKind, id: ElementId) -> Vec<Element> {
///         self.get(kind, id).into_iter().collect()
///     }
///
///     fn nodes_in_tile_range(
///         &self,
///         tiles: RangeInclusive<u32>,
///     ) -> Box<dyn Iterator<Item = Node> + Send + '_> {
///         Box::new(self.elements.iter().filter_map(move |e| match e {
///             Element::Node(n) if tiles.contains(&n.tile) => Some(n.clone()),
///             _ => None,
///         }))
///     }
/// }
/// ```
pub trait ElementStore {
    /// Current version of the element, visible or not; `None` when the id
    /// was never recorded in this variant namespace.
    fn get(&self, kind: ElementKind, id: ElementId) -> Option<Element>;

    /// Every recorded version of the element, in ascending version order.
    fn history(&self, kind: ElementKind, id: ElementId) -> Vec<Element>;

    /// Current visible nodes whose tile code falls within `tiles`.
    ///
    /// This is the spatial half of a bounding-box query: the caller derives
    /// the range with `tile_range_for_bbox` and re-checks exact coordinates
    /// afterwards, since a Z-order range overcovers the box.
    fn nodes_in_tile_range(
        &self,
        tiles: RangeInclusive<u32>,
    ) -> Box<dyn Iterator<Item = Node> + Send + '_>;

    /// Current version of a node.
    fn node(&self, id: ElementId) -> Option<Node> {
        match self.get(ElementKind::Node, id) {
            Some(Element::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Current version of a way.
    fn way(&self, id: ElementId) -> Option<Way> {
        match self.get(ElementKind::Way, id) {
            Some(Element::Way(way)) => Some(way),
            _ => None,
        }
    }

    /// Current version of a relation.
    fn relation(&self, id: ElementId) -> Option<Relation> {
        match self.get(ElementKind::Relation, id) {
            Some(Element::Relation(relation)) => Some(relation),
            _ => None,
        }
    }
}
