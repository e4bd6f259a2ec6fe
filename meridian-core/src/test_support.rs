//! Test-only, in-memory `ElementStore` implementation and canned element
//! builders used by unit and behaviour tests.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use crate::element::{Element, ElementId, ElementKind, Node};
use crate::store::ElementStore;

/// In-memory versioned `ElementStore` used in tests.
///
/// Elements are keyed by (variant, id, version); `get` serves the highest
/// version regardless of visibility, matching the contract the resolver
/// relies on to tell "gone" apart from "never existed". The tile range query
/// performs a linear scan and is intended only for small datasets.
#[derive(Default, Debug)]
pub struct MemoryElementStore {
    elements: HashMap<(ElementKind, ElementId), BTreeMap<u32, Element>>,
}

impl MemoryElementStore {
    /// Create a store from a collection of elements.
    pub fn with_elements<I>(elements: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Element>,
    {
        let mut store = Self::default();
        for element in elements {
            store.insert(element);
        }
        store
    }

    /// Record one element version.
    pub fn insert(&mut self, element: impl Into<Element>) {
        let element = element.into();
        self.elements
            .entry((element.kind(), element.id()))
            .or_default()
            .insert(element.version(), element);
    }
}

impl ElementStore for MemoryElementStore {
    fn get(&self, kind: ElementKind, id: ElementId) -> Option<Element> {
        self.elements
            .get(&(kind, id))
            .and_then(|versions| versions.values().next_back())
            .cloned()
    }

    fn history(&self, kind: ElementKind, id: ElementId) -> Vec<Element> {
        self.elements
            .get(&(kind, id))
            .map(|versions| versions.values().cloned().collect())
            .unwrap_or_default()
    }

    fn nodes_in_tile_range(
        &self,
        tiles: RangeInclusive<u32>,
    ) -> Box<dyn Iterator<Item = Node> + Send + '_> {
        let nodes: Vec<Node> = self
            .elements
            .iter()
            .filter(|((kind, _), _)| *kind == ElementKind::Node)
            .filter_map(|(_, versions)| versions.values().next_back())
            .filter_map(|element| match element {
                Element::Node(node) if node.info.visible && tiles.contains(&node.tile) => {
                    Some(node.clone())
                }
                _ => None,
            })
            .collect();
        Box::new(nodes.into_iter())
    }
}

/// Canned element builders mirroring the `relation/full` fixture set.
pub mod fixtures {
    use chrono::{DateTime, Utc};

    use crate::element::{
        Coordinate, ElementId, ElementInfo, Member, Node, Relation, Tags, Way,
    };

    /// Common attributes for a visible version-1 fixture element.
    #[must_use]
    pub fn info(id: ElementId) -> ElementInfo {
        ElementInfo {
            id,
            version: 1,
            visible: true,
            changeset: 1,
            user: None,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            tags: Tags::default(),
        }
    }

    /// Like [`info`], but the version is marked deleted.
    #[must_use]
    pub fn deleted_info(id: ElementId) -> ElementInfo {
        ElementInfo {
            visible: false,
            version: 2,
            ..info(id)
        }
    }

    /// A visible node at the given degree coordinates.
    #[must_use]
    pub fn node(id: ElementId, lon: f64, lat: f64) -> Node {
        Node::new(
            info(id),
            Coordinate::from_degrees(lon),
            Coordinate::from_degrees(lat),
        )
    }

    /// A visible way over the given node references.
    #[must_use]
    pub fn way(id: ElementId, node_refs: &[ElementId]) -> Way {
        Way {
            info: info(id),
            node_refs: node_refs.to_vec(),
        }
    }

    /// A visible relation with the given members.
    #[must_use]
    pub fn relation(id: ElementId, members: Vec<Member>) -> Relation {
        Relation {
            info: info(id),
            members,
        }
    }

    /// A relation whose current version is deleted.
    #[must_use]
    pub fn deleted_relation(id: ElementId) -> Relation {
        Relation {
            info: deleted_info(id),
            members: Vec::new(),
        }
    }
}
