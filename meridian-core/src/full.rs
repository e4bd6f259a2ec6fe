//! Full expansion of a relation into its constituent elements.
//!
//! `relation/{id}/full` returns the relation itself, its member nodes and
//! ways, the nodes of those ways, and its member relations. Expansion is one
//! level deep: a member relation is included in the output but its own
//! members are never traversed, which is what makes self-referencing and
//! mutually referencing relations safe. The resolver runs as iterative
//! passes over id sets — no call-stack recursion, so pathological membership
//! counts cannot overflow the stack.

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use thiserror::Error;

use crate::element::{Element, ElementId, ElementKind, Node, Relation, Way};
use crate::store::ElementStore;

/// Why a full expansion could not start.
///
/// Both conditions are terminal for the request; missing *members* are not
/// errors and are silently omitted from the output instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FullExpansionError {
    /// No version of the root relation was ever recorded.
    #[error("relation {0} has never existed")]
    NotFound(ElementId),
    /// The root relation's current version is invisible (deleted).
    #[error("relation {0} has been deleted")]
    Gone(ElementId),
}

/// The resolved element sets of one full expansion.
///
/// Elements are deduplicated by id and grouped nodes, then ways, then
/// relations (the root included). The grouping is a hard contract —
/// consumers emit the three sections in that order; within a group,
/// elements iterate in ascending id order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FullExpansion {
    nodes: BTreeMap<ElementId, Node>,
    ways: BTreeMap<ElementId, Way>,
    relations: BTreeMap<ElementId, Relation>,
}

impl FullExpansion {
    /// Resolved nodes in ascending id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Resolved ways in ascending id order.
    pub fn ways(&self) -> impl Iterator<Item = &Way> {
        self.ways.values()
    }

    /// Resolved relations (root included) in ascending id order.
    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.relations.values()
    }

    /// Total number of resolved elements across the three groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len() + self.ways.len() + self.relations.len()
    }

    /// Whether the expansion resolved no elements at all.
    ///
    /// Never true for a successful expansion, which contains at least the
    /// root relation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an element with the given identity was resolved.
    #[must_use]
    pub fn contains(&self, kind: ElementKind, id: ElementId) -> bool {
        match kind {
            ElementKind::Node => self.nodes.contains_key(&id),
            ElementKind::Way => self.ways.contains_key(&id),
            ElementKind::Relation => self.relations.contains_key(&id),
        }
    }

    /// Consume the expansion in output order: nodes, then ways, then
    /// relations.
    pub fn into_elements(self) -> impl Iterator<Item = Element> {
        self.nodes
            .into_values()
            .map(Element::Node)
            .chain(self.ways.into_values().map(Element::Way))
            .chain(self.relations.into_values().map(Element::Relation))
    }
}

/// Expand a relation into its full constituent element set.
///
/// Fails with [`FullExpansionError::NotFound`] when no version of the root
/// was ever recorded and [`FullExpansionError::Gone`] when its current
/// version is invisible. Member references the store does not know are
/// skipped without an error or an output entry; only the root lookup is a
/// hard failure.
///
/// # Examples
/// ```
/// use meridian_core::{full_expansion, FullExpansionError, MemoryElementStore};
///
/// let store = MemoryElementStore::default();
/// assert_eq!(
///     full_expansion(&store, 3).unwrap_err(),
///     FullExpansionError::NotFound(3),
/// );
/// ```
pub fn full_expansion<S>(store: &S, root_id: ElementId) -> Result<FullExpansion, FullExpansionError>
where
    S: ElementStore + ?Sized,
{
    debug!("starting full expansion of relation {root_id}");

    let root = store
        .relation(root_id)
        .ok_or(FullExpansionError::NotFound(root_id))?;
    if !root.info.visible {
        return Err(FullExpansionError::Gone(root_id));
    }

    // Gather member ids per namespace from the root's member list. Sets
    // deduplicate repeated members; the root id seeds the relation set, so a
    // self-referencing member collapses into the entry that is already
    // there.
    let mut node_ids = BTreeSet::new();
    let mut way_ids = BTreeSet::new();
    let mut relation_ids = BTreeSet::from([root_id]);
    for member in &root.members {
        match member.member_type {
            ElementKind::Node => {
                node_ids.insert(member.member_id);
            }
            ElementKind::Way => {
                way_ids.insert(member.member_id);
            }
            ElementKind::Relation => {
                relation_ids.insert(member.member_id);
            }
        }
    }

    let mut expansion = FullExpansion::default();

    // Member ways first: each resolved way pulls its constituent nodes into
    // the node id set before nodes are resolved.
    for way_id in way_ids {
        let Some(way) = store.way(way_id) else {
            continue;
        };
        node_ids.extend(way.node_refs.iter().copied());
        expansion.ways.insert(way_id, way);
    }

    for node_id in node_ids {
        if let Some(node) = store.node(node_id) {
            expansion.nodes.insert(node_id, node);
        }
    }

    // Member relations are emitted but never traversed; their own members
    // stay out of the output. The root resolves from the value already
    // fetched above.
    for relation_id in relation_ids {
        if relation_id == root_id {
            continue;
        }
        if let Some(relation) = store.relation(relation_id) {
            expansion.relations.insert(relation_id, relation);
        }
    }
    expansion.relations.insert(root_id, root);

    debug!(
        "full expansion of relation {root_id} resolved {} elements",
        expansion.len()
    );
    Ok(expansion)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryElementStore;
    use crate::test_support::fixtures::{node, relation, way};
    use crate::element::Member;

    #[test]
    fn groups_output_nodes_then_ways_then_relations() {
        let mut store = MemoryElementStore::default();
        store.insert(node(1, 0.0, 0.0));
        store.insert(node(2, 0.1, 0.1));
        store.insert(way(1, &[1, 2]));
        store.insert(relation(
            6,
            vec![Member::new(ElementKind::Way, 1, "outline")],
        ));

        let expansion = full_expansion(&store, 6).expect("relation 6 expands");
        let kinds: Vec<_> = expansion
            .into_elements()
            .map(|e| (e.kind(), e.id()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                (ElementKind::Node, 1),
                (ElementKind::Node, 2),
                (ElementKind::Way, 1),
                (ElementKind::Relation, 6),
            ]
        );
    }

    #[test]
    fn skips_members_the_store_has_never_seen() {
        let mut store = MemoryElementStore::default();
        store.insert(node(1, 0.0, 0.0));
        store.insert(way(1, &[1, 999]));
        store.insert(relation(
            10,
            vec![
                Member::new(ElementKind::Way, 1, ""),
                Member::new(ElementKind::Node, 777, ""),
                Member::new(ElementKind::Relation, 888, ""),
            ],
        ));

        let expansion = full_expansion(&store, 10).expect("dangling members are not errors");
        assert_eq!(expansion.len(), 3);
        assert!(expansion.contains(ElementKind::Node, 1));
        assert!(!expansion.contains(ElementKind::Node, 999));
        assert!(!expansion.contains(ElementKind::Node, 777));
        assert!(!expansion.contains(ElementKind::Relation, 888));
    }
}
