//! Behaviour tests for `relation/{id}/full` expansion over an in-memory
//! store, covering cycles, mutual references, nested relations, way-node
//! pull-through, and the not-found/gone distinction.

use meridian_core::test_support::fixtures::{deleted_relation, node, relation, way};
use meridian_core::test_support::MemoryElementStore;
use meridian_core::{ElementKind, FullExpansionError, Member, full_expansion};
use rstest::{fixture, rstest};

fn member(kind: ElementKind, id: i64) -> Member {
    Member::new(kind, id, "")
}

/// The canonical relation fixture set:
/// - nodes 1 and 2, way 1 over both;
/// - relation 1 groups node 1 and way 1;
/// - relation 2 is deleted, relation 3 never existed;
/// - relation 4 contains relation 1;
/// - relation 5 contains itself;
/// - relation 6 contains way 1;
/// - relations 7 and 8 contain each other.
#[fixture]
fn store() -> MemoryElementStore {
    let mut store = MemoryElementStore::default();
    store.insert(node(1, 0.0017, 0.0017));
    store.insert(node(2, 0.0033, 0.0033));
    store.insert(way(1, &[1, 2]));
    store.insert(relation(
        1,
        vec![member(ElementKind::Node, 1), member(ElementKind::Way, 1)],
    ));
    store.insert(relation(2, Vec::new()));
    store.insert(deleted_relation(2));
    store.insert(relation(4, vec![member(ElementKind::Relation, 1)]));
    store.insert(relation(5, vec![member(ElementKind::Relation, 5)]));
    store.insert(relation(6, vec![member(ElementKind::Way, 1)]));
    store.insert(relation(7, vec![member(ElementKind::Relation, 8)]));
    store.insert(relation(8, vec![member(ElementKind::Relation, 7)]));
    store
}

fn identities(store: &MemoryElementStore, root: i64) -> Vec<(ElementKind, i64)> {
    full_expansion(store, root)
        .expect("expansion succeeds")
        .into_elements()
        .map(|e| (e.kind(), e.id()))
        .collect()
}

#[rstest]
fn expands_members_and_way_nodes_in_grouped_order(store: MemoryElementStore) {
    assert_eq!(
        identities(&store, 1),
        vec![
            (ElementKind::Node, 1),
            (ElementKind::Node, 2),
            (ElementKind::Way, 1),
            (ElementKind::Relation, 1),
        ]
    );
}

#[rstest]
fn deleted_root_is_gone(store: MemoryElementStore) {
    assert_eq!(
        full_expansion(&store, 2).expect_err("deleted root must fail"),
        FullExpansionError::Gone(2)
    );
}

#[rstest]
fn unknown_root_is_not_found(store: MemoryElementStore) {
    assert_eq!(
        full_expansion(&store, 3).expect_err("unknown root must fail"),
        FullExpansionError::NotFound(3)
    );
}

#[rstest]
fn member_relations_are_included_but_not_traversed(store: MemoryElementStore) {
    // Relation 1 has node and way members of its own; none of them appear.
    assert_eq!(
        identities(&store, 4),
        vec![(ElementKind::Relation, 1), (ElementKind::Relation, 4)]
    );
}

#[rstest]
fn self_reference_terminates(store: MemoryElementStore) {
    assert_eq!(identities(&store, 5), vec![(ElementKind::Relation, 5)]);
}

#[rstest]
fn way_members_pull_their_nodes(store: MemoryElementStore) {
    assert_eq!(
        identities(&store, 6),
        vec![
            (ElementKind::Node, 1),
            (ElementKind::Node, 2),
            (ElementKind::Way, 1),
            (ElementKind::Relation, 6),
        ]
    );
}

#[rstest]
fn mutual_references_terminate(store: MemoryElementStore) {
    assert_eq!(
        identities(&store, 7),
        vec![(ElementKind::Relation, 7), (ElementKind::Relation, 8)]
    );
    assert_eq!(
        identities(&store, 8),
        vec![(ElementKind::Relation, 7), (ElementKind::Relation, 8)]
    );
}

/// A deleted version does not mask that the element once existed: the
/// history keeps both versions and the current one decides visibility.
#[rstest]
fn history_orders_versions_and_latest_wins(store: MemoryElementStore) {
    use meridian_core::ElementStore;

    let versions: Vec<u32> = store
        .history(ElementKind::Relation, 2)
        .iter()
        .map(meridian_core::Element::version)
        .collect();
    assert_eq!(versions, vec![1, 2]);

    let current = store
        .get(ElementKind::Relation, 2)
        .expect("relation 2 has versions");
    assert!(!current.is_visible());
}
