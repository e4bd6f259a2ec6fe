use chrono::{DateTime, Utc};
use meridian_core::{Coordinate, Element, ElementId, ElementInfo, Node, Tags, UserId, UserInfo, Way};
use rstest::rstest;

use super::*;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).expect("timestamp in range")
}

fn info(
    id: ElementId,
    changeset: ChangesetId,
    user: Option<(UserId, &str)>,
    secs: i64,
) -> ElementInfo {
    ElementInfo {
        id,
        version: 1,
        visible: true,
        changeset,
        user: user.map(|(uid, name)| UserInfo {
            id: uid,
            display_name: name.to_owned(),
        }),
        timestamp: at(secs),
        tags: Tags::default(),
    }
}

fn way_at(id: ElementId, changeset: ChangesetId, user: Option<(UserId, &str)>, secs: i64) -> Element {
    Element::Way(Way {
        info: info(id, changeset, user, secs),
        node_refs: Vec::new(),
    })
}

fn node_at(id: ElementId, lon: f64, lat: f64, secs: i64) -> Element {
    Element::Node(Node::new(
        info(id, 1, Some((1, "mapper")), secs),
        Coordinate::from_degrees(lon),
        Coordinate::from_degrees(lat),
    ))
}

#[rstest]
#[case(&[10, 20, 30])]
#[case(&[30, 10, 20])]
#[case(&[20, 30, 10])]
fn changeset_widens_to_min_and_max_in_any_arrival_order(#[case] order: &[i64]) {
    let report = ingest_elements(
        order
            .iter()
            .map(|&secs| way_at(secs, 7, Some((1, "alice")), secs)),
    );

    let changeset = report.changesets.get(&7).expect("changeset 7 derived");
    assert_eq!(changeset.min_timestamp, at(10));
    assert_eq!(changeset.max_timestamp, at(30));
    assert_eq!(changeset.num_changes, 3);
    assert_eq!(changeset.user, Some(1));
}

#[rstest]
fn user_record_keeps_the_earliest_seen_timestamp() {
    let report = ingest_elements([
        way_at(1, 7, Some((3, "anne_2024")), 20),
        way_at(2, 7, Some((3, "anne")), 10),
    ]);

    let user = report.users.get(&3).expect("user 3 derived");
    assert_eq!(user.first_seen, at(10));
    // The display name travels with the element that set the timestamp.
    assert_eq!(user.display_name, "anne");
}

#[rstest]
fn exact_timestamp_tie_keeps_the_first_encountered_record() {
    let report = ingest_elements([
        way_at(1, 7, Some((3, "first")), 10),
        way_at(2, 8, Some((3, "second")), 10),
    ]);

    let user = report.users.get(&3).expect("user 3 derived");
    assert_eq!(user.display_name, "first");
}

#[rstest]
fn anonymous_elements_create_no_user_record() {
    let report = ingest_elements([way_at(1, 7, None, 10)]);

    assert!(report.users.is_empty());
    let changeset = report.changesets.get(&7).expect("changeset 7 derived");
    assert_eq!(changeset.user, None);
}

#[rstest]
fn changeset_owner_is_fixed_by_the_first_observation() {
    let report = ingest_elements([
        way_at(1, 7, None, 10),
        way_at(2, 7, Some((5, "late_owner")), 20),
    ]);

    // Not re-validated: the anonymous first observation stands.
    let changeset = report.changesets.get(&7).expect("changeset 7 derived");
    assert_eq!(changeset.user, None);
    assert_eq!(changeset.num_changes, 2);
}

#[rstest]
fn nodes_come_back_tagged_in_arrival_order() {
    let report = ingest_elements([node_at(2, 0.0, 0.0, 10), node_at(1, 45.0, 45.0, 20)]);

    let ids: Vec<ElementId> = report.nodes.iter().map(|n| n.info.id).collect();
    assert_eq!(ids, vec![2, 1]);
    let first = report.nodes.first().expect("two nodes ingested");
    assert_eq!(first.tile, 0xC000_0000);

    let bounds = report.summary.bounds.expect("bounds derived from nodes");
    assert_eq!(bounds.min(), geo::Coord { x: 0.0, y: 0.0 });
    assert_eq!(bounds.max(), geo::Coord { x: 45.0, y: 45.0 });
}

#[rstest]
fn summary_counts_each_variant() {
    let report = ingest_elements([
        node_at(1, 0.0, 0.0, 10),
        way_at(1, 1, Some((1, "mapper")), 10),
        Element::Relation(meridian_core::Relation {
            info: info(1, 1, Some((1, "mapper")), 10),
            members: Vec::new(),
        }),
    ]);

    assert_eq!(report.summary.nodes, 1);
    assert_eq!(report.summary.ways, 1);
    assert_eq!(report.summary.relations, 1);
}

#[rstest]
fn combining_batch_reports_matches_sequential_ingestion() {
    let batch_one = vec![
        node_at(1, 0.0, 0.0, 30),
        way_at(1, 7, Some((3, "anne_2024")), 20),
    ];
    let batch_two = vec![
        way_at(2, 7, Some((3, "anne")), 10),
        way_at(3, 8, None, 40),
    ];

    let sequential =
        ingest_elements(batch_one.iter().cloned().chain(batch_two.iter().cloned()));
    let reduced = ingest_elements(batch_one).combine(ingest_elements(batch_two));

    assert_eq!(reduced, sequential);
}

#[rstest]
fn empty_batch_yields_an_empty_report() {
    let report = ingest_elements(std::iter::empty());
    assert_eq!(report, IngestReport::default());
}
