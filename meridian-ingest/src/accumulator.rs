//! Internal accumulator for element ingestion.
//!
//! Collects node output and the derived user and changeset records while
//! elements stream past, then yields the public [`IngestReport`].

use std::collections::hash_map::Entry;

use meridian_core::{Element, ElementInfo};

use super::{Changeset, IngestReport, User};

#[derive(Debug, Default)]
pub(super) struct ElementAccumulator {
    report: IngestReport,
}

impl ElementAccumulator {
    pub(super) fn process_element(&mut self, element: Element) {
        self.track_attribution(element.info());
        match element {
            Element::Node(node) => {
                self.report
                    .summary
                    .record_node(node.lon.to_degrees(), node.lat.to_degrees());
                self.report.nodes.push(node);
            }
            Element::Way(_) => self.report.summary.record_way(),
            Element::Relation(_) => self.report.summary.record_relation(),
        }
    }

    pub(super) fn into_report(self) -> IngestReport {
        self.report
    }

    /// Update the running user and changeset records for one element.
    ///
    /// Earliest timestamp wins for the user record; on an exact tie the
    /// record already in place survives, so arrival order is the explicit,
    /// documented tie-break. The display name travels with whichever element
    /// set the winning timestamp.
    fn track_attribution(&mut self, info: &ElementInfo) {
        match self.report.changesets.entry(info.changeset) {
            Entry::Occupied(mut entry) => {
                let changeset = entry.get_mut();
                changeset.min_timestamp = changeset.min_timestamp.min(info.timestamp);
                changeset.max_timestamp = changeset.max_timestamp.max(info.timestamp);
                changeset.num_changes += 1;
            }
            Entry::Vacant(entry) => {
                entry.insert(Changeset {
                    id: info.changeset,
                    user: info.user.as_ref().map(|user| user.id),
                    min_timestamp: info.timestamp,
                    max_timestamp: info.timestamp,
                    num_changes: 1,
                });
            }
        }

        let Some(author) = &info.user else {
            // Anonymous: no user record, and the identity must never be
            // echoed downstream.
            return;
        };
        match self.report.users.entry(author.id) {
            Entry::Occupied(mut entry) => {
                if info.timestamp < entry.get().first_seen {
                    *entry.get_mut() = User {
                        id: author.id,
                        display_name: author.display_name.clone(),
                        first_seen: info.timestamp,
                    };
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(User {
                    id: author.id,
                    display_name: author.display_name.clone(),
                    first_seen: info.timestamp,
                });
            }
        }
    }
}
