use crate::engine::Conflict;
use crate::metadata::RelationStore;

/// Annotator 3 (§4.5): set `conflict.relation` to the `org`/`contact`/`mnt`
/// labels relating the two ASNs in the conflict.
pub fn annotate(store: &RelationStore, conflict: &mut Conflict) {
    conflict.relation = store.relation_labels(conflict.side.asn, conflict.conflict_with.asn);
}
