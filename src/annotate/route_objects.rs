use crate::engine::Conflict;
use crate::metadata::RouteObjectStore;

/// Annotator 1 (§4.5): for each side of the conflict, accumulate every IRR
/// authority that declares a route object for that side's `(prefix, asn)`
/// into the side's `valid` list.
pub fn annotate(store: &RouteObjectStore, conflict: &mut Conflict) {
    conflict
        .side_valid
        .extend(store.authorities_for(conflict.side.prefix, conflict.side.asn));
    conflict
        .conflict_with_valid
        .extend(store.authorities_for(conflict.conflict_with.prefix, conflict.conflict_with.asn));
}
