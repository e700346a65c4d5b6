use crate::engine::Conflict;

/// Annotator 4 (§4.5): checks whether the conflicting ASN sits directly
/// adjacent to the announced prefix's origin on the AS-path.
///
/// Only meaningful for announce-kind conflicts -- a withdraw's `side`
/// carries no AS-path, so `direct` is left unset for those, and the
/// classifier falls through to the next rule.
pub fn annotate(conflict: &mut Conflict) {
    let Some(as_path) = &conflict.side.as_path else {
        return;
    };
    let h = conflict.conflict_with.asn;
    if as_path.second_to_last_contains(h) {
        conflict.direct = Some(true);
    } else if as_path.contains_before_second_to_last(h) {
        conflict.direct = Some(false);
    }
}
