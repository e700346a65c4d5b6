use crate::engine::Conflict;
use crate::metadata::RoaStore;

/// Annotator 2 (§4.5): append the literal `"roa"` to a side's `valid` list
/// if some covering ROA authorizes that side's ASN at that prefix length.
pub fn annotate(store: &RoaStore, conflict: &mut Conflict) {
    if store.validates(conflict.side.prefix, conflict.side.asn) {
        conflict.side_valid.push("roa".to_string());
    }
    if store.validates(conflict.conflict_with.prefix, conflict.conflict_with.asn) {
        conflict.conflict_with_valid.push("roa".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ConflictKind, ConflictWith, Side};
    use crate::models::Asn;
    use std::net::{IpAddr, Ipv4Addr};

    fn conflict() -> Conflict {
        Conflict {
            timestamp: 0.0,
            collector: "c".into(),
            peer_as: Asn(64496),
            peer_ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            kind: ConflictKind::Announce,
            side: Side {
                prefix: "1.2.3.0/24".parse().unwrap(),
                asn: Asn(666),
                as_path: None,
            },
            conflict_with: ConflictWith {
                prefix: "1.2.0.0/16".parse().unwrap(),
                asn: Asn(64497),
            },
            asn: Asn(64497),
            side_valid: Vec::new(),
            conflict_with_valid: Vec::new(),
            relation: Vec::new(),
            direct: None,
        }
    }

    #[test]
    fn validates_conflict_with_side_from_roa() {
        let mut store = RoaStore::new();
        store.insert("1.2.0.0/16".parse().unwrap(), Asn(64497), 16);
        let mut c = conflict();
        annotate(&store, &mut c);
        assert_eq!(c.conflict_with_valid, vec!["roa".to_string()]);
    }

    #[test]
    fn does_not_validate_unmatched_asn() {
        let store = RoaStore::new();
        let mut c = conflict();
        annotate(&store, &mut c);
        assert!(c.side_valid.is_empty());
        assert!(c.conflict_with_valid.is_empty());
    }
}
