//! The four annotators applied to every raw conflict before classification
//! (§4.5). Order does not affect the result -- each annotator only adds
//! to disjoint fields of [`Conflict`] -- but the fixed order documented
//! here (route objects, ROA, relation, direct) matches the upstream
//! pipeline and is what the integration tests exercise.

pub mod direct;
pub mod relation;
pub mod roa;
pub mod route_objects;

use crate::engine::Conflict;
use crate::metadata::{RelationStore, RoaStore, RouteObjectStore};

/// The metadata stores available to an annotation pass. Each is optional:
/// a store that was never loaded (no `--irr-*-file`/`--rpki-roa-file` flag)
/// simply contributes no evidence, per §7's "annotators are total" policy.
#[derive(Default)]
pub struct Annotators<'a> {
    pub route_objects: Option<&'a RouteObjectStore>,
    pub roa: Option<&'a RoaStore>,
    pub relations: Option<&'a RelationStore>,
}

/// Runs every configured annotator over `conflict` in the documented order.
pub fn annotate(annotators: &Annotators<'_>, conflict: &mut Conflict) {
    if let Some(store) = annotators.route_objects {
        route_objects::annotate(store, conflict);
    }
    if let Some(store) = annotators.roa {
        roa::annotate(store, conflict);
    }
    if let Some(store) = annotators.relations {
        relation::annotate(store, conflict);
    }
    direct::annotate(conflict);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ConflictKind, ConflictWith, Side};
    use crate::models::{AsPath, Asn};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn an_unannotated_conflict_carries_no_evidence() {
        let mut c = Conflict {
            timestamp: 0.0,
            collector: "c".into(),
            peer_as: Asn(64496),
            peer_ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            kind: ConflictKind::Announce,
            side: Side {
                prefix: "1.2.3.0/24".parse().unwrap(),
                asn: Asn(666),
                as_path: Some(AsPath::parse("64501 64497 666").unwrap()),
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
        };
        annotate(&Annotators::default(), &mut c);
        assert!(c.side_valid.is_empty());
        assert!(c.conflict_with_valid.is_empty());
        assert!(c.relation.is_empty());
        assert_eq!(c.direct, Some(true));
    }
}
