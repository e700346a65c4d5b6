/*!
The update engine: the single state-transition function the whole
pipeline is built around.

`process_message` is a synchronous, non-suspending, total function: it
never raises (§7 of the design notes), and always returns whatever
defaults/routes/conflicts it was able to compute, even for malformed
input.
*/

pub mod conflict;
pub mod route;

pub use conflict::{Conflict, ConflictKind, ConflictWith, Side};
pub use route::{DefaultRecord, RouteRecordOut};

use crate::models::{InternalMessage, Prefix};
use crate::rib::Rib;

/// Which definition of "default route" the default-route filter applies.
/// `Mask8` (the documented default) treats any IPv4 prefix shorter than
/// `/8` as default; `Literal` restricts that to the literal `0.0.0.0/0`
/// and `::/0`, matching the stricter sharded-deployment variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultRouteMode {
    #[default]
    Mask8,
    Literal,
}

impl DefaultRouteMode {
    pub(crate) fn is_default(&self, prefix: &Prefix) -> bool {
        match self {
            DefaultRouteMode::Mask8 => prefix.is_default_by_mask(),
            DefaultRouteMode::Literal => prefix.is_literal_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProcessOutcome {
    pub defaults: Vec<DefaultRecord>,
    pub routes: Vec<RouteRecordOut>,
    pub conflicts: Vec<Conflict>,
}

/// Applies one normalised message to `rib`.
///
/// `is_watched`, when given, gates whether an announce that produced no
/// conflict is installed into the RIB at all (§4.3 step 3); a withdraw is
/// always applied regardless.
pub fn process_message(
    rib: &mut Rib,
    msg: &InternalMessage,
    mode: DefaultRouteMode,
    is_watched: Option<&dyn Fn(&InternalMessage) -> bool>,
) -> ProcessOutcome {
    // Step 1: default-route filter. A withdraw carries no origin, so this
    // only ever trips for announces; a withdraw of a prefix that was never
    // installed (because it was default) is a harmless soft miss below.
    if let Some(origin) = &msg.origin {
        if mode.is_default(&msg.prefix) {
            let defaults = origin
                .iter()
                .map(|asn| DefaultRecord {
                    timestamp: msg.timestamp,
                    collector: msg.collector.clone(),
                    peer_as: msg.peer_as,
                    peer_ip: msg.peer_ip,
                    prefix: msg.prefix,
                    asn,
                    as_path: msg.as_path.clone(),
                })
                .collect();
            return ProcessOutcome {
                defaults,
                ..Default::default()
            };
        }
    }

    if msg.is_malformed() {
        log::warn!("dropping malformed message (origin/as_path mismatch): {:?}", msg);
        return ProcessOutcome::default();
    }

    // Step 2: conflict detection, against the RIB as it stands *before*
    // this message's own mutation.
    let conflicts = detect_conflicts(rib, msg);

    // Step 3/4: RIB mutation and route emission.
    let routes = if msg.is_withdraw() {
        apply_withdraw(rib, msg)
    } else {
        let watched = conflicts.is_empty()
            && is_watched.is_some_and(|f| !f(msg));
        if watched {
            Vec::new()
        } else {
            apply_announce(rib, msg)
        }
    };

    ProcessOutcome {
        defaults: Vec::new(),
        routes,
        conflicts,
    }
}

fn detect_conflicts(rib: &Rib, msg: &InternalMessage) -> Vec<Conflict> {
    let origin = match &msg.origin {
        Some(origin) => origin.clone(),
        None => {
            let peer = msg.peer_id();
            let covering = rib.search_all_containing(msg.prefix);
            match covering.first().and_then(|(_, peers)| peers.get(&peer)) {
                Some(record) => record.origin.clone(),
                None => return Vec::new(),
            }
        }
    };

    let kind = if msg.as_path.is_some() {
        ConflictKind::Announce
    } else {
        ConflictKind::Withdraw
    };

    let mut conflicts = Vec::new();
    for (node_prefix, peers) in rib.search_all_containing(msg.prefix) {
        let mut foreign: std::collections::BTreeSet<crate::models::Asn> =
            std::collections::BTreeSet::new();
        for record in peers.values() {
            if !origin.intersects(&record.origin) {
                foreign.extend(record.origin.iter());
            }
        }
        for asn in foreign {
            for our_asn in origin.iter() {
                conflicts.push(Conflict {
                    timestamp: msg.timestamp,
                    collector: msg.collector.clone(),
                    peer_as: msg.peer_as,
                    peer_ip: msg.peer_ip,
                    kind,
                    side: Side {
                        prefix: msg.prefix,
                        asn: our_asn,
                        as_path: msg.as_path.clone(),
                    },
                    conflict_with: ConflictWith {
                        prefix: node_prefix,
                        asn,
                    },
                    asn,
                    side_valid: Vec::new(),
                    conflict_with_valid: Vec::new(),
                    relation: Vec::new(),
                    direct: None,
                });
            }
        }
    }
    conflicts
}

fn apply_withdraw(rib: &mut Rib, msg: &InternalMessage) -> Vec<RouteRecordOut> {
    let peer = msg.peer_id();
    let Some(removed) = rib.pop(msg.prefix, peer) else {
        return Vec::new();
    };
    let peers_remaining = rib
        .search_all_containing(msg.prefix)
        .first()
        .map(|(p, peers)| if *p == msg.prefix { peers.len() } else { 0 })
        .unwrap_or(0);
    removed
        .origin
        .iter()
        .map(|asn| RouteRecordOut {
            timestamp: msg.timestamp,
            collector: msg.collector.clone(),
            peer_as: msg.peer_as,
            peer_ip: msg.peer_ip,
            kind: msg.kind,
            prefix: msg.prefix,
            as_path: None,
            asn,
            num_routes: peers_remaining,
        })
        .collect()
}

/// Installs an announce-shaped message into `rib` and emits its route
/// records. Exposed `pub(crate)` so the pipeline driver's priming phase
/// (§4.4) can install bview entries the same way a live announce would be,
/// without routing them back through conflict detection.
pub(crate) fn apply_announce(rib: &mut Rib, msg: &InternalMessage) -> Vec<RouteRecordOut> {
    let origin = msg.origin.clone().expect("announce always carries an origin");
    let peer = msg.peer_id();
    let record = crate::models::RouteRecord::new(origin.clone(), msg.timestamp);
    rib.update(msg.prefix, peer, record);
    let num_routes = rib
        .search_all_containing(msg.prefix)
        .first()
        .map(|(_, peers)| peers.len())
        .unwrap_or(0);
    origin
        .iter()
        .map(|asn| RouteRecordOut {
            timestamp: msg.timestamp,
            collector: msg.collector.clone(),
            peer_as: msg.peer_as,
            peer_ip: msg.peer_ip,
            kind: msg.kind,
            prefix: msg.prefix,
            as_path: msg.as_path.clone(),
            asn,
            num_routes,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asn, MessageKind, Origin};
    use std::net::{IpAddr, Ipv4Addr};

    fn msg(
        kind: MessageKind,
        prefix: &str,
        origin: Option<u32>,
        as_path: Option<&str>,
    ) -> InternalMessage {
        InternalMessage {
            kind,
            timestamp: 2807.0,
            collector: "c".to_string(),
            peer_as: Asn(64496),
            peer_ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            prefix: prefix.parse().unwrap(),
            origin: origin.map(|a| Origin::single(Asn(a))),
            as_path: as_path.map(|p| crate::models::AsPath::parse(p).unwrap()),
        }
    }

    #[test]
    fn exact_prefix_hijack() {
        let mut rib = Rib::new();
        let a1 = msg(MessageKind::Announce, "1.2.0.0/16", Some(64497), Some("64501 64497"));
        process_message(&mut rib, &a1, DefaultRouteMode::Mask8, None);

        let a2 = msg(MessageKind::Announce, "1.2.0.0/16", Some(666), Some("64501 666"));
        let out = process_message(&mut rib, &a2, DefaultRouteMode::Mask8, None);
        assert_eq!(out.conflicts.len(), 1);
        assert_eq!(out.conflicts[0].asn, Asn(64497));
        assert_eq!(out.conflicts[0].side.asn, Asn(666));
        assert_eq!(out.conflicts[0].conflict_with.prefix.to_string(), "1.2.0.0/16");
    }

    #[test]
    fn more_specific_hijack() {
        let mut rib = Rib::new();
        let a1 = msg(MessageKind::Announce, "1.2.0.0/16", Some(64497), Some("64501 64497"));
        process_message(&mut rib, &a1, DefaultRouteMode::Mask8, None);

        let a2 = msg(MessageKind::Announce, "1.2.3.0/24", Some(666), Some("64501 666"));
        let out = process_message(&mut rib, &a2, DefaultRouteMode::Mask8, None);
        assert_eq!(out.conflicts.len(), 1);
        assert_eq!(out.conflicts[0].conflict_with.prefix.to_string(), "1.2.0.0/16");
    }

    #[test]
    fn multi_origin_coverage_most_specific_first() {
        let mut rib = Rib::new();
        process_message(
            &mut rib,
            &msg(MessageKind::Announce, "1.2.0.0/16", Some(64497), Some("64501 64497")),
            DefaultRouteMode::Mask8,
            None,
        );
        process_message(
            &mut rib,
            &msg(MessageKind::Announce, "1.0.0.0/8", Some(64497), Some("64501 64497")),
            DefaultRouteMode::Mask8,
            None,
        );
        let out = process_message(
            &mut rib,
            &msg(MessageKind::Announce, "1.2.0.0/16", Some(666), Some("64501 666")),
            DefaultRouteMode::Mask8,
            None,
        );
        assert_eq!(out.conflicts.len(), 2);
        assert_eq!(out.conflicts[0].conflict_with.prefix.to_string(), "1.2.0.0/16");
        assert_eq!(out.conflicts[1].conflict_with.prefix.to_string(), "1.0.0.0/8");
    }

    #[test]
    fn per_peer_withdraw_is_isolated() {
        let mut rib = Rib::new();
        let peer_a = msg(MessageKind::Announce, "1.2.0.0/16", Some(64497), Some("64501 64497"));
        let mut peer_b = msg(MessageKind::Announce, "1.2.0.0/16", Some(64497), Some("64502 64497"));
        peer_b.peer_as = Asn(64498);
        process_message(&mut rib, &peer_a, DefaultRouteMode::Mask8, None);
        process_message(&mut rib, &peer_b, DefaultRouteMode::Mask8, None);

        let withdraw_a = msg(MessageKind::Withdraw, "1.2.0.0/16", None, None);
        let out = process_message(&mut rib, &withdraw_a, DefaultRouteMode::Mask8, None);
        assert!(out.conflicts.is_empty());
        assert_eq!(rib.node_count(), 1);
        assert!(rib.lookup("1.2.0.0/16".parse().unwrap(), peer_b.peer_id()).is_some());
    }

    #[test]
    fn withdraw_of_a_hijack_resolves_origin_from_rib() {
        let mut rib = Rib::new();
        process_message(
            &mut rib,
            &msg(MessageKind::Full, "1.2.3.0/24", Some(64497), Some("64501 64497")),
            DefaultRouteMode::Mask8,
            None,
        );
        let attacker_peer = {
            let mut m = msg(MessageKind::Announce, "1.2.3.4/32", Some(666), Some("64501 666"));
            m.peer_as = Asn(64499);
            m
        };
        process_message(&mut rib, &attacker_peer, DefaultRouteMode::Mask8, None);

        let mut withdraw = msg(MessageKind::Withdraw, "1.2.3.4/32", None, None);
        withdraw.peer_as = Asn(64499);
        let out = process_message(&mut rib, &withdraw, DefaultRouteMode::Mask8, None);
        assert_eq!(out.conflicts.len(), 1);
        assert_eq!(out.conflicts[0].conflict_with.asn, Asn(64497));
        assert_eq!(out.conflicts[0].kind, ConflictKind::Withdraw);
    }

    #[test]
    fn no_conflict_when_same_origin_intersects() {
        let mut rib = Rib::new();
        process_message(
            &mut rib,
            &msg(MessageKind::Announce, "1.2.0.0/16", Some(64497), Some("64501 64497")),
            DefaultRouteMode::Mask8,
            None,
        );
        let out = process_message(
            &mut rib,
            &msg(MessageKind::Announce, "1.2.3.0/24", Some(64497), Some("64502 64497")),
            DefaultRouteMode::Mask8,
            None,
        );
        assert!(out.conflicts.is_empty());
    }

    #[test]
    fn default_route_never_enters_rib() {
        let mut rib = Rib::new();
        let out = process_message(
            &mut rib,
            &msg(MessageKind::Announce, "1.0.0.0/7", Some(64497), Some("64497")),
            DefaultRouteMode::Mask8,
            None,
        );
        assert_eq!(out.defaults.len(), 1);
        assert!(out.routes.is_empty());
        assert!(out.conflicts.is_empty());
        assert_eq!(rib.node_count(), 0);
    }

    #[test]
    fn withdraw_of_unknown_route_is_a_soft_miss() {
        let mut rib = Rib::new();
        let out = process_message(
            &mut rib,
            &msg(MessageKind::Withdraw, "9.9.9.0/24", None, None),
            DefaultRouteMode::Mask8,
            None,
        );
        assert!(out.routes.is_empty());
        assert!(out.conflicts.is_empty());
        assert_eq!(rib.node_count(), 0);
    }
}
