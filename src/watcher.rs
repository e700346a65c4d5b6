/*!
The optional watcher filter (§2 component 9): `is_watched(message) -> bool`
gates which announces get installed into the RIB and reported once they
produce no conflict (§4.3 step 3). Absent entirely, every announce is
installed.
*/

use crate::models::{Asn, InternalMessage};
use std::collections::BTreeSet;

/// A watch-list of ASNs: a message is watched if its peer AS or any ASN in
/// its origin is on the list.
#[derive(Debug, Clone, Default)]
pub struct AsnWatchlist(BTreeSet<Asn>);

impl AsnWatchlist {
    pub fn new(asns: impl IntoIterator<Item = Asn>) -> Self {
        AsnWatchlist(asns.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_watched(&self, msg: &InternalMessage) -> bool {
        if self.0.contains(&msg.peer_as) {
            return true;
        }
        match &msg.origin {
            Some(origin) => origin.iter().any(|asn| self.0.contains(&asn)),
            None => false,
        }
    }

    /// Adapts to the `&dyn Fn(&InternalMessage) -> bool` shape
    /// [`crate::engine::process_message`] expects.
    pub fn as_predicate(&self) -> impl Fn(&InternalMessage) -> bool + '_ {
        move |msg| self.is_watched(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MessageKind, Origin};
    use std::net::{IpAddr, Ipv4Addr};

    fn msg(peer_as: u32, origin: Option<u32>) -> InternalMessage {
        InternalMessage {
            kind: MessageKind::Announce,
            timestamp: 0.0,
            collector: "c".to_string(),
            peer_as: Asn(peer_as),
            peer_ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            prefix: "1.2.0.0/16".parse().unwrap(),
            origin: origin.map(|a| Origin::single(Asn(a))),
            as_path: origin.map(|_| crate::models::AsPath::parse("64497").unwrap()),
        }
    }

    #[test]
    fn watches_by_peer_as() {
        let list = AsnWatchlist::new([Asn(64496)]);
        assert!(list.is_watched(&msg(64496, Some(1))));
        assert!(!list.is_watched(&msg(64498, Some(1))));
    }

    #[test]
    fn watches_by_origin_asn() {
        let list = AsnWatchlist::new([Asn(666)]);
        assert!(list.is_watched(&msg(64496, Some(666))));
    }

    #[test]
    fn empty_watchlist_watches_nothing() {
        let list = AsnWatchlist::default();
        assert!(list.is_empty());
        assert!(!list.is_watched(&msg(64496, Some(666))));
    }
}
