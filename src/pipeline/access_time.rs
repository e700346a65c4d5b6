/*!
Access-time bookkeeping for the bview "fake withdraw" sweep (§5, §9).

Access time is threaded explicitly rather than read from an ambient
clock: the driver stamps every bview entry with the timestamp of the
bview cycle that produced it, and [`sweep`] removes anything a later
cycle did not refresh.
*/

use crate::rib::Rib;

/// Runs the sweep and returns how many `(prefix, peer)` entries were
/// removed -- purely informational, for driver-level logging.
pub fn sweep(rib: &mut Rib, bview_access_time: f64) -> usize {
    rib.sweep_stale(bview_access_time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Asn, Origin, PeerId, RouteRecord};
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn sweep_drops_entries_from_a_stale_cycle() {
        let mut rib = Rib::new();
        let peer = PeerId::new(Asn(64496), IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)));
        let prefix = "1.2.0.0/16".parse().unwrap();
        rib.update(prefix, peer, RouteRecord::new(Origin::single(Asn(64497)), 100.0));
        assert_eq!(sweep(&mut rib, 200.0), 1);
        assert_eq!(rib.node_count(), 0);
    }
}
