use crate::models::Asn;
use std::fmt::{Display, Formatter};
use std::net::IpAddr;

/// The identifier of a BGP peering session as seen by the collector: the
/// pair `(peer_as, peer_ip)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PeerId {
    pub peer_as: Asn,
    pub peer_ip: IpAddr,
}

impl PeerId {
    pub fn new(peer_as: Asn, peer_ip: IpAddr) -> Self {
        PeerId { peer_as, peer_ip }
    }
}

impl Display for PeerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.peer_as, self.peer_ip)
    }
}
