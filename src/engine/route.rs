use crate::models::{AsPath, Asn, MessageKind, PeerId, Prefix};

/// A default-route observation: emitted instead of routes/conflicts when
/// the update engine's default-route filter trips, one per origin ASN.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultRecord {
    pub timestamp: f64,
    pub collector: String,
    pub peer_as: Asn,
    pub peer_ip: std::net::IpAddr,
    pub prefix: Prefix,
    pub asn: Asn,
    pub as_path: Option<AsPath>,
}

/// A steady-state route observation, one per origin ASN, carrying the
/// current peer count at that prefix after the message's RIB mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecordOut {
    pub timestamp: f64,
    pub collector: String,
    pub peer_as: Asn,
    pub peer_ip: std::net::IpAddr,
    pub kind: MessageKind,
    pub prefix: Prefix,
    pub as_path: Option<AsPath>,
    pub asn: Asn,
    pub num_routes: usize,
}

impl RouteRecordOut {
    pub fn peer_id(&self) -> PeerId {
        PeerId::new(self.peer_as, self.peer_ip)
    }
}
