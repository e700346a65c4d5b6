use crate::models::{AsPath, Asn, PeerId, Prefix};

/// Which side of the conflict `side` represents: the incoming message
/// (`Announce`, carrying an AS-path) or its withdraw (none).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    Announce,
    Withdraw,
}

/// The incoming message's half of the conflict: `{prefix, asn, as_path?}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Side {
    pub prefix: Prefix,
    pub asn: Asn,
    pub as_path: Option<AsPath>,
}

/// The pre-existing RIB entry this message conflicts with: `{prefix, asn}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConflictWith {
    pub prefix: Prefix,
    pub asn: Asn,
}

/// One raw conflict: an incoming origin that is not the same origin as a
/// record already covering (or covered by) the message's prefix.
///
/// `side_valid`/`conflict_with_valid`/`relation`/`direct` start empty/unset
/// and are filled in by [`crate::annotate`], in the order documented there.
/// [`crate::classify::classify`] reads them but never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub timestamp: f64,
    pub collector: String,
    pub peer_as: Asn,
    pub peer_ip: std::net::IpAddr,
    pub kind: ConflictKind,
    pub side: Side,
    pub conflict_with: ConflictWith,
    pub asn: Asn,
    pub side_valid: Vec<String>,
    pub conflict_with_valid: Vec<String>,
    pub relation: Vec<String>,
    pub direct: Option<bool>,
}

impl Conflict {
    pub fn peer_id(&self) -> PeerId {
        PeerId::new(self.peer_as, self.peer_ip)
    }
}
