use crate::models::{AsPath, Asn, Origin, PeerId, Prefix};
use std::net::IpAddr;

/// The kind of a normalised message: `F` full-table entry from a bview,
/// `U` announce, `W` withdraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
    Full,
    Announce,
    Withdraw,
}

/// The uniform message shape the rest of the pipeline operates on, produced
/// by a [`crate::decode`] normaliser from whatever the upstream decoder
/// emits.
///
/// Announces (`Full`, `Announce`) must carry `origin` and `as_path`;
/// withdraws must carry neither. The update engine treats a message whose
/// `origin` and `as_path` are both absent as a withdraw regardless of
/// `kind` -- see [`crate::engine::process_message`].
#[derive(Debug, Clone, PartialEq)]
pub struct InternalMessage {
    pub kind: MessageKind,
    pub timestamp: f64,
    pub collector: String,
    pub peer_as: Asn,
    pub peer_ip: IpAddr,
    pub prefix: Prefix,
    pub origin: Option<Origin>,
    pub as_path: Option<AsPath>,
}

impl InternalMessage {
    pub fn peer_id(&self) -> PeerId {
        PeerId::new(self.peer_as, self.peer_ip)
    }

    pub fn is_withdraw(&self) -> bool {
        self.origin.is_none() && self.as_path.is_none()
    }

    /// A message with an origin but no AS-path (or vice-versa) is malformed;
    /// a well-behaved decoder should never emit one, but the engine tolerates
    /// it by skipping rather than panicking. See §7 of the design notes.
    pub fn is_malformed(&self) -> bool {
        self.origin.is_some() != self.as_path.is_some()
    }
}
