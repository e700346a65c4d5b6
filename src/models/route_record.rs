use crate::models::Origin;

/// Payload stored in the RIB under one `(prefix, PeerId)` key.
///
/// `access_time` is the driver-injected timestamp used by the bview sweep
/// (§5/§9 of the design notes) to fake-withdraw routes that a new bview
/// cycle did not refresh; it is not an ambient clock read inside the engine.
/// `opaque` is optional context for downstream writers and is never
/// interpreted by the core.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRecord {
    pub origin: Origin,
    pub access_time: f64,
    pub opaque: Option<String>,
}

impl RouteRecord {
    pub fn new(origin: Origin, access_time: f64) -> Self {
        RouteRecord {
            origin,
            access_time,
            opaque: None,
        }
    }

    pub fn with_opaque(mut self, opaque: Option<String>) -> Self {
        self.opaque = opaque;
        self
    }
}
