//! Core data model: [`Asn`], [`Prefix`], [`Origin`], [`AsPath`], [`PeerId`],
//! [`InternalMessage`] and [`RouteRecord`] -- the vocabulary the rest of the
//! crate is built from.

mod as_path;
mod asn;
mod message;
mod origin;
mod peer;
mod prefix;
mod route_record;

pub use as_path::{AsPath, AsPathError, AsPathSegment};
pub use asn::Asn;
pub use message::{InternalMessage, MessageKind};
pub use origin::Origin;
pub use peer::PeerId;
pub use prefix::{Family, Prefix};
pub use route_record::RouteRecord;
