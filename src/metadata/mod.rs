//! Immutable, load-once-at-startup stores consulted by [`crate::annotate`]:
//! IRR route objects, RPKI ROAs, and organisation/maintainer/contact
//! relation tables (§4.7).

mod relations;
mod roa;
mod route_objects;

pub use relations::{RelationKind, RelationStore};
pub use roa::RoaStore;
pub use route_objects::RouteObjectStore;
