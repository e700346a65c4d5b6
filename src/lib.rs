/*!
Streaming BGP prefix-hijack detector.

This crate replays a stream of normalised BGP announcements and withdraws
through an in-memory RIB, flags prefixes with more than one active
origin, and annotates each conflict against IRR route objects, RPKI ROAs
and registry relation data to classify it along the spectrum from
entirely expected (a customer's backup upstream) to `ABNORMAL` -- the
class worth paging someone over.

# Layout

- [`models`] -- the vocabulary: [`models::Prefix`], [`models::Asn`],
  [`models::AsPath`], [`models::Origin`], [`models::InternalMessage`].
- [`radix`] -- the longest-prefix-match tree the RIB and metadata stores
  are built on.
- [`rib`] -- per-prefix, per-peer route state.
- [`engine`] -- the update engine: applies one message to the RIB and
  reports newly observed conflicts.
- [`metadata`] -- IRR route-object, ROA and registry-relation stores.
- [`annotate`] -- the four independent annotators applied to each
  conflict.
- [`classify`] -- turns a conflict's annotations into a single verdict.
- [`watcher`] -- the prefix/ASN watch-list predicate.
- [`decode`] -- normalisers from the two supported upstream decoder
  output formats into [`models::InternalMessage`].
- [`pipeline`] -- file ordering, priming/streaming phases and the bview
  access-time sweep that together drive the whole thing end to end.
- [`output`] -- the JSON record shapes and writers for detected
  conflicts.
*/

pub mod annotate;
pub mod classify;
pub mod decode;
pub mod engine;
pub mod error;
pub mod metadata;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod radix;
pub mod rib;
pub mod watcher;

pub use error::{CoreError, CoreResult};
pub use models::{AsPath, Asn, InternalMessage, MessageKind, Origin, PeerId, Prefix};
