use crate::models::Asn;
use itertools::Either;
use std::collections::BTreeSet;

/// The origin of a route: either a single ASN, or a non-empty set of ASNs
/// from an AS_SET segment at the end of an AS-path.
///
/// Replaces the "int or set" dual type of the design this was distilled
/// from with an explicit variant plus [`Origin::intersects`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Origin {
    Single(Asn),
    Set(BTreeSet<Asn>),
}

impl Origin {
    pub fn single(asn: Asn) -> Self {
        Origin::Single(asn)
    }

    /// Builds an `Origin` from a non-empty set, collapsing to `Single` when
    /// exactly one ASN is present -- mirrors the `len(origin) == 1` collapse
    /// the decoders perform when normalising an AS_SET origin.
    pub fn from_set(set: BTreeSet<Asn>) -> Option<Self> {
        let mut iter = set.iter();
        let first = *iter.next()?;
        if iter.next().is_none() {
            Some(Origin::Single(first))
        } else {
            Some(Origin::Set(set))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Asn> + '_ {
        match self {
            Origin::Single(asn) => Either::Left(std::iter::once(*asn)),
            Origin::Set(set) => Either::Right(set.iter().copied()),
        }
    }

    pub fn contains(&self, asn: Asn) -> bool {
        match self {
            Origin::Single(a) => *a == asn,
            Origin::Set(set) => set.contains(&asn),
        }
    }

    /// Two origins are "same origin" iff their ASN sets intersect -- an AS
    /// cannot hijack itself, checked with this rather than equality so that
    /// an announce from any ASN in a stored AS_SET origin is not a conflict.
    pub fn intersects(&self, other: &Origin) -> bool {
        match (self, other) {
            (Origin::Single(a), Origin::Single(b)) => a == b,
            (Origin::Single(a), Origin::Set(set)) | (Origin::Set(set), Origin::Single(a)) => {
                set.contains(a)
            }
            (Origin::Set(a), Origin::Set(b)) => a.intersection(b).next().is_some(),
        }
    }
}
