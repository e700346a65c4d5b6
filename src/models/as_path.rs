use crate::models::{Asn, Origin};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

/// One canonical AS-path segment: a single ASN (from a prepended AS_SEQUENCE
/// entry) or the members of an AS_SET.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsPathSegment {
    Asn(Asn),
    Set(Vec<Asn>),
}

impl AsPathSegment {
    fn contains(&self, asn: Asn) -> bool {
        match self {
            AsPathSegment::Asn(a) => *a == asn,
            AsPathSegment::Set(set) => set.contains(&asn),
        }
    }
}

/// A canonicalised AS-path: segments read left-to-right, nearest peer first,
/// with consecutive duplicate single-ASN segments (prepending) already
/// collapsed. An AS_SET may only appear as the last segment -- a leading
/// AS_SET is rejected at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsPath(pub Vec<AsPathSegment>);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AsPathError {
    #[error("AS_SET cannot be the first segment of an AS-path: {0:?}")]
    LeadingAsSet(String),
    #[error("non-integer AS-path segment: {0:?}")]
    NonInteger(String),
    #[error("AS-path is empty")]
    Empty,
}

impl AsPath {
    /// Parses a space-separated wire AS-path, e.g. `"64501 64502 {64503,64504}"`,
    /// into canonical form. Mirrors the tolerances documented for BGP hijack
    /// decoders: a leading AS_SET is rejected, a trailing AS_SET is allowed
    /// and expanded, and a non-integer segment is rejected.
    pub fn parse(raw: &str) -> Result<AsPath, AsPathError> {
        let mut segments: Vec<AsPathSegment> = Vec::new();
        for (i, token) in raw.split_whitespace().enumerate() {
            if let Some(inner) = token.strip_prefix('{').and_then(|t| t.strip_suffix('}')) {
                if i == 0 {
                    return Err(AsPathError::LeadingAsSet(raw.to_string()));
                }
                let mut set = Vec::new();
                for asn_str in inner.split(',') {
                    let asn_str = asn_str.trim();
                    if asn_str.is_empty() {
                        continue;
                    }
                    let asn: u32 = asn_str
                        .parse()
                        .map_err(|_| AsPathError::NonInteger(token.to_string()))?;
                    set.push(Asn(asn));
                }
                segments.push(AsPathSegment::Set(set));
            } else {
                let asn: u32 = token
                    .parse()
                    .map_err(|_| AsPathError::NonInteger(token.to_string()))?;
                let asn = Asn(asn);
                let collapse = matches!(segments.last(), Some(AsPathSegment::Asn(last)) if *last == asn);
                if !collapse {
                    segments.push(AsPathSegment::Asn(asn));
                }
            }
        }
        Ok(AsPath(segments))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The origin of the route: the ASN(s) in the last canonical segment.
    pub fn origin(&self) -> Result<Origin, AsPathError> {
        match self.0.last() {
            None => Err(AsPathError::Empty),
            Some(AsPathSegment::Asn(asn)) => Ok(Origin::Single(*asn)),
            Some(AsPathSegment::Set(set)) => {
                let set: BTreeSet<Asn> = set.iter().copied().collect();
                Origin::from_set(set).ok_or(AsPathError::Empty)
            }
        }
    }

    /// True iff `asn` appears in the second-to-last segment of the path --
    /// the "directly connected to the hijacker" check used by
    /// [`crate::annotate::direct`].
    pub fn second_to_last_contains(&self, asn: Asn) -> bool {
        self.0.len() > 1 && self.0[self.0.len() - 2].contains(asn)
    }

    /// True iff `asn` appears anywhere strictly before the second-to-last
    /// segment.
    pub fn contains_before_second_to_last(&self, asn: Asn) -> bool {
        self.0.len() > 2 && self.0[..self.0.len() - 2].iter().any(|s| s.contains(asn))
    }
}

impl Display for AsPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|seg| match seg {
                AsPathSegment::Asn(asn) => asn.to_string(),
                AsPathSegment::Set(set) => {
                    let inner: Vec<String> = set.iter().map(Asn::to_string).collect();
                    format!("{{{}}}", inner.join(","))
                }
            })
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_consecutive_duplicate_prepends() {
        let path = AsPath::parse("64501 64501 64502").unwrap();
        assert_eq!(
            path.0,
            vec![
                AsPathSegment::Asn(Asn(64501)),
                AsPathSegment::Asn(Asn(64502))
            ]
        );
    }

    #[test]
    fn leading_as_set_is_rejected() {
        let err = AsPath::parse("{3,4} 1").unwrap_err();
        assert!(matches!(err, AsPathError::LeadingAsSet(_)));
    }

    #[test]
    fn trailing_as_set_is_expanded_into_origin() {
        let path = AsPath::parse("1 {3}").unwrap();
        assert_eq!(path.origin().unwrap(), Origin::Single(Asn(3)));
    }

    #[test]
    fn non_integer_segment_is_rejected() {
        let err = AsPath::parse("1 abc 3").unwrap_err();
        assert!(matches!(err, AsPathError::NonInteger(_)));
    }

    #[test]
    fn canonicalising_a_canonical_path_is_identity() {
        let path = AsPath::parse("64501 64502 64503").unwrap();
        let roundtrip = AsPath::parse(&path.to_string()).unwrap();
        assert_eq!(path, roundtrip);
    }

    #[test]
    fn direct_adjacency_checks_second_to_last_segment() {
        // path read nearest -> farthest; path[-2] is adjacent to the origin.
        let path = AsPath::parse("64501 666 64497").unwrap();
        assert!(path.second_to_last_contains(Asn(666)));
        assert!(!path.contains_before_second_to_last(Asn(666)));

        let longer = AsPath::parse("64501 64502 64503 64497").unwrap();
        assert!(!longer.second_to_last_contains(Asn(64501)));
        assert!(longer.contains_before_second_to_last(Asn(64501)));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Re-canonicalising an already-canonical path is the identity:
        /// parsing its own `Display` output always reproduces it exactly.
        #[test]
        fn canonicalising_a_canonical_path_is_idempotent(asns in prop::collection::vec(1u32..65536, 1..8)) {
            let raw = asns.iter().map(u32::to_string).collect::<Vec<_>>().join(" ");
            let path = AsPath::parse(&raw).unwrap();
            let roundtrip = AsPath::parse(&path.to_string()).unwrap();
            prop_assert_eq!(path, roundtrip);
        }
    }
}
