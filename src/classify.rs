/*!
Turns an annotated conflict into a single verdict (§4.6). Precedence is
fixed: VALID beats RELATION beats DIRECT/NODIRECT beats ABNORMAL, and
exactly one label is ever assigned.
*/

use crate::engine::{Conflict, ConflictKind};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConflictType {
    Valid,
    Relation,
    Direct,
    NoDirect,
    Abnormal,
}

impl Display for ConflictType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConflictType::Valid => "VALID",
            ConflictType::Relation => "RELATION",
            ConflictType::Direct => "DIRECT",
            ConflictType::NoDirect => "NODIRECT",
            ConflictType::Abnormal => "ABNORMAL",
        };
        write!(f, "{}", s)
    }
}

/// The announce side's evidence is authoritative; the conflict-with side's
/// is consulted only when there is no announce side at all, i.e. the
/// conflict arose from a withdraw, matching §4.6 rule 1.
pub fn classify(conflict: &Conflict) -> ConflictType {
    let is_valid = match conflict.kind {
        ConflictKind::Announce => !conflict.side_valid.is_empty(),
        ConflictKind::Withdraw => !conflict.conflict_with_valid.is_empty(),
    };
    if is_valid {
        return ConflictType::Valid;
    }
    if !conflict.relation.is_empty() {
        return ConflictType::Relation;
    }
    match conflict.direct {
        Some(true) => ConflictType::Direct,
        Some(false) => ConflictType::NoDirect,
        None => ConflictType::Abnormal,
    }
}
