/*!
The output record shape (§6): newline-delimited JSON with field order
preserved. `serde`'s struct-field order drives the emitted key order, so
the struct layout here is the contract, not just documentation.
*/

use crate::classify::{classify, ConflictType};
use crate::engine::Conflict;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct SideRecord {
    pub prefix: String,
    pub asn: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_path: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub valid: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConflictRecord {
    pub timestamp: f64,
    pub collector: String,
    pub peer_as: u32,
    pub peer_ip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub announce: Option<SideRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub withdraw: Option<SideRecord>,
    pub conflict_with: SideRecord,
    pub asn: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub relation: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direct: Option<bool>,
    #[serde(rename = "type")]
    pub conflict_type: String,
}

impl From<&Conflict> for ConflictRecord {
    fn from(c: &Conflict) -> Self {
        let conflict_with = SideRecord {
            prefix: c.conflict_with.prefix.to_string(),
            asn: c.conflict_with.asn.0,
            as_path: None,
            valid: c.conflict_with_valid.clone(),
        };
        let side = SideRecord {
            prefix: c.side.prefix.to_string(),
            asn: c.side.asn.0,
            as_path: c.side.as_path.as_ref().map(|p| p.to_string()),
            valid: c.side_valid.clone(),
        };

        let (announce, withdraw) = match c.kind {
            crate::engine::ConflictKind::Announce => (Some(side), None),
            crate::engine::ConflictKind::Withdraw => (None, Some(side)),
        };

        ConflictRecord {
            timestamp: c.timestamp,
            collector: c.collector.clone(),
            peer_as: c.peer_as.0,
            peer_ip: c.peer_ip.to_string(),
            announce,
            withdraw,
            conflict_with,
            asn: c.asn.0,
            relation: c.relation.clone(),
            direct: c.direct,
            conflict_type: classify(c).to_string(),
        }
    }
}

impl ConflictRecord {
    pub fn is_abnormal(&self) -> bool {
        self.conflict_type == ConflictType::Abnormal.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{ConflictKind, ConflictWith, Side};
    use crate::models::Asn;
    use std::net::{IpAddr, Ipv4Addr};

    fn conflict() -> Conflict {
        Conflict {
            timestamp: 2807.0,
            collector: "c".into(),
            peer_as: Asn(64496),
            peer_ip: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            kind: ConflictKind::Announce,
            side: Side {
                prefix: "1.2.3.0/24".parse().unwrap(),
                asn: Asn(666),
                as_path: Some(crate::models::AsPath::parse("64501 666").unwrap()),
            },
            conflict_with: ConflictWith {
                prefix: "1.2.0.0/16".parse().unwrap(),
                asn: Asn(64497),
            },
            asn: Asn(64497),
            side_valid: Vec::new(),
            conflict_with_valid: Vec::new(),
            relation: Vec::new(),
            direct: None,
        }
    }

    #[test]
    fn unannotated_conflict_is_abnormal_and_serializes_as_announce() {
        let record = ConflictRecord::from(&conflict());
        assert!(record.is_abnormal());
        assert!(record.announce.is_some());
        assert!(record.withdraw.is_none());
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.starts_with(r#"{"timestamp":2807.0,"collector":"c""#));
        assert!(json.contains(r#""type":"ABNORMAL"#));
    }

    #[test]
    fn withdraw_kind_serializes_under_withdraw_key() {
        let mut c = conflict();
        c.kind = ConflictKind::Withdraw;
        c.side.as_path = None;
        let record = ConflictRecord::from(&c);
        assert!(record.announce.is_none());
        assert!(record.withdraw.is_some());
    }
}
