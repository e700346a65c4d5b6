/*!
Normaliser for the "mabo" decoder output format: one JSON object per line,
either a table-dump-v2 snapshot or an update (§6).
*/

use crate::models::{AsPath, Asn, InternalMessage, MessageKind, Origin};
use serde::Deserialize;
use std::net::IpAddr;
use std::str::FromStr;

#[derive(Deserialize)]
struct MaboEntry {
    peer_as: u32,
    peer_ip: String,
    as_path: String,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum MaboMessage {
    #[serde(rename = "table_dump_v2")]
    TableDumpV2 {
        timestamp: f64,
        prefix: String,
        #[serde(default)]
        entries: Vec<MaboEntry>,
    },
    #[serde(rename = "update")]
    Update {
        timestamp: f64,
        peer_as: u32,
        peer_ip: String,
        #[serde(default)]
        as_path: String,
        #[serde(default)]
        announce: Vec<String>,
        #[serde(default)]
        withdraw: Vec<String>,
    },
}

fn origin_and_path(as_path: &str) -> Option<(Origin, AsPath)> {
    match AsPath::parse(as_path) {
        Ok(path) => match path.origin() {
            Ok(origin) => Some((origin, path)),
            Err(e) => {
                log::warn!("invalid AS_PATH {:?}: {}", as_path, e);
                None
            }
        },
        Err(e) => {
            log::warn!("invalid AS_PATH {:?}: {}", as_path, e);
            None
        }
    }
}

/// Decodes one mabo-format line into zero or more [`InternalMessage`]s.
/// Malformed JSON, unsupported message types, unparseable prefixes/peer
/// IPs and unparseable AS-paths are all skip-and-warn (§7): the line
/// contributes no messages rather than aborting the stream.
pub fn decode_line(collector: &str, line: &str) -> Vec<InternalMessage> {
    let parsed: MaboMessage = match serde_json::from_str(line) {
        Ok(m) => m,
        Err(e) => {
            log::warn!("unparseable mabo line: {}", e);
            return Vec::new();
        }
    };

    match parsed {
        MaboMessage::TableDumpV2 { timestamp, prefix, entries } => {
            let Ok(prefix) = prefix.parse() else {
                log::warn!("unparseable prefix {:?}", prefix);
                return Vec::new();
            };
            entries
                .into_iter()
                .filter_map(|entry| {
                    if entry.as_path.is_empty() {
                        // IGP-origin announce, silently skipped (§7).
                        return None;
                    }
                    let (origin, as_path) = origin_and_path(&entry.as_path)?;
                    let Ok(peer_ip) = IpAddr::from_str(&entry.peer_ip) else {
                        log::warn!("unparseable peer_ip {:?}", entry.peer_ip);
                        return None;
                    };
                    Some(InternalMessage {
                        kind: MessageKind::Full,
                        timestamp,
                        collector: collector.to_string(),
                        peer_as: Asn(entry.peer_as),
                        peer_ip,
                        prefix,
                        origin: Some(origin),
                        as_path: Some(as_path),
                    })
                })
                .collect()
        }
        MaboMessage::Update {
            timestamp,
            peer_as,
            peer_ip,
            as_path,
            announce,
            withdraw,
        } => {
            let Ok(peer_ip) = IpAddr::from_str(&peer_ip) else {
                log::warn!("unparseable peer_ip {:?}", peer_ip);
                return Vec::new();
            };
            let mut out = Vec::new();
            for prefix in withdraw {
                let Ok(prefix) = prefix.parse() else {
                    log::warn!("unparseable withdraw prefix {:?}", prefix);
                    continue;
                };
                out.push(InternalMessage {
                    kind: MessageKind::Withdraw,
                    timestamp,
                    collector: collector.to_string(),
                    peer_as: Asn(peer_as),
                    peer_ip,
                    prefix,
                    origin: None,
                    as_path: None,
                });
            }
            if !as_path.is_empty() {
                if let Some((origin, parsed_path)) = origin_and_path(&as_path) {
                    for prefix in announce {
                        let Ok(prefix) = prefix.parse() else {
                            log::warn!("unparseable announce prefix {:?}", prefix);
                            continue;
                        };
                        out.push(InternalMessage {
                            kind: MessageKind::Announce,
                            timestamp,
                            collector: collector.to_string(),
                            peer_as: Asn(peer_as),
                            peer_ip,
                            prefix,
                            origin: Some(origin.clone()),
                            as_path: Some(parsed_path.clone()),
                        });
                    }
                }
            }
            out
        }
    }
}
