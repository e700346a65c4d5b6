/*!
Normaliser for `bgpreader -m` pipe-separated output: one record per line,
either a `R|R` full-table dump row or a `U|W`/`U|A` update row.
*/

use crate::models::{Asn, InternalMessage, MessageKind};
use std::net::IpAddr;
use std::str::FromStr;

fn field<'a>(parts: &[&'a str], idx: usize) -> Option<&'a str> {
    parts.get(idx).copied()
}

/// Decodes one `bgpreader -m` line into zero or one [`InternalMessage`].
/// Unrecognised dump/elem type markers and short or unparseable rows are
/// skip-and-warn (§7).
///
/// Field offsets follow the `R|R` (full-table) row shape: `timestamp` at
/// index 2, `peer_as` at 4, `peer_ip` at 5, `prefix` at 6, `as_path` at 8.
/// `U|W`/`U|A` rows share the same layout one position later because they
/// carry no first field; both branches are read with that single offset
/// map applied consistently, rather than treating the update branch as a
/// special case.
pub fn decode_line(collector: &str, line: &str) -> Vec<InternalMessage> {
    let parts: Vec<&str> = line.trim_end().split('|').collect();
    let (Some(dump_type), Some(elem_type)) = (field(&parts, 0), field(&parts, 1)) else {
        log::warn!("unparseable bgpreader line: {:?}", line);
        return Vec::new();
    };

    match (dump_type, elem_type) {
        ("R", "R") => match decode_row(collector, &parts, MessageKind::Full) {
            Some(m) => vec![m],
            None => Vec::new(),
        },
        ("U", "W") => {
            match decode_row(
                collector,
                &parts,
                MessageKind::Withdraw,
            ) {
                Some(m) => vec![m],
                None => Vec::new(),
            }
        }
        ("U", "A") => match decode_row(collector, &parts, MessageKind::Announce) {
            Some(m) => vec![m],
            None => Vec::new(),
        },
        _ => {
            log::warn!("unsupported bgpreader record type {}|{}", dump_type, elem_type);
            Vec::new()
        }
    }
}

fn decode_row(collector: &str, parts: &[&str], kind: MessageKind) -> Option<InternalMessage> {
    let timestamp = field(parts, 2)?.parse().ok()?;
    let peer_as: u32 = field(parts, 4)?.parse().ok()?;
    let peer_ip = IpAddr::from_str(field(parts, 5)?).ok()?;
    let prefix = field(parts, 6)?.parse().ok()?;

    let (origin, as_path) = match kind {
        MessageKind::Withdraw => (None, None),
        MessageKind::Full | MessageKind::Announce => {
            let raw = field(parts, 8)?;
            let path = match crate::models::AsPath::parse(raw) {
                Ok(p) => p,
                Err(e) => {
                    log::warn!("invalid AS_PATH {:?}: {}", raw, e);
                    return None;
                }
            };
            let origin = match path.origin() {
                Ok(o) => o,
                Err(e) => {
                    log::warn!("invalid AS_PATH {:?}: {}", raw, e);
                    return None;
                }
            };
            (Some(origin), Some(path))
        }
    };

    Some(InternalMessage {
        kind,
        timestamp,
        collector: collector.to_string(),
        peer_as: Asn(peer_as),
        peer_ip,
        prefix,
        origin,
        as_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bview_row_yields_a_full_message() {
        let line = "R|R|2807|collector|64496|127.0.0.1|1.2.0.0/16||64501 64497|18|2|NAG||||";
        let msgs = decode_line("c", line);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].kind, MessageKind::Full);
        assert_eq!(msgs[0].peer_as, Asn(64496));
    }

    #[test]
    fn withdraw_row_yields_a_withdraw_message_with_no_as_path() {
        let line = "U|W|2807|collector|64496|127.0.0.1|9.9.0.0/16";
        let msgs = decode_line("c", line);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].kind, MessageKind::Withdraw);
        assert!(msgs[0].as_path.is_none());
    }

    #[test]
    fn announce_row_yields_an_announce_message() {
        let line = "U|A|2807|collector|64496|127.0.0.1|1.2.0.0/16||64501 64497|18|2|NAG||||";
        let msgs = decode_line("c", line);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].kind, MessageKind::Announce);
        assert!(msgs[0].as_path.is_some());
    }

    #[test]
    fn unsupported_elem_type_is_skip_and_warn() {
        let line = "U|S|2807|collector|64496|127.0.0.1|1.2.0.0/16";
        assert!(decode_line("c", line).is_empty());
    }

    #[test]
    fn too_few_fields_is_skip_and_warn() {
        assert!(decode_line("c", "R|R").is_empty());
    }
}
