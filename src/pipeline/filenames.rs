/*!
RIS filename ordering (§6): `(updates|bview).YYYYMMDD.HHMM`, sorted by
`(timestamp, kind)` with `bview` sorting before `updates` at the same
timestamp.
*/

use crate::error::{CoreError, CoreResult};

fn parse_ris_basename(basename: &str) -> Option<(u64, char)> {
    let (kind, rest) = if let Some(rest) = basename.strip_prefix("bview.") {
        ('b', rest)
    } else if let Some(rest) = basename.strip_prefix("updates.") {
        ('u', rest)
    } else {
        return None;
    };

    let mut parts = rest.splitn(2, '.');
    let date = parts.next()?;
    let time_and_tail = parts.next()?;
    let time = &time_and_tail[..time_and_tail.char_indices().nth(4).map(|(i, _)| i).unwrap_or(time_and_tail.len())];

    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if time.len() != 4 || !time.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let combined: u64 = format!("{date}{time}").parse().ok()?;
    Some((combined, kind))
}

/// Sorts `files` so that, per collector convention, `bview` files precede
/// `updates` files at the same timestamp. Returns `UnsortableFilename` for
/// the first name that doesn't match the RIS pattern.
pub fn sort_ris_filenames(mut files: Vec<String>) -> CoreResult<Vec<String>> {
    let mut keyed = Vec::with_capacity(files.len());
    for file in files.drain(..) {
        let basename = file.rsplit('/').next().unwrap_or(&file);
        let Some((timestamp, kind)) = parse_ris_basename(basename) else {
            return Err(CoreError::UnsortableFilename(file));
        };
        // 1001*timestamp mirrors the upstream key formula: it keeps the
        // timestamp as the dominant sort term while leaving room for the
        // kind character to break same-timestamp ties ('b' < 'u').
        let key = 1001 * timestamp + kind as u64;
        keyed.push((key, file));
    }
    keyed.sort_by_key(|(key, _)| *key);
    Ok(keyed.into_iter().map(|(_, file)| file).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bview_sorts_before_updates_at_same_timestamp() {
        let files = vec![
            "rrc00/updates.20160101.1200".to_string(),
            "rrc00/bview.20160101.1200".to_string(),
        ];
        let sorted = sort_ris_filenames(files).unwrap();
        assert_eq!(sorted, vec!["rrc00/bview.20160101.1200", "rrc00/updates.20160101.1200"]);
    }

    #[test]
    fn sorts_by_timestamp_first() {
        let files = vec![
            "updates.20160101.1200".to_string(),
            "bview.20160101.0000".to_string(),
        ];
        let sorted = sort_ris_filenames(files).unwrap();
        assert_eq!(sorted, vec!["bview.20160101.0000", "updates.20160101.1200"]);
    }

    #[test]
    fn unmatched_name_is_an_error() {
        let err = sort_ris_filenames(vec!["not-a-ris-file.txt".to_string()]).unwrap_err();
        assert!(matches!(err, CoreError::UnsortableFilename(_)));
    }
}
