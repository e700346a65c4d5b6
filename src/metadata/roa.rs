/*!
The RPKI ROA store: a radix tree of `prefix -> {asn -> max_length}`, where
`max_length` is kept as the maximum observed value across all loaded rows
for that `(asn, prefix)` pair (§4.7). No cryptographic validation is
performed here or anywhere in this crate -- ROA rows are taken as already
validated input, per the out-of-scope list in §1.
*/

use crate::models::{Asn, Prefix};
use crate::radix::PrefixTree;
use std::collections::HashMap;

#[derive(Default)]
pub struct RoaStore {
    tree: PrefixTree<HashMap<Asn, u8>>,
}

impl RoaStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prefix: Prefix, asn: Asn, max_length: u8) {
        let entry = self.tree.add_with(prefix, HashMap::new).entry(asn).or_insert(max_length);
        if max_length > *entry {
            *entry = max_length;
        }
    }

    /// True iff some ROA covering `prefix` authorizes `asn` to originate a
    /// prefix at least as specific as `prefix.prefix_len()` (§4.5
    /// annotator 2: the first matching covering node wins, but since only
    /// one `max_length` is stored per `(prefix, asn)` the result does not
    /// depend on which covering node is inspected first).
    pub fn validates(&self, prefix: Prefix, asn: Asn) -> bool {
        self.tree
            .search_covering(prefix)
            .into_iter()
            .any(|(_, by_asn)| by_asn.get(&asn).is_some_and(|&max_len| prefix.prefix_len() <= max_len))
    }

    #[cfg(feature = "csv")]
    pub fn load_csv<R: std::io::Read>(reader: R) -> crate::error::CoreResult<Self> {
        use crate::error::CoreError;
        use std::path::Path;
        let mut store = Self::new();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        for result in rdr.records() {
            let record = result?;
            let row_err = |reason: &str| CoreError::MetadataRow {
                path: Path::new("<roa>").to_path_buf(),
                reason: reason.to_string(),
            };
            let validity = record.get(3).ok_or_else(|| row_err("missing validity column"))?;
            if !validity.eq_ignore_ascii_case("true") {
                continue;
            }
            let asn: Asn = record
                .get(0)
                .ok_or_else(|| row_err("missing asn column"))?
                .parse()
                .map_err(|_| row_err("unparseable asn"))?;
            let prefix: Prefix = record
                .get(1)
                .ok_or_else(|| row_err("missing prefix column"))?
                .parse()
                .map_err(|_| row_err("unparseable prefix"))?;
            let max_length: u8 = record
                .get(2)
                .ok_or_else(|| row_err("missing max_length column"))?
                .parse()
                .map_err(|_| row_err("unparseable max_length"))?;
            store.insert(prefix, asn, max_length);
        }
        Ok(store)
    }
}
