/*!
The IRR route-object store: a radix tree of `prefix -> {asn -> authorities}`
loaded once from a CSV file with columns `authority, prefix, asn` (§4.7).
*/

use crate::models::{Asn, Prefix};
use crate::radix::PrefixTree;
use std::collections::{BTreeSet, HashMap};

#[derive(Default)]
pub struct RouteObjectStore {
    tree: PrefixTree<HashMap<Asn, BTreeSet<String>>>,
}

impl RouteObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, prefix: Prefix, asn: Asn, authority: String) {
        self.tree
            .add_with(prefix, HashMap::new)
            .entry(asn)
            .or_default()
            .insert(authority);
    }

    /// Authorities for `asn` across every prefix covering (or equal to)
    /// `prefix`, per §4.5 annotator 1.
    pub fn authorities_for(&self, prefix: Prefix, asn: Asn) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        for (_, by_asn) in self.tree.search_covering(prefix) {
            if let Some(authorities) = by_asn.get(&asn) {
                out.extend(authorities.iter().cloned());
            }
        }
        out
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
                path: Path::new("<route-objects>").to_path_buf(),
                reason: reason.to_string(),
            };
            let authority = record.get(0).ok_or_else(|| row_err("missing authority column"))?;
            let prefix: Prefix = record
                .get(1)
                .ok_or_else(|| row_err("missing prefix column"))?
                .parse()
                .map_err(|_| row_err("unparseable prefix"))?;
            let asn: Asn = record
                .get(2)
                .ok_or_else(|| row_err("missing asn column"))?
                .parse()
                .map_err(|_| row_err("unparseable asn"))?;
            store.insert(prefix, asn, authority.to_string());
        }
        Ok(store)
    }
}
