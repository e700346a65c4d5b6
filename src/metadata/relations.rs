/*!
Registry relation tables: organisation, maintainer and contact membership
for an ASN, each kept as a forward map (entity -> set of ASNs) and a
reverse map (ASN -> set of entities), per §4.7 and §9's "sibling set"
glossary entry.
*/

use crate::models::Asn;
use std::collections::{BTreeSet, HashMap};

/// Entities known to be shared registration boilerplate rather than a real
/// relationship -- loading a row naming one of these is silently dropped,
/// matching the upstream blacklist.
const FAKE_MAINTAINERS: &[&str] = &["RIPE-NCC-END-MNT", "AFRINIC-HM-MNT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    Organisations,
    Maintainers,
    Contacts,
}

impl RelationKind {
    fn label(&self) -> &'static str {
        match self {
            RelationKind::Organisations => "org",
            RelationKind::Maintainers => "mnt",
            RelationKind::Contacts => "contact",
        }
    }
}

#[derive(Default)]
struct RelationTable {
    forward: HashMap<String, BTreeSet<Asn>>,
    reverse: HashMap<Asn, BTreeSet<String>>,
}

impl RelationTable {
    fn insert(&mut self, entity: &str, asn: Asn) {
        self.forward.entry(entity.to_string()).or_default().insert(asn);
        self.reverse.entry(asn).or_default().insert(entity.to_string());
    }
}

/// The three relation tables plus the derived sibling-set/contact/mnt
/// overlap checks used by [`crate::annotate::relation`].
#[derive(Default)]
pub struct RelationStore {
    organisations: RelationTable,
    maintainers: RelationTable,
    contacts: RelationTable,
}

impl RelationStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn table_mut(&mut self, kind: RelationKind) -> &mut RelationTable {
        match kind {
            RelationKind::Organisations => &mut self.organisations,
            RelationKind::Maintainers => &mut self.maintainers,
            RelationKind::Contacts => &mut self.contacts,
        }
    }

    fn table(&self, kind: RelationKind) -> &RelationTable {
        match kind {
            RelationKind::Organisations => &self.organisations,
            RelationKind::Maintainers => &self.maintainers,
            RelationKind::Contacts => &self.contacts,
        }
    }

    /// Inserts one `(entity, asn)` row for `kind`, dropping it if `entity`
    /// is a blacklisted fake maintainer.
    pub fn insert(&mut self, kind: RelationKind, entity: &str, asn: Asn) {
        if FAKE_MAINTAINERS.contains(&entity) {
            return;
        }
        self.table_mut(kind).insert(entity, asn);
    }

    fn organisations_of(&self, asn: Asn) -> BTreeSet<String> {
        self.organisations.reverse.get(&asn).cloned().unwrap_or_default()
    }

    /// `{asn} ∪ {asn' : organisations(asn) ∩ organisations(asn') ≠ ∅}`.
    fn sibling_set(&self, asn: Asn) -> BTreeSet<Asn> {
        let mut siblings = BTreeSet::from([asn]);
        for org in self.organisations_of(asn) {
            if let Some(members) = self.organisations.forward.get(&org) {
                siblings.extend(members.iter().copied());
            }
        }
        siblings
    }

    fn entities_for_siblings(&self, kind: RelationKind, siblings: &BTreeSet<Asn>) -> BTreeSet<String> {
        let table = self.table(kind);
        let mut out = BTreeSet::new();
        for asn in siblings {
            if let Some(entities) = table.reverse.get(asn) {
                out.extend(entities.iter().cloned());
            }
        }
        out
    }

    /// `org`, `contact`, `mnt` labels (in that order, skipping absent ones)
    /// relating `a1` and `a2`, per §4.5 annotator 3.
    pub fn relation_labels(&self, a1: Asn, a2: Asn) -> Vec<String> {
        let mut labels = Vec::new();

        let a1_orgs = self.organisations_of(a1);
        let a2_orgs = self.organisations_of(a2);
        if !a1_orgs.is_disjoint(&a2_orgs) {
            labels.push(RelationKind::Organisations.label().to_string());
        }

        let a1_siblings = self.sibling_set(a1);
        let a2_siblings = self.sibling_set(a2);

        let a1_contacts = self.entities_for_siblings(RelationKind::Contacts, &a1_siblings);
        let a2_contacts = self.entities_for_siblings(RelationKind::Contacts, &a2_siblings);
        if !a1_contacts.is_disjoint(&a2_contacts) {
            labels.push(RelationKind::Contacts.label().to_string());
        }

        let a1_mnts = self.entities_for_siblings(RelationKind::Maintainers, &a1_siblings);
        let a2_mnts = self.entities_for_siblings(RelationKind::Maintainers, &a2_siblings);
        if !a1_mnts.is_disjoint(&a2_mnts) {
            labels.push(RelationKind::Maintainers.label().to_string());
        }

        labels
    }

    #[cfg(feature = "csv")]
    pub fn load_csv<R: std::io::Read>(
        &mut self,
        kind: RelationKind,
        reader: R,
    ) -> crate::error::CoreResult<()> {
        use crate::error::CoreError;
        use std::path::Path;
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader);
        for result in rdr.records() {
            let record = result?;
            let row_err = |reason: &str| CoreError::MetadataRow {
                path: Path::new("<relations>").to_path_buf(),
                reason: reason.to_string(),
            };
            let entity = record.get(1).ok_or_else(|| row_err("missing entity column"))?;
            let asn: Asn = record
                .get(2)
                .ok_or_else(|| row_err("missing asn column"))?
                .parse()
                .map_err(|_| row_err("unparseable asn"))?;
            self.insert(kind, entity, asn);
        }
        Ok(())
    }
}
