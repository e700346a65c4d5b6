/*!
The Routing Information Base: a [`crate::radix::PrefixTree`] whose payload
at each prefix is an insertion-ordered map from [`PeerId`] to
[`RouteRecord`].

Iteration order of the peer map is preserved on purpose -- output record
ordering (route counts, which peer's record is inspected first) should
be stable across runs for the same input, which a `HashMap` would not
give us for free.
*/

use crate::models::{PeerId, Prefix, RouteRecord};
use crate::radix::PrefixTree;
use indexmap::IndexMap;

pub type PeerMap = IndexMap<PeerId, RouteRecord>;

#[derive(Default)]
pub struct Rib {
    tree: PrefixTree<PeerMap>,
}

impl Rib {
    pub fn new() -> Self {
        Rib::default()
    }

    /// Inserts or replaces the record for `(prefix, peer)`. Never creates a
    /// duplicate entry for the same peer at the same prefix.
    pub fn update(&mut self, prefix: Prefix, peer: PeerId, record: RouteRecord) {
        self.tree.add_with(prefix, PeerMap::new).insert(peer, record);
    }

    pub fn lookup(&self, prefix: Prefix, peer: PeerId) -> Option<&RouteRecord> {
        self.tree.search_exact(prefix)?.get(&peer)
    }

    /// Removes the record for `(prefix, peer)`, deleting the node entirely
    /// if that was its last peer. Returns the removed record, or `None` if
    /// it was never present -- a soft miss, not an error (§7).
    pub fn pop(&mut self, prefix: Prefix, peer: PeerId) -> Option<RouteRecord> {
        let peers = self.tree.search_exact_mut(prefix)?;
        let removed = peers.shift_remove(&peer);
        if peers.is_empty() {
            self.tree.delete(prefix);
        }
        removed
    }

    /// Ancestors plus exact match for `prefix`, most-specific first,
    /// delegating to [`PrefixTree::search_covering`].
    pub fn search_all_containing(&self, prefix: Prefix) -> Vec<(Prefix, &PeerMap)> {
        self.tree.search_covering(prefix)
    }

    pub fn nodes(&self) -> Vec<(Prefix, &PeerMap)> {
        self.tree.nodes()
    }

    pub fn node_count(&self) -> usize {
        self.tree.len()
    }

    /// The "fake withdraw" sweep (§5): removes every `(prefix, peer)` entry
    /// whose `access_time` is strictly less than `cutoff`, run after a
    /// bview cycle completes. Collects victims first, then pops them, so
    /// the borrow over `nodes()` never overlaps the mutation.
    pub fn sweep_stale(&mut self, cutoff: f64) -> usize {
        let victims: Vec<(Prefix, PeerId)> = self
            .nodes()
            .into_iter()
            .flat_map(|(prefix, peers)| {
                peers
                    .iter()
                    .filter(move |(_, record)| record.access_time < cutoff)
                    .map(move |(peer, _)| (prefix, *peer))
            })
            .collect();
        let count = victims.len();
        for (prefix, peer) in victims {
            self.pop(prefix, peer);
        }
        count
    }
}
