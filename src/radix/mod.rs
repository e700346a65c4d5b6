/*!
A longest-prefix-match tree over binary IPv4/IPv6 prefixes with an opaque
per-node payload.

[`PrefixTree`] is the leaf component everything else is built on: the
[`crate::rib::Rib`] wraps one to hold per-peer route state, and the IRR/ROA
metadata stores in [`crate::metadata`] are built directly on top of it.

It's deliberately a plain, uncompressed binary trie rather than a
compressed Patricia trie or a multi-bit stride tree -- the core is
single-threaded and the tree depth is bounded (32 for IPv4, 128 for IPv6),
so there is no compression win worth the extra bookkeeping. What matters,
and what is load-bearing for withdraw handling (§4.3), is the **ordering**
of [`PrefixTree::search_covering`]: most-specific first, with the exact
match (when present) as the first element. That contract is asserted in
the tests below rather than assumed from any particular library.
*/

use crate::models::{Family, Prefix};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

struct Node<T> {
    data: Option<T>,
    children: [Option<Box<Node<T>>>; 2],
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Node {
            data: None,
            children: [None, None],
        }
    }
}

fn get_bit(bits: &[u8], index: u8) -> u8 {
    let byte = bits[(index / 8) as usize];
    let shift = 7 - (index % 8);
    (byte >> shift) & 1
}

/// A single address-family binary trie. [`PrefixTree`] composes one of
/// these per family.
struct BitTrie<T> {
    root: Node<T>,
    max_bits: u8,
    len: usize,
}

impl<T> BitTrie<T> {
    fn new(max_bits: u8) -> Self {
        BitTrie {
            root: Node::default(),
            max_bits,
            len: 0,
        }
    }

    fn add_with(&mut self, bits: &[u8], prefix_len: u8, make: impl FnOnce() -> T) -> &mut T {
        let mut node = &mut self.root;
        for i in 0..prefix_len {
            node = node.children[get_bit(bits, i) as usize].get_or_insert_with(Box::default);
        }
        if node.data.is_none() {
            node.data = Some(make());
            self.len += 1;
        }
        node.data.as_mut().unwrap()
    }

    fn get(&self, bits: &[u8], prefix_len: u8) -> Option<&T> {
        let mut node = &self.root;
        for i in 0..prefix_len {
            node = node.children[get_bit(bits, i) as usize].as_deref()?;
        }
        node.data.as_ref()
    }

    fn get_mut(&mut self, bits: &[u8], prefix_len: u8) -> Option<&mut T> {
        let mut node = &mut self.root;
        for i in 0..prefix_len {
            node = node.children[get_bit(bits, i) as usize].as_deref_mut()?;
        }
        node.data.as_mut()
    }

    /// Removes the data at `prefix`, pruning now-empty leaf chains back
    /// toward the root. No-op if the prefix was never present.
    fn delete(&mut self, bits: &[u8], prefix_len: u8) {
        if Self::delete_rec(&mut self.root, bits, prefix_len, 0) {
            self.len -= 1;
        }
    }

    /// Returns true if a data entry was actually removed.
    fn delete_rec(node: &mut Node<T>, bits: &[u8], prefix_len: u8, depth: u8) -> bool {
        let removed = if depth == prefix_len {
            node.data.take().is_some()
        } else {
            let bit = get_bit(bits, depth) as usize;
            let mut removed = false;
            let mut prune_child = false;
            if let Some(child) = node.children[bit].as_mut() {
                removed = Self::delete_rec(child, bits, prefix_len, depth + 1);
                prune_child = child.data.is_none()
                    && child.children[0].is_none()
                    && child.children[1].is_none();
            }
            if prune_child {
                node.children[bit] = None;
            }
            removed
        };
        removed
    }

    /// Covering nodes for `prefix`, least-specific first (root to leaf);
    /// callers reverse for the most-specific-first contract.
    fn covering<'a>(&'a self, bits: &[u8], prefix_len: u8) -> Vec<(u8, &'a T)> {
        let mut out = Vec::new();
        let mut node = &self.root;
        if let Some(d) = node.data.as_ref() {
            out.push((0, d));
        }
        for i in 0..prefix_len {
            node = match node.children[get_bit(bits, i) as usize].as_deref() {
                Some(n) => n,
                None => break,
            };
            if let Some(d) = node.data.as_ref() {
                out.push((i + 1, d));
            }
        }
        out
    }

    /// All proper descendants of `prefix` (order unspecified).
    fn covered<'a>(&'a self, bits: &[u8], prefix_len: u8) -> Vec<(Vec<bool>, &'a T)> {
        let mut node = &self.root;
        for i in 0..prefix_len {
            node = match node.children[get_bit(bits, i) as usize].as_deref() {
                Some(n) => n,
                None => return Vec::new(),
            };
        }
        let mut out = Vec::new();
        let path: Vec<bool> = (0..prefix_len).map(|i| get_bit(bits, i) == 1).collect();
        Self::collect_descendants(node, path, &mut out);
        out
    }

    fn collect_descendants<'a>(node: &'a Node<T>, path: Vec<bool>, out: &mut Vec<(Vec<bool>, &'a T)>) {
        for (bit, child) in node.children.iter().enumerate() {
            if let Some(child) = child {
                let mut child_path = path.clone();
                child_path.push(bit == 1);
                if let Some(d) = child.data.as_ref() {
                    out.push((child_path.clone(), d));
                }
                Self::collect_descendants(child, child_path, out);
            }
        }
    }

    fn all<'a>(&'a self) -> Vec<(Vec<bool>, &'a T)> {
        let mut out = Vec::new();
        if let Some(d) = self.root.data.as_ref() {
            out.push((Vec::new(), d));
        }
        Self::collect_descendants(&self.root, Vec::new(), &mut out);
        out
    }
}

fn path_to_ipv4(path: &[bool]) -> Ipv4Addr {
    let mut bytes = [0u8; 4];
    for (i, &bit) in path.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    Ipv4Addr::from(bytes)
}

fn path_to_ipv6(path: &[bool]) -> Ipv6Addr {
    let mut bytes = [0u8; 16];
    for (i, &bit) in path.iter().enumerate() {
        if bit {
            bytes[i / 8] |= 1 << (7 - (i % 8));
        }
    }
    Ipv6Addr::from(bytes)
}

fn prefix_from_path(family: Family, path: &[bool]) -> Prefix {
    let len = path.len() as u8;
    let addr = match family {
        Family::V4 => IpAddr::V4(path_to_ipv4(path)),
        Family::V6 => IpAddr::V6(path_to_ipv6(path)),
    };
    Prefix::new(ipnet::IpNet::new(addr, len).expect("path length within family bit width"))
}

/// A longest-prefix-match tree over IPv4 and IPv6 CIDR prefixes.
pub struct PrefixTree<T> {
    v4: BitTrie<T>,
    v6: BitTrie<T>,
}

impl<T> Default for PrefixTree<T> {
    fn default() -> Self {
        PrefixTree {
            v4: BitTrie::new(32),
            v6: BitTrie::new(128),
        }
    }
}

impl<T> PrefixTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn trie(&self, family: Family) -> &BitTrie<T> {
        match family {
            Family::V4 => &self.v4,
            Family::V6 => &self.v6,
        }
    }

    fn trie_mut(&mut self, family: Family) -> &mut BitTrie<T> {
        match family {
            Family::V4 => &mut self.v4,
            Family::V6 => &mut self.v6,
        }
    }

    /// Inserts `prefix` if absent (using `make` to build the default
    /// payload) and returns a mutable reference to its node data.
    /// Idempotent: an existing node's data is returned unchanged.
    pub fn add_with(&mut self, prefix: Prefix, make: impl FnOnce() -> T) -> &mut T {
        let bits = prefix.bits();
        let len = prefix.prefix_len();
        self.trie_mut(prefix.family()).add_with(&bits, len, make)
    }

    /// No-op if `prefix` is absent.
    pub fn delete(&mut self, prefix: Prefix) {
        let bits = prefix.bits();
        let len = prefix.prefix_len();
        self.trie_mut(prefix.family()).delete(&bits, len);
    }

    pub fn search_exact(&self, prefix: Prefix) -> Option<&T> {
        self.trie(prefix.family())
            .get(&prefix.bits(), prefix.prefix_len())
    }

    pub fn search_exact_mut(&mut self, prefix: Prefix) -> Option<&mut T> {
        self.trie_mut(prefix.family())
            .get_mut(&prefix.bits(), prefix.prefix_len())
    }

    /// Ancestors plus exact match, **most-specific first**. The exact match,
    /// when present, is always the first element -- this ordering is relied
    /// on by withdraw processing to recover an unknown origin.
    pub fn search_covering(&self, prefix: Prefix) -> Vec<(Prefix, &T)> {
        let bits = prefix.bits();
        let family = prefix.family();
        let mut hits = self.trie(family).covering(&bits, prefix.prefix_len());
        hits.reverse();
        hits.into_iter()
            .map(|(len, data)| {
                let path: Vec<bool> = (0..len).map(|i| get_bit(&bits, i) == 1).collect();
                (prefix_from_path(family, &path), data)
            })
            .collect()
    }

    /// All proper descendants of `prefix`, order unspecified.
    pub fn search_covered(&self, prefix: Prefix) -> Vec<(Prefix, &T)> {
        let bits = prefix.bits();
        let family = prefix.family();
        self.trie(family)
            .covered(&bits, prefix.prefix_len())
            .into_iter()
            .map(|(path, data)| (prefix_from_path(family, &path), data))
            .collect()
    }

    /// All nodes across both address families.
    pub fn nodes(&self) -> Vec<(Prefix, &T)> {
        let mut out: Vec<(Prefix, &T)> = self
            .v4
            .all()
            .into_iter()
            .map(|(path, data)| (prefix_from_path(Family::V4, &path), data))
            .collect();
        out.extend(
            self.v6
                .all()
                .into_iter()
                .map(|(path, data)| (prefix_from_path(Family::V6, &path), data)),
        );
        out
    }

    pub fn len(&self) -> usize {
        self.v4.len + self.v6.len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Prefix {
        s.parse().unwrap()
    }

    #[test]
    fn add_is_idempotent() {
        let mut tree: PrefixTree<Vec<i32>> = PrefixTree::new();
        tree.add_with(p("10.0.0.0/8"), Vec::new).push(1);
        tree.add_with(p("10.0.0.0/8"), Vec::new).push(2);
        assert_eq!(tree.search_exact(p("10.0.0.0/8")).unwrap(), &vec![1, 2]);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn delete_is_a_no_op_when_absent() {
        let mut tree: PrefixTree<i32> = PrefixTree::new();
        tree.delete(p("10.0.0.0/8"));
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn delete_removes_node_and_prunes() {
        let mut tree: PrefixTree<i32> = PrefixTree::new();
        tree.add_with(p("10.0.0.0/8"), || 1);
        tree.delete(p("10.0.0.0/8"));
        assert!(tree.search_exact(p("10.0.0.0/8")).is_none());
        assert_eq!(tree.len(), 0);
    }

    #[test]
    fn search_covering_is_most_specific_first_with_exact_match_leading() {
        let mut tree: PrefixTree<&'static str> = PrefixTree::new();
        tree.add_with(p("1.0.0.0/8"), || "a8");
        tree.add_with(p("1.2.0.0/16"), || "a16");
        tree.add_with(p("1.2.3.0/24"), || "a24");

        let hits = tree.search_covering(p("1.2.3.0/24"));
        let prefixes: Vec<String> = hits.iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(prefixes, vec!["1.2.3.0/24", "1.2.0.0/16", "1.0.0.0/8"]);

        // non-exact target still returns ancestors, most-specific first, with
        // no exact-match entry since none exists.
        let hits = tree.search_covering(p("1.2.3.128/25"));
        let prefixes: Vec<String> = hits.iter().map(|(p, _)| p.to_string()).collect();
        assert_eq!(prefixes, vec!["1.2.3.0/24", "1.2.0.0/16", "1.0.0.0/8"]);
    }

    #[test]
    fn search_covered_returns_descendants_only() {
        let mut tree: PrefixTree<i32> = PrefixTree::new();
        tree.add_with(p("1.2.0.0/16"), || 1);
        tree.add_with(p("1.2.3.0/24"), || 2);
        tree.add_with(p("1.2.4.0/24"), || 3);
        tree.add_with(p("9.0.0.0/8"), || 9);

        let mut covered: Vec<String> = tree
            .search_covered(p("1.2.0.0/16"))
            .into_iter()
            .map(|(p, _)| p.to_string())
            .collect();
        covered.sort();
        assert_eq!(covered, vec!["1.2.3.0/24", "1.2.4.0/24"]);
    }

    #[test]
    fn ipv6_prefixes_are_supported() {
        let mut tree: PrefixTree<i32> = PrefixTree::new();
        tree.add_with(p("2001:db8::/32"), || 1);
        tree.add_with(p("2001:db8:1::/48"), || 2);
        let hits = tree.search_covering(p("2001:db8:1::/48"));
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].0.to_string(), "2001:db8:1::/48");
    }
}
