//! In-memory sparse representation of the directed link graph.

use ahash::AHashMap;

/// Dense document index, assigned in first-seen order during loading.
pub type DocId = u32;

/// The full node/edge set.
///
/// Outlinks are stored per node as a sorted, duplicate-free target list, so
/// `out_degree(i)` is always the number of *distinct* targets of `i`.
/// `sink_count` is maintained incrementally: interning a document creates a
/// sink, and the first outlink added to a node removes one.
#[derive(Debug, Clone, Default)]
pub struct LinkGraph {
    /// index -> document name (bijective with `index`, append-only).
    names: Vec<String>,
    /// document name -> index.
    index: AHashMap<String, DocId>,
    /// index -> sorted distinct outlink targets; empty for sinks.
    outlinks: Vec<Vec<DocId>>,
    /// Number of nodes with zero outlinks.
    sink_count: usize,
}

impl LinkGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of distinct documents seen.
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of nodes with zero outlinks.
    pub fn sink_count(&self) -> usize {
        self.sink_count
    }

    /// Total number of distinct edges.
    pub fn edge_count(&self) -> usize {
        self.outlinks.iter().map(Vec::len).sum()
    }

    /// Number of distinct outgoing edges from `doc`.
    pub fn out_degree(&self, doc: DocId) -> usize {
        self.outlinks[doc as usize].len()
    }

    pub fn is_sink(&self, doc: DocId) -> bool {
        self.outlinks[doc as usize].is_empty()
    }

    /// Sorted distinct targets reachable directly from `doc`.
    pub fn outlinks(&self, doc: DocId) -> &[DocId] {
        &self.outlinks[doc as usize]
    }

    pub fn name(&self, doc: DocId) -> Option<&str> {
        self.names.get(doc as usize).map(String::as_str)
    }

    pub fn doc_id(&self, name: &str) -> Option<DocId> {
        self.index.get(name).copied()
    }

    /// Return the id for `name`, assigning the next dense id on first sight.
    pub fn intern(&mut self, name: &str) -> DocId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = self.names.len() as DocId;
        self.names.push(name.to_string());
        self.index.insert(name.to_string(), id);
        self.outlinks.push(Vec::new());
        self.sink_count += 1;
        id
    }

    /// Record the edge (source, target). Returns true when the edge is new;
    /// duplicates leave the out-degree untouched.
    pub fn add_link(&mut self, source: DocId, target: DocId) -> bool {
        let targets = &mut self.outlinks[source as usize];
        match targets.binary_search(&target) {
            Ok(_) => false,
            Err(pos) => {
                if targets.is_empty() {
                    self.sink_count -= 1;
                }
                targets.insert(pos, target);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_assigns_dense_first_seen_ids() {
        let mut graph = LinkGraph::new();
        assert_eq!(graph.intern("a"), 0);
        assert_eq!(graph.intern("b"), 1);
        assert_eq!(graph.intern("a"), 0);
        assert_eq!(graph.intern("c"), 2);
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.name(1), Some("b"));
        assert_eq!(graph.doc_id("c"), Some(2));
        assert_eq!(graph.doc_id("missing"), None);
    }

    #[test]
    fn duplicate_links_do_not_inflate_out_degree() {
        let mut graph = LinkGraph::new();
        let a = graph.intern("a");
        let b = graph.intern("b");
        assert!(graph.add_link(a, b));
        assert!(!graph.add_link(a, b));
        assert_eq!(graph.out_degree(a), 1);
        assert_eq!(graph.outlinks(a), &[b]);
    }

    #[test]
    fn sink_count_tracks_first_outlink() {
        let mut graph = LinkGraph::new();
        let a = graph.intern("a");
        let b = graph.intern("b");
        let c = graph.intern("c");
        assert_eq!(graph.sink_count(), 3);

        graph.add_link(a, b);
        assert_eq!(graph.sink_count(), 2);
        graph.add_link(a, c);
        assert_eq!(graph.sink_count(), 2);
        graph.add_link(b, b);
        assert_eq!(graph.sink_count(), 1);
        assert!(graph.is_sink(c));
    }

    #[test]
    fn outlinks_stay_sorted_and_distinct() {
        let mut graph = LinkGraph::new();
        let a = graph.intern("a");
        let mut targets = Vec::new();
        for name in ["z", "m", "b", "m", "z"] {
            targets.push(graph.intern(name));
        }
        for &t in &targets {
            graph.add_link(a, t);
        }
        let mut expected: Vec<DocId> = targets.clone();
        expected.sort_unstable();
        expected.dedup();
        assert_eq!(graph.outlinks(a), expected.as_slice());
        assert_eq!(graph.out_degree(a), expected.len());
    }
}
