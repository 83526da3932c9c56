//! Directed graph container.
//!
//! This is the subset of a graphlib-style container that the job engine needs: string node ids,
//! labelled nodes and edges, insertion-ordered iteration and cheap successor / predecessor
//! queries. Self loops are allowed; parallel edges are not (setting an existing edge replaces
//! its label).

use rustc_hash::FxBuildHasher;
use std::cell::RefCell;

mod adj_cache;
pub mod alg;

use adj_cache::AdjCache;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub v: String,
    pub w: String,
}

impl EdgeKey {
    pub fn new(v: impl Into<String>, w: impl Into<String>) -> Self {
        Self {
            v: v.into(),
            w: w.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    id: String,
    label: N,
}

#[derive(Debug, Clone)]
struct EdgeEntry<E> {
    key: EdgeKey,
    label: E,
}

#[derive(Debug, Clone)]
pub struct Graph<N, E>
where
    N: Default,
    E: Default,
{
    nodes: Vec<NodeEntry<N>>,
    node_index: HashMap<String, usize>,

    edges: Vec<EdgeEntry<E>>,
    edge_index: HashMap<EdgeKey, usize>,

    // Successor / predecessor queries are the hot path of every traversal. The cache is
    // rebuilt lazily after a mutation so query APIs can stay on `&self`.
    adj_gen: u64,
    adj_cache: RefCell<Option<AdjCache>>,
}

impl<N, E> Default for Graph<N, E>
where
    N: Default,
    E: Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N, E> Graph<N, E>
where
    N: Default,
    E: Default,
{
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            adj_gen: 0,
            adj_cache: RefCell::new(None),
        }
    }

    fn invalidate_adj(&mut self) {
        self.adj_gen = self.adj_gen.wrapping_add(1);
        *self.adj_cache.get_mut() = None;
    }

    fn with_adj<R>(&self, f: impl FnOnce(&AdjCache) -> R) -> R {
        let mut cache = self.adj_cache.borrow_mut();
        let stale = cache
            .as_ref()
            .map(|c| c.generation != self.adj_gen)
            .unwrap_or(true);
        if stale {
            let endpoints = self.edges.iter().filter_map(|e| {
                let v = self.node_index.get(&e.key.v).copied()?;
                let w = self.node_index.get(&e.key.w).copied()?;
                Some((v, w))
            });
            *cache = Some(AdjCache::build(self.adj_gen, self.nodes.len(), endpoints));
        }
        match cache.as_ref() {
            Some(c) => f(c),
            None => f(&AdjCache::empty(self.adj_gen, self.nodes.len())),
        }
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn set_node(&mut self, id: impl Into<String>, label: N) -> &mut Self {
        let id = id.into();
        if let Some(&idx) = self.node_index.get(&id) {
            self.nodes[idx].label = label;
            return self;
        }
        self.invalidate_adj();
        let idx = self.nodes.len();
        self.nodes.push(NodeEntry {
            id: id.clone(),
            label,
        });
        self.node_index.insert(id, idx);
        self
    }

    pub fn ensure_node(&mut self, id: impl Into<String>) -> &mut Self {
        let id = id.into();
        if self.node_index.contains_key(&id) {
            return self;
        }
        self.set_node(id, N::default())
    }

    pub fn node(&self, id: &str) -> Option<&N> {
        self.node_index.get(id).map(|&idx| &self.nodes[idx].label)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut N> {
        self.node_index
            .get(id)
            .copied()
            .map(move |idx| &mut self.nodes[idx].label)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(|n| n.id.as_str())
    }

    pub fn node_ids(&self) -> Vec<String> {
        self.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> impl Iterator<Item = &EdgeKey> {
        self.edges.iter().map(|e| &e.key)
    }

    pub fn set_edge(&mut self, v: impl Into<String>, w: impl Into<String>) -> &mut Self {
        self.set_edge_with_label(v, w, E::default())
    }

    pub fn set_edge_with_label(
        &mut self,
        v: impl Into<String>,
        w: impl Into<String>,
        label: E,
    ) -> &mut Self {
        let key = EdgeKey::new(v, w);
        if let Some(&idx) = self.edge_index.get(&key) {
            self.edges[idx].label = label;
            return self;
        }
        self.ensure_node(key.v.clone());
        self.ensure_node(key.w.clone());
        self.invalidate_adj();

        let idx = self.edges.len();
        self.edges.push(EdgeEntry {
            key: key.clone(),
            label,
        });
        self.edge_index.insert(key, idx);
        self
    }

    pub fn set_path(&mut self, nodes: &[&str]) -> &mut Self {
        for pair in nodes.windows(2) {
            self.set_edge(pair[0], pair[1]);
        }
        self
    }

    pub fn has_edge(&self, v: &str, w: &str) -> bool {
        self.edge_index.contains_key(&EdgeKey::new(v, w))
    }

    pub fn edge(&self, v: &str, w: &str) -> Option<&E> {
        self.edge_index
            .get(&EdgeKey::new(v, w))
            .map(|&idx| &self.edges[idx].label)
    }

    /// Direct successors of `v`, in edge insertion order. Unknown nodes have none.
    pub fn successors(&self, v: &str) -> Vec<&str> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        let targets: Vec<usize> = self.with_adj(|adj| adj.out_nodes(v_ix).to_vec());
        targets
            .into_iter()
            .map(|ix| self.nodes[ix].id.as_str())
            .collect()
    }

    /// Direct predecessors of `v`, in edge insertion order. Unknown nodes have none.
    pub fn predecessors(&self, v: &str) -> Vec<&str> {
        let Some(&v_ix) = self.node_index.get(v) else {
            return Vec::new();
        };
        let sources: Vec<usize> = self.with_adj(|adj| adj.in_nodes(v_ix).to_vec());
        sources
            .into_iter()
            .map(|ix| self.nodes[ix].id.as_str())
            .collect()
    }

    /// Successors followed by predecessors, without duplicates.
    pub fn neighbors(&self, v: &str) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for w in self.successors(v).into_iter().chain(self.predecessors(v)) {
            if !out.contains(&w) {
                out.push(w);
            }
        }
        out
    }

    /// Nodes without incoming edges, in insertion order.
    pub fn sources(&self) -> Vec<&str> {
        self.with_adj(|adj| {
            (0..self.nodes.len())
                .filter(|&ix| adj.in_nodes(ix).is_empty())
                .collect::<Vec<_>>()
        })
        .into_iter()
        .map(|ix| self.nodes[ix].id.as_str())
        .collect()
    }

    pub(crate) fn node_ix(&self, id: &str) -> Option<usize> {
        self.node_index.get(id).copied()
    }

    pub(crate) fn node_id_at(&self, ix: usize) -> &str {
        self.nodes[ix].id.as_str()
    }

    pub(crate) fn out_ixs(&self, ix: usize) -> Vec<usize> {
        self.with_adj(|adj| adj.out_nodes(ix).to_vec())
    }

    pub(crate) fn in_ixs(&self, ix: usize) -> Vec<usize> {
        self.with_adj(|adj| adj.in_nodes(ix).to_vec())
    }
}
