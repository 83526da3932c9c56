//! Adjacency cache used by [`Graph`](super::Graph).
//!
//! Stored as CSR-style offset tables so a successor / predecessor query is a slice lookup
//! instead of a scan over every edge.

#[derive(Debug, Clone)]
pub(in crate::graph) struct AdjCache {
    pub(in crate::graph) generation: u64,
    out_offsets: Vec<usize>,
    out_nodes: Vec<usize>,
    in_offsets: Vec<usize>,
    in_nodes: Vec<usize>,
}

impl AdjCache {
    pub(in crate::graph) fn empty(generation: u64, node_count: usize) -> Self {
        Self {
            generation,
            out_offsets: vec![0; node_count + 1],
            out_nodes: Vec::new(),
            in_offsets: vec![0; node_count + 1],
            in_nodes: Vec::new(),
        }
    }

    /// `endpoints` yields `(source_ix, target_ix)` in edge insertion order.
    pub(in crate::graph) fn build(
        generation: u64,
        node_count: usize,
        endpoints: impl Iterator<Item = (usize, usize)>,
    ) -> Self {
        let mut out: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        let mut in_: Vec<Vec<usize>> = vec![Vec::new(); node_count];
        for (v, w) in endpoints {
            out[v].push(w);
            in_[w].push(v);
        }

        let (out_offsets, out_nodes) = flatten(out);
        let (in_offsets, in_nodes) = flatten(in_);
        Self {
            generation,
            out_offsets,
            out_nodes,
            in_offsets,
            in_nodes,
        }
    }

    pub(in crate::graph) fn out_nodes(&self, v_ix: usize) -> &[usize] {
        &self.out_nodes[self.out_offsets[v_ix]..self.out_offsets[v_ix + 1]]
    }

    pub(in crate::graph) fn in_nodes(&self, v_ix: usize) -> &[usize] {
        &self.in_nodes[self.in_offsets[v_ix]..self.in_offsets[v_ix + 1]]
    }
}

fn flatten(lists: Vec<Vec<usize>>) -> (Vec<usize>, Vec<usize>) {
    let mut offsets = Vec::with_capacity(lists.len() + 1);
    let mut flat = Vec::with_capacity(lists.iter().map(Vec::len).sum());
    offsets.push(0);
    for list in lists {
        flat.extend(list);
        offsets.push(flat.len());
    }
    (offsets, flat)
}
