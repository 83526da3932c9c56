//! Helper algorithms over [`Graph`].
//!
//! Everything here walks the graph with explicit stacks; input comes from an external
//! scheduler and may contain long chains, so recursion depth is never tied to graph size.

use super::Graph;

/// Every node connected to `start` when edge direction is ignored, `start` included, in
/// depth-first discovery order. An unknown `start` yields an empty list.
pub fn reachable_undirected<N, E>(g: &Graph<N, E>, start: &str) -> Vec<String>
where
    N: Default,
    E: Default,
{
    let Some(start_ix) = g.node_ix(start) else {
        return Vec::new();
    };

    let mut visited = vec![false; g.node_count()];
    let mut stack = vec![start_ix];
    let mut out: Vec<String> = Vec::new();
    while let Some(v) = stack.pop() {
        if visited[v] {
            continue;
        }
        visited[v] = true;
        out.push(g.node_id_at(v).to_string());

        // Reverse so the first listed neighbor is visited first.
        let mut next: Vec<usize> = g.out_ixs(v);
        next.extend(g.in_ixs(v));
        for w in next.into_iter().rev() {
            if !visited[w] {
                stack.push(w);
            }
        }
    }
    out
}

/// Strongly connected components with more than one node, plus single nodes with a self loop.
///
/// Nodes inside a cycle keep graph insertion order; cycles are sorted by their first node.
pub fn find_cycles<N, E>(g: &Graph<N, E>) -> Vec<Vec<String>>
where
    N: Default,
    E: Default,
{
    // Tarjan's algorithm, driven by an explicit call stack of (node, next successor slot).
    let n = g.node_count();
    let mut index: Vec<Option<usize>> = vec![None; n];
    let mut lowlink: Vec<usize> = vec![0; n];
    let mut on_stack: Vec<bool> = vec![false; n];
    let mut scc_stack: Vec<usize> = Vec::new();
    let mut sccs: Vec<Vec<usize>> = Vec::new();
    let mut next_index = 0usize;

    for root in 0..n {
        if index[root].is_some() {
            continue;
        }
        let mut call: Vec<(usize, Vec<usize>, usize)> = Vec::new();
        index[root] = Some(next_index);
        lowlink[root] = next_index;
        next_index += 1;
        scc_stack.push(root);
        on_stack[root] = true;
        call.push((root, g.out_ixs(root), 0));

        while let Some((v, succ, slot)) = call.last_mut() {
            let v = *v;
            let next = succ.get(*slot).copied();
            if let Some(w) = next {
                *slot += 1;
                match index[w] {
                    None => {
                        index[w] = Some(next_index);
                        lowlink[w] = next_index;
                        next_index += 1;
                        scc_stack.push(w);
                        on_stack[w] = true;
                        call.push((w, g.out_ixs(w), 0));
                    }
                    Some(w_idx) if on_stack[w] => {
                        lowlink[v] = lowlink[v].min(w_idx);
                    }
                    Some(_) => {}
                }
                continue;
            }

            call.pop();
            if let Some((parent, _, _)) = call.last() {
                lowlink[*parent] = lowlink[*parent].min(lowlink[v]);
            }
            if Some(lowlink[v]) == index[v] {
                let mut scc: Vec<usize> = Vec::new();
                while let Some(w) = scc_stack.pop() {
                    on_stack[w] = false;
                    scc.push(w);
                    if w == v {
                        break;
                    }
                }
                sccs.push(scc);
            }
        }
    }

    let mut cycles: Vec<Vec<String>> = Vec::new();
    for mut scc in sccs {
        let is_cycle = scc.len() > 1 || {
            let v = g.node_id_at(scc[0]);
            g.has_edge(v, v)
        };
        if !is_cycle {
            continue;
        }
        scc.sort_unstable();
        cycles.push(scc.into_iter().map(|ix| g.node_id_at(ix).to_string()).collect());
    }
    cycles.sort();
    cycles
}
