//! Graph container APIs used by `jobgraph-layout`.
//!
//! Nodes are keyed by string ids and iterate in insertion order, which keeps every algorithm
//! built on top of the container deterministic for a given input order.

mod graph;

pub use graph::{EdgeKey, Graph, alg};
