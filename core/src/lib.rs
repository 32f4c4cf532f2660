//! graph-adt-core: In-memory weighted graph ADT.
//!
//! A pure Rust library providing a mutable graph keyed by vertex value, with
//! weighted edges, a stable integer index for every vertex, and a deep copy
//! that remaps vertex identity into the destination graph.
//!
//! Edge direction is a type parameter: [`UndirectedGraph`] stores each edge
//! as two mirrored records, [`DirectedGraph`] as one. Traversal algorithms
//! are out of scope; the crate answers adjacency and weight queries only.

mod config;
mod error;
mod graph;
mod index;
mod kind;
mod node;

pub use config::{GraphConfig, DEFAULT_COPY_VERTEX_CEILING, DEFAULT_MAX_INDICES};
pub use error::{GraphError, Result};
pub use graph::{DirectedGraph, Graph, UndirectedGraph};
pub use index::SlotState;
pub use kind::{Directed, EdgeKind, GraphKind, Undirected};
pub use node::{EdgeRecord, VertexIndex, VertexRecord, VertexStore, Weight, DEFAULT_WEIGHT};
