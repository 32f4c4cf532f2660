use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

use tracing::{debug, trace, warn};

use crate::config::GraphConfig;
use crate::error::{GraphError, Result};
use crate::index::{IndexTable, SlotState};
use crate::kind::{Directed, EdgeKind, GraphKind, Undirected};
use crate::node::{VertexIndex, VertexRecord, VertexStore, Weight, DEFAULT_WEIGHT};

/// In-memory weighted graph keyed by vertex value.
///
/// Vertices live in index-stable slots: a vertex's slot position is also its
/// index in the index table, so index lookups are O(1) and edge records can
/// name their target by index. Edge direction rules come from `K`.
///
/// Counters are maintained, not recomputed: `edge_count` counts logical
/// edges, so an undirected edge (two mirrored records) counts once.
///
/// Keys need `Eq + Hash + Clone`. Key lookup goes through a hash map, and the
/// key is held by both the vertex and the index table. Floating-point keys
/// therefore need a wrapper that implements `Hash` and `Eq`.
pub struct Graph<T, K = Undirected> {
    store: VertexStore<T>,
    index: IndexTable<T>,
    vertex_count: usize,
    edge_count: usize,
    config: GraphConfig,
    kind: PhantomData<K>,
}

pub type UndirectedGraph<T> = Graph<T, Undirected>;
pub type DirectedGraph<T> = Graph<T, Directed>;

impl<T: Eq + Hash + Clone, K: EdgeKind> Graph<T, K> {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            store: VertexStore::new(),
            index: IndexTable::new(config.max_indices),
            vertex_count: 0,
            edge_count: 0,
            config,
            kind: PhantomData,
        }
    }

    /// Pre-allocate for a known vertex count.
    pub fn with_capacity(vertex_count: usize) -> Self {
        let config = GraphConfig::default();
        Self {
            store: VertexStore::with_capacity(vertex_count),
            index: IndexTable::with_capacity(config.max_indices, vertex_count),
            vertex_count: 0,
            edge_count: 0,
            config,
            kind: PhantomData,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn kind(&self) -> GraphKind {
        K::KIND
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_count == 0
    }

    // -----------------------------------------------------------------------
    // Key-addressed queries
    // -----------------------------------------------------------------------

    pub fn contains_vertex(&self, key: &T) -> bool {
        self.index.contains_key(key)
    }

    /// Whether `b` appears in `a`'s adjacency list.
    pub fn contains_edge(&self, a: &T, b: &T) -> bool {
        self.find_edge(a, b).is_some()
    }

    /// Weight of the edge `a -> b`, or `None` if there is no such edge.
    pub fn edge_weight(&self, a: &T, b: &T) -> Option<Weight> {
        self.find_edge(a, b)
    }

    pub fn are_adjacent(&self, a: &T, b: &T) -> bool {
        match (self.index.index_of(a), self.index.index_of(b)) {
            (Some(ia), Some(ib)) => K::are_adjacent(&self.store, ia, ib),
            _ => false,
        }
    }

    fn find_edge(&self, a: &T, b: &T) -> Option<Weight> {
        let ia = self.index.index_of(a)?;
        let ib = self.index.index_of(b)?;
        self.store.get(ia)?.edge_to(ib).map(|e| e.weight())
    }

    /// Live vertex keys, in index order.
    pub fn vertices(&self) -> impl Iterator<Item = &T> {
        self.store.live().map(|(_, v)| v.key())
    }

    /// Outgoing neighbours of `key` with the weight of each edge.
    /// Empty if the vertex does not exist.
    pub fn neighbors<'a>(&'a self, key: &T) -> impl Iterator<Item = (&'a T, Weight)> + 'a {
        let store = &self.store;
        self.index
            .index_of(key)
            .and_then(|i| store.get(i))
            .into_iter()
            .flat_map(move |v| {
                v.edges()
                    .iter()
                    .filter_map(move |e| store.get(e.target()).map(|t| (t.key(), e.weight())))
            })
    }

    /// Number of edge records owned by `key`, or `None` if absent.
    pub fn degree(&self, key: &T) -> Option<usize> {
        let i = self.index.index_of(key)?;
        self.store.get(i).map(VertexRecord::degree)
    }

    pub fn vertex(&self, key: &T) -> Option<&VertexRecord<T>> {
        let i = self.index.index_of(key)?;
        self.store.get(i)
    }

    // -----------------------------------------------------------------------
    // Index-addressed queries
    // -----------------------------------------------------------------------

    /// Key of a live index. Empty and tombstoned indices give `None`.
    pub fn key_by_index(&self, index: VertexIndex) -> Option<&T> {
        self.index.key_of(index)
    }

    pub fn index_by_key(&self, key: &T) -> Option<VertexIndex> {
        self.index.index_of(key)
    }

    pub fn index_slot(&self, index: VertexIndex) -> SlotState<'_, T> {
        self.index.slot(index)
    }

    /// The index the next newly added vertex will receive.
    pub fn next_index(&self) -> VertexIndex {
        self.index.next_index()
    }

    pub fn contains_vertex_by_index(&self, index: VertexIndex) -> bool {
        matches!(self.index.slot(index), SlotState::Live(_))
    }

    pub fn contains_edge_by_index(&self, a: VertexIndex, b: VertexIndex) -> bool {
        match (self.key_by_index(a), self.key_by_index(b)) {
            (Some(ka), Some(kb)) => self.contains_edge(ka, kb),
            _ => false,
        }
    }

    pub fn edge_weight_by_index(&self, a: VertexIndex, b: VertexIndex) -> Option<Weight> {
        let ka = self.key_by_index(a)?;
        let kb = self.key_by_index(b)?;
        self.edge_weight(ka, kb)
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add a vertex. Returns `Ok(false)` if the key is already present.
    ///
    /// The vertex is only inserted once it has an index; an exhausted index
    /// space is reported and leaves the graph unchanged.
    pub fn add_vertex(&mut self, key: T) -> Result<bool> {
        if self.index.contains_key(&key) {
            return Ok(false);
        }
        self.store.reserve(1)?;
        let index = match self.index.register(key.clone()) {
            Ok(index) => index,
            Err(err) => {
                warn!(error = %err, "vertex not added");
                return Err(err);
            }
        };
        let slot = self.store.push(VertexRecord::new(key));
        debug_assert_eq!(slot, index);
        self.vertex_count += 1;
        debug!(index, "vertex added");
        Ok(true)
    }

    /// Remove a vertex and every edge touching it. Its index is tombstoned
    /// and never reused. Returns `false` if the key is absent.
    pub fn remove_vertex(&mut self, key: &T) -> bool {
        let Some(index) = self.index.index_of(key) else {
            return false;
        };
        let removed_edges = K::detach_vertex(&mut self.store, index);
        self.edge_count -= removed_edges;
        self.store.tombstone(index);
        self.index.release(key);
        self.vertex_count -= 1;
        debug!(index, removed_edges, "vertex removed");
        true
    }

    /// Add an edge between two existing vertices.
    ///
    /// Returns `Ok(false)` without changing anything if either endpoint is
    /// missing, `a == b`, the weight is negative or NaN, or the edge exists.
    pub fn add_edge(&mut self, a: &T, b: &T, weight: Weight) -> Result<bool> {
        let (Some(ia), Some(ib)) = (self.index.index_of(a), self.index.index_of(b)) else {
            return Ok(false);
        };
        let added = K::insert_edge(&mut self.store, ia, ib, weight)?;
        if added {
            self.edge_count += 1;
            trace!(from = ia, to = ib, weight, "edge added");
        }
        Ok(added)
    }

    /// [`add_edge`](Self::add_edge) with weight 1.0.
    pub fn add_edge_default(&mut self, a: &T, b: &T) -> Result<bool> {
        self.add_edge(a, b, DEFAULT_WEIGHT)
    }

    pub fn remove_edge(&mut self, a: &T, b: &T) -> bool {
        let (Some(ia), Some(ib)) = (self.index.index_of(a), self.index.index_of(b)) else {
            return false;
        };
        let removed = K::remove_edge(&mut self.store, ia, ib);
        if removed {
            self.edge_count -= 1;
            trace!(from = ia, to = ib, "edge removed");
        }
        removed
    }

    /// Change an existing edge's weight. Negative and NaN weights are
    /// rejected and the previous weight is kept.
    pub fn set_edge_weight(&mut self, a: &T, b: &T, weight: Weight) -> bool {
        match (self.index.index_of(a), self.index.index_of(b)) {
            (Some(ia), Some(ib)) => K::set_weight(&mut self.store, ia, ib, weight),
            _ => false,
        }
    }

    /// Drop every vertex and edge and reset the index table. The graph then
    /// behaves as freshly constructed with the same config.
    pub fn clear(&mut self) {
        self.store.clear();
        self.index.clear();
        self.vertex_count = 0;
        self.edge_count = 0;
    }

    // -----------------------------------------------------------------------
    // Copy
    // -----------------------------------------------------------------------

    /// Replace this graph's contents with a deep copy of `other`.
    ///
    /// Vertices are cloned in `other`'s index order and receive fresh,
    /// compact indices. Edges are rebuilt by this graph's kind, and only when
    /// `other` is the same kind; a copy across kinds carries vertices only.
    ///
    /// On error this graph is left empty.
    pub fn copy_from<K2: EdgeKind>(&mut self, other: &Graph<T, K2>) -> Result<()> {
        self.clear();
        if other.is_empty() {
            return Ok(());
        }
        if let Err(err) = self.copy_contents(other) {
            warn!(error = %err, "graph copy failed, destination cleared");
            self.clear();
            return Err(err);
        }
        debug!(
            vertices = self.vertex_count,
            edges = self.edge_count,
            "graph copied"
        );
        Ok(())
    }

    fn copy_contents<K2: EdgeKind>(&mut self, other: &Graph<T, K2>) -> Result<()> {
        let ceiling = self.config.copy_vertex_ceiling;

        // map[i] = index in self of other's vertex i
        let mut map: Vec<Option<VertexIndex>> = Vec::new();
        map.try_reserve_exact(other.store.slot_count())?;
        map.resize(other.store.slot_count(), None);
        self.store.reserve(other.vertex_count.min(ceiling))?;

        for (copied, (src_index, record)) in other.store.live().enumerate() {
            if copied >= ceiling {
                return Err(GraphError::CopyCeilingExceeded { ceiling });
            }
            self.store.reserve(1)?;
            let index = self.index.register(record.key().clone())?;
            let slot = self.store.push(VertexRecord::new(record.key().clone()));
            debug_assert_eq!(slot, index);
            self.vertex_count += 1;
            map[src_index] = Some(index);
        }
        trace!(vertices = self.vertex_count, "vertices cloned");

        if K::KIND == K2::KIND {
            K::copy_edges(&mut self.store, &other.store, &map)?;
            self.edge_count = other.edge_count;
            trace!(edges = self.edge_count, "edges cloned");
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Diagnostics
    // -----------------------------------------------------------------------

    /// Verify every structural invariant: counters match storage, the index
    /// table agrees with the slots, edge targets are live and distinct, and
    /// kind-specific topology holds.
    pub fn check_invariants(&self) -> Result<()> {
        let violation = |msg: String| Err(GraphError::InvariantViolation(msg));

        let live = self.store.live().count();
        if live != self.vertex_count {
            return violation(format!(
                "vertex_count {} but {} live slots",
                self.vertex_count, live
            ));
        }
        if self.index.live_count() != live {
            return violation(format!(
                "{} indexed keys but {} live slots",
                self.index.live_count(),
                live
            ));
        }
        if self.store.slot_count() != self.index.next_index() {
            return violation(format!(
                "{} slots but next index {}",
                self.store.slot_count(),
                self.index.next_index()
            ));
        }

        for (i, vertex) in self.store.live() {
            if self.index.key_of(i) != Some(vertex.key())
                || self.index.index_of(vertex.key()) != Some(i)
            {
                return violation(format!("index table disagrees with slot {}", i));
            }
            for (n, edge) in vertex.edges().iter().enumerate() {
                let target = edge.target();
                if target == i {
                    return violation(format!("self-loop at {}", i));
                }
                if self.store.get(target).is_none() {
                    return violation(format!("edge {} -> {} targets a dead slot", i, target));
                }
                if vertex.edges()[..n].iter().any(|e| e.target() == target) {
                    return violation(format!("duplicate edge {} -> {}", i, target));
                }
                if !crate::node::is_valid_weight(edge.weight()) {
                    return violation(format!("edge {} -> {} has invalid weight", i, target));
                }
            }
        }

        let records = self.store.record_count();
        if records != self.edge_count * K::RECORDS_PER_EDGE {
            return violation(format!(
                "edge_count {} but {} records",
                self.edge_count, records
            ));
        }

        K::verify_topology(&self.store)
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let slots = self.store.slot_count() * size_of::<Option<VertexRecord<T>>>();
        let edges = self.store.record_count() * size_of::<crate::node::EdgeRecord>();

        slots + edges + self.index.memory_usage()
    }
}

impl<T: Eq + Hash + Clone, K: EdgeKind> Default for Graph<T, K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cloning runs the same protocol as [`Graph::copy_from`], with indices
/// compacted. The clone uses the source's config.
///
/// # Panics
///
/// `Clone` cannot report an error, so a failed copy panics with the
/// [`GraphError`]. That happens when the graph holds more vertices than its
/// `copy_vertex_ceiling` or storage cannot grow. Use [`Graph::copy_from`] to
/// handle those cases.
impl<T: Eq + Hash + Clone, K: EdgeKind> Clone for Graph<T, K> {
    fn clone(&self) -> Self {
        let mut copy = Self::with_config(self.config);
        if let Err(err) = copy.copy_from(self) {
            panic!("graph clone failed: {err}");
        }
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        if let Err(err) = self.copy_from(source) {
            panic!("graph clone failed: {err}");
        }
    }
}

impl<T, K: EdgeKind> fmt::Debug for Graph<T, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Graph")
            .field("kind", &K::KIND)
            .field("vertex_count", &self.vertex_count)
            .field("edge_count", &self.edge_count)
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<Weight>, b: Weight) -> bool {
        a.is_some_and(|w| (w - b).abs() < 1e-9)
    }

    fn triangle() -> UndirectedGraph<u32> {
        let mut g = UndirectedGraph::new();
        for v in [10, 20, 30] {
            g.add_vertex(v).unwrap();
        }
        g.add_edge(&10, &20, 1.0).unwrap();
        g.add_edge(&20, &30, 2.0).unwrap();
        g
    }

    #[derive(Debug, Clone, Copy)]
    struct Score(f64);

    impl PartialEq for Score {
        fn eq(&self, other: &Self) -> bool {
            self.0.to_bits() == other.0.to_bits()
        }
    }

    impl Eq for Score {}

    impl Hash for Score {
        fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
            self.0.to_bits().hash(state);
        }
    }

    #[test]
    fn test_float_keys_through_hashable_wrapper() {
        let mut g: UndirectedGraph<Score> = Graph::new();
        assert!(g.add_vertex(Score(0.5)).unwrap());
        assert!(g.add_vertex(Score(1.5)).unwrap());
        assert!(!g.add_vertex(Score(0.5)).unwrap());
        assert!(g.add_edge(&Score(0.5), &Score(1.5), 3.0).unwrap());
        assert!(approx(g.edge_weight(&Score(1.5), &Score(0.5)), 3.0));
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_empty_graph() {
        let g: UndirectedGraph<i32> = Graph::new();
        assert!(g.is_empty());
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(!g.contains_vertex(&1));
        assert_eq!(g.edge_weight(&1, &2), None);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_add_vertex_idempotent() {
        let mut g: UndirectedGraph<i32> = Graph::new();
        assert!(g.add_vertex(5).unwrap());
        assert!(!g.add_vertex(5).unwrap());
        assert_eq!(g.vertex_count(), 1);
        assert!(g.contains_vertex(&5));
        assert_eq!(g.next_index(), 1);
    }

    #[test]
    fn test_scenario_a_weighted_edge() {
        let mut g: UndirectedGraph<i32> = Graph::new();
        g.add_vertex(1).unwrap();
        g.add_vertex(2).unwrap();
        assert!(g.add_edge(&1, &2, 3.5).unwrap());
        assert!(g.contains_edge(&1, &2));
        assert!(approx(g.edge_weight(&1, &2), 3.5));
        assert!(approx(g.edge_weight(&2, &1), 3.5));
        assert_eq!(g.edge_count(), 1);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_scenario_b_remove_vertex_cascades() {
        let mut g: UndirectedGraph<i32> = Graph::new();
        g.add_vertex(1).unwrap();
        g.add_vertex(2).unwrap();
        g.add_edge(&1, &2, 3.5).unwrap();

        assert!(g.remove_vertex(&1));
        assert!(!g.contains_vertex(&1));
        assert!(!g.contains_edge(&1, &2));
        assert!(!g.contains_edge(&2, &1));
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.vertex_count(), 1);
        assert_eq!(g.degree(&2), Some(0));
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_scenario_c_missing_endpoint() {
        let mut g: UndirectedGraph<i32> = Graph::new();
        g.add_vertex(1).unwrap();
        assert!(!g.add_edge(&1, &99, 1.0).unwrap());
        assert!(!g.add_edge(&99, &1, 1.0).unwrap());
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.degree(&1), Some(0));
    }

    #[test]
    fn test_scenario_d_copy_is_independent() {
        let original = triangle();
        let mut copy = UndirectedGraph::new();
        copy.copy_from(&original).unwrap();

        assert!(copy.remove_vertex(&20));
        assert_eq!(copy.edge_count(), 0);
        assert_eq!(copy.vertex_count(), 2);

        assert_eq!(original.edge_count(), 2);
        assert_eq!(original.vertex_count(), 3);
        assert!(original.contains_edge(&10, &20));
        assert!(original.contains_edge(&30, &20));
        assert!(original.check_invariants().is_ok());
        assert!(copy.check_invariants().is_ok());
    }

    #[test]
    fn test_duplicate_edge_either_direction() {
        let mut g = triangle();
        assert!(!g.add_edge(&20, &10, 9.0).unwrap());
        assert!(approx(g.edge_weight(&10, &20), 1.0));
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_self_loop_rejected() {
        let mut g = triangle();
        assert!(!g.add_edge(&10, &10, 1.0).unwrap());
        assert!(!g.contains_edge(&10, &10));
    }

    #[test]
    fn test_negative_weight_edge_not_created() {
        let mut g = triangle();
        assert!(!g.add_edge(&10, &30, -2.0).unwrap());
        assert!(!g.contains_edge(&10, &30));
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_set_edge_weight_rejects_negative() {
        let mut g = triangle();
        assert!(!g.set_edge_weight(&10, &20, -5.0));
        assert!(approx(g.edge_weight(&10, &20), 1.0));
        assert!(g.set_edge_weight(&20, &10, 6.0));
        assert!(approx(g.edge_weight(&10, &20), 6.0));
        assert!(approx(g.edge_weight(&20, &10), 6.0));
        assert!(!g.set_edge_weight(&10, &30, 1.0));
    }

    #[test]
    fn test_remove_edge() {
        let mut g = triangle();
        assert!(g.remove_edge(&20, &10));
        assert!(!g.remove_edge(&10, &20));
        assert!(!g.are_adjacent(&10, &20));
        assert!(!g.are_adjacent(&20, &10));
        assert_eq!(g.edge_count(), 1);
        assert!(!g.remove_edge(&10, &99));
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_remove_absent_vertex() {
        let mut g = triangle();
        assert!(!g.remove_vertex(&99));
        assert_eq!(g.vertex_count(), 3);
    }

    #[test]
    fn test_neighbors_and_degree() {
        let g = triangle();
        let mut n: Vec<(u32, Weight)> = g.neighbors(&20).map(|(k, w)| (*k, w)).collect();
        n.sort_by_key(|(k, _)| *k);
        assert_eq!(n, vec![(10, 1.0), (30, 2.0)]);
        assert_eq!(g.degree(&20), Some(2));
        assert_eq!(g.degree(&99), None);
        assert_eq!(g.neighbors(&99).count(), 0);
    }

    #[test]
    fn test_index_layer() {
        let mut g = triangle();
        assert_eq!(g.index_by_key(&10), Some(0));
        assert_eq!(g.index_by_key(&30), Some(2));
        assert_eq!(g.key_by_index(1), Some(&20));
        assert!(g.contains_vertex_by_index(1));
        assert!(g.contains_edge_by_index(0, 1));
        assert!(!g.contains_edge_by_index(0, 2));
        assert!(approx(g.edge_weight_by_index(2, 1), 2.0));

        g.remove_vertex(&20);
        assert_eq!(g.index_slot(1), SlotState::Tombstone);
        assert_eq!(g.index_slot(7), SlotState::Empty);
        assert!(!g.contains_vertex_by_index(1));
        assert_eq!(g.key_by_index(1), None);
        assert_eq!(g.edge_weight_by_index(0, 1), None);
        assert_eq!(g.index_by_key(&20), None);

        // re-added keys get a fresh index, the tombstone stays
        g.add_vertex(20).unwrap();
        assert_eq!(g.index_by_key(&20), Some(3));
        assert_eq!(g.index_slot(1), SlotState::Tombstone);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_default_value_vertex_is_live_by_index() {
        let mut g: UndirectedGraph<i32> = Graph::new();
        g.add_vertex(0).unwrap();
        g.add_vertex(1).unwrap();
        g.add_edge(&0, &1, 1.0).unwrap();
        assert!(g.contains_vertex_by_index(0));
        assert!(g.contains_edge_by_index(0, 1));
    }

    #[test]
    fn test_index_exhaustion_is_reported() {
        let mut g: UndirectedGraph<i32> = Graph::with_config(GraphConfig::new().with_max_indices(2));
        g.add_vertex(1).unwrap();
        g.add_vertex(2).unwrap();
        g.remove_vertex(&1);
        assert_eq!(
            g.add_vertex(3),
            Err(GraphError::IndexSpaceExhausted { limit: 2 })
        );
        assert!(!g.contains_vertex(&3));
        assert_eq!(g.vertex_count(), 1);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut g = triangle();
        g.remove_vertex(&10);
        g.clear();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert_eq!(g.next_index(), 0);
        assert_eq!(g.index_slot(0), SlotState::Empty);

        g.add_vertex(7).unwrap();
        assert_eq!(g.index_by_key(&7), Some(0));
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_copy_compacts_indices() {
        let mut g = triangle();
        g.remove_vertex(&10);
        let copy = g.clone();
        assert_eq!(copy.index_by_key(&20), Some(0));
        assert_eq!(copy.index_by_key(&30), Some(1));
        assert!(approx(copy.edge_weight(&30, &20), 2.0));
        assert_eq!(copy.edge_count(), 1);
        assert!(copy.check_invariants().is_ok());
    }

    #[test]
    fn test_copy_replaces_existing_contents() {
        let source = triangle();
        let mut g: UndirectedGraph<u32> = Graph::new();
        g.add_vertex(1).unwrap();
        g.add_vertex(2).unwrap();
        g.add_edge(&1, &2, 1.0).unwrap();

        g.clone_from(&source);
        assert!(!g.contains_vertex(&1));
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn test_copy_from_empty_clears() {
        let mut g = triangle();
        g.copy_from(&UndirectedGraph::new()).unwrap();
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_copy_ceiling_leaves_destination_empty() {
        let source = triangle();
        let mut g: UndirectedGraph<u32> =
            Graph::with_config(GraphConfig::new().with_copy_vertex_ceiling(2));
        g.add_vertex(99).unwrap();

        assert_eq!(
            g.copy_from(&source),
            Err(GraphError::CopyCeilingExceeded { ceiling: 2 })
        );
        assert!(g.is_empty());
        assert_eq!(g.edge_count(), 0);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    #[should_panic(expected = "exceeds 2 vertices")]
    fn test_clone_over_ceiling_panics() {
        let mut g: UndirectedGraph<u32> =
            Graph::with_config(GraphConfig::new().with_copy_vertex_ceiling(2));
        for v in [10, 20, 30] {
            g.add_vertex(v).unwrap();
        }
        g.add_edge(&10, &20, 1.0).unwrap();
        assert_eq!(g.vertex_count(), 3);

        let _ = g.clone();
    }

    #[test]
    #[should_panic(expected = "exceeds 2 vertices")]
    fn test_clone_from_over_ceiling_panics() {
        let source = triangle();
        let mut g: UndirectedGraph<u32> =
            Graph::with_config(GraphConfig::new().with_copy_vertex_ceiling(2));
        g.clone_from(&source);
    }

    #[test]
    fn test_copy_index_exhaustion_leaves_destination_empty() {
        let source = triangle();
        let mut g: UndirectedGraph<u32> = Graph::with_config(GraphConfig::new().with_max_indices(1));
        assert!(g.copy_from(&source).is_err());
        assert!(g.is_empty());
    }

    #[test]
    fn test_cross_kind_copy_carries_vertices_only() {
        let source = triangle();
        let mut g: DirectedGraph<u32> = Graph::new();
        g.copy_from(&source).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.edge_count(), 0);
        assert!(!g.contains_edge(&10, &20));
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn test_directed_graph() {
        let mut g: DirectedGraph<&str> = Graph::new();
        for v in ["a", "b", "c"] {
            g.add_vertex(v).unwrap();
        }
        g.add_edge(&"a", &"b", 1.0).unwrap();
        g.add_edge(&"b", &"a", 2.0).unwrap();
        g.add_edge(&"c", &"a", 3.0).unwrap();
        assert_eq!(g.edge_count(), 3);
        assert!(g.are_adjacent(&"c", &"a"));
        assert!(!g.are_adjacent(&"a", &"c"));

        assert!(g.remove_edge(&"a", &"b"));
        assert!(g.contains_edge(&"b", &"a"));
        assert_eq!(g.edge_count(), 2);

        assert!(g.remove_vertex(&"a"));
        assert_eq!(g.edge_count(), 0);
        assert!(g.check_invariants().is_ok());

        let copy = g.clone();
        assert_eq!(copy.kind(), GraphKind::Directed);
        assert_eq!(copy.vertex_count(), 2);
    }

    #[test]
    fn test_debug_output() {
        let g = triangle();
        let s = format!("{:?}", g);
        assert!(s.contains("vertex_count: 3"));
        assert!(s.contains("Undirected"));
    }

    #[test]
    fn test_memory_usage_grows() {
        let empty: UndirectedGraph<u32> = Graph::new();
        assert!(triangle().memory_usage() > empty.memory_usage());
    }
}
