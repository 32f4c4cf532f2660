//! Edge semantics for the graph family.
//!
//! `Graph` owns vertex identity, counters and the index table. Everything
//! that depends on edge direction lives behind [`EdgeKind`]: inserting and
//! removing records, detaching a vertex before removal, and rebuilding edge
//! topology during a copy. Kinds are zero-sized markers chosen by type
//! parameter.

use crate::error::{GraphError, Result};
use crate::node::{EdgeRecord, VertexIndex, VertexStore, Weight};

/// Which member of the graph family a kind implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphKind {
    Undirected,
    Directed,
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Undirected {}
    impl Sealed for super::Directed {}
}

/// Edge-direction rules for a graph.
///
/// Every method works on vertex slots only and returns what changed; the
/// owning `Graph` updates its counters from those results.
///
/// The trait is sealed and its methods are only callable from inside the
/// crate, since a [`VertexStore`] cannot be built outside it. Callers name a
/// kind as `Graph`'s type parameter.
pub trait EdgeKind: sealed::Sealed + Copy + Default + Send + Sync + 'static {
    const KIND: GraphKind;

    /// Edge records stored per logical edge.
    const RECORDS_PER_EDGE: usize;

    /// Insert the edge `a -> b`. Returns `Ok(false)` when nothing changed:
    /// a missing endpoint, `a == b`, an invalid weight, or an existing edge.
    /// Either the whole edge is inserted or nothing is.
    fn insert_edge<T>(
        store: &mut VertexStore<T>,
        a: VertexIndex,
        b: VertexIndex,
        weight: Weight,
    ) -> Result<bool>;

    /// Remove the edge `a -> b`. Returns whether a logical edge went away.
    fn remove_edge<T>(store: &mut VertexStore<T>, a: VertexIndex, b: VertexIndex) -> bool;

    /// Delete every record that touches `v`, leaving `v` with no edges.
    /// Returns the number of logical edges removed.
    fn detach_vertex<T>(store: &mut VertexStore<T>, v: VertexIndex) -> usize;

    fn are_adjacent<T>(store: &VertexStore<T>, a: VertexIndex, b: VertexIndex) -> bool {
        store.get(a).is_some_and(|v| v.has_edge_to(b))
    }

    /// Change the weight of an existing edge. Rejected weights leave it unchanged.
    fn set_weight<T>(
        store: &mut VertexStore<T>,
        a: VertexIndex,
        b: VertexIndex,
        weight: Weight,
    ) -> bool;

    /// Recreate `src`'s edges in `dst`. `map[i]` is the destination index of
    /// source vertex `i`. Edge counters are not touched.
    fn copy_edges<T>(
        dst: &mut VertexStore<T>,
        src: &VertexStore<T>,
        map: &[Option<VertexIndex>],
    ) -> Result<()>;

    /// Check kind-specific structure (e.g. mirrored records).
    fn verify_topology<T>(store: &VertexStore<T>) -> Result<()>;
}

/// One record per source record, skipping any already present in `dst`.
fn copy_records<T>(
    dst: &mut VertexStore<T>,
    src: &VertexStore<T>,
    map: &[Option<VertexIndex>],
) -> Result<()> {
    for (src_index, record) in src.live() {
        let Some(from) = map.get(src_index).copied().flatten() else {
            continue;
        };
        for edge in record.edges() {
            let Some(to) = map.get(edge.target()).copied().flatten() else {
                continue;
            };
            let Some(vertex) = dst.get_mut(from) else {
                continue;
            };
            if vertex.has_edge_to(to) {
                continue;
            }
            if let Some(copy) = EdgeRecord::new(to, edge.weight()) {
                vertex.reserve_edge()?;
                vertex.push_edge(copy);
            }
        }
    }
    Ok(())
}

/// Undirected edges: each logical edge is a pair of mirrored records with the
/// same weight, one in each endpoint's list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Undirected;

impl EdgeKind for Undirected {
    const KIND: GraphKind = GraphKind::Undirected;
    const RECORDS_PER_EDGE: usize = 2;

    fn insert_edge<T>(
        store: &mut VertexStore<T>,
        a: VertexIndex,
        b: VertexIndex,
        weight: Weight,
    ) -> Result<bool> {
        let (Some(forward), Some(backward)) = (EdgeRecord::new(b, weight), EdgeRecord::new(a, weight))
        else {
            return Ok(false);
        };
        let Some((va, vb)) = store.pair_mut(a, b) else {
            return Ok(false);
        };
        if va.has_edge_to(b) || vb.has_edge_to(a) {
            return Ok(false);
        }
        // Both lists must have room before either record goes in.
        va.reserve_edge()?;
        vb.reserve_edge()?;
        va.push_edge(forward);
        vb.push_edge(backward);
        Ok(true)
    }

    fn remove_edge<T>(store: &mut VertexStore<T>, a: VertexIndex, b: VertexIndex) -> bool {
        let Some((va, vb)) = store.pair_mut(a, b) else {
            return false;
        };
        let forward = va.remove_edge_to(b);
        let backward = vb.remove_edge_to(a);
        forward || backward
    }

    /// Mirrors make the neighbours of `v` exactly the vertices holding a
    /// record that points back at it, so only those lists are visited.
    fn detach_vertex<T>(store: &mut VertexStore<T>, v: VertexIndex) -> usize {
        let Some(vertex) = store.get_mut(v) else {
            return 0;
        };
        let own = vertex.take_edges();
        for edge in &own {
            if let Some(neighbor) = store.get_mut(edge.target()) {
                neighbor.remove_edge_to(v);
            }
        }
        own.len()
    }

    fn set_weight<T>(
        store: &mut VertexStore<T>,
        a: VertexIndex,
        b: VertexIndex,
        weight: Weight,
    ) -> bool {
        if !crate::node::is_valid_weight(weight) {
            return false;
        }
        let Some((va, vb)) = store.pair_mut(a, b) else {
            return false;
        };
        let (Some(forward), Some(backward)) = (va.edge_to_mut(b), vb.edge_to_mut(a)) else {
            return false;
        };
        forward.set_weight(weight) && backward.set_weight(weight)
    }

    fn copy_edges<T>(
        dst: &mut VertexStore<T>,
        src: &VertexStore<T>,
        map: &[Option<VertexIndex>],
    ) -> Result<()> {
        // The source stores each edge twice, so walking every record
        // rebuilds both mirrors.
        copy_records(dst, src, map)
    }

    fn verify_topology<T>(store: &VertexStore<T>) -> Result<()> {
        for (index, vertex) in store.live() {
            for edge in vertex.edges() {
                let mirror = store
                    .get(edge.target())
                    .and_then(|t| t.edge_to(index))
                    .map(EdgeRecord::weight);
                if mirror != Some(edge.weight()) {
                    return Err(GraphError::InvariantViolation(format!(
                        "edge {} -> {} has no matching mirror",
                        index,
                        edge.target()
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Directed edges: one record per logical edge, stored in the source's list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directed;

impl EdgeKind for Directed {
    const KIND: GraphKind = GraphKind::Directed;
    const RECORDS_PER_EDGE: usize = 1;

    fn insert_edge<T>(
        store: &mut VertexStore<T>,
        a: VertexIndex,
        b: VertexIndex,
        weight: Weight,
    ) -> Result<bool> {
        let Some(record) = EdgeRecord::new(b, weight) else {
            return Ok(false);
        };
        let Some((va, _)) = store.pair_mut(a, b) else {
            return Ok(false);
        };
        if va.has_edge_to(b) {
            return Ok(false);
        }
        va.reserve_edge()?;
        va.push_edge(record);
        Ok(true)
    }

    fn remove_edge<T>(store: &mut VertexStore<T>, a: VertexIndex, b: VertexIndex) -> bool {
        store
            .pair_mut(a, b)
            .is_some_and(|(va, _)| va.remove_edge_to(b))
    }

    fn detach_vertex<T>(store: &mut VertexStore<T>, v: VertexIndex) -> usize {
        let Some(vertex) = store.get_mut(v) else {
            return 0;
        };
        let outgoing = vertex.take_edges().len();
        let mut incoming = 0;
        for (u, other) in store.live_mut() {
            if u != v && other.remove_edge_to(v) {
                incoming += 1;
            }
        }
        outgoing + incoming
    }

    fn set_weight<T>(
        store: &mut VertexStore<T>,
        a: VertexIndex,
        b: VertexIndex,
        weight: Weight,
    ) -> bool {
        store
            .pair_mut(a, b)
            .and_then(|(va, _)| va.edge_to_mut(b))
            .is_some_and(|edge| edge.set_weight(weight))
    }

    fn copy_edges<T>(
        dst: &mut VertexStore<T>,
        src: &VertexStore<T>,
        map: &[Option<VertexIndex>],
    ) -> Result<()> {
        copy_records(dst, src, map)
    }

    fn verify_topology<T>(_store: &VertexStore<T>) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::VertexRecord;

    fn store(n: usize) -> VertexStore<usize> {
        let mut s = VertexStore::new();
        for i in 0..n {
            s.push(VertexRecord::new(i));
        }
        s
    }

    #[test]
    fn test_undirected_insert_mirrors() {
        let mut s = store(2);
        assert!(Undirected::insert_edge(&mut s, 0, 1, 2.0).unwrap());
        assert!(Undirected::are_adjacent(&s, 0, 1));
        assert!(Undirected::are_adjacent(&s, 1, 0));
        assert_eq!(s.record_count(), 2);
        assert!(Undirected::verify_topology(&s).is_ok());
    }

    #[test]
    fn test_undirected_rejects_duplicates_and_loops() {
        let mut s = store(2);
        Undirected::insert_edge(&mut s, 0, 1, 1.0).unwrap();
        assert!(!Undirected::insert_edge(&mut s, 1, 0, 1.0).unwrap());
        assert!(!Undirected::insert_edge(&mut s, 0, 0, 1.0).unwrap());
        assert!(!Undirected::insert_edge(&mut s, 0, 1, -3.0).unwrap());
        assert_eq!(s.record_count(), 2);
    }

    #[test]
    fn test_undirected_remove_either_side() {
        let mut s = store(2);
        Undirected::insert_edge(&mut s, 0, 1, 1.0).unwrap();
        assert!(Undirected::remove_edge(&mut s, 1, 0));
        assert!(!Undirected::remove_edge(&mut s, 0, 1));
        assert_eq!(s.record_count(), 0);
    }

    #[test]
    fn test_undirected_detach() {
        let mut s = store(4);
        Undirected::insert_edge(&mut s, 0, 1, 1.0).unwrap();
        Undirected::insert_edge(&mut s, 0, 2, 1.0).unwrap();
        Undirected::insert_edge(&mut s, 2, 3, 1.0).unwrap();
        assert_eq!(Undirected::detach_vertex(&mut s, 0), 2);
        assert_eq!(s.record_count(), 2);
        assert!(!Undirected::are_adjacent(&s, 1, 0));
        assert!(Undirected::are_adjacent(&s, 3, 2));
    }

    #[test]
    fn test_undirected_set_weight_both_sides() {
        let mut s = store(2);
        Undirected::insert_edge(&mut s, 0, 1, 1.0).unwrap();
        assert!(Undirected::set_weight(&mut s, 1, 0, 7.5));
        assert!(!Undirected::set_weight(&mut s, 0, 1, -1.0));
        assert_eq!(s.get(0).unwrap().edge_to(1).unwrap().weight(), 7.5);
        assert_eq!(s.get(1).unwrap().edge_to(0).unwrap().weight(), 7.5);
    }

    #[test]
    fn test_undirected_verify_detects_missing_mirror() {
        let mut s = store(2);
        s.get_mut(0)
            .unwrap()
            .push_edge(EdgeRecord::new(1, 1.0).unwrap());
        assert!(matches!(
            Undirected::verify_topology(&s),
            Err(GraphError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_directed_one_way() {
        let mut s = store(3);
        assert!(Directed::insert_edge(&mut s, 0, 1, 1.0).unwrap());
        assert!(Directed::insert_edge(&mut s, 1, 0, 4.0).unwrap());
        assert!(!Directed::insert_edge(&mut s, 0, 1, 1.0).unwrap());
        assert!(Directed::are_adjacent(&s, 0, 1));
        assert!(!Directed::are_adjacent(&s, 0, 2));
        assert!(Directed::remove_edge(&mut s, 0, 1));
        assert!(Directed::are_adjacent(&s, 1, 0));
    }

    #[test]
    fn test_directed_detach_counts_both_directions() {
        let mut s = store(3);
        Directed::insert_edge(&mut s, 0, 1, 1.0).unwrap();
        Directed::insert_edge(&mut s, 2, 0, 1.0).unwrap();
        Directed::insert_edge(&mut s, 1, 2, 1.0).unwrap();
        assert_eq!(Directed::detach_vertex(&mut s, 0), 2);
        assert_eq!(s.record_count(), 1);
    }

    #[test]
    fn test_copy_records_remaps_targets() {
        let mut src = store(3);
        src.tombstone(0);
        Undirected::insert_edge(&mut src, 1, 2, 3.0).unwrap();

        let mut dst = store(2);
        let map = vec![None, Some(1), Some(0)];
        Undirected::copy_edges(&mut dst, &src, &map).unwrap();
        assert_eq!(dst.get(1).unwrap().edge_to(0).unwrap().weight(), 3.0);
        assert_eq!(dst.get(0).unwrap().edge_to(1).unwrap().weight(), 3.0);
        assert_eq!(dst.record_count(), 2);
    }
}
