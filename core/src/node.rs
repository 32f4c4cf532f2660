use std::collections::TryReserveError;

/// Stable vertex handle. Doubles as the vertex's position in the index table
/// and is never reused after the vertex is removed.
pub type VertexIndex = usize;

/// Edge weight. Only non-negative values are ever stored.
pub type Weight = f64;

/// Weight used by `add_edge_default`.
pub const DEFAULT_WEIGHT: Weight = 1.0;

/// NaN fails the comparison, so it is rejected along with negatives.
pub(crate) fn is_valid_weight(weight: Weight) -> bool {
    weight >= 0.0
}

/// One directed entry in a vertex's adjacency list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRecord {
    target: VertexIndex,
    weight: Weight,
}

impl EdgeRecord {
    /// Returns `None` if `weight` is negative or NaN.
    pub fn new(target: VertexIndex, weight: Weight) -> Option<Self> {
        is_valid_weight(weight).then_some(Self { target, weight })
    }

    pub fn target(&self) -> VertexIndex {
        self.target
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    /// Replace the weight. Negative and NaN weights are rejected and the
    /// previous weight is kept.
    pub fn set_weight(&mut self, weight: Weight) -> bool {
        if !is_valid_weight(weight) {
            return false;
        }
        self.weight = weight;
        true
    }
}

/// A vertex: its key plus the outgoing edge records it owns.
#[derive(Debug, Clone)]
pub struct VertexRecord<T> {
    key: T,
    edges: Vec<EdgeRecord>,
}

impl<T> VertexRecord<T> {
    pub fn new(key: T) -> Self {
        Self {
            key,
            edges: Vec::new(),
        }
    }

    pub fn key(&self) -> &T {
        &self.key
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }

    pub fn edge_to(&self, target: VertexIndex) -> Option<&EdgeRecord> {
        self.edges.iter().find(|e| e.target == target)
    }

    pub fn has_edge_to(&self, target: VertexIndex) -> bool {
        self.edge_to(target).is_some()
    }

    pub(crate) fn edge_to_mut(&mut self, target: VertexIndex) -> Option<&mut EdgeRecord> {
        self.edges.iter_mut().find(|e| e.target == target)
    }

    /// Make room for one more record so a following `push_edge` cannot allocate.
    pub(crate) fn reserve_edge(&mut self) -> Result<(), TryReserveError> {
        self.edges.try_reserve(1)
    }

    pub(crate) fn push_edge(&mut self, edge: EdgeRecord) {
        self.edges.push(edge);
    }

    /// Remove the record pointing at `target`, if any.
    pub(crate) fn remove_edge_to(&mut self, target: VertexIndex) -> bool {
        match self.edges.iter().position(|e| e.target == target) {
            Some(pos) => {
                self.edges.swap_remove(pos);
                true
            }
            None => false,
        }
    }

    /// Drop every outgoing record, returning them.
    pub(crate) fn take_edges(&mut self) -> Vec<EdgeRecord> {
        std::mem::take(&mut self.edges)
    }
}

/// Index-stable vertex storage. Slot `i` holds the vertex whose index is `i`;
/// removed vertices leave an empty slot that is never refilled.
///
/// Exported only because it appears in [`EdgeKind`](crate::EdgeKind)
/// signatures. It has no public constructor or accessor; read a graph through
/// [`Graph`](crate::Graph) instead.
#[derive(Debug, Clone)]
pub struct VertexStore<T> {
    slots: Vec<Option<VertexRecord<T>>>,
}

impl<T> VertexStore<T> {
    pub(crate) fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Number of slots ever allocated, tombstones included.
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn get(&self, index: VertexIndex) -> Option<&VertexRecord<T>> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, index: VertexIndex) -> Option<&mut VertexRecord<T>> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    /// Mutable access to two distinct live vertices at once.
    pub(crate) fn pair_mut(
        &mut self,
        a: VertexIndex,
        b: VertexIndex,
    ) -> Option<(&mut VertexRecord<T>, &mut VertexRecord<T>)> {
        if a == b || a >= self.slots.len() || b >= self.slots.len() {
            return None;
        }
        let (lo, hi, swapped) = if a < b { (a, b, false) } else { (b, a, true) };
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].as_mut()?;
        let second = tail[0].as_mut()?;
        Some(if swapped {
            (second, first)
        } else {
            (first, second)
        })
    }

    pub(crate) fn live(&self) -> impl Iterator<Item = (VertexIndex, &VertexRecord<T>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (i, v)))
    }

    pub(crate) fn live_mut(&mut self) -> impl Iterator<Item = (VertexIndex, &mut VertexRecord<T>)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|v| (i, v)))
    }

    pub(crate) fn reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.slots.try_reserve(additional)
    }

    /// Append a vertex; the caller has reserved room and registered its index.
    pub(crate) fn push(&mut self, record: VertexRecord<T>) -> VertexIndex {
        self.slots.push(Some(record));
        self.slots.len() - 1
    }

    /// Empty the slot, returning the vertex that lived there.
    pub(crate) fn tombstone(&mut self, index: VertexIndex) -> Option<VertexRecord<T>> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    /// Total number of edge records across all adjacency lists.
    pub(crate) fn record_count(&self) -> usize {
        self.live().map(|(_, v)| v.degree()).sum()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
