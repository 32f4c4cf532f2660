use std::collections::HashMap;
use std::hash::Hash;

use crate::error::{GraphError, Result};
use crate::node::VertexIndex;

/// State of one position in the index table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState<'a, T> {
    /// The index has never been allocated.
    Empty,
    /// The index belongs to a vertex currently in the graph.
    Live(&'a T),
    /// The index belonged to a removed vertex. It is never handed out again.
    Tombstone,
}

#[derive(Debug, Clone)]
enum IndexEntry<T> {
    Live(T),
    Tombstone,
}

/// Bidirectional key <-> index mapping.
///
/// Indices are allocated monotonically from 0 and never reused: removing a
/// key tombstones its position, and re-adding the key gets a fresh index.
#[derive(Debug, Clone)]
pub(crate) struct IndexTable<T> {
    key_to_index: HashMap<T, VertexIndex>,
    entries: Vec<IndexEntry<T>>,
    limit: usize,
}

impl<T: Eq + Hash + Clone> IndexTable<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            key_to_index: HashMap::new(),
            entries: Vec::new(),
            limit,
        }
    }

    pub fn with_capacity(limit: usize, capacity: usize) -> Self {
        Self {
            key_to_index: HashMap::with_capacity(capacity),
            entries: Vec::with_capacity(capacity),
            limit,
        }
    }

    /// The index the next new key will receive.
    pub fn next_index(&self) -> VertexIndex {
        self.entries.len()
    }

    /// Number of keys currently registered.
    pub fn live_count(&self) -> usize {
        self.key_to_index.len()
    }

    pub fn index_of(&self, key: &T) -> Option<VertexIndex> {
        self.key_to_index.get(key).copied()
    }

    pub fn contains_key(&self, key: &T) -> bool {
        self.key_to_index.contains_key(key)
    }

    pub fn slot(&self, index: VertexIndex) -> SlotState<'_, T> {
        match self.entries.get(index) {
            None => SlotState::Empty,
            Some(IndexEntry::Live(key)) => SlotState::Live(key),
            Some(IndexEntry::Tombstone) => SlotState::Tombstone,
        }
    }

    pub fn key_of(&self, index: VertexIndex) -> Option<&T> {
        match self.slot(index) {
            SlotState::Live(key) => Some(key),
            SlotState::Empty | SlotState::Tombstone => None,
        }
    }

    /// Register `key`, returning its index. A key that is already registered
    /// keeps the index it has.
    ///
    /// Nothing is modified when the index space is exhausted or the tables
    /// cannot grow.
    pub fn register(&mut self, key: T) -> Result<VertexIndex> {
        if let Some(&index) = self.key_to_index.get(&key) {
            return Ok(index);
        }
        if self.entries.len() >= self.limit {
            return Err(GraphError::IndexSpaceExhausted { limit: self.limit });
        }
        self.entries.try_reserve(1)?;
        self.key_to_index.try_reserve(1)?;

        let index = self.entries.len();
        self.entries.push(IndexEntry::Live(key.clone()));
        self.key_to_index.insert(key, index);
        Ok(index)
    }

    /// Tombstone `key`'s index. Returns the index that was released.
    pub fn release(&mut self, key: &T) -> Option<VertexIndex> {
        let index = self.key_to_index.remove(key)?;
        if let Some(entry) = self.entries.get_mut(index) {
            *entry = IndexEntry::Tombstone;
        }
        Some(index)
    }

    /// Approximate bytes held: each live key plus its bucket in the hash
    /// map, and one positional entry per allocated index.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        self.key_to_index.len() * (size_of::<T>() + size_of::<VertexIndex>() + 8)
            + self.entries.len() * size_of::<IndexEntry<T>>()
    }

    /// Forget every key and restart allocation at 0.
    pub fn clear(&mut self) {
        self.key_to_index.clear();
        self.entries.clear();
    }
}
