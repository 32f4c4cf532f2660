use serde::{Deserialize, Serialize};

/// Default index limit, the largest value a signed 32-bit handle can hold.
pub const DEFAULT_MAX_INDICES: usize = i32::MAX as usize;

/// Default upper bound on the number of vertices a single copy may clone.
pub const DEFAULT_COPY_VERTEX_CEILING: usize = 1_000_000;

/// Per-graph limits.
///
/// Missing fields deserialize to their defaults, so a config file only has
/// to name the limits it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Number of vertex indices the graph may ever allocate. Indices are not
    /// recycled, so removed vertices still count against this.
    pub max_indices: usize,
    /// A copy whose source exceeds this many vertices fails and leaves the
    /// destination empty.
    pub copy_vertex_ceiling: usize,
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_indices(mut self, max_indices: usize) -> Self {
        self.max_indices = max_indices;
        self
    }

    pub fn with_copy_vertex_ceiling(mut self, ceiling: usize) -> Self {
        self.copy_vertex_ceiling = ceiling;
        self
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            max_indices: DEFAULT_MAX_INDICES,
            copy_vertex_ceiling: DEFAULT_COPY_VERTEX_CEILING,
        }
    }
}
