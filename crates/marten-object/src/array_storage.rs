//! Array element storage.
//!
//! Elements live either in a dense slot vector (index = offset) or in a
//! sparse `index -> descriptor` map. Arrays start dense unless created with a
//! large capacity, and switch to sparse once a write looks like it would
//! waste memory. The switch is one-way: a sparse array never becomes dense
//! again.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::property::PropertyDescriptor;

/// Indices (and grown capacities) at or above this stay sparse
pub const DENSE_CEILING: u32 = 10 * 1024;

/// Writing further than this past the dense capacity switches to sparse
pub const GAP_TOLERANCE: u32 = 50;

/// Sparse maps at or above this size skip the smallest-index scan
pub const SPARSE_SCAN_LIMIT: usize = 100;

/// Largest initial capacity reserved for a sparse map
const SPARSE_RESERVE_LIMIT: u32 = 1024;

/// Thresholds steering the dense/sparse decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageLimits {
    /// Dense ceiling for both indices and grown capacities
    pub dense_ceiling: u32,
    /// Allowed distance between the dense capacity and a new index
    pub gap_tolerance: u32,
    /// Sparse size below which `smallest_occupied_index` scans the keys
    pub sparse_scan_limit: usize,
}

impl Default for StorageLimits {
    fn default() -> Self {
        Self {
            dense_ceiling: DENSE_CEILING,
            gap_tolerance: GAP_TOLERANCE,
            sparse_scan_limit: SPARSE_SCAN_LIMIT,
        }
    }
}

#[derive(Debug, Clone)]
enum Slots {
    Dense(Vec<Option<PropertyDescriptor>>),
    Sparse(FxHashMap<u32, PropertyDescriptor>),
}

/// Element storage of an array exotic object
#[derive(Debug, Clone)]
pub struct ArrayStorage {
    slots: Slots,
    limits: StorageLimits,
}

impl ArrayStorage {
    /// Create storage for the given initial capacity
    pub fn new(capacity: u32) -> Self {
        Self::with_limits(capacity, StorageLimits::default())
    }

    /// Create storage with explicit thresholds
    pub fn with_limits(capacity: u32, limits: StorageLimits) -> Self {
        let slots = if capacity < limits.dense_ceiling {
            Slots::Dense(vec![None; capacity as usize])
        } else {
            Slots::Sparse(FxHashMap::with_capacity_and_hasher(
                capacity.min(SPARSE_RESERVE_LIMIT) as usize,
                Default::default(),
            ))
        };
        Self { slots, limits }
    }

    /// Thresholds in effect
    pub fn limits(&self) -> StorageLimits {
        self.limits
    }

    /// Whether the dense representation is live
    pub fn is_dense(&self) -> bool {
        matches!(self.slots, Slots::Dense(_))
    }

    /// Allocated dense slots, `0` when sparse
    pub fn dense_capacity(&self) -> usize {
        match &self.slots {
            Slots::Dense(dense) => dense.len(),
            Slots::Sparse(_) => 0,
        }
    }

    /// Read the descriptor at `index`
    pub fn read(&self, index: u32) -> Option<&PropertyDescriptor> {
        match &self.slots {
            Slots::Dense(dense) => dense.get(index as usize).and_then(Option::as_ref),
            Slots::Sparse(sparse) => sparse.get(&index),
        }
    }

    /// Whether `index` holds a descriptor
    pub fn contains(&self, index: u32) -> bool {
        self.read(index).is_some()
    }

    /// Store `desc` at `index`, switching to sparse if the write looks sparse
    pub fn write(&mut self, index: u32, desc: PropertyDescriptor) {
        let limits = self.limits;
        let slots = match &mut self.slots {
            Slots::Sparse(sparse) => {
                sparse.insert(index, desc);
                return;
            }
            Slots::Dense(dense) => dense,
        };

        // Work out the growth eagerly so we know if we outgrow
        let capacity = slots.len() as u32;
        let new_capacity = if index >= capacity {
            index.max(capacity.max(2)).saturating_mul(2)
        } else {
            0
        };

        let can_use_dense = index < limits.dense_ceiling
            && new_capacity < limits.dense_ceiling
            && index < capacity.saturating_add(limits.gap_tolerance);

        if can_use_dense {
            if index >= capacity {
                trace!(
                    target: "marten::array",
                    from = capacity,
                    to = new_capacity,
                    "growing dense elements"
                );
                slots.resize(new_capacity as usize, None);
            }
            slots[index as usize] = Some(desc);
            return;
        }

        let mut sparse = self.make_sparse();
        sparse.insert(index, desc);
        self.slots = Slots::Sparse(sparse);
    }

    /// Grow the dense buffer to at least `capacity` slots. No effect when
    /// sparse or already large enough.
    pub fn ensure_capacity(&mut self, capacity: u32) {
        if let Slots::Dense(dense) = &mut self.slots {
            if capacity as usize > dense.len() {
                dense.resize(capacity as usize, None);
            }
        }
    }

    /// Remove the descriptor at `index`, returning whether one was present
    pub fn delete(&mut self, index: u32) -> bool {
        match &mut self.slots {
            Slots::Dense(dense) => dense
                .get_mut(index as usize)
                .and_then(Option::take)
                .is_some(),
            Slots::Sparse(sparse) => sparse.remove(&index).is_some(),
        }
    }

    /// Exact number of occupied slots
    pub fn occupied_count(&self) -> usize {
        match &self.slots {
            Slots::Dense(dense) => dense.iter().filter(|slot| slot.is_some()).count(),
            Slots::Sparse(sparse) => sparse.len(),
        }
    }

    /// Hint for where iteration may start.
    ///
    /// Dense storage always answers `0`. Sparse storage only scans for the
    /// minimum key when the map is small; otherwise it answers `0` too. The
    /// result may be lower than the true smallest index, never higher.
    pub fn smallest_occupied_index(&self) -> u32 {
        let Slots::Sparse(sparse) = &self.slots else {
            return 0;
        };

        if sparse.is_empty()
            || sparse.len() >= self.limits.sparse_scan_limit
            || sparse.contains_key(&0)
        {
            return 0;
        }

        sparse.keys().copied().min().unwrap_or(0)
    }

    /// Snapshot of the occupied indices in ascending order
    pub fn occupied_indices(&self) -> Vec<u32> {
        match &self.slots {
            Slots::Dense(dense) => dense
                .iter()
                .enumerate()
                .filter(|(_, slot)| slot.is_some())
                .map(|(i, _)| i as u32)
                .collect(),
            Slots::Sparse(sparse) => {
                let mut keys: Vec<u32> = sparse.keys().copied().collect();
                keys.sort_unstable();
                keys
            }
        }
    }

    fn make_sparse(&mut self) -> FxHashMap<u32, PropertyDescriptor> {
        let Slots::Dense(dense) = &mut self.slots else {
            return FxHashMap::default();
        };

        let capacity = dense.len();
        let reserve = if capacity <= SPARSE_RESERVE_LIMIT as usize {
            capacity
        } else {
            0
        };
        let mut sparse = FxHashMap::with_capacity_and_hasher(reserve, Default::default());
        for (i, slot) in std::mem::take(dense).into_iter().enumerate() {
            if let Some(desc) = slot {
                sparse.insert(i as u32, desc);
            }
        }

        debug!(
            target: "marten::array",
            capacity,
            occupied = sparse.len(),
            "converted dense elements to sparse"
        );
        sparse
    }
}

impl Default for ArrayStorage {
    fn default() -> Self {
        Self::new(0)
    }
}
