use crate::domain::errors::SelectionError;
use crate::domain::market_data::AssetId;
use std::collections::BTreeSet;

/// Default cap on the comparison panel
pub const MAX_COMPARISON: usize = 5;

/// Result of a successful comparison toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Bounded, insertion-ordered set of assets chosen for comparison.
///
/// `len() <= capacity()` holds after every operation. Ids are not checked
/// against the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    ids: Vec<AssetId>,
    capacity: usize,
}

impl Default for SelectionSet {
    fn default() -> Self {
        Self::with_capacity(MAX_COMPARISON)
    }
}

impl SelectionSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self { ids: Vec::with_capacity(capacity), capacity }
    }

    /// Rebuilds from persisted ids: duplicates dropped, extras past capacity truncated.
    pub fn from_ids(ids: impl IntoIterator<Item = AssetId>, capacity: usize) -> Self {
        let mut set = Self::with_capacity(capacity);
        for id in ids {
            if set.ids.len() == capacity {
                break;
            }
            if !set.contains(&id) {
                set.ids.push(id);
            }
        }
        set
    }

    pub fn toggle(&mut self, id: AssetId) -> Result<ToggleOutcome, SelectionError> {
        if let Some(pos) = self.ids.iter().position(|existing| *existing == id) {
            self.ids.remove(pos);
            return Ok(ToggleOutcome::Removed);
        }
        if self.is_full() {
            return Err(SelectionError::CapacityExceeded { max: self.capacity });
        }
        self.ids.push(id);
        Ok(ToggleOutcome::Added)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_full(&self) -> bool {
        self.ids.len() >= self.capacity
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.ids.iter()
    }
}

/// Unbounded favorite membership
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FavoriteSet {
    ids: BTreeSet<AssetId>,
}

impl FavoriteSet {
    pub fn from_ids(ids: impl IntoIterator<Item = AssetId>) -> Self {
        Self { ids: ids.into_iter().collect() }
    }

    /// Returns `true` when the id is a favorite afterwards.
    pub fn toggle(&mut self, id: AssetId) -> bool {
        if self.ids.remove(&id) {
            false
        } else {
            self.ids.insert(id);
            true
        }
    }

    pub fn contains(&self, id: &AssetId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.ids.iter()
    }
}
