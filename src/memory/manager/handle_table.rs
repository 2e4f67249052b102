/*!
 * Handle Table
 * Generational indirection from handle ids to live allocation records
 */

use super::super::types::{Handle, HandleId};
use crate::core::types::Slot;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
struct Entry {
    generation: u32,
    handle: Option<Handle>,
}

/// Handle table
///
/// Ids index into `entries`; freed entries are recycled with a bumped
/// generation. `by_offset` keeps live handles ordered by their current start
/// slot, which gives compaction a deterministic order.
#[derive(Debug, Clone, Default)]
pub(super) struct HandleTable {
    entries: Vec<Entry>,
    free_indices: Vec<u32>,
    by_offset: BTreeMap<Slot, u32>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.by_offset.len()
    }

    pub fn insert(&mut self, handle: Handle) -> HandleId {
        let index = match self.free_indices.pop() {
            Some(index) => {
                self.entries[index as usize].handle = Some(handle);
                index
            }
            None => {
                self.entries.push(Entry {
                    generation: 0,
                    handle: Some(handle),
                });
                (self.entries.len() - 1) as u32
            }
        };
        self.by_offset.insert(handle.offset, index);
        HandleId {
            index,
            generation: self.entries[index as usize].generation,
        }
    }

    fn entry(&self, id: HandleId) -> Option<&Entry> {
        self.entries
            .get(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
    }

    fn entry_mut(&mut self, id: HandleId) -> Option<&mut Entry> {
        self.entries
            .get_mut(id.index as usize)
            .filter(|entry| entry.generation == id.generation)
    }

    pub fn get(&self, id: HandleId) -> Option<&Handle> {
        self.entry(id).and_then(|entry| entry.handle.as_ref())
    }

    pub fn set_pinned(&mut self, id: HandleId, pinned: bool) -> bool {
        match self.entry_mut(id).and_then(|entry| entry.handle.as_mut()) {
            Some(handle) => {
                handle.pinned = pinned;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: HandleId) -> Option<Handle> {
        let entry = self.entry_mut(id)?;
        let handle = entry.handle.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.by_offset.remove(&handle.offset);
        self.free_indices.push(id.index);
        Some(handle)
    }

    /// Move a live handle to a new start slot
    ///
    /// The caller must ensure `offset` is not the start of another live handle.
    pub fn relocate(&mut self, id: HandleId, offset: Slot) -> bool {
        let Some(handle) = self.entry_mut(id).and_then(|entry| entry.handle.as_mut()) else {
            return false;
        };
        let old = std::mem::replace(&mut handle.offset, offset);
        self.by_offset.remove(&old);
        let displaced = self.by_offset.insert(offset, id.index);
        debug_assert!(displaced.is_none(), "relocation onto live handle at {}", offset);
        true
    }

    fn id_at(&self, index: u32) -> HandleId {
        HandleId {
            index,
            generation: self.entries[index as usize].generation,
        }
    }

    /// Id of the live handle starting exactly at `offset`
    pub fn at_offset(&self, offset: Slot) -> Option<HandleId> {
        self.by_offset.get(&offset).map(|index| self.id_at(*index))
    }

    /// Live handles in ascending offset order
    pub fn iter(&self) -> impl Iterator<Item = (HandleId, &Handle)> + '_ {
        self.by_offset.values().filter_map(move |index| {
            let entry = &self.entries[*index as usize];
            entry.handle.as_ref().map(|handle| (self.id_at(*index), handle))
        })
    }
}
