/*!
 * Pool Invariant Tests
 * Property-based checks over random allocate/release/defragment sequences
 */

use heap_defrag::memory::{HandleId, MemoryManager};
use proptest::prelude::*;

const CAPACITY: usize = 64;

#[derive(Debug, Clone)]
enum Op {
    Allocate(usize),
    Release(usize),
    Defragment,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (1usize..=12).prop_map(Op::Allocate),
        3 => any::<usize>().prop_map(Op::Release),
        1 => Just(Op::Defragment),
    ]
}

/// Slot pool and handle table agree exactly
fn assert_consistent(manager: &MemoryManager) -> Result<(), TestCaseError> {
    let handles = manager.live_handles();
    let mut covered = vec![false; manager.capacity()];
    for (_, handle) in &handles {
        for slot in handle.offset..handle.end() {
            prop_assert!(!covered[slot], "slot {} covered twice", slot);
            covered[slot] = true;
        }
    }
    prop_assert_eq!(covered.as_slice(), manager.pool().occupancy());

    let live: usize = handles.iter().map(|(_, h)| h.size).sum();
    prop_assert_eq!(live, manager.pool().occupied());
    Ok(())
}

fn apply(manager: &mut MemoryManager, live: &mut Vec<HandleId>, op: &Op) {
    match op {
        Op::Allocate(size) => {
            if let Ok(id) = manager.allocate(*size) {
                live.push(id);
            }
        }
        Op::Release(pick) => {
            if !live.is_empty() {
                let id = live.swap_remove(pick % live.len());
                assert!(manager.release(id));
            }
        }
        Op::Defragment => {
            manager.defragment();
        }
    }
}

proptest! {
    /// No two live handles overlap and occupancy equals the sum of live sizes
    #[test]
    fn non_overlap_holds_for_all_sequences(ops in prop::collection::vec(op(), 0..80)) {
        let mut manager = MemoryManager::with_capacity(CAPACITY);
        let mut live = Vec::new();
        for op in &ops {
            apply(&mut manager, &mut live, op);
            assert_consistent(&manager)?;
        }
        prop_assert_eq!(live.len(), manager.stats().live_handles);
    }

    /// Defragmentation keeps sizes, order and ids while removing every gap
    #[test]
    fn defragment_packs_without_loss(ops in prop::collection::vec(op(), 0..80)) {
        let mut manager = MemoryManager::with_capacity(CAPACITY);
        let mut live = Vec::new();
        for op in &ops {
            apply(&mut manager, &mut live, op);
        }

        let before = manager.live_handles();
        let occupied = manager.pool().occupied();
        manager.defragment();
        let after = manager.live_handles();

        let ids_before: Vec<_> = before.iter().map(|(id, _)| *id).collect();
        let ids_after: Vec<_> = after.iter().map(|(id, _)| *id).collect();
        prop_assert_eq!(ids_before, ids_after);

        let sizes_before: Vec<_> = before.iter().map(|(_, h)| h.size).collect();
        let sizes_after: Vec<_> = after.iter().map(|(_, h)| h.size).collect();
        prop_assert_eq!(sizes_before, sizes_after);

        prop_assert_eq!(manager.pool().occupied(), occupied);
        let mut cursor = 0;
        for (_, handle) in &after {
            prop_assert_eq!(handle.offset, cursor);
            cursor += handle.size;
        }
        prop_assert!(manager.pool().occupancy()[..occupied].iter().all(|t| *t));
        prop_assert!(manager.pool().occupancy()[occupied..].iter().all(|t| !*t));
        assert_consistent(&manager)?;
    }

    /// Allocating then releasing restores the exact occupancy pattern
    #[test]
    fn allocate_release_round_trip(
        ops in prop::collection::vec(op(), 0..60),
        size in 1usize..=16,
    ) {
        let mut manager = MemoryManager::with_capacity(CAPACITY);
        let mut live = Vec::new();
        for op in &ops {
            apply(&mut manager, &mut live, op);
        }

        let before = manager.pool().occupancy().to_vec();
        if let Ok(id) = manager.allocate(size) {
            prop_assert!(manager.release(id));
        }
        prop_assert_eq!(manager.pool().occupancy(), before.as_slice());
    }

    /// Same occupancy and same request always land on the same offset
    #[test]
    fn first_fit_is_deterministic(
        ops in prop::collection::vec(op(), 0..60),
        size in 1usize..=16,
    ) {
        let mut manager = MemoryManager::with_capacity(CAPACITY);
        let mut live = Vec::new();
        for op in &ops {
            apply(&mut manager, &mut live, op);
        }
        let mut twin = manager.clone();
        let snapshot = manager.pool().clone();

        let offset = manager.allocate(size).ok().and_then(|id| manager.offset_of(id));
        let twin_offset = twin.allocate(size).ok().and_then(|id| twin.offset_of(id));
        prop_assert_eq!(offset, twin_offset);

        if let Some(offset) = offset {
            prop_assert!(snapshot.is_range_free(offset, size));
            // Nothing lower would have fit
            for start in 0..offset {
                prop_assert!(!snapshot.is_range_free(start, size));
            }
        }
    }
}
