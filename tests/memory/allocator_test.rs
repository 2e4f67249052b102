/*!
 * Allocator Tests
 * First-fit placement, failure modes and release semantics
 */

use heap_defrag::memory::{allocate_or_compact, Allocator, MemoryError, MemoryInfo, MemoryManager};
use pretty_assertions::assert_eq;

#[test]
fn test_first_fit_scenario() {
    let mut manager = MemoryManager::with_capacity(10);

    let first = manager.allocate(3).unwrap();
    assert_eq!(manager.offset_of(first), Some(0));

    let second = manager.allocate(4).unwrap();
    assert_eq!(manager.offset_of(second), Some(3));

    // Candidate starts for size 3 stop below offset 7
    assert!(matches!(
        manager.allocate(3),
        Err(MemoryError::AllocationFailed { requested: 3, free: 3, .. })
    ));

    assert!(manager.release(first));
    let again = manager.allocate(3).unwrap();
    assert_eq!(manager.offset_of(again), Some(0));
    assert_eq!(manager.handle_at(0), Some(again));
}

#[test]
fn test_allocation_fails_with_single_free_slot() {
    let mut manager = MemoryManager::with_capacity(10);
    let first = manager.allocate(3).unwrap();
    manager.allocate(4).unwrap();
    manager.allocate(2).unwrap();

    // Only slot 9 is free
    let result = manager.allocate(3);
    assert_eq!(
        result,
        Err(MemoryError::AllocationFailed {
            requested: 3,
            free: 1,
            largest_free_run: 1,
        })
    );

    manager.release(first);
    let reused = manager.allocate(3).unwrap();
    assert_eq!(manager.offset_of(reused), Some(0));
}

#[test]
fn test_first_fit_is_deterministic() {
    let build = || {
        let mut manager = MemoryManager::with_capacity(32);
        let ids: Vec<_> = (0..6).map(|i| manager.allocate(i + 1).unwrap()).collect();
        manager.release(ids[1]);
        manager.release(ids[3]);
        manager
    };

    let mut a = build();
    let mut b = build();
    let from_a = a.allocate(2).unwrap();
    let from_b = b.allocate(2).unwrap();
    assert_eq!(a.offset_of(from_a), b.offset_of(from_b));
    // Hole left by the size-2 handle at offset 1 is the lowest fit
    assert_eq!(a.offset_of(from_a), Some(1));
}

#[test]
fn test_round_trip_restores_occupancy() {
    let mut manager = MemoryManager::with_capacity(16);
    manager.allocate(5).unwrap();
    let middle = manager.allocate(2).unwrap();
    manager.allocate(4).unwrap();
    manager.release(middle);

    let before = manager.pool().occupancy().to_vec();
    let id = manager.allocate(3).unwrap();
    assert!(manager.release(id));
    assert_eq!(manager.pool().occupancy(), before.as_slice());
}

#[test]
fn test_release_of_unknown_handle_is_noop() {
    let mut manager = MemoryManager::with_capacity(16);
    let id = manager.allocate(4).unwrap();
    let other = manager.allocate(4).unwrap();
    assert!(manager.release(id));

    let used = manager.stats().used;
    assert!(!manager.release(id));
    assert_eq!(manager.stats().used, used);
    assert!(manager.is_valid(other));
}

#[test]
fn test_stale_id_does_not_alias_new_handle() {
    let mut manager = MemoryManager::with_capacity(16);
    let old = manager.allocate(4).unwrap();
    manager.release(old);
    let new = manager.allocate(4).unwrap();

    assert_ne!(old, new);
    assert!(!manager.is_valid(old));
    assert!(!manager.release(old));
    assert!(manager.is_valid(new));
}

#[test]
fn test_invalid_size_never_reserves() {
    let mut manager = MemoryManager::with_capacity(4);
    assert!(matches!(
        manager.allocate(5),
        Err(MemoryError::InvalidSizeRequest { requested: 5, capacity: 4 })
    ));
    assert!(matches!(
        manager.allocate(0),
        Err(MemoryError::InvalidSizeRequest { .. })
    ));
    assert_eq!(manager.stats().used, 0);
}

#[test]
fn test_allocate_or_compact_recovers_fragmented_space() {
    let mut manager = MemoryManager::with_capacity(11);
    let a = manager.allocate(3).unwrap();
    manager.allocate(2).unwrap();
    let c = manager.allocate(3).unwrap();
    let d = manager.allocate(2).unwrap();
    assert_eq!(manager.offset_of(d), Some(8));
    manager.release(a);
    manager.release(c);

    // Seven free slots split 3 + 3 + 1
    assert_eq!(manager.fragmentation().free_slots, 7);
    assert!(manager.allocate(5).is_err());
    let id = allocate_or_compact(&mut manager, 5).unwrap();
    assert_eq!(manager.offset_of(id), Some(4));
    assert_eq!(manager.offset_of(d), Some(2));
    assert_eq!(manager.fragmentation().free_slots, 2);

    // The remaining run starts at the last candidate offset for size 2,
    // so compacting again cannot help
    assert!(matches!(
        allocate_or_compact(&mut manager, 2),
        Err(MemoryError::AllocationFailed { free: 2, .. })
    ));
    // Not enough free slots at all: no compaction attempted
    assert!(matches!(
        allocate_or_compact(&mut manager, 3),
        Err(MemoryError::AllocationFailed { free: 2, .. })
    ));
}

#[test]
fn test_trait_object_usage() {
    fn churn(memory: &mut dyn Allocator) -> usize {
        let ids: Vec<_> = (0..4).filter_map(|_| memory.allocate(2).ok()).collect();
        ids.iter().filter(|id| memory.release(**id)).count()
    }

    let mut manager = MemoryManager::with_capacity(10);
    assert_eq!(churn(&mut manager), 4);
    assert_eq!(manager.pressure(), heap_defrag::memory::MemoryPressure::Low);
}

#[test]
fn test_stats_and_pressure() {
    let mut manager = MemoryManager::with_capacity(20);
    manager.allocate(10).unwrap();
    let gap = manager.allocate(2).unwrap();
    manager.allocate(5).unwrap();
    manager.release(gap);

    let stats = manager.stats();
    assert_eq!(stats.capacity, 20);
    assert_eq!(stats.used, 15);
    assert_eq!(stats.available, 5);
    assert_eq!(stats.live_handles, 2);
    assert_eq!(stats.free_runs, 2);
    assert_eq!(stats.largest_free_run, 3);
    assert_eq!(stats.memory_pressure(), heap_defrag::memory::MemoryPressure::Medium);
}
