use super::*;

// ============================================================================
// Basic allocation tests
// ============================================================================

#[test]
fn test_ids_start_at_one() {
    let mut ids = IdAllocator::new();
    assert_eq!(ids.alloc(), Some(1));
    assert_eq!(ids.alloc(), Some(2));
    assert_eq!(ids.alloc(), Some(3));
}

#[test]
fn test_new_is_empty() {
    let ids = IdAllocator::default();
    assert!(ids.is_empty());
    assert_eq!(ids.len(), 0);
    assert!(!ids.is_live(0));
}

// ============================================================================
// Free and recycle tests
// ============================================================================

#[test]
fn test_free_and_recycle_lifo() {
    let mut ids = IdAllocator::new();
    let a = ids.alloc().unwrap(); // 1
    let _b = ids.alloc().unwrap(); // 2
    let c = ids.alloc().unwrap(); // 3
    assert!(ids.free(a));
    assert!(ids.free(c));

    // Free list is a stack: last freed = first recycled
    assert_eq!(ids.alloc(), Some(3));
    assert_eq!(ids.alloc(), Some(1));
    assert_eq!(ids.alloc(), Some(4));
}

#[test]
fn test_double_free_is_rejected() {
    let mut ids = IdAllocator::new();
    let a = ids.alloc().unwrap();
    assert!(ids.free(a));
    assert!(!ids.free(a));

    // Only one copy of `a` went back to the pool
    assert_eq!(ids.alloc(), Some(a));
    assert_eq!(ids.alloc(), Some(2));
}

#[test]
fn test_free_unknown_id_is_rejected() {
    let mut ids = IdAllocator::new();
    assert!(!ids.free(0));
    assert!(!ids.free(99));
    assert!(ids.is_empty());
}

#[test]
fn test_len_and_liveness_track_allocations() {
    let mut ids = IdAllocator::new();
    let a = ids.alloc().unwrap();
    let b = ids.alloc().unwrap();
    assert_eq!(ids.len(), 2);
    assert!(ids.is_live(a) && ids.is_live(b));

    ids.free(a);
    assert_eq!(ids.len(), 1);
    assert!(!ids.is_live(a));
    assert!(ids.is_live(b));
}

#[test]
fn test_live_ids_are_unique() {
    let mut ids = IdAllocator::new();
    let mut seen = std::collections::HashSet::new();
    for _ in 0..50 {
        seen.insert(ids.alloc().unwrap());
    }
    for id in 1..=10 {
        ids.free(id);
        seen.remove(&id);
    }
    for _ in 0..10 {
        let id = ids.alloc().unwrap();
        assert!(seen.insert(id), "duplicate id: {}", id);
    }
    assert_eq!(seen.len(), 50);
}

// ============================================================================
// Debug output
// ============================================================================

#[test]
fn test_debug_shows_free_list_and_next_id() {
    let mut ids = IdAllocator::new();
    let a = ids.alloc().unwrap();
    ids.alloc().unwrap();
    ids.free(a);
    let text = format!("{:?}", ids);
    assert!(text.starts_with("IdAllocator"), "{}", text);
    assert!(text.contains("free_list: [1]"), "{}", text);
    assert!(text.contains("next_id: 3"), "{}", text);
}
