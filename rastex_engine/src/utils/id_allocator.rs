use rustc_hash::FxHashSet;

/// Allocates and recycles texture identifiers.
///
/// Identifiers start at 1; 0 is never handed out so it can stand for
/// "no texture bound", as graphics APIs conventionally do. Freed identifiers
/// are recycled LIFO. Freeing an identifier that is not live is rejected
/// instead of corrupting the free list.
///
/// # Example
///
/// ```ignore
/// let mut ids = IdAllocator::new();
/// let a = ids.alloc();   // 1
/// let b = ids.alloc();   // 2
/// ids.free(a);           // 1 is now available
/// let c = ids.alloc();   // 1 (recycled)
/// ```
#[derive(Debug)]
pub struct IdAllocator {
    free_list: Vec<u32>,
    live: FxHashSet<u32>,
    next_id: u32,
}

impl IdAllocator {
    /// Create a new empty allocator
    pub fn new() -> Self {
        Self {
            free_list: Vec::new(),
            live: FxHashSet::default(),
            next_id: 1,
        }
    }

    /// Allocate the next available identifier
    ///
    /// Returns `None` once the `u32` space is exhausted and nothing is free.
    pub fn alloc(&mut self) -> Option<u32> {
        let id = match self.free_list.pop() {
            Some(id) => id,
            None => {
                let id = self.next_id;
                self.next_id = self.next_id.checked_add(1)?;
                id
            }
        };
        self.live.insert(id);
        Some(id)
    }

    /// Return an identifier to the pool. Returns false if it was not live.
    pub fn free(&mut self, id: u32) -> bool {
        if !self.live.remove(&id) {
            return false;
        }
        self.free_list.push(id);
        true
    }

    /// Whether `id` is currently allocated
    pub fn is_live(&self, id: u32) -> bool {
        self.live.contains(&id)
    }

    /// Number of currently allocated identifiers
    pub fn len(&self) -> usize {
        self.live.len()
    }

    /// Whether no identifiers are currently allocated
    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[path = "id_allocator_tests.rs"]
mod tests;
