//! Undo/redo history of immutable snapshots
//!
//! Snapshots live in an append-only arena indexed by a cursor. Recording a new
//! snapshot after an undo discards the redo tail. When a capacity is set the
//! oldest snapshots are evicted first; the current snapshot is never evicted.

#[derive(Debug, Clone)]
pub struct History<T> {
    snapshots: Vec<T>,
    cursor: usize,
    capacity: Option<usize>,
}

impl<T: Clone> History<T> {
    /// History holding `initial` as its only snapshot
    pub fn new(initial: T) -> Self {
        Self {
            snapshots: vec![initial],
            cursor: 0,
            capacity: None,
        }
    }

    /// Bound the number of retained snapshots (minimum 1)
    pub fn with_capacity_limit(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity.max(1));
        self.evict();
        self
    }

    pub fn current(&self) -> &T {
        &self.snapshots[self.cursor]
    }

    /// Record `next` as the new current snapshot.
    pub fn record(&mut self, next: T) {
        self.snapshots.truncate(self.cursor + 1);
        self.snapshots.push(next);
        self.cursor = self.snapshots.len() - 1;
        self.evict();
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.snapshots.len()
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    /// Number of retained snapshots
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Drop every snapshot but the current one.
    pub fn collapse(&mut self) {
        let current = self.snapshots.swap_remove(self.cursor);
        self.snapshots = vec![current];
        self.cursor = 0;
    }

    /// Iterate snapshots oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.snapshots.iter()
    }

    fn evict(&mut self) {
        if let Some(capacity) = self.capacity {
            if self.snapshots.len() > capacity {
                let excess = (self.snapshots.len() - capacity).min(self.cursor);
                self.snapshots.drain(..excess);
                self.cursor -= excess;
            }
        }
    }
}
