//! Fixed-capacity rolling history
//!
//! Backing store plus write index; once full, each push overwrites the oldest
//! entry. Iteration is always oldest-first.

/// Bounded ring buffer of `Copy` values
#[derive(Debug, Clone)]
pub struct RingBuffer<T: Copy> {
    data: Vec<T>,
    /// Index of the oldest entry once the buffer is full
    head: usize,
    capacity: usize,
}

impl<T: Copy> RingBuffer<T> {
    /// Create an empty buffer holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            head: 0,
            capacity,
        }
    }

    /// Append a value, evicting the oldest entry on overflow
    pub fn push(&mut self, value: T) {
        if self.capacity == 0 {
            return;
        }
        if self.data.len() < self.capacity {
            self.data.push(value);
        } else {
            self.data[self.head] = value;
            self.head = (self.head + 1) % self.capacity;
        }
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// True if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// True once `len() == capacity()`
    pub fn is_full(&self) -> bool {
        self.data.len() == self.capacity
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Remove all entries, keeping the capacity
    pub fn clear(&mut self) {
        self.data.clear();
        self.head = 0;
    }

    /// Entries from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        let (newer, older) = self.data.split_at(self.head);
        older.iter().chain(newer.iter()).copied()
    }

    /// Entries from oldest to newest, collected
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().collect()
    }
}
