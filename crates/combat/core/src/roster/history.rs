use crate::attack::AttackId;

/// Fixed-capacity FIFO of recent attack ids, oldest first.
///
/// When full, the oldest entry is evicted before the new one is stored.
#[derive(Clone, Debug)]
pub struct AttackHistory {
    buffer: Box<[AttackId]>,
    /// Index of the oldest entry.
    head: usize,
    len: usize,
}

impl AttackHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![AttackId::default(); capacity].into_boxed_slice(),
            head: 0,
            len: 0,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == self.capacity()
    }

    /// Appends `id`, returning the entry evicted to make room, if any.
    pub fn push(&mut self, id: AttackId) -> Option<AttackId> {
        let capacity = self.capacity();
        if capacity == 0 {
            return Some(id);
        }

        if self.is_full() {
            let evicted = self.buffer[self.head];
            self.buffer[self.head] = id;
            self.head = (self.head + 1) % capacity;
            return Some(evicted);
        }

        let tail = (self.head + self.len) % capacity;
        self.buffer[tail] = id;
        self.len += 1;
        None
    }

    /// Entry at logical position `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Option<AttackId> {
        if index >= self.len {
            return None;
        }
        Some(self.buffer[(self.head + index) % self.capacity()])
    }

    pub fn last(&self) -> Option<AttackId> {
        self.len.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Iterates from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = AttackId> + '_ {
        (0..self.len).map(move |index| self.buffer[(self.head + index) % self.capacity()])
    }

    pub fn clear(&mut self) {
        self.head = 0;
        self.len = 0;
    }
}
