// src/common/ring.rs

/// Slots in the pending-message ring; one is always left free.
pub const PENDING_MESSAGE_SLOTS: usize = 16;

/// Fixed-capacity FIFO of SIM storage indices announced by `+CMTI`.
///
/// `head == tail` always means empty, so at most `N - 1` indices are held.
#[derive(Debug, Clone)]
pub struct MessageRing<const N: usize = PENDING_MESSAGE_SLOTS> {
    slots: [u8; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> Default for MessageRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> MessageRing<N> {
    pub const fn new() -> Self {
        MessageRing {
            slots: [0; N],
            head: 0,
            tail: 0,
        }
    }

    #[inline]
    const fn next(i: usize) -> usize {
        (i + 1) % N
    }

    /// Appends an index. Returns `false` (dropping it) when full.
    pub fn push(&mut self, index: u8) -> bool {
        let next = Self::next(self.tail);
        if next == self.head {
            return false;
        }
        self.slots[self.tail] = index;
        self.tail = next;
        true
    }

    /// Removes the oldest index.
    pub fn pop(&mut self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let index = self.slots[self.head];
        self.head = Self::next(self.head);
        Some(index)
    }

    /// The oldest index, left in place.
    pub fn peek(&self) -> Option<u8> {
        (!self.is_empty()).then(|| self.slots[self.head])
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    pub fn len(&self) -> usize {
        (self.tail + N - self.head) % N
    }

    pub fn clear(&mut self) {
        self.head = self.tail;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut ring: MessageRing = MessageRing::new();
        assert!(ring.is_empty());
        assert!(ring.push(3));
        assert!(ring.push(7));
        assert_eq!(ring.len(), 2);
        assert_eq!(ring.peek(), Some(3));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), Some(7));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_capacity_reserves_one_slot() {
        let mut ring = MessageRing::<4>::new();
        assert!(ring.push(1));
        assert!(ring.push(2));
        assert!(ring.push(3));
        assert!(!ring.push(4));
        assert_eq!(ring.len(), 3);
        assert_eq!(ring.pop(), Some(1));
        assert_eq!(ring.pop(), Some(2));
        assert_eq!(ring.pop(), Some(3));
        assert_eq!(ring.pop(), None);
    }

    #[test]
    fn test_wraparound() {
        let mut ring = MessageRing::<4>::new();
        for round in 0..10u8 {
            assert!(ring.push(round));
            assert!(ring.push(round + 100));
            assert_eq!(ring.pop(), Some(round));
            assert_eq!(ring.pop(), Some(round + 100));
            assert!(ring.is_empty());
        }
    }
}
