/// Initial slot count once the first element arrives
const INITIAL_CAPACITY: usize = 4;

/// Binary min-heap of `(priority, payload)` pairs
///
/// Used to build Huffman trees. Equal priorities come out in whatever order
/// the heap structure leaves them, so callers that need reproducible output
/// fold a tie-break into `P`.
#[derive(Debug, Clone)]
pub struct PriorityQueue<P, T> {
    slots: Vec<(P, T)>,
}

impl<P: Ord, T> PriorityQueue<P, T> {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { slots: Vec::with_capacity(capacity) }
    }

    /// Insert in O(log n), sifting up while the parent's priority is larger
    pub fn push(&mut self, priority: P, payload: T) {
        if self.slots.len() == self.slots.capacity() {
            // Double the backing storage
            let extra = self.slots.capacity().max(INITIAL_CAPACITY);
            self.slots.reserve_exact(extra);
        }

        self.slots.push((priority, payload));
        let mut i = self.slots.len() - 1;
        while i > 0 {
            let parent = (i - 1) / 2;
            if self.slots[parent].0 <= self.slots[i].0 {
                break;
            }
            self.slots.swap(parent, i);
            i = parent;
        }
    }

    /// Remove and return the minimum-priority payload in O(log n)
    pub fn pop(&mut self) -> Option<T> {
        self.pop_entry().map(|(_, payload)| payload)
    }

    /// Like `pop`, but also returns the priority
    pub fn pop_entry(&mut self) -> Option<(P, T)> {
        if self.slots.is_empty() {
            return None;
        }

        // Move the last element to the root, then sift down
        let top = self.slots.swap_remove(0);
        let len = self.slots.len();
        let mut i = 0;
        loop {
            let left = 2 * i + 1;
            let right = left + 1;
            let mut smallest = i;
            if left < len && self.slots[left].0 < self.slots[smallest].0 {
                smallest = left;
            }
            if right < len && self.slots[right].0 < self.slots[smallest].0 {
                smallest = right;
            }
            if smallest == i {
                break;
            }
            self.slots.swap(i, smallest);
            i = smallest;
        }

        Some(top)
    }

    /// Priority of the current minimum, if any
    pub fn peek_priority(&self) -> Option<&P> {
        self.slots.first().map(|(p, _)| p)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<P: Ord, T> Default for PriorityQueue<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_empty() {
        let mut heap: PriorityQueue<u32, char> = PriorityQueue::new();
        assert!(heap.pop().is_none());
        assert!(heap.peek_priority().is_none());
    }

    #[test]
    fn test_pops_in_priority_order() {
        let mut heap = PriorityQueue::new();
        for (p, c) in [(5, 'e'), (1, 'a'), (4, 'd'), (2, 'b'), (3, 'c')] {
            heap.push(p, c);
        }
        assert_eq!(heap.len(), 5);
        assert_eq!(heap.peek_priority(), Some(&1));

        let order: Vec<char> = std::iter::from_fn(|| heap.pop()).collect();
        assert_eq!(order, vec!['a', 'b', 'c', 'd', 'e']);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_interleaved_push_pop_non_decreasing() {
        let mut heap = PriorityQueue::new();
        let mut state = 0x2545_F491_u32;
        let mut popped = Vec::new();
        let mut last_popped = 0u32;

        for round in 0..500 {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            // Keep pushes at or above the last pop so the sequence stays monotone
            heap.push(last_popped + state % 1000, round);
            if round % 3 == 0 {
                let (p, _) = heap.pop_entry().unwrap();
                popped.push(p);
                last_popped = p;
            }
        }
        while let Some((p, _)) = heap.pop_entry() {
            popped.push(p);
        }

        assert!(popped.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_storage_grows_by_doubling() {
        let mut heap = PriorityQueue::new();
        heap.push(1, ());
        let first = heap.slots.capacity();
        assert!(first >= INITIAL_CAPACITY);
        for i in 0..first {
            heap.push(i, ());
        }
        assert!(heap.slots.capacity() >= first * 2);
    }

    #[test]
    fn test_tuple_priority_breaks_ties() {
        let mut heap = PriorityQueue::new();
        heap.push((3, 2u16), 'z');
        heap.push((3, 0u16), 'x');
        heap.push((3, 1u16), 'y');
        assert_eq!(heap.pop(), Some('x'));
        assert_eq!(heap.pop(), Some('y'));
        assert_eq!(heap.pop(), Some('z'));
    }
}
