/// Ticket for one region handed out by a [`BlockAllocator`].
///
/// The deque stores the ticket next to the storage it accounts for and
/// returns it on release. Tickets are opaque to the container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionHandle(u64);

/// Accounting interface for block and map storage.
///
/// Arena policy lives behind this trait; the container only asks for
/// permission to hold `count` items of `item_size` bytes and reports when it
/// lets a region go. A denied allocation surfaces as
/// [`Error::Exhausted`](crate::error::Error::Exhausted) to the caller, with
/// the deque left in its prior state.
pub trait BlockAllocator {
    /// Account for a region of `count` items of `item_size` bytes each.
    /// Returns `None` when the arena is exhausted.
    fn allocate(&mut self, item_size: usize, count: usize) -> Option<RegionHandle>;

    /// Return a region previously obtained from [`allocate`](Self::allocate).
    fn deallocate(&mut self, handle: RegionHandle, item_size: usize, count: usize);
}

/// Unbounded allocator backed by the global heap.
///
/// Never fails; tracks outstanding bytes so tests can assert that every
/// region is eventually returned.
#[derive(Debug, Default)]
pub struct HeapAlloc {
    outstanding: usize,
    next: u64,
}

impl HeapAlloc {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes currently accounted for and not yet released.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }
}

impl BlockAllocator for HeapAlloc {
    fn allocate(&mut self, item_size: usize, count: usize) -> Option<RegionHandle> {
        self.outstanding += item_size * count;
        let handle = RegionHandle(self.next);
        self.next += 1;
        Some(handle)
    }

    fn deallocate(&mut self, _handle: RegionHandle, item_size: usize, count: usize) {
        self.outstanding -= item_size * count;
    }
}

/// Allocator with a fixed byte budget.
///
/// Denies any request that would push usage past the budget. The test suite
/// uses it to exercise the exhaustion paths deterministically.
#[derive(Debug)]
pub struct QuotaAlloc {
    budget: usize,
    used: usize,
    next: u64,
}

impl QuotaAlloc {
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            used: 0,
            next: 0,
        }
    }

    /// Bytes currently in use.
    pub fn used(&self) -> usize {
        self.used
    }
}

impl BlockAllocator for QuotaAlloc {
    fn allocate(&mut self, item_size: usize, count: usize) -> Option<RegionHandle> {
        let need = item_size * count;
        if self.used + need > self.budget {
            return None;
        }
        self.used += need;
        let handle = RegionHandle(self.next);
        self.next += 1;
        Some(handle)
    }

    fn deallocate(&mut self, _handle: RegionHandle, item_size: usize, count: usize) {
        self.used -= item_size * count;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn heap_alloc_balances_to_zero() {
        let mut a = HeapAlloc::new();
        let h1 = a.allocate(4, 16).unwrap();
        let h2 = a.allocate(8, 2).unwrap();
        assert_eq!(a.outstanding(), 4 * 16 + 8 * 2);
        a.deallocate(h1, 4, 16);
        a.deallocate(h2, 8, 2);
        assert_eq!(a.outstanding(), 0);
    }

    #[test]
    fn quota_denies_past_budget() {
        let mut a = QuotaAlloc::new(100);
        let h = a.allocate(10, 9).unwrap();
        assert_eq!(a.allocate(10, 2), None);
        a.deallocate(h, 10, 9);
        assert!(a.allocate(10, 10).is_some());
    }
}
