use core::mem;

use crate::alloc::RegionHandle;

/// Number of element slots per block.
pub const BLOCK_LEN: usize = 16;

/// Minimum number of entries in the block map.
pub(crate) const MAP_MIN: usize = 16;

/// The map grows by whole multiples of this many entries.
pub(crate) const MAP_GROW_STEP: usize = 8;

/// One fixed-capacity element block plus its allocator ticket.
pub(crate) struct Block<T> {
    pub(crate) slots: Box<[T]>,
    pub(crate) region: RegionHandle,
}

/// Indirection array of block handles.
///
/// A contiguous run `[first, first + live)` holds blocks; every other entry
/// is `None` and acts as headroom for growth at that end. Element storage is
/// never touched here; the map only moves handles.
pub(crate) struct BlockMap<T> {
    entries: Vec<Option<Block<T>>>,
    first: usize,
    live: usize,
    region: RegionHandle,
}

/// Map capacity able to hold `live` blocks: the fixed minimum, grown in
/// fixed-size steps. Map entries are cheap handles, so growth is never
/// proportional to element count.
pub(crate) fn capacity_for(live: usize) -> usize {
    if live > MAP_MIN {
        let over = live - MAP_MIN;
        MAP_MIN + (over + MAP_GROW_STEP - 1) / MAP_GROW_STEP * MAP_GROW_STEP
    } else {
        MAP_MIN
    }
}

/// Live block count for `n` elements: the blocks the elements occupy plus
/// one spare past a partial tail block, or two spares when `n` lands exactly
/// on a block boundary, so both ends start with slack.
pub(crate) fn live_for(n: usize) -> usize {
    let whole = (n + BLOCK_LEN - 1) / BLOCK_LEN;
    if n % BLOCK_LEN != 0 {
        whole + 1
    } else {
        whole + 2
    }
}

impl<T> BlockMap<T> {
    /// An all-headroom map of `cap` entries with an empty live run centered
    /// for `live` incoming blocks. The caller installs the blocks.
    pub(crate) fn new(cap: usize, live: usize, region: RegionHandle) -> Self {
        debug_assert!(live <= cap);
        let mut entries = Vec::with_capacity(cap);
        entries.resize_with(cap, || None);
        Self {
            entries,
            first: (cap - live) / 2,
            live: 0,
            region,
        }
    }

    pub(crate) fn cap(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn first(&self) -> usize {
        self.first
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn region(&self) -> RegionHandle {
        self.region
    }

    /// Unused entries before the live run.
    pub(crate) fn room_front(&self) -> usize {
        self.first
    }

    /// Unused entries after the live run.
    pub(crate) fn room_back(&self) -> usize {
        self.cap() - (self.first + self.live)
    }

    /// Unused entries on both sides combined.
    pub(crate) fn room_total(&self) -> usize {
        self.cap() - self.live
    }

    pub(crate) fn block(&self, index: usize) -> &Block<T> {
        self.entries[index].as_ref().unwrap()
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> &mut Block<T> {
        self.entries[index].as_mut().unwrap()
    }

    /// Move the live handle run so it starts at `new_first`. A bulk move of
    /// handles in an order that never clobbers a not-yet-moved entry.
    pub(crate) fn shift_live(&mut self, new_first: usize) {
        debug_assert!(new_first + self.live <= self.cap());
        if new_first < self.first {
            for i in 0..self.live {
                self.entries[new_first + i] = self.entries[self.first + i].take();
            }
        } else if new_first > self.first {
            for i in (0..self.live).rev() {
                self.entries[new_first + i] = self.entries[self.first + i].take();
            }
        }
        self.first = new_first;
    }

    /// Replace the entry array with one of `new_cap` entries, moving the
    /// live run to start at `new_first`. Returns the old array's allocator
    /// ticket and capacity so the caller can release it.
    pub(crate) fn regrow(
        &mut self,
        new_cap: usize,
        new_first: usize,
        region: RegionHandle,
    ) -> (RegionHandle, usize) {
        debug_assert!(new_first + self.live <= new_cap);
        let mut entries = Vec::with_capacity(new_cap);
        entries.resize_with(new_cap, || None);
        for i in 0..self.live {
            entries[new_first + i] = self.entries[self.first + i].take();
        }
        let old_cap = self.entries.len();
        self.entries = entries;
        self.first = new_first;
        let old_region = mem::replace(&mut self.region, region);
        (old_region, old_cap)
    }

    /// Link freshly allocated blocks into the entries after the live run.
    pub(crate) fn install_back(&mut self, blocks: Vec<Block<T>>) {
        debug_assert!(blocks.len() <= self.room_back());
        for block in blocks {
            self.entries[self.first + self.live] = Some(block);
            self.live += 1;
        }
    }

    /// Link freshly allocated blocks into the entries before the live run.
    pub(crate) fn install_front(&mut self, blocks: Vec<Block<T>>) {
        debug_assert!(blocks.len() <= self.room_front());
        for block in blocks {
            self.first -= 1;
            self.entries[self.first] = Some(block);
            self.live += 1;
        }
    }

    /// Unlink the last `k` live blocks, returning them for release.
    pub(crate) fn release_back(&mut self, k: usize) -> Vec<Block<T>> {
        debug_assert!(k <= self.live);
        let mut out = Vec::with_capacity(k);
        for _ in 0..k {
            self.live -= 1;
            out.push(self.entries[self.first + self.live].take().unwrap());
        }
        out
    }

    /// Unlink the first `k` live blocks, returning them for release.
    pub(crate) fn release_front(&mut self, k: usize) -> Vec<Block<T>> {
        debug_assert!(k <= self.live);
        let mut out = Vec::with_capacity(k);
        for _ in 0..k {
            out.push(self.entries[self.first].take().unwrap());
            self.first += 1;
            self.live -= 1;
        }
        out
    }

    /// Unlink every live block. Used on teardown.
    pub(crate) fn release_all(&mut self) -> Vec<Block<T>> {
        let live = self.live;
        self.release_back(live)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::alloc::{BlockAllocator, HeapAlloc};

    fn mk_block(alloc: &mut HeapAlloc, tag: u32) -> Block<u32> {
        Block {
            slots: vec![tag; BLOCK_LEN].into_boxed_slice(),
            region: alloc.allocate(4, BLOCK_LEN).unwrap(),
        }
    }

    #[test]
    fn capacity_rounds_up_in_steps() {
        assert_eq!(capacity_for(0), 16);
        assert_eq!(capacity_for(16), 16);
        assert_eq!(capacity_for(17), 24);
        assert_eq!(capacity_for(24), 24);
        assert_eq!(capacity_for(25), 32);
    }

    #[test]
    fn live_count_keeps_spares() {
        assert_eq!(live_for(0), 2);
        assert_eq!(live_for(1), 2);
        assert_eq!(live_for(15), 2);
        assert_eq!(live_for(16), 3);
        assert_eq!(live_for(17), 3);
        assert_eq!(live_for(32), 4);
    }

    #[test]
    fn live_run_is_centered() {
        let mut alloc = HeapAlloc::new();
        let region = alloc.allocate(8, 16).unwrap();
        let mut map = BlockMap::new(16, 2, region);
        map.install_back(vec![mk_block(&mut alloc, 0), mk_block(&mut alloc, 1)]);
        assert_eq!(map.first(), 7);
        assert_eq!(map.live(), 2);
        assert_eq!(map.room_front(), 7);
        assert_eq!(map.room_back(), 7);
    }

    #[test]
    fn shift_preserves_order_both_directions() {
        let mut alloc = HeapAlloc::new();
        let region = alloc.allocate(8, 16).unwrap();
        let mut map = BlockMap::new(16, 3, region);
        map.install_back((0..3).map(|t| mk_block(&mut alloc, t)).collect());
        let first = map.first();

        map.shift_live(1);
        assert_eq!(map.first(), 1);
        for (i, tag) in (1..4).zip(0u32..) {
            assert_eq!(map.block(i).slots[0], tag);
        }

        map.shift_live(first + 2);
        for (i, tag) in (first + 2..first + 5).zip(0u32..) {
            assert_eq!(map.block(i).slots[0], tag);
        }
    }

    #[test]
    fn regrow_recenters_and_returns_old_region() {
        let mut alloc = HeapAlloc::new();
        let old_region = alloc.allocate(8, 16).unwrap();
        let mut map = BlockMap::new(16, 4, old_region);
        map.install_back((0..4).map(|t| mk_block(&mut alloc, t)).collect());

        let new_region = alloc.allocate(8, 24).unwrap();
        let (released, old_cap) = map.regrow(24, 10, new_region);
        assert_eq!(released, old_region);
        assert_eq!(old_cap, 16);
        assert_eq!(map.cap(), 24);
        assert_eq!(map.first(), 10);
        for (i, tag) in (10..14).zip(0u32..) {
            assert_eq!(map.block(i).slots[0], tag);
        }
    }
}
