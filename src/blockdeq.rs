use core::fmt;
use core::mem;

use crate::alloc::{BlockAllocator, HeapAlloc};
use crate::cursor::{span, Cursor, DequeId};
use crate::desc::{ElementDesc, SlotRef};
use crate::error::Error;
use crate::map::{self, Block, BlockMap, BLOCK_LEN, MAP_GROW_STEP};

/// A double-ended queue over chunked storage.
///
/// Elements live in fixed-capacity blocks reached through a growable map of
/// block handles, so a full reallocation never moves element storage; only
/// the cheap handle array is ever copied. Push and pop at either end are
/// amortized O(1), indexed access is O(1), and insertion in the middle
/// shifts whichever side is shorter.
///
/// All element handling goes through an [`ElementDesc`] fixed at
/// construction, and all storage accounting through a [`BlockAllocator`].
/// Operations that cannot satisfy their contract return [`Error`] instead of
/// panicking; a denied allocation leaves the deque exactly as it was.
pub struct BlockDeque<D: ElementDesc, A: BlockAllocator = HeapAlloc> {
    map: BlockMap<D::Slot>,
    /// Global slot offset of element 0 from the start of the live block
    /// range, `0..=BLOCK_LEN`. `BLOCK_LEN` means the whole first live block
    /// is headroom.
    front: usize,
    len: usize,
    desc: D,
    alloc: A,
    id: DequeId,
    version: u64,
}

impl<D: ElementDesc> BlockDeque<D, HeapAlloc> {
    /// An empty deque backed by the global heap.
    pub fn new(desc: D) -> Result<Self, Error> {
        Self::new_in(desc, HeapAlloc::new())
    }

    /// A deque of `len` default-initialized elements.
    pub fn with_len(desc: D, len: usize) -> Result<Self, Error> {
        Self::with_len_in(desc, len, HeapAlloc::new())
    }
}

impl<D: ElementDesc, A: BlockAllocator> BlockDeque<D, A> {
    /// An empty deque drawing storage from `alloc`.
    pub fn new_in(desc: D, alloc: A) -> Result<Self, Error> {
        Self::with_len_in(desc, 0, alloc)
    }

    /// A deque of `len` default-initialized elements drawing storage from
    /// `alloc`. Fails with [`Error::Exhausted`] when the allocator denies
    /// the map or any block; nothing is leaked on failure.
    pub fn with_len_in(desc: D, len: usize, mut alloc: A) -> Result<Self, Error> {
        let live = map::live_for(len);
        let cap = map::capacity_for(live);
        let map_region = alloc
            .allocate(mem::size_of::<usize>(), cap)
            .ok_or(Error::Exhausted)?;
        let slot_size = desc.slot_size();
        let mut regions = Vec::with_capacity(live);
        for _ in 0..live {
            match alloc.allocate(slot_size, BLOCK_LEN) {
                Some(region) => regions.push(region),
                None => {
                    for region in regions {
                        alloc.deallocate(region, slot_size, BLOCK_LEN);
                    }
                    alloc.deallocate(map_region, mem::size_of::<usize>(), cap);
                    return Err(Error::Exhausted);
                }
            }
        }
        let mut map = BlockMap::new(cap, live, map_region);
        let blocks = regions
            .into_iter()
            .map(|region| Block {
                slots: (0..BLOCK_LEN).map(|_| desc.init()).collect(),
                region,
            })
            .collect();
        map.install_back(blocks);
        Ok(Self {
            map,
            front: BLOCK_LEN,
            len,
            desc,
            alloc,
            id: DequeId::fresh(),
            version: 0,
        })
    }

    /// A new deque holding deep copies of `[b, e)` from this one.
    pub fn from_range(&self, b: Cursor, e: Cursor) -> Result<Self, Error>
    where
        D: Clone,
        A: Default,
    {
        let bi = self.locate(b)?;
        let ei = self.locate(e)?;
        if bi > ei {
            return Err(Error::Precondition);
        }
        let mut out = Self::with_len_in(self.desc.clone(), ei - bi, A::default())?;
        for (j, i) in (bi..ei).enumerate() {
            out.desc.copy(
                Self::slot_at_mut(&mut out.map, out.front, j),
                self.slot(i),
            );
        }
        Ok(out)
    }

    /// A deep copy of the whole deque.
    pub fn duplicate(&self) -> Result<Self, Error>
    where
        D: Clone,
        A: Default,
    {
        self.from_range(self.begin(), self.end())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Theoretical element ceiling for this descriptor's slot size.
    pub fn max_size(&self) -> usize {
        usize::MAX / self.desc.slot_size().max(1)
    }

    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Checked element access.
    pub fn at(&self, index: usize) -> Result<SlotRef<'_, D::Slot>, Error> {
        if index >= self.len {
            return Err(Error::Precondition);
        }
        Ok(self.desc.view(self.slot(index)))
    }

    pub fn get(&self, index: usize) -> Option<SlotRef<'_, D::Slot>> {
        self.at(index).ok()
    }

    /// Overwrite the element at `index` with a deep copy of `value`.
    pub fn set(&mut self, index: usize, value: &D::Slot) -> Result<(), Error> {
        if index >= self.len {
            return Err(Error::Precondition);
        }
        self.desc
            .copy(Self::slot_at_mut(&mut self.map, self.front, index), value);
        Ok(())
    }

    pub fn front(&self) -> Option<SlotRef<'_, D::Slot>> {
        self.get(0)
    }

    pub fn back(&self) -> Option<SlotRef<'_, D::Slot>> {
        self.len.checked_sub(1).and_then(|i| self.get(i))
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &D::Slot> + ExactSizeIterator + '_ {
        (0..self.len).map(move |i| self.slot(i))
    }

    pub fn push_back(&mut self, value: &D::Slot) -> Result<(), Error> {
        let old_len = self.expand_at_end(1)?;
        self.fill(old_len, old_len + 1, value);
        Ok(())
    }

    pub fn push_front(&mut self, value: &D::Slot) -> Result<(), Error> {
        self.expand_at_begin(1)?;
        self.fill(0, 1, value);
        Ok(())
    }

    pub fn pop_back(&mut self) -> Result<(), Error> {
        if self.len == 0 {
            return Err(Error::Precondition);
        }
        self.shrink_at_end(1);
        Ok(())
    }

    pub fn pop_front(&mut self) -> Result<(), Error> {
        if self.len == 0 {
            return Err(Error::Precondition);
        }
        self.shrink_at_begin(1);
        Ok(())
    }

    /// Insert a deep copy of `value` before `pos`; returns a cursor to it.
    pub fn insert(&mut self, pos: Cursor, value: &D::Slot) -> Result<Cursor, Error> {
        self.insert_n(pos, 1, value)
    }

    /// Insert `n` deep copies of `value` before `pos`; returns a cursor to
    /// the first inserted element. `n == 0` changes nothing and returns
    /// `pos` itself.
    pub fn insert_n(&mut self, pos: Cursor, n: usize, value: &D::Slot) -> Result<Cursor, Error> {
        let at = self.locate(pos)?;
        if n == 0 {
            return Ok(pos);
        }
        self.open_gap(at, n)?;
        self.fill(at, at + n, value);
        Ok(self.cursor_at(at))
    }

    /// Insert deep copies of `src`'s elements in `[b, e)` before `pos`.
    pub fn insert_range(
        &mut self,
        pos: Cursor,
        src: &Self,
        b: Cursor,
        e: Cursor,
    ) -> Result<Cursor, Error> {
        if !self.same_type(src) {
            return Err(Error::TypeMismatch);
        }
        let at = self.locate(pos)?;
        let bi = src.locate(b)?;
        let ei = src.locate(e)?;
        if bi > ei {
            return Err(Error::Precondition);
        }
        let n = ei - bi;
        if n == 0 {
            return Ok(pos);
        }
        let mut staged = Vec::with_capacity(n);
        for i in bi..ei {
            let mut slot = self.desc.init();
            self.desc.copy(&mut slot, src.slot(i));
            staged.push(slot);
        }
        self.open_gap(at, n)?;
        for (offset, slot) in staged.into_iter().enumerate() {
            *Self::slot_at_mut(&mut self.map, self.front, at + offset) = slot;
        }
        Ok(self.cursor_at(at))
    }

    /// Remove the element at `pos`; returns a cursor to its successor (or
    /// `end` when the last element was removed).
    pub fn erase(&mut self, pos: Cursor) -> Result<Cursor, Error> {
        let at = self.locate(pos)?;
        if at >= self.len {
            return Err(Error::Precondition);
        }
        if at == 0 {
            self.shrink_at_begin(1);
        } else {
            self.move_to_front(at + 1, self.len, 1);
            self.shrink_at_end(1);
        }
        Ok(self.cursor_at(at.min(self.len)))
    }

    /// Remove the elements in `[b, e)`; returns a cursor to the position
    /// where the range started.
    pub fn erase_range(&mut self, b: Cursor, e: Cursor) -> Result<Cursor, Error> {
        let bi = self.locate(b)?;
        let ei = self.locate(e)?;
        if bi > ei {
            return Err(Error::Precondition);
        }
        let n = ei - bi;
        if n == 0 {
            return Ok(b);
        }
        self.move_to_front(ei, self.len, n);
        self.shrink_at_end(n);
        Ok(self.cursor_at(bi))
    }

    pub fn clear(&mut self) {
        let len = self.len;
        self.shrink_at_end(len);
    }

    /// Grow to `new_len` with default-initialized elements, or shrink by
    /// destroying the trailing ones.
    pub fn resize(&mut self, new_len: usize) -> Result<(), Error> {
        if new_len < self.len {
            self.shrink_at_end(self.len - new_len);
        } else if new_len > self.len {
            self.expand_at_end(new_len - self.len)?;
        }
        Ok(())
    }

    /// Like [`resize`](Self::resize) but new elements are copies of `value`.
    pub fn resize_with(&mut self, new_len: usize, value: &D::Slot) -> Result<(), Error> {
        let old_len = self.len;
        self.resize(new_len)?;
        if new_len > old_len {
            self.fill(old_len, new_len, value);
        }
        Ok(())
    }

    /// Replace this deque's contents with deep copies of `other`'s.
    pub fn assign(&mut self, other: &Self) -> Result<(), Error> {
        if !self.same_type(other) {
            return Err(Error::TypeMismatch);
        }
        self.resize(other.len)?;
        for i in 0..self.len {
            self.desc.copy(
                Self::slot_at_mut(&mut self.map, self.front, i),
                Self::slot_at(&other.map, other.front, i),
            );
        }
        Ok(())
    }

    /// Replace this deque's contents with deep copies of `src`'s `[b, e)`.
    pub fn assign_range(&mut self, src: &Self, b: Cursor, e: Cursor) -> Result<(), Error> {
        if !self.same_type(src) {
            return Err(Error::TypeMismatch);
        }
        let bi = src.locate(b)?;
        let ei = src.locate(e)?;
        if bi > ei {
            return Err(Error::Precondition);
        }
        self.resize(ei - bi)?;
        for i in 0..self.len {
            self.desc.copy(
                Self::slot_at_mut(&mut self.map, self.front, i),
                Self::slot_at(&src.map, src.front, bi + i),
            );
        }
        Ok(())
    }

    /// Replace this deque's contents with `n` copies of `value`.
    pub fn assign_fill(&mut self, n: usize, value: &D::Slot) -> Result<(), Error> {
        self.resize(n)?;
        self.fill(0, n, value);
        Ok(())
    }

    /// Exchange the entire contents of two same-typed deques in O(1).
    ///
    /// Identity and version travel with the elements, so cursors minted
    /// before the swap keep working against whichever deque value now holds
    /// their elements.
    pub fn swap(&mut self, other: &mut Self) -> Result<(), Error> {
        if !self.same_type(other) {
            return Err(Error::TypeMismatch);
        }
        mem::swap(self, other);
        Ok(())
    }

    /// Elementwise equality through the descriptor's order. Deques of
    /// different element types are never equal.
    pub fn equal(&self, other: &Self) -> bool {
        if !self.same_type(other) || self.len != other.len {
            return false;
        }
        for i in 0..self.len {
            let a = self.slot(i);
            let b = other.slot(i);
            if self.desc.less(a, b) || self.desc.less(b, a) {
                return false;
            }
        }
        true
    }

    pub fn not_equal(&self, other: &Self) -> bool {
        !self.equal(other)
    }

    /// Lexicographic order through the descriptor. Deques of different
    /// element types are never ordered.
    pub fn less(&self, other: &Self) -> bool {
        if !self.same_type(other) {
            return false;
        }
        for i in 0..self.len.min(other.len) {
            let a = self.slot(i);
            let b = other.slot(i);
            if self.desc.less(a, b) {
                return true;
            }
            if self.desc.less(b, a) {
                return false;
            }
        }
        self.len < other.len
    }

    pub fn less_equal(&self, other: &Self) -> bool {
        self.same_type(other) && !other.less(self)
    }

    pub fn greater(&self, other: &Self) -> bool {
        other.less(self)
    }

    pub fn greater_equal(&self, other: &Self) -> bool {
        self.same_type(other) && !self.less(other)
    }

    /// Cursor at the first element, or at `end` when empty.
    pub fn begin(&self) -> Cursor {
        self.cursor_at(0)
    }

    /// Cursor one past the last element. Never dereferenceable.
    pub fn end(&self) -> Cursor {
        self.cursor_at(self.len)
    }

    /// Cursor at element `index`; `index == len` yields `end`.
    pub fn at_offset(&self, index: usize) -> Result<Cursor, Error> {
        if index > self.len {
            return Err(Error::Precondition);
        }
        Ok(self.cursor_at(index))
    }

    /// Check that `c` belongs to this deque, was minted at the current
    /// version, and points inside `[begin, end]`.
    pub fn validate_cursor(&self, c: Cursor) -> Result<(), Error> {
        self.locate(c).map(|_| ())
    }

    pub fn next(&self, c: Cursor) -> Result<Cursor, Error> {
        let i = self.locate(c)?;
        if i >= self.len {
            return Err(Error::Precondition);
        }
        Ok(self.cursor_at(i + 1))
    }

    pub fn prev(&self, c: Cursor) -> Result<Cursor, Error> {
        let i = self.locate(c)?;
        if i == 0 {
            return Err(Error::Precondition);
        }
        Ok(self.cursor_at(i - 1))
    }

    /// Cursor `n` positions away from `c`, in either direction.
    pub fn next_n(&self, c: Cursor, n: isize) -> Result<Cursor, Error> {
        let i = self.locate(c)? as isize;
        let target = i + n;
        if target < 0 || target as usize > self.len {
            return Err(Error::Precondition);
        }
        Ok(self.cursor_at(target as usize))
    }

    /// Signed element count from `a` to `b`.
    pub fn distance(&self, a: Cursor, b: Cursor) -> Result<isize, Error> {
        self.locate(a)?;
        self.locate(b)?;
        Ok(span(a.pos(), b.pos(), BLOCK_LEN))
    }

    /// Whether `a` precedes `b` in sequence order.
    pub fn cursor_before(&self, a: Cursor, b: Cursor) -> Result<bool, Error> {
        self.locate(a)?;
        self.locate(b)?;
        Ok(a.pos() < b.pos())
    }

    /// Dereference `c`. Dereferencing `end` is a precondition violation.
    pub fn value(&self, c: Cursor) -> Result<SlotRef<'_, D::Slot>, Error> {
        let i = self.locate(c)?;
        if i >= self.len {
            return Err(Error::Precondition);
        }
        Ok(self.desc.view(self.slot(i)))
    }

    /// Overwrite the element at `c` with a deep copy of `value`.
    pub fn set_value(&mut self, c: Cursor, value: &D::Slot) -> Result<(), Error> {
        let i = self.locate(c)?;
        if i >= self.len {
            return Err(Error::Precondition);
        }
        self.desc
            .copy(Self::slot_at_mut(&mut self.map, self.front, i), value);
        Ok(())
    }

    fn same_type(&self, other: &Self) -> bool {
        self.desc.type_name() == other.desc.type_name()
            && self.desc.slot_size() == other.desc.slot_size()
    }

    fn slot_at<'m>(map: &'m BlockMap<D::Slot>, front: usize, index: usize) -> &'m D::Slot {
        let g = front + index;
        &map.block(map.first() + g / BLOCK_LEN).slots[g % BLOCK_LEN]
    }

    fn slot_at_mut<'m>(
        map: &'m mut BlockMap<D::Slot>,
        front: usize,
        index: usize,
    ) -> &'m mut D::Slot {
        let g = front + index;
        let entry = map.first() + g / BLOCK_LEN;
        &mut map.block_mut(entry).slots[g % BLOCK_LEN]
    }

    fn slot(&self, index: usize) -> &D::Slot {
        Self::slot_at(&self.map, self.front, index)
    }

    fn cursor_at(&self, index: usize) -> Cursor {
        let g = self.front + index;
        Cursor {
            owner: self.id,
            version: self.version,
            block: self.map.first() + g / BLOCK_LEN,
            slot: g % BLOCK_LEN,
        }
    }

    /// Resolve a cursor to an element index in `0..=len`, rejecting cursors
    /// with the wrong owner, a stale version, or a position outside the
    /// occupied range.
    fn locate(&self, c: Cursor) -> Result<usize, Error> {
        if c.owner != self.id || c.version != self.version {
            return Err(Error::Precondition);
        }
        let first = self.map.first();
        if c.block < first || c.block >= first + self.map.live() || c.slot >= BLOCK_LEN {
            return Err(Error::Precondition);
        }
        let total = (c.block - first) * BLOCK_LEN + c.slot;
        if total < self.front || total - self.front > self.len {
            return Err(Error::Precondition);
        }
        Ok(total - self.front)
    }

    fn fill(&mut self, b: usize, e: usize, value: &D::Slot) {
        for i in b..e {
            self.desc
                .copy(Self::slot_at_mut(&mut self.map, self.front, i), value);
        }
    }

    /// Move the element at `from` into the slot at `to`, tearing down
    /// whatever `to` held and leaving a default value at `from`.
    fn move_slot(&mut self, from: usize, to: usize) {
        let filler = self.desc.init();
        let value = mem::replace(Self::slot_at_mut(&mut self.map, self.front, from), filler);
        let dst = Self::slot_at_mut(&mut self.map, self.front, to);
        let mut vacated = mem::replace(dst, value);
        self.desc.destroy(&mut vacated);
    }

    /// Shift `[b, e)` down by `n`, walking forward so no unmoved slot is
    /// overwritten.
    fn move_to_front(&mut self, b: usize, e: usize, n: usize) {
        for i in b..e {
            self.move_slot(i, i - n);
        }
    }

    /// Shift `[b, e)` up by `n`, walking backward.
    fn move_to_back(&mut self, b: usize, e: usize, n: usize) {
        for i in (b..e).rev() {
            self.move_slot(i, i + n);
        }
    }

    /// Open a gap of `n` default-initialized slots at element index `at`,
    /// shifting whichever side is shorter.
    fn open_gap(&mut self, at: usize, n: usize) -> Result<(), Error> {
        if at < self.len / 2 {
            self.expand_at_begin(n)?;
            self.move_to_front(n, at + n, n);
        } else {
            let old_len = self.expand_at_end(n)?;
            self.move_to_back(at, old_len, n);
        }
        Ok(())
    }

    /// Make room for `n` more elements at the back and claim them,
    /// default-initialized. Returns the previous length. Bumps the version.
    fn expand_at_end(&mut self, n: usize) -> Result<usize, Error> {
        let room = self.map.live() * BLOCK_LEN - (self.front + self.len);
        if n >= room {
            let short = n - room;
            let mut k = (short + BLOCK_LEN - 1) / BLOCK_LEN;
            if short % BLOCK_LEN == 0 {
                // Landing exactly on a block boundary would leave the finish
                // position without a block; keep one block spare.
                k += 1;
            }
            self.make_room_at_end(k)?;
        }
        let old_len = self.len;
        self.len += n;
        for i in old_len..self.len {
            let filler = self.desc.init();
            *Self::slot_at_mut(&mut self.map, self.front, i) = filler;
        }
        self.version += 1;
        Ok(old_len)
    }

    /// Make room for `n` more elements at the front and claim them,
    /// default-initialized. Bumps the version.
    fn expand_at_begin(&mut self, n: usize) -> Result<(), Error> {
        if n < self.front {
            self.front -= n;
        } else {
            let short = n - self.front;
            let mut k = (short + BLOCK_LEN - 1) / BLOCK_LEN;
            if short % BLOCK_LEN == 0 {
                k += 1;
            }
            self.make_room_at_begin(k)?;
            self.front = k * BLOCK_LEN - short;
        }
        self.len += n;
        for i in 0..n {
            let filler = self.desc.init();
            *Self::slot_at_mut(&mut self.map, self.front, i) = filler;
        }
        self.version += 1;
        Ok(())
    }

    /// Destroy the trailing `n` elements (clamped) and release blocks past
    /// the new finish block. Bumps the version.
    fn shrink_at_end(&mut self, n: usize) {
        let n = n.min(self.len);
        if n == 0 {
            return;
        }
        let new_len = self.len - n;
        for i in new_len..self.len {
            self.desc
                .destroy(Self::slot_at_mut(&mut self.map, self.front, i));
        }
        let keep = (self.front + new_len) / BLOCK_LEN + 1;
        let free = self.map.live() - keep;
        let slot_size = self.desc.slot_size();
        for block in self.map.release_back(free) {
            self.alloc.deallocate(block.region, slot_size, BLOCK_LEN);
        }
        self.len = new_len;
        self.version += 1;
    }

    /// Destroy the leading `n` elements (clamped) and release blocks that
    /// fell wholly before the new first element. Bumps the version.
    fn shrink_at_begin(&mut self, n: usize) {
        let n = n.min(self.len);
        if n == 0 {
            return;
        }
        for i in 0..n {
            self.desc
                .destroy(Self::slot_at_mut(&mut self.map, self.front, i));
        }
        let free = (self.front + n) / BLOCK_LEN;
        let slot_size = self.desc.slot_size();
        for block in self.map.release_front(free) {
            self.alloc.deallocate(block.region, slot_size, BLOCK_LEN);
        }
        self.front = (self.front + n) % BLOCK_LEN;
        self.len -= n;
        self.version += 1;
    }

    /// Allocate `k` fresh blocks, each slot default-initialized. All
    /// allocator tickets are acquired up front; on denial everything already
    /// acquired is returned and nothing else has changed.
    fn new_blocks(&mut self, k: usize) -> Result<Vec<Block<D::Slot>>, Error> {
        let slot_size = self.desc.slot_size();
        let mut regions = Vec::with_capacity(k);
        for _ in 0..k {
            match self.alloc.allocate(slot_size, BLOCK_LEN) {
                Some(region) => regions.push(region),
                None => {
                    for region in regions {
                        self.alloc.deallocate(region, slot_size, BLOCK_LEN);
                    }
                    return Err(Error::Exhausted);
                }
            }
        }
        Ok(regions
            .into_iter()
            .map(|region| Block {
                slots: (0..BLOCK_LEN).map(|_| self.desc.init()).collect(),
                region,
            })
            .collect())
    }

    fn release_blocks(&mut self, blocks: Vec<Block<D::Slot>>) {
        let slot_size = self.desc.slot_size();
        for block in blocks {
            self.alloc.deallocate(block.region, slot_size, BLOCK_LEN);
        }
    }

    fn make_room_at_end(&mut self, k: usize) -> Result<(), Error> {
        let blocks = self.new_blocks(k)?;
        if self.map.room_back() < k {
            if let Err(err) = self.widen_map(k, false) {
                self.release_blocks(blocks);
                return Err(err);
            }
        }
        self.map.install_back(blocks);
        Ok(())
    }

    fn make_room_at_begin(&mut self, k: usize) -> Result<(), Error> {
        let blocks = self.new_blocks(k)?;
        if self.map.room_front() < k {
            if let Err(err) = self.widen_map(k, true) {
                self.release_blocks(blocks);
                return Err(err);
            }
        }
        self.map.install_front(blocks);
        Ok(())
    }

    /// Ensure the map has `k` free entries on the requested side, either by
    /// recentering the live run within the existing slack or by reallocating
    /// the map with step-rounded growth.
    fn widen_map(&mut self, k: usize, at_front: bool) -> Result<(), Error> {
        if self.map.room_total() >= k {
            let mut new_first = (self.map.cap() - (self.map.live() + k)) / 2;
            if at_front {
                new_first += k;
            }
            self.map.shift_live(new_first);
            return Ok(());
        }
        let short = k - self.map.room_total();
        let grow = (short + MAP_GROW_STEP - 1) / MAP_GROW_STEP * MAP_GROW_STEP;
        let new_cap = self.map.cap() + grow;
        let region = self
            .alloc
            .allocate(mem::size_of::<usize>(), new_cap)
            .ok_or(Error::Exhausted)?;
        let mut new_first = (new_cap - (self.map.live() + k)) / 2;
        if at_front {
            new_first += k;
        }
        let (old_region, old_cap) = self.map.regrow(new_cap, new_first, region);
        self.alloc
            .deallocate(old_region, mem::size_of::<usize>(), old_cap);
        Ok(())
    }
}

impl<D: ElementDesc, A: BlockAllocator> Drop for BlockDeque<D, A> {
    fn drop(&mut self) {
        for i in 0..self.len {
            self.desc
                .destroy(Self::slot_at_mut(&mut self.map, self.front, i));
        }
        let slot_size = self.desc.slot_size();
        for block in self.map.release_all() {
            self.alloc.deallocate(block.region, slot_size, BLOCK_LEN);
        }
        self.alloc
            .deallocate(self.map.region(), mem::size_of::<usize>(), self.map.cap());
    }
}

impl<D, A> fmt::Debug for BlockDeque<D, A>
where
    D: ElementDesc,
    D::Slot: fmt::Debug,
    A: BlockAllocator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<D, A, const N: usize> PartialEq<[D::Slot; N]> for BlockDeque<D, A>
where
    D: ElementDesc,
    D::Slot: PartialEq,
    A: BlockAllocator,
{
    fn eq(&self, other: &[D::Slot; N]) -> bool {
        self.len == N && self.iter().eq(other.iter())
    }
}

impl<D, A> PartialEq<&[D::Slot]> for BlockDeque<D, A>
where
    D: ElementDesc,
    D::Slot: PartialEq,
    A: BlockAllocator,
{
    fn eq(&self, other: &&[D::Slot]) -> bool {
        self.len == other.len() && self.iter().eq(other.iter())
    }
}

impl<D, A> PartialEq<Vec<D::Slot>> for BlockDeque<D, A>
where
    D: ElementDesc,
    D::Slot: PartialEq,
    A: BlockAllocator,
{
    fn eq(&self, other: &Vec<D::Slot>) -> bool {
        self.len == other.len() && self.iter().eq(other.iter())
    }
}
