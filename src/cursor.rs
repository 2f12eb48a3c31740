use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_DEQUE_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one deque instance. Travels with the deque's owned state, so
/// after a `swap` a cursor still matches the container that now holds its
/// elements.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct DequeId(u64);

impl DequeId {
    pub(crate) fn fresh() -> Self {
        DequeId(NEXT_DEQUE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A random-access position inside a [`BlockDeque`](crate::blockdeq::BlockDeque).
///
/// A cursor records the map index of its block and a slot index within it,
/// plus the owning deque's identity and the deque version it was minted at.
/// Every size-changing operation bumps the version, so stale cursors are
/// rejected rather than silently pointing at relocated storage.
///
/// Cursors are always normalized: a position that falls on a block's
/// after-last boundary is represented as slot 0 of the following block, so
/// two cursors denote the same position exactly when they are equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cursor {
    pub(crate) owner: DequeId,
    pub(crate) version: u64,
    pub(crate) block: usize,
    pub(crate) slot: usize,
}

impl Cursor {
    pub(crate) fn pos(self) -> (usize, usize) {
        (self.block, self.slot)
    }
}

/// Signed element count from `a` to `b`, both given as (block, slot) with
/// uniform blocks of `block_len` slots.
///
/// Same block: slot difference. Otherwise: slots left in `a`'s block, plus a
/// whole block for everything strictly between, plus the slots into `b`'s
/// block; negated when `b` precedes `a`.
pub(crate) fn span(a: (usize, usize), b: (usize, usize), block_len: usize) -> isize {
    if a.0 == b.0 {
        b.1 as isize - a.1 as isize
    } else if a.0 < b.0 {
        let head = block_len - a.1;
        let middle = (b.0 - a.0 - 1) * block_len;
        (head + middle + b.1) as isize
    } else {
        -span(b, a, block_len)
    }
}

#[cfg(test)]
mod test {
    use super::span;

    const D: usize = 16;

    #[test]
    fn span_within_one_block() {
        assert_eq!(span((3, 2), (3, 9), D), 7);
        assert_eq!(span((3, 9), (3, 2), D), -7);
        assert_eq!(span((3, 5), (3, 5), D), 0);
    }

    #[test]
    fn span_across_adjacent_blocks() {
        // 11 slots to the end of block 2, none between, 4 into block 3.
        assert_eq!(span((2, 5), (3, 4), D), 15);
        assert_eq!(span((3, 4), (2, 5), D), -15);
    }

    #[test]
    fn span_across_whole_blocks() {
        assert_eq!(span((1, 0), (4, 0), D), 3 * 16);
        assert_eq!(span((0, 15), (2, 1), D), 1 + 16 + 1);
    }

    #[test]
    fn span_agrees_with_linear_offsets() {
        for a in 0..3 * D {
            for b in 0..3 * D {
                let ca = (a / D, a % D);
                let cb = (b / D, b % D);
                assert_eq!(span(ca, cb, D), b as isize - a as isize);
            }
        }
    }
}
