use core::fmt;

/// Failure reported by a deque operation.
///
/// The three categories are deliberately coarse so callers (and tests) can
/// tell *which kind* of failure occurred without parsing messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error {
    /// The caller broke an operation contract: an out-of-range index or
    /// position, a cursor that does not belong to this deque (wrong owner or
    /// invalidated by a size-changing operation), or an empty deque where
    /// elements are required. The deque is unchanged.
    Precondition,
    /// The allocator denied a block or map allocation. The triggering
    /// operation fails as a whole; the deque keeps its prior state.
    Exhausted,
    /// The operands carry different element descriptors. Only mutating
    /// cross-type operations report this; comparisons return their defined
    /// "not equal" result instead.
    TypeMismatch,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Precondition => f.write_str("operation precondition violated"),
            Error::Exhausted => f.write_str("block or map allocation exhausted"),
            Error::TypeMismatch => f.write_str("element descriptors differ"),
        }
    }
}

impl std::error::Error for Error {}
