#![forbid(unsafe_code)]
//! A double-ended queue over chunked storage.
//!
//! Elements live in fixed blocks of [`BLOCK_LEN`] slots reached through a
//! growable map of block handles, so growth at either end never relocates
//! element storage. Element handling (construction, copying, ordering,
//! teardown) is delegated to an [`ElementDesc`](desc::ElementDesc) fixed per
//! deque, and storage accounting to a pluggable
//! [`BlockAllocator`](alloc::BlockAllocator).
//!
//! ```
//! use blockdeq::{BlockDeque, desc::PlainDesc};
//!
//! let mut d = BlockDeque::new(PlainDesc::<i32>::new())?;
//! d.push_back(&1)?;
//! d.push_front(&0)?;
//! let mid = d.at_offset(1)?;
//! d.insert(mid, &7)?;
//! assert_eq!(d, [0, 7, 1]);
//! # Ok::<(), blockdeq::Error>(())
//! ```

pub mod alloc;
pub mod blockdeq;
pub mod cursor;
pub mod desc;
pub mod error;
mod map;

pub use blockdeq::BlockDeque;
pub use cursor::Cursor;
pub use error::Error;
pub use map::BLOCK_LEN;
