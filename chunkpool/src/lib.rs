#![no_std]
#![deny(missing_docs)]

//! A fixed-chunk pool allocator, and a doubly linked list drawing its nodes from it.
//!
//! The type `ChunkAllocator` carves a single buffer, allocated once, into `chunk_count` chunks of `chunk_size` bytes,
//! and hands them out first-fit. The type `DoublyLinkedList` stores each of its elements in a node allocated from any
//! `MemoryResource`, such as a `ChunkAllocator`.
//!
//! #   Warning
//!
//! The pool is single-threaded: `ChunkAllocator` is neither `Send` nor `Sync`, share it by reference within a thread.
//!
//! Allocation scans the chunks linearly, from the lowest address; its cost grows with the number of chunks in use.
//!
//! #   Example
//!
//! ```
//! use chunkpool::{ChunkAllocator, Configuration, DoublyLinkedList};
//!
//! let configuration = Configuration::new(40, 3).unwrap();
//! let allocator = ChunkAllocator::new(configuration).unwrap();
//!
//! let mut list = DoublyLinkedList::new(&allocator);
//!
//! for i in 0..3 {
//!     list.push_back(i).unwrap();
//! }
//!
//! assert!(list.push_back(3).is_err());
//! assert_eq!(vec![0, 1, 2], list.iter().copied().collect::<Vec<_>>());
//! ```

extern crate alloc;

mod list;
mod platform;

pub use chunkpool_core::{AllocError, ChunkAllocator, ChunkIndex, Configuration, HeapPlatform, Layout, MAX_ALIGNMENT};
pub use chunkpool_core::{MemoryResource, Platform};

pub use list::{DoublyLinkedList, Iter, IterMut, node_layout};

#[cfg(target_os = "linux")]
pub use platform::MmapPlatform;
