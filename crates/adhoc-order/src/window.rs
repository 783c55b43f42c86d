//! Bounded min-ordered buffer of directory entries.
//!
//! # Examples
//!
//! ```
//! use adhoc_httpd_core::DirEntry;
//! use adhoc_httpd_order::Window;
//!
//! let mut window = Window::new(3);
//! window.insert(DirEntry::file("quux", 1));
//! window.insert(DirEntry::file("foo", 1));
//! window.insert(DirEntry::file("bar", 1));
//!
//! assert_eq!(window.pop_min().unwrap().name(), "bar");
//! assert_eq!(window.pop_min().unwrap().name(), "foo");
//! assert_eq!(window.len(), 1);
//! ```

use adhoc_httpd_core::DirEntry;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

/// Entry wrapper ordered by name only.
#[derive(Debug)]
struct ByName(DirEntry);

impl PartialEq for ByName {
    fn eq(&self, other: &Self) -> bool {
        self.0.name() == other.0.name()
    }
}

impl Eq for ByName {}

impl PartialOrd for ByName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ByName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.name().cmp(other.0.name())
    }
}

/// A min-heap of entries keyed by name, with a nominal capacity.
///
/// The capacity is advisory: [`Window::insert`] never fails, and the owner
/// decides when to stop filling (see [`Window::room`]). Entries with equal
/// names come out in an unspecified but deterministic order.
#[derive(Debug)]
pub struct Window {
    heap: BinaryHeap<Reverse<ByName>>,
    capacity: usize,
}

impl Window {
    /// Creates an empty window holding nominally `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
            capacity,
        }
    }

    /// Adds one entry. O(log n).
    pub fn insert(&mut self, entry: DirEntry) {
        self.heap.push(Reverse(ByName(entry)));
    }

    /// Removes and returns the entry with the smallest name. O(log n).
    ///
    /// Returns `None` when the window is empty.
    pub fn pop_min(&mut self) -> Option<DirEntry> {
        self.heap.pop().map(|Reverse(ByName(entry))| entry)
    }

    /// Number of entries held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Returns `true` if no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Nominal capacity.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots below the nominal capacity.
    #[must_use]
    pub fn room(&self) -> usize {
        self.capacity.saturating_sub(self.len())
    }
}
