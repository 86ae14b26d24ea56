//! This crate provides a generic singly-linked list that tracks both of its
//! ends, with optional reader/writer locking chosen per list.
//!
//! The [`List`] adds elements at either end in constant time, and inserts,
//! finds or deletes elements next to a position found by a linear scan.
//! Every operation takes `&self` and reports failure as a [`ListError`]; none
//! of them panics on a recoverable condition.
//!
//! Here is a quick example showing how the list works.
//!
//! ```
//! use llist::{List, Position};
//!
//! let list = List::new();
//! for i in 1..=5 {
//!     list.add_node(i, Position::Front).unwrap();
//! }
//! assert_eq!(list.to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
//! assert_eq!(list.size(), Ok(5));
//! ```
//!
//! # Memory Layout
//!
//! ```text
//!    ╔═══════════╗     ╔═══════════╗                ╔═══════════╗
//!    ║   next    ║ ──→ ║   next    ║ ──→ ┄┄ ──→     ║   next    ║ ──→ None
//!    ╟───────────╢     ╟───────────╢                ╟───────────╢
//!    ║ element T ║     ║ element T ║                ║ element T ║
//!    ╚═══════════╝     ╚═══════════╝                ╚═══════════╝
//!       Node 0  ↑         Node 1                     ↑ Node n - 1
//!               │                                    │
//! ╔═══════════╗ │                                    │
//! ║   head    ║ ┘                                    │
//! ╟───────────╢                                      │
//! ║   tail    ║ ─────────────────────────────────────┘
//! ╟───────────╢
//! ║    len    ║
//! ╚═══════════╝
//!     List
//! ```
//!
//! `head` and `tail` are both absent exactly when `len` is zero, and `len`
//! always equals the number of nodes reachable from `head`. Each node is
//! allocated on the heap and owns its element; the list frees every node
//! exactly once, either when it is dropped or by [`List::destroy_with`],
//! which hands the elements back to the caller.
//!
//! # Callbacks
//!
//! A list may be built with an equality predicate (used by
//! [`find_node`](List::find_node) and [`delete_node`](List::delete_node)) and
//! a comparator (used by [`sort`](List::sort), [`merge`](List::merge) and
//! [`get_min_max`](List::get_min_max)). Both are fixed at construction;
//! operations missing one fail with [`ListError::EqualityMissing`] or
//! [`ListError::ComparatorMissing`].
//!
//! ```
//! use llist::{List, ListError};
//!
//! let list = List::builder()
//!     .equality(|a: &i32, b: &i32| a == b)
//!     .build();
//! list.extend_from([5, 4, 3, 2, 1]).unwrap();
//!
//! assert_eq!(list.find_node(&3).map(|e| *e), Ok(3));
//! assert_eq!(list.find_node(&99).err(), Some(ListError::NodeNotFound));
//! assert_eq!(list.sort(llist::SortOrder::Ascending), Err(ListError::ComparatorMissing));
//! ```
//!
//! # Locking
//!
//! A list built with [`concurrent(true)`](ListBuilder::concurrent) holds a
//! reader/writer lock: queries share it, mutations take it exclusively, and
//! both wait for it. Any other list refuses overlapping access with
//! [`ListError::MultithreadIssue`] instead of waiting, for instance when a
//! [`for_each`](List::for_each) visitor tries to mutate the list it visits.
//!
//! Elements returned by queries are wrapped in an [`ElementRef`], which holds
//! the shared side of the lock for as long as it lives.
//!
//! ```
//! use std::sync::Arc;
//! use std::thread;
//! use llist::List;
//!
//! let list = Arc::new(List::<i32>::builder().concurrent(true).build());
//! thread::scope(|s| {
//!     for t in 0..4 {
//!         let list = Arc::clone(&list);
//!         s.spawn(move || {
//!             for i in 0..100 {
//!                 list.push(t * 100 + i).unwrap();
//!             }
//!         });
//!     }
//! });
//! assert_eq!(list.size(), Ok(400));
//! ```
//!
//! # Stack Usage
//!
//! [`push`](List::push) and [`pop`](List::pop) work on the head of the list.
//!
//! ```
//! use llist::List;
//!
//! let list = List::new();
//! for i in 0..1000 {
//!     list.push(i).unwrap();
//! }
//! for i in (0..1000).rev() {
//!     assert_eq!(list.pop(), Ok(Some(i)));
//! }
//! assert_eq!(list.pop(), Ok(None));
//! ```
//!
//! # Algorithms
//!
//! Sorting is a stable bottom-up merge sort that relinks nodes in place.
//! [`concat`](List::concat) moves every node of another list onto the tail,
//! and [`merge`](List::merge) interleaves two sorted lists.
//!
//! ```
//! use llist::{List, SortOrder};
//!
//! let a: List<i32> = List::builder().ordered().build();
//! a.extend_from([3, 2, 1, 4, 5]).unwrap();
//! a.sort(SortOrder::Ascending).unwrap();
//! assert_eq!(a.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
//! a.sort(SortOrder::Descending).unwrap();
//! assert_eq!(a.to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
//!
//! let b = List::from_iter([0, -1]);
//! a.concat(&b).unwrap();
//! assert_eq!(a.to_vec().unwrap(), vec![5, 4, 3, 2, 1, 0, -1]);
//! assert_eq!(b.is_empty(), Ok(true));
//! ```

#[doc(inline)]
pub use error::{ListError, Result};
#[doc(inline)]
pub use list::builder::ListBuilder;
#[doc(inline)]
pub use list::iterator::{IntoIter, Iter};
#[doc(inline)]
pub use list::{
    Comparator, Drain, ElementRef, Equality, Extreme, List, ListView, Position, Side, SortOrder,
};

pub mod list;

mod error;
