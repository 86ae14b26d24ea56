use std::alloc::{self, Layout};
use std::cell::UnsafeCell;
use std::cmp::Ordering;
use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;
use std::sync::atomic::{self, AtomicBool};

use crate::error::{ListError, Result};
use crate::list::lock::{ListLock, ReadGuard, WriteGuard};
use crate::{IntoIter, Iter, ListBuilder};

pub use self::algorithms::{Drain, Extreme, SortOrder};

pub mod builder;
pub mod iterator;

mod algorithms;
mod lock;

/// Total order over two elements, used by sorting, merging and min/max.
pub type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Equality predicate `equal(node_element, target)`, used by find and delete.
pub type Equality<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Where [`List::add_node`] puts the new element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Front,
    Rear,
}

/// Which side of the position element [`List::insert_node`] puts the new
/// element on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Before,
    After,
}

/// A singly-linked list that tracks both of its ends.
///
/// Elements are added at either end in *O*(1), or next to an element found by
/// a linear scan. Every operation takes `&self` and goes through the list
/// lock, so a list can be shared between threads:
/// - a list built with `concurrent(true)` owns a reader/writer lock. Queries
///   take the shared side, mutations the exclusive side, and both block until
///   the lock is available;
/// - any other list refuses overlapping access with
///   [`ListError::MultithreadIssue`] instead of blocking.
///
/// The comparator and the equality predicate are fixed when the list is
/// built. Operations that need one fail with [`ListError::ComparatorMissing`]
/// or [`ListError::EqualityMissing`] when it is absent.
///
/// # Examples
///
/// ```
/// use llist::{List, Position};
///
/// let list = List::builder().equality(|a: &i32, b: &i32| a == b).build();
/// for i in 1..=5 {
///     list.add_node(i, Position::Front).unwrap();
/// }
/// assert_eq!(list.to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
///
/// assert_eq!(list.delete_node(&3), Ok(3));
/// assert_eq!(list.to_vec().unwrap(), vec![5, 4, 2, 1]);
/// assert_eq!(list.size(), Ok(4));
/// ```
pub struct List<T> {
    chain: UnsafeCell<Chain<T>>,
    lock: ListLock,
    comparator: Option<Comparator<T>>,
    equality: Option<Equality<T>>,
    aborted: AtomicBool,
}

pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

pub(crate) struct Node<T> {
    pub(crate) next: Link<T>,
    pub(crate) element: T,
}

/// The node chain of a list: `head` and `tail` are both `None` exactly when
/// `len == 0`, and `tail.next` is always `None`.
pub(crate) struct Chain<T> {
    pub(crate) head: Link<T>,
    pub(crate) tail: Link<T>,
    pub(crate) len: usize,
    _marker: PhantomData<Box<Node<T>>>,
}

/// Result of a scan: the matching node and its predecessor (`None` when the
/// match is the head).
pub(crate) struct Located<T> {
    prev: Link<T>,
    node: NonNull<Node<T>>,
}

/// A read-locked view of a [`List`].
///
/// The shared side of the list lock is held until the view is dropped, so the
/// structure of the list cannot change while it is alive.
///
/// # Examples
///
/// ```
/// use llist::List;
///
/// let list = List::from_iter([1, 2, 3]);
/// let view = list.view().unwrap();
/// assert_eq!(view.len(), 3);
/// assert_eq!(view.iter().sum::<i32>(), 6);
/// ```
pub struct ListView<'a, T> {
    _guard: ReadGuard<'a>,
    chain: &'a Chain<T>,
}

/// A reference to an element inside a [`List`].
///
/// Like [`ListView`], it keeps the shared side of the list lock held while it
/// lives. On a concurrent list:
/// - mutating the list from the thread holding an `ElementRef` deadlocks;
/// - holding several `ElementRef`s or views at once is fine, even while a
///   writer on another thread is queued, since reads are taken recursively.
///   That writer waits until all of them are dropped, so keep them short-lived.
///
/// A list without concurrency support never blocks, and refuses the mutation
/// with [`ListError::MultithreadIssue`] instead.
pub struct ElementRef<'a, T> {
    _guard: ReadGuard<'a>,
    element: &'a T,
}

pub(crate) struct ChainMut<'a, T> {
    _guard: WriteGuard<'a>,
    chain: &'a mut Chain<T>,
}

impl<T> Node<T> {
    /// Allocates a detached node holding `element`.
    pub(crate) fn alloc(element: T) -> Result<NonNull<Node<T>>> {
        let layout = Layout::new::<Node<T>>();
        // SAFETY: `Node<T>` always holds a link, so `layout` is never zero-sized.
        let ptr = unsafe { alloc::alloc(layout) }.cast::<Node<T>>();
        let node = NonNull::new(ptr).ok_or(ListError::AllocationError)?;
        // SAFETY: `node` is freshly allocated with the layout of `Node<T>`.
        unsafe { node.as_ptr().write(Node { next: None, element }) };
        Ok(node)
    }

    /// Like [`Node::alloc`], but for paths that cannot report an error.
    pub(crate) fn alloc_or_abort(element: T) -> NonNull<Node<T>> {
        Node::alloc(element)
            .unwrap_or_else(|_| alloc::handle_alloc_error(Layout::new::<Node<T>>()))
    }

    /// Frees a detached node and returns its element.
    ///
    /// It is unsafe because `node` must come from [`Node::alloc`], must not be
    /// reachable from any chain, and must not be freed twice.
    pub(crate) unsafe fn free(node: NonNull<Node<T>>) -> T {
        // `Node::alloc` allocates with the global allocator and the layout of
        // `Node<T>`, which is exactly what `Box` expects.
        Box::from_raw(node.as_ptr()).element
    }
}

impl<T> Chain<T> {
    pub(crate) const fn new() -> Self {
        Self {
            head: None,
            tail: None,
            len: 0,
            _marker: PhantomData,
        }
    }

    pub(crate) fn push_front(&mut self, mut node: NonNull<Node<T>>) {
        // SAFETY: `node` is detached, so no one else refers to it.
        unsafe { node.as_mut().next = self.head };
        if self.tail.is_none() {
            self.tail = Some(node);
        }
        self.head = Some(node);
        self.len += 1;
        self.check();
    }

    pub(crate) fn push_back(&mut self, mut node: NonNull<Node<T>>) {
        // SAFETY: `node` is detached and `tail` is a valid node of this chain.
        unsafe {
            node.as_mut().next = None;
            match self.tail {
                Some(mut tail) => tail.as_mut().next = Some(node),
                None => self.head = Some(node),
            }
        }
        self.tail = Some(node);
        self.len += 1;
        self.check();
    }

    pub(crate) fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        // SAFETY: `head` is a valid node of this chain, and it is unlinked
        // before being freed.
        unsafe {
            self.head = head.as_ref().next;
            if self.head.is_none() {
                self.tail = None;
            }
            self.len -= 1;
            self.check();
            Some(Node::free(head))
        }
    }

    /// Links the detached `node` right after `prev`.
    ///
    /// It is unsafe because it does not check whether `prev` belongs to the
    /// chain.
    unsafe fn insert_after(&mut self, mut prev: NonNull<Node<T>>, mut node: NonNull<Node<T>>) {
        node.as_mut().next = prev.as_ref().next;
        prev.as_mut().next = Some(node);
        if self.tail == Some(prev) {
            self.tail = Some(node);
        }
        self.len += 1;
        self.check();
    }

    /// Links the detached `node` on the given side of a located node.
    pub(crate) fn insert_at(&mut self, at: Located<T>, node: NonNull<Node<T>>, side: Side) {
        // SAFETY: `at` comes from `locate` on this chain, which is borrowed
        // mutably since then, so both of its nodes are still valid.
        match (side, at.prev) {
            (Side::Before, None) => self.push_front(node),
            (Side::Before, Some(prev)) => unsafe { self.insert_after(prev, node) },
            (Side::After, _) => unsafe { self.insert_after(at.node, node) },
        }
    }

    /// Unlinks a located node, and returns its element.
    pub(crate) fn remove_at(&mut self, at: Located<T>) -> T {
        // SAFETY: `at` comes from `locate` on this chain, which is borrowed
        // mutably since then, so both of its nodes are still valid.
        unsafe {
            let next = at.node.as_ref().next;
            match at.prev {
                Some(mut prev) => prev.as_mut().next = next,
                None => self.head = next,
            }
            if self.tail == Some(at.node) {
                self.tail = at.prev;
            }
            self.len -= 1;
            self.check();
            Node::free(at.node)
        }
    }

    /// Scans from the head, and returns the first node whose element matches.
    pub(crate) fn locate<F>(&self, mut matches: F) -> Option<Located<T>>
    where
        F: FnMut(&T) -> bool,
    {
        let mut prev = None;
        let mut current = self.head;
        while let Some(node) = current {
            // SAFETY: every node reachable from `head` is valid.
            let node_ref = unsafe { node.as_ref() };
            if matches(&node_ref.element) {
                return Some(Located { prev, node });
            }
            prev = Some(node);
            current = node_ref.next;
        }
        None
    }

    /// Moves all nodes of `other` to the back of the chain, leaving `other`
    /// empty.
    pub(crate) fn append(&mut self, other: &mut Chain<T>) {
        let (front, back) = match (other.head.take(), other.tail.take()) {
            (Some(front), Some(back)) => (front, back),
            _ => return,
        };
        // SAFETY: `tail` is a valid node of this chain.
        match self.tail {
            Some(mut tail) => unsafe { tail.as_mut().next = Some(front) },
            None => self.head = Some(front),
        }
        self.tail = Some(back);
        self.len += mem::replace(&mut other.len, 0);
        self.check();
        other.check();
    }

    /// Reverses the links in place.
    pub(crate) fn reverse(&mut self) {
        let mut reversed = None;
        let mut current = self.head;
        self.tail = self.head;
        while let Some(mut node) = current {
            // SAFETY: every node reachable from `head` is valid, and each one
            // is visited exactly once.
            unsafe {
                current = node.as_ref().next;
                node.as_mut().next = reversed;
            }
            reversed = Some(node);
        }
        self.head = reversed;
        self.check();
    }

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Verifies that `len` matches the reachable nodes and that `tail` is the
    /// last of them.
    #[cfg(debug_assertions)]
    pub(crate) fn check(&self) {
        let mut count = 0;
        let mut last = None;
        let mut current = self.head;
        while let Some(node) = current {
            count += 1;
            last = Some(node);
            // SAFETY: every node reachable from `head` is valid.
            current = unsafe { node.as_ref().next };
        }
        assert_eq!(count, self.len, "list length does not match its nodes");
        assert_eq!(last, self.tail, "list tail is not its last node");
    }

    #[cfg(not(debug_assertions))]
    #[inline(always)]
    pub(crate) fn check(&self) {}
}

impl<T> Drop for Chain<T> {
    fn drop(&mut self) {
        while self.pop_front().is_some() {}
    }
}

// private methods
impl<T> List<T> {
    pub(crate) fn from_parts(
        comparator: Option<Comparator<T>>,
        equality: Option<Equality<T>>,
        concurrent: bool,
    ) -> Self {
        tracing::trace!(
            comparator = comparator.is_some(),
            equality = equality.is_some(),
            concurrent,
            "list created"
        );
        Self {
            chain: UnsafeCell::new(Chain::new()),
            lock: ListLock::new(concurrent),
            comparator,
            equality,
            aborted: AtomicBool::new(false),
        }
    }

    pub(crate) fn comparator(&self) -> Option<&Comparator<T>> {
        self.comparator.as_ref()
    }

    pub(crate) fn read(&self) -> Result<ListView<'_, T>> {
        let guard = self.lock.read()?;
        // SAFETY: the shared side of the lock is held, so no writer exists
        // while the view lives.
        let chain = unsafe { &*self.chain.get() };
        Ok(ListView {
            _guard: guard,
            chain,
        })
    }

    pub(crate) fn write(&self) -> Result<ChainMut<'_, T>> {
        let guard = self.lock.write()?;
        // SAFETY: the exclusive side of the lock is held, so no other reader
        // or writer exists while the guard lives.
        let chain = unsafe { &mut *self.chain.get() };
        Ok(ChainMut {
            _guard: guard,
            chain,
        })
    }

    /// Write-locks two distinct lists, always in ascending address order.
    pub(crate) fn write_pair<'a>(
        first: &'a List<T>,
        second: &'a List<T>,
    ) -> Result<(ChainMut<'a, T>, ChainMut<'a, T>)> {
        if std::ptr::eq(first, second) {
            return Err(ListError::SameList);
        }
        if (first as *const List<T>) < (second as *const List<T>) {
            let first = first.write()?;
            let second = second.write()?;
            Ok((first, second))
        } else {
            let second = second.write()?;
            let first = first.write()?;
            Ok((first, second))
        }
    }

    pub(crate) fn chain_mut(&mut self) -> &mut Chain<T> {
        self.chain.get_mut()
    }

    pub(crate) fn into_chain(self) -> Chain<T> {
        self.chain.into_inner()
    }

    fn visit<F>(&self, chain: &Chain<T>, mut visitor: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        for element in chain.iter() {
            if self.is_aborted() {
                tracing::warn!("iteration aborted");
                return Err(ListError::IterationsAborted);
            }
            visitor(element);
        }
        Ok(())
    }

    fn visit_mut<F>(&self, chain: &mut Chain<T>, mut visitor: F) -> Result<()>
    where
        F: FnMut(&mut T),
    {
        let mut current = chain.head;
        while let Some(mut node) = current {
            if self.is_aborted() {
                tracing::warn!("iteration aborted");
                return Err(ListError::IterationsAborted);
            }
            // SAFETY: the chain is borrowed mutably, every node reachable from
            // `head` is valid, and the visitor only sees the element.
            let node = unsafe { node.as_mut() };
            visitor(&mut node.element);
            current = node.next;
        }
        Ok(())
    }

    fn remove_matching<F>(&self, matches: F) -> Result<T>
    where
        F: FnMut(&T) -> bool,
    {
        let mut chain = self.write()?;
        let located = chain.locate(matches).ok_or(ListError::NodeNotFound)?;
        let element = chain.remove_at(located);
        tracing::trace!(len = chain.len, "node deleted");
        Ok(element)
    }

    fn find_matching<F>(&self, matches: F) -> Result<ElementRef<'_, T>>
    where
        F: FnMut(&T) -> bool,
    {
        let view = self.read()?;
        let located = view.chain.locate(matches).ok_or(ListError::NodeNotFound)?;
        Ok(view.into_element(located.node))
    }
}

impl<T> List<T> {
    /// Creates an empty `List` with no comparator, no equality predicate and
    /// concurrency support disabled.
    ///
    /// # Examples
    /// ```
    /// use llist::List;
    /// let list: List<u32> = List::new();
    /// assert_eq!(list.is_empty(), Ok(true));
    /// ```
    #[inline]
    pub fn new() -> Self {
        Self::from_parts(None, None, false)
    }

    /// Returns a builder to configure a new `List`.
    ///
    /// # Examples
    /// ```
    /// use llist::List;
    ///
    /// let list = List::builder()
    ///     .comparator(|a: &i32, b: &i32| a.cmp(b))
    ///     .equality(|a: &i32, b: &i32| a == b)
    ///     .concurrent(true)
    ///     .build();
    /// assert!(list.is_concurrent());
    /// ```
    #[inline]
    pub fn builder() -> ListBuilder<T> {
        ListBuilder::new()
    }

    /// Creates an empty `List` from positional arguments. Both callbacks may be
    /// absent, in which case only the operations needing them fail.
    ///
    /// # Examples
    /// ```
    /// use llist::{Comparator, List};
    ///
    /// let comparator: Comparator<i32> = Box::new(|a: &i32, b: &i32| a.cmp(b));
    /// let list = List::create(Some(comparator), None, false);
    /// assert!(!list.is_concurrent());
    /// ```
    pub fn create(
        comparator: Option<Comparator<T>>,
        equality: Option<Equality<T>>,
        concurrent: bool,
    ) -> Self {
        Self::from_parts(comparator, equality, concurrent)
    }

    /// Destroys the list, dropping every element.
    pub fn destroy(self) {
        self.destroy_with(drop)
    }

    /// Destroys the list, handing every element to `destructor` from head to
    /// tail.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let list = List::from_iter(["a", "b", "c"]);
    /// let mut reclaimed = Vec::new();
    /// list.destroy_with(|element| reclaimed.push(element));
    /// assert_eq!(reclaimed, vec!["a", "b", "c"]);
    /// ```
    pub fn destroy_with<F>(self, destructor: F)
    where
        F: FnMut(T),
    {
        let elements = self.into_iter();
        tracing::trace!(len = elements.len(), "list destroyed");
        elements.for_each(destructor);
    }

    /// Returns `true` if the list was built with concurrency support.
    pub fn is_concurrent(&self) -> bool {
        self.lock.is_concurrent()
    }

    /// Adds an element at the front or at the rear of the list.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::{List, Position};
    ///
    /// let list = List::new();
    /// list.add_node(2, Position::Rear).unwrap();
    /// list.add_node(1, Position::Front).unwrap();
    /// list.add_node(3, Position::Rear).unwrap();
    /// assert_eq!(list.to_vec().unwrap(), vec![1, 2, 3]);
    /// ```
    pub fn add_node(&self, element: T, position: Position) -> Result<()> {
        let node = Node::alloc(element)?;
        let linked = self.write().map(|mut chain| {
            match position {
                Position::Front => chain.push_front(node),
                Position::Rear => chain.push_back(node),
            }
            tracing::trace!(?position, len = chain.len, "node added");
        });
        if linked.is_err() {
            // SAFETY: `node` was never linked.
            drop(unsafe { Node::free(node) });
        }
        linked
    }

    /// Inserts an element before or after the first element matched by
    /// `position`.
    ///
    /// The position is identified by the caller, e.g. with `Arc::ptr_eq` for
    /// handle elements, and not by the configured equality predicate.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::NodeNotFound`] if no element matches. The list is
    /// left unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::{List, ListError, Side};
    ///
    /// let list = List::from_iter([1, 3]);
    /// list.insert_node(2, |&e| e == 3, Side::Before).unwrap();
    /// list.insert_node(4, |&e| e == 3, Side::After).unwrap();
    /// assert_eq!(list.to_vec().unwrap(), vec![1, 2, 3, 4]);
    ///
    /// assert_eq!(list.insert_node(5, |&e| e == 9, Side::After), Err(ListError::NodeNotFound));
    /// ```
    pub fn insert_node<P>(&self, element: T, position: P, side: Side) -> Result<()>
    where
        P: FnMut(&T) -> bool,
    {
        let node = Node::alloc(element)?;
        let linked = self.write().and_then(|mut chain| {
            let located = chain.locate(position).ok_or(ListError::NodeNotFound)?;
            chain.insert_at(located, node, side);
            tracing::trace!(?side, len = chain.len, "node inserted");
            Ok(())
        });
        if linked.is_err() {
            // SAFETY: `node` was never linked.
            drop(unsafe { Node::free(node) });
        }
        linked
    }

    /// Removes the first element equal to `target` under the configured
    /// equality predicate, and returns it.
    ///
    /// Dropping the returned element destroys it; the caller may also keep it.
    ///
    /// # Errors
    ///
    /// - [`ListError::EqualityMissing`] if the list has no equality predicate;
    /// - [`ListError::NodeNotFound`] if the list is empty or nothing matches.
    pub fn delete_node(&self, target: &T) -> Result<T> {
        let equal = self.equality.as_ref().ok_or(ListError::EqualityMissing)?;
        self.remove_matching(|element| equal(element, target))
    }

    /// Like [`List::delete_node`], but with an explicit predicate instead of
    /// the configured one.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let list = List::from_iter([(1, "one"), (2, "two")]);
    /// let removed = list.delete_node_with(&2, |element, key| element.0 == *key);
    /// assert_eq!(removed, Ok((2, "two")));
    /// ```
    pub fn delete_node_with<Q, E>(&self, target: &Q, mut equal: E) -> Result<T>
    where
        Q: ?Sized,
        E: FnMut(&T, &Q) -> bool,
    {
        self.remove_matching(|element| equal(element, target))
    }

    /// Finds the first element equal to `target` under the configured
    /// equality predicate.
    ///
    /// # Errors
    ///
    /// - [`ListError::EqualityMissing`] if the list has no equality predicate;
    /// - [`ListError::NodeNotFound`] if the list is empty or nothing matches.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::{List, ListError, Position};
    ///
    /// let list = List::builder().equality(|a: &i32, b: &i32| a == b).build();
    /// for i in 1..=5 {
    ///     list.add_node(i, Position::Rear).unwrap();
    /// }
    /// assert_eq!(list.find_node(&3).map(|found| *found), Ok(3));
    /// assert_eq!(list.find_node(&99).err(), Some(ListError::NodeNotFound));
    /// ```
    pub fn find_node(&self, target: &T) -> Result<ElementRef<'_, T>> {
        let equal = self.equality.as_ref().ok_or(ListError::EqualityMissing)?;
        self.find_matching(|element| equal(element, target))
    }

    /// Like [`List::find_node`], but with an explicit predicate instead of the
    /// configured one.
    pub fn find_node_with<Q, E>(&self, target: &Q, mut equal: E) -> Result<ElementRef<'_, T>>
    where
        Q: ?Sized,
        E: FnMut(&T, &Q) -> bool,
    {
        self.find_matching(|element| equal(element, target))
    }

    /// Provides the first element, or `None` if the list is empty.
    pub fn get_head(&self) -> Result<Option<ElementRef<'_, T>>> {
        let view = self.read()?;
        Ok(view.chain.head.map(|node| view.into_element(node)))
    }

    /// Provides the last element, or `None` if the list is empty.
    pub fn get_tail(&self) -> Result<Option<ElementRef<'_, T>>> {
        let view = self.read()?;
        Ok(view.chain.tail.map(|node| view.into_element(node)))
    }

    /// Pushes an element onto the front of the list.
    pub fn push(&self, element: T) -> Result<()> {
        self.add_node(element, Position::Front)
    }

    /// Adds every element of `elements` at the rear, in order, under a single
    /// acquisition of the lock.
    ///
    /// The nodes are allocated before the lock is taken, so the list is either
    /// extended by all of `elements` or left unchanged. On error, the elements
    /// already taken from `elements` are dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let list = List::from_iter([1, 2]);
    /// list.extend_from([3, 4]).unwrap();
    /// assert_eq!(list.to_vec().unwrap(), vec![1, 2, 3, 4]);
    /// ```
    pub fn extend_from<I>(&self, elements: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let mut batch = Chain::new();
        for element in elements {
            batch.push_back(Node::alloc(element)?);
        }
        let mut chain = self.write()?;
        let added = batch.len;
        chain.append(&mut batch);
        tracing::trace!(added, len = chain.len, "nodes added");
        Ok(())
    }

    /// Provides the front element without removing it.
    pub fn peek(&self) -> Result<Option<ElementRef<'_, T>>> {
        self.get_head()
    }

    /// Removes the front element and returns it, or `None` if the list is
    /// empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let stack = List::new();
    /// stack.push(1).unwrap();
    /// stack.push(2).unwrap();
    /// assert_eq!(stack.pop(), Ok(Some(2)));
    /// assert_eq!(stack.pop(), Ok(Some(1)));
    /// assert_eq!(stack.pop(), Ok(None));
    /// ```
    pub fn pop(&self) -> Result<Option<T>> {
        let mut chain = self.write()?;
        let element = chain.pop_front();
        tracing::trace!(len = chain.len, popped = element.is_some(), "pop");
        Ok(element)
    }

    /// Returns the number of elements.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time.
    pub fn size(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    /// Returns `true` if the list has no elements.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.size()? == 0)
    }

    /// Read-locks the list, and provides a view over its elements.
    pub fn view(&self) -> Result<ListView<'_, T>> {
        self.read()
    }

    /// Collects clones of the elements from head to tail.
    pub fn to_vec(&self) -> Result<Vec<T>>
    where
        T: Clone,
    {
        Ok(self.read()?.iter().cloned().collect())
    }

    /// Calls `visitor` on every element from head to tail, under the shared
    /// side of the lock.
    ///
    /// The visitor must not change the structure of the list.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::IterationsAborted`] if the abort flag is found set
    /// before visiting an element.
    pub fn for_each<F>(&self, visitor: F) -> Result<()>
    where
        F: FnMut(&T),
    {
        let view = self.read()?;
        self.visit(view.chain, visitor)
    }

    /// Like [`List::for_each`], passing `arg` to every call.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// let mut sum = 0;
    /// list.for_each_with_argument(|element, sum| *sum += element, &mut sum).unwrap();
    /// assert_eq!(sum, 6);
    /// ```
    pub fn for_each_with_argument<A, F>(&self, mut visitor: F, arg: &mut A) -> Result<()>
    where
        F: FnMut(&T, &mut A),
    {
        let view = self.read()?;
        self.visit(view.chain, |element| visitor(element, arg))
    }

    /// Calls `visitor` on every element from head to tail, under the exclusive
    /// side of the lock, so that elements may be modified in place.
    pub fn for_each_mut<F>(&self, visitor: F) -> Result<()>
    where
        F: FnMut(&mut T),
    {
        let mut chain = self.write()?;
        self.visit_mut(&mut chain, visitor)
    }

    /// Like [`List::for_each_mut`], passing `arg` to every call.
    pub fn for_each_mut_with_argument<A, F>(&self, mut visitor: F, arg: &mut A) -> Result<()>
    where
        F: FnMut(&mut T, &mut A),
    {
        let mut chain = self.write()?;
        self.visit_mut(&mut chain, |element| visitor(element, arg))
    }

    /// Asks running and future for-each traversals to stop. The flag stays set
    /// until [`List::reset_abort`].
    pub fn abort_iterations(&self) {
        self.aborted.store(true, atomic::Ordering::Release);
    }

    /// Clears the abort flag.
    pub fn reset_abort(&self) {
        self.aborted.store(false, atomic::Ordering::Release);
    }

    /// Returns `true` if the abort flag is set.
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(atomic::Ordering::Acquire)
    }

    /// Removes every element, returning them from head to tail.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let mut list = List::from_iter([1, 2, 3]);
    /// assert_eq!(list.drain().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// assert_eq!(list.is_empty(), Ok(true));
    /// ```
    pub fn drain(&mut self) -> Drain<'_, T> {
        Drain::new(self.chain_mut())
    }
}

impl<'a, T> ListView<'a, T> {
    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.chain.len
    }

    /// Returns `true` if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.chain.len == 0
    }

    /// Provides a forward iterator.
    pub fn iter(&self) -> Iter<'_, T> {
        self.chain.iter()
    }

    pub(crate) fn into_element(self, node: NonNull<Node<T>>) -> ElementRef<'a, T> {
        // SAFETY: `node` belongs to the read-locked chain, and the lock moves
        // into the returned reference.
        let element = unsafe { &(*node.as_ptr()).element };
        ElementRef {
            _guard: self._guard,
            element,
        }
    }
}

impl<T> Deref for ElementRef<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.element
    }
}

impl<T: Debug> Debug for ElementRef<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self.element, f)
    }
}

impl<T: Debug> Debug for ListView<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Deref for ChainMut<'_, T> {
    type Target = Chain<T>;

    fn deref(&self) -> &Chain<T> {
        self.chain
    }
}

impl<T> DerefMut for ChainMut<'_, T> {
    fn deref_mut(&mut self) -> &mut Chain<T> {
        self.chain
    }
}

impl<T: Debug> Debug for List<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.read() {
            Ok(view) => Debug::fmt(&view, f),
            Err(_) => f.write_str("List { <locked> }"),
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        Self::new()
    }
}

// SAFETY: the chain is only reached through the list lock. Writers may move
// elements to another thread, readers may share them.
unsafe impl<T: Send> Send for List<T> {}

unsafe impl<T: Send + Sync> Sync for List<T> {}

// Ensure that the iterators stay covariant in their element type. `List`
// itself is invariant since it holds its callbacks and an `UnsafeCell`.
#[allow(dead_code)]
fn assert_covariance() {
    fn b<'i, 'a>(x: Iter<'i, &'static str>) -> Iter<'i, &'a str> {
        x
    }
    fn c<'a>(x: IntoIter<&'static str>) -> IntoIter<&'a str> {
        x
    }
}
