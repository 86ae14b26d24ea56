use crate::error::{ListError, Result};
use crate::list::{ElementRef, List};
use std::cmp::Ordering;

pub use self::drain::Drain;

mod drain;
mod sort;

/// Direction of [`List::sort`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Which end of the order [`List::get_min_max`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extreme {
    Min,
    Max,
}

impl SortOrder {
    /// Whether `ordering` between an earlier and a later element keeps them in
    /// place. Equal elements always stay in place.
    fn keeps(self, ordering: Ordering) -> bool {
        match self {
            SortOrder::Ascending => ordering != Ordering::Greater,
            SortOrder::Descending => ordering != Ordering::Less,
        }
    }
}

impl<T> List<T> {
    /// Sorts the list with its comparator.
    ///
    /// This sort is stable (i.e., does not reorder equal elements), in both
    /// directions.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1) memory.
    ///
    /// # Current Implementation
    ///
    /// The current algorithm is a bottom-up merge sort over the links. There is
    /// no extra temporary storage during merging.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::{List, SortOrder};
    ///
    /// let list = List::builder().ordered().build();
    /// list.extend_from([3, 2, 1, 4, 5]).unwrap();
    ///
    /// list.sort(SortOrder::Ascending).unwrap();
    /// assert_eq!(list.to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
    ///
    /// list.sort(SortOrder::Descending).unwrap();
    /// assert_eq!(list.to_vec().unwrap(), vec![5, 4, 3, 2, 1]);
    /// ```
    pub fn sort(&self, order: SortOrder) -> Result<()> {
        let compare = self.comparator().ok_or(ListError::ComparatorMissing)?;
        let mut chain = self.write()?;
        sort::merge_sort(&mut chain, |a, b| order.keeps(compare(a, b)));
        tracing::debug!(?order, len = chain.len, "list sorted");
        Ok(())
    }

    /// Reverses the order of the elements in place.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(*n*) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let list = List::from_iter([1, 2, 3]);
    /// list.reverse().unwrap();
    /// assert_eq!(list.to_vec().unwrap(), vec![3, 2, 1]);
    /// ```
    pub fn reverse(&self) -> Result<()> {
        let mut chain = self.write()?;
        chain.reverse();
        tracing::debug!(len = chain.len, "list reversed");
        Ok(())
    }

    /// Moves all elements from `other` to the end of the list.
    ///
    /// This reuses all the nodes from `other` and moves them into `self`. After
    /// this operation, `other` is empty but still usable.
    ///
    /// Both lists are write-locked, always in the same (address) order, so
    /// concurrent `a.concat(&b)` and `b.concat(&a)` cannot deadlock.
    ///
    /// # Errors
    ///
    /// Returns [`ListError::SameList`] if `other` is `self`.
    ///
    /// # Complexity
    ///
    /// This operation should compute in *O*(1) time and *O*(1) memory.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let first = List::from_iter([1, 2]);
    /// let second = List::from_iter([3, 4]);
    /// first.concat(&second).unwrap();
    ///
    /// assert_eq!(first.to_vec().unwrap(), vec![1, 2, 3, 4]);
    /// assert_eq!(second.is_empty(), Ok(true));
    /// ```
    pub fn concat(&self, other: &List<T>) -> Result<()> {
        let (mut chain, mut other) = List::write_pair(self, other)?;
        let moved = other.len;
        chain.append(&mut other);
        tracing::debug!(moved, len = chain.len, "lists concatenated");
        Ok(())
    }

    /// Merges `other` into the list. Both lists must already be sorted in
    /// ascending order by the comparator of `self`; the result is too.
    ///
    /// The merge is stable: on ties, elements of `self` come first. After this
    /// operation, `other` is empty but still usable.
    ///
    /// # Errors
    ///
    /// - [`ListError::ComparatorMissing`] if `self` has no comparator;
    /// - [`ListError::SameList`] if `other` is `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::List;
    ///
    /// let first = List::builder().ordered().build();
    /// first.extend_from([1, 4, 6]).unwrap();
    /// let second = List::from_iter([2, 3, 7]);
    ///
    /// first.merge(&second).unwrap();
    /// assert_eq!(first.to_vec().unwrap(), vec![1, 2, 3, 4, 6, 7]);
    /// assert_eq!(second.size(), Ok(0));
    /// ```
    pub fn merge(&self, other: &List<T>) -> Result<()> {
        let compare = self.comparator().ok_or(ListError::ComparatorMissing)?;
        let (mut chain, mut other) = List::write_pair(self, other)?;
        sort::merge_sorted(&mut chain, &mut other, |a, b| {
            SortOrder::Ascending.keeps(compare(a, b))
        });
        tracing::debug!(len = chain.len, "lists merged");
        Ok(())
    }

    /// Finds the smallest or the largest element with a single scan. On ties,
    /// the element closest to the head wins.
    ///
    /// # Errors
    ///
    /// - [`ListError::ComparatorMissing`] if the list has no comparator;
    /// - [`ListError::NodeNotFound`] if the list is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use llist::{Extreme, List, ListError};
    ///
    /// let list = List::builder().ordered().build();
    /// assert_eq!(list.get_min_max(Extreme::Max).err(), Some(ListError::NodeNotFound));
    ///
    /// list.extend_from([3, 9, 1, 4]).unwrap();
    /// assert_eq!(*list.get_min_max(Extreme::Max).unwrap(), 9);
    /// assert_eq!(*list.get_min_max(Extreme::Min).unwrap(), 1);
    /// ```
    pub fn get_min_max(&self, extreme: Extreme) -> Result<ElementRef<'_, T>> {
        let compare = self.comparator().ok_or(ListError::ComparatorMissing)?;
        let replaces = match extreme {
            Extreme::Min => Ordering::Less,
            Extreme::Max => Ordering::Greater,
        };
        let view = self.read()?;
        let mut best = view.chain.head.ok_or(ListError::NodeNotFound)?;
        let mut current = view.chain.head;
        while let Some(node) = current {
            // SAFETY: the chain is read-locked, and every node reachable from
            // its head is valid.
            let (node_ref, best_ref) = unsafe { (node.as_ref(), best.as_ref()) };
            if compare(&node_ref.element, &best_ref.element) == replaces {
                best = node;
            }
            current = node_ref.next;
        }
        Ok(view.into_element(best))
    }

    /// Shorthand for `get_min_max(Extreme::Min)`.
    pub fn get_min(&self) -> Result<ElementRef<'_, T>> {
        self.get_min_max(Extreme::Min)
    }

    /// Shorthand for `get_min_max(Extreme::Max)`.
    pub fn get_max(&self) -> Result<ElementRef<'_, T>> {
        self.get_min_max(Extreme::Max)
    }
}
