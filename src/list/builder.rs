use std::cmp::Ordering;
use std::fmt;

use crate::list::{Comparator, Equality, List};

/// Configures and builds a [`List`].
///
/// Everything is optional: a list without a comparator cannot be sorted, a
/// list without an equality predicate cannot be searched by value, and a list
/// without concurrency support refuses overlapping access instead of waiting
/// for it.
///
/// # Examples
///
/// ```
/// use llist::{List, SortOrder};
///
/// let list = List::builder()
///     .comparator(|a: &&str, b: &&str| a.len().cmp(&b.len()))
///     .build();
/// list.extend_from(["ccc", "a", "bb"]).unwrap();
/// list.sort(SortOrder::Ascending).unwrap();
/// assert_eq!(list.to_vec().unwrap(), vec!["a", "bb", "ccc"]);
/// ```
pub struct ListBuilder<T> {
    comparator: Option<Comparator<T>>,
    equality: Option<Equality<T>>,
    concurrent: bool,
}

impl<T> ListBuilder<T> {
    pub fn new() -> Self {
        Self {
            comparator: None,
            equality: None,
            concurrent: false,
        }
    }

    /// Sets the comparator used by sorting, merging and min/max queries.
    pub fn comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        self.comparator = Some(Box::new(comparator));
        self
    }

    /// Sets the equality predicate used by find and delete. It is called as
    /// `equal(node_element, target)`.
    pub fn equality<F>(mut self, equality: F) -> Self
    where
        F: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.equality = Some(Box::new(equality));
        self
    }

    /// Uses [`Ord`] and [`PartialEq`] of the element type as comparator and
    /// equality predicate.
    pub fn ordered(self) -> Self
    where
        T: Ord + 'static,
    {
        self.comparator(T::cmp).equality(T::eq)
    }

    /// Enables or disables the reader/writer lock.
    pub fn concurrent(mut self, concurrent: bool) -> Self {
        self.concurrent = concurrent;
        self
    }

    pub fn build(self) -> List<T> {
        List::from_parts(self.comparator, self.equality, self.concurrent)
    }
}

impl<T> Default for ListBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ListBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListBuilder")
            .field("comparator", &self.comparator.is_some())
            .field("equality", &self.equality.is_some())
            .field("concurrent", &self.concurrent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{ListBuilder, ListError, SortOrder};

    #[test]
    fn builder_defaults() {
        let list = ListBuilder::<i32>::default().build();
        assert!(!list.is_concurrent());
        list.extend_from([2, 1]).unwrap();
        assert_eq!(list.sort(SortOrder::Ascending), Err(ListError::ComparatorMissing));
        assert_eq!(list.find_node(&1).err(), Some(ListError::EqualityMissing));
    }

    #[test]
    fn builder_ordered() {
        let list = ListBuilder::new().ordered().concurrent(true).build();
        assert!(list.is_concurrent());
        list.extend_from([3, 1, 2]).unwrap();
        list.sort(SortOrder::Ascending).unwrap();
        assert_eq!(list.to_vec().unwrap(), vec![1, 2, 3]);
        assert_eq!(list.find_node(&2).map(|e| *e), Ok(2));
    }

    #[test]
    fn builder_debug() {
        let builder = ListBuilder::<u8>::new().equality(|a, b| a == b);
        assert_eq!(
            format!("{:?}", builder),
            "ListBuilder { comparator: false, equality: true, concurrent: false }"
        );
    }
}
