use crate::list::Chain;
use std::fmt;

/// A draining iterator over the elements of a `List`, from head to tail.
///
/// This `struct` is created by [`List::drain`](crate::List::drain). Elements
/// not yet yielded are dropped together with the iterator.
pub struct Drain<'a, T: 'a> {
    chain: &'a mut Chain<T>,
}

impl<'a, T: 'a> Drain<'a, T> {
    pub(crate) fn new(chain: &'a mut Chain<T>) -> Self {
        Self { chain }
    }
}

impl<T> Iterator for Drain<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.chain.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.chain.len, Some(self.chain.len))
    }
}

impl<T> ExactSizeIterator for Drain<'_, T> {}

impl<T> Drop for Drain<'_, T> {
    fn drop(&mut self) {
        while self.chain.pop_front().is_some() {}
    }
}

impl<T: fmt::Debug> fmt::Debug for Drain<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Drain")
            .field(&self.chain.iter().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::List;

    #[test]
    fn drain_partially() {
        let mut list = List::from_iter(0..5);
        let mut drain = list.drain();
        assert_eq!(drain.len(), 5);
        assert_eq!(drain.next(), Some(0));
        assert_eq!(format!("{:?}", drain), "Drain([1, 2, 3, 4])");
        drop(drain);
        assert_eq!(list.size(), Ok(0));
        assert!(list.get_tail().unwrap().is_none());

        list.push(7).unwrap();
        assert_eq!(list.to_vec().unwrap(), vec![7]);
    }
}
