use crate::list::{Chain, Link, Node};
use std::ptr::NonNull;

/// A chain under construction, built by appending detached nodes.
struct Run<T> {
    head: Link<T>,
    tail: Link<T>,
}

impl<T> Run<T> {
    fn new() -> Self {
        Self {
            head: None,
            tail: None,
        }
    }

    /// Appends `node` after the current tail. The `next` link of `node` is left
    /// as is until another node is appended or the run is finished.
    unsafe fn push(&mut self, node: NonNull<Node<T>>) {
        match self.tail {
            Some(mut tail) => tail.as_mut().next = Some(node),
            None => self.head = Some(node),
        }
        self.tail = Some(node);
    }

    /// Appends `count` nodes starting from `from`, following their links.
    unsafe fn push_counted(&mut self, mut from: Link<T>, count: usize) {
        for _ in 0..count {
            let Some(node) = from else { break };
            from = next_of(node);
            self.push(node);
        }
    }

    /// Appends every node reachable from `from`.
    unsafe fn push_all(&mut self, mut from: Link<T>) {
        while let Some(node) = from {
            from = next_of(node);
            self.push(node);
        }
    }

    /// Terminates the run, and stores it into `chain`, leaving the run empty.
    unsafe fn finish(&mut self, chain: &mut Chain<T>) {
        if let Some(mut tail) = self.tail {
            tail.as_mut().next = None;
        }
        chain.head = self.head.take();
        chain.tail = self.tail.take();
    }
}

unsafe fn next_of<T>(node: NonNull<Node<T>>) -> Link<T> {
    node.as_ref().next
}

unsafe fn element<'a, T>(node: NonNull<Node<T>>) -> &'a T {
    &(*node.as_ptr()).element
}

/// One pass of [`merge_sort`] over a detached chain.
///
/// The nodes are split between the merged `run`, the `left_len` nodes of the
/// left run still starting at `left`, and everything reachable from `right`.
/// Dropping the pass links all of them back into `chain`, so a comparator
/// that panics leaves every node in place and `len` correct.
struct SortPass<'c, T> {
    chain: &'c mut Chain<T>,
    run: Run<T>,
    left: Link<T>,
    left_len: usize,
    right: Link<T>,
}

impl<'c, T> SortPass<'c, T> {
    fn new(chain: &'c mut Chain<T>) -> Self {
        let right = chain.head.take();
        chain.tail = None;
        Self {
            chain,
            run: Run::new(),
            left: None,
            left_len: 0,
            right,
        }
    }
}

impl<T> Drop for SortPass<'_, T> {
    fn drop(&mut self) {
        // SAFETY: the left nodes not merged yet are exactly `left_len` nodes
        // linked from `left`, and the nodes reachable from `right` keep their
        // original links, so every node is appended exactly once.
        unsafe {
            self.run.push_counted(self.left.take(), self.left_len);
            self.left_len = 0;
            self.run.push_all(self.right.take());
            self.run.finish(self.chain);
        }
    }
}

/// Sorts the chain with a bottom-up merge sort.
///
/// Each pass merges adjacent runs of `width` nodes, doubling `width` after
/// every pass, and the sort is done after a pass with at most one merge.
/// `in_order(a, b)` tells whether `a` may stay before `b`; the left run wins
/// ties, so the sort is stable when `in_order` holds for equal elements.
///
/// If `in_order` panics, the chain keeps all of its nodes in an unspecified
/// order.
///
/// # Complexity
///
/// This operation should compute in *O*(*n* * log(*n*)) time and *O*(1) memory.
pub(crate) fn merge_sort<T, F>(chain: &mut Chain<T>, mut in_order: F)
where
    F: FnMut(&T, &T) -> bool,
{
    if chain.len < 2 {
        return;
    }
    let mut width = 1;
    loop {
        let mut merges = 0;
        let mut pass = SortPass::new(chain);

        // SAFETY: every node is reachable exactly once, either from the merged
        // `run`, from the counted `left` nodes or from `right`, and the links
        // of a node are only rewritten after it has been appended to `run`.
        unsafe {
            while let Some(start) = pass.right {
                merges += 1;

                // Step over (at most) `width` nodes to find the right run.
                pass.left = Some(start);
                pass.left_len = 0;
                while pass.left_len < width {
                    pass.left_len += 1;
                    pass.right = pass.right.and_then(|node| next_of(node));
                    if pass.right.is_none() {
                        break;
                    }
                }
                let mut right_len = width;

                loop {
                    let left = pass.left.filter(|_| pass.left_len > 0);
                    let right = pass.right.filter(|_| right_len > 0);
                    let picked = match (left, right) {
                        (None, None) => break,
                        (Some(l), Some(r)) if !in_order(element(l), element(r)) => {
                            pass.right = next_of(r);
                            right_len -= 1;
                            r
                        }
                        (Some(l), _) => {
                            pass.left = next_of(l);
                            pass.left_len -= 1;
                            l
                        }
                        (None, Some(r)) => {
                            pass.right = next_of(r);
                            right_len -= 1;
                            r
                        }
                    };
                    pass.run.push(picked);
                }
            }
        }
        drop(pass);

        if merges <= 1 {
            break;
        }
        width *= 2;
    }
    chain.check();
}

/// A merge of two detached chains into `chain`.
///
/// Dropping it appends whatever is left of `left` and then of `right` to the
/// merged run, and stores the `len` of both chains into `chain`.
struct MergePass<'c, T> {
    chain: &'c mut Chain<T>,
    run: Run<T>,
    left: Link<T>,
    right: Link<T>,
    len: usize,
}

impl<T> Drop for MergePass<'_, T> {
    fn drop(&mut self) {
        // SAFETY: the nodes reachable from `left` and `right` have not been
        // appended to `run` yet, and keep their original links.
        unsafe {
            self.run.push_all(self.left.take());
            self.run.push_all(self.right.take());
            self.run.finish(self.chain);
        }
        self.chain.len = self.len;
    }
}

/// Merges two chains sorted by `in_order` into `chain`, leaving `other`
/// empty. Elements of `chain` win ties.
///
/// If `in_order` panics, `chain` still ends up with the nodes of both chains.
///
/// # Complexity
///
/// This operation should compute in *O*(*n* + *m*) time and *O*(1) memory.
pub(crate) fn merge_sorted<T, F>(chain: &mut Chain<T>, other: &mut Chain<T>, mut in_order: F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = chain.len + other.len;
    let left = chain.head.take();
    let right = other.head.take();
    chain.tail = None;
    other.tail = None;
    other.len = 0;

    let mut pass = MergePass {
        chain,
        run: Run::new(),
        left,
        right,
        len,
    };
    // SAFETY: both chains are detached from their owners above, and every
    // node is appended to `run` exactly once.
    unsafe {
        loop {
            let picked = match (pass.left, pass.right) {
                (None, None) => break,
                (Some(l), Some(r)) if !in_order(element(l), element(r)) => {
                    pass.right = next_of(r);
                    r
                }
                (Some(l), _) => {
                    pass.left = next_of(l);
                    l
                }
                (None, Some(r)) => {
                    pass.right = next_of(r);
                    r
                }
            };
            pass.run.push(picked);
        }
    }
    drop(pass);
    chain.check();
    other.check();
}
