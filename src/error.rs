use thiserror::Error;

/// The failure kinds returned by [`List`](crate::List) operations.
///
/// A successful operation is simply `Ok(..)`; nothing in this crate aborts the
/// process on a recoverable condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum ListError {
    /// A scan over the list finished without finding a matching element.
    #[error("no matching node found in the list")]
    NodeNotFound,

    /// The operation needs an equality predicate, but the list was built
    /// without one and none was supplied with the call.
    #[error("equality predicate is missing")]
    EqualityMissing,

    /// The operation needs a comparator, but the list was built without one.
    #[error("comparator is missing")]
    ComparatorMissing,

    /// A node could not be allocated.
    #[error("node allocation failed")]
    AllocationError,

    /// The list lock could not be acquired for the requested access.
    #[error("list lock could not be acquired")]
    MultithreadIssue,

    /// A for-each traversal stopped early because the abort flag was set.
    #[error("iteration aborted")]
    IterationsAborted,

    /// The operation is reserved but has no implementation.
    #[error("operation is not implemented")]
    NotImplemented,

    /// An operation over two lists was handed the same list twice.
    #[error("both arguments refer to the same list")]
    SameList,
}

/// Shorthand for results of list operations.
pub type Result<T> = std::result::Result<T, ListError>;
