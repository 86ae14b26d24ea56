//! The per-list lock.
//!
//! A concurrent list owns a `parking_lot` reader/writer lock. Its shared side
//! is taken recursively, so a thread already holding a read guard never waits
//! behind a queued writer for another one; writers may in turn wait as long
//! as readers keep overlapping. A list built without concurrency support still
//! tracks its borrows, but with a non-blocking flag: overlapping access that
//! would otherwise race is refused with [`ListError::MultithreadIssue`]
//! instead of waiting.

use std::sync::atomic::{AtomicIsize, Ordering};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{ListError, Result};

pub(crate) enum ListLock {
    Shared(RwLock<()>),
    Local(BorrowFlag),
}

/// Borrow state of a list without concurrency support.
///
/// `0` means unused, a positive value counts the readers and `WRITING` marks
/// the single writer.
pub(crate) struct BorrowFlag(AtomicIsize);

const UNUSED: isize = 0;
const WRITING: isize = -1;

pub(crate) enum ReadGuard<'a> {
    Shared { _guard: RwLockReadGuard<'a, ()> },
    Local { _guard: LocalRead<'a> },
}

pub(crate) enum WriteGuard<'a> {
    Shared { _guard: RwLockWriteGuard<'a, ()> },
    Local { _guard: LocalWrite<'a> },
}

pub(crate) struct LocalRead<'a>(&'a AtomicIsize);

pub(crate) struct LocalWrite<'a>(&'a AtomicIsize);

impl ListLock {
    pub(crate) fn new(concurrent: bool) -> Self {
        if concurrent {
            ListLock::Shared(RwLock::new(()))
        } else {
            ListLock::Local(BorrowFlag(AtomicIsize::new(UNUSED)))
        }
    }

    pub(crate) fn is_concurrent(&self) -> bool {
        matches!(self, ListLock::Shared(_))
    }

    /// Acquires the shared side of the lock.
    pub(crate) fn read(&self) -> Result<ReadGuard<'_>> {
        match self {
            ListLock::Shared(lock) => Ok(ReadGuard::Shared {
                _guard: lock.read_recursive(),
            }),
            ListLock::Local(flag) => flag
                .try_read()
                .map(|guard| ReadGuard::Local { _guard: guard })
                .ok_or_else(|| refused("read")),
        }
    }

    /// Acquires the exclusive side of the lock.
    pub(crate) fn write(&self) -> Result<WriteGuard<'_>> {
        match self {
            ListLock::Shared(lock) => Ok(WriteGuard::Shared {
                _guard: lock.write(),
            }),
            ListLock::Local(flag) => flag
                .try_write()
                .map(|guard| WriteGuard::Local { _guard: guard })
                .ok_or_else(|| refused("write")),
        }
    }
}

impl BorrowFlag {
    fn try_read(&self) -> Option<LocalRead<'_>> {
        self.0
            .fetch_update(Ordering::Acquire, Ordering::Relaxed, |state| {
                (state >= UNUSED).then(|| state + 1)
            })
            .ok()
            .map(|_| LocalRead(&self.0))
    }

    fn try_write(&self) -> Option<LocalWrite<'_>> {
        self.0
            .compare_exchange(UNUSED, WRITING, Ordering::Acquire, Ordering::Relaxed)
            .ok()
            .map(|_| LocalWrite(&self.0))
    }
}

impl Drop for LocalRead<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Release);
    }
}

impl Drop for LocalWrite<'_> {
    fn drop(&mut self) {
        self.0.store(UNUSED, Ordering::Release);
    }
}

fn refused(access: &'static str) -> ListError {
    tracing::warn!(access, "list is already in use, refusing overlapping access");
    ListError::MultithreadIssue
}
