//! Process-wide defaults and the shared archive lock.
//!
//! Readers and writers take their tunables from explicit configuration
//! structs; the values here only seed those structs' `Default` impls.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// Default size of one memory-mapped copy window, in bytes.
pub const DEFAULT_COPY_BUFFER_SIZE: usize = 4_096_000;

static COPY_BUFFER_SIZE: AtomicUsize = AtomicUsize::new(DEFAULT_COPY_BUFFER_SIZE);

static ARCHIVE_LOCK: Mutex<()> = Mutex::new(());

/// Current process-wide copy-buffer size.
pub fn copy_buffer_size() -> usize {
    COPY_BUFFER_SIZE.load(Ordering::Relaxed)
}

/// Change the process-wide copy-buffer size.
///
/// Affects configurations created afterwards. Zero is ignored.
pub fn set_copy_buffer_size(bytes: usize) {
    if bytes > 0 {
        COPY_BUFFER_SIZE.store(bytes, Ordering::Relaxed);
    }
}

/// Acquire the lock serializing archive header I/O and text encoding.
///
/// A poisoned lock is recovered: the guarded state is `()`.
pub(crate) fn archive_lock() -> MutexGuard<'static, ()> {
    ARCHIVE_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_copy_buffer_is_ignored() {
        let before = copy_buffer_size();
        set_copy_buffer_size(0);
        assert_eq!(copy_buffer_size(), before);
    }

    #[test]
    fn test_archive_lock_is_reacquirable() {
        drop(archive_lock());
        let _guard = archive_lock();
    }
}
