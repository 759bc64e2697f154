//! Single-value handoff between producer threads and the render thread.
//!
//! Two flavors:
//! - [`LatestCell`]: always holds a value; readers see the most recent write.
//! - [`Mailbox`]: holds at most one undelivered value; a newer post replaces an
//!   unread one, and taking it empties the slot.
//!
//! Render-side reads never wait on a writer. A contended read returns what the
//! reader saw last (cell) or nothing this time (mailbox), so a consumer may be
//! one producer period behind but never sees a torn value.

use std::sync::Arc;

use parking_lot::Mutex;

/// Shared latest-value cell. Clones share the same storage.
#[derive(Debug)]
pub struct LatestCell<T> {
    inner: Arc<Mutex<T>>,
}

impl<T> Clone for LatestCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Copy> LatestCell<T> {
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Overwrites the stored value.
    pub fn publish(&self, value: T) {
        *self.inner.lock() = value;
    }

    /// Current value. May briefly wait for a concurrent `publish`; render-thread
    /// code should go through a [`LatestReader`] instead.
    pub fn load(&self) -> T {
        *self.inner.lock()
    }

    /// Non-blocking reader starting from the current value.
    pub fn reader(&self) -> LatestReader<T> {
        LatestReader {
            last: self.load(),
            cell: self.clone(),
        }
    }
}

/// Render-side view of a [`LatestCell`].
#[derive(Debug)]
pub struct LatestReader<T> {
    cell: LatestCell<T>,
    last: T,
}

impl<T: Copy> LatestReader<T> {
    /// Latest value, or the previously read one if a writer holds the lock.
    pub fn read(&mut self) -> T {
        if let Some(guard) = self.cell.inner.try_lock() {
            self.last = *guard;
        }
        self.last
    }
}

/// Single-slot channel. Clones share the same slot.
#[derive(Debug)]
pub struct Mailbox<T> {
    slot: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for Mailbox<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Mailbox<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> Mailbox<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the unread value it displaced, if any.
    pub fn post(&self, value: T) -> Option<T> {
        self.slot.lock().replace(value)
    }

    /// Takes the pending value without waiting. Returns `None` when the slot is
    /// empty or a producer is mid-post; in the latter case the value stays for
    /// the next take.
    pub fn try_take(&self) -> Option<T> {
        self.slot.try_lock().and_then(|mut slot| slot.take())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_reader_sees_last_publish() {
        let cell = LatestCell::new(0u32);
        let mut reader = cell.reader();
        cell.publish(1);
        cell.publish(2);
        assert_eq!(reader.read(), 2);
    }

    #[test]
    fn contended_read_returns_previous_value() {
        let cell = LatestCell::new(5u32);
        let mut reader = cell.reader();

        let guard = cell.inner.lock();
        assert_eq!(reader.read(), 5);
        drop(guard);

        cell.publish(6);
        assert_eq!(reader.read(), 6);
    }

    #[test]
    fn cell_crosses_threads() {
        let cell = LatestCell::new(0u64);
        let writer = cell.clone();
        std::thread::spawn(move || {
            for i in 1..=100 {
                writer.publish(i);
            }
        })
        .join()
        .unwrap();
        assert_eq!(cell.reader().read(), 100);
    }

    #[test]
    fn mailbox_keeps_only_newest() {
        let mailbox = Mailbox::new();
        assert_eq!(mailbox.post(1), None);
        assert_eq!(mailbox.post(2), Some(1));
        assert_eq!(mailbox.try_take(), Some(2));
        assert_eq!(mailbox.try_take(), None);
    }

    #[test]
    fn mailbox_take_while_locked_leaves_value() {
        let mailbox = Mailbox::new();
        mailbox.post("pose");

        let guard = mailbox.slot.lock();
        assert_eq!(mailbox.try_take(), None);
        drop(guard);

        assert_eq!(mailbox.try_take(), Some("pose"));
        assert_eq!(mailbox.try_take(), None);
    }
}
