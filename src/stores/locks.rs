//! Per-account locks.
//!
//! A commit against an account runs inside its exclusive section, from the
//! first read of the account until both stores are written. Service-level
//! reads run inside the shared section so they never see one write without
//! the other. Different accounts never contend.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;

use crate::types::AccountNumber;

#[derive(Default)]
pub struct AccountLocks {
    locks: Mutex<HashMap<AccountNumber, Arc<RwLock<()>>>>,
}

impl AccountLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while no other caller is inside any section for the account.
    pub fn exclusive<T>(&self, number: &AccountNumber, f: impl FnOnce() -> T) -> T {
        let entry = self.entry(number);
        let _guard = entry.lock.write();
        f()
    }

    /// Runs `f` while no commit against the account is in progress.
    pub fn shared<T>(&self, number: &AccountNumber, f: impl FnOnce() -> T) -> T {
        let entry = self.entry(number);
        let _guard = entry.lock.read();
        f()
    }

    /// Number of accounts with a caller inside or waiting on a section.
    pub fn len(&self) -> usize {
        self.locks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The registry mutex is released before the account lock is taken.
    fn entry<'a>(&'a self, number: &'a AccountNumber) -> Entry<'a> {
        let lock = self
            .locks
            .lock()
            .entry(number.clone())
            .or_default()
            .clone();
        Entry {
            locks: self,
            number,
            lock,
        }
    }
}

/// A registry lock held for the length of one section. The last holder
/// removes the account from the registry.
struct Entry<'a> {
    locks: &'a AccountLocks,
    number: &'a AccountNumber,
    lock: Arc<RwLock<()>>,
}

impl Drop for Entry<'_> {
    fn drop(&mut self) {
        let mut locks = self.locks.locks.lock();
        // Clones are only handed out under the registry mutex, so a count of
        // two (the registry and this entry) means nobody else can reach it.
        let registered = locks
            .get(self.number)
            .is_some_and(|lock| Arc::ptr_eq(lock, &self.lock));
        if registered && Arc::strong_count(&self.lock) == 2 {
            locks.remove(self.number);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_same_account_is_exclusive() {
        let locks = Arc::new(AccountLocks::new());
        let number = AccountNumber::new("01000001").unwrap();
        let inside = Arc::new(AtomicUsize::new(0));
        let max_inside = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let (locks, number) = (locks.clone(), number.clone());
                let (inside, max_inside) = (inside.clone(), max_inside.clone());
                thread::spawn(move || {
                    locks.exclusive(&number, || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_inside.fetch_max(now, Ordering::SeqCst);
                        thread::sleep(Duration::from_millis(2));
                        inside.fetch_sub(1, Ordering::SeqCst);
                    })
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(max_inside.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_different_accounts_do_not_block() {
        let locks = AccountLocks::new();
        let first = AccountNumber::new("01000001").unwrap();
        let second = AccountNumber::new("01000002").unwrap();
        // would deadlock if the accounts shared a lock
        let value = locks.exclusive(&first, || locks.exclusive(&second, || 42));
        assert_eq!(value, 42);
    }

    #[test]
    fn test_readers_share() {
        let locks = AccountLocks::new();
        let number = AccountNumber::new("01000001").unwrap();
        let value = locks.shared(&number, || locks.shared(&number, || "both"));
        assert_eq!(value, "both");
    }

    #[test]
    fn test_registry_drops_idle_accounts() {
        let locks = AccountLocks::new();
        for n in 0..1000 {
            let number = AccountNumber::new(&format!("01{n:06}")).unwrap();
            locks.shared(&number, || ());
            locks.exclusive(&number, || ());
        }
        assert!(locks.is_empty());
    }

    #[test]
    fn test_registry_keeps_accounts_in_use() {
        let locks = AccountLocks::new();
        let number = AccountNumber::new("01000001").unwrap();
        locks.shared(&number, || {
            assert_eq!(locks.len(), 1);
            locks.shared(&number, || assert_eq!(locks.len(), 1));
            // the outer section still holds the account
            assert_eq!(locks.len(), 1);
        });
        assert!(locks.is_empty());
    }

    #[test]
    fn test_registry_empties_after_contention() {
        let locks = Arc::new(AccountLocks::new());
        let number = AccountNumber::new("01000001").unwrap();
        let counter = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let (locks, number, counter) = (locks.clone(), number.clone(), counter.clone());
                thread::spawn(move || {
                    for _ in 0..100 {
                        locks.exclusive(&number, || {
                            counter.fetch_add(1, Ordering::SeqCst);
                        });
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(counter.load(Ordering::SeqCst), 1600);
        assert!(locks.is_empty());
    }
}
