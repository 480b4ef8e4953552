use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

struct Flight<K, T> {
    key: K,
    future: Shared<BoxFuture<'static, T>>,
    waiters: usize,
}

/// Coalesces concurrent executions of one side effect per key.
///
/// The first caller for a key installs the future; callers arriving with the
/// same key while it is in flight await the same shared future. A caller with
/// a different key starts its own execution and takes over the slot. The slot
/// is emptied when its last waiter finishes or is dropped, so an abandoned
/// execution is never joined later.
pub(crate) struct SingleFlight<K, T: Clone> {
    slot: Mutex<Option<Flight<K, T>>>,
}

impl<K, T> SingleFlight<K, T>
where
    K: PartialEq,
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Join the in-flight execution for `key`, or start one with `start`.
    pub(crate) async fn run<F>(&self, key: K, start: impl FnOnce() -> F) -> T
    where
        F: Future<Output = T> + Send + 'static,
    {
        let future = {
            let mut slot = self.lock();
            match slot.as_mut() {
                Some(flight) if flight.key == key => {
                    flight.waiters += 1;
                    flight.future.clone()
                }
                _ => {
                    let future = start().boxed().shared();
                    *slot = Some(Flight {
                        key,
                        future: future.clone(),
                        waiters: 1,
                    });
                    future
                }
            }
        };

        let _waiter = Waiter {
            owner: self,
            future: future.clone(),
        };
        future.await
    }

    fn lock(&self) -> MutexGuard<'_, Option<Flight<K, T>>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Releases one waiter's claim on the slot, on completion or drop.
struct Waiter<'a, K, T: Clone> {
    owner: &'a SingleFlight<K, T>,
    future: Shared<BoxFuture<'static, T>>,
}

impl<K, T: Clone> Drop for Waiter<'_, K, T> {
    fn drop(&mut self) {
        let mut slot = self
            .owner
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let last = match slot.as_mut() {
            Some(flight) if flight.future.ptr_eq(&self.future) => {
                flight.waiters -= 1;
                flight.waiters == 0
            }
            _ => false,
        };
        if last {
            slot.take();
        }
    }
}
