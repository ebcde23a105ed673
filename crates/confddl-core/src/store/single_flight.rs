//! Share one in-flight operation between concurrent callers.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};

type Pending<T> = Shared<BoxFuture<'static, T>>;

/// At most one operation runs at a time; callers arriving while it runs
/// await the same result. The slot is cleared when the operation finishes,
/// whether it returns or panics, so the next call starts fresh. A panic is
/// re-raised in every caller that joined the run.
pub struct SingleFlight<T: Clone> {
    slot: Arc<Mutex<Option<Pending<T>>>>,
}

impl<T: Clone> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

fn lock<T>(slot: &Mutex<T>) -> MutexGuard<'_, T> {
    slot.lock().unwrap_or_else(|e| e.into_inner())
}

impl<T> SingleFlight<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.slot).is_some()
    }

    /// Join the running operation, or start one with `start`.
    pub async fn run<F, Fut>(&self, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        let pending = {
            let mut slot = lock(&self.slot);
            match slot.as_ref() {
                Some(pending) => pending.clone(),
                None => {
                    let release = Arc::clone(&self.slot);
                    let operation = start();
                    let pending = async move {
                        let output = AssertUnwindSafe(operation).catch_unwind().await;
                        *lock(&release) = None;
                        match output {
                            Ok(output) => output,
                            Err(payload) => panic::resume_unwind(payload),
                        }
                    }
                    .boxed()
                    .shared();
                    *slot = Some(pending.clone());
                    pending
                }
            }
        };
        pending.await
    }
}
