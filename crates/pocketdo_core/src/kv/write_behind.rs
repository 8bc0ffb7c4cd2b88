//! Write-behind adapter: fire-and-forget writes applied in order by a worker.
//!
//! # Responsibility
//! - Run any [`KvStore`] on a dedicated worker thread.
//! - Acknowledge writes on enqueue and apply them in FIFO order.
//! - Keep failures of already-acknowledged writes until [`KvStore::flush`].
//!
//! # Invariants
//! - Every command travels through one channel to one worker, so two writes
//!   to the same key are applied in the order they were issued.
//! - A `load` observes every write enqueued before it.
//! - Dropping the last handle blocks until the worker has applied every
//!   queued write, so a store reopened afterwards sees all of them.

use super::{KvError, KvResult, KvStore};
use log::{debug, warn};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

const WORKER_THREAD_NAME: &str = "pocketdo-kv";

enum Command {
    Load {
        key: String,
        reply: mpsc::Sender<KvResult<Option<String>>>,
    },
    Store {
        key: String,
        value: String,
    },
    Flush {
        reply: mpsc::Sender<()>,
    },
}

/// Joins the worker once the last handle is gone.
struct WorkerGuard {
    handle: Option<JoinHandle<()>>,
}

impl Drop for WorkerGuard {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("event=kv_worker module=kv status=error reason=worker_panicked");
            }
        }
    }
}

/// Clonable handle to a write-behind worker.
// Fields drop in declaration order: the sender closes before the guard joins.
#[derive(Clone)]
pub struct WriteBehindKv {
    tx: mpsc::Sender<Command>,
    failures: Arc<Mutex<Vec<KvError>>>,
    _worker: Arc<WorkerGuard>,
}

impl WriteBehindKv {
    /// Moves `inner` onto a new worker thread.
    ///
    /// # Errors
    /// - [`KvError::Backend`] when the thread cannot be spawned.
    pub fn spawn<S>(inner: S) -> KvResult<Self>
    where
        S: KvStore + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<Command>();
        let failures = Arc::new(Mutex::new(Vec::new()));
        let worker_failures = Arc::clone(&failures);

        let handle = thread::Builder::new()
            .name(WORKER_THREAD_NAME.to_owned())
            .spawn(move || run_worker(inner, rx, worker_failures))
            .map_err(|err| KvError::Backend(format!("failed to spawn storage worker: {err}")))?;

        Ok(Self {
            tx,
            failures,
            _worker: Arc::new(WorkerGuard {
                handle: Some(handle),
            }),
        })
    }

    /// Number of failed writes not yet reported by `flush`.
    pub fn pending_failures(&self) -> usize {
        self.failures
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn take_first_failure(&self) -> KvResult<()> {
        let mut failures = self.failures.lock().unwrap_or_else(PoisonError::into_inner);
        if failures.is_empty() {
            return Ok(());
        }
        let dropped = failures.len() - 1;
        let first = failures.remove(0);
        failures.clear();
        if dropped > 0 {
            warn!("event=kv_flush module=kv status=error reported=1 suppressed={dropped}");
        }
        Err(first)
    }
}

impl KvStore for WriteBehindKv {
    fn load(&self, key: &str) -> KvResult<Option<String>> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Command::Load {
                key: key.to_string(),
                reply: reply_tx,
            })
            .map_err(|_| KvError::WorkerUnavailable)?;
        reply_rx.recv().map_err(|_| KvError::WorkerUnavailable)?
    }

    fn store(&self, key: &str, value: &str) -> KvResult<()> {
        self.tx
            .send(Command::Store {
                key: key.to_string(),
                value: value.to_string(),
            })
            .map_err(|_| KvError::WorkerUnavailable)
    }

    fn flush(&self) -> KvResult<()> {
        let (reply_tx, reply_rx) = mpsc::channel();
        self.tx
            .send(Command::Flush { reply: reply_tx })
            .map_err(|_| KvError::WorkerUnavailable)?;
        reply_rx.recv().map_err(|_| KvError::WorkerUnavailable)?;
        self.take_first_failure()
    }
}

fn run_worker<S: KvStore>(
    inner: S,
    rx: mpsc::Receiver<Command>,
    failures: Arc<Mutex<Vec<KvError>>>,
) {
    debug!("event=kv_worker module=kv status=start");
    while let Ok(command) = rx.recv() {
        match command {
            Command::Load { key, reply } => {
                let _ = reply.send(inner.load(&key));
            }
            Command::Store { key, value } => {
                if let Err(err) = inner.store(&key, &value) {
                    warn!(
                        "event=kv_store module=kv status=error key={key} bytes={} error={err}",
                        value.len()
                    );
                    failures
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(KvError::Deferred {
                            key,
                            source: Box::new(err),
                        });
                }
            }
            Command::Flush { reply } => {
                let flushed = inner.flush();
                if let Err(err) = flushed {
                    failures
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .push(err);
                }
                let _ = reply.send(());
            }
        }
    }
    debug!("event=kv_worker module=kv status=stop");
}

#[cfg(test)]
mod tests {
    use super::WriteBehindKv;
    use crate::kv::{KvError, KvResult, KvStore, MemoryKvStore};
    use std::sync::Arc;

    struct RejectKey(&'static str, MemoryKvStore);

    impl KvStore for RejectKey {
        fn load(&self, key: &str) -> KvResult<Option<String>> {
            self.1.load(key)
        }

        fn store(&self, key: &str, value: &str) -> KvResult<()> {
            if key == self.0 {
                return Err(KvError::Backend("disk full".to_string()));
            }
            self.1.store(key, value)
        }
    }

    #[test]
    fn sequential_writes_to_one_key_keep_the_last_value() {
        let backing = Arc::new(MemoryKvStore::new());
        let kv = WriteBehindKv::spawn(Arc::clone(&backing)).expect("worker should start");

        for round in 0..100 {
            kv.store("tasks", &format!("[{round}]"))
                .expect("enqueue should succeed");
        }
        kv.flush().expect("flush should succeed");

        assert_eq!(
            backing.load("tasks").expect("read should succeed").as_deref(),
            Some("[99]")
        );
    }

    #[test]
    fn load_observes_earlier_queued_write() {
        let kv = WriteBehindKv::spawn(MemoryKvStore::new()).expect("worker should start");
        kv.store("projects", "[]").expect("enqueue should succeed");
        assert_eq!(
            kv.load("projects").expect("read should succeed").as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn failed_write_is_reported_once_by_flush() {
        let kv = WriteBehindKv::spawn(RejectKey("tasks", MemoryKvStore::new()))
            .expect("worker should start");

        kv.store("tasks", "[]").expect("enqueue is acknowledged even if the write fails");
        let err = kv.flush().expect_err("deferred failure should surface");
        assert!(matches!(err, KvError::Deferred { ref key, .. } if key == "tasks"));

        kv.flush().expect("failure is reported only once");
        assert_eq!(kv.pending_failures(), 0);
    }

    #[test]
    fn dropping_last_handle_applies_queued_writes() {
        let backing = Arc::new(MemoryKvStore::new());
        let kv = WriteBehindKv::spawn(Arc::clone(&backing)).expect("worker should start");
        let clone = kv.clone();

        for round in 0..200 {
            kv.store("tasks", &format!("[{round}]"))
                .expect("enqueue should succeed");
        }
        drop(kv);
        clone.store("projects", "[]").expect("enqueue should succeed");
        drop(clone);

        assert_eq!(
            backing.load("tasks").expect("read should succeed").as_deref(),
            Some("[199]")
        );
        assert_eq!(
            backing.load("projects").expect("read should succeed").as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn clones_share_one_ordered_queue() {
        let backing = Arc::new(MemoryKvStore::new());
        let first = WriteBehindKv::spawn(Arc::clone(&backing)).expect("worker should start");
        let second = first.clone();

        first.store("tasks", "[1]").expect("enqueue should succeed");
        second.store("tasks", "[2]").expect("enqueue should succeed");
        second.flush().expect("flush should succeed");

        assert_eq!(
            backing.load("tasks").expect("read should succeed").as_deref(),
            Some("[2]")
        );
    }
}
