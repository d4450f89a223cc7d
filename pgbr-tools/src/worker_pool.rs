//! A fixed-size thread pool that runs a shared handler closure in parallel (C1).
//!
//! Grounded on the teacher's `ParallelHandler`: a bounded channel feeds `threads` worker
//! threads, the first error raised by any of them aborts further sends, and `wait()` is the
//! barrier every caller must cross before touching state the workers may still be reading.
//!
//! Unlike the teacher's version, a pool may be constructed with zero worker threads: per §5,
//! "when the configured worker count is zero, actions execute inline on the caller thread —
//! semantics are identical, only throughput differs." We fold that into `add()` rather than
//! special-casing call sites.

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{bail, format_err, Error};
use crossbeam_channel::{bounded, Sender};

type HandlerFn<I> = Arc<dyn Fn(I) -> Result<(), Error> + Send + Sync>;

enum Dispatch<I> {
    Inline(HandlerFn<I>),
    Parallel {
        sender: Sender<I>,
        handles: Vec<JoinHandle<()>>,
    },
}

/// The fixed-size worker dispatcher consumed by the link engine (C4) and the delete workflow
/// (C7). `init(n)` creates it, `add` enqueues non-blockingly, `wait` is the barrier, and
/// dropping it calls the equivalent of `destroy`.
pub struct WorkerPool<I> {
    name: String,
    abort: Arc<Mutex<Option<String>>>,
    dispatch: Option<Dispatch<I>>,
}

fn record_first_error(abort: &Mutex<Option<String>>, err: Error) {
    let mut guard = abort.lock().unwrap();
    if guard.is_none() {
        *guard = Some(err.to_string());
    }
}

fn check_abort(abort: &Mutex<Option<String>>) -> Result<(), Error> {
    let guard = abort.lock().unwrap();
    if let Some(msg) = &*guard {
        return Err(format_err!("{msg}"));
    }
    Ok(())
}

impl<I: Send + 'static> WorkerPool<I> {
    /// `init(n)`: `threads == 0` makes every subsequent `add()` run inline.
    pub fn init<F>(name: &str, threads: usize, handler_fn: F) -> Self
    where
        F: Fn(I) -> Result<(), Error> + Send + Sync + 'static,
    {
        let handler_fn: HandlerFn<I> = Arc::new(handler_fn);
        let abort = Arc::new(Mutex::new(None));

        let dispatch = if threads == 0 {
            Dispatch::Inline(handler_fn)
        } else {
            let (sender, receiver) = bounded::<I>(threads);
            let mut handles = Vec::with_capacity(threads);
            for i in 0..threads {
                let receiver = receiver.clone();
                let abort = Arc::clone(&abort);
                let handler_fn = Arc::clone(&handler_fn);
                handles.push(
                    std::thread::Builder::new()
                        .name(format!("{name} ({i})"))
                        .spawn(move || {
                            while let Ok(input) = receiver.recv() {
                                if let Err(err) = handler_fn(input) {
                                    record_first_error(&abort, err);
                                }
                            }
                        })
                        .expect("failed to spawn worker thread"),
                );
            }
            Dispatch::Parallel { sender, handles }
        };

        Self {
            name: name.to_string(),
            abort,
            dispatch: Some(dispatch),
        }
    }

    /// Non-blocking enqueue; runs inline if the pool has no worker threads.
    pub fn add(&self, input: I) -> Result<(), Error> {
        check_abort(&self.abort)?;
        let dispatch = match self.dispatch.as_ref() {
            Some(dispatch) => dispatch,
            None => bail!("worker pool '{}' already drained by wait()", self.name),
        };
        match dispatch {
            Dispatch::Inline(handler_fn) => {
                if let Err(err) = handler_fn(input) {
                    record_first_error(&self.abort, err);
                    return check_abort(&self.abort);
                }
                Ok(())
            }
            Dispatch::Parallel { sender, .. } => match sender.send(input) {
                Ok(()) => Ok(()),
                Err(_) => bail!("worker pool '{}' channel closed", self.name),
            },
        }
    }

    /// Barrier: drains the channel and waits for every worker thread to finish its queue.
    /// Must be called (or the pool dropped) before any post-traversal bookkeeping (§5).
    pub fn wait(&mut self) -> Result<(), Error> {
        match self.dispatch.take() {
            Some(Dispatch::Parallel { sender, handles }) => {
                drop(sender);
                let panics = join_all(handles, &self.name);
                check_abort(&self.abort)?;
                if !panics.is_empty() {
                    bail!("{}", panics.join("\n"));
                }
                Ok(())
            }
            Some(inline @ Dispatch::Inline(_)) => {
                self.dispatch = Some(inline);
                check_abort(&self.abort)
            }
            None => check_abort(&self.abort),
        }
    }

    /// Releases all resources. Must follow a `wait()` (§6); implemented as `Drop` so every
    /// exit path, including error returns, still joins outstanding threads.
    pub fn destroy(self) -> Result<(), Error> {
        drop(self);
        Ok(())
    }
}

fn join_all(mut handles: Vec<JoinHandle<()>>, name: &str) -> Vec<String> {
    let mut msgs = Vec::new();
    let mut i = 0;
    while let Some(handle) = handles.pop() {
        if let Err(panic) = handle.join() {
            let msg = match panic.downcast::<&str>() {
                Ok(m) => format!("thread {name} ({i}) panicked: {m}"),
                Err(_) => format!("thread {name} ({i}) panicked"),
            };
            msgs.push(msg);
        }
        i += 1;
    }
    msgs
}

impl<I> Drop for WorkerPool<I> {
    fn drop(&mut self) {
        if let Some(Dispatch::Parallel { sender, handles }) = self.dispatch.take() {
            drop(sender);
            for handle in handles {
                let _ = handle.join();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn inline_pool_runs_on_caller_thread() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let mut pool = WorkerPool::init("test", 0, move |n: usize| {
            c.fetch_add(n, Ordering::SeqCst);
            Ok(())
        });
        for i in 1..=5 {
            pool.add(i).unwrap();
        }
        pool.wait().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 15);
    }

    #[test]
    fn parallel_pool_runs_all_items() {
        let counter = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&counter);
        let mut pool = WorkerPool::init("test", 4, move |n: usize| {
            c.fetch_add(n, Ordering::SeqCst);
            Ok(())
        });
        for i in 1..=100 {
            pool.add(i).unwrap();
        }
        pool.wait().unwrap();
        assert_eq!(counter.load(Ordering::SeqCst), 5050);
    }

    #[test]
    fn first_error_is_surfaced_and_aborts_further_sends() {
        let mut pool = WorkerPool::init("test", 0, |n: i32| {
            if n == 2 {
                anyhow::bail!("boom");
            }
            Ok(())
        });
        pool.add(1).unwrap();
        let err = pool.add(2).unwrap_err();
        assert!(err.to_string().contains("boom"));
        assert!(pool.add(3).is_err());
    }
}
