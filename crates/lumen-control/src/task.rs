// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! FIFO queue of deferred closures executed on the render thread.

use crossbeam_channel::{Receiver, Sender};
use std::panic::{catch_unwind, AssertUnwindSafe};

/// A deferred unit of work.
///
/// A task owns everything it captures: it runs after an arbitrary delay, on
/// another thread, and must never borrow registry-internal storage.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// A cloneable handle used to enqueue tasks from any thread.
#[derive(Debug, Clone)]
pub struct TaskSender {
    tx: Sender<Task>,
}

impl TaskSender {
    /// Enqueues a task at the back of the queue.
    pub fn add_task<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Box::new(task)).is_err() {
            log::warn!("Task queue is closed, dropping task.");
        }
    }
}

/// Ordered list of deferred closures.
///
/// Any thread may enqueue; only the render thread drains, with
/// [`run_tasks`](TaskQueue::run_tasks), exactly once per loop iteration.
#[derive(Debug)]
pub struct TaskQueue {
    tx: Sender<Task>,
    rx: Receiver<Task>,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self { tx, rx }
    }

    /// Returns a handle for enqueueing tasks.
    pub fn sender(&self) -> TaskSender {
        TaskSender {
            tx: self.tx.clone(),
        }
    }

    /// Enqueues a task at the back of the queue.
    pub fn add_task<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        // The queue holds its own receiver, so the channel can't be disconnected.
        let _ = self.tx.send(Box::new(task));
    }

    /// Returns the number of tasks waiting to be run.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    /// Runs, in FIFO order, every task that was queued when the call started.
    ///
    /// Tasks enqueued by the running tasks themselves are left for the next
    /// drain. A panicking task is logged and does not prevent the following
    /// ones from running. Returns the number of tasks executed.
    pub fn run_tasks(&self) -> usize {
        let batch = self.rx.len();
        let mut executed = 0;
        for _ in 0..batch {
            let Ok(task) = self.rx.try_recv() else {
                break;
            };
            if catch_unwind(AssertUnwindSafe(task)).is_err() {
                log::error!("A deferred task panicked; continuing with the next one.");
            }
            executed += 1;
        }
        if executed > 0 {
            log::trace!("Ran {executed} deferred task(s).");
        }
        executed
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn tasks_run_in_fifo_order() {
        let queue = TaskQueue::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let order = Arc::clone(&order);
            queue.add_task(move || order.lock().push(i));
        }

        assert_eq!(queue.pending(), 5);
        assert_eq!(queue.run_tasks(), 5);
        assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn tasks_enqueued_while_draining_wait_for_next_drain() {
        let queue = Arc::new(TaskQueue::new());
        let hits = Arc::new(Mutex::new(Vec::new()));

        let sender = queue.sender();
        let inner_hits = Arc::clone(&hits);
        let outer_hits = Arc::clone(&hits);
        queue.add_task(move || {
            outer_hits.lock().push("outer");
            sender.add_task(move || inner_hits.lock().push("inner"));
        });

        assert_eq!(queue.run_tasks(), 1);
        assert_eq!(*hits.lock(), vec!["outer"]);
        assert_eq!(queue.run_tasks(), 1);
        assert_eq!(*hits.lock(), vec!["outer", "inner"]);
    }

    #[test]
    fn panicking_task_does_not_stop_the_batch() {
        let queue = TaskQueue::new();
        let ran = Arc::new(Mutex::new(false));
        queue.add_task(|| panic!("boom"));
        let flag = Arc::clone(&ran);
        queue.add_task(move || *flag.lock() = true);

        assert_eq!(queue.run_tasks(), 2);
        assert!(*ran.lock());
    }

    #[test]
    fn senders_work_from_other_threads() {
        let queue = TaskQueue::new();
        let counter = Arc::new(Mutex::new(0));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let sender = queue.sender();
                let counter = Arc::clone(&counter);
                thread::spawn(move || {
                    for _ in 0..10 {
                        let counter = Arc::clone(&counter);
                        sender.add_task(move || *counter.lock() += 1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("sender thread panicked");
        }

        assert_eq!(queue.run_tasks(), 40);
        assert_eq!(*counter.lock(), 40);
    }
}
