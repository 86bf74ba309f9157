//! Cancellable deferred tasks.
//!
//! Tasks are stamped with the scheduler's generation when they are queued.
//! [`Scheduler::invalidate`] bumps the generation, which turns every queued
//! task stale without having to find and remove it. Stale tasks are dropped
//! when they come due and never reach the caller.

use std::time::Duration;
use tracing::{debug, instrument};

/// Handle to a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle {
    /// Generation the task was queued under.
    pub generation: u64,
    /// Sequence number, unique per scheduler.
    pub id: u64,
}

#[derive(Debug, Clone)]
struct ScheduledTask<T> {
    handle: TaskHandle,
    due_at: Duration,
    payload: T,
}

/// A queue of tasks that fire at a given time unless invalidated first.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    generation: u64,
    next_id: u64,
    tasks: Vec<ScheduledTask<T>>,
}

impl<T> Scheduler<T> {
    /// Creates an empty scheduler at generation zero.
    pub fn new() -> Self {
        Self {
            generation: 0,
            next_id: 0,
            tasks: Vec::new(),
        }
    }

    /// Current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Queues `payload` to fire at `due_at`.
    #[instrument(skip(self, payload), fields(generation = self.generation))]
    pub fn schedule(&mut self, due_at: Duration, payload: T) -> TaskHandle {
        let handle = TaskHandle {
            generation: self.generation,
            id: self.next_id,
        };
        self.next_id += 1;
        self.tasks.push(ScheduledTask {
            handle,
            due_at,
            payload,
        });
        debug!(id = handle.id, ?due_at, "Task scheduled");
        handle
    }

    /// Makes every queued task stale.
    #[instrument(skip(self))]
    pub fn invalidate(&mut self) {
        self.generation += 1;
        debug!(generation = self.generation, "Scheduler invalidated");
    }

    /// Returns true if `handle` belongs to the current generation.
    pub fn is_live(&self, handle: TaskHandle) -> bool {
        handle.generation == self.generation
    }

    /// Removes every task due at or before `now`.
    ///
    /// Live tasks are returned in due order; stale ones are discarded.
    #[instrument(skip(self))]
    pub fn take_due(&mut self, now: Duration) -> Vec<(TaskHandle, T)> {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|task| task.due_at <= now);
        self.tasks = pending;

        let mut due = due;
        due.sort_by_key(|task| (task.due_at, task.handle.id));

        let generation = self.generation;
        due.into_iter()
            .filter(|task| {
                let live = task.handle.generation == generation;
                if !live {
                    debug!(id = task.handle.id, "Dropping stale task");
                }
                live
            })
            .map(|task| (task.handle, task.payload))
            .collect()
    }

    /// Earliest due time among live tasks.
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks
            .iter()
            .filter(|task| self.is_live(task.handle))
            .map(|task| task.due_at)
            .min()
    }

    /// Number of queued tasks, stale ones included.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns true if nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
