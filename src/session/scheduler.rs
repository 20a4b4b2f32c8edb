//! Cancellable timers on a logical clock.
//!
//! The session owns one `Scheduler`. Nothing here runs on its own: the host
//! advances time and the session pops due tasks in order. Each scheduled
//! task has a [`TaskId`] so it can be cancelled, and teardown cancels all of
//! them, so no callback can outlive its session.
//!
//! Tasks can be suspended (pause) and resumed later with the same amount of
//! time left on them.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Handle to a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(pub u32);

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task({})", self.0)
    }
}

/// What a task does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskKind {
    /// Compare the two open cards.
    ResolveMatch,
    /// Hide the board again after a hint.
    EndHint,
    /// Periodic timer display update.
    Tick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Timing {
    /// Fires when the clock reaches this time.
    Armed { due_at: u64 },
    /// Frozen with this much time left.
    Suspended { remaining: u64 },
}

#[derive(Clone, Copy, Debug)]
struct Task {
    kind: TaskKind,
    timing: Timing,
}

/// A task that came due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DueTask {
    pub id: TaskId,
    pub kind: TaskKind,
    pub due_at: u64,
}

/// Owner of every pending timer of a session.
#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    tasks: FxHashMap<TaskId, Task>,
    next_id: u32,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire `delay` ms after `now`.
    pub fn schedule(&mut self, kind: TaskKind, now: u64, delay: u64) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;

        let due_at = now.saturating_add(delay);
        log::trace!("scheduled {:?} as {} due at {}ms", kind, id, due_at);
        self.tasks.insert(
            id,
            Task {
                kind,
                timing: Timing::Armed { due_at },
            },
        );
        id
    }

    /// Cancel a task. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let removed = self.tasks.remove(&id).is_some();
        if removed {
            log::trace!("cancelled {}", id);
        }
        removed
    }

    /// Cancel every pending task, returning how many there were.
    pub fn cancel_all(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        count
    }

    #[must_use]
    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Number of pending tasks of a kind, armed or suspended.
    #[must_use]
    pub fn pending_of(&self, kind: TaskKind) -> usize {
        self.tasks.values().filter(|t| t.kind == kind).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Freeze every armed task of the given kinds.
    pub fn suspend(&mut self, kinds: &[TaskKind], now: u64) {
        for task in self.tasks.values_mut() {
            if let Timing::Armed { due_at } = task.timing {
                if kinds.contains(&task.kind) {
                    task.timing = Timing::Suspended {
                        remaining: due_at.saturating_sub(now),
                    };
                }
            }
        }
    }

    /// Re-arm every suspended task with its remaining time.
    pub fn resume(&mut self, now: u64) {
        for task in self.tasks.values_mut() {
            if let Timing::Suspended { remaining } = task.timing {
                task.timing = Timing::Armed {
                    due_at: now.saturating_add(remaining),
                };
            }
        }
    }

    /// Remove and return the earliest armed task due at or before `until`.
    ///
    /// Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: u64) -> Option<DueTask> {
        let (id, kind, due_at) = self
            .tasks
            .iter()
            .filter_map(|(&id, task)| match task.timing {
                Timing::Armed { due_at } if due_at <= until => Some((id, task.kind, due_at)),
                _ => None,
            })
            .min_by_key(|&(id, _, due_at)| (due_at, id))?;

        self.tasks.remove(&id);
        Some(DueTask { id, kind, due_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_in_due_order() {
        let mut scheduler = Scheduler::new();
        let late = scheduler.schedule(TaskKind::EndHint, 0, 2000);
        let early = scheduler.schedule(TaskKind::ResolveMatch, 0, 1000);

        assert_eq!(scheduler.pop_due(500), None);

        let first = scheduler.pop_due(5000).unwrap();
        assert_eq!(first.id, early);
        assert_eq!(first.due_at, 1000);

        let second = scheduler.pop_due(5000).unwrap();
        assert_eq!(second.id, late);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        let a = scheduler.schedule(TaskKind::Tick, 0, 1000);
        let b = scheduler.schedule(TaskKind::ResolveMatch, 0, 1000);

        assert_eq!(scheduler.pop_due(1000).map(|t| t.id), Some(a));
        assert_eq!(scheduler.pop_due(1000).map(|t| t.id), Some(b));
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(TaskKind::ResolveMatch, 0, 1000);

        assert!(scheduler.is_pending(id));
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert_eq!(scheduler.pop_due(u64::MAX), None);
    }

    #[test]
    fn test_cancel_all() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(TaskKind::ResolveMatch, 0, 1000);
        scheduler.schedule(TaskKind::EndHint, 0, 2000);
        scheduler.schedule(TaskKind::Tick, 0, 1000);

        assert_eq!(scheduler.cancel_all(), 3);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_suspend_and_resume_keeps_remaining_time() {
        let mut scheduler = Scheduler::new();
        let hint = scheduler.schedule(TaskKind::EndHint, 0, 2000);
        let tick = scheduler.schedule(TaskKind::Tick, 0, 1000);

        // Paused at 500ms for 10 seconds
        scheduler.suspend(&[TaskKind::EndHint, TaskKind::ResolveMatch], 500);
        assert_eq!(scheduler.pop_due(10_000).map(|t| t.id), Some(tick));
        assert_eq!(scheduler.pop_due(10_000), None);
        assert_eq!(scheduler.pending_of(TaskKind::EndHint), 1);

        scheduler.resume(10_500);
        assert_eq!(scheduler.pop_due(11_999), None);

        let fired = scheduler.pop_due(12_000).unwrap();
        assert_eq!(fired.id, hint);
        assert_eq!(fired.due_at, 12_000);
    }
}
