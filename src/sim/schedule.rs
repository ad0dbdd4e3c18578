//! Deferred real-time tasks
//!
//! Tasks are plain values tagged with the game generation they were scheduled
//! under. The host drains due tasks; a task whose generation no longer matches
//! the session is dropped instead of acting on a fresh game.

use std::time::Duration;

/// Work deferred by wall-clock time rather than frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
    /// Open the result dialog after a game ended
    OpenResultDialog,
    /// Close the dialog and restart after a confirmed submission
    RestartAfterSubmit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledTask {
    pub due: Duration,
    pub generation: u64,
    pub action: Deferred,
}

/// Pending deferred tasks, kept in due order
#[derive(Debug, Clone, Default)]
pub struct Schedule {
    tasks: Vec<ScheduledTask>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Duration, generation: u64, action: Deferred) {
        let task = ScheduledTask {
            due,
            generation,
            action,
        };
        // stable: equal due times fire in scheduling order
        let pos = self.tasks.partition_point(|t| t.due <= due);
        self.tasks.insert(pos, task);
    }

    /// Remove and return every task due at or before `now`
    pub fn take_due(&mut self, now: Duration) -> Vec<ScheduledTask> {
        let split = self.tasks.partition_point(|t| t.due <= now);
        self.tasks.drain(..split).collect()
    }

    /// Drop tasks belonging to older generations
    pub fn cancel_stale(&mut self, generation: u64) {
        self.tasks.retain(|t| t.generation == generation);
    }

    pub fn is_pending(&self, action: Deferred) -> bool {
        self.tasks.iter().any(|t| t.action == action)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
