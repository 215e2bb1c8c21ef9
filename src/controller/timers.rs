use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeferredTask {
    /// Clear the finished run and start a new search.
    Restart,
    /// Clear everything and rebuild an empty grid.
    Reset,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: Duration,
    seq: u64,
    task: DeferredTask,
}

#[derive(Debug, Clone, Default)]
pub struct DeferredQueue {
    clock: Duration,
    seq: u64,
    scheduled: Vec<Scheduled>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }

    pub fn contains(&self, task: DeferredTask) -> bool {
        self.scheduled.iter().any(|s| s.task == task)
    }

    pub fn schedule(&mut self, delay: Duration, task: DeferredTask) {
        self.seq += 1;
        self.scheduled.push(Scheduled {
            due: self.clock + delay,
            seq: self.seq,
            task,
        });
    }

    /// Time left until the earliest task is due.
    pub fn next_due(&self) -> Option<Duration> {
        self.scheduled
            .iter()
            .map(|s| s.due.saturating_sub(self.clock))
            .min()
    }

    /// Moves the clock forward and returns the tasks now due, earliest first.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<DeferredTask> {
        self.clock += elapsed;
        let clock = self.clock;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.scheduled.drain(..).partition(|s| s.due <= clock);
        self.scheduled = pending;
        due.sort_by_key(|s| (s.due, s.seq));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Removes every scheduled `task` and returns how many there were.
    pub fn cancel(&mut self, task: DeferredTask) -> usize {
        let before = self.scheduled.len();
        self.scheduled.retain(|s| s.task != task);
        before - self.scheduled.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn tasks_fire_once_due_in_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(60 * MS, DeferredTask::Reset);
        queue.schedule(30 * MS, DeferredTask::Restart);

        assert!(queue.advance(29 * MS).is_empty());
        assert_eq!(queue.next_due(), Some(MS));
        assert_eq!(queue.advance(40 * MS), vec![DeferredTask::Restart, DeferredTask::Reset]);
        assert!(queue.is_empty());
        assert_eq!(queue.now(), 69 * MS);
    }

    #[test]
    fn equal_deadlines_keep_schedule_order() {
        let mut queue = DeferredQueue::new();
        queue.schedule(10 * MS, DeferredTask::Reset);
        queue.schedule(10 * MS, DeferredTask::Restart);
        assert_eq!(queue.advance(10 * MS), vec![DeferredTask::Reset, DeferredTask::Restart]);
    }

    #[test]
    fn cancel_removes_matching_tasks() {
        let mut queue = DeferredQueue::new();
        queue.schedule(10 * MS, DeferredTask::Restart);
        queue.schedule(10 * MS, DeferredTask::Reset);
        assert_eq!(queue.cancel(DeferredTask::Restart), 1);
        assert!(!queue.contains(DeferredTask::Restart));
        assert!(queue.contains(DeferredTask::Reset));
        assert_eq!(queue.len(), 1);
    }
}
