use std::time::Duration;

const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TaskId,
    pub at: Duration,
    pub task: T,
}

#[derive(Debug, Clone)]
struct Entry<T> {
    id: TaskId,
    due: Duration,
    period: Option<Duration>,
    seq: u64,
    task: T,
}

/// Single-threaded task queue on a virtual clock.
///
/// Time only moves when the owner calls [`Scheduler::advance`] or steps with
/// [`Scheduler::pop_due`]. Due tasks fire in deadline order, ties broken by
/// the order they were (re)armed.
#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    entries: Vec<Entry<T>>,
}

impl<T: Clone> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            next_seq: 0,
            entries: Vec::new(),
        }
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn schedule_once(&mut self, delay: Duration, task: T) -> TaskId {
        self.push(delay, None, task)
    }

    /// First run after one `period`, then every `period`.
    pub fn schedule_repeating(&mut self, period: Duration, task: T) -> TaskId {
        let period = period.max(MIN_PERIOD);
        self.push(period, Some(period), task)
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Removes and returns the earliest task due at or before `until`,
    /// moving the clock to its deadline. Repeating tasks are re-armed.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        let pos = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.due <= until)
            .min_by_key(|(_, entry)| (entry.due, entry.seq))
            .map(|(pos, _)| pos)?;

        let due = self.entries[pos].due;
        self.now = self.now.max(due);

        let fired = match self.entries[pos].period {
            Some(period) => {
                let seq = self.bump_seq();
                let entry = &mut self.entries[pos];
                entry.due += period;
                entry.seq = seq;
                Fired {
                    id: entry.id,
                    at: due,
                    task: entry.task.clone(),
                }
            }
            None => {
                let entry = self.entries.remove(pos);
                Fired {
                    id: entry.id,
                    at: due,
                    task: entry.task,
                }
            }
        };
        Some(fired)
    }

    /// Moves the clock forward without firing anything. Never moves it back.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }

    /// Fires everything due within `elapsed` from now, in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Fired<T>> {
        let until = self.now.saturating_add(elapsed);
        let mut fired = Vec::new();
        while let Some(next) = self.pop_due(until) {
            fired.push(next);
        }
        self.settle(until);
        fired
    }

    fn push(&mut self, delay: Duration, period: Option<Duration>, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        let seq = self.bump_seq();
        self.entries.push(Entry {
            id,
            due: self.now + delay,
            period,
            seq,
            task,
        });
        id
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

impl<T: Clone> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}
