use serde::{Deserialize, Serialize};

/// Direction the displayed value moves in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerDirection {
    #[default]
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Shows elapsed seconds; an optional deadline ends the game.
    CountUp { deadline: Option<u32> },
    /// Shows remaining seconds; zero ends the game.
    CountDown { limit: u32 },
}

impl TimerMode {
    /// A zero or absent limit means no bound, which only makes sense counting up.
    pub fn from_config(direction: TimerDirection, limit: Option<u32>) -> Self {
        let limit = limit.filter(|&secs| secs > 0);
        match (direction, limit) {
            (TimerDirection::Down, Some(limit)) => TimerMode::CountDown { limit },
            (_, deadline) => TimerMode::CountUp { deadline },
        }
    }

    fn initial_value(self) -> u32 {
        match self {
            TimerMode::CountUp { .. } => 0,
            TimerMode::CountDown { limit } => limit,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeFormat {
    /// `MM:SS`
    Clock,
    /// Bare seconds, zero-padded to two digits.
    #[default]
    Seconds,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerTick {
    /// Paused or stopped; nothing changed.
    Idle,
    Advanced(u32),
    /// Bound reached on this tick. The timer has stopped itself. Reported
    /// exactly once per run; later ticks are `Idle` until `reset`.
    Expired(u32),
}

type TimeoutCallback = Box<dyn FnOnce(u32)>;

/// Once-per-second game clock.
///
/// The owner delivers ticks from a free-running schedule. Ticks are ignored
/// while paused, so pausing never has to touch that schedule.
///
/// Expiry is signalled by the [`TimerTick::Expired`] value `tick` returns;
/// that is what `GameSession` acts on. The [`with_timeout`](Self::with_timeout)
/// callback is an optional extra hook for owners that cannot inspect the
/// returned value.
pub struct TimerController {
    mode: TimerMode,
    value: u32,
    paused: bool,
    running: bool,
    on_timeout: Option<TimeoutCallback>,
}

impl TimerController {
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            value: mode.initial_value(),
            paused: false,
            running: true,
            on_timeout: None,
        }
    }

    /// Registers an extra action to run when the bound is reached, just
    /// before `tick` returns `Expired`. Runs at most once.
    pub fn with_timeout(mut self, callback: impl FnOnce(u32) + 'static) -> Self {
        self.on_timeout = Some(Box::new(callback));
        self
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Displayed value: elapsed seconds counting up, remaining counting down.
    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn elapsed(&self) -> u32 {
        match self.mode {
            TimerMode::CountUp { .. } => self.value,
            TimerMode::CountDown { limit } => limit - self.value,
        }
    }

    pub fn remaining(&self) -> Option<u32> {
        match self.mode {
            TimerMode::CountUp { deadline } => deadline.map(|d| d.saturating_sub(self.value)),
            TimerMode::CountDown { .. } => Some(self.value),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Back to the initial value, running and unpaused. A fired timeout
    /// callback is not re-armed.
    pub fn reset(&mut self) {
        self.value = self.mode.initial_value();
        self.paused = false;
        self.running = true;
    }

    pub fn tick(&mut self) -> TimerTick {
        if !self.running || self.paused {
            return TimerTick::Idle;
        }

        let expired = match self.mode {
            TimerMode::CountUp { deadline } => {
                self.value = self.value.saturating_add(1);
                deadline.is_some_and(|d| self.value >= d)
            }
            TimerMode::CountDown { .. } => {
                self.value = self.value.saturating_sub(1);
                self.value == 0
            }
        };

        if !expired {
            return TimerTick::Advanced(self.value);
        }

        self.running = false;
        tracing::debug!(value = self.value, "timer reached its bound");
        if let Some(callback) = self.on_timeout.take() {
            callback(self.value);
        }
        TimerTick::Expired(self.value)
    }

    pub fn format(&self, format: TimeFormat) -> String {
        format_seconds(self.value, format)
    }
}

impl std::fmt::Debug for TimerController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerController")
            .field("mode", &self.mode)
            .field("value", &self.value)
            .field("paused", &self.paused)
            .field("running", &self.running)
            .field("has_timeout", &self.on_timeout.is_some())
            .finish()
    }
}

pub fn format_seconds(secs: u32, format: TimeFormat) -> String {
    match format {
        TimeFormat::Clock => format!("{:02}:{:02}", secs / 60, secs % 60),
        TimeFormat::Seconds => format!("{secs:02}"),
    }
}
