use std::time::Duration;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::board::Board;
use crate::config::GameConfig;
use crate::engine::{FlipOutcome, FlipRejection, MatchEngine, Resolution};
use crate::error::GameResult;
use crate::scheduler::{Scheduler, TaskId};
use crate::timer::{TimerController, TimerTick};
use crate::tokens::{Face, FaceRegistry, Token};
use crate::types::{CardFace, CardView, GameState, GameSummary, Notice, Outcome, Position};

const TICK_PERIOD: Duration = Duration::from_secs(1);
/// Longest stretch of time one `advance` call replays. A stopwatch without a
/// deadline fires one tick per second, so an unbounded step would never end.
pub const MAX_CATCH_UP: Duration = Duration::from_secs(60 * 60);

/// Inputs a session reacts to. Every event runs to completion before the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Pointer press in surface coordinates.
    Click { x: f64, y: f64 },
    Flip { row: usize, col: usize },
    FlipIndex(usize),
    Tick,
    /// Deferred comparison for the pair selected during `generation`.
    Resolve { generation: u64 },
    Pause,
    Resume,
    TogglePause,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionTask {
    Tick,
    Resolve { generation: u64 },
}

/// Everything one game owns: board, match engine, timer and their schedule.
///
/// Restarting deals fresh components and bumps `generation`, so callbacks
/// armed by an earlier game can never touch the new board.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    rng: ChaCha8Rng,
    generation: u64,
    board: Board,
    engine: MatchEngine,
    timer: TimerController,
    scheduler: Scheduler<SessionTask>,
    resolve_task: Option<TaskId>,
    faces: FaceRegistry,
    summary: Option<GameSummary>,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> GameResult<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let board = Board::initialize(config.pair_count, config.columns, &config.theme, &mut rng)?;
        Ok(Self::assemble(config, rng, board))
    }

    /// Starts a game on a fixed layout instead of a shuffled one.
    /// The pair count is taken from `tokens`; `seed` drives later restarts.
    pub fn with_layout(config: GameConfig, tokens: Vec<Token>, seed: u64) -> GameResult<Self> {
        let board = Board::from_tokens(tokens, config.columns)?;
        let config = GameConfig {
            pair_count: board.pair_count(),
            ..config
        };
        config.validate()?;
        Ok(Self::assemble(config, ChaCha8Rng::seed_from_u64(seed), board))
    }

    fn assemble(config: GameConfig, rng: ChaCha8Rng, board: Board) -> Self {
        let mut session = Self {
            engine: MatchEngine::new(board.pair_count(), config.scoring()),
            timer: TimerController::new(config.timer_mode()),
            config,
            rng,
            generation: 1,
            board,
            scheduler: Scheduler::new(),
            resolve_task: None,
            faces: FaceRegistry::new(),
            summary: None,
        };
        session.arm_clock();
        session
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn engine(&self) -> &MatchEngine {
        &self.engine
    }

    pub fn timer(&self) -> &TimerController {
        &self.timer
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn summary(&self) -> Option<GameSummary> {
        self.summary
    }

    pub fn is_over(&self) -> bool {
        self.summary.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.engine.is_paused()
    }

    /// Current virtual time of the session clock.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn timer_text(&self) -> String {
        self.timer.format(self.config.time_format)
    }

    pub fn dispatch(&mut self, event: GameEvent) -> Vec<Notice> {
        match event {
            GameEvent::Click { x, y } => {
                let index = self.board.card_at_point(x, y).map(|card| card.index);
                self.flip(index)
            }
            GameEvent::Flip { row, col } => {
                let index = self.board.card_at(row, col).map(|card| card.index);
                self.flip(index)
            }
            GameEvent::FlipIndex(index) => self.flip(Some(index)),
            GameEvent::Tick => self.on_tick(),
            GameEvent::Resolve { generation } => self.on_resolve(generation),
            GameEvent::Pause => self.set_paused(true),
            GameEvent::Resume => self.set_paused(false),
            GameEvent::TogglePause => self.set_paused(!self.engine.is_paused()),
        }
    }

    /// Moves the session clock forward and handles every task that falls due,
    /// in order. A task cancelled by an earlier one in the same call never runs.
    /// Steps longer than [`MAX_CATCH_UP`] are cut to that length.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Notice> {
        if elapsed > MAX_CATCH_UP {
            tracing::warn!(?elapsed, "clock step too long, replaying only the catch-up window");
        }
        let until = self.scheduler.now().saturating_add(elapsed.min(MAX_CATCH_UP));
        let mut notices = Vec::new();
        while let Some(fired) = self.scheduler.pop_due(until) {
            let handled = match fired.task {
                SessionTask::Tick => self.on_tick(),
                SessionTask::Resolve { generation } => self.on_resolve(generation),
            };
            notices.extend(handled);
        }
        self.scheduler.settle(until);
        notices
    }

    /// Deals a new layout with the current settings. Pending tasks are dropped first.
    pub fn restart(&mut self) -> GameResult<()> {
        let board = Board::initialize(
            self.config.pair_count,
            self.config.columns,
            &self.config.theme,
            &mut self.rng,
        )?;
        self.reset_with(board);
        Ok(())
    }

    /// Settings entry point. Zero seconds disables the time limit.
    pub fn reconfigure(&mut self, pair_count: usize, time_limit: Option<u32>) -> GameResult<()> {
        let config = self.config.reconfigured(pair_count, time_limit)?;
        self.apply_config(config)
    }

    /// Replaces every setting at once and restarts.
    pub fn apply_config(&mut self, config: GameConfig) -> GameResult<()> {
        config.validate()?;
        let board = Board::initialize(config.pair_count, config.columns, &config.theme, &mut self.rng)?;
        tracing::info!(
            pair_count = config.pair_count,
            time_limit = ?config.time_limit,
            "game reconfigured"
        );
        self.config = config;
        self.reset_with(board);
        Ok(())
    }

    /// Records that the face asset for `token` could not be loaded.
    pub fn asset_failed(&mut self, token: impl Into<Token>) -> bool {
        self.faces.mark_failed(token.into())
    }

    pub fn asset_loaded(&mut self, token: impl Into<Token>) -> bool {
        self.faces.mark_loaded(&token.into())
    }

    pub fn state(&self) -> GameState {
        let geometry = self.board.geometry();
        let (width, height) = self.board.surface_size();
        let cards = self
            .board
            .cards()
            .iter()
            .map(|card| {
                let (x, y) = geometry.origin(card.row, card.col);
                let face = if card.matched {
                    CardFace::Matched
                } else if card.flipped {
                    CardFace::Front
                } else {
                    CardFace::Back
                };
                let shown = face != CardFace::Back;
                CardView {
                    index: card.index,
                    position: Position {
                        row: card.row,
                        col: card.col,
                    },
                    x,
                    y,
                    width: geometry.width,
                    height: geometry.height,
                    face,
                    token: shown.then(|| card.token.to_string()),
                    placeholder: shown && self.faces.face(&card.token) == Face::Placeholder,
                }
            })
            .collect();

        GameState {
            cards,
            columns: self.board.columns(),
            rows: self.board.rows(),
            width,
            height,
            layout_hash: self.board.layout_hash(),
            generation: self.generation,
            phase: self.engine.phase(),
            score: self.engine.score(),
            scoring_enabled: self.engine.scoring().is_some(),
            pairs_matched: self.engine.pairs_matched(),
            total_pairs: self.engine.total_pairs(),
            paused: self.engine.is_paused(),
            timer: self.timer.value(),
            timer_text: self.timer_text(),
            is_game_over: self.is_over(),
            summary: self.summary,
        }
    }

    fn reset_with(&mut self, board: Board) {
        self.scheduler.cancel_all();
        self.resolve_task = None;
        self.generation += 1;
        self.engine = MatchEngine::new(board.pair_count(), self.config.scoring());
        self.timer = TimerController::new(self.config.timer_mode());
        self.board = board;
        self.summary = None;
        self.arm_clock();
    }

    fn arm_clock(&mut self) {
        self.scheduler.schedule_repeating(TICK_PERIOD, SessionTask::Tick);
        tracing::info!(
            generation = self.generation,
            pairs = self.board.pair_count(),
            layout = self.board.layout_hash(),
            "new game dealt"
        );
    }

    fn flip(&mut self, index: Option<usize>) -> Vec<Notice> {
        if self.is_over() {
            return vec![rejected(FlipRejection::GameOver)];
        }
        let Some(index) = index else {
            return vec![rejected(FlipRejection::NoCard)];
        };

        match self.engine.flip(&mut self.board, index) {
            FlipOutcome::FirstSelected { index } => vec![Notice::Flipped { index }],
            FlipOutcome::AwaitingResolution { first, second } => {
                let task = SessionTask::Resolve {
                    generation: self.generation,
                };
                self.resolve_task = Some(self.scheduler.schedule_once(self.config.resolve_delay(), task));
                vec![
                    Notice::Flipped { index: second },
                    Notice::ResolutionScheduled {
                        first,
                        second,
                        delay_ms: self.config.resolve_delay_ms,
                    },
                ]
            }
            FlipOutcome::Rejected(reason) => vec![rejected(reason)],
        }
    }

    fn on_resolve(&mut self, generation: u64) -> Vec<Notice> {
        if generation != self.generation {
            tracing::debug!(generation, current = self.generation, "dropping stale resolution");
            return Vec::new();
        }
        let Some(task) = self.resolve_task.take() else {
            return Vec::new();
        };
        self.scheduler.cancel(task);

        match self.engine.resolve(&mut self.board) {
            Resolution::Matched {
                first,
                second,
                completed,
            } => {
                let mut notices = vec![Notice::Matched { first, second }];
                if completed {
                    notices.extend(self.finish(Outcome::Win));
                }
                notices
            }
            Resolution::Mismatched { first, second } => vec![Notice::Mismatched { first, second }],
            Resolution::Stale => Vec::new(),
        }
    }

    fn on_tick(&mut self) -> Vec<Notice> {
        if self.is_over() {
            return Vec::new();
        }
        match self.timer.tick() {
            TimerTick::Idle => Vec::new(),
            TimerTick::Advanced(value) => vec![Notice::Tick { value }],
            TimerTick::Expired(value) => {
                let mut notices = vec![Notice::Tick { value }];
                notices.extend(self.finish(Outcome::Timeout));
                notices
            }
        }
    }

    fn set_paused(&mut self, paused: bool) -> Vec<Notice> {
        if self.is_over() || self.engine.is_paused() == paused {
            return Vec::new();
        }
        if paused {
            self.engine.pause();
            self.timer.pause();
            vec![Notice::Paused]
        } else {
            self.engine.resume();
            self.timer.resume();
            vec![Notice::Resumed]
        }
    }

    fn finish(&mut self, outcome: Outcome) -> Option<Notice> {
        if self.is_over() {
            return None;
        }
        self.timer.stop();
        self.scheduler.cancel_all();
        self.resolve_task = None;
        if outcome == Outcome::Timeout {
            self.engine.cancel_pending(&mut self.board);
        }

        let summary = GameSummary {
            outcome,
            final_score: self.engine.score(),
            final_seconds: self.timer.value(),
            elapsed_seconds: self.timer.elapsed(),
            pairs_matched: self.engine.pairs_matched(),
            total_pairs: self.engine.total_pairs(),
        };
        self.summary = Some(summary);
        tracing::info!(
            ?outcome,
            score = summary.final_score,
            seconds = summary.final_seconds,
            "game over"
        );
        Some(Notice::GameOver { summary })
    }
}

fn rejected(reason: FlipRejection) -> Notice {
    Notice::FlipRejected { reason }
}
