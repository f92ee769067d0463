use serde::Serialize;

use crate::board::Board;

pub const DEFAULT_MATCH_BONUS: u32 = 10;
pub const DEFAULT_MISMATCH_PENALTY: u32 = 2;

/// Match engine phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    OneSelected,
    /// Two cards face up, waiting for the deferred comparison. Input is locked.
    Resolving,
    Complete,
}

/// Score deltas applied on resolution. `None` disables scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scoring {
    pub match_bonus: u32,
    pub mismatch_penalty: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            match_bonus: DEFAULT_MATCH_BONUS,
            mismatch_penalty: DEFAULT_MISMATCH_PENALTY,
        }
    }
}

/// Why a flip was ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FlipRejection {
    NoCard,
    AlreadyFlipped,
    AlreadyMatched,
    SameCard,
    Paused,
    Resolving,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlipOutcome {
    /// First card of a pair is face up.
    FirstSelected { index: usize },
    /// Second card is face up; the caller must schedule [`MatchEngine::resolve`].
    AwaitingResolution { first: usize, second: usize },
    Rejected(FlipRejection),
}

impl FlipOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, FlipOutcome::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Matched {
        first: usize,
        second: usize,
        completed: bool,
    },
    Mismatched {
        first: usize,
        second: usize,
    },
    /// Nothing was pending. Only reachable in release builds.
    Stale,
}

/// Two-flip state machine deciding match, mismatch and completion.
///
/// The engine never owns the board; the session hands it in on every call so
/// a restart can replace both wholesale.
#[derive(Debug, Clone)]
pub struct MatchEngine {
    phase: Phase,
    first: Option<usize>,
    second: Option<usize>,
    paused: bool,
    pairs_matched: usize,
    total_pairs: usize,
    score: u32,
    scoring: Option<Scoring>,
}

impl MatchEngine {
    pub fn new(total_pairs: usize, scoring: Option<Scoring>) -> Self {
        Self {
            phase: Phase::Idle,
            first: None,
            second: None,
            paused: false,
            pairs_matched: 0,
            total_pairs,
            score: 0,
            scoring,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn pairs_matched(&self) -> usize {
        self.pairs_matched
    }

    pub fn total_pairs(&self) -> usize {
        self.total_pairs
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn scoring(&self) -> Option<Scoring> {
        self.scoring
    }

    /// Cards selected and not yet resolved.
    pub fn selected(&self) -> (Option<usize>, Option<usize>) {
        (self.first, self.second)
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn flip(&mut self, board: &mut Board, index: usize) -> FlipOutcome {
        if let Err(reason) = self.check_flip(board, index) {
            return FlipOutcome::Rejected(reason);
        }

        let revealed = board.reveal(index);
        debug_assert!(revealed, "eligible card {index} refused to reveal");

        match self.first {
            None => {
                self.first = Some(index);
                self.phase = Phase::OneSelected;
                tracing::debug!(index, "first card selected");
                FlipOutcome::FirstSelected { index }
            }
            Some(first) => {
                self.second = Some(index);
                self.phase = Phase::Resolving;
                tracing::debug!(first, second = index, "pair selected, resolving");
                FlipOutcome::AwaitingResolution {
                    first,
                    second: index,
                }
            }
        }
    }

    /// Compares the two pending cards and applies the result.
    pub fn resolve(&mut self, board: &mut Board) -> Resolution {
        let (first, second) = match (self.phase, self.first, self.second) {
            (Phase::Resolving, Some(first), Some(second)) => (first, second),
            (phase, first, second) => {
                debug_assert!(
                    false,
                    "resolve() called in {phase:?} with selections {first:?}/{second:?}"
                );
                tracing::error!(?phase, ?first, ?second, "resolve without a pending pair");
                return Resolution::Stale;
            }
        };

        self.first = None;
        self.second = None;

        let is_match = match (board.card(first), board.card(second)) {
            (Some(a), Some(b)) => a.token == b.token,
            _ => false,
        };

        if is_match {
            board.mark_matched(first);
            board.mark_matched(second);
            self.pairs_matched += 1;
            if let Some(scoring) = self.scoring {
                self.score = self.score.saturating_add(scoring.match_bonus);
            }

            let completed = self.pairs_matched == self.total_pairs;
            self.phase = if completed {
                Phase::Complete
            } else {
                Phase::Idle
            };
            tracing::debug!(
                first,
                second,
                pairs_matched = self.pairs_matched,
                score = self.score,
                "pair matched"
            );
            Resolution::Matched {
                first,
                second,
                completed,
            }
        } else {
            board.conceal(first);
            board.conceal(second);
            if let Some(scoring) = self.scoring {
                self.score = self.score.saturating_sub(scoring.mismatch_penalty);
            }
            self.phase = Phase::Idle;
            tracing::debug!(first, second, score = self.score, "pair mismatched");
            Resolution::Mismatched { first, second }
        }
    }

    /// Drops unresolved selections and turns their cards back down.
    /// Used when the game ends by timeout with a pair still pending.
    pub fn cancel_pending(&mut self, board: &mut Board) {
        for index in [self.first.take(), self.second.take()].into_iter().flatten() {
            board.conceal(index);
        }
        if matches!(self.phase, Phase::OneSelected | Phase::Resolving) {
            self.phase = Phase::Idle;
        }
    }

    fn check_flip(&self, board: &Board, index: usize) -> Result<(), FlipRejection> {
        match self.phase {
            Phase::Complete => return Err(FlipRejection::GameOver),
            Phase::Resolving => return Err(FlipRejection::Resolving),
            Phase::Idle | Phase::OneSelected => {}
        }
        if self.paused {
            return Err(FlipRejection::Paused);
        }
        if self.first == Some(index) {
            return Err(FlipRejection::SameCard);
        }

        let card = board.card(index).ok_or(FlipRejection::NoCard)?;
        if card.matched {
            Err(FlipRejection::AlreadyMatched)
        } else if card.flipped {
            Err(FlipRejection::AlreadyFlipped)
        } else {
            Ok(())
        }
    }
}
