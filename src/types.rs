use serde::Serialize;

use crate::engine::{FlipRejection, Phase};

/// A board coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

/// Which side of a card a renderer should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardFace {
    Back,
    Front,
    /// Front with the matched highlight.
    Matched,
}

/// One card as a renderer sees it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardView {
    pub index: usize,
    pub position: Position,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub face: CardFace,
    /// Contract:
    /// - `Back`: always `None`.
    /// - `Front` / `Matched`: the card's token.
    pub token: Option<String>,
    /// `true` when the face asset failed to load and a placeholder must be drawn.
    pub placeholder: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Timeout,
}

/// Final result handed to the end-of-game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub outcome: Outcome,
    pub final_score: u32,
    /// Timer value at the end: elapsed when counting up, remaining when counting down.
    pub final_seconds: u32,
    pub elapsed_seconds: u32,
    pub pairs_matched: usize,
    pub total_pairs: usize,
}

/// Public game state returned from WASM APIs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameState {
    pub cards: Vec<CardView>,
    pub columns: usize,
    pub rows: usize,
    pub width: f64,
    pub height: f64,
    /// Changes whenever a new layout is dealt.
    pub layout_hash: u32,
    pub generation: u64,
    pub phase: Phase,
    pub score: u32,
    pub scoring_enabled: bool,
    pub pairs_matched: usize,
    pub total_pairs: usize,
    pub paused: bool,
    pub timer: u32,
    pub timer_text: String,
    pub is_game_over: bool,
    pub summary: Option<GameSummary>,
}

/// What happened while handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    Flipped { index: usize },
    FlipRejected { reason: FlipRejection },
    ResolutionScheduled { first: usize, second: usize, delay_ms: u32 },
    Matched { first: usize, second: usize },
    Mismatched { first: usize, second: usize },
    Tick { value: u32 },
    Paused,
    Resumed,
    GameOver { summary: GameSummary },
}
