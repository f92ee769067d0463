use thiserror::Error;

/// Errors raised while building or reconfiguring a game.
///
/// Rejected flips are not errors; see [`crate::engine::FlipRejection`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("pair count must be at least 1")]
    InvalidPairCount,

    #[error("token source has {available} distinct tokens, {requested} pairs requested")]
    NotEnoughTokens { requested: usize, available: usize },

    #[error("grid must have at least one column")]
    InvalidColumns,

    #[error("token `{0}` does not appear exactly twice")]
    UnpairedTokens(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
}

pub type GameResult<T> = Result<T, GameError>;
