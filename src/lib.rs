use wasm_bindgen::prelude::*;

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod scheduler;
pub mod timer;
pub mod tokens;
pub mod types;
pub mod wasm;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::{GameEvent, GameSession};

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}
