use std::time::Duration;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::game::{GameEvent, GameSession};
use crate::types::Notice;

/// Browser handle for one game. Calls from JS never overlap, so every
/// method runs one session event to completion.
#[wasm_bindgen]
pub struct MemoryGame {
    session: GameSession,
    last_pump: Option<Instant>,
}

#[wasm_bindgen]
impl MemoryGame {
    /// `config` is a settings object (missing fields take the landmark
    /// defaults) or `undefined`. `seed` may be any number, typically
    /// `Math.random()`; every distinct value deals a distinct sequence.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, seed: f64) -> Result<MemoryGame, JsValue> {
        let config = parse_config(config)?;
        Self::start(config, seed)
    }

    /// One of `landmarks`, `landmarks_scored`, `letters`, `letters_timed`.
    pub fn with_preset(name: &str, seed: f64) -> Result<MemoryGame, JsValue> {
        let config = GameConfig::preset(name).map_err(to_js_error)?;
        Self::start(config, seed)
    }

    pub fn click(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        self.handle(GameEvent::Click { x, y })
    }

    pub fn flip(&mut self, row: usize, col: usize) -> Result<JsValue, JsValue> {
        self.handle(GameEvent::Flip { row, col })
    }

    pub fn pause(&mut self) -> Result<JsValue, JsValue> {
        self.handle(GameEvent::Pause)
    }

    pub fn resume(&mut self) -> Result<JsValue, JsValue> {
        self.handle(GameEvent::Resume)
    }

    pub fn toggle_pause(&mut self) -> Result<JsValue, JsValue> {
        self.handle(GameEvent::TogglePause)
    }

    /// Advances the game clock by the wall time since the previous pump.
    /// Call from `requestAnimationFrame`.
    pub fn pump(&mut self) -> Result<JsValue, JsValue> {
        let notices = self.pump_notices();
        to_js(&notices)
    }

    /// Advances the game clock by `ms` milliseconds. Negative, NaN and
    /// infinite values are zero.
    pub fn advance(&mut self, ms: f64) -> Result<JsValue, JsValue> {
        to_js(&self.session.advance(host_millis(ms)))
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.last_pump = None;
        self.session.restart().map_err(to_js_error)
    }

    /// Settings screen entry point. `time_limit` of 0 disables the limit.
    pub fn reconfigure(&mut self, pair_count: usize, time_limit: u32) -> Result<(), JsValue> {
        self.last_pump = None;
        self.session
            .reconfigure(pair_count, Some(time_limit))
            .map_err(to_js_error)
    }

    pub fn apply_settings(&mut self, config: JsValue) -> Result<(), JsValue> {
        let config = parse_config(config)?;
        self.last_pump = None;
        self.session.apply_config(config).map_err(to_js_error)
    }

    pub fn asset_failed(&mut self, token: &str) -> bool {
        self.session.asset_failed(token)
    }

    pub fn asset_loaded(&mut self, token: &str) -> bool {
        self.session.asset_loaded(token)
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.state())
    }

    /// `undefined` until the game is over.
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        match self.session.summary() {
            Some(summary) => to_js(&summary),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    pub fn timer_text(&self) -> String {
        self.session.timer_text()
    }

    pub fn is_over(&self) -> bool {
        self.session.is_over()
    }
}

impl MemoryGame {
    fn start(config: GameConfig, seed: f64) -> Result<MemoryGame, JsValue> {
        let session = GameSession::new(config, host_seed(seed)).map_err(to_js_error)?;
        Ok(MemoryGame {
            session,
            last_pump: None,
        })
    }

    fn pump_notices(&mut self) -> Vec<Notice> {
        let now = Instant::now();
        let elapsed = self
            .last_pump
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_pump = Some(now);
        self.session.advance(elapsed)
    }

    fn handle(&mut self, event: GameEvent) -> Result<JsValue, JsValue> {
        let notices: Vec<Notice> = self.session.dispatch(event);
        to_js(&notices)
    }
}

/// Every bit of the host number feeds the RNG, so fractions in `[0, 1)` do
/// not collapse onto one seed.
fn host_seed(seed: f64) -> u64 {
    seed.to_bits()
}

fn host_millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::MAX)
    } else {
        Duration::ZERO
    }
}

fn parse_config(value: JsValue) -> Result<GameConfig, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(GameConfig::default());
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}

fn to_js_error(err: GameError) -> JsValue {
    JsValue::from_str(&err.to_string())
}
