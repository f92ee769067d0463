#![cfg(target_arch = "wasm32")]

use js_sys::{Array, Reflect};
use memory_match::wasm::MemoryGame;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

fn field(value: &JsValue, name: &str) -> JsValue {
    Reflect::get(value, &JsValue::from_str(name)).expect("field must exist")
}

#[wasm_bindgen_test]
fn wasm_ready_reports_true() {
    assert!(memory_match::wasm_ready());
}

#[wasm_bindgen_test]
fn preset_game_serializes_its_board() {
    let game = MemoryGame::with_preset("landmarks", 42.0).unwrap();
    let state = game.state().unwrap();

    let cards = Array::from(&field(&state, "cards"));
    assert_eq!(cards.length(), 12);
    assert_eq!(field(&state, "timer_text").as_string().as_deref(), Some("10"));
    assert_eq!(field(&state, "phase").as_string().as_deref(), Some("idle"));
}

#[wasm_bindgen_test]
fn unknown_preset_is_an_error_string() {
    let err = MemoryGame::with_preset("chess", 1.0).err().unwrap();
    assert!(err.as_string().unwrap().contains("unknown preset"));
}

#[wasm_bindgen_test]
fn flips_and_clock_report_notices() {
    let mut game = MemoryGame::new(JsValue::UNDEFINED, 7.0).unwrap();

    let notices = Array::from(&game.flip(0, 0).unwrap());
    assert_eq!(
        field(&notices.get(0), "kind").as_string().as_deref(),
        Some("flipped")
    );

    let ticks = Array::from(&game.advance(3000.0).unwrap());
    assert_eq!(ticks.length(), 3);
    assert_eq!(game.timer_text(), "07");
    assert!(game.summary().unwrap().is_undefined());
}

#[wasm_bindgen_test]
fn reconfigure_with_zero_limit_counts_up() {
    let mut game = MemoryGame::with_preset("letters_timed", 3.0).unwrap();
    game.reconfigure(4, 0).unwrap();
    game.advance(2000.0).unwrap();

    let state = game.state().unwrap();
    assert_eq!(field(&state, "timer").as_f64(), Some(2.0));
    assert_eq!(Array::from(&field(&state, "cards")).length(), 8);
}

#[wasm_bindgen_test]
fn back_to_back_pumps_spend_no_game_time() {
    let mut game = MemoryGame::with_preset("letters", 0.5).unwrap();

    assert_eq!(Array::from(&game.pump().unwrap()).length(), 0);
    assert_eq!(Array::from(&game.pump().unwrap()).length(), 0);
    game.restart().unwrap();
    assert_eq!(Array::from(&game.pump().unwrap()).length(), 0);
    assert_eq!(game.timer_text(), "00:00");
}

#[wasm_bindgen_test]
fn infinite_advance_is_a_no_op() {
    let mut game = MemoryGame::with_preset("letters", 0.25).unwrap();

    assert_eq!(Array::from(&game.advance(f64::INFINITY).unwrap()).length(), 0);
    assert_eq!(Array::from(&game.advance(f64::NAN).unwrap()).length(), 0);
    assert_eq!(game.timer_text(), "00:00");
}
