//! Full-game scenarios driven through `GameSession` events and its clock.

use std::time::Duration;

use memory_match::engine::{FlipRejection, Phase};
use memory_match::timer::TimerDirection;
use memory_match::tokens::Token;
use memory_match::types::{CardFace, Notice, Outcome};
use memory_match::{GameConfig, GameEvent, GameSession};

fn layout(letters: &str) -> Vec<Token> {
    letters.chars().map(|c| Token::new(c.to_string())).collect()
}

fn scored_stopwatch() -> GameConfig {
    GameConfig {
        scoring_enabled: true,
        time_limit: None,
        timer_direction: TimerDirection::Up,
        ..GameConfig::letters()
    }
}

fn play_pair(session: &mut GameSession, first: usize, second: usize) -> Vec<Notice> {
    session.dispatch(GameEvent::FlipIndex(first));
    session.dispatch(GameEvent::FlipIndex(second));
    session
        .advance(Duration::from_millis(500))
        .into_iter()
        .filter(|notice| !matches!(notice, Notice::Tick { .. }))
        .collect()
}

// =============================================================================
// Scored scenario
// =============================================================================

#[test]
fn mismatch_then_match_on_known_layout() {
    let mut session = GameSession::with_layout(scored_stopwatch(), layout("BAACDBCD"), 1).unwrap();

    let notices = play_pair(&mut session, 0, 1);
    assert_eq!(notices, vec![Notice::Mismatched { first: 0, second: 1 }]);
    let state = session.state();
    assert_eq!(state.score, 0);
    assert_eq!(state.cards[0].face, CardFace::Back);
    assert_eq!(state.cards[1].face, CardFace::Back);

    let notices = play_pair(&mut session, 1, 2);
    assert_eq!(notices, vec![Notice::Matched { first: 1, second: 2 }]);
    let state = session.state();
    assert_eq!(state.pairs_matched, 1);
    assert_eq!(state.score, 10);
    assert_eq!(state.cards[1].face, CardFace::Matched);
    assert_eq!(state.cards[2].token.as_deref(), Some("A"));
}

#[test]
fn clearing_the_board_wins_once_and_stops_the_clock() {
    let mut session = GameSession::with_layout(scored_stopwatch(), layout("BAACDBCD"), 1).unwrap();

    play_pair(&mut session, 1, 2);
    play_pair(&mut session, 0, 5);
    play_pair(&mut session, 3, 6);
    session.advance(Duration::from_secs(2));
    let notices = play_pair(&mut session, 4, 7);

    let summary = session.summary().expect("game should be won");
    assert_eq!(summary.outcome, Outcome::Win);
    assert_eq!(summary.final_score, 40);
    assert_eq!(summary.pairs_matched, 4);
    assert_eq!(summary.total_pairs, 4);
    assert_eq!(
        notices,
        vec![
            Notice::Matched { first: 4, second: 7 },
            Notice::GameOver { summary }
        ]
    );

    let timer_at_end = session.timer().value();
    assert!(session.advance(Duration::from_secs(60)).is_empty());
    assert_eq!(session.timer().value(), timer_at_end);
    assert_eq!(session.engine().phase(), Phase::Complete);

    for index in 0..8 {
        assert_eq!(
            session.dispatch(GameEvent::FlipIndex(index)),
            vec![Notice::FlipRejected {
                reason: FlipRejection::GameOver
            }]
        );
    }
    assert_eq!(session.summary(), Some(summary));
}

#[test]
fn rapid_third_click_cannot_displace_pending_pair() {
    let mut session = GameSession::with_layout(scored_stopwatch(), layout("ABAB"), 1).unwrap();

    session.dispatch(GameEvent::FlipIndex(0));
    session.dispatch(GameEvent::FlipIndex(1));
    for _ in 0..3 {
        assert_eq!(
            session.dispatch(GameEvent::FlipIndex(2)),
            vec![Notice::FlipRejected {
                reason: FlipRejection::Resolving
            }]
        );
    }
    assert_eq!(session.engine().selected(), (Some(0), Some(1)));

    assert_eq!(
        session.advance(Duration::from_millis(500)),
        vec![Notice::Mismatched { first: 0, second: 1 }]
    );
    assert_eq!(
        session.dispatch(GameEvent::FlipIndex(2)),
        vec![Notice::Flipped { index: 2 }]
    );
}

// =============================================================================
// Timer behaviour inside a session
// =============================================================================

#[test]
fn twenty_second_countdown_times_out_on_the_twentieth_tick() {
    let config = GameConfig {
        time_limit: Some(20),
        timer_direction: TimerDirection::Down,
        ..GameConfig::landmarks()
    };
    let mut session = GameSession::new(config, 77).unwrap();

    let notices = session.advance(Duration::from_millis(19_999));
    assert_eq!(notices.len(), 19);
    assert!(!session.is_over());

    let notices = session.advance(Duration::from_millis(1));
    assert_eq!(notices[0], Notice::Tick { value: 0 });
    let summary = session.summary().unwrap();
    assert_eq!(summary.outcome, Outcome::Timeout);
    assert_eq!(summary.elapsed_seconds, 20);

    assert!(session.advance(Duration::from_secs(20)).is_empty());
}

#[test]
fn pausing_for_five_seconds_does_not_spend_time() {
    let mut session = GameSession::new(GameConfig::letters_timed(), 8).unwrap();
    session.advance(Duration::from_secs(3));
    let before = session.timer().value();

    session.dispatch(GameEvent::Pause);
    assert!(session.advance(Duration::from_secs(5)).is_empty());
    session.dispatch(GameEvent::Resume);

    assert_eq!(session.timer().value(), before);
    assert_eq!(session.state().timer_text, "42");
}

#[test]
fn clock_format_is_used_for_stopwatch_presets() {
    let mut session = GameSession::new(GameConfig::letters(), 2).unwrap();
    session.advance(Duration::from_secs(75));

    assert_eq!(session.timer_text(), "01:15");
}

// =============================================================================
// Restart and settings
// =============================================================================

#[test]
fn restart_mid_resolution_leaves_a_clean_board() {
    let mut session = GameSession::new(scored_stopwatch(), 123).unwrap();
    let first_layout = session.state().layout_hash;

    session.dispatch(GameEvent::FlipIndex(0));
    session.dispatch(GameEvent::FlipIndex(1));
    session.restart().unwrap();

    let notices = session.advance(Duration::from_millis(900));
    assert!(notices.is_empty());

    let state = session.state();
    assert_eq!(state.phase, Phase::Idle);
    assert_eq!(state.score, 0);
    assert_eq!(state.timer, 0);
    assert_ne!(state.layout_hash, first_layout);
    assert!(state.cards.iter().all(|c| c.face == CardFace::Back));
}

#[test]
fn restart_after_timeout_starts_a_new_game() {
    let mut session = GameSession::new(GameConfig::landmarks(), 6).unwrap();
    session.advance(Duration::from_secs(10));
    assert!(session.is_over());

    session.restart().unwrap();

    assert!(!session.is_over());
    assert_eq!(session.timer().value(), 10);
    assert_eq!(
        session.advance(Duration::from_secs(1)),
        vec![Notice::Tick { value: 9 }]
    );
}

#[test]
fn reconfigure_rejects_bad_settings_and_keeps_the_current_game() {
    let mut session = GameSession::new(GameConfig::landmarks(), 1).unwrap();
    let before = session.state();

    assert!(session.reconfigure(0, Some(30)).is_err());
    assert!(session.reconfigure(50, Some(30)).is_err());
    assert_eq!(session.state(), before);

    session.reconfigure(2, Some(30)).unwrap();
    let state = session.state();
    assert_eq!(state.cards.len(), 4);
    assert_eq!(state.timer, 30);
    assert_eq!((state.columns, state.rows), (4, 1));
}
