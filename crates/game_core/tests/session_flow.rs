use std::time::Duration;

use game_core::{
    EndReason, GameConfig, GameController, GameEvent, Palette, ScriptedRandom, SelectionOutcome,
    TICK_INTERVAL,
};

#[test]
fn two_sessions_driven_through_public_api() {
    let config = GameConfig::new(Palette::reference(), 3, 4).expect("config");
    let mut controller = GameController::new(config, ScriptedRandom::default()).with_best_score(1);

    controller.start_session();
    // Default script: no rotation, target at index 0.
    assert_eq!(controller.handle_selection(0), SelectionOutcome::Correct);
    assert_eq!(controller.handle_selection(0), SelectionOutcome::Correct);
    assert_eq!(controller.handle_selection(3), SelectionOutcome::Incorrect);

    for _ in 0..3 {
        controller.advance(TICK_INTERVAL);
    }

    let events = controller.drain_events();
    let kinds: Vec<&str> = events
        .iter()
        .map(|event| match event {
            GameEvent::SessionStarted { .. } => "started",
            GameEvent::RoundStarted { .. } => "round",
            GameEvent::Tick { .. } => "tick",
            GameEvent::Success { .. } => "success",
            GameEvent::Failure { .. } => "failure",
            GameEvent::SessionEnded { .. } => "ended",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "started", "round", "success", "round", "success", "round", "failure", "tick", "tick",
            "tick", "ended"
        ]
    );

    let Some(GameEvent::SessionEnded { report }) = events.last() else {
        panic!("session should have ended");
    };
    assert_eq!(report.final_score, 2);
    assert!(report.is_new_best);
    assert_eq!(report.previous_best, 1);
    assert_eq!(report.reason, EndReason::TimeUp);

    controller.start_session();
    controller.advance(Duration::from_millis(1500));
    let report = controller.end_session().expect("report");
    assert_eq!(report.final_score, 0);
    assert_eq!(report.best_score, 2);
    assert_eq!(report.reason, EndReason::Requested);
    assert_eq!(controller.time_remaining(), 2);
}
