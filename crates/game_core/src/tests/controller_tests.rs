use shared::domain::Palette;

use super::*;
use crate::random::{RngSource, ScriptedRandom};

fn controller(duration_secs: u32) -> GameController<RngSource<rand::rngs::StdRng>> {
    let config = GameConfig::new(Palette::reference(), duration_secs, 4).expect("config");
    GameController::new(config, RngSource::seeded(11))
}

fn correct_index<R: RandomSource>(controller: &GameController<R>) -> usize {
    controller.current_round().expect("active round").correct_index
}

fn wrong_index<R: RandomSource>(controller: &GameController<R>) -> usize {
    let round = controller.current_round().expect("active round");
    (round.correct_index + 1) % round.options.len()
}

fn score_points<R: RandomSource>(controller: &mut GameController<R>, points: u32) {
    for _ in 0..points {
        let index = correct_index(controller);
        assert_eq!(controller.handle_selection(index), SelectionOutcome::Correct);
    }
}

fn assert_round_invariant(round: &Round) {
    assert_eq!(round.options.len(), 4);
    assert_eq!(round.options[round.correct_index], round.target);
    assert!(Palette::reference().contains(round.target));
}

#[test]
fn new_controller_is_idle() {
    let controller = controller(30);
    assert!(!controller.is_active());
    assert_eq!(controller.score(), 0);
    assert_eq!(controller.time_remaining(), 30);
    assert_eq!(controller.best_score(), 0);
    assert!(controller.current_round().is_none());
    assert_eq!(controller.next_deadline(), None);
}

#[test]
fn plays_reference_scenario_to_timeout() {
    let mut controller = controller(30);

    controller.start_session();
    assert!(controller.is_active());
    assert_eq!(controller.score(), 0);
    assert_eq!(controller.time_remaining(), 30);
    assert_round_invariant(controller.current_round().expect("round"));

    let index = correct_index(&controller);
    assert_eq!(controller.handle_selection(index), SelectionOutcome::Correct);
    assert_eq!(controller.score(), 1);
    assert_round_invariant(controller.current_round().expect("round"));

    let round_before = controller.current_round().cloned();
    let index = wrong_index(&controller);
    assert_eq!(controller.handle_selection(index), SelectionOutcome::Incorrect);
    assert_eq!(controller.score(), 1);
    assert_eq!(controller.current_round().cloned(), round_before);

    controller.drain_events();
    controller.advance(Duration::from_secs(30));

    assert!(!controller.is_active());
    assert!(controller.current_round().is_none());
    let events = controller.drain_events();
    let report = match events.last() {
        Some(GameEvent::SessionEnded { report }) => report.clone(),
        other => panic!("expected session end, got {other:?}"),
    };
    assert_eq!(report.final_score, 1);
    assert!(report.is_new_best);
    assert_eq!(report.best_score, 1);
    assert_eq!(report.reason, EndReason::TimeUp);
}

#[test]
fn explicit_end_below_best_keeps_best() {
    let mut controller = controller(30).with_best_score(5);
    controller.start_session();
    score_points(&mut controller, 3);

    let report = controller.end_session().expect("report");

    assert!(!controller.is_active());
    assert_eq!(report.final_score, 3);
    assert!(!report.is_new_best);
    assert_eq!(report.best_score, 5);
    assert_eq!(report.previous_best, 5);
    assert_eq!(report.reason, EndReason::Requested);
    assert_eq!(controller.best_score(), 5);
}

#[test]
fn ending_twice_is_a_no_op() {
    let mut controller = controller(30);
    controller.start_session();
    score_points(&mut controller, 2);

    assert!(controller.end_session().is_some());
    controller.drain_events();

    assert_eq!(controller.end_session(), None);
    assert_eq!(controller.score(), 2);
    assert_eq!(controller.best_score(), 2);
    assert!(controller.drain_events().is_empty());
}

#[test]
fn best_score_tracks_maximum_across_sessions() {
    let mut controller = controller(30);
    let mut observed_max = 0;
    for points in [2, 5, 3, 0, 4] {
        controller.start_session();
        score_points(&mut controller, points);
        let report = controller.end_session().expect("report");
        observed_max = observed_max.max(report.final_score);
        assert_eq!(report.best_score, observed_max);
        assert_eq!(controller.best_score(), observed_max);
    }
    assert_eq!(controller.best_score(), 5);
}

#[test]
fn countdown_ticks_every_second_down_to_zero() {
    let duration = 5;
    let mut controller = controller(duration);
    controller.start_session();
    controller.drain_events();

    for _ in 0..duration {
        controller.advance(Duration::from_millis(250));
        controller.advance(Duration::from_millis(750));
    }

    let events = controller.drain_events();
    let ticks: Vec<u32> = events
        .iter()
        .filter_map(|event| match event {
            GameEvent::Tick { time_remaining } => Some(*time_remaining),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![4, 3, 2, 1, 0]);
    assert!(matches!(
        events.last(),
        Some(GameEvent::SessionEnded { report }) if report.reason == EndReason::TimeUp
    ));
    assert!(!controller.is_active());
}

#[test]
fn partial_second_does_not_tick() {
    let mut controller = controller(30);
    controller.start_session();
    controller.advance(Duration::from_millis(999));
    assert_eq!(controller.time_remaining(), 30);
    assert_eq!(controller.next_deadline(), Some(Duration::from_millis(1)));
    controller.advance(Duration::from_millis(1));
    assert_eq!(controller.time_remaining(), 29);
}

#[test]
fn large_elapsed_fires_all_ticks_once() {
    let mut controller = controller(10);
    controller.start_session();
    controller.drain_events();
    controller.advance(Duration::from_secs(60));

    let tick_count = controller
        .drain_events()
        .iter()
        .filter(|event| matches!(event, GameEvent::Tick { .. }))
        .count();
    assert_eq!(tick_count, 10);
    assert_eq!(controller.time_remaining(), 0);
    assert_eq!(controller.next_deadline(), None);
}

#[test]
fn ended_session_receives_no_further_ticks() {
    let mut controller = controller(30);
    controller.start_session();
    controller.advance(Duration::from_millis(500));
    controller.end_session().expect("report");
    controller.drain_events();

    controller.advance(Duration::from_secs(5));
    assert_eq!(controller.time_remaining(), 30);
    assert!(controller.drain_events().is_empty());
    assert_eq!(controller.next_deadline(), None);
}

#[test]
fn restart_cancels_previous_countdown() {
    let mut controller = controller(30);
    controller.start_session();
    controller.advance(Duration::from_millis(600));
    controller.start_session();
    controller.drain_events();

    // The first session's tick would have been due 400ms from here.
    controller.advance(Duration::from_millis(500));
    assert_eq!(controller.time_remaining(), 30);

    controller.advance(Duration::from_millis(500));
    assert_eq!(controller.time_remaining(), 29);
    let ticks = controller
        .drain_events()
        .into_iter()
        .filter(|event| matches!(event, GameEvent::Tick { .. }))
        .count();
    assert_eq!(ticks, 1);
}

#[test]
fn restart_abandons_session_without_report() {
    let mut controller = controller(30);
    controller.start_session();
    score_points(&mut controller, 4);
    controller.drain_events();

    controller.start_session();

    assert_eq!(controller.score(), 0);
    assert_eq!(controller.best_score(), 0);
    assert!(!controller
        .drain_events()
        .iter()
        .any(|event| matches!(event, GameEvent::SessionEnded { .. })));
}

#[test]
fn selection_while_idle_is_ignored() {
    let mut controller = controller(30);
    assert_eq!(controller.handle_selection(0), SelectionOutcome::Ignored);
    assert!(controller.drain_events().is_empty());
}

#[test]
fn out_of_range_selection_is_ignored() {
    let mut controller = controller(30);
    controller.start_session();
    controller.drain_events();
    let round_before = controller.current_round().cloned();

    assert_eq!(controller.handle_selection(4), SelectionOutcome::Ignored);
    assert_eq!(controller.handle_selection(usize::MAX), SelectionOutcome::Ignored);
    assert_eq!(controller.score(), 0);
    assert_eq!(controller.current_round().cloned(), round_before);
    assert!(controller.drain_events().is_empty());
}

#[test]
fn selections_emit_feedback_signals() {
    let mut controller = controller(30);
    controller.start_session();
    controller.drain_events();

    let wrong = wrong_index(&controller);
    controller.handle_selection(wrong);
    let correct = correct_index(&controller);
    controller.handle_selection(correct);

    let events = controller.drain_events();
    assert_eq!(events[0], GameEvent::Failure { index: wrong });
    assert_eq!(events[1], GameEvent::Success { score: 1 });
    assert!(matches!(&events[2], GameEvent::RoundStarted { round } if Some(round) == controller.current_round()));
}

#[test]
fn scripted_random_yields_exact_rounds() {
    let palette = Palette::reference();
    let colors = palette.colors().to_vec();
    let config = GameConfig::new(palette, 30, 4).expect("config");
    let mut controller = GameController::new(config, ScriptedRandom::new([0, 3], [2, 0]));

    controller.start_session();
    let first = controller.current_round().cloned().expect("round");
    assert_eq!(first.options, colors[0..4].to_vec());
    assert_eq!(first.target, colors[2]);

    assert_eq!(controller.handle_selection(2), SelectionOutcome::Correct);
    let second = controller.current_round().cloned().expect("round");
    assert_eq!(
        second.options,
        vec![colors[3], colors[4], colors[5], colors[0]]
    );
    assert_eq!(second.correct_index, 0);
    assert_eq!(second.target, colors[3]);
}

#[test]
fn raising_best_score_never_lowers_it() {
    let mut controller = controller(5).with_best_score(7);

    controller.raise_best_score(3);
    assert_eq!(controller.best_score(), 7);

    controller.raise_best_score(12);
    assert_eq!(controller.best_score(), 12);

    controller.start_session();
    score_points(&mut controller, 2);
    let report = controller.end_session().expect("report");
    assert!(!report.is_new_best);
    assert_eq!(report.best_score, 12);
}
