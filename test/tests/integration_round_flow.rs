/// Integration tests for the round cycle between a leader and a follower
/// on an in-memory bus: ready barrier, answer exchange, leader-only
/// grading, damage convergence and match end.

use std::time::Duration;

use quizduel_client::{
    transport::LocalBus, GradingError, MatchEnd, MatchOutcome, RoundPhase, SceneRequest,
};
use quizduel_shared::{BusMessage, EventCode, PlayerId};
use quizduel_test::{
    assert_health, assert_health_converged, exchange_events, exchange_events_n_times, grade_round,
    grades, TestPeer,
};
use tokio::time::Instant;

fn init_logger() {
    env_logger::builder().is_test(true).try_init().ok();
}

/// Activates both peers and lets the leader's barrier start round 0
fn start_duel(questions: &[&str]) -> (LocalBus, TestPeer, TestPeer) {
    init_logger();
    let bus = LocalBus::new();
    let mut leader = TestPeer::leader(&bus, questions);
    let mut follower = TestPeer::follower(&bus, questions);

    leader.coordinator.activate();
    follower.coordinator.activate();
    leader.coordinator.update(Instant::now());
    exchange_events(&mut [&mut leader, &mut follower]);

    (bus, leader, follower)
}

fn answer_round(leader: &mut TestPeer, follower: &mut TestPeer) {
    assert!(leader.coordinator.submit_answer("ATP synthase"));
    assert!(follower.coordinator.submit_answer("The Krebs cycle"));
    exchange_events(&mut [leader, follower]);
}

// ========== Scenarios ==========

#[test]
fn partial_scores_converge_and_round_advances() {
    let (_bus, mut leader, mut follower) = start_duel(&["Q1", "Q2"]);
    answer_round(&mut leader, &mut follower);

    grade_round(&mut leader, Ok(grades(30.0, 80.0))).expect("leader should grade");
    exchange_events_n_times(&mut [&mut leader, &mut follower], 2);

    for peer in [&leader, &follower] {
        assert_health!(peer, PlayerId::A, 0.2);
        assert_health!(peer, PlayerId::B, 0.7);
        assert_eq!(peer.coordinator.current_round(), 1);
        assert_eq!(peer.coordinator.phase(), RoundPhase::AwaitingAnswers);
        assert_eq!(peer.ui.last_question().as_deref(), Some("Q2"));
    }
    assert_health_converged!(leader, follower);
}

#[tokio::test(start_paused = true)]
async fn perfect_score_knocks_out_and_returns_to_lobby() {
    let (_bus, mut leader, mut follower) = start_duel(&["Q1", "Q2"]);
    answer_round(&mut leader, &mut follower);

    grade_round(&mut leader, Ok(grades(100.0, 0.0))).expect("leader should grade");
    exchange_events(&mut [&mut follower]);

    for peer in [&mut leader, &mut follower] {
        assert_health!(peer, PlayerId::B, 0.0);
        assert_health!(peer, PlayerId::A, 1.0);
        assert_eq!(
            peer.coordinator.phase(),
            RoundPhase::MatchOver {
                outcome: MatchOutcome::Winner(PlayerId::A),
                end: MatchEnd::Knockout,
                return_at: None,
            }
        );
        assert_eq!(peer.ui.last_question().as_deref(), Some("PlayerA wins!"));
        assert_eq!(
            peer.director.last(),
            Some(SceneRequest::MatchOver(MatchOutcome::Winner(PlayerId::A)))
        );

        peer.coordinator.update(Instant::now());
        tokio::time::advance(Duration::from_millis(4_900)).await;
        peer.coordinator.update(Instant::now());
        assert!(!peer.coordinator.phase().is_terminal());

        tokio::time::advance(Duration::from_millis(100)).await;
        peer.coordinator.update(Instant::now());
        assert!(peer.coordinator.phase().is_terminal());
        assert_eq!(peer.director.last(), Some(SceneRequest::ReturnToLobby));
        assert_eq!(peer.director.count(SceneRequest::ReturnToLobby), 1);
    }
}

#[test]
fn both_knocked_out_is_a_draw() {
    let (_bus, mut leader, mut follower) = start_duel(&["Q1", "Q2"]);
    answer_round(&mut leader, &mut follower);

    grade_round(&mut leader, Ok(grades(100.0, 100.0))).expect("leader should grade");
    exchange_events(&mut [&mut follower]);

    for peer in [&leader, &follower] {
        assert!(matches!(
            peer.coordinator.phase(),
            RoundPhase::MatchOver {
                outcome: MatchOutcome::Draw,
                end: MatchEnd::Knockout,
                ..
            }
        ));
    }
}

#[test]
fn every_question_is_played_before_the_quiz_completes() {
    let questions = ["Q1", "Q2", "Q3"];
    let (_bus, mut leader, mut follower) = start_duel(&questions);

    for (round, question) in questions.iter().enumerate() {
        assert_eq!(follower.ui.last_question().as_deref(), Some(*question));
        answer_round(&mut leader, &mut follower);
        let (graded, _) =
            grade_round(&mut leader, Ok(grades(10.0, 20.0))).expect("leader should grade");
        assert_eq!(graded as usize, round);
        exchange_events_n_times(&mut [&mut leader, &mut follower], 2);
    }

    for peer in [&leader, &follower] {
        // A took 3 x 0.20, B took 3 x 0.10
        assert_health!(peer, PlayerId::A, 0.4);
        assert_health!(peer, PlayerId::B, 0.7);
        assert!(matches!(
            peer.coordinator.phase(),
            RoundPhase::MatchOver {
                outcome: MatchOutcome::Winner(PlayerId::B),
                end: MatchEnd::QuizComplete,
                ..
            }
        ));
        assert_eq!(
            peer.ui.last_question().as_deref(),
            Some("Quiz complete! PlayerB wins!")
        );
    }
}

#[test]
fn grading_failure_stalls_without_damage() {
    let (_bus, mut leader, mut follower) = start_duel(&["Q1", "Q2"]);
    answer_round(&mut leader, &mut follower);

    grade_round(
        &mut leader,
        Err(GradingError::Status {
            status: 502,
            body: "bad gateway".to_string(),
        }),
    )
    .expect("leader should grade");
    exchange_events_n_times(&mut [&mut leader, &mut follower], 3);

    for peer in [&leader, &follower] {
        assert_eq!(peer.coordinator.phase(), RoundPhase::Grading);
        assert_eq!(peer.coordinator.current_round(), 0);
        assert_health!(peer, PlayerId::A, 1.0);
        assert_health!(peer, PlayerId::B, 1.0);
    }
    assert!(leader.coordinator.take_grading_request().is_none());
}

// ========== Publishing discipline ==========

#[test]
fn follower_never_publishes_round_start() {
    init_logger();
    let bus = LocalBus::new();
    let mut leader = TestPeer::leader(&bus, &["Q1", "Q2"]);
    let mut follower = TestPeer::follower(&bus, &["Q1", "Q2"]);

    follower.coordinator.activate();
    leader.coordinator.activate();
    for _ in 0..5 {
        follower.coordinator.update(Instant::now());
        follower.coordinator.on_all_ready();
        follower.coordinator.announce_round();
    }
    assert_eq!(bus.published(PlayerId::B, EventCode::RoundStart), 0);

    leader.coordinator.update(Instant::now());
    leader.coordinator.update(Instant::now());
    exchange_events(&mut [&mut leader, &mut follower]);
    answer_round(&mut leader, &mut follower);
    grade_round(&mut leader, Ok(grades(10.0, 10.0)));
    exchange_events_n_times(&mut [&mut leader, &mut follower], 2);

    assert_eq!(follower.coordinator.current_round(), 1);
    assert_eq!(bus.published(PlayerId::B, EventCode::RoundStart), 0);
    assert_eq!(bus.published(PlayerId::A, EventCode::RoundStart), 2);
}

#[test]
fn one_damage_publish_per_local_damage_event() {
    let (bus, mut leader, mut follower) = start_duel(&["Q1", "Q2", "Q3"]);

    for _ in 0..3 {
        answer_round(&mut leader, &mut follower);
        grade_round(&mut leader, Ok(grades(5.0, 5.0)));
        exchange_events_n_times(&mut [&mut leader, &mut follower], 2);
    }

    // two targets per graded round, all from the leader
    assert_eq!(bus.published(PlayerId::A, EventCode::Damage), 6);
    assert_eq!(bus.published(PlayerId::B, EventCode::Damage), 0);
    assert_eq!(bus.pending(PlayerId::A), 0);
    assert_eq!(bus.pending(PlayerId::B), 0);
    assert_health_converged!(leader, follower);
}

#[test]
fn grading_is_requested_once_with_both_answers() {
    let (_bus, mut leader, mut follower) = start_duel(&["Which organelle makes ATP?"]);
    answer_round(&mut leader, &mut follower);

    // repeats of the follower's answer do not re-enter grading
    exchange_events_n_times(&mut [&mut leader, &mut follower], 3);

    let (round, request) = leader
        .coordinator
        .take_grading_request()
        .expect("leader should grade");
    assert_eq!(round, 0);
    assert!(leader.coordinator.take_grading_request().is_none());
    assert!(follower.coordinator.take_grading_request().is_none());
    assert_eq!(
        request.full_text,
        "Question: Which organelle makes ATP?\n\
         Summary: Mitochondria turn nutrients into ATP.\n\
         PlayerA: ATP synthase\n\
         PlayerB: The Krebs cycle\n"
    );
}

#[test]
fn round_start_notifies_ui_and_director() {
    let (_bus, leader, follower) = start_duel(&["Q1"]);

    for peer in [&leader, &follower] {
        assert_eq!(peer.ui.questions(), vec!["Q1".to_string()]);
        assert_eq!(peer.ui.clears(), 1);
        assert_eq!(peer.director.requests(), vec![SceneRequest::RoundStarted(0)]);
    }
}

#[test]
fn refused_answer_can_be_resubmitted() {
    let (bus, mut leader, mut follower) = start_duel(&["Q1", "Q2"]);

    let oversized = "x".repeat(70_000);
    assert!(!follower.coordinator.submit_answer(&oversized));
    assert_eq!(follower.coordinator.phase(), RoundPhase::AwaitingAnswers);
    assert_eq!(
        follower
            .coordinator
            .round_state()
            .and_then(|state| state.answer_of(PlayerId::B)),
        None
    );
    assert_eq!(bus.published(PlayerId::B, EventCode::Answer), 0);

    assert!(follower.coordinator.submit_answer("short answer"));
    assert!(leader.coordinator.submit_answer("ATP synthase"));
    exchange_events_n_times(&mut [&mut leader, &mut follower], 2);

    assert_eq!(leader.coordinator.phase(), RoundPhase::Grading);
    assert_eq!(follower.coordinator.phase(), RoundPhase::Grading);
    let (_, request) = leader
        .coordinator
        .take_grading_request()
        .expect("leader should grade");
    assert!(request.full_text.contains("PlayerB: short answer"));
}

#[test]
fn negative_score_never_heals() {
    let (_bus, mut leader, mut follower) = start_duel(&["Q1", "Q2", "Q3"]);
    answer_round(&mut leader, &mut follower);
    grade_round(&mut leader, Ok(grades(30.0, 50.0)));
    exchange_events_n_times(&mut [&mut leader, &mut follower], 2);

    answer_round(&mut leader, &mut follower);
    grade_round(&mut leader, Ok(grades(0.0, -40.0)));
    exchange_events_n_times(&mut [&mut leader, &mut follower], 2);

    for peer in [&leader, &follower] {
        assert_health!(peer, PlayerId::A, 0.5);
        assert_health!(peer, PlayerId::B, 0.7);
        assert_eq!(peer.coordinator.current_round(), 2);
    }
}

#[test]
fn damage_for_unknown_target_is_ignored() {
    let (_bus, mut leader, mut follower) = start_duel(&["Q1", "Q2"]);
    answer_round(&mut leader, &mut follower);

    follower
        .coordinator
        .handle_message(BusMessage::damage(PlayerId::A, 0, "PlayerZ", 0.9));

    assert_health!(follower, PlayerId::A, 1.0);
    assert_health!(follower, PlayerId::B, 1.0);
    assert_eq!(follower.coordinator.phase(), RoundPhase::Grading);
    assert_eq!(follower.coordinator.current_round(), 0);
}

#[test]
fn echo_of_own_damage_is_ignored() {
    let (_bus, mut leader, mut follower) = start_duel(&["Q1", "Q2"]);
    answer_round(&mut leader, &mut follower);

    leader
        .coordinator
        .handle_message(BusMessage::damage(PlayerId::A, 0, "PlayerB", 0.6));
    follower
        .coordinator
        .handle_message(BusMessage::damage(PlayerId::B, 0, "PlayerA", 0.6));

    assert_health!(leader, PlayerId::B, 1.0);
    assert_health!(follower, PlayerId::A, 1.0);
    assert_eq!(leader.coordinator.phase(), RoundPhase::Grading);

    // the real grading for the round still lands afterwards
    grade_round(&mut leader, Ok(grades(20.0, 10.0)));
    exchange_events(&mut [&mut follower]);
    assert_health_converged!(leader, follower);
    assert_health!(follower, PlayerId::B, 0.8);
}
