/// Integration tests for convergence when the bus reorders events of
/// different types. Per-type order is kept, matching the bus guarantee;
/// everything else is interleaved by a seeded shuffle.

use quizduel_client::{transport::LocalBus, MatchOutcome, RoundPhase};
use quizduel_shared::{EventCode, PlayerId};
use quizduel_test::{assert_health_converged, exchange_events, grades, TestPeer};
use tokio::time::Instant;

const QUESTIONS: [&str; 4] = ["Q1", "Q2", "Q3", "Q4"];

fn outcome_of(peer: &TestPeer) -> Option<MatchOutcome> {
    match peer.coordinator.phase() {
        RoundPhase::MatchOver { outcome, .. } => Some(outcome),
        _ => None,
    }
}

/// Plays a whole match, answering whenever a round is open and grading
/// whenever the leader asks
fn play_match(seed: u64, totals: &[(f32, f32)]) -> (LocalBus, TestPeer, TestPeer) {
    let bus = LocalBus::with_shuffle(seed);
    let mut leader = TestPeer::leader(&bus, &QUESTIONS);
    let mut follower = TestPeer::follower(&bus, &QUESTIONS);
    leader.coordinator.activate();
    follower.coordinator.activate();
    leader.coordinator.update(Instant::now());

    let mut script = totals.iter().copied();
    for _ in 0..200 {
        exchange_events(&mut [&mut follower, &mut leader]);

        for peer in [&mut leader, &mut follower] {
            if peer.coordinator.phase() == RoundPhase::AwaitingAnswers {
                let answer = format!("answer from {}", peer.player);
                peer.coordinator.submit_answer(&answer);
            }
        }
        if let Some((round, _)) = leader.coordinator.take_grading_request() {
            let (a_total, b_total) = script.next().unwrap_or((0.0, 0.0));
            leader
                .coordinator
                .on_grading_result(round, Ok(grades(a_total, b_total)));
        }

        if outcome_of(&leader).is_some() && outcome_of(&follower).is_some() {
            break;
        }
    }

    (bus, leader, follower)
}

#[test]
fn shuffled_delivery_converges_to_the_same_outcome() {
    env_logger::builder().is_test(true).try_init().ok();
    let totals = [(30.0, 40.0), (20.0, 10.0), (10.0, 10.0), (5.0, 15.0)];

    for seed in 0..32 {
        let (bus, leader, follower) = play_match(seed, &totals);
        log::debug!("seed {} ended in {:?}", seed, leader.coordinator.phase());

        assert_health_converged!(leader, follower);
        let leader_outcome = outcome_of(&leader);
        assert!(leader_outcome.is_some(), "seed {} never finished", seed);
        assert_eq!(leader_outcome, outcome_of(&follower), "seed {}", seed);
        // A keeps 0.25, B keeps 0.35
        assert_eq!(leader_outcome, Some(MatchOutcome::Winner(PlayerId::B)));
        assert_eq!(follower.coordinator.current_round(), 3);
        assert_eq!(bus.published(PlayerId::B, EventCode::RoundStart), 0);
        assert_eq!(bus.published(PlayerId::B, EventCode::Damage), 0);
    }
}

#[test]
fn shuffled_knockout_ends_both_peers_on_the_same_round() {
    let totals = [(40.0, 40.0), (40.0, 40.0), (10.0, 70.0)];

    for seed in 100..116 {
        let (bus, leader, follower) = play_match(seed, &totals);

        // A: 1.0 - 0.4 - 0.4 - 0.7 <= 0, B: 1.0 - 0.4 - 0.4 - 0.1 > 0
        assert_eq!(outcome_of(&leader), Some(MatchOutcome::Winner(PlayerId::B)));
        assert_eq!(outcome_of(&follower), Some(MatchOutcome::Winner(PlayerId::B)));
        assert_eq!(leader.coordinator.current_round(), 2);
        assert_eq!(follower.coordinator.current_round(), 2);
        assert_eq!(bus.published(PlayerId::A, EventCode::Damage), 6);
    }
}
