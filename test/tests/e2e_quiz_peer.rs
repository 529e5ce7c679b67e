/// End-to-end tests for the async peer driver: two `QuizPeer`s on one
/// in-memory bus, answers typed by the UI as questions appear, grading
/// served by a scripted service. Runs on paused time.

use std::time::Duration;

use quizduel_client::{
    transport::LocalBus, GradingError, MatchOutcome, QuizConfig, RoundPhase, SceneRequest,
};
use quizduel_shared::{EventCode, PeerRole, PlayerId};
use quizduel_test::{AutoAnswerUi, ScriptedGrader, TestPeer};

fn auto_peer(bus: &LocalBus, player: PlayerId, role: PeerRole, answers: &[&str]) -> (TestPeer, AutoAnswerUi) {
    let ui = AutoAnswerUi::new(answers);
    let peer = TestPeer::with_ui(
        bus,
        player,
        role,
        &["Name the powerhouse of the cell", "What does ATP store?"],
        QuizConfig::default(),
        Box::new(ui.clone()),
        ui.recording().clone(),
    );
    (peer, ui)
}

#[tokio::test(start_paused = true)]
async fn two_drivers_play_a_full_match() {
    env_logger::builder().is_test(true).try_init().ok();
    let bus = LocalBus::new();
    let (mut leader, leader_ui) = auto_peer(&bus, PlayerId::A, PeerRole::Leader, &["mitochondria", "energy"]);
    let (mut follower, follower_ui) =
        auto_peer(&bus, PlayerId::B, PeerRole::Follower, &["nucleus", "heat"]);
    leader.coordinator.activate();
    follower.coordinator.activate();
    let leader_director = leader.director.clone();

    let grader = ScriptedGrader::new();
    grader.push_totals(90.0, 20.0).push_totals(70.0, 30.0);

    let (leader_driver, leader_answers) = leader.into_driver(Box::new(grader.clone()));
    let (follower_driver, follower_answers) = follower.into_driver(Box::new(ScriptedGrader::new()));
    leader_ui.attach(leader_answers);
    follower_ui.attach(follower_answers);

    let (leader_done, follower_done) = tokio::time::timeout(
        Duration::from_secs(60),
        async move { tokio::join!(leader_driver.run(), follower_driver.run()) },
    )
    .await
    .expect("match should finish");

    // A lost 0.2 + 0.3, B lost 0.9 + 0.7
    assert_eq!(grader.calls(), 2);
    assert!(grader.requests()[0].full_text.contains("PlayerA: mitochondria"));
    assert!(grader.requests()[0].full_text.contains("PlayerB: nucleus"));
    assert!(grader.requests()[1].full_text.contains("What does ATP store?"));

    for coordinator in [&leader_done, &follower_done] {
        assert_eq!(coordinator.phase(), RoundPhase::Terminal);
        assert!(coordinator.health_of(PlayerId::B) <= 0.0);
        assert!((coordinator.health_of(PlayerId::A) - 0.5).abs() < 1e-5);
    }
    assert_eq!(
        leader_ui.recording().last_question().as_deref(),
        Some("PlayerA wins!")
    );
    assert_eq!(
        leader_director.requests(),
        vec![
            SceneRequest::RoundStarted(0),
            SceneRequest::RoundStarted(1),
            SceneRequest::MatchOver(MatchOutcome::Winner(PlayerId::A)),
            SceneRequest::ReturnToLobby,
        ]
    );
    assert_eq!(bus.published(PlayerId::A, EventCode::RoundStart), 2);
    assert_eq!(bus.published(PlayerId::B, EventCode::RoundStart), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_grading_keeps_the_driver_waiting() {
    env_logger::builder().is_test(true).try_init().ok();
    let bus = LocalBus::new();
    let (mut leader, leader_ui) = auto_peer(&bus, PlayerId::A, PeerRole::Leader, &["a"]);
    let (mut follower, follower_ui) = auto_peer(&bus, PlayerId::B, PeerRole::Follower, &["b"]);
    leader.coordinator.activate();
    follower.coordinator.activate();

    let grader = ScriptedGrader::new();
    grader.push_error(GradingError::Transport {
        reason: "connection refused".to_string(),
    });

    let (leader_driver, leader_answers) = leader.into_driver(Box::new(grader.clone()));
    let (follower_driver, follower_answers) = follower.into_driver(Box::new(ScriptedGrader::new()));
    leader_ui.attach(leader_answers);
    follower_ui.attach(follower_answers);

    let result = tokio::time::timeout(
        Duration::from_secs(30),
        async move { tokio::join!(leader_driver.run(), follower_driver.run()) },
    )
    .await;

    assert!(result.is_err(), "a stalled round must not end the match");
    assert_eq!(grader.calls(), 1);
    assert_eq!(bus.published(PlayerId::A, EventCode::Damage), 0);
}
