use std::path::Path;

use log::{info, warn};
use tokio::io::{stdin, AsyncBufReadExt, BufReader};

use quizduel_client::{
    transport::LocalBus, AnswerHandle, BusHandles, Collaborators, ErrorEvent, HttpGradingClient,
    MatchOverEvent, PipelineClient, QuestionSet, QuizConfig, QuizError, QuizPeer, QuizUi,
    RoundCoordinator, RoundGradedEvent, SceneDirector, SceneRequest, SessionContext,
};
use quizduel_shared::{PeerRole, PlayerId};

/// Prints what a player's screen would show
struct ConsoleUi {
    player: PlayerId,
}

impl QuizUi for ConsoleUi {
    fn set_question(&mut self, text: &str) {
        info!("[{}] {}", self.player, text);
    }

    fn clear_input(&mut self) {}
}

struct ConsoleDirector {
    player: PlayerId,
}

impl SceneDirector for ConsoleDirector {
    fn request(&mut self, request: SceneRequest) {
        info!("[{}] scene: {:?}", self.player, request);
    }
}

/// Both seats of a duel in one process, joined through a [`LocalBus`].
/// Answers are read from stdin as `a: <answer>` or `b: <answer>`.
pub struct App {
    leader: QuizPeer,
    follower: QuizPeer,
    answers_a: AnswerHandle,
    answers_b: AnswerHandle,
}

impl App {
    pub async fn new(config: QuizConfig, document: &Path) -> Result<Self, QuizError> {
        let pipeline = PipelineClient::new(&config)?;
        let response = pipeline.upload(document).await?;
        let questions = QuestionSet::from_pipeline(&response);
        info!("Summary: {}", questions.summary());

        let bus = LocalBus::new();
        let (leader, answers_a) =
            Self::seat(&bus, &config, PlayerId::A, PeerRole::Leader, &questions)?;
        let (follower, answers_b) =
            Self::seat(&bus, &config, PlayerId::B, PeerRole::Follower, &questions)?;

        Ok(Self {
            leader,
            follower,
            answers_a,
            answers_b,
        })
    }

    fn seat(
        bus: &LocalBus,
        config: &QuizConfig,
        player: PlayerId,
        role: PeerRole,
        questions: &QuestionSet,
    ) -> Result<(QuizPeer, AnswerHandle), QuizError> {
        let endpoint = bus.join(player)?;
        let session = SessionContext::new(
            player,
            QuestionSet::new(),
            Box::new(endpoint.sender.clone()),
        );
        let mut coordinator = RoundCoordinator::new(
            config.clone(),
            role,
            session,
            BusHandles {
                sender: Box::new(endpoint.sender),
                readiness: Box::new(endpoint.readiness),
            },
            Collaborators {
                ui: Box::new(ConsoleUi { player }),
                director: Box::new(ConsoleDirector { player }),
            },
        );
        coordinator.load_quiz(questions.summary(), questions.questions().to_vec());
        coordinator.activate();

        let grader = HttpGradingClient::new(config)?;
        Ok(QuizPeer::new(
            coordinator,
            Box::new(endpoint.receiver),
            Box::new(grader),
        ))
    }

    pub async fn run(self) {
        let App {
            leader,
            follower,
            answers_a,
            answers_b,
        } = self;
        let peers = async move { tokio::join!(leader.run(), follower.run()) };
        tokio::pin!(peers);

        let (mut leader, _follower) = tokio::select! {
            finished = &mut peers => finished,
            _ = route_answers(answers_a, answers_b) => {
                info!("Input closed, waiting for the match to finish");
                peers.await
            }
        };

        let mut events = leader.take_events();
        for (round, response) in events.read::<RoundGradedEvent>() {
            info!(
                "Round {}: {} scored {:.0} ({}), {} scored {:.0} ({})",
                round,
                PlayerId::A,
                response.a.total,
                response.a.feedback,
                PlayerId::B,
                response.b.total,
                response.b.feedback
            );
        }
        for outcome in events.read::<MatchOverEvent>() {
            info!("Final result: {}", outcome);
        }
        for error in events.read::<ErrorEvent>() {
            warn!("During the match: {}", error);
        }
    }
}

async fn route_answers(answers_a: AnswerHandle, answers_b: AnswerHandle) {
    let mut lines = BufReader::new(stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let Some((seat, answer)) = line.split_once(':') else {
            warn!("Type answers as `a: <answer>` or `b: <answer>`");
            continue;
        };
        let delivered = match seat.trim().to_ascii_lowercase().as_str() {
            "a" => answers_a.submit(answer.trim()),
            "b" => answers_b.submit(answer.trim()),
            other => {
                warn!("Unknown seat '{}'", other);
                continue;
            }
        };
        if !delivered {
            break;
        }
    }
}
