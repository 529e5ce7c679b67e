use std::{future::pending, time::Duration};

use log::{error, info};
use tokio::{
    sync::mpsc,
    time::{interval, Instant, MissedTickBehavior},
};

use quizduel_shared::{GradeResponse, RoundIndex};

use crate::{
    round::{coordinator::RoundCoordinator, ready_barrier::ReadyBarrier},
    services::{GradingError, GradingFuture, GradingService},
    transport::{BusError, EventReceiver},
};

/// Feeds local answers into a running [`QuizPeer`]
#[derive(Clone)]
pub struct AnswerHandle {
    sender: mpsc::UnboundedSender<String>,
}

impl AnswerHandle {
    /// Queues an answer. Returns false once the peer has stopped.
    pub fn submit(&self, text: impl Into<String>) -> bool {
        self.sender.send(text.into()).is_ok()
    }
}

/// Async driver for one peer. Owns the coordinator and multiplexes the bus
/// tick, local answer submissions, the leader's ready barrier and the
/// in-flight grading request on a single task.
///
/// Grading futures are not `Send`, so run it on a current-thread runtime
/// or inside a `LocalSet`.
pub struct QuizPeer {
    coordinator: RoundCoordinator,
    receiver: Box<dyn EventReceiver>,
    grader: Box<dyn GradingService>,
    submissions: mpsc::UnboundedReceiver<String>,
    tick_interval: Duration,
}

impl QuizPeer {
    pub fn new(
        coordinator: RoundCoordinator,
        receiver: Box<dyn EventReceiver>,
        grader: Box<dyn GradingService>,
    ) -> (Self, AnswerHandle) {
        let (sender, submissions) = mpsc::unbounded_channel();
        let tick_interval = coordinator.config().tick_interval;
        let peer = Self {
            coordinator,
            receiver,
            grader,
            submissions,
            tick_interval,
        };
        (peer, AnswerHandle { sender })
    }

    pub fn coordinator(&self) -> &RoundCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut RoundCoordinator {
        &mut self.coordinator
    }

    /// Runs until the match is over and the peer is back in the lobby, then
    /// hands the coordinator back
    pub async fn run(mut self) -> RoundCoordinator {
        let mut ticker = interval(self.tick_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut barrier = self.coordinator.take_ready_barrier();
        let mut grading: Option<(RoundIndex, GradingFuture)> = None;
        let mut submissions_open = true;

        loop {
            if grading.is_none() {
                if let Some((round, request)) = self.coordinator.take_grading_request() {
                    info!("Requesting grading for round {}", round);
                    grading = Some((round, self.grader.grade(request)));
                }
            }
            if self.coordinator.phase().is_terminal() {
                break;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    self.coordinator.receive_all(self.receiver.as_mut());
                    self.coordinator.update(Instant::now());
                }
                submission = self.submissions.recv(), if submissions_open => {
                    match submission {
                        Some(text) => {
                            self.coordinator.submit_answer(&text);
                        }
                        None => submissions_open = false,
                    }
                }
                result = wait_ready(&mut barrier) => {
                    barrier = None;
                    match result {
                        Ok(()) => self.coordinator.on_all_ready(),
                        Err(err) => error!("Ready barrier failed: {}", err),
                    }
                }
                (round, result) = finish_grading(&mut grading) => {
                    grading = None;
                    self.coordinator.on_grading_result(round, result);
                }
            }
        }

        self.coordinator
    }
}

async fn wait_ready(barrier: &mut Option<ReadyBarrier>) -> Result<(), BusError> {
    match barrier {
        Some(barrier) => barrier.wait().await,
        None => pending().await,
    }
}

async fn finish_grading(
    grading: &mut Option<(RoundIndex, GradingFuture)>,
) -> (RoundIndex, Result<GradeResponse, GradingError>) {
    match grading {
        Some((round, future)) => {
            let result = future.await;
            (*round, result)
        }
        None => pending().await,
    }
}
