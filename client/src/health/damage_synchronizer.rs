use std::collections::HashSet;

use log::{debug, error, info, warn};

use quizduel_shared::{BusMessage, PlayerId, RoundIndex};

use crate::{
    health::health_tracker::HealthTracker,
    transport::{EventSender, Receivers},
};

/// Where a damage event came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOrigin {
    /// Computed by this peer from a grading result
    Local,
    /// Received from another peer over the bus
    Remote,
}

impl DamageOrigin {
    fn broadcasts(self) -> bool {
        self == DamageOrigin::Local
    }
}

/// Mirrors both players' health and keeps every peer's copy converged.
///
/// Damage computed locally is applied and then published; damage received
/// from the bus is applied without republishing, so an event crosses the
/// bus at most once. Each `(round, target)` pair is applied at most once.
pub struct DamageSynchronizer {
    local: PlayerId,
    trackers: [HealthTracker; 2],
    sender: Box<dyn EventSender>,
    applied: HashSet<(RoundIndex, PlayerId)>,
}

impl DamageSynchronizer {
    pub fn new(local: PlayerId, sender: Box<dyn EventSender>) -> Self {
        Self {
            local,
            trackers: [HealthTracker::new(), HealthTracker::new()],
            sender,
            applied: HashSet::new(),
        }
    }

    /// Restores both players to full health and forgets applied rounds
    pub fn reset(&mut self) {
        self.trackers = [HealthTracker::new(), HealthTracker::new()];
        self.applied.clear();
    }

    pub fn health_of(&self, player: PlayerId) -> f32 {
        self.tracker(player).health()
    }

    pub fn is_dead(&self, player: PlayerId) -> bool {
        self.tracker(player).is_dead()
    }

    /// Whether damage for both players has been applied for `round`
    pub fn has_round_damage(&self, round: RoundIndex) -> bool {
        PlayerId::ALL
            .iter()
            .all(|player| self.applied.contains(&(round, *player)))
    }

    /// Applies `amount` of damage to `target` and, when `broadcast` is set,
    /// publishes it to the other peers. Returns the resolved target when the
    /// damage was applied.
    pub fn apply_damage(
        &mut self,
        target: &str,
        amount: f32,
        round: RoundIndex,
        broadcast: bool,
    ) -> Option<PlayerId> {
        let player = match target.parse::<PlayerId>() {
            Ok(player) => player,
            Err(err) => {
                warn!("Ignoring damage for round {}: {}", round, err);
                return None;
            }
        };

        if !self.applied.insert((round, player)) {
            debug!(
                "Damage for {} in round {} already applied, ignoring duplicate",
                player, round
            );
            return None;
        }

        self.tracker_mut(player).take_damage(amount);
        info!(
            "{} takes {:.0}% damage in round {} (health now {:.2})",
            player,
            amount * 100.0,
            round,
            self.health_of(player)
        );

        if broadcast {
            let message = BusMessage::damage(self.local, round, player.name(), amount);
            if let Err(err) = self.sender.send(&message, Receivers::Others) {
                error!("Failed to broadcast damage for {}: {}", player, err);
            }
        }

        Some(player)
    }

    /// Applies a damage event, broadcasting only if it originated here
    pub fn apply_from(
        &mut self,
        origin: DamageOrigin,
        target: &str,
        amount: f32,
        round: RoundIndex,
    ) -> Option<PlayerId> {
        self.apply_damage(target, amount, round, origin.broadcasts())
    }

    /// Applies damage received from the bus. Never republished.
    pub fn apply_remote(&mut self, target: &str, amount: f32, round: RoundIndex) -> Option<PlayerId> {
        self.apply_from(DamageOrigin::Remote, target, amount, round)
    }

    fn tracker(&self, player: PlayerId) -> &HealthTracker {
        &self.trackers[player.to_tag() as usize]
    }

    fn tracker_mut(&mut self, player: PlayerId) -> &mut HealthTracker {
        &mut self.trackers[player.to_tag() as usize]
    }
}
