use std::collections::BTreeMap;

use quizduel_shared::PlayerId;

/// Per-player "Ready" flags shared across the peer group. A player appears
/// once it joins; each peer only ever writes its own entry.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReadyFlags {
    flags: BTreeMap<PlayerId, bool>,
}

impl ReadyFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn join(&mut self, player: PlayerId) {
        self.flags.entry(player).or_insert(false);
    }

    pub fn leave(&mut self, player: PlayerId) {
        self.flags.remove(&player);
    }

    pub fn set(&mut self, player: PlayerId, ready: bool) {
        self.flags.insert(player, ready);
    }

    pub fn is_ready(&self, player: PlayerId) -> bool {
        self.flags.get(&player).copied().unwrap_or(false)
    }

    pub fn is_connected(&self, player: PlayerId) -> bool {
        self.flags.contains_key(&player)
    }

    /// True when every expected player is connected and has raised its flag
    pub fn all_ready(&self, expected: &[PlayerId]) -> bool {
        !expected.is_empty() && expected.iter().all(|player| self.is_ready(*player))
    }
}
