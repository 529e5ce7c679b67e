use log::warn;

pub const FULL_HEALTH: f32 = 1.0;

/// Normalized health of one player, always within `[0.0, 1.0]`
#[derive(Clone, Debug, PartialEq)]
pub struct HealthTracker {
    health: f32,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self {
            health: FULL_HEALTH,
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    /// Lowers health by `amount`. Negative amounts count as zero damage.
    pub fn take_damage(&mut self, amount: f32) {
        if amount < 0.0 {
            warn!("Ignoring negative damage {}, health only goes down", amount);
            return;
        }
        self.set_health(self.health - amount);
    }

    pub fn set_health(&mut self, value: f32) {
        if value.is_nan() {
            warn!("Ignoring NaN health value, keeping {}", self.health);
            return;
        }
        self.health = value.clamp(0.0, FULL_HEALTH);
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }
}

impl Default for HealthTracker {
    fn default() -> Self {
        Self::new()
    }
}
