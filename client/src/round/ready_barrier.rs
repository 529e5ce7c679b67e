use tokio::sync::watch;

use quizduel_shared::PlayerId;

use crate::transport::{BusError, ReadyFlags};

/// Leader-side gate that opens once every expected player has raised its
/// Ready flag. It opens at most once; afterwards it stays open.
pub struct ReadyBarrier {
    flags: watch::Receiver<ReadyFlags>,
    expected: Vec<PlayerId>,
    fired: bool,
}

impl ReadyBarrier {
    pub fn new(flags: watch::Receiver<ReadyFlags>, expected: Vec<PlayerId>) -> Self {
        Self {
            flags,
            expected,
            fired: false,
        }
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Non-blocking check. Returns true exactly once: on the first call that
    /// observes every expected flag raised.
    pub fn poll(&mut self) -> bool {
        if self.fired {
            return false;
        }
        if self.flags.borrow().all_ready(&self.expected) {
            self.fired = true;
            return true;
        }
        false
    }

    /// Resolves once every expected flag is raised. Fails if the readiness
    /// board goes away first.
    pub async fn wait(&mut self) -> Result<(), BusError> {
        if self.fired {
            return Ok(());
        }
        let expected = self.expected.clone();
        self.flags
            .wait_for(|flags| flags.all_ready(&expected))
            .await
            .map_err(|_| BusError::BoardClosed)?;
        self.fired = true;
        Ok(())
    }
}
