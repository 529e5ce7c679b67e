//! In-memory message bus connecting peers that live in one process.
//! Every message goes through the wire codec, so peers only ever see what a
//! real bus would hand them.

use std::{
    collections::{BTreeMap, VecDeque},
    sync::{Arc, Mutex, MutexGuard},
};

use log::trace;
use tokio::sync::watch;

use quizduel_shared::{decode, encode, BusMessage, EventCode, PlayerId};

use super::{BusError, EventReceiver, EventSender, ReadinessBoard, ReadyFlags, Receivers};

type Inbox = VecDeque<(EventCode, Vec<u8>)>;

struct Hub {
    inboxes: BTreeMap<PlayerId, Inbox>,
    published: BTreeMap<(PlayerId, EventCode), usize>,
    // When set, queued messages are handed out in random order across event
    // codes. Order within one code is always kept.
    shuffle: Option<fastrand::Rng>,
}

impl Hub {
    fn pop(&mut self, player: PlayerId) -> Result<Option<Vec<u8>>, BusError> {
        let Some(inbox) = self.inboxes.get_mut(&player) else {
            return Err(BusError::NotJoined { player });
        };
        if inbox.is_empty() {
            return Ok(None);
        }

        let Some(rng) = self.shuffle.as_mut() else {
            return Ok(inbox.pop_front().map(|(_, bytes)| bytes));
        };

        let mut codes: Vec<EventCode> = Vec::new();
        for (code, _) in inbox.iter() {
            if !codes.contains(code) {
                codes.push(*code);
            }
        }
        let chosen = codes[rng.usize(..codes.len())];
        let position = inbox.iter().position(|(code, _)| *code == chosen);
        Ok(position
            .and_then(|index| inbox.remove(index))
            .map(|(_, bytes)| bytes))
    }
}

/// Shared in-memory bus. Clones refer to the same bus.
#[derive(Clone)]
pub struct LocalBus {
    hub: Arc<Mutex<Hub>>,
    readiness: Arc<watch::Sender<ReadyFlags>>,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A bus that interleaves event codes randomly, seeded for reproducibility
    pub fn with_shuffle(seed: u64) -> Self {
        Self::build(Some(fastrand::Rng::with_seed(seed)))
    }

    fn build(shuffle: Option<fastrand::Rng>) -> Self {
        let (readiness, _) = watch::channel(ReadyFlags::new());
        Self {
            hub: Arc::new(Mutex::new(Hub {
                inboxes: BTreeMap::new(),
                published: BTreeMap::new(),
                shuffle,
            })),
            readiness: Arc::new(readiness),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Hub>, BusError> {
        lock_hub(&self.hub)
    }

    /// Registers `player` on the bus and hands back its endpoint
    pub fn join(&self, player: PlayerId) -> Result<LocalEndpoint, BusError> {
        self.lock()?.inboxes.entry(player).or_default();
        self.readiness.send_modify(|flags| flags.join(player));

        Ok(LocalEndpoint {
            player,
            sender: LocalSender {
                player,
                hub: self.hub.clone(),
            },
            receiver: LocalReceiver {
                player,
                hub: self.hub.clone(),
            },
            readiness: LocalReadiness {
                player,
                board: self.readiness.clone(),
            },
        })
    }

    /// Drops `player` from the bus, discarding anything still queued for it
    pub fn leave(&self, player: PlayerId) -> Result<(), BusError> {
        self.lock()?.inboxes.remove(&player);
        self.readiness.send_modify(|flags| flags.leave(player));
        Ok(())
    }

    /// How many `code` events `origin` has published so far
    pub fn published(&self, origin: PlayerId, code: EventCode) -> usize {
        self.lock()
            .map(|hub| hub.published.get(&(origin, code)).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Messages waiting in `player`'s inbox
    pub fn pending(&self, player: PlayerId) -> usize {
        self.lock()
            .map(|hub| hub.inboxes.get(&player).map_or(0, VecDeque::len))
            .unwrap_or(0)
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_hub(hub: &Mutex<Hub>) -> Result<MutexGuard<'_, Hub>, BusError> {
    hub.lock().map_err(|_| BusError::Poisoned)
}

/// One player's view of a [`LocalBus`]
pub struct LocalEndpoint {
    pub player: PlayerId,
    pub sender: LocalSender,
    pub receiver: LocalReceiver,
    pub readiness: LocalReadiness,
}

#[derive(Clone)]
pub struct LocalSender {
    player: PlayerId,
    hub: Arc<Mutex<Hub>>,
}

impl EventSender for LocalSender {
    fn send(&self, message: &BusMessage, receivers: Receivers) -> Result<(), BusError> {
        let bytes = encode(message)?;
        let code = message.code();
        let mut hub = lock_hub(&self.hub)?;
        if !hub.inboxes.contains_key(&self.player) {
            return Err(BusError::NotJoined {
                player: self.player,
            });
        }

        for (player, inbox) in hub.inboxes.iter_mut() {
            if receivers == Receivers::Others && *player == self.player {
                continue;
            }
            trace!("{} -> {}: {:?}", self.player, player, code);
            inbox.push_back((code, bytes.clone()));
        }
        *hub.published.entry((self.player, code)).or_insert(0) += 1;

        Ok(())
    }
}

pub struct LocalReceiver {
    player: PlayerId,
    hub: Arc<Mutex<Hub>>,
}

impl EventReceiver for LocalReceiver {
    fn receive(&mut self) -> Result<Option<BusMessage>, BusError> {
        let payload = lock_hub(&self.hub)?.pop(self.player)?;
        match payload {
            Some(bytes) => Ok(Some(decode(&bytes)?)),
            None => Ok(None),
        }
    }
}

#[derive(Clone)]
pub struct LocalReadiness {
    player: PlayerId,
    board: Arc<watch::Sender<ReadyFlags>>,
}

impl ReadinessBoard for LocalReadiness {
    fn set_ready(&self, ready: bool) -> Result<(), BusError> {
        let player = self.player;
        self.board.send_modify(|flags| flags.set(player, ready));
        Ok(())
    }

    fn snapshot(&self) -> ReadyFlags {
        self.board.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<ReadyFlags> {
        self.board.subscribe()
    }
}
