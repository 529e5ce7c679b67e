pub mod error;
pub mod local;
pub mod readiness;

pub use error::BusError;
pub use local::{LocalBus, LocalEndpoint};
pub use readiness::ReadyFlags;

pub use inner::{EventReceiver, EventSender, EventSenderClone, ReadinessBoard, Receivers};

mod inner {
    use tokio::sync::watch;

    use quizduel_shared::BusMessage;

    use super::{BusError, ReadyFlags};

    /// Who a published event is delivered to
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum Receivers {
        /// Every peer, the publisher included
        All,
        /// Every peer except the publisher
        Others,
    }

    /// Publishes custom events onto the bus. Delivery is reliable and ordered
    /// per event code.
    pub trait EventSender: EventSenderClone {
        fn send(&self, message: &BusMessage, receivers: Receivers) -> Result<(), BusError>;
    }

    pub trait EventSenderClone {
        fn clone_box(&self) -> Box<dyn EventSender>;
    }

    impl<T: 'static + EventSender + Clone> EventSenderClone for T {
        fn clone_box(&self) -> Box<dyn EventSender> {
            Box::new(self.clone())
        }
    }

    impl Clone for Box<dyn EventSender> {
        fn clone(&self) -> Box<dyn EventSender> {
            self.clone_box()
        }
    }

    /// Pulls events addressed to this peer. Must be polled until it
    /// returns `Ok(None)` each tick.
    pub trait EventReceiver {
        fn receive(&mut self) -> Result<Option<BusMessage>, BusError>;
    }

    /// The bus's shared-property store for "Ready" flags. Writes always
    /// target the local player's own entry.
    pub trait ReadinessBoard {
        fn set_ready(&self, ready: bool) -> Result<(), BusError>;
        fn snapshot(&self) -> ReadyFlags;
        fn subscribe(&self) -> watch::Receiver<ReadyFlags>;
    }
}
