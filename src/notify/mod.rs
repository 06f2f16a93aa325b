//! Outbound notification relay.
//!
//! The engine raises [`BattleEvent`]s synchronously; this module moves them to
//! observers (console, in-process subscribers, TCP watchers) on a separate
//! tokio task so that delivery can never block or fail an attack.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::events::BattleEvent;

pub mod console;
pub mod in_memory;
pub mod tcp;

/// An event plus its rendered text, as sent to observers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub event: BattleEvent,
    pub message: String,
}

impl From<BattleEvent> for Notification {
    fn from(event: BattleEvent) -> Self {
        let message = event.message();
        Self { event, message }
    }
}

/// A destination for notifications.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&mut self, note: &Notification) -> anyhow::Result<()>;

    /// Short label used in log records.
    fn name(&self) -> &str {
        "notifier"
    }
}

enum RelayCommand {
    Publish(Notification),
    Attach(Box<dyn Notifier>),
}

/// Cheap, cloneable sender side of a running relay.
#[derive(Clone)]
pub struct RelayHandle {
    tx: mpsc::UnboundedSender<RelayCommand>,
}

impl RelayHandle {
    /// Queue an event for delivery. Never blocks; a closed relay is logged.
    pub fn publish(&self, event: BattleEvent) {
        if self.tx.send(RelayCommand::Publish(event.into())).is_err() {
            log::warn!("notification relay has stopped; event dropped");
        }
    }

    /// Add an observer. It receives every event published afterwards.
    pub fn attach<N: Notifier + 'static>(&self, notifier: N) {
        if self.tx.send(RelayCommand::Attach(Box::new(notifier))).is_err() {
            log::warn!("notification relay has stopped; observer not attached");
        }
    }
}

/// Background task fanning notifications out to every attached notifier.
pub struct NotificationRelay {
    rx: mpsc::UnboundedReceiver<RelayCommand>,
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotificationRelay {
    /// Start the relay on the current tokio runtime. The task ends once every
    /// [`RelayHandle`] has been dropped and the queue is drained.
    pub fn spawn() -> (RelayHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let relay = NotificationRelay {
            rx,
            notifiers: Vec::new(),
        };
        let task = tokio::spawn(relay.run());
        (RelayHandle { tx }, task)
    }

    async fn run(mut self) {
        while let Some(cmd) = self.rx.recv().await {
            match cmd {
                RelayCommand::Attach(notifier) => {
                    log::debug!("attached {}", notifier.name());
                    self.notifiers.push(notifier);
                }
                RelayCommand::Publish(note) => self.deliver(&note).await,
            }
        }
        log::debug!("notification relay stopped");
    }

    /// Send to every notifier; ones that fail are logged and detached.
    async fn deliver(&mut self, note: &Notification) {
        let mut kept = Vec::with_capacity(self.notifiers.len());
        for mut notifier in self.notifiers.drain(..) {
            match notifier.notify(note).await {
                Ok(()) => kept.push(notifier),
                Err(e) => log::warn!(
                    "failed to deliver notification to {}: {}; detaching",
                    notifier.name(),
                    e
                ),
            }
        }
        self.notifiers = kept;
    }
}
