use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::task::yield_now;

use super::{Notification, Notifier};

type Queue = Arc<Mutex<VecDeque<Notification>>>;

/// In-process notifier feeding a queue read by an [`InMemorySubscriber`].
pub struct InMemoryNotifier {
    queue: Queue,
}

/// Reading end of an [`InMemoryNotifier`].
pub struct InMemorySubscriber {
    queue: Queue,
}

impl InMemoryNotifier {
    pub fn pair() -> (InMemoryNotifier, InMemorySubscriber) {
        let queue = Arc::new(Mutex::new(VecDeque::new()));
        (
            InMemoryNotifier {
                queue: queue.clone(),
            },
            InMemorySubscriber { queue },
        )
    }
}

#[async_trait::async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&mut self, note: &Notification) -> anyhow::Result<()> {
        if Arc::strong_count(&self.queue) == 1 {
            return Err(anyhow::anyhow!("subscriber dropped"));
        }
        let mut queue = self
            .queue
            .lock()
            .map_err(|_| anyhow::anyhow!("notification queue poisoned"))?;
        queue.push_back(note.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

impl InMemorySubscriber {
    /// Next notification, if one is waiting.
    pub fn try_recv(&self) -> Option<Notification> {
        self.queue.lock().ok()?.pop_front()
    }

    /// Wait for the next notification. Fails once the notifier is gone and
    /// the queue is empty.
    pub async fn recv(&mut self) -> anyhow::Result<Notification> {
        loop {
            if let Some(note) = self.try_recv() {
                return Ok(note);
            }
            if Arc::strong_count(&self.queue) == 1 {
                return Err(anyhow::anyhow!("Channel closed"));
            }
            yield_now().await;
        }
    }

    /// Everything currently queued.
    pub fn drain(&self) -> Vec<Notification> {
        match self.queue.lock() {
            Ok(mut queue) => queue.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}
