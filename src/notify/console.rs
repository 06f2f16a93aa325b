use super::{Notification, Notifier};

/// Prints each notification's text to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

#[async_trait::async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&mut self, note: &Notification) -> anyhow::Result<()> {
        println!(">> {}", note.message);
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
