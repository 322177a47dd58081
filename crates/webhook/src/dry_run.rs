use async_trait::async_trait;
use tracing::info;
use watch::{DeliveryError, Message, Notifier};

/// Writes messages to the log instead of posting them. Never fails.
#[derive(Debug, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        info!(title = %message.title, body = %message.body, "Dry run: message not sent");
        Ok(())
    }
}
