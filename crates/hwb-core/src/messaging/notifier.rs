use std::sync::Arc;

use crate::{
    domain::{Destination, MessageRef, NotificationMessage},
    errors::DeliveryError,
    messaging::port::MessagingPort,
};

/// Delivers notifications to the single destination configured at startup.
#[derive(Clone)]
pub struct Notifier {
    messenger: Arc<dyn MessagingPort>,
    destination: Destination,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn MessagingPort>, destination: Destination) -> Self {
        Self {
            messenger,
            destination,
        }
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    pub async fn send(&self, message: &NotificationMessage) -> Result<MessageRef, DeliveryError> {
        tracing::debug!(destination = %self.destination, "sending message");
        let receipt = self
            .messenger
            .send_text(&self.destination, message.as_str())
            .await?;
        tracing::info!(
            destination = %self.destination,
            message_id = receipt.message_id.0,
            text = message.as_str(),
            "message sent"
        );
        Ok(receipt)
    }
}
