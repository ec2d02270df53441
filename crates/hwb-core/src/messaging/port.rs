use async_trait::async_trait;

use crate::{
    domain::{Destination, MessageRef},
    errors::DeliveryError,
};

/// Cross-messenger port.
///
/// Sends plain text; adapters must not reinterpret markup in `text`.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_text(
        &self,
        destination: &Destination,
        text: &str,
    ) -> Result<MessageRef, DeliveryError>;
}
