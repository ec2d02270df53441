//! Telegram adapter (teloxide).
//!
//! This crate implements the `hwb-core` MessagingPort over Telegram Bot API.

use async_trait::async_trait;

use teloxide::{prelude::*, types::Recipient, RequestError};

use tokio::time::sleep;

use hwb_core::{
    domain::{Destination, MessageId, MessageRef},
    errors::DeliveryError,
    messaging::port::MessagingPort,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }

    fn recipient(destination: &Destination) -> Recipient {
        match destination {
            Destination::Chat(id) => Recipient::Id(teloxide::types::ChatId(*id)),
            Destination::Channel(name) => Recipient::ChannelUsername(name.clone()),
        }
    }

    fn map_err(e: RequestError) -> DeliveryError {
        match e {
            RequestError::Api(api) => DeliveryError::Rejected(api.to_string()),
            other => DeliveryError::Transport(other.to_string()),
        }
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T, DeliveryError>
    where
        Fut: std::future::IntoFuture<Output = Result<T, RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        tracing::warn!(
                            retry_after_secs = d.as_secs(),
                            "telegram flood control, retrying"
                        );
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(
        &self,
        destination: &Destination,
        text: &str,
    ) -> Result<MessageRef, DeliveryError> {
        let msg = self
            .with_retry(|| {
                self.bot
                    .send_message(Self::recipient(destination), text.to_string())
            })
            .await?;

        Ok(MessageRef {
            destination: destination.clone(),
            message_id: MessageId(msg.id.0),
        })
    }
}
