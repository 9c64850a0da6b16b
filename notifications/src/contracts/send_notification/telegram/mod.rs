use crate::delivery::{DeliveryStrategy, Notification};
use anyhow::Context;
use async_trait::async_trait;
use futures::stream::FuturesUnordered;
use futures::StreamExt;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use shared_kernel::http_client::HttpClient;
use shared_kernel::non_empty_string;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

non_empty_string!(ChatId);

#[derive(Clone, Debug, Deserialize)]
pub struct TelegramSettings {
    pub bot_token: Secret<String>,
    pub chat_ids: Vec<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

/// Delivers notifications through the Telegram Bot API, one `sendMessage`
/// call per payload per chat.
pub struct TelegramStrategy {
    send_message_url: Url,
    chat_ids: Vec<ChatId>,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct SendMessageResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramStrategy {
    pub fn new(settings: &TelegramSettings) -> anyhow::Result<Self> {
        let send_message_url = Url::parse(&format!(
            "https://api.telegram.org/bot{}/sendMessage",
            settings.bot_token.expose_secret()
        ))
        .context("Failed to build the Telegram sendMessage URL")?;

        let chat_ids = settings
            .chat_ids
            .iter()
            .cloned()
            .map(ChatId::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| anyhow::anyhow!("Invalid chat id: {err}"))?;
        anyhow::ensure!(
            !chat_ids.is_empty(),
            "At least one Telegram chat id must be configured"
        );

        Ok(Self {
            send_message_url,
            chat_ids,
            timeout: Duration::from_secs(settings.timeout_seconds),
        })
    }

    async fn send_to_chat(&self, chat_id: &ChatId, text: &str) -> anyhow::Result<()> {
        let body = json!({
            "chat_id": chat_id.inner(),
            "text": text,
            "parse_mode": "HTML",
        });
        let response: SendMessageResponse = HttpClient::post_json(
            self.send_message_url.clone(),
            HashMap::new(),
            body,
            self.timeout,
        )
        .await?;
        anyhow::ensure!(
            response.ok,
            "Telegram rejected the message: {}",
            response.description.unwrap_or_default()
        );
        debug!("Message delivered to chat {chat_id}");
        Ok(())
    }
}

#[async_trait]
impl DeliveryStrategy for TelegramStrategy {
    #[tracing::instrument(skip_all, fields(payloads = notifications.len()))]
    async fn deliver(&self, notifications: Vec<Notification>) -> anyhow::Result<()> {
        for notification in notifications {
            let text = notification.message_text();
            let text = &text;
            let mut sends: FuturesUnordered<_> = self
                .chat_ids
                .iter()
                .map(|chat_id| async move {
                    self.send_to_chat(chat_id, text)
                        .await
                        .map_err(|err| (chat_id, err))
                })
                .collect();
            while let Some(result) = sends.next().await {
                // One failing chat never blocks the others.
                if let Err((chat_id, err)) = result {
                    error!("Failed to deliver notification to chat {chat_id}: {err:?}");
                }
            }
        }
        Ok(())
    }
}
