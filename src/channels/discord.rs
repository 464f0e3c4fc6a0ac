//! Discord Host Implementation
//!
//! Implements [`PollHost`] over the Discord Bot REST API.
//! Gateway events are not read here; the bot process forwards them to an
//! [`EventRouter`](crate::events::EventRouter).

use super::components::{
    ChannelId, Embed, InteractionContext, MessageEdit, MessageId, MessageRef, OutgoingMessage,
    SelectMenu, UserId,
};
use super::host::{HostError, HostResult, PollHost};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

const COMPONENT_ACTION_ROW: u8 = 1;
const COMPONENT_STRING_SELECT: u8 = 3;
const CALLBACK_CHANNEL_MESSAGE: u8 = 4;
const CALLBACK_DEFERRED_UPDATE: u8 = 6;
const FLAG_EPHEMERAL: u64 = 1 << 6;

/// Discord host configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConfig {
    /// Bot token from Discord Developer Portal
    pub bot_token: String,
    /// REST base URL
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl DiscordConfig {
    pub fn new(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_base: default_api_base(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Discord REST host
#[derive(Debug, Clone)]
pub struct DiscordHost {
    config: DiscordConfig,
    client: reqwest::Client,
}

impl DiscordHost {
    /// Create a new Discord host
    pub fn new(config: DiscordConfig) -> HostResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| HostError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Send a request to the Discord API. Returns `None` on 204 No Content.
    async fn api_request(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        body: Option<Value>,
    ) -> HostResult<Option<Value>> {
        let mut request = self
            .client
            .request(method, format!("{}/{}", self.config.api_base, endpoint))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bot {}", self.config.bot_token),
            );

        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| HostError::Network(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(HostError::NotFound(endpoint.to_string()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(HostError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map(Some)
            .map_err(|e| HostError::Parse(e.to_string()))
    }

    async fn interaction_callback(&self, ctx: &InteractionContext, body: Value) -> HostResult<()> {
        let endpoint = format!("interactions/{}/{}/callback", ctx.interaction_id, ctx.token);
        self.api_request(reqwest::Method::POST, &endpoint, Some(body))
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl PollHost for DiscordHost {
    async fn send_message(
        &self,
        channel_id: ChannelId,
        message: OutgoingMessage,
    ) -> HostResult<MessageRef> {
        let body = json!({
            "embeds": message.embeds,
            "components": components_json(message.select_menu.as_ref()),
        });
        let endpoint = format!("channels/{}/messages", channel_id);
        let response = self
            .api_request(reqwest::Method::POST, &endpoint, Some(body))
            .await?
            .ok_or_else(|| HostError::Parse("empty message response".to_string()))?;
        parse_message(response)
    }

    async fn send_ephemeral(&self, ctx: &InteractionContext, embed: Embed) -> HostResult<()> {
        let body = json!({
            "type": CALLBACK_CHANNEL_MESSAGE,
            "data": {
                "embeds": [embed],
                "flags": FLAG_EPHEMERAL,
            },
        });
        self.interaction_callback(ctx, body).await
    }

    async fn edit_message(&self, message: &MessageRef, edit: MessageEdit) -> HostResult<MessageRef> {
        let endpoint = format!("channels/{}/messages/{}", message.channel_id, message.id);
        let response = self
            .api_request(reqwest::Method::PATCH, &endpoint, Some(edit_body(&edit)))
            .await?
            .ok_or_else(|| HostError::Parse("empty message response".to_string()))?;
        parse_message(response)
    }

    async fn remove_reaction(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
        emoji: &str,
        user_id: UserId,
    ) -> HostResult<()> {
        let endpoint = format!(
            "channels/{}/messages/{}/reactions/{}/{}",
            channel_id,
            message_id,
            urlencoding::encode(emoji),
            user_id
        );
        debug!(channel = %channel_id, message = %message_id, user = %user_id, "removing reaction");
        self.api_request(reqwest::Method::DELETE, &endpoint, None)
            .await
            .map(|_| ())
    }

    async fn acknowledge_component(&self, ctx: &InteractionContext) -> HostResult<()> {
        self.interaction_callback(ctx, json!({ "type": CALLBACK_DEFERRED_UPDATE }))
            .await
    }
}

/// Wrap a select menu in an action row; no menu means no components
fn components_json(menu: Option<&SelectMenu>) -> Value {
    match menu {
        Some(menu) => json!([{
            "type": COMPONENT_ACTION_ROW,
            "components": [{
                "type": COMPONENT_STRING_SELECT,
                "custom_id": menu.custom_id,
                "options": menu.options,
                "placeholder": menu.placeholder,
                "min_values": 1,
                "max_values": 1,
            }],
        }]),
        None => json!([]),
    }
}

fn edit_body(edit: &MessageEdit) -> Value {
    let mut body = json!({});
    if let Some(embeds) = &edit.embeds {
        body["embeds"] = json!(embeds);
    }
    if let Some(menu) = &edit.select_menu {
        body["components"] = components_json(menu.as_ref());
    }
    body
}

// Discord API response types
#[derive(Debug, Deserialize)]
struct DiscordMessageResponse {
    id: String,
    channel_id: String,
    #[serde(default)]
    embeds: Vec<Embed>,
}

fn parse_snowflake(raw: &str) -> HostResult<u64> {
    raw.parse()
        .map_err(|_| HostError::Parse(format!("invalid snowflake: {raw}")))
}

fn parse_message(value: Value) -> HostResult<MessageRef> {
    let response: DiscordMessageResponse =
        serde_json::from_value(value).map_err(|e| HostError::Parse(e.to_string()))?;
    Ok(MessageRef {
        id: MessageId(parse_snowflake(&response.id)?),
        channel_id: ChannelId(parse_snowflake(&response.channel_id)?),
        embeds: response.embeds,
    })
}
