//! Message Components
//!
//! Host-neutral message model shared by the poll engine and host adapters:
//! embeds, select menus, outgoing/edited messages and inbound interaction
//! events. Field names follow the Discord wire shape so adapters can
//! serialize them directly.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! snowflake {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }
    };
}

snowflake!(
    /// User identifier
    UserId
);
snowflake!(
    /// Channel identifier
    ChannelId
);
snowflake!(
    /// Message identifier
    MessageId
);

/// Emoji reference (unicode emoji have no id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emoji {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
}

impl Emoji {
    /// Unicode emoji by glyph
    pub fn unicode(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub inline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedFooter {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon_url: Option<String>,
}

/// Rich embed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<EmbedField>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<EmbedFooter>,
}

impl Embed {
    /// Create an embed with a title
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    /// Create an embed with only a description
    pub fn described(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::default()
        }
    }

    /// Append a field
    pub fn add_field(&mut self, name: impl Into<String>, value: impl Into<String>, inline: bool) {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
    }

    /// Replace the footer
    pub fn set_footer(&mut self, text: impl Into<String>) {
        self.footer = Some(EmbedFooter {
            text: text.into(),
            icon_url: None,
        });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<Emoji>,
}

/// Single-select string menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectMenu {
    pub custom_id: String,
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// Message to post in a channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub embeds: Vec<Embed>,
    pub select_menu: Option<SelectMenu>,
}

/// Edit applied to a posted message.
///
/// `None` leaves the part untouched; `Some(None)` on `select_menu` clears
/// every component from the message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageEdit {
    pub embeds: Option<Vec<Embed>>,
    pub select_menu: Option<Option<SelectMenu>>,
}

/// A message as known after posting or editing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: MessageId,
    pub channel_id: ChannelId,
    #[serde(default)]
    pub embeds: Vec<Embed>,
}

/// Context of the interaction that invoked an operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionContext {
    /// Interaction id (needed to answer the interaction)
    pub interaction_id: String,
    /// Interaction token
    pub token: String,
    pub channel_id: ChannelId,
    pub user_id: UserId,
}

/// A select-menu response delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentInteraction {
    pub context: InteractionContext,
    /// Custom id of the component that fired
    pub custom_id: String,
    /// Selected option values
    pub values: Vec<String>,
}

/// A reaction-added event delivered by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionAdd {
    pub user_id: UserId,
    pub channel_id: ChannelId,
    pub message_id: MessageId,
    pub emoji: Emoji,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embed_serializes_without_empty_parts() {
        let embed = Embed::titled("Lunch?");
        let json = serde_json::to_value(&embed).unwrap();
        assert_eq!(json, serde_json::json!({ "title": "Lunch?" }));
    }

    #[test]
    fn test_set_footer_replaces() {
        let mut embed = Embed::titled("t");
        embed.set_footer("one");
        embed.set_footer("two");
        assert_eq!(embed.footer.unwrap().text, "two");
    }

    #[test]
    fn test_snowflake_display_and_serde() {
        let id = UserId(80351110224678912);
        assert_eq!(id.to_string(), "80351110224678912");
        assert_eq!(serde_json::to_string(&id).unwrap(), "80351110224678912");
    }
}
