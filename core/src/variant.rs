//! Response template variants.
//!
//! A variant is one candidate response registered under an action id. Only
//! `text` and `channel` carry meaning for rendering; every other field
//! (buttons, attachments, custom payloads) is kept in `extra` and passed
//! through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::render::placeholder_names;

/// One candidate response template
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Utterance text, may contain `{name}` placeholders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Output channel this variant is restricted to; `None` means any channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,

    /// Opaque fields forwarded to the channel adapter as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Variant {
    /// Text-only variant usable on any channel
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Variant without text, e.g. an image or custom payload only
    pub fn payload(extra: Map<String, Value>) -> Self {
        Self {
            extra,
            ..Self::default()
        }
    }

    pub fn with_channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// A variant with no channel (or an empty one) is usable everywhere
    pub fn is_default(&self) -> bool {
        self.channel.as_deref().map_or(true, str::is_empty)
    }

    /// True if this variant is tagged for exactly `channel`, including an
    /// explicit `""` tag when `""` is requested
    pub fn is_for_channel(&self, channel: &str) -> bool {
        self.channel.as_deref() == Some(channel)
    }

    /// Placeholder identifiers referenced by the text, in order of appearance
    pub fn placeholders(&self) -> Vec<&str> {
        self.text.as_deref().map(placeholder_names).unwrap_or_default()
    }
}
