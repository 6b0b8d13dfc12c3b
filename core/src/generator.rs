//! Templated response generation.
//!
//! [`TemplatedGenerator`] ties the pieces together: resolve variables, pick an
//! eligible variant for the channel, render a copy of it. Unknown actions and
//! channels without eligible variants yield `None`; a template that cannot be
//! filled is returned unfilled and reported, never raised.

use async_trait::async_trait;
use rand::RngCore;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::render::{render, RenderFault};
use crate::selector::VariantSelector;
use crate::store::TemplateStore;
use crate::telemetry::RenderObserver;
use crate::variables::{resolve, Variables};
use crate::variant::Variant;
use crate::Result;

/// Source of the current slot values for one conversation
#[async_trait]
pub trait ConversationState: Send + Sync {
    /// Snapshot of all slot values, read once per request
    async fn current_slot_values(&self) -> Result<Variables>;
}

/// Fixed snapshot of slot values
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationState {
    slots: Variables,
}

impl InMemoryConversationState {
    pub fn new(slots: Variables) -> Self {
        Self { slots }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.slots.insert(name.into(), value);
        self
    }
}

#[async_trait]
impl ConversationState for InMemoryConversationState {
    async fn current_slot_values(&self) -> Result<Variables> {
        Ok(self.slots.clone())
    }
}

/// Turns an action id into a user-facing response
#[async_trait]
pub trait NaturalLanguageGenerator: Send + Sync {
    /// Generate a response for `action_id` on `channel`.
    ///
    /// `Ok(None)` means there is nothing to say. Errors only come from reading
    /// the conversation state.
    async fn generate(
        &self,
        action_id: &str,
        state: &dyn ConversationState,
        channel: &str,
        overrides: &Variables,
    ) -> Result<Option<Variant>>;
}

/// Generator backed by a fixed set of response templates
pub struct TemplatedGenerator {
    selector: VariantSelector,
    observer: Option<Arc<dyn RenderObserver>>,
    /// Substituted for an empty channel argument when set
    default_channel: Option<String>,
}

impl TemplatedGenerator {
    pub fn new(store: TemplateStore) -> Self {
        Self::from_shared(Arc::new(store))
    }

    /// Build on a store shared with other generators
    pub fn from_shared(store: Arc<TemplateStore>) -> Self {
        Self {
            selector: VariantSelector::new(store),
            observer: None,
            default_channel: None,
        }
    }

    /// Apply generator settings; an empty `channel` argument then resolves
    /// to `config.default_channel`
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.default_channel = Some(config.default_channel).filter(|c| !c.is_empty());
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RenderObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Draw variants from `rng` instead of the thread-local generator
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.selector = self.selector.with_rng(rng);
        self
    }

    pub fn store(&self) -> &TemplateStore {
        self.selector.store()
    }

    /// Generate from slot values the caller already holds.
    ///
    /// Synchronous counterpart of [`NaturalLanguageGenerator::generate`].
    pub fn generate_from_values(
        &self,
        action_id: &str,
        slot_values: Option<&Variables>,
        channel: &str,
        overrides: &Variables,
    ) -> Option<Variant> {
        let channel = self.resolve_channel(channel);
        let Some(candidates) = self.selector.candidates(action_id, channel) else {
            self.notify(|o| o.unknown_action(action_id));
            return None;
        };
        let Some(variant) = self.selector.choose(&candidates) else {
            debug!(
                target: "nlg",
                action = %action_id,
                channel = %channel,
                "No template eligible for channel"
            );
            self.notify(|o| o.no_eligible_variant(action_id, channel));
            return None;
        };

        let variables = resolve(slot_values, overrides);
        let rendering = render(variant, &variables);

        if let Some(RenderFault::MissingVariable { name }) = rendering.fault() {
            warn!(
                target: "nlg",
                action = %action_id,
                template = ?variant,
                missing = %name,
                "Failed to fill response template; returning it unfilled"
            );
        }
        self.notify(|o| o.rendered(action_id, &rendering));

        Some(rendering.into_variant())
    }

    fn resolve_channel<'a>(&'a self, channel: &'a str) -> &'a str {
        match &self.default_channel {
            Some(default) if channel.is_empty() => default.as_str(),
            _ => channel,
        }
    }

    fn notify(&self, f: impl FnOnce(&dyn RenderObserver)) {
        if let Some(observer) = &self.observer {
            f(observer.as_ref());
        }
    }
}

#[async_trait]
impl NaturalLanguageGenerator for TemplatedGenerator {
    #[tracing::instrument(skip(self, state, overrides))]
    async fn generate(
        &self,
        action_id: &str,
        state: &dyn ConversationState,
        channel: &str,
        overrides: &Variables,
    ) -> Result<Option<Variant>> {
        let slots = state.current_slot_values().await?;
        Ok(self.generate_from_values(action_id, Some(&slots), channel, overrides))
    }
}
