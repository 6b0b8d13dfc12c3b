//! Random variant selection.

use parking_lot::Mutex;
use rand::seq::SliceRandom;
use rand::RngCore;
use std::sync::Arc;
use tracing::debug;

use crate::store::{filter_for_channel, TemplateStore};
use crate::variant::Variant;

/// Picks one variant per request, uniformly among those eligible for the channel
pub struct VariantSelector {
    store: Arc<TemplateStore>,
    /// Injected random source; `None` uses the thread-local generator
    rng: Option<Mutex<Box<dyn RngCore + Send>>>,
}

impl VariantSelector {
    pub fn new(store: Arc<TemplateStore>) -> Self {
        Self { store, rng: None }
    }

    /// Use a caller-supplied random source, e.g. a seeded `StdRng`
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Mutex::new(Box::new(rng)));
        self
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    /// Variants eligible for `channel`, or `None` if the action is unknown
    pub fn candidates(&self, action_id: &str, channel: &str) -> Option<Vec<&Variant>> {
        if !self.store.contains(action_id) {
            debug!(target: "nlg", action = %action_id, "No templates registered for action");
            return None;
        }
        Some(filter_for_channel(self.store.lookup(action_id), channel))
    }

    /// Pick a random eligible variant; `None` when there is nothing to say
    pub fn select(&self, action_id: &str, channel: &str) -> Option<&Variant> {
        let candidates = self.candidates(action_id, channel)?;
        self.choose(&candidates)
    }

    pub(crate) fn choose<'a>(&self, candidates: &[&'a Variant]) -> Option<&'a Variant> {
        match &self.rng {
            Some(rng) => candidates.choose(&mut **rng.lock()).copied(),
            None => candidates.choose(&mut rand::thread_rng()).copied(),
        }
    }
}
