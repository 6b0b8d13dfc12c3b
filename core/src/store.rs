//! Template store and channel filtering.
//!
//! The store is filled once when the generator is built and never changes
//! afterwards. It is shared behind an `Arc` by every concurrent render call,
//! so it exposes no mutating API.

use std::collections::BTreeMap;
use tracing::debug;

use crate::variant::Variant;

/// Read-only mapping from action id to its registered variants
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateStore {
    templates: BTreeMap<String, Vec<Variant>>,
}

impl TemplateStore {
    /// Build the store from an already parsed template mapping
    pub fn new(templates: BTreeMap<String, Vec<Variant>>) -> Self {
        let variants: usize = templates.values().map(Vec::len).sum();
        debug!(
            target: "template_store",
            actions = templates.len(),
            variants,
            "Registered response templates"
        );
        Self { templates }
    }

    /// Variants registered for `action_id`; empty for unknown actions
    pub fn lookup(&self, action_id: &str) -> &[Variant] {
        self.templates
            .get(action_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, action_id: &str) -> bool {
        self.templates.contains_key(action_id)
    }

    pub fn action_ids(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Number of registered actions
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl From<BTreeMap<String, Vec<Variant>>> for TemplateStore {
    fn from(templates: BTreeMap<String, Vec<Variant>>) -> Self {
        Self::new(templates)
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<Variant>)> for TemplateStore {
    fn from_iter<I: IntoIterator<Item = (K, Vec<Variant>)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Narrow `variants` to the ones usable on `channel`.
///
/// Variants tagged for `channel` always win; only when there are none do the
/// untagged defaults apply. Variants tagged for any other channel are never
/// returned.
pub fn filter_for_channel<'a>(variants: &'a [Variant], channel: &str) -> Vec<&'a Variant> {
    let (specific, defaults): (Vec<&Variant>, Vec<&Variant>) = variants
        .iter()
        .filter(|v| v.is_default() || v.is_for_channel(channel))
        .partition(|v| v.is_for_channel(channel));

    if specific.is_empty() {
        defaults
    } else {
        specific
    }
}
