//! Placeholder substitution.
//!
//! # Placeholder grammar
//!
//! A placeholder is a `{`, followed by the shortest non-empty run of
//! characters that contains no newline, followed by `}`. The captured name is
//! looked up verbatim: `{user.name}` reads the key `"user.name"`, it is not a
//! nested path. Anything that does not match (a lone `{` or `}`, `{}`, a `{`
//! whose closing brace sits on a later line) is plain text. There is no escape
//! syntax.
//!
//! Substitution is all-or-nothing: if any placeholder has no value, the text
//! is left exactly as written and the outcome carries a [`RenderFault`].

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::variables::{value_to_text, Variables};
use crate::variant::Variant;

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^\n]+?)\}").expect("placeholder pattern is valid"));

/// Why a variant could not be filled
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderFault {
    #[error("no value for placeholder '{name}': no slot with this name and no explicit value")]
    MissingVariable { name: String },
}

/// Result of rendering one variant
#[derive(Debug, Clone, PartialEq)]
pub enum Rendering {
    /// Every placeholder was substituted, or there was nothing to substitute
    Filled(Variant),
    /// Substitution was abandoned; `variant` keeps its original text
    Fallback { variant: Variant, fault: RenderFault },
}

impl Rendering {
    pub fn variant(&self) -> &Variant {
        match self {
            Rendering::Filled(variant) | Rendering::Fallback { variant, .. } => variant,
        }
    }

    pub fn into_variant(self) -> Variant {
        match self {
            Rendering::Filled(variant) | Rendering::Fallback { variant, .. } => variant,
        }
    }

    pub fn fault(&self) -> Option<&RenderFault> {
        match self {
            Rendering::Filled(_) => None,
            Rendering::Fallback { fault, .. } => Some(fault),
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Rendering::Fallback { .. })
    }
}

/// Render a fresh copy of `variant` against `variables`.
///
/// The input is never modified. Fields other than `text` are copied as-is.
pub fn render(variant: &Variant, variables: &Variables) -> Rendering {
    let mut rendered = variant.clone();

    if variables.is_empty() {
        return Rendering::Filled(rendered);
    }
    let Some(text) = variant.text.as_deref().filter(|t| !t.is_empty()) else {
        return Rendering::Filled(rendered);
    };

    match fill_placeholders(text, variables) {
        Ok(filled) => {
            rendered.text = Some(filled);
            Rendering::Filled(rendered)
        }
        Err(fault) => Rendering::Fallback {
            variant: rendered,
            fault,
        },
    }
}

/// Substitute every placeholder in `text`, failing on the first missing name
pub fn fill_placeholders(text: &str, variables: &Variables) -> Result<String, RenderFault> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(text) {
        let (Some(span), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = variables
            .get(name.as_str())
            .ok_or_else(|| RenderFault::MissingVariable {
                name: name.as_str().to_string(),
            })?;

        out.push_str(&text[last..span.start()]);
        out.push_str(&value_to_text(value));
        last = span.end();
    }

    out.push_str(&text[last..]);
    Ok(out)
}

/// Placeholder names in `text`, in order of appearance
pub fn placeholder_names(text: &str) -> Vec<&str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .collect()
}
