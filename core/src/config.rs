use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::store::TemplateStore;
use crate::variant::Variant;
use crate::{NlgError, Result};

const TEMPLATES_PATH_ENV: &str = "LOOM_NLG_TEMPLATES";
const DEFAULT_CHANNEL_ENV: &str = "LOOM_NLG_DEFAULT_CHANNEL";

/// One template entry as written in a config file: a bare string is shorthand
/// for a text-only variant
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum VariantEntry {
    Text(String),
    Full(Variant),
}

impl From<VariantEntry> for Variant {
    fn from(entry: VariantEntry) -> Self {
        match entry {
            VariantEntry::Text(text) => Variant::text(text),
            VariantEntry::Full(variant) => variant,
        }
    }
}

fn deserialize_templates<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Vec<Variant>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = BTreeMap::<String, Vec<VariantEntry>>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(action, entries)| (action, entries.into_iter().map(Variant::from).collect()))
        .collect())
}

/// Response templates as loaded from a TOML, JSON or YAML document.
///
/// ```toml
/// [[templates.utter_greet]]
/// text = "Hello {name}!"
///
/// [[templates.utter_greet]]
/// text = "Hi {name}, good to see you on Slack"
/// channel = "slack"
/// ```
///
/// The section may also be called `responses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(
        default,
        alias = "responses",
        deserialize_with = "deserialize_templates"
    )]
    pub templates: BTreeMap<String, Vec<Variant>>,
}

impl TemplateConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Read a template file, picking the format from its extension
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let config = match ext.as_deref() {
            Some("toml") => Self::from_toml_str(&contents)?,
            Some("json") => Self::from_json_str(&contents)?,
            Some("yml") | Some("yaml") => Self::from_yaml_str(&contents)?,
            _ => {
                return Err(NlgError::Config(format!(
                    "unsupported template file format: {}",
                    path.display()
                )))
            }
        };

        debug!(
            target: "nlg_config",
            path = %path.display(),
            actions = config.templates.len(),
            "Loaded templates"
        );
        Ok(config)
    }

    /// Load templates from `LOOM_NLG_TEMPLATES` (or ./templates.toml).
    ///
    /// A missing file is not an error and yields no templates; a file that
    /// exists but cannot be parsed is.
    pub fn load() -> Result<Self> {
        Self::load_from_env_var(TEMPLATES_PATH_ENV)
    }

    /// Same as [`TemplateConfig::load`], reading the path from `var`
    pub fn load_from_env_var(var: &str) -> Result<Self> {
        let path = std::env::var(var)
            .ok()
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("templates.toml"));

        if !path.exists() {
            info!(
                target: "nlg_config",
                path = %path.display(),
                "No template file found; starting without templates"
            );
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn into_store(self) -> TemplateStore {
        TemplateStore::new(self.templates)
    }
}

/// Generator settings for callers without a channel of their own
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Channel used when the caller does not name one
    pub default_channel: String,
}

impl GeneratorConfig {
    /// Read the default channel from `var`, falling back to `collector`
    pub fn from_env_var(var: &str) -> Self {
        Self {
            default_channel: std::env::var(var)
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "collector".to_string()),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from_env_var(DEFAULT_CHANNEL_ENV)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_toml_templates() {
        let config = TemplateConfig::from_toml_str(
            r#"
            [[templates.utter_greet]]
            text = "Hello {name}!"

            [[templates.utter_greet]]
            text = "Hi {name} on Slack"
            channel = "slack"

            [[templates.utter_cat]]
            image = "https://example.com/cat.png"
            "#,
        )
        .unwrap();

        let greet = &config.templates["utter_greet"];
        assert_eq!(greet.len(), 2);
        assert_eq!(greet[1].channel.as_deref(), Some("slack"));

        let cat = &config.templates["utter_cat"][0];
        assert!(cat.text.is_none());
        assert_eq!(cat.extra["image"], json!("https://example.com/cat.png"));
    }

    #[test]
    fn test_json_shorthand_and_alias() {
        let config = TemplateConfig::from_json_str(
            r#"{"responses": {"utter_bye": ["Bye!", {"text": "Bye {name}", "buttons": []}]}}"#,
        )
        .unwrap();

        let bye = &config.templates["utter_bye"];
        assert_eq!(bye[0], Variant::text("Bye!"));
        assert_eq!(bye[1].text.as_deref(), Some("Bye {name}"));
        assert_eq!(bye[1].extra["buttons"], json!([]));
    }

    #[test]
    fn test_yaml_templates() {
        let config = TemplateConfig::from_yaml_str(
            "templates:\n  utter_ask_city:\n    - text: \"Which city, {name}?\"\n      \
             channel: telegram\n    - Which city?\n",
        )
        .unwrap();

        let store = config.into_store();
        let variants = store.lookup("utter_ask_city");
        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].channel.as_deref(), Some("telegram"));
        assert_eq!(variants[1], Variant::text("Which city?"));
    }

    #[test]
    fn test_empty_document() {
        assert!(TemplateConfig::from_toml_str("").unwrap().templates.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let err = TemplateConfig::from_toml_str("templates = 3").unwrap_err();
        assert!(matches!(err, NlgError::Toml(_)));
    }

    #[test]
    fn test_generator_config_default_channel() {
        let config = GeneratorConfig::default();
        assert!(!config.default_channel.is_empty());
        assert_eq!(
            GeneratorConfig::from_env_var("LOOM_NLG_TEST_UNSET_CHANNEL").default_channel,
            "collector"
        );
    }
}
