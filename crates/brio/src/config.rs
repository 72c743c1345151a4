//! Configuration schema for brio
//!
//! Config lives at `.config/brio/config.yaml` relative to the scanned
//! directory. Every field is optional; command-line flags win over it.

use crate::output::OutputFormat;
use brio_core::{CommentStyle, LanguageDescriptor, LanguageRegistry};
use eyre::Result;
use serde::Deserialize;

/// Root configuration for brio
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Default base-name glob for selected files (e.g. `"*.py"`)
    pub files: Option<String>,

    /// Honor `.gitignore` while walking
    pub gitignore: Option<bool>,

    /// Default output format
    pub format: Option<OutputFormat>,

    /// Extra languages, registered after the built-in ones
    pub languages: Vec<LanguageConfig>,
}

/// A language declared in the config file
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LanguageConfig {
    pub name: String,

    /// Extensions with their leading dot, e.g. `[".lua"]`
    pub extensions: Vec<String>,

    pub single_line_prefix: String,

    #[serde(default)]
    pub block_start: String,

    #[serde(default)]
    pub block_end: String,

    /// Code fence label; defaults to the lowercased name
    #[serde(default)]
    pub markdown: Option<String>,
}

impl LanguageConfig {
    pub fn to_descriptor(&self) -> Result<LanguageDescriptor> {
        if self.extensions.is_empty() {
            eyre::bail!("Language '{}' declares no extensions", self.name);
        }
        if let Some(ext) = self.extensions.iter().find(|e| !e.starts_with('.')) {
            eyre::bail!(
                "Language '{}': extension '{}' must start with '.'",
                self.name,
                ext
            );
        }
        if self.single_line_prefix.trim().is_empty() {
            eyre::bail!("Language '{}' has an empty single_line_prefix", self.name);
        }
        if self.block_start.is_empty() != self.block_end.is_empty() {
            eyre::bail!(
                "Language '{}' must set both block_start and block_end, or neither",
                self.name
            );
        }

        Ok(LanguageDescriptor::new(
            self.name.clone(),
            self.extensions.iter().cloned(),
            CommentStyle::new(
                self.single_line_prefix.clone(),
                self.block_start.clone(),
                self.block_end.clone(),
            ),
            self.markdown
                .clone()
                .unwrap_or_else(|| self.name.to_lowercase()),
        ))
    }
}

impl Config {
    /// Built-in languages plus the configured ones
    pub fn registry(&self) -> Result<LanguageRegistry> {
        let mut registry = LanguageRegistry::with_builtins();
        for language in &self.languages {
            registry.register(language.to_descriptor()?);
        }
        Ok(registry)
    }
}
