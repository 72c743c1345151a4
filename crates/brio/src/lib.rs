//! brio library - Extract annotated code snippets by category
//!
//! This library exposes the command implementations of brio for testing
//! and embedding purposes.

pub mod config;
pub mod output;

use brio_core::{CategoryQuery, ExtractionResult, LanguageRegistry, Sources, WalkSources};
use config::Config;
use eyre::{Result, WrapErr};
use output::OutputFormat;
use std::path::{Path, PathBuf};

/// Config location relative to the scanned directory
pub const DEFAULT_CONFIG_PATH: &str = ".config/brio/config.yaml";

/// Options of the `extract` command, as given on the command line
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Directory to scan
    pub dir: PathBuf,
    /// Base-name glob; falls back to the config, then to `*`
    pub files: Option<String>,
    /// Raw category filter, e.g. `messages:foundation,tests`
    pub categories: String,
    /// Output format; falls back to the config, then to markdown
    pub format: Option<OutputFormat>,
    /// Explicit config file
    pub config: Option<PathBuf>,
    /// Honor `.gitignore` (also enabled by the config)
    pub gitignore: bool,
}

/// Snippets selected by an `extract` run, with the format to render them in
#[derive(Debug)]
pub struct Extraction {
    pub result: ExtractionResult,
    pub format: OutputFormat,
    pub files_scanned: usize,
}

/// Resolve the config for a scan of `dir`.
///
/// An explicit path must exist; the default location is optional.
pub fn resolve_config(dir: &Path, explicit: Option<&Path>) -> Result<Config> {
    match explicit {
        Some(path) => load_config(path),
        None => load_config_or_default(&dir.join(DEFAULT_CONFIG_PATH)),
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        eyre::bail!(
            "Config file not found at {}\n\n\
             Create a config file, for example:\n\n\
             files: \"*.py\"\n\
             languages:\n  \
               - name: Lua\n    \
                 extensions: [\".lua\"]\n    \
                 single_line_prefix: \"--\"",
            path.display()
        );
    }

    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = serde_yaml::from_str(&content)
        .wrap_err_with(|| format!("Failed to parse config file: {}", path.display()))?;

    Ok(config)
}

/// Load config if it exists, otherwise return the default config
pub fn load_config_or_default(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    load_config(path)
}

/// Run the `extract` command up to, but not including, rendering
pub fn extract(options: &ExtractOptions) -> Result<Extraction> {
    let config = resolve_config(&options.dir, options.config.as_deref())?;
    let registry = config.registry()?;

    let pattern = options
        .files
        .clone()
        .or_else(|| config.files.clone())
        .unwrap_or_else(|| "*".to_string());
    let gitignore = options.gitignore || config.gitignore.unwrap_or(false);
    let format = options.format.or(config.format).unwrap_or_default();
    let query = CategoryQuery::parse(&options.categories);

    tracing::debug!(
        dir = %options.dir.display(),
        pattern = %pattern,
        query = %query,
        "extracting snippets"
    );

    let walker = WalkSources::new(&options.dir)
        .files(pattern)
        .gitignore(gitignore);
    let files = walker
        .select(&registry)
        .wrap_err_with(|| format!("Error collecting files in {}", options.dir.display()))?;
    let files_scanned = files.len();

    let result = brio_core::PathSources::new(files).extract(&registry, &query)?;

    Ok(Extraction {
        result,
        format,
        files_scanned,
    })
}

/// Registered languages as display rows: name, extensions, comment syntax, label
pub fn language_rows(registry: &LanguageRegistry) -> Vec<[String; 4]> {
    registry
        .languages()
        .iter()
        .map(|language| {
            let style = &language.comment_style;
            let comments = if style.has_block_comments() {
                format!(
                    "{}  {} {}",
                    style.single_line_prefix, style.block_start, style.block_end
                )
            } else {
                style.single_line_prefix.clone()
            };
            [
                language.name.clone(),
                registry.extensions_of(language).join(", "),
                comments,
                language.markdown_label.clone(),
            ]
        })
        .collect()
}
