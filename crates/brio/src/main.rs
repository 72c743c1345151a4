//! brio - Extract annotated code snippets by category
//!
//! brio scans source files for snippets delimited by tag comments such as
//! `# >: {"foundation": ["messages"]}` and `# <: {...}` and prints the ones
//! matching the requested categories.

use brio::config::Config;
use brio::output::{OutputFormat, render_snippets};
use brio::{ExtractOptions, language_rows, resolve_config};
use brio_core::LanguageRegistry;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use eyre::{Result, WrapErr};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// CLI arguments
#[derive(Debug, Parser)]
#[command(name = "brio", version)]
#[command(about = "Brio is a CLI tool for extracting annotated code snippets.")]
#[command(long_about = "Brio scans your codebase for tags in comments like:

# >: {\"foundation\": [\"messages\"]}
... code ...
# <: {\"foundation\": [\"messages\"]}

and extracts relevant snippets based on specified categories.")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

/// Subcommands
#[derive(Debug, Subcommand)]
enum Command {
    /// Extract code snippets by specified categories
    #[command(long_about = "Extract scans your files for code snippets annotated with:

# >: {\"foundation\": [\"messages\"], ...}
... code ...
# <: {\"foundation\": [\"messages\"], ...}

Categories are comma separated. A 'domain:category' term sets a domain that
also applies to every following bare category.

Usage example:
brio extract --categories \"messages:foundation,tests\" --dir ./ --files \"*.py\"")]
    Extract {
        /// Directory to scan
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// File pattern to match (e.g., *.py)
        #[arg(short, long)]
        files: Option<String>,

        /// Categories to extract, e.g. 'messages:foundation,tests'
        #[arg(short, long, default_value = "")]
        categories: String,

        /// Output in clipboard-friendly format (without Markdown)
        #[arg(short = 'v', long)]
        clipboard: bool,

        /// Output format: markdown, text, json
        #[arg(long)]
        format: Option<String>,

        /// Path to config file (default: <dir>/.config/brio/config.yaml)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip files ignored by .gitignore
        #[arg(long)]
        gitignore: bool,
    },

    /// List supported languages and their comment syntax
    Languages {
        /// Directory whose config declares extra languages
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Path to config file (default: <dir>/.config/brio/config.yaml)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn parse_args() -> Cli {
    let extensions: Vec<String> = LanguageRegistry::with_builtins()
        .extensions()
        .into_iter()
        .collect();
    let files_help = format!(
        "File pattern to match (e.g., *.py). Supported extensions: {} \
         (plus those of languages declared in the config file)",
        extensions.join(", ")
    );

    let command = Cli::command().mut_subcommand("extract", |extract| {
        extract.mut_arg("files", |arg| arg.help(files_help))
    });
    Cli::from_arg_matches(&command.get_matches()).unwrap_or_else(|err| err.exit())
}

fn main() -> Result<()> {
    let cli = parse_args();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match cli.command {
        Command::Extract {
            dir,
            files,
            categories,
            clipboard,
            format,
            config,
            gitignore,
        } => {
            let format = match (clipboard, format) {
                (true, _) => Some(OutputFormat::Text),
                (false, Some(name)) => Some(
                    OutputFormat::from_str(&name)
                        .ok_or_else(|| eyre::eyre!("Unknown output format '{}'", name))?,
                ),
                (false, None) => None,
            };
            run_extract_command(ExtractOptions {
                dir,
                files,
                categories,
                format,
                config,
                gitignore,
            })
        }
        Command::Languages { dir, config } => run_languages_command(dir, config),
    }
}

fn run_extract_command(options: ExtractOptions) -> Result<()> {
    eprintln!(
        "{} Scanning {}...",
        "->".blue().bold(),
        options.dir.display()
    );

    let extraction = brio::extract(&options)?;

    if !extraction.result.warnings.is_empty() {
        eprintln!(
            "{} Skipped {} files:",
            "!".yellow().bold(),
            extraction.result.warnings.len()
        );
        for warning in &extraction.result.warnings {
            eprintln!("   {} {}", "-".yellow(), warning);
        }
    }

    eprintln!(
        "   Found {} snippets in {} files",
        extraction.result.len().to_string().green(),
        extraction.files_scanned
    );

    let output = render_snippets(&extraction.result.snippets, extraction.format)
        .wrap_err("Failed to render snippets")?;
    print!("{}", output);

    Ok(())
}

fn run_languages_command(dir: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let config: Config = resolve_config(&dir, config.as_deref())?;
    let registry = config.registry()?;

    for [name, extensions, comments, label] in language_rows(&registry) {
        println!(
            "{:<12} {:<28} {:<18} {}",
            name.cyan(),
            extensions,
            comments.dimmed(),
            label
        );
    }

    Ok(())
}
