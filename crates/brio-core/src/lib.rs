//! brio-core - Core library for extracting tagged code snippets
//!
//! This crate provides the building blocks for:
//! - Describing the comment syntax of source languages ([`LanguageRegistry`])
//! - Recognizing snippet tags in comments ([`TagLexer`])
//! - Turning tagged line ranges into [`Snippet`]s ([`SnippetScanner`])
//! - Filtering snippets by category and domain ([`CategoryQuery`])
//! - Selecting files from a directory tree ([`WalkSources`])
//!
//! # Features
//!
//! - `walk` - Enable [`WalkSources`] for directory walking (brings in `ignore` and `globset`)
//! - `parallel` - Enable parallel scanning of files (brings in `rayon`)
//!
//! # Tag Syntax
//!
//! A snippet starts at a comment carrying `>:` and ends at one carrying `<:`,
//! each followed by a JSON object mapping categories to domains:
//!
//! ```python
//! # >: {"foundation": ["messages"], "model": ["messages"]}
//! class Message(TenantModel):
//!     pass
//! # <: {"foundation": ["messages"]}
//! ```
//!
//! Tags can also be written inside block comments (`/* ... */`, docstrings).
//! Only the opening tag's metadata is kept.
//!
//! # Extracting Snippets
//!
//! ```ignore
//! use brio_core::{CategoryQuery, LanguageRegistry, Sources, WalkSources};
//!
//! let registry = LanguageRegistry::with_builtins();
//! let query = CategoryQuery::parse("messages:foundation, tests");
//! let result = WalkSources::new(".").files("*.py").extract(&registry, &query)?;
//! for snippet in &result.snippets {
//!     println!("{}:{}-{}", snippet.file.display(), snippet.start_line, snippet.end_line);
//! }
//! ```
//!
//! # In-Memory Sources (for testing)
//!
//! Use [`MemorySources`] when you don't want to hit the filesystem:
//!
//! ```
//! use brio_core::{CategoryQuery, LanguageRegistry, MemorySources, Sources};
//!
//! let registry = LanguageRegistry::with_builtins();
//! let result = MemorySources::new()
//!     .add("models.py", "# >: {\"foundation\": [\"messages\"]}\nclass Message: pass\n# <: {}")
//!     .add("app.ts", "// >: {\"tests\": [\"alerts\"]}\nrun();\n// <: {}")
//!     .extract(&registry, &CategoryQuery::parse("messages:foundation"))
//!     .unwrap();
//!
//! assert_eq!(result.snippets.len(), 1);
//! assert_eq!(result.snippets[0].content, vec!["class Message: pass"]);
//! ```

mod language;
mod lexer;
mod query;
mod scanner;
mod sources;

pub use language::{CommentStyle, LanguageDescriptor, LanguageRegistry, builtin_languages};
pub use lexer::{Tag, TagLexer, TagMetadata, parse_tag_json};
pub use query::{CategoryQuery, matches};
pub use scanner::{Snippet, SnippetScanner, scan_file, scan_reader, scan_str};
pub use sources::{
    ExtractionResult, MemorySources, PathSources, ScanWarning, Sources, WarningKind,
};

#[cfg(feature = "walk")]
pub use sources::WalkSources;
