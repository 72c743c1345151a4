//! Tag line recognition
//!
//! A tag is a comment carrying `>:` (open) or `<:` (close) followed by a JSON
//! object mapping categories to domain lists:
//!
//! ```text
//! # >: {"foundation": ["messages"], "model": ["messages"]}
//! class Message(TenantModel):
//!     pass
//! # <: {"foundation": ["messages"]}
//! ```
//!
//! Tags may also sit anywhere inside a block comment. The [`TagLexer`] only
//! classifies text; block accumulation is driven by the scanner.

use crate::language::CommentStyle;
use eyre::{Result, WrapErr};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Categories of a tag, each with its set of domains.
///
/// An empty domain set means the category applies to any domain.
pub type TagMetadata = BTreeMap<String, BTreeSet<String>>;

/// A recognized tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    /// Opens a snippet
    Open(TagMetadata),
    /// Closes the active snippet; `None` when its JSON did not parse
    Close(Option<TagMetadata>),
}

/// Classifies lines and block comment text for one comment style
#[derive(Debug, Clone)]
pub struct TagLexer {
    style: CommentStyle,
    line_open: Regex,
    line_close: Regex,
    block_open: Regex,
    block_close: Regex,
}

impl TagLexer {
    /// Build the tag patterns for a comment style
    pub fn new(style: &CommentStyle) -> Result<Self> {
        let prefix = regex::escape(&style.single_line_prefix);
        let compile = |pattern: String| {
            Regex::new(&pattern).wrap_err_with(|| format!("Invalid tag pattern: {pattern}"))
        };

        Ok(Self {
            style: style.clone(),
            line_open: compile(format!(r"(?i){prefix}\s*>:\s*\{{"))?,
            line_close: compile(format!(r"(?i){prefix}\s*<:\s*\{{"))?,
            // `.` stops at newlines, so a match never spans two lines
            block_open: compile(r">:\s*\{.*\}".to_string())?,
            block_close: compile(r"<:\s*\{.*\}".to_string())?,
        })
    }

    /// Recognize a single-line tag.
    ///
    /// An open tag with malformed JSON is not a tag at all; a close tag with
    /// malformed JSON still closes.
    pub fn recognize_line(&self, line: &str) -> Option<Tag> {
        if self.line_open.is_match(line)
            && let Ok(metadata) = parse_tag_json(line)
        {
            return Some(Tag::Open(metadata));
        }
        if self.line_close.is_match(line) {
            return Some(Tag::Close(parse_tag_json(line).ok()));
        }
        None
    }

    /// Whether this line starts a block comment
    pub fn opens_block(&self, line: &str) -> bool {
        self.style.has_block_comments() && line.contains(&self.style.block_start)
    }

    /// Whether this line ends a block comment
    pub fn closes_block(&self, line: &str) -> bool {
        self.style.has_block_comments() && line.contains(&self.style.block_end)
    }

    /// Search a completed block comment for a tag, preferring an open tag
    pub fn recognize_block(&self, text: &str) -> Option<Tag> {
        if let Some(found) = self.block_open.find(text)
            && let Ok(metadata) = parse_tag_json(found.as_str())
        {
            return Some(Tag::Open(metadata));
        }
        self.block_close
            .find(text)
            .map(|found| Tag::Close(parse_tag_json(found.as_str()).ok()))
    }
}

/// Decode the JSON object spanning the first `{` to the last `}` of `text`.
///
/// Braces are not balanced: anything between the outermost pair is handed
/// to the JSON decoder as-is. Names are trimmed of surrounding whitespace.
pub fn parse_tag_json(text: &str) -> Result<TagMetadata> {
    let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) else {
        eyre::bail!("No JSON object found in: {text}");
    };
    if end < start {
        eyre::bail!("No JSON object found in: {text}");
    }

    let raw: HashMap<String, Vec<String>> = serde_json::from_str(&text[start..=end])
        .wrap_err_with(|| format!("Malformed tag metadata: {}", &text[start..=end]))?;

    // Keys equal after trimming are merged
    let mut metadata = TagMetadata::new();
    for (category, domains) in raw {
        metadata
            .entry(category.trim().to_string())
            .or_default()
            .extend(domains.iter().map(|d| d.trim().to_string()));
    }
    Ok(metadata)
}
