//! Snippet scanning
//!
//! [`SnippetScanner`] consumes a file one physical line at a time and keeps
//! two pieces of state: the snippet currently open (if any) and the block
//! comment currently being accumulated (if any). Per line, in priority order:
//!
//! 1. a single-line open tag starts a snippet, dropping any unterminated one;
//! 2. a single-line close tag emits the active snippet;
//! 3. a block-start token begins block accumulation;
//! 4. inside a block, lines are buffered until the block-end token, then the
//!    buffer is searched for a tag (reported at the block's first line);
//! 5. any other line is body text of the active snippet.

use crate::language::LanguageDescriptor;
use crate::lexer::{Tag, TagLexer, TagMetadata};
use crate::query::CategoryQuery;
use eyre::{Result, WrapErr};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A closed, tagged region of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    /// File the snippet was found in
    pub file: PathBuf,
    /// Line of the opening tag (1-indexed)
    pub start_line: usize,
    /// Line of the closing tag (1-indexed)
    pub end_line: usize,
    /// Metadata of the opening tag
    pub categories: TagMetadata,
    /// Body lines between the two tags
    pub content: Vec<String>,
    /// Language the file was scanned as
    pub language: Arc<LanguageDescriptor>,
}

impl Snippet {
    /// Whether this snippet passes the query
    pub fn matches(&self, query: &CategoryQuery) -> bool {
        query.matches(&self.categories)
    }
}

#[derive(Debug)]
struct ActiveSnippet {
    categories: TagMetadata,
    start_line: usize,
    lines: Vec<String>,
}

#[derive(Debug)]
struct BlockComment {
    start_line: usize,
    lines: Vec<(usize, String)>,
}

impl BlockComment {
    fn text(&self) -> String {
        let mut text = String::new();
        for (_, line) in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

/// Line-driven snippet state machine for a single file
#[derive(Debug)]
pub struct SnippetScanner {
    file: PathBuf,
    language: Arc<LanguageDescriptor>,
    lexer: TagLexer,
    line_num: usize,
    active: Option<ActiveSnippet>,
    block: Option<BlockComment>,
    snippets: Vec<Snippet>,
}

impl SnippetScanner {
    pub fn new(file: impl Into<PathBuf>, language: Arc<LanguageDescriptor>) -> Result<Self> {
        let lexer = TagLexer::new(&language.comment_style)?;
        Ok(Self {
            file: file.into(),
            language,
            lexer,
            line_num: 0,
            active: None,
            block: None,
            snippets: Vec::new(),
        })
    }

    /// Process the next physical line (without its line terminator)
    pub fn feed(&mut self, line: &str) {
        self.line_num += 1;
        let line_num = self.line_num;

        if let Some(tag) = self.lexer.recognize_line(line) {
            match tag {
                Tag::Open(categories) => self.open(categories, line_num),
                Tag::Close(_) => self.close(line_num),
            }
            return;
        }

        if self.block.is_none() && self.lexer.opens_block(line) {
            self.block = Some(BlockComment {
                start_line: line_num,
                lines: vec![(line_num, line.to_string())],
            });
            return;
        }

        if let Some(block) = &mut self.block {
            block.lines.push((line_num, line.to_string()));
            if self.lexer.closes_block(line)
                && let Some(block) = self.block.take()
            {
                self.resolve_block(block);
            }
            return;
        }

        if let Some(active) = &mut self.active {
            active.lines.push(line.to_string());
        }
    }

    /// Finish the file and return its snippets in order of their closing tags.
    ///
    /// An unterminated snippet is dropped.
    pub fn finish(self) -> Vec<Snippet> {
        if let Some(active) = &self.active {
            tracing::debug!(
                file = %self.file.display(),
                line = active.start_line,
                "dropping unterminated snippet at end of file"
            );
        }
        self.snippets
    }

    fn open(&mut self, categories: TagMetadata, line_num: usize) {
        if let Some(previous) = self.active.take() {
            tracing::debug!(
                file = %self.file.display(),
                line = previous.start_line,
                "discarding unterminated snippet"
            );
        }
        self.active = Some(ActiveSnippet {
            categories,
            start_line: line_num,
            lines: Vec::new(),
        });
    }

    fn close(&mut self, line_num: usize) {
        // Only the opening metadata is kept
        let Some(active) = self.active.take() else {
            return;
        };
        self.snippets.push(Snippet {
            file: self.file.clone(),
            start_line: active.start_line,
            end_line: line_num,
            categories: active.categories,
            content: active.lines,
            language: Arc::clone(&self.language),
        });
    }

    fn resolve_block(&mut self, block: BlockComment) {
        match self.lexer.recognize_block(&block.text()) {
            Some(Tag::Open(categories)) => self.open(categories, block.start_line),
            Some(Tag::Close(_)) => {
                // A block that began before the snippet opened cannot close it
                if self
                    .active
                    .as_ref()
                    .is_some_and(|active| active.start_line < block.start_line)
                {
                    self.close(block.start_line);
                }
            }
            None => {
                // An untagged comment is ordinary body text of the snippet
                if let Some(active) = &mut self.active {
                    let start_line = active.start_line;
                    active.lines.extend(
                        block
                            .lines
                            .into_iter()
                            .filter(|(num, _)| *num > start_line)
                            .map(|(_, line)| line),
                    );
                }
            }
        }
    }
}

/// Scan in-memory content
pub fn scan_str(
    file: impl Into<PathBuf>,
    language: Arc<LanguageDescriptor>,
    content: &str,
) -> Result<Vec<Snippet>> {
    let mut scanner = SnippetScanner::new(file, language)?;
    for line in content.lines() {
        scanner.feed(line);
    }
    Ok(scanner.finish())
}

/// Scan a buffered reader line by line
pub fn scan_reader(
    file: impl Into<PathBuf>,
    language: Arc<LanguageDescriptor>,
    reader: impl BufRead,
) -> Result<Vec<Snippet>> {
    let file = file.into();
    let mut scanner = SnippetScanner::new(file.clone(), language)?;
    for line in reader.lines() {
        let line = line.wrap_err_with(|| format!("Failed to read {}", file.display()))?;
        scanner.feed(&line);
    }
    Ok(scanner.finish())
}

/// Open and scan a file; the handle is closed when this returns
pub fn scan_file(path: &Path, language: Arc<LanguageDescriptor>) -> Result<Vec<Snippet>> {
    let handle =
        File::open(path).wrap_err_with(|| format!("Failed to open {}", path.display()))?;
    scan_reader(path, language, BufReader::new(handle))
}
