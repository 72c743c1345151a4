//! Source providers for snippet extraction

use crate::language::LanguageRegistry;
use crate::query::CategoryQuery;
use crate::scanner::{Snippet, scan_file, scan_str};
use eyre::Result;
use std::fmt;
use std::path::{Path, PathBuf};

/// Result of extracting snippets, including files that had to be skipped
#[derive(Debug, Default)]
pub struct ExtractionResult {
    /// Matching snippets, grouped by file in source order
    pub snippets: Vec<Snippet>,
    /// Files that were skipped
    pub warnings: Vec<ScanWarning>,
}

impl ExtractionResult {
    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// A file that could not be scanned
#[derive(Debug, Clone)]
pub struct ScanWarning {
    pub file: PathBuf,
    pub kind: WarningKind,
}

/// Why a file was skipped
#[derive(Debug, Clone)]
pub enum WarningKind {
    /// No language is registered for the file's extension
    UnsupportedExtension,
    /// The file could not be opened or read
    Unreadable(String),
}

impl fmt::Display for ScanWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            WarningKind::UnsupportedExtension => {
                write!(f, "no language registered for {}", self.file.display())
            }
            WarningKind::Unreadable(reason) => {
                write!(f, "could not read {}: {}", self.file.display(), reason)
            }
        }
    }
}

/// Trait for providing source files to extract snippets from
pub trait Sources {
    /// Scan all sources and keep the snippets matching `query`
    fn extract(
        self,
        registry: &LanguageRegistry,
        query: &CategoryQuery,
    ) -> Result<ExtractionResult>;
}

/// Outcome of scanning one file
type FileOutcome = std::result::Result<Vec<Snippet>, ScanWarning>;

fn scan_path(path: &Path, registry: &LanguageRegistry) -> FileOutcome {
    let Some(language) = registry.for_path(path) else {
        tracing::warn!(file = %path.display(), "skipping file with unsupported extension");
        return Err(ScanWarning {
            file: path.to_path_buf(),
            kind: WarningKind::UnsupportedExtension,
        });
    };

    match scan_file(path, language.clone()) {
        Ok(snippets) => {
            tracing::debug!(file = %path.display(), count = snippets.len(), "scanned");
            Ok(snippets)
        }
        Err(err) => {
            tracing::warn!(file = %path.display(), "skipping unreadable file: {err:#}");
            Err(ScanWarning {
                file: path.to_path_buf(),
                kind: WarningKind::Unreadable(format!("{err:#}")),
            })
        }
    }
}

fn collect(outcomes: Vec<FileOutcome>, query: &CategoryQuery) -> ExtractionResult {
    let mut result = ExtractionResult::default();
    for outcome in outcomes {
        match outcome {
            Ok(snippets) => result
                .snippets
                .extend(snippets.into_iter().filter(|s| s.matches(query))),
            Err(warning) => result.warnings.push(warning),
        }
    }
    result
}

/// Sources from an explicit list of file paths
pub struct PathSources(Vec<PathBuf>);

impl PathSources {
    /// Create from an iterator of paths
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self(paths.into_iter().map(Into::into).collect())
    }
}

impl Sources for PathSources {
    fn extract(
        self,
        registry: &LanguageRegistry,
        query: &CategoryQuery,
    ) -> Result<ExtractionResult> {
        #[cfg(feature = "parallel")]
        let outcomes: Vec<FileOutcome> = {
            use rayon::prelude::*;

            // Indexed collect keeps the file order
            self.0
                .par_iter()
                .map(|path| scan_path(path, registry))
                .collect()
        };

        #[cfg(not(feature = "parallel"))]
        let outcomes: Vec<FileOutcome> = self
            .0
            .iter()
            .map(|path| scan_path(path, registry))
            .collect();

        Ok(collect(outcomes, query))
    }
}

/// In-memory sources (useful for testing)
pub struct MemorySources(Vec<(PathBuf, String)>);

impl MemorySources {
    /// Create empty memory sources
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Add a file with content
    pub fn add(mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.0.push((path.into(), content.into()));
        self
    }
}

impl Default for MemorySources {
    fn default() -> Self {
        Self::new()
    }
}

impl Sources for MemorySources {
    fn extract(
        self,
        registry: &LanguageRegistry,
        query: &CategoryQuery,
    ) -> Result<ExtractionResult> {
        let mut outcomes = Vec::with_capacity(self.0.len());
        for (path, content) in self.0 {
            let outcome = match registry.for_path(&path) {
                Some(language) => Ok(scan_str(&path, language.clone(), &content)?),
                None => {
                    tracing::warn!(
                        file = %path.display(),
                        "skipping file with unsupported extension"
                    );
                    Err(ScanWarning {
                        file: path,
                        kind: WarningKind::UnsupportedExtension,
                    })
                }
            };
            outcomes.push(outcome);
        }
        Ok(collect(outcomes, query))
    }
}

/// Directory walker selecting files by registered extension and base-name glob
#[cfg(feature = "walk")]
pub struct WalkSources {
    root: PathBuf,
    pattern: String,
    gitignore: bool,
}

#[cfg(feature = "walk")]
impl WalkSources {
    /// Create a walker for the given root directory, matching every file name
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            pattern: "*".to_string(),
            gitignore: false,
        }
    }

    /// Only keep files whose base name matches this glob (e.g. `test_*.py`).
    ///
    /// `*` and the empty string match everything.
    pub fn files(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    /// Honor `.gitignore`, `.ignore` and git exclude files
    pub fn gitignore(mut self, enabled: bool) -> Self {
        self.gitignore = enabled;
        self
    }

    /// List the candidate files, sorted by path within each directory.
    ///
    /// Fails as a whole on an invalid glob or an unreadable directory.
    pub fn select(&self, registry: &LanguageRegistry) -> Result<Vec<PathBuf>> {
        use eyre::WrapErr;
        use ignore::WalkBuilder;

        let matcher = if self.pattern.is_empty() || self.pattern == "*" {
            None
        } else {
            let glob = globset::Glob::new(&self.pattern)
                .wrap_err_with(|| format!("Invalid file pattern '{}'", self.pattern))?;
            Some(glob.compile_matcher())
        };

        let walker = WalkBuilder::new(&self.root)
            .follow_links(false)
            .hidden(false)
            .ignore(self.gitignore)
            .parents(self.gitignore)
            .git_ignore(self.gitignore)
            .git_global(self.gitignore)
            .git_exclude(self.gitignore)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry
                .wrap_err_with(|| format!("Failed to walk {}", self.root.display()))?;
            if !entry.file_type().is_some_and(|t| t.is_file()) {
                continue;
            }

            let path = entry.path();
            if !registry.is_supported(path) {
                continue;
            }
            if let Some(matcher) = &matcher
                && !path.file_name().is_some_and(|name| matcher.is_match(name))
            {
                continue;
            }

            files.push(path.to_path_buf());
        }

        Ok(files)
    }
}

#[cfg(feature = "walk")]
impl Sources for WalkSources {
    fn extract(
        self,
        registry: &LanguageRegistry,
        query: &CategoryQuery,
    ) -> Result<ExtractionResult> {
        let files = self.select(registry)?;
        tracing::debug!(root = %self.root.display(), files = files.len(), "selected files");
        PathSources::new(files).extract(registry, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> LanguageRegistry {
        LanguageRegistry::with_builtins()
    }

    #[test]
    fn test_memory_sources() {
        let result = MemorySources::new()
            .add("a.py", "# >: {\"foundation\": [\"messages\"]}\nx = 1\n# <: {}\n")
            .add("b.ts", "// >: {\"tests\": [\"messages\"]}\nit();\n// <: {}\n")
            .extract(&registry(), &CategoryQuery::new())
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.snippets[0].file, PathBuf::from("a.py"));
        assert_eq!(result.snippets[1].language.name, "TypeScript");
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_memory_sources_filters_by_query() {
        let result = MemorySources::new()
            .add(
                "a.py",
                "# >: {\"foundation\": [\"messages\"]}\nx = 1\n# <: {}\n\
                 # >: {\"tests\": [\"messages\"]}\ny = 2\n# <: {}\n",
            )
            .extract(&registry(), &CategoryQuery::parse("tests"))
            .unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.snippets[0].content, vec!["y = 2"]);
    }

    #[test]
    fn test_memory_sources_unsupported_extension() {
        let result = MemorySources::new()
            .add("notes.md", "# >: {\"a\": []}\nx\n# <: {}\n")
            .extract(&registry(), &CategoryQuery::new())
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(
            result.warnings[0].kind,
            WarningKind::UnsupportedExtension
        ));
    }

    #[test]
    fn test_path_sources_skips_missing_file() {
        let result = PathSources::new(["/nonexistent/brio/missing.py"])
            .extract(&registry(), &CategoryQuery::new())
            .unwrap();

        assert!(result.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(matches!(result.warnings[0].kind, WarningKind::Unreadable(_)));
        assert!(result.warnings[0].to_string().contains("missing.py"));
    }

    #[test]
    fn test_warning_display() {
        let warning = ScanWarning {
            file: PathBuf::from("x.md"),
            kind: WarningKind::UnsupportedExtension,
        };
        assert_eq!(warning.to_string(), "no language registered for x.md");
    }
}
