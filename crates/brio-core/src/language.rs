//! Language descriptors and the extension registry
//!
//! A [`LanguageDescriptor`] is pure data: a display name, the file extensions
//! it claims, its comment syntax and the label used for fenced code blocks.
//! Descriptors are registered into a [`LanguageRegistry`], which is built once
//! by the caller and then only read.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;

/// Comment delimiters of a language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentStyle {
    /// Prefix of a single-line comment (e.g. `//`, `#`)
    pub single_line_prefix: String,
    /// Token opening a multi-line comment (e.g. `/*`), empty if the language has none
    pub block_start: String,
    /// Token closing a multi-line comment (e.g. `*/`), empty if the language has none
    pub block_end: String,
}

impl CommentStyle {
    /// Style with both single-line and block comments
    pub fn new(
        single_line_prefix: impl Into<String>,
        block_start: impl Into<String>,
        block_end: impl Into<String>,
    ) -> Self {
        Self {
            single_line_prefix: single_line_prefix.into(),
            block_start: block_start.into(),
            block_end: block_end.into(),
        }
    }

    /// Style with single-line comments only
    pub fn line_only(single_line_prefix: impl Into<String>) -> Self {
        Self::new(single_line_prefix, "", "")
    }

    /// Whether both block tokens are set
    pub fn has_block_comments(&self) -> bool {
        !self.block_start.is_empty() && !self.block_end.is_empty()
    }
}

/// Comment syntax and identity of one supported source language
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageDescriptor {
    /// Display name (e.g. "Python")
    pub name: String,
    /// Extensions claimed by this language, leading dot included (e.g. `.py`)
    pub extensions: Vec<String>,
    /// How comments are written
    pub comment_style: CommentStyle,
    /// Fenced code block label used when rendering markdown
    pub markdown_label: String,
}

impl LanguageDescriptor {
    pub fn new(
        name: impl Into<String>,
        extensions: impl IntoIterator<Item = impl Into<String>>,
        comment_style: CommentStyle,
        markdown_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
            comment_style,
            markdown_label: markdown_label.into(),
        }
    }
}

/// Languages brio knows about out of the box.
pub fn builtin_languages() -> Vec<LanguageDescriptor> {
    let c_like = || CommentStyle::new("//", "/*", "*/");

    vec![
        LanguageDescriptor::new(
            "Python",
            [".py", ".pyi"],
            CommentStyle::new("#", "\"\"\"", "\"\"\""),
            "python",
        ),
        LanguageDescriptor::new("TypeScript", [".ts", ".tsx"], c_like(), "typescript"),
        LanguageDescriptor::new(
            "JavaScript",
            [".js", ".jsx", ".mjs", ".cjs"],
            c_like(),
            "javascript",
        ),
        LanguageDescriptor::new("Rust", [".rs"], c_like(), "rust"),
        LanguageDescriptor::new("Go", [".go"], c_like(), "go"),
        LanguageDescriptor::new("Java", [".java"], c_like(), "java"),
        LanguageDescriptor::new("C", [".c", ".h"], c_like(), "c"),
        LanguageDescriptor::new("C++", [".cpp", ".cc", ".cxx", ".hpp"], c_like(), "cpp"),
        LanguageDescriptor::new(
            "Ruby",
            [".rb"],
            CommentStyle::new("#", "=begin", "=end"),
            "ruby",
        ),
        LanguageDescriptor::new("Shell", [".sh", ".bash"], CommentStyle::line_only("#"), "bash"),
    ]
}

/// Extension-keyed table of language descriptors.
///
/// Registration overwrites per extension: when two descriptors claim the
/// same extension, the one registered last owns it.
#[derive(Debug, Clone, Default)]
pub struct LanguageRegistry {
    by_extension: HashMap<String, Arc<LanguageDescriptor>>,
}

impl LanguageRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding [`builtin_languages`]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for language in builtin_languages() {
            registry.register(language);
        }
        registry
    }

    /// Register a descriptor under each of its extensions
    pub fn register(&mut self, descriptor: LanguageDescriptor) {
        let descriptor = Arc::new(descriptor);
        for ext in &descriptor.extensions {
            self.by_extension.insert(ext.clone(), Arc::clone(&descriptor));
        }
    }

    /// Exact, case-sensitive lookup; `ext` includes the leading dot
    pub fn lookup(&self, ext: &str) -> Option<&Arc<LanguageDescriptor>> {
        self.by_extension.get(ext)
    }

    /// Descriptor for a path, based on its extension
    pub fn for_path(&self, path: &Path) -> Option<&Arc<LanguageDescriptor>> {
        self.lookup(&dotted_extension(path)?)
    }

    /// Whether the path's extension is registered
    pub fn is_supported(&self, path: &Path) -> bool {
        self.for_path(path).is_some()
    }

    /// All registered extensions, sorted
    pub fn extensions(&self) -> BTreeSet<String> {
        self.by_extension.keys().cloned().collect()
    }

    /// Distinct descriptors still owning at least one extension, sorted by name
    pub fn languages(&self) -> Vec<Arc<LanguageDescriptor>> {
        let mut languages: Vec<Arc<LanguageDescriptor>> = Vec::new();
        for descriptor in self.by_extension.values() {
            if !languages.iter().any(|l| Arc::ptr_eq(l, descriptor)) {
                languages.push(Arc::clone(descriptor));
            }
        }
        languages.sort_by(|a, b| a.name.cmp(&b.name));
        languages
    }

    /// Extensions currently owned by `descriptor`, sorted
    pub fn extensions_of(&self, descriptor: &Arc<LanguageDescriptor>) -> Vec<String> {
        let mut exts: Vec<String> = self
            .by_extension
            .iter()
            .filter(|(_, d)| Arc::ptr_eq(d, descriptor))
            .map(|(ext, _)| ext.clone())
            .collect();
        exts.sort();
        exts
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

/// `foo/bar.py` -> `.py`
pub(crate) fn dotted_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lua() -> LanguageDescriptor {
        LanguageDescriptor::new(
            "Lua",
            [".lua"],
            CommentStyle::new("--", "--[[", "]]"),
            "lua",
        )
    }

    #[test]
    fn test_lookup_includes_leading_dot() {
        let registry = LanguageRegistry::with_builtins();
        assert_eq!(registry.lookup(".py").unwrap().name, "Python");
        assert_eq!(registry.lookup(".tsx").unwrap().name, "TypeScript");
        assert!(registry.lookup("py").is_none());
        assert!(registry.lookup(".md").is_none());
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let registry = LanguageRegistry::with_builtins();
        assert!(registry.lookup(".PY").is_none());
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = LanguageRegistry::new();
        registry.register(LanguageDescriptor::new(
            "First",
            [".x", ".y"],
            CommentStyle::line_only("#"),
            "first",
        ));
        registry.register(LanguageDescriptor::new(
            "Second",
            [".y"],
            CommentStyle::line_only("//"),
            "second",
        ));

        assert_eq!(registry.lookup(".x").unwrap().name, "First");
        assert_eq!(registry.lookup(".y").unwrap().name, "Second");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_extensions_union() {
        let mut registry = LanguageRegistry::new();
        registry.register(lua());
        registry.register(LanguageDescriptor::new(
            "Python",
            [".py"],
            CommentStyle::line_only("#"),
            "python",
        ));

        let exts: Vec<String> = registry.extensions().into_iter().collect();
        assert_eq!(exts, vec![".lua".to_string(), ".py".to_string()]);
    }

    #[test]
    fn test_for_path() {
        let registry = LanguageRegistry::with_builtins();
        assert_eq!(
            registry.for_path(Path::new("src/app.ts")).unwrap().markdown_label,
            "typescript"
        );
        assert!(registry.for_path(Path::new("Makefile")).is_none());
        assert!(registry.is_supported(Path::new("a/b/c.rs")));
    }

    #[test]
    fn test_languages_are_distinct_and_sorted() {
        let registry = LanguageRegistry::with_builtins();
        let names: Vec<String> = registry.languages().iter().map(|l| l.name.clone()).collect();

        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.iter().filter(|n| *n == "Python").count(), 1);

        let python = registry.lookup(".py").unwrap().clone();
        assert_eq!(registry.extensions_of(&python), vec![".py", ".pyi"]);
    }

    #[test]
    fn test_shadowed_language_disappears_from_listing() {
        let mut registry = LanguageRegistry::new();
        registry.register(lua());
        registry.register(LanguageDescriptor::new(
            "Luau",
            [".lua"],
            CommentStyle::line_only("--"),
            "lua",
        ));

        let names: Vec<String> = registry.languages().iter().map(|l| l.name.clone()).collect();
        assert_eq!(names, vec!["Luau"]);
    }

    #[test]
    fn test_block_comment_detection() {
        assert!(CommentStyle::new("//", "/*", "*/").has_block_comments());
        assert!(!CommentStyle::line_only("#").has_block_comments());
    }
}
