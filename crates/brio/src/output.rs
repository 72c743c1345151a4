//! Output formatting for extracted snippets

use brio_core::{Snippet, TagMetadata};
use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown sections with fenced code blocks
    #[default]
    #[serde(alias = "md")]
    Markdown,
    /// Plain text without Markdown, for pasting
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Some(Self::Markdown),
            "text" | "plain" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Message printed when nothing matched
pub const NO_SNIPPETS: &str = "No snippets found for the given categories.";

/// Render snippets in the specified format
pub fn render_snippets(snippets: &[Snippet], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(render_markdown(snippets)),
        OutputFormat::Text => Ok(render_text(snippets)),
        OutputFormat::Json => render_json(snippets),
    }
}

/// `foundation -> [messages], model -> [messages]`
fn describe_categories(categories: &TagMetadata) -> String {
    categories
        .iter()
        .map(|(category, domains)| {
            let domains: Vec<&str> = domains.iter().map(String::as_str).collect();
            format!("{} -> [{}]", category, domains.join(" "))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_path(path: &Path) -> String {
    path.display().to_string()
}

fn render_markdown(snippets: &[Snippet]) -> String {
    if snippets.is_empty() {
        return format!("{NO_SNIPPETS}\n");
    }

    let mut output = String::new();
    for (i, snippet) in snippets.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        output.push_str(&format!(
            "## File: {} (lines {}-{})\n\n",
            display_path(&snippet.file),
            snippet.start_line,
            snippet.end_line
        ));
        output.push_str(&format!(
            "**Categories**: {}\n\n",
            describe_categories(&snippet.categories)
        ));

        output.push_str(&format!("```{}\n", snippet.language.markdown_label));
        for line in &snippet.content {
            output.push_str(line);
            output.push('\n');
        }
        output.push_str("```\n");
    }
    output
}

fn render_text(snippets: &[Snippet]) -> String {
    if snippets.is_empty() {
        return format!("{NO_SNIPPETS}\n");
    }

    let mut output = String::new();
    for (i, snippet) in snippets.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }

        output.push_str(&format!(
            "File: {} (lines {}-{})\n",
            display_path(&snippet.file),
            snippet.start_line,
            snippet.end_line
        ));
        output.push_str(&format!(
            "Categories: {}\n\n",
            describe_categories(&snippet.categories)
        ));
        for line in &snippet.content {
            output.push_str(line);
            output.push('\n');
        }
    }
    output
}

#[derive(Serialize)]
struct JsonSnippet<'a> {
    file: String,
    start_line: usize,
    end_line: usize,
    language: &'a str,
    categories: BTreeMap<&'a str, Vec<&'a str>>,
    content: &'a [String],
}

fn render_json(snippets: &[Snippet]) -> Result<String> {
    let json: Vec<JsonSnippet<'_>> = snippets
        .iter()
        .map(|s| JsonSnippet {
            file: display_path(&s.file),
            start_line: s.start_line,
            end_line: s.end_line,
            language: &s.language.name,
            categories: s
                .categories
                .iter()
                .map(|(c, ds)| (c.as_str(), ds.iter().map(String::as_str).collect()))
                .collect(),
            content: &s.content,
        })
        .collect();

    let mut rendered =
        serde_json::to_string_pretty(&json).wrap_err("Failed to serialize snippets")?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use brio_core::{LanguageRegistry, scan_str};

    fn sample() -> Vec<Snippet> {
        let python = LanguageRegistry::with_builtins()
            .lookup(".py")
            .unwrap()
            .clone();
        scan_str(
            "app/models.py",
            python,
            r#"# >: {"foundation": ["messages"], "model": ["messages", "alerts"]}
class Message(TenantModel):
    pass
# <: {}
# >: {"tests": []}
assert True
# <: {}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(OutputFormat::from_str("MD"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("html"), None);
    }

    #[test]
    fn test_render_markdown() {
        let output = render_snippets(&sample(), OutputFormat::Markdown).unwrap();
        let expected = "## File: app/models.py (lines 1-4)\n\n\
                        **Categories**: foundation -> [messages], model -> [alerts messages]\n\n\
                        ```python\n\
                        class Message(TenantModel):\n    pass\n\
                        ```\n\
                        \n\
                        ## File: app/models.py (lines 5-7)\n\n\
                        **Categories**: tests -> []\n\n\
                        ```python\n\
                        assert True\n\
                        ```\n";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_render_text_has_no_markdown() {
        let output = render_snippets(&sample(), OutputFormat::Text).unwrap();
        assert!(output.starts_with("File: app/models.py (lines 1-4)\n"));
        assert!(!output.contains("```"));
        assert!(!output.contains("**"));
        assert!(output.contains("    pass\n"));
    }

    #[test]
    fn test_render_json() {
        let output = render_snippets(&sample(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let first = &value[0];
        assert_eq!(first["file"], "app/models.py");
        assert_eq!(first["start_line"], 1);
        assert_eq!(first["end_line"], 4);
        assert_eq!(first["language"], "Python");
        assert_eq!(first["categories"]["foundation"][0], "messages");
        assert_eq!(first["content"][1], "    pass");
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render_snippets(&[], OutputFormat::Markdown).unwrap(),
            "No snippets found for the given categories.\n"
        );
        assert_eq!(render_snippets(&[], OutputFormat::Json).unwrap(), "[]\n");
    }
}
