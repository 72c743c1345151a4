//! Category queries
//!
//! A query maps categories to the domains the user asked for. It is built
//! from a comma-separated string where `domain:category` sets a domain that
//! carries forward to every following bare `category` term:
//!
//! ```
//! use brio_core::CategoryQuery;
//!
//! let query = CategoryQuery::parse("messages:foundation, tests");
//! assert!(query.domains("foundation").unwrap().contains("messages"));
//! assert!(query.domains("tests").unwrap().contains("messages"));
//! ```

use crate::lexer::TagMetadata;
use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Requested categories, each with its accepted domains.
///
/// An empty domain set accepts any domain; an empty query accepts
/// everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryQuery {
    categories: BTreeMap<String, BTreeSet<String>>,
}

impl CategoryQuery {
    /// The wildcard query
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a query string such as `"messages:foundation, alerts:tests, docs"`.
    ///
    /// Terms are trimmed; empty category names are skipped. A `domain:` prefix
    /// applies to its own term and to every later bare term until the next
    /// prefix. An empty prefix (`:category`) clears the carried domain.
    pub fn parse(input: &str) -> Self {
        let mut query = Self::new();
        let mut carried: Option<String> = None;

        for term in input.split(',') {
            let term = term.trim();
            let category = match term.split_once(':') {
                Some((domain, category)) => {
                    let domain = domain.trim();
                    carried = (!domain.is_empty()).then(|| domain.to_string());
                    category.trim()
                }
                None => term,
            };

            if category.is_empty() {
                continue;
            }
            query.insert(category, carried.as_deref());
        }

        query
    }

    /// Add a category, with a domain or as a wildcard.
    ///
    /// Domains accumulate across repeated categories.
    pub fn insert(&mut self, category: &str, domain: Option<&str>) {
        let domains = self
            .categories
            .entry(category.trim().to_string())
            .or_default();
        if let Some(domain) = domain.map(str::trim).filter(|d| !d.is_empty()) {
            domains.insert(domain.to_string());
        }
    }

    /// Builder form of [`insert`](Self::insert) taking a list of domains
    pub fn with<I, S>(mut self, category: &str, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.insert(category, None);
        for domain in domains {
            self.insert(category, Some(domain.as_ref()));
        }
        self
    }

    /// Whether this is the match-everything query
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Domains requested for a category, if the category was requested
    pub fn domains(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.categories.get(category)
    }

    pub fn categories(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.categories.iter()
    }

    /// Whether tag metadata satisfies this query.
    ///
    /// One shared category is enough: it matches when the query leaves its
    /// domain open or when the domain sets intersect.
    pub fn matches(&self, categories: &TagMetadata) -> bool {
        if self.is_empty() {
            return true;
        }

        categories.iter().any(|(category, domains)| {
            self.categories.get(category).is_some_and(|requested| {
                requested.is_empty() || !requested.is_disjoint(domains)
            })
        })
    }
}

impl FromStr for CategoryQuery {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for CategoryQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (category, domains) in &self.categories {
            if domains.is_empty() {
                if !first {
                    f.write_str(", ")?;
                }
                f.write_str(category)?;
                first = false;
            }
            for domain in domains {
                if !first {
                    f.write_str(", ")?;
                }
                write!(f, "{domain}:{category}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Free-function form of [`CategoryQuery::matches`]
pub fn matches(categories: &TagMetadata, query: &CategoryQuery) -> bool {
    query.matches(categories)
}
