//! Keyword blacklists
//!
//! One plain-text word list per category (`<dir>/<category>.txt`): one term
//! per line, blank lines and `#` comments skipped, terms lowercased on read.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::rules::Category;

static EMPTY: BTreeSet<String> = BTreeSet::new();

/// Per-category term sets
#[derive(Debug, Clone, Default)]
pub struct Blacklists {
    /// Directory the word lists are read from (None for in-memory lists)
    dir: Option<PathBuf>,

    /// Category -> terms. A category is "present" once it has an entry,
    /// even if its set is empty.
    terms: BTreeMap<Category, BTreeSet<String>>,
}

impl Blacklists {
    /// Create an unloaded store backed by a directory
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
            terms: BTreeMap::new(),
        }
    }

    /// Create and load in one step
    pub fn load_from(dir: impl Into<PathBuf>) -> Result<Self> {
        let mut blacklists = Self::new(dir);
        blacklists.load()?;
        Ok(blacklists)
    }

    /// Create an in-memory store with no categories present
    pub fn empty() -> Self {
        Self::default()
    }

    /// Replace the terms for a category (builder style, mainly for tests
    /// and embedding)
    pub fn with_terms<I, S>(mut self, category: Category, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.set_terms(category, terms);
        self
    }

    /// Replace the terms for a category
    pub fn set_terms<I, S>(&mut self, category: Category, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = terms
            .into_iter()
            .filter_map(|t| normalize_term(t.as_ref()))
            .collect();
        self.terms.insert(category, set);
    }

    /// (Re)load every category from the backing directory.
    ///
    /// Prior state is discarded. A missing file leaves that category present
    /// but empty; a file that exists but cannot be read is an error.
    pub fn load(&mut self) -> Result<()> {
        let mut terms = BTreeMap::new();

        for category in Category::ALL {
            let set = match &self.dir {
                Some(dir) => read_word_list(&word_list_path(dir, category))?,
                None => BTreeSet::new(),
            };
            debug!(category = %category, terms = set.len(), "Loaded word list");
            terms.insert(category, set);
        }

        self.terms = terms;
        Ok(())
    }

    /// Terms for a category (empty if absent)
    pub fn get(&self, category: Category) -> &BTreeSet<String> {
        self.terms.get(&category).unwrap_or(&EMPTY)
    }

    /// Terms for a category given by name (empty if the name is unknown)
    pub fn get_by_name(&self, name: &str) -> &BTreeSet<String> {
        Category::from_str(name)
            .map(|c| self.get(c))
            .unwrap_or(&EMPTY)
    }

    /// Whether the category has an entry in the mapping
    pub fn contains(&self, category: Category) -> bool {
        self.terms.contains_key(&category)
    }

    /// Present categories with their terms, in scan order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &BTreeSet<String>)> {
        self.terms.iter().map(|(c, t)| (*c, t))
    }

    /// Total number of terms across categories
    pub fn len(&self) -> usize {
        self.terms.values().map(BTreeSet::len).sum()
    }

    /// Check if no terms are loaded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Backing directory, if any
    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

/// Path of a category's word list inside `dir`
pub fn word_list_path(dir: &Path, category: Category) -> PathBuf {
    dir.join(format!("{}.txt", category.as_str()))
}

/// Parse word-list contents into a term set
pub fn parse_word_list(content: &str) -> BTreeSet<String> {
    content.lines().filter_map(normalize_term).collect()
}

fn read_word_list(path: &Path) -> Result<BTreeSet<String>> {
    if !path.exists() {
        return Ok(BTreeSet::new());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(parse_word_list(&content))
}

fn normalize_term(line: &str) -> Option<String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(line.to_lowercase())
}
