//! Ordered list of query expressions collected each session.
use std::path::Path;

use crate::error::CatalogError;

/// Marks a catalog line as a comment when it is the first non-blank character.
const COMMENT_PREFIX: char = '#';

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricCatalog {
    expressions: Vec<String>,
}

impl MetricCatalog {
    /// Reads a catalog file, one expression per line.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Unavailable`] when the file cannot be opened or
    /// read. There is no partial catalog.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content =
            std::fs::read_to_string(path).map_err(|err| CatalogError::Unavailable {
                path: path.to_path_buf(),
                source: err,
            })?;
        Ok(Self::parse(&content))
    }

    /// Blank lines and `#` comment lines are skipped; everything else is kept
    /// trimmed, in file order, duplicates included.
    #[must_use]
    pub fn parse(content: &str) -> Self {
        let expressions = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIX))
            .map(str::to_owned)
            .collect();
        Self { expressions }
    }

    #[must_use]
    pub fn expressions(&self) -> &[String] {
        &self.expressions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.expressions.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.expressions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}

impl<'catalog> IntoIterator for &'catalog MetricCatalog {
    type Item = &'catalog String;
    type IntoIter = std::slice::Iter<'catalog, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
