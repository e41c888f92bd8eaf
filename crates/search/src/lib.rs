//! Literal search over the editor buffer.
//!
//! Queries are always regex-escaped, so user input is matched as a plain
//! substring. Matches are leftmost-first and non-overlapping, reported as byte
//! offsets together with 1-based line/column positions for display.

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Error conditions raised by the search engine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SearchError {
    #[error("search pattern cannot be empty")]
    EmptyPattern,
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Direction for iterative searches (`Find Next` / `Find Previous`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// Options supplied to the search engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOptions {
    pub pattern: String,
    pub case_sensitive: bool,
    pub direction: SearchDirection,
    pub wrap_around: bool,
}

impl SearchOptions {
    /// Case-insensitive forward search with wrap-around.
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            case_sensitive: false,
            direction: SearchDirection::Forward,
            wrap_around: true,
        }
    }

    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    pub fn direction(mut self, direction: SearchDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.pattern.is_empty() {
            return Err(SearchError::EmptyPattern);
        }
        Ok(())
    }
}

/// Represents a single match produced by a search query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchMatch {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
    pub matched: String,
}

impl SearchMatch {
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}

/// Search engine bound to a particular text buffer.
pub struct SearchEngine<'a> {
    text: &'a str,
    line_index: LineIndex,
}

impl<'a> SearchEngine<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            line_index: LineIndex::new(text),
        }
    }

    /// Returns every match of the literal pattern, left to right.
    pub fn find_all(&self, options: &SearchOptions) -> Result<Vec<SearchMatch>, SearchError> {
        options.validate()?;
        let regex = build_regex(options)?;
        Ok(regex
            .find_iter(self.text)
            .map(|m| self.build_match(m.start(), m.end()))
            .collect())
    }

    /// Finds the next match relative to the byte cursor in the configured direction.
    pub fn find(
        &self,
        cursor: usize,
        options: &SearchOptions,
    ) -> Result<Option<SearchMatch>, SearchError> {
        let matches = self.find_all(options)?;
        let cursor = cursor.min(self.text.len());
        let found = match options.direction {
            SearchDirection::Forward => matches
                .iter()
                .find(|m| m.start >= cursor)
                .or_else(|| options.wrap_around.then(|| matches.first()).flatten()),
            SearchDirection::Backward => matches
                .iter()
                .rev()
                .find(|m| m.end <= cursor)
                .or_else(|| options.wrap_around.then(|| matches.last()).flatten()),
        };
        Ok(found.cloned())
    }

    fn build_match(&self, start: usize, end: usize) -> SearchMatch {
        let (line, column) = self.line_index.line_and_column(self.text, start);
        SearchMatch {
            start,
            end,
            line,
            column,
            matched: self.text[start..end].to_string(),
        }
    }
}

/// Spans to mark for the search bar. An empty query marks nothing.
pub fn highlight_matches(text: &str, query: &str, case_sensitive: bool) -> Vec<SearchMatch> {
    if query.is_empty() {
        return Vec::new();
    }
    let options = SearchOptions::new(query).case_sensitive(case_sensitive);
    SearchEngine::new(text).find_all(&options).unwrap_or_default()
}

fn build_regex(options: &SearchOptions) -> Result<Regex, SearchError> {
    RegexBuilder::new(&regex::escape(&options.pattern))
        .case_insensitive(!options.case_sensitive)
        .build()
        .map_err(|err| SearchError::InvalidPattern(err.to_string()))
}

#[derive(Clone)]
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(idx, _)| idx + 1));
        Self { starts }
    }

    fn line_and_column(&self, text: &str, index: usize) -> (usize, usize) {
        let pos = match self.starts.binary_search(&index) {
            Ok(line_zero) => line_zero,
            Err(insert) => insert.saturating_sub(1),
        };
        let line_start = self.starts.get(pos).copied().unwrap_or(0);
        let column = text[line_start..index].chars().count().saturating_add(1);
        (pos + 1, column)
    }
}
