//! # Parser Interface
//!
//! Options, the reusable [`Parser`] and the one-shot [`parse`] function.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KaisekiError, Result};
use crate::keyword::KeywordManager;
use crate::parser::context::ParseContext;
use crate::parser::number::NumberPatterns;
use crate::parser::tokenizer::{self, Tokenizer};
use crate::types::{ElementCategory, Elements, ParseResult};

/// Delimiters used when none are configured.
pub const DEFAULT_DELIMITERS: &str = " _.&+,|";

/// Longest file extension that is split off.
const MAX_EXTENSION_LENGTH: usize = 4;

/// Configuration for parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Search for episode numbers.
    pub parse_episode_number: bool,
    /// Search for an episode title.
    pub parse_episode_title: bool,
    /// Split a known file extension off the name.
    pub parse_file_extension: bool,
    /// Search for the release group.
    pub parse_release_group: bool,
    /// Characters that separate words.
    pub allowed_delimiters: String,
    /// Substrings removed before tokenizing (site tags and the like).
    pub ignored_strings: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            parse_episode_number: true,
            parse_episode_title: true,
            parse_file_extension: true,
            parse_release_group: true,
            allowed_delimiters: DEFAULT_DELIMITERS.to_string(),
            ignored_strings: Vec::new(),
        }
    }
}

impl ParseOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the episode number search.
    pub fn with_episode_number(mut self, enabled: bool) -> Self {
        self.parse_episode_number = enabled;
        self
    }

    /// Enable or disable the episode title search.
    pub fn with_episode_title(mut self, enabled: bool) -> Self {
        self.parse_episode_title = enabled;
        self
    }

    /// Enable or disable file extension splitting.
    pub fn with_file_extension(mut self, enabled: bool) -> Self {
        self.parse_file_extension = enabled;
        self
    }

    /// Enable or disable the release group search.
    pub fn with_release_group(mut self, enabled: bool) -> Self {
        self.parse_release_group = enabled;
        self
    }

    /// Set the delimiter characters.
    pub fn with_delimiters(mut self, delimiters: impl Into<String>) -> Self {
        self.allowed_delimiters = delimiters.into();
        self
    }

    /// Add a substring to strip before tokenizing.
    pub fn with_ignored_string(mut self, ignored: impl Into<String>) -> Self {
        self.ignored_strings.push(ignored.into());
        self
    }

    /// Check that the options can drive the tokenizer.
    ///
    /// # Errors
    ///
    /// Returns `KaisekiError::InvalidOptions` if a delimiter is a bracket or
    /// alphanumeric, or an ignored string is blank.
    pub fn validate(&self) -> Result<()> {
        if let Some(c) = self
            .allowed_delimiters
            .chars()
            .find(|&c| c.is_alphanumeric() || tokenizer::is_bracket(c))
        {
            return Err(KaisekiError::InvalidOptions(format!(
                "delimiter {c:?} cannot separate words"
            )));
        }
        if self.ignored_strings.iter().any(|s| s.trim().is_empty()) {
            return Err(KaisekiError::InvalidOptions(
                "ignored strings must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Reusable parser holding the keyword table and compiled patterns.
///
/// Safe to share across threads; every call to [`Parser::parse`] owns its
/// own tokens and elements.
#[derive(Debug, Clone)]
pub struct Parser {
    options: ParseOptions,
    keywords: KeywordManager,
    patterns: NumberPatterns,
}

impl Parser {
    /// Create a parser with the built-in keyword table.
    ///
    /// # Errors
    ///
    /// Returns `KaisekiError::InvalidOptions` for unusable options.
    pub fn new(options: ParseOptions) -> Result<Self> {
        Self::with_keywords(options, KeywordManager::new())
    }

    /// Create a parser with a caller-supplied keyword table.
    ///
    /// # Errors
    ///
    /// Returns `KaisekiError::InvalidOptions` for unusable options.
    pub fn with_keywords(options: ParseOptions, keywords: KeywordManager) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            options,
            keywords,
            patterns: NumberPatterns::new()?,
        })
    }

    /// Get the parser options.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Get the keyword table.
    pub fn keywords(&self) -> &KeywordManager {
        &self.keywords
    }

    /// Parse a file name.
    ///
    /// Never fails: names with nothing recognizable yield a result with
    /// `success == false`. A name that is only an extension, such as `.mkv`,
    /// stops before tokenizing but still reports the extension it found.
    ///
    /// # Examples
    /// ```
    /// use kaiseki_core::{ElementCategory, ParseOptions, Parser};
    ///
    /// let parser = Parser::new(ParseOptions::default()).unwrap();
    /// let result = parser.parse("[Group] Show Name - 12 [1080p].mkv");
    ///
    /// assert!(result.success);
    /// assert_eq!(result.get(ElementCategory::AnimeTitle), Some("Show Name"));
    /// assert_eq!(result.get(ElementCategory::EpisodeNumber), Some("12"));
    /// assert_eq!(result.get(ElementCategory::ReleaseGroup), Some("Group"));
    /// ```
    pub fn parse(&self, filename: &str) -> ParseResult {
        debug!(filename, "parsing");
        let mut elements = Elements::new();

        let mut name = filename;
        if self.options.parse_file_extension {
            if let Some((stem, extension)) = self.split_extension(filename) {
                elements.insert(ElementCategory::FileExtension, extension);
                name = stem;
            }
        }

        let mut name = name.to_string();
        for ignored in &self.options.ignored_strings {
            name = name.replace(ignored.as_str(), "");
        }
        if name.is_empty() {
            return self.finish(ParseResult::new(filename, elements));
        }

        let tokens = Tokenizer::new(&self.options.allowed_delimiters, &self.keywords)
            .tokenize(&name, &mut elements);
        if tokens.is_empty() {
            return self.finish(ParseResult::new(filename, elements));
        }

        let mut context = ParseContext::new(
            &self.options,
            &self.keywords,
            &self.patterns,
            elements,
            tokens,
        );
        context.run();
        self.finish(ParseResult::new(filename, context.into_elements()))
    }

    /// Split a known extension off the name ("mkv" in "Show.mkv").
    fn split_extension<'n>(&self, filename: &'n str) -> Option<(&'n str, &'n str)> {
        let (stem, extension) = filename.rsplit_once('.')?;
        if extension.is_empty()
            || extension.chars().count() > MAX_EXTENSION_LENGTH
            || !extension.chars().all(char::is_alphanumeric)
        {
            return None;
        }
        self.keywords
            .find_word(extension, Some(ElementCategory::FileExtension))?;
        Some((stem, extension))
    }

    fn finish(&self, result: ParseResult) -> ParseResult {
        debug!(
            filename = %result.input,
            success = result.success,
            elements = result.len(),
            "parsed"
        );
        result
    }
}

/// Convenience function to parse one file name.
///
/// # Errors
///
/// Returns `KaisekiError::InvalidOptions` for unusable options.
pub fn parse(filename: &str, options: &ParseOptions) -> Result<ParseResult> {
    let parser = Parser::new(options.clone())?;
    Ok(parser.parse(filename))
}
