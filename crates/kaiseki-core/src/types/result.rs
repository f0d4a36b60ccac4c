use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::element::{ElementCategory, Elements};

/// A category's value in the collapsed dictionary view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ElementValue {
    Single(String),
    Multiple(Vec<String>),
}

/// The output of a parse.
///
/// A failed parse still carries whatever elements were recovered before the
/// parser gave up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Original file name, extension included.
    pub input: String,

    /// `true` if at least one element was recovered.
    pub success: bool,

    /// Recovered values per category, in discovery order.
    pub elements: BTreeMap<ElementCategory, Vec<String>>,
}

impl ParseResult {
    /// Build a result from a finished element collector.
    #[must_use]
    pub fn new(input: impl Into<String>, elements: Elements) -> Self {
        let elements = elements.into_map();
        Self {
            input: input.into(),
            success: !elements.is_empty(),
            elements,
        }
    }

    /// First value of a category.
    #[must_use]
    pub fn get(&self, category: ElementCategory) -> Option<&str> {
        self.elements
            .get(&category)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All values of a category.
    #[must_use]
    pub fn get_all(&self, category: ElementCategory) -> &[String] {
        self.elements
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    #[must_use]
    pub fn contains(&self, category: ElementCategory) -> bool {
        self.elements.contains_key(&category)
    }

    /// Number of categories with at least one value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Collapse single-value categories to a bare string.
    #[must_use]
    pub fn to_dictionary(&self) -> BTreeMap<ElementCategory, ElementValue> {
        self.elements
            .iter()
            .map(|(category, values)| {
                let value = match values.as_slice() {
                    [single] => ElementValue::Single(single.clone()),
                    _ => ElementValue::Multiple(values.clone()),
                };
                (*category, value)
            })
            .collect()
    }
}

impl std::fmt::Display for ParseResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ParseResult(")?;
        write!(f, "success={}", self.success)?;
        for (category, values) in &self.elements {
            write!(f, ", {category}=")?;
            match values.as_slice() {
                [single] => write!(f, "{single:?}")?,
                _ => write!(f, "{values:?}")?,
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParseResult {
        let mut elements = Elements::new();
        elements.insert(ElementCategory::AnimeTitle, "Death Note");
        elements.insert(ElementCategory::EpisodeNumber, "37");
        elements.insert(ElementCategory::VideoTerm, "XviD");
        elements.insert(ElementCategory::VideoTerm, "H264");
        ParseResult::new("Death Note - 37.avi", elements)
    }

    #[test]
    fn empty_collector_is_failure() {
        let result = ParseResult::new("", Elements::new());
        assert!(!result.success);
        assert!(result.is_empty());
        assert_eq!(result.get(ElementCategory::AnimeTitle), None);
    }

    #[test]
    fn accessors() {
        let result = sample();
        assert!(result.success);
        assert_eq!(result.len(), 3);
        assert_eq!(result.get(ElementCategory::AnimeTitle), Some("Death Note"));
        assert_eq!(result.get_all(ElementCategory::VideoTerm), ["XviD", "H264"]);
        assert!(result.contains(ElementCategory::EpisodeNumber));
        assert!(result.get_all(ElementCategory::Source).is_empty());
    }

    #[test]
    fn dictionary_collapses_single_values() {
        let dict = sample().to_dictionary();
        assert_eq!(
            dict[&ElementCategory::AnimeTitle],
            ElementValue::Single("Death Note".into())
        );
        assert_eq!(
            dict[&ElementCategory::VideoTerm],
            ElementValue::Multiple(vec!["XviD".into(), "H264".into()])
        );

        let json = serde_json::to_value(&dict).unwrap();
        assert_eq!(json["anime_title"], "Death Note");
        assert_eq!(json["video_term"][1], "H264");
    }

    #[test]
    fn display_lists_elements() {
        let display = sample().to_string();
        assert!(display.contains("success=true"));
        assert!(display.contains("anime_title=\"Death Note\""));
        assert!(display.contains("episode_number=\"37\""));
    }

    #[test]
    fn serialization_roundtrip() {
        let result = sample();
        let json = serde_json::to_string_pretty(&result).unwrap();
        let back: ParseResult = serde_json::from_str(&json).unwrap();
        assert_eq!(result, back);
    }
}
