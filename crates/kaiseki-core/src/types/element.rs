use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic category of a value recovered from a file name.
///
/// Ordering follows declaration order, which keeps serialized output stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementCategory {
    AnimeSeason,
    AnimeSeasonPrefix,
    AnimeTitle,
    AnimeType,
    AnimeYear,
    AudioTerm,
    DeviceCompatibility,
    EpisodeNumber,
    EpisodeNumberAlt,
    EpisodePrefix,
    EpisodeTitle,
    FileChecksum,
    FileExtension,
    Language,
    Other,
    ReleaseGroup,
    ReleaseInformation,
    ReleaseVersion,
    Source,
    Subtitles,
    VideoResolution,
    VideoTerm,
    VolumeNumber,
    VolumePrefix,
}

impl ElementCategory {
    /// Every category, in declaration order.
    pub const ALL: [ElementCategory; 24] = [
        Self::AnimeSeason,
        Self::AnimeSeasonPrefix,
        Self::AnimeTitle,
        Self::AnimeType,
        Self::AnimeYear,
        Self::AudioTerm,
        Self::DeviceCompatibility,
        Self::EpisodeNumber,
        Self::EpisodeNumberAlt,
        Self::EpisodePrefix,
        Self::EpisodeTitle,
        Self::FileChecksum,
        Self::FileExtension,
        Self::Language,
        Self::Other,
        Self::ReleaseGroup,
        Self::ReleaseInformation,
        Self::ReleaseVersion,
        Self::Source,
        Self::Subtitles,
        Self::VideoResolution,
        Self::VideoTerm,
        Self::VolumeNumber,
        Self::VolumePrefix,
    ];

    /// The snake_case name used in serialized output.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnimeSeason => "anime_season",
            Self::AnimeSeasonPrefix => "anime_season_prefix",
            Self::AnimeTitle => "anime_title",
            Self::AnimeType => "anime_type",
            Self::AnimeYear => "anime_year",
            Self::AudioTerm => "audio_term",
            Self::DeviceCompatibility => "device_compatibility",
            Self::EpisodeNumber => "episode_number",
            Self::EpisodeNumberAlt => "episode_number_alt",
            Self::EpisodePrefix => "episode_prefix",
            Self::EpisodeTitle => "episode_title",
            Self::FileChecksum => "file_checksum",
            Self::FileExtension => "file_extension",
            Self::Language => "language",
            Self::Other => "other",
            Self::ReleaseGroup => "release_group",
            Self::ReleaseInformation => "release_information",
            Self::ReleaseVersion => "release_version",
            Self::Source => "source",
            Self::Subtitles => "subtitles",
            Self::VideoResolution => "video_resolution",
            Self::VideoTerm => "video_term",
            Self::VolumeNumber => "volume_number",
            Self::VolumePrefix => "volume_prefix",
        }
    }

    /// Whether the keyword pass may file a matched keyword under this category.
    pub fn is_searchable(self) -> bool {
        matches!(
            self,
            Self::AnimeSeasonPrefix
                | Self::AnimeType
                | Self::AudioTerm
                | Self::DeviceCompatibility
                | Self::EpisodePrefix
                | Self::FileChecksum
                | Self::Language
                | Self::Other
                | Self::ReleaseGroup
                | Self::ReleaseInformation
                | Self::ReleaseVersion
                | Self::Source
                | Self::Subtitles
                | Self::VideoResolution
                | Self::VideoTerm
                | Self::VolumePrefix
        )
    }

    /// Whether at most one value is kept for this category.
    pub fn is_singular(self) -> bool {
        !matches!(
            self,
            Self::AnimeSeason
                | Self::AnimeType
                | Self::AudioTerm
                | Self::DeviceCompatibility
                | Self::EpisodeNumber
                | Self::Language
                | Self::Other
                | Self::ReleaseInformation
                | Self::Source
                | Self::Subtitles
                | Self::VideoTerm
                | Self::VolumeNumber
        )
    }
}

impl fmt::Display for ElementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multi-valued map from category to the values recovered so far.
///
/// Values keep discovery order. Singular categories hold one value; a second
/// insert is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Elements {
    map: BTreeMap<ElementCategory, Vec<String>>,
    check_alt_number: bool,
}

impl Elements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check_alt_number(&self) -> bool {
        self.check_alt_number
    }

    pub fn set_check_alt_number(&mut self, value: bool) {
        self.check_alt_number = value;
    }

    /// Add a value. Returns `false` when a singular category is already set.
    pub fn insert(&mut self, category: ElementCategory, value: impl Into<String>) -> bool {
        let values = self.map.entry(category).or_default();
        if category.is_singular() && !values.is_empty() {
            return false;
        }
        values.push(value.into());
        true
    }

    /// Add a value regardless of the singular rule. Number matchers use this
    /// for release versions, where "01v2-03v2" carries two.
    pub fn append(&mut self, category: ElementCategory, value: impl Into<String>) {
        self.map.entry(category).or_default().push(value.into());
    }

    /// Drop every value of a category.
    pub fn erase(&mut self, category: ElementCategory) {
        self.map.remove(&category);
    }

    /// Remove the first occurrence of `value`, dropping the category once empty.
    pub fn remove(&mut self, category: ElementCategory, value: &str) -> bool {
        let Some(values) = self.map.get_mut(&category) else {
            return false;
        };
        let Some(pos) = values.iter().position(|v| v == value) else {
            return false;
        };
        values.remove(pos);
        if values.is_empty() {
            self.map.remove(&category);
        }
        true
    }

    pub fn contains(&self, category: ElementCategory) -> bool {
        self.map.get(&category).is_some_and(|v| !v.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.map.values().all(Vec::is_empty)
    }

    pub fn get(&self, category: ElementCategory) -> &[String] {
        self.map.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn first(&self, category: ElementCategory) -> Option<&str> {
        self.get(category).first().map(String::as_str)
    }

    /// Consume the collector, yielding trimmed non-empty values per category.
    pub fn into_map(self) -> BTreeMap<ElementCategory, Vec<String>> {
        self.map
            .into_iter()
            .filter_map(|(category, values)| {
                let values: Vec<String> = values
                    .into_iter()
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .collect();
                (!values.is_empty()).then_some((category, values))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_categories_keep_first_value() {
        let mut elements = Elements::new();
        assert!(elements.insert(ElementCategory::AnimeTitle, "First"));
        assert!(!elements.insert(ElementCategory::AnimeTitle, "Second"));
        assert_eq!(elements.get(ElementCategory::AnimeTitle), ["First"]);
    }

    #[test]
    fn plural_categories_accumulate() {
        let mut elements = Elements::new();
        elements.insert(ElementCategory::VideoTerm, "H264");
        elements.insert(ElementCategory::VideoTerm, "10bit");
        elements.insert(ElementCategory::EpisodeNumber, "01");
        elements.insert(ElementCategory::EpisodeNumber, "02");
        assert_eq!(elements.get(ElementCategory::VideoTerm), ["H264", "10bit"]);
        assert_eq!(elements.get(ElementCategory::EpisodeNumber).len(), 2);
    }

    #[test]
    fn append_ignores_singular_rule() {
        let mut elements = Elements::new();
        assert!(elements.insert(ElementCategory::ReleaseVersion, "2"));
        assert!(!elements.insert(ElementCategory::ReleaseVersion, "3"));
        elements.append(ElementCategory::ReleaseVersion, "2");
        assert_eq!(elements.get(ElementCategory::ReleaseVersion), ["2", "2"]);
    }

    #[test]
    fn remove_drops_empty_category() {
        let mut elements = Elements::new();
        elements.insert(ElementCategory::AnimeType, "OVA");
        assert!(elements.remove(ElementCategory::AnimeType, "OVA"));
        assert!(!elements.contains(ElementCategory::AnimeType));
        assert!(!elements.remove(ElementCategory::AnimeType, "OVA"));
        assert!(elements.is_empty());
    }

    #[test]
    fn erase_and_first() {
        let mut elements = Elements::new();
        elements.insert(ElementCategory::EpisodeTitle, "Pilot");
        assert_eq!(elements.first(ElementCategory::EpisodeTitle), Some("Pilot"));
        elements.erase(ElementCategory::EpisodeTitle);
        assert_eq!(elements.first(ElementCategory::EpisodeTitle), None);
    }

    #[test]
    fn into_map_trims_and_drops_empty() {
        let mut elements = Elements::new();
        elements.insert(ElementCategory::AnimeTitle, "  Title ");
        elements.insert(ElementCategory::ReleaseGroup, "   ");
        let map = elements.into_map();
        assert_eq!(map[&ElementCategory::AnimeTitle], vec!["Title".to_string()]);
        assert!(!map.contains_key(&ElementCategory::ReleaseGroup));
    }

    #[test]
    fn category_names_round_trip_through_serde() {
        for category in ElementCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn searchable_and_singular_tables() {
        assert!(ElementCategory::EpisodePrefix.is_searchable());
        assert!(!ElementCategory::AnimeTitle.is_searchable());
        assert!(ElementCategory::ReleaseGroup.is_singular());
        assert!(!ElementCategory::Source.is_singular());
    }
}
