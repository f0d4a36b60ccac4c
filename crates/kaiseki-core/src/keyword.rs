//! # Keyword Database
//!
//! Release-name vocabulary (sources, codecs, prefixes, markers) keyed by a
//! normalized spelling. A [`KeywordManager`] is built once per parser and only
//! read while parsing.

use std::collections::HashMap;
use std::ops::Range;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::types::{ElementCategory, Elements};

/// Per-keyword behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeywordOptions {
    /// The owning token becomes an identifier once matched.
    pub identifiable: bool,
    /// The keyword pass considers this keyword at all.
    pub searchable: bool,
    /// A prefix keyword may claim the number that follows it.
    pub valid: bool,
}

impl KeywordOptions {
    pub const DEFAULT: Self = Self {
        identifiable: true,
        searchable: true,
        valid: true,
    };
    pub const INVALID: Self = Self {
        valid: false,
        ..Self::DEFAULT
    };
    pub const UNIDENTIFIABLE: Self = Self {
        identifiable: false,
        ..Self::DEFAULT
    };
    pub const UNIDENTIFIABLE_INVALID: Self = Self {
        identifiable: false,
        valid: false,
        ..Self::DEFAULT
    };
    pub const UNIDENTIFIABLE_UNSEARCHABLE: Self = Self {
        identifiable: false,
        searchable: false,
        ..Self::DEFAULT
    };
}

impl Default for KeywordOptions {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A keyword table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keyword {
    pub category: ElementCategory,
    pub options: KeywordOptions,
}

/// Multi-word or dotted keywords located by literal search before the text
/// is split on delimiters.
const PEEK_ENTRIES: &[(ElementCategory, &[&str])] = &[
    (ElementCategory::AudioTerm, &["Dual Audio", "Multi Audio"]),
    (ElementCategory::VideoTerm, &["H264", "H.264", "h264", "h.264"]),
    (ElementCategory::VideoResolution, &["480p", "720p", "1080p"]),
    (ElementCategory::Subtitles, &["Multiple Subtitle", "Multi Subs"]),
    (ElementCategory::Source, &["Blu-Ray"]),
];

/// Canonical lookup form of a word.
///
/// Decomposes (NFKD), drops combining marks, whitespace and the `.-_`
/// separators, then lowercases, so "H.264", "h264" and "H264" share a key.
pub fn normalize(word: &str) -> String {
    word.nfkd()
        .filter(|&c| !is_combining_mark(c))
        .filter(|&c| !c.is_whitespace() && !matches!(c, '.' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Keyword lookup tables.
#[derive(Debug, Clone)]
pub struct KeywordManager {
    keys: HashMap<String, Keyword>,
    file_extensions: HashMap<String, Keyword>,
}

impl Default for KeywordManager {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordManager {
    /// Build the manager with the built-in release-name vocabulary.
    pub fn new() -> Self {
        use ElementCategory as C;
        use KeywordOptions as O;

        let mut manager = Self::empty();

        manager.add(C::AnimeSeasonPrefix, O::UNIDENTIFIABLE, &["S", "SAISON", "SEASON"]);

        manager.add(
            C::AnimeType,
            O::UNIDENTIFIABLE,
            &[
                "GEKIJOUBAN", "MOVIE", "OAD", "OAV", "ONA", "OVA", "SPECIAL", "SPECIALS", "TV",
            ],
        );
        // "Yumeiro Patissiere SP Professional"
        manager.add(C::AnimeType, O::UNIDENTIFIABLE_UNSEARCHABLE, &["SP"]);
        manager.add(
            C::AnimeType,
            O::UNIDENTIFIABLE_INVALID,
            &["ED", "ENDING", "NCED", "NCOP", "OP", "OPENING", "PREVIEW", "PV"],
        );

        manager.add(
            C::AudioTerm,
            O::DEFAULT,
            &[
                // channels
                "2.0CH", "2CH", "5.1", "5.1CH", "DTS", "DTS-ES", "DTS5.1", "TRUEHD5.1",
                // codecs
                "AAC", "AACX2", "AACX3", "AACX4", "AC3", "EAC3", "E-AC-3", "FLAC", "FLACX2",
                "FLACX3", "FLACX4", "LOSSLESS", "MP3", "OGG", "VORBIS",
                // language
                "DUALAUDIO", "DUAL AUDIO", "DUAL-AUDIO", "MULTIAUDIO", "MULTI AUDIO",
                "MULTI-AUDIO",
            ],
        );

        manager.add(
            C::DeviceCompatibility,
            O::DEFAULT,
            &["IPAD3", "IPHONE5", "IPOD", "PS3", "XBOX", "XBOX360"],
        );
        manager.add(C::DeviceCompatibility, O::UNIDENTIFIABLE, &["ANDROID"]);

        manager.add(
            C::EpisodePrefix,
            O::DEFAULT,
            &[
                "EP", "EP.", "EPS", "EPS.", "EPISODE", "EPISODE.", "EPISODES", "CAPITULO",
                "EPISODIO", "FOLGE",
            ],
        );
        // Single-character prefixes cannot claim a number on their own.
        manager.add(C::EpisodePrefix, O::INVALID, &["E", "\u{7B2C}"]);

        manager.add(
            C::FileExtension,
            O::DEFAULT,
            &[
                "3GP", "AVI", "DIVX", "FLV", "M2TS", "MKV", "MOV", "MP4", "MPG", "OGM", "RM",
                "RMVB", "TS", "WEBM", "WMV",
            ],
        );
        manager.add(
            C::FileExtension,
            O::INVALID,
            &[
                "AAC", "AIFF", "FLAC", "M4A", "MP3", "MKA", "OGG", "WAV", "WMA", "7Z", "RAR",
                "ZIP", "ASS", "SRT",
            ],
        );

        manager.add(
            C::Language,
            O::DEFAULT,
            &["ENG", "ENGLISH", "ESPANOL", "JAP", "PT-BR", "SPANISH", "VOSTFR"],
        );
        // "Tokyo ESP", "Bokura ga Ita"
        manager.add(C::Language, O::UNIDENTIFIABLE, &["ESP", "ITA"]);

        manager.add(
            C::Other,
            O::DEFAULT,
            &[
                "REMASTER", "REMASTERED", "UNCENSORED", "UNCUT", "TS", "VFR", "WIDESCREEN", "WS",
            ],
        );

        manager.add(C::ReleaseGroup, O::DEFAULT, &["THORA"]);

        manager.add(
            C::ReleaseInformation,
            O::DEFAULT,
            &["BATCH", "COMPLETE", "PATCH", "REMUX"],
        );
        // "The End of Evangelion", "Final Approach"
        manager.add(C::ReleaseInformation, O::UNIDENTIFIABLE, &["END", "FINAL"]);

        manager.add(C::ReleaseVersion, O::DEFAULT, &["V0", "V1", "V2", "V3", "V4"]);

        manager.add(
            C::Source,
            O::DEFAULT,
            &[
                "BD", "BDRIP", "BLURAY", "BLU-RAY", "DVD", "DVD5", "DVD9", "DVD-R2J", "DVDRIP",
                "DVD-RIP", "R2DVD", "R2J", "R2JDVD", "R2JDVDRIP", "HDTV", "HDTVRIP", "TVRIP",
                "TV-RIP", "WEB", "WEB-DL", "WEBDL", "WEBCAST", "WEBRIP",
            ],
        );

        manager.add(
            C::Subtitles,
            O::DEFAULT,
            &[
                "ASS", "BIG5", "DUB", "DUBBED", "HARDSUB", "HARDSUBS", "RAW", "SOFTSUB",
                "SOFTSUBS", "SUB", "SUBBED", "SUBTITLED", "MULTIPLE SUBTITLE", "MULTI SUBS",
                "MULTI-SUBS",
            ],
        );

        manager.add(
            C::VideoTerm,
            O::DEFAULT,
            &[
                // frame rate
                "23.976FPS", "24FPS", "29.97FPS", "30FPS", "60FPS", "120FPS",
                // codecs
                "8BIT", "8-BIT", "10BIT", "10BITS", "10-BIT", "10-BITS", "HI10", "HI10P", "HI444",
                "HI444P", "HI444PP", "H264", "H265", "H.264", "H.265", "X264", "X265", "X.264",
                "AVC", "HEVC", "HEVC2", "DIVX", "DIVX5", "DIVX6", "XVID",
                // formats
                "AVI", "RMVB", "WMV", "WMV3", "WMV9",
                // quality
                "HQ", "LQ",
                // resolution
                "HD", "SD",
            ],
        );

        manager.add(C::VolumePrefix, O::DEFAULT, &["VOL", "VOL.", "VOLUME"]);

        manager
    }

    /// A manager with no keywords at all.
    pub fn empty() -> Self {
        Self {
            keys: HashMap::new(),
            file_extensions: HashMap::new(),
        }
    }

    /// Register keywords under a category. Existing spellings are kept.
    pub fn add(&mut self, category: ElementCategory, options: KeywordOptions, words: &[&str]) {
        let container = self.container_mut(category);
        for word in words {
            let key = normalize(word);
            if key.is_empty() {
                continue;
            }
            container
                .entry(key)
                .or_insert(Keyword { category, options });
        }
    }

    /// Look up a normalized key, optionally restricted to one category.
    pub fn find(&self, key: &str, category: Option<ElementCategory>) -> Option<&Keyword> {
        if key.is_empty() {
            return None;
        }
        let container = match category {
            Some(ElementCategory::FileExtension) => &self.file_extensions,
            _ => &self.keys,
        };
        container
            .get(key)
            .filter(|keyword| category.is_none_or(|c| keyword.category == c))
    }

    /// Normalize `word` and look it up.
    pub fn find_word(&self, word: &str, category: Option<ElementCategory>) -> Option<&Keyword> {
        self.find(&normalize(word), category)
    }

    /// Locate multi-word keywords in `text`, filing each hit as an element.
    ///
    /// Returns sorted, non-overlapping byte ranges of the hits.
    pub fn peek(&self, elements: &mut Elements, text: &str) -> Vec<Range<usize>> {
        let mut ranges: Vec<Range<usize>> = Vec::new();

        for (category, words) in PEEK_ENTRIES {
            for word in *words {
                let Some(begin) = text.find(word) else {
                    continue;
                };
                let range = begin..begin + word.len();
                if ranges
                    .iter()
                    .any(|r| r.start < range.end && range.start < r.end)
                {
                    continue;
                }
                elements.insert(*category, *word);
                ranges.push(range);
            }
        }

        ranges.sort_by_key(|r| r.start);
        ranges
    }

    fn container_mut(&mut self, category: ElementCategory) -> &mut HashMap<String, Keyword> {
        if category == ElementCategory::FileExtension {
            &mut self.file_extensions
        } else {
            &mut self.keys
        }
    }
}
