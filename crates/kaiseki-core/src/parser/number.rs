//! # Number-Pattern Matchers
//!
//! Recognizes the numbering conventions of release names: episode ranges,
//! versions, season/episode pairs, volumes and the various prefixes.
//! Every matcher commits its elements and claims the owning token.

use std::cmp::Ordering;

use regex::Regex;
use tracing::trace;

use crate::error::Result;
use crate::parser::context::ParseContext;
use crate::parser::helper;
use crate::types::{ElementCategory, Token, TokenCategory, TokenFlags};

pub const ANIME_YEAR_MIN: u64 = 1900;
pub const ANIME_YEAR_MAX: u64 = 2050;
pub const EPISODE_NUMBER_MAX: u64 = ANIME_YEAR_MIN - 1;
pub const VOLUME_NUMBER_MAX: u64 = 20;

/// Integer value of a digit string. Non-numeric input reads as zero and
/// overflow saturates.
pub fn str2int(s: &str) -> u64 {
    if !helper::is_numeric(s) {
        return 0;
    }
    s.parse().unwrap_or(u64::MAX)
}

pub fn is_valid_episode_number(number: &str) -> bool {
    str2int(number) <= EPISODE_NUMBER_MAX
}

pub fn is_valid_volume_number(number: &str) -> bool {
    str2int(number) <= VOLUME_NUMBER_MAX
}

/// Pre-compiled number patterns.
#[derive(Debug, Clone)]
pub struct NumberPatterns {
    single_episode: Regex,
    multi_episode: Regex,
    season_and_episode: Regex,
    fractional_episode: Regex,
    number_sign: Regex,
    japanese_counter: Regex,
    single_volume: Regex,
    multi_volume: Regex,
    resolution: Regex,
}

impl NumberPatterns {
    /// Compile the patterns.
    ///
    /// # Errors
    ///
    /// Returns `KaisekiError::RegexError` if a pattern fails to compile
    /// (never expected with these static patterns).
    pub fn new() -> Result<Self> {
        Ok(Self {
            single_episode: Regex::new(r"^([0-9]{1,4})[vV]([0-9])$")?,
            multi_episode: Regex::new(
                r"^([0-9]{1,4})(?:[vV]([0-9]))?[-~&+]([0-9]{1,4})(?:[vV]([0-9]))?$",
            )?,
            season_and_episode: Regex::new(
                r"(?i)^S?([0-9]{1,2})(?:-S?([0-9]{1,2}))?(?:x|[ ._x-]?E)([0-9]{1,4})(?:-E?([0-9]{1,4}))?(?:[vV]([0-9]))?$",
            )?,
            fractional_episode: Regex::new(r"^[0-9]+\.5$")?,
            number_sign: Regex::new(r"^#([0-9]{1,4})(?:[-~&+]([0-9]{1,4}))?(?:[vV]([0-9]))?$")?,
            japanese_counter: Regex::new("^([0-9]{1,4})\u{8A71}$")?,
            single_volume: Regex::new(r"^([0-9]{1,2})[vV]([0-9])$")?,
            multi_volume: Regex::new(r"^([0-9]{1,2})[-~&+]([0-9]{1,2})(?:[vV]([0-9]))?$")?,
            resolution: Regex::new(r"^(?:[0-9]{3,4}(?:[pPiI]|[xX\u{00D7}][0-9]{3,4})|[248]K)$")?,
        })
    }

    /// "1080p", "1920x1080", "4K".
    pub fn is_resolution(&self, word: &str) -> bool {
        self.resolution.is_match(word)
    }
}

fn numeric_ends(word: &str) -> (bool, bool) {
    let front = word.chars().next().is_some_and(|c| c.is_ascii_digit());
    let back = word.chars().next_back().is_some_and(|c| c.is_ascii_digit());
    (front, back)
}

fn strip_word(word: &str) -> &str {
    word.trim_matches(|c| c == ' ' || c == '-')
}

impl ParseContext<'_> {
    /// Commit an episode number, honouring the alternate-number bookkeeping.
    ///
    /// With `check_alt_number` set, a larger number becomes the alternate, a
    /// smaller one takes over and demotes the current number, and an equal
    /// one is rejected.
    pub(crate) fn set_episode_number(
        &mut self,
        number: &str,
        token: usize,
        validate: bool,
    ) -> bool {
        if validate && !is_valid_episode_number(number) {
            return false;
        }

        self.identify(token);

        let mut category = ElementCategory::EpisodeNumber;
        if self.elements.check_alt_number() {
            let current = self
                .elements
                .first(ElementCategory::EpisodeNumber)
                .map(str::to_owned);
            if let Some(current) = current {
                match str2int(number).cmp(&str2int(&current)) {
                    Ordering::Greater => category = ElementCategory::EpisodeNumberAlt,
                    Ordering::Less => {
                        self.elements.remove(ElementCategory::EpisodeNumber, &current);
                        self.elements.insert(ElementCategory::EpisodeNumberAlt, current);
                    }
                    Ordering::Equal => return false,
                }
            }
        }

        trace!(number, %category, "episode number");
        self.elements.insert(category, number);
        true
    }

    pub(crate) fn set_alternative_episode_number(&mut self, number: &str, token: usize) -> bool {
        self.elements.insert(ElementCategory::EpisodeNumberAlt, number);
        self.identify(token);
        true
    }

    pub(crate) fn set_volume_number(&mut self, number: &str, token: usize, validate: bool) -> bool {
        if validate && !is_valid_volume_number(number) {
            return false;
        }
        self.elements.insert(ElementCategory::VolumeNumber, number);
        self.identify(token);
        true
    }

    pub(crate) fn set_season_number(&mut self, number: &str, token: usize) -> bool {
        if !helper::is_numeric(number) {
            return false;
        }
        self.elements.insert(ElementCategory::AnimeSeason, number);
        self.identify(token);
        true
    }

    /// Claim the number following a prefix keyword such as "EP" or "Vol".
    pub(crate) fn check_extent_keyword(&mut self, category: ElementCategory, token: usize) -> bool {
        let Some(next) = self.tokens.find_next(Some(token), TokenFlags::NOT_DELIMITER) else {
            return false;
        };
        if !self.tokens[next].is_unknown()
            || helper::find_number_in_string(&self.tokens[next].content).is_none()
        {
            return false;
        }

        let word = self.tokens[next].content.clone();
        match category {
            ElementCategory::EpisodeNumber => {
                if !self.match_episode_patterns(&word, next) {
                    self.set_episode_number(&word, next, false);
                }
            }
            ElementCategory::VolumeNumber => {
                if !self.match_volume_patterns(&word, next) {
                    self.set_volume_number(&word, next, false);
                }
            }
            _ => return false,
        }
        self.identify(token);
        true
    }

    /// "EP01", "Vol.2", "S2": a prefix keyword glued to its number.
    fn number_comes_after_prefix(&mut self, category: ElementCategory, token: usize) -> bool {
        let content = self.tokens[token].content.clone();
        let Some(number_begin) = helper::find_number_in_string(&content) else {
            return false;
        };
        let (prefix, number) = content.split_at(number_begin);
        if self.keywords.find_word(prefix, Some(category)).is_none() {
            return false;
        }

        match category {
            ElementCategory::EpisodePrefix => {
                self.match_episode_patterns(number, token)
                    || self.set_episode_number(number, token, false)
            }
            ElementCategory::VolumePrefix => {
                self.match_volume_patterns(number, token)
                    || self.set_volume_number(number, token, false)
            }
            ElementCategory::AnimeSeasonPrefix => self.set_season_number(number, token),
            _ => false,
        }
    }

    /// "8 & 10", "01 of 24".
    fn number_comes_before_another_number(&mut self, token: usize) -> bool {
        let Some(separator) = self.tokens.find_next(Some(token), TokenFlags::NOT_DELIMITER) else {
            return false;
        };
        let separator_text = self.tokens[separator].content.clone();
        if separator_text != "&" && separator_text != "of" {
            return false;
        }
        let Some(other) = self.tokens.find_next(Some(separator), TokenFlags::NOT_DELIMITER) else {
            return false;
        };
        if !self.tokens[other].is_numeric() {
            return false;
        }

        let number = self.tokens[token].content.clone();
        self.set_episode_number(&number, token, false);
        if separator_text == "&" {
            let other_number = self.tokens[other].content.clone();
            self.set_episode_number(&other_number, other, false);
        }
        self.identify(separator);
        self.identify(other);
        true
    }

    /// Try every pattern on each candidate; stops at the first episode match.
    pub(crate) fn search_for_episode_patterns(&mut self, candidates: &[usize]) -> bool {
        for &index in candidates {
            let content = self.tokens[index].content.clone();
            let numeric_front = content.starts_with(|c: char| c.is_ascii_digit());

            if !numeric_front {
                if self.number_comes_after_prefix(ElementCategory::EpisodePrefix, index) {
                    return true;
                }
                if self.number_comes_after_prefix(ElementCategory::VolumePrefix, index) {
                    continue;
                }
                if self.number_comes_after_prefix(ElementCategory::AnimeSeasonPrefix, index) {
                    continue;
                }
            } else if self.number_comes_before_another_number(index) {
                return true;
            }

            if self.match_episode_patterns(&content, index) {
                return true;
            }
        }
        false
    }

    /// The ordered episode pattern chain. First match wins.
    pub(crate) fn match_episode_patterns(&mut self, word: &str, token: usize) -> bool {
        if helper::is_numeric(word) {
            return false;
        }
        let word = strip_word(word);
        if word.is_empty() {
            return false;
        }
        let (front, back) = numeric_ends(word);

        // "01v2"
        if front && back && self.match_single_episode_pattern(word, token) {
            return true;
        }
        // "01-02", "03-05v2"
        if front && back && self.match_multi_episode_pattern(word, token) {
            return true;
        }
        // "2x01", "S01E03", "S01-02xE001-150"
        if back && self.match_season_and_episode_pattern(word, token) {
            return true;
        }
        // "ED1", "OP4a", "OVA2"
        if !front && self.match_type_and_episode_pattern(word, token) {
            return true;
        }
        // "07.5"
        if front && back && self.match_fractional_episode_pattern(word, token) {
            return true;
        }
        // "4a", "111C"
        if front && !back && self.match_partial_episode_pattern(word, token) {
            return true;
        }
        // "#01", "#02-03v2"
        if back && self.match_number_sign_pattern(word, token) {
            return true;
        }
        // "01話"
        if front && self.match_japanese_counter_pattern(word, token) {
            return true;
        }
        false
    }

    fn match_single_episode_pattern(&mut self, word: &str, token: usize) -> bool {
        let Some(caps) = self.patterns.single_episode.captures(word) else {
            return false;
        };
        self.set_episode_number(&caps[1], token, false);
        self.elements.append(ElementCategory::ReleaseVersion, &caps[2]);
        true
    }

    fn match_multi_episode_pattern(&mut self, word: &str, token: usize) -> bool {
        let Some(caps) = self.patterns.multi_episode.captures(word) else {
            return false;
        };
        let (lower, upper) = (&caps[1], &caps[3]);
        // "009-1", "5-2"
        if str2int(lower) >= str2int(upper) {
            return false;
        }
        if !self.set_episode_number(lower, token, true) {
            return false;
        }
        self.set_episode_number(upper, token, false);
        for group in [2, 4] {
            if let Some(version) = caps.get(group) {
                self.elements.append(ElementCategory::ReleaseVersion, version.as_str());
            }
        }
        true
    }

    fn match_season_and_episode_pattern(&mut self, word: &str, token: usize) -> bool {
        let Some(caps) = self.patterns.season_and_episode.captures(word) else {
            return false;
        };
        if str2int(&caps[1]) == 0 {
            return false;
        }
        self.elements.insert(ElementCategory::AnimeSeason, &caps[1]);
        if let Some(season) = caps.get(2) {
            self.elements.insert(ElementCategory::AnimeSeason, season.as_str());
        }
        self.set_episode_number(&caps[3], token, false);
        if let Some(episode) = caps.get(4) {
            self.set_episode_number(episode.as_str(), token, false);
        }
        if let Some(version) = caps.get(5) {
            self.elements.append(ElementCategory::ReleaseVersion, version.as_str());
        }
        true
    }

    fn match_type_and_episode_pattern(&mut self, word: &str, token: usize) -> bool {
        let Some(number_begin) = helper::find_number_in_string(word) else {
            return false;
        };
        let (prefix, number) = word.split_at(number_begin);
        let Some(keyword) = self
            .keywords
            .find_word(prefix, Some(ElementCategory::AnimeType))
            .copied()
        else {
            return false;
        };

        self.elements.insert(ElementCategory::AnimeType, prefix);
        if !self.match_episode_patterns(number, token)
            && !self.set_episode_number(number, token, true)
        {
            return false;
        }

        // Split "OVA2" into "OVA" + "2"; indices after `token` shift by one.
        let enclosed = self.tokens[token].enclosed;
        self.tokens[token].content = number.to_string();
        let category = if keyword.options.identifiable {
            TokenCategory::Identifier
        } else {
            TokenCategory::Unknown
        };
        self.tokens.insert(token, Token::new(category, prefix, enclosed));
        true
    }

    fn match_fractional_episode_pattern(&mut self, word: &str, token: usize) -> bool {
        // Only ".5": "Evangelion 1.11", "Magnitude 8.0" and "5.1" are not episodes.
        self.patterns.fractional_episode.is_match(word)
            && self.set_episode_number(word, token, true)
    }

    fn match_partial_episode_pattern(&mut self, word: &str, token: usize) -> bool {
        let Some(suffix_begin) = helper::find_non_number_in_string(word) else {
            return false;
        };
        let suffix = &word[suffix_begin..];
        let valid_suffix = suffix.len() == 1 && "ABCabc".contains(suffix);
        valid_suffix && self.set_episode_number(word, token, true)
    }

    fn match_number_sign_pattern(&mut self, word: &str, token: usize) -> bool {
        if !word.starts_with('#') {
            return false;
        }
        let Some(caps) = self.patterns.number_sign.captures(word) else {
            return false;
        };
        if !self.set_episode_number(&caps[1], token, true) {
            return false;
        }
        if let Some(upper) = caps.get(2) {
            self.set_episode_number(upper.as_str(), token, true);
        }
        if let Some(version) = caps.get(3) {
            self.elements.append(ElementCategory::ReleaseVersion, version.as_str());
        }
        true
    }

    fn match_japanese_counter_pattern(&mut self, word: &str, token: usize) -> bool {
        if !word.ends_with('\u{8A71}') {
            return false;
        }
        let Some(caps) = self.patterns.japanese_counter.captures(word) else {
            return false;
        };
        self.set_episode_number(&caps[1], token, false)
    }

    /// Volume patterns; every one contains a non-digit.
    pub(crate) fn match_volume_patterns(&mut self, word: &str, token: usize) -> bool {
        if helper::is_numeric(word) {
            return false;
        }
        let word = strip_word(word);
        let (front, back) = numeric_ends(word);
        if !(front && back) {
            return false;
        }

        if let Some(caps) = self.patterns.single_volume.captures(word) {
            self.set_volume_number(&caps[1], token, false);
            self.elements.append(ElementCategory::ReleaseVersion, &caps[2]);
            return true;
        }

        if let Some(caps) = self.patterns.multi_volume.captures(word) {
            let (lower, upper) = (&caps[1], &caps[2]);
            if str2int(lower) < str2int(upper) && self.set_volume_number(lower, token, true) {
                self.set_volume_number(upper, token, false);
                if let Some(version) = caps.get(3) {
                    self.elements.append(ElementCategory::ReleaseVersion, version.as_str());
                }
                return true;
            }
        }
        false
    }

    /// "01 (176)": the smaller number is the episode, the other its
    /// alternate numbering.
    pub(crate) fn search_for_equivalent_numbers(&mut self, candidates: &[usize]) -> bool {
        for &index in candidates {
            if !self.is_token_isolated(index)
                || !is_valid_episode_number(&self.tokens[index].content)
            {
                continue;
            }

            let Some(bracket) = self
                .tokens
                .find_next(Some(index), TokenFlags::NOT_DELIMITER)
                .filter(|&b| self.tokens[b].is_bracket())
            else {
                continue;
            };
            let Some(next) = self
                .tokens
                .find_next(Some(bracket), TokenFlags::ENCLOSED | TokenFlags::NOT_DELIMITER)
                .filter(|&n| self.tokens[n].is_unknown())
            else {
                continue;
            };
            if !self.is_alone_in_group(next)
                || !self.tokens[next].is_numeric()
                || !is_valid_episode_number(&self.tokens[next].content)
            {
                continue;
            }

            let (episode, alternate) =
                if str2int(&self.tokens[index].content) <= str2int(&self.tokens[next].content) {
                    (index, next)
                } else {
                    (next, index)
                };
            let episode_number = self.tokens[episode].content.clone();
            let alternate_number = self.tokens[alternate].content.clone();
            self.set_episode_number(&episode_number, episode, false);
            self.set_alternative_episode_number(&alternate_number, alternate);
            return true;
        }
        false
    }

    /// " - 08": a number right after a dash separator.
    pub(crate) fn search_for_separated_numbers(&mut self, candidates: &[usize]) -> bool {
        for &index in candidates {
            let Some(prev) = self
                .tokens
                .find_previous(Some(index), TokenFlags::NOT_DELIMITER)
            else {
                continue;
            };
            let prev_token = &self.tokens[prev];
            if !prev_token.is_unknown() || !helper::is_dash_character(&prev_token.content) {
                continue;
            }
            let number = self.tokens[index].content.clone();
            if self.set_episode_number(&number, index, true) {
                self.identify(prev);
                return true;
            }
        }
        false
    }

    /// "01 - Title": the name opens with the episode number.
    pub(crate) fn search_for_leading_number(&mut self, candidates: &[usize]) -> bool {
        for &index in candidates {
            let opens_name = self
                .tokens
                .iter()
                .take(index)
                .all(|t| t.enclosed || t.is_delimiter());
            if !opens_name {
                continue;
            }
            let Some(dash) = self
                .tokens
                .find_next(Some(index), TokenFlags::NOT_DELIMITER)
                .filter(|&d| {
                    self.tokens[d].is_unknown()
                        && helper::is_dash_character(&self.tokens[d].content)
                })
            else {
                continue;
            };
            let followed_by_text = self
                .tokens
                .find_next(Some(dash), TokenFlags::NOT_DELIMITER)
                .is_some_and(|w| self.tokens[w].is_unknown());
            if !followed_by_text {
                continue;
            }

            let number = self.tokens[index].content.clone();
            if self.set_episode_number(&number, index, true) {
                self.identify(dash);
                self.leading_episode = true;
                return true;
            }
        }
        false
    }

    /// "[12]": a number alone in its bracket group.
    pub(crate) fn search_for_isolated_numbers(&mut self, candidates: &[usize]) -> bool {
        for &index in candidates {
            if !self.tokens[index].enclosed || !self.is_alone_in_group(index) {
                continue;
            }
            let number = self.tokens[index].content.clone();
            if self.set_episode_number(&number, index, true) {
                return true;
            }
        }
        false
    }

    /// Last resort: the last plausible free-standing number.
    pub(crate) fn search_for_last_number(&mut self, candidates: &[usize]) -> bool {
        for &index in candidates.iter().rev() {
            // Names do not open with the episode number at this point.
            if index == 0 || self.tokens[index].enclosed {
                continue;
            }
            let first_word = self
                .tokens
                .iter()
                .take(index)
                .all(|t| t.enclosed || t.is_delimiter());
            if first_word {
                continue;
            }
            // "Movie 2", "Part 2"
            if let Some(prev) = self.tokens.find_previous(Some(index), TokenFlags::NOT_DELIMITER) {
                let prev = &self.tokens[prev];
                if prev.is_unknown()
                    && (prev.content.eq_ignore_ascii_case("movie")
                        || prev.content.eq_ignore_ascii_case("part"))
                {
                    continue;
                }
            }
            if self.is_sequel_number(index) {
                continue;
            }

            let number = self.tokens[index].content.clone();
            if self.set_episode_number(&number, index, true) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::context::test_support::{Fixture, index_of};

    fn episode<'c>(context: &'c ParseContext<'_>) -> Vec<&'c str> {
        context
            .elements
            .get(ElementCategory::EpisodeNumber)
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn str2int_edge_cases() {
        assert_eq!(str2int("0012"), 12);
        assert_eq!(str2int("07.5"), 0);
        assert_eq!(str2int(""), 0);
        assert_eq!(str2int("99999999999999999999999"), u64::MAX);
        assert!(is_valid_episode_number("1899"));
        assert!(!is_valid_episode_number("1900"));
        assert!(is_valid_volume_number("20"));
        assert!(!is_valid_volume_number("21"));
    }

    #[test]
    fn resolution_shapes() {
        let patterns = NumberPatterns::new().unwrap();
        for word in ["720p", "1080P", "1080i", "1920x1080", "1280\u{00D7}720", "4K"] {
            assert!(patterns.is_resolution(word), "{word}");
        }
        for word in ["72p", "1080", "6K", "x1080"] {
            assert!(!patterns.is_resolution(word), "{word}");
        }
    }

    #[test]
    fn alt_number_greater_becomes_alternate() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Title 05 07");
        context.elements.insert(ElementCategory::EpisodeNumber, "05");
        context.elements.set_check_alt_number(true);

        let token = index_of(&context, "07");
        assert!(context.set_episode_number("07", token, true));
        assert_eq!(episode(&context), ["05"]);
        assert_eq!(context.elements.first(ElementCategory::EpisodeNumberAlt), Some("07"));
        assert_eq!(context.tokens[token].category, TokenCategory::Identifier);
    }

    #[test]
    fn alt_number_lower_swaps() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Title 176 01");
        context.elements.insert(ElementCategory::EpisodeNumber, "176");
        context.elements.set_check_alt_number(true);

        assert!(context.set_episode_number("01", index_of(&context, "01"), true));
        assert_eq!(episode(&context), ["01"]);
        assert_eq!(context.elements.first(ElementCategory::EpisodeNumberAlt), Some("176"));
    }

    #[test]
    fn alt_number_equal_is_rejected() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Title 05 5");
        context.elements.insert(ElementCategory::EpisodeNumber, "05");
        context.elements.set_check_alt_number(true);

        assert!(!context.set_episode_number("5", index_of(&context, "5"), true));
        assert_eq!(episode(&context), ["05"]);
        assert!(!context.elements.contains(ElementCategory::EpisodeNumberAlt));
    }

    #[test]
    fn validation_rejects_years() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Title 2012");
        assert!(!context.set_episode_number("2012", 2, true));
        assert!(context.set_episode_number("2012", 2, false));
    }

    #[test]
    fn single_episode_with_version() {
        let fixture = Fixture::new();
        let mut context = fixture.context("13v2");
        assert!(context.match_episode_patterns("13v2", 0));
        assert_eq!(episode(&context), ["13"]);
        assert_eq!(context.elements.first(ElementCategory::ReleaseVersion), Some("2"));
    }

    #[test]
    fn multi_episode_range() {
        let fixture = Fixture::new();
        let mut context = fixture.context("01-12v2");
        assert!(context.match_episode_patterns("01-12v2", 0));
        assert_eq!(episode(&context), ["01", "12"]);
        assert_eq!(context.elements.first(ElementCategory::ReleaseVersion), Some("2"));

        let mut context = fixture.context("009-1");
        assert!(!context.match_episode_patterns("009-1", 0));
        assert!(episode(&context).is_empty());
    }

    #[test]
    fn multi_episode_keeps_both_versions() {
        let fixture = Fixture::new();
        let mut context = fixture.context("01v2-03v2");
        assert!(context.match_episode_patterns("01v2-03v2", 0));
        assert_eq!(episode(&context), ["01", "03"]);
        assert_eq!(context.elements.get(ElementCategory::ReleaseVersion), ["2", "2"]);
    }

    #[test]
    fn season_and_episode() {
        let fixture = Fixture::new();
        let mut context = fixture.context("S01-02xE001-150");
        assert!(context.match_episode_patterns("S01-02xE001-150", 0));
        assert_eq!(context.elements.get(ElementCategory::AnimeSeason), ["01", "02"]);
        assert_eq!(episode(&context), ["001", "150"]);

        let mut context = fixture.context("2x01");
        assert!(context.match_episode_patterns("2x01", 0));
        assert_eq!(context.elements.get(ElementCategory::AnimeSeason), ["2"]);

        let mut context = fixture.context("s00e01");
        assert!(!context.match_episode_patterns("s00e01", 0));
    }

    #[test]
    fn type_and_episode_splits_token() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Title OVA2");
        let token = index_of(&context, "OVA2");
        assert!(context.match_episode_patterns("OVA2", token));
        assert_eq!(context.elements.get(ElementCategory::AnimeType), ["OVA"]);
        assert_eq!(episode(&context), ["2"]);
        assert_eq!(context.tokens[token].content, "OVA");
        assert_eq!(context.tokens[token].category, TokenCategory::Unknown);
        assert_eq!(context.tokens[token + 1].content, "2");
        assert_eq!(context.tokens[token + 1].category, TokenCategory::Identifier);
    }

    #[test]
    fn fractional_partial_sign_and_counter() {
        let fixture = Fixture::new();

        let mut context = fixture.context("07.5");
        assert!(context.match_episode_patterns("07.5", 0));
        assert_eq!(episode(&context), ["07.5"]);

        let mut context = fixture.context("4a");
        assert!(context.match_episode_patterns("4a", 0));
        assert_eq!(episode(&context), ["4a"]);

        let mut context = fixture.context("#02-03v2");
        assert!(context.match_episode_patterns("#02-03v2", 0));
        assert_eq!(episode(&context), ["02", "03"]);

        let mut context = fixture.context("12話");
        assert!(context.match_episode_patterns("12話", 0));
        assert_eq!(episode(&context), ["12"]);

        let mut context = fixture.context("8.0");
        assert!(!context.match_episode_patterns("8.0", 0));
    }

    #[test]
    fn volume_patterns() {
        let fixture = Fixture::new();
        let mut context = fixture.context("01-03");
        assert!(context.match_volume_patterns("01-03", 0));
        assert_eq!(context.elements.get(ElementCategory::VolumeNumber), ["01", "03"]);

        let mut context = fixture.context("21-25");
        assert!(!context.match_volume_patterns("21-25", 0));
    }

    #[test]
    fn prefix_keyword_extent() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Vol.2 EP 05");
        let vol = index_of(&context, "Vol.2");
        // a volume match does not end the episode search
        assert!(!context.search_for_episode_patterns(&[vol]));
        assert_eq!(context.elements.get(ElementCategory::VolumeNumber), ["2"]);

        let ep = index_of(&context, "EP");
        assert!(context.check_extent_keyword(ElementCategory::EpisodeNumber, ep));
        assert_eq!(episode(&context), ["05"]);
    }

    #[test]
    fn equivalent_numbers_pick_smaller() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Title - 176 (01)");
        let candidates = [index_of(&context, "176"), index_of(&context, "01")];
        assert!(context.search_for_equivalent_numbers(&candidates));
        assert_eq!(episode(&context), ["01"]);
        assert_eq!(context.elements.first(ElementCategory::EpisodeNumberAlt), Some("176"));
    }

    #[test]
    fn last_number_skips_movie_and_sequel() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Title Movie 2");
        let candidates = [index_of(&context, "2")];
        assert!(!context.search_for_last_number(&candidates));

        let mut context = fixture.context("Title 2 - Subtitle");
        let candidates = [index_of(&context, "2")];
        assert!(!context.search_for_last_number(&candidates));

        let mut context = fixture.context("Title 12 end");
        let candidates = [index_of(&context, "12")];
        assert!(context.search_for_last_number(&candidates));
        assert_eq!(episode(&context), ["12"]);
    }
}
