//! The ordered parser passes. Each pass reads the token arena, claims the
//! tokens it resolves and files values into the element collector.

use tracing::trace;

use crate::parser::context::ParseContext;
use crate::parser::helper;
use crate::parser::number::{ANIME_YEAR_MAX, ANIME_YEAR_MIN, str2int};
use crate::types::{ElementCategory, TokenFlags};

impl ParseContext<'_> {
    /// Run every pass in order.
    pub(crate) fn run(&mut self) {
        self.search_for_keywords();
        self.search_for_standalone_numbers();

        if self.options.parse_episode_number {
            self.search_for_episode_number();
        }

        self.search_for_anime_title();

        if self.options.parse_release_group
            && !self.elements.contains(ElementCategory::ReleaseGroup)
        {
            self.search_for_release_group();
        }

        if self.options.parse_episode_title
            && self.elements.contains(ElementCategory::EpisodeNumber)
        {
            self.search_for_episode_title();
        }

        self.validate_elements();
    }

    fn search_for_keywords(&mut self) {
        let mut index = 0;
        while index < self.tokens.len() {
            if self.tokens[index].is_unknown() {
                let before = self.tokens.len();
                self.check_keyword(index);
                if self.tokens.len() > before {
                    // A prefix split put a new token after this one; step past it.
                    let prefix = self.tokens.find_next(Some(index), TokenFlags::NOT_DELIMITER);
                    if let Some(prefix) = prefix {
                        index = prefix + 1;
                    }
                }
            }
            index += 1;
        }
    }

    fn check_keyword(&mut self, index: usize) {
        let word = self.tokens[index].content.trim_matches(|c| c == ' ' || c == '-');
        if word.is_empty() {
            return;
        }
        // Numbers are only interesting here as checksums.
        if word.len() != 8 && helper::is_numeric(word) {
            return;
        }
        let mut word = word.to_string();

        let keyword = self.keywords.find_word(&word, None).copied();
        let category = match keyword {
            Some(keyword) => {
                let category = keyword.category;
                if !self.options.parse_release_group && category == ElementCategory::ReleaseGroup {
                    return;
                }
                if !category.is_searchable() || !keyword.options.searchable {
                    return;
                }
                if category.is_singular() && self.elements.contains(category) {
                    return;
                }

                match category {
                    ElementCategory::AnimeSeasonPrefix => {
                        self.check_anime_season_keyword(index);
                        return;
                    }
                    ElementCategory::EpisodePrefix => {
                        if keyword.options.valid {
                            self.check_extent_keyword(ElementCategory::EpisodeNumber, index);
                        }
                        return;
                    }
                    ElementCategory::VolumePrefix => {
                        self.check_extent_keyword(ElementCategory::VolumeNumber, index);
                        return;
                    }
                    ElementCategory::ReleaseVersion => {
                        // number without the "v"
                        let mut chars = word.chars();
                        chars.next();
                        word = chars.as_str().to_string();
                    }
                    _ => {}
                }
                category
            }
            None => {
                if !self.elements.contains(ElementCategory::FileChecksum)
                    && helper::is_crc32(&word)
                {
                    ElementCategory::FileChecksum
                } else if !self.elements.contains(ElementCategory::VideoResolution)
                    && self.patterns.is_resolution(&word)
                {
                    ElementCategory::VideoResolution
                } else {
                    return;
                }
            }
        };

        trace!(%category, value = %word, "keyword");
        self.elements.insert(category, word);
        if keyword.is_none_or(|k| k.options.identifiable) {
            self.identify(index);
        }
    }

    /// "2nd Season", "Season 2".
    fn check_anime_season_keyword(&mut self, index: usize) -> bool {
        if let Some(prev) = self.tokens.find_previous(Some(index), TokenFlags::NOT_DELIMITER) {
            if let Some(number) = helper::number_from_ordinal(&self.tokens[prev].content) {
                self.elements.insert(ElementCategory::AnimeSeason, number);
                self.identify(prev);
                self.identify(index);
                return true;
            }
        }

        if let Some(next) = self.tokens.find_next(Some(index), TokenFlags::NOT_DELIMITER) {
            if self.tokens[next].is_numeric() {
                let number = self.tokens[next].content.clone();
                self.elements.insert(ElementCategory::AnimeSeason, number);
                self.identify(index);
                self.identify(next);
                return true;
            }
        }
        false
    }

    fn search_for_standalone_numbers(&mut self) {
        for index in 0..self.tokens.len() {
            let token = &self.tokens[index];
            if !token.is_unknown() || !token.is_numeric() || !self.is_token_isolated(index) {
                continue;
            }
            let content = token.content.clone();
            let number = str2int(&content);

            if (ANIME_YEAR_MIN..=ANIME_YEAR_MAX).contains(&number)
                && !self.elements.contains(ElementCategory::AnimeYear)
            {
                self.elements.insert(ElementCategory::AnimeYear, content);
                self.identify(index);
                continue;
            }

            // Some groups write the resolution without its "p".
            if matches!(number, 480 | 720 | 1080)
                && !self.elements.contains(ElementCategory::VideoResolution)
            {
                self.elements.insert(ElementCategory::VideoResolution, content);
                self.identify(index);
            }
        }
    }

    fn search_for_episode_number(&mut self) {
        let candidates: Vec<usize> = self
            .tokens
            .indices(TokenFlags::UNKNOWN)
            .into_iter()
            .filter(|&i| helper::find_number_in_string(&self.tokens[i].content).is_some())
            .collect();
        if candidates.is_empty() {
            return;
        }

        self.elements
            .set_check_alt_number(self.elements.contains(ElementCategory::EpisodeNumber));

        if self.search_for_episode_patterns(&candidates) {
            return;
        }
        // found through a prefix keyword
        if self.elements.contains(ElementCategory::EpisodeNumber) {
            return;
        }

        let numbers: Vec<usize> = candidates
            .into_iter()
            .filter(|&i| self.tokens[i].is_numeric())
            .collect();
        if numbers.is_empty() {
            return;
        }

        if self.search_for_equivalent_numbers(&numbers)
            || self.search_for_separated_numbers(&numbers)
            || self.search_for_leading_number(&numbers)
            || self.search_for_isolated_numbers(&numbers)
        {
            return;
        }
        self.search_for_last_number(&numbers);
    }

    /// Skip a bare number directly followed by a bracket group when the
    /// name has more free text later ("37 [Group] Title").
    fn skip_orphan_number(&self, mut begin: usize) -> usize {
        while self.tokens[begin].is_numeric() {
            let followed_by_group = self
                .tokens
                .find_next(Some(begin), TokenFlags::NOT_DELIMITER)
                .is_some_and(|n| self.tokens[n].is_bracket());
            if !followed_by_group {
                break;
            }
            match self
                .tokens
                .find_next(Some(begin), TokenFlags::NOT_ENCLOSED | TokenFlags::UNKNOWN)
            {
                Some(next) => begin = next,
                None => break,
            }
        }
        begin
    }

    /// First unknown token of the first mostly-Latin group after the
    /// leading group.
    fn find_enclosed_title_start(&self) -> Option<usize> {
        let mut cursor = 0;
        let mut skipped_previous_group = false;
        loop {
            let candidate = self.tokens.find_next(Some(cursor), TokenFlags::UNKNOWN)?;
            if skipped_previous_group
                && helper::is_mostly_latin_string(&self.tokens[candidate].content)
            {
                return Some(candidate);
            }
            cursor = self.tokens.find_next(Some(candidate), TokenFlags::BRACKET)?;
            skipped_previous_group = true;
        }
    }

    fn search_for_anime_title(&mut self) {
        if self.leading_episode {
            return;
        }

        let free_word = self
            .tokens
            .find(TokenFlags::NOT_ENCLOSED | TokenFlags::UNKNOWN);
        let (begin, enclosed_title) = match free_word {
            Some(begin) => (self.skip_orphan_number(begin), false),
            None => match self.find_enclosed_title_start() {
                Some(begin) => (begin, true),
                None => return,
            },
        };

        let end_flags = if enclosed_title {
            TokenFlags::IDENTIFIER | TokenFlags::BRACKET
        } else {
            TokenFlags::IDENTIFIER
        };
        let mut end = self.tokens.find_next(Some(begin), end_flags);

        if !enclosed_title {
            // An open bracket without its pair ends the title.
            let last = end.unwrap_or(self.tokens.len() - 1);
            let mut last_bracket = end;
            let mut bracket_open = false;
            for index in begin..=last {
                if self.tokens[index].is_bracket() {
                    last_bracket = Some(index);
                    bracket_open = !bracket_open;
                }
            }
            if bracket_open {
                end = last_bracket;
            }

            // "Title [Fansub]": leave the trailing group out. "(TV)" stays.
            let mut token = self.tokens.find_previous(end, TokenFlags::NOT_DELIMITER);
            while let Some(t) =
                token.filter(|&t| self.tokens[t].is_bracket() && self.tokens[t].content != ")")
            {
                token = self.tokens.find_previous(Some(t), TokenFlags::BRACKET);
                if let Some(open) = token {
                    end = Some(open);
                    token = self.tokens.find_previous(Some(open), TokenFlags::NOT_DELIMITER);
                }
            }
        }

        // The end is a boundary token; the title stops before it.
        let mut end = self.tokens.find_previous(end, TokenFlags::VALID);

        if !enclosed_title && !self.elements.contains(ElementCategory::EpisodeNumber) {
            end = self.split_sequel_subtitle(begin, end);
        }

        self.build_element(ElementCategory::AnimeTitle, begin, end, false);
        self.title_end = end;
    }

    /// "Title 2 - Subtitle" without an episode number: the title stops at
    /// the sequel number and the text after the dash is the episode title.
    fn split_sequel_subtitle(&mut self, begin: usize, end: Option<usize>) -> Option<usize> {
        let last = end?;
        for dash in begin..=last {
            let token = &self.tokens[dash];
            if !token.is_unknown() || !helper::is_dash_character(&token.content) {
                continue;
            }
            let sequel = self
                .tokens
                .find_previous(Some(dash), TokenFlags::NOT_DELIMITER)
                .is_some_and(|p| p >= begin && self.is_sequel_number(p));
            if !sequel {
                continue;
            }
            let Some(subtitle) = self
                .tokens
                .find_next(Some(dash), TokenFlags::NOT_DELIMITER)
                .filter(|&n| n <= last && self.tokens[n].is_unknown())
            else {
                continue;
            };

            if self.options.parse_episode_title {
                self.build_element(ElementCategory::EpisodeTitle, subtitle, Some(last), false);
            }
            self.identify(dash);
            return self.tokens.find_previous(Some(dash), TokenFlags::VALID);
        }
        end
    }

    fn search_for_release_group(&mut self) {
        let mut end: Option<usize> = None;
        loop {
            let flags = TokenFlags::ENCLOSED | TokenFlags::UNKNOWN;
            let Some(begin) = (match end {
                Some(end) => self.tokens.find_next(Some(end), flags),
                None => self.tokens.find(flags),
            }) else {
                return;
            };

            let Some(group_end) = self
                .tokens
                .find_next(Some(begin), TokenFlags::BRACKET | TokenFlags::IDENTIFIER)
            else {
                return;
            };
            end = Some(group_end);
            if !self.tokens[group_end].is_bracket() {
                continue;
            }

            // Release groups open their bracket group.
            let first_in_group = self
                .tokens
                .find_previous(Some(begin), TokenFlags::NOT_DELIMITER)
                .is_none_or(|p| self.tokens[p].is_bracket());
            if !first_in_group {
                continue;
            }

            let last = self.tokens.find_previous(Some(group_end), TokenFlags::VALID);
            self.build_element(ElementCategory::ReleaseGroup, begin, last, true);
            return;
        }
    }

    fn search_for_episode_title(&mut self) {
        let flags = TokenFlags::NOT_ENCLOSED | TokenFlags::UNKNOWN;
        let mut end = self.title_end;
        loop {
            let Some(begin) = (match end {
                Some(end) => self.tokens.find_next(Some(end), flags),
                None => self.tokens.find(flags),
            }) else {
                return;
            };

            let title_end = self
                .tokens
                .find_next(Some(begin), TokenFlags::BRACKET | TokenFlags::IDENTIFIER);

            // a lone dash
            if self.tokens.distance(Some(begin), title_end) <= 2
                && helper::is_dash_character(&self.tokens[begin].content)
            {
                match title_end {
                    Some(_) => {
                        end = title_end;
                        continue;
                    }
                    None => return,
                }
            }

            let last = match title_end {
                Some(e) if self.tokens[e].is_bracket() => {
                    self.tokens.find_previous(Some(e), TokenFlags::VALID)
                }
                other => other,
            };
            self.build_element(ElementCategory::EpisodeTitle, begin, last, false);
            return;
        }
    }

    fn validate_elements(&mut self) {
        if !self.elements.contains(ElementCategory::AnimeType)
            || !self.elements.contains(ElementCategory::EpisodeTitle)
        {
            return;
        }

        let Some(episode_title) = self
            .elements
            .first(ElementCategory::EpisodeTitle)
            .map(str::to_owned)
        else {
            return;
        };
        let anime_types = self.elements.get(ElementCategory::AnimeType).to_vec();
        for anime_type in anime_types {
            if anime_type == episode_title {
                // "PV" picked up as both type and title
                self.elements.erase(ElementCategory::EpisodeTitle);
            } else if episode_title.contains(anime_type.as_str())
                && self
                    .keywords
                    .find_word(&anime_type, Some(ElementCategory::AnimeType))
                    .is_some()
            {
                self.elements.remove(ElementCategory::AnimeType, &anime_type);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::context::test_support::Fixture;

    fn run(input: &str) -> crate::types::Elements {
        let fixture = Fixture::new();
        let mut context = fixture.context(input);
        context.run();
        context.into_elements()
    }

    #[test]
    fn keyword_pass_files_terms() {
        let fixture = Fixture::new();
        let mut context = fixture.context("Title BD FLAC 10bit [ABCD1234]");
        context.search_for_keywords();
        let elements = &context.elements;
        assert_eq!(elements.first(ElementCategory::Source), Some("BD"));
        assert_eq!(elements.first(ElementCategory::AudioTerm), Some("FLAC"));
        assert_eq!(elements.first(ElementCategory::VideoTerm), Some("10bit"));
        assert_eq!(elements.first(ElementCategory::FileChecksum), Some("ABCD1234"));
    }

    #[test]
    fn release_version_drops_v() {
        let elements = run("[Group] Title - 05 [v2]");
        assert_eq!(elements.first(ElementCategory::ReleaseVersion), Some("2"));
    }

    #[test]
    fn season_keyword_with_number_and_ordinal() {
        let elements = run("Title Season 2 - 05");
        assert_eq!(elements.get(ElementCategory::AnimeSeason), ["2"]);
        assert_eq!(elements.first(ElementCategory::EpisodeNumber), Some("05"));
        assert_eq!(elements.first(ElementCategory::AnimeTitle), Some("Title"));

        let elements = run("Title 2nd Season - 05");
        assert_eq!(elements.get(ElementCategory::AnimeSeason), ["2"]);
    }

    #[test]
    fn isolated_year_and_bare_resolution() {
        let elements = run("Title (2008) [720]");
        assert_eq!(elements.first(ElementCategory::AnimeYear), Some("2008"));
        assert_eq!(elements.first(ElementCategory::VideoResolution), Some("720"));
    }

    #[test]
    fn episode_number_disabled() {
        let mut fixture = Fixture::new();
        fixture.options.parse_episode_number = false;
        let mut context = fixture.context("[Group] Title - 05");
        context.run();
        assert!(!context.elements.contains(ElementCategory::EpisodeNumber));
        assert_eq!(context.elements.first(ElementCategory::ReleaseGroup), Some("Group"));
    }

    #[test]
    fn title_keeps_parenthesized_suffix() {
        let elements = run("Title (TV) - 05 [Group]");
        assert_eq!(elements.first(ElementCategory::AnimeTitle), Some("Title (TV)"));
    }

    #[test]
    fn title_excludes_trailing_group() {
        let elements = run("Title [Group] 720p");
        assert_eq!(elements.first(ElementCategory::AnimeTitle), Some("Title"));
        assert_eq!(elements.first(ElementCategory::ReleaseGroup), Some("Group"));
    }

    #[test]
    fn enclosed_title_skips_first_group() {
        let elements = run("[Group][Enclosed Title][01]");
        assert_eq!(elements.first(ElementCategory::ReleaseGroup), Some("Group"));
        assert_eq!(elements.first(ElementCategory::AnimeTitle), Some("Enclosed Title"));
        assert_eq!(elements.first(ElementCategory::EpisodeNumber), Some("01"));
    }

    #[test]
    fn enclosed_title_skips_non_latin_groups() {
        let elements = run("[Group][魔法少女][Latin Title][05]");
        assert_eq!(elements.first(ElementCategory::AnimeTitle), Some("Latin Title"));
    }

    #[test]
    fn episode_title_after_number() {
        let elements = run("Title - 05 - The Subtitle [720p]");
        assert_eq!(elements.first(ElementCategory::EpisodeNumber), Some("05"));
        assert_eq!(elements.first(ElementCategory::EpisodeTitle), Some("The Subtitle"));
    }

    #[test]
    fn validation_drops_type_inside_episode_title() {
        let fixture = Fixture::new();
        let mut context = fixture.context("x");
        context.elements.insert(ElementCategory::AnimeType, "OVA");
        context.elements.insert(ElementCategory::AnimeType, "Movie");
        context.elements.insert(ElementCategory::EpisodeTitle, "The OVA Special");
        context.validate_elements();
        assert_eq!(context.elements.get(ElementCategory::AnimeType), ["Movie"]);
        assert!(context.elements.contains(ElementCategory::EpisodeTitle));

        let mut context = fixture.context("x");
        context.elements.insert(ElementCategory::AnimeType, "PV");
        context.elements.insert(ElementCategory::EpisodeTitle, "PV");
        context.validate_elements();
        assert!(!context.elements.contains(ElementCategory::EpisodeTitle));
    }
}
