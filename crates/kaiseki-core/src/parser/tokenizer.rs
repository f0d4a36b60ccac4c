//! # Tokenizer
//!
//! Splits a file name (extension already removed) into bracket, delimiter,
//! identifier and unknown tokens, recording which tokens sit inside a
//! bracket group.

use tracing::trace;

use crate::keyword::KeywordManager;
use crate::types::{Elements, Token, TokenCategory, TokenFlags, Tokens};

/// Opening and closing bracket pairs, including the CJK forms.
const BRACKETS: [(char, char); 7] = [
    ('(', ')'),
    ('[', ']'),
    ('{', '}'),
    ('\u{300C}', '\u{300D}'),
    ('\u{300E}', '\u{300F}'),
    ('\u{3010}', '\u{3011}'),
    ('\u{FF08}', '\u{FF09}'),
];

/// Opening or closing bracket of any known pair.
pub(crate) fn is_bracket(c: char) -> bool {
    BRACKETS.iter().any(|&(open, close)| c == open || c == close)
}

fn closer_for(open: char) -> Option<char> {
    BRACKETS
        .iter()
        .find(|(o, _)| *o == open)
        .map(|(_, close)| *close)
}

/// Tokenizer for release file names.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer<'a> {
    delimiters: &'a str,
    keywords: &'a KeywordManager,
}

impl<'a> Tokenizer<'a> {
    /// Create a tokenizer splitting on the given delimiter characters.
    pub fn new(delimiters: &'a str, keywords: &'a KeywordManager) -> Self {
        Self {
            delimiters,
            keywords,
        }
    }

    /// Tokenize a file name.
    ///
    /// Keywords found by [`KeywordManager::peek`] are filed into `elements`
    /// and become identifier tokens.
    ///
    /// # Examples
    /// ```
    /// use kaiseki_core::keyword::KeywordManager;
    /// use kaiseki_core::parser::Tokenizer;
    /// use kaiseki_core::types::Elements;
    ///
    /// let keywords = KeywordManager::new();
    /// let tokenizer = Tokenizer::new(" _.&+,|", &keywords);
    /// let mut elements = Elements::new();
    /// let tokens = tokenizer.tokenize("[Group] Title - 01", &mut elements);
    /// assert_eq!(tokens[1].content, "Group");
    /// assert!(tokens[1].enclosed);
    /// ```
    pub fn tokenize(&self, filename: &str, elements: &mut Elements) -> Tokens {
        let mut tokens = Tokens::new();
        let mut text = filename;
        let mut closer: Option<char> = None;

        while !text.is_empty() {
            // While a group is open only its own closer ends it.
            let found = match closer {
                None => text.char_indices().find(|(_, c)| closer_for(*c).is_some()),
                Some(close) => text.char_indices().find(|(_, c)| *c == close),
            };

            let Some((pos, bracket)) = found else {
                self.tokenize_by_preidentified(&mut tokens, elements, text, closer.is_some());
                break;
            };

            if pos > 0 {
                self.tokenize_by_preidentified(
                    &mut tokens,
                    elements,
                    &text[..pos],
                    closer.is_some(),
                );
            }
            tokens.push(Token::new(TokenCategory::Bracket, bracket, true));
            closer = match closer {
                None => closer_for(bracket),
                Some(_) => None,
            };
            text = &text[pos + bracket.len_utf8()..];
        }

        validate_delimiter_tokens(&mut tokens);
        tokens.remove_invalid();

        trace!(count = tokens.len(), "tokenized");
        tokens
    }

    fn tokenize_by_preidentified(
        &self,
        tokens: &mut Tokens,
        elements: &mut Elements,
        text: &str,
        enclosed: bool,
    ) {
        let mut last_end = 0;
        for range in self.keywords.peek(elements, text) {
            if range.start > last_end {
                self.tokenize_by_delimiters(tokens, &text[last_end..range.start], enclosed);
            }
            tokens.push(Token::new(
                TokenCategory::Identifier,
                &text[range.clone()],
                enclosed,
            ));
            last_end = range.end;
        }
        if last_end < text.len() {
            self.tokenize_by_delimiters(tokens, &text[last_end..], enclosed);
        }
    }

    fn tokenize_by_delimiters(&self, tokens: &mut Tokens, text: &str, enclosed: bool) {
        let mut word_start = 0;
        for (pos, c) in text.char_indices() {
            if !self.delimiters.contains(c) {
                continue;
            }
            if pos > word_start {
                tokens.push(Token::new(
                    TokenCategory::Unknown,
                    &text[word_start..pos],
                    enclosed,
                ));
            }
            tokens.push(Token::new(TokenCategory::Delimiter, c, enclosed));
            word_start = pos + c.len_utf8();
        }
        if word_start < text.len() {
            tokens.push(Token::new(
                TokenCategory::Unknown,
                &text[word_start..],
                enclosed,
            ));
        }
    }
}

fn is_category(tokens: &Tokens, index: Option<usize>, category: TokenCategory) -> bool {
    index.is_some_and(|i| tokens[i].category == category)
}

fn is_single_character(tokens: &Tokens, index: Option<usize>) -> bool {
    index.is_some_and(|i| {
        let token = &tokens[i];
        token.is_unknown() && token.content.chars().count() == 1 && token.content != "-"
    })
}

/// Move `from`'s content onto the end of `to` and retire `from`.
fn append_token(tokens: &mut Tokens, from: usize, to: usize) {
    let content = std::mem::take(&mut tokens[from].content);
    tokens[to].content.push_str(&content);
    tokens[from].category = TokenCategory::Invalid;
}

/// Glue delimiters back into words where splitting would break a name,
/// keyword or number ("5.1", "Vol.1", "01+02").
fn validate_delimiter_tokens(tokens: &mut Tokens) {
    for index in 0..tokens.len() {
        if !tokens[index].is_delimiter() {
            continue;
        }

        let delimiter = tokens[index].content.clone();
        let prev = tokens.find_previous(Some(index), TokenFlags::VALID);
        let mut next = tokens.find_next(Some(index), TokenFlags::VALID);

        // Single characters stay attached to their word across non-space
        // delimiters.
        if delimiter != " " && delimiter != "_" {
            if let Some(p) = prev.filter(|_| is_single_character(tokens, prev)) {
                append_token(tokens, index, p);
                while let Some(n) = next.filter(|&n| tokens[n].is_unknown()) {
                    append_token(tokens, n, p);
                    next = tokens.find_next(Some(n), TokenFlags::VALID);
                    if let Some(d) =
                        next.filter(|&d| tokens[d].is_delimiter() && tokens[d].content == delimiter)
                    {
                        append_token(tokens, d, p);
                        next = tokens.find_next(Some(d), TokenFlags::VALID);
                    }
                }
                continue;
            }
            if is_single_character(tokens, next) {
                if let (Some(p), Some(n)) = (prev, next) {
                    if tokens[p].is_unknown() {
                        append_token(tokens, index, p);
                        append_token(tokens, n, p);
                        continue;
                    }
                }
            }
        }

        if is_category(tokens, prev, TokenCategory::Unknown)
            && is_category(tokens, next, TokenCategory::Delimiter)
        {
            if let (Some(p), Some(n)) = (prev, next) {
                let next_delimiter = tokens[n].content.as_str();
                if delimiter != next_delimiter
                    && delimiter != ","
                    && (next_delimiter == " " || next_delimiter == "_")
                {
                    append_token(tokens, index, p);
                }
            }
        } else if is_category(tokens, prev, TokenCategory::Delimiter)
            && is_category(tokens, next, TokenCategory::Delimiter)
        {
            if let (Some(p), Some(n)) = (prev, next) {
                if tokens[p].content == tokens[n].content && tokens[p].content != delimiter {
                    // "&" in "_&_"
                    tokens[index].category = TokenCategory::Unknown;
                }
            }
        }

        if (delimiter == "&" || delimiter == "+") && tokens[index].is_delimiter() {
            if let (Some(p), Some(n)) = (prev, next) {
                if tokens[p].is_unknown()
                    && tokens[n].is_unknown()
                    && tokens[p].is_numeric()
                    && tokens[n].is_numeric()
                {
                    // "01+02"
                    append_token(tokens, index, p);
                    append_token(tokens, n, p);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELIMITERS: &str = " _.&+,|";

    fn tokenize(input: &str) -> (Tokens, Elements) {
        let keywords = KeywordManager::new();
        let mut elements = Elements::new();
        let tokens = Tokenizer::new(DELIMITERS, &keywords).tokenize(input, &mut elements);
        (tokens, elements)
    }

    fn contents(tokens: &Tokens) -> Vec<&str> {
        tokens.iter().map(|t| t.content.as_str()).collect()
    }

    #[test]
    fn brackets_mark_enclosed_tokens() {
        let (tokens, _) = tokenize("[Group] Title (TV)");
        assert_eq!(contents(&tokens), ["[", "Group", "]", " ", "Title", " ", "(", "TV", ")"]);
        assert!(tokens[0].is_bracket() && tokens[0].enclosed);
        assert!(tokens[1].enclosed);
        assert!(!tokens[4].enclosed);
        assert!(tokens[7].enclosed);
    }

    #[test]
    fn foreign_brackets_inside_group_are_text() {
        let (tokens, _) = tokenize("[Group (A]");
        assert_eq!(contents(&tokens), ["[", "Group", " ", "(A", "]"]);
        assert!(tokens[3].enclosed);
    }

    #[test]
    fn cjk_brackets() {
        let (tokens, _) = tokenize("【Group】Title");
        assert_eq!(contents(&tokens), ["【", "Group", "】", "Title"]);
        assert!(tokens[1].enclosed);
        assert!(!tokens[3].enclosed);
    }

    #[test]
    fn unmatched_closers_never_open_a_group() {
        let (tokens, _) = tokenize(")]} Title");
        assert!(tokens.iter().all(|t| !t.enclosed));
        assert!(tokens.iter().all(|t| !t.is_bracket()));
    }

    #[test]
    fn empty_input_has_no_tokens() {
        let (tokens, elements) = tokenize("");
        assert!(tokens.is_empty());
        assert!(elements.is_empty());
    }

    #[test]
    fn single_characters_are_glued() {
        let (tokens, _) = tokenize("AAC 5.1ch");
        assert_eq!(contents(&tokens), ["AAC", " ", "5.1ch"]);

        let (tokens, _) = tokenize("Vol.1");
        assert_eq!(contents(&tokens), ["Vol.1"]);

        let (tokens, _) = tokenize("A.K.A Title");
        assert_eq!(contents(&tokens), ["A.K.A", " ", "Title"]);
    }

    #[test]
    fn numbers_joined_by_plus_or_ampersand() {
        let (tokens, _) = tokenize("Title 01+02");
        assert_eq!(contents(&tokens), ["Title", " ", "01+02"]);
    }

    #[test]
    fn ampersand_between_matching_delimiters_becomes_text() {
        let (tokens, _) = tokenize("Tom_&_Jerry");
        assert_eq!(contents(&tokens), ["Tom", "_", "&", "_", "Jerry"]);
        assert!(tokens[2].is_unknown());
    }

    #[test]
    fn dot_before_space_folds_into_word() {
        let (tokens, _) = tokenize("Title. Next");
        assert_eq!(contents(&tokens), ["Title.", " ", "Next"]);
    }

    #[test]
    fn peeked_keywords_become_identifiers() {
        let (tokens, elements) = tokenize("Show Dual Audio 720p");
        let dual = tokens.iter().find(|t| t.content == "Dual Audio").unwrap();
        assert_eq!(dual.category, TokenCategory::Identifier);
        assert_eq!(elements.first(crate::types::ElementCategory::AudioTerm), Some("Dual Audio"));
    }

    #[test]
    fn dash_is_not_a_delimiter_by_default() {
        let (tokens, _) = tokenize("Title - 01");
        assert_eq!(contents(&tokens), ["Title", " ", "-", " ", "01"]);
        assert!(tokens[2].is_unknown());
    }
}
