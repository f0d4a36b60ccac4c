use crate::keyword::KeywordManager;
use crate::parser::helper;
use crate::parser::number::NumberPatterns;
use crate::parser::unified::ParseOptions;
use crate::types::{ElementCategory, Elements, TokenCategory, TokenFlags, Tokens};

/// Mutable state of a single parse: the token arena, the element collector
/// and the read-only tables the passes consult.
pub(crate) struct ParseContext<'a> {
    pub(crate) options: &'a ParseOptions,
    pub(crate) keywords: &'a KeywordManager,
    pub(crate) patterns: &'a NumberPatterns,
    pub(crate) elements: Elements,
    pub(crate) tokens: Tokens,
    /// Last token of the anime title span.
    pub(crate) title_end: Option<usize>,
    /// The name opens with its episode number ("01 - Title").
    pub(crate) leading_episode: bool,
}

impl<'a> ParseContext<'a> {
    pub(crate) fn new(
        options: &'a ParseOptions,
        keywords: &'a KeywordManager,
        patterns: &'a NumberPatterns,
        elements: Elements,
        tokens: Tokens,
    ) -> Self {
        Self {
            options,
            keywords,
            patterns,
            elements,
            tokens,
            title_end: None,
            leading_episode: false,
        }
    }

    pub(crate) fn into_elements(self) -> Elements {
        self.elements
    }

    pub(crate) fn identify(&mut self, index: usize) {
        self.tokens[index].category = TokenCategory::Identifier;
    }

    /// Neighbouring non-delimiter tokens are not plain numbers.
    pub(crate) fn is_token_isolated(&self, index: usize) -> bool {
        let numeric = |i: Option<usize>| i.is_some_and(|i| self.tokens[i].is_numeric());
        !numeric(self.tokens.find_previous(Some(index), TokenFlags::NOT_DELIMITER))
            && !numeric(self.tokens.find_next(Some(index), TokenFlags::NOT_DELIMITER))
    }

    /// The only content of its bracket group, as in "[12]".
    pub(crate) fn is_alone_in_group(&self, index: usize) -> bool {
        let prev = self.tokens.find_previous(Some(index), TokenFlags::NOT_DELIMITER);
        if !prev.is_some_and(|p| self.tokens[p].is_bracket()) {
            return false;
        }
        let next = self.tokens.find_next(Some(index), TokenFlags::NOT_DELIMITER);
        next.is_none_or(|n| self.tokens[n].is_bracket())
    }

    /// A lone digit 1-9 followed by a dash and a word, as in "Title 2 - Subtitle".
    pub(crate) fn is_sequel_number(&self, index: usize) -> bool {
        let token = &self.tokens[index];
        let single_digit =
            token.content.len() == 1 && matches!(token.content.as_bytes()[0], b'1'..=b'9');
        if !token.is_unknown() || !single_digit {
            return false;
        }
        let Some(dash) = self.tokens.find_next(Some(index), TokenFlags::NOT_DELIMITER) else {
            return false;
        };
        let dash_token = &self.tokens[dash];
        if !dash_token.is_unknown() || !helper::is_dash_character(&dash_token.content) {
            return false;
        }
        self.tokens
            .find_next(Some(dash), TokenFlags::NOT_DELIMITER)
            .is_some_and(|word| self.tokens[word].is_unknown() && !self.tokens[word].is_numeric())
    }

    /// Concatenate `begin..=end` into one element value and claim the
    /// unknown tokens in the span. `end == None` runs to the last token.
    pub(crate) fn build_element(
        &mut self,
        category: ElementCategory,
        begin: usize,
        end: Option<usize>,
        keep_delimiters: bool,
    ) -> bool {
        let Some(last) = end.or_else(|| self.tokens.len().checked_sub(1)) else {
            return false;
        };
        if last < begin {
            return false;
        }

        let mut element = String::new();
        for index in begin..=last {
            let token = &mut self.tokens[index];
            match token.category {
                TokenCategory::Unknown => {
                    element.push_str(&token.content);
                    token.category = TokenCategory::Identifier;
                }
                TokenCategory::Bracket => element.push_str(&token.content),
                TokenCategory::Delimiter => {
                    if keep_delimiters {
                        element.push_str(&token.content);
                    } else if index != begin && Some(index) != end {
                        match token.content.as_str() {
                            "," | "&" => element.push_str(&token.content),
                            _ => element.push(' '),
                        }
                    }
                }
                TokenCategory::Identifier | TokenCategory::Invalid => {}
            }
        }

        if !keep_delimiters {
            element = element
                .trim_matches(|c: char| c == ' ' || helper::is_dash(c))
                .to_string();
        }
        if element.is_empty() {
            return false;
        }
        tracing::trace!(%category, value = %element, "built element");
        self.elements.insert(category, element)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::parser::tokenizer::Tokenizer;

    /// Owned tables for building a context in unit tests.
    pub(crate) struct Fixture {
        pub options: ParseOptions,
        pub keywords: KeywordManager,
        pub patterns: NumberPatterns,
    }

    impl Fixture {
        pub fn new() -> Self {
            Self {
                options: ParseOptions::default(),
                keywords: KeywordManager::new(),
                patterns: NumberPatterns::new().unwrap(),
            }
        }

        pub fn context(&self, input: &str) -> ParseContext<'_> {
            let mut elements = Elements::new();
            let tokens = Tokenizer::new(&self.options.allowed_delimiters, &self.keywords)
                .tokenize(input, &mut elements);
            ParseContext::new(&self.options, &self.keywords, &self.patterns, elements, tokens)
        }
    }

    pub(crate) fn index_of(context: &ParseContext<'_>, content: &str) -> usize {
        context
            .tokens
            .iter()
            .position(|t| t.content == content)
            .unwrap()
    }
}
