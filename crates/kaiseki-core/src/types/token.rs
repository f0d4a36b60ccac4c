use std::ops::{Index, IndexMut};

use bitflags::bitflags;

/// Lexical class of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Text not yet claimed by any pass.
    Unknown,
    /// A single opening or closing bracket character.
    Bracket,
    /// A single delimiter character.
    Delimiter,
    /// Text resolved to a field; later passes leave it alone.
    Identifier,
    /// Merged into a neighbour during tokenization and about to be dropped.
    Invalid,
}

bitflags! {
    /// Search filters for walking a token sequence.
    ///
    /// Category flags combine with OR semantics: a token matches when any of
    /// the requested category conditions holds. Enclosure flags are checked
    /// first and must hold on their own.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenFlags: u16 {
        const BRACKET        = 1 << 0;
        const NOT_BRACKET    = 1 << 1;
        const DELIMITER      = 1 << 2;
        const NOT_DELIMITER  = 1 << 3;
        const IDENTIFIER     = 1 << 4;
        const NOT_IDENTIFIER = 1 << 5;
        const UNKNOWN        = 1 << 6;
        const NOT_UNKNOWN    = 1 << 7;
        const VALID          = 1 << 8;
        const NOT_VALID      = 1 << 9;
        const ENCLOSED       = 1 << 10;
        const NOT_ENCLOSED   = 1 << 11;

        const MASK_CATEGORIES = Self::BRACKET.bits()
            | Self::NOT_BRACKET.bits()
            | Self::DELIMITER.bits()
            | Self::NOT_DELIMITER.bits()
            | Self::IDENTIFIER.bits()
            | Self::NOT_IDENTIFIER.bits()
            | Self::UNKNOWN.bits()
            | Self::NOT_UNKNOWN.bits()
            | Self::VALID.bits()
            | Self::NOT_VALID.bits();
        const MASK_ENCLOSED = Self::ENCLOSED.bits() | Self::NOT_ENCLOSED.bits();
    }
}

/// A lexical token of a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub category: TokenCategory,
    pub content: String,
    /// Inside a bracket group. Bracket tokens themselves are enclosed.
    pub enclosed: bool,
}

impl Token {
    pub fn new(category: TokenCategory, content: impl Into<String>, enclosed: bool) -> Self {
        Self {
            category,
            content: content.into(),
            enclosed,
        }
    }

    pub fn is_unknown(&self) -> bool {
        self.category == TokenCategory::Unknown
    }

    pub fn is_bracket(&self) -> bool {
        self.category == TokenCategory::Bracket
    }

    pub fn is_delimiter(&self) -> bool {
        self.category == TokenCategory::Delimiter
    }

    /// Non-empty and made of ASCII digits only.
    pub fn is_numeric(&self) -> bool {
        !self.content.is_empty() && self.content.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn check_flags(&self, flags: TokenFlags) -> bool {
        if flags.intersects(TokenFlags::MASK_ENCLOSED) {
            let wanted = flags.contains(TokenFlags::ENCLOSED);
            if self.enclosed != wanted {
                return false;
            }
        }

        if !flags.intersects(TokenFlags::MASK_CATEGORIES) {
            return true;
        }

        let check = |is: TokenFlags, is_not: TokenFlags, category: TokenCategory| {
            if flags.contains(is) {
                self.category == category
            } else if flags.contains(is_not) {
                self.category != category
            } else {
                false
            }
        };

        check(TokenFlags::BRACKET, TokenFlags::NOT_BRACKET, TokenCategory::Bracket)
            || check(TokenFlags::DELIMITER, TokenFlags::NOT_DELIMITER, TokenCategory::Delimiter)
            || check(TokenFlags::IDENTIFIER, TokenFlags::NOT_IDENTIFIER, TokenCategory::Identifier)
            || check(TokenFlags::UNKNOWN, TokenFlags::NOT_UNKNOWN, TokenCategory::Unknown)
            || check(TokenFlags::NOT_VALID, TokenFlags::VALID, TokenCategory::Invalid)
    }
}

/// Ordered token arena. Tokens are addressed by index; indices stay stable
/// for the whole parse except across an explicit [`Tokens::insert`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tokens {
    tokens: Vec<Token>,
}

impl Tokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn insert(&mut self, index: usize, token: Token) {
        self.tokens.insert(index, token);
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Drop tokens that were merged away.
    pub fn remove_invalid(&mut self) {
        self.tokens.retain(|t| t.category != TokenCategory::Invalid);
    }

    /// Indices of every token matching `flags`, in order.
    pub fn indices(&self, flags: TokenFlags) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| t.check_flags(flags))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn find(&self, flags: TokenFlags) -> Option<usize> {
        self.find_next(None, flags)
    }

    /// First match strictly after `from`, or from the start when `from` is `None`.
    pub fn find_next(&self, from: Option<usize>, flags: TokenFlags) -> Option<usize> {
        let start = from.map_or(0, |i| i + 1);
        (start..self.tokens.len()).find(|&i| self.tokens[i].check_flags(flags))
    }

    /// Last match strictly before `from`, or from the end when `from` is `None`.
    pub fn find_previous(&self, from: Option<usize>, flags: TokenFlags) -> Option<usize> {
        let end = from.unwrap_or(self.tokens.len()).min(self.tokens.len());
        (0..end).rev().find(|&i| self.tokens[i].check_flags(flags))
    }

    /// Index distance between two positions; `None` stands for either end.
    pub fn distance(&self, begin: Option<usize>, end: Option<usize>) -> usize {
        let begin = begin.unwrap_or(0);
        let end = end.unwrap_or(self.tokens.len());
        end.saturating_sub(begin)
    }
}

impl Index<usize> for Tokens {
    type Output = Token;

    fn index(&self, index: usize) -> &Token {
        &self.tokens[index]
    }
}

impl IndexMut<usize> for Tokens {
    fn index_mut(&mut self, index: usize) -> &mut Token {
        &mut self.tokens[index]
    }
}

impl<'a> IntoIterator for &'a Tokens {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
