//! Shared token navigation for T-SQL statement scanning.
//!
//! A thin cursor over a sqlparser token slice, providing the checking and
//! skipping helpers the statement normalizer needs. Specialized routines
//! (procedure header parsing) compose over this rather than re-implementing
//! position handling.

use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::Token;

pub struct TokenCursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Current token without consuming
    #[inline]
    pub fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Remaining tokens from the current position
    #[inline]
    pub fn rest(&self) -> &'a [Token] {
        &self.tokens[self.pos.min(self.tokens.len())..]
    }

    #[inline]
    pub fn advance(&mut self) {
        if !self.is_at_end() {
            self.pos += 1;
        }
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(Token::Whitespace(_)) = self.current() {
            self.pos += 1;
        }
    }

    /// Check if the current token is the given keyword
    pub fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(self.current(), Some(Token::Word(w)) if w.keyword == keyword)
    }

    /// Check if the current token is a word with the given value,
    /// case-insensitive (for words sqlparser does not treat as keywords)
    pub fn check_word_ci(&self, value: &str) -> bool {
        matches!(self.current(), Some(Token::Word(w)) if w.value.eq_ignore_ascii_case(value))
    }
}

/// First non-whitespace token of a slice
pub fn first_significant(tokens: &[Token]) -> Option<&Token> {
    tokens
        .iter()
        .find(|t| !matches!(t, Token::Whitespace(_)))
}

/// True if the slice contains any non-whitespace token
pub fn has_significant(tokens: &[Token]) -> bool {
    first_significant(tokens).is_some()
}
