//! DDL script parsing and normalization.
//!
//! Takes the raw text of one script file, splits it into GO batches, and
//! re-emits each batch as canonical statement text: drop guards and other
//! interactive no-ops are removed, ALTER PROCEDURE definitions are rewritten
//! to CREATE PROCEDURE, and every retained statement is pretty-printed
//! deterministically. A file authored with incremental ALTERs therefore
//! produces the same output as one authored with CREATEs.

use std::ops::Range;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::keywords::Keyword;
use sqlparser::parser::Parser;
use sqlparser::tokenizer::{Token, Tokenizer};

use super::batch_splitter::{split_batches, Batch};
use super::formatter::{
    canonical_statement, format_token_sql, format_word, render_canonical_tokens, tokens_to_sql,
};
use super::token_cursor::{first_significant, has_significant, TokenCursor};
use crate::config::SqlServerVersion;
use crate::error::Dir2DacError;
use crate::model::StatementBatch;

/// Extract line number from sqlparser error message (format: "... at Line: X, Column: Y")
static LINE_IN_ERROR: Lazy<Regex> = Lazy::new(|| Regex::new(r"Line:\s*(\d+)").unwrap());

fn extract_line_from_error(error_msg: &str) -> Option<usize> {
    let caps = LINE_IN_ERROR.captures(error_msg)?;
    caps.get(1)?.as_str().parse().ok()
}

/// Statement starters that keep their token-level rendering when sqlparser
/// cannot represent them (T-SQL administrative and security statements)
const TOKEN_FALLBACK_STARTERS: &[&str] = &[
    "EXEC", "EXECUTE", "GRANT", "DENY", "REVOKE", "ENABLE", "DISABLE", "PRINT",
];

/// Parses loosely-formatted DDL scripts into canonical statement batches,
/// under the grammar of a target SQL Server version.
pub struct DdlScriptParser {
    version: SqlServerVersion,
}

impl DdlScriptParser {
    pub fn new(version: SqlServerVersion) -> Self {
        Self { version }
    }

    /// Read and normalize one script file
    pub fn parse_file(&self, path: &Path) -> Result<Vec<StatementBatch>, Dir2DacError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Dir2DacError::SqlFileReadError {
                path: path.to_path_buf(),
                source: e,
            })?;

        // Strip UTF-8 BOM if present
        let content = content.strip_prefix('\u{FEFF}').unwrap_or(&content);
        self.get_batches(content)
    }

    /// Normalize raw script text into ordered statement batches.
    ///
    /// Batches left with no statements after no-op removal are dropped.
    pub fn get_batches(&self, script: &str) -> Result<Vec<StatementBatch>, Dir2DacError> {
        let batches = split_batches(script);
        let mut out = Vec::with_capacity(batches.len());

        for (index, batch) in batches.iter().enumerate() {
            let statements = self.normalize_batch(batch, index)?;
            if !statements.is_empty() {
                out.push(StatementBatch { statements });
            }
        }

        Ok(out)
    }

    /// One canonical text block per surviving batch
    pub fn get_statements(&self, script: &str) -> Result<Vec<String>, Dir2DacError> {
        Ok(self
            .get_batches(script)?
            .iter()
            .map(StatementBatch::text)
            .collect())
    }

    fn normalize_batch(
        &self,
        batch: &Batch<'_>,
        index: usize,
    ) -> Result<Vec<String>, Dir2DacError> {
        let dialect = MsSqlDialect {};
        let tokens = Tokenizer::new(&dialect, batch.content)
            .tokenize()
            .map_err(|e| {
                let message = e.to_string();
                let relative = extract_line_from_error(&message).unwrap_or(1);
                Dir2DacError::SqlParseError {
                    batch: index,
                    line: batch.start_line + relative - 1,
                    message,
                }
            })?;

        let mut statements = Vec::new();
        for range in split_statements(&tokens) {
            let start_line = batch.start_line + newlines_before(&tokens[..range.start]);
            if let Some(text) = self.normalize_statement(&tokens[range], index, start_line)? {
                statements.push(text);
            }
        }
        Ok(statements)
    }

    fn normalize_statement(
        &self,
        stmt: &[Token],
        batch_index: usize,
        start_line: usize,
    ) -> Result<Option<String>, Dir2DacError> {
        let Some(first) = first_significant(stmt) else {
            return Ok(None);
        };

        let first_keyword = match first {
            Token::Word(w) => w.keyword,
            _ => Keyword::NoKeyword,
        };

        match first_keyword {
            // Interactive-tooling no-ops: bare drops and session SET options
            // carry no object definitions
            Keyword::DROP | Keyword::SET => Ok(None),
            Keyword::IF => {
                if is_drop_guard(stmt) {
                    Ok(None)
                } else {
                    Ok(Some(format!("{};", render_canonical_tokens(stmt))))
                }
            }
            Keyword::CREATE | Keyword::ALTER if is_procedure_statement(stmt) => {
                match format_procedure(stmt) {
                    Some(text) => Ok(Some(text)),
                    None => Err(Dir2DacError::SqlParseError {
                        batch: batch_index,
                        line: start_line,
                        message: "malformed procedure definition".to_string(),
                    }),
                }
            }
            _ => self.normalize_general(stmt, first, batch_index, start_line),
        }
    }

    fn normalize_general(
        &self,
        stmt: &[Token],
        first: &Token,
        batch_index: usize,
        start_line: usize,
    ) -> Result<Option<String>, Dir2DacError> {
        let is_ddl = matches!(
            first,
            Token::Word(w) if matches!(w.keyword, Keyword::CREATE | Keyword::ALTER)
        );

        // Grammar gate: sequences arrived with SQL Server 2012
        if is_ddl && second_word_is(stmt, "SEQUENCE") && self.version < SqlServerVersion::Sql110 {
            return Err(Dir2DacError::SqlParseError {
                batch: batch_index,
                line: start_line,
                message: format!(
                    "CREATE SEQUENCE is not available in the {} grammar",
                    self.version
                ),
            });
        }

        let sql = tokens_to_sql(stmt);
        match Parser::parse_sql(&MsSqlDialect {}, sql.trim()) {
            Ok(parsed) => {
                let blocks: Vec<String> = parsed.iter().map(canonical_statement).collect();
                Ok(Some(blocks.join("\n")))
            }
            Err(e) => {
                let starter = match first {
                    Token::Word(w) => w.value.to_uppercase(),
                    _ => String::new(),
                };
                if is_ddl || TOKEN_FALLBACK_STARTERS.contains(&starter.as_str()) {
                    // T-SQL shapes outside sqlparser's coverage keep their
                    // token-level canonical form
                    Ok(Some(format!("{};", render_canonical_tokens(stmt))))
                } else {
                    let message = e.to_string();
                    let relative = extract_line_from_error(&message).unwrap_or(1);
                    Err(Dir2DacError::SqlParseError {
                        batch: batch_index,
                        line: start_line + relative - 1,
                        message,
                    })
                }
            }
        }
    }
}

/// Count newlines emitted by a token prefix, for absolute error lines
fn newlines_before(tokens: &[Token]) -> usize {
    tokens
        .iter()
        .map(|t| format_token_sql(t).matches('\n').count())
        .sum()
}

/// True when BEGIN opens something other than a statement block
/// (BEGIN TRAN, BEGIN TRANSACTION, BEGIN DISTRIBUTED ..., BEGIN DIALOG ...)
fn begins_transaction(tokens: &[Token], begin_index: usize) -> bool {
    for token in &tokens[begin_index + 1..] {
        match token {
            Token::Whitespace(_) => continue,
            Token::Word(w) => {
                return ["TRAN", "TRANSACTION", "DISTRIBUTED", "DIALOG"]
                    .iter()
                    .any(|t| w.value.eq_ignore_ascii_case(t));
            }
            _ => return false,
        }
    }
    false
}

/// Split a batch token stream into statement ranges.
///
/// Statements end at a semicolon outside parentheses and BEGIN/END (or
/// CASE/END) blocks; a top-level CREATE/ALTER/IF also starts a new statement
/// when one is already in progress, covering scripts that omit semicolons.
fn split_statements(tokens: &[Token]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0usize;
    let mut paren_depth = 0usize;
    let mut block_depth = 0usize;
    let mut last_significant: Option<&Token> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => paren_depth += 1,
            Token::RParen => paren_depth = paren_depth.saturating_sub(1),
            Token::SemiColon if paren_depth == 0 && block_depth == 0 => {
                if has_significant(&tokens[start..i]) {
                    ranges.push(start..i);
                }
                start = i + 1;
            }
            Token::Word(w) => match w.keyword {
                Keyword::BEGIN if !begins_transaction(tokens, i) => block_depth += 1,
                Keyword::CASE => block_depth += 1,
                Keyword::END => block_depth = block_depth.saturating_sub(1),
                Keyword::CREATE | Keyword::ALTER | Keyword::IF
                    if paren_depth == 0
                        && block_depth == 0
                        && has_significant(&tokens[start..i])
                        // A preceding AS means this keyword opens a module
                        // body, not a new top-level statement
                        && !matches!(
                            last_significant,
                            Some(Token::Word(prev)) if prev.keyword == Keyword::AS
                        ) =>
                {
                    ranges.push(start..i);
                    start = i;
                }
                _ => {}
            },
            _ => {}
        }

        if !matches!(token, Token::Whitespace(_)) {
            last_significant = Some(token);
        }
    }

    if has_significant(&tokens[start..]) {
        ranges.push(start..tokens.len());
    }
    ranges
}

/// Existence guard preceding a create: IF testing OBJECT_ID around a DROP
fn is_drop_guard(stmt: &[Token]) -> bool {
    let mut has_object_id = false;
    let mut has_drop = false;
    for token in stmt {
        if let Token::Word(w) = token {
            if w.value.eq_ignore_ascii_case("OBJECT_ID") {
                has_object_id = true;
            }
            if w.keyword == Keyword::DROP {
                has_drop = true;
            }
        }
    }
    has_object_id && has_drop
}

/// True when the statement is CREATE/ALTER [OR ALTER] PROCEDURE/PROC
fn is_procedure_statement(stmt: &[Token]) -> bool {
    let mut cursor = TokenCursor::new(stmt);
    cursor.skip_whitespace();
    if !cursor.check_keyword(Keyword::CREATE) && !cursor.check_keyword(Keyword::ALTER) {
        return false;
    }
    cursor.advance();
    cursor.skip_whitespace();
    if cursor.check_keyword(Keyword::OR) {
        cursor.advance();
        cursor.skip_whitespace();
        if !cursor.check_keyword(Keyword::ALTER) {
            return false;
        }
        cursor.advance();
        cursor.skip_whitespace();
    }
    cursor.check_keyword(Keyword::PROCEDURE) || cursor.check_word_ci("PROC")
}

fn second_word_is(stmt: &[Token], value: &str) -> bool {
    let mut significant = stmt.iter().filter(|t| !matches!(t, Token::Whitespace(_)));
    significant.next();
    matches!(
        significant.next(),
        Some(Token::Word(w)) if w.value.eq_ignore_ascii_case(value)
    )
}

/// Split a token slice on commas outside parentheses
fn split_top_level_commas(tokens: &[Token]) -> Vec<&[Token]> {
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Comma if depth == 0 => {
                chunks.push(&tokens[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    chunks.push(&tokens[start..]);
    chunks
}

/// Canonical CREATE PROCEDURE emission; ALTER and CREATE OR ALTER forms are
/// rewritten to the plain CREATE verb with the same name, parameters, and body.
fn format_procedure(stmt: &[Token]) -> Option<String> {
    let mut cursor = TokenCursor::new(stmt);
    cursor.skip_whitespace();

    // CREATE / ALTER / CREATE OR ALTER all normalize to CREATE
    if !cursor.check_keyword(Keyword::CREATE) && !cursor.check_keyword(Keyword::ALTER) {
        return None;
    }
    cursor.advance();
    cursor.skip_whitespace();
    if cursor.check_keyword(Keyword::OR) {
        cursor.advance();
        cursor.skip_whitespace();
        if !cursor.check_keyword(Keyword::ALTER) {
            return None;
        }
        cursor.advance();
        cursor.skip_whitespace();
    }
    if !cursor.check_keyword(Keyword::PROCEDURE) && !cursor.check_word_ci("PROC") {
        return None;
    }
    cursor.advance();
    cursor.skip_whitespace();

    // Schema-qualified name, quote style preserved
    let mut name = String::new();
    loop {
        match cursor.current() {
            Some(Token::Word(w)) => {
                name.push_str(&format_word(w));
                cursor.advance();
            }
            _ => return None,
        }
        cursor.skip_whitespace();
        if matches!(cursor.current(), Some(Token::Period)) {
            name.push('.');
            cursor.advance();
            cursor.skip_whitespace();
        } else {
            break;
        }
    }

    // Parameters run until the AS that introduces the body; an AS that is
    // part of WITH EXECUTE AS does not count
    let params_start = cursor.pos();
    let mut as_pos = None;
    let mut depth = 0usize;
    let mut prev_word: Option<&str> = None;
    for (offset, token) in cursor.rest().iter().enumerate() {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => depth = depth.saturating_sub(1),
            Token::Word(w) if w.keyword == Keyword::AS && depth == 0 => {
                let after_execute = prev_word
                    .map(|p| p.eq_ignore_ascii_case("EXECUTE") || p.eq_ignore_ascii_case("EXEC"))
                    .unwrap_or(false);
                if !after_execute {
                    as_pos = Some(params_start + offset);
                    break;
                }
            }
            _ => {}
        }
        if let Token::Word(w) = token {
            prev_word = Some(&w.value);
        } else if !matches!(token, Token::Whitespace(_)) {
            prev_word = None;
        }
    }
    let as_pos = as_pos?;

    let mut params = &stmt[params_start..as_pos];
    let body = &stmt[as_pos + 1..];

    // Strip an outer parameter parenthesis so each parameter gets its own line
    if let (Some(Token::LParen), Some(Token::RParen)) = (
        first_significant(params),
        params.iter().rev().find(|t| !matches!(t, Token::Whitespace(_))),
    ) {
        let open = params.iter().position(|t| matches!(t, Token::LParen))?;
        let close = params.iter().rposition(|t| matches!(t, Token::RParen))?;
        params = &params[open + 1..close];
    }

    let param_chunks: Vec<String> = split_top_level_commas(params)
        .into_iter()
        .map(render_canonical_tokens)
        .filter(|chunk| !chunk.is_empty())
        .collect();

    let mut out = format!("CREATE PROCEDURE {}", name);
    if !param_chunks.is_empty() {
        out.push('\n');
        out.push_str(&param_chunks.join(",\n"));
    }
    out.push_str("\nAS\n");
    out.push_str(&format_procedure_body(body));
    Some(out)
}

fn format_procedure_body(body: &[Token]) -> String {
    let sql = tokens_to_sql(body);
    let sql = sql.trim();
    if sql.is_empty() {
        return String::new();
    }
    match Parser::parse_sql(&MsSqlDialect {}, sql) {
        Ok(parsed) if !parsed.is_empty() => parsed
            .iter()
            .map(canonical_statement)
            .collect::<Vec<_>>()
            .join("\n"),
        _ => format!("{};", render_canonical_tokens(body)),
    }
}
