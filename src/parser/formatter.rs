//! Canonical SQL text emission.
//!
//! Two rendering paths feed the normalizer's output: statements sqlparser
//! can represent are pretty-printed from the AST (with a multi-line form
//! for CREATE TABLE), and everything else is re-emitted from its token
//! stream with uppercase keywords and normalized spacing. Both paths are
//! deterministic, so normalizing already-canonical text is a no-op.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use sqlparser::ast::{ColumnDef, CreateTable, Statement};
use sqlparser::tokenizer::Token;

/// T-SQL reserved words and built-in type names, the only words the token
/// renderer uppercases. sqlparser's keyword table is far wider and includes
/// non-reserved words (NAME, TYPE, ACTION, ...) that are legal identifiers
/// and must pass through verbatim.
static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "ADD", "ALL", "ALTER", "AND", "ANY", "AS", "ASC", "AUTHORIZATION", "BACKUP", "BEGIN",
        "BETWEEN", "BREAK", "BROWSE", "BULK", "BY", "CASCADE", "CASE", "CHECK", "CHECKPOINT",
        "CLOSE", "CLUSTERED", "COALESCE", "COLLATE", "COLUMN", "COMMIT", "COMPUTE", "CONSTRAINT",
        "CONTAINS", "CONTINUE", "CONVERT", "CREATE", "CROSS", "CURRENT", "CURSOR", "DATABASE",
        "DBCC", "DEALLOCATE", "DECLARE", "DEFAULT", "DELETE", "DENY", "DESC", "DISABLE",
        "DISTINCT", "DISTRIBUTED", "DOUBLE", "DROP", "ELSE", "ENABLE", "END", "ESCAPE", "EXCEPT",
        "EXEC", "EXECUTE", "EXISTS", "EXIT", "EXTERNAL", "FETCH", "FILE", "FILLFACTOR", "FOR",
        "FOREIGN", "FREETEXT", "FROM", "FULL", "FUNCTION", "GOTO", "GRANT", "GROUP", "HAVING",
        "HOLDLOCK", "IDENTITY", "IF", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO",
        "IS", "JOIN", "KEY", "KILL", "LEFT", "LIKE", "LINENO", "MERGE", "NATIONAL", "NOCHECK",
        "NONCLUSTERED", "NOT", "NULL", "NULLIF", "OF", "OFF", "OFFSETS", "ON", "OPEN", "OPTION",
        "OR", "ORDER", "OUTER", "OVER", "PERCENT", "PIVOT", "PLAN", "PRECISION", "PRIMARY",
        "PRINT", "PROC", "PROCEDURE", "PUBLIC", "RAISERROR", "READ", "READTEXT", "RECONFIGURE",
        "REFERENCES", "REPLICATION", "RESTORE", "RESTRICT", "RETURN", "REVERT", "REVOKE",
        "RIGHT", "ROLLBACK", "ROWCOUNT", "ROWGUIDCOL", "RULE", "SAVE", "SCHEMA", "SELECT",
        "SEQUENCE", "SESSION_USER", "SET", "SETUSER", "SHUTDOWN", "SOME", "STATISTICS", "TABLE",
        "TABLESAMPLE", "THEN", "TO", "TOP", "TRAN", "TRANSACTION", "TRIGGER", "TRUNCATE",
        "UNION", "UNIQUE", "UNPIVOT", "UPDATE", "UPDATETEXT", "USE", "USER", "VALUES", "VARYING",
        "VIEW", "WAITFOR", "WHEN", "WHERE", "WHILE", "WITH", "WRITETEXT",
        // Built-in type names
        "BIGINT", "BINARY", "BIT", "CHAR", "DATE", "DATETIME", "DATETIME2", "DATETIMEOFFSET",
        "DECIMAL", "FLOAT", "IMAGE", "INT", "MONEY", "NCHAR", "NTEXT", "NUMERIC", "NVARCHAR",
        "REAL", "SMALLDATETIME", "SMALLINT", "SMALLMONEY", "TEXT", "TIME", "TINYINT",
        "UNIQUEIDENTIFIER", "VARBINARY", "VARCHAR", "XML",
    ]
    .into_iter()
    .collect()
});

fn is_reserved_word(value: &str) -> bool {
    RESERVED_WORDS.contains(value.to_ascii_uppercase().as_str())
}

/// Converts a Word token to a string, preserving the original quote style.
pub fn format_word(word: &sqlparser::tokenizer::Word) -> String {
    match word.quote_style {
        Some('[') => format!("[{}]", word.value),
        Some('"') => format!("\"{}\"", word.value),
        _ => word.value.clone(),
    }
}

/// Converts a sqlparser token to a SQL-safe string representation.
///
/// Single quotes inside string literals are escaped by doubling them, so
/// the output can be re-tokenized or re-parsed.
pub fn format_token_sql(token: &Token) -> String {
    match token {
        Token::Word(w) => format_word(w),
        Token::Number(n, _) => n.clone(),
        Token::SingleQuotedString(s) => format!("'{}'", s.replace('\'', "''")),
        Token::NationalStringLiteral(s) => format!("N'{}'", s.replace('\'', "''")),
        Token::DoubleQuotedString(s) => format!("\"{}\"", s),
        Token::HexStringLiteral(s) => format!("0x{}", s),
        Token::LParen => "(".to_string(),
        Token::RParen => ")".to_string(),
        Token::Comma => ",".to_string(),
        Token::Period => ".".to_string(),
        Token::SemiColon => ";".to_string(),
        Token::Colon => ":".to_string(),
        Token::DoubleColon => "::".to_string(),
        Token::Plus => "+".to_string(),
        Token::Minus => "-".to_string(),
        Token::Mul => "*".to_string(),
        Token::Div => "/".to_string(),
        Token::Mod => "%".to_string(),
        Token::Eq => "=".to_string(),
        Token::Neq => "<>".to_string(),
        Token::Lt => "<".to_string(),
        Token::Gt => ">".to_string(),
        Token::LtEq => "<=".to_string(),
        Token::GtEq => ">=".to_string(),
        Token::Whitespace(ws) => ws.to_string(),
        Token::AtSign => "@".to_string(),
        Token::Sharp => "#".to_string(),
        Token::Ampersand => "&".to_string(),
        Token::Pipe => "|".to_string(),
        Token::Caret => "^".to_string(),
        Token::Tilde => "~".to_string(),
        Token::ExclamationMark => "!".to_string(),
        Token::LBracket => "[".to_string(),
        Token::RBracket => "]".to_string(),
        Token::LBrace => "{".to_string(),
        Token::RBrace => "}".to_string(),
        _ => format!("{}", token),
    }
}

/// Reconstruct SQL text from a token slice, preserving original whitespace.
pub fn tokens_to_sql(tokens: &[Token]) -> String {
    tokens.iter().map(format_token_sql).collect()
}

fn no_space_before(token: &Token, prev: &Token) -> bool {
    match token {
        Token::Comma
        | Token::SemiColon
        | Token::RParen
        | Token::RBracket
        | Token::Period
        | Token::DoubleColon => true,
        // Call and type-argument style: ident( not ident (
        Token::LParen => matches!(prev, Token::Word(_) | Token::RParen | Token::RBracket),
        _ => false,
    }
}

fn no_space_after(token: &Token) -> bool {
    matches!(
        token,
        Token::LParen | Token::LBracket | Token::Period | Token::AtSign
    )
}

/// Re-emit a token slice as canonical single-line SQL: reserved keywords
/// uppercased, identifiers and literals verbatim, whitespace normalized to
/// single spaces.
pub fn render_canonical_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;

    for token in tokens {
        if matches!(token, Token::Whitespace(_)) {
            continue;
        }

        let text = match token {
            Token::Word(w) if w.quote_style.is_none() && is_reserved_word(&w.value) => {
                w.value.to_uppercase()
            }
            _ => format_token_sql(token),
        };

        if let Some(prev) = prev {
            if !no_space_before(token, prev) && !no_space_after(prev) {
                out.push(' ');
            }
        }
        out.push_str(&text);
        prev = Some(token);
    }

    out
}

/// Canonical text for one parsed statement, semicolon-terminated.
pub fn canonical_statement(statement: &Statement) -> String {
    match statement {
        Statement::CreateTable(create_table) => format_create_table(create_table),
        _ => format!("{};", statement),
    }
}

/// CREATE TABLE with one column or constraint clause per line.
fn format_create_table(create_table: &CreateTable) -> String {
    let mut clauses: Vec<String> = create_table.columns.iter().map(format_column_def).collect();
    clauses.extend(create_table.constraints.iter().map(|c| c.to_string()));

    format!(
        "CREATE TABLE {} (\n    {}\n);",
        create_table.name,
        clauses.join(",\n    ")
    )
}

fn format_column_def(column: &ColumnDef) -> String {
    let mut clause = format!("{} {}", column.name, column.data_type);
    for option in &column.options {
        if let Some(name) = &option.name {
            clause.push_str(&format!(" CONSTRAINT {}", name));
        }
        clause.push_str(&format!(" {}", option.option));
    }
    clause
}
