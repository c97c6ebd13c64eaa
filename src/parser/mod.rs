//! DDL script parsing

mod batch_splitter;
mod ddl_parser;
mod formatter;
mod token_cursor;

pub use batch_splitter::{split_batches, Batch};
pub use ddl_parser::DdlScriptParser;
pub use formatter::{format_token_sql, format_word, render_canonical_tokens, tokens_to_sql};
