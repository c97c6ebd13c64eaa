//! GO batch splitting.
//!
//! A batch separator is a line that consists solely of `GO` (or `GO;`),
//! case-insensitive, outside any string literal, bracketed identifier, or
//! comment. Literal and block-comment state carries across lines, so a lone
//! `go` line inside a multi-line string never splits the batch.

/// A SQL batch with its content and source location
#[derive(Debug)]
pub struct Batch<'a> {
    pub content: &'a str,
    /// 1-based line number of the batch's first line
    pub start_line: usize,
}

/// Lexical state carried across lines while scanning for separators
#[derive(Debug, Default)]
struct ScanState {
    in_string: bool,
    /// Inside a `[bracketed identifier]`, where quotes are inert
    in_bracket: bool,
    /// T-SQL block comments nest
    comment_depth: usize,
}

impl ScanState {
    fn outside(&self) -> bool {
        !self.in_string && !self.in_bracket && self.comment_depth == 0
    }

    /// Advance the state over one line of text
    fn scan_line(&mut self, line: &str) {
        let bytes = line.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if self.in_string {
                if bytes[i] == b'\'' {
                    // Doubled quote is an escaped quote, still inside
                    if bytes.get(i + 1) == Some(&b'\'') {
                        i += 2;
                        continue;
                    }
                    self.in_string = false;
                }
                i += 1;
            } else if self.in_bracket {
                // Brackets have no escape form; the first ] closes
                if bytes[i] == b']' {
                    self.in_bracket = false;
                }
                i += 1;
            } else if self.comment_depth > 0 {
                if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
                    self.comment_depth -= 1;
                    i += 2;
                } else if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
                    self.comment_depth += 1;
                    i += 2;
                } else {
                    i += 1;
                }
            } else {
                match bytes[i] {
                    b'\'' => {
                        self.in_string = true;
                        i += 1;
                    }
                    b'[' => {
                        self.in_bracket = true;
                        i += 1;
                    }
                    b'-' if bytes.get(i + 1) == Some(&b'-') => {
                        // Line comment: rest of the line is inert
                        return;
                    }
                    b'/' if bytes.get(i + 1) == Some(&b'*') => {
                        self.comment_depth += 1;
                        i += 2;
                    }
                    _ => i += 1,
                }
            }
        }
    }
}

/// Split raw script text into GO-separated batches, dropping empty ones.
pub fn split_batches(content: &str) -> Vec<Batch<'_>> {
    // Estimate ~1 batch per 20 lines (GO separators are relatively sparse)
    let line_count = content.lines().count();
    let estimated_batches = (line_count / 20).max(1);
    let mut batches = Vec::with_capacity(estimated_batches);

    let mut state = ScanState::default();
    let mut current_pos = 0;
    let mut batch_start = 0;
    let mut current_line = 1; // 1-based line numbers
    let mut batch_start_line = 1;

    for line in content.lines() {
        let trimmed = line.trim();
        // Calculate actual line length in the original content (including line ending)
        let line_end = current_pos + line.len();
        let next_pos = if content[line_end..].starts_with("\r\n") {
            line_end + 2
        } else if content[line_end..].starts_with('\n') {
            line_end + 1
        } else {
            line_end // End of file, no newline
        };

        // GO must be on its own line (optionally with whitespace), and only
        // counts as a separator outside strings and comments
        let is_separator = state.outside()
            && (trimmed.eq_ignore_ascii_case("go") || trimmed.eq_ignore_ascii_case("go;"));

        if is_separator {
            let body = &content[batch_start..current_pos];
            if !body.trim().is_empty() {
                batches.push(Batch {
                    content: body,
                    start_line: batch_start_line,
                });
            }
            batch_start = next_pos;
            batch_start_line = current_line + 1; // Next line after GO
        } else {
            state.scan_line(line);
        }

        current_pos = next_pos;
        current_line += 1;
    }

    // Add remaining content
    if batch_start < content.len() && !content[batch_start..].trim().is_empty() {
        batches.push(Batch {
            content: &content[batch_start..],
            start_line: batch_start_line,
        });
    }

    batches
}
