//! Quote-aware line tokenizer shared by both passes

use crate::error::{LoadError, Result};

const QUOTE: char = '"';

/// Splits one line into trimmed tokens
///
/// A piece that starts with `"` but does not end with one opens a quoted
/// field: the following pieces of the same line are glued back together with
/// the delimiter until one ends with `"`. The enclosing quotes are removed
/// from the finished token. There is no escaped-quote syntax.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    delimiter: char,
    collapse_whitespace: bool,
}

impl Tokenizer {
    /// Create a tokenizer for the given delimiter
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            collapse_whitespace: false,
        }
    }

    /// Drop empty unquoted tokens between runs of a whitespace delimiter (builder pattern)
    ///
    /// Has no effect for `,` or other non-whitespace delimiters, where an
    /// empty token is a real empty field.
    pub fn collapse_whitespace(mut self, collapse: bool) -> Self {
        self.collapse_whitespace = collapse;
        self
    }

    /// Delimiter this tokenizer splits on
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Tokenize a line that has already been trimmed
    ///
    /// `line_no` (1-based) is only used to give errors a location.
    pub fn parse_line(&self, line: &str, line_no: usize) -> Result<Vec<String>> {
        let skip_empty = self.collapse_whitespace && self.delimiter.is_whitespace();
        let mut tokens = Vec::new();
        let mut pieces = line.split(self.delimiter);

        while let Some(piece) = pieces.next() {
            let piece = piece.trim();

            if opens_quote(piece) {
                let column = tokens.len();
                let mut field = String::from(piece);
                loop {
                    let next = pieces.next().ok_or(LoadError::UnterminatedQuote {
                        line: line_no,
                        column,
                    })?;
                    field.push(self.delimiter);
                    field.push_str(next);
                    if next.trim_end().ends_with(QUOTE) {
                        break;
                    }
                }
                tokens.push(strip_quotes(field.trim()).to_string());
            } else if piece.is_empty() && skip_empty {
                continue;
            } else {
                tokens.push(strip_quotes(piece).to_string());
            }
        }

        Ok(tokens)
    }
}

fn is_quoted(piece: &str) -> bool {
    piece.len() >= 2 && piece.starts_with(QUOTE) && piece.ends_with(QUOTE)
}

fn opens_quote(piece: &str) -> bool {
    piece.starts_with(QUOTE) && !is_quoted(piece)
}

fn strip_quotes(token: &str) -> &str {
    if is_quoted(token) {
        &token[1..token.len() - 1]
    } else {
        token
    }
}
