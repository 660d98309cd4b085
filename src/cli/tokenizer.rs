//! Shell-like splitting of console lines
//!
//! A line is first cut on the literal `&&`; every segment is then split on
//! whitespace with POSIX-style quoting: single quotes are literal, double quotes
//! honour backslash escapes of `"`, `\\`, `$` and `` ` ``, and a backslash outside
//! quotes escapes the next character.

use thiserror::Error;

/// Delimiter for chained commands
pub const CHAIN_DELIMITER: &str = "&&";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenizeError {
    #[error("No closing quotation")]
    UnclosedQuote,

    #[error("No escaped character")]
    TrailingEscape,
}

pub fn split_chain(line: &str) -> impl Iterator<Item = &str> {
    line.split(CHAIN_DELIMITER)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

pub fn tokenize(segment: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    // distinguishes an empty quoted token ("") from no token
    let mut in_token = false;
    let mut quote = Quote::None;
    let mut chars = segment.chars();

    while let Some(c) = chars.next() {
        match quote {
            Quote::Single => {
                if c == '\'' {
                    quote = Quote::None;
                } else {
                    current.push(c);
                }
            }
            Quote::Double => match c {
                '"' => quote = Quote::None,
                '\\' => {
                    let escaped = chars.next().ok_or(TokenizeError::UnclosedQuote)?;
                    if !matches!(escaped, '"' | '\\' | '$' | '`') {
                        current.push('\\');
                    }
                    current.push(escaped);
                }
                _ => current.push(c),
            },
            Quote::None => match c {
                '\'' => {
                    quote = Quote::Single;
                    in_token = true;
                }
                '"' => {
                    quote = Quote::Double;
                    in_token = true;
                }
                '\\' => {
                    let escaped = chars.next().ok_or(TokenizeError::TrailingEscape)?;
                    current.push(escaped);
                    in_token = true;
                }
                c if c.is_whitespace() => {
                    if in_token {
                        tokens.push(std::mem::take(&mut current));
                        in_token = false;
                    }
                }
                _ => {
                    current.push(c);
                    in_token = true;
                }
            },
        }
    }

    if quote != Quote::None {
        return Err(TokenizeError::UnclosedQuote);
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chains_split_on_literal_delimiter() {
        let segments: Vec<&str> = split_chain("hold a && release a&&help").collect();
        assert_eq!(segments, vec!["hold a ", " release a", "help"]);
    }

    #[test]
    fn whitespace_separates_tokens() {
        assert_eq!(
            tokenize("  stick   l\th  100 ").unwrap(),
            vec!["stick", "l", "h", "100"]
        );
        assert!(tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn quotes_keep_whitespace_together() {
        assert_eq!(
            tokenize(r#"say "hello world" 'it is' mi"x"ed"#).unwrap(),
            vec!["say", "hello world", "it is", "mixed"]
        );
        assert_eq!(tokenize("cmd ''").unwrap(), vec!["cmd", ""]);
    }

    #[test]
    fn escapes_follow_shell_rules() {
        assert_eq!(tokenize(r"a\ b").unwrap(), vec!["a b"]);
        assert_eq!(tokenize(r#""q\"x\n""#).unwrap(), vec![r#"q"x\n"#]);
        assert_eq!(tokenize(r"'lit\eral'").unwrap(), vec![r"lit\eral"]);
    }

    #[test]
    fn unbalanced_input_is_an_error() {
        assert_eq!(tokenize("stick 'l"), Err(TokenizeError::UnclosedQuote));
        assert_eq!(tokenize("trailing \\"), Err(TokenizeError::TrailingEscape));
    }
}
