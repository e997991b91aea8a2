//! Shell-style splitting of one command line.
//!
//! Words are separated by whitespace. Single or double quotes group words
//! (`"Bungee Jump"`) and may appear mid-word (`name="Jo Lee"` → `name=Jo Lee`).
//! There are no escape sequences; a quote of the other kind is literal inside
//! a quoted span.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnbalancedQuote(pub char);

impl fmt::Display for UnbalancedQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unbalanced {} quote", self.0)
    }
}

impl std::error::Error for UnbalancedQuote {}

pub fn split(line: &str) -> Result<Vec<String>, UnbalancedQuote> {
    let mut words = Vec::new();
    let mut current = String::new();
    // A quoted empty string ("") is still a word.
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for ch in line.chars() {
        match quote {
            Some(open) if ch == open => quote = None,
            Some(_) => current.push(ch),
            None if ch == '"' || ch == '\'' => {
                quote = Some(ch);
                in_word = true;
            }
            None if ch.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(ch);
                in_word = true;
            }
        }
    }

    if let Some(open) = quote {
        return Err(UnbalancedQuote(open));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
