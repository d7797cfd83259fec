//! Compact text notation for connectors and disjuncts.
//!
//! A connector token is an optional `@` (multi), an uppercase head, a
//! lowercase/wildcard subscript, and a trailing direction marker: `S+`,
//! `@O-`, `Sa*+`. Connectors within a disjunct join with `&`, innermost
//! first on each side: `"S- & O+"`. An empty string is the empty
//! disjunct.
//!
//! This is the front door tests and demos use to build sentences;
//! production callers get their disjuncts from the dictionary pipeline.

use linkgram_types::{ConnectorSpec, Direction, Sentence};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotationError {
    #[error("connector must end with '+' or '-': {0:?}")]
    MissingDirection(String),
    #[error("connector needs an uppercase head: {0:?}")]
    MissingHead(String),
    #[error("invalid character {1:?} in connector {0:?}")]
    InvalidChar(String, char),
}

/// Parse one connector token into its spec and direction.
pub fn parse_connector(raw: &str) -> Result<(ConnectorSpec, Direction), NotationError> {
    let token = raw.trim();
    let (multi, rest) = match token.strip_prefix('@') {
        Some(rest) => (true, rest),
        None => (false, token),
    };
    let Some(dir) = rest.chars().last().and_then(Direction::from_char) else {
        return Err(NotationError::MissingDirection(token.to_string()));
    };
    let body = &rest[..rest.len() - 1];

    let head_len = body.bytes().take_while(u8::is_ascii_uppercase).count();
    if head_len == 0 {
        return Err(NotationError::MissingHead(token.to_string()));
    }
    let (head, tail) = body.split_at(head_len);
    for c in tail.chars() {
        if !(c.is_ascii_lowercase() || c == '*' || c == '^') {
            return Err(NotationError::InvalidChar(token.to_string(), c));
        }
    }

    let mut spec = ConnectorSpec::new(head, tail);
    spec.multi = multi;
    Ok((spec, dir))
}

/// Parse an `&`-joined disjunct into its left and right connector lists,
/// innermost first on each side.
pub fn parse_disjunct(
    raw: &str,
) -> Result<(Vec<ConnectorSpec>, Vec<ConnectorSpec>), NotationError> {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for token in raw.split('&') {
        if token.trim().is_empty() {
            continue;
        }
        let (spec, dir) = parse_connector(token)?;
        match dir {
            Direction::Left => left.push(spec),
            Direction::Right => right.push(spec),
        }
    }
    Ok((left, right))
}

/// Build a sentence from per-word lists of disjunct strings.
///
/// ```rust
/// use linkcount::notation::sentence_from_words;
///
/// let sent = sentence_from_words(&[&["S+"], &["S-", "S- & O+"], &["O-"]]).unwrap();
/// assert_eq!(sent.len(), 3);
/// assert_eq!(sent.disjunct_count(), 4);
/// ```
pub fn sentence_from_words(words: &[&[&str]]) -> Result<Sentence, NotationError> {
    let mut sent = Sentence::new();
    for &disjuncts in words {
        let w = sent.push_word();
        for &raw in disjuncts {
            let (left, right) = parse_disjunct(raw)?;
            sent.add_disjunct(w, &left, &right);
        }
    }
    Ok(sent)
}
