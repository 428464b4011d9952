//! Phase 3: Label string parser
//!
//! Alternates key and value reads over the whole input, keeping a running
//! character offset for error messages.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{ParseError, Result};
use crate::reader::{read_key, read_value};

/// Parsed labels, ordered by key.
pub type Labels = BTreeMap<String, String>;

/// Characters of `before` that precede its suffix `after`.
fn consumed(before: &str, after: &str) -> usize {
    before[..before.len() - after.len()].chars().count()
}

/// Parse a whitespace separated list of `key=value` pairs.
///
/// A later pair overwrites an earlier one with the same key. The empty
/// string parses to no labels. Any malformed key or value fails the whole
/// parse.
pub fn parse_labels(input: &str) -> Result<Labels> {
    let mut labels = Labels::new();
    let mut rest = input;
    let mut pos = 0;

    while !rest.is_empty() {
        let key = match read_key(rest) {
            Ok((key, after)) => {
                pos += consumed(rest, after);
                rest = after;
                key
            }
            Err(failure) => {
                pos += consumed(rest, failure.rest);
                return Err(ParseError::ReadKey {
                    pos: pos.saturating_sub(1),
                    source: failure.error,
                });
            }
        };

        if key.is_empty() {
            return Err(ParseError::EmptyKey {
                pos: pos.saturating_sub(1),
            });
        }

        let value = match read_value(rest) {
            Ok((value, after)) => {
                pos += consumed(rest, after);
                rest = after;
                value
            }
            Err(failure) => {
                pos += consumed(rest, failure.rest);
                // a failure short of the end is measured one past the delimiter
                if !failure.rest.is_empty() {
                    pos -= 1;
                }
                return Err(ParseError::ReadValue {
                    pos,
                    source: failure.error,
                });
            }
        };

        debug!(%key, %value, "read label");
        labels.insert(key, value);
    }

    Ok(labels)
}
